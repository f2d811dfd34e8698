use serde::{Deserialize, Serialize};
use serde_json::Value;
use tps_common::Cents;

use crate::WompiApiError;

/// Outbound transaction-creation payload. Field names follow the gateway's snake_case wire
/// format exactly, so this struct serializes straight into the request body.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentRequest {
    pub amount_in_cents: Cents,
    pub currency: String,
    /// Integrity signature over reference, amount, currency and the shared secret.
    /// See [`crate::helpers::integrity_signature`].
    pub signature: String,
    pub customer_email: String,
    pub reference: String,
    /// Payment method selection as supplied by the storefront (type, token, installments, ...).
    /// Passed through verbatim; the gateway owns this schema.
    pub payment_method: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acceptance_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_data: Option<CustomerData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<ShippingAddress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal_id_type: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShippingAddress {
    #[serde(default)]
    pub address_line_1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line_2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

impl ShippingAddress {
    /// Shipping is only forwarded to the gateway when there is an actual street address to ship
    /// to; a bag of empty strings is treated as "no shipping".
    pub fn has_street_address(&self) -> bool {
        !self.address_line_1.trim().is_empty()
    }
}

/// The gateway's view of a transaction. Every field except `id` is optional with a documented
/// default, because event payloads and API responses have drifted over gateway versions and this
/// server must not fall over on a missing field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WompiTransaction {
    pub id: String,
    /// Defaults to `PENDING` when absent; the status mapper treats unknown text the same way.
    #[serde(default = "pending_status")]
    pub status: String,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub amount_in_cents: Option<i64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub payment_method_type: Option<String>,
    #[serde(default)]
    pub status_message: Option<String>,
    #[serde(default)]
    pub redirect_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub finalized_at: Option<String>,
}

fn pending_status() -> String {
    "PENDING".to_string()
}

impl WompiTransaction {
    pub fn try_from_value(value: &Value) -> Result<Self, WompiApiError> {
        serde_json::from_value(value.clone()).map_err(|e| WompiApiError::JsonError(e.to_string()))
    }
}

/// Inbound webhook event envelope. Everything is optional; the receiver decides what counts as
/// malformed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookEvent {
    #[serde(default)]
    pub event: Option<String>,
    #[serde(default)]
    pub data: Option<WebhookData>,
    #[serde(default)]
    pub sent_at: Option<String>,
    #[serde(default)]
    pub timestamp: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookData {
    #[serde(default)]
    pub transaction: Option<Value>,
}

impl WebhookEvent {
    /// The transaction object carried by the event, if any.
    pub fn transaction_value(&self) -> Option<&Value> {
        self.data.as_ref().and_then(|d| d.transaction.as_ref()).filter(|v| !v.is_null())
    }
}
