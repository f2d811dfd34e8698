use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use log::error;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;
use tps_common::{Cents, DEFAULT_CURRENCY_CODE};

//--------------------------------------    PaymentStatus     ---------------------------------------------------------
/// Where the money stands for an order. This field is only ever written via the status mapper in
/// [`crate::status_map`]; nothing else in the system assigns payment statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// No definitive answer from the gateway yet.
    Pending,
    /// The gateway approved the payment in full.
    Paid,
    /// The gateway declined or errored the payment.
    Failed,
    /// The payment was voided after authorisation.
    Cancelled,
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "pending"),
            PaymentStatus::Paid => write!(f, "paid"),
            PaymentStatus::Failed => write!(f, "failed"),
            PaymentStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl From<String> for PaymentStatus {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid payment status: {value}. But this conversion cannot fail. Defaulting to pending");
            PaymentStatus::Pending
        })
    }
}

impl FromStr for PaymentStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "failed" => Ok(Self::Failed),
            "cancelled" => Ok(Self::Cancelled),
            s => Err(ConversionError(format!("Invalid payment status: {s}"))),
        }
    }
}

//--------------------------------------   OrderStatusType    ---------------------------------------------------------
/// The fulfillment side of an order's life. Checkout creates orders as `Pending`; the status
/// mapper moves them along as gateway verdicts arrive. `Shipped` is only ever set by fulfillment
/// tooling, never by the payment flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum OrderStatusType {
    /// The order has been created and is awaiting a payment verdict.
    Pending,
    /// Payment was approved and the order can be picked and packed.
    Processing,
    /// The order has left the warehouse.
    Shipped,
    /// The order was cancelled, typically because payment failed or was voided.
    Cancelled,
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatusType::Pending => write!(f, "pending"),
            OrderStatusType::Processing => write!(f, "processing"),
            OrderStatusType::Shipped => write!(f, "shipped"),
            OrderStatusType::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl From<String> for OrderStatusType {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid order status: {value}. But this conversion cannot fail. Defaulting to pending");
            OrderStatusType::Pending
        })
    }
}

impl FromStr for OrderStatusType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "shipped" => Ok(Self::Shipped),
            "cancelled" => Ok(Self::Cancelled),
            s => Err(ConversionError(format!("Invalid order status: {s}"))),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid status: {0}")]
pub struct ConversionError(String);

//--------------------------------------       OrderId        ---------------------------------------------------------
/// The public, storefront-facing order identifier. Distinct from the database row id, which never
/// leaves the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct OrderId(pub String);

impl FromStr for OrderId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for OrderId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl OrderId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//--------------------------------------        Order         ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub order_id: OrderId,
    pub total_amount: Cents,
    pub currency: String,
    pub status: OrderStatusType,
    pub payment_status: PaymentStatus,
    pub customer_email: String,
    pub customer_name: Option<String>,
    pub shipping_address: Option<String>,
    pub shipping_city: Option<String>,
    pub shipping_phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------       NewOrder       ---------------------------------------------------------
#[derive(Debug, Clone)]
pub struct NewOrder {
    /// The order id as assigned by the storefront
    pub order_id: OrderId,
    /// The order total, in minor currency units
    pub total_amount: Cents,
    /// The ISO-4217 currency code for the total
    pub currency: String,
    /// Where payment receipts and order updates get sent
    pub customer_email: String,
    pub customer_name: Option<String>,
    pub shipping_address: Option<String>,
    pub shipping_city: Option<String>,
    pub shipping_phone: Option<String>,
}

impl NewOrder {
    pub fn new(order_id: OrderId, total_amount: Cents, customer_email: String) -> Self {
        Self {
            order_id,
            total_amount,
            currency: DEFAULT_CURRENCY_CODE.to_string(),
            customer_email,
            customer_name: None,
            shipping_address: None,
            shipping_city: None,
            shipping_phone: None,
        }
    }
}

//--------------------------------------  PaymentTransaction  ---------------------------------------------------------
/// The local mirror of a gateway transaction. `status` is stored verbatim as the gateway reported
/// it, including values this codebase has never heard of; translation into the local vocabulary
/// happens on read, in [`crate::status_map`].
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentTransaction {
    pub id: i64,
    pub order_id: OrderId,
    /// The gateway's transaction id. The handle used by webhooks and polling.
    pub gateway_id: String,
    /// The merchant-generated payment reference that was signed at checkout
    pub reference: String,
    pub amount: Cents,
    pub currency: String,
    pub status: String,
    /// Raw JSON snapshot of the gateway's response at creation time
    pub gateway_payload: Option<String>,
    /// Raw JSON body of the most recent webhook for this transaction
    pub webhook_payload: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------    NewTransaction    ---------------------------------------------------------
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub order_id: OrderId,
    pub gateway_id: String,
    pub reference: String,
    pub amount: Cents,
    pub currency: String,
    pub status: String,
    pub gateway_payload: Option<String>,
}

impl NewTransaction {
    pub fn new(order_id: OrderId, gateway_id: String, reference: String, amount: Cents) -> Self {
        Self {
            order_id,
            gateway_id,
            reference,
            amount,
            currency: DEFAULT_CURRENCY_CODE.to_string(),
            status: "PENDING".to_string(),
            gateway_payload: None,
        }
    }

    pub fn with_currency(mut self, currency: String) -> Self {
        self.currency = currency;
        self
    }

    pub fn with_status(mut self, status: String) -> Self {
        self.status = status;
        self
    }

    pub fn with_gateway_payload(mut self, payload: String) -> Self {
        self.gateway_payload = Some(payload);
        self
    }
}

//--------------------------------------  TransactionUpdate   ---------------------------------------------------------
/// The writable fields of a transaction row. Payload fields are merge-on-write: `None` leaves the
/// stored snapshot untouched rather than clearing it.
#[derive(Debug, Clone, Default)]
pub struct TransactionUpdate {
    pub status: String,
    pub gateway_payload: Option<String>,
    pub webhook_payload: Option<String>,
}
