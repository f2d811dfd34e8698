use log::*;
use tienda_payment_engine::db_types::{NewOrder, OrderId};
use tps_common::Cents;
use wompi_tools::{helpers::integrity_signature, PaymentRequest, WompiConfig};

use crate::{data_objects::CheckoutRequest, errors::CheckoutConversionError};

/// Check that a checkout request carries everything the gateway insists on. All missing fields are
/// reported in one message so the storefront can fix them in a single round trip.
pub fn validate_checkout_request(value: &CheckoutRequest) -> Result<(), CheckoutConversionError> {
    let mut missing = Vec::new();
    if value.order_id.trim().is_empty() {
        missing.push("orderId");
    }
    if !(value.amount.is_finite() && value.amount > 0.0) {
        missing.push("amount");
    }
    if value.currency.trim().is_empty() {
        missing.push("currency");
    }
    if value.reference.trim().is_empty() {
        missing.push("reference");
    }
    if value.customer_email.trim().is_empty() {
        missing.push("customerEmail");
    }
    if value.payment_method.is_null() || value.payment_method.as_object().is_some_and(|o| o.is_empty()) {
        missing.push("paymentMethod");
    }
    if missing.is_empty() {
        Ok(())
    } else {
        Err(CheckoutConversionError(format!("Missing or invalid fields: {}", missing.join(", "))))
    }
}

/// Convert a storefront checkout request into the gateway's transaction-creation payload, signing
/// it with the integrity secret. The secret itself never enters the payload, only the signature
/// derived from it does.
pub fn new_payment_request_from_checkout(
    value: &CheckoutRequest,
    config: &WompiConfig,
) -> Result<PaymentRequest, CheckoutConversionError> {
    trace!("💳️ Converting CheckoutRequest to PaymentRequest for order {}", value.order_id);
    validate_checkout_request(value)?;
    let amount_in_cents = Cents::from_major(value.amount);
    let signature = integrity_signature(&value.reference, amount_in_cents, &value.currency, &config.integrity_secret);
    let shipping_address = value.shipping_address.clone().filter(|a| a.has_street_address());
    Ok(PaymentRequest {
        amount_in_cents,
        currency: value.currency.clone(),
        signature,
        customer_email: value.customer_email.clone(),
        reference: value.reference.clone(),
        payment_method: value.payment_method.clone(),
        acceptance_token: value.acceptance_token.clone(),
        customer_data: value.customer_data.clone(),
        shipping_address,
        redirect_url: config.redirect_url.clone(),
    })
}

/// Build the order record that mirrors a checkout request, for checkouts that arrive before the
/// storefront has registered the order. Customer details are lifted from the nested gateway
/// objects where present.
pub fn new_order_from_checkout(value: &CheckoutRequest) -> NewOrder {
    let mut order = NewOrder::new(
        OrderId::from(value.order_id.as_str()),
        Cents::from_major(value.amount),
        value.customer_email.clone(),
    );
    if !value.currency.trim().is_empty() {
        order.currency = value.currency.clone();
    }
    if let Some(customer) = &value.customer_data {
        order.customer_name = customer.full_name.clone();
        order.shipping_phone = customer.phone_number.clone();
    }
    if let Some(shipping) = &value.shipping_address {
        if shipping.has_street_address() {
            order.shipping_address = Some(shipping.address_line_1.clone());
        }
        order.shipping_city = shipping.city.clone();
        if order.shipping_phone.is_none() {
            order.shipping_phone = shipping.phone_number.clone();
        }
    }
    order
}
