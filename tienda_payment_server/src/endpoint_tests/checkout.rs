//! Checkout and polling endpoint tests.
//!
//! The gateway client is pointed at a closed local port, so any call to it fails fast with a transport error. That
//! keeps these tests offline while still exercising everything up to and including the gateway error mapping; the
//! happy path past the gateway is covered by the engine's flow tests and the webhook endpoint tests.

use actix_web::{http::StatusCode, web, web::ServiceConfig};
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use tienda_payment_engine::{
    db_types::{Order, OrderId, OrderStatusType, PaymentStatus},
    PaymentFlowApi,
};
use tps_common::Cents;
use wompi_tools::{WompiApi, WompiConfig};

use super::helpers::{get_request, post_request};
use crate::{
    endpoint_tests::mocks::MockCheckoutDb,
    wompi_routes::{CheckoutRoute, PollTransactionRoute},
};

#[actix_web::test]
async fn missing_fields_are_rejected_before_anything_happens() {
    let _ = env_logger::try_init().ok();
    // The mock has no expectations, so the database must not be touched for an invalid request.
    let (status, response) =
        post_request("/transactions", &json!({}), configure_untouched).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(response.contains("Missing or invalid fields"));
    assert!(response.contains("orderId"));
    assert!(response.contains("customerEmail"));
    assert!(response.contains("paymentMethod"));
}

#[actix_web::test]
async fn checkout_registers_the_order_before_calling_the_gateway() {
    let _ = env_logger::try_init().ok();
    let (status, response) =
        post_request("/transactions", &checkout_body(), configure_new_order).await.expect("Request failed");
    // The gateway is unreachable, so the checkout fails, but the order insert has already been verified by the mock.
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(response.contains("could not be reached"));
}

#[actix_web::test]
async fn checkout_for_an_existing_order_does_not_recreate_it() -> anyhow::Result<()> {
    let _ = env_logger::try_init().ok();
    let (status, response) = post_request("/transactions", &checkout_body(), configure_existing_order)
        .await
        .map_err(|e| anyhow::anyhow!(e))?;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(response.contains("could not be reached"));
    Ok(())
}

#[actix_web::test]
async fn polling_a_blank_transaction_id_is_invalid() {
    let _ = env_logger::try_init().ok();
    let (status, response) = get_request("/transactions/%20", configure_untouched).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response, r#"{"error":"Invalid request. A transaction id is required"}"#);
}

#[actix_web::test]
async fn polling_with_an_unreachable_gateway_is_a_bad_gateway() {
    let _ = env_logger::try_init().ok();
    let (status, response) = get_request("/transactions/txn-9001", configure_untouched).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(response.contains("could not be reached"));
}

fn checkout_body() -> Value {
    json!({
        "orderId": "ord-1001",
        "amount": 150_000.0,
        "currency": "COP",
        "reference": "ref-1001",
        "customerEmail": "ana@example.com",
        "paymentMethod": {"type": "CARD", "token": "tok_test_1", "installments": 1},
        "customerData": {"full_name": "Ana Pérez", "phone_number": "+573001234567"},
        "shippingAddress": {"address_line_1": "Calle 1 # 2-3", "city": "Bogotá"}
    })
}

fn order_row() -> Order {
    Order {
        id: 1,
        order_id: OrderId("ord-1001".into()),
        total_amount: Cents::from(15_000_000),
        currency: "COP".to_string(),
        status: OrderStatusType::Pending,
        payment_status: PaymentStatus::Pending,
        customer_email: "ana@example.com".to_string(),
        customer_name: Some("Ana Pérez".to_string()),
        shipping_address: Some("Calle 1 # 2-3".to_string()),
        shipping_city: Some("Bogotá".to_string()),
        shipping_phone: Some("+573001234567".to_string()),
        created_at: Utc.with_ymd_and_hms(2024, 7, 19, 14, 20, 0).unwrap(),
        updated_at: Utc.with_ymd_and_hms(2024, 7, 19, 14, 20, 0).unwrap(),
    }
}

fn register(cfg: &mut ServiceConfig, db: MockCheckoutDb) {
    let config = WompiConfig { base_url: "http://127.0.0.1:1".to_string(), ..Default::default() };
    let wompi = WompiApi::new(config).expect("Could not build the gateway client");
    let api = PaymentFlowApi::new(db);
    cfg.service(CheckoutRoute::<MockCheckoutDb>::new())
        .service(PollTransactionRoute::<MockCheckoutDb>::new())
        .app_data(web::Data::new(api))
        .app_data(web::Data::new(wompi));
}

fn configure_untouched(cfg: &mut ServiceConfig) {
    register(cfg, MockCheckoutDb::new());
}

fn configure_new_order(cfg: &mut ServiceConfig) {
    let mut db = MockCheckoutDb::new();
    db.expect_fetch_order_by_order_id().withf(|id| id.as_str() == "ord-1001").returning(|_| Ok(None));
    db.expect_insert_order()
        .withf(|order| {
            order.order_id.as_str() == "ord-1001"
                && order.total_amount == Cents::from(15_000_000)
                && order.currency == "COP"
                && order.customer_name.as_deref() == Some("Ana Pérez")
                && order.shipping_city.as_deref() == Some("Bogotá")
        })
        .returning(|_| Ok(order_row()));
    register(cfg, db);
}

fn configure_existing_order(cfg: &mut ServiceConfig) {
    let mut db = MockCheckoutDb::new();
    // No insert expectation: re-registering the order would fail this test.
    db.expect_fetch_order_by_order_id().withf(|id| id.as_str() == "ord-1001").returning(|_| Ok(Some(order_row())));
    register(cfg, db);
}
