use actix_web::{http::StatusCode, web, web::ServiceConfig};
use chrono::{TimeZone, Utc};
use tienda_payment_engine::{
    db_types::{Order, OrderId, OrderStatusType, PaymentStatus, PaymentTransaction},
    traits::CheckoutError,
    PaymentFlowApi,
};
use tps_common::{Cents, Secret};
use wompi_tools::helpers::event_signature;

use super::helpers::post_raw;
use crate::{
    config::WebhookOptions,
    endpoint_tests::mocks::MockCheckoutDb,
    wompi_routes::{WompiWebhookRoute, EVENT_SIGNATURE_HEADER},
};

const ACK_JSON: &str = r#"{"success":true,"message":"Event processed."}"#;

#[actix_web::test]
async fn approved_event_updates_the_mirror() {
    let _ = env_logger::try_init().ok();
    let body = webhook_body("APPROVED");
    let sig = event_signature(body.as_bytes(), &test_secret());
    let (status, response) = post_raw("/webhooks", &body, &[(EVENT_SIGNATURE_HEADER, sig.as_str())], configure_applied)
        .await
        .expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, ACK_JSON);
}

#[actix_web::test]
async fn tampered_signature_is_rejected_and_nothing_is_written() {
    let _ = env_logger::try_init().ok();
    let body = webhook_body("APPROVED");
    let sig = event_signature(body.as_bytes(), &Secret::new("not_the_events_secret".to_string()));
    // The mock has no expectations, so any database call would fail this test.
    let (status, response) =
        post_raw("/webhooks", &body, &[(EVENT_SIGNATURE_HEADER, sig.as_str())], configure_rejecting)
            .await
            .expect("Request failed");
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(response, r#"{"error":"Event signature invalid or not provided"}"#);
}

#[actix_web::test]
async fn unsigned_delivery_is_processed_when_signatures_are_optional() {
    let _ = env_logger::try_init().ok();
    let body = webhook_body("APPROVED");
    let (status, response) = post_raw("/webhooks", &body, &[], configure_applied).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, ACK_JSON);
}

#[actix_web::test]
async fn unsigned_delivery_is_rejected_when_signatures_are_required() {
    let _ = env_logger::try_init().ok();
    let body = webhook_body("APPROVED");
    let (status, response) = post_raw("/webhooks", &body, &[], configure_strict).await.expect("Request failed");
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(response, r#"{"error":"Event signature invalid or not provided"}"#);
}

#[actix_web::test]
async fn garbled_body_is_malformed_even_when_the_signature_fails_too() {
    let _ = env_logger::try_init().ok();
    let body = "this is not json";
    // A garbled body is a 400 whether its signature checks out or not.
    let good_sig = event_signature(body.as_bytes(), &test_secret());
    let (status, response) =
        post_raw("/webhooks", body, &[(EVENT_SIGNATURE_HEADER, good_sig.as_str())], configure_rejecting)
            .await
            .expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(response.contains("Malformed webhook payload"));
    let (status, _) =
        post_raw("/webhooks", body, &[(EVENT_SIGNATURE_HEADER, "deadbeef")], configure_rejecting)
            .await
            .expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn event_without_a_transaction_is_malformed() {
    let _ = env_logger::try_init().ok();
    let body = r#"{"event":"transaction.updated","data":{},"timestamp":1721398984}"#;
    let sig = event_signature(body.as_bytes(), &test_secret());
    let (status, response) =
        post_raw("/webhooks", body, &[(EVENT_SIGNATURE_HEADER, sig.as_str())], configure_rejecting)
            .await
            .expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(response.contains("no transaction object"));
}

#[actix_web::test]
async fn event_for_an_unknown_transaction_is_not_found() {
    let _ = env_logger::try_init().ok();
    let body = webhook_body("APPROVED");
    let sig = event_signature(body.as_bytes(), &test_secret());
    let (status, response) = post_raw("/webhooks", &body, &[(EVENT_SIGNATURE_HEADER, sig.as_str())], configure_unknown)
        .await
        .expect("Request failed");
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(response, r#"{"error":"The transaction is not known to this server. txn-9001"}"#);
}

#[actix_web::test]
async fn stale_event_leaves_the_stored_status_in_place() {
    let _ = env_logger::try_init().ok();
    let body = webhook_body("PENDING");
    let sig = event_signature(body.as_bytes(), &test_secret());
    // The stored transaction is already APPROVED. The mock would panic on any order write.
    let (status, response) = post_raw("/webhooks", &body, &[(EVENT_SIGNATURE_HEADER, sig.as_str())], configure_stale)
        .await
        .expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, ACK_JSON);
}

#[actix_web::test]
async fn order_update_failure_still_acknowledges_the_event() {
    let _ = env_logger::try_init().ok();
    let body = webhook_body("APPROVED");
    let sig = event_signature(body.as_bytes(), &test_secret());
    let (status, response) =
        post_raw("/webhooks", &body, &[(EVENT_SIGNATURE_HEADER, sig.as_str())], configure_order_write_fails)
            .await
            .expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, ACK_JSON);
}

#[actix_web::test]
async fn transaction_update_failure_is_an_error_so_the_gateway_retries() {
    let _ = env_logger::try_init().ok();
    let body = webhook_body("APPROVED");
    let sig = event_signature(body.as_bytes(), &test_secret());
    let (status, response) =
        post_raw("/webhooks", &body, &[(EVENT_SIGNATURE_HEADER, sig.as_str())], configure_transaction_write_fails)
            .await
            .expect("Request failed");
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.contains("backend"));
}

fn test_secret() -> Secret<String> {
    Secret::new("events_test_secret".to_string())
}

fn webhook_body(status: &str) -> String {
    format!(
        r#"{{"event":"transaction.updated","data":{{"transaction":{{"id":"txn-9001","status":"{status}","reference":"ref-9001","amount_in_cents":15000000,"currency":"COP"}}}},"sent_at":"2024-07-19T14:23:04.000Z","timestamp":1721398984}}"#
    )
}

fn transaction_row(status: &str) -> PaymentTransaction {
    PaymentTransaction {
        id: 1,
        order_id: OrderId("ord-9001".into()),
        gateway_id: "txn-9001".to_string(),
        reference: "ref-9001".to_string(),
        amount: Cents::from(15_000_000),
        currency: "COP".to_string(),
        status: status.to_string(),
        gateway_payload: None,
        webhook_payload: None,
        created_at: Utc.with_ymd_and_hms(2024, 7, 19, 14, 20, 0).unwrap(),
        updated_at: Utc.with_ymd_and_hms(2024, 7, 19, 14, 23, 0).unwrap(),
    }
}

fn order_row(payment_status: PaymentStatus, status: OrderStatusType) -> Order {
    Order {
        id: 1,
        order_id: OrderId("ord-9001".into()),
        total_amount: Cents::from(15_000_000),
        currency: "COP".to_string(),
        status,
        payment_status,
        customer_email: "ana@example.com".to_string(),
        customer_name: Some("Ana Pérez".to_string()),
        shipping_address: None,
        shipping_city: None,
        shipping_phone: None,
        created_at: Utc.with_ymd_and_hms(2024, 7, 19, 14, 20, 0).unwrap(),
        updated_at: Utc.with_ymd_and_hms(2024, 7, 19, 14, 23, 0).unwrap(),
    }
}

fn register(cfg: &mut ServiceConfig, db: MockCheckoutDb, require_event_signature: bool) {
    let options = WebhookOptions { require_event_signature, events_secret: test_secret() };
    let api = PaymentFlowApi::new(db);
    cfg.service(WompiWebhookRoute::<MockCheckoutDb>::new())
        .app_data(web::Data::new(api))
        .app_data(web::Data::new(options));
}

fn configure_applied(cfg: &mut ServiceConfig) {
    let mut db = MockCheckoutDb::new();
    db.expect_update_transaction_by_gateway_id()
        .withf(|id, update| {
            id == "txn-9001"
                && update.status == "APPROVED"
                && update.gateway_payload.is_some()
                && update.webhook_payload.as_deref() == Some(webhook_body("APPROVED").as_str())
        })
        .returning(|_, update| {
            let mut row = transaction_row(&update.status);
            row.webhook_payload = update.webhook_payload;
            Ok(Some(row))
        });
    db.expect_update_order_status()
        .withf(|id, payment_status, order_status| {
            id.as_str() == "ord-9001"
                && *payment_status == PaymentStatus::Paid
                && *order_status == OrderStatusType::Processing
        })
        .returning(|_, payment_status, order_status| Ok(Some(order_row(payment_status, order_status))));
    register(cfg, db, false);
}

// No expectations: any database call panics and fails the test.
fn configure_rejecting(cfg: &mut ServiceConfig) {
    register(cfg, MockCheckoutDb::new(), false);
}

fn configure_strict(cfg: &mut ServiceConfig) {
    register(cfg, MockCheckoutDb::new(), true);
}

fn configure_unknown(cfg: &mut ServiceConfig) {
    let mut db = MockCheckoutDb::new();
    db.expect_update_transaction_by_gateway_id().returning(|_, _| Ok(None));
    db.expect_fetch_transaction_by_gateway_id().returning(|_| Ok(None));
    register(cfg, db, false);
}

fn configure_stale(cfg: &mut ServiceConfig) {
    let mut db = MockCheckoutDb::new();
    db.expect_update_transaction_by_gateway_id().returning(|_, _| Ok(None));
    db.expect_fetch_transaction_by_gateway_id().returning(|_| Ok(Some(transaction_row("APPROVED"))));
    register(cfg, db, false);
}

fn configure_order_write_fails(cfg: &mut ServiceConfig) {
    let mut db = MockCheckoutDb::new();
    db.expect_update_transaction_by_gateway_id()
        .returning(|_, update| Ok(Some(transaction_row(&update.status))));
    db.expect_update_order_status()
        .returning(|_, _, _| Err(CheckoutError::DatabaseError("database is locked".to_string())));
    register(cfg, db, false);
}

fn configure_transaction_write_fails(cfg: &mut ServiceConfig) {
    let mut db = MockCheckoutDb::new();
    db.expect_update_transaction_by_gateway_id()
        .returning(|_, _| Err(CheckoutError::DatabaseError("database is locked".to_string())));
    register(cfg, db, false);
}
