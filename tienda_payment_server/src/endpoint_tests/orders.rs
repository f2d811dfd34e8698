use actix_web::{http::StatusCode, web, web::ServiceConfig};
use chrono::{TimeZone, Utc};
use serde_json::json;
use tienda_payment_engine::{
    db_types::{Order, OrderId, OrderStatusType, PaymentStatus},
    traits::CheckoutError,
    PaymentFlowApi,
};
use tps_common::Cents;

use super::helpers::{get_request, post_request};
use crate::{
    endpoint_tests::mocks::MockCheckoutDb,
    routes::{NewOrderRoute, OrderByIdRoute},
};

#[actix_web::test]
async fn register_an_order() {
    let _ = env_logger::try_init().ok();
    let body = json!({
        "orderId": "ord-1001",
        "amount": 150_000.0,
        "currency": "COP",
        "customerEmail": "ana@example.com",
        "customerName": "Ana Pérez",
        "shippingAddress": "Calle 1 # 2-3",
        "shippingCity": "Bogotá",
        "shippingPhone": "+573001234567",
    });
    let (status, response) = post_request("/orders", &body, configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, ORDER_JSON);
}

#[actix_web::test]
async fn an_order_without_an_email_is_invalid() {
    let _ = env_logger::try_init().ok();
    let body = json!({ "orderId": "ord-1001", "amount": 150_000.0 });
    let (status, response) = post_request("/orders", &body, configure_untouched).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response, r#"{"error":"Invalid request. customerEmail is required"}"#);
}

#[actix_web::test]
async fn an_order_without_an_amount_is_invalid() {
    let _ = env_logger::try_init().ok();
    let body = json!({ "orderId": "ord-1001", "customerEmail": "ana@example.com" });
    let (status, response) = post_request("/orders", &body, configure_untouched).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response, r#"{"error":"Invalid request. amount must be a positive number"}"#);
}

#[actix_web::test]
async fn a_duplicate_order_id_is_invalid() {
    let _ = env_logger::try_init().ok();
    let body = json!({ "orderId": "ord-1001", "amount": 150_000.0, "customerEmail": "ana@example.com" });
    let (status, response) = post_request("/orders", &body, configure_duplicate).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response, r#"{"error":"Invalid request. Cannot insert order, since it already exists with id ord-1001"}"#);
}

#[actix_web::test]
async fn fetch_an_order_by_id() {
    let _ = env_logger::try_init().ok();
    let (status, response) = get_request("/orders/ord-1001", configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, ORDER_JSON);
}

#[actix_web::test]
async fn fetch_a_missing_order() {
    let _ = env_logger::try_init().ok();
    let (status, response) = get_request("/orders/ord-404", configure_missing).await.expect("Request failed");
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(response, r#"{"error":"The order was not found. ord-404"}"#);
}

// Mock response to order inserts and lookups
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
    let api = PaymentFlowApi::new(db);
    cfg.service(NewOrderRoute::<MockCheckoutDb>::new())
        .service(OrderByIdRoute::<MockCheckoutDb>::new())
        .app_data(web::Data::new(api));
}

fn configure(cfg: &mut ServiceConfig) {
    let mut db = MockCheckoutDb::new();
    db.expect_insert_order()
        .withf(|order| {
            order.order_id.as_str() == "ord-1001"
                && order.total_amount == Cents::from(15_000_000)
                && order.currency == "COP"
                && order.customer_name.as_deref() == Some("Ana Pérez")
        })
        .returning(|_| Ok(order_row()));
    db.expect_fetch_order_by_order_id()
        .withf(|id| id.as_str() == "ord-1001")
        .returning(|_| Ok(Some(order_row())));
    register(cfg, db);
}

fn configure_untouched(cfg: &mut ServiceConfig) {
    register(cfg, MockCheckoutDb::new());
}

fn configure_duplicate(cfg: &mut ServiceConfig) {
    let mut db = MockCheckoutDb::new();
    db.expect_insert_order().returning(|order| Err(CheckoutError::OrderAlreadyExists(order.order_id)));
    register(cfg, db);
}

fn configure_missing(cfg: &mut ServiceConfig) {
    let mut db = MockCheckoutDb::new();
    db.expect_fetch_order_by_order_id().returning(|_| Ok(None));
    register(cfg, db);
}

const ORDER_JSON: &str = r#"{"success":true,"order":{"id":1,"orderId":"ord-1001","totalAmount":15000000,"currency":"COP","status":"pending","paymentStatus":"pending","customerEmail":"ana@example.com","customerName":"Ana Pérez","shippingAddress":"Calle 1 # 2-3","shippingCity":"Bogotá","shippingPhone":"+573001234567","createdAt":"2024-07-19T14:20:00Z","updatedAt":"2024-07-19T14:20:00Z"}}"#;
