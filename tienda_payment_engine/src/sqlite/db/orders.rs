use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db_types::{NewOrder, Order, OrderId, OrderStatusType, PaymentStatus},
    traits::CheckoutError,
};

/// Inserts a new order into the database using the given connection. This is not atomic. You can embed this call
/// inside a transaction if you need to ensure atomicity, and pass `&mut *tx` as the connection argument.
///
/// The payment and fulfillment statuses are assigned by the schema defaults, so a freshly inserted order is always
/// `pending`/`pending`.
pub async fn insert_order(order: NewOrder, conn: &mut SqliteConnection) -> Result<Order, CheckoutError> {
    let order_id = order.order_id.clone();
    let order: Order = sqlx::query_as(
        r#"
            INSERT INTO orders (
                order_id,
                total_amount,
                currency,
                customer_email,
                customer_name,
                shipping_address,
                shipping_city,
                shipping_phone
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *;
        "#,
    )
    .bind(order.order_id)
    .bind(order.total_amount)
    .bind(order.currency)
    .bind(order.customer_email)
    .bind(order.customer_name)
    .bind(order.shipping_address)
    .bind(order.shipping_city)
    .bind(order.shipping_phone)
    .fetch_one(conn)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(de) if de.is_unique_violation() => CheckoutError::OrderAlreadyExists(order_id),
        e => CheckoutError::from(e),
    })?;
    debug!("🗃️ Order [{}] inserted with id {}", order.order_id, order.id);
    Ok(order)
}

/// Returns the entry in the orders table for the corresponding `order_id`
pub async fn fetch_order_by_order_id(
    order_id: &OrderId,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, CheckoutError> {
    let order =
        sqlx::query_as("SELECT * FROM orders WHERE order_id = $1").bind(order_id.as_str()).fetch_optional(conn).await?;
    Ok(order)
}

/// Sets the payment and fulfillment statuses for the order matching `order_id`.
///
/// Zero matched rows is a valid outcome, reported as `None`. The reconciliation path can receive gateway verdicts for
/// transactions whose order row has gone missing, and treats that as a warning rather than a failure.
pub async fn update_order_status(
    order_id: &OrderId,
    payment_status: PaymentStatus,
    order_status: OrderStatusType,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, CheckoutError> {
    let order: Option<Order> = sqlx::query_as(
        r#"
            UPDATE orders
            SET payment_status = $1, status = $2, updated_at = CURRENT_TIMESTAMP
            WHERE order_id = $3
            RETURNING *;
        "#,
    )
    .bind(payment_status)
    .bind(order_status)
    .bind(order_id.as_str())
    .fetch_optional(conn)
    .await?;
    if let Some(order) = &order {
        debug!("🗃️ Order [{}] set to {}/{}", order.order_id, order.payment_status, order.status);
    }
    Ok(order)
}
