use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db_types::{NewTransaction, OrderId, PaymentTransaction, TransactionUpdate},
    status_map::status_rank,
    traits::CheckoutError,
};

/// Inserts a gateway-accepted transaction into the database using the given connection.
///
/// Both unique constraints on the table (`gateway_id` and `(order_id, reference)`) surface as
/// [`CheckoutError::TransactionAlreadyExists`]; either way the checkout attempt has already been recorded.
pub async fn insert_transaction(
    transaction: NewTransaction,
    conn: &mut SqliteConnection,
) -> Result<PaymentTransaction, CheckoutError> {
    let order_id = transaction.order_id.clone();
    let reference = transaction.reference.clone();
    let transaction: PaymentTransaction = sqlx::query_as(
        r#"
            INSERT INTO transactions (
                order_id,
                gateway_id,
                reference,
                amount,
                currency,
                status,
                gateway_payload
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *;
        "#,
    )
    .bind(transaction.order_id)
    .bind(transaction.gateway_id)
    .bind(transaction.reference)
    .bind(transaction.amount)
    .bind(transaction.currency)
    .bind(transaction.status)
    .bind(transaction.gateway_payload)
    .fetch_one(conn)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(de) if de.is_unique_violation() => {
            CheckoutError::TransactionAlreadyExists { order_id, reference }
        },
        e => CheckoutError::from(e),
    })?;
    debug!(
        "🗃️ Transaction {} recorded with id {} for order [{}]",
        transaction.gateway_id, transaction.id, transaction.order_id
    );
    Ok(transaction)
}

pub async fn fetch_transaction_by_gateway_id(
    gateway_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<PaymentTransaction>, CheckoutError> {
    let transaction = sqlx::query_as("SELECT * FROM transactions WHERE gateway_id = $1")
        .bind(gateway_id)
        .fetch_optional(conn)
        .await?;
    Ok(transaction)
}

/// Returns every transaction recorded against the order, oldest first.
pub async fn fetch_transactions_for_order(
    order_id: &OrderId,
    conn: &mut SqliteConnection,
) -> Result<Vec<PaymentTransaction>, CheckoutError> {
    let transactions = sqlx::query_as("SELECT * FROM transactions WHERE order_id = $1 ORDER BY id")
        .bind(order_id.as_str())
        .fetch_all(conn)
        .await?;
    Ok(transactions)
}

/// Overwrites the status and payload snapshots for the transaction matching `gateway_id`.
///
/// The `WHERE` guard refuses to replace a stored status with one of lower rank. The terminal-status list in the SQL
/// must stay in lockstep with [`crate::status_map::is_terminal_status`]. `None` means nothing was written: either no
/// row carries this gateway id, or the write was refused as stale. Callers that need to tell the two apart can follow
/// up with [`fetch_transaction_by_gateway_id`].
pub async fn update_transaction_by_gateway_id(
    gateway_id: &str,
    update: TransactionUpdate,
    conn: &mut SqliteConnection,
) -> Result<Option<PaymentTransaction>, CheckoutError> {
    let incoming_rank = status_rank(&update.status);
    let transaction: Option<PaymentTransaction> = sqlx::query_as(
        r#"
            UPDATE transactions
            SET status = $1,
                gateway_payload = COALESCE($2, gateway_payload),
                webhook_payload = COALESCE($3, webhook_payload),
                updated_at = CURRENT_TIMESTAMP
            WHERE gateway_id = $4
              AND $5 >= (CASE WHEN status IN ('APPROVED', 'DECLINED', 'VOIDED', 'ERROR') THEN 1 ELSE 0 END)
            RETURNING *;
        "#,
    )
    .bind(update.status)
    .bind(update.gateway_payload)
    .bind(update.webhook_payload)
    .bind(gateway_id)
    .bind(incoming_rank)
    .fetch_optional(conn)
    .await?;
    if let Some(transaction) = &transaction {
        debug!("🗃️ Transaction {} is now {}", transaction.gateway_id, transaction.status);
    }
    Ok(transaction)
}
