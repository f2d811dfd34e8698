use thiserror::Error;

use crate::db_types::{
    NewOrder,
    NewTransaction,
    Order,
    OrderId,
    OrderStatusType,
    PaymentStatus,
    PaymentTransaction,
    TransactionUpdate,
};

/// The persistence contract for the Tienda Payment Server.
///
/// This behaviour includes:
/// * Storing orders as shoppers submit them at checkout
/// * Mirroring transactions the gateway has accepted
/// * The lookups and status writes that webhook and polling reconciliation perform
#[allow(async_fn_in_trait)]
pub trait CheckoutDatabase: Clone {
    /// The URL of the database
    fn url(&self) -> &str;

    /// Store a brand-new order as it arrives from the storefront.
    ///
    /// The order starts life with pending payment and fulfillment statuses. Fails with
    /// [`CheckoutError::OrderAlreadyExists`] if the public order id is already taken.
    async fn insert_order(&self, order: NewOrder) -> Result<Order, CheckoutError>;

    /// Fetch one order by its public order id.
    async fn fetch_order_by_order_id(&self, order_id: &OrderId) -> Result<Option<Order>, CheckoutError>;

    /// Record a transaction the gateway has accepted.
    ///
    /// At most one row may exist per `(order id, reference)` pair; a second insert for the same pair fails with
    /// [`CheckoutError::TransactionAlreadyExists`]. Retried checkouts use a fresh reference and get a fresh row.
    async fn insert_transaction(&self, transaction: NewTransaction) -> Result<PaymentTransaction, CheckoutError>;

    /// Fetch a transaction by the gateway's transaction id.
    async fn fetch_transaction_by_gateway_id(&self, gateway_id: &str)
        -> Result<Option<PaymentTransaction>, CheckoutError>;

    /// All transactions recorded against an order, oldest first.
    async fn fetch_transactions_for_order(&self, order_id: &OrderId)
        -> Result<Vec<PaymentTransaction>, CheckoutError>;

    /// Overwrite a transaction's status and payload snapshots, keyed by the gateway's transaction id.
    ///
    /// Returns `None` when no row was written. That covers two cases the caller may want to tell apart with a
    /// follow-up fetch: the gateway id is unknown, or the stored status outranks the incoming one and the write was
    /// refused as stale.
    async fn update_transaction_by_gateway_id(
        &self,
        gateway_id: &str,
        update: TransactionUpdate,
    ) -> Result<Option<PaymentTransaction>, CheckoutError>;

    /// Set an order's payment and fulfillment statuses.
    ///
    /// Returns `None` if no such order exists. The reconciliation path treats that as a warning rather than an
    /// error, so implementations must not fail on zero matched rows.
    async fn update_order_status(
        &self,
        order_id: &OrderId,
        payment_status: PaymentStatus,
        order_status: OrderStatusType,
    ) -> Result<Option<Order>, CheckoutError>;

    /// Close the database connection(s).
    async fn close(&mut self) -> Result<(), CheckoutError>;
}

#[derive(Debug, Clone, Error)]
pub enum CheckoutError {
    #[error("There is an internal database engine error (configuration/uptime etc.): {0}")]
    DatabaseError(String),
    #[error("Cannot insert order, since it already exists with id {0}")]
    OrderAlreadyExists(OrderId),
    #[error("Cannot insert transaction for order {order_id}, since reference {reference} has already been used")]
    TransactionAlreadyExists { order_id: OrderId, reference: String },
    #[error("No transaction matches gateway id {0}")]
    TransactionNotFound(String),
    #[error("The requested order {0} does not exist")]
    OrderNotFound(OrderId),
}

impl From<sqlx::Error> for CheckoutError {
    fn from(e: sqlx::Error) -> Self {
        CheckoutError::DatabaseError(e.to_string())
    }
}
