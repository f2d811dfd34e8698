use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{NewOrder, NewTransaction, Order, OrderId, PaymentTransaction, TransactionUpdate},
    status_map::map_gateway_status,
    tpe_api::flow_objects::{StatusUpdate, StatusUpdateRequest},
    traits::{CheckoutDatabase, CheckoutError},
};

/// `PaymentFlowApi` is the primary API for handling checkout and reconciliation flows in response to storefront
/// checkout events and gateway status events.
pub struct PaymentFlowApi<B> {
    db: B,
}

impl<B> Debug for PaymentFlowApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PaymentFlowApi")
    }
}

impl<B> PaymentFlowApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> PaymentFlowApi<B>
where B: CheckoutDatabase
{
    /// Submit a new order to the payment engine.
    ///
    /// This should be a brand-new order; resubmitting an existing order id is an error. The order starts life
    /// pending on both the payment and fulfillment side, and stays there until a gateway verdict arrives.
    pub async fn process_new_order(&self, order: NewOrder) -> Result<Order, CheckoutError> {
        let order = self.db.insert_order(order).await?;
        debug!(
            "🔄️🛍️ Order [{}] saved with id {}. Initial status is {}/{}",
            order.order_id, order.id, order.payment_status, order.status
        );
        Ok(order)
    }

    /// Fetch one order by its public order id.
    pub async fn fetch_order(&self, order_id: &OrderId) -> Result<Option<Order>, CheckoutError> {
        self.db.fetch_order_by_order_id(order_id).await
    }

    /// Every transaction recorded against the order, oldest first.
    pub async fn transactions_for_order(&self, order_id: &OrderId) -> Result<Vec<PaymentTransaction>, CheckoutError> {
        self.db.fetch_transactions_for_order(order_id).await
    }

    /// Fetch the local mirror of a gateway transaction.
    pub async fn fetch_transaction(&self, gateway_id: &str) -> Result<Option<PaymentTransaction>, CheckoutError> {
        self.db.fetch_transaction_by_gateway_id(gateway_id).await
    }

    /// Mirror a transaction the gateway has accepted.
    ///
    /// Call this as soon as the gateway acknowledges a checkout, before any webhook can possibly arrive, so that the
    /// reconciliation paths always have a row to update.
    pub async fn record_gateway_transaction(
        &self,
        transaction: NewTransaction,
    ) -> Result<PaymentTransaction, CheckoutError> {
        let transaction = self.db.insert_transaction(transaction).await?;
        debug!(
            "🔄️💳️ Transaction {} saved for order [{}] with status {}",
            transaction.gateway_id, transaction.order_id, transaction.status
        );
        Ok(transaction)
    }

    /// Derive the order's local statuses from a gateway transaction status and store them.
    ///
    /// Returns the updated order, or `None` if no order matches `order_id`.
    pub async fn update_order_from_gateway_status(
        &self,
        order_id: &OrderId,
        gateway_status: &str,
    ) -> Result<Option<Order>, CheckoutError> {
        let mapping = map_gateway_status(gateway_status);
        let order = self.db.update_order_status(order_id, mapping.payment_status, mapping.order_status).await?;
        match &order {
            Some(order) => debug!(
                "🔄️🛍️ Order [{}] moved to {}/{} on gateway status {gateway_status}",
                order.order_id, order.payment_status, order.status
            ),
            None => warn!("🔄️🛍️ No order [{order_id}] found to update on gateway status {gateway_status}"),
        }
        Ok(order)
    }

    /// Apply an authoritative gateway status to the local mirror.
    ///
    /// Webhook delivery and on-demand polling both funnel through here, so the two reconciliation paths cannot
    /// diverge. The transaction row is written first. An update that would replace a terminal status with a less
    /// definitive one is discarded and reported with `superseded` set; the row keeps its stored status.
    ///
    /// The order-side write is best-effort. If it fails, the error is logged and the order is left for the next
    /// reconciliation pass, since the transaction row (the part the gateway can re-deliver) is already safe.
    pub async fn apply_gateway_status(&self, request: StatusUpdateRequest) -> Result<StatusUpdate, CheckoutError> {
        let StatusUpdateRequest { gateway_id, status, gateway_payload, webhook_payload } = request;
        let update = TransactionUpdate { status: status.clone(), gateway_payload, webhook_payload };
        let (transaction, superseded) = match self.db.update_transaction_by_gateway_id(&gateway_id, update).await? {
            Some(transaction) => (transaction, false),
            None => match self.db.fetch_transaction_by_gateway_id(&gateway_id).await? {
                Some(transaction) => {
                    info!(
                        "🔄️💳️ Ignoring stale status {status} for transaction {gateway_id}. Keeping {}",
                        transaction.status
                    );
                    (transaction, true)
                },
                None => return Err(CheckoutError::TransactionNotFound(gateway_id)),
            },
        };
        let mapping = map_gateway_status(&transaction.status);
        let order = if superseded {
            None
        } else {
            match self.update_order_from_gateway_status(&transaction.order_id, &transaction.status).await {
                Ok(order) => order,
                Err(e) => {
                    error!(
                        "🔄️🛍️ Order [{}] could not be updated after transaction {} became {}. The transaction \
                         record is safe and the order will catch up on the next reconciliation. {e}",
                        transaction.order_id, transaction.gateway_id, transaction.status
                    );
                    None
                },
            }
        };
        Ok(StatusUpdate { transaction, order, mapping, superseded })
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    pub fn db_mut(&mut self) -> &mut B {
        &mut self.db
    }
}
