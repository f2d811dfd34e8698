//! `SqliteDatabase` is a concrete implementation of a Tienda Payment engine backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the traits defined in the [`crate::traits`]
//! module.
use std::fmt::Debug;

use log::*;
use sqlx::SqlitePool;

use super::db::{db_url, new_pool, orders, transactions};
use crate::{
    db_types::{
        NewOrder,
        NewTransaction,
        Order,
        OrderId,
        OrderStatusType,
        PaymentStatus,
        PaymentTransaction,
        TransactionUpdate,
    },
    traits::{CheckoutDatabase, CheckoutError},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl CheckoutDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn insert_order(&self, order: NewOrder) -> Result<Order, CheckoutError> {
        let mut conn = self.pool.acquire().await?;
        orders::insert_order(order, &mut conn).await
    }

    async fn fetch_order_by_order_id(&self, order_id: &OrderId) -> Result<Option<Order>, CheckoutError> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_order_by_order_id(order_id, &mut conn).await
    }

    async fn insert_transaction(&self, transaction: NewTransaction) -> Result<PaymentTransaction, CheckoutError> {
        let mut conn = self.pool.acquire().await?;
        transactions::insert_transaction(transaction, &mut conn).await
    }

    async fn fetch_transaction_by_gateway_id(
        &self,
        gateway_id: &str,
    ) -> Result<Option<PaymentTransaction>, CheckoutError> {
        let mut conn = self.pool.acquire().await?;
        transactions::fetch_transaction_by_gateway_id(gateway_id, &mut conn).await
    }

    async fn fetch_transactions_for_order(
        &self,
        order_id: &OrderId,
    ) -> Result<Vec<PaymentTransaction>, CheckoutError> {
        let mut conn = self.pool.acquire().await?;
        transactions::fetch_transactions_for_order(order_id, &mut conn).await
    }

    async fn update_transaction_by_gateway_id(
        &self,
        gateway_id: &str,
        update: TransactionUpdate,
    ) -> Result<Option<PaymentTransaction>, CheckoutError> {
        let mut conn = self.pool.acquire().await?;
        transactions::update_transaction_by_gateway_id(gateway_id, update, &mut conn).await
    }

    async fn update_order_status(
        &self,
        order_id: &OrderId,
        payment_status: PaymentStatus,
        order_status: OrderStatusType,
    ) -> Result<Option<Order>, CheckoutError> {
        let mut conn = self.pool.acquire().await?;
        orders::update_order_status(order_id, payment_status, order_status, &mut conn).await
    }

    async fn close(&mut self) -> Result<(), CheckoutError> {
        self.pool.close().await;
        Ok(())
    }
}

impl SqliteDatabase {
    /// Creates a new database API object
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
