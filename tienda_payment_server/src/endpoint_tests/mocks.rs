use mockall::mock;
use tienda_payment_engine::{
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

mock! {
    pub CheckoutDb {}
    impl CheckoutDatabase for CheckoutDb {
        fn url(&self) -> &str;
        async fn insert_order(&self, order: NewOrder) -> Result<Order, CheckoutError>;
        async fn fetch_order_by_order_id(&self, order_id: &OrderId) -> Result<Option<Order>, CheckoutError>;
        async fn insert_transaction(&self, transaction: NewTransaction) -> Result<PaymentTransaction, CheckoutError>;
        async fn fetch_transaction_by_gateway_id(&self, gateway_id: &str) -> Result<Option<PaymentTransaction>, CheckoutError>;
        async fn fetch_transactions_for_order(&self, order_id: &OrderId) -> Result<Vec<PaymentTransaction>, CheckoutError>;
        async fn update_transaction_by_gateway_id(&self, gateway_id: &str, update: TransactionUpdate) -> Result<Option<PaymentTransaction>, CheckoutError>;
        async fn update_order_status(&self, order_id: &OrderId, payment_status: PaymentStatus, order_status: OrderStatusType) -> Result<Option<Order>, CheckoutError>;
        async fn close(&mut self) -> Result<(), CheckoutError>;
    }
    impl Clone for CheckoutDb {
        fn clone(&self) -> Self;
    }
}
