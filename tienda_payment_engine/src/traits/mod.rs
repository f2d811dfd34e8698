//! # Database management and control.
//!
//! This module defines the interface contract that payment engine database *backends* must satisfy.
//!
//! [`CheckoutDatabase`] covers everything the Tienda Payment Server needs from storage: inserting the orders and
//! transactions created at checkout, and the lookups and status writes that the webhook and polling reconciliation
//! paths perform. A backend that implements it (SQLite today, Postgres when the feature lands) plugs straight into
//! [`crate::PaymentFlowApi`].
mod checkout_database;

pub use checkout_database::{CheckoutDatabase, CheckoutError};
