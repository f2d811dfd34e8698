//! The public API of the payment engine.
//!
//! [`payment_flow_api::PaymentFlowApi`] wraps a [`crate::traits::CheckoutDatabase`] backend and exposes the
//! checkout and reconciliation flows to the server. The request and result types for those flows live in
//! [`flow_objects`].
pub mod flow_objects;
pub mod payment_flow_api;
