//! # Wompi tools
//!
//! A thin client for the Wompi payment gateway REST API, plus the wire-format data objects and
//! signature helpers the payment server needs to talk to it safely.
//!
//! * [`WompiApi`] wraps an authenticated `reqwest` client for the two calls the server makes:
//!   creating a transaction and fetching its current state.
//! * [`helpers`] holds the integrity-signature and event-checksum digests, reference generation,
//!   and payment-URL extraction.
//! * The data objects mirror the gateway's JSON shapes defensively: inbound fields are optional
//!   with documented defaults rather than trusted blindly.
mod api;
mod config;
mod error;

mod data_objects;
pub mod helpers;

pub use api::{WompiApi, WompiTransactionResult};
pub use config::WompiConfig;
pub use data_objects::{CustomerData, PaymentRequest, ShippingAddress, WebhookData, WebhookEvent, WompiTransaction};
pub use error::WompiApiError;
