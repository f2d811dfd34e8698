//! Tienda Payment Engine
//!
//! The Tienda Payment Engine keeps a merchant's local database in sync with the payment gateway. It owns the canonical
//! records for orders and the payment transactions raised against them, and it is the only place where a gateway
//! transaction status gets translated into the local order vocabulary.
//!
//! The library is divided into two main sections:
//! 1. Database management and control ([`mod@sqlite`]). You should never need to access the database directly.
//!    Instead, use the public API provided by the payment engine. The exception is the data types used in the
//!    database. These are defined in the `db_types` module and are public.
//! 2. The payment engine public API ([`mod@tpe_api`]). This provides the public-facing functionality of the engine:
//!    storing orders as shoppers submit them, mirroring gateway transactions, and applying authoritative gateway
//!    statuses delivered by webhook or poll. Specific backends need to implement the traits in the [`mod@traits`]
//!    module in order to act as a backend for the Tienda Payment Server.
//!
//! Status translation lives in [`status_map`]. Both reconciliation paths (webhook delivery and on-demand polling)
//! funnel through the same mapping, so the database can never disagree with itself about what a gateway status means.
pub mod db_types;
pub mod helpers;
pub mod status_map;
#[cfg(feature = "sqlite")]
mod sqlite;
mod tpe_api;
pub mod traits;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use tpe_api::{
    flow_objects::{StatusUpdate, StatusUpdateRequest},
    payment_flow_api::PaymentFlowApi,
};
pub use traits::{CheckoutDatabase, CheckoutError};
