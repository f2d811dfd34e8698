//! Small helpers that don't have a better home.

use chrono::Utc;

use crate::db_types::OrderId;

/// Generate a fresh storefront order id.
///
/// The millisecond timestamp keeps ids roughly sortable by creation time; the random suffix disambiguates checkouts
/// landing in the same millisecond.
pub fn new_order_id() -> OrderId {
    OrderId(format!("ord-{}-{:04x}", Utc::now().timestamp_millis(), rand::random::<u16>()))
}
