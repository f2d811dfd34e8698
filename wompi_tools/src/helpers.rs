//! Signature helpers for the Wompi wire contract.
//!
//! Two digests protect the payment flow:
//!
//! * The **integrity signature** travels with every transaction-creation request. It is the
//!   hex-encoded SHA-256 of `{reference}{amount_in_cents}{currency}{secret}` concatenated in that
//!   exact order with no separators. The gateway recomputes it to prove the parameters were not
//!   tampered with in transit.
//! * The **event checksum** authenticates inbound webhook events. It is the hex-encoded SHA-256
//!   of the raw request body followed by the same shared secret, and arrives in the
//!   `X-Event-Signature` header.
//!
//! Checksum comparison runs in constant time so a caller probing the webhook endpoint learns
//! nothing from response timing. The secret itself never appears in logs, payloads, or error
//! messages; it only enters the hash state.
use chrono::Utc;
use serde_json::Value;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use tps_common::{Cents, Secret};

/// Compute the integrity signature for an outbound transaction-creation request.
pub fn integrity_signature(reference: &str, amount: Cents, currency: &str, secret: &Secret<String>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(reference.as_bytes());
    hasher.update(amount.value().to_string().as_bytes());
    hasher.update(currency.as_bytes());
    hasher.update(secret.reveal().as_bytes());
    hex::encode(hasher.finalize())
}

/// Compute the checksum of a webhook event body.
pub fn event_signature(body: &[u8], secret: &Secret<String>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(body);
    hasher.update(secret.reveal().as_bytes());
    hex::encode(hasher.finalize())
}

/// Check an `X-Event-Signature` header value against the digest of the received body.
/// Hex case differences are tolerated; the comparison itself is constant-time.
pub fn verify_event_signature(body: &[u8], provided: &str, secret: &Secret<String>) -> bool {
    let expected = event_signature(body, secret);
    let provided = provided.trim().to_ascii_lowercase();
    expected.as_bytes().ct_eq(provided.as_bytes()).into()
}

/// Generate a fresh payment reference: millisecond timestamp plus a random suffix. References
/// bind the integrity signature to one checkout attempt and must never be reused.
pub fn new_reference() -> String {
    format!("TS_{}_{:04x}", Utc::now().timestamp_millis(), rand::random::<u16>())
}

/// Extract the asynchronous payment URL (PSE and friends) from a raw transaction object.
/// Card payments settle inline and carry no such URL.
pub fn async_payment_url(transaction: &Value) -> Option<String> {
    transaction["payment_method"]["extra"]["async_payment_url"].as_str().map(String::from)
}
