use std::time::Duration;

use log::*;
use tps_common::Secret;

pub const DEFAULT_WOMPI_BASE_URL: &str = "https://sandbox.wompi.co/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 20;

#[derive(Debug, Clone)]
pub struct WompiConfig {
    /// Gateway API root, e.g. `https://sandbox.wompi.co/v1`.
    pub base_url: String,
    /// Bearer credential for server-side calls against the gateway.
    pub private_key: Secret<String>,
    /// Shared secret bound into integrity signatures and webhook event checksums.
    pub integrity_secret: Secret<String>,
    /// Where the gateway sends the shopper after an asynchronous payment method completes.
    pub redirect_url: Option<String>,
    /// Bounded timeout applied to every outbound gateway call.
    pub timeout: Duration,
}

impl Default for WompiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_WOMPI_BASE_URL.to_string(),
            private_key: Secret::default(),
            integrity_secret: Secret::default(),
            redirect_url: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl WompiConfig {
    pub fn from_env_or_default() -> Self {
        let base_url = std::env::var("TPS_WOMPI_BASE_URL").unwrap_or_else(|_| {
            warn!("🪛️ TPS_WOMPI_BASE_URL not set, using the sandbox endpoint, {DEFAULT_WOMPI_BASE_URL}");
            DEFAULT_WOMPI_BASE_URL.to_string()
        });
        let private_key = Secret::new(std::env::var("TPS_WOMPI_PRIVATE_KEY").unwrap_or_else(|_| {
            error!(
                "🪛️ TPS_WOMPI_PRIVATE_KEY is not set. Please set it to the private key for your Wompi account. \
                 Without it, every gateway call will be rejected."
            );
            String::default()
        }));
        let integrity_secret = Secret::new(std::env::var("TPS_WOMPI_INTEGRITY_SECRET").unwrap_or_else(|_| {
            error!(
                "🪛️ TPS_WOMPI_INTEGRITY_SECRET is not set. Please set it to the integrity secret for your Wompi \
                 account. Transaction signatures will not validate without it."
            );
            String::default()
        }));
        let redirect_url = std::env::var("TPS_WOMPI_REDIRECT_URL").ok();
        let timeout = std::env::var("TPS_WOMPI_TIMEOUT")
            .ok()
            .map(|s| {
                s.parse::<u64>().unwrap_or_else(|e| {
                    warn!(
                        "🪛️ {s} is not a valid value for TPS_WOMPI_TIMEOUT. {e} Using the default, \
                         {DEFAULT_TIMEOUT_SECS}s, instead."
                    );
                    DEFAULT_TIMEOUT_SECS
                })
            })
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        Self { base_url, private_key, integrity_secret, redirect_url, timeout }
    }
}
