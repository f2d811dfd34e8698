use std::env;

use log::*;
use tps_common::{helpers::parse_boolean_flag, Secret};
use wompi_tools::WompiConfig;

const DEFAULT_TPS_HOST: &str = "127.0.0.1";
const DEFAULT_TPS_PORT: u16 = 3000;
const DEFAULT_TPS_DATABASE_URL: &str = "sqlite://data/tienda.db";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// When true, webhook deliveries without an `X-Event-Signature` header are rejected with a 401. When false,
    /// unsigned deliveries are logged and processed anyway. Signed deliveries are always verified.
    pub require_event_signature: bool,
    /// Wompi gateway configuration
    pub wompi: WompiConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_TPS_HOST.to_string(),
            port: DEFAULT_TPS_PORT,
            database_url: String::default(),
            require_event_signature: false,
            wompi: WompiConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("TPS_HOST").ok().unwrap_or_else(|| DEFAULT_TPS_HOST.into());
        let port = env::var("TPS_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for TPS_PORT. {e} Using the default, {DEFAULT_TPS_PORT}, instead."
                    );
                    DEFAULT_TPS_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_TPS_PORT);
        let database_url = env::var("TPS_DATABASE_URL").ok().unwrap_or_else(|| {
            error!(
                "🪛️ TPS_DATABASE_URL is not set. Using the default, {DEFAULT_TPS_DATABASE_URL}. Please set it to the \
                 URL for the storefront database."
            );
            DEFAULT_TPS_DATABASE_URL.to_string()
        });
        let require_event_signature = parse_boolean_flag(env::var("TPS_REQUIRE_EVENT_SIGNATURE").ok(), false);
        let wompi = WompiConfig::from_env_or_default();
        Self { host, port, database_url, require_event_signature, wompi }
    }
}

//-------------------------------------------------  WebhookOptions  ---------------------------------------------------
/// The subset of the server configuration that webhook handlers need. Generally we try to keep this as small as
/// possible; the events secret is carried as a [`Secret`] so that it never leaks into logs or payloads.
#[derive(Clone, Debug)]
pub struct WebhookOptions {
    pub require_event_signature: bool,
    pub events_secret: Secret<String>,
}

impl WebhookOptions {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            require_event_signature: config.require_event_signature,
            events_secret: config.wompi.integrity_secret.clone(),
        }
    }
}
