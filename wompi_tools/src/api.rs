use std::sync::Arc;

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client,
    Method,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::{config::WompiConfig, data_objects::WompiTransaction, PaymentRequest, WompiApiError};

/// Result of a gateway call: the typed transaction view alongside the untouched JSON, which
/// callers persist as the raw payload snapshot.
#[derive(Debug, Clone)]
pub struct WompiTransactionResult {
    pub transaction: WompiTransaction,
    /// The `data` object of the response: the gateway's transaction object as received.
    pub data: Value,
    /// The complete response envelope.
    pub raw: Value,
}

#[derive(Clone)]
pub struct WompiApi {
    config: WompiConfig,
    client: Arc<Client>,
}

impl WompiApi {
    pub fn new(config: WompiConfig) -> Result<Self, WompiApiError> {
        let mut headers = HeaderMap::with_capacity(2);
        let bearer = format!("Bearer {}", config.private_key.reveal());
        let mut token = HeaderValue::from_str(&bearer).map_err(|e| WompiApiError::Initialization(e.to_string()))?;
        // Keeps the credential out of client debug output.
        token.set_sensitive(true);
        headers.insert(AUTHORIZATION, token);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| WompiApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url.trim_end_matches('/'))
    }

    pub fn config(&self) -> &WompiConfig {
        &self.config
    }

    /// The merchant redirect URL to attach to new transactions, if one is configured.
    pub fn redirect_url(&self) -> Option<&String> {
        self.config.redirect_url.as_ref()
    }

    pub async fn rest_query<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, WompiApiError> {
        let url = self.url(path);
        trace!("💳️ Sending REST query: {url}");
        let mut req = self.client.request(method, url);
        if let Some(body) = body {
            req = req.json(body);
        }
        let response = req.send().await.map_err(|e| WompiApiError::RestResponseError(e.to_string()))?;
        if response.status().is_success() {
            trace!("💳️ REST query successful. {}", response.status());
            response.json::<T>().await.map_err(|e| WompiApiError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| WompiApiError::RestResponseError(e.to_string()))?;
            Err(WompiApiError::QueryError { status, message })
        }
    }

    /// POST a new transaction to the gateway. Success means the gateway accepted the request;
    /// whether the payment itself goes through arrives later, via webhook or polling.
    pub async fn create_transaction(&self, request: &PaymentRequest) -> Result<WompiTransactionResult, WompiApiError> {
        debug!("💳️ Creating gateway transaction for reference {}", request.reference);
        let raw = self.rest_query::<Value, PaymentRequest>(Method::POST, "/transactions", Some(request)).await?;
        let result = unpack_transaction(raw)?;
        info!(
            "💳️ Gateway accepted reference {} as transaction {} with status {}",
            request.reference, result.transaction.id, result.transaction.status
        );
        Ok(result)
    }

    /// Fetch the current state of a transaction from the gateway.
    pub async fn fetch_transaction(&self, id: &str) -> Result<WompiTransactionResult, WompiApiError> {
        debug!("💳️ Fetching gateway transaction {id}");
        let path = format!("/transactions/{id}");
        let raw = self.rest_query::<Value, ()>(Method::GET, &path, None).await?;
        unpack_transaction(raw)
    }
}

/// Responses arrive wrapped in a `data` envelope. Some sandbox deployments return the bare
/// transaction object, so fall back to the body itself when no envelope is present.
fn unpack_transaction(raw: Value) -> Result<WompiTransactionResult, WompiApiError> {
    let data = match raw.get("data") {
        Some(v) if !v.is_null() => v.clone(),
        _ => raw.clone(),
    };
    let transaction = WompiTransaction::try_from_value(&data)
        .map_err(|e| WompiApiError::UnexpectedResponse(format!("no transaction object in gateway response. {e}")))?;
    Ok(WompiTransactionResult { transaction, data, raw })
}
