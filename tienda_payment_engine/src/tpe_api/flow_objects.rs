use crate::{
    db_types::{Order, PaymentTransaction},
    status_map::StatusMapping,
};

/// An authoritative gateway verdict for one transaction, plus the raw payloads that evidence it.
/// Built by the webhook handler and the transaction poller; consumed by
/// [`crate::PaymentFlowApi::apply_gateway_status`].
#[derive(Debug, Clone)]
pub struct StatusUpdateRequest {
    pub gateway_id: String,
    /// The status exactly as the gateway reported it
    pub status: String,
    /// Raw JSON of the gateway's transaction object, stored as the gateway-side snapshot
    pub gateway_payload: Option<String>,
    /// Raw webhook body, stored as the webhook-side snapshot. Only the webhook path sets this.
    pub webhook_payload: Option<String>,
}

impl StatusUpdateRequest {
    pub fn new<S1: Into<String>, S2: Into<String>>(gateway_id: S1, status: S2) -> Self {
        Self { gateway_id: gateway_id.into(), status: status.into(), gateway_payload: None, webhook_payload: None }
    }

    pub fn with_gateway_payload(mut self, payload: String) -> Self {
        self.gateway_payload = Some(payload);
        self
    }

    pub fn with_webhook_payload(mut self, payload: String) -> Self {
        self.webhook_payload = Some(payload);
        self
    }
}

/// The outcome of one reconciliation pass.
#[derive(Debug, Clone)]
pub struct StatusUpdate {
    /// The transaction row after the pass
    pub transaction: PaymentTransaction,
    /// The parent order after its status write. `None` when the order row is missing, the order write failed (it is
    /// logged and left for the next reconciliation), or the incoming status was discarded as stale.
    pub order: Option<Order>,
    /// The local statuses implied by the transaction's stored status
    pub mapping: StatusMapping,
    /// True when the incoming status was discarded because the stored one is more definitive
    pub superseded: bool,
}
