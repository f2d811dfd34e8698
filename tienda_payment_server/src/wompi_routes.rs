//----------------------------------------------   Checkout  ----------------------------------------------------

use actix_web::{web, HttpRequest, HttpResponse};
use log::*;
use tienda_payment_engine::{
    db_types::{NewTransaction, OrderId},
    status_map::map_gateway_status,
    traits::{CheckoutDatabase, CheckoutError},
    PaymentFlowApi,
    StatusUpdateRequest,
};
use wompi_tools::{
    helpers::{async_payment_url, verify_event_signature},
    WebhookEvent,
    WompiApi,
    WompiTransaction,
};

use crate::{
    config::WebhookOptions,
    data_objects::{CheckoutRequest, CheckoutResponse, JsonResponse, PollResponse},
    errors::ServerError,
    integrations::wompi::{new_order_from_checkout, new_payment_request_from_checkout},
    route,
};

pub const EVENT_SIGNATURE_HEADER: &str = "X-Event-Signature";

route!(checkout => Post "/transactions" impl CheckoutDatabase);
/// Route handler for the checkout endpoint.
///
/// Validates the storefront's payload, makes sure the order row exists, then asks the gateway to create the
/// transaction. Once the gateway has accepted, local persistence failures are logged but do not fail the checkout;
/// the payment is in flight regardless of what this server managed to record, and reconciliation will catch the
/// mirror up.
pub async fn checkout<B: CheckoutDatabase>(
    body: web::Json<CheckoutRequest>,
    api: web::Data<PaymentFlowApi<B>>,
    wompi: web::Data<WompiApi>,
) -> Result<HttpResponse, ServerError> {
    let request = body.into_inner();
    debug!("💳️ POST checkout for order [{}] with reference {}", request.order_id, request.reference);
    let payment = new_payment_request_from_checkout(&request, wompi.config())?;
    let order_id = OrderId::from(request.order_id.as_str());
    // The order row must exist before the gateway is called, so the transaction mirror always has a parent.
    if api.fetch_order(&order_id).await?.is_none() {
        let order = api.process_new_order(new_order_from_checkout(&request)).await?;
        info!("💳️ Order [{}] was registered at checkout time", order.order_id);
    }
    let result = wompi.create_transaction(&payment).await.map_err(|e| {
        if e.is_rejection() {
            warn!("💳️ The gateway rejected the transaction with reference {}. {e}", request.reference);
            ServerError::GatewayRejected(e.to_string())
        } else {
            error!("💳️ Could not reach the gateway for reference {}. {e}", request.reference);
            ServerError::GatewayUnavailable(e.to_string())
        }
    })?;
    let gateway_tx = &result.transaction;
    info!("💳️ Gateway accepted transaction {} for order [{order_id}]. Status: {}", gateway_tx.id, gateway_tx.status);
    let new_transaction =
        NewTransaction::new(order_id, gateway_tx.id.clone(), request.reference.clone(), payment.amount_in_cents)
            .with_currency(request.currency.clone())
            .with_status(gateway_tx.status.clone())
            .with_gateway_payload(result.data.to_string());
    match api.record_gateway_transaction(new_transaction).await {
        Ok(tx) => {
            if let Err(e) = api.update_order_from_gateway_status(&tx.order_id, &tx.status).await {
                warn!("💳️ Order [{}] could not pick up the initial gateway status. {e}", tx.order_id);
            }
        },
        Err(e) => {
            error!("💳️ Transaction {} was accepted by the gateway but could not be mirrored locally. {e}", gateway_tx.id)
        },
    }
    let payment_url = async_payment_url(&result.data);
    let status = map_gateway_status(&gateway_tx.status).payment_status;
    let response =
        CheckoutResponse { success: true, transaction: result.data, reference: request.reference, payment_url, status };
    Ok(HttpResponse::Ok().json(response))
}

//----------------------------------------------   Polling  ----------------------------------------------------
route!(poll_transaction => Get "/transactions/{gateway_id}" impl CheckoutDatabase);
/// Route handler for polling a transaction's current state.
///
/// The gateway is always asked for the fresh state, and the answer is folded into the local mirror through the same
/// path webhook deliveries take. A transaction the gateway knows but this server does not is reported as-is with a
/// warning rather than an error.
pub async fn poll_transaction<B: CheckoutDatabase>(
    path: web::Path<String>,
    api: web::Data<PaymentFlowApi<B>>,
    wompi: web::Data<WompiApi>,
) -> Result<HttpResponse, ServerError> {
    let gateway_id = path.into_inner();
    if gateway_id.trim().is_empty() {
        return Err(ServerError::InvalidRequest("A transaction id is required".to_string()));
    }
    debug!("💳️ GET transaction {gateway_id}");
    let result = wompi.fetch_transaction(&gateway_id).await.map_err(|e| {
        warn!("💳️ Could not fetch transaction {gateway_id} from the gateway. {e}");
        ServerError::GatewayUnavailable(e.to_string())
    })?;
    let gateway_status = result.transaction.status.clone();
    let update = StatusUpdateRequest::new(&gateway_id, &gateway_status).with_gateway_payload(result.data.to_string());
    let status = match api.apply_gateway_status(update).await {
        Ok(outcome) => outcome.mapping.payment_status,
        Err(CheckoutError::TransactionNotFound(id)) => {
            warn!("💳️ The gateway knows transaction {id}, but no local record of it exists. Reporting it unmirrored.");
            map_gateway_status(&gateway_status).payment_status
        },
        Err(e) => return Err(e.into()),
    };
    Ok(HttpResponse::Ok().json(PollResponse { success: true, transaction: result.data, status }))
}

//----------------------------------------------   Webhooks  ----------------------------------------------------
route!(wompi_webhook => Post "/webhooks" impl CheckoutDatabase);
/// Route handler for gateway event deliveries.
///
/// A delivery is judged malformed before it is judged unsigned, so a garbled body is a 400 even when its signature
/// would also have failed. A bad signature is a 401 and nothing is written. Failures past that point are real errors:
/// the gateway retries on non-2xx, which is exactly what a transaction-level persistence failure needs.
pub async fn wompi_webhook<B: CheckoutDatabase>(
    req: HttpRequest,
    body: web::Bytes,
    api: web::Data<PaymentFlowApi<B>>,
    options: web::Data<WebhookOptions>,
) -> Result<HttpResponse, ServerError> {
    trace!("💳️ Received webhook delivery: {}", req.uri());
    let event = serde_json::from_slice::<WebhookEvent>(&body)
        .map_err(|e| ServerError::MalformedWebhook(format!("Could not parse the event body. {e}")))?;
    let tx_value = event
        .transaction_value()
        .ok_or_else(|| ServerError::MalformedWebhook("The event carries no transaction object".to_string()))?;
    match req.headers().get(EVENT_SIGNATURE_HEADER).map(|v| v.to_str().unwrap_or_default()) {
        Some(provided) => {
            if !verify_event_signature(&body, provided, &options.events_secret) {
                warn!("💳️ Rejecting a webhook delivery with an invalid event signature");
                return Err(ServerError::InvalidSignature);
            }
        },
        None if options.require_event_signature => {
            warn!("💳️ Rejecting an unsigned webhook delivery");
            return Err(ServerError::InvalidSignature);
        },
        None => warn!("💳️ Webhook delivery carries no event signature. Processing it anyway."),
    }
    let transaction =
        WompiTransaction::try_from_value(tx_value).map_err(|e| ServerError::MalformedWebhook(e.to_string()))?;
    debug!("💳️ Webhook delivery for transaction {} with status {}", transaction.id, transaction.status);
    let update = StatusUpdateRequest::new(&transaction.id, &transaction.status)
        .with_gateway_payload(tx_value.to_string())
        .with_webhook_payload(String::from_utf8_lossy(&body).into_owned());
    let outcome = api.apply_gateway_status(update).await?;
    if outcome.superseded {
        info!(
            "💳️ Webhook delivery for transaction {} was stale. The stored status {} stands.",
            outcome.transaction.gateway_id, outcome.transaction.status
        );
    } else {
        info!("💳️ Transaction {} is now {}", outcome.transaction.gateway_id, outcome.transaction.status);
    }
    Ok(HttpResponse::Ok().json(JsonResponse::success("Event processed.")))
}
