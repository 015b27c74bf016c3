//! SMS intake webhook — the single canonical inbound handler.
//!
//! The gateway POSTs form fields `From` and `Body`. Contract with the
//! gateway: after method/field validation, the answer is always 200 with
//! an empty `<Response/>` payload, whatever happens internally —
//! otherwise the gateway would mark the webhook failed and retry.
//! Unknown senders are silently dropped; drops and masked failures are
//! still visible in the logs.

use std::sync::Arc;

use axum::Router;
use axum::extract::{Form, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use serde::Deserialize;
use tracing::{info, warn};

use crate::gateway::SmsGateway;
use crate::models::{NewEntry, classify_quote};
use crate::store::Backend;

/// Shared state for the webhook route.
#[derive(Clone)]
pub struct WebhookState {
    pub backend: Arc<dyn Backend>,
    pub gateway: Arc<dyn SmsGateway>,
}

/// Build the webhook router.
pub fn sms_routes(backend: Arc<dyn Backend>, gateway: Arc<dyn SmsGateway>) -> Router {
    let state = WebhookState { backend, gateway };
    Router::new()
        .route(
            "/api/sms",
            post(receive_sms).fallback(method_not_allowed),
        )
        .with_state(state)
}

/// Inbound message fields, as the gateway names them.
#[derive(Debug, Deserialize)]
pub struct InboundSms {
    #[serde(rename = "From")]
    pub from: Option<String>,
    #[serde(rename = "Body")]
    pub body: Option<String>,
}

/// The empty acknowledgment payload the gateway expects on every path.
fn ack(status: StatusCode) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "text/xml")],
        "<Response/>",
    )
        .into_response()
}

async fn method_not_allowed() -> Response {
    ack(StatusCode::METHOD_NOT_ALLOWED)
}

async fn receive_sms(
    State(state): State<WebhookState>,
    Form(inbound): Form<InboundSms>,
) -> Response {
    let from = inbound.from.unwrap_or_default();
    let body = inbound.body.unwrap_or_default();
    if from.is_empty() || body.is_empty() {
        return ack(StatusCode::BAD_REQUEST);
    }

    // Exact-match lookup; a formatting mismatch resolves to "unknown".
    let family = match state.backend.find_family_by_phone(&from).await {
        Ok(Some(family)) => family,
        Ok(None) => {
            warn!(sender = %from, "inbound SMS from unknown number, dropping");
            return ack(StatusCode::OK);
        }
        Err(e) => {
            warn!(sender = %from, error = %e, "family lookup failed, dropping inbound SMS");
            return ack(StatusCode::OK);
        }
    };

    let children = match state.backend.list_children(family.id).await {
        Ok(children) => children,
        Err(e) => {
            warn!(family_id = %family.id, error = %e, "children lookup failed, dropping inbound SMS");
            return ack(StatusCode::OK);
        }
    };

    let quote = body.trim().to_string();
    let (source, matched) = classify_quote(&quote, &children);

    let entry = NewEntry {
        family_id: family.id,
        quote: quote.clone(),
        source,
    };
    if let Err(e) = state.backend.insert_entry(&entry).await {
        // Masked: the sender never learns the quote was lost.
        warn!(family_id = %family.id, error = %e, "entry insert failed");
        return ack(StatusCode::OK);
    }
    info!(
        family_id = %family.id,
        source = %source,
        chars = quote.len(),
        "quote saved"
    );

    // Matched child when the name-substring rule fired, first child
    // otherwise. Families without children still get an acknowledgment.
    let kid_name = matched
        .and_then(|i| children.get(i))
        .or_else(|| children.first())
        .map(|c| c.name.as_str())
        .unwrap_or("your family");

    let reply = format!("Saved! \"{quote}\" is now in {kid_name}'s book.");
    if let Err(e) = state.gateway.send(&from, &reply).await {
        warn!(family_id = %family.id, error = %e, "acknowledgment send failed");
    }

    ack(StatusCode::OK)
}
