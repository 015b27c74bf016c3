//! sayso — SMS quote book for parents.
//!
//! A thin orchestration layer: inbound SMS replies become quote entries
//! in a hosted backend, and a handful of JSON endpoints back the web
//! pages (onboarding, sign-in, dashboard, kid management).

pub mod auth;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod gateway;
pub mod kids;
pub mod models;
pub mod onboarding;
pub mod prompts;
pub mod store;
pub mod webhook;

use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};
use tower_http::cors::CorsLayer;

use crate::gateway::SmsGateway;
use crate::store::Backend;

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "sayso",
    }))
}

/// Build the full application router.
///
/// The backend and gateway clients are constructed once by the caller
/// and shared by every route — handlers never build their own.
pub fn app(backend: Arc<dyn Backend>, gateway: Arc<dyn SmsGateway>) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(webhook::sms_routes(Arc::clone(&backend), gateway))
        .merge(onboarding::onboarding_routes(Arc::clone(&backend)))
        .merge(auth::auth_routes(Arc::clone(&backend)))
        .merge(dashboard::dashboard_routes(Arc::clone(&backend)))
        .merge(kids::kids_routes(backend))
        .layer(CorsLayer::permissive())
}
