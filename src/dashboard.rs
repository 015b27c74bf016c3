//! Dashboard data — the quote book and the rolling moments counter.

use std::sync::Arc;

use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Json;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::error;
use uuid::Uuid;

use crate::models::{Entry, Family};
use crate::store::Backend;

#[derive(Clone)]
pub struct DashboardRouteState {
    pub backend: Arc<dyn Backend>,
}

pub fn dashboard_routes(backend: Arc<dyn Backend>) -> Router {
    let state = DashboardRouteState { backend };
    Router::new()
        .route("/api/dashboard/{family_id}", get(get_dashboard))
        .with_state(state)
}

/// Count entries recorded strictly within the last 30 days.
///
/// Strict: an entry exactly 30 days old does not count. Computed per
/// request, never stored.
pub fn moments_saved(entries: &[Entry], now: DateTime<Utc>) -> usize {
    let cutoff = now - Duration::days(30);
    entries.iter().filter(|e| e.recorded_at > cutoff).count()
}

#[derive(Debug, Serialize)]
struct DashboardResponse {
    family: Family,
    kid_name: Option<String>,
    moments_saved: usize,
    tracker: String,
    entries: Vec<Entry>,
}

/// GET /api/dashboard/{family_id}
///
/// One family fetch, one entries fetch (newest first), counter computed
/// inline.
async fn get_dashboard(
    State(state): State<DashboardRouteState>,
    Path(family_id): Path<Uuid>,
) -> impl IntoResponse {
    let family = match state.backend.get_family(family_id).await {
        Ok(Some(family)) => family,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({ "error": "No family found." })),
            )
                .into_response();
        }
        Err(e) => {
            error!(family_id = %family_id, error = %e, "family fetch failed");
            return (
                StatusCode::BAD_GATEWAY,
                Json(serde_json::json!({ "error": "Could not load your dashboard." })),
            )
                .into_response();
        }
    };

    let entries = match state.backend.list_entries(family_id).await {
        Ok(entries) => entries,
        Err(e) => {
            error!(family_id = %family_id, error = %e, "entries fetch failed");
            return (
                StatusCode::BAD_GATEWAY,
                Json(serde_json::json!({ "error": "Could not load your quotes." })),
            )
                .into_response();
        }
    };

    let kid_name = state
        .backend
        .list_children(family_id)
        .await
        .unwrap_or_default()
        .first()
        .map(|c| c.display_name().to_string());

    let count = moments_saved(&entries, Utc::now());
    let resp = DashboardResponse {
        family,
        kid_name,
        moments_saved: count,
        tracker: format!("You've saved {count} moments this month ✨"),
        entries,
    };
    Json(resp).into_response()
}
