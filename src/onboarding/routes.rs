//! Onboarding form endpoints.
//!
//! Each step is one direct write against the backend. Failures come back
//! as an inline error message for the form, never a retry.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{error, info};
use uuid::Uuid;

use super::state::OnboardingStep;
use crate::models::{NewChild, NewFamily};
use crate::store::Backend;

/// Shared state for onboarding routes.
#[derive(Clone)]
pub struct OnboardingRouteState {
    pub backend: Arc<dyn Backend>,
}

/// Build the onboarding routes.
pub fn onboarding_routes(backend: Arc<dyn Backend>) -> Router {
    let state = OnboardingRouteState { backend };
    Router::new()
        .route("/api/onboard/account", post(submit_account))
        .route("/api/onboard/kids", post(submit_kids))
        .with_state(state)
}

fn inline_error(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (status, Json(serde_json::json!({ "error": message.into() })))
        .into_response()
}

#[derive(Debug, Deserialize)]
struct AccountForm {
    email: String,
    phone: String,
}

/// POST /api/onboard/account
///
/// Step 1: create the family record from the contact form.
async fn submit_account(
    State(state): State<OnboardingRouteState>,
    Json(form): Json<AccountForm>,
) -> impl IntoResponse {
    let email = form.email.trim().to_string();
    let phone = form.phone.trim().to_string();
    if email.is_empty() || phone.is_empty() {
        return inline_error(StatusCode::BAD_REQUEST, "Email and phone are required.");
    }

    match state
        .backend
        .create_family(&NewFamily { email, phone })
        .await
    {
        Ok(family) => {
            info!(family_id = %family.id, "family created");
            (
                StatusCode::CREATED,
                Json(serde_json::json!({
                    "family_id": family.id,
                    "next_step": OnboardingStep::Account.next(),
                })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "family create failed");
            inline_error(
                StatusCode::BAD_GATEWAY,
                "Something went wrong. Please try again.",
            )
        }
    }
}

#[derive(Debug, Deserialize)]
struct KidRow {
    name: String,
    birthday: Option<chrono::NaiveDate>,
    notes: Option<String>,
}

#[derive(Debug, Deserialize)]
struct KidsForm {
    family_id: Uuid,
    kids: Vec<KidRow>,
}

/// POST /api/onboard/kids
///
/// Step 2: add the children. Blank rows are dropped; at least one named
/// child is required.
async fn submit_kids(
    State(state): State<OnboardingRouteState>,
    Json(form): Json<KidsForm>,
) -> impl IntoResponse {
    let payload: Vec<NewChild> = form
        .kids
        .into_iter()
        .map(|k| NewChild {
            name: k.name.trim().to_string(),
            birthday: k.birthday,
            notes: k.notes.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
        })
        .filter(|k| !k.name.is_empty())
        .collect();

    if payload.is_empty() {
        return inline_error(StatusCode::BAD_REQUEST, "Add at least one child name.");
    }

    match state.backend.get_family(form.family_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return inline_error(StatusCode::NOT_FOUND, "Please sign in again.");
        }
        Err(e) => {
            error!(error = %e, "family lookup failed during onboarding");
            return inline_error(
                StatusCode::BAD_GATEWAY,
                "Something went wrong. Please try again.",
            );
        }
    }

    match state.backend.create_children(form.family_id, &payload).await {
        Ok(children) => {
            info!(family_id = %form.family_id, count = children.len(), "children added");
            (
                StatusCode::CREATED,
                Json(serde_json::json!({
                    "children": children,
                    "next_step": OnboardingStep::Kids.next(),
                })),
            )
                .into_response()
        }
        Err(e) => {
            error!(family_id = %form.family_id, error = %e, "children insert failed");
            inline_error(
                StatusCode::BAD_GATEWAY,
                "Something went wrong. Please try again.",
            )
        }
    }
}
