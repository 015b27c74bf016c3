//! Sign-in — magic-link request.
//!
//! Authentication itself is the backend's job; this endpoint only relays
//! the email address and surfaces an inline message for the form.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{error, info};

use crate::store::Backend;

#[derive(Clone)]
pub struct AuthRouteState {
    pub backend: Arc<dyn Backend>,
}

pub fn auth_routes(backend: Arc<dyn Backend>) -> Router {
    let state = AuthRouteState { backend };
    Router::new()
        .route("/api/signin", post(request_sign_in))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct SignInForm {
    email: String,
}

/// POST /api/signin
async fn request_sign_in(
    State(state): State<AuthRouteState>,
    Json(form): Json<SignInForm>,
) -> impl IntoResponse {
    let email = form.email.trim().to_string();
    if email.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "Enter your email address." })),
        );
    }

    match state.backend.request_magic_link(&email).await {
        Ok(()) => {
            info!("magic link requested");
            (
                StatusCode::OK,
                Json(serde_json::json!({
                    "message": "Check your email for a sign-in link."
                })),
            )
        }
        Err(e) => {
            error!(error = %e, "magic link request failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(serde_json::json!({
                    "error": "Could not send a sign-in link. Please try again."
                })),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryBackend;

    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    #[tokio::test]
    async fn relays_email_to_backend() {
        let backend = Arc::new(MemoryBackend::new());
        let app = auth_routes(backend.clone());

        let req = Request::builder()
            .method("POST")
            .uri("/api/signin")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"email":"  p@example.com "}"#))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(backend.magic_link_requests(), vec!["p@example.com"]);
    }

    #[tokio::test]
    async fn empty_email_rejected() {
        let backend = Arc::new(MemoryBackend::new());
        let app = auth_routes(backend.clone());

        let req = Request::builder()
            .method("POST")
            .uri("/api/signin")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"email":"   "}"#))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(backend.magic_link_requests().is_empty());
    }
}
