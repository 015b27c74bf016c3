//! Integration tests for the full sign-up → SMS reply → dashboard flow.
//!
//! Each test drives the real router with `tower::ServiceExt::oneshot`
//! against the in-memory backend and a recording gateway.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use sayso::gateway::RecordingGateway;
use sayso::store::MemoryBackend;

fn test_app() -> (Router, Arc<MemoryBackend>, Arc<RecordingGateway>) {
    let backend = Arc::new(MemoryBackend::new());
    let gateway = Arc::new(RecordingGateway::new());
    let app = sayso::app(backend.clone(), gateway.clone());
    (app, backend, gateway)
}

fn json_post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn sms_post(from: &str, body: &str) -> Request<Body> {
    let encoded: String = format!("From={}&Body={}", form_encode(from), form_encode(body));
    Request::builder()
        .method("POST")
        .uri("/api/sms")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(encoded))
        .unwrap()
}

fn form_encode(s: &str) -> String {
    s.bytes()
        .map(|b| match b {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' | b'.' => {
                (b as char).to_string()
            }
            b' ' => "+".to_string(),
            other => format!("%{other:02X}"),
        })
        .collect()
}

async fn read_json(resp: axum::response::Response) -> Value {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let (app, _, _) = test_app();
    let resp = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = read_json(resp).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn onboard_reply_and_dashboard_end_to_end() {
    let (app, _backend, gateway) = test_app();

    // Step 1: account
    let resp = app
        .clone()
        .oneshot(json_post(
            "/api/onboard/account",
            serde_json::json!({ "email": "parent@example.com", "phone": "+15550001234" }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = read_json(resp).await;
    let family_id = body["family_id"].as_str().unwrap().to_string();
    assert_eq!(body["next_step"], "kids");

    // Step 2: kids
    let resp = app
        .clone()
        .oneshot(json_post(
            "/api/onboard/kids",
            serde_json::json!({
                "family_id": family_id,
                "kids": [{ "name": "Jamie" }],
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(read_json(resp).await["next_step"], "complete");

    // The parent replies to a prompt.
    let resp = app
        .clone()
        .oneshot(sms_post(
            "+15550001234",
            "Jamie said the sky is purple today",
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let sent = gateway.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(
        sent[0].1,
        "Saved! \"Jamie said the sky is purple today\" is now in Jamie's book."
    );

    // Dashboard shows the quote and counts it.
    let resp = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/dashboard/{family_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = read_json(resp).await;
    assert_eq!(body["entries"][0]["quote"], "Jamie said the sky is purple today");
    assert_eq!(body["entries"][0]["source"], "prompt");
    assert_eq!(body["moments_saved"], 1);
    assert_eq!(body["kid_name"], "Jamie");
}

#[tokio::test]
async fn unrecognized_sender_leaves_no_trace() {
    let (app, backend, gateway) = test_app();
    backend.seed_family("parent@example.com", "+15550001234", &["Jamie"]);

    // Same digits, different format: exact match means no family found.
    let resp = app
        .oneshot(sms_post("15550001234", "Jamie said hi"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    assert!(backend.entries().is_empty());
    assert!(gateway.sent().is_empty());
}

#[tokio::test]
async fn signin_and_kid_profile_routes_are_wired() {
    let (app, backend, _) = test_app();
    let family_id = backend.seed_family("parent@example.com", "+15550001234", &["Jamie"]);
    let child_id = backend.children()[0].id;

    let resp = app
        .clone()
        .oneshot(json_post(
            "/api/signin",
            serde_json::json!({ "email": "parent@example.com" }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(backend.magic_link_requests(), vec!["parent@example.com"]);

    let resp = app
        .clone()
        .oneshot(json_post(
            &format!("/api/kids/{child_id}/profile"),
            serde_json::json!({ "nickname": "Jay", "color_tag": "blue" }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/families/{family_id}/kids"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let kids = read_json(resp).await;
    assert_eq!(kids[0]["nickname"], "Jay");
    assert_eq!(kids[0]["color_tag"], "blue");
}
