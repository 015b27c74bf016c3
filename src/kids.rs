//! Kid profile management — nickname, color tag, avatar.

use std::sync::{Arc, LazyLock};

use axum::Router;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Json;
use chrono::Utc;
use regex::Regex;
use serde::Deserialize;
use tracing::{error, info};
use uuid::Uuid;

use crate::models::ColorTag;
use crate::store::Backend;

#[derive(Clone)]
pub struct KidsRouteState {
    pub backend: Arc<dyn Backend>,
}

pub fn kids_routes(backend: Arc<dyn Backend>) -> Router {
    let state = KidsRouteState { backend };
    Router::new()
        .route("/api/families/{family_id}/kids", get(list_kids))
        .route("/api/kids/{id}/profile", post(update_profile))
        .route("/api/kids/{id}/avatar", post(upload_avatar))
        .with_state(state)
}

fn inline_error(status: StatusCode, message: &str) -> axum::response::Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

/// GET /api/families/{family_id}/kids
async fn list_kids(
    State(state): State<KidsRouteState>,
    Path(family_id): Path<Uuid>,
) -> impl IntoResponse {
    match state.backend.list_children(family_id).await {
        Ok(children) => Json(children).into_response(),
        Err(e) => {
            error!(family_id = %family_id, error = %e, "children fetch failed");
            inline_error(
                StatusCode::BAD_GATEWAY,
                "Something went wrong while loading your kids.",
            )
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProfileForm {
    nickname: Option<String>,
    color_tag: Option<ColorTag>,
}

/// POST /api/kids/{id}/profile
///
/// Inline edit of nickname and color tag. A blank nickname is stored as
/// null; a missing color tag falls back to the palette default.
async fn update_profile(
    State(state): State<KidsRouteState>,
    Path(id): Path<Uuid>,
    Json(form): Json<ProfileForm>,
) -> impl IntoResponse {
    let nickname = form
        .nickname
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty());
    let color_tag = form.color_tag.unwrap_or_default();

    match state
        .backend
        .update_child_profile(id, nickname, color_tag)
        .await
    {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "message": "Profile updated" })),
        )
            .into_response(),
        Err(e) => {
            error!(child_id = %id, error = %e, "profile update failed");
            inline_error(StatusCode::BAD_GATEWAY, "Unable to save changes")
        }
    }
}

static FILE_NAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9_-]").expect("valid regex"));

/// Derive the storage object name from an uploaded file's name: sanitized
/// base, millisecond timestamp, original extension.
pub fn avatar_object_name(original: &str, timestamp_millis: i64) -> String {
    let (base, ext) = match original.rsplit_once('.') {
        Some((base, ext)) if !ext.is_empty() => (base, ext),
        _ => (original, "png"),
    };
    let sanitized = FILE_NAME_CHARS.replace_all(base, "").to_lowercase();
    let base = if sanitized.is_empty() {
        "avatar"
    } else {
        sanitized.as_str()
    };
    format!("{base}-{timestamp_millis}.{ext}")
}

/// POST /api/kids/{id}/avatar
///
/// Two sequential steps: upload the image to object storage, then write
/// the public URL onto the child row. Not transactional — a crash between
/// them strands the uploaded object, and a replaced image is never
/// cleaned up.
async fn upload_avatar(
    State(state): State<KidsRouteState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let mut file: Option<(String, String, Vec<u8>)> = None;
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() == Some("avatar") {
            let file_name = field.file_name().unwrap_or("avatar.png").to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            match field.bytes().await {
                Ok(bytes) => file = Some((file_name, content_type, bytes.to_vec())),
                Err(e) => {
                    error!(child_id = %id, error = %e, "avatar read failed");
                    return inline_error(StatusCode::BAD_REQUEST, "Unable to read picture");
                }
            }
            break;
        }
    }

    let Some((file_name, content_type, bytes)) = file else {
        return inline_error(StatusCode::BAD_REQUEST, "No picture attached");
    };

    let object_name = avatar_object_name(&file_name, Utc::now().timestamp_millis());
    let object_path = format!("{id}/{object_name}");

    let public_url = match state
        .backend
        .upload_avatar(&object_path, bytes, &content_type)
        .await
    {
        Ok(url) => url,
        Err(e) => {
            error!(child_id = %id, error = %e, "avatar upload failed");
            return inline_error(StatusCode::BAD_GATEWAY, "Unable to upload picture");
        }
    };

    if let Err(e) = state.backend.set_child_avatar(id, &public_url).await {
        // The object is already in storage; nothing references it now.
        error!(child_id = %id, error = %e, "avatar url write failed");
        return inline_error(StatusCode::BAD_GATEWAY, "Unable to save picture");
    }

    info!(child_id = %id, "avatar updated");
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "avatar_url": public_url,
            "message": "Profile picture updated",
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryBackend;

    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    #[test]
    fn object_name_sanitizes_and_keeps_extension() {
        assert_eq!(
            avatar_object_name("My Kid's Photo!.JPG", 1700000000000),
            "mykidsphoto-1700000000000.JPG"
        );
    }

    #[test]
    fn object_name_falls_back_when_base_empty() {
        assert_eq!(avatar_object_name("....png", 42), "avatar-42.png");
        assert_eq!(avatar_object_name("日本語.jpeg", 42), "avatar-42.jpeg");
    }

    #[test]
    fn object_name_defaults_extension_to_png() {
        assert_eq!(avatar_object_name("photo", 42), "photo-42.png");
    }

    #[tokio::test]
    async fn update_profile_trims_nickname_and_defaults_color() {
        let backend = Arc::new(MemoryBackend::new());
        let family_id = backend.seed_family("p@example.com", "+15550001234", &["Jamie"]);
        let child_id = backend.children()[0].id;
        let app = kids_routes(backend.clone());

        let req = Request::builder()
            .method("POST")
            .uri(format!("/api/kids/{child_id}/profile"))
            .header("content-type", "application/json")
            .body(Body::from(r#"{"nickname":"  Jay  "}"#))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let children = backend.list_children(family_id).await.unwrap();
        assert_eq!(children[0].nickname.as_deref(), Some("Jay"));
        assert_eq!(children[0].color_tag, Some(ColorTag::Pink));
    }

    #[tokio::test]
    async fn blank_nickname_clears_field() {
        let backend = Arc::new(MemoryBackend::new());
        let family_id = backend.seed_family("p@example.com", "+15550001234", &["Jamie"]);
        let child_id = backend.children()[0].id;
        let app = kids_routes(backend.clone());

        let req = Request::builder()
            .method("POST")
            .uri(format!("/api/kids/{child_id}/profile"))
            .header("content-type", "application/json")
            .body(Body::from(r#"{"nickname":"   ","color_tag":"plum"}"#))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let children = backend.list_children(family_id).await.unwrap();
        assert_eq!(children[0].nickname, None);
        assert_eq!(children[0].color_tag, Some(ColorTag::Plum));
    }

    #[tokio::test]
    async fn avatar_upload_sets_public_url() {
        let backend = Arc::new(MemoryBackend::new());
        backend.seed_family("p@example.com", "+15550001234", &["Jamie"]);
        let child_id = backend.children()[0].id;
        let app = kids_routes(backend.clone());

        let boundary = "test-boundary";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"avatar\"; filename=\"jamie photo.png\"\r\n\
             Content-Type: image/png\r\n\r\n\
             fakepngbytes\r\n\
             --{boundary}--\r\n"
        );
        let req = Request::builder()
            .method("POST")
            .uri(format!("/api/kids/{child_id}/avatar"))
            .header(
                "content-type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let url = json["avatar_url"].as_str().unwrap();
        assert!(url.contains(&format!("{child_id}/jamiephoto-")));
        assert!(url.ends_with(".png"));

        let children = backend.children();
        assert_eq!(children[0].avatar_url.as_deref(), Some(url));
    }

    #[tokio::test]
    async fn avatar_upload_without_file_is_400() {
        let backend = Arc::new(MemoryBackend::new());
        backend.seed_family("p@example.com", "+15550001234", &["Jamie"]);
        let child_id = backend.children()[0].id;
        let app = kids_routes(backend);

        let boundary = "test-boundary";
        let body = format!("--{boundary}--\r\n");
        let req = Request::builder()
            .method("POST")
            .uri(format!("/api/kids/{child_id}/avatar"))
            .header(
                "content-type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
