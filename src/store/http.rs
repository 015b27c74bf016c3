//! HTTP backend — reqwest client for the hosted REST API.
//!
//! Tables are exposed PostgREST-style under `/rest/v1`, auth under
//! `/auth/v1`, object storage under `/storage/v1`. Filters are query
//! parameters (`?phone=eq.+1555...`), writes are JSON bodies with
//! `Prefer: return=representation` when we need the created row back.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::error::BackendError;
use crate::models::{Child, ColorTag, Entry, Family, NewChild, NewEntry, NewFamily};
use crate::store::Backend;

/// Storage bucket for child avatars.
pub const AVATAR_BUCKET: &str = "kid-avatars";

/// Client for the hosted backend. Built once at startup; reqwest pools
/// connections internally, so cloning or sharing via `Arc` is cheap.
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
    /// Key for table and storage access (service-role when configured).
    api_key: SecretString,
    /// Anon key for auth requests made on a visitor's behalf.
    anon_key: SecretString,
}

impl HttpBackend {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.backend_url.trim_end_matches('/').to_string(),
            api_key: config.backend_key.clone(),
            anon_key: config.anon_key.clone(),
        }
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base_url)
    }

    /// Attach the standard auth headers for table/storage access.
    fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("apikey", self.api_key.expose_secret())
            .bearer_auth(self.api_key.expose_secret())
    }

    /// Send a request, check the status, and decode a JSON body.
    async fn expect_json<T: DeserializeOwned>(
        operation: &str,
        req: reqwest::RequestBuilder,
    ) -> Result<T, BackendError> {
        let resp = Self::expect_ok(operation, req).await?;
        resp.json().await.map_err(|e| BackendError::Decode {
            operation: operation.to_string(),
            reason: e.to_string(),
        })
    }

    /// Send a request and check the status, discarding the body.
    async fn expect_ok(
        operation: &str,
        req: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, BackendError> {
        let resp = req
            .send()
            .await
            .map_err(|e| BackendError::Request(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(BackendError::UnexpectedStatus {
                operation: operation.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp)
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn find_family_by_phone(&self, phone: &str) -> Result<Option<Family>, BackendError> {
        let req = self
            .authed(self.client.get(self.rest_url("families")))
            .query(&[("phone", format!("eq.{phone}")), ("limit", "1".into())]);
        let mut rows: Vec<Family> = Self::expect_json("find_family_by_phone", req).await?;
        Ok(rows.drain(..).next())
    }

    async fn get_family(&self, id: Uuid) -> Result<Option<Family>, BackendError> {
        let req = self
            .authed(self.client.get(self.rest_url("families")))
            .query(&[("id", format!("eq.{id}")), ("limit", "1".into())]);
        let mut rows: Vec<Family> = Self::expect_json("get_family", req).await?;
        Ok(rows.drain(..).next())
    }

    async fn create_family(&self, new: &NewFamily) -> Result<Family, BackendError> {
        let req = self
            .authed(self.client.post(self.rest_url("families")))
            .header("Prefer", "return=representation")
            .json(new);
        let mut rows: Vec<Family> = Self::expect_json("create_family", req).await?;
        rows.drain(..).next().ok_or_else(|| BackendError::Decode {
            operation: "create_family".to_string(),
            reason: "empty representation".to_string(),
        })
    }

    async fn create_children(
        &self,
        family_id: Uuid,
        kids: &[NewChild],
    ) -> Result<Vec<Child>, BackendError> {
        let rows: Vec<serde_json::Value> = kids
            .iter()
            .map(|k| {
                serde_json::json!({
                    "family_id": family_id,
                    "name": k.name,
                    "birthday": k.birthday,
                    "notes": k.notes,
                })
            })
            .collect();
        let req = self
            .authed(self.client.post(self.rest_url("children")))
            .header("Prefer", "return=representation")
            .json(&rows);
        Self::expect_json("create_children", req).await
    }

    async fn list_children(&self, family_id: Uuid) -> Result<Vec<Child>, BackendError> {
        let req = self
            .authed(self.client.get(self.rest_url("children")))
            .query(&[
                ("family_id", format!("eq.{family_id}")),
                ("order", "created_at.asc".into()),
            ]);
        Self::expect_json("list_children", req).await
    }

    async fn update_child_profile(
        &self,
        id: Uuid,
        nickname: Option<&str>,
        color_tag: ColorTag,
    ) -> Result<(), BackendError> {
        let req = self
            .authed(self.client.patch(self.rest_url("children")))
            .query(&[("id", format!("eq.{id}"))])
            .json(&serde_json::json!({
                "nickname": nickname,
                "color_tag": color_tag,
            }));
        Self::expect_ok("update_child_profile", req).await?;
        Ok(())
    }

    async fn set_child_avatar(&self, id: Uuid, url: &str) -> Result<(), BackendError> {
        let req = self
            .authed(self.client.patch(self.rest_url("children")))
            .query(&[("id", format!("eq.{id}"))])
            .json(&serde_json::json!({ "avatar_url": url }));
        Self::expect_ok("set_child_avatar", req).await?;
        Ok(())
    }

    async fn insert_entry(&self, new: &NewEntry) -> Result<Entry, BackendError> {
        let req = self
            .authed(self.client.post(self.rest_url("entries")))
            .header("Prefer", "return=representation")
            .json(new);
        let mut rows: Vec<Entry> = Self::expect_json("insert_entry", req).await?;
        rows.drain(..).next().ok_or_else(|| BackendError::Decode {
            operation: "insert_entry".to_string(),
            reason: "empty representation".to_string(),
        })
    }

    async fn list_entries(&self, family_id: Uuid) -> Result<Vec<Entry>, BackendError> {
        let req = self
            .authed(self.client.get(self.rest_url("entries")))
            .query(&[
                ("family_id", format!("eq.{family_id}")),
                ("order", "recorded_at.desc".into()),
            ]);
        Self::expect_json("list_entries", req).await
    }

    async fn request_magic_link(&self, email: &str) -> Result<(), BackendError> {
        // Auth calls go out with the anon key — they act for the visitor,
        // not for the service.
        let req = self
            .client
            .post(format!("{}/auth/v1/magiclink", self.base_url))
            .header("apikey", self.anon_key.expose_secret())
            .json(&serde_json::json!({ "email": email }));
        Self::expect_ok("request_magic_link", req).await?;
        Ok(())
    }

    async fn upload_avatar(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, BackendError> {
        let url = format!(
            "{}/storage/v1/object/{AVATAR_BUCKET}/{path}",
            self.base_url
        );
        let req = self
            .authed(self.client.post(&url))
            .header("Content-Type", content_type)
            .header("x-upsert", "true")
            .header("Cache-Control", "max-age=3600")
            .body(bytes);
        Self::expect_ok("upload_avatar", req)
            .await
            .map_err(|e| BackendError::Upload(e.to_string()))?;

        Ok(format!(
            "{}/storage/v1/object/public/{AVATAR_BUCKET}/{path}",
            self.base_url
        ))
    }
}
