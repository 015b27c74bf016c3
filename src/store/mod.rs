//! Backend data service client — families, children, entries, auth, storage.
//!
//! The data itself lives in a hosted backend; this module is the typed
//! seam in front of it. `HttpBackend` talks to the real service,
//! `MemoryBackend` backs the tests.

pub mod http;
pub mod memory;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::BackendError;
use crate::models::{Child, ColorTag, Entry, Family, NewChild, NewEntry, NewFamily};

/// Typed interface to the hosted backend.
///
/// One implementation is constructed at startup and shared by every
/// handler via router state — handlers never build their own client.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Find the family whose stored phone exactly equals `phone`.
    ///
    /// Exact match only — "+15550001234" and "5550001234" are different
    /// families as far as this lookup is concerned.
    async fn find_family_by_phone(&self, phone: &str) -> Result<Option<Family>, BackendError>;

    /// Fetch a family by id.
    async fn get_family(&self, id: Uuid) -> Result<Option<Family>, BackendError>;

    /// Create a family at onboarding.
    async fn create_family(&self, new: &NewFamily) -> Result<Family, BackendError>;

    /// Insert children for a family. Returns the created rows.
    async fn create_children(
        &self,
        family_id: Uuid,
        kids: &[NewChild],
    ) -> Result<Vec<Child>, BackendError>;

    /// List a family's children, oldest row first.
    async fn list_children(&self, family_id: Uuid) -> Result<Vec<Child>, BackendError>;

    /// Update a child's nickname and color tag.
    async fn update_child_profile(
        &self,
        id: Uuid,
        nickname: Option<&str>,
        color_tag: ColorTag,
    ) -> Result<(), BackendError>;

    /// Write an avatar URL onto a child row.
    async fn set_child_avatar(&self, id: Uuid, url: &str) -> Result<(), BackendError>;

    /// Insert a quote entry. Entries are immutable once written.
    async fn insert_entry(&self, new: &NewEntry) -> Result<Entry, BackendError>;

    /// List a family's entries, newest first.
    async fn list_entries(&self, family_id: Uuid) -> Result<Vec<Entry>, BackendError>;

    /// Ask the backend's auth layer to email a magic sign-in link.
    async fn request_magic_link(&self, email: &str) -> Result<(), BackendError>;

    /// Upload an avatar image to object storage and return its public URL.
    async fn upload_avatar(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, BackendError>;
}

pub use http::HttpBackend;
pub use memory::MemoryBackend;
