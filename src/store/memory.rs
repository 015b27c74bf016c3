//! In-memory backend for tests.
//!
//! Mirrors the hosted backend's observable behavior: exact-match phone
//! lookups, insertion-ordered children, newest-first entries. Failure
//! injection covers the masked-error paths at the webhook boundary.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::error::BackendError;
use crate::models::{Child, ColorTag, Entry, Family, NewChild, NewEntry, NewFamily};
use crate::store::Backend;

#[derive(Default)]
struct Inner {
    families: Vec<Family>,
    children: Vec<Child>,
    entries: Vec<Entry>,
    magic_links: Vec<String>,
    uploads: Vec<(String, usize)>,
}

/// Test backend holding everything in a mutex-guarded `Inner`.
#[derive(Default)]
pub struct MemoryBackend {
    inner: Mutex<Inner>,
    fail_entry_inserts: AtomicBool,
    fail_lookups: AtomicBool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a family with children; returns the family id.
    pub fn seed_family(&self, email: &str, phone: &str, kid_names: &[&str]) -> Uuid {
        let family = Family {
            id: Uuid::new_v4(),
            email: email.to_string(),
            phone: phone.to_string(),
            created_at: Utc::now(),
        };
        let family_id = family.id;
        let mut inner = self.inner.lock().unwrap();
        inner.families.push(family);
        for name in kid_names {
            inner.children.push(Child {
                id: Uuid::new_v4(),
                family_id,
                name: name.to_string(),
                nickname: None,
                color_tag: None,
                avatar_url: None,
                birthday: None,
                notes: None,
                created_at: Utc::now(),
            });
        }
        family_id
    }

    /// Make every subsequent `insert_entry` fail.
    pub fn fail_entry_inserts(&self) {
        self.fail_entry_inserts.store(true, Ordering::SeqCst);
    }

    /// Make every subsequent family lookup fail.
    pub fn fail_lookups(&self) {
        self.fail_lookups.store(true, Ordering::SeqCst);
    }

    pub fn entries(&self) -> Vec<Entry> {
        self.inner.lock().unwrap().entries.clone()
    }

    pub fn children(&self) -> Vec<Child> {
        self.inner.lock().unwrap().children.clone()
    }

    pub fn magic_link_requests(&self) -> Vec<String> {
        self.inner.lock().unwrap().magic_links.clone()
    }

    /// Backdate an entry, for counter-boundary tests.
    pub fn backdate_entry(&self, id: Uuid, recorded_at: chrono::DateTime<Utc>) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(e) = inner.entries.iter_mut().find(|e| e.id == id) {
            e.recorded_at = recorded_at;
        }
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn find_family_by_phone(&self, phone: &str) -> Result<Option<Family>, BackendError> {
        if self.fail_lookups.load(Ordering::SeqCst) {
            return Err(BackendError::Request("injected lookup failure".into()));
        }
        let inner = self.inner.lock().unwrap();
        Ok(inner.families.iter().find(|f| f.phone == phone).cloned())
    }

    async fn get_family(&self, id: Uuid) -> Result<Option<Family>, BackendError> {
        if self.fail_lookups.load(Ordering::SeqCst) {
            return Err(BackendError::Request("injected lookup failure".into()));
        }
        let inner = self.inner.lock().unwrap();
        Ok(inner.families.iter().find(|f| f.id == id).cloned())
    }

    async fn create_family(&self, new: &NewFamily) -> Result<Family, BackendError> {
        let family = Family {
            id: Uuid::new_v4(),
            email: new.email.clone(),
            phone: new.phone.clone(),
            created_at: Utc::now(),
        };
        self.inner.lock().unwrap().families.push(family.clone());
        Ok(family)
    }

    async fn create_children(
        &self,
        family_id: Uuid,
        kids: &[NewChild],
    ) -> Result<Vec<Child>, BackendError> {
        let rows: Vec<Child> = kids
            .iter()
            .map(|k| Child {
                id: Uuid::new_v4(),
                family_id,
                name: k.name.clone(),
                nickname: None,
                color_tag: None,
                avatar_url: None,
                birthday: k.birthday,
                notes: k.notes.clone(),
                created_at: Utc::now(),
            })
            .collect();
        self.inner.lock().unwrap().children.extend(rows.clone());
        Ok(rows)
    }

    async fn list_children(&self, family_id: Uuid) -> Result<Vec<Child>, BackendError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .children
            .iter()
            .filter(|c| c.family_id == family_id)
            .cloned()
            .collect())
    }

    async fn update_child_profile(
        &self,
        id: Uuid,
        nickname: Option<&str>,
        color_tag: ColorTag,
    ) -> Result<(), BackendError> {
        let mut inner = self.inner.lock().unwrap();
        let child = inner
            .children
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| BackendError::NotFound {
                entity: "child".to_string(),
                id: id.to_string(),
            })?;
        child.nickname = nickname.map(str::to_string);
        child.color_tag = Some(color_tag);
        Ok(())
    }

    async fn set_child_avatar(&self, id: Uuid, url: &str) -> Result<(), BackendError> {
        let mut inner = self.inner.lock().unwrap();
        let child = inner
            .children
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| BackendError::NotFound {
                entity: "child".to_string(),
                id: id.to_string(),
            })?;
        child.avatar_url = Some(url.to_string());
        Ok(())
    }

    async fn insert_entry(&self, new: &NewEntry) -> Result<Entry, BackendError> {
        if self.fail_entry_inserts.load(Ordering::SeqCst) {
            return Err(BackendError::Request("injected insert failure".into()));
        }
        let entry = Entry {
            id: Uuid::new_v4(),
            family_id: new.family_id,
            quote: new.quote.clone(),
            source: new.source,
            recorded_at: Utc::now(),
        };
        self.inner.lock().unwrap().entries.push(entry.clone());
        Ok(entry)
    }

    async fn list_entries(&self, family_id: Uuid) -> Result<Vec<Entry>, BackendError> {
        let inner = self.inner.lock().unwrap();
        let mut rows: Vec<Entry> = inner
            .entries
            .iter()
            .filter(|e| e.family_id == family_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
        Ok(rows)
    }

    async fn request_magic_link(&self, email: &str) -> Result<(), BackendError> {
        self.inner.lock().unwrap().magic_links.push(email.to_string());
        Ok(())
    }

    async fn upload_avatar(
        &self,
        path: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<String, BackendError> {
        let mut inner = self.inner.lock().unwrap();
        inner.uploads.push((path.to_string(), bytes.len()));
        Ok(format!("https://backend.test/storage/public/{path}"))
    }
}
