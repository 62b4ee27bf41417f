//! Record store access.
//!
//! The appraisal records and user accounts live in a hosted
//! database-as-a-service. [`RecordStore`] is the seam every other crate
//! talks to; [`client::HttpRecordStore`] speaks its REST API and, with the
//! `memory` feature, [`memory::MemoryStore`] stands in for it in tests.

pub mod client;
pub mod config;
pub mod error;
#[cfg(feature = "memory")]
pub mod memory;

use appraisal_core::query::{Filter, SortOrder, FULL_LIST_BATCH_SIZE};
use appraisal_core::record::{PropertyRecord, StoredRecord};
use appraisal_core::roles;
use appraisal_core::types::RecordId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use client::HttpRecordStore;
pub use config::StoreConfig;
pub use error::StoreError;

/// Filter, order and projection of a listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    pub filter: Option<Filter>,
    pub sort: Option<SortOrder>,
    /// Fields to return; `None` returns whole records.
    pub fields: Option<Vec<&'static str>>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn sort(mut self, sort: SortOrder) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn fields(mut self, fields: &[&'static str]) -> Self {
        self.fields = Some(fields.to_vec());
        self
    }
}

/// One page of a listing. Pages are numbered from 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPage {
    pub page: u32,
    pub per_page: u32,
    pub total_items: u64,
    pub total_pages: u64,
    pub items: Vec<StoredRecord>,
}

/// A signed-in user as stored in the auth collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: RecordId,
    #[serde(default)]
    pub email: String,
    /// Empty when the user record has no role.
    #[serde(default)]
    pub role: String,
}

impl AuthUser {
    pub fn role(&self) -> Option<&str> {
        Some(self.role.as_str()).filter(|r| !r.is_empty())
    }

    pub fn is_admin(&self) -> bool {
        roles::is_admin(self.role())
    }
}

/// A session token and the user it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: String,
    #[serde(rename = "record")]
    pub user: AuthUser,
}

/// Operations the application needs from the record store.
#[async_trait]
pub trait RecordStore: Send + Sync + 'static {
    /// One page of records.
    async fn list(
        &self,
        page: u32,
        per_page: u32,
        query: &ListQuery,
    ) -> Result<RecordPage, StoreError>;

    /// Every record matching the query, walking pages until exhausted.
    async fn full_list(&self, query: &ListQuery) -> Result<Vec<StoredRecord>, StoreError> {
        let mut records = Vec::new();
        let mut page = 1;
        loop {
            let batch = self.list(page, FULL_LIST_BATCH_SIZE, query).await?;
            let fetched = batch.items.len();
            records.extend(batch.items);
            if fetched == 0 || u64::from(page) >= batch.total_pages {
                break;
            }
            page += 1;
        }
        Ok(records)
    }

    async fn get(&self, id: &str) -> Result<StoredRecord, StoreError>;

    async fn create(&self, record: &PropertyRecord) -> Result<StoredRecord, StoreError>;

    /// Replace the editable fields of a record. Server-managed timestamps
    /// are never sent.
    async fn update(&self, id: &str, record: &PropertyRecord)
        -> Result<StoredRecord, StoreError>;

    async fn delete(&self, id: &str) -> Result<(), StoreError>;

    /// Sign in with email and password.
    async fn authenticate(&self, email: &str, password: &str) -> Result<AuthSession, StoreError>;

    /// Validate a session token, returning a fresh session for it.
    async fn refresh(&self, token: &str) -> Result<AuthSession, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_reads_store_envelope() {
        let page: RecordPage = serde_json::from_str(
            r#"{"page":1,"perPage":30,"totalItems":1,"totalPages":1,
                "items":[{"id":"r1","nama_debitur":"Budi"}]}"#,
        )
        .unwrap();
        assert_eq!(page.per_page, 30);
        assert_eq!(page.items[0].id, "r1");
    }

    #[test]
    fn session_reads_auth_envelope() {
        let session: AuthSession = serde_json::from_str(
            r#"{"token":"t","record":{"id":"u1","email":"a@b.c","role":"admin","verified":true}}"#,
        )
        .unwrap();
        assert!(session.user.is_admin());

        let plain: AuthUser = serde_json::from_str(r#"{"id":"u2","role":""}"#).unwrap();
        assert_eq!(plain.role(), None);
        assert!(!plain.is_admin());
    }

    #[test]
    fn list_query_builder() {
        let query = ListQuery::new()
            .sort(SortOrder::ValueDesc)
            .fields(&["id"]);
        assert_eq!(query.sort, Some(SortOrder::ValueDesc));
        assert_eq!(query.fields, Some(vec!["id"]));
        assert!(query.filter.is_none());
    }
}
