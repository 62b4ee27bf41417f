//! In-memory [`RecordStore`] for tests.
//!
//! Filters are evaluated with [`Filter::matches`](appraisal_core::query::Filter::matches)
//! against the record's wire JSON, so listings behave like the hosted
//! store's. Faults can be injected per operation.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use appraisal_core::query::{total_pages, SortOrder};
use appraisal_core::record::{PropertyRecord, StoredRecord};
use appraisal_core::types::RecordId;
use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{AuthSession, AuthUser, ListQuery, RecordPage, RecordStore, StoreError};

struct Entry {
    seq: u64,
    record: StoredRecord,
}

struct UserEntry {
    password: String,
    user: AuthUser,
}

#[derive(Default)]
struct State {
    entries: Vec<Entry>,
    next_seq: u64,
    users: Vec<UserEntry>,
    sessions: HashMap<String, RecordId>,
    rejected_reports: HashSet<String>,
    deletes_before_failure: Option<usize>,
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
    fail_listing: AtomicBool,
    pub list_calls: AtomicUsize,
    pub create_calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert records directly, bypassing fault injection.
    pub async fn seed(&self, records: impl IntoIterator<Item = PropertyRecord>) -> Vec<StoredRecord> {
        let mut state = self.state.lock().await;
        records
            .into_iter()
            .map(|record| state.insert(record))
            .collect()
    }

    pub async fn add_user(&self, email: &str, password: &str, role: &str) -> AuthUser {
        let mut state = self.state.lock().await;
        let user = AuthUser {
            id: format!("user{:011}", state.users.len() + 1),
            email: email.to_string(),
            role: role.to_string(),
        };
        state.users.push(UserEntry {
            password: password.to_string(),
            user: user.clone(),
        });
        user
    }

    /// Snapshot of all records in insertion order.
    pub async fn records(&self) -> Vec<StoredRecord> {
        let state = self.state.lock().await;
        state.entries.iter().map(|e| e.record.clone()).collect()
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    // ---- fault injection ----

    /// Make every listing fail with a server error.
    pub fn fail_listing(&self, fail: bool) {
        self.fail_listing.store(fail, Ordering::SeqCst);
    }

    /// Reject creation of records filed under `report_number`.
    pub async fn reject_report_number(&self, report_number: &str) {
        self.state
            .lock()
            .await
            .rejected_reports
            .insert(report_number.to_string());
    }

    /// Let `count` more deletions succeed, then fail the rest.
    pub async fn fail_deletes_after(&self, count: usize) {
        self.state.lock().await.deletes_before_failure = Some(count);
    }
}

impl State {
    fn insert(&mut self, record: PropertyRecord) -> StoredRecord {
        self.next_seq += 1;
        let now = chrono::Utc::now();
        let stored = StoredRecord {
            id: format!("rec{:012}", self.next_seq),
            created: Some(now),
            updated: Some(now),
            record,
        };
        self.entries.push(Entry {
            seq: self.next_seq,
            record: stored.clone(),
        });
        stored
    }

    fn position(&self, id: &str) -> Result<usize, StoreError> {
        self.entries
            .iter()
            .position(|e| e.record.id == id)
            .ok_or_else(|| StoreError::NotFound { id: id.into() })
    }

    fn session_for(&mut self, user: AuthUser) -> AuthSession {
        let token = format!("session-{}-{}", user.id, self.sessions.len() + 1);
        self.sessions.insert(token.clone(), user.id.clone());
        AuthSession { token, user }
    }
}

fn sort_entries(entries: &mut [&Entry], sort: Option<SortOrder>) {
    match sort {
        None | Some(SortOrder::Oldest) => entries.sort_by_key(|e| e.seq),
        Some(SortOrder::Newest) => entries.sort_by_key(|e| std::cmp::Reverse(e.seq)),
        Some(SortOrder::NameAsc) => entries.sort_by(|a, b| {
            a.record
                .record
                .borrower
                .display_name()
                .cmp(b.record.record.borrower.display_name())
                .then(a.seq.cmp(&b.seq))
        }),
        Some(SortOrder::ValueDesc) => entries.sort_by(|a, b| {
            b.record
                .record
                .object_value
                .total_cmp(&a.record.record.object_value)
                .then(a.seq.cmp(&b.seq))
        }),
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn list(
        &self,
        page: u32,
        per_page: u32,
        query: &ListQuery,
    ) -> Result<RecordPage, StoreError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_listing.load(Ordering::SeqCst) {
            return Err(StoreError::Api {
                status: 500,
                body: "listing disabled".into(),
            });
        }

        let state = self.state.lock().await;
        let mut matching = Vec::new();
        for entry in &state.entries {
            let keep = match &query.filter {
                Some(filter) => {
                    let json = serde_json::to_value(&entry.record)
                        .map_err(|e| StoreError::Decode(e.to_string()))?;
                    filter.matches(&json)
                }
                None => true,
            };
            if keep {
                matching.push(entry);
            }
        }
        sort_entries(&mut matching, query.sort);

        let page = page.max(1);
        let per_page = per_page.max(1);
        let total_items = matching.len() as u64;
        let start = (page as usize - 1).saturating_mul(per_page as usize);
        let items = matching
            .into_iter()
            .skip(start)
            .take(per_page as usize)
            .map(|e| e.record.clone())
            .collect();

        Ok(RecordPage {
            page,
            per_page,
            total_items,
            total_pages: total_pages(total_items, per_page),
            items,
        })
    }

    async fn get(&self, id: &str) -> Result<StoredRecord, StoreError> {
        let state = self.state.lock().await;
        let index = state.position(id)?;
        Ok(state.entries[index].record.clone())
    }

    async fn create(&self, record: &PropertyRecord) -> Result<StoredRecord, StoreError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().await;
        if state.rejected_reports.contains(&record.report_number) {
            return Err(StoreError::Rejected(format!(
                "report number {} is not accepted",
                record.report_number
            )));
        }
        Ok(state.insert(record.clone()))
    }

    async fn update(&self, id: &str, record: &PropertyRecord) -> Result<StoredRecord, StoreError> {
        let mut state = self.state.lock().await;
        let index = state.position(id)?;
        let stored = &mut state.entries[index].record;
        stored.record = record.clone();
        stored.updated = Some(chrono::Utc::now());
        Ok(stored.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        if let Some(remaining) = state.deletes_before_failure {
            if remaining == 0 {
                return Err(StoreError::Api {
                    status: 500,
                    body: "delete failed".into(),
                });
            }
            state.deletes_before_failure = Some(remaining - 1);
        }
        let index = state.position(id)?;
        state.entries.remove(index);
        Ok(())
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<AuthSession, StoreError> {
        let mut state = self.state.lock().await;
        let user = state
            .users
            .iter()
            .find(|u| u.user.email == email && u.password == password)
            .map(|u| u.user.clone())
            .ok_or(StoreError::Unauthorized)?;
        Ok(state.session_for(user))
    }

    async fn refresh(&self, token: &str) -> Result<AuthSession, StoreError> {
        let state = self.state.lock().await;
        let user_id = state.sessions.get(token).ok_or(StoreError::Unauthorized)?;
        let user = state
            .users
            .iter()
            .find(|u| &u.user.id == user_id)
            .map(|u| u.user.clone())
            .ok_or(StoreError::Unauthorized)?;
        Ok(AuthSession {
            token: token.to_string(),
            user,
        })
    }
}
