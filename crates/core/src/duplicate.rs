//! Duplicate detection for ingested rows.
//!
//! A row duplicates a stored record when both produce the same composite
//! key of report number, borrower name, land area and object value. Text
//! parts are compared lower-cased; numbers are compared by their shortest
//! decimal form, with no numeric tolerance.

use std::collections::HashSet;

use crate::cell::format_number;
use crate::record::{PropertyRecord, PLACEHOLDER};

/// Composite identity of a record for duplicate detection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DuplicateKey(String);

impl DuplicateKey {
    pub fn new(report_number: &str, name: &str, land_area: f64, object_value: f64) -> Self {
        Self(format!(
            "{}_{}_{}_{}",
            key_text(report_number),
            key_text(name),
            format_number(land_area),
            format_number(object_value),
        ))
    }

    pub fn for_record(record: &PropertyRecord) -> Self {
        Self::new(
            &record.report_number,
            record.borrower.display_name(),
            record.land_area,
            record.object_value,
        )
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DuplicateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn key_text(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        trimmed.to_lowercase()
    }
}

/// Keys known to exist: seeded from persisted records once per ingestion
/// run and grown as rows are accepted.
#[derive(Debug, Clone, Default)]
pub struct KeySet {
    keys: HashSet<DuplicateKey>,
}

impl KeySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a PropertyRecord>) -> Self {
        Self {
            keys: records.into_iter().map(DuplicateKey::for_record).collect(),
        }
    }

    pub fn contains(&self, key: &DuplicateKey) -> bool {
        self.keys.contains(key)
    }

    /// Returns `true` if the key was not already present.
    pub fn insert(&mut self, key: DuplicateKey) -> bool {
        self.keys.insert(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
