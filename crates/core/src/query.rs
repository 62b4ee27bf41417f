//! Typed record-store filters, sort orders and listing defaults.
//!
//! Filters are built as an expression tree and rendered to the store's
//! filter language only at the edge, with every literal quoted and
//! escaped. The same tree can be evaluated in memory against a JSON
//! record.

use serde::{Deserialize, Serialize};

use crate::record::{fields, has_report_number, COMPARATOR_NAME};

// ---------------------------------------------------------------------------
// Listing defaults
// ---------------------------------------------------------------------------

/// Rows per page in the browse table.
pub const BROWSE_PAGE_SIZE: u32 = 30;

/// Maximum comparators shown next to a record.
pub const COMPARATOR_LIMIT: u32 = 10;

/// Identifiers fetched per round of a delete-all run.
pub const PURGE_BATCH_SIZE: u32 = 50;

/// Page size used when walking a full listing.
pub const FULL_LIST_BATCH_SIZE: u32 = 500;

/// Fields matched by the free-text search box.
pub const SEARCH_FIELDS: &[&str] = &[
    fields::BORROWER_NAME,
    fields::CITY,
    fields::ADDRESS,
    fields::BRANCH,
];

// ---------------------------------------------------------------------------
// Filter expressions
// ---------------------------------------------------------------------------

/// A boolean filter over record fields.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Field equals the value exactly.
    Eq(&'static str, String),
    /// Field differs from the value.
    NotEq(&'static str, String),
    /// Field contains the value, case-insensitively.
    Contains(&'static str, String),
    /// Every clause holds. An empty conjunction is always true.
    And(Vec<Filter>),
    /// At least one clause holds. An empty disjunction is always false.
    Or(Vec<Filter>),
}

impl Filter {
    pub fn eq(field: &'static str, value: impl Into<String>) -> Self {
        Self::Eq(field, value.into())
    }

    pub fn not_eq(field: &'static str, value: impl Into<String>) -> Self {
        Self::NotEq(field, value.into())
    }

    pub fn contains(field: &'static str, value: impl Into<String>) -> Self {
        Self::Contains(field, value.into())
    }

    /// Render in the store's filter syntax.
    pub fn render(&self) -> String {
        match self {
            Self::Eq(field, value) => format!("{field} = {}", quote_literal(value)),
            Self::NotEq(field, value) => format!("{field} != {}", quote_literal(value)),
            Self::Contains(field, value) => format!("{field} ~ {}", quote_literal(value)),
            Self::And(clauses) => render_joined(clauses, " && "),
            Self::Or(clauses) => render_joined(clauses, " || "),
        }
    }

    /// Evaluate against a JSON object whose keys are store field names.
    /// Missing fields read as the empty string.
    pub fn matches(&self, record: &serde_json::Value) -> bool {
        match self {
            Self::Eq(field, value) => field_text(record, field) == *value,
            Self::NotEq(field, value) => field_text(record, field) != *value,
            Self::Contains(field, value) => field_text(record, field)
                .to_lowercase()
                .contains(&value.to_lowercase()),
            Self::And(clauses) => clauses.iter().all(|c| c.matches(record)),
            Self::Or(clauses) => clauses.iter().any(|c| c.matches(record)),
        }
    }

    fn is_compound(&self) -> bool {
        matches!(self, Self::And(c) | Self::Or(c) if c.len() > 1)
    }
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}

fn render_joined(clauses: &[Filter], separator: &str) -> String {
    clauses
        .iter()
        .map(|clause| {
            if clause.is_compound() {
                format!("({})", clause.render())
            } else {
                clause.render()
            }
        })
        .collect::<Vec<_>>()
        .join(separator)
}

/// Quote a string literal for the filter language.
///
/// Backslashes and double quotes are escaped; control characters are
/// replaced by spaces so a value can never end the expression early.
pub fn quote_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            c if c.is_control() => out.push(' '),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn field_text(record: &serde_json::Value, field: &str) -> String {
    match record.get(field) {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Filter builders
// ---------------------------------------------------------------------------

/// Free-text search across [`SEARCH_FIELDS`]. Blank terms match everything.
pub fn search_filter(term: &str) -> Option<Filter> {
    let term = term.trim();
    if term.is_empty() {
        return None;
    }
    Some(Filter::Or(
        SEARCH_FIELDS
            .iter()
            .map(|field| Filter::contains(field, term))
            .collect(),
    ))
}

/// Browse listing: debtor records only, optionally narrowed by a search.
pub fn browse_filter(term: &str) -> Filter {
    let mut clauses = vec![Filter::not_eq(fields::BORROWER_NAME, COMPARATOR_NAME)];
    clauses.extend(search_filter(term));
    Filter::And(clauses)
}

/// Other records filed under the same report number, or `None` when the
/// record has no report number to correlate on.
pub fn comparators_filter(report_number: &str, exclude_id: &str) -> Option<Filter> {
    if !has_report_number(report_number) {
        return None;
    }
    Some(Filter::And(vec![
        Filter::eq(fields::REPORT_NUMBER, report_number),
        Filter::not_eq(fields::ID, exclude_id),
    ]))
}

// ---------------------------------------------------------------------------
// Sort orders
// ---------------------------------------------------------------------------

/// Orderings offered by the browse table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Most recently uploaded first.
    #[default]
    Newest,
    /// Oldest upload first.
    Oldest,
    /// Borrower name A-Z.
    NameAsc,
    /// Highest object value first.
    ValueDesc,
}

impl SortOrder {
    /// The store's sort expression.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Newest => "-created",
            Self::Oldest => "+created",
            Self::NameAsc => "+nama_debitur",
            Self::ValueDesc => "-nilai_obyek",
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Total number of pages for `total_items` at `per_page` rows per page.
pub fn total_pages(total_items: u64, per_page: u32) -> u64 {
    if per_page == 0 {
        return 0;
    }
    total_items.div_ceil(u64::from(per_page))
}
