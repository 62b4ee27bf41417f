//! Property appraisal records and their wire representation.
//!
//! Field names follow the record store's `data_properti` collection. The
//! borrower is a tagged [`Borrower`]; the comparator sentinel name only
//! exists on the wire.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::date::{wire_date, wire_timestamp};
use crate::types::{RecordId, Timestamp};

/// Placeholder stored for unknown text fields and for "no report number".
pub const PLACEHOLDER: &str = "-";

/// Wire name of comparator rows, which have no borrower of their own.
pub const COMPARATOR_NAME: &str = "Aset Pembanding";

/// Record store field names.
pub mod fields {
    pub const ID: &str = "id";
    pub const CREATED: &str = "created";
    pub const BORROWER_NAME: &str = "nama_debitur";
    pub const CITY: &str = "kota";
    pub const ADDRESS: &str = "alamat";
    pub const OBJECT_VALUE: &str = "nilai_obyek";
    pub const APPRAISAL_DATE: &str = "tanggal_penilaian";
    pub const REPORT_NUMBER: &str = "nomor_laporan";
    pub const CLIENT: &str = "pemberi_tugas";
    pub const BRANCH: &str = "cabang";
    pub const LAND_AREA: &str = "luas_tanah";
    pub const BUILDING_AREA: &str = "luas_bangunan";
    pub const LEGAL_STATUS: &str = "legalitas";
    pub const APPRAISER: &str = "nama_penilai";
    pub const COORDINATE: &str = "koordinat";
    pub const OFFER_VALUE: &str = "nilai_penawaran";

    /// Projection used when only duplicate keys are needed.
    pub const DUPLICATE_KEY_FIELDS: &[&str] =
        &[REPORT_NUMBER, BORROWER_NAME, LAND_AREA, OBJECT_VALUE];
}

/// Who a record is about: a real debtor, or a comparator asset that only
/// exists to support the valuation of its report's debtor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Borrower {
    Debtor(String),
    Comparator,
}

impl Borrower {
    /// The name as shown to users and stored on the wire.
    pub fn display_name(&self) -> &str {
        match self {
            Self::Debtor(name) => name,
            Self::Comparator => COMPARATOR_NAME,
        }
    }

    pub fn is_comparator(&self) -> bool {
        matches!(self, Self::Comparator)
    }
}

impl Default for Borrower {
    fn default() -> Self {
        Self::Debtor(String::new())
    }
}

impl From<String> for Borrower {
    fn from(name: String) -> Self {
        if name == COMPARATOR_NAME {
            Self::Comparator
        } else {
            Self::Debtor(name)
        }
    }
}

impl From<Borrower> for String {
    fn from(borrower: Borrower) -> Self {
        match borrower {
            Borrower::Debtor(name) => name,
            Borrower::Comparator => COMPARATOR_NAME.to_string(),
        }
    }
}

impl Serialize for Borrower {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.display_name())
    }
}

impl<'de> Deserialize<'de> for Borrower {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name: Option<String> = Option::deserialize(deserializer)?;
        Ok(Borrower::from(name.unwrap_or_default()))
    }
}

/// One appraisal entry: the editable fields of a stored record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PropertyRecord {
    #[serde(rename = "nama_debitur")]
    pub borrower: Borrower,
    #[serde(rename = "kota")]
    pub city: String,
    #[serde(rename = "alamat")]
    pub address: String,
    #[serde(rename = "nilai_obyek")]
    #[validate(range(min = 0.0))]
    pub object_value: f64,
    #[serde(rename = "tanggal_penilaian", with = "wire_date")]
    pub appraisal_date: Option<NaiveDate>,
    #[serde(rename = "nomor_laporan")]
    #[validate(length(min = 1))]
    pub report_number: String,
    #[serde(rename = "pemberi_tugas")]
    pub client: String,
    #[serde(rename = "cabang")]
    pub branch: String,
    #[serde(rename = "luas_tanah")]
    #[validate(range(min = 0.0))]
    pub land_area: f64,
    #[serde(rename = "luas_bangunan")]
    #[validate(range(min = 0.0))]
    pub building_area: f64,
    #[serde(rename = "legalitas")]
    pub legal_status: String,
    #[serde(rename = "nama_penilai")]
    pub appraiser: String,
    #[serde(rename = "koordinat")]
    pub coordinate: String,
    #[serde(rename = "nilai_penawaran")]
    #[validate(range(min = 0.0))]
    pub offer_value: f64,
}

impl Default for PropertyRecord {
    fn default() -> Self {
        Self {
            borrower: Borrower::default(),
            city: PLACEHOLDER.to_string(),
            address: PLACEHOLDER.to_string(),
            object_value: 0.0,
            appraisal_date: None,
            report_number: PLACEHOLDER.to_string(),
            client: PLACEHOLDER.to_string(),
            branch: PLACEHOLDER.to_string(),
            land_area: 0.0,
            building_area: 0.0,
            legal_status: PLACEHOLDER.to_string(),
            appraiser: PLACEHOLDER.to_string(),
            coordinate: PLACEHOLDER.to_string(),
            offer_value: 0.0,
        }
    }
}

impl PropertyRecord {
    /// `true` when the record carries a real report number.
    pub fn has_report_number(&self) -> bool {
        has_report_number(&self.report_number)
    }
}

/// `true` for report numbers other than blank and the placeholder.
pub fn has_report_number(report_number: &str) -> bool {
    let trimmed = report_number.trim();
    !trimmed.is_empty() && trimmed != PLACEHOLDER
}

/// A record as persisted by the store, with its server-managed fields.
///
/// Only [`PropertyRecord`] is ever sent back on create/update, so the
/// timestamps can never be overwritten by a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub id: RecordId,
    #[serde(default, with = "wire_timestamp", skip_serializing_if = "Option::is_none")]
    pub created: Option<Timestamp>,
    #[serde(default, with = "wire_timestamp", skip_serializing_if = "Option::is_none")]
    pub updated: Option<Timestamp>,
    #[serde(flatten)]
    pub record: PropertyRecord,
}
