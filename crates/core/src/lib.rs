//! Domain logic for property appraisal records.
//!
//! Pure, synchronous building blocks shared by the ingestion pipeline and
//! the API server: the record model, spreadsheet cell handling, header
//! detection, smart fill, duplicate keys and record-store query types.

pub mod cell;
pub mod coordinate;
pub mod date;
pub mod duplicate;
pub mod error;
pub mod header;
pub mod query;
pub mod record;
pub mod report;
pub mod roles;
pub mod smart_fill;
pub mod types;
