//! Spreadsheet ingestion into the record store, and the bulk purge.
//!
//! Files are decoded with calamine, normalised with the smart fill rules
//! from `appraisal-core` and written through any [`appraisal_store::RecordStore`].

pub mod error;
pub mod purge;
pub mod reader;
pub mod runner;

pub use error::IngestError;
pub use purge::purge_all;
pub use reader::{read_workbook, SheetGrid, SheetReadError};
pub use runner::{import_files, import_sheet, load_existing_keys, UploadedFile};
