// src/grade_import/mod.rs

//! Offline grade import: spreadsheet decoding, preview, template and upload.
//!
//! The console's parse is advisory. It only feeds the confirmation table;
//! the raw file is uploaded untouched and the backend's parse is authoritative.

pub mod preview;
pub mod sheet;
pub mod submit;
pub mod template;

use serde::Serialize;

pub use preview::{MAX_PREVIEW_ROWS, Preview, build_preview};
pub use sheet::{ParseError, parse_sheet};
pub use submit::{GradeImporter, ImportDialog, ImportError, ImportLocks, ImportPermit, QuizTarget, SelectedFile};

/// One data row of an uploaded grade sheet, by column position.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewRow {
    /// Employee number (column 0).
    pub sno: String,
    pub name: String,
    /// Non-numeric or missing cells read as 0.
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exam_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}
