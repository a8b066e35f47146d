// src/grade_import/preview.rs

use serde::Serialize;

use super::PreviewRow;

/// Rows shown in the confirmation table. The uploaded file is never truncated.
pub const MAX_PREVIEW_ROWS: usize = 10;

/// Leading slice of `rows`, at most `MAX_PREVIEW_ROWS` long, in source order.
pub fn build_preview(rows: &[PreviewRow]) -> &[PreviewRow] {
    &rows[..rows.len().min(MAX_PREVIEW_ROWS)]
}

/// What the import dialog displays for the selected file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Preview {
    pub rows: Vec<PreviewRow>,
    /// Data rows found in the whole sheet.
    pub parsed_rows: usize,
}

impl Preview {
    pub fn from_rows(rows: Vec<PreviewRow>) -> Self {
        Self {
            parsed_rows: rows.len(),
            rows: build_preview(&rows).to_vec(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn is_truncated(&self) -> bool {
        self.parsed_rows > self.rows.len()
    }
}
