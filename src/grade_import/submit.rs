// src/grade_import/submit.rs

use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use super::{ParseError, Preview, PreviewRow, parse_sheet, template::XLSX_MIME};
use crate::{backend::BackendError, models::grade::ImportSummary};

pub const ACCEPTED_EXTENSIONS: [&str; 2] = [".xlsx", ".xls"];

const XLS_MIME: &str = "application/vnd.ms-excel";

pub const IMPORT_FAILED_FALLBACK: &str = "Import failed, please try again later.";

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Please choose the quiz to import into.")]
    MissingQuiz,

    #[error("Please select a grade spreadsheet first.")]
    MissingFile,

    #[error("Only .xlsx and .xls files are supported (got {0}).")]
    UnsupportedFile(String),

    #[error("Could not read the spreadsheet, please check the file format.")]
    Parse(#[from] ParseError),

    #[error("An import is already in progress.")]
    Busy,

    /// The upload reached the backend and failed there.
    #[error("{message}")]
    Rejected {
        message: String,
        #[source]
        source: BackendError,
    },
}

/// Raw upload kept in memory until it is submitted or discarded.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    /// Accepts only `.xlsx` / `.xls` names (case-insensitive).
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, ImportError> {
        let name = name.into();
        let lower = name.to_lowercase();
        if !ACCEPTED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
            return Err(ImportError::UnsupportedFile(name));
        }
        Ok(Self { name, bytes })
    }

    pub fn mime(&self) -> &'static str {
        if self.name.to_lowercase().ends_with(".xls") {
            XLS_MIME
        } else {
            XLSX_MIME
        }
    }
}

/// Quiz that receives the imported grades.
#[derive(Debug, Clone, Serialize)]
pub struct QuizTarget {
    pub id: i64,
    pub title: Option<String>,
}

/// Sends a selected grade file to whoever persists it.
#[async_trait]
pub trait GradeImporter: Send + Sync {
    async fn import(&self, quiz_id: i64, file: &SelectedFile) -> Result<ImportSummary, BackendError>;
}

/// Quizzes with an import currently on its way to the backend.
///
/// Shared across requests so a double-submitted dialog cannot import the
/// same sheet twice.
#[derive(Debug, Clone, Default)]
pub struct ImportLocks {
    in_flight: Arc<Mutex<HashSet<i64>>>,
}

impl ImportLocks {
    /// Claims `quiz_id` until the returned permit is dropped.
    pub fn acquire(&self, quiz_id: i64) -> Result<ImportPermit, ImportError> {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        if !in_flight.insert(quiz_id) {
            return Err(ImportError::Busy);
        }
        Ok(ImportPermit {
            locks: self.clone(),
            quiz_id,
        })
    }

    pub fn is_busy(&self, quiz_id: i64) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&quiz_id)
    }
}

/// Releases its quiz on drop, whatever way the submission ended.
#[derive(Debug)]
pub struct ImportPermit {
    locks: ImportLocks,
    quiz_id: i64,
}

impl Drop for ImportPermit {
    fn drop(&mut self) {
        self.locks
            .in_flight
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&self.quiz_id);
    }
}

/// State of one import dialog session: target quiz, selected file, preview.
///
/// Built fresh when the dialog opens and dropped when it closes. A failed
/// submission keeps the file selected so the admin can retry.
#[derive(Debug)]
pub struct ImportDialog {
    quiz: Option<QuizTarget>,
    file: Option<SelectedFile>,
    preview: Preview,
    pending: bool,
}

impl ImportDialog {
    pub fn open(quiz: Option<QuizTarget>) -> Self {
        Self {
            quiz,
            file: None,
            preview: Preview::default(),
            pending: false,
        }
    }

    pub fn title(&self) -> String {
        match self.quiz.as_ref().and_then(|q| q.title.as_deref()) {
            Some(title) => format!("Offline grade import - {}", title),
            None => "Offline grade import".to_string(),
        }
    }

    pub fn quiz(&self) -> Option<&QuizTarget> {
        self.quiz.as_ref()
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn preview(&self) -> &Preview {
        &self.preview
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Whether the confirm button is enabled.
    pub fn can_submit(&self) -> bool {
        self.file.is_some() && !self.pending
    }

    /// Parses `name`/`bytes` and, on success, makes it the selected file.
    ///
    /// A file with no data rows is still selected; the empty preview is the
    /// caller's cue to warn. Any failure clears the previous selection.
    pub fn select_file(&mut self, name: impl Into<String>, bytes: Vec<u8>) -> Result<&[PreviewRow], ImportError> {
        let result = SelectedFile::new(name, bytes).and_then(|file| {
            let rows = parse_sheet(&file.bytes)?;
            Ok((file, rows))
        });

        match result {
            Ok((file, rows)) => {
                let preview = Preview::from_rows(rows);
                if preview.is_empty() {
                    tracing::warn!("No data rows found in {}", file.name);
                }
                self.file = Some(file);
                self.preview = preview;
                Ok(&self.preview.rows)
            }
            Err(e) => {
                tracing::warn!("Rejected grade file: {}", e);
                self.reset_file();
                Err(e)
            }
        }
    }

    pub fn reset_file(&mut self) {
        self.file = None;
        self.preview = Preview::default();
    }

    /// Cancel / close: discards everything selected in this session.
    pub fn close(mut self) {
        self.reset_file();
    }

    /// Uploads the selected file for the target quiz.
    ///
    /// Missing quiz or file fails without calling `importer`. On success
    /// the selection is cleared; on failure it is kept.
    pub async fn submit<I>(&mut self, importer: &I) -> Result<ImportSummary, ImportError>
    where
        I: GradeImporter + ?Sized,
    {
        if self.pending {
            return Err(ImportError::Busy);
        }
        let quiz_id = self.quiz.as_ref().map(|q| q.id).ok_or(ImportError::MissingQuiz)?;
        let file = self.file.as_ref().ok_or(ImportError::MissingFile)?;

        self.pending = true;
        let result = importer.import(quiz_id, file).await;
        self.pending = false;

        match result {
            Ok(summary) => {
                tracing::info!(
                    "Imported grades for quiz {}: {} of {} rows",
                    quiz_id,
                    summary.success_count,
                    summary.total_rows
                );
                self.reset_file();
                Ok(summary)
            }
            Err(source) => {
                let message = source.user_message(IMPORT_FAILED_FALLBACK);
                tracing::warn!("Grade import for quiz {} failed: {}", quiz_id, source);
                Err(ImportError::Rejected { message, source })
            }
        }
    }
}
