// src/models/question.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Question type as spelled on the wire: `SINGLE`, `MULTIPLE`, `TRUE_FALSE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionType {
    Single,
    Multiple,
    TrueFalse,
}

impl QuestionType {
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionType::Single => "SINGLE",
            QuestionType::Multiple => "MULTIPLE",
            QuestionType::TrueFalse => "TRUE_FALSE",
        }
    }

    /// Display name used by the console.
    pub fn label(self) -> &'static str {
        match self {
            QuestionType::Single => "单选题",
            QuestionType::Multiple => "多选题",
            QuestionType::TrueFalse => "判断题",
        }
    }
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One selectable option of a choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    /// Stable identifier (`A`, `B`, ... or `OPTION_27`).
    pub value: String,
    /// Free-text content shown to the learner.
    #[serde(default)]
    pub label: String,
}

impl QuestionOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Question as returned by `GET /backend/v1/questions/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionDetail {
    pub id: i64,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub content: String,
    pub score: i64,
    #[serde(default)]
    pub options: Vec<QuestionOption>,
    #[serde(default)]
    pub answer: Vec<String>,
}

/// Body sent to the backend when storing or updating a question.
/// Only ever built by a validated `QuestionDraft`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionPayload {
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<QuestionOption>>,
    pub answer: Vec<String>,
    pub score: i64,
}

/// Question form as submitted by the console UI.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct QuestionForm {
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[validate(length(max = 5000, message = "Question content must not exceed 5000 characters."))]
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    #[validate(length(max = 100, message = "A question may have at most 100 options."))]
    pub options: Vec<QuestionOption>,
    #[serde(default)]
    pub answer: Vec<String>,
}

/// Request for `POST /api/questions/draft/retype`.
#[derive(Debug, Deserialize)]
pub struct RetypeRequest {
    pub draft: QuestionForm,
    #[serde(rename = "type")]
    pub target: QuestionType,
}

/// Query parameters for listing questions.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct QuestionListParams {
    #[validate(range(min = 1, message = "page must be at least 1"))]
    #[serde(default = "default_page")]
    pub page: i64,

    #[validate(range(min = 1, max = 200, message = "size must be between 1 and 200"))]
    #[serde(default = "default_size")]
    pub size: i64,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub question_type: Option<QuestionType>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
}

pub(crate) fn default_page() -> i64 {
    1
}

pub(crate) fn default_size() -> i64 {
    10
}
