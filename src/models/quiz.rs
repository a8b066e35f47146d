// src/models/quiz.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::question::{QuestionDetail, default_page, default_size};

/// How a quiz is scored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuizCategory {
    /// Online quiz built from scored questions; total is their sum.
    #[default]
    OnlineAuto,
    /// Offline exam with a manually entered total and no questions.
    OfflineManual,
}

impl QuizCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            QuizCategory::OnlineAuto => "ONLINE_AUTO",
            QuizCategory::OfflineManual => "OFFLINE_MANUAL",
        }
    }
}

/// Row of `GET /backend/v1/quizzes`. Statistics are absent until the
/// backend has computed them once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizSummary {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub total_score: Option<i64>,
    #[serde(default)]
    pub pass_score: Option<i64>,
    #[serde(default)]
    pub category: Option<QuizCategory>,
    #[serde(default)]
    pub exam_date: Option<String>,
    #[serde(default)]
    pub question_count: i64,
    #[serde(default)]
    pub participant_count: Option<i64>,
    #[serde(default)]
    pub pass_rate: Option<f64>,
    #[serde(default)]
    pub avg_score: Option<f64>,
    #[serde(default)]
    pub max_score: Option<f64>,
    #[serde(default)]
    pub min_score: Option<f64>,
    #[serde(default)]
    pub statistics_updated_at: Option<String>,
}

/// Quiz as returned by `GET /backend/v1/quizzes/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizDetail {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub total_score: Option<i64>,
    #[serde(default)]
    pub pass_score: Option<i64>,
    #[serde(default)]
    pub category: Option<QuizCategory>,
    #[serde(default)]
    pub exam_date: Option<String>,
    #[serde(default)]
    pub question_ids: Vec<i64>,
    #[serde(default)]
    pub questions: Vec<QuestionDetail>,
}

/// Body sent to the backend when storing or updating a quiz.
/// Only ever built by a validated `QuizDraft`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizPayload {
    pub title: String,
    pub pass_score: i64,
    pub question_ids: Vec<i64>,
    pub category: QuizCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_score: Option<i64>,
    /// `YYYY-MM-DD HH:MM:SS`, or `null` when no date is set.
    pub exam_date: Option<String>,
}

/// Quiz form as submitted by the console UI.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct QuizForm {
    #[validate(length(max = 200, message = "Title must not exceed 200 characters."))]
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub category: QuizCategory,
    #[serde(default)]
    pub pass_score: Option<i64>,
    #[serde(default)]
    #[validate(length(max = 500, message = "A quiz may reference at most 500 questions."))]
    pub question_ids: Vec<i64>,
    #[serde(default)]
    pub total_score: Option<i64>,
    #[serde(default)]
    pub exam_date: Option<String>,
}

/// Query parameters for listing quizzes.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct QuizListParams {
    #[validate(range(min = 1, message = "page must be at least 1"))]
    #[serde(default = "default_page")]
    pub page: i64,

    #[validate(range(min = 1, max = 200, message = "size must be between 1 and 200"))]
    #[serde(default = "default_size")]
    pub size: i64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
}
