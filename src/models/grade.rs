// src/models/grade.rs

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::quiz::{QuizCategory, QuizSummary};

/// Response of `GET /backend/v1/grade/analysis/{quizId}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeAnalysis {
    pub quiz: AnalysisQuiz,
    pub stats: AnalysisStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisQuiz {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub category: Option<QuizCategory>,
    #[serde(default)]
    pub total_score: Option<i64>,
    #[serde(default)]
    pub pass_score: Option<i64>,
    #[serde(default)]
    pub exam_date: Option<String>,
}

/// Statistics computed by the backend; the console only formats them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisStats {
    pub participant_count: i64,
    pub average_score: f64,
    pub max_score: f64,
    pub min_score: f64,
    pub median_score: f64,
    /// Ratio in `[0, 1]`.
    pub pass_rate: f64,
    /// Score band (e.g. `60-69`) to participant count.
    pub distribution: BTreeMap<String, i64>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionRow {
    pub range: String,
    pub count: i64,
}

/// Analysis shaped for display.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisView {
    pub quiz: AnalysisQuiz,
    pub participant_count: i64,
    pub average_score: f64,
    pub median_score: f64,
    pub max_score: f64,
    pub min_score: f64,
    /// Percentage with one decimal, e.g. `66.7`.
    pub pass_rate_percent: f64,
    pub distribution: Vec<DistributionRow>,
    pub updated_at: Option<String>,
    /// Offline quizzes accept spreadsheet imports.
    pub can_import: bool,
}

/// Rounds to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Turns a `[0, 1]` ratio into a percentage with one decimal.
pub fn ratio_to_percent(ratio: f64) -> f64 {
    (ratio * 1000.0).round() / 10.0
}

/// Leading integer of a score band such as `60-69` or `90+`.
fn band_lower_bound(range: &str) -> Option<i64> {
    let digits: String = range
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

impl From<GradeAnalysis> for AnalysisView {
    fn from(analysis: GradeAnalysis) -> Self {
        let GradeAnalysis { quiz, stats } = analysis;

        let mut distribution: Vec<DistributionRow> = stats
            .distribution
            .into_iter()
            .map(|(range, count)| DistributionRow { range, count })
            .collect();
        // Bands without a numeric start keep their relative order at the end.
        distribution.sort_by_key(|row| band_lower_bound(&row.range).unwrap_or(i64::MAX));

        let can_import = quiz.category == Some(QuizCategory::OfflineManual);

        Self {
            quiz,
            participant_count: stats.participant_count,
            average_score: round1(stats.average_score),
            median_score: round1(stats.median_score),
            max_score: stats.max_score,
            min_score: stats.min_score,
            pass_rate_percent: ratio_to_percent(stats.pass_rate),
            distribution,
            updated_at: stats.updated_at,
            can_import,
        }
    }
}

/// `?refresh=` for the analysis endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisParams {
    #[serde(default)]
    pub refresh: bool,
}

/// Category filter of the grade overview.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum CategoryFilter {
    #[default]
    #[serde(rename = "all")]
    All,
    #[serde(rename = "ONLINE_AUTO")]
    OnlineAuto,
    #[serde(rename = "OFFLINE_MANUAL")]
    OfflineManual,
}

impl CategoryFilter {
    fn matches(self, category: Option<QuizCategory>) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::OnlineAuto => category == Some(QuizCategory::OnlineAuto),
            CategoryFilter::OfflineManual => category == Some(QuizCategory::OfflineManual),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OverviewParams {
    #[serde(default)]
    pub category: CategoryFilter,
}

/// Grade center summary over the filtered quiz list.
#[derive(Debug, Clone, Serialize)]
pub struct GradeOverview {
    pub quiz_count: usize,
    pub participant_total: i64,
    /// Mean of per-quiz pass rates, as a percentage with one decimal.
    pub average_pass_rate: f64,
    pub offline_count: usize,
    pub items: Vec<QuizSummary>,
}

impl GradeOverview {
    pub fn from_quizzes(quizzes: Vec<QuizSummary>, filter: CategoryFilter) -> Self {
        let items: Vec<QuizSummary> = quizzes
            .into_iter()
            .filter(|q| filter.matches(q.category))
            .collect();

        let participant_total = items.iter().map(|q| q.participant_count.unwrap_or(0)).sum();
        let average_pass_rate = if items.is_empty() {
            0.0
        } else {
            let total: f64 = items.iter().map(|q| q.pass_rate.unwrap_or(0.0)).sum();
            ratio_to_percent(total / items.len() as f64)
        };
        let offline_count = items
            .iter()
            .filter(|q| q.category == Some(QuizCategory::OfflineManual))
            .count();

        Self {
            quiz_count: items.len(),
            participant_total,
            average_pass_rate,
            offline_count,
            items,
        }
    }
}

/// One point of `GET /backend/v1/grade/student/{userId}/trend`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendPoint {
    pub quiz_id: i64,
    pub quiz_title: String,
    #[serde(default)]
    pub category: Option<QuizCategory>,
    #[serde(default)]
    pub exam_date: Option<String>,
    #[serde(default)]
    pub submitted_at: Option<String>,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub passed: bool,
}

/// Optional date window of a student's trend. Both ends are forwarded
/// only when both are present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrendParams {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// Result of the backend's authoritative import.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportSummary {
    pub total_rows: i64,
    pub success_count: i64,
    pub skipped_count: i64,
    pub errors: Vec<String>,
}
