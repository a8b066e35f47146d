// src/compose/quiz.rs

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;

use super::ComposeError;
use crate::models::{
    question::{QuestionDetail, QuestionType},
    quiz::{QuizCategory, QuizForm, QuizPayload},
};

pub const EXAM_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A question picked into an online quiz, with the score it contributes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectedQuestion {
    pub id: i64,
    pub question_type: QuestionType,
    pub content: String,
    pub score: i64,
}

impl From<QuestionDetail> for SelectedQuestion {
    fn from(detail: QuestionDetail) -> Self {
        Self {
            id: detail.id,
            question_type: detail.question_type,
            content: detail.content,
            score: detail.score,
        }
    }
}

/// Where a quiz's total score comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum Scoring {
    /// Ordered questions; the total is the sum of their scores.
    Auto { questions: Vec<SelectedQuestion> },
    /// No questions; the total is typed in by the admin.
    Manual { total_score: Option<i64> },
}

impl Scoring {
    fn for_category(category: QuizCategory) -> Self {
        match category {
            QuizCategory::OnlineAuto => Scoring::Auto { questions: Vec::new() },
            QuizCategory::OfflineManual => Scoring::Manual { total_score: None },
        }
    }
}

/// A quiz being authored in the console.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizDraft {
    pub title: String,
    pass_score: Option<i64>,
    exam_date: Option<NaiveDateTime>,
    scoring: Scoring,
}

impl QuizDraft {
    pub fn new(category: QuizCategory) -> Self {
        Self {
            title: String::new(),
            pass_score: None,
            exam_date: None,
            scoring: Scoring::for_category(category),
        }
    }

    /// Builds a draft from a submitted form and the already-fetched details
    /// of its questions, applying edits in the order the form would: pick
    /// questions first, then type the pass score.
    pub fn from_form(form: QuizForm, questions: Vec<SelectedQuestion>) -> Result<Self, ComposeError> {
        let mut draft = Self::new(form.category);
        draft.title = form.title;
        draft.select_questions(questions);
        draft.set_manual_total(form.total_score);
        draft.set_pass_score(form.pass_score);
        draft.set_exam_date(parse_exam_date(form.exam_date.as_deref().unwrap_or_default())?);
        Ok(draft)
    }

    pub fn category(&self) -> QuizCategory {
        match self.scoring {
            Scoring::Auto { .. } => QuizCategory::OnlineAuto,
            Scoring::Manual { .. } => QuizCategory::OfflineManual,
        }
    }

    pub fn scoring(&self) -> &Scoring {
        &self.scoring
    }

    /// Switching to offline drops the selected questions and resets the pass
    /// score; switching back to online drops the manual total.
    pub fn set_category(&mut self, category: QuizCategory) {
        if self.category() == category {
            return;
        }
        self.scoring = Scoring::for_category(category);
        if category == QuizCategory::OfflineManual {
            self.pass_score = Some(0);
        }
    }

    pub fn questions(&self) -> &[SelectedQuestion] {
        match &self.scoring {
            Scoring::Auto { questions } => questions,
            Scoring::Manual { .. } => &[],
        }
    }

    /// Replaces the selected questions, keeping the first occurrence of
    /// each id. Offline quizzes carry no questions, so this is ignored there.
    pub fn select_questions(&mut self, selected: Vec<SelectedQuestion>) {
        let Scoring::Auto { questions } = &mut self.scoring else {
            tracing::debug!("Ignoring question selection for an offline quiz");
            return;
        };

        questions.clear();
        for q in selected {
            if !questions.iter().any(|existing| existing.id == q.id) {
                questions.push(q);
            }
        }
        self.clamp_pass_score();
    }

    pub fn remove_question(&mut self, id: i64) -> bool {
        let Scoring::Auto { questions } = &mut self.scoring else {
            return false;
        };
        let before = questions.len();
        questions.retain(|q| q.id != id);
        let removed = questions.len() != before;
        if removed {
            self.clamp_pass_score();
        }
        removed
    }

    /// Swaps the question at `index` with the one above it.
    pub fn move_up(&mut self, index: usize) -> bool {
        match &mut self.scoring {
            Scoring::Auto { questions } if index > 0 && index < questions.len() => {
                questions.swap(index - 1, index);
                true
            }
            _ => false,
        }
    }

    /// Swaps the question at `index` with the one below it.
    pub fn move_down(&mut self, index: usize) -> bool {
        match &mut self.scoring {
            Scoring::Auto { questions } if index.checked_add(1).is_some_and(|next| next < questions.len()) => {
                questions.swap(index, index + 1);
                true
            }
            _ => false,
        }
    }

    /// Online totals are derived, so this only affects offline quizzes.
    pub fn set_manual_total(&mut self, total: Option<i64>) {
        if let Scoring::Manual { total_score } = &mut self.scoring {
            *total_score = total;
        }
    }

    pub fn total_score(&self) -> Option<i64> {
        match &self.scoring {
            Scoring::Auto { questions } => Some(questions.iter().map(|q| q.score).sum()),
            Scoring::Manual { total_score } => *total_score,
        }
    }

    pub fn pass_score(&self) -> Option<i64> {
        self.pass_score
    }

    pub fn set_pass_score(&mut self, pass_score: Option<i64>) {
        self.pass_score = pass_score;
    }

    pub fn exam_date(&self) -> Option<NaiveDateTime> {
        self.exam_date
    }

    pub fn set_exam_date(&mut self, exam_date: Option<NaiveDateTime>) {
        self.exam_date = exam_date;
    }

    /// Keeps the pass score within the online total after the question set
    /// changes: 0 with no questions, the total when unset or above it.
    fn clamp_pass_score(&mut self) {
        let Scoring::Auto { questions } = &self.scoring else {
            return;
        };
        if questions.is_empty() {
            self.pass_score = Some(0);
            return;
        }
        let total: i64 = questions.iter().map(|q| q.score).sum();
        match self.pass_score {
            Some(pass) if pass <= total => {}
            _ => self.pass_score = Some(total),
        }
    }

    /// Checks every submission rule and builds the backend payload.
    pub fn validate(&self) -> Result<QuizPayload, ComposeError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ComposeError::EmptyTitle);
        }

        let (question_ids, total, total_score) = match &self.scoring {
            Scoring::Auto { questions } => {
                if questions.is_empty() {
                    return Err(ComposeError::NoQuestionsSelected);
                }
                let total: i64 = questions.iter().map(|q| q.score).sum();
                (questions.iter().map(|q| q.id).collect(), total, None)
            }
            Scoring::Manual { total_score } => match total_score {
                Some(total) if *total > 0 => (Vec::new(), *total, Some(*total)),
                _ => return Err(ComposeError::MissingTotalScore),
            },
        };

        let pass_score = self.pass_score.unwrap_or(0);
        if pass_score < 0 {
            return Err(ComposeError::NegativePassScore);
        }
        if pass_score > total {
            return Err(ComposeError::PassScoreExceedsTotal);
        }

        Ok(QuizPayload {
            title: title.to_string(),
            pass_score,
            question_ids,
            category: self.category(),
            total_score,
            exam_date: self.exam_date.map(|d| d.format(EXAM_DATE_FORMAT).to_string()),
        })
    }
}

/// Reads an optional exam date. Blank input means no date.
pub fn parse_exam_date(input: &str) -> Result<Option<NaiveDateTime>, ComposeError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }

    let parsed = NaiveDateTime::parse_from_str(input, EXAM_DATE_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M"))
        .or_else(|_| DateTime::parse_from_rfc3339(input).map(|d| d.naive_local()))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(input, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        });

    parsed.map(Some).ok_or(ComposeError::InvalidExamDate)
}
