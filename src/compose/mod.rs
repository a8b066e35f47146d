// src/compose/mod.rs

//! Question and quiz editors: the consistency rules checked before anything
//! is sent to the backend.

pub mod question;
pub mod quiz;

use thiserror::Error;

pub use question::{Choices, QuestionDraft};
pub use quiz::{QuizDraft, Scoring, SelectedQuestion};

/// A rule violation that blocks submission. The message is shown as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComposeError {
    #[error("Please enter the question content.")]
    EmptyContent,

    #[error("Question score must be greater than 0.")]
    NonPositiveScore,

    #[error("Please select the correct answer.")]
    AnswerRequired,

    #[error("Please select at least one correct answer.")]
    NoAnswerSelected,

    #[error("Please set at least two options.")]
    TooFewOptions,

    #[error("Option content must not be empty.")]
    EmptyOption,

    #[error("Option values must be unique.")]
    DuplicateOptionValue,

    #[error("The answer references an undefined option.")]
    UndefinedAnswer,

    #[error("True/false questions have fixed options.")]
    FixedOptions,

    #[error("No option {0}.")]
    UnknownOption(String),

    #[error("Please enter the quiz title.")]
    EmptyTitle,

    #[error("Please select at least one question.")]
    NoQuestionsSelected,

    #[error("Pass score must not be negative.")]
    NegativePassScore,

    #[error("Please enter the offline exam total score.")]
    MissingTotalScore,

    #[error("Pass score must not exceed the total score.")]
    PassScoreExceedsTotal,

    #[error("Exam date must look like YYYY-MM-DD HH:MM:SS.")]
    InvalidExamDate,
}
