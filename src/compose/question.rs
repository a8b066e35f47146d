// src/compose/question.rs

use std::collections::HashSet;

use super::ComposeError;
use crate::models::question::{QuestionDetail, QuestionForm, QuestionOption, QuestionPayload, QuestionType};

pub const TRUE_VALUE: &str = "TRUE";
pub const FALSE_VALUE: &str = "FALSE";

const OPTION_ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// The two implied options of a true/false question.
pub fn true_false_options() -> [QuestionOption; 2] {
    [
        QuestionOption::new(TRUE_VALUE, "正确"),
        QuestionOption::new(FALSE_VALUE, "错误"),
    ]
}

/// `A`..`Z`, then `OPTION_27`, `OPTION_28`, ...
pub fn default_option_value(index: usize) -> String {
    match OPTION_ALPHABET.chars().nth(index) {
        Some(letter) => letter.to_string(),
        None => format!("OPTION_{:02}", index + 1),
    }
}

/// `count` options with default values and empty labels.
pub fn default_options(count: usize) -> Vec<QuestionOption> {
    (0..count)
        .map(|i| QuestionOption::new(default_option_value(i), ""))
        .collect()
}

/// Type-specific state of a question under edit.
///
/// Each variant carries what its type allows; true/false has no
/// user-defined options.
#[derive(Debug, Clone, PartialEq)]
pub enum Choices {
    Single {
        options: Vec<QuestionOption>,
        answer: Vec<String>,
    },
    Multiple {
        options: Vec<QuestionOption>,
        answer: Vec<String>,
    },
    TrueFalse {
        answer: Vec<String>,
    },
}

impl Choices {
    pub fn question_type(&self) -> QuestionType {
        match self {
            Choices::Single { .. } => QuestionType::Single,
            Choices::Multiple { .. } => QuestionType::Multiple,
            Choices::TrueFalse { .. } => QuestionType::TrueFalse,
        }
    }

    pub fn options(&self) -> &[QuestionOption] {
        match self {
            Choices::Single { options, .. } | Choices::Multiple { options, .. } => options,
            Choices::TrueFalse { .. } => &[],
        }
    }

    pub fn answer(&self) -> &[String] {
        match self {
            Choices::Single { answer, .. }
            | Choices::Multiple { answer, .. }
            | Choices::TrueFalse { answer } => answer,
        }
    }

    fn into_parts(self) -> (Vec<QuestionOption>, Vec<String>) {
        match self {
            Choices::Single { options, answer } | Choices::Multiple { options, answer } => (options, answer),
            Choices::TrueFalse { answer } => (Vec::new(), answer),
        }
    }

    /// Re-derives a type-valid answer set from the current options.
    fn reconcile(self) -> Self {
        match self {
            Choices::Single { options, answer } => reconcile_single(options, answer),
            Choices::Multiple { options, answer } => reconcile_multiple(options, answer),
            Choices::TrueFalse { answer } => reconcile_true_false(answer),
        }
    }
}

/// Keeps a single answer that still names an option, else picks the first option.
fn reconcile_single(options: Vec<QuestionOption>, answer: Vec<String>) -> Choices {
    let still_valid = answer.len() == 1 && options.iter().any(|o| o.value == answer[0]);
    let answer = if still_valid {
        answer
    } else {
        options.first().map(|o| vec![o.value.clone()]).unwrap_or_default()
    };
    Choices::Single { options, answer }
}

/// Drops answers whose option no longer exists; may leave nothing selected.
fn reconcile_multiple(options: Vec<QuestionOption>, mut answer: Vec<String>) -> Choices {
    answer.retain(|v| options.iter().any(|o| &o.value == v));
    Choices::Multiple { options, answer }
}

fn reconcile_true_false(answer: Vec<String>) -> Choices {
    let still_valid = answer.len() == 1 && (answer[0] == TRUE_VALUE || answer[0] == FALSE_VALUE);
    let answer = if still_valid {
        answer
    } else {
        vec![TRUE_VALUE.to_string()]
    };
    Choices::TrueFalse { answer }
}

/// A question being authored in the console.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionDraft {
    pub content: String,
    pub score: i64,
    choices: Choices,
}

impl Default for QuestionDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl QuestionDraft {
    /// Fresh single-choice question with options `A` and `B`.
    pub fn new() -> Self {
        Self {
            content: String::new(),
            score: 0,
            choices: Choices::Single {
                options: default_options(2),
                answer: Vec::new(),
            }
            .reconcile(),
        }
    }

    /// Opens an existing question for editing.
    pub fn edit(detail: QuestionDetail) -> Self {
        let choices = match detail.question_type {
            QuestionType::Single => Choices::Single {
                options: detail.options,
                answer: detail.answer,
            },
            QuestionType::Multiple => Choices::Multiple {
                options: detail.options,
                answer: detail.answer,
            },
            QuestionType::TrueFalse => Choices::TrueFalse { answer: detail.answer },
        };

        Self {
            content: detail.content,
            score: detail.score,
            choices: choices.reconcile(),
        }
    }

    /// Takes a submitted form as-is, without repairing the answer set, so
    /// that `validate` judges exactly what the admin sent.
    pub fn from_form(form: QuestionForm) -> Self {
        let choices = match form.question_type {
            QuestionType::Single => Choices::Single {
                options: form.options,
                answer: form.answer,
            },
            QuestionType::Multiple => Choices::Multiple {
                options: form.options,
                answer: form.answer,
            },
            QuestionType::TrueFalse => Choices::TrueFalse { answer: form.answer },
        };

        Self {
            content: form.content,
            score: form.score,
            choices,
        }
    }

    pub fn to_form(&self) -> QuestionForm {
        QuestionForm {
            question_type: self.question_type(),
            content: self.content.clone(),
            score: self.score,
            options: self.options().to_vec(),
            answer: self.answer().to_vec(),
        }
    }

    pub fn question_type(&self) -> QuestionType {
        self.choices.question_type()
    }

    pub fn choices(&self) -> &Choices {
        &self.choices
    }

    pub fn options(&self) -> &[QuestionOption] {
        self.choices.options()
    }

    pub fn answer(&self) -> &[String] {
        self.choices.answer()
    }

    /// Options the answer may be picked from, including the implied
    /// true/false pair.
    pub fn answer_options(&self) -> Vec<QuestionOption> {
        match &self.choices {
            Choices::TrueFalse { .. } => true_false_options().to_vec(),
            _ => self.options().to_vec(),
        }
    }

    /// Switches the question type.
    ///
    /// True/false drops user-defined options. Leaving true/false restores
    /// two default options when none exist. The answer set is then
    /// reconciled for the new type.
    pub fn change_type(&mut self, to: QuestionType) {
        let current = std::mem::replace(&mut self.choices, Choices::TrueFalse { answer: Vec::new() });
        let (options, answer) = current.into_parts();
        let options = if options.is_empty() { default_options(2) } else { options };

        let next = match to {
            QuestionType::Single => Choices::Single { options, answer },
            QuestionType::Multiple => Choices::Multiple { options, answer },
            QuestionType::TrueFalse => Choices::TrueFalse { answer },
        };
        self.choices = next.reconcile();
    }

    /// Appends an option with the next free default value.
    pub fn add_option(&mut self) -> Result<&QuestionOption, ComposeError> {
        let options = self.options_mut()?;
        let value = (options.len()..)
            .map(default_option_value)
            .find(|v| options.iter().all(|o| &o.value != v))
            .unwrap_or_default();
        options.push(QuestionOption::new(value, ""));
        self.reconcile();

        self.options().last().ok_or(ComposeError::TooFewOptions)
    }

    /// Removes an option (and its answer selection). At least two options
    /// always remain.
    pub fn remove_option(&mut self, value: &str) -> Result<(), ComposeError> {
        let options = self.options_mut()?;
        if !options.iter().any(|o| o.value == value) {
            return Err(ComposeError::UnknownOption(value.to_string()));
        }
        if options.len() <= 2 {
            return Err(ComposeError::TooFewOptions);
        }
        options.retain(|o| o.value != value);

        if let Choices::Single { answer, .. } | Choices::Multiple { answer, .. } = &mut self.choices {
            answer.retain(|a| a != value);
        }
        self.reconcile();
        Ok(())
    }

    pub fn set_option_label(&mut self, value: &str, label: impl Into<String>) -> Result<(), ComposeError> {
        let option = self
            .options_mut()?
            .iter_mut()
            .find(|o| o.value == value)
            .ok_or_else(|| ComposeError::UnknownOption(value.to_string()))?;
        option.label = label.into();
        Ok(())
    }

    /// Replaces the selected answers. Not reconciled: validation decides.
    pub fn set_answer(&mut self, values: Vec<String>) {
        match &mut self.choices {
            Choices::Single { answer, .. } | Choices::Multiple { answer, .. } | Choices::TrueFalse { answer } => {
                *answer = values;
            }
        }
    }

    fn options_mut(&mut self) -> Result<&mut Vec<QuestionOption>, ComposeError> {
        match &mut self.choices {
            Choices::Single { options, .. } | Choices::Multiple { options, .. } => Ok(options),
            Choices::TrueFalse { .. } => Err(ComposeError::FixedOptions),
        }
    }

    fn reconcile(&mut self) {
        let current = std::mem::replace(&mut self.choices, Choices::TrueFalse { answer: Vec::new() });
        self.choices = current.reconcile();
    }

    /// Checks every submission rule and builds the backend payload.
    pub fn validate(&self) -> Result<QuestionPayload, ComposeError> {
        let content = self.content.trim();
        if content.is_empty() {
            return Err(ComposeError::EmptyContent);
        }
        if self.score <= 0 {
            return Err(ComposeError::NonPositiveScore);
        }

        let answer = self.answer();
        match self.question_type() {
            QuestionType::Single | QuestionType::TrueFalse if answer.len() != 1 => {
                return Err(ComposeError::AnswerRequired);
            }
            QuestionType::Multiple if answer.is_empty() => {
                return Err(ComposeError::NoAnswerSelected);
            }
            _ => {}
        }

        let options = match &self.choices {
            Choices::TrueFalse { .. } => {
                if answer.iter().any(|a| a != TRUE_VALUE && a != FALSE_VALUE) {
                    return Err(ComposeError::UndefinedAnswer);
                }
                None
            }
            Choices::Single { options, .. } | Choices::Multiple { options, .. } => {
                Some(normalize_options(options, answer)?)
            }
        };

        Ok(QuestionPayload {
            question_type: self.question_type(),
            content: content.to_string(),
            options,
            answer: answer.to_vec(),
            score: self.score,
        })
    }
}

/// Trims option values and labels and checks them against the answer set.
fn normalize_options(options: &[QuestionOption], answer: &[String]) -> Result<Vec<QuestionOption>, ComposeError> {
    if options.len() < 2 {
        return Err(ComposeError::TooFewOptions);
    }

    let refined: Vec<QuestionOption> = options
        .iter()
        .map(|o| QuestionOption::new(o.value.trim(), o.label.trim()))
        .collect();
    if refined.iter().any(|o| o.value.is_empty() || o.label.is_empty()) {
        return Err(ComposeError::EmptyOption);
    }

    let distinct: HashSet<&str> = refined.iter().map(|o| o.value.as_str()).collect();
    if distinct.len() != refined.len() {
        return Err(ComposeError::DuplicateOptionValue);
    }

    if !answer.iter().all(|a| distinct.contains(a.as_str())) {
        return Err(ComposeError::UndefinedAnswer);
    }

    Ok(refined)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labelled(draft: &mut QuestionDraft) {
        let values: Vec<String> = draft.options().iter().map(|o| o.value.clone()).collect();
        for v in values {
            draft.set_option_label(&v, format!("Option {}", v)).unwrap();
        }
    }

    fn single_ab() -> QuestionDraft {
        let mut draft = QuestionDraft::new();
        draft.content = "Which extinguisher for electrical fires?".to_string();
        draft.score = 10;
        labelled(&mut draft);
        draft.set_answer(vec!["A".to_string()]);
        draft
    }

    #[test]
    fn default_values_run_through_alphabet_then_suffix() {
        assert_eq!(default_option_value(0), "A");
        assert_eq!(default_option_value(25), "Z");
        assert_eq!(default_option_value(26), "OPTION_27");
        assert_eq!(default_option_value(99), "OPTION_100");
    }

    #[test]
    fn new_draft_is_single_with_first_option_selected() {
        let draft = QuestionDraft::new();
        assert_eq!(draft.question_type(), QuestionType::Single);
        assert_eq!(draft.options().len(), 2);
        assert_eq!(draft.answer(), ["A".to_string()]);
    }

    #[test]
    fn single_question_with_one_answer_is_accepted() {
        let payload = single_ab().validate().unwrap();
        assert_eq!(payload.question_type, QuestionType::Single);
        assert_eq!(payload.answer, vec!["A".to_string()]);
        assert_eq!(payload.score, 10);
        assert_eq!(payload.options.unwrap().len(), 2);
    }

    #[test]
    fn switching_to_multiple_and_clearing_answer_is_rejected() {
        let mut draft = single_ab();
        draft.change_type(QuestionType::Multiple);
        assert_eq!(draft.options().len(), 2);
        assert_eq!(draft.answer(), ["A".to_string()]);

        draft.set_answer(Vec::new());
        assert_eq!(draft.validate(), Err(ComposeError::NoAnswerSelected));
        assert_eq!(
            ComposeError::NoAnswerSelected.to_string(),
            "Please select at least one correct answer."
        );
    }

    #[test]
    fn single_and_true_false_need_exactly_one_answer() {
        let mut draft = single_ab();
        draft.set_answer(Vec::new());
        assert_eq!(draft.validate(), Err(ComposeError::AnswerRequired));
        draft.set_answer(vec!["A".to_string(), "B".to_string()]);
        assert_eq!(draft.validate(), Err(ComposeError::AnswerRequired));

        draft.change_type(QuestionType::TrueFalse);
        draft.set_answer(Vec::new());
        assert_eq!(draft.validate(), Err(ComposeError::AnswerRequired));
        draft.set_answer(vec![TRUE_VALUE.to_string(), FALSE_VALUE.to_string()]);
        assert_eq!(draft.validate(), Err(ComposeError::AnswerRequired));
    }

    #[test]
    fn true_false_clears_options_and_defaults_answer() {
        let mut draft = single_ab();
        draft.change_type(QuestionType::TrueFalse);
        assert!(draft.options().is_empty());
        assert_eq!(draft.answer(), [TRUE_VALUE.to_string()]);
        assert_eq!(draft.answer_options().len(), 2);

        let payload = draft.validate().unwrap();
        assert!(payload.options.is_none());
        assert_eq!(payload.answer, vec![TRUE_VALUE.to_string()]);
    }

    #[test]
    fn true_false_keeps_a_valid_answer() {
        let mut draft = single_ab();
        draft.change_type(QuestionType::TrueFalse);
        draft.set_answer(vec![FALSE_VALUE.to_string()]);
        draft.change_type(QuestionType::TrueFalse);
        assert_eq!(draft.answer(), [FALSE_VALUE.to_string()]);
    }

    #[test]
    fn leaving_true_false_restores_two_default_options() {
        let mut draft = single_ab();
        draft.change_type(QuestionType::TrueFalse);
        draft.change_type(QuestionType::Single);
        assert_eq!(draft.options(), default_options(2).as_slice());
        assert_eq!(draft.answer(), ["A".to_string()]);

        draft.change_type(QuestionType::TrueFalse);
        draft.change_type(QuestionType::Multiple);
        assert_eq!(draft.options().len(), 2);
        assert!(draft.answer().is_empty());
    }

    #[test]
    fn single_falls_back_to_first_option_when_answer_vanishes() {
        let mut draft = single_ab();
        draft.add_option().unwrap();
        draft.set_answer(vec!["C".to_string()]);
        draft.remove_option("C").unwrap();
        assert_eq!(draft.answer(), ["A".to_string()]);
    }

    #[test]
    fn multiple_filters_answers_of_removed_options() {
        let mut draft = single_ab();
        draft.change_type(QuestionType::Multiple);
        draft.add_option().unwrap();
        draft.set_answer(vec!["A".to_string(), "C".to_string()]);
        draft.remove_option("C").unwrap();
        assert_eq!(draft.answer(), ["A".to_string()]);
    }

    #[test]
    fn cannot_drop_below_two_options() {
        let mut draft = single_ab();
        assert_eq!(draft.remove_option("B"), Err(ComposeError::TooFewOptions));
        assert_eq!(draft.remove_option("Q"), Err(ComposeError::UnknownOption("Q".to_string())));
    }

    #[test]
    fn added_option_skips_taken_values() {
        let mut draft = single_ab();
        draft.add_option().unwrap();
        draft.add_option().unwrap();
        draft.remove_option("C").unwrap();
        let added = draft.add_option().unwrap().value.clone();
        assert_eq!(added, "E");
    }

    #[test]
    fn true_false_has_fixed_options() {
        let mut draft = single_ab();
        draft.change_type(QuestionType::TrueFalse);
        assert_eq!(draft.add_option().err(), Some(ComposeError::FixedOptions));
    }

    #[test]
    fn content_and_score_are_checked_first() {
        let mut draft = single_ab();
        draft.content = "   ".to_string();
        assert_eq!(draft.validate(), Err(ComposeError::EmptyContent));

        let mut draft = single_ab();
        draft.score = 0;
        assert_eq!(draft.validate(), Err(ComposeError::NonPositiveScore));
    }

    #[test]
    fn option_rules() {
        let form = |options: Vec<QuestionOption>, answer: &[&str]| {
            QuestionDraft::from_form(QuestionForm {
                question_type: QuestionType::Multiple,
                content: "Pick".to_string(),
                score: 5,
                options,
                answer: answer.iter().map(|s| s.to_string()).collect(),
            })
        };

        let one = form(vec![QuestionOption::new("A", "x")], &["A"]);
        assert_eq!(one.validate(), Err(ComposeError::TooFewOptions));

        let blank_label = form(
            vec![QuestionOption::new("A", "x"), QuestionOption::new("B", "  ")],
            &["A"],
        );
        assert_eq!(blank_label.validate(), Err(ComposeError::EmptyOption));

        let duplicate = form(
            vec![QuestionOption::new("A", "x"), QuestionOption::new(" A ", "y")],
            &["A"],
        );
        assert_eq!(duplicate.validate(), Err(ComposeError::DuplicateOptionValue));

        let undefined = form(
            vec![QuestionOption::new("A", "x"), QuestionOption::new("B", "y")],
            &["A", "Z"],
        );
        assert_eq!(undefined.validate(), Err(ComposeError::UndefinedAnswer));

        let ok = form(
            vec![QuestionOption::new(" A", " x "), QuestionOption::new("B", "y")],
            &["A", "B"],
        );
        let payload = ok.validate().unwrap();
        assert_eq!(
            payload.options.unwrap(),
            vec![QuestionOption::new("A", "x"), QuestionOption::new("B", "y")]
        );
    }

    #[test]
    fn editing_existing_true_false_ignores_stored_options() {
        let draft = QuestionDraft::edit(QuestionDetail {
            id: 3,
            question_type: QuestionType::TrueFalse,
            content: "The sky is blue".to_string(),
            score: 2,
            options: vec![QuestionOption::new("X", "y")],
            answer: vec![FALSE_VALUE.to_string()],
        });
        assert!(draft.options().is_empty());
        assert_eq!(draft.answer(), [FALSE_VALUE.to_string()]);
    }
}
