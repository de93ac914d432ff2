//! Single-question knowledge check with immediate feedback.

use thiserror::Error;

use crate::model::QuestionRecord;
use crate::scoring::OptionMark;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CheckError {
    #[error("check already answered with option {selected}")]
    AlreadyAnswered { selected: usize },

    #[error("option {index} is out of range for {len} options")]
    OptionOutOfRange { index: usize, len: usize },
}

/// Lifecycle of one inline check.
///
/// `Unanswered → Answered` is the only transition; the first choice is final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckState {
    #[default]
    Unanswered,
    Answered { selected: usize, is_correct: bool },
}

impl CheckState {
    /// Apply a selection. Pure: returns the next state without mutating `self`.
    ///
    /// # Errors
    ///
    /// Returns `CheckError::AlreadyAnswered` after the first selection and
    /// `CheckError::OptionOutOfRange` for an index the question does not offer.
    pub fn select(self, question: &QuestionRecord, index: usize) -> Result<Self, CheckError> {
        if let CheckState::Answered { selected, .. } = self {
            return Err(CheckError::AlreadyAnswered { selected });
        }
        if index >= question.option_count() {
            return Err(CheckError::OptionOutOfRange {
                index,
                len: question.option_count(),
            });
        }
        Ok(CheckState::Answered {
            selected: index,
            is_correct: question.is_correct(index),
        })
    }

    #[must_use]
    pub fn selected(self) -> Option<usize> {
        match self {
            CheckState::Unanswered => None,
            CheckState::Answered { selected, .. } => Some(selected),
        }
    }

    #[must_use]
    pub fn is_answered(self) -> bool {
        matches!(self, CheckState::Answered { .. })
    }

    #[must_use]
    pub fn is_correct(self) -> Option<bool> {
        match self {
            CheckState::Unanswered => None,
            CheckState::Answered { is_correct, .. } => Some(is_correct),
        }
    }
}

/// One rendered inline check: the question plus its ephemeral state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineCheckSession {
    question: QuestionRecord,
    state: CheckState,
}

impl InlineCheckSession {
    #[must_use]
    pub fn new(question: QuestionRecord) -> Self {
        Self {
            question,
            state: CheckState::Unanswered,
        }
    }

    #[must_use]
    pub fn question(&self) -> &QuestionRecord {
        &self.question
    }

    #[must_use]
    pub fn state(&self) -> CheckState {
        self.state
    }

    /// Record the learner's choice.
    ///
    /// # Errors
    ///
    /// Propagates `CheckError` from the state transition; the state is left
    /// unchanged on error.
    pub fn select(&mut self, index: usize) -> Result<CheckState, CheckError> {
        let next = self.state.select(&self.question, index)?;
        log::debug!(
            "inline check {} answered with option {index} (correct: {})",
            self.question.id(),
            self.question.is_correct(index)
        );
        self.state = next;
        Ok(next)
    }

    /// The explanation, once an answer has been chosen.
    #[must_use]
    pub fn revealed_explanation(&self) -> Option<&str> {
        self.state
            .is_answered()
            .then(|| self.question.explanation())
    }

    #[must_use]
    pub fn option_mark(&self, option: usize) -> OptionMark {
        OptionMark::for_option(
            option,
            self.question.correct_index(),
            self.state.selected(),
            self.state.is_answered(),
        )
    }
}
