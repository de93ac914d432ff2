use thiserror::Error;

use crate::check::CheckError;
use crate::model::{BankError, QuestionError, SectionError};
use crate::quiz::QuizError;

/// Configuration mistake that keeps one assessment from rendering.
///
/// These are authoring bugs, not user errors: the UI shows a placeholder for
/// the affected check or quiz and leaves the rest of the page alone.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthoringError {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Bank(#[from] BankError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Authoring(#[from] AuthoringError),
    #[error(transparent)]
    Section(#[from] SectionError),
    #[error(transparent)]
    Check(#[from] CheckError),
}
