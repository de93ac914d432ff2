//! Shared error types for the services crate.

use std::path::PathBuf;

use thiserror::Error;

use course_core::model::{BankError, SectionError};
use course_core::quiz::QuizError;

/// Errors emitted while loading course content.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} is not valid content JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{path}: {source}")]
    Section {
        path: PathBuf,
        #[source]
        source: SectionError,
    },
    #[error("{path}: {source}")]
    Bank {
        path: PathBuf,
        #[source]
        source: BankError,
    },
    #[error("{path}: slug {slug:?} is already used by another file")]
    DuplicateSlug { path: PathBuf, slug: String },
}

/// Errors emitted by `ExamService`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExamError {
    #[error("exam size must be at least one question")]
    ZeroSize,
    #[error("pass mark must be between 0 and 100, got {provided}")]
    InvalidPassMark { provided: u8 },
    #[error("exam is still in progress")]
    NotCompleted,
    #[error(transparent)]
    Quiz(#[from] QuizError),
}
