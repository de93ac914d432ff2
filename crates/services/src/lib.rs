#![forbid(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod exam_service;
pub mod sampler;

pub use course_core::Clock;

pub use catalog::{CatalogProblem, CourseCatalog, ExamBank, ExamBankDraft};
pub use error::{CatalogError, ExamError};
pub use exam_service::{ExamAttempt, ExamReport, ExamService};
pub use sampler::{DifficultyMix, sample_questions};
