#![forbid(unsafe_code)]

pub mod check;
pub mod error;
pub mod model;
pub mod quiz;
pub mod scoring;
pub mod time;

pub use check::{CheckError, CheckState, InlineCheckSession};
pub use error::{AuthoringError, Error};
pub use quiz::{
    Completion, QuizConfig, QuizError, QuizPhase, QuizProgress, QuizSession, SelectOutcome,
};
pub use scoring::{OptionMark, QuestionOutcome, QuizResult, ReviewFilter};
pub use time::Clock;
