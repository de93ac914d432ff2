mod authoring_error;
mod inline_check;
mod quiz;

pub use authoring_error::AuthoringErrorNotice;
pub use inline_check::InlineCheck;
pub use quiz::{QuestionCard, Quiz};

#[cfg(test)]
pub(crate) use inline_check::CheckTestHandles;
