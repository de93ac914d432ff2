mod bank;
mod ids;
mod question;
mod section;

pub use bank::{BankError, BankExpectations, BankIssue, BankReport, QuestionBank, ShareRange};
pub use ids::{ParseIdError, QuestionId, SectionSlug};
pub use question::{Difficulty, QuestionDraft, QuestionEntry, QuestionError, QuestionRecord};
pub use section::{
    Assessment, BlockDraft, ContentBlock, CourseSection, Faq, QuizDraft, QuizSpec, SectionDraft,
    SectionError, SectionProblem,
};
