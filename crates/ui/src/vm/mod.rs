mod check_vm;
mod exam_vm;
mod prose_vm;
mod quiz_vm;
mod section_vm;
mod time_fmt;

pub use check_vm::{CheckIntent, CheckVm, FeedbackVm, OptionVm, option_letter};
pub use exam_vm::{ExamIntent, ExamReportVm};
pub use prose_vm::{prose_to_html, sanitize_prose};
pub use quiz_vm::{QuizIntent, QuizQuestionVm, QuizSummaryVm, QuizVm, apply_quiz_intent};
pub use section_vm::{
    BlockVm, CatalogEntryVm, CatalogVm, ExamEntryVm, FaqVm, QuizSlotVm, SectionVm, map_catalog,
    map_section,
};
pub use time_fmt::{format_datetime, format_elapsed};
