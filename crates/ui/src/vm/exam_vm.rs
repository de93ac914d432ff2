use course_core::scoring::ReviewFilter;
use services::ExamReport;

use crate::vm::quiz_vm::{QuizIntent, QuizSummaryVm};
use crate::vm::time_fmt::{format_datetime, format_elapsed};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExamIntent {
    Start,
    Quiz(QuizIntent),
    Filter(ReviewFilter),
    Retake,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExamReportVm {
    pub summary: QuizSummaryVm,
    pub verdict: &'static str,
    pub passed: bool,
    pub pass_mark_label: String,
    pub elapsed_label: String,
    pub started_label: String,
}

impl From<&ExamReport> for ExamReportVm {
    fn from(report: &ExamReport) -> Self {
        let passed = report.passed();
        Self {
            summary: QuizSummaryVm::new(report.result, Some(report.pass_mark)),
            verdict: if passed { "Pass" } else { "Not yet" },
            passed,
            pass_mark_label: format!("Pass mark {}%", report.pass_mark),
            elapsed_label: format_elapsed(report.elapsed),
            started_label: format_datetime(report.started_at),
        }
    }
}
