use course_core::quiz::{QuizError, QuizProgress, QuizSession, SelectOutcome};
use course_core::scoring::{QuizResult, ReviewFilter};

use crate::vm::check_vm::OptionVm;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizIntent {
    Select { question: usize, option: usize },
    Submit,
    Reset,
    Next,
    Previous,
    GoTo(usize),
    ToggleFlag(usize),
    NextFlagged,
}

/// Apply one intent to a session.
///
/// Returns the result when this intent completed the quiz.
///
/// # Errors
///
/// Propagates the session's `QuizError` (locked answers, incomplete submit,
/// completed quiz, bad indices).
pub fn apply_quiz_intent(
    session: &mut QuizSession,
    intent: QuizIntent,
) -> Result<Option<QuizResult>, QuizError> {
    match intent {
        QuizIntent::Select { question, option } => match session.select(question, option)? {
            SelectOutcome::Recorded => Ok(None),
            SelectOutcome::Completed(result) => Ok(Some(result)),
        },
        QuizIntent::Submit => session.submit().map(Some),
        QuizIntent::Reset => {
            session.reset();
            Ok(None)
        }
        QuizIntent::Next => {
            session.next();
            Ok(None)
        }
        QuizIntent::Previous => {
            session.previous();
            Ok(None)
        }
        QuizIntent::GoTo(index) => session.go_to(index).map(|()| None),
        QuizIntent::ToggleFlag(index) => session.toggle_flag(index).map(|_| None),
        QuizIntent::NextFlagged => {
            session.next_flagged();
            Ok(None)
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizQuestionVm {
    pub index: usize,
    pub number: usize,
    pub prompt: String,
    pub options: Vec<OptionVm>,
    pub answered: bool,
    pub flagged: bool,
    /// Correctness, disclosed only once the quiz is completed.
    pub correct: Option<bool>,
    pub explanation: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizSummaryVm {
    pub score_label: String,
    pub percent_label: String,
    pub correct: usize,
    pub incorrect: usize,
    pub passed: Option<bool>,
}

impl QuizSummaryVm {
    #[must_use]
    pub fn new(result: QuizResult, pass_mark: Option<u8>) -> Self {
        Self {
            score_label: format!("{} / {}", result.score_count(), result.total()),
            percent_label: result
                .percentage()
                .map_or_else(|| "--".to_string(), |p| format!("{p}%")),
            correct: result.score_count(),
            incorrect: result.incorrect_count(),
            passed: pass_mark.map(|mark| result.passed(mark)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizVm {
    pub title: String,
    pub questions: Vec<QuizQuestionVm>,
    pub current: usize,
    pub progress: QuizProgress,
    pub progress_label: String,
    pub can_submit: bool,
    pub completed: bool,
    pub summary: Option<QuizSummaryVm>,
    /// Indices shown in review after completion, per the active filter.
    pub review: Vec<usize>,
    pub filter: ReviewFilter,
}

impl QuizVm {
    #[must_use]
    pub fn build(session: &QuizSession, filter: ReviewFilter, pass_mark: Option<u8>) -> Self {
        let completed = session.is_completed();
        let outcomes = session.outcomes().unwrap_or_default();
        let questions = session
            .bank()
            .iter()
            .enumerate()
            .map(|(index, question)| {
                let options = question
                    .options()
                    .iter()
                    .enumerate()
                    .map(|(option, label)| {
                        OptionVm::new(option, label, session.option_mark(index, option), completed)
                    })
                    .collect();
                let correct = outcomes.get(index).map(|outcome| outcome.is_correct);
                QuizQuestionVm {
                    index,
                    number: index + 1,
                    prompt: question.prompt().to_string(),
                    options,
                    answered: session.selection(index).is_some(),
                    flagged: session.is_flagged(index),
                    correct,
                    explanation: completed.then(|| question.explanation().to_string()),
                }
            })
            .collect();

        let progress = session.progress();
        Self {
            title: session.title().to_string(),
            questions,
            current: session.current(),
            progress,
            progress_label: format!("{} of {} answered", progress.answered, progress.total),
            can_submit: session.can_submit(),
            completed,
            summary: session
                .result()
                .map(|result| QuizSummaryVm::new(result, pass_mark)),
            review: session.review(filter),
            filter,
        }
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&QuizQuestionVm> {
        self.questions.get(self.current)
    }
}
