//! Multi-question quiz: selection tracking, completion gating and scoring.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::model::{QuestionBank, QuestionRecord};
use crate::scoring::{self, OptionMark, QuestionOutcome, QuizResult, ReviewFilter};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("a quiz needs at least one question")]
    EmptyBank,

    #[error("question {index} is out of range for {len} questions")]
    QuestionOutOfRange { index: usize, len: usize },

    #[error("option {option} is out of range for question {question} ({len} options)")]
    OptionOutOfRange {
        question: usize,
        option: usize,
        len: usize,
    },

    #[error("question {question} is already answered and answers are locked")]
    AnswerLocked { question: usize },

    #[error("quiz already completed; reset to retake")]
    AlreadyCompleted,

    #[error("{unanswered} question(s) still unanswered")]
    Incomplete { unanswered: usize },
}

//
// ─── CONFIG ────────────────────────────────────────────────────────────────────
//

/// When a quiz moves from `InProgress` to `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Completion {
    /// The learner presses submit once every question is answered.
    #[default]
    OnSubmit,
    /// The last required selection completes the quiz immediately.
    OnLastAnswer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizConfig {
    pub completion: Completion,
    /// Whether an answered question may be changed before completion.
    pub allow_reselect: bool,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            completion: Completion::OnSubmit,
            allow_reselect: true,
        }
    }
}

impl QuizConfig {
    /// Each answer is final and the last answer completes the quiz.
    #[must_use]
    pub fn auto_complete() -> Self {
        Self {
            completion: Completion::OnLastAnswer,
            allow_reselect: false,
        }
    }
}

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuizPhase {
    #[default]
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    Recorded,
    Completed(QuizResult),
}

/// Counts shown in the progress bar while a quiz is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizProgress {
    pub total: usize,
    pub answered: usize,
    pub unanswered: usize,
    pub flagged: usize,
}

impl QuizProgress {
    /// Answered share as a whole percentage (rounded down).
    #[must_use]
    pub fn percent_answered(&self) -> usize {
        if self.total == 0 {
            0
        } else {
            self.answered * 100 / self.total
        }
    }
}

/// One quiz instance over a shared, read-only bank.
///
/// The session exclusively owns the selections, flags and navigation pointer.
/// The aggregate score is only available once every question has an answer
/// and the quiz has moved to `QuizPhase::Completed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSession {
    title: String,
    bank: QuestionBank,
    config: QuizConfig,
    selections: Vec<Option<usize>>,
    flagged: BTreeSet<usize>,
    current: usize,
    phase: QuizPhase,
}

impl QuizSession {
    /// Start a quiz over `bank`.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::EmptyBank` when the bank has no questions.
    pub fn new(
        title: impl Into<String>,
        bank: QuestionBank,
        config: QuizConfig,
    ) -> Result<Self, QuizError> {
        if bank.is_empty() {
            return Err(QuizError::EmptyBank);
        }
        let len = bank.len();
        Ok(Self {
            title: title.into(),
            bank,
            config,
            selections: vec![None; len],
            flagged: BTreeSet::new(),
            current: 0,
            phase: QuizPhase::InProgress,
        })
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    #[must_use]
    pub fn config(&self) -> QuizConfig {
        self.config
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.phase == QuizPhase::Completed
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bank.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bank.is_empty()
    }

    #[must_use]
    pub fn question(&self, index: usize) -> Option<&QuestionRecord> {
        self.bank.get(index)
    }

    #[must_use]
    pub fn selection(&self, index: usize) -> Option<usize> {
        self.selections.get(index).copied().flatten()
    }

    #[must_use]
    pub fn selections(&self) -> &[Option<usize>] {
        &self.selections
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.selections.iter().filter(|s| s.is_some()).count()
    }

    /// Indices of questions without an answer, in order.
    #[must_use]
    pub fn unanswered(&self) -> Vec<usize> {
        self.selections
            .iter()
            .enumerate()
            .filter_map(|(index, selection)| selection.is_none().then_some(index))
            .collect()
    }

    #[must_use]
    pub fn all_answered(&self) -> bool {
        self.selections.iter().all(Option::is_some)
    }

    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.is_completed() && self.all_answered()
    }

    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        let answered = self.answered_count();
        QuizProgress {
            total: self.len(),
            answered,
            unanswered: self.len() - answered,
            flagged: self.flagged.len(),
        }
    }

    /// Record `option` for question `question`.
    ///
    /// With `Completion::OnLastAnswer` the answer that fills the last gap
    /// completes the quiz and returns the result.
    ///
    /// # Errors
    ///
    /// - `QuizError::AlreadyCompleted` once the quiz is completed
    /// - `QuizError::QuestionOutOfRange` / `QuizError::OptionOutOfRange` for bad indices
    /// - `QuizError::AnswerLocked` when reselection is disabled
    pub fn select(&mut self, question: usize, option: usize) -> Result<SelectOutcome, QuizError> {
        if self.is_completed() {
            return Err(QuizError::AlreadyCompleted);
        }
        let record = self.bank.get(question).ok_or(QuizError::QuestionOutOfRange {
            index: question,
            len: self.bank.len(),
        })?;
        if option >= record.option_count() {
            return Err(QuizError::OptionOutOfRange {
                question,
                option,
                len: record.option_count(),
            });
        }
        if !self.config.allow_reselect && self.selections[question].is_some() {
            return Err(QuizError::AnswerLocked { question });
        }

        self.selections[question] = Some(option);
        log::debug!("quiz {:?}: question {question} -> option {option}", self.title);

        if self.config.completion == Completion::OnLastAnswer && self.all_answered() {
            return Ok(SelectOutcome::Completed(self.complete()));
        }
        Ok(SelectOutcome::Recorded)
    }

    /// Select an option on the current question.
    ///
    /// # Errors
    ///
    /// Same as `select`.
    pub fn select_current(&mut self, option: usize) -> Result<SelectOutcome, QuizError> {
        self.select(self.current, option)
    }

    /// Complete the quiz and return the score.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::AlreadyCompleted` if already completed and
    /// `QuizError::Incomplete` while any question is unanswered.
    pub fn submit(&mut self) -> Result<QuizResult, QuizError> {
        if self.is_completed() {
            return Err(QuizError::AlreadyCompleted);
        }
        let unanswered = self.len() - self.answered_count();
        if unanswered > 0 {
            return Err(QuizError::Incomplete { unanswered });
        }
        Ok(self.complete())
    }

    fn complete(&mut self) -> QuizResult {
        self.phase = QuizPhase::Completed;
        let result = scoring::score(self.bank.questions(), &self.selections);
        log::debug!("quiz {:?} completed: {result}", self.title);
        result
    }

    /// Clear every selection and flag and return to the first question.
    pub fn reset(&mut self) {
        self.selections = vec![None; self.bank.len()];
        self.flagged.clear();
        self.current = 0;
        self.phase = QuizPhase::InProgress;
        log::debug!("quiz {:?} reset", self.title);
    }

    /// The aggregate score; `None` until the quiz is completed.
    #[must_use]
    pub fn result(&self) -> Option<QuizResult> {
        self.is_completed()
            .then(|| scoring::score(self.bank.questions(), &self.selections))
    }

    /// Per-question feedback; `None` until the quiz is completed.
    #[must_use]
    pub fn outcomes(&self) -> Option<Vec<QuestionOutcome>> {
        self.is_completed()
            .then(|| scoring::outcomes(self.bank.questions(), &self.selections))
    }

    /// Question indices matching `filter` in a completed quiz.
    #[must_use]
    pub fn review(&self, filter: ReviewFilter) -> Vec<usize> {
        self.outcomes()
            .unwrap_or_default()
            .iter()
            .filter(|outcome| filter.matches(outcome, self.flagged.contains(&outcome.index)))
            .map(|outcome| outcome.index)
            .collect()
    }

    /// Mark for one option, disclosing correctness only after completion.
    #[must_use]
    pub fn option_mark(&self, question: usize, option: usize) -> OptionMark {
        let correct_index = self
            .bank
            .get(question)
            .map_or(usize::MAX, QuestionRecord::correct_index);
        OptionMark::for_option(
            option,
            correct_index,
            self.selection(question),
            self.is_completed(),
        )
    }

    // ─── Navigation ────────────────────────────────────────────────────────

    #[must_use]
    pub fn current(&self) -> usize {
        self.current
    }

    /// # Errors
    ///
    /// Returns `QuizError::QuestionOutOfRange` for an index past the end.
    pub fn go_to(&mut self, index: usize) -> Result<(), QuizError> {
        if index >= self.len() {
            return Err(QuizError::QuestionOutOfRange {
                index,
                len: self.len(),
            });
        }
        self.current = index;
        Ok(())
    }

    /// Move forward; returns false on the last question.
    pub fn next(&mut self) -> bool {
        if self.current + 1 < self.len() {
            self.current += 1;
            true
        } else {
            false
        }
    }

    /// Move back; returns false on the first question.
    pub fn previous(&mut self) -> bool {
        if self.current > 0 {
            self.current -= 1;
            true
        } else {
            false
        }
    }

    // ─── Flags ─────────────────────────────────────────────────────────────

    /// Toggle the review flag on a question; returns the new flag state.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::QuestionOutOfRange` for an index past the end.
    pub fn toggle_flag(&mut self, index: usize) -> Result<bool, QuizError> {
        if index >= self.len() {
            return Err(QuizError::QuestionOutOfRange {
                index,
                len: self.len(),
            });
        }
        if self.flagged.remove(&index) {
            Ok(false)
        } else {
            self.flagged.insert(index);
            Ok(true)
        }
    }

    #[must_use]
    pub fn is_flagged(&self, index: usize) -> bool {
        self.flagged.contains(&index)
    }

    #[must_use]
    pub fn flagged(&self) -> Vec<usize> {
        self.flagged.iter().copied().collect()
    }

    /// Jump to the next flagged question after the current one, wrapping to
    /// the first flag. Returns the new position, or `None` with no flags.
    pub fn next_flagged(&mut self) -> Option<usize> {
        let target = self
            .flagged
            .range(self.current + 1..)
            .next()
            .or_else(|| self.flagged.iter().next())
            .copied()?;
        self.current = target;
        Some(target)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
