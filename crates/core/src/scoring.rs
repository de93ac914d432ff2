//! Pure scoring over a question bank and a snapshot of selections.
//!
//! Nothing here caches: results are recomputed from the selections each time,
//! so scoring the same snapshot twice always yields the same value.

use std::fmt;

use crate::model::QuestionRecord;

/// Aggregate score of a completed quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QuizResult {
    score_count: usize,
    total: usize,
}

impl QuizResult {
    #[must_use]
    pub fn new(score_count: usize, total: usize) -> Self {
        debug_assert!(score_count <= total);
        Self { score_count, total }
    }

    #[must_use]
    pub fn score_count(&self) -> usize {
        self.score_count
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    #[must_use]
    pub fn incorrect_count(&self) -> usize {
        self.total - self.score_count
    }

    /// Score as a whole percentage, rounded half up. `None` for an empty quiz.
    #[must_use]
    pub fn percentage(&self) -> Option<u8> {
        if self.total == 0 {
            return None;
        }
        let rounded = (self.score_count * 200 + self.total) / (2 * self.total);
        u8::try_from(rounded).ok()
    }

    /// True when the percentage reaches `pass_mark` (0-100).
    #[must_use]
    pub fn passed(&self, pass_mark: u8) -> bool {
        self.percentage().is_some_and(|percent| percent >= pass_mark)
    }

    #[must_use]
    pub fn is_perfect(&self) -> bool {
        self.total > 0 && self.score_count == self.total
    }
}

impl fmt::Display for QuizResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.score_count, self.total)
    }
}

/// Per-question feedback shown after completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionOutcome {
    pub index: usize,
    pub selected: Option<usize>,
    pub correct_index: usize,
    pub is_correct: bool,
}

/// Counts questions whose selection matches the correct option.
///
/// Unanswered questions (and selections missing from a short snapshot) count
/// as incorrect.
#[must_use]
pub fn score(questions: &[QuestionRecord], selections: &[Option<usize>]) -> QuizResult {
    let score_count = outcomes(questions, selections)
        .iter()
        .filter(|outcome| outcome.is_correct)
        .count();
    QuizResult::new(score_count, questions.len())
}

#[must_use]
pub fn outcomes(questions: &[QuestionRecord], selections: &[Option<usize>]) -> Vec<QuestionOutcome> {
    questions
        .iter()
        .enumerate()
        .map(|(index, question)| {
            let selected = selections.get(index).copied().flatten();
            QuestionOutcome {
                index,
                selected,
                correct_index: question.correct_index(),
                is_correct: selected == Some(question.correct_index()),
            }
        })
        .collect()
}

/// Which questions to list when reviewing a completed quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReviewFilter {
    #[default]
    All,
    Correct,
    Incorrect,
    Flagged,
}

impl ReviewFilter {
    pub const ALL: [ReviewFilter; 4] = [
        ReviewFilter::All,
        ReviewFilter::Correct,
        ReviewFilter::Incorrect,
        ReviewFilter::Flagged,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ReviewFilter::All => "All",
            ReviewFilter::Correct => "Correct",
            ReviewFilter::Incorrect => "Incorrect",
            ReviewFilter::Flagged => "Flagged",
        }
    }

    #[must_use]
    pub fn matches(self, outcome: &QuestionOutcome, flagged: bool) -> bool {
        match self {
            ReviewFilter::All => true,
            ReviewFilter::Correct => outcome.is_correct,
            ReviewFilter::Incorrect => !outcome.is_correct,
            ReviewFilter::Flagged => flagged,
        }
    }
}

/// Visual state of one option button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionMark {
    /// Nothing disclosed yet, option not chosen.
    Idle,
    /// Chosen, correctness not disclosed yet.
    Selected,
    /// Chosen and correct.
    Correct,
    /// Chosen and wrong.
    Incorrect,
    /// Not chosen, but it was the right answer.
    Missed,
}

impl OptionMark {
    /// Mark for `option` given the current selection.
    ///
    /// Correctness is only disclosed when `revealed` is true.
    #[must_use]
    pub fn for_option(
        option: usize,
        correct_index: usize,
        selected: Option<usize>,
        revealed: bool,
    ) -> Self {
        let chosen = selected == Some(option);
        match (revealed, chosen, option == correct_index) {
            (false, true, _) => OptionMark::Selected,
            (false, false, _) => OptionMark::Idle,
            (true, true, true) => OptionMark::Correct,
            (true, true, false) => OptionMark::Incorrect,
            (true, false, true) => OptionMark::Missed,
            (true, false, false) => OptionMark::Idle,
        }
    }

    #[must_use]
    pub fn css_modifier(self) -> &'static str {
        match self {
            OptionMark::Idle => "idle",
            OptionMark::Selected => "selected",
            OptionMark::Correct => "correct",
            OptionMark::Incorrect => "incorrect",
            OptionMark::Missed => "missed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bank(correct: &[usize]) -> Vec<QuestionRecord> {
        correct
            .iter()
            .enumerate()
            .map(|(id, &correct_index)| {
                QuestionRecord::new(
                    id as u64,
                    format!("Q{id}"),
                    vec!["a".into(), "b".into(), "c".into()],
                    correct_index,
                    "because",
                )
                .unwrap()
            })
            .collect()
    }

    #[test]
    fn scores_two_of_three() {
        let questions = bank(&[1, 0, 2]);
        let result = score(&questions, &[Some(1), Some(1), Some(2)]);
        assert_eq!(result, QuizResult::new(2, 3));
        assert_eq!(result.to_string(), "2/3");
        assert_eq!(result.percentage(), Some(67));
    }

    #[test]
    fn scoring_is_idempotent() {
        let questions = bank(&[1, 0, 2]);
        let selections = [Some(1), None, Some(0)];
        assert_eq!(score(&questions, &selections), score(&questions, &selections));
    }

    #[test]
    fn unanswered_and_missing_count_as_incorrect() {
        let questions = bank(&[0, 0]);
        assert_eq!(score(&questions, &[Some(0)]).score_count(), 1);
        assert_eq!(score(&questions, &[None, None]).score_count(), 0);
    }

    #[test]
    fn percentage_and_pass_mark() {
        assert_eq!(QuizResult::new(0, 0).percentage(), None);
        assert!(!QuizResult::new(0, 0).passed(0));
        assert_eq!(QuizResult::new(1, 8).percentage(), Some(13));
        assert!(QuizResult::new(24, 30).passed(80));
        assert!(!QuizResult::new(23, 30).passed(80));
        assert!(QuizResult::new(3, 3).is_perfect());
    }

    #[test]
    fn option_marks_disclose_only_when_revealed() {
        assert_eq!(OptionMark::for_option(1, 2, Some(1), false), OptionMark::Selected);
        assert_eq!(OptionMark::for_option(2, 2, Some(1), false), OptionMark::Idle);
        assert_eq!(OptionMark::for_option(1, 2, Some(1), true), OptionMark::Incorrect);
        assert_eq!(OptionMark::for_option(2, 2, Some(1), true), OptionMark::Missed);
        assert_eq!(OptionMark::for_option(2, 2, Some(2), true), OptionMark::Correct);
    }

    #[test]
    fn review_filter_matches_outcomes() {
        let questions = bank(&[0, 1]);
        let all = outcomes(&questions, &[Some(0), Some(0)]);
        assert!(ReviewFilter::Correct.matches(&all[0], false));
        assert!(ReviewFilter::Incorrect.matches(&all[1], false));
        assert!(!ReviewFilter::Flagged.matches(&all[0], false));
        assert!(ReviewFilter::Flagged.matches(&all[0], true));
    }
}
