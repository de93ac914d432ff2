use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::model::ids::QuestionId;
use crate::model::question::{Difficulty, QuestionEntry, QuestionError, QuestionRecord};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BankError {
    #[error("question {id} (position {position}) is invalid: {source}")]
    Question {
        position: usize,
        id: QuestionId,
        #[source]
        source: QuestionError,
    },

    #[error("question id {id} appears more than once in the bank")]
    DuplicateId { id: QuestionId },
}

//
// ─── QUESTION BANK ─────────────────────────────────────────────────────────────
//

/// Ordered, immutable collection of questions owned by one page or exam.
///
/// Cloning is cheap: the records are shared behind an `Arc`, so several
/// quizzes can render from the same bank without copying it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuestionBank {
    questions: Arc<[QuestionRecord]>,
}

impl QuestionBank {
    /// Builds a bank from validated records, preserving their order.
    ///
    /// # Errors
    ///
    /// Returns `BankError::DuplicateId` if two records share an id.
    pub fn new(questions: Vec<QuestionRecord>) -> Result<Self, BankError> {
        let mut seen = HashSet::with_capacity(questions.len());
        for question in &questions {
            if !seen.insert(question.id()) {
                return Err(BankError::DuplicateId {
                    id: question.id().clone(),
                });
            }
        }
        Ok(Self {
            questions: questions.into(),
        })
    }

    /// Validates authored drafts in order and builds a bank.
    ///
    /// # Errors
    ///
    /// Returns the first `BankError::Question` encountered, or
    /// `BankError::DuplicateId`.
    pub fn from_drafts<I>(drafts: I) -> Result<Self, BankError>
    where
        I: IntoIterator,
        I::Item: Into<QuestionEntry>,
    {
        let questions = drafts
            .into_iter()
            .map(Into::into)
            .enumerate()
            .map(|(position, entry): (usize, QuestionEntry)| {
                let id = entry.id_or_position(position);
                entry
                    .validate()
                    .map_err(|source| BankError::Question { position, id, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(questions)
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&QuestionRecord> {
        self.questions.get(index)
    }

    #[must_use]
    pub fn questions(&self) -> &[QuestionRecord] {
        &self.questions
    }

    pub fn iter(&self) -> impl Iterator<Item = &QuestionRecord> {
        self.questions.iter()
    }

    #[must_use]
    pub fn position_of(&self, id: &QuestionId) -> Option<usize> {
        self.questions.iter().position(|question| question.id() == id)
    }

    /// Questions tagged with exactly this section, in bank order.
    #[must_use]
    pub fn by_section(&self, section: &str) -> Vec<&QuestionRecord> {
        self.questions
            .iter()
            .filter(|question| question.section() == Some(section))
            .collect()
    }

    /// Questions of the given difficulty, in bank order.
    #[must_use]
    pub fn by_difficulty(&self, difficulty: Difficulty) -> Vec<&QuestionRecord> {
        self.questions
            .iter()
            .filter(|question| question.difficulty() == Some(difficulty))
            .collect()
    }

    /// Summarise the bank's coverage and flag distribution problems.
    #[must_use]
    pub fn report(&self, expectations: &BankExpectations) -> BankReport {
        BankReport::build(self, expectations)
    }
}

impl<'a> IntoIterator for &'a QuestionBank {
    type Item = &'a QuestionRecord;
    type IntoIter = std::slice::Iter<'a, QuestionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.questions.iter()
    }
}

//
// ─── BANK REPORT ───────────────────────────────────────────────────────────────
//

/// Inclusive percentage range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShareRange {
    pub min: u8,
    pub max: u8,
}

impl ShareRange {
    #[must_use]
    pub const fn new(min: u8, max: u8) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn contains(self, percent: f64) -> bool {
        percent >= f64::from(self.min) && percent <= f64::from(self.max)
    }
}

/// What a well-balanced exam bank is expected to look like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankExpectations {
    pub min_questions: usize,
    pub expected_sections: Vec<String>,
    pub basic: ShareRange,
    pub intermediate: ShareRange,
    pub advanced: ShareRange,
}

impl Default for BankExpectations {
    fn default() -> Self {
        Self {
            min_questions: 200,
            expected_sections: Vec::new(),
            basic: ShareRange::new(30, 50),
            intermediate: ShareRange::new(35, 55),
            advanced: ShareRange::new(10, 25),
        }
    }
}

impl BankExpectations {
    #[must_use]
    pub fn share_for(&self, difficulty: Difficulty) -> ShareRange {
        match difficulty {
            Difficulty::Basic => self.basic,
            Difficulty::Intermediate => self.intermediate,
            Difficulty::Advanced => self.advanced,
        }
    }
}

/// Advisory finding about a bank. Never blocks use of the bank.
#[derive(Debug, Clone, PartialEq)]
pub enum BankIssue {
    TooFewQuestions { actual: usize, recommended: usize },
    MissingSection { section: String },
    DifficultyShare {
        difficulty: Difficulty,
        percent: f64,
        range: ShareRange,
    },
}

impl fmt::Display for BankIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BankIssue::TooFewQuestions {
                actual,
                recommended,
            } => write!(
                f,
                "insufficient questions: {actual} (recommended: {recommended}+)"
            ),
            BankIssue::MissingSection { section } => {
                write!(f, "no questions found for section {section}")
            }
            BankIssue::DifficultyShare {
                difficulty,
                percent,
                range,
            } => write!(
                f,
                "{difficulty} questions percentage out of range: {percent:.1}% (recommended: {}-{}%)",
                range.min, range.max
            ),
        }
    }
}

/// Coverage summary of a question bank.
#[derive(Debug, Clone, PartialEq)]
pub struct BankReport {
    pub total: usize,
    pub by_section: BTreeMap<String, usize>,
    pub by_difficulty: BTreeMap<Difficulty, usize>,
    pub issues: Vec<BankIssue>,
}

impl BankReport {
    fn build(bank: &QuestionBank, expectations: &BankExpectations) -> Self {
        let mut by_section = BTreeMap::new();
        let mut by_difficulty = BTreeMap::new();
        for question in bank {
            if let Some(section) = question.section() {
                *by_section.entry(section.to_string()).or_insert(0) += 1;
            }
            if let Some(difficulty) = question.difficulty() {
                *by_difficulty.entry(difficulty).or_insert(0) += 1;
            }
        }

        let mut issues = Vec::new();
        let total = bank.len();
        if total < expectations.min_questions {
            issues.push(BankIssue::TooFewQuestions {
                actual: total,
                recommended: expectations.min_questions,
            });
        }

        // Sub-sections ("1.1.2") count towards their parent ("1.1").
        for expected in &expectations.expected_sections {
            let covered = by_section.keys().any(|section| section.starts_with(expected.as_str()));
            if !covered {
                issues.push(BankIssue::MissingSection {
                    section: expected.clone(),
                });
            }
        }

        // Untagged banks (section quizzes) carry no difficulty mix to check.
        if total > 0 && !by_difficulty.is_empty() {
            for difficulty in Difficulty::ALL {
                let count = by_difficulty.get(&difficulty).copied().unwrap_or(0);
                #[allow(clippy::cast_precision_loss)]
                let percent = count as f64 / total as f64 * 100.0;
                let range = expectations.share_for(difficulty);
                if !range.contains(percent) {
                    issues.push(BankIssue::DifficultyShare {
                        difficulty,
                        percent,
                        range,
                    });
                }
            }
        }

        Self {
            total,
            by_section,
            by_difficulty,
            issues,
        }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
