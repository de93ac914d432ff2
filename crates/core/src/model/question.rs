use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Authoring mistakes detected while constructing a question.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("question needs at least 2 options, found {len}")]
    TooFewOptions { len: usize },

    #[error("option {index} has no text")]
    EmptyOption { index: usize },

    #[error("correct answer index is missing")]
    MissingCorrectIndex,

    #[error("correct answer index {index} is out of range for {len} options")]
    CorrectIndexOutOfRange { index: i64, len: usize },

    #[error("explanation cannot be empty")]
    EmptyExplanation,

    #[error("question could not be read: {reason}")]
    Unreadable { reason: String },
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

/// Difficulty tier used by mock exam banks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Basic,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Basic,
        Difficulty::Intermediate,
        Difficulty::Advanced,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Basic => "basic",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//
// ─── QUESTION RECORD ───────────────────────────────────────────────────────────
//

/// One authored multiple-choice question with a single correct option.
///
/// A `QuestionRecord` can only be obtained through validation, so every
/// instance satisfies:
/// - the prompt and explanation are non-empty
/// - there are at least two options, none of them blank
/// - `correct_index < options.len()`
///
/// Options keep their authored order; nothing in the engine reorders them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRecord {
    id: QuestionId,
    prompt: String,
    options: Vec<String>,
    correct_index: usize,
    explanation: String,
    section: Option<String>,
    difficulty: Option<Difficulty>,
}

impl QuestionRecord {
    /// Builds a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when the record breaks any authoring invariant.
    pub fn new(
        id: impl Into<QuestionId>,
        prompt: impl Into<String>,
        options: Vec<String>,
        correct_index: usize,
        explanation: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        let explanation = explanation.into();

        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if options.len() < 2 {
            return Err(QuestionError::TooFewOptions { len: options.len() });
        }
        if let Some(index) = options.iter().position(|option| option.trim().is_empty()) {
            return Err(QuestionError::EmptyOption { index });
        }
        if correct_index >= options.len() {
            return Err(QuestionError::CorrectIndexOutOfRange {
                index: i64::try_from(correct_index).unwrap_or(i64::MAX),
                len: options.len(),
            });
        }
        if explanation.trim().is_empty() {
            return Err(QuestionError::EmptyExplanation);
        }

        Ok(Self {
            id: id.into(),
            prompt,
            options,
            correct_index,
            explanation,
            section: None,
            difficulty: None,
        })
    }

    #[must_use]
    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    #[must_use]
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn option(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    #[must_use]
    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    #[must_use]
    pub fn section(&self) -> Option<&str> {
        self.section.as_deref()
    }

    #[must_use]
    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    /// True when `index` is the authored correct option.
    #[must_use]
    pub fn is_correct(&self, index: usize) -> bool {
        index == self.correct_index
    }
}

//
// ─── AUTHORING DRAFT ───────────────────────────────────────────────────────────
//

/// Unvalidated question as it appears in course content files.
///
/// Both spellings of the correct-answer field seen in authored content
/// (`correctIndex` for inline checks, `correctAnswer` for quizzes) map onto
/// `correct_index`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDraft {
    pub id: QuestionId,
    #[serde(default, alias = "question")]
    pub prompt: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default, alias = "correctIndex", alias = "correctAnswer")]
    pub correct_index: Option<i64>,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub section: Option<String>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
}

impl QuestionDraft {
    /// Validate the draft into a `QuestionRecord`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` for any authoring mistake.
    pub fn validate(self) -> Result<QuestionRecord, QuestionError> {
        let raw_index = self.correct_index.ok_or(QuestionError::MissingCorrectIndex)?;
        let correct_index =
            usize::try_from(raw_index).map_err(|_| QuestionError::CorrectIndexOutOfRange {
                index: raw_index,
                len: self.options.len(),
            })?;

        let mut record = QuestionRecord::new(
            self.id,
            self.prompt,
            self.options,
            correct_index,
            self.explanation,
        )?;
        record.section = self.section.filter(|section| !section.trim().is_empty());
        record.difficulty = self.difficulty;
        Ok(record)
    }
}

/// A question entry read from a content file.
///
/// Entries whose fields have the wrong shape (no id, an index written as
/// text) are kept as `Unreadable` instead of failing the whole file, so
/// they surface as a broken check or quiz like any other authoring mistake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionEntry {
    Draft(QuestionDraft),
    Unreadable {
        id: Option<QuestionId>,
        reason: String,
    },
}

impl QuestionEntry {
    #[must_use]
    pub fn id(&self) -> Option<&QuestionId> {
        match self {
            QuestionEntry::Draft(draft) => Some(&draft.id),
            QuestionEntry::Unreadable { id, .. } => id.as_ref(),
        }
    }

    /// The authored id, or `#n` (1-based) for an entry without a usable one.
    #[must_use]
    pub fn id_or_position(&self, position: usize) -> QuestionId {
        self.id()
            .cloned()
            .unwrap_or_else(|| QuestionId::key(format!("#{}", position + 1)))
    }

    /// Validate the entry into a `QuestionRecord`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::Unreadable` for malformed entries and any
    /// other `QuestionError` from draft validation.
    pub fn validate(self) -> Result<QuestionRecord, QuestionError> {
        match self {
            QuestionEntry::Draft(draft) => draft.validate(),
            QuestionEntry::Unreadable { reason, .. } => Err(QuestionError::Unreadable { reason }),
        }
    }
}

impl From<QuestionDraft> for QuestionEntry {
    fn from(draft: QuestionDraft) -> Self {
        QuestionEntry::Draft(draft)
    }
}

impl<'de> Deserialize<'de> for QuestionEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        let id = value
            .get("id")
            .cloned()
            .and_then(|id| serde_json::from_value::<QuestionId>(id).ok());
        Ok(match serde_json::from_value::<QuestionDraft>(value) {
            Ok(draft) => QuestionEntry::Draft(draft),
            Err(err) => QuestionEntry::Unreadable {
                id,
                reason: err.to_string(),
            },
        })
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
