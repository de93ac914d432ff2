use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a question inside its owning bank.
///
/// Authored content uses both numeric ids (`1`, `2`, ...) and readable keys
/// (`"coshh-stands-for"`). Uniqueness is only required within one bank.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuestionId {
    Number(u64),
    Key(String),
}

impl QuestionId {
    /// Creates a numeric `QuestionId`
    #[must_use]
    pub fn number(id: u64) -> Self {
        Self::Number(id)
    }

    /// Creates a keyed `QuestionId`
    #[must_use]
    pub fn key(key: impl Into<String>) -> Self {
        Self::Key(key.into())
    }
}

impl From<u64> for QuestionId {
    fn from(value: u64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for QuestionId {
    fn from(value: &str) -> Self {
        Self::Key(value.to_string())
    }
}

/// URL-safe identifier of a course section, e.g. `coshh-module-1-section-1`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SectionSlug(String);

impl SectionSlug {
    /// Creates a new `SectionSlug`
    ///
    /// # Errors
    ///
    /// Returns `ParseIdError` if the slug is empty or contains characters other than
    /// lowercase ASCII letters, digits and `-`.
    pub fn new(raw: impl Into<String>) -> Result<Self, ParseIdError> {
        let raw = raw.into();
        let valid = !raw.is_empty()
            && !raw.starts_with('-')
            && raw
                .chars()
                .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-');
        if valid {
            Ok(Self(raw))
        } else {
            Err(ParseIdError {
                kind: "SectionSlug".to_string(),
            })
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SectionSlug {
    type Error = ParseIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SectionSlug> for String {
    fn from(value: SectionSlug) -> Self {
        value.0
    }
}

impl fmt::Debug for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionId::Number(id) => write!(f, "QuestionId({id})"),
            QuestionId::Key(key) => write!(f, "QuestionId({key:?})"),
        }
    }
}

impl fmt::Debug for SectionSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SectionSlug({})", self.0)
    }
}

// ─── Display Implementations ───────────────────────────────────────────────────

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionId::Number(id) => write!(f, "{id}"),
            QuestionId::Key(key) => f.write_str(key),
        }
    }
}

impl fmt::Display for SectionSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ─── FromStr Implementations ───────────────────────────────────────────────────

/// Error type for parsing ID from string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    kind: String,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {} from string", self.kind)
    }
}

impl std::error::Error for ParseIdError {}

impl FromStr for QuestionId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseIdError {
                kind: "QuestionId".to_string(),
            });
        }
        Ok(trimmed
            .parse::<u64>()
            .map_or_else(|_| QuestionId::key(trimmed), QuestionId::Number))
    }
}

impl FromStr for SectionSlug {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionSlug::new(s)
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_id_display() {
        assert_eq!(QuestionId::number(42).to_string(), "42");
        assert_eq!(QuestionId::key("coshh-stands-for").to_string(), "coshh-stands-for");
    }

    #[test]
    fn test_question_id_from_str_prefers_numbers() {
        let id: QuestionId = "123".parse().unwrap();
        assert_eq!(id, QuestionId::number(123));

        let id: QuestionId = "confined-space".parse().unwrap();
        assert_eq!(id, QuestionId::key("confined-space"));
    }

    #[test]
    fn test_question_id_from_str_rejects_blank() {
        assert!("  ".parse::<QuestionId>().is_err());
    }

    #[test]
    fn test_question_id_deserializes_number_or_string() {
        let ids: Vec<QuestionId> = serde_json::from_str(r#"[7, "cdm-duty-holder"]"#).unwrap();
        assert_eq!(ids, vec![QuestionId::number(7), QuestionId::key("cdm-duty-holder")]);
    }

    #[test]
    fn test_section_slug_validation() {
        assert!(SectionSlug::new("cdm-module-1-section-2").is_ok());
        assert!(SectionSlug::new("").is_err());
        assert!(SectionSlug::new("CDM").is_err());
        assert!(SectionSlug::new("-leading").is_err());
        assert!(SectionSlug::new("has space").is_err());
    }

    #[test]
    fn test_section_slug_deserialize_rejects_invalid() {
        let parsed: Result<SectionSlug, _> = serde_json::from_str(r#""Not Valid""#);
        assert!(parsed.is_err());
    }
}
