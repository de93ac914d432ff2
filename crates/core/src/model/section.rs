use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::AuthoringError;
use crate::quiz::QuizError;
use crate::model::bank::QuestionBank;
use crate::model::ids::{ParseIdError, QuestionId, SectionSlug};
use crate::model::question::{QuestionEntry, QuestionRecord};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Errors that make a whole section unusable.
///
/// Broken questions are not in this list: they are kept as
/// `Assessment::Broken` so the rest of the page still renders.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SectionError {
    #[error("invalid section slug {raw:?}: {source}")]
    InvalidSlug {
        raw: String,
        #[source]
        source: ParseIdError,
    },

    #[error("section title cannot be empty")]
    EmptyTitle,
}

//
// ─── ASSESSMENT SLOT ───────────────────────────────────────────────────────────
//

/// An assessment embedded in a page: either ready to render or broken by an
/// authoring mistake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assessment<T> {
    Ready(T),
    Broken(AuthoringError),
}

impl<T> Assessment<T> {
    #[must_use]
    pub fn ready(&self) -> Option<&T> {
        match self {
            Assessment::Ready(value) => Some(value),
            Assessment::Broken(_) => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&AuthoringError> {
        match self {
            Assessment::Ready(_) => None,
            Assessment::Broken(err) => Some(err),
        }
    }

    #[must_use]
    pub fn is_broken(&self) -> bool {
        matches!(self, Assessment::Broken(_))
    }
}

impl<T, E: Into<AuthoringError>> From<Result<T, E>> for Assessment<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Assessment::Ready(value),
            Err(err) => Assessment::Broken(err.into()),
        }
    }
}

//
// ─── SECTION CONTENT ───────────────────────────────────────────────────────────
//

/// Title plus ordered bank for an end-of-section quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSpec {
    pub title: String,
    pub bank: QuestionBank,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faq {
    pub question: String,
    pub answer: String,
}

/// One piece of a section's reading flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentBlock {
    Heading(String),
    Paragraph(String),
    Bullets(Vec<String>),
    KeyTerm { term: String, definition: String },
    Check {
        id: QuestionId,
        question: Assessment<QuestionRecord>,
    },
}

/// A single course page: narrative content with embedded assessments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseSection {
    slug: SectionSlug,
    title: String,
    subtitle: Option<String>,
    learning_outcomes: Vec<String>,
    blocks: Vec<ContentBlock>,
    faqs: Vec<Faq>,
    quiz_title: Option<String>,
    quiz: Option<Assessment<QuizSpec>>,
}

/// Location and cause of an authoring problem inside a section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionProblem {
    Check { id: QuestionId, error: AuthoringError },
    Quiz { title: String, error: AuthoringError },
}

impl std::fmt::Display for SectionProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SectionProblem::Check { id, error } => write!(f, "inline check {id}: {error}"),
            SectionProblem::Quiz { title, error } => write!(f, "quiz {title:?}: {error}"),
        }
    }
}

impl CourseSection {
    /// Validate an authored section.
    ///
    /// Question-level mistakes are captured per assessment; only slug and
    /// title problems reject the section.
    ///
    /// # Errors
    ///
    /// Returns `SectionError` if the slug is invalid or the title is empty.
    pub fn from_draft(draft: SectionDraft) -> Result<Self, SectionError> {
        let slug = SectionSlug::new(draft.slug.clone()).map_err(|source| {
            SectionError::InvalidSlug {
                raw: draft.slug.clone(),
                source,
            }
        })?;
        let title = draft.title.trim().to_string();
        if title.is_empty() {
            return Err(SectionError::EmptyTitle);
        }

        let blocks = draft
            .blocks
            .into_iter()
            .enumerate()
            .map(|(position, block)| block.into_block(position))
            .collect();
        let quiz_title = draft.quiz.as_ref().map(|quiz| quiz.title.clone());
        let quiz = draft.quiz.map(|quiz| {
            let title = quiz.title;
            match QuestionBank::from_drafts(quiz.questions) {
                Ok(bank) if bank.is_empty() => Assessment::Broken(QuizError::EmptyBank.into()),
                Ok(bank) => Assessment::Ready(QuizSpec { title, bank }),
                Err(err) => Assessment::Broken(err.into()),
            }
        });

        Ok(Self {
            slug,
            title,
            subtitle: draft.subtitle.filter(|subtitle| !subtitle.trim().is_empty()),
            learning_outcomes: draft.learning_outcomes,
            blocks,
            faqs: draft.faqs,
            quiz_title,
            quiz,
        })
    }

    #[must_use]
    pub fn slug(&self) -> &SectionSlug {
        &self.slug
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn subtitle(&self) -> Option<&str> {
        self.subtitle.as_deref()
    }

    #[must_use]
    pub fn learning_outcomes(&self) -> &[String] {
        &self.learning_outcomes
    }

    #[must_use]
    pub fn blocks(&self) -> &[ContentBlock] {
        &self.blocks
    }

    #[must_use]
    pub fn faqs(&self) -> &[Faq] {
        &self.faqs
    }

    #[must_use]
    pub fn quiz(&self) -> Option<&Assessment<QuizSpec>> {
        self.quiz.as_ref()
    }

    /// Authored title of the end-of-section quiz, kept even when the quiz is broken.
    #[must_use]
    pub fn quiz_title(&self) -> Option<&str> {
        self.quiz_title.as_deref()
    }

    /// Inline checks that validated, in reading order.
    pub fn checks(&self) -> impl Iterator<Item = &QuestionRecord> {
        self.blocks.iter().filter_map(|block| match block {
            ContentBlock::Check { question, .. } => question.ready(),
            _ => None,
        })
    }

    /// Every authoring problem in the section, in reading order.
    #[must_use]
    pub fn problems(&self) -> Vec<SectionProblem> {
        let mut problems: Vec<SectionProblem> = self
            .blocks
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Check {
                    id,
                    question: Assessment::Broken(error),
                } => Some(SectionProblem::Check {
                    id: id.clone(),
                    error: error.clone(),
                }),
                _ => None,
            })
            .collect();

        if let Some(Assessment::Broken(error)) = &self.quiz {
            problems.push(SectionProblem::Quiz {
                title: self.quiz_title.clone().unwrap_or_default(),
                error: error.clone(),
            });
        }
        problems
    }
}

//
// ─── AUTHORING DRAFTS ──────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SectionDraft {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default, alias = "learningOutcomes")]
    pub learning_outcomes: Vec<String>,
    #[serde(default)]
    pub blocks: Vec<BlockDraft>,
    #[serde(default)]
    pub faqs: Vec<Faq>,
    #[serde(default)]
    pub quiz: Option<QuizDraft>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockDraft {
    Heading { text: String },
    Paragraph { text: String },
    Bullets { items: Vec<String> },
    KeyTerm { term: String, definition: String },
    Check(QuestionEntry),
}

impl BlockDraft {
    fn into_block(self, position: usize) -> ContentBlock {
        match self {
            BlockDraft::Heading { text } => ContentBlock::Heading(text),
            BlockDraft::Paragraph { text } => ContentBlock::Paragraph(text),
            BlockDraft::Bullets { items } => ContentBlock::Bullets(items),
            BlockDraft::KeyTerm { term, definition } => ContentBlock::KeyTerm { term, definition },
            BlockDraft::Check(entry) => ContentBlock::Check {
                id: entry.id_or_position(position),
                question: Assessment::from(entry.validate()),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QuizDraft {
    pub title: String,
    #[serde(default)]
    pub questions: Vec<QuestionEntry>,
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BankError, QuestionDraft, QuestionError};

    const SECTION_JSON: &str = r#"{
        "slug": "coshh-module-1-section-1",
        "title": "What is COSHH?",
        "learningOutcomes": ["Explain what COSHH stands for"],
        "blocks": [
            {"type": "heading", "text": "Introduction"},
            {"type": "paragraph", "text": "COSHH covers hazardous substances."},
            {"type": "check", "id": "coshh-stands-for", "question": "What does COSHH stand for?",
             "options": ["Harmful to Humans", "Hazardous to Health"], "correctIndex": 1,
             "explanation": "Control of Substances Hazardous to Health."},
            {"type": "key_term", "term": "Substance", "definition": "Any natural or artificial substance."},
            {"type": "check", "id": "broken", "question": "Which?", "options": ["a", "b"],
             "correctIndex": 4, "explanation": "e"}
        ],
        "faqs": [{"question": "Self-employed?", "answer": "Yes."}],
        "quiz": {"title": "Section 1 Knowledge Check", "questions": [
            {"id": 1, "question": "Q1", "options": ["a", "b"], "correctAnswer": 0, "explanation": "e1"}
        ]}
    }"#;

    #[test]
    fn section_keeps_valid_blocks_and_isolates_broken_check() {
        let draft: SectionDraft = serde_json::from_str(SECTION_JSON).unwrap();
        let section = CourseSection::from_draft(draft).unwrap();

        assert_eq!(section.slug().as_str(), "coshh-module-1-section-1");
        assert_eq!(section.blocks().len(), 5);
        assert_eq!(section.checks().count(), 1);
        assert_eq!(section.faqs().len(), 1);
        assert!(section.quiz().and_then(Assessment::ready).is_some());

        let problems = section.problems();
        assert_eq!(problems.len(), 1);
        assert_eq!(
            problems[0],
            SectionProblem::Check {
                id: QuestionId::key("broken"),
                error: AuthoringError::Question(QuestionError::CorrectIndexOutOfRange {
                    index: 4,
                    len: 2
                }),
            }
        );
    }

    #[test]
    fn broken_quiz_question_marks_only_the_quiz() {
        let draft = SectionDraft {
            slug: "cdm-1".into(),
            title: "CDM duty holders".into(),
            subtitle: None,
            learning_outcomes: Vec::new(),
            blocks: vec![BlockDraft::Paragraph { text: "Intro".into() }],
            faqs: Vec::new(),
            quiz: Some(QuizDraft {
                title: "Check".into(),
                questions: vec![QuestionDraft {
                    id: QuestionId::number(1),
                    prompt: "Q".into(),
                    options: vec!["only".into()],
                    correct_index: Some(0),
                    explanation: "e".into(),
                    section: None,
                    difficulty: None,
                }
                .into()],
            }),
        };

        let section = CourseSection::from_draft(draft).unwrap();
        let quiz = section.quiz().unwrap();
        assert!(quiz.is_broken());
        assert!(matches!(
            quiz.error(),
            Some(AuthoringError::Bank(BankError::Question { position: 0, .. }))
        ));
        assert_eq!(section.blocks().len(), 1);
    }

    #[test]
    fn rejects_bad_slug_and_blank_title() {
        let mut draft: SectionDraft = serde_json::from_str(SECTION_JSON).unwrap();
        draft.slug = "Bad Slug".into();
        assert!(matches!(
            CourseSection::from_draft(draft).unwrap_err(),
            SectionError::InvalidSlug { .. }
        ));

        let mut draft: SectionDraft = serde_json::from_str(SECTION_JSON).unwrap();
        draft.title = "   ".into();
        assert_eq!(CourseSection::from_draft(draft).unwrap_err(), SectionError::EmptyTitle);
    }

    #[test]
    fn empty_quiz_is_reported_as_authoring_problem() {
        let mut draft: SectionDraft = serde_json::from_str(SECTION_JSON).unwrap();
        draft.quiz = Some(QuizDraft {
            title: "Nothing here".into(),
            questions: Vec::new(),
        });

        let section = CourseSection::from_draft(draft).unwrap();

        assert_eq!(
            section.quiz().and_then(Assessment::error),
            Some(&AuthoringError::Quiz(QuizError::EmptyBank))
        );
        let problems = section.problems();
        assert_eq!(problems.len(), 2);
        assert_eq!(section.quiz_title(), Some("Nothing here"));
        assert!(matches!(
            &problems[1],
            SectionProblem::Quiz { title, .. } if title == "Nothing here"
        ));
        assert!(problems[1].to_string().starts_with("quiz \"Nothing here\""));
    }

    #[test]
    fn malformed_checks_do_not_reject_the_section() {
        let draft: SectionDraft = serde_json::from_str(
            r#"{
                "slug": "coshh-2",
                "title": "Exposure routes",
                "blocks": [
                    {"type": "check", "id": "fine", "question": "Inhaled?", "options": ["Yes", "No"],
                     "correctIndex": 0, "explanation": "Most exposure is by inhalation."},
                    {"type": "check", "id": "no-prompt", "options": ["Yes", "No"],
                     "correctIndex": 0, "explanation": "e"},
                    {"type": "check", "question": "No id", "options": ["Yes", "No"],
                     "correctIndex": "0", "explanation": "e"}
                ],
                "quiz": {"title": "Wrap-up", "questions": [
                    {"id": 1, "question": "Q1", "options": ["a", "b"], "correctAnswer": 0.5, "explanation": "e"}
                ]}
            }"#,
        )
        .unwrap();

        let section = CourseSection::from_draft(draft).unwrap();

        assert_eq!(section.blocks().len(), 3);
        assert_eq!(section.checks().count(), 1);
        let problems = section.problems();
        assert_eq!(problems.len(), 3);
        assert_eq!(
            problems[0],
            SectionProblem::Check {
                id: QuestionId::key("no-prompt"),
                error: AuthoringError::Question(QuestionError::EmptyPrompt),
            }
        );
        assert!(matches!(
            &problems[1],
            SectionProblem::Check {
                id,
                error: AuthoringError::Question(QuestionError::Unreadable { .. }),
            } if *id == QuestionId::key("#3")
        ));
        assert!(matches!(
            &problems[2],
            SectionProblem::Quiz {
                title,
                error: AuthoringError::Bank(BankError::Question {
                    source: QuestionError::Unreadable { .. },
                    ..
                }),
            } if title == "Wrap-up"
        ));
    }
}
