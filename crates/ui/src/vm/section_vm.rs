use course_core::model::{
    Assessment, ContentBlock, CourseSection, QuestionId, QuestionRecord, QuizSpec,
};
use services::{CourseCatalog, ExamBank};

use crate::vm::prose_vm::prose_to_html;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogEntryVm {
    pub slug: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub check_count: usize,
    pub has_quiz: bool,
    pub problem_count: usize,
}

impl From<&CourseSection> for CatalogEntryVm {
    fn from(section: &CourseSection) -> Self {
        Self {
            slug: section.slug().to_string(),
            title: section.title().to_string(),
            subtitle: section.subtitle().map(str::to_string),
            check_count: section.checks().count(),
            has_quiz: section.quiz().is_some_and(|quiz| !quiz.is_broken()),
            problem_count: section.problems().len(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExamEntryVm {
    pub slug: String,
    pub title: String,
    pub question_count: usize,
}

impl From<&ExamBank> for ExamEntryVm {
    fn from(bank: &ExamBank) -> Self {
        Self {
            slug: bank.slug().to_string(),
            title: bank.title().to_string(),
            question_count: bank.bank().len(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogVm {
    pub sections: Vec<CatalogEntryVm>,
    pub exams: Vec<ExamEntryVm>,
    pub failed_files: usize,
}

#[must_use]
pub fn map_catalog(catalog: &CourseCatalog) -> CatalogVm {
    CatalogVm {
        sections: catalog.sections().map(CatalogEntryVm::from).collect(),
        exams: catalog.exam_banks().map(ExamEntryVm::from).collect(),
        failed_files: catalog.failures().len(),
    }
}

/// One rendered block of a section page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BlockVm {
    Heading(String),
    /// Sanitized HTML.
    Prose(String),
    Bullets(Vec<String>),
    KeyTerm { term: String, definition_html: String },
    Check { key: String, question: QuestionRecord },
    BrokenCheck { id: QuestionId, message: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FaqVm {
    pub question: String,
    pub answer_html: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuizSlotVm {
    Ready { key: String, spec: QuizSpec },
    Broken { title: String, message: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionVm {
    pub slug: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub learning_outcomes: Vec<String>,
    pub blocks: Vec<BlockVm>,
    pub faqs: Vec<FaqVm>,
    pub quiz: Option<QuizSlotVm>,
    pub next: Option<CatalogEntryVm>,
}

#[must_use]
pub fn map_section(section: &CourseSection, next: Option<&CourseSection>) -> SectionVm {
    let slug = section.slug().to_string();
    let blocks = section
        .blocks()
        .iter()
        .map(|block| match block {
            ContentBlock::Heading(text) => BlockVm::Heading(text.clone()),
            ContentBlock::Paragraph(text) => BlockVm::Prose(prose_to_html(text)),
            ContentBlock::Bullets(items) => BlockVm::Bullets(items.clone()),
            ContentBlock::KeyTerm { term, definition } => BlockVm::KeyTerm {
                term: term.clone(),
                definition_html: prose_to_html(definition),
            },
            ContentBlock::Check { id, question } => match question {
                Assessment::Ready(question) => BlockVm::Check {
                    key: format!("{slug}/{id}"),
                    question: question.clone(),
                },
                Assessment::Broken(err) => BlockVm::BrokenCheck {
                    id: id.clone(),
                    message: err.to_string(),
                },
            },
        })
        .collect();

    let quiz = section.quiz().map(|quiz| match quiz {
        Assessment::Ready(spec) => QuizSlotVm::Ready {
            key: format!("{slug}/quiz"),
            spec: spec.clone(),
        },
        Assessment::Broken(err) => QuizSlotVm::Broken {
            title: section.quiz_title().unwrap_or_default().to_string(),
            message: err.to_string(),
        },
    });

    SectionVm {
        slug,
        title: section.title().to_string(),
        subtitle: section.subtitle().map(str::to_string),
        learning_outcomes: section.learning_outcomes().to_vec(),
        blocks,
        faqs: section
            .faqs()
            .iter()
            .map(|faq| FaqVm {
                question: faq.question.clone(),
                answer_html: prose_to_html(&faq.answer),
            })
            .collect(),
        quiz,
        next: next.map(CatalogEntryVm::from),
    }
}
