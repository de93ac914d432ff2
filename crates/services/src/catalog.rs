//! Course content loaded from JSON files on disk.
//!
//! A content directory holds one section per `*.json` file plus any number of
//! mock exam banks named `*.bank.json`. Files are independent: a file that
//! fails to parse is recorded as a load failure and skipped, the rest of the
//! catalog still loads.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use course_core::model::{
    BankExpectations, BankReport, CourseSection, QuestionBank, QuestionEntry, SectionDraft,
    SectionProblem, SectionSlug,
};

use crate::error::CatalogError;

const BANK_SUFFIX: &str = ".bank.json";

//
// ─── EXAM BANK ─────────────────────────────────────────────────────────────────
//

/// Large question bank used to draw mock exams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamBank {
    slug: SectionSlug,
    title: String,
    expected_sections: Vec<String>,
    bank: QuestionBank,
}

impl ExamBank {
    #[must_use]
    pub fn new(
        slug: SectionSlug,
        title: impl Into<String>,
        expected_sections: Vec<String>,
        bank: QuestionBank,
    ) -> Self {
        Self {
            slug,
            title: title.into(),
            expected_sections,
            bank,
        }
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
    pub fn expected_sections(&self) -> &[String] {
        &self.expected_sections
    }

    #[must_use]
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// Coverage report against the default expectations and this bank's
    /// expected sections.
    #[must_use]
    pub fn report(&self) -> BankReport {
        let expectations = BankExpectations {
            expected_sections: self.expected_sections.clone(),
            ..BankExpectations::default()
        };
        self.bank.report(&expectations)
    }
}

/// Authoring format of an exam bank file.
#[derive(Debug, Clone, Deserialize)]
pub struct ExamBankDraft {
    pub slug: String,
    pub title: String,
    #[serde(default, alias = "expectedSections")]
    pub expected_sections: Vec<String>,
    #[serde(default)]
    pub questions: Vec<QuestionEntry>,
}

//
// ─── CATALOG ───────────────────────────────────────────────────────────────────
//

/// Authoring problem located in one catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogProblem {
    pub slug: SectionSlug,
    pub problem: SectionProblem,
}

/// Every section and exam bank available to the app, ordered by slug.
#[derive(Debug, Default)]
pub struct CourseCatalog {
    sections: BTreeMap<SectionSlug, CourseSection>,
    exam_banks: BTreeMap<SectionSlug, ExamBank>,
    failures: Vec<CatalogError>,
}

impl CourseCatalog {
    /// Build a catalog from already-validated content.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::DuplicateSlug` if two entries share a slug.
    pub fn from_parts(
        sections: impl IntoIterator<Item = CourseSection>,
        exam_banks: impl IntoIterator<Item = ExamBank>,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::default();
        for section in sections {
            catalog.insert_section(PathBuf::new(), section)?;
        }
        for bank in exam_banks {
            catalog.insert_exam_bank(PathBuf::new(), bank)?;
        }
        Ok(catalog)
    }

    /// Load every content file under `path` (a directory or a single file).
    ///
    /// Per-file problems are logged and kept in `failures()`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Io` if `path` itself cannot be read.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let files = content_files(path)?;
        let mut catalog = Self::default();

        for file in files {
            if let Err(err) = catalog.load_file(&file) {
                log::error!("skipping content file: {err}");
                catalog.failures.push(err);
            }
        }

        for problem in catalog.problems() {
            log::warn!("{}: {}", problem.slug, problem.problem);
        }
        log::info!(
            "loaded {} section(s) and {} exam bank(s) from {}",
            catalog.sections.len(),
            catalog.exam_banks.len(),
            path.display()
        );
        Ok(catalog)
    }

    fn load_file(&mut self, file: &Path) -> Result<(), CatalogError> {
        let raw = fs::read_to_string(file).map_err(|source| CatalogError::Io {
            path: file.to_path_buf(),
            source,
        })?;
        let json_error = |source| CatalogError::Json {
            path: file.to_path_buf(),
            source,
        };

        if is_bank_file(file) {
            let draft: ExamBankDraft = serde_json::from_str(&raw).map_err(json_error)?;
            let bank = exam_bank_from_draft(file, draft)?;
            self.insert_exam_bank(file.to_path_buf(), bank)
        } else {
            let draft: SectionDraft = serde_json::from_str(&raw).map_err(json_error)?;
            let section =
                CourseSection::from_draft(draft).map_err(|source| CatalogError::Section {
                    path: file.to_path_buf(),
                    source,
                })?;
            self.insert_section(file.to_path_buf(), section)
        }
    }

    fn insert_section(&mut self, path: PathBuf, section: CourseSection) -> Result<(), CatalogError> {
        let slug = section.slug().clone();
        if self.sections.contains_key(&slug) {
            return Err(CatalogError::DuplicateSlug {
                path,
                slug: slug.to_string(),
            });
        }
        self.sections.insert(slug, section);
        Ok(())
    }

    fn insert_exam_bank(&mut self, path: PathBuf, bank: ExamBank) -> Result<(), CatalogError> {
        let slug = bank.slug().clone();
        if self.exam_banks.contains_key(&slug) {
            return Err(CatalogError::DuplicateSlug {
                path,
                slug: slug.to_string(),
            });
        }
        self.exam_banks.insert(slug, bank);
        Ok(())
    }

    pub fn sections(&self) -> impl Iterator<Item = &CourseSection> {
        self.sections.values()
    }

    #[must_use]
    pub fn section(&self, slug: &SectionSlug) -> Option<&CourseSection> {
        self.sections.get(slug)
    }

    /// Section that follows `slug` in catalog order.
    #[must_use]
    pub fn next_section(&self, slug: &SectionSlug) -> Option<&CourseSection> {
        use std::ops::Bound::{Excluded, Unbounded};
        self.sections
            .range((Excluded(slug), Unbounded))
            .next()
            .map(|(_, section)| section)
    }

    pub fn exam_banks(&self) -> impl Iterator<Item = &ExamBank> {
        self.exam_banks.values()
    }

    #[must_use]
    pub fn exam_bank(&self, slug: &SectionSlug) -> Option<&ExamBank> {
        self.exam_banks.get(slug)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty() && self.exam_banks.is_empty()
    }

    /// Files that could not be loaded at all.
    #[must_use]
    pub fn failures(&self) -> &[CatalogError] {
        &self.failures
    }

    /// Broken inline checks and quizzes across every loaded section.
    #[must_use]
    pub fn problems(&self) -> Vec<CatalogProblem> {
        self.sections
            .values()
            .flat_map(|section| {
                section.problems().into_iter().map(|problem| CatalogProblem {
                    slug: section.slug().clone(),
                    problem,
                })
            })
            .collect()
    }

    /// True when no file failed and no assessment is broken.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.problems().is_empty()
    }
}

fn exam_bank_from_draft(file: &Path, draft: ExamBankDraft) -> Result<ExamBank, CatalogError> {
    let slug = SectionSlug::new(draft.slug.clone()).map_err(|source| CatalogError::Section {
        path: file.to_path_buf(),
        source: course_core::model::SectionError::InvalidSlug {
            raw: draft.slug.clone(),
            source,
        },
    })?;
    let bank = QuestionBank::from_drafts(draft.questions).map_err(|source| CatalogError::Bank {
        path: file.to_path_buf(),
        source,
    })?;
    Ok(ExamBank::new(slug, draft.title, draft.expected_sections, bank))
}

fn is_bank_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(BANK_SUFFIX))
}

fn content_files(path: &Path) -> Result<Vec<PathBuf>, CatalogError> {
    let io_error = |source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    };
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(path).map_err(io_error)? {
        let entry_path = entry.map_err(io_error)?.path();
        let is_json = entry_path.extension().is_some_and(|ext| ext == "json");
        if entry_path.is_file() && is_json {
            files.push(entry_path);
        }
    }
    files.sort();
    Ok(files)
}
