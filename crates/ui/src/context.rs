use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use course_core::model::SectionSlug;
use services::{CourseCatalog, ExamService};

pub trait UiApp: Send + Sync {
    fn catalog(&self) -> Arc<CourseCatalog>;
    fn exam_service(&self) -> Arc<ExamService>;

    /// Section to open when the window first appears.
    fn initial_section(&self) -> Option<SectionSlug>;
}

#[derive(Clone)]
pub struct AppContext {
    initial_section: Option<SectionSlug>,
    open_section_on_launch_once: Arc<AtomicBool>,

    catalog: Arc<CourseCatalog>,
    exam_service: Arc<ExamService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        let initial_section = app.initial_section();
        let open_on_launch = initial_section.is_some();

        Self {
            initial_section,
            open_section_on_launch_once: Arc::new(AtomicBool::new(open_on_launch)),
            catalog: app.catalog(),
            exam_service: app.exam_service(),
        }
    }

    /// The configured section, returned once; later calls yield `None`.
    #[must_use]
    pub fn take_open_section_on_launch(&self) -> Option<SectionSlug> {
        if self.open_section_on_launch_once.swap(false, Ordering::AcqRel) {
            self.initial_section.clone()
        } else {
            None
        }
    }

    /// The configured value (not the one-shot value).
    #[must_use]
    pub fn initial_section(&self) -> Option<&SectionSlug> {
        self.initial_section.as_ref()
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<CourseCatalog> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn exam_service(&self) -> Arc<ExamService> {
        Arc::clone(&self.exam_service)
    }
}

// This context is provided by the application composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
