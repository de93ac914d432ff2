use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use course_core::model::SectionSlug;
use course_core::time::fixed_now;
use services::{Clock, CourseCatalog, ExamService};

use crate::components::CheckTestHandles;
use crate::context::{UiApp, build_app_context};
use crate::views::exam::ExamTestHandles;
use crate::views::{CatalogView, ExamView, SectionView};

#[derive(Clone)]
struct TestApp {
    catalog: Arc<CourseCatalog>,
    exam_service: Arc<ExamService>,
}

impl UiApp for TestApp {
    fn catalog(&self) -> Arc<CourseCatalog> {
        Arc::clone(&self.catalog)
    }

    fn exam_service(&self) -> Arc<ExamService> {
        Arc::clone(&self.exam_service)
    }

    fn initial_section(&self) -> Option<SectionSlug> {
        None
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum ViewKind {
    Catalog,
    Section(String),
    Exam(String),
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
    check_handles: CheckTestHandles,
    exam_handles: ExamTestHandles,
    current: CurrentView,
}

/// Lets a test swap the mounted view without rebuilding the dom.
#[derive(Clone, Default)]
pub struct CurrentView(Rc<RefCell<Option<Signal<ViewKind>>>>);

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    let view = use_signal(|| props.view.clone());
    use_context_provider(|| view);
    *props.current.0.borrow_mut() = Some(view);
    use_context_provider(|| props.check_handles.clone());
    use_context_provider(|| props.exam_handles.clone());
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<Signal<ViewKind>>();
    match view() {
        ViewKind::Catalog => rsx! { CatalogView {} },
        ViewKind::Section(slug) => rsx! { SectionView { slug } },
        ViewKind::Exam(slug) => rsx! { ExamView { slug } },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub check_handles: CheckTestHandles,
    pub exam_handles: ExamTestHandles,
    current: CurrentView,
}

impl ViewHarness {
    /// Show another view in the same mounted tree, as a route change would.
    pub fn show(&mut self, view: ViewKind) {
        let mut current = (*self.current.0.borrow()).expect("harness view registered");
        current.set(view);
        drive_dom(&mut self.dom);
    }

    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub fn drive(&mut self) {
        drive_dom(&mut self.dom);
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn bundled_catalog() -> CourseCatalog {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../content");
    CourseCatalog::load(dir).expect("load bundled content")
}

pub fn setup_view_harness(view: ViewKind, catalog: CourseCatalog) -> ViewHarness {
    let exam_service = ExamService::new(Clock::fixed(fixed_now()), 30, 80).expect("exam service");
    let app = Arc::new(TestApp {
        catalog: Arc::new(catalog),
        exam_service: Arc::new(exam_service),
    });
    let check_handles = CheckTestHandles::default();
    let exam_handles = ExamTestHandles::default();
    let current = CurrentView::default();

    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app,
            view,
            check_handles: check_handles.clone(),
            exam_handles: exam_handles.clone(),
            current: current.clone(),
        },
    );

    ViewHarness {
        dom,
        check_handles,
        exam_handles,
        current,
    }
}
