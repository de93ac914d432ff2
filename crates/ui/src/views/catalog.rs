use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};

use crate::context::AppContext;
use crate::routes::Route;
use crate::vm::{CatalogEntryVm, ExamEntryVm, map_catalog};

#[component]
pub fn CatalogView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let vm = map_catalog(&ctx.catalog());

    use_effect(move || {
        if let Some(slug) = ctx.take_open_section_on_launch() {
            log::info!("opening section {slug} on launch");
            let _ = navigator.push(Route::Section {
                slug: slug.to_string(),
            });
        }
    });

    rsx! {
        div { class: "page catalog",
            h2 { "Course contents" }

            if vm.sections.is_empty() && vm.exams.is_empty() {
                p { class: "catalog__empty", "No course content was found." }
            }

            if !vm.sections.is_empty() {
                h3 { "Sections" }
                ul { class: "catalog__list",
                    for entry in vm.sections {
                        SectionEntry { key: "{entry.slug}", entry }
                    }
                }
            }

            if !vm.exams.is_empty() {
                h3 { "Mock exams" }
                ul { class: "catalog__list",
                    for exam in vm.exams {
                        ExamEntry { key: "{exam.slug}", exam }
                    }
                }
            }

            if vm.failed_files > 0 {
                p { class: "catalog__failures",
                    "{vm.failed_files} content file(s) could not be loaded. Run the check command for details."
                }
            }
        }
    }
}

#[component]
fn SectionEntry(entry: CatalogEntryVm) -> Element {
    rsx! {
        li { class: "catalog-entry",
            Link { class: "catalog-entry__link", to: Route::Section { slug: entry.slug.clone() },
                span { class: "catalog-entry__title", "{entry.title}" }
                if let Some(subtitle) = entry.subtitle {
                    span { class: "catalog-entry__subtitle", "{subtitle}" }
                }
            }
            p { class: "catalog-entry__meta",
                "{entry.check_count} quick check(s)"
                if entry.has_quiz { " | Quiz" }
            }
            if entry.problem_count > 0 {
                p { class: "catalog-entry__problems", "{entry.problem_count} authoring problem(s)" }
            }
        }
    }
}

#[component]
fn ExamEntry(exam: ExamEntryVm) -> Element {
    rsx! {
        li { class: "catalog-entry",
            Link { class: "catalog-entry__link", to: Route::Exam { slug: exam.slug.clone() },
                span { class: "catalog-entry__title", "{exam.title}" }
            }
            p { class: "catalog-entry__meta", "{exam.question_count} question(s) in bank" }
        }
    }
}
