use dioxus::prelude::*;
use dioxus_router::Link;

use course_core::model::SectionSlug;

use crate::components::{AuthoringErrorNotice, InlineCheck, Quiz};
use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewState, ViewError};
use crate::vm::{BlockVm, FaqVm, QuizSlotVm, SectionVm, map_section};

#[component]
pub fn SectionView(slug: String) -> Element {
    let ctx = use_context::<AppContext>();
    let catalog = ctx.catalog();
    let state = match slug.parse::<SectionSlug>() {
        Ok(slug) => ViewState::found(
            catalog
                .section(&slug)
                .map(|section| map_section(section, catalog.next_section(&slug))),
        ),
        Err(err) => {
            log::warn!("bad section slug {slug:?}: {err}");
            ViewState::Error(ViewError::NotFound)
        }
    };

    rsx! {
        div { class: "page section-page",
            match state {
                ViewState::Ready(vm) => rsx! { SectionBody { vm } },
                ViewState::Error(err) => rsx! {
                    p { class: "page-error", "{err.message()}" }
                    Link { to: Route::Catalog {}, "Back to contents" }
                },
            }
        }
    }
}

#[component]
fn SectionBody(vm: SectionVm) -> Element {
    let slug = vm.slug.clone();
    rsx! {
        header { class: "section-page__header",
            h1 { "{vm.title}" }
            if let Some(subtitle) = vm.subtitle {
                p { class: "section-page__subtitle", "{subtitle}" }
            }
        }

        if !vm.learning_outcomes.is_empty() {
            div { class: "outcomes",
                h3 { "By the end of this section you will be able to:" }
                ul {
                    for outcome in vm.learning_outcomes {
                        li { "{outcome}" }
                    }
                }
            }
        }

        article { class: "section-page__content",
            for (position, block) in vm.blocks.into_iter().enumerate() {
                SectionBlock { key: "{slug}/{position}", block }
            }
        }

        if !vm.faqs.is_empty() {
            div { class: "faqs",
                h3 { "Frequently asked questions" }
                for faq in vm.faqs {
                    Faq { key: "{faq.question}", faq }
                }
            }
        }

        match vm.quiz {
            Some(QuizSlotVm::Ready { key, spec }) => rsx! {
                Quiz { key: "{key}", title: spec.title, bank: spec.bank }
            },
            Some(QuizSlotVm::Broken { title, message }) => rsx! {
                section { class: "quiz quiz--broken",
                    h2 { class: "quiz__title", "{title}" }
                    AuthoringErrorNotice { kind: "quiz", message }
                }
            },
            None => rsx! {},
        }

        if let Some(next) = vm.next {
            nav { class: "section-page__next",
                Link { to: Route::Section { slug: next.slug.clone() }, "Next: {next.title}" }
            }
        }
    }
}

#[component]
fn SectionBlock(block: BlockVm) -> Element {
    match block {
        BlockVm::Heading(text) => rsx! { h2 { "{text}" } },
        BlockVm::Prose(html) => rsx! { div { class: "prose", dangerous_inner_html: "{html}" } },
        BlockVm::Bullets(items) => rsx! {
            ul { class: "bullets",
                for item in items {
                    li { "{item}" }
                }
            }
        },
        BlockVm::KeyTerm {
            term,
            definition_html,
        } => rsx! {
            div { class: "key-term",
                p { class: "key-term__term", "{term}" }
                div { class: "key-term__definition prose", dangerous_inner_html: "{definition_html}" }
            }
        },
        BlockVm::Check { key, question } => rsx! {
            InlineCheck { key: "{key}", question }
        },
        BlockVm::BrokenCheck { id, message } => {
            log::debug!("rendering placeholder for broken check {id}");
            rsx! { AuthoringErrorNotice { kind: "check", message } }
        }
    }
}

#[component]
fn Faq(faq: FaqVm) -> Element {
    rsx! {
        details { class: "faq",
            summary { "{faq.question}" }
            div { class: "prose", dangerous_inner_html: "{faq.answer_html}" }
        }
    }
}
