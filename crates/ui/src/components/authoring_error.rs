use dioxus::prelude::*;

/// Placeholder shown in place of a check or quiz whose content is broken.
///
/// The rest of the page keeps rendering; the learner sees what is missing and
/// the author sees why.
#[component]
pub fn AuthoringErrorNotice(kind: &'static str, message: String) -> Element {
    rsx! {
        div { class: "authoring-error", role: "note",
            p { class: "authoring-error__title", "This {kind} is unavailable" }
            p { class: "authoring-error__detail", "{message}" }
        }
    }
}
