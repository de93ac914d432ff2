use dioxus::prelude::*;

use course_core::InlineCheckSession;
use course_core::model::QuestionRecord;

use crate::vm::{CheckIntent, CheckVm};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

/// One knowledge check embedded in lesson content.
///
/// Each instance owns its own state. Parents should key instances by
/// section and question id so that navigating between sections starts fresh.
#[component]
pub fn InlineCheck(question: QuestionRecord) -> Element {
    let mut check = use_signal(|| InlineCheckSession::new(question.clone()));

    let dispatch = use_callback(move |intent: CheckIntent| match intent {
        CheckIntent::Select(index) => {
            let outcome = check.write().select(index);
            if let Err(err) = outcome {
                log::debug!("inline check {} ignored selection: {err}", check.peek().question().id());
            }
        }
    });

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<CheckTestHandles>() {
                handles.register(dispatch);
            }
        }
    }

    let vm = CheckVm::from(&*check.read());

    rsx! {
        div { class: "inline-check",
            p { class: "inline-check__label", "Quick check" }
            p { class: "inline-check__prompt", "{vm.prompt}" }
            div { class: "inline-check__options",
                for option in vm.options {
                    button {
                        key: "{option.index}",
                        class: "{option.class}",
                        disabled: option.disabled,
                        onclick: move |_| dispatch.call(CheckIntent::Select(option.index)),
                        span { class: "option__letter", "{option.letter}" }
                        span { class: "option__label", "{option.label}" }
                    }
                }
            }
            if let Some(feedback) = vm.feedback {
                div {
                    class: if feedback.correct { "feedback feedback--correct" } else { "feedback feedback--incorrect" },
                    p { class: "feedback__heading", "{feedback.heading}" }
                    p { class: "feedback__explanation", "{feedback.explanation}" }
                }
            }
        }
    }
}

/// Dispatchers of every mounted check, in mount order.
#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct CheckTestHandles {
    dispatch: Rc<RefCell<Vec<Callback<CheckIntent>>>>,
}

#[cfg(test)]
impl CheckTestHandles {
    pub(crate) fn register(&self, dispatch: Callback<CheckIntent>) {
        self.dispatch.borrow_mut().push(dispatch);
    }

    pub(crate) fn dispatch(&self, index: usize) -> Callback<CheckIntent> {
        *self
            .dispatch
            .borrow()
            .get(index)
            .expect("check dispatch registered")
    }

    pub(crate) fn len(&self) -> usize {
        self.dispatch.borrow().len()
    }
}
