use std::time::Duration;

use dioxus::prelude::*;
use dioxus_router::Link;

use course_core::model::SectionSlug;
use course_core::scoring::ReviewFilter;
use services::{ExamAttempt, ExamReport};

use crate::components::QuestionCard;
use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState};
use crate::vm::{
    ExamIntent, ExamReportVm, QuizIntent, QuizVm, apply_quiz_intent, format_elapsed,
};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

#[derive(Clone, Debug, PartialEq, Eq)]
struct ExamInfo {
    slug: SectionSlug,
    title: String,
    bank_size: usize,
}

#[component]
pub fn ExamView(slug: String) -> Element {
    let ctx = use_context::<AppContext>();
    let catalog = ctx.catalog();
    let service = ctx.exam_service();

    let info = match slug.parse::<SectionSlug>() {
        Ok(slug) => ViewState::found(catalog.exam_bank(&slug).map(|bank| ExamInfo {
            slug: bank.slug().clone(),
            title: bank.title().to_string(),
            bank_size: bank.bank().len(),
        })),
        Err(err) => {
            log::warn!("bad exam slug {slug:?}: {err}");
            ViewState::Error(ViewError::NotFound)
        }
    };

    let mut attempt = use_signal(|| None::<ExamAttempt>);
    let mut report = use_signal(|| None::<ExamReport>);
    let mut filter = use_signal(ReviewFilter::default);
    let mut elapsed = use_signal(chrono::Duration::zero);
    let mut start_error = use_signal(|| None::<(SectionSlug, String)>);

    let dispatch = {
        let catalog = catalog.clone();
        let service = service.clone();
        let exam_slug = match &info {
            ViewState::Ready(info) => Some(info.slug.clone()),
            ViewState::Error(_) => None,
        };
        use_callback(move |intent: ExamIntent| match intent {
            ExamIntent::Start | ExamIntent::Retake => {
                let Some((slug, bank)) = exam_slug
                    .as_ref()
                    .and_then(|slug| catalog.exam_bank(slug).map(|bank| (slug, bank)))
                else {
                    return;
                };
                match service.start(bank) {
                    Ok(started) => {
                        attempt.set(Some(started));
                        report.set(None);
                        filter.set(ReviewFilter::All);
                        elapsed.set(chrono::Duration::zero());
                        start_error.set(None);
                    }
                    Err(err) => {
                        log::error!("could not start mock exam {slug}: {err}");
                        start_error.set(Some((slug.clone(), err.to_string())));
                    }
                }
            }
            ExamIntent::Quiz(quiz_intent) => {
                let finished = {
                    let mut guard = attempt.write();
                    let Some(running) = guard
                        .as_mut()
                        .filter(|running| Some(running.exam()) == exam_slug.as_ref())
                    else {
                        return;
                    };
                    match apply_quiz_intent(running.quiz_mut(), quiz_intent) {
                        Ok(Some(_)) => Some(service.report(running)),
                        Ok(None) => None,
                        Err(err) => {
                            log::debug!("mock exam ignored {quiz_intent:?}: {err}");
                            None
                        }
                    }
                };
                match finished {
                    Some(Ok(finished)) => {
                        elapsed.set(finished.elapsed);
                        report.set(Some(finished));
                    }
                    Some(Err(err)) => log::error!("mock exam report failed: {err}"),
                    None => {}
                }
            }
            ExamIntent::Filter(next) => filter.set(next),
        })
    };

    {
        let service = service.clone();
        use_future(move || {
            let service = service.clone();
            let mut elapsed = elapsed;
            async move {
                loop {
                    tokio::time::sleep(Duration::from_secs(1)).await;
                    let running = attempt
                        .peek()
                        .as_ref()
                        .filter(|running| !running.quiz().is_completed())
                        .map(|running| service.elapsed(running));
                    if let Some(value) = running {
                        elapsed.set(value);
                    }
                }
            }
        });
    }

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<ExamTestHandles>() {
                handles.register(dispatch, attempt);
            }
        }
    }

    let info = match info {
        ViewState::Ready(info) => info,
        ViewState::Error(err) => {
            return rsx! {
                div { class: "page exam-page",
                    p { class: "page-error", "{err.message()}" }
                    Link { to: Route::Catalog {}, "Back to contents" }
                }
            };
        }
    };

    // Route changes between exams keep this component alive, so only show
    // state that belongs to the exam on screen.
    let attempt_guard = attempt.read();
    let current = attempt_guard
        .as_ref()
        .filter(|running| running.exam() == &info.slug);
    let error = start_error()
        .filter(|(slug, _)| *slug == info.slug)
        .map(|(_, message)| message);
    let body = match (current, *report.read()) {
        (None, _) => rsx! {
            ExamStart {
                title: info.title.clone(),
                bank_size: info.bank_size,
                size: service.size().min(info.bank_size),
                pass_mark: service.pass_mark(),
                error,
                dispatch,
            }
        },
        (Some(running), Some(finished)) => rsx! {
            ExamResults {
                vm: QuizVm::build(running.quiz(), filter(), Some(finished.pass_mark)),
                report: ExamReportVm::from(&finished),
                dispatch,
            }
        },
        (Some(running), None) => rsx! {
            ExamRunning {
                vm: QuizVm::build(running.quiz(), ReviewFilter::All, None),
                elapsed_label: format_elapsed(elapsed()),
                dispatch,
            }
        },
    };

    rsx! {
        div { class: "page exam-page",
            h1 { "{info.title}" }
            {body}
        }
    }
}

#[component]
fn ExamStart(
    title: String,
    bank_size: usize,
    size: usize,
    pass_mark: u8,
    error: Option<String>,
    dispatch: Callback<ExamIntent>,
) -> Element {
    rsx! {
        div { class: "exam-start",
            p { "{size} questions drawn from a bank of {bank_size}, mixed by difficulty." }
            p { "Answer every question, then submit. You need {pass_mark}% to pass." }
            if let Some(error) = error {
                p { class: "page-error", "{error}" }
            }
            button {
                class: "btn btn-primary",
                aria_label: "Start {title}",
                onclick: move |_| dispatch.call(ExamIntent::Start),
                "Start exam"
            }
        }
    }
}

#[component]
fn ExamRunning(vm: QuizVm, elapsed_label: String, dispatch: Callback<ExamIntent>) -> Element {
    let quiz_dispatch = use_callback(move |intent: QuizIntent| dispatch.call(ExamIntent::Quiz(intent)));
    let current = vm.current;
    let total = vm.questions.len();
    let has_flags = vm.progress.flagged > 0;
    let current_flagged = vm.current_question().is_some_and(|question| question.flagged);

    rsx! {
        div { class: "exam-running",
            div { class: "exam-running__status",
                span { class: "exam-running__progress", "{vm.progress_label}" }
                span { class: "exam-running__timer", "Time: {elapsed_label}" }
            }

            nav { class: "exam-grid",
                for question in vm.questions.iter() {
                    button {
                        key: "{question.index}",
                        class: grid_class(question.index == current, question.answered, question.flagged),
                        onclick: {
                            let index = question.index;
                            move |_| quiz_dispatch.call(QuizIntent::GoTo(index))
                        },
                        "{question.number}"
                    }
                }
            }

            if let Some(question) = vm.current_question().cloned() {
                p { class: "exam-running__position", "Question {question.number} of {total}" }
                ol { class: "quiz__questions",
                    QuestionCard { key: "{question.index}", question, dispatch: quiz_dispatch }
                }
            }

            div { class: "exam-running__actions",
                button {
                    class: "btn",
                    disabled: current == 0,
                    onclick: move |_| quiz_dispatch.call(QuizIntent::Previous),
                    "Previous"
                }
                button {
                    class: "btn",
                    onclick: move |_| quiz_dispatch.call(QuizIntent::ToggleFlag(current)),
                    if current_flagged { "Unflag" } else { "Flag for review" }
                }
                if has_flags {
                    button {
                        class: "btn",
                        onclick: move |_| quiz_dispatch.call(QuizIntent::NextFlagged),
                        "Next flagged"
                    }
                }
                button {
                    class: "btn",
                    disabled: current + 1 >= total,
                    onclick: move |_| quiz_dispatch.call(QuizIntent::Next),
                    "Next"
                }
                button {
                    class: "btn btn-primary",
                    disabled: !vm.can_submit,
                    onclick: move |_| quiz_dispatch.call(QuizIntent::Submit),
                    "Submit exam"
                }
            }
        }
    }
}

fn grid_class(current: bool, answered: bool, flagged: bool) -> String {
    let mut class = String::from("exam-grid__cell");
    if current {
        class.push_str(" exam-grid__cell--current");
    }
    if answered {
        class.push_str(" exam-grid__cell--answered");
    }
    if flagged {
        class.push_str(" exam-grid__cell--flagged");
    }
    class
}

#[component]
fn ExamResults(vm: QuizVm, report: ExamReportVm, dispatch: Callback<ExamIntent>) -> Element {
    let noop = use_callback(|_: QuizIntent| {});
    let reviewed: Vec<_> = vm
        .review
        .iter()
        .filter_map(|index| vm.questions.get(*index).cloned())
        .collect();

    rsx! {
        div { class: "exam-results",
            div { class: if report.passed { "exam-results__verdict exam-results__verdict--pass" } else { "exam-results__verdict exam-results__verdict--fail" },
                h2 { "{report.verdict}" }
                p { "Score: {report.summary.score_label} ({report.summary.percent_label})" }
                p { "{report.pass_mark_label}" }
                p { "Time taken: {report.elapsed_label}" }
                p { class: "exam-results__started", "Started {report.started_label}" }
            }

            div { class: "quiz__filters",
                for option in ReviewFilter::ALL {
                    button {
                        key: "{option.label()}",
                        class: if option == vm.filter { "filter filter--active" } else { "filter" },
                        onclick: move |_| dispatch.call(ExamIntent::Filter(option)),
                        "{option.label()}"
                    }
                }
            }

            if reviewed.is_empty() {
                p { class: "exam-results__empty", "No questions match this filter." }
            }
            ol { class: "quiz__questions",
                for question in reviewed {
                    QuestionCard { key: "{question.index}", question, dispatch: noop }
                }
            }

            button {
                class: "btn btn-primary",
                onclick: move |_| dispatch.call(ExamIntent::Retake),
                "Retake with new questions"
            }
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct ExamTestHandles {
    dispatch: Rc<RefCell<Option<Callback<ExamIntent>>>>,
    attempt: Rc<RefCell<Option<Signal<Option<ExamAttempt>>>>>,
}

#[cfg(test)]
impl ExamTestHandles {
    pub(crate) fn register(&self, dispatch: Callback<ExamIntent>, attempt: Signal<Option<ExamAttempt>>) {
        *self.dispatch.borrow_mut() = Some(dispatch);
        *self.attempt.borrow_mut() = Some(attempt);
    }

    pub(crate) fn dispatch(&self) -> Callback<ExamIntent> {
        (*self.dispatch.borrow()).expect("exam dispatch registered")
    }

    pub(crate) fn attempt(&self) -> Signal<Option<ExamAttempt>> {
        (*self.attempt.borrow()).expect("exam attempt registered")
    }
}
