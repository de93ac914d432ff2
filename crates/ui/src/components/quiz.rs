use dioxus::prelude::*;

use course_core::model::QuestionBank;
use course_core::quiz::{QuizConfig, QuizSession};
use course_core::scoring::{QuizResult, ReviewFilter};

use crate::components::AuthoringErrorNotice;
use crate::vm::{QuizIntent, QuizQuestionVm, QuizVm, apply_quiz_intent};

#[cfg(test)]
use course_core::quiz::QuizError;
#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

/// Review filters offered after a section quiz. Section quizzes cannot flag questions.
const SECTION_FILTERS: [ReviewFilter; 3] = [
    ReviewFilter::All,
    ReviewFilter::Correct,
    ReviewFilter::Incorrect,
];

/// End-of-section quiz: every question on one page, scored on submit.
///
/// An empty bank renders an authoring notice instead of a quiz.
#[component]
pub fn Quiz(
    title: String,
    bank: QuestionBank,
    #[props(default)] config: QuizConfig,
    pass_mark: Option<u8>,
    on_complete: Option<EventHandler<QuizResult>>,
) -> Element {
    let mut session = use_signal(|| QuizSession::new(title.clone(), bank.clone(), config));
    let mut filter = use_signal(ReviewFilter::default);

    let dispatch = use_callback(move |intent: QuizIntent| {
        let outcome = match session.write().as_mut() {
            Ok(quiz) => apply_quiz_intent(quiz, intent),
            Err(_) => return,
        };
        match outcome {
            Ok(Some(result)) => {
                if let Some(handler) = on_complete {
                    handler.call(result);
                }
            }
            Ok(None) => {
                if intent == QuizIntent::Reset {
                    filter.set(ReviewFilter::All);
                }
            }
            Err(err) => log::debug!("quiz ignored {intent:?}: {err}"),
        }
    });

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<QuizTestHandles>() {
                handles.register(dispatch, session, filter);
            }
        }
    }

    let vm = match &*session.read() {
        Ok(quiz) => QuizVm::build(quiz, filter(), pass_mark),
        Err(err) => {
            return rsx! {
                AuthoringErrorNotice { kind: "quiz", message: err.to_string() }
            };
        }
    };
    let visible: Vec<QuizQuestionVm> = vm
        .questions
        .iter()
        .filter(|question| !vm.completed || vm.review.contains(&question.index))
        .cloned()
        .collect();

    rsx! {
        section { class: "quiz",
            header { class: "quiz__header",
                h2 { "{vm.title}" }
                p { class: "quiz__progress", "{vm.progress_label}" }
            }

            if let Some(summary) = vm.summary.clone() {
                div { class: "quiz__summary",
                    p { class: "quiz__score", "Score: {summary.score_label} ({summary.percent_label})" }
                    if let Some(passed) = summary.passed {
                        p { class: if passed { "quiz__verdict quiz__verdict--pass" } else { "quiz__verdict quiz__verdict--fail" },
                            if passed { "Passed" } else { "Not passed" }
                        }
                    }
                    div { class: "quiz__filters",
                        for option in SECTION_FILTERS {
                            button {
                                key: "{option.label()}",
                                class: if option == vm.filter { "filter filter--active" } else { "filter" },
                                onclick: move |_| filter.set(option),
                                "{option.label()}"
                            }
                        }
                    }
                }
            }

            if vm.completed && visible.is_empty() {
                p { class: "quiz__empty", "No questions match this filter." }
            }
            ol { class: "quiz__questions",
                for question in visible {
                    QuestionCard { key: "{question.index}", question, dispatch }
                }
            }

            footer { class: "quiz__actions",
                if vm.completed {
                    button {
                        class: "btn btn-secondary",
                        onclick: move |_| dispatch.call(QuizIntent::Reset),
                        "Try again"
                    }
                } else {
                    button {
                        class: "btn btn-primary",
                        disabled: !vm.can_submit,
                        onclick: move |_| dispatch.call(QuizIntent::Submit),
                        "Submit answers"
                    }
                }
            }
        }
    }
}

/// One question with its options; feedback appears once the vm carries it.
#[component]
pub fn QuestionCard(question: QuizQuestionVm, dispatch: Callback<QuizIntent>) -> Element {
    let index = question.index;
    let class = match question.correct {
        Some(true) => "quiz-question quiz-question--correct",
        Some(false) => "quiz-question quiz-question--incorrect",
        None => "quiz-question",
    };
    rsx! {
        li { class,
            p { class: "quiz-question__prompt",
                span { class: "quiz-question__number", "{question.number}. " }
                "{question.prompt}"
            }
            div { class: "quiz-question__options",
                for option in question.options {
                    button {
                        key: "{option.index}",
                        class: "{option.class}",
                        disabled: option.disabled,
                        onclick: move |_| dispatch.call(QuizIntent::Select { question: index, option: option.index }),
                        span { class: "option__letter", "{option.letter}" }
                        span { class: "option__label", "{option.label}" }
                    }
                }
            }
            if let Some(explanation) = question.explanation {
                p { class: "quiz-question__explanation", "{explanation}" }
            }
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct QuizTestHandles {
    dispatch: Rc<RefCell<Option<Callback<QuizIntent>>>>,
    session: Rc<RefCell<Option<Signal<Result<QuizSession, QuizError>>>>>,
    filter: Rc<RefCell<Option<Signal<ReviewFilter>>>>,
}

#[cfg(test)]
impl QuizTestHandles {
    pub(crate) fn register(
        &self,
        dispatch: Callback<QuizIntent>,
        session: Signal<Result<QuizSession, QuizError>>,
        filter: Signal<ReviewFilter>,
    ) {
        *self.dispatch.borrow_mut() = Some(dispatch);
        *self.session.borrow_mut() = Some(session);
        *self.filter.borrow_mut() = Some(filter);
    }

    pub(crate) fn dispatch(&self) -> Callback<QuizIntent> {
        (*self.dispatch.borrow()).expect("quiz dispatch registered")
    }

    pub(crate) fn session(&self) -> Signal<Result<QuizSession, QuizError>> {
        (*self.session.borrow()).expect("quiz session registered")
    }

    pub(crate) fn filter(&self) -> Signal<ReviewFilter> {
        (*self.filter.borrow()).expect("quiz filter registered")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use course_core::model::QuestionRecord;
    use crate::views::drive_dom;

    #[derive(Props, Clone)]
    struct HarnessProps {
        bank: QuestionBank,
        config: QuizConfig,
        handles: QuizTestHandles,
        completed: Rc<RefCell<Vec<QuizResult>>>,
    }

    impl PartialEq for HarnessProps {
        fn eq(&self, _other: &Self) -> bool {
            true
        }
    }

    impl Eq for HarnessProps {}

    #[component]
    fn QuizHarness(props: HarnessProps) -> Element {
        use_context_provider(|| props.handles.clone());
        let completed = props.completed.clone();
        rsx! {
            Quiz {
                title: "Section 1 Knowledge Check",
                bank: props.bank.clone(),
                config: props.config,
                pass_mark: 80,
                on_complete: move |result: QuizResult| completed.borrow_mut().push(result),
            }
        }
    }

    struct Mounted {
        dom: VirtualDom,
        handles: QuizTestHandles,
        completed: Rc<RefCell<Vec<QuizResult>>>,
    }

    impl Mounted {
        fn select(&mut self, question: usize, option: usize) {
            self.handles.dispatch().call(QuizIntent::Select { question, option });
            drive_dom(&mut self.dom);
        }

        fn send(&mut self, intent: QuizIntent) {
            self.handles.dispatch().call(intent);
            drive_dom(&mut self.dom);
        }

        fn html(&self) -> String {
            dioxus_ssr::render(&self.dom)
        }
    }

    fn bank() -> QuestionBank {
        let questions = [(0, "COSHH"), (2, "Exposure"), (1, "Control")]
            .into_iter()
            .enumerate()
            .map(|(i, (correct, topic))| {
                QuestionRecord::new(
                    i as u64 + 1,
                    format!("Question about {topic}?"),
                    vec!["One".into(), "Two".into(), "Three".into()],
                    correct,
                    format!("Explained: {topic}."),
                )
                .unwrap()
            })
            .collect();
        QuestionBank::new(questions).unwrap()
    }

    fn mount(bank: QuestionBank, config: QuizConfig) -> Mounted {
        let handles = QuizTestHandles::default();
        let completed = Rc::new(RefCell::new(Vec::new()));
        let mut dom = VirtualDom::new_with_props(
            QuizHarness,
            HarnessProps {
                bank,
                config,
                handles: handles.clone(),
                completed: Rc::clone(&completed),
            },
        );
        dom.rebuild_in_place();
        drive_dom(&mut dom);
        Mounted {
            dom,
            handles,
            completed,
        }
    }

    #[tokio::test(flavor = "current_thread")]
    async fn partial_answers_show_no_score() {
        let mut quiz = mount(bank(), QuizConfig::default());

        quiz.select(0, 0);
        quiz.select(1, 0);

        let html = quiz.html();
        assert!(html.contains("2 of 3 answered"), "missing progress in {html}");
        assert!(!html.contains("Score:"), "score shown early in {html}");
        assert!(!html.contains("Explained:"), "explanation shown early in {html}");
        assert!(quiz.completed.borrow().is_empty());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn submit_scores_and_reports_completion() {
        let mut quiz = mount(bank(), QuizConfig::default());

        quiz.select(0, 0);
        quiz.select(1, 0);
        quiz.select(2, 1);
        quiz.send(QuizIntent::Submit);

        let html = quiz.html();
        assert!(html.contains("Score: 2 / 3 (67%)"), "missing score in {html}");
        assert!(html.contains("Not passed"), "missing verdict in {html}");
        assert!(html.contains("Explained: Exposure."), "missing explanation in {html}");
        assert_eq!(*quiz.completed.borrow(), vec![QuizResult::new(2, 3)]);

        quiz.select(1, 2);
        let session = quiz.handles.session();
        let selection = session.peek().as_ref().ok().and_then(|s| s.selection(1));
        assert_eq!(selection, Some(0), "completed quiz accepted a change");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn reset_starts_over() {
        let mut quiz = mount(bank(), QuizConfig::auto_complete());

        quiz.select(0, 0);
        quiz.select(1, 2);
        quiz.select(2, 1);
        assert_eq!(*quiz.completed.borrow(), vec![QuizResult::new(3, 3)]);

        quiz.send(QuizIntent::Reset);

        let html = quiz.html();
        assert!(html.contains("0 of 3 answered"), "missing reset progress in {html}");
        assert!(!html.contains("Score:"), "score survived reset in {html}");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn review_filter_with_no_matches_says_so() {
        let mut quiz = mount(bank(), QuizConfig::default());

        quiz.select(0, 0);
        quiz.select(1, 2);
        quiz.select(2, 1);
        quiz.send(QuizIntent::Submit);

        let html = quiz.html();
        assert!(html.contains("Score: 3 / 3 (100%)"), "missing score in {html}");
        assert!(!html.contains("Flagged"), "flag filter offered in {html}");

        let mut filter = quiz.handles.filter();
        filter.set(ReviewFilter::Incorrect);
        drive_dom(&mut quiz.dom);

        let html = quiz.html();
        assert!(html.contains("No questions match this filter."), "missing empty state in {html}");
        assert!(!html.contains("Explained:"), "unexpected question in {html}");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn empty_bank_renders_notice() {
        let quiz = mount(QuestionBank::empty(), QuizConfig::default());

        let html = quiz.html();
        assert!(html.contains("This quiz is unavailable"), "missing notice in {html}");
        assert!(!html.contains("Submit answers"), "quiz rendered in {html}");
    }
}
