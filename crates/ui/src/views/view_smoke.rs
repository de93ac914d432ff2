use course_core::model::{BlockDraft, CourseSection, QuestionDraft, QuestionId, QuizDraft, SectionDraft};
use course_core::model::SectionSlug;
use services::{CourseCatalog, ExamBank};
use dioxus::prelude::ReadableExt;

use crate::vm::{CheckIntent, ExamIntent, QuizIntent};

use super::test_harness::{ViewKind, bundled_catalog, setup_view_harness};

const SECTION: &str = "coshh-module-1-section-1";
const EXAM: &str = "level-3-module-1";
const OTHER_EXAM: &str = "level-3-module-2";

fn question(id: &str, correct: Option<i64>) -> QuestionDraft {
    QuestionDraft {
        id: QuestionId::key(id),
        prompt: format!("Prompt {id}"),
        options: vec!["Yes".into(), "No".into()],
        correct_index: correct,
        explanation: format!("Reason {id}."),
        section: None,
        difficulty: None,
    }
}

fn catalog_with_broken_check() -> CourseCatalog {
    let section = CourseSection::from_draft(SectionDraft {
        slug: "broken-1".into(),
        title: "Partly broken".into(),
        subtitle: None,
        learning_outcomes: Vec::new(),
        blocks: vec![
            BlockDraft::Paragraph {
                text: "Still readable.".into(),
            },
            BlockDraft::Check(question("missing-answer", None).into()),
            BlockDraft::Check(question("fine", Some(1)).into()),
        ],
        faqs: Vec::new(),
        quiz: Some(QuizDraft {
            title: "Wrap-up".into(),
            questions: vec![question("q1", Some(0)).into()],
        }),
    })
    .expect("section");
    CourseCatalog::from_parts([section], []).expect("catalog")
}

fn catalog_with_two_exams() -> CourseCatalog {
    let bundled = bundled_catalog();
    let sections: Vec<CourseSection> = bundled.sections().cloned().collect();
    let mut banks: Vec<ExamBank> = bundled.exam_banks().cloned().collect();
    let other = ExamBank::new(
        SectionSlug::new(OTHER_EXAM).expect("slug"),
        "Level 3 Module 2 Mock Exam",
        Vec::new(),
        banks[0].bank().clone(),
    );
    banks.push(other);
    CourseCatalog::from_parts(sections, banks).expect("catalog")
}

#[tokio::test(flavor = "current_thread")]
async fn catalog_view_lists_sections_and_exams() {
    let mut harness = setup_view_harness(ViewKind::Catalog, bundled_catalog());
    harness.rebuild();

    let html = harness.render();
    assert!(html.contains("What is COSHH?"), "missing section in {html}");
    assert!(html.contains("Level 3 Module 1 Mock Exam"), "missing exam in {html}");
    assert!(html.contains("3 quick check(s)"), "missing check count in {html}");
    assert!(!html.contains("could not be loaded"), "unexpected failures in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn section_view_renders_checks_independently() {
    let mut harness =
        setup_view_harness(ViewKind::Section(SECTION.to_string()), bundled_catalog());
    harness.rebuild();

    let html = harness.render();
    assert!(html.contains("What does COSHH stand for?"), "missing check in {html}");
    assert!(html.contains("Section 1 Knowledge Check"), "missing quiz in {html}");
    assert!(html.contains("Workplace exposure limit"), "missing key term in {html}");
    assert!(!html.contains("occupational lung disease."), "explanation leaked in {html}");
    assert_eq!(harness.check_handles.len(), 3);

    harness.check_handles.dispatch(2).call(CheckIntent::Select(2));
    harness.drive();

    let html = harness.render();
    assert!(html.contains("13,000 people die"), "missing explanation in {html}");
    assert!(!html.contains("has its own legislation"), "other check revealed in {html}");
    assert_eq!(html.matches("feedback__heading").count(), 1);
}

#[tokio::test(flavor = "current_thread")]
async fn section_view_isolates_broken_check() {
    let mut harness = setup_view_harness(
        ViewKind::Section("broken-1".to_string()),
        catalog_with_broken_check(),
    );
    harness.rebuild();

    let html = harness.render();
    assert!(html.contains("Still readable."), "missing prose in {html}");
    assert!(html.contains("This check is unavailable"), "missing notice in {html}");
    assert!(html.contains("Prompt fine"), "healthy check missing in {html}");
    assert!(html.contains("Wrap-up"), "quiz missing in {html}");
    assert_eq!(harness.check_handles.len(), 1);
}

#[tokio::test(flavor = "current_thread")]
async fn unknown_section_renders_not_found() {
    let mut harness =
        setup_view_harness(ViewKind::Section("no-such-section".to_string()), bundled_catalog());
    harness.rebuild();

    let html = harness.render();
    assert!(html.contains("does not exist"), "missing not found in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn exam_view_runs_a_full_attempt() {
    let mut harness = setup_view_harness(ViewKind::Exam(EXAM.to_string()), bundled_catalog());
    harness.rebuild();

    let html = harness.render();
    assert!(html.contains("Start exam"), "missing start in {html}");

    let dispatch = harness.exam_handles.dispatch();
    dispatch.call(ExamIntent::Start);
    harness.drive();

    let html = harness.render();
    assert!(html.contains("0 of 5 answered"), "missing progress in {html}");
    assert!(html.contains("Time: 0:00"), "missing timer in {html}");
    assert!(html.contains("Question 1 of 5"), "missing position in {html}");

    let answers: Vec<usize> = harness
        .exam_handles
        .attempt()
        .peek()
        .as_ref()
        .expect("attempt started")
        .quiz()
        .bank()
        .iter()
        .map(|question| question.correct_index())
        .collect();

    dispatch.call(ExamIntent::Quiz(QuizIntent::ToggleFlag(0)));
    harness.drive();
    for (index, option) in answers.into_iter().enumerate() {
        dispatch.call(ExamIntent::Quiz(QuizIntent::Select { question: index, option }));
        harness.drive();
    }
    dispatch.call(ExamIntent::Quiz(QuizIntent::Submit));
    harness.drive();

    let html = harness.render();
    assert!(html.contains("exam-results__verdict--pass"), "missing verdict in {html}");
    assert!(html.contains("Score: 5 / 5 (100%)"), "missing score in {html}");
    assert!(html.contains("Retake with new questions"), "missing retake in {html}");

    dispatch.call(ExamIntent::Filter(course_core::scoring::ReviewFilter::Flagged));
    harness.drive();
    let html = harness.render();
    assert_eq!(html.matches("quiz-question__explanation").count(), 1);
}

#[tokio::test(flavor = "current_thread")]
async fn exam_submit_is_blocked_until_every_answer() {
    let mut harness = setup_view_harness(ViewKind::Exam(EXAM.to_string()), bundled_catalog());
    harness.rebuild();
    let dispatch = harness.exam_handles.dispatch();
    dispatch.call(ExamIntent::Start);
    harness.drive();

    dispatch.call(ExamIntent::Quiz(QuizIntent::Select { question: 0, option: 0 }));
    dispatch.call(ExamIntent::Quiz(QuizIntent::Submit));
    harness.drive();

    let html = harness.render();
    assert!(html.contains("1 of 5 answered"), "missing progress in {html}");
    assert!(!html.contains("Retake with new questions"), "exam completed early in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn switching_exam_route_does_not_carry_the_attempt_over() {
    let mut harness = setup_view_harness(ViewKind::Exam(EXAM.to_string()), catalog_with_two_exams());
    harness.rebuild();
    let dispatch = harness.exam_handles.dispatch();
    dispatch.call(ExamIntent::Start);
    harness.drive();
    assert!(harness.render().contains("Question 1 of 5"));

    harness.show(ViewKind::Exam(OTHER_EXAM.to_string()));

    let html = harness.render();
    assert!(html.contains("Level 3 Module 2 Mock Exam"), "missing title in {html}");
    assert!(html.contains("Start exam"), "missing start in {html}");
    assert!(!html.contains("Question 1 of 5"), "previous attempt shown in {html}");

    dispatch.call(ExamIntent::Quiz(QuizIntent::Select { question: 0, option: 0 }));
    harness.drive();
    let attempt = harness.exam_handles.attempt();
    let answered = attempt.peek().as_ref().map(|running| running.quiz().progress().answered);
    assert_eq!(answered, Some(0), "answer leaked into the other exam's attempt");

    dispatch.call(ExamIntent::Start);
    harness.drive();
    let started = attempt.peek().as_ref().map(|running| running.exam().to_string());
    assert_eq!(started.as_deref(), Some(OTHER_EXAM));
    assert!(harness.render().contains("0 of 5 answered"));
}
