use std::path::PathBuf;

use course_core::model::{Assessment, ContentBlock, SectionSlug};
use course_core::quiz::{QuizConfig, QuizSession};
use course_core::time::fixed_clock;
use course_core::{CheckState, InlineCheckSession};
use rand::SeedableRng;
use rand::rngs::StdRng;
use services::{CourseCatalog, ExamService};

fn content_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../content")
}

#[test]
fn bundled_content_loads_cleanly() {
    let catalog = CourseCatalog::load(content_dir()).expect("load content");

    assert!(catalog.is_clean(), "failures: {:?}", catalog.failures());
    assert!(catalog.sections().count() >= 1);
    assert!(catalog.exam_banks().count() >= 1);
}

#[test]
fn section_quiz_scores_two_of_three() {
    let catalog = CourseCatalog::load(content_dir()).expect("load content");
    let slug: SectionSlug = "coshh-module-1-section-1".parse().unwrap();
    let section = catalog.section(&slug).expect("coshh section");

    let Some(Assessment::Ready(spec)) = section.quiz() else {
        panic!("section quiz should be ready");
    };
    let mut quiz =
        QuizSession::new(spec.title.clone(), spec.bank.clone(), QuizConfig::default()).unwrap();
    quiz.select(0, 0).unwrap();
    quiz.select(1, 0).unwrap();
    assert_eq!(quiz.result(), None);
    quiz.select(2, 1).unwrap();

    let result = quiz.submit().unwrap();

    assert_eq!(result.to_string(), "2/3");
}

#[test]
fn inline_checks_in_a_section_are_independent() {
    let catalog = CourseCatalog::load(content_dir()).expect("load content");
    let slug: SectionSlug = "coshh-module-1-section-1".parse().unwrap();
    let section = catalog.section(&slug).expect("coshh section");

    let mut checks: Vec<InlineCheckSession> =
        section.checks().cloned().map(InlineCheckSession::new).collect();
    assert_eq!(checks.len(), 3);

    checks[2].select(2).unwrap();

    assert_eq!(checks[2].state().is_correct(), Some(true));
    assert_eq!(checks[0].state(), CheckState::Unanswered);
    assert!(
        section
            .blocks()
            .iter()
            .any(|block| matches!(block, ContentBlock::KeyTerm { .. }))
    );
}

#[test]
fn mock_exam_from_bundled_bank() {
    let catalog = CourseCatalog::load(content_dir()).expect("load content");
    let slug: SectionSlug = "level-3-module-1".parse().unwrap();
    let bank = catalog.exam_bank(&slug).expect("exam bank");

    // The bundled bank is a small sample, so the report flags its size.
    assert!(!bank.report().is_valid());

    let service = ExamService::new(fixed_clock(), 30, 80).unwrap();
    let mut attempt = service
        .start_with_rng(bank, &mut StdRng::seed_from_u64(42))
        .unwrap();
    assert_eq!(attempt.quiz().len(), bank.bank().len());

    for index in 0..attempt.quiz().len() {
        let correct = attempt.quiz().question(index).unwrap().correct_index();
        attempt.quiz_mut().select(index, correct).unwrap();
    }
    let report = service.submit(&mut attempt).unwrap();

    assert!(report.result.is_perfect());
    assert!(report.passed());
}
