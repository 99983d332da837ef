use exam_core::model::{
    AnswerLedger, CategoryId, Exam, ExamId, OptionLabel, Question, UserId,
};
use exam_core::scoring;
use exam_core::time::fixed_now;
use storage::repository::{ExamRepository, InMemoryRepository, ResultRepository};

use super::test_harness::{ViewKind, setup_view_harness};
use crate::routes::AttemptMode;

fn build_exam(id: u64, questions: usize) -> Exam {
    let questions = (0..questions)
        .map(|i| {
            Question::new(
                format!("What is item {i}?"),
                vec![
                    format!("alpha {i}"),
                    format!("beta {i}"),
                    format!("gamma {i}"),
                    format!("delta {i}"),
                ],
                OptionLabel::A,
                Some(format!("Alpha, because {i}.")),
            )
            .unwrap()
        })
        .collect();
    Exam::new(
        ExamId::new(id),
        "General Knowledge Mock",
        CategoryId::new(1),
        "General",
        questions,
        30,
        2.0,
        0.5,
    )
    .unwrap()
}

#[tokio::test(flavor = "current_thread")]
async fn home_view_smoke_lists_exams_and_history() {
    let repo = InMemoryRepository::new();
    let exam = build_exam(1, 3);
    repo.upsert_exam(&exam).await.unwrap();

    let mut ledger = AnswerLedger::blank(3);
    ledger.select_answer(0, OptionLabel::A);
    let result = scoring::score(&exam, &ledger).into_result(
        &exam,
        UserId::new(7),
        "taker@example.com",
        fixed_now(),
        ledger,
    );
    repo.append_result(&result).await.unwrap();

    let mut harness = setup_view_harness(ViewKind::Home, repo);
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();

    assert!(
        html.contains("General Knowledge Mock"),
        "missing exam title in {html}"
    );
    assert!(html.contains("3 questions"), "missing meta in {html}");
    assert!(html.contains("Start"), "missing start action in {html}");
    assert!(html.contains("Practice"), "missing practice action in {html}");
    assert!(html.contains("Past attempts"), "missing history in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn attempt_view_smoke_renders_the_first_question() {
    let repo = InMemoryRepository::new();
    repo.upsert_exam(&build_exam(2, 4)).await.unwrap();

    let mut harness = setup_view_harness(ViewKind::Attempt(2, AttemptMode::Start), repo);
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();

    assert!(
        html.contains("What is item 0?"),
        "missing first prompt in {html}"
    );
    assert!(
        html.contains("Question 1 of 4"),
        "missing question counter in {html}"
    );
    assert!(html.contains("alpha 0"), "missing option text in {html}");
    assert!(html.contains("Submit test"), "missing submit in {html}");
    assert!(html.contains("30:00"), "missing timer in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn practice_view_smoke_shows_the_practice_badge() {
    let repo = InMemoryRepository::new();
    repo.upsert_exam(&build_exam(3, 2)).await.unwrap();

    let mut harness = setup_view_harness(ViewKind::Attempt(3, AttemptMode::Practice), repo);
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();

    assert!(html.contains("Practice"), "missing badge in {html}");
    assert!(
        html.contains("What is item 0?"),
        "missing prompt in {html}"
    );
    assert!(
        !html.contains("Submit test"),
        "practice must not offer submission: {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn review_view_smoke_renders_the_scorecard() {
    let repo = InMemoryRepository::new();
    let exam = build_exam(4, 4);
    repo.upsert_exam(&exam).await.unwrap();

    let mut ledger = AnswerLedger::blank(4);
    ledger.select_answer(0, OptionLabel::A);
    ledger.select_answer(1, OptionLabel::B);
    let result = scoring::score(&exam, &ledger).into_result(
        &exam,
        UserId::new(7),
        "taker@example.com",
        fixed_now(),
        ledger,
    );
    repo.append_result(&result).await.unwrap();

    let mut harness = setup_view_harness(ViewKind::Review(0), repo);
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();

    assert!(html.contains("1.50"), "missing score in {html}");
    assert!(html.contains("8.00"), "missing max score in {html}");
    assert!(html.contains("Correct: 1"), "missing breakdown in {html}");
    assert!(
        html.contains("View solutions"),
        "missing solutions action in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn attempt_view_smoke_fails_cleanly_for_missing_exam() {
    let repo = InMemoryRepository::new();
    let mut harness = setup_view_harness(ViewKind::Attempt(99, AttemptMode::Start), repo);
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();

    assert!(
        html.contains("Cannot open this test"),
        "missing failure screen in {html}"
    );
}
