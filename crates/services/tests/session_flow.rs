use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use exam_core::model::{
    CategoryId, Exam, ExamId, ExamResult, OptionLabel, Question, ResultId, UserId,
};
use exam_core::time::{fixed_clock, fixed_now};
use services::{
    ExamCatalog, SessionAction, SessionError, SessionService, SessionStage, SessionTick,
    StaticIdentity, SAVE_INTERVAL_SECS,
};
use storage::repository::{
    ExamRepository, InMemoryRepository, ResultRepository, ResumeStore, Storage, StorageError,
};

fn build_exam(id: u64, questions: usize, duration_minutes: u32) -> Exam {
    let questions = (0..questions)
        .map(|i| {
            Question::new(
                format!("Q{i}"),
                vec!["a".into(), "b".into(), "c".into(), "d".into()],
                OptionLabel::A,
                Some(format!("Because {i}")),
            )
            .unwrap()
        })
        .collect();
    Exam::new(
        ExamId::new(id),
        "Flow Mock",
        CategoryId::new(1),
        "General",
        questions,
        duration_minutes,
        2.0,
        0.5,
    )
    .unwrap()
}

fn service_with(repo: &InMemoryRepository) -> SessionService {
    SessionService::new(
        fixed_clock(),
        Storage {
            exams: Arc::new(repo.clone()),
            results: Arc::new(repo.clone()),
            reports: Arc::new(repo.clone()),
        },
        Arc::new(repo.clone()),
        Arc::new(StaticIdentity::signed_in(UserId::new(7), "taker@example.com")),
    )
}

#[tokio::test]
async fn full_attempt_submits_and_clears_the_snapshot() {
    let repo = InMemoryRepository::new();
    let exam = build_exam(1, 4, 30);
    repo.upsert_exam(&exam).await.unwrap();
    let service = service_with(&repo);

    let mut session = service
        .begin(exam.id(), SessionAction::Start)
        .await
        .unwrap();
    session.select_answer(OptionLabel::A);
    session.next();
    session.select_answer(OptionLabel::B);

    // Run past one save cadence so a snapshot lands on disk.
    for _ in 0..SAVE_INTERVAL_SECS {
        service.tick(&mut session).await;
    }
    assert!(repo.load(UserId::new(7)).await.unwrap().is_some());

    let result = service.submit(&mut session).await.unwrap();
    assert_eq!(session.stage(), SessionStage::Results);
    assert_eq!(result.correct_count(), 1);
    assert_eq!(result.incorrect_count(), 1);
    assert!((result.score() - 1.5).abs() < f64::EPSILON);
    assert!((result.max_score() - 8.0).abs() < f64::EPSILON);
    assert_eq!(result.submitted_at(), fixed_now());

    // Snapshot is gone; the result is on record.
    assert!(repo.load(UserId::new(7)).await.unwrap().is_none());
    let history = service.list_results().await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].exam_id(), exam.id());
}

#[tokio::test]
async fn resume_restores_the_saved_attempt() {
    let repo = InMemoryRepository::new();
    let exam = build_exam(2, 5, 30);
    repo.upsert_exam(&exam).await.unwrap();
    let service = service_with(&repo);

    let mut first = service
        .begin(exam.id(), SessionAction::Start)
        .await
        .unwrap();
    first.select_answer(OptionLabel::C);
    first.goto(3);
    first.toggle_mark();
    for _ in 0..SAVE_INTERVAL_SECS {
        service.tick(&mut first).await;
    }
    drop(first);

    let resumed = service
        .begin(exam.id(), SessionAction::Resume)
        .await
        .unwrap();
    assert_eq!(resumed.current_index(), 3);
    assert_eq!(
        resumed.remaining_seconds(),
        Some(exam.duration_seconds() - SAVE_INTERVAL_SECS)
    );
    assert_eq!(
        resumed.ledger().get(0).unwrap().answer,
        Some(OptionLabel::C)
    );
    assert_eq!(resumed.attempt_summary().attempted, 1);
}

#[tokio::test]
async fn resume_for_another_exam_starts_fresh() {
    let repo = InMemoryRepository::new();
    let first_exam = build_exam(3, 5, 30);
    let second_exam = build_exam(4, 5, 30);
    repo.upsert_exam(&first_exam).await.unwrap();
    repo.upsert_exam(&second_exam).await.unwrap();
    let service = service_with(&repo);

    let mut session = service
        .begin(first_exam.id(), SessionAction::Start)
        .await
        .unwrap();
    session.select_answer(OptionLabel::B);
    for _ in 0..SAVE_INTERVAL_SECS {
        service.tick(&mut session).await;
    }

    let other = service
        .begin(second_exam.id(), SessionAction::Resume)
        .await
        .unwrap();
    assert_eq!(other.current_index(), 0);
    assert_eq!(other.attempt_summary().attempted, 0);
    assert_eq!(
        other.remaining_seconds(),
        Some(second_exam.duration_seconds())
    );
}

/// Result sink that fails until its switch is flipped.
struct FlakyResults {
    inner: InMemoryRepository,
    failing: AtomicBool,
}

#[async_trait]
impl ResultRepository for FlakyResults {
    async fn append_result(&self, result: &ExamResult) -> Result<ResultId, StorageError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::Connection("simulated outage".into()));
        }
        self.inner.append_result(result).await
    }

    async fn list_results_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<ExamResult>, StorageError> {
        self.inner.list_results_for_user(user_id).await
    }
}

#[tokio::test]
async fn failed_submission_keeps_the_attempt_retryable() {
    let repo = InMemoryRepository::new();
    let exam = build_exam(5, 3, 30);
    repo.upsert_exam(&exam).await.unwrap();

    let flaky = Arc::new(FlakyResults {
        inner: repo.clone(),
        failing: AtomicBool::new(true),
    });
    let service = SessionService::new(
        fixed_clock(),
        Storage {
            exams: Arc::new(repo.clone()),
            results: Arc::clone(&flaky) as Arc<dyn ResultRepository>,
            reports: Arc::new(repo.clone()),
        },
        Arc::new(repo.clone()),
        Arc::new(StaticIdentity::signed_in(UserId::new(7), "taker@example.com")),
    );

    let mut session = service
        .begin(exam.id(), SessionAction::Start)
        .await
        .unwrap();
    session.select_answer(OptionLabel::A);
    service.tick(&mut session).await;

    let err = service.submit(&mut session).await.unwrap_err();
    assert!(matches!(err, SessionError::Storage(_)));
    assert_eq!(session.stage(), SessionStage::Exam);
    assert!(!session.is_submitting());
    assert_eq!(session.attempt_summary().attempted, 1);

    // The outage ends; the same attempt submits cleanly.
    flaky.failing.store(false, Ordering::SeqCst);
    let result = service.submit(&mut session).await.unwrap();
    assert_eq!(result.correct_count(), 1);
    assert_eq!(session.stage(), SessionStage::Results);
}

#[tokio::test]
async fn submission_without_identity_is_refused() {
    let repo = InMemoryRepository::new();
    let exam = build_exam(6, 2, 30);
    repo.upsert_exam(&exam).await.unwrap();
    let service = SessionService::new(
        fixed_clock(),
        Storage {
            exams: Arc::new(repo.clone()),
            results: Arc::new(repo.clone()),
            reports: Arc::new(repo.clone()),
        },
        Arc::new(repo.clone()),
        Arc::new(StaticIdentity::signed_out()),
    );

    let mut session = service
        .begin(exam.id(), SessionAction::Start)
        .await
        .unwrap();
    let err = service.submit(&mut session).await.unwrap_err();
    assert!(matches!(err, SessionError::NotSignedIn));
    assert_eq!(session.stage(), SessionStage::Exam);
    assert!(!session.is_submitting());
}

#[tokio::test]
async fn time_up_freezes_the_ledger_but_submission_still_works() {
    let repo = InMemoryRepository::new();
    let exam = build_exam(7, 2, 30);
    repo.upsert_exam(&exam).await.unwrap();
    let service = service_with(&repo);

    // Seed a nearly expired snapshot, then resume into it.
    let mut session = service
        .begin(exam.id(), SessionAction::Start)
        .await
        .unwrap();
    session.select_answer(OptionLabel::A);
    repo.save(UserId::new(7), &session.snapshot().unwrap())
        .await
        .unwrap();
    let snapshot = repo.load(UserId::new(7)).await.unwrap().unwrap();
    let nearly_out = exam_core::model::ResumeSnapshot::new(
        snapshot.exam_id,
        snapshot.current_index,
        snapshot.ledger,
        1,
    );
    repo.save(UserId::new(7), &nearly_out).await.unwrap();

    let mut session = service
        .begin(exam.id(), SessionAction::Resume)
        .await
        .unwrap();
    assert_eq!(service.tick(&mut session).await, SessionTick::TimeUp);
    assert!(!session.select_answer(OptionLabel::B));

    let result = service.submit(&mut session).await.unwrap();
    assert_eq!(result.correct_count(), 1);
    assert_eq!(session.stage(), SessionStage::Results);
}

#[tokio::test]
async fn practice_never_touches_the_resume_store() {
    let repo = InMemoryRepository::new();
    let exam = build_exam(8, 3, 30);
    repo.upsert_exam(&exam).await.unwrap();
    let service = service_with(&repo);

    let mut session = service
        .begin(exam.id(), SessionAction::Practice)
        .await
        .unwrap();
    session.select_answer(OptionLabel::D);
    for _ in 0..(SAVE_INTERVAL_SECS * 2) {
        assert_eq!(service.tick(&mut session).await, SessionTick::Idle);
    }
    assert!(repo.load(UserId::new(7)).await.unwrap().is_none());
}

#[tokio::test]
async fn question_report_is_filed_against_the_current_question() {
    let repo = InMemoryRepository::new();
    let exam = build_exam(9, 3, 30);
    repo.upsert_exam(&exam).await.unwrap();
    let service = service_with(&repo);

    let mut session = service
        .begin(exam.id(), SessionAction::Start)
        .await
        .unwrap();
    session.goto(2);
    service
        .report_current_question(&session, "Option b is also correct")
        .await
        .unwrap();

    let reports = repo.reports().unwrap();
    assert_eq!(reports.len(), 1);
    let (_, report) = &reports[0];
    assert_eq!(report.question_index, 2);
    assert_eq!(report.question_prompt, "Q2");
    assert_eq!(report.user_email, "taker@example.com");
    assert_eq!(report.reported_at, fixed_now());
}

#[tokio::test]
async fn catalog_lists_and_fetches_exams() {
    let repo = InMemoryRepository::new();
    repo.upsert_exam(&build_exam(10, 2, 30)).await.unwrap();
    repo.upsert_exam(&build_exam(11, 2, 30)).await.unwrap();
    let catalog = ExamCatalog::new(Storage {
        exams: Arc::new(repo.clone()),
        results: Arc::new(repo.clone()),
        reports: Arc::new(repo),
    });

    let exams = catalog.list_exams().await.unwrap();
    assert_eq!(exams.len(), 2);
    assert_eq!(catalog.get_exam(ExamId::new(10)).await.unwrap().title(), "Flow Mock");
    let err = catalog.get_exam(ExamId::new(99)).await.unwrap_err();
    assert!(matches!(err, SessionError::ExamNotFound(_)));
}
