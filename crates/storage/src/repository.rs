use async_trait::async_trait;
use chrono::{DateTime, Utc};
use exam_core::model::{
    Exam, ExamId, ExamResult, ReportId, ResultId, ResumeSnapshot, UserId,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("io error: {0}")]
    Io(String),
}

/// A user-reported issue with one question of an exam.
///
/// Produced by the "report this question" surface; the session engine
/// hands over the current question/index and never waits on the
/// outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionReport {
    pub exam_id: ExamId,
    pub exam_title: String,
    pub question_index: usize,
    pub question_prompt: String,
    pub user_id: UserId,
    pub user_email: String,
    pub message: String,
    pub reported_at: DateTime<Utc>,
}

/// Read access to externally authored exams.
#[async_trait]
pub trait ExamRepository: Send + Sync {
    /// Persist or update an exam (seeding and tests; authoring itself
    /// lives outside this system).
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the exam cannot be stored.
    async fn upsert_exam(&self, exam: &Exam) -> Result<(), StorageError>;

    /// Fetch an exam by ID, `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` for connection or mapping failures.
    async fn get_exam(&self, id: ExamId) -> Result<Option<Exam>, StorageError>;

    /// List up to `limit` exams for the browse screen.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` for connection or mapping failures.
    async fn list_exams(&self, limit: u32) -> Result<Vec<Exam>, StorageError>;
}

/// Append-only store of submitted results.
#[async_trait]
pub trait ResultRepository: Send + Sync {
    /// Append a result, returning its new identifier.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the result cannot be stored.
    async fn append_result(&self, result: &ExamResult) -> Result<ResultId, StorageError>;

    /// All results submitted by `user_id`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` for connection or mapping failures.
    async fn list_results_for_user(&self, user_id: UserId)
    -> Result<Vec<ExamResult>, StorageError>;
}

/// Device-scoped persistence of in-progress attempt snapshots.
///
/// Keyed by user identity only: one in-progress exam per user at a
/// time; `save` overwrites unconditionally.
#[async_trait]
pub trait ResumeStore: Send + Sync {
    /// Overwrite the snapshot for `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the snapshot cannot be written.
    async fn save(&self, user_id: UserId, snapshot: &ResumeSnapshot) -> Result<(), StorageError>;

    /// Load the snapshot for `user_id`, `None` when there is none.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` for read failures other than absence.
    async fn load(&self, user_id: UserId) -> Result<Option<ResumeSnapshot>, StorageError>;

    /// Delete the snapshot for `user_id`; absence is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if deletion fails.
    async fn clear(&self, user_id: UserId) -> Result<(), StorageError>;
}

/// Sink for user-submitted question reports.
#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Store a report, returning its identifier.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the report cannot be stored.
    async fn submit_report(&self, report: &QuestionReport) -> Result<ReportId, StorageError>;
}

/// Simple in-memory implementation of every port, for testing and
/// prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    exams: Arc<Mutex<HashMap<ExamId, Exam>>>,
    results: Arc<Mutex<Vec<(ResultId, ExamResult)>>>,
    snapshots: Arc<Mutex<HashMap<UserId, ResumeSnapshot>>>,
    reports: Arc<Mutex<Vec<(ReportId, QuestionReport)>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored reports, oldest first. Test observability only.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn reports(&self) -> Result<Vec<(ReportId, QuestionReport)>, StorageError> {
        let guard = self
            .reports
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }
}

#[async_trait]
impl ExamRepository for InMemoryRepository {
    async fn upsert_exam(&self, exam: &Exam) -> Result<(), StorageError> {
        let mut guard = self
            .exams
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(exam.id(), exam.clone());
        Ok(())
    }

    async fn get_exam(&self, id: ExamId) -> Result<Option<Exam>, StorageError> {
        let guard = self
            .exams
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(&id).cloned())
    }

    async fn list_exams(&self, limit: u32) -> Result<Vec<Exam>, StorageError> {
        let guard = self
            .exams
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut exams: Vec<Exam> = guard.values().cloned().collect();
        exams.sort_by_key(Exam::id);
        exams.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(exams)
    }
}

#[async_trait]
impl ResultRepository for InMemoryRepository {
    async fn append_result(&self, result: &ExamResult) -> Result<ResultId, StorageError> {
        let mut guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let id = ResultId::new(guard.len() as u64 + 1);
        guard.push((id, result.clone()));
        Ok(id)
    }

    async fn list_results_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<ExamResult>, StorageError> {
        let guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut results: Vec<ExamResult> = guard
            .iter()
            .filter(|(_, r)| r.user_id() == user_id)
            .map(|(_, r)| r.clone())
            .collect();
        results.sort_by_key(|r| std::cmp::Reverse(r.submitted_at()));
        Ok(results)
    }
}

#[async_trait]
impl ResumeStore for InMemoryRepository {
    async fn save(&self, user_id: UserId, snapshot: &ResumeSnapshot) -> Result<(), StorageError> {
        let mut guard = self
            .snapshots
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(user_id, snapshot.clone());
        Ok(())
    }

    async fn load(&self, user_id: UserId) -> Result<Option<ResumeSnapshot>, StorageError> {
        let guard = self
            .snapshots
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(&user_id).cloned())
    }

    async fn clear(&self, user_id: UserId) -> Result<(), StorageError> {
        let mut guard = self
            .snapshots
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(&user_id);
        Ok(())
    }
}

#[async_trait]
impl ReportRepository for InMemoryRepository {
    async fn submit_report(&self, report: &QuestionReport) -> Result<ReportId, StorageError> {
        let mut guard = self
            .reports
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let id = ReportId::new(guard.len() as u64 + 1);
        guard.push((id, report.clone()));
        Ok(id)
    }
}

/// Aggregates the remote-store ports behind trait objects for easy
/// backend swapping. The resume store stays separate: it is device
/// storage, not part of the document store.
#[derive(Clone)]
pub struct Storage {
    pub exams: Arc<dyn ExamRepository>,
    pub results: Arc<dyn ResultRepository>,
    pub reports: Arc<dyn ReportRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        Self {
            exams: Arc::new(repo.clone()),
            results: Arc::new(repo.clone()),
            reports: Arc::new(repo),
        }
    }

    /// Connect to `SQLite` and run migrations.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if connecting or migrating fails.
    pub async fn sqlite(database_url: &str) -> Result<Self, crate::sqlite::SqliteInitError> {
        let repo = crate::sqlite::SqliteRepository::connect(database_url).await?;
        crate::sqlite::run_migrations(repo.pool()).await?;
        Ok(Self {
            exams: Arc::new(repo.clone()),
            results: Arc::new(repo.clone()),
            reports: Arc::new(repo),
        })
    }
}
