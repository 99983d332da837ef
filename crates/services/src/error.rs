//! Shared error types for the services crate.

use thiserror::Error;

use exam_core::model::ExamId;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by the session services.
///
/// `NoQuestions` is the one fatal, non-recoverable case: the session
/// refuses to exist. Everything else is handled locally — storage and
/// sign-in failures leave the in-memory attempt intact and retryable.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("exam {0:?} was not found")]
    ExamNotFound(ExamId),

    #[error("this exam has no questions")]
    NoQuestions,

    #[error("sign in to submit this attempt")]
    NotSignedIn,

    #[error("a submission is already in flight")]
    SubmissionInFlight,

    #[error("operation not valid in the current session stage")]
    InvalidStage,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
