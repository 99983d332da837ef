use exam_core::model::{Exam, ExamId};
use storage::repository::Storage;

use crate::error::SessionError;

/// Maximum exams shown on the browse screen.
const BROWSE_LIMIT: u32 = 100;

/// Read-only exam browsing for the home screen.
#[derive(Clone)]
pub struct ExamCatalog {
    storage: Storage,
}

impl ExamCatalog {
    #[must_use]
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Exams available to attempt.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` for load failures.
    pub async fn list_exams(&self) -> Result<Vec<Exam>, SessionError> {
        Ok(self.storage.exams.list_exams(BROWSE_LIMIT).await?)
    }

    /// One exam by ID.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::ExamNotFound` when absent and
    /// `SessionError::Storage` for load failures.
    pub async fn get_exam(&self, id: ExamId) -> Result<Exam, SessionError> {
        self.storage
            .exams
            .get_exam(id)
            .await?
            .ok_or(SessionError::ExamNotFound(id))
    }
}
