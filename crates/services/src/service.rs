use std::sync::Arc;

use tracing::warn;

use exam_core::model::{Exam, ExamId, ExamResult, ReportId, ResumeSnapshot};
use exam_core::scoring;
use exam_core::time::Clock;
use storage::repository::{QuestionReport, ResumeStore, Storage};

use crate::error::SessionError;
use crate::identity::{IdentityProvider, UserIdentity};
use crate::session::{ExamSession, SessionAction, SessionTick};

/// Orchestrates sessions against storage, the resume store, and the
/// signed-in identity.
///
/// The session itself stays pure; every async edge (loading exams,
/// snapshot save/load, result persistence, question reports) goes
/// through here. Failure policy follows the session's: autosave and
/// post-submit snapshot cleanup degrade to a warning, submission
/// failures roll the session back to a retryable attempt.
#[derive(Clone)]
pub struct SessionService {
    clock: Clock,
    storage: Storage,
    resume: Arc<dyn ResumeStore>,
    identity: Arc<dyn IdentityProvider>,
}

impl SessionService {
    #[must_use]
    pub fn new(
        clock: Clock,
        storage: Storage,
        resume: Arc<dyn ResumeStore>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            clock,
            storage,
            resume,
            identity,
        }
    }

    #[must_use]
    pub fn current_user(&self) -> Option<UserIdentity> {
        self.identity.current_user()
    }

    /// Loads the exam and opens a session for it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::ExamNotFound` when the exam does not
    /// exist, `SessionError::NoQuestions` when it is empty, and
    /// `SessionError::Storage` for load failures.
    pub async fn begin(
        &self,
        exam_id: ExamId,
        action: SessionAction,
    ) -> Result<ExamSession, SessionError> {
        let exam = self
            .storage
            .exams
            .get_exam(exam_id)
            .await?
            .ok_or(SessionError::ExamNotFound(exam_id))?;
        self.begin_with_exam(exam, action).await
    }

    /// Opens a session for an already loaded exam.
    ///
    /// For `Resume`, the device snapshot is consulted when a user is
    /// signed in; an unreadable snapshot degrades to a fresh start with
    /// a warning rather than an error.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoQuestions` for an empty exam.
    pub async fn begin_with_exam(
        &self,
        exam: Exam,
        action: SessionAction,
    ) -> Result<ExamSession, SessionError> {
        let snapshot = match (&action, self.identity.current_user()) {
            (SessionAction::Resume, Some(user)) => match self.resume.load(user.id).await {
                Ok(snapshot) => snapshot,
                Err(err) => {
                    warn!(user_id = %user.id, error = %err, "resume snapshot unreadable, starting fresh");
                    None
                }
            },
            _ => None,
        };
        ExamSession::new(exam, action, snapshot)
    }

    /// Advances the session timer by one second, persisting a snapshot
    /// whenever the save cadence comes due. A failed save is logged and
    /// swallowed; the attempt continues in memory.
    pub async fn tick(&self, session: &mut ExamSession) -> SessionTick {
        let outcome = session.tick();
        if let SessionTick::Running { save_due: true, .. } = outcome {
            self.save_snapshot(session).await;
        }
        outcome
    }

    async fn save_snapshot(&self, session: &ExamSession) {
        let Some(snapshot) = session.snapshot() else {
            return;
        };
        self.save_progress(&snapshot).await;
    }

    /// Persists a progress snapshot for the signed-in user; failures
    /// are logged and swallowed.
    pub async fn save_progress(&self, snapshot: &ResumeSnapshot) {
        let Some(user) = self.identity.current_user() else {
            return;
        };
        if let Err(err) = self.resume.save(user.id, snapshot).await {
            warn!(user_id = %user.id, error = %err, "failed to save progress snapshot");
        }
    }

    /// Scores the session's current ledger into a submittable result.
    ///
    /// Pure apart from the clock read; persisting is a separate step so
    /// the desktop shell can interleave it with its own state updates.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotSignedIn` without a signed-in user.
    pub fn grade(&self, session: &ExamSession) -> Result<ExamResult, SessionError> {
        let user = self
            .identity
            .current_user()
            .ok_or(SessionError::NotSignedIn)?;
        Ok(
            scoring::score(session.exam(), session.ledger()).into_result(
                session.exam(),
                user.id,
                &user.email,
                self.clock.now(),
                session.ledger().clone(),
            ),
        )
    }

    /// Appends a graded result to history and clears the progress
    /// snapshot. Snapshot cleanup is best-effort: a leftover snapshot
    /// is rejected at the next resume by its exam-id/length check, so
    /// failing to delete it only costs a warning.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` when appending fails; the
    /// snapshot is left untouched in that case.
    pub async fn persist_submission(&self, result: &ExamResult) -> Result<(), SessionError> {
        self.storage.results.append_result(result).await?;
        if let Err(err) = self.resume.clear(result.user_id()).await {
            warn!(user_id = %result.user_id(), error = %err, "failed to clear progress snapshot");
        }
        Ok(())
    }

    /// Scores the attempt, persists the result, and moves the session
    /// to its results screen.
    ///
    /// On any failure the session is rolled back to a retryable live
    /// attempt.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotSignedIn` without a signed-in user,
    /// `SessionError::InvalidStage`/`SubmissionInFlight` from the
    /// session transition, and `SessionError::Storage` when persisting
    /// the result fails.
    pub async fn submit(&self, session: &mut ExamSession) -> Result<ExamResult, SessionError> {
        let result = self.grade(session)?;
        session.begin_submit()?;

        if let Err(err) = self.persist_submission(&result).await {
            session.fail_submit();
            return Err(err);
        }

        session.complete_submit(result.clone());
        Ok(result)
    }

    /// Files a report against one question of an exam.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotSignedIn` without a signed-in user,
    /// `SessionError::InvalidStage` for an out-of-range question index,
    /// and `SessionError::Storage` for persistence failures.
    pub async fn report_question(
        &self,
        exam: &Exam,
        question_index: usize,
        message: impl Into<String>,
    ) -> Result<ReportId, SessionError> {
        let user = self
            .identity
            .current_user()
            .ok_or(SessionError::NotSignedIn)?;
        let question = exam
            .question(question_index)
            .ok_or(SessionError::InvalidStage)?;

        let report = QuestionReport {
            exam_id: exam.id(),
            exam_title: exam.title().to_string(),
            question_index,
            question_prompt: question.prompt().to_string(),
            user_id: user.id,
            user_email: user.email,
            message: message.into(),
            reported_at: self.clock.now(),
        };
        Ok(self.storage.reports.submit_report(&report).await?)
    }

    /// Files a report against the session's current question.
    ///
    /// # Errors
    ///
    /// Same as [`SessionService::report_question`].
    pub async fn report_current_question(
        &self,
        session: &ExamSession,
        message: impl Into<String>,
    ) -> Result<ReportId, SessionError> {
        self.report_question(session.exam(), session.current_index(), message)
            .await
    }

    /// Past submissions of the signed-in user, newest first.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotSignedIn` without a signed-in user and
    /// `SessionError::Storage` for load failures.
    pub async fn list_results(&self) -> Result<Vec<ExamResult>, SessionError> {
        let user = self
            .identity
            .current_user()
            .ok_or(SessionError::NotSignedIn)?;
        Ok(self.storage.results.list_results_for_user(user.id).await?)
    }

    /// The signed-in user's resumable snapshot, if any. Read-only peek
    /// for the browse screen's "resume" affordance; an unreadable
    /// snapshot reads as absent.
    pub async fn resumable_snapshot(&self) -> Option<ResumeSnapshot> {
        let user = self.identity.current_user()?;
        match self.resume.load(user.id).await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(user_id = %user.id, error = %err, "failed to read progress snapshot");
                None
            }
        }
    }
}
