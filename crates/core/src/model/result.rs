use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::{CategoryId, ExamId, UserId};
use crate::model::ledger::AnswerLedger;

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum ExamResultError {
    #[error("percentage {got} does not match score {score} of {max_score}")]
    PercentageMismatch { got: f64, score: f64, max_score: f64 },

    #[error("correct + incorrect ({counted}) exceeds stored answer count ({answers})")]
    CountMismatch { counted: u32, answers: usize },
}

/// Tolerance when re-checking the persisted percentage invariant.
const PERCENTAGE_EPSILON: f64 = 1e-6;

/// The immutable record of one submitted attempt.
///
/// Born exactly once per submission, then append-only history: the sole
/// artifact persisted remotely and the sole input when re-entering a
/// completed attempt. `answers` is optional because legacy results were
/// stored without the ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct ExamResult {
    score: f64,
    max_score: f64,
    correct_count: u32,
    incorrect_count: u32,
    percentage: f64,
    user_id: UserId,
    user_email: String,
    exam_id: ExamId,
    exam_title: String,
    category_id: CategoryId,
    category_name: String,
    submitted_at: DateTime<Utc>,
    answers: Option<AnswerLedger>,
}

impl ExamResult {
    /// Rehydrates a result from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `ExamResultError::PercentageMismatch` when the stored
    /// percentage disagrees with `score / max_score * 100` (or with 0
    /// for a zero max score), and `ExamResultError::CountMismatch` when
    /// the counted answers cannot fit the stored ledger.
    #[allow(clippy::too_many_arguments)]
    pub fn from_persisted(
        score: f64,
        max_score: f64,
        correct_count: u32,
        incorrect_count: u32,
        percentage: f64,
        user_id: UserId,
        user_email: String,
        exam_id: ExamId,
        exam_title: String,
        category_id: CategoryId,
        category_name: String,
        submitted_at: DateTime<Utc>,
        answers: Option<AnswerLedger>,
    ) -> Result<Self, ExamResultError> {
        let expected = if max_score > 0.0 {
            score / max_score * 100.0
        } else {
            0.0
        };
        if (percentage - expected).abs() > PERCENTAGE_EPSILON {
            return Err(ExamResultError::PercentageMismatch {
                got: percentage,
                score,
                max_score,
            });
        }

        if let Some(ledger) = &answers {
            let counted = correct_count + incorrect_count;
            if counted as usize > ledger.len() {
                return Err(ExamResultError::CountMismatch {
                    counted,
                    answers: ledger.len(),
                });
            }
        }

        Ok(Self {
            score,
            max_score,
            correct_count,
            incorrect_count,
            percentage,
            user_id,
            user_email,
            exam_id,
            exam_title,
            category_id,
            category_name,
            submitted_at,
            answers,
        })
    }

    /// Crate-internal constructor for the scoring engine, which upholds
    /// the percentage invariant by construction.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        score: f64,
        max_score: f64,
        correct_count: u32,
        incorrect_count: u32,
        percentage: f64,
        user_id: UserId,
        user_email: String,
        exam_id: ExamId,
        exam_title: String,
        category_id: CategoryId,
        category_name: String,
        submitted_at: DateTime<Utc>,
        answers: Option<AnswerLedger>,
    ) -> Self {
        Self {
            score,
            max_score,
            correct_count,
            incorrect_count,
            percentage,
            user_id,
            user_email,
            exam_id,
            exam_title,
            category_id,
            category_name,
            submitted_at,
            answers,
        }
    }

    #[must_use]
    pub fn score(&self) -> f64 {
        self.score
    }

    #[must_use]
    pub fn max_score(&self) -> f64 {
        self.max_score
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    #[must_use]
    pub fn incorrect_count(&self) -> u32 {
        self.incorrect_count
    }

    #[must_use]
    pub fn percentage(&self) -> f64 {
        self.percentage
    }

    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    #[must_use]
    pub fn user_email(&self) -> &str {
        &self.user_email
    }

    #[must_use]
    pub fn exam_id(&self) -> ExamId {
        self.exam_id
    }

    #[must_use]
    pub fn exam_title(&self) -> &str {
        &self.exam_title
    }

    #[must_use]
    pub fn category_id(&self) -> CategoryId {
        self.category_id
    }

    #[must_use]
    pub fn category_name(&self) -> &str {
        &self.category_name
    }

    #[must_use]
    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }

    /// The ledger frozen at submission, absent on legacy results.
    #[must_use]
    pub fn answers(&self) -> Option<&AnswerLedger> {
        self.answers.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn build(percentage: f64) -> Result<ExamResult, ExamResultError> {
        ExamResult::from_persisted(
            5.0,
            20.0,
            3,
            2,
            percentage,
            UserId::new(1),
            "taker@example.com".into(),
            ExamId::new(2),
            "Mock".into(),
            CategoryId::new(3),
            "Math".into(),
            fixed_now(),
            Some(AnswerLedger::blank(10)),
        )
    }

    #[test]
    fn accepts_consistent_percentage() {
        let result = build(25.0).unwrap();
        assert_eq!(result.correct_count(), 3);
        assert_eq!(result.answers().unwrap().len(), 10);
    }

    #[test]
    fn rejects_inconsistent_percentage() {
        let err = build(40.0).unwrap_err();
        assert!(matches!(err, ExamResultError::PercentageMismatch { .. }));
    }

    #[test]
    fn rejects_counts_exceeding_ledger() {
        let err = ExamResult::from_persisted(
            0.0,
            0.0,
            4,
            4,
            0.0,
            UserId::new(1),
            "taker@example.com".into(),
            ExamId::new(2),
            "Mock".into(),
            CategoryId::new(3),
            "Math".into(),
            fixed_now(),
            Some(AnswerLedger::blank(2)),
        )
        .unwrap_err();
        assert!(matches!(err, ExamResultError::CountMismatch { .. }));
    }

    #[test]
    fn zero_max_score_pins_percentage_to_zero() {
        let result = ExamResult::from_persisted(
            0.0,
            0.0,
            0,
            0,
            0.0,
            UserId::new(1),
            "taker@example.com".into(),
            ExamId::new(2),
            "Mock".into(),
            CategoryId::new(3),
            "Math".into(),
            fixed_now(),
            None,
        )
        .unwrap();
        assert!(result.percentage().abs() < f64::EPSILON);
    }
}
