use thiserror::Error;

use crate::model::ids::{CategoryId, ExamId};
use crate::model::question::Question;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum ExamError {
    #[error("exam title cannot be empty")]
    EmptyTitle,

    #[error("negative marking must be a non-negative magnitude, got {got}")]
    NegativeMarkingBelowZero { got: f64 },
}

//
// ─── EXAM ─────────────────────────────────────────────────────────────────────
//

/// Fallback duration applied when a stored exam carries no duration.
const DEFAULT_DURATION_MINUTES: u32 = 60;

/// A published mock test as authored externally.
///
/// Read-only to the session engine. An exam with zero questions is
/// representable — the collaborator does not guarantee non-emptiness —
/// and is rejected at session start rather than here.
#[derive(Debug, Clone, PartialEq)]
pub struct Exam {
    id: ExamId,
    title: String,
    category_id: CategoryId,
    category_name: String,
    questions: Vec<Question>,
    duration_minutes: u32,
    marks_per_question: f64,
    negative_marking: f64,
}

impl Exam {
    /// Builds an exam, normalizing zeroed duration/marks to the same
    /// defaults the authoring side uses (60 minutes, 1 mark).
    ///
    /// # Errors
    ///
    /// Returns `ExamError::EmptyTitle` for a blank title and
    /// `ExamError::NegativeMarkingBelowZero` when the deduction
    /// magnitude is negative.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: ExamId,
        title: impl Into<String>,
        category_id: CategoryId,
        category_name: impl Into<String>,
        questions: Vec<Question>,
        duration_minutes: u32,
        marks_per_question: f64,
        negative_marking: f64,
    ) -> Result<Self, ExamError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ExamError::EmptyTitle);
        }
        if negative_marking < 0.0 {
            return Err(ExamError::NegativeMarkingBelowZero {
                got: negative_marking,
            });
        }

        let duration_minutes = if duration_minutes == 0 {
            DEFAULT_DURATION_MINUTES
        } else {
            duration_minutes
        };
        let marks_per_question = if marks_per_question == 0.0 {
            1.0
        } else {
            marks_per_question
        };

        Ok(Self {
            id,
            title,
            category_id,
            category_name: category_name.into(),
            questions,
            duration_minutes,
            marks_per_question,
            negative_marking,
        })
    }

    #[must_use]
    pub fn id(&self) -> ExamId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
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
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    /// Total timed-attempt budget in seconds.
    #[must_use]
    pub fn duration_seconds(&self) -> u32 {
        self.duration_minutes * 60
    }

    #[must_use]
    pub fn marks_per_question(&self) -> f64 {
        self.marks_per_question
    }

    /// Magnitude deducted per incorrect answer.
    #[must_use]
    pub fn negative_marking(&self) -> f64 {
        self.negative_marking
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::question::OptionLabel;

    fn question(n: usize) -> Question {
        Question::new(
            format!("Q{n}"),
            vec!["a".into(), "b".into(), "c".into(), "d".into()],
            OptionLabel::A,
            None,
        )
        .unwrap()
    }

    #[test]
    fn zeroed_duration_and_marks_fall_back_to_defaults() {
        let exam = Exam::new(
            ExamId::new(1),
            "Algebra Mock",
            CategoryId::new(2),
            "Math",
            vec![question(1)],
            0,
            0.0,
            0.0,
        )
        .unwrap();

        assert_eq!(exam.duration_minutes(), 60);
        assert_eq!(exam.duration_seconds(), 3600);
        assert!((exam.marks_per_question() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_negative_deduction_magnitude() {
        let err = Exam::new(
            ExamId::new(1),
            "Mock",
            CategoryId::new(2),
            "Math",
            vec![question(1)],
            30,
            2.0,
            -0.5,
        )
        .unwrap_err();
        assert!(matches!(err, ExamError::NegativeMarkingBelowZero { .. }));
    }

    #[test]
    fn empty_question_list_is_representable() {
        let exam = Exam::new(
            ExamId::new(9),
            "Broken",
            CategoryId::new(1),
            "Misc",
            Vec::new(),
            30,
            1.0,
            0.0,
        )
        .unwrap();
        assert_eq!(exam.question_count(), 0);
    }
}
