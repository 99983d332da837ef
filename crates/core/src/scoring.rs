//! Deterministic conversion of a completed ledger into a result.

use chrono::{DateTime, Utc};

use crate::model::{AnswerLedger, Exam, ExamResult, UserId};

/// The arithmetic outcome of scoring one attempt.
///
/// Pure data: identity, denormalized exam fields, and the timestamp are
/// attached separately via [`Scorecard::into_result`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scorecard {
    correct: u32,
    incorrect: u32,
    score: f64,
    max_score: f64,
    percentage: f64,
}

impl Scorecard {
    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn incorrect(&self) -> u32 {
        self.incorrect
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
    pub fn percentage(&self) -> f64 {
        self.percentage
    }

    /// Freezes this scorecard into the immutable submission record.
    #[must_use]
    pub fn into_result(
        self,
        exam: &Exam,
        user_id: UserId,
        user_email: &str,
        submitted_at: DateTime<Utc>,
        answers: AnswerLedger,
    ) -> ExamResult {
        ExamResult::from_parts(
            self.score,
            self.max_score,
            self.correct,
            self.incorrect,
            self.percentage,
            user_id,
            user_email.to_string(),
            exam.id(),
            exam.title().to_string(),
            exam.category_id(),
            exam.category_name().to_string(),
            submitted_at,
            Some(answers),
        )
    }
}

/// Scores a ledger against an exam.
///
/// Iterates the question indices once: an answer equal to the correct
/// label counts as correct, any other non-none answer as incorrect, and
/// a none answer toward neither. The achieved score is
/// `correct * marks − incorrect * negative_marking` with no floor, so a
/// heavily negative-marked attempt may land below zero. Deterministic
/// and side-effect free: identical inputs produce identical scorecards.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn score(exam: &Exam, ledger: &AnswerLedger) -> Scorecard {
    let mut correct = 0_u32;
    let mut incorrect = 0_u32;

    for (index, question) in exam.questions().iter().enumerate() {
        match ledger.get(index).and_then(|record| record.answer) {
            Some(label) if label == question.correct_label() => correct += 1,
            Some(_) => incorrect += 1,
            None => {}
        }
    }

    let marks = exam.marks_per_question();
    let max_score = exam.question_count() as f64 * marks;
    let achieved = f64::from(correct) * marks - f64::from(incorrect) * exam.negative_marking();
    let percentage = if max_score > 0.0 {
        achieved / max_score * 100.0
    } else {
        0.0
    };

    Scorecard {
        correct,
        incorrect,
        score: achieved,
        max_score,
        percentage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CategoryId, ExamId, OptionLabel, Question};
    use crate::time::fixed_now;

    fn exam(n: usize, marks: f64, negative: f64) -> Exam {
        let questions = (0..n)
            .map(|i| {
                Question::new(
                    format!("Q{i}"),
                    vec!["w".into(), "x".into(), "y".into(), "z".into()],
                    OptionLabel::A,
                    None,
                )
                .unwrap()
            })
            .collect();
        Exam::new(
            ExamId::new(1),
            "Scoring Mock",
            CategoryId::new(1),
            "Math",
            questions,
            30,
            marks,
            negative,
        )
        .unwrap()
    }

    #[test]
    fn counts_and_marks_follow_the_grading_rule() {
        // 10 questions, 2 marks each, 0.5 negative: 3 correct, 2 wrong.
        let exam = exam(10, 2.0, 0.5);
        let mut ledger = AnswerLedger::blank(10);
        for i in 0..3 {
            ledger.select_answer(i, OptionLabel::A);
        }
        for i in 3..5 {
            ledger.select_answer(i, OptionLabel::B);
        }

        let card = score(&exam, &ledger);
        assert_eq!(card.correct(), 3);
        assert_eq!(card.incorrect(), 2);
        assert!((card.score() - 5.0).abs() < f64::EPSILON);
        assert!((card.max_score() - 20.0).abs() < f64::EPSILON);
        assert!((card.percentage() - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn negative_totals_are_not_floored() {
        let exam = exam(5, 1.0, 1.0);
        let mut ledger = AnswerLedger::blank(5);
        for i in 0..5 {
            ledger.select_answer(i, OptionLabel::D);
        }

        let card = score(&exam, &ledger);
        assert_eq!(card.correct(), 0);
        assert_eq!(card.incorrect(), 5);
        assert!((card.score() - -5.0).abs() < f64::EPSILON);
        assert!((card.percentage() - -100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unattempted_answers_contribute_nothing() {
        let exam = exam(4, 2.0, 1.0);
        let mut ledger = AnswerLedger::blank(4);
        ledger.select_answer(0, OptionLabel::A);
        // Slot 1 marked but never answered.
        ledger.toggle_mark(1);

        let card = score(&exam, &ledger);
        assert_eq!(card.correct(), 1);
        assert_eq!(card.incorrect(), 0);
        assert!((card.score() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn scoring_is_deterministic_across_calls() {
        let exam = exam(6, 3.0, 1.5);
        let mut ledger = AnswerLedger::blank(6);
        ledger.select_answer(0, OptionLabel::A);
        ledger.select_answer(1, OptionLabel::C);
        ledger.select_answer(5, OptionLabel::A);

        let first = score(&exam, &ledger);
        let second = score(&exam, &ledger);
        assert_eq!(first, second);

        let result_a = first.into_result(
            &exam,
            UserId::new(9),
            "taker@example.com",
            fixed_now(),
            ledger.clone(),
        );
        let result_b = second.into_result(
            &exam,
            UserId::new(9),
            "taker@example.com",
            fixed_now(),
            ledger,
        );
        assert_eq!(result_a, result_b);
    }

    #[test]
    fn zero_question_exam_scores_to_all_zero() {
        let exam = exam(0, 1.0, 0.0);
        let card = score(&exam, &AnswerLedger::blank(0));
        assert_eq!(card.correct(), 0);
        assert!(card.max_score().abs() < f64::EPSILON);
        assert!(card.percentage().abs() < f64::EPSILON);
    }
}
