use exam_core::model::{AnswerLedger, Exam, ExamResult, OptionLabel};

use crate::vm::time_fmt::format_datetime;

/// The scorecard as shown on the results screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultVm {
    pub exam_title: String,
    pub category_name: String,
    pub score: String,
    pub max_score: String,
    pub percentage: String,
    pub correct: u32,
    pub incorrect: u32,
    pub unattempted: usize,
    pub submitted_at: String,
}

/// `question_count` comes from the exam, not the stored ledger: legacy
/// results carry no ledger at all, and the unattempted count must
/// still come out right for them.
#[must_use]
pub fn map_result(result: &ExamResult, question_count: usize) -> ResultVm {
    let attempted = (result.correct_count() + result.incorrect_count()) as usize;
    let unattempted = question_count.saturating_sub(attempted);
    ResultVm {
        exam_title: result.exam_title().to_string(),
        category_name: result.category_name().to_string(),
        score: format!("{:.2}", result.score()),
        max_score: format!("{:.2}", result.max_score()),
        percentage: format!("{:.1}%", result.percentage()),
        correct: result.correct_count(),
        incorrect: result.incorrect_count(),
        unattempted,
        submitted_at: format_datetime(result.submitted_at()),
    }
}

/// One row of the solution review.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SolutionEntryVm {
    pub number: usize,
    pub prompt: String,
    pub options: Vec<(OptionLabel, String)>,
    pub chosen: Option<OptionLabel>,
    pub correct: OptionLabel,
    pub is_correct: bool,
    pub explanation: Option<String>,
}

#[must_use]
pub fn map_solution(exam: &Exam, ledger: &AnswerLedger) -> Vec<SolutionEntryVm> {
    exam.questions()
        .iter()
        .enumerate()
        .map(|(index, question)| {
            let chosen = ledger.get(index).and_then(|record| record.answer);
            SolutionEntryVm {
                number: index + 1,
                prompt: question.prompt().to_string(),
                options: OptionLabel::ALL
                    .iter()
                    .map(|&label| (label, question.option(label).to_string()))
                    .collect(),
                chosen,
                correct: question.correct_label(),
                is_correct: chosen == Some(question.correct_label()),
                explanation: question.explanation().map(ToString::to_string),
            }
        })
        .collect()
}

/// One row of the home screen's history list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryEntryVm {
    pub index: usize,
    pub exam_title: String,
    pub score_line: String,
    pub submitted_at: String,
}

#[must_use]
pub fn map_history(results: &[ExamResult]) -> Vec<HistoryEntryVm> {
    results
        .iter()
        .enumerate()
        .map(|(index, result)| HistoryEntryVm {
            index,
            exam_title: result.exam_title().to_string(),
            score_line: format!(
                "{:.2} / {:.2} ({:.1}%)",
                result.score(),
                result.max_score(),
                result.percentage()
            ),
            submitted_at: format_datetime(result.submitted_at()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use exam_core::model::{CategoryId, ExamId, Question, UserId};
    use exam_core::scoring;
    use exam_core::time::fixed_now;

    fn exam() -> Exam {
        let questions = (0..4)
            .map(|i| {
                Question::new(
                    format!("Q{i}"),
                    vec!["a".into(), "b".into(), "c".into(), "d".into()],
                    OptionLabel::A,
                    Some(format!("E{i}")),
                )
                .unwrap()
            })
            .collect();
        Exam::new(
            ExamId::new(1),
            "Result Mock",
            CategoryId::new(1),
            "General",
            questions,
            30,
            2.0,
            0.5,
        )
        .unwrap()
    }

    #[test]
    fn result_vm_formats_the_scorecard() {
        let exam = exam();
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

        let vm = map_result(&result, exam.question_count());
        assert_eq!(vm.score, "1.50");
        assert_eq!(vm.max_score, "8.00");
        assert_eq!(vm.percentage, "18.8%");
        assert_eq!(vm.correct, 1);
        assert_eq!(vm.incorrect, 1);
        assert_eq!(vm.unattempted, 2);
    }

    #[test]
    fn result_vm_counts_unattempted_without_a_stored_ledger() {
        // Rows persisted before answers were stored come back with no
        // ledger; the unattempted figure still has to add up.
        let result = ExamResult::from_persisted(
            3.0,
            20.0,
            2,
            1,
            15.0,
            UserId::new(7),
            "taker@example.com".into(),
            ExamId::new(1),
            "Result Mock".into(),
            CategoryId::new(1),
            "General".into(),
            fixed_now(),
            None,
        )
        .unwrap();

        let vm = map_result(&result, 10);
        assert_eq!(vm.correct, 2);
        assert_eq!(vm.incorrect, 1);
        assert_eq!(vm.unattempted, 7);
    }

    #[test]
    fn solution_rows_flag_correctness_per_question() {
        let exam = exam();
        let mut ledger = AnswerLedger::blank(4);
        ledger.select_answer(0, OptionLabel::A);
        ledger.select_answer(1, OptionLabel::C);

        let rows = map_solution(&exam, &ledger);
        assert_eq!(rows.len(), 4);
        assert!(rows[0].is_correct);
        assert!(!rows[1].is_correct);
        assert_eq!(rows[1].chosen, Some(OptionLabel::C));
        assert_eq!(rows[2].chosen, None);
        assert!(!rows[2].is_correct);
        assert_eq!(rows[3].explanation.as_deref(), Some("E3"));
    }
}
