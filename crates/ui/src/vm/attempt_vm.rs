use exam_core::model::{AnswerLedger, AnswerStatus, AttemptSummary, Exam, OptionLabel};

/// One selectable option row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub label: OptionLabel,
    pub text: String,
    pub selected: bool,
}

/// The question being displayed, with the taker's current answer baked
/// in. `correct_label` and `explanation` are only surfaced by the
/// practice and solution screens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionVm {
    pub number: usize,
    pub total: usize,
    pub prompt: String,
    pub options: Vec<OptionVm>,
    pub answer: Option<OptionLabel>,
    pub marked: bool,
    pub correct_label: OptionLabel,
    pub explanation: Option<String>,
}

#[must_use]
pub fn map_question(exam: &Exam, ledger: &AnswerLedger, index: usize) -> Option<QuestionVm> {
    let question = exam.question(index)?;
    let record = ledger.get(index)?;
    let options = OptionLabel::ALL
        .iter()
        .map(|&label| OptionVm {
            label,
            text: question.option(label).to_string(),
            selected: record.answer == Some(label),
        })
        .collect();
    Some(QuestionVm {
        number: index + 1,
        total: exam.question_count(),
        prompt: question.prompt().to_string(),
        options,
        answer: record.answer,
        marked: record.status.is_marked(),
        correct_label: question.correct_label(),
        explanation: question.explanation().map(ToString::to_string),
    })
}

/// One palette cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaletteEntryVm {
    pub index: usize,
    pub number: usize,
    pub current: bool,
    pub css_class: &'static str,
}

#[must_use]
pub fn status_class(status: AnswerStatus) -> &'static str {
    match status {
        AnswerStatus::Unattempted => "palette-unattempted",
        AnswerStatus::Answered => "palette-answered",
        AnswerStatus::Marked => "palette-marked",
        AnswerStatus::AnsweredMarked => "palette-answered-marked",
        AnswerStatus::Incorrect => "palette-incorrect",
    }
}

#[must_use]
pub fn map_palette(ledger: &AnswerLedger, current_index: usize) -> Vec<PaletteEntryVm> {
    ledger
        .records()
        .iter()
        .enumerate()
        .map(|(index, record)| PaletteEntryVm {
            index,
            number: index + 1,
            current: index == current_index,
            css_class: status_class(record.status),
        })
        .collect()
}

/// Attempted/unattempted counts for the submit confirmation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SummaryVm {
    pub total: usize,
    pub attempted: usize,
    pub unattempted: usize,
}

#[must_use]
pub fn map_summary(summary: AttemptSummary) -> SummaryVm {
    SummaryVm {
        total: summary.total,
        attempted: summary.attempted,
        unattempted: summary.unattempted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exam_core::model::{CategoryId, ExamId, Question};

    fn exam() -> Exam {
        let questions = vec![
            Question::new(
                "First?",
                vec!["one".into(), "two".into(), "three".into(), "four".into()],
                OptionLabel::B,
                Some("Two of them.".into()),
            )
            .unwrap(),
            Question::new(
                "Second?",
                vec!["w".into(), "x".into(), "y".into(), "z".into()],
                OptionLabel::A,
                None,
            )
            .unwrap(),
        ];
        Exam::new(
            ExamId::new(1),
            "VM Mock",
            CategoryId::new(1),
            "General",
            questions,
            30,
            1.0,
            0.0,
        )
        .unwrap()
    }

    #[test]
    fn question_vm_reflects_the_ledger() {
        let exam = exam();
        let mut ledger = AnswerLedger::blank(2);
        ledger.select_answer(0, OptionLabel::B);
        ledger.toggle_mark(0);

        let vm = map_question(&exam, &ledger, 0).unwrap();
        assert_eq!(vm.number, 1);
        assert_eq!(vm.total, 2);
        assert_eq!(vm.prompt, "First?");
        assert!(vm.marked);
        assert_eq!(vm.answer, Some(OptionLabel::B));
        assert!(vm.options[1].selected);
        assert!(!vm.options[0].selected);
        assert_eq!(vm.explanation.as_deref(), Some("Two of them."));
    }

    #[test]
    fn palette_tracks_status_and_current_cell() {
        let mut ledger = AnswerLedger::blank(3);
        ledger.select_answer(0, OptionLabel::A);
        ledger.toggle_mark(2);

        let palette = map_palette(&ledger, 2);
        assert_eq!(palette[0].css_class, "palette-answered");
        assert_eq!(palette[1].css_class, "palette-unattempted");
        assert_eq!(palette[2].css_class, "palette-marked");
        assert!(palette[2].current);
        assert!(!palette[0].current);
    }

    #[test]
    fn out_of_range_question_maps_to_none() {
        let exam = exam();
        let ledger = AnswerLedger::blank(2);
        assert!(map_question(&exam, &ledger, 2).is_none());
    }
}
