use serde::{Deserialize, Serialize};

use crate::model::ids::ExamId;
use crate::model::ledger::AnswerLedger;

/// Serialized copy of in-progress session state for crash/reload
/// recovery.
///
/// An ephemeral shadow of ledger + timer: overwritten every save
/// interval while a timed attempt is live, read once when resuming,
/// deleted on successful submission. Field names match the JSON the
/// device store has always held.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeSnapshot {
    #[serde(rename = "testId")]
    pub exam_id: ExamId,
    #[serde(rename = "currentQuestionIndex")]
    pub current_index: usize,
    #[serde(rename = "userAnswers")]
    pub ledger: AnswerLedger,
    #[serde(rename = "timeRemaining")]
    pub seconds_remaining: u32,
}

impl ResumeSnapshot {
    #[must_use]
    pub fn new(
        exam_id: ExamId,
        current_index: usize,
        ledger: AnswerLedger,
        seconds_remaining: u32,
    ) -> Self {
        Self {
            exam_id,
            current_index,
            ledger,
            seconds_remaining,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::question::OptionLabel;

    #[test]
    fn snapshot_round_trips_through_json() {
        let mut ledger = AnswerLedger::blank(5);
        ledger.select_answer(1, OptionLabel::C);
        ledger.toggle_mark(4);
        let snapshot = ResumeSnapshot::new(ExamId::new(12), 3, ledger, 42);

        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains(r#""testId":12"#));
        assert!(json.contains(r#""currentQuestionIndex":3"#));
        assert!(json.contains(r#""timeRemaining":42"#));

        let parsed: ResumeSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, snapshot);
    }
}
