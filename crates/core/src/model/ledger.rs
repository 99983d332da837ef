use serde::{Deserialize, Serialize};

use crate::model::question::OptionLabel;

//
// ─── ANSWER STATUS ────────────────────────────────────────────────────────────
//

/// Per-question attempt status.
///
/// A single enumerated state, not independent flags: the select/mark
/// transitions below depend on the exact current value. `Incorrect`
/// never appears during a live attempt; it exists only for
/// post-submission display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerStatus {
    Unattempted,
    Answered,
    Marked,
    AnsweredMarked,
    Incorrect,
}

impl AnswerStatus {
    /// True when the question is flagged for review.
    #[must_use]
    pub fn is_marked(self) -> bool {
        matches!(self, Self::Marked | Self::AnsweredMarked)
    }
}

//
// ─── ANSWER RECORD ────────────────────────────────────────────────────────────
//

/// One ledger slot: the chosen label (if any) plus its status.
///
/// Serialized as `{ "answer": "A" | null, "status": "answered" }`,
/// the shape the resume snapshot and stored results use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub answer: Option<OptionLabel>,
    pub status: AnswerStatus,
}

impl AnswerRecord {
    /// An untouched slot.
    #[must_use]
    pub fn blank() -> Self {
        Self {
            answer: None,
            status: AnswerStatus::Unattempted,
        }
    }
}

impl Default for AnswerRecord {
    fn default() -> Self {
        Self::blank()
    }
}

//
// ─── SUMMARY ──────────────────────────────────────────────────────────────────
//

/// Attempt counts computed on demand from the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptSummary {
    pub total: usize,
    pub attempted: usize,
    pub unattempted: usize,
}

//
// ─── LEDGER ───────────────────────────────────────────────────────────────────
//

/// Ordered, fixed-size collection of answer records, index-aligned with
/// the exam's question sequence.
///
/// Owned and mutated exclusively by the session for the duration of one
/// attempt, then frozen into the result at submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerLedger(Vec<AnswerRecord>);

impl AnswerLedger {
    /// A fresh all-unattempted ledger sized to the question count.
    #[must_use]
    pub fn blank(len: usize) -> Self {
        Self(vec![AnswerRecord::blank(); len])
    }

    #[must_use]
    pub fn from_records(records: Vec<AnswerRecord>) -> Self {
        Self(records)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&AnswerRecord> {
        self.0.get(index)
    }

    #[must_use]
    pub fn records(&self) -> &[AnswerRecord] {
        &self.0
    }

    /// Selects, replaces, or toggles off an answer.
    ///
    /// Clicking the already-chosen label clears it: the status drops to
    /// `Marked` when it was `AnsweredMarked`, else to `Unattempted`.
    /// Any other label replaces the answer and the status becomes
    /// `AnsweredMarked` when a mark was present, else `Answered`.
    ///
    /// Returns `false` (and leaves the ledger untouched) when `index`
    /// is out of range.
    pub fn select_answer(&mut self, index: usize, label: OptionLabel) -> bool {
        let Some(record) = self.0.get_mut(index) else {
            return false;
        };

        if record.answer == Some(label) {
            record.answer = None;
            record.status = if record.status == AnswerStatus::AnsweredMarked {
                AnswerStatus::Marked
            } else {
                AnswerStatus::Unattempted
            };
        } else {
            record.answer = Some(label);
            record.status = match record.status {
                AnswerStatus::Marked | AnswerStatus::AnsweredMarked => {
                    AnswerStatus::AnsweredMarked
                }
                _ => AnswerStatus::Answered,
            };
        }
        true
    }

    /// Cycles the review mark, independent of answer presence.
    ///
    /// The cycle is deliberately asymmetric and must stay exactly:
    /// answered -> answered_marked -> answered, and
    /// unattempted -> marked -> unattempted. Palette coloring and the
    /// submission summary count on these exact values.
    ///
    /// Returns `false` when `index` is out of range.
    pub fn toggle_mark(&mut self, index: usize) -> bool {
        let Some(record) = self.0.get_mut(index) else {
            return false;
        };

        record.status = match record.status {
            AnswerStatus::Answered => AnswerStatus::AnsweredMarked,
            AnswerStatus::Unattempted => AnswerStatus::Marked,
            AnswerStatus::AnsweredMarked => AnswerStatus::Answered,
            AnswerStatus::Marked => AnswerStatus::Unattempted,
            other => other,
        };
        true
    }

    /// Attempted/unattempted counts, derived rather than stored.
    #[must_use]
    pub fn summary(&self) -> AttemptSummary {
        let total = self.0.len();
        let attempted = self.0.iter().filter(|r| r.answer.is_some()).count();
        AttemptSummary {
            total,
            attempted,
            unattempted: total - attempted,
        }
    }
}
