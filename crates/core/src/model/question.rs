use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

/// Errors that can occur while building a question.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("a question needs exactly {OPTION_COUNT} options, got {got}")]
    WrongOptionCount { got: usize },

    #[error("option {label} cannot be empty")]
    EmptyOption { label: OptionLabel },

    #[error("invalid option label: {raw}")]
    InvalidLabel { raw: String },
}

/// Every question carries exactly this many options.
pub const OPTION_COUNT: usize = 4;

//
// ─── OPTION LABEL ─────────────────────────────────────────────────────────────
//

/// Label addressing one of the four options of a question.
///
/// Index 0 maps to `A`, index 3 to `D`. Serialized as the bare letter,
/// matching the stored document shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionLabel {
    A,
    B,
    C,
    D,
}

impl OptionLabel {
    /// All labels in option order.
    pub const ALL: [OptionLabel; OPTION_COUNT] = [Self::A, Self::B, Self::C, Self::D];

    /// Converts an option index (0-3) to its label.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Returns the option index (0-3) this label addresses.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
            Self::C => 2,
            Self::D => 3,
        }
    }

    /// Returns the label as a static string.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }
}

impl fmt::Display for OptionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptionLabel {
    type Err = QuestionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(Self::A),
            "B" => Ok(Self::B),
            "C" => Ok(Self::C),
            "D" => Ok(Self::D),
            raw => Err(QuestionError::InvalidLabel {
                raw: raw.to_string(),
            }),
        }
    }
}

//
// ─── QUESTION ─────────────────────────────────────────────────────────────────
//

/// A single multiple-choice question.
///
/// The four options are addressed by `OptionLabel`; `correct` always
/// refers to one of them by construction. Field names in the serialized
/// form match the exam documents (`question`, `correctAnswer`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "question")]
    prompt: String,
    options: [String; OPTION_COUNT],
    #[serde(rename = "correctAnswer")]
    correct: OptionLabel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    explanation: Option<String>,
}

impl Question {
    /// Builds a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyPrompt` for a blank prompt,
    /// `QuestionError::WrongOptionCount` unless exactly four options are
    /// given, and `QuestionError::EmptyOption` when any option is blank.
    pub fn new(
        prompt: impl Into<String>,
        options: Vec<String>,
        correct: OptionLabel,
        explanation: Option<String>,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }

        let options: [String; OPTION_COUNT] = options
            .try_into()
            .map_err(|rejected: Vec<String>| QuestionError::WrongOptionCount {
                got: rejected.len(),
            })?;

        for (index, option) in options.iter().enumerate() {
            if option.trim().is_empty() {
                let label = OptionLabel::from_index(index)
                    .ok_or(QuestionError::WrongOptionCount { got: index })?;
                return Err(QuestionError::EmptyOption { label });
            }
        }

        let explanation = explanation.filter(|text| !text.trim().is_empty());

        Ok(Self {
            prompt,
            options,
            correct,
            explanation,
        })
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String; OPTION_COUNT] {
        &self.options
    }

    /// Returns the option text addressed by `label`.
    #[must_use]
    pub fn option(&self, label: OptionLabel) -> &str {
        &self.options[label.index()]
    }

    #[must_use]
    pub fn correct_label(&self) -> OptionLabel {
        self.correct
    }

    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }
}
