mod exam;
mod ids;
mod ledger;
mod question;
mod result;
mod snapshot;

pub use exam::{Exam, ExamError};
pub use ids::{CategoryId, ExamId, ReportId, ResultId, UserId};
pub use ledger::{AnswerLedger, AnswerRecord, AnswerStatus, AttemptSummary};
pub use question::{OPTION_COUNT, OptionLabel, Question, QuestionError};
pub use result::{ExamResult, ExamResultError};
pub use snapshot::ResumeSnapshot;
