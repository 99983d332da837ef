use thiserror::Error;

use crate::model::{ExamError, ExamResultError, QuestionError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Exam(#[from] ExamError),
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Result(#[from] ExamResultError),
}
