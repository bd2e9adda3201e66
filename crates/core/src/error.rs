use thiserror::Error;

/// Errors raised while interpreting question bank data.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ModelError {
    #[error("unknown difficulty: {0}")]
    UnknownDifficulty(String),

    #[error("unknown question type: {0}")]
    UnknownQuestionType(String),

    #[error("unknown response code: {0}")]
    UnknownResponseCode(u8),

    #[error("question amount must be between {min} and {max}, got {amount}")]
    InvalidAmount { amount: u32, min: u32, max: u32 },

    #[error("question text cannot be empty")]
    EmptyQuestionText,

    #[error("{kind} question has {len} incorrect answers")]
    MalformedQuestion { kind: &'static str, len: usize },
}
