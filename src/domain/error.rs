//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent business logic violations.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("unknown tree node: {0}")]
    UnknownNode(String),

    #[error("not a question node: {0}")]
    NotAQuestion(String),

    #[error("unknown severity label: {0}")]
    UnknownSeverity(String),

    #[error("invalid answer: {0:?}")]
    InvalidAnswer(String),

    #[error("invalid age: {0:?}")]
    InvalidAge(String),

    #[error("age must be positive: {0}")]
    NonPositiveAge(f64),

    #[error("invalid gender choice: {0:?}")]
    InvalidGenderChoice(String),

    #[error("malformed patient record: {message}")]
    MalformedRecord { message: String },
}
