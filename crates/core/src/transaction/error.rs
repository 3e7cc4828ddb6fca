use thiserror::Error;

/// Errors that can occur when validating or manipulating transactions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransactionError {
    #[error("Transaction title cannot be empty")]
    EmptyTitle,
    #[error("Transaction title too long (max 200 characters)")]
    TitleTooLong,
    #[error("Transaction description too long (max 1000 characters)")]
    DescriptionTooLong,
    #[error("Unknown transaction type: {0}")]
    UnknownType(String),
    #[error("Transaction creation year {0} is outside 0000-9999")]
    CreatedAtOutOfRange(i32),
}
