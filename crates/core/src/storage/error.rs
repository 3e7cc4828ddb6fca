use thiserror::Error;

/// Errors that can occur when constructing a date range.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DateRangeError {
    #[error("Invalid date range: start date must be before or equal to end date")]
    InvalidRange,
}

/// Errors that can occur when parsing a stored sort key.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("Sort key is missing the '{0}' prefix")]
    MissingPrefix(&'static str),
    #[error("Sort key has an invalid date segment: {0}")]
    InvalidDate(String),
    #[error("Sort key has an invalid id segment: {0}")]
    InvalidId(String),
}

/// Errors that can occur during repository operations.
///
/// Every variant carries the identifying key (`date/id`, a date range, or a
/// table name for whole-table operations) of the call that failed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// Domain to wire conversion failed.
    #[error("Failed to encode {key}: {reason}")]
    Encode { key: String, reason: String },
    /// Wire to domain conversion failed. Indicates a schema mismatch.
    #[error("Failed to decode {key}: {reason}")]
    Decode { key: String, reason: String },
    /// The partial-update expression could not be built.
    #[error("Failed to build update expression for {key}: {reason}")]
    ExpressionBuild { key: String, reason: String },
    #[error("{entity_type} not found: {key}")]
    NotFound {
        entity_type: &'static str,
        key: String,
    },
    /// The backend call itself failed. May be transient.
    #[error("Backend call failed for {key}: {reason}")]
    Backend { key: String, reason: String },
    /// The call was cancelled or its deadline elapsed.
    #[error("Operation cancelled for {key}: {reason}")]
    Cancelled { key: String, reason: String },
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
}

impl RepositoryError {
    /// Returns true when retrying the same call could succeed.
    ///
    /// Nothing in the storage layer retries on its own.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            RepositoryError::Backend { .. }
                | RepositoryError::Cancelled { .. }
                | RepositoryError::ConnectionFailed(_)
        )
    }
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;
