//! Pure functions for mapping repository errors to HTTP status codes.

use super::RepositoryError;

/// Maps a [`RepositoryError`] to an HTTP status code.
///
/// - `NotFound` -> 404 (Not Found)
/// - `Encode` -> 400 (Bad Request)
/// - `Decode` -> 500 (Internal Server Error)
/// - `ExpressionBuild` -> 500 (Internal Server Error)
/// - `Backend` -> 502 (Bad Gateway)
/// - `Cancelled` -> 504 (Gateway Timeout)
/// - `ConnectionFailed` -> 503 (Service Unavailable)
///
/// # Examples
///
/// ```
/// use ledger_core::storage::{RepositoryError, repository_error_to_status_code};
///
/// let error = RepositoryError::NotFound {
///     entity_type: "Transaction",
///     key: "2024-01-05/abc-123".to_string(),
/// };
/// assert_eq!(repository_error_to_status_code(&error), 404);
/// ```
pub fn repository_error_to_status_code(error: &RepositoryError) -> u16 {
    match error {
        RepositoryError::NotFound { .. } => 404,
        RepositoryError::Encode { .. } => 400,
        RepositoryError::Decode { .. } => 500,
        RepositoryError::ExpressionBuild { .. } => 500,
        RepositoryError::Backend { .. } => 502,
        RepositoryError::Cancelled { .. } => 504,
        RepositoryError::ConnectionFailed(_) => 503,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> String {
        "2024-01-05/abc".to_string()
    }

    fn reason() -> String {
        "boom".to_string()
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let error = RepositoryError::NotFound {
            entity_type: "Transaction",
            key: key(),
        };
        assert_eq!(repository_error_to_status_code(&error), 404);
    }

    #[test]
    fn test_encode_maps_to_400() {
        let error = RepositoryError::Encode {
            key: key(),
            reason: reason(),
        };
        assert_eq!(repository_error_to_status_code(&error), 400);
    }

    #[test]
    fn test_decode_and_expression_map_to_500() {
        let decode = RepositoryError::Decode {
            key: key(),
            reason: reason(),
        };
        let expression = RepositoryError::ExpressionBuild {
            key: key(),
            reason: reason(),
        };
        assert_eq!(repository_error_to_status_code(&decode), 500);
        assert_eq!(repository_error_to_status_code(&expression), 500);
    }

    #[test]
    fn test_backend_maps_to_502() {
        let error = RepositoryError::Backend {
            key: key(),
            reason: reason(),
        };
        assert_eq!(repository_error_to_status_code(&error), 502);
    }

    #[test]
    fn test_cancelled_maps_to_504() {
        let error = RepositoryError::Cancelled {
            key: key(),
            reason: reason(),
        };
        assert_eq!(repository_error_to_status_code(&error), 504);
    }

    #[test]
    fn test_connection_failed_maps_to_503() {
        let error = RepositoryError::ConnectionFailed("refused".to_string());
        assert_eq!(repository_error_to_status_code(&error), 503);
    }
}
