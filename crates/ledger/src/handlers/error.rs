use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ledger_core::storage::{repository_error_to_status_code, DateRangeError, RepositoryError};
use ledger_core::transaction::TransactionError;

/// Error returned by every handler.
///
/// Wraps any error; the status code is picked by downcasting to the error
/// types the domain knows about.
pub struct AppError(pub anyhow::Error);

impl AppError {
    fn status_code(&self) -> StatusCode {
        if let Some(repo_error) = self.0.downcast_ref::<RepositoryError>() {
            let code = repository_error_to_status_code(repo_error);
            StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
        } else if self.0.is::<TransactionError>() || self.0.is::<DateRangeError>() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.0.to_string();

        if status.is_server_error() {
            tracing::error!(status = %status, error = %message, "Request failed");
        } else {
            tracing::warn!(status = %status, error = %message, "Request rejected");
        }

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_errors_use_their_status() {
        let error = AppError::from(RepositoryError::Cancelled {
            key: "2024-01-05/abc".to_string(),
            reason: "Operation deadline elapsed".to_string(),
        });
        assert_eq!(error.status_code(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn test_validation_errors_are_bad_requests() {
        assert_eq!(
            AppError::from(TransactionError::EmptyTitle).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(DateRangeError::InvalidRange).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_unknown_errors_are_internal() {
        let error = AppError(anyhow::anyhow!("something else"));
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
