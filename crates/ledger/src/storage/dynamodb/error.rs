//! DynamoDB error mapping.
//!
//! Maps AWS SDK errors to `RepositoryError` from `ledger_core::storage`.
//! Deadline expiry becomes `Cancelled` and an unreachable endpoint becomes
//! `ConnectionFailed`. Anything else the backend rejects becomes `Backend`,
//! except a failed existence condition which is `NotFound`.

use std::fmt::Debug;

use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::delete_item::DeleteItemError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::operation::query::QueryError;
use aws_sdk_dynamodb::operation::scan::ScanError;
use aws_sdk_dynamodb::operation::update_item::UpdateItemError;
use ledger_core::storage::RepositoryError;

use super::conversions::ENTITY_TYPE;

fn backend(key: &str, reason: impl Into<String>) -> RepositoryError {
    RepositoryError::Backend {
        key: key.to_string(),
        reason: reason.into(),
    }
}

/// Handles the failure modes shared by every operation: deadline expiry and
/// transport errors. Returns `None` when the service itself answered.
///
/// An I/O failure while dispatching means the endpoint could not be reached.
fn map_transport_error<E, R>(err: &SdkError<E, R>, key: &str) -> Option<RepositoryError> {
    match err {
        SdkError::TimeoutError(_) => Some(RepositoryError::Cancelled {
            key: key.to_string(),
            reason: "Operation deadline elapsed".to_string(),
        }),
        SdkError::DispatchFailure(failure) if failure.is_timeout() => {
            Some(RepositoryError::Cancelled {
                key: key.to_string(),
                reason: "Request timed out while dispatching".to_string(),
            })
        }
        SdkError::DispatchFailure(failure) if failure.is_io() => Some(
            RepositoryError::ConnectionFailed(format!("{}: {:?}", key, failure)),
        ),
        SdkError::DispatchFailure(failure) => {
            Some(backend(key, format!("Dispatch failed: {:?}", failure)))
        }
        SdkError::ConstructionFailure(_) => Some(backend(key, "Request construction failed")),
        _ => None,
    }
}

/// Map a PutItem SDK error to RepositoryError.
pub fn map_put_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<PutItemError, R>,
    key: &str,
) -> RepositoryError {
    if let Some(mapped) = map_transport_error(&err, key) {
        return mapped;
    }
    match err.into_service_error() {
        PutItemError::ResourceNotFoundException(_) => backend(key, "Table not found"),
        PutItemError::ProvisionedThroughputExceededException(_) => {
            backend(key, "Throughput exceeded, please retry")
        }
        PutItemError::RequestLimitExceeded(_) => backend(key, "Request limit exceeded, please retry"),
        PutItemError::ItemCollectionSizeLimitExceededException(_) => {
            backend(key, "Item collection size limit exceeded")
        }
        PutItemError::InternalServerError(_) => backend(key, "DynamoDB internal server error"),
        err => backend(key, format!("PutItem failed: {:?}", err)),
    }
}

/// Map a Query SDK error to RepositoryError.
pub fn map_query_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<QueryError, R>,
    key: &str,
) -> RepositoryError {
    if let Some(mapped) = map_transport_error(&err, key) {
        return mapped;
    }
    match err.into_service_error() {
        QueryError::ResourceNotFoundException(_) => backend(key, "Table not found"),
        QueryError::ProvisionedThroughputExceededException(_) => {
            backend(key, "Throughput exceeded, please retry")
        }
        QueryError::RequestLimitExceeded(_) => backend(key, "Request limit exceeded, please retry"),
        QueryError::InternalServerError(_) => backend(key, "DynamoDB internal server error"),
        err => backend(key, format!("Query failed: {:?}", err)),
    }
}

/// Map an UpdateItem SDK error to RepositoryError.
///
/// Updates are conditioned on the item existing, so a failed condition means
/// there was nothing to update.
pub fn map_update_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<UpdateItemError, R>,
    key: &str,
) -> RepositoryError {
    if let Some(mapped) = map_transport_error(&err, key) {
        return mapped;
    }
    match err.into_service_error() {
        UpdateItemError::ConditionalCheckFailedException(_) => RepositoryError::NotFound {
            entity_type: ENTITY_TYPE,
            key: key.to_string(),
        },
        UpdateItemError::ResourceNotFoundException(_) => backend(key, "Table not found"),
        UpdateItemError::ProvisionedThroughputExceededException(_) => {
            backend(key, "Throughput exceeded, please retry")
        }
        UpdateItemError::RequestLimitExceeded(_) => {
            backend(key, "Request limit exceeded, please retry")
        }
        UpdateItemError::TransactionConflictException(_) => {
            backend(key, "Transaction conflict, please retry")
        }
        UpdateItemError::InternalServerError(_) => backend(key, "DynamoDB internal server error"),
        err => backend(key, format!("UpdateItem failed: {:?}", err)),
    }
}

/// Map a DeleteItem SDK error to RepositoryError.
pub fn map_delete_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<DeleteItemError, R>,
    key: &str,
) -> RepositoryError {
    if let Some(mapped) = map_transport_error(&err, key) {
        return mapped;
    }
    match err.into_service_error() {
        DeleteItemError::ResourceNotFoundException(_) => backend(key, "Table not found"),
        DeleteItemError::ProvisionedThroughputExceededException(_) => {
            backend(key, "Throughput exceeded, please retry")
        }
        DeleteItemError::RequestLimitExceeded(_) => {
            backend(key, "Request limit exceeded, please retry")
        }
        DeleteItemError::TransactionConflictException(_) => {
            backend(key, "Transaction conflict, please retry")
        }
        DeleteItemError::InternalServerError(_) => backend(key, "DynamoDB internal server error"),
        err => backend(key, format!("DeleteItem failed: {:?}", err)),
    }
}

/// Map a Scan SDK error to RepositoryError.
pub fn map_scan_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<ScanError, R>,
    key: &str,
) -> RepositoryError {
    if let Some(mapped) = map_transport_error(&err, key) {
        return mapped;
    }
    match err.into_service_error() {
        ScanError::ResourceNotFoundException(_) => backend(key, "Table not found"),
        ScanError::ProvisionedThroughputExceededException(_) => {
            backend(key, "Throughput exceeded, please retry")
        }
        ScanError::RequestLimitExceeded(_) => backend(key, "Request limit exceeded, please retry"),
        ScanError::InternalServerError(_) => backend(key, "DynamoDB internal server error"),
        err => backend(key, format!("Scan failed: {:?}", err)),
    }
}
