//! Transaction API handlers.
//!
//! Every handler is a thin translation between HTTP and the repository traits;
//! the storage semantics live behind `AppState`.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

use ledger_core::serde::deserialize_optional_date;
use ledger_core::storage::{DateRange, DateRangeError};
use ledger_core::transaction::{CreateTransactionRequest, Transaction, UpdateTransactionRequest};

use crate::{handlers::AppError, state::AppState};

/// Query parameters for listing transactions.
#[derive(Debug, Default, Deserialize)]
pub struct ListTransactionsQuery {
    /// First day to include (YYYY-MM-DD)
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub start_date: Option<NaiveDate>,
    /// Last day to include (YYYY-MM-DD)
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub end_date: Option<NaiveDate>,
}

impl ListTransactionsQuery {
    /// Turn the optional bounds into a concrete range.
    ///
    /// - neither bound: the trailing `window_days` ending `today`
    /// - only `start_date`: from `start_date` through `today`
    /// - only `end_date`: the trailing `window_days` ending `end_date`
    pub fn resolve_range(
        &self,
        today: NaiveDate,
        window_days: u32,
    ) -> Result<DateRange, DateRangeError> {
        match (self.start_date, self.end_date) {
            (None, None) => Ok(DateRange::trailing_days(today, window_days)),
            (Some(start), None) => DateRange::new(start, today),
            (None, Some(end)) => Ok(DateRange::trailing_days(end, window_days)),
            (Some(start), Some(end)) => DateRange::new(start, end),
        }
    }
}

/// List transactions in a date range (GET /api/transactions).
pub async fn list_transactions(
    State(state): State<AppState>,
    Query(query): Query<ListTransactionsQuery>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    let today = Utc::now().date_naive();
    let range = query.resolve_range(today, state.list_window_days)?;

    let transactions = state.range_query.list_transactions(range).await?;

    Ok(Json(transactions))
}

/// List every stored transaction (GET /api/transactions/scan).
///
/// Reads the whole table; meant for maintenance, not regular listing.
pub async fn scan_transactions(
    State(state): State<AppState>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    let transactions = state.range_query.scan_transactions().await?;
    Ok(Json(transactions))
}

/// Create a new transaction (POST /api/transactions).
pub async fn create_transaction(
    State(state): State<AppState>,
    Json(payload): Json<CreateTransactionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let tx = payload.into_transaction(Utc::now())?;

    let created = state.transaction_repo.create_transaction(&tx).await?;

    tracing::info!(transaction_id = %created.id, date = %created.created_date(), "Created transaction");

    Ok((StatusCode::CREATED, Json(created)))
}

/// Get a single transaction (GET /api/transactions/{date}/{id}).
pub async fn get_transaction(
    State(state): State<AppState>,
    Path((date, id)): Path<(NaiveDate, Uuid)>,
) -> Result<Json<Transaction>, AppError> {
    let tx = state.transaction_repo.get_transaction(id, date).await?;
    Ok(Json(tx))
}

/// Replace the mutable fields of a transaction (PUT /api/transactions/{date}/{id}).
pub async fn update_transaction(
    State(state): State<AppState>,
    Path((date, id)): Path<(NaiveDate, Uuid)>,
    Json(payload): Json<UpdateTransactionRequest>,
) -> Result<Json<Transaction>, AppError> {
    let payload = payload.validated()?;

    // The stored record supplies the immutable id and created_at.
    let mut tx = state.transaction_repo.get_transaction(id, date).await?;
    tx.apply(payload, Utc::now());

    let updated = state.transaction_repo.update_transaction(&tx).await?;

    tracing::info!(transaction_id = %id, %date, "Updated transaction");

    Ok(Json(updated))
}

/// Delete a transaction (DELETE /api/transactions/{date}/{id}).
///
/// Responds with the record as it was before deletion.
pub async fn delete_transaction(
    State(state): State<AppState>,
    Path((date, id)): Path<(NaiveDate, Uuid)>,
) -> Result<Json<Transaction>, AppError> {
    let tx = state.transaction_repo.get_transaction(id, date).await?;

    let deleted = state.transaction_repo.delete_transaction(&tx).await?;

    tracing::info!(transaction_id = %id, %date, "Deleted transaction");

    Ok(Json(deleted))
}
