//! API request types for transaction operations.
//!
//! These are pure data types shared between the server and its tooling.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::operations::{normalize_description, validate_fields};
use super::types::{Transaction, TransactionType};
use super::TransactionError;
use crate::serde::deserialize_optional_string;

/// Request payload for creating a new transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTransactionRequest {
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub title: String,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    pub amount: i64,
}

impl CreateTransactionRequest {
    /// Validates the payload without consuming it.
    pub fn validate(&self) -> Result<(), TransactionError> {
        validate_fields(&self.title, self.description.as_deref())
    }

    /// Converts the request into a new transaction created at `now`.
    ///
    /// Assigns a fresh identifier. `updated_at` stays unset.
    pub fn into_transaction(self, now: DateTime<Utc>) -> Result<Transaction, TransactionError> {
        self.validate()?;
        Ok(Transaction {
            id: Uuid::new_v4(),
            transaction_type: self.transaction_type,
            title: self.title.trim().to_string(),
            description: normalize_description(self.description),
            amount: self.amount,
            created_at: now,
            updated_at: None,
        })
    }
}

/// Request payload for updating a transaction.
///
/// Replaces every mutable field; omitting `description` clears it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTransactionRequest {
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub title: String,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    pub amount: i64,
}

impl UpdateTransactionRequest {
    /// Validates the payload and normalizes its strings.
    pub fn validated(self) -> Result<Self, TransactionError> {
        validate_fields(&self.title, self.description.as_deref())?;
        Ok(Self {
            title: self.title.trim().to_string(),
            description: normalize_description(self.description),
            ..self
        })
    }
}

impl From<&Transaction> for UpdateTransactionRequest {
    fn from(tx: &Transaction) -> Self {
        Self {
            transaction_type: tx.transaction_type,
            title: tx.title.clone(),
            description: tx.description.clone(),
            amount: tx.amount,
        }
    }
}
