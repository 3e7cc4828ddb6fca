use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::requests::UpdateTransactionRequest;
use super::TransactionError;

/// The kind of money movement a transaction records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Purchase,
    Income,
    Investment,
}

impl TransactionType {
    /// Returns the stored representation of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Purchase => "PURCHASE",
            TransactionType::Income => "INCOME",
            TransactionType::Investment => "INVESTMENT",
        }
    }

    /// Parses the stored representation produced by [`as_str`](Self::as_str).
    ///
    /// Unlike [`FromStr`], the match is case-sensitive.
    pub fn from_stored(s: &str) -> Result<Self, TransactionError> {
        match s {
            "PURCHASE" => Ok(TransactionType::Purchase),
            "INCOME" => Ok(TransactionType::Income),
            "INVESTMENT" => Ok(TransactionType::Investment),
            _ => Err(TransactionError::UnknownType(s.to_string())),
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = TransactionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_stored(&s.to_ascii_uppercase())
            .map_err(|_| TransactionError::UnknownType(s.to_string()))
    }
}

/// A single financial transaction.
///
/// `amount` is expressed in minor currency units (cents). Negative amounts are
/// allowed and carry no special meaning beyond their sign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub amount: i64,
    /// Set once at creation. Its UTC date is part of the storage key.
    pub created_at: DateTime<Utc>,
    /// Set on every mutation. `None` until the first update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Transaction {
    /// Creates a new transaction with a fresh id, created now.
    pub fn new(transaction_type: TransactionType, title: impl Into<String>, amount: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            transaction_type,
            title: title.into(),
            description: None,
            amount,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    /// Sets the description for this transaction.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets a specific ID for this transaction (useful for testing).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// Sets a specific creation timestamp (useful for testing and seeding).
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// The UTC calendar date this transaction is keyed under.
    pub fn created_date(&self) -> NaiveDate {
        self.created_at.date_naive()
    }

    /// The identifying key of this transaction.
    pub fn key(&self) -> TransactionKey {
        TransactionKey::new(self.id, self.created_date())
    }

    /// Stamps `updated_at`.
    ///
    /// The new value is strictly greater than the previous `updated_at` (or
    /// `created_at` if the transaction was never updated), even when `now`
    /// has not moved past it.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        let floor = self.updated_at.unwrap_or(self.created_at);
        let stamp = if now > floor {
            now
        } else {
            floor + Duration::nanoseconds(1)
        };
        self.updated_at = Some(stamp);
    }

    /// Replaces the mutable fields with the values from `update` and touches
    /// the transaction. `id` and `created_at` are never changed.
    pub fn apply(&mut self, update: UpdateTransactionRequest, now: DateTime<Utc>) {
        self.transaction_type = update.transaction_type;
        self.title = update.title;
        self.description = update.description;
        self.amount = update.amount;
        self.touch(now);
    }
}

/// Identifies a stored transaction: its id plus the date it was created on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionKey {
    pub id: Uuid,
    pub date: NaiveDate,
}

impl TransactionKey {
    pub fn new(id: Uuid, date: NaiveDate) -> Self {
        Self { id, date }
    }
}

impl fmt::Display for TransactionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.date.format("%Y-%m-%d"), self.id)
    }
}
