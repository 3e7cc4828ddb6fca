use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::transaction::Transaction;

use super::{DateRange, Result};

/// Create, read, update and delete operations on single transactions.
///
/// Implementations perform no optimistic-concurrency check and never retry:
/// a second create with an existing id overwrites the stored record, and two
/// concurrent updates of the same key resolve last-write-wins.
///
/// Every call is cancelled by dropping its future.
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// Stores a transaction unconditionally and returns it.
    async fn create_transaction(&self, tx: &Transaction) -> Result<Transaction>;

    /// Gets the transaction with `id` created on `date`.
    ///
    /// Fails with `NotFound` when no such transaction exists.
    async fn get_transaction(&self, id: Uuid, date: NaiveDate) -> Result<Transaction>;

    /// Replaces the mutable fields (`type`, `title`, `description`, `amount`)
    /// and `updated_at` of the stored record addressed by `tx`'s key.
    ///
    /// The caller must read the current record first, merge the new values and
    /// stamp `updated_at`. Returns the full post-update record.
    async fn update_transaction(&self, tx: &Transaction) -> Result<Transaction>;

    /// Deletes the record addressed by `tx`'s key and returns the snapshot
    /// that was removed.
    ///
    /// Fails with `NotFound` when nothing was stored under that key.
    async fn delete_transaction(&self, tx: &Transaction) -> Result<Transaction>;
}

/// Read-only listing of transactions.
#[async_trait]
pub trait TransactionRangeQuery: Send + Sync {
    /// Lists every transaction created within `range` (inclusive), ascending by
    /// creation date and then by id. An empty result is not an error.
    async fn list_transactions(&self, range: DateRange) -> Result<Vec<Transaction>>;

    /// Lists every transaction in the table, with no ordering guarantee.
    ///
    /// Costs a full table scan on every call; not meant for regular listing.
    async fn scan_transactions(&self) -> Result<Vec<Transaction>>;
}
