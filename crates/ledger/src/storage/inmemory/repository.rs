//! In-memory repository implementation.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;
use uuid::Uuid;

use ledger_core::storage::{
    keys, DateRange, RepositoryError, Result, TransactionRangeQuery, TransactionRepository,
};
use ledger_core::transaction::{validate_transaction, Transaction, TransactionKey};

const ENTITY_TYPE: &str = "Transaction";

/// In-memory storage backend.
///
/// Data is not persisted and is lost when the last clone is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    transactions: Arc<RwLock<BTreeMap<String, Transaction>>>,
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored transactions.
    pub async fn len(&self) -> usize {
        self.transactions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn sort_key(key: &TransactionKey) -> String {
    keys::transaction_sk(key.date, key.id)
}

fn not_found(key: &TransactionKey) -> RepositoryError {
    RepositoryError::NotFound {
        entity_type: ENTITY_TYPE,
        key: key.to_string(),
    }
}

#[async_trait]
impl TransactionRepository for InMemoryRepository {
    async fn create_transaction(&self, tx: &Transaction) -> Result<Transaction> {
        let key = tx.key();
        validate_transaction(tx).map_err(|e| RepositoryError::Encode {
            key: key.to_string(),
            reason: e.to_string(),
        })?;

        let mut transactions = self.transactions.write().await;
        transactions.insert(sort_key(&key), tx.clone());
        Ok(tx.clone())
    }

    async fn get_transaction(&self, id: Uuid, date: NaiveDate) -> Result<Transaction> {
        let key = TransactionKey::new(id, date);
        let transactions = self.transactions.read().await;
        transactions
            .get(&sort_key(&key))
            .cloned()
            .ok_or_else(|| not_found(&key))
    }

    async fn update_transaction(&self, tx: &Transaction) -> Result<Transaction> {
        let key = tx.key();
        let fail = |reason: &str| RepositoryError::ExpressionBuild {
            key: key.to_string(),
            reason: reason.to_string(),
        };
        if tx.updated_at.is_none() {
            return Err(fail("updated_at must be set before updating"));
        }
        if tx.title.trim().is_empty() {
            return Err(fail("title must not be empty"));
        }

        let mut transactions = self.transactions.write().await;
        let stored = transactions
            .get_mut(&sort_key(&key))
            .ok_or_else(|| not_found(&key))?;

        stored.transaction_type = tx.transaction_type;
        stored.title = tx.title.clone();
        stored.description = tx.description.clone();
        stored.amount = tx.amount;
        stored.updated_at = tx.updated_at;

        Ok(stored.clone())
    }

    async fn delete_transaction(&self, tx: &Transaction) -> Result<Transaction> {
        let key = tx.key();
        let mut transactions = self.transactions.write().await;
        transactions
            .remove(&sort_key(&key))
            .ok_or_else(|| not_found(&key))
    }
}

#[async_trait]
impl TransactionRangeQuery for InMemoryRepository {
    async fn list_transactions(&self, range: DateRange) -> Result<Vec<Transaction>> {
        let (low, high) = keys::day_range(range);
        let transactions = self.transactions.read().await;
        Ok(transactions.range(low..=high).map(|(_, tx)| tx.clone()).collect())
    }

    async fn scan_transactions(&self) -> Result<Vec<Transaction>> {
        let transactions = self.transactions.read().await;
        Ok(transactions.values().cloned().collect())
    }
}
