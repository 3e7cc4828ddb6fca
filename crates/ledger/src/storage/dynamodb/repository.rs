//! DynamoDB repository implementation.
//!
//! Implements `TransactionRepository` from `ledger_core::storage` using DynamoDB.

use async_trait::async_trait;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use aws_sdk_dynamodb::Client;
use chrono::NaiveDate;
use uuid::Uuid;

use ledger_core::storage::{keys, RepositoryError, Result, TransactionRepository};
use ledger_core::transaction::{Transaction, TransactionKey};

use super::client::create_client;
use super::conversions::{item_to_transaction, key_attributes, transaction_to_item, ENTITY_TYPE};
use super::error::{
    map_delete_item_error, map_put_item_error, map_query_error, map_update_item_error,
};
use super::expressions::{build_update_expression, ITEM_EXISTS_CONDITION};
use crate::config::DynamoDbConfig;

/// DynamoDB-based repository implementation.
///
/// Holds one client for the lifetime of the process. Cloning is cheap and
/// shares the underlying connection pool.
#[derive(Clone)]
pub struct DynamoDbRepository {
    pub(super) client: Client,
    pub(super) table_name: String,
}

impl DynamoDbRepository {
    /// Creates a new repository with the given DynamoDB client and table name.
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    /// Builds the client described by `config` and wraps it in a repository.
    pub async fn connect(config: &DynamoDbConfig) -> Self {
        let client = create_client(config).await;
        Self::new(client, config.table_name.clone())
    }

    /// Get the table name.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

fn not_found(key: &TransactionKey) -> RepositoryError {
    RepositoryError::NotFound {
        entity_type: ENTITY_TYPE,
        key: key.to_string(),
    }
}

#[async_trait]
impl TransactionRepository for DynamoDbRepository {
    async fn create_transaction(&self, tx: &Transaction) -> Result<Transaction> {
        let key = tx.key().to_string();
        tracing::debug!(transaction_id = %tx.id, date = %tx.created_date(), "Creating transaction");

        let item = transaction_to_item(tx)?;

        // Unconditional put: an existing record with the same key is replaced.
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| map_put_item_error(e, &key))
            .inspect_err(|e| tracing::warn!(%key, error = %e, "Failed to create transaction"))?;

        tracing::debug!(%key, "Transaction created");
        Ok(tx.clone())
    }

    async fn get_transaction(&self, id: Uuid, date: NaiveDate) -> Result<Transaction> {
        let key = TransactionKey::new(id, date);
        tracing::debug!(transaction_id = %id, %date, "Getting transaction");

        let result = self
            .client
            .query()
            .table_name(&self.table_name)
            .key_condition_expression("PK = :pk AND begins_with(SK, :sk)")
            .expression_attribute_values(":pk", AttributeValue::S(keys::transaction_pk().to_string()))
            .expression_attribute_values(":sk", AttributeValue::S(keys::transaction_sk(date, id)))
            .limit(1)
            .send()
            .await
            .map_err(|e| map_query_error(e, &key.to_string()))
            .inspect_err(|e| tracing::warn!(%key, error = %e, "Failed to get transaction"))?;

        let items = result.items.unwrap_or_default();
        let tx = match items.first() {
            Some(item) => item_to_transaction(item)?,
            None => return Err(not_found(&key)),
        };

        tracing::debug!(%key, "Transaction retrieved");
        Ok(tx)
    }

    async fn update_transaction(&self, tx: &Transaction) -> Result<Transaction> {
        let key = tx.key();
        tracing::debug!(transaction_id = %tx.id, date = %key.date, "Updating transaction");

        let update = build_update_expression(tx)?;

        let result = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .set_key(Some(key_attributes(&key)))
            .update_expression(update.expression)
            .set_expression_attribute_names(Some(update.names))
            .set_expression_attribute_values(Some(update.values))
            .condition_expression(ITEM_EXISTS_CONDITION)
            .return_values(ReturnValue::AllNew)
            .send()
            .await
            .map_err(|e| map_update_item_error(e, &key.to_string()))
            .inspect_err(|e| tracing::warn!(%key, error = %e, "Failed to update transaction"))?;

        let attributes = result.attributes.ok_or_else(|| RepositoryError::Decode {
            key: key.to_string(),
            reason: "UpdateItem returned no attributes".to_string(),
        })?;

        let updated = item_to_transaction(&attributes)?;
        tracing::debug!(%key, "Transaction updated");
        Ok(updated)
    }

    async fn delete_transaction(&self, tx: &Transaction) -> Result<Transaction> {
        let key = tx.key();
        tracing::debug!(transaction_id = %tx.id, date = %key.date, "Deleting transaction");

        let result = self
            .client
            .delete_item()
            .table_name(&self.table_name)
            .set_key(Some(key_attributes(&key)))
            .return_values(ReturnValue::AllOld)
            .send()
            .await
            .map_err(|e| map_delete_item_error(e, &key.to_string()))
            .inspect_err(|e| tracing::warn!(%key, error = %e, "Failed to delete transaction"))?;

        let deleted = match result.attributes {
            Some(attributes) if !attributes.is_empty() => item_to_transaction(&attributes)?,
            _ => return Err(not_found(&key)),
        };

        tracing::debug!(%key, "Transaction deleted");
        Ok(deleted)
    }
}
