//! Shared application state.
//!
//! Holds the repository trait objects every handler works through. The store
//! handle is built once at startup and shared by reference from here on.

use std::{sync::Arc, time::Duration};

use ledger_core::storage::{TransactionRangeQuery, TransactionRepository};

use crate::config::{Config, StorageBackend};
use crate::storage::InMemoryRepository;

/// Shared application state.
///
/// Cloned for each request handler.
#[derive(Clone)]
pub struct AppState {
    /// Single-record operations.
    pub transaction_repo: Arc<dyn TransactionRepository>,
    /// Range listing and full scans.
    pub range_query: Arc<dyn TransactionRangeQuery>,
    /// Name of the active backend, reported by `/healthz`.
    pub backend: &'static str,
    /// Days covered by a listing without explicit bounds.
    pub list_window_days: u32,
    /// Per-request deadline enforced by the router.
    pub request_timeout: Duration,
}

impl AppState {
    /// Creates a new AppState from a repository implementing both traits.
    pub fn new<R>(repo: R, backend: &'static str, config: &Config) -> Self
    where
        R: TransactionRepository + TransactionRangeQuery + 'static,
    {
        let repo = Arc::new(repo);
        Self {
            transaction_repo: repo.clone(),
            range_query: repo,
            backend,
            list_window_days: config.list_window_days,
            request_timeout: config.request_timeout(),
        }
    }

    /// Creates a state backed by an empty in-memory repository.
    pub fn in_memory(config: &Config) -> Self {
        Self::new(
            InMemoryRepository::new(),
            StorageBackend::Memory.as_str(),
            config,
        )
    }

    /// Builds the backend selected by `config`.
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        match config.storage_backend {
            StorageBackend::Memory => Ok(Self::in_memory(config)),
            #[cfg(feature = "dynamodb")]
            StorageBackend::DynamoDb => {
                let repo = crate::storage::DynamoDbRepository::connect(&config.dynamodb).await;
                tracing::info!(
                    table = %repo.table_name(),
                    target = %config.dynamodb.target_display(),
                    "Using DynamoDB storage"
                );
                Ok(Self::new(repo, StorageBackend::DynamoDb.as_str(), config))
            }
            #[cfg(not(feature = "dynamodb"))]
            StorageBackend::DynamoDb => {
                anyhow::bail!("STORAGE_BACKEND=dynamodb requires the 'dynamodb' feature")
            }
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::in_memory(&Config::default())
    }
}
