use std::{env, fmt, str::FromStr, time::Duration};

use thiserror::Error;

/// Errors that can occur while loading configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown storage backend '{0}' (expected 'dynamodb' or 'memory')")]
    UnknownStorageBackend(String),
}

/// Which repository implementation backs the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    DynamoDb,
    Memory,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::DynamoDb => "dynamodb",
            StorageBackend::Memory => "memory",
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dynamodb" | "dynamo" => Ok(StorageBackend::DynamoDb),
            "memory" | "inmemory" => Ok(StorageBackend::Memory),
            _ => Err(ConfigError::UnknownStorageBackend(s.to_string())),
        }
    }
}

/// Connection settings for the DynamoDB table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamoDbConfig {
    /// Table holding every transaction (default: "transactions")
    pub table_name: String,
    /// Custom endpoint, e.g. a local DynamoDB at `http://localhost:8000`
    pub endpoint_url: Option<String>,
    /// AWS region (default: "us-east-1")
    pub region: String,
    /// Deadline for a single store operation in milliseconds (default: 5,000)
    pub operation_timeout_ms: u64,
}

impl DynamoDbConfig {
    /// Load DynamoDB settings from environment variables.
    ///
    /// - `DYNAMODB_TABLE_NAME` (default: "transactions")
    /// - `AWS_ENDPOINT_URL` (optional)
    /// - `AWS_REGION` (default: "us-east-1")
    /// - `DYNAMODB_OPERATION_TIMEOUT_MS` (default: 5,000)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            table_name: lookup("DYNAMODB_TABLE_NAME").unwrap_or_else(|| "transactions".to_string()),
            endpoint_url: lookup("AWS_ENDPOINT_URL").filter(|v| !v.trim().is_empty()),
            region: lookup("AWS_REGION").unwrap_or_else(|| "us-east-1".to_string()),
            operation_timeout_ms: lookup("DYNAMODB_OPERATION_TIMEOUT_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(5_000),
        }
    }

    /// Get the operation timeout as a Duration.
    pub fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.operation_timeout_ms)
    }

    /// Returns a display string for the target environment.
    pub fn target_display(&self) -> String {
        match &self.endpoint_url {
            Some(url) => format!("Local DynamoDB ({})", url),
            None => format!("AWS DynamoDB (region: {})", self.region),
        }
    }
}

impl Default for DynamoDbConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Storage backend (default: dynamodb when compiled in, memory otherwise)
    pub storage_backend: StorageBackend,
    pub dynamodb: DynamoDbConfig,
    /// Per-request timeout in seconds (default: 10)
    pub request_timeout_seconds: u64,
    /// Days covered by a listing without explicit bounds (default: 3)
    pub list_window_days: u32,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `STORAGE_BACKEND` - `dynamodb` or `memory`
    /// - `REQUEST_TIMEOUT_SECONDS` - Request timeout (default: 10)
    /// - `LIST_WINDOW_DAYS` - Default listing window (default: 3)
    /// - plus everything read by [`DynamoDbConfig::from_env`]
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let storage_backend = match lookup("STORAGE_BACKEND") {
            Some(value) => value.parse()?,
            None => default_backend(),
        };

        Ok(Self {
            storage_backend,
            dynamodb: DynamoDbConfig::from_lookup(&lookup),
            request_timeout_seconds: lookup("REQUEST_TIMEOUT_SECONDS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            list_window_days: lookup("LIST_WINDOW_DAYS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),
        })
    }

    /// Get the request timeout as a Duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_backend: default_backend(),
            dynamodb: DynamoDbConfig::default(),
            request_timeout_seconds: 10,
            list_window_days: 3,
        }
    }
}

fn default_backend() -> StorageBackend {
    if cfg!(feature = "dynamodb") {
        StorageBackend::DynamoDb
    } else {
        StorageBackend::Memory
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_values() {
        let config = Config::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.storage_backend, default_backend());
        assert_eq!(config.dynamodb.table_name, "transactions");
        assert_eq!(config.dynamodb.endpoint_url, None);
        assert_eq!(config.dynamodb.region, "us-east-1");
        assert_eq!(config.dynamodb.operation_timeout_ms, 5_000);
        assert_eq!(config.request_timeout_seconds, 10);
        assert_eq!(config.list_window_days, 3);
    }

    #[test]
    fn test_default_matches_empty_environment() {
        assert_eq!(Config::from_lookup(lookup(&[])).unwrap(), Config::default());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("STORAGE_BACKEND", "memory"),
            ("DYNAMODB_TABLE_NAME", "ledger-test"),
            ("AWS_ENDPOINT_URL", "http://localhost:8000"),
            ("AWS_REGION", "sa-east-1"),
            ("DYNAMODB_OPERATION_TIMEOUT_MS", "250"),
            ("REQUEST_TIMEOUT_SECONDS", "3"),
            ("LIST_WINDOW_DAYS", "7"),
        ]))
        .unwrap();

        assert_eq!(config.storage_backend, StorageBackend::Memory);
        assert_eq!(config.dynamodb.table_name, "ledger-test");
        assert_eq!(
            config.dynamodb.endpoint_url.as_deref(),
            Some("http://localhost:8000")
        );
        assert_eq!(config.dynamodb.region, "sa-east-1");
        assert_eq!(
            config.dynamodb.operation_timeout(),
            Duration::from_millis(250)
        );
        assert_eq!(config.request_timeout(), Duration::from_secs(3));
        assert_eq!(config.list_window_days, 7);
    }

    #[test]
    fn test_unparsable_numbers_fall_back_to_defaults() {
        let config = Config::from_lookup(lookup(&[
            ("REQUEST_TIMEOUT_SECONDS", "soon"),
            ("LIST_WINDOW_DAYS", "-1"),
        ]))
        .unwrap();

        assert_eq!(config.request_timeout_seconds, 10);
        assert_eq!(config.list_window_days, 3);
    }

    #[test]
    fn test_unknown_backend_is_an_error() {
        let result = Config::from_lookup(lookup(&[("STORAGE_BACKEND", "sqlite")]));

        assert_eq!(
            result,
            Err(ConfigError::UnknownStorageBackend("sqlite".to_string()))
        );
    }

    #[test]
    fn test_blank_endpoint_is_ignored() {
        let config = DynamoDbConfig::from_lookup(lookup(&[("AWS_ENDPOINT_URL", " ")]));

        assert_eq!(config.endpoint_url, None);
        assert_eq!(config.target_display(), "AWS DynamoDB (region: us-east-1)");
    }
}
