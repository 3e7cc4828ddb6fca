//! Storage backend implementations.
//!
//! Concrete implementations of the repository traits defined in
//! `ledger_core::storage`. The in-memory backend is always compiled; the
//! DynamoDB backend sits behind the `dynamodb` feature (on by default).
//!
//! Build without DynamoDB:
//! ```bash
//! cargo build -p ledger --no-default-features
//! ```

pub mod inmemory;

#[cfg(feature = "dynamodb")]
pub mod dynamodb;

pub use inmemory::InMemoryRepository;

#[cfg(feature = "dynamodb")]
pub use dynamodb::DynamoDbRepository;
