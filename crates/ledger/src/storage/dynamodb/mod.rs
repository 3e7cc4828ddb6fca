//! DynamoDB storage backend implementation.
//!
//! Implements the transaction repository traits from `ledger_core::storage`
//! on top of `aws-sdk-dynamodb`, using the single-table layout described in
//! `ledger_core::storage::keys`.

mod client;
mod conversions;
mod error;
mod expressions;
mod query;
mod repository;

pub use client::create_client;
pub use repository::DynamoDbRepository;
