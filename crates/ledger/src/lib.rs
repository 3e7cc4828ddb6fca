//! Transaction ledger server.
//!
//! Serves the transaction API over HTTP and stores records either in DynamoDB
//! (feature `dynamodb`) or in memory.

pub mod app;
pub mod config;
pub mod handlers;
pub mod state;
pub mod storage;
