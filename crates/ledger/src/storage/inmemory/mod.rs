//! In-memory storage backend.
//!
//! Keeps every transaction in a `BTreeMap` ordered by its sort key, so range
//! listings behave exactly like the DynamoDB query over the same keys. Used by
//! tests and by `STORAGE_BACKEND=memory`.
//!
//! ```rust,ignore
//! use ledger::storage::InMemoryRepository;
//!
//! let repo = InMemoryRepository::new();
//! ```

mod repository;

pub use repository::InMemoryRepository;
