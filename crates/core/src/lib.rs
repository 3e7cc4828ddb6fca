//! Core domain for the ledger project.
//!
//! Pure data types and contracts shared between the server, the storage
//! backends and the developer tooling. Nothing in this crate performs I/O.

pub mod serde;
pub mod storage;
pub mod transaction;
