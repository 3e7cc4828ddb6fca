mod error;
mod operations;
mod requests;
mod types;

pub use error::TransactionError;
pub use operations::{normalize_description, validate_transaction};
pub use requests::{CreateTransactionRequest, UpdateTransactionRequest};
pub use types::{Transaction, TransactionKey, TransactionType};
