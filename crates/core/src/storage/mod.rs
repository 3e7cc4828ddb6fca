mod error;
mod http_mapping;
pub mod keys;
mod traits;
mod types;

pub use error::{DateRangeError, KeyError, RepositoryError, Result};
pub use http_mapping::repository_error_to_status_code;
pub use traits::{TransactionRangeQuery, TransactionRepository};
pub use types::DateRange;
