//! Partition and sort key codec for the single-table transaction layout.
//!
//! Every transaction lives under the same partition key so that one range
//! query over the sort key covers the whole collection in time order:
//!
//! ```text
//! PK = TRANSACTION
//! SK = CREATEDAT#<YYYY-MM-DD>#<id>
//! ```
//!
//! All functions are pure. Identifiers are canonical lowercase UUIDs, so every
//! character after the date segment is one of `[0-9a-f-]`.
//!
//! Dates must fall in years 0000 to 9999. Other years render with a sign or a
//! fifth digit and would sort out of order; `validate_transaction` rejects them
//! before anything is written.

use chrono::NaiveDate;
use uuid::Uuid;

use super::{DateRange, KeyError};
use crate::transaction::TransactionKey;

/// Partition key shared by every transaction.
pub const TRANSACTION_PK: &str = "TRANSACTION";

/// Prefix of every transaction sort key.
pub const SK_PREFIX: &str = "CREATEDAT#";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Returns the partition key for transactions.
pub fn transaction_pk() -> &'static str {
    TRANSACTION_PK
}

/// Generate the sort key for a transaction.
///
/// Pattern: `CREATEDAT#<date>#<id>`
pub fn transaction_sk(date: NaiveDate, id: Uuid) -> String {
    format!("{SK_PREFIX}{}#{id}", date.format(DATE_FORMAT))
}

/// Generate the inclusive lower bound for a range starting on `date`.
///
/// Pattern: `CREATEDAT#<date>#`
pub fn transaction_sk_start(date: NaiveDate) -> String {
    format!("{SK_PREFIX}{}#", date.format(DATE_FORMAT))
}

/// Generate the upper bound for a range ending on `date`.
///
/// Pattern: `CREATEDAT#<date + 1>#`
///
/// No stored key is equal to this bound (identifiers are never empty), so an
/// inclusive `BETWEEN` stops right before the next day regardless of which
/// characters identifiers use. For the last representable date the bound is
/// `CREATEDAT#<date>#` followed by `char::MAX`.
pub fn transaction_sk_end(date: NaiveDate) -> String {
    match date.succ_opt() {
        Some(next) => transaction_sk_start(next),
        None => format!("{}{}", transaction_sk_start(date), char::MAX),
    }
}

/// Compute the `(low, high)` sort key bounds covering every day in `range`.
pub fn day_range(range: DateRange) -> (String, String) {
    (
        transaction_sk_start(range.start),
        transaction_sk_end(range.end),
    )
}

/// Parse a sort key back into the transaction key it was built from.
pub fn parse_transaction_sk(sk: &str) -> Result<TransactionKey, KeyError> {
    let rest = sk
        .strip_prefix(SK_PREFIX)
        .ok_or(KeyError::MissingPrefix(SK_PREFIX))?;

    let (date_part, id_part) = rest
        .split_once('#')
        .ok_or_else(|| KeyError::InvalidDate(rest.to_string()))?;

    let date = NaiveDate::parse_from_str(date_part, DATE_FORMAT)
        .map_err(|_| KeyError::InvalidDate(date_part.to_string()))?;

    let id = Uuid::parse_str(id_part).map_err(|_| KeyError::InvalidId(id_part.to_string()))?;

    // Only the canonical rendering round-trips through `transaction_sk`.
    if id.to_string() != id_part {
        return Err(KeyError::InvalidId(id_part.to_string()));
    }

    Ok(TransactionKey::new(id, date))
}
