//! Pure validation functions for transactions.

use chrono::Datelike;

use super::types::Transaction;
use super::TransactionError;

const MAX_TITLE_LEN: usize = 200;
const MAX_DESCRIPTION_LEN: usize = 1000;

/// Years a creation timestamp may fall in. Outside this range the date no
/// longer renders as four digits and keys stop sorting chronologically.
const CREATED_YEARS: std::ops::RangeInclusive<i32> = 0..=9999;

/// Validates a transaction before it is stored.
pub fn validate_transaction(tx: &Transaction) -> Result<(), TransactionError> {
    validate_fields(&tx.title, tx.description.as_deref())?;

    let year = tx.created_at.year();
    if !CREATED_YEARS.contains(&year) {
        return Err(TransactionError::CreatedAtOutOfRange(year));
    }
    Ok(())
}

pub(super) fn validate_fields(
    title: &str,
    description: Option<&str>,
) -> Result<(), TransactionError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(TransactionError::EmptyTitle);
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(TransactionError::TitleTooLong);
    }
    if let Some(description) = description {
        if description.trim().chars().count() > MAX_DESCRIPTION_LEN {
            return Err(TransactionError::DescriptionTooLong);
        }
    }
    Ok(())
}

/// Trims a description and turns blank values into `None`.
pub fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::transaction::TransactionType;

    #[test]
    fn test_valid_transaction() {
        let tx = Transaction::new(TransactionType::Purchase, "Rent", -120_000);
        assert!(validate_transaction(&tx).is_ok());
    }

    #[test]
    fn test_title_too_long() {
        let tx = Transaction::new(TransactionType::Purchase, "x".repeat(201), 1);
        assert_eq!(
            validate_transaction(&tx),
            Err(TransactionError::TitleTooLong)
        );
    }

    #[test]
    fn test_description_too_long() {
        let tx =
            Transaction::new(TransactionType::Purchase, "Rent", 1).with_description("d".repeat(1001));
        assert_eq!(
            validate_transaction(&tx),
            Err(TransactionError::DescriptionTooLong)
        );
    }

    #[test]
    fn test_created_at_year_must_have_four_digits() {
        let far_future = Utc.with_ymd_and_hms(10_000, 1, 1, 0, 0, 0).unwrap();
        let tx = Transaction::new(TransactionType::Income, "Pension", 1).with_created_at(far_future);

        assert_eq!(
            validate_transaction(&tx),
            Err(TransactionError::CreatedAtOutOfRange(10_000))
        );

        let last_year = Utc.with_ymd_and_hms(9999, 12, 31, 23, 59, 59).unwrap();
        let tx = tx.with_created_at(last_year);
        assert!(validate_transaction(&tx).is_ok());
    }

    #[test]
    fn test_normalize_description() {
        assert_eq!(normalize_description(None), None);
        assert_eq!(normalize_description(Some("  ".to_string())), None);
        assert_eq!(
            normalize_description(Some(" rent ".to_string())),
            Some("rent".to_string())
        );
    }
}
