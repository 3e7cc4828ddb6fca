//! DynamoDB attribute conversion functions.
//!
//! Pure functions for converting between DynamoDB AttributeValue maps and
//! transactions. These are testable in isolation without DynamoDB access.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use chrono::{DateTime, SecondsFormat, Utc};
use ledger_core::storage::{keys, RepositoryError};
use ledger_core::transaction::{validate_transaction, Transaction, TransactionKey, TransactionType};
use uuid::Uuid;

pub const ENTITY_TYPE: &str = "Transaction";

pub const ATTR_PK: &str = "PK";
pub const ATTR_SK: &str = "SK";
pub const ATTR_ID: &str = "id";
pub const ATTR_TYPE: &str = "type";
pub const ATTR_TITLE: &str = "title";
pub const ATTR_DESCRIPTION: &str = "description";
pub const ATTR_AMOUNT: &str = "amount";
pub const ATTR_CREATED_AT: &str = "created_at";
pub const ATTR_UPDATED_AT: &str = "updated_at";

/// Older records carry this instead of omitting `updated_at`.
const ZERO_TIMESTAMP: &str = "0001-01-01T00:00:00Z";

/// Render a timestamp the way it is stored: RFC 3339, UTC, full precision.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// The primary key attributes addressing `key`.
pub fn key_attributes(key: &TransactionKey) -> HashMap<String, AttributeValue> {
    HashMap::from([
        (
            ATTR_PK.to_string(),
            AttributeValue::S(keys::transaction_pk().to_string()),
        ),
        (
            ATTR_SK.to_string(),
            AttributeValue::S(keys::transaction_sk(key.date, key.id)),
        ),
    ])
}

/// Convert a Transaction to a DynamoDB item.
///
/// Fails with `Encode` when the transaction would not survive a round trip,
/// e.g. a blank title or a creation year outside 0000-9999.
pub fn transaction_to_item(
    tx: &Transaction,
) -> Result<HashMap<String, AttributeValue>, RepositoryError> {
    validate_transaction(tx).map_err(|e| RepositoryError::Encode {
        key: tx.key().to_string(),
        reason: e.to_string(),
    })?;

    let mut item = key_attributes(&tx.key());

    item.insert(ATTR_ID.to_string(), AttributeValue::S(tx.id.to_string()));
    item.insert(
        ATTR_TYPE.to_string(),
        AttributeValue::S(tx.transaction_type.as_str().to_string()),
    );
    item.insert(ATTR_TITLE.to_string(), AttributeValue::S(tx.title.clone()));
    if let Some(desc) = &tx.description {
        item.insert(ATTR_DESCRIPTION.to_string(), AttributeValue::S(desc.clone()));
    }
    item.insert(
        ATTR_AMOUNT.to_string(),
        AttributeValue::N(tx.amount.to_string()),
    );
    item.insert(
        ATTR_CREATED_AT.to_string(),
        AttributeValue::S(format_timestamp(&tx.created_at)),
    );
    if let Some(updated_at) = &tx.updated_at {
        item.insert(
            ATTR_UPDATED_AT.to_string(),
            AttributeValue::S(format_timestamp(updated_at)),
        );
    }

    Ok(item)
}

/// Convert a DynamoDB item to a Transaction.
///
/// An `SK` stored on the item must match the one derived from `created_at`
/// and `id`. Optional attributes may be missing, but when present they must
/// carry the expected wire type.
pub fn item_to_transaction(
    item: &HashMap<String, AttributeValue>,
) -> Result<Transaction, RepositoryError> {
    let sk = get_optional_string(item, ATTR_SK);
    let label = match &sk {
        Ok(Some(sk)) => sk.clone(),
        _ => "<item>".to_string(),
    };
    let decode = |reason: String| RepositoryError::Decode {
        key: label.clone(),
        reason,
    };

    let id = get_string(item, ATTR_ID).map_err(&decode)?;
    let id = Uuid::parse_str(&id).map_err(|e| decode(format!("Invalid UUID id: {}", e)))?;

    let sk = sk.map_err(&decode)?;

    let transaction_type = get_string(item, ATTR_TYPE).map_err(&decode)?;
    let transaction_type =
        TransactionType::from_stored(&transaction_type).map_err(|e| decode(e.to_string()))?;

    let amount = item
        .get(ATTR_AMOUNT)
        .and_then(|v| v.as_n().ok())
        .ok_or_else(|| decode(format!("Missing or invalid field: {}", ATTR_AMOUNT)))?;
    let amount = amount
        .parse::<i64>()
        .map_err(|e| decode(format!("Invalid amount {}: {}", amount, e)))?;

    let created_at = get_datetime(item, ATTR_CREATED_AT).map_err(&decode)?;
    let updated_at = match get_optional_string(item, ATTR_UPDATED_AT).map_err(&decode)? {
        None => None,
        Some(raw) if raw == ZERO_TIMESTAMP => None,
        Some(raw) => Some(parse_datetime(ATTR_UPDATED_AT, &raw).map_err(&decode)?),
    };

    let tx = Transaction {
        id,
        transaction_type,
        title: get_string(item, ATTR_TITLE).map_err(&decode)?,
        description: get_optional_string(item, ATTR_DESCRIPTION).map_err(&decode)?,
        amount,
        created_at,
        updated_at,
    };

    if let Some(stored) = sk {
        let derived = keys::transaction_sk(tx.created_date(), tx.id);
        if stored != derived {
            return Err(decode(format!(
                "Sort key does not match created_at and id (expected {})",
                derived
            )));
        }
    }

    Ok(tx)
}

// ============================================================================
// Helper functions
// ============================================================================

/// Get a required string attribute.
fn get_string(item: &HashMap<String, AttributeValue>, key: &str) -> Result<String, String> {
    item.get(key)
        .and_then(|v| v.as_s().ok())
        .map(|s| s.to_string())
        .ok_or_else(|| format!("Missing or invalid field: {}", key))
}

/// Get an optional string attribute. Absent is fine; any other type is not.
fn get_optional_string(
    item: &HashMap<String, AttributeValue>,
    key: &str,
) -> Result<Option<String>, String> {
    match item.get(key) {
        None => Ok(None),
        Some(AttributeValue::S(s)) => Ok(Some(s.clone())),
        Some(_) => Err(format!("Invalid field type: {}", key)),
    }
}

/// Get a required datetime attribute (RFC 3339 format).
fn get_datetime(item: &HashMap<String, AttributeValue>, key: &str) -> Result<DateTime<Utc>, String> {
    let s = get_string(item, key)?;
    parse_datetime(key, &s)
}

fn parse_datetime(key: &str, s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("Invalid datetime {}: {}", key, e))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn sample_transaction() -> Transaction {
        Transaction {
            id: Uuid::parse_str("550e8400-e29b-41d4-a716-446655440001").unwrap(),
            transaction_type: TransactionType::Purchase,
            title: "Groceries".to_string(),
            description: Some("Weekly market run".to_string()),
            amount: -1500,
            created_at: Utc.with_ymd_and_hms(2024, 1, 5, 10, 30, 0).unwrap(),
            updated_at: None,
        }
    }

    #[test]
    fn test_transaction_round_trip() {
        let mut tx = sample_transaction();
        tx.updated_at = Some(tx.created_at + chrono::Duration::nanoseconds(123_456_789));

        let item = transaction_to_item(&tx).unwrap();
        let decoded = item_to_transaction(&item).unwrap();

        assert_eq!(tx, decoded);
    }

    #[test]
    fn test_round_trip_without_description() {
        let mut tx = sample_transaction();
        tx.description = None;

        let item = transaction_to_item(&tx).unwrap();
        assert!(!item.contains_key(ATTR_DESCRIPTION));
        assert!(!item.contains_key(ATTR_UPDATED_AT));

        let decoded = item_to_transaction(&item).unwrap();
        assert_eq!(tx, decoded);
    }

    #[test]
    fn test_item_attributes() {
        let tx = sample_transaction();
        let item = transaction_to_item(&tx).unwrap();

        assert_eq!(item.get(ATTR_PK).unwrap().as_s().unwrap(), "TRANSACTION");
        assert_eq!(
            item.get(ATTR_SK).unwrap().as_s().unwrap(),
            "CREATEDAT#2024-01-05#550e8400-e29b-41d4-a716-446655440001"
        );
        assert_eq!(item.get(ATTR_TYPE).unwrap().as_s().unwrap(), "PURCHASE");
        assert_eq!(item.get(ATTR_AMOUNT).unwrap().as_n().unwrap(), "-1500");
        assert_eq!(
            item.get(ATTR_CREATED_AT).unwrap().as_s().unwrap(),
            "2024-01-05T10:30:00Z"
        );
    }

    #[test]
    fn test_blank_title_fails_to_encode() {
        let mut tx = sample_transaction();
        tx.title = "  ".to_string();

        assert!(matches!(
            transaction_to_item(&tx),
            Err(RepositoryError::Encode { .. })
        ));
    }

    #[test]
    fn test_missing_field_fails_to_decode() {
        let mut item = transaction_to_item(&sample_transaction()).unwrap();
        item.remove(ATTR_TITLE);

        let err = item_to_transaction(&item).unwrap_err();
        assert_eq!(
            err,
            RepositoryError::Decode {
                key: "CREATEDAT#2024-01-05#550e8400-e29b-41d4-a716-446655440001".to_string(),
                reason: "Missing or invalid field: title".to_string(),
            }
        );
    }

    #[test]
    fn test_wrong_wire_type_fails_to_decode() {
        let mut item = transaction_to_item(&sample_transaction()).unwrap();
        item.insert(
            ATTR_AMOUNT.to_string(),
            AttributeValue::S("-1500".to_string()),
        );

        assert!(matches!(
            item_to_transaction(&item),
            Err(RepositoryError::Decode { .. })
        ));
    }

    #[test]
    fn test_unknown_type_fails_to_decode() {
        let mut item = transaction_to_item(&sample_transaction()).unwrap();
        item.insert(ATTR_TYPE.to_string(), AttributeValue::S("GIFT".to_string()));

        assert!(matches!(
            item_to_transaction(&item),
            Err(RepositoryError::Decode { .. })
        ));
    }

    #[test]
    fn test_diverging_sort_key_fails_to_decode() {
        let mut item = transaction_to_item(&sample_transaction()).unwrap();
        item.insert(
            ATTR_CREATED_AT.to_string(),
            AttributeValue::S("2024-02-01T00:00:00Z".to_string()),
        );

        assert!(matches!(
            item_to_transaction(&item),
            Err(RepositoryError::Decode { .. })
        ));
    }

    fn assert_decode_fails(item: &HashMap<String, AttributeValue>, reason: &str) {
        match item_to_transaction(item) {
            Err(RepositoryError::Decode { reason: actual, .. }) => assert_eq!(actual, reason),
            other => panic!("expected Decode error, got {:?}", other),
        }
    }

    #[test]
    fn test_sort_key_with_wrong_type_fails_to_decode() {
        let mut item = transaction_to_item(&sample_transaction()).unwrap();
        item.insert(ATTR_SK.to_string(), AttributeValue::N("1".to_string()));

        assert_decode_fails(&item, "Invalid field type: SK");
    }

    #[test]
    fn test_updated_at_with_wrong_type_fails_to_decode() {
        let mut item = transaction_to_item(&sample_transaction()).unwrap();
        item.insert(
            ATTR_UPDATED_AT.to_string(),
            AttributeValue::N("1700000000".to_string()),
        );

        assert_decode_fails(&item, "Invalid field type: updated_at");
    }

    #[test]
    fn test_description_with_wrong_type_fails_to_decode() {
        let mut item = transaction_to_item(&sample_transaction()).unwrap();
        item.insert(ATTR_DESCRIPTION.to_string(), AttributeValue::N("5".to_string()));

        assert_decode_fails(&item, "Invalid field type: description");
    }

    #[test]
    fn test_missing_sort_key_skips_consistency_check() {
        let tx = sample_transaction();
        let mut item = transaction_to_item(&tx).unwrap();
        item.remove(ATTR_SK);

        assert_eq!(item_to_transaction(&item).unwrap(), tx);
    }

    #[test]
    fn test_type_must_match_stored_spelling() {
        let mut item = transaction_to_item(&sample_transaction()).unwrap();
        item.insert(ATTR_TYPE.to_string(), AttributeValue::S("purchase".to_string()));

        assert_decode_fails(&item, "Unknown transaction type: purchase");
    }

    #[test]
    fn test_five_digit_year_fails_to_encode() {
        let mut tx = sample_transaction();
        tx.created_at = Utc.with_ymd_and_hms(10_000, 1, 1, 0, 0, 0).unwrap();

        assert!(matches!(
            transaction_to_item(&tx),
            Err(RepositoryError::Encode { .. })
        ));
    }

    #[test]
    fn test_zero_updated_at_decodes_as_absent() {
        let mut item = transaction_to_item(&sample_transaction()).unwrap();
        item.insert(
            ATTR_UPDATED_AT.to_string(),
            AttributeValue::S(ZERO_TIMESTAMP.to_string()),
        );

        let tx = item_to_transaction(&item).unwrap();
        assert_eq!(tx.updated_at, None);
    }

    #[test]
    fn test_key_attributes() {
        let tx = sample_transaction();
        let key = key_attributes(&tx.key());

        assert_eq!(key.len(), 2);
        assert_eq!(key.get(ATTR_PK).unwrap().as_s().unwrap(), "TRANSACTION");
    }
}
