//! Range listing and full-table scan.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;

use ledger_core::storage::{keys, DateRange, Result, TransactionRangeQuery};
use ledger_core::transaction::Transaction;

use super::conversions::item_to_transaction;
use super::error::{map_query_error, map_scan_error};
use super::repository::DynamoDbRepository;

type Item = HashMap<String, AttributeValue>;

/// A continuation token counts only when it carries attributes.
fn next_page(last_evaluated_key: Option<Item>) -> Option<Item> {
    last_evaluated_key.filter(|key| !key.is_empty())
}

#[async_trait]
impl TransactionRangeQuery for DynamoDbRepository {
    async fn list_transactions(&self, range: DateRange) -> Result<Vec<Transaction>> {
        let label = format!("{}..{}", range.start, range.end);
        tracing::debug!(start_date = %range.start, end_date = %range.end, "Listing transactions");

        let (low, high) = keys::day_range(range);
        let mut items: Vec<Item> = Vec::new();
        let mut start_key: Option<Item> = None;

        loop {
            let page = self
                .client
                .query()
                .table_name(&self.table_name)
                .key_condition_expression("PK = :pk AND SK BETWEEN :low AND :high")
                .expression_attribute_values(
                    ":pk",
                    AttributeValue::S(keys::transaction_pk().to_string()),
                )
                .expression_attribute_values(":low", AttributeValue::S(low.clone()))
                .expression_attribute_values(":high", AttributeValue::S(high.clone()))
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(|e| map_query_error(e, &label))
                .inspect_err(|e| tracing::warn!(%label, error = %e, "Failed to list transactions"))?;

            items.extend(page.items.unwrap_or_default());

            match next_page(page.last_evaluated_key) {
                Some(key) => start_key = Some(key),
                None => break,
            }
        }

        let transactions = items
            .iter()
            .map(item_to_transaction)
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(count = transactions.len(), %label, "Transactions listed");
        Ok(transactions)
    }

    async fn scan_transactions(&self) -> Result<Vec<Transaction>> {
        tracing::debug!(table = %self.table_name, "Scanning transactions");

        let mut items: Vec<Item> = Vec::new();
        let mut start_key: Option<Item> = None;

        loop {
            let page = self
                .client
                .scan()
                .table_name(&self.table_name)
                .filter_expression("PK = :pk")
                .expression_attribute_values(
                    ":pk",
                    AttributeValue::S(keys::transaction_pk().to_string()),
                )
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(|e| map_scan_error(e, &self.table_name))
                .inspect_err(|e| tracing::warn!(error = %e, "Failed to scan transactions"))?;

            items.extend(page.items.unwrap_or_default());

            match next_page(page.last_evaluated_key) {
                Some(key) => start_key = Some(key),
                None => break,
            }
        }

        let transactions = items
            .iter()
            .map(item_to_transaction)
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(count = transactions.len(), "Transactions scanned");
        Ok(transactions)
    }
}

#[cfg(test)]
mod tests {
    use aws_sdk_dynamodb::operation::query::{QueryInput, QueryOutput};
    use aws_sdk_dynamodb::operation::scan::ScanOutput;
    use aws_sdk_dynamodb::Client;
    use aws_smithy_mocks::{mock, mock_client, RuleMode};
    use chrono::{NaiveDate, TimeZone, Utc};
    use ledger_core::transaction::TransactionType;
    use uuid::Uuid;

    use super::super::conversions::{key_attributes, transaction_to_item};
    use super::*;

    const TABLE: &str = "transactions";

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn purchase(id: u128, day: u32, amount: i64) -> Transaction {
        Transaction::new(TransactionType::Purchase, "Coffee", amount)
            .with_id(Uuid::from_u128(id))
            .with_created_at(Utc.with_ymd_and_hms(2024, 1, day, 9, 0, 0).unwrap())
    }

    /// True when the query's `BETWEEN` bounds include `sk`.
    fn bounds_include(req: &QueryInput, sk: &str) -> bool {
        let values = match req.expression_attribute_values() {
            Some(values) => values,
            None => return false,
        };
        let bound = |name: &str| values.get(name).and_then(|v| v.as_s().ok()).cloned();
        match (bound(":low"), bound(":high")) {
            (Some(low), Some(high)) => low.as_str() <= sk && sk <= high.as_str(),
            _ => false,
        }
    }

    #[tokio::test]
    async fn test_list_follows_last_evaluated_key() {
        let first = purchase(1, 4, -100);
        let second = purchase(2, 5, -200);
        let first_item = transaction_to_item(&first).unwrap();
        let second_item = transaction_to_item(&second).unwrap();
        let continuation = key_attributes(&first.key());
        let expected_start = continuation.clone();

        let page_one = mock!(Client::query)
            .match_requests(|req| {
                req.key_condition_expression() == Some("PK = :pk AND SK BETWEEN :low AND :high")
                    && req.exclusive_start_key().is_none()
            })
            .then_output(move || {
                QueryOutput::builder()
                    .items(first_item.clone())
                    .set_last_evaluated_key(Some(continuation.clone()))
                    .build()
            });
        let page_two = mock!(Client::query)
            .match_requests(move |req| req.exclusive_start_key() == Some(&expected_start))
            .then_output(move || QueryOutput::builder().items(second_item.clone()).build());
        let client = mock_client!(aws_sdk_dynamodb, RuleMode::MatchAny, [&page_one, &page_two]);
        let repo = DynamoDbRepository::new(client, TABLE);

        let range = DateRange::new(date(2024, 1, 4), date(2024, 1, 5)).unwrap();
        let listed = repo.list_transactions(range).await.unwrap();

        assert_eq!(listed, vec![first, second]);
        assert_eq!(page_one.num_calls(), 1);
        assert_eq!(page_two.num_calls(), 1);
    }

    #[tokio::test]
    async fn test_list_bounds_select_by_creation_date() {
        let a = purchase(0xa, 5, -1500);
        let a_sk = keys::transaction_sk(a.created_date(), a.id);
        let a_item = transaction_to_item(&a).unwrap();
        let outside_sk = a_sk.clone();

        let inside = mock!(Client::query)
            .match_requests(move |req| bounds_include(req, &a_sk))
            .then_output(move || QueryOutput::builder().items(a_item.clone()).build());
        let outside = mock!(Client::query)
            .match_requests(move |req| !bounds_include(req, &outside_sk))
            .then_output(|| QueryOutput::builder().build());
        let client = mock_client!(aws_sdk_dynamodb, RuleMode::MatchAny, [&inside, &outside]);
        let repo = DynamoDbRepository::new(client, TABLE);

        let around = DateRange::new(date(2024, 1, 4), date(2024, 1, 6)).unwrap();
        let after = DateRange::new(date(2024, 1, 6), date(2024, 1, 7)).unwrap();

        assert_eq!(repo.list_transactions(around).await.unwrap(), vec![a]);
        assert!(repo.list_transactions(after).await.unwrap().is_empty());
        assert_eq!(inside.num_calls(), 1);
        assert_eq!(outside.num_calls(), 1);
    }

    #[tokio::test]
    async fn test_list_fails_on_undecodable_item() {
        let mut item = transaction_to_item(&purchase(3, 5, -300)).unwrap();
        item.remove("title");
        let query = mock!(Client::query)
            .then_output(move || QueryOutput::builder().items(item.clone()).build());
        let repo = DynamoDbRepository::new(mock_client!(aws_sdk_dynamodb, [&query]), TABLE);

        let result = repo
            .list_transactions(DateRange::single_day(date(2024, 1, 5)))
            .await;

        assert!(matches!(
            result,
            Err(ledger_core::storage::RepositoryError::Decode { .. })
        ));
    }

    #[tokio::test]
    async fn test_scan_filters_partition_and_paginates() {
        let first = purchase(1, 4, -100);
        let second = purchase(2, 9, -200);
        let first_item = transaction_to_item(&first).unwrap();
        let second_item = transaction_to_item(&second).unwrap();
        let continuation = key_attributes(&first.key());

        let page_one = mock!(Client::scan)
            .match_requests(|req| {
                req.filter_expression() == Some("PK = :pk") && req.exclusive_start_key().is_none()
            })
            .then_output(move || {
                ScanOutput::builder()
                    .items(first_item.clone())
                    .set_last_evaluated_key(Some(continuation.clone()))
                    .build()
            });
        let page_two = mock!(Client::scan)
            .match_requests(|req| req.exclusive_start_key().is_some())
            .then_output(move || {
                ScanOutput::builder()
                    .items(second_item.clone())
                    .set_last_evaluated_key(Some(HashMap::new()))
                    .build()
            });
        let client = mock_client!(aws_sdk_dynamodb, RuleMode::MatchAny, [&page_one, &page_two]);
        let repo = DynamoDbRepository::new(client, TABLE);

        let scanned = repo.scan_transactions().await.unwrap();

        assert_eq!(scanned, vec![first, second]);
        assert_eq!(page_two.num_calls(), 1);
    }

    #[test]
    fn test_empty_continuation_token_ends_pagination() {
        assert_eq!(next_page(None), None);
        assert_eq!(next_page(Some(HashMap::new())), None);
    }

    #[test]
    fn test_continuation_token_is_followed() {
        let key: Item = HashMap::from([(
            "PK".to_string(),
            AttributeValue::S("TRANSACTION".to_string()),
        )]);

        assert_eq!(next_page(Some(key.clone())), Some(key));
    }
}
