//! Seed command implementation.

use chrono::{Datelike, Duration, NaiveDate, NaiveTime};
use ledger::storage::DynamoDbRepository;
use ledger_core::storage::TransactionRepository;
use ledger_core::transaction::{Transaction, TransactionType};
use uuid::Uuid;

use super::error::Result;

/// (type, title, description, amount in cents)
const SAMPLES: &[(TransactionType, &str, Option<&str>, i64)] = &[
    (TransactionType::Purchase, "Groceries", Some("Weekly market run"), -8_450),
    (TransactionType::Purchase, "Coffee", None, -450),
    (TransactionType::Income, "Salary", Some("Monthly payroll"), 350_000),
    (TransactionType::Investment, "Index fund", None, -50_000),
    (TransactionType::Purchase, "Rent", None, -120_000),
    (TransactionType::Income, "Freelance invoice", Some("Website maintenance"), 45_000),
    (TransactionType::Purchase, "Train ticket", None, -1_500),
    (TransactionType::Investment, "Bond coupon", None, 2_300),
];

/// Generate `count` sample transactions spread over `days` days starting at
/// `start_date`.
///
/// The output only depends on the arguments, ids included, so seeding the
/// same window twice overwrites the same records.
pub fn generate_seed_transactions(start_date: NaiveDate, days: u32, count: u32) -> Vec<Transaction> {
    let days = days.max(1);

    (0..count)
        .map(|i| {
            let (transaction_type, title, description, amount) =
                SAMPLES[i as usize % SAMPLES.len()];

            let date = start_date + Duration::days(i64::from(i % days));
            let time = NaiveTime::from_hms_opt(8 + (i * 3) % 12, (i * 7) % 60, 0).unwrap_or_default();
            let created_at = date.and_time(time).and_utc();

            let id = Uuid::from_u128(
                (u128::from(date.num_days_from_ce().unsigned_abs()) << 64) | u128::from(i),
            );

            let tx = Transaction::new(transaction_type, title, amount)
                .with_id(id)
                .with_created_at(created_at);
            match description {
                Some(desc) => tx.with_description(desc),
                None => tx,
            }
        })
        .collect()
}

/// Write transactions through the repository, one put per record.
pub async fn seed_transactions(
    repo: &DynamoDbRepository,
    transactions: &[Transaction],
    mut on_created: impl FnMut(usize, &Transaction),
) -> Result<u32> {
    let mut inserted = 0;

    for (i, tx) in transactions.iter().enumerate() {
        repo.create_transaction(tx).await?;
        on_created(i, tx);
        inserted += 1;
    }

    Ok(inserted)
}
