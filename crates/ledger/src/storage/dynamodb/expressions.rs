//! Update expression construction.
//!
//! DynamoDB rejects names or values that an expression does not reference, so
//! placeholders are only registered when they are used.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use ledger_core::storage::RepositoryError;
use ledger_core::transaction::Transaction;

use super::conversions::{
    format_timestamp, ATTR_AMOUNT, ATTR_DESCRIPTION, ATTR_PK, ATTR_TITLE, ATTR_TYPE,
    ATTR_UPDATED_AT,
};

/// Condition making an update fail instead of creating a partial item.
pub const ITEM_EXISTS_CONDITION: &str = "attribute_exists(#pk)";

/// A partial-update expression with its placeholder maps.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateExpression {
    pub expression: String,
    pub names: HashMap<String, String>,
    pub values: HashMap<String, AttributeValue>,
}

impl UpdateExpression {
    fn new() -> Self {
        Self {
            expression: String::new(),
            names: HashMap::new(),
            values: HashMap::new(),
        }
    }

    fn name(&mut self, attribute: &str) -> String {
        let placeholder = format!("#{attribute}");
        self.names
            .insert(placeholder.clone(), attribute.to_string());
        placeholder
    }

    fn assign(&mut self, attribute: &str, value: AttributeValue) -> String {
        let name = self.name(attribute);
        let placeholder = format!(":{attribute}");
        self.values.insert(placeholder.clone(), value);
        format!("{name} = {placeholder}")
    }
}

/// Build the expression that replaces the mutable fields of `tx`.
///
/// `type`, `title`, `amount` and `updated_at` are always set. `description` is
/// set when present and removed otherwise. The existence condition on the
/// partition key is registered as `#pk`.
pub fn build_update_expression(tx: &Transaction) -> Result<UpdateExpression, RepositoryError> {
    let fail = |reason: &str| RepositoryError::ExpressionBuild {
        key: tx.key().to_string(),
        reason: reason.to_string(),
    };

    let updated_at = tx
        .updated_at
        .ok_or_else(|| fail("updated_at must be set before updating"))?;
    if tx.title.trim().is_empty() {
        return Err(fail("title must not be empty"));
    }

    let mut update = UpdateExpression::new();
    let mut set = vec![
        update.assign(
            ATTR_TYPE,
            AttributeValue::S(tx.transaction_type.as_str().to_string()),
        ),
        update.assign(ATTR_TITLE, AttributeValue::S(tx.title.clone())),
        update.assign(ATTR_AMOUNT, AttributeValue::N(tx.amount.to_string())),
        update.assign(
            ATTR_UPDATED_AT,
            AttributeValue::S(format_timestamp(&updated_at)),
        ),
    ];

    let mut remove = Vec::new();
    match &tx.description {
        Some(desc) => set.push(update.assign(ATTR_DESCRIPTION, AttributeValue::S(desc.clone()))),
        None => remove.push(update.name(ATTR_DESCRIPTION)),
    }

    update.expression = format!("SET {}", set.join(", "));
    if !remove.is_empty() {
        update.expression.push_str(&format!(" REMOVE {}", remove.join(", ")));
    }

    update
        .names
        .insert("#pk".to_string(), ATTR_PK.to_string());

    Ok(update)
}
