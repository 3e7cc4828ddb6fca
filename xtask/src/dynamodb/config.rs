//! Table configuration types (Functional Core - pure data).

/// Table schema configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    pub table_name: String,
    pub partition_key: KeyAttribute,
    pub sort_key: KeyAttribute,
    pub billing_mode: BillingMode,
}

/// A key attribute definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyAttribute {
    pub name: String,
    pub attribute_type: AttributeType,
}

impl KeyAttribute {
    fn string(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attribute_type: AttributeType::String,
        }
    }
}

/// DynamoDB attribute types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    String,
}

impl AttributeType {
    /// Short DynamoDB notation (`S`).
    pub fn code(&self) -> &'static str {
        match self {
            AttributeType::String => "S",
        }
    }
}

/// Billing mode for the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillingMode {
    PayPerRequest,
}

impl TableConfig {
    /// Sets the table name.
    pub fn with_table_name(mut self, name: &str) -> Self {
        self.table_name = name.to_string();
        self
    }
}

/// Returns the canonical table configuration for the ledger.
///
/// Every transaction shares the `TRANSACTION` partition and is ordered by
/// `SK`, so no secondary index is needed.
pub fn ledger_table_config() -> TableConfig {
    TableConfig {
        table_name: "transactions".to_string(),
        partition_key: KeyAttribute::string("PK"),
        sort_key: KeyAttribute::string("SK"),
        billing_mode: BillingMode::PayPerRequest,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_table_config_keys() {
        let config = ledger_table_config();

        assert_eq!(config.table_name, "transactions");
        assert_eq!(config.partition_key.name, "PK");
        assert_eq!(config.sort_key.name, "SK");
        assert_eq!(config.sort_key.attribute_type.code(), "S");
    }

    #[test]
    fn test_with_table_name() {
        let config = ledger_table_config().with_table_name("ledger-dev");

        assert_eq!(config.table_name, "ledger-dev");
    }
}
