//! Registry configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fixed table of recognized top-up codes and the amount each credits.
///
/// Deserializes from a flat map, e.g. `{"upg100": 100, "upg500": 500}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopUpTable(BTreeMap<String, u64>);

impl TopUpTable {
    /// Creates an empty table.
    #[must_use]
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    /// Adds or replaces a code.
    #[must_use]
    pub fn with(mut self, code: impl Into<String>, amount: u64) -> Self {
        self.0.insert(code.into(), amount);
        self
    }

    /// Returns the amount credited by `code`, if it is recognized.
    #[must_use]
    pub fn amount(&self, code: &str) -> Option<u64> {
        self.0.get(code).copied()
    }

    /// Iterates over `(code, amount)` pairs in code order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(c, a)| (c.as_str(), *a))
    }

    /// Returns the number of codes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no code is recognized.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for TopUpTable {
    fn default() -> Self {
        Self::empty()
            .with("upg100", 100)
            .with("upg500", 500)
            .with("upg1000", 1000)
    }
}

/// Configuration for a [`crate::Registry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Codes accepted by `recharge_account`.
    pub top_up_table: TopUpTable,

    /// Whether a purchase credits the previous owner with the price.
    ///
    /// Off by default: a purchase only debits the buyer.
    pub credit_seller: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            top_up_table: TopUpTable::default(),
            credit_seller: false,
        }
    }
}

impl RegistryConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the top-up table.
    #[must_use]
    pub fn top_up_table(mut self, table: TopUpTable) -> Self {
        self.top_up_table = table;
        self
    }

    /// Sets whether purchases credit the seller.
    #[must_use]
    pub const fn credit_seller(mut self, value: bool) -> Self {
        self.credit_seller = value;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = RegistryConfig::default();
        assert!(!config.credit_seller);
        assert_eq!(config.top_up_table.len(), 3);
        assert_eq!(config.top_up_table.amount("upg100"), Some(100));
        assert_eq!(config.top_up_table.amount("upg500"), Some(500));
        assert_eq!(config.top_up_table.amount("upg1000"), Some(1000));
        assert_eq!(config.top_up_table.amount("UPG100"), None);
    }

    #[test]
    fn builder_pattern() {
        let config = RegistryConfig::new()
            .credit_seller(true)
            .top_up_table(TopUpTable::empty().with("gift", 5));

        assert!(config.credit_seller);
        assert_eq!(config.top_up_table.amount("gift"), Some(5));
        assert_eq!(config.top_up_table.amount("upg100"), None);
    }

    #[test]
    fn table_iterates_in_code_order() {
        let table = TopUpTable::empty().with("b", 2).with("a", 1).with("b", 3);
        assert_eq!(table.iter().collect::<Vec<_>>(), vec![("a", 1), ("b", 3)]);
    }
}
