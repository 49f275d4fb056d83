//! Catalog record as persisted by the record store

use segment_compiler::condition::value::parse_numeric_literal;
use serde::{Deserialize, Serialize};

/// One catalog product
///
/// `price` is stored as text, exactly as received from the source catalog.
/// Numeric comparisons on it are therefore evaluated after retrieval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub id: u64,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub price: String,

    #[serde(default)]
    pub stock_status: Option<String>,

    #[serde(default)]
    pub stock_quantity: Option<i64>,

    #[serde(default)]
    pub category: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub on_sale: bool,

    /// Canonical ISO-8601 timestamp when the source provided a parseable one
    #[serde(default)]
    pub created_at: Option<String>,
}

impl CatalogRecord {
    pub fn new(id: u64, title: impl Into<String>, price: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            price: price.into(),
            stock_status: None,
            stock_quantity: None,
            category: None,
            tags: Vec::new(),
            on_sale: false,
            created_at: None,
        }
    }

    /// Numeric price, or `None` when the stored text is not a decimal number
    pub fn price_value(&self) -> Option<f64> {
        parse_numeric_literal(self.price.trim())
    }

    pub fn with_stock(mut self, status: impl Into<String>, quantity: Option<i64>) -> Self {
        self.stock_status = Some(status.into());
        self.stock_quantity = quantity;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_on_sale(mut self, on_sale: bool) -> Self {
        self.on_sale = on_sale;
        self
    }

    pub fn with_created_at(mut self, created_at: impl Into<String>) -> Self {
        self.created_at = Some(created_at.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_value() {
        assert_eq!(CatalogRecord::new(1, "a", "1500").price_value(), Some(1500.0));
        assert_eq!(CatalogRecord::new(1, "a", " 19.99 ").price_value(), Some(19.99));
        assert_eq!(CatalogRecord::new(1, "a", "").price_value(), None);
        assert_eq!(CatalogRecord::new(1, "a", "free").price_value(), None);
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let record: CatalogRecord =
            serde_json::from_str(r#"{"id": 42, "price": "10", "tags": ["new"]}"#).unwrap();
        assert_eq!(record.id, 42);
        assert_eq!(record.title, "");
        assert!(!record.on_sale);
        assert_eq!(record.stock_status, None);
        assert_eq!(record.tags, vec!["new".to_string()]);
    }
}
