//! Upstream catalog product as returned by the WooCommerce REST API

use super::error::IngestError;
use serde::Deserialize;
use serde_json::Value;

/// Name-only reference (category or tag)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NamedRef {
    #[serde(default)]
    pub name: String,
}

/// The subset of upstream product fields the catalog keeps
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SourceProduct {
    pub id: u64,

    #[serde(default)]
    pub name: Option<String>,

    /// Usually text, but some stores send a bare number
    #[serde(default)]
    pub price: Value,

    #[serde(default)]
    pub stock_status: Option<String>,

    #[serde(default)]
    pub stock_quantity: Option<i64>,

    #[serde(default)]
    pub categories: Vec<NamedRef>,

    #[serde(default)]
    pub tags: Vec<NamedRef>,

    #[serde(default)]
    pub on_sale: Option<bool>,

    #[serde(default)]
    pub date_created: Option<String>,

    #[serde(default)]
    pub date_created_gmt: Option<String>,
}

/// A source file holds either one product listing or a list of fetched pages
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SourcePayload {
    Products(Vec<SourceProduct>),
    Pages(Vec<Vec<SourceProduct>>),
}

/// Decode upstream JSON into products, flattening pages in order
pub fn decode_products(json: &str) -> Result<Vec<SourceProduct>, IngestError> {
    let payload: SourcePayload = serde_json::from_str(json).map_err(IngestError::Decode)?;
    Ok(match payload {
        SourcePayload::Products(products) => products,
        SourcePayload::Pages(pages) => pages.into_iter().flatten().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_decode_single_listing() {
        let products = decode_products(
            r#"[{"id": 10, "name": "Mug", "price": "12.00", "categories": [{"id": 3, "name": "Kitchen"}]}]"#,
        )
        .unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].categories[0].name, "Kitchen");
        assert_eq!(products[0].price, Value::String("12.00".into()));
    }

    #[test]
    fn test_decode_pages() {
        let products = decode_products(r#"[[{"id": 1}, {"id": 2}], [{"id": 3}]]"#).unwrap();
        assert_eq!(
            products.iter().map(|p| p.id).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(products[0].price, Value::Null);
    }

    #[test]
    fn test_decode_rejects_missing_id() {
        assert_matches!(
            decode_products(r#"[{"name": "No id"}]"#),
            Err(IngestError::Decode(_))
        );
    }
}
