//! Upstream product -> catalog record

use super::error::IngestError;
use super::source::SourceProduct;
use crate::types::CatalogRecord;
use segment_compiler::compiler::normalize_timestamp;
use serde_json::Value;

/// Map one upstream product to the stored record shape
pub fn map_product(product: &SourceProduct) -> Result<CatalogRecord, IngestError> {
    Ok(CatalogRecord {
        id: product.id,
        title: product.name.clone().unwrap_or_default(),
        price: price_text(product)?,
        stock_status: non_empty(product.stock_status.as_deref()),
        stock_quantity: product.stock_quantity,
        category: product
            .categories
            .first()
            .map(|category| category.name.clone()),
        tags: product.tags.iter().map(|tag| tag.name.clone()).collect(),
        on_sale: product.on_sale.unwrap_or(false),
        created_at: created_at(product),
    })
}

fn price_text(product: &SourceProduct) -> Result<String, IngestError> {
    match &product.price {
        Value::Null => Ok(String::new()),
        Value::String(text) => Ok(text.clone()),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        other => Err(IngestError::invalid_record(
            product.id,
            format!("price must be text or a number, got {}", other),
        )),
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

/// Prefer the site-local creation date, fall back to the GMT one.
/// Parseable timestamps are stored in canonical UTC form.
fn created_at(product: &SourceProduct) -> Option<String> {
    let raw = non_empty(product.date_created.as_deref())
        .or_else(|| non_empty(product.date_created_gmt.as_deref()))?;
    Some(normalize_timestamp(&raw).unwrap_or(raw))
}
