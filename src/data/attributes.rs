//! Per-unit numeric attribute table (area, population, ...)

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::domain::AttributeTable;

/// Read and decode the attribute file
pub fn load_attributes(path: &Path) -> Result<AttributeTable> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read attribute table: {}", path.display()))?;
    let table = parse_attributes(&json)
        .with_context(|| format!("Invalid attribute table: {}", path.display()))?;
    log::info!("Loaded attributes for {} units", table.len());
    Ok(table)
}

/// Decode `{ code: { attribute: number, ... }, ... }`
///
/// Numbers written as strings are accepted; any other value is ignored.
pub fn parse_attributes(json: &str) -> Result<AttributeTable> {
    let raw: HashMap<String, HashMap<String, Value>> = serde_json::from_str(json)?;
    Ok(raw
        .into_iter()
        .map(|(code, attrs)| {
            let numeric = attrs
                .into_iter()
                .filter_map(|(name, value)| numeric_value(&value).map(|v| (name, v)));
            (code, numeric.collect::<Vec<_>>())
        })
        .collect())
}

fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
