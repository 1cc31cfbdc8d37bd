//! Predefined partitions, grouped by region type
//!
//! A region type (e.g. "Secciones electorales") maps each region name to the
//! units it contains. Loading one replaces the current partition with one
//! division per region.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// One unit listed in a region
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegionMember {
    pub code: String,
    #[serde(default)]
    pub name: String,
}

/// Regions of one type, by region name (iterated in name order)
pub type Regions = BTreeMap<String, Vec<RegionMember>>;

/// All predefined partitions, by region type
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct RegionTable {
    types: BTreeMap<String, Regions>,
}

impl RegionTable {
    pub fn new(types: BTreeMap<String, Regions>) -> Self {
        Self { types }
    }

    /// Regions of one type
    pub fn get(&self, region_type: &str) -> Option<&Regions> {
        self.types.get(region_type)
    }

    /// Available region types with their region count
    pub fn region_types(&self) -> impl Iterator<Item = (&str, usize)> {
        self.types.iter().map(|(k, v)| (k.as_str(), v.len()))
    }
}

/// Read and decode the region file
pub fn load_regions(path: &Path) -> Result<RegionTable> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read region table: {}", path.display()))?;
    let table: RegionTable = serde_json::from_str(&json)
        .with_context(|| format!("Invalid region table: {}", path.display()))?;
    log::info!("Loaded {} region types", table.types.len());
    Ok(table)
}
