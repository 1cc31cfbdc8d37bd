//! External datasets and their loaders
//!
//! This module consolidates:
//! - Unit catalog decoding from GeoJSON (catalog.rs)
//! - Per-unit attribute table (attributes.rs)
//! - Predefined partitions by region type (regions.rs)
//!
//! The three files are read concurrently at startup and joined before the
//! session starts. Only the catalog is required.

pub mod attributes;
pub mod catalog;
pub mod regions;

use anyhow::{Context, Result};

use crate::config::ComarcaConfig;
use crate::domain::{AttributeTable, UnitCatalog};
use regions::RegionTable;

/// Everything the session needs from disk
#[derive(Debug, Clone)]
pub struct Datasets {
    pub catalog: UnitCatalog,
    /// `None` when the attribute file is missing or unreadable
    pub attributes: Option<AttributeTable>,
    /// `None` when the region file is missing or unreadable
    pub regions: Option<RegionTable>,
}

/// Load all datasets concurrently
///
/// Fails only if the catalog cannot be loaded; the optional tables degrade
/// to `None` with a warning.
pub async fn load_all(config: &ComarcaConfig) -> Result<Datasets> {
    let catalog_path = config.catalog_path.clone();
    let catalog_config = config.clone();
    let catalog_task = tokio::task::spawn_blocking(move || {
        catalog::load_catalog(&catalog_path, &catalog_config)
    });

    let attributes_path = config.attributes_path.clone();
    let attributes_task = tokio::task::spawn_blocking(move || {
        attributes_path
            .map(|path| attributes::load_attributes(&path))
            .transpose()
    });

    let regions_path = config.regions_path.clone();
    let regions_task = tokio::task::spawn_blocking(move || {
        regions_path
            .map(|path| regions::load_regions(&path))
            .transpose()
    });

    let (catalog, attributes, regions) = tokio::join!(catalog_task, attributes_task, regions_task);

    let catalog = catalog.context("Catalog loader panicked")??;
    log::info!("Loaded {} units", catalog.len());
    if let Some(bounds) = catalog.bounds() {
        log::debug!(
            "Catalog extent {:.4} x {:.4} from ({:.4}, {:.4})",
            bounds.width(),
            bounds.height(),
            bounds.min_x,
            bounds.min_y
        );
    }

    let attributes = optional("attribute table", attributes.context("Attribute loader panicked")?);
    let regions = optional("region table", regions.context("Region loader panicked")?);

    if let Some(table) = &attributes {
        let missing = catalog.ids().filter(|id| !table.contains(id)).count();
        if table.is_empty() {
            log::warn!("Attribute table is empty");
        } else if missing > 0 {
            log::warn!("No attributes for {} of {} units", missing, catalog.len());
        }
    }

    Ok(Datasets {
        catalog,
        attributes,
        regions,
    })
}

fn optional<T>(what: &str, result: Result<Option<T>>) -> Option<T> {
    match result {
        Ok(Some(value)) => Some(value),
        Ok(None) => {
            log::info!("No {} configured", what);
            None
        }
        Err(err) => {
            log::warn!("Could not load {}, continuing without it: {:?}", what, err);
            None
        }
    }
}
