//! Unit catalog: the fixed universe of partitionable units

use std::collections::HashMap;

use super::geometry::{BoundingBox, Extent};

/// A partitionable geographic unit (department)
#[derive(Clone, Debug, PartialEq)]
pub struct Unit {
    /// Stable catalog code, unique within the catalog
    pub id: String,
    /// Display name
    pub name: String,
    /// Bounding box and representative centroid
    pub extent: Extent,
    /// Whether the unit belongs to the configured highlighted subregion
    pub highlighted: bool,
}

impl Unit {
    pub fn new(id: impl Into<String>, name: impl Into<String>, extent: Extent) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            extent,
            highlighted: false,
        }
    }

    pub fn with_highlight(mut self, highlighted: bool) -> Self {
        self.highlighted = highlighted;
        self
    }
}

/// Immutable registry of every unit, in load order
#[derive(Clone, Debug, Default)]
pub struct UnitCatalog {
    units: Vec<Unit>,
    index: HashMap<String, usize>,
}

impl UnitCatalog {
    /// Build a catalog; later units with an already-seen id are dropped
    pub fn new(units: Vec<Unit>) -> Self {
        let mut catalog = Self::default();
        for unit in units {
            if catalog.index.contains_key(&unit.id) {
                log::warn!("Duplicate unit code {} ({}), skipping", unit.id, unit.name);
                continue;
            }
            catalog.index.insert(unit.id.clone(), catalog.units.len());
            catalog.units.push(unit);
        }
        catalog
    }

    pub fn get(&self, id: &str) -> Option<&Unit> {
        self.index.get(id).map(|&i| &self.units[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Display name for a unit, falling back to its code
    pub fn name_of<'a>(&'a self, id: &'a str) -> &'a str {
        self.get(id).map_or(id, |u| u.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.units.iter().map(|u| u.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Units whose centroid lies inside `bounds`, by linear scan
    pub fn within<'a>(&'a self, bounds: &'a BoundingBox) -> impl Iterator<Item = &'a Unit> + 'a {
        self.units
            .iter()
            .filter(move |u| bounds.contains_point(u.extent.centroid))
    }

    /// Bounds enclosing every unit in the catalog
    pub fn bounds(&self) -> Option<BoundingBox> {
        self.units
            .iter()
            .map(|u| u.extent.bounds)
            .reduce(|a, b| a.union(b))
    }
}
