//! Selection set: a transient group of units that move together
//!
//! A selection is independent of the partition. Selecting a unit never
//! changes where it lives; it only marks it so that dragging any selected
//! unit moves the whole set.

use std::collections::HashSet;

use super::catalog::UnitCatalog;
use super::geometry::{BoundingBox, Point};

/// Minimum number of boundary points for a lasso
pub const MIN_LASSO_POINTS: usize = 3;

/// Rejected selection gestures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("a lasso needs at least {min} points, got {got}", min = MIN_LASSO_POINTS)]
    TooFewPoints { got: usize },
}

/// Set of selected unit ids, in selection order
#[derive(Clone, Debug, Default)]
pub struct Selection {
    order: Vec<String>,
    members: HashSet<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection with every unit whose centroid falls inside the
    /// bounding rectangle of `boundary`
    ///
    /// This is a bounding-box approximation: the lasso's actual shape is not
    /// tested. Returns the number of selected units; on error the previous
    /// selection is kept.
    pub fn select_by_polygon(
        &mut self,
        boundary: &[Point],
        catalog: &UnitCatalog,
    ) -> Result<usize, SelectionError> {
        if boundary.len() < MIN_LASSO_POINTS {
            return Err(SelectionError::TooFewPoints {
                got: boundary.len(),
            });
        }
        let Some(bounds) = BoundingBox::from_points(boundary) else {
            return Err(SelectionError::TooFewPoints { got: 0 });
        };

        self.clear();
        for unit in catalog.within(&bounds) {
            self.insert(unit.id.clone());
        }
        log::debug!(
            "Lasso over ({:.4}, {:.4})-({:.4}, {:.4}) selected {} units",
            bounds.min_x,
            bounds.min_y,
            bounds.max_x,
            bounds.max_y,
            self.len()
        );
        Ok(self.len())
    }

    /// Add a unit if unselected, remove it otherwise; returns whether it is
    /// now selected
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.members.remove(id) {
            self.order.retain(|m| m != id);
            false
        } else {
            self.insert(id.to_string());
            true
        }
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.members.clear();
    }

    pub fn contains(&self, id: &str) -> bool {
        self.members.contains(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Selected ids in selection order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Reorder a display list so selected units come first
    ///
    /// Relative order is kept within both the selected and unselected runs.
    pub fn front_ordered<'a>(&self, list: &'a [String]) -> Vec<&'a str> {
        let (mut selected, rest): (Vec<&str>, Vec<&str>) = list
            .iter()
            .map(String::as_str)
            .partition(|id| self.contains(id));
        selected.extend(rest);
        selected
    }

    fn insert(&mut self, id: String) {
        if self.members.insert(id.clone()) {
            self.order.push(id);
        }
    }
}
