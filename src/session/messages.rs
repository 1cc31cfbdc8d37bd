//! Message types for a partition editing session
//!
//! Each message is one user gesture, already translated from whatever the
//! front end delivered (drag-end, lasso finalize, count change, ...).

use crate::domain::{Location, Point};

// ============================================================================
// Partition Types
// ============================================================================

/// Messages that change the partition or its group metadata
#[derive(Debug, Clone, PartialEq)]
pub enum PartitionMsg {
    /// Set the number of divisions
    Resize(usize),
    /// A unit was dropped on a location (drag-end)
    Drop { unit: String, destination: Location },
    /// Edit a division's display name
    Rename { index: usize, name: String },
    /// Return every unit to the pool with default divisions
    Reset,
    /// Replace the partition with a predefined region type
    LoadPreset(String),
}

// ============================================================================
// Selection Types
// ============================================================================

/// Selection messages
#[derive(Debug, Clone, PartialEq)]
pub enum SelectMsg {
    /// A freehand lasso was finalized with these boundary points
    Lasso(Vec<Point>),
    /// Toggle one unit (click)
    Pick(String),
    /// Drop the current selection
    Clear,
}

// ============================================================================
// Main Message Enum
// ============================================================================

/// Messages for session interactions
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Partition messages
    Partition(PartitionMsg),
    /// Selection messages
    Select(SelectMsg),
}

// ============================================================================
// Convenience Constructors
// ============================================================================

impl Msg {
    pub fn resize(divisions: usize) -> Self {
        Self::Partition(PartitionMsg::Resize(divisions))
    }
    pub fn drop_unit(unit: impl Into<String>, destination: Location) -> Self {
        Self::Partition(PartitionMsg::Drop {
            unit: unit.into(),
            destination,
        })
    }
    pub fn rename(index: usize, name: impl Into<String>) -> Self {
        Self::Partition(PartitionMsg::Rename {
            index,
            name: name.into(),
        })
    }
    pub fn reset() -> Self {
        Self::Partition(PartitionMsg::Reset)
    }
    pub fn load_preset(region_type: impl Into<String>) -> Self {
        Self::Partition(PartitionMsg::LoadPreset(region_type.into()))
    }

    pub fn lasso(points: Vec<Point>) -> Self {
        Self::Select(SelectMsg::Lasso(points))
    }
    pub fn pick(unit: impl Into<String>) -> Self {
        Self::Select(SelectMsg::Pick(unit.into()))
    }
    pub fn clear_selection() -> Self {
        Self::Select(SelectMsg::Clear)
    }
}
