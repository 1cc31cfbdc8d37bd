//! Pure domain types with minimal dependencies
//!
//! This module contains the partition and selection engine. Types here
//! should have no I/O or runtime dependencies so the session layer and
//! tests can drive them directly.

pub mod aggregate;
pub mod catalog;
pub mod geometry;
pub mod partition;
pub mod selection;

pub use aggregate::*;
pub use catalog::*;
pub use geometry::*;
pub use partition::*;
pub use selection::*;
