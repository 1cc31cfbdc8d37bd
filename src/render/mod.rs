//! Projections of the session state
//!
//! This module contains:
//! - Per-unit map styling derived from locations and the selection
//! - The comparative statistics table and the partition listing
//! - CSV export of the statistics table
//!
//! Nothing here mutates the session; everything is recomputed from the
//! partition after each handled message.

pub mod export;
pub mod style;
pub mod table;
