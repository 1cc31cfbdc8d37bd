//! Map styling for each unit

use crate::domain::{Location, POOL_COLOR, Partition, Selection, UnitCatalog};

/// How one unit should be painted
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnitStyle<'a> {
    pub id: &'a str,
    /// Group color, or the pool color for unassigned units
    pub fill: &'static str,
    /// Draw the selection outline
    pub selected: bool,
    /// Draw the category outline
    pub highlighted: bool,
}

/// Fill color for a location
pub fn fill_for(partition: &Partition, location: Location) -> &'static str {
    match location {
        Location::Pool => POOL_COLOR,
        Location::Group(index) => partition.group(index).map_or(POOL_COLOR, |g| g.color),
    }
}

/// Style of every unit, in catalog order
pub fn unit_styles<'a>(
    catalog: &'a UnitCatalog,
    partition: &Partition,
    selection: &Selection,
) -> Vec<UnitStyle<'a>> {
    catalog
        .iter()
        .map(|unit| {
            let location = partition.location_of(&unit.id).unwrap_or(Location::Pool);
            UnitStyle {
                id: unit.id.as_str(),
                fill: fill_for(partition, location),
                selected: selection.contains(&unit.id),
                highlighted: unit.highlighted,
            }
        })
        .collect()
}
