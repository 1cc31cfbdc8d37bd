use crate::data::Datasets;
use crate::data::regions::RegionTable;
use crate::domain::{
    Aggregator, AttributeTable, Location, MAX_DIVISIONS, MIN_DIVISIONS, Partition,
    PartitionError, Point, Selection, SelectionError, UnitCatalog,
};

/// User input the session refuses; state is left unchanged
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error(
        "division count must be between {min} and {max}, got {requested}",
        min = MIN_DIVISIONS,
        max = MAX_DIVISIONS
    )]
    DivisionCountOutOfRange { requested: usize },
    #[error("unknown unit {0:?}")]
    UnknownUnit(String),
    #[error(transparent)]
    Partition(#[from] PartitionError),
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error("predefined regions are not available")]
    RegionsUnavailable,
    #[error("unknown region type {0:?}")]
    UnknownRegionType(String),
}

/// What a handled message did, for the shell to report and re-render
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Resized { from: usize, to: usize },
    /// `count` units changed location; `batch` when a selection was dragged
    Moved {
        count: usize,
        destination: Location,
        batch: bool,
    },
    /// A lasso finished; zero means nothing qualified
    Selected { count: usize },
    Picked { id: String, selected: bool },
    SelectionCleared,
    Renamed { index: usize },
    Reset { divisions: usize },
    PresetLoaded {
        region_type: String,
        divisions: usize,
        assigned: usize,
        skipped: usize,
    },
}

impl Outcome {
    /// Whether the partition changed, so statistics must be recomputed
    pub fn changes_partition(&self) -> bool {
        match self {
            Outcome::Moved { count, .. } => *count > 0,
            Outcome::Resized { .. }
            | Outcome::Renamed { .. }
            | Outcome::Reset { .. }
            | Outcome::PresetLoaded { .. } => true,
            Outcome::Selected { .. } | Outcome::Picked { .. } | Outcome::SelectionCleared => {
                false
            }
        }
    }
}

/// Single owner of the engine state for one editing session
#[derive(Debug, Clone)]
pub struct Session {
    pub catalog: UnitCatalog,
    pub attributes: Option<AttributeTable>,
    pub regions: Option<RegionTable>,
    pub partition: Partition,
    pub selection: Selection,
    /// Division count restored by reset
    pub default_divisions: usize,
}

impl Session {
    pub fn new(datasets: Datasets, default_divisions: usize) -> Self {
        let Datasets {
            catalog,
            attributes,
            regions,
        } = datasets;
        let default_divisions = default_divisions.clamp(MIN_DIVISIONS, MAX_DIVISIONS);
        let partition = Partition::new(&catalog, default_divisions);
        Self {
            catalog,
            attributes,
            regions,
            partition,
            selection: Selection::new(),
            default_divisions,
        }
    }

    /// Statistics over the current partition
    pub fn aggregator(&self) -> Aggregator<'_> {
        Aggregator::new(self.attributes.as_ref())
    }

    /// Change the number of divisions
    pub fn resize(&mut self, divisions: usize) -> Result<Outcome, InputError> {
        check_division_count(divisions)?;
        let from = self.partition.k();
        self.partition.resize(divisions);
        log::info!("Divisions: {} -> {}", from, divisions);
        Ok(Outcome::Resized {
            from,
            to: divisions,
        })
    }

    /// Drop a unit on a location
    ///
    /// If the unit is part of the selection the whole selection moves and the
    /// selection is cleared afterwards.
    pub fn drop_unit(&mut self, id: &str, destination: Location) -> Result<Outcome, InputError> {
        self.check_unit(id)?;
        self.check_location(destination)?;

        if self.selection.contains(id) {
            let count = self
                .partition
                .move_batch(self.selection.iter(), destination);
            log::debug!("Moved {} selected units to {:?}", count, destination);
            self.selection.clear();
            return Ok(Outcome::Moved {
                count,
                destination,
                batch: true,
            });
        }

        let count = usize::from(self.partition.move_unit(id, destination));
        Ok(Outcome::Moved {
            count,
            destination,
            batch: false,
        })
    }

    /// Replace the selection with a lasso
    pub fn select_lasso(&mut self, boundary: &[Point]) -> Result<Outcome, InputError> {
        let count = self.selection.select_by_polygon(boundary, &self.catalog)?;
        if count == 0 {
            log::info!("Lasso selected no units");
        }
        Ok(Outcome::Selected { count })
    }

    /// Add a unit to, or remove it from, the selection
    pub fn pick(&mut self, id: &str) -> Result<Outcome, InputError> {
        self.check_unit(id)?;
        let selected = self.selection.toggle(id);
        Ok(Outcome::Picked {
            id: id.to_string(),
            selected,
        })
    }

    pub fn clear_selection(&mut self) -> Outcome {
        self.selection.clear();
        Outcome::SelectionCleared
    }

    pub fn rename(&mut self, index: usize, name: &str) -> Result<Outcome, InputError> {
        self.partition.rename_group(index, name)?;
        Ok(Outcome::Renamed { index })
    }

    /// Return every unit to the pool and restore the default division count
    pub fn reset(&mut self) -> Outcome {
        self.partition.reset(self.default_divisions);
        self.selection.clear();
        log::info!("Partition reset to {} divisions", self.default_divisions);
        Outcome::Reset {
            divisions: self.default_divisions,
        }
    }

    /// Replace the partition with a predefined one, one division per region
    ///
    /// Divisions are named after their regions, in region-name order. Listed
    /// codes missing from the catalog are skipped.
    pub fn load_region_preset(&mut self, region_type: &str) -> Result<Outcome, InputError> {
        let regions = self
            .regions
            .as_ref()
            .ok_or(InputError::RegionsUnavailable)?
            .get(region_type)
            .ok_or_else(|| InputError::UnknownRegionType(region_type.to_string()))?;
        check_division_count(regions.len())?;

        self.selection.clear();
        self.partition.reset(regions.len());

        let mut assigned = 0;
        let mut skipped = 0;
        for (i, (region_name, members)) in regions.iter().enumerate() {
            let index = i + 1;
            let known: Vec<&str> = members
                .iter()
                .filter(|m| {
                    let known = self.catalog.contains(&m.code);
                    if !known {
                        log::warn!(
                            "Region {:?} lists unknown unit {} ({}), skipping",
                            region_name,
                            m.code,
                            m.name
                        );
                    }
                    known
                })
                .map(|m| m.code.as_str())
                .collect();
            skipped += members.len() - known.len();
            assigned += self
                .partition
                .move_batch(known, Location::Group(index));
            self.partition.rename_group(index, region_name)?;
        }

        log::info!(
            "Loaded preset {:?}: {} divisions, {} units assigned",
            region_type,
            regions.len(),
            assigned
        );
        Ok(Outcome::PresetLoaded {
            region_type: region_type.to_string(),
            divisions: regions.len(),
            assigned,
            skipped,
        })
    }

    fn check_unit(&self, id: &str) -> Result<(), InputError> {
        if self.catalog.contains(id) {
            Ok(())
        } else {
            Err(InputError::UnknownUnit(id.to_string()))
        }
    }

    fn check_location(&self, location: Location) -> Result<(), InputError> {
        match location {
            Location::Group(index) if self.partition.group(index).is_none() => {
                Err(PartitionError::NoSuchGroup {
                    index,
                    count: self.partition.k(),
                }
                .into())
            }
            _ => Ok(()),
        }
    }
}

fn check_division_count(requested: usize) -> Result<(), InputError> {
    if (MIN_DIVISIONS..=MAX_DIVISIONS).contains(&requested) {
        Ok(())
    } else {
        Err(InputError::DivisionCountOutOfRange { requested })
    }
}
