//! Partition store: assignment of every unit to the pool or one group
//!
//! The store is the single source of truth for membership. Every unit of the
//! catalog lives in exactly one location at all times; the only mutating
//! transitions are [`Partition::resize`], [`Partition::move_unit`],
//! [`Partition::move_batch`] and [`Partition::reset`].

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use super::catalog::UnitCatalog;

/// Smallest allowed number of groups
pub const MIN_DIVISIONS: usize = 1;
/// Largest allowed number of groups
pub const MAX_DIVISIONS: usize = 12;
/// Group count of a fresh or reset partition
pub const DEFAULT_DIVISIONS: usize = 3;

/// Fill color used for units still in the pool
pub const POOL_COLOR: &str = "#d9d9d9";

/// Group colors, indexed by `(index - 1) % PALETTE.len()`
pub const PALETTE: [&str; 12] = [
    "#e41a1c", "#377eb8", "#4daf4a", "#984ea3", "#ff7f00", "#ffff33", "#a65628", "#f781bf",
    "#66c2a5", "#8da0cb", "#e78ac3", "#a6d854",
];

/// Palette color for a 1-based group index
pub fn palette_color(index: usize) -> &'static str {
    PALETTE[(index.max(1) - 1) % PALETTE.len()]
}

/// Default display name for a 1-based group index
pub fn default_group_name(index: usize) -> String {
    format!("Division {}", index)
}

/// Where a unit currently lives
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Location {
    /// Unassigned
    Pool,
    /// Member of the group with this 1-based index
    Group(usize),
}

/// Errors raised by group metadata edits
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PartitionError {
    #[error("there is no division {index} (current count is {count})")]
    NoSuchGroup { index: usize, count: usize },
}

/// A named, colored group of units
#[derive(Clone, Debug, PartialEq)]
pub struct Group {
    /// 1-based index
    pub index: usize,
    pub color: &'static str,
    pub name: String,
    /// Member unit ids in insertion order
    pub members: Vec<String>,
}

impl Group {
    fn fresh(index: usize) -> Self {
        Self {
            index,
            color: palette_color(index),
            name: default_group_name(index),
            members: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn has_default_name(&self) -> bool {
        self.name == default_group_name(self.index)
    }
}

/// The complete assignment of catalog units to pool and groups
#[derive(Clone, Debug)]
pub struct Partition {
    groups: Vec<Group>,
    /// Unassigned units, sorted by case-insensitive name then id
    pool: Vec<String>,
    locations: HashMap<String, Location>,
    sort_keys: HashMap<String, String>,
}

impl Partition {
    /// Create a partition with `k` empty groups and every unit in the pool
    pub fn new(catalog: &UnitCatalog, k: usize) -> Self {
        debug_assert!((MIN_DIVISIONS..=MAX_DIVISIONS).contains(&k));

        let sort_keys: HashMap<String, String> = catalog
            .iter()
            .map(|u| (u.id.clone(), u.name.to_lowercase()))
            .collect();
        let locations = catalog
            .ids()
            .map(|id| (id.to_string(), Location::Pool))
            .collect();
        let mut pool: Vec<String> = catalog.ids().map(str::to_string).collect();
        pool.sort_by(|a, b| compare_pool_order(&sort_keys, a, b));

        Self {
            groups: (1..=k).map(Group::fresh).collect(),
            pool,
            locations,
            sort_keys,
        }
    }

    /// Current number of groups
    pub fn k(&self) -> usize {
        self.groups.len()
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Group by 1-based index
    pub fn group(&self, index: usize) -> Option<&Group> {
        index.checked_sub(1).and_then(|i| self.groups.get(i))
    }

    /// Unassigned units in display order
    pub fn pool(&self) -> &[String] {
        &self.pool
    }

    /// Members of a location, in display order
    pub fn members_of(&self, location: Location) -> &[String] {
        match location {
            Location::Pool => &self.pool,
            Location::Group(index) => self.group(index).map_or(&[], |g| g.members.as_slice()),
        }
    }

    /// Location of a unit, `None` for ids outside the catalog
    pub fn location_of(&self, id: &str) -> Option<Location> {
        self.locations.get(id).copied()
    }

    /// Number of units assigned to any group
    pub fn assigned_count(&self) -> usize {
        self.groups.iter().map(Group::len).sum()
    }

    pub fn unit_count(&self) -> usize {
        self.locations.len()
    }

    /// Change the number of groups
    ///
    /// Groups above `new_k` are dissolved into the pool; surviving groups keep
    /// their members, color and name; new groups start empty with defaults.
    pub fn resize(&mut self, new_k: usize) {
        debug_assert!((MIN_DIVISIONS..=MAX_DIVISIONS).contains(&new_k));

        let old_k = self.k();
        if new_k < old_k {
            let dissolved: Vec<Group> = self.groups.drain(new_k..).collect();
            for group in dissolved {
                for id in group.members {
                    self.insert_into_pool(id);
                }
            }
        } else {
            self.groups.extend((old_k + 1..=new_k).map(Group::fresh));
        }

        log::debug!("Resized partition from {} to {} divisions", old_k, new_k);
        debug_assert!(self.is_consistent());
    }

    /// Empty every group into the pool and rebuild `k` fresh groups
    pub fn reset(&mut self, k: usize) {
        debug_assert!((MIN_DIVISIONS..=MAX_DIVISIONS).contains(&k));

        let groups = std::mem::take(&mut self.groups);
        for group in groups {
            for id in group.members {
                self.insert_into_pool(id);
            }
        }
        self.groups = (1..=k).map(Group::fresh).collect();
        debug_assert!(self.is_consistent());
    }

    /// Move one unit to `destination`
    ///
    /// Returns whether the unit changed location. Moving a unit to where it
    /// already is leaves it untouched, including its position in the list.
    pub fn move_unit(&mut self, id: &str, destination: Location) -> bool {
        let changed = self.move_one(id, destination);
        debug_assert!(self.is_consistent());
        changed
    }

    /// Move several units to `destination` as a single operation
    ///
    /// Returns how many units changed location.
    pub fn move_batch<'a, I>(&mut self, ids: I, destination: Location) -> usize
    where
        I: IntoIterator<Item = &'a str>,
    {
        let moved = ids
            .into_iter()
            .filter(|id| self.move_one(id, destination))
            .count();
        debug_assert!(self.is_consistent());
        moved
    }

    /// Set a group's display name; a blank name restores the default
    pub fn rename_group(&mut self, index: usize, name: &str) -> Result<(), PartitionError> {
        let count = self.k();
        let group = index
            .checked_sub(1)
            .and_then(|i| self.groups.get_mut(i))
            .ok_or(PartitionError::NoSuchGroup { index, count })?;
        let name = name.trim();
        group.name = if name.is_empty() {
            default_group_name(index)
        } else {
            name.to_string()
        };
        Ok(())
    }

    /// Whether every catalog unit appears in exactly one location
    pub fn check_invariant(&self, catalog: &UnitCatalog) -> bool {
        self.is_consistent()
            && self.locations.len() == catalog.len()
            && catalog.ids().all(|id| self.locations.contains_key(id))
    }

    /// Internal bookkeeping check: lists and location index agree, no duplicates
    pub fn is_consistent(&self) -> bool {
        let mut seen: HashSet<&str> = HashSet::with_capacity(self.locations.len());
        let listed = self
            .pool
            .iter()
            .map(|id| (id, Location::Pool))
            .chain(self.groups.iter().flat_map(|g| {
                g.members
                    .iter()
                    .map(move |id| (id, Location::Group(g.index)))
            }));
        for (id, location) in listed {
            if !seen.insert(id.as_str()) || self.locations.get(id) != Some(&location) {
                return false;
            }
        }
        seen.len() == self.locations.len()
    }

    fn move_one(&mut self, id: &str, destination: Location) -> bool {
        let Some(current) = self.location_of(id) else {
            debug_assert!(false, "unit {} is not in the catalog", id);
            return false;
        };
        if let Location::Group(index) = destination {
            if self.group(index).is_none() {
                debug_assert!(false, "division {} does not exist", index);
                return false;
            }
        }
        if current == destination {
            return false;
        }

        let owned = match current {
            Location::Pool => self.pool.iter().position(|p| p == id).map(|i| self.pool.remove(i)),
            Location::Group(index) => {
                let members = &mut self.groups[index - 1].members;
                members.iter().position(|m| m == id).map(|i| members.remove(i))
            }
        };
        let Some(owned) = owned else {
            return false;
        };

        match destination {
            Location::Pool => self.insert_into_pool(owned),
            Location::Group(index) => {
                self.locations.insert(owned.clone(), destination);
                self.groups[index - 1].members.push(owned);
            }
        }
        true
    }

    fn insert_into_pool(&mut self, id: String) {
        let at = self
            .pool
            .binary_search_by(|probe| compare_pool_order(&self.sort_keys, probe, &id))
            .unwrap_or_else(|i| i);
        self.locations.insert(id.clone(), Location::Pool);
        self.pool.insert(at, id);
    }
}

fn compare_pool_order(keys: &HashMap<String, String>, a: &str, b: &str) -> Ordering {
    let key_a = keys.get(a).map_or(a, String::as_str);
    let key_b = keys.get(b).map_or(b, String::as_str);
    key_a.cmp(key_b).then_with(|| a.cmp(b))
}
