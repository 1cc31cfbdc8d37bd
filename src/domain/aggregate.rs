//! Per-division statistics derived from the partition and the attribute table

use std::collections::HashMap;

use super::partition::{Location, Partition};

/// Attribute holding a unit's area
pub const AREA: &str = "area";
/// Attribute holding a unit's total population
pub const POPULATION: &str = "population_total";
/// `group_index` used by the all-divisions totals row
pub const TOTAL_INDEX: usize = 0;

/// Numeric attributes keyed by unit code
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttributeTable {
    rows: HashMap<String, HashMap<String, f64>>,
}

impl AttributeTable {
    /// Value of `attribute` for `code`, if both exist
    pub fn get(&self, code: &str, attribute: &str) -> Option<f64> {
        self.rows.get(code)?.get(attribute).copied()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.rows.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<K, A> FromIterator<(K, A)> for AttributeTable
where
    K: Into<String>,
    A: IntoIterator<Item = (String, f64)>,
{
    fn from_iter<T: IntoIterator<Item = (K, A)>>(iter: T) -> Self {
        Self {
            rows: iter
                .into_iter()
                .map(|(code, attrs)| (code.into(), attrs.into_iter().collect()))
                .collect(),
        }
    }
}

/// Statistics of one division (or of all divisions, see [`TOTAL_INDEX`])
#[derive(Clone, Debug, PartialEq)]
pub struct AggregateRow {
    pub group_index: usize,
    pub count: usize,
    pub area_total: f64,
    pub population_total: f64,
    /// Inhabitants per area unit, 0.0 when either total is zero
    pub density: f64,
}

/// Result of aggregating a division
#[derive(Clone, Debug, PartialEq)]
pub enum Aggregate {
    /// The attribute table has not been loaded; only the count is known
    Unavailable { group_index: usize, count: usize },
    Ready(AggregateRow),
}

impl Aggregate {
    pub fn group_index(&self) -> usize {
        match self {
            Aggregate::Unavailable { group_index, .. } => *group_index,
            Aggregate::Ready(row) => row.group_index,
        }
    }

    pub fn count(&self) -> usize {
        match self {
            Aggregate::Unavailable { count, .. } => *count,
            Aggregate::Ready(row) => row.count,
        }
    }

    pub fn row(&self) -> Option<&AggregateRow> {
        match self {
            Aggregate::Ready(row) => Some(row),
            Aggregate::Unavailable { .. } => None,
        }
    }
}

/// Computes aggregates against an optional attribute table
#[derive(Clone, Copy, Debug)]
pub struct Aggregator<'a> {
    attributes: Option<&'a AttributeTable>,
}

impl<'a> Aggregator<'a> {
    pub fn new(attributes: Option<&'a AttributeTable>) -> Self {
        Self { attributes }
    }

    /// Whether the attribute table is available
    pub fn is_ready(&self) -> bool {
        self.attributes.is_some()
    }

    /// Aggregate one division, `None` if the index does not exist
    pub fn compute_row(&self, partition: &Partition, group_index: usize) -> Option<Aggregate> {
        partition.group(group_index)?;
        let members = partition.members_of(Location::Group(group_index));
        Some(self.aggregate(group_index, members.iter().map(String::as_str)))
    }

    /// Aggregate every division, in index order
    pub fn compute_all(&self, partition: &Partition) -> Vec<Aggregate> {
        partition
            .groups()
            .iter()
            .map(|g| self.aggregate(g.index, g.members.iter().map(String::as_str)))
            .collect()
    }

    /// Aggregate the union of all divisions (pool excluded)
    pub fn totals(&self, partition: &Partition) -> Aggregate {
        let members = partition
            .groups()
            .iter()
            .flat_map(|g| g.members.iter().map(String::as_str));
        self.aggregate(TOTAL_INDEX, members)
    }

    fn aggregate<'m, I>(&self, group_index: usize, members: I) -> Aggregate
    where
        I: Iterator<Item = &'m str>,
    {
        let Some(table) = self.attributes else {
            return Aggregate::Unavailable {
                group_index,
                count: members.count(),
            };
        };

        let mut count = 0;
        let mut area_total = 0.0;
        let mut population_total = 0.0;
        for code in members {
            count += 1;
            // Units without data are skipped, not zero-filled
            if let Some(area) = table.get(code, AREA) {
                area_total += area;
            }
            if let Some(population) = table.get(code, POPULATION) {
                population_total += population;
            }
        }

        Aggregate::Ready(AggregateRow {
            group_index,
            count,
            area_total,
            population_total,
            density: density(population_total, area_total),
        })
    }
}

/// Population over area, 0.0 unless both are positive
pub fn density(population: f64, area: f64) -> f64 {
    if population > 0.0 && area > 0.0 {
        population / area
    } else {
        0.0
    }
}

/// Render a quantity rounded to an integer with grouped thousands
pub fn format_count(n: f64, separator: char) -> String {
    let rounded = n.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(c);
    }
    out
}

/// Render a density with one decimal place
pub fn format_density(density: f64) -> String {
    format!("{:.1}", density)
}
