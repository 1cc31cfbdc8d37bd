//! Comparative statistics table and partition listing

use std::fmt::Write as _;

use crate::domain::{
    Aggregate, Aggregator, Location, Partition, Selection, UnitCatalog, format_count,
    format_density,
};

/// Cell text used when the attribute table is not loaded
pub const UNAVAILABLE: &str = "n/a";

/// Row labels, in display order
pub const ROW_LABELS: [&str; 4] = ["Units", "Area (km²)", "Population", "Density (inh/km²)"];

/// Statistics of every division plus a totals column, already formatted
#[derive(Clone, Debug, PartialEq)]
pub struct StatsTable {
    /// Division names followed by "Total"
    pub columns: Vec<String>,
    /// One entry per [`ROW_LABELS`] label, one cell per column
    pub rows: Vec<(&'static str, Vec<String>)>,
    /// False when only unit counts are known
    pub available: bool,
}

impl StatsTable {
    /// Aggregate the partition into display cells
    pub fn build(partition: &Partition, aggregator: &Aggregator, separator: char) -> Self {
        let mut aggregates = aggregator.compute_all(partition);
        aggregates.push(aggregator.totals(partition));

        let mut columns: Vec<String> = partition.groups().iter().map(|g| g.name.clone()).collect();
        columns.push("Total".to_string());

        let mut rows: Vec<(&'static str, Vec<String>)> =
            ROW_LABELS.iter().map(|label| (*label, Vec::new())).collect();
        for aggregate in &aggregates {
            let cells = cells_for(aggregate, separator);
            for (row, cell) in rows.iter_mut().zip(cells) {
                row.1.push(cell);
            }
        }

        Self {
            columns,
            rows,
            available: aggregator.is_ready(),
        }
    }

    /// Render as aligned plain text
    pub fn to_text(&self) -> String {
        let label_width = ROW_LABELS.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, name)| {
                self.rows
                    .iter()
                    .filter_map(|(_, cells)| cells.get(i))
                    .map(|c| c.chars().count())
                    .chain(std::iter::once(name.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut out = String::new();
        let _ = write!(out, "{:<label_width$}", "");
        for (name, width) in self.columns.iter().zip(&widths) {
            let _ = write!(out, "  {}", pad_left(name, *width));
        }
        out.push('\n');
        for (label, cells) in &self.rows {
            let _ = write!(out, "{}", pad_right(label, label_width));
            for (cell, width) in cells.iter().zip(&widths) {
                let _ = write!(out, "  {}", pad_left(cell, *width));
            }
            out.push('\n');
        }
        if !self.available {
            out.push_str("(data not yet available)\n");
        }
        out
    }
}

fn cells_for(aggregate: &Aggregate, separator: char) -> [String; 4] {
    let count = format_count(aggregate.count() as f64, separator);
    match aggregate.row() {
        Some(row) => [
            count,
            format_count(row.area_total, separator),
            format_count(row.population_total, separator),
            format_density(row.density),
        ],
        None => [
            count,
            UNAVAILABLE.to_string(),
            UNAVAILABLE.to_string(),
            UNAVAILABLE.to_string(),
        ],
    }
}

// Width counted in chars so accented names and "²" line up
fn pad_left(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{}{}", " ".repeat(width.saturating_sub(len)), text)
}

fn pad_right(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{}{}", text, " ".repeat(width.saturating_sub(len)))
}

/// Pool and divisions as text, selected units first in each list
///
/// Markers: `*` selected, `+` highlighted.
pub fn partition_listing(
    catalog: &UnitCatalog,
    partition: &Partition,
    selection: &Selection,
) -> String {
    let mut out = String::new();
    let section = |out: &mut String, title: String, location: Location| {
        let members = partition.members_of(location);
        let _ = writeln!(out, "{} ({})", title, members.len());
        for id in selection.front_ordered(members) {
            let selected = if selection.contains(id) { '*' } else { ' ' };
            let highlighted = match catalog.get(id) {
                Some(unit) if unit.highlighted => '+',
                _ => ' ',
            };
            let _ = writeln!(
                out,
                "  {}{} {:<8} {}",
                selected,
                highlighted,
                id,
                catalog.name_of(id)
            );
        }
    };

    section(&mut out, "Pool".to_string(), Location::Pool);
    for group in partition.groups() {
        section(
            &mut out,
            format!("[{}] {} {}", group.index, group.name, group.color),
            Location::Group(group.index),
        );
    }
    if !selection.is_empty() {
        let _ = writeln!(out, "{} selected", selection.len());
    }
    out
}
