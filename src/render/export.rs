//! CSV export of the statistics table

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::table::StatsTable;

/// Timestamped file name for an export, e.g. `comarca-20240131-154502.csv`
pub fn default_file_name() -> String {
    chrono::Local::now()
        .format("comarca-%Y%m%d-%H%M%S.csv")
        .to_string()
}

/// Write the table as CSV: a header of column names, then one record per row
pub fn write_csv<W: io::Write>(table: &StatsTable, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);

    let mut header = vec![String::new()];
    header.extend(table.columns.iter().cloned());
    csv.write_record(&header)?;

    for (label, cells) in &table.rows {
        csv.write_record(std::iter::once(*label).chain(cells.iter().map(String::as_str)))?;
    }
    csv.flush()?;
    Ok(())
}

/// Export to `target`, or to a timestamped file in `dir` when `target` is None
///
/// The file is written next to its destination and moved into place, so a
/// failed export never leaves a truncated file behind.
pub fn export_table(table: &StatsTable, target: Option<&Path>, dir: &Path) -> Result<PathBuf> {
    let path = match target {
        Some(path) => path.to_path_buf(),
        None => dir.join(default_file_name()),
    };
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent)
        .with_context(|| format!("Failed to create {}", parent.display()))?;

    let mut file = tempfile::Builder::new()
        .prefix("comarca-")
        .suffix(".csv")
        .tempfile_in(parent)
        .with_context(|| format!("Failed to create temporary file in {}", parent.display()))?;
    write_csv(table, &mut file)?;
    file.persist(&path)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    log::info!("Exported statistics to {}", path.display());
    Ok(path)
}
