use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::config::ComarcaConfig;
use crate::core::cli::Args;
use crate::data::{self, Datasets};
use crate::domain::{Aggregate, Location, format_count};
use crate::render::export::export_table;
use crate::render::style::unit_styles;
use crate::render::table::{StatsTable, partition_listing};
use crate::session::commands::{self, Command};
use crate::session::handlers;
use crate::session::state::{Outcome, Session};

pub(crate) fn run() -> Result<()> {
    let args = Args::parse();
    let config = args.apply(ComarcaConfig::load(args.config.as_deref()));
    if args.save_config {
        config.save(args.config.as_deref());
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start runtime")?;
    let datasets = runtime.block_on(data::load_all(&config))?;

    let mut app = App::new(config, datasets, runtime);
    println!(
        "{} units loaded, {} divisions. Type \"help\" for commands.",
        app.session.catalog.len(),
        app.session.partition.k()
    );
    app.run_loop(io::stdin().lock(), io::stdout().lock())
}

/// Whether the loop should keep reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub struct App {
    pub config: ComarcaConfig,
    pub session: Session,
    /// Used for blocking file work off the input loop
    runtime: tokio::runtime::Runtime,
}

impl App {
    pub fn new(config: ComarcaConfig, datasets: Datasets, runtime: tokio::runtime::Runtime) -> Self {
        let session = Session::new(datasets, config.default_divisions);
        Self {
            config,
            session,
            runtime,
        }
    }

    /// Read commands until end of input or `quit`
    pub fn run_loop<R: BufRead, W: Write>(&mut self, input: R, mut out: W) -> Result<()> {
        for line in input.lines() {
            let line = line.context("Failed to read input")?;
            if self.execute(&line, &mut out)? == Flow::Quit {
                break;
            }
            out.flush()?;
        }
        Ok(())
    }

    /// Run one input line; user errors are printed, only output failures propagate
    fn execute<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Flow> {
        let command = match commands::parse_command(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Ok(Flow::Continue),
            Err(err) => {
                writeln!(out, "error: {}", err)?;
                return Ok(Flow::Continue);
            }
        };

        match command {
            Command::Msg(msg) => match handlers::update(&mut self.session, msg) {
                Ok(outcome) => {
                    writeln!(out, "{}", self.describe(&outcome))?;
                    if outcome.changes_partition() {
                        writeln!(out, "{}", self.status_line())?;
                    }
                }
                Err(err) => writeln!(out, "error: {}", err)?,
            },
            Command::Show => {
                let session = &self.session;
                write!(
                    out,
                    "{}",
                    partition_listing(&session.catalog, &session.partition, &session.selection)
                )?;
            }
            Command::Map => {
                let session = &self.session;
                for style in unit_styles(&session.catalog, &session.partition, &session.selection) {
                    writeln!(
                        out,
                        "{:<8} {} {}{}",
                        style.id,
                        style.fill,
                        if style.selected { "selected " } else { "" },
                        if style.highlighted { "highlighted" } else { "" }
                    )?;
                }
            }
            Command::Table => write!(out, "{}", self.stats().to_text())?,
            Command::Presets => match &self.session.regions {
                Some(regions) => {
                    for (name, count) in regions.region_types() {
                        writeln!(out, "{} ({} regions)", name, count)?;
                    }
                }
                None => writeln!(out, "No predefined partitions loaded")?,
            },
            Command::Export(target) => match self.export(target) {
                Ok(path) => writeln!(out, "Exported to {}", path.display())?,
                Err(err) => {
                    log::error!("Export failed: {:?}", err);
                    writeln!(out, "error: {:#}", err)?;
                }
            },
            Command::Help => writeln!(out, "{}", commands::HELP)?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn stats(&self) -> StatsTable {
        StatsTable::build(
            &self.session.partition,
            &self.session.aggregator(),
            self.config.thousands_separator,
        )
    }

    fn export(&self, target: Option<PathBuf>) -> Result<PathBuf> {
        let table = self.stats();
        let dir = self.config.export_dir();
        self.runtime
            .block_on(
                self.runtime
                    .spawn_blocking(move || export_table(&table, target.as_deref(), &dir)),
            )
            .context("Export task panicked")?
    }

    fn describe(&self, outcome: &Outcome) -> String {
        match outcome {
            Outcome::Resized { from, to } => format!("Divisions: {} -> {}", from, to),
            Outcome::Moved {
                count,
                destination,
                batch,
            } => {
                let target = match destination {
                    Location::Pool => "the pool".to_string(),
                    Location::Group(index) => self
                        .session
                        .partition
                        .group(*index)
                        .map_or_else(|| format!("division {}", index), |g| g.name.clone()),
                };
                let mut text = match (*count, *batch) {
                    (0, _) => format!("Already in {}", target),
                    (1, false) => format!("Moved to {}", target),
                    _ => format!("Moved {} units to {}", count, target),
                };
                if let Location::Group(index) = destination {
                    let aggregate = self
                        .session
                        .aggregator()
                        .compute_row(&self.session.partition, *index);
                    if let Some(Aggregate::Ready(row)) = aggregate {
                        text.push_str(&format!(
                            " (now {} inhabitants)",
                            format_count(row.population_total, self.config.thousands_separator)
                        ));
                    }
                }
                text
            }
            Outcome::Selected { count: 0 } => "No units inside the lasso".to_string(),
            Outcome::Selected { count } => format!("{} units selected", count),
            Outcome::Picked { id, selected } => format!(
                "{} {} ({} selected)",
                self.session.catalog.name_of(id),
                if *selected { "selected" } else { "deselected" },
                self.session.selection.len()
            ),
            Outcome::SelectionCleared => "Selection cleared".to_string(),
            Outcome::Renamed { index } => match self.session.partition.group(*index) {
                Some(group) if group.has_default_name() => {
                    format!("Division {} uses its default name again", index)
                }
                Some(group) => format!("Division {} is now {:?}", index, group.name),
                None => format!("Division {} renamed", index),
            },
            Outcome::Reset { divisions } => {
                format!("All units back in the pool, {} divisions", divisions)
            }
            Outcome::PresetLoaded {
                region_type,
                divisions,
                assigned,
                skipped,
            } => {
                let mut text = format!(
                    "Loaded {:?}: {} divisions, {} units assigned",
                    region_type, divisions, assigned
                );
                if *skipped > 0 {
                    text.push_str(&format!(", {} unknown codes skipped", skipped));
                }
                text
            }
        }
    }

    /// One-line summary of where units are, printed after each partition change
    fn status_line(&self) -> String {
        let partition = &self.session.partition;
        let mut parts = vec![format!("pool {}", partition.pool().len())];
        parts.extend(
            partition
                .groups()
                .iter()
                .map(|g| format!("{} {}", g.name, g.len())),
        );
        format!(
            "{} ({}/{} assigned)",
            parts.join(" | "),
            partition.assigned_count(),
            partition.unit_count()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Extent, Point, Unit, UnitCatalog};

    fn app(export_dir: PathBuf) -> App {
        let catalog = UnitCatalog::new(vec![
            Unit::new("A", "Azul", Extent::at(Point::new(1.0, 1.0))),
            Unit::new("B", "Bolívar", Extent::at(Point::new(2.0, 2.0))),
            Unit::new("C", "Castelli", Extent::at(Point::new(50.0, 50.0))),
        ]);
        let config = ComarcaConfig {
            default_divisions: 2,
            export_dir: Some(export_dir),
            ..ComarcaConfig::default()
        };
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        App::new(
            config,
            Datasets {
                catalog,
                attributes: None,
                regions: None,
            },
            runtime,
        )
    }

    fn script(app: &mut App, input: &str) -> String {
        let mut out = Vec::new();
        app.run_loop(input.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_script_moves_selection() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path().to_path_buf());
        let out = script(
            &mut app,
            "lasso 0,0 3,0 3,3\nmove A 2\nrename 2 Norte\nshow\n",
        );
        assert!(out.contains("2 units selected"));
        assert!(out.contains("Moved 2 units to Division 2"));
        assert!(out.contains("pool 1 | Division 1 0 | Division 2 2 (2/3 assigned)"));
        assert!(out.contains("[2] Norte"));
        assert_eq!(
            app.session.partition.location_of("B"),
            Some(Location::Group(2))
        );
        assert!(app.session.selection.is_empty());
    }

    #[test]
    fn test_errors_are_reported_and_loop_continues() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path().to_path_buf());
        let out = script(&mut app, "divisions 20\nfly\npreset Secciones\nmove C 1\n");
        assert!(out.contains("error: division count must be between 1 and 12, got 20"));
        assert!(out.contains("error: unknown command \"fly\""));
        assert!(out.contains("error: predefined regions are not available"));
        assert!(out.contains("Moved to Division 1"));
    }

    #[test]
    fn test_quit_stops_reading() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path().to_path_buf());
        script(&mut app, "quit\nmove A 1\n");
        assert_eq!(app.session.partition.location_of("A"), Some(Location::Pool));
    }

    #[test]
    fn test_table_and_export_without_attributes() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path().to_path_buf());
        let out = script(&mut app, "move A 1\ntable\nexport\n");
        assert!(out.contains("data not yet available"));
        assert!(out.contains("Exported to"));

        let exported: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect();
        assert_eq!(exported.len(), 1);
        let csv = std::fs::read_to_string(&exported[0]).unwrap();
        assert!(csv.starts_with(",Division 1,Division 2,Total\n"));
        assert!(csv.contains("Units,1,0,1\n"));
    }
}
