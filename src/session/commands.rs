//! Text command adapter
//!
//! Translates one input line into either a session [`Msg`] or a request for
//! one of the shell's views. This stands in for the pointer front end: a
//! drag-end becomes `move`, a finished lasso becomes `lasso`, and so on.

use std::path::PathBuf;

use super::messages::Msg;
use crate::domain::{Location, Point};

/// A parsed input line
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Forward to the session
    Msg(Msg),
    /// Print the pool and every division
    Show,
    /// Print the fill and outlines of every unit
    Map,
    /// Print the statistics table
    Table,
    /// List predefined region types
    Presets,
    /// Write the statistics table as CSV
    Export(Option<PathBuf>),
    Help,
    Quit,
}

/// Lines that could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command {0:?} (try \"help\")")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("not a number: {0:?}")]
    BadNumber(String),
    #[error("not an x,y point: {0:?}")]
    BadPoint(String),
}

pub const HELP: &str = "\
commands:
  divisions <n>            set the number of divisions (1-12)
  move <code> <pool|n>     drop a unit on the pool or division n
                           (moves the whole selection if the unit is selected)
  pick <code>              add/remove a unit from the selection
  lasso x,y x,y x,y ...    select units inside the lasso's bounding box
  clear                    clear the selection
  rename <n> <name>        rename division n
  reset                    return every unit to the pool
  presets                  list predefined partitions
  preset <type>            load a predefined partition
  show                     print pool and divisions
  map                      print each unit's fill color and outlines
  table                    print statistics
  export [file]            write statistics as CSV
  help                     this text
  quit                     exit";

/// Parse one input line; blank lines and `#` comments give `None`
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_lowercase().as_str() {
        "divisions" | "k" => {
            let n = parse_number(single(rest, "divisions <n>")?)?;
            Command::Msg(Msg::resize(n))
        }
        "move" | "mv" => {
            let mut args = rest.split_whitespace();
            let (Some(unit), Some(target), None) = (args.next(), args.next(), args.next()) else {
                return Err(CommandError::Usage("move <code> <pool|n>"));
            };
            Command::Msg(Msg::drop_unit(unit, parse_location(target)?))
        }
        "pick" => Command::Msg(Msg::pick(single(rest, "pick <code>")?)),
        "lasso" => {
            if rest.is_empty() {
                return Err(CommandError::Usage("lasso x,y x,y x,y ..."));
            }
            let points = rest
                .split_whitespace()
                .map(parse_point)
                .collect::<Result<Vec<_>, _>>()?;
            Command::Msg(Msg::lasso(points))
        }
        "clear" => Command::Msg(Msg::clear_selection()),
        "rename" => {
            let Some((index, name)) = rest.split_once(char::is_whitespace) else {
                return Err(CommandError::Usage("rename <n> <name>"));
            };
            Command::Msg(Msg::rename(parse_number(index)?, name.trim()))
        }
        "reset" => Command::Msg(Msg::reset()),
        "preset" => {
            if rest.is_empty() {
                return Err(CommandError::Usage("preset <type>"));
            }
            Command::Msg(Msg::load_preset(rest))
        }
        "presets" => Command::Presets,
        "show" | "ls" => Command::Show,
        "map" => Command::Map,
        "table" => Command::Table,
        "export" => Command::Export((!rest.is_empty()).then(|| PathBuf::from(rest))),
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

fn single<'a>(rest: &'a str, usage: &'static str) -> Result<&'a str, CommandError> {
    let mut args = rest.split_whitespace();
    match (args.next(), args.next()) {
        (Some(arg), None) => Ok(arg),
        _ => Err(CommandError::Usage(usage)),
    }
}

fn parse_number(text: &str) -> Result<usize, CommandError> {
    text.parse()
        .map_err(|_| CommandError::BadNumber(text.to_string()))
}

fn parse_location(text: &str) -> Result<Location, CommandError> {
    if text.eq_ignore_ascii_case("pool") {
        Ok(Location::Pool)
    } else {
        parse_number(text).map(Location::Group)
    }
}

fn parse_point(text: &str) -> Result<Point, CommandError> {
    let bad = || CommandError::BadPoint(text.to_string());
    let (x, y) = text.split_once(',').ok_or_else(bad)?;
    let x: f64 = x.trim().parse().map_err(|_| bad())?;
    let y: f64 = y.trim().parse().map_err(|_| bad())?;
    Ok(Point::new(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Command {
        parse_command(line).unwrap().unwrap()
    }

    #[test]
    fn test_blank_and_comment_lines() {
        assert_eq!(parse_command("   "), Ok(None));
        assert_eq!(parse_command("# setup"), Ok(None));
    }

    #[test]
    fn test_partition_commands() {
        assert_eq!(parse("divisions 5"), Command::Msg(Msg::resize(5)));
        assert_eq!(
            parse("move 06007 pool"),
            Command::Msg(Msg::drop_unit("06007", Location::Pool))
        );
        assert_eq!(
            parse("MOVE 06007 2"),
            Command::Msg(Msg::drop_unit("06007", Location::Group(2)))
        );
        assert_eq!(
            parse("rename 2 Costa Atlántica"),
            Command::Msg(Msg::rename(2, "Costa Atlántica"))
        );
        assert_eq!(parse("reset"), Command::Msg(Msg::reset()));
        assert_eq!(
            parse("preset Secciones electorales"),
            Command::Msg(Msg::load_preset("Secciones electorales"))
        );
    }

    #[test]
    fn test_selection_commands() {
        assert_eq!(
            parse("lasso 0,0 10,0 10.5,-3"),
            Command::Msg(Msg::lasso(vec![
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(10.5, -3.0),
            ]))
        );
        assert_eq!(parse("pick 06014"), Command::Msg(Msg::pick("06014")));
        assert_eq!(parse("clear"), Command::Msg(Msg::clear_selection()));
    }

    #[test]
    fn test_view_commands() {
        assert_eq!(parse("show"), Command::Show);
        assert_eq!(parse("map"), Command::Map);
        assert_eq!(parse("table"), Command::Table);
        assert_eq!(parse("presets"), Command::Presets);
        assert_eq!(parse("export"), Command::Export(None));
        assert_eq!(
            parse("export out/summary.csv"),
            Command::Export(Some(PathBuf::from("out/summary.csv")))
        );
        assert_eq!(parse("quit"), Command::Quit);
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            parse_command("divisions"),
            Err(CommandError::Usage("divisions <n>"))
        );
        assert_eq!(
            parse_command("divisions many"),
            Err(CommandError::BadNumber("many".to_string()))
        );
        assert_eq!(
            parse_command("move 06007"),
            Err(CommandError::Usage("move <code> <pool|n>"))
        );
        assert_eq!(
            parse_command("lasso 1;2 3,4 5,6"),
            Err(CommandError::BadPoint("1;2".to_string()))
        );
        assert_eq!(
            parse_command("fly"),
            Err(CommandError::Unknown("fly".to_string()))
        );
    }

    #[test]
    fn test_short_lasso_is_left_to_the_session() {
        // Point count is validated by the selection, not the parser
        assert_eq!(
            parse("lasso 0,0 1,1"),
            Command::Msg(Msg::lasso(vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)]))
        );
    }
}
