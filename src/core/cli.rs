//! Command-line arguments

use std::path::PathBuf;

use clap::Parser;

use crate::config::ComarcaConfig;

/// Split a set of geographic units into named divisions and compare them
#[derive(Debug, Default, Parser)]
#[command(name = "comarca", version, about)]
pub struct Args {
    /// Config file (default: <config dir>/comarca/config.json)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// GeoJSON file with the unit boundaries
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// JSON file with per-unit attributes
    #[arg(long)]
    pub attributes: Option<PathBuf>,

    /// JSON file with predefined partitions
    #[arg(long)]
    pub regions: Option<PathBuf>,

    /// Directory for CSV exports
    #[arg(long)]
    pub export_dir: Option<PathBuf>,

    /// Write the effective configuration back to the config file
    #[arg(long)]
    pub save_config: bool,
}

impl Args {
    /// Override the configured paths with the ones given on the command line
    pub fn apply(&self, mut config: ComarcaConfig) -> ComarcaConfig {
        if let Some(path) = &self.catalog {
            config.catalog_path = path.clone();
        }
        if let Some(path) = &self.attributes {
            config.attributes_path = Some(path.clone());
        }
        if let Some(path) = &self.regions {
            config.regions_path = Some(path.clone());
        }
        if let Some(path) = &self.export_dir {
            config.export_dir = Some(path.clone());
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_apply_overrides() {
        let args = Args::try_parse_from([
            "comarca",
            "--catalog",
            "mapa.geojson",
            "--regions",
            "secciones.json",
        ])
        .unwrap();
        let config = args.apply(ComarcaConfig::default());
        assert_eq!(config.catalog_path, PathBuf::from("mapa.geojson"));
        assert_eq!(config.regions_path, Some(PathBuf::from("secciones.json")));
        assert_eq!(
            config.attributes_path,
            ComarcaConfig::default().attributes_path
        );
        assert!(!args.save_config);
    }

    #[test]
    fn test_no_arguments_keep_config() {
        let args = Args::try_parse_from(["comarca"]).unwrap();
        assert_eq!(
            args.apply(ComarcaConfig::default()),
            ComarcaConfig::default()
        );
    }
}
