//! Configuration persistence for comarca settings

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::{DEFAULT_DIVISIONS, MAX_DIVISIONS, MIN_DIVISIONS};

/// Rule deriving a unit's highlighted flag from one catalog property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightRule {
    /// Feature property to inspect
    pub property: String,
    /// Units whose property equals one of these values are highlighted
    pub values: Vec<String>,
}

impl HighlightRule {
    pub fn matches(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }
}

/// Application configuration persisted between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComarcaConfig {
    /// GeoJSON file with the unit boundaries
    pub catalog_path: PathBuf,
    /// JSON file with per-unit numeric attributes
    pub attributes_path: Option<PathBuf>,
    /// JSON file with predefined partitions
    pub regions_path: Option<PathBuf>,
    /// Feature property holding the unit code
    pub code_property: String,
    /// Feature property holding the display name
    pub name_property: String,
    /// Which units get the highlighted flag
    pub highlight: Option<HighlightRule>,
    /// Number of divisions of a fresh or reset partition (1-12)
    pub default_divisions: usize,
    /// Thousands separator used in the statistics table
    pub thousands_separator: char,
    /// Directory for CSV exports (None = documents folder)
    pub export_dir: Option<PathBuf>,
}

impl Default for ComarcaConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from("data/departamentos.geojson"),
            attributes_path: Some(PathBuf::from("data/atributos.json")),
            regions_path: Some(PathBuf::from("data/regiones.json")),
            // Field names used by the IGN department layer
            code_property: "in1".to_string(),
            name_property: "nam".to_string(),
            highlight: None,
            default_divisions: DEFAULT_DIVISIONS,
            thousands_separator: ',',
            export_dir: None,
        }
    }
}

impl ComarcaConfig {
    /// Directory name under the user config dir
    pub const ID: &'static str = "comarca";

    /// Default location of the config file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(Self::ID).join("config.json"))
    }

    /// Load configuration from disk, or return defaults if unavailable
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path.map(Path::to_path_buf).or_else(Self::default_path) else {
            log::warn!("No config directory available, using defaults");
            return Self::default();
        };
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::read(&path) {
            Ok(config) => config.validated(),
            Err(err) => {
                log::warn!("Error loading config, using defaults: {:?}", err);
                Self::default()
            }
        }
    }

    /// Save configuration to disk
    pub fn save(&self, path: Option<&Path>) {
        let Some(path) = path.map(Path::to_path_buf).or_else(Self::default_path) else {
            log::error!("No config directory available for saving");
            return;
        };
        if let Err(err) = self.write(&path) {
            log::error!("Failed to save config: {:?}", err);
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = serde_json::from_str(&json)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        Ok(config)
    }

    fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Clamp values that would break the engine
    fn validated(mut self) -> Self {
        if !(MIN_DIVISIONS..=MAX_DIVISIONS).contains(&self.default_divisions) {
            log::warn!(
                "default_divisions {} out of range, using {}",
                self.default_divisions,
                DEFAULT_DIVISIONS
            );
            self.default_divisions = DEFAULT_DIVISIONS;
        }
        self
    }

    /// Export directory, falling back to the documents folder and then cwd
    pub fn export_dir(&self) -> PathBuf {
        self.export_dir
            .clone()
            .or_else(|| dirs::document_dir().or_else(|| dirs::home_dir().map(|h| h.join("Documents"))))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ComarcaConfig::load(Some(&dir.path().join("nope.json")));
        assert_eq!(config, ComarcaConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = ComarcaConfig {
            default_divisions: 5,
            thousands_separator: '.',
            highlight: Some(HighlightRule {
                property: "region".to_string(),
                values: vec!["AMBA".to_string()],
            }),
            ..ComarcaConfig::default()
        };
        config.save(Some(&path));
        assert_eq!(ComarcaConfig::load(Some(&path)), config);
    }

    #[test]
    fn test_partial_file_uses_field_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "name_property": "nombre" }"#).unwrap();
        let config = ComarcaConfig::load(Some(&path));
        assert_eq!(config.name_property, "nombre");
        assert_eq!(config.code_property, "in1");
        assert_eq!(config.default_divisions, DEFAULT_DIVISIONS);
    }

    #[test]
    fn test_out_of_range_divisions_are_reset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "default_divisions": 40 }"#).unwrap();
        assert_eq!(
            ComarcaConfig::load(Some(&path)).default_divisions,
            DEFAULT_DIVISIONS
        );
    }

    #[test]
    fn test_invalid_json_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();
        assert_eq!(ComarcaConfig::load(Some(&path)), ComarcaConfig::default());
    }

    #[test]
    fn test_highlight_rule() {
        let rule = HighlightRule {
            property: "region".to_string(),
            values: vec!["AMBA".to_string(), "Costa".to_string()],
        };
        assert!(rule.matches("Costa"));
        assert!(!rule.matches("Interior"));
    }
}
