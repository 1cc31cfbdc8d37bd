//! Unit catalog decoding from a GeoJSON feature collection

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::config::ComarcaConfig;
use crate::domain::{Extent, Point, Unit, UnitCatalog};

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    properties: Option<Map<String, Value>>,
    #[serde(default)]
    geometry: Option<Value>,
}

/// Read and decode the catalog file
pub fn load_catalog(path: &Path, config: &ComarcaConfig) -> Result<UnitCatalog> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog: {}", path.display()))?;
    parse_catalog(&json, config).with_context(|| format!("Invalid catalog: {}", path.display()))
}

/// Decode a GeoJSON feature collection into a catalog
///
/// Features without a code, a name or a polygonal geometry are skipped.
pub fn parse_catalog(json: &str, config: &ComarcaConfig) -> Result<UnitCatalog> {
    let collection: FeatureCollection = serde_json::from_str(json)?;
    let total = collection.features.len();

    let units: Vec<Unit> = collection
        .features
        .into_iter()
        .enumerate()
        .filter_map(|(i, feature)| match feature_to_unit(feature, config) {
            Ok(unit) => Some(unit),
            Err(err) => {
                log::warn!("Skipping feature {}: {}", i, err);
                None
            }
        })
        .collect();

    if units.is_empty() {
        bail!("catalog has no usable features (out of {})", total);
    }
    Ok(UnitCatalog::new(units))
}

fn feature_to_unit(feature: Feature, config: &ComarcaConfig) -> Result<Unit> {
    let properties = feature.properties.unwrap_or_default();
    let code = property_text(&properties, &config.code_property)
        .with_context(|| format!("missing property {:?}", config.code_property))?;
    let name = property_text(&properties, &config.name_property)
        .with_context(|| format!("missing property {:?} on {}", config.name_property, code))?;
    let geometry = feature
        .geometry
        .with_context(|| format!("no geometry on {}", code))?;
    let rings = outer_rings(&geometry).with_context(|| format!("bad geometry on {}", code))?;
    let extent = Extent::from_rings(&rings).with_context(|| format!("empty geometry on {}", code))?;

    let highlighted = config.highlight.as_ref().is_some_and(|rule| {
        property_text(&properties, &rule.property).is_some_and(|value| rule.matches(&value))
    });

    Ok(Unit::new(code, name, extent).with_highlight(highlighted))
}

/// Text form of a string or numeric property
fn property_text(properties: &Map<String, Value>, key: &str) -> Option<String> {
    match properties.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

type Ring = Vec<Vec<f64>>;

/// Outer ring of every polygon in a Polygon or MultiPolygon geometry
fn outer_rings(geometry: &Value) -> Result<Vec<Vec<Point>>> {
    let kind = geometry
        .get("type")
        .and_then(Value::as_str)
        .context("geometry without type")?;
    let coordinates = geometry
        .get("coordinates")
        .cloned()
        .context("geometry without coordinates")?;

    let polygons: Vec<Vec<Ring>> = match kind {
        "Polygon" => vec![serde_json::from_value(coordinates)?],
        "MultiPolygon" => serde_json::from_value(coordinates)?,
        other => bail!("unsupported geometry type {}", other),
    };

    polygons
        .into_iter()
        .filter_map(|polygon| polygon.into_iter().next())
        .map(|ring| {
            ring.into_iter()
                .map(position_to_point)
                .collect::<Result<Vec<Point>>>()
        })
        .collect()
}

fn position_to_point(position: Vec<f64>) -> Result<Point> {
    match position.as_slice() {
        [x, y, ..] => Ok(Point::new(*x, *y)),
        _ => bail!("position with fewer than two coordinates"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HighlightRule;

    const COLLECTION: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            { "type": "Feature",
              "properties": { "in1": "06007", "nam": "Alberti", "region": "Interior" },
              "geometry": { "type": "Polygon",
                            "coordinates": [[[0,0],[4,0],[4,2],[0,2],[0,0]]] } },
            { "type": "Feature",
              "properties": { "in1": 6014, "nam": "Almirante Brown", "region": "AMBA" },
              "geometry": { "type": "MultiPolygon",
                            "coordinates": [[[[10,10,5],[12,10,5],[12,12,5],[10,12,5]]],
                                            [[[20,20],[21,20],[21,21],[20,21]]]] } },
            { "type": "Feature",
              "properties": { "in1": "06021" },
              "geometry": { "type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1]]] } },
            { "type": "Feature",
              "properties": { "in1": "06028", "nam": "Sin forma" },
              "geometry": null },
            { "type": "Feature",
              "properties": { "in1": "06035", "nam": "Punto" },
              "geometry": { "type": "Point", "coordinates": [1, 1] } }
        ]
    }"#;

    #[test]
    fn test_parse_keeps_polygonal_features() {
        let catalog = parse_catalog(COLLECTION, &ComarcaConfig::default()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.ids().collect::<Vec<_>>(), vec!["06007", "6014"]);

        let alberti = catalog.get("06007").unwrap();
        assert_eq!(alberti.name, "Alberti");
        assert!((alberti.extent.centroid.x - 2.0).abs() < 1e-9);
        assert!((alberti.extent.centroid.y - 1.0).abs() < 1e-9);
        assert_eq!(alberti.extent.bounds.max_x, 4.0);
        assert!(!alberti.highlighted);
    }

    #[test]
    fn test_multipolygon_bounds_cover_all_parts() {
        let catalog = parse_catalog(COLLECTION, &ComarcaConfig::default()).unwrap();
        let brown = catalog.get("6014").unwrap();
        assert_eq!(brown.extent.bounds.min_x, 10.0);
        assert_eq!(brown.extent.bounds.max_y, 21.0);
        // Larger part dominates the centroid
        assert!(brown.extent.centroid.x < 15.0);
    }

    #[test]
    fn test_highlight_rule_sets_flag() {
        let config = ComarcaConfig {
            highlight: Some(HighlightRule {
                property: "region".to_string(),
                values: vec!["AMBA".to_string()],
            }),
            ..ComarcaConfig::default()
        };
        let catalog = parse_catalog(COLLECTION, &config).unwrap();
        assert!(catalog.get("6014").unwrap().highlighted);
        assert!(!catalog.get("06007").unwrap().highlighted);
    }

    #[test]
    fn test_custom_property_names() {
        let json = r#"{ "features": [
            { "properties": { "codigo": "A1", "nombre": "Uno" },
              "geometry": { "type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,1]]] } }
        ] }"#;
        let config = ComarcaConfig {
            code_property: "codigo".to_string(),
            name_property: "nombre".to_string(),
            ..ComarcaConfig::default()
        };
        let catalog = parse_catalog(json, &config).unwrap();
        assert_eq!(catalog.name_of("A1"), "Uno");
    }

    #[test]
    fn test_no_usable_features_is_an_error() {
        let json = r#"{ "features": [ { "properties": {}, "geometry": null } ] }"#;
        assert!(parse_catalog(json, &ComarcaConfig::default()).is_err());
        assert!(parse_catalog("[]", &ComarcaConfig::default()).is_err());
    }

    #[test]
    fn test_load_catalog_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, COLLECTION.as_bytes()).unwrap();
        let catalog = load_catalog(file.path(), &ComarcaConfig::default()).unwrap();
        assert_eq!(catalog.len(), 2);
    }
}
