//! GeoJSON read/write for feature collections
//!
//! Only Polygon and MultiPolygon geometries are accepted; everything else in
//! an input file is an error, since the pipeline is defined on polygon
//! layers only.

use crate::error::{Error, Result};
use crate::vector::{AttributeValue, Feature, FeatureCollection};
use geo_types::{Geometry, MultiPolygon};
use serde_json::Value as JsonValue;
use std::path::Path;

/// Read a feature collection from a GeoJSON file
pub fn read_geojson(path: impl AsRef<Path>) -> Result<FeatureCollection> {
    let text = std::fs::read_to_string(path)?;
    from_geojson_str(&text)
}

/// Parse a feature collection from GeoJSON text
pub fn from_geojson_str(text: &str) -> Result<FeatureCollection> {
    let gj: geojson::GeoJson = text.parse()?;
    let gj_fc = match gj {
        geojson::GeoJson::FeatureCollection(fc) => fc,
        other => {
            return Err(Error::GeoJson(format!(
                "expected a FeatureCollection, got {other}",
            )))
        }
    };

    let mut out = FeatureCollection::new();
    for (idx, gj_feature) in gj_fc.features.into_iter().enumerate() {
        let geometry = gj_feature
            .geometry
            .ok_or_else(|| Error::GeoJson(format!("feature {idx} has no geometry")))?;
        let geom: Geometry<f64> = geometry
            .value
            .try_into()
            .map_err(|e: geojson::Error| Error::GeoJson(e.to_string()))?;
        let multipolygon = match geom {
            Geometry::Polygon(p) => MultiPolygon(vec![p]),
            Geometry::MultiPolygon(mp) => mp,
            other => {
                return Err(Error::GeoJson(format!(
                    "feature {idx}: unsupported geometry type {other:?}, expected (Multi)Polygon",
                )))
            }
        };

        let mut feature = Feature::new(multipolygon);
        if let Some(props) = gj_feature.properties {
            for (name, value) in props {
                feature.set(name, json_to_attribute(value));
            }
        }
        out.push(feature);
    }
    Ok(out)
}

/// Serialize a feature collection to GeoJSON text
pub fn to_geojson_string(features: &FeatureCollection) -> String {
    let gj_features: Vec<geojson::Feature> = features
        .iter()
        .map(|feature| {
            let mut props = serde_json::Map::new();
            for (name, value) in &feature.properties {
                props.insert(name.clone(), attribute_to_json(value));
            }
            geojson::Feature {
                bbox: None,
                geometry: Some(geojson::Geometry::new(geojson::Value::from(
                    &feature.geometry,
                ))),
                id: None,
                properties: Some(props),
                foreign_members: None,
            }
        })
        .collect();

    geojson::GeoJson::FeatureCollection(geojson::FeatureCollection {
        bbox: None,
        features: gj_features,
        foreign_members: None,
    })
    .to_string()
}

/// Write a feature collection to a GeoJSON file
pub fn write_geojson(path: impl AsRef<Path>, features: &FeatureCollection) -> Result<()> {
    std::fs::write(path, to_geojson_string(features))?;
    Ok(())
}

fn json_to_attribute(value: JsonValue) -> AttributeValue {
    match value {
        JsonValue::Null => AttributeValue::Null,
        JsonValue::Bool(b) => AttributeValue::Bool(b),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                AttributeValue::Int(i)
            } else {
                AttributeValue::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        JsonValue::String(s) => AttributeValue::String(s),
        // Nested arrays/objects are opaque to the pipeline; keep their text
        other => AttributeValue::String(other.to_string()),
    }
}

fn attribute_to_json(value: &AttributeValue) -> JsonValue {
    match value {
        AttributeValue::Null => JsonValue::Null,
        AttributeValue::Bool(b) => JsonValue::Bool(*b),
        AttributeValue::Int(i) => JsonValue::from(*i),
        AttributeValue::Float(f) => {
            serde_json::Number::from_f64(*f).map_or(JsonValue::Null, JsonValue::Number)
        }
        AttributeValue::String(s) => JsonValue::String(s.clone()),
    }
}
