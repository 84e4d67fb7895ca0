//! Vector data structures: features, collections, attribute tables

mod table;

pub use table::AttributeTable;

use crate::error::{Error, Result};
use geo_types::{MultiPolygon, Polygon};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Attribute value types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl AttributeValue {
    /// String content, if this value is a non-empty string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) if !s.is_empty() => Some(s),
            _ => None,
        }
    }

    /// Whether this value is null or an empty string.
    ///
    /// Gap fragments produced by the no-gaps union carry this kind of value
    /// in their dissolve field.
    pub fn is_empty(&self) -> bool {
        matches!(self, AttributeValue::Null)
            || matches!(self, AttributeValue::String(s) if s.is_empty())
    }
}

/// A polygon feature with an attribute record.
///
/// Geometry is always a `MultiPolygon`; singlepart features are multipolygons
/// with one member. Features are never mutated in place by the pipeline:
/// every transform produces a new feature set.
#[derive(Debug, Clone)]
pub struct Feature {
    /// Feature geometry
    pub geometry: MultiPolygon<f64>,
    /// Feature attributes, ordered by column name
    pub properties: BTreeMap<String, AttributeValue>,
}

impl Feature {
    /// Create a feature from a multipolygon with no attributes
    pub fn new(geometry: MultiPolygon<f64>) -> Self {
        Self {
            geometry,
            properties: BTreeMap::new(),
        }
    }

    /// Create a singlepart feature from one polygon
    pub fn from_polygon(polygon: Polygon<f64>) -> Self {
        Self::new(MultiPolygon(vec![polygon]))
    }

    /// Set an attribute, replacing any previous value
    pub fn set(&mut self, field: impl Into<String>, value: AttributeValue) {
        self.properties.insert(field.into(), value);
    }

    /// Get an attribute
    pub fn get(&self, field: &str) -> Option<&AttributeValue> {
        self.properties.get(field)
    }

    /// The feature's value in `field` as a non-empty string.
    pub fn key(&self, field: &str) -> Option<&str> {
        self.properties.get(field).and_then(AttributeValue::as_str)
    }

    /// The feature's value in `field`, or a `MissingField` error.
    ///
    /// `label` identifies the feature in the error message; pass whatever
    /// key or ordinal the caller has at hand.
    pub fn require_key(&self, field: &str, label: &str) -> Result<&str> {
        self.key(field).ok_or_else(|| Error::MissingField {
            field: field.to_string(),
            key: label.to_string(),
        })
    }
}

/// An owned, ordered collection of features.
///
/// Each pipeline stage consumes one collection and produces a new one; there
/// is no shared workspace state between stages.
#[derive(Debug, Clone, Default)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new() -> Self {
        Self {
            features: Vec::new(),
        }
    }

    pub fn push(&mut self, feature: Feature) {
        self.features.push(feature);
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter()
    }

    /// Concatenate several collections into one (the merge operation).
    pub fn merged(parts: impl IntoIterator<Item = FeatureCollection>) -> Self {
        let mut out = Self::new();
        for part in parts {
            out.features.extend(part.features);
        }
        out
    }

    /// The distinct non-empty values of `field`, in first-seen order.
    pub fn distinct_values(&self, field: &str) -> Vec<String> {
        let mut seen = Vec::new();
        for feature in &self.features {
            if let Some(v) = feature.key(field) {
                if !seen.iter().any(|s| s == v) {
                    seen.push(v.to_string());
                }
            }
        }
        seen
    }
}

impl FromIterator<Feature> for FeatureCollection {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        Self {
            features: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for FeatureCollection {
    type Item = Feature;
    type IntoIter = std::vec::IntoIter<Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{LineString, Polygon};

    fn square(x0: f64, y0: f64, size: f64) -> Polygon<f64> {
        Polygon::new(
            LineString::from(vec![
                (x0, y0),
                (x0 + size, y0),
                (x0 + size, y0 + size),
                (x0, y0 + size),
                (x0, y0),
            ]),
            vec![],
        )
    }

    #[test]
    fn test_key_lookup() {
        let mut f = Feature::from_polygon(square(0.0, 0.0, 1.0));
        f.set("unit", AttributeValue::String("A1".into()));

        assert_eq!(f.key("unit"), Some("A1"));
        assert_eq!(f.key("missing"), None);
    }

    #[test]
    fn test_empty_string_is_not_a_key() {
        let mut f = Feature::from_polygon(square(0.0, 0.0, 1.0));
        f.set("unit", AttributeValue::String(String::new()));

        assert_eq!(f.key("unit"), None);
        assert!(f.require_key("unit", "0").is_err());
    }

    #[test]
    fn test_distinct_values_first_seen_order() {
        let mut fc = FeatureCollection::new();
        for name in ["north", "south", "north", "east"] {
            let mut f = Feature::from_polygon(square(0.0, 0.0, 1.0));
            f.set("region", AttributeValue::String(name.into()));
            fc.push(f);
        }

        assert_eq!(fc.distinct_values("region"), vec!["north", "south", "east"]);
    }

    #[test]
    fn test_merged() {
        let a: FeatureCollection = (0..3)
            .map(|i| Feature::from_polygon(square(i as f64, 0.0, 1.0)))
            .collect();
        let b: FeatureCollection = (0..2)
            .map(|i| Feature::from_polygon(square(i as f64, 5.0, 1.0)))
            .collect();

        let merged = FeatureCollection::merged([a, b]);
        assert_eq!(merged.len(), 5);
    }
}
