//! Keyed attribute table: export and join-by-key
//!
//! Geometry operations in the pipeline discard non-essential attributes to
//! keep merges simple. The orchestrator captures the full attribute record
//! per dissolve key before any geometry work, and rejoins it to the dissolved
//! output at the very end.

use crate::error::{Error, Result};
use crate::vector::{AttributeValue, FeatureCollection};
use std::collections::BTreeMap;

/// An attribute table keyed by the dissolve field.
///
/// One record per key; records are full copies of the source feature's
/// attributes, so later geometry stages are free to drop columns.
#[derive(Debug, Clone)]
pub struct AttributeTable {
    key_field: String,
    records: BTreeMap<String, BTreeMap<String, AttributeValue>>,
}

impl AttributeTable {
    /// Export the attribute records of `features`, keyed by `key_field`.
    ///
    /// Every feature must carry a non-empty key. Duplicate keys keep the
    /// first record seen; the pipeline treats the key as a dissolve identity,
    /// so duplicates share one record by definition.
    pub fn capture(features: &FeatureCollection, key_field: &str) -> Result<Self> {
        let mut records = BTreeMap::new();
        for (idx, feature) in features.iter().enumerate() {
            let key = feature.require_key(key_field, &idx.to_string())?;
            records
                .entry(key.to_string())
                .or_insert_with(|| feature.properties.clone());
        }
        Ok(Self {
            key_field: key_field.to_string(),
            records,
        })
    }

    /// Number of keyed records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The record stored for `key`
    pub fn get(&self, key: &str) -> Option<&BTreeMap<String, AttributeValue>> {
        self.records.get(key)
    }

    /// Rejoin captured records onto `features` by key.
    ///
    /// Columns already present on a feature win over captured ones; a
    /// captured column whose name collides with a differing existing value is
    /// renamed with a `joined_` prefix instead of being dropped. A key found
    /// in the geometry but not in the table (or a table key absent from the
    /// geometry) is a fatal `AttributeJoinMismatch`, since it implies partial
    /// data loss somewhere upstream.
    pub fn join(&self, features: FeatureCollection) -> Result<FeatureCollection> {
        let mut seen: BTreeMap<&str, ()> = BTreeMap::new();
        let mut out = FeatureCollection::new();

        for feature in features {
            let key = feature
                .key(&self.key_field)
                .ok_or_else(|| Error::AttributeJoinMismatch {
                    key: String::from("<missing key>"),
                })?
                .to_string();

            let record = self
                .records
                .get(&key)
                .ok_or_else(|| Error::AttributeJoinMismatch { key: key.clone() })?;
            if let Some((stored, _)) = self.records.get_key_value(&key) {
                seen.insert(stored.as_str(), ());
            }

            let mut joined = feature;
            for (column, value) in record {
                match joined.properties.get(column) {
                    None => {
                        joined.properties.insert(column.clone(), value.clone());
                    }
                    Some(existing) if existing == value => {}
                    Some(_) => {
                        // Conflict: keep the pipeline's value, rename ours
                        joined
                            .properties
                            .insert(format!("joined_{column}"), value.clone());
                    }
                }
            }
            out.push(joined);
        }

        if let Some(lost) = self.records.keys().find(|k| !seen.contains_key(k.as_str())) {
            return Err(Error::AttributeJoinMismatch { key: lost.clone() });
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::Feature;
    use geo_types::{LineString, MultiPolygon, Polygon};

    fn feature_with(pairs: &[(&str, &str)]) -> Feature {
        let poly = Polygon::new(
            LineString::from(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]),
            vec![],
        );
        let mut f = Feature::new(MultiPolygon(vec![poly]));
        for (k, v) in pairs {
            f.set(*k, AttributeValue::String((*v).to_string()));
        }
        f
    }

    #[test]
    fn test_capture_and_join_roundtrip() {
        let mut fc = FeatureCollection::new();
        fc.push(feature_with(&[("id", "U1"), ("pop", "1200"), ("name", "Alpha")]));
        fc.push(feature_with(&[("id", "U2"), ("pop", "300"), ("name", "Beta")]));

        let table = AttributeTable::capture(&fc, "id").unwrap();
        assert_eq!(table.len(), 2);

        // Simulate the geometry pipeline stripping everything but the key
        let mut stripped = FeatureCollection::new();
        stripped.push(feature_with(&[("id", "U1")]));
        stripped.push(feature_with(&[("id", "U2")]));

        let joined = table.join(stripped).unwrap();
        assert_eq!(joined.features[0].key("name"), Some("Alpha"));
        assert_eq!(joined.features[1].key("pop"), Some("300"));
    }

    #[test]
    fn test_join_missing_geometry_key_is_fatal() {
        let mut fc = FeatureCollection::new();
        fc.push(feature_with(&[("id", "U1")]));
        let table = AttributeTable::capture(&fc, "id").unwrap();

        let mut stripped = FeatureCollection::new();
        stripped.push(feature_with(&[("id", "U9")]));

        assert!(matches!(
            table.join(stripped),
            Err(Error::AttributeJoinMismatch { .. })
        ));
    }

    #[test]
    fn test_join_lost_table_key_is_fatal() {
        let mut fc = FeatureCollection::new();
        fc.push(feature_with(&[("id", "U1")]));
        fc.push(feature_with(&[("id", "U2")]));
        let table = AttributeTable::capture(&fc, "id").unwrap();

        let mut stripped = FeatureCollection::new();
        stripped.push(feature_with(&[("id", "U1")]));

        assert!(matches!(
            table.join(stripped),
            Err(Error::AttributeJoinMismatch { key }) if key == "U2"
        ));
    }

    #[test]
    fn test_join_renames_conflicting_column() {
        let mut fc = FeatureCollection::new();
        fc.push(feature_with(&[("id", "U1"), ("region", "old")]));
        let table = AttributeTable::capture(&fc, "id").unwrap();

        // The pipeline overwrote the region field with the matched border
        let mut stripped = FeatureCollection::new();
        stripped.push(feature_with(&[("id", "U1"), ("region", "new")]));

        let joined = table.join(stripped).unwrap();
        assert_eq!(joined.features[0].key("region"), Some("new"));
        assert_eq!(joined.features[0].key("joined_region"), Some("old"));
    }

    #[test]
    fn test_capture_missing_key_errors() {
        let mut fc = FeatureCollection::new();
        fc.push(feature_with(&[("name", "no key here")]));

        assert!(matches!(
            AttributeTable::capture(&fc, "id"),
            Err(Error::MissingField { .. })
        ));
    }
}
