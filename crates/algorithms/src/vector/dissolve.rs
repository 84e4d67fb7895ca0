//! Dissolve and multipart explosion

use borderalign_core::{AttributeValue, Feature, FeatureCollection, Result};
use geo::BooleanOps;
use geo_types::MultiPolygon;

/// Merge features sharing a dissolve key into one feature per key.
///
/// Each group's geometries are combined with a real geometric union, so a
/// sub-polygon and its absorbed gap fragments collapse into one multipart
/// (or single) polygon. Output features carry only the dissolve field; the
/// orchestrator regenerates the remaining attributes from its captured
/// table afterwards. Key order of the output is first-seen input order.
pub fn dissolve_by_key(features: &FeatureCollection, field: &str) -> Result<FeatureCollection> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: std::collections::HashMap<String, MultiPolygon<f64>> =
        std::collections::HashMap::new();

    for (idx, feature) in features.iter().enumerate() {
        let key = feature.require_key(field, &idx.to_string())?.to_string();
        match groups.get_mut(&key) {
            Some(geom) => *geom = geom.union(&feature.geometry),
            None => {
                order.push(key.clone());
                groups.insert(key, feature.geometry.clone());
            }
        }
    }

    let mut out = FeatureCollection::new();
    for key in order {
        let geometry = groups
            .remove(&key)
            .unwrap_or_else(|| MultiPolygon(vec![]));
        let mut feature = Feature::new(geometry);
        feature.set(field, AttributeValue::String(key));
        out.push(feature);
    }
    Ok(out)
}

/// Explode multipart features into one feature per connected component.
///
/// Attributes are copied onto every part.
pub fn explode(features: FeatureCollection) -> FeatureCollection {
    let mut out = FeatureCollection::new();
    for feature in features {
        if feature.geometry.0.len() <= 1 {
            out.push(feature);
            continue;
        }
        for part in &feature.geometry.0 {
            let mut single = Feature::from_polygon(part.clone());
            single.properties = feature.properties.clone();
            out.push(single);
        }
    }
    out
}
