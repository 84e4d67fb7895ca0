//! Planar overlay operations
//!
//! The union here implements the "no implicit gaps" policy the gap detector
//! depends on: the union of sub-polygons and border covers the full border
//! extent, and area claimed by no sub-polygon comes back as fragments whose
//! dissolve field is null.

use borderalign_core::{AttributeValue, Error, Feature, FeatureCollection, Result};
use geo::{Area, BooleanOps, Validation};
use geo_types::MultiPolygon;

/// Area below which an overlay fragment is considered noise and dropped.
/// Boolean ops on near-tangent rings can emit degenerate slivers of this
/// magnitude.
pub(crate) const SLIVER_AREA: f64 = 1e-12;

/// Check every feature for invalid geometry.
///
/// Self-intersecting rings and empty multipolygons are reported with the
/// offending feature's key (or ordinal, when the key field itself is
/// unreadable).
pub fn validate(features: &FeatureCollection, key_field: &str) -> Result<()> {
    for (idx, feature) in features.iter().enumerate() {
        let label = feature
            .key(key_field)
            .map_or_else(|| idx.to_string(), str::to_string);
        if feature.geometry.0.is_empty() || feature.geometry.unsigned_area() <= 0.0 {
            return Err(Error::InvalidGeometry {
                key: label,
                reason: "empty geometry".into(),
            });
        }
        if !feature.geometry.is_valid() {
            return Err(Error::InvalidGeometry {
                key: label,
                reason: "self-intersecting or degenerate rings".into(),
            });
        }
    }
    Ok(())
}

/// Unary union of all feature geometries.
pub fn coverage(features: &FeatureCollection) -> MultiPolygon<f64> {
    features
        .iter()
        .fold(MultiPolygon::<f64>(vec![]), |acc, feature| {
            acc.union(&feature.geometry)
        })
}

/// Clip each feature to `boundary`, keeping attributes.
///
/// Features that fall entirely outside the boundary are dropped.
pub fn clip(features: &FeatureCollection, boundary: &MultiPolygon<f64>) -> FeatureCollection {
    features
        .iter()
        .filter_map(|feature| {
            let clipped = feature.geometry.intersection(boundary);
            if clipped.unsigned_area() <= SLIVER_AREA {
                return None;
            }
            let mut out = feature.clone();
            out.geometry = clipped;
            Some(out)
        })
        .collect()
}

/// Attribute-preserving planar union of sub-polygons and border under the
/// no-gaps policy.
///
/// Sub-polygon fragments come back unchanged with their attributes; border
/// area covered by no sub-polygon comes back as one fragment (possibly
/// multipart) whose `dissolve_field` is null. Callers must have clipped the
/// sub-polygons to the border first, which the pre-pipeline clip guarantees.
pub fn union_no_gaps(
    subpolys: &FeatureCollection,
    border: &MultiPolygon<f64>,
    dissolve_field: &str,
) -> FeatureCollection {
    let mut fragments: FeatureCollection = subpolys.iter().cloned().collect();

    let covered = coverage(subpolys);
    let uncovered = border.difference(&covered);
    if uncovered.unsigned_area() > SLIVER_AREA {
        let mut gap = Feature::new(uncovered);
        gap.set(dissolve_field, AttributeValue::Null);
        fragments.push(gap);
    }
    fragments
}
