//! Gap filling and dissolve
//!
//! The three inputs are spatially disjoint by construction (they share only
//! boundaries), so merging is plain concatenation. Dissolving by key folds
//! each sub-polygon and its absorbed fragments into one feature, and the
//! final clip to the border outline removes the raster extension's
//! deliberate overshoot.

use crate::vector::{clip, dissolve_by_key};
use borderalign_core::{Feature, FeatureCollection, Result};
use geo_types::MultiPolygon;

/// Merge sub-polygons with their gap fills, dissolve by key, clip to border.
///
/// After this step the union of all output polygons equals the border
/// outline, and every output key is one of the input sub-polygon keys.
pub fn fill_and_dissolve(
    subpolys: FeatureCollection,
    simple_fills: Vec<Feature>,
    extended_fills: Vec<Feature>,
    border: &MultiPolygon<f64>,
    dissolve_field: &str,
) -> Result<FeatureCollection> {
    let mut combined = subpolys;
    combined.features.extend(simple_fills);
    combined.features.extend(extended_fills);

    let dissolved = dissolve_by_key(&combined, dissolve_field)?;
    Ok(clip(&dissolved, border))
}
