//! Gap classification
//!
//! A spatial join attaches to each gap the sub-polygons it touches. One
//! neighbor makes a gap simple: its owner is unambiguous and the gap gets
//! that owner's dissolve key right here. More than one neighbor makes it
//! complex, to be resolved by the raster extension engine. Zero neighbors
//! is an anomaly that is reported, not filled.

use crate::vector::touch_counts;
use borderalign_core::{AttributeValue, Feature, FeatureCollection, Result};

/// Result of gap classification.
#[derive(Debug, Clone, Default)]
pub struct Classified {
    /// Gaps with exactly one touching sub-polygon, dissolve key attached
    pub simple: Vec<Feature>,
    /// Gaps touching two or more sub-polygons
    pub complex: Vec<Feature>,
    /// Gaps touching no sub-polygon at all
    pub unassigned: Vec<Feature>,
}

/// Partition gaps by adjacency count.
pub fn classify_gaps(
    gaps: Vec<Feature>,
    subpolys: &FeatureCollection,
    dissolve_field: &str,
) -> Result<Classified> {
    let neighbors = touch_counts(&gaps, subpolys);

    let mut out = Classified::default();
    for (mut gap, touching) in gaps.into_iter().zip(neighbors) {
        match touching.as_slice() {
            [] => out.unassigned.push(gap),
            [only] => {
                let owner = &subpolys.features[*only];
                let key = owner.require_key(dissolve_field, &only.to_string())?;
                gap.set(dissolve_field, AttributeValue::String(key.to_string()));
                out.simple.push(gap);
            }
            _ => out.complex.push(gap),
        }
    }
    Ok(out)
}
