//! Spatial joins
//!
//! Two match rules, both on real geometry rather than bounding boxes:
//! the touch predicate used to count a gap's neighbors, and the
//! largest-area-overlap rule used to assign sub-polygons to border regions.

use borderalign_core::{Feature, FeatureCollection};
use geo::coordinate_position::CoordPos;
use geo::dimensions::Dimensions;
use geo::{Area, BooleanOps, Relate};
use geo_types::MultiPolygon;

/// Whether two polygon geometries touch: shared boundary of non-zero length
/// or overlapping interiors. A single shared corner vertex does not count.
pub fn touches(a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> bool {
    let im = a.relate(b);
    if im.get(CoordPos::Inside, CoordPos::Inside) == Dimensions::TwoDimensional {
        return true;
    }
    im.get(CoordPos::OnBoundary, CoordPos::OnBoundary) == Dimensions::OneDimensional
}

/// For each gap, the indices of the sub-polygons it touches.
///
/// This is the spatial-join step of gap classification: the length of each
/// neighbor list is the gap's adjacency count.
pub fn touch_counts(gaps: &[Feature], subpolys: &FeatureCollection) -> Vec<Vec<usize>> {
    gaps.iter()
        .map(|gap| {
            subpolys
                .iter()
                .enumerate()
                .filter(|(_, poly)| touches(&gap.geometry, &poly.geometry))
                .map(|(idx, _)| idx)
                .collect()
        })
        .collect()
}

/// Assign each feature to the region it overlaps most.
///
/// Returns, per feature, the index into `regions` of the region with the
/// largest shared area, or `None` for features overlapping no region at all.
/// Ties go to the earliest region in the slice, so callers control the tie
/// order by sorting `regions` (the orchestrator sorts by region name).
pub fn largest_overlap(
    features: &FeatureCollection,
    regions: &[(String, MultiPolygon<f64>)],
) -> Vec<Option<usize>> {
    features
        .iter()
        .map(|feature| {
            let mut best: Option<(usize, f64)> = None;
            for (idx, (_, region_geom)) in regions.iter().enumerate() {
                let shared = feature.geometry.intersection(region_geom).unsigned_area();
                if shared <= 0.0 {
                    continue;
                }
                match best {
                    Some((_, area)) if shared <= area => {}
                    _ => best = Some((idx, shared)),
                }
            }
            best.map(|(idx, _)| idx)
        })
        .collect()
}
