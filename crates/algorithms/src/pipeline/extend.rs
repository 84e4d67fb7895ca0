//! Raster extension of complex gaps
//!
//! Ownership of a gap that borders several sub-polygons is resolved by
//! discrete nearest-neighbor labeling on a grid: rasterize the sub-polygons
//! over a working extent reaching well past the border, flood every cell
//! with its nearest label, vectorize the labeled regions and keep only what
//! falls inside the complex-gap footprint. The labeling intentionally
//! over-extends; the filler's final clip to the border removes the
//! overshoot.

use crate::pipeline::{Notice, PipelineParams};
use crate::raster::{distance_allocation, rasterize_labels, vectorize_labels};
use crate::vector::{buffer_multipolygon, SLIVER_AREA};
use borderalign_core::{AttributeValue, Error, Feature, FeatureCollection, Result};
use geo::{Area, BooleanOps, BoundingRect};
use geo_types::MultiPolygon;
use tracing::debug;

/// Fill complex gaps by extending sub-polygon ownership over a raster grid.
///
/// Returns one fill feature per contributing sub-polygon, each clipped to
/// the gap footprint and carrying the owner's dissolve key, plus notices for
/// gaps the grid resolution could not resolve.
pub fn extend_complex_gaps(
    complex: &[Feature],
    subpolys: &FeatureCollection,
    border: &MultiPolygon<f64>,
    dissolve_field: &str,
    region: &str,
    params: &PipelineParams,
) -> Result<(Vec<Feature>, Vec<Notice>)> {
    if complex.is_empty() {
        return Ok((Vec::new(), Vec::new()));
    }

    // Working extent: the border buffered outward, so the labeling reaches
    // past any gap that touches the border itself
    let buffered = buffer_multipolygon(border, params.buffer_distance, params.buffer_segments);
    let extent = buffered.bounding_rect().ok_or_else(|| Error::InvalidGeometry {
        key: region.to_string(),
        reason: "border has no extent".into(),
    })?;

    let grid = rasterize_labels(subpolys, extent, params.cell_size)?;
    debug!(
        region,
        rows = grid.rows(),
        cols = grid.cols(),
        "rasterized sub-polygons for distance allocation"
    );
    if grid.occupied() == 0 {
        // Cells so coarse that no sub-polygon registered at all; nothing to
        // propagate, so every complex gap goes unfilled
        let notices = complex
            .iter()
            .map(|gap| Notice::ResolutionTooCoarse {
                region: region.to_string(),
                gap_area: gap.geometry.unsigned_area(),
            })
            .collect();
        return Ok((Vec::new(), notices));
    }
    let allocated = distance_allocation(&grid)?;
    let label_polys = vectorize_labels(&allocated)?;

    // Footprint of all complex gaps; cells far from any gap are irrelevant
    let footprint = complex
        .iter()
        .fold(MultiPolygon::<f64>(vec![]), |acc, gap| {
            acc.union(&gap.geometry)
        });

    let mut fills = Vec::new();
    for (label, zone) in label_polys {
        let clipped = zone.intersection(&footprint);
        if clipped.unsigned_area() <= SLIVER_AREA {
            continue;
        }
        // Labels are 1-based positions in the sub-polygon collection
        let owner = &subpolys.features[(label - 1) as usize];
        let key = owner.require_key(dissolve_field, &label.to_string())?;
        let mut fill = Feature::new(clipped);
        fill.set(dissolve_field, AttributeValue::String(key.to_string()));
        fills.push(fill);
    }

    // A gap the fills never reached means the cell size is coarser than
    // the gap itself
    let fill_union = fills
        .iter()
        .fold(MultiPolygon::<f64>(vec![]), |acc, f| acc.union(&f.geometry));
    let mut notices = Vec::new();
    for gap in complex {
        let covered = gap.geometry.intersection(&fill_union).unsigned_area();
        if covered <= SLIVER_AREA {
            notices.push(Notice::ResolutionTooCoarse {
                region: region.to_string(),
                gap_area: gap.geometry.unsigned_area(),
            });
        }
    }

    Ok((fills, notices))
}
