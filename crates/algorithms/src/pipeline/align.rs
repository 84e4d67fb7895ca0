//! Multi-border orchestration
//!
//! Wires the per-region pipeline together: pre-pipeline clip, region
//! assignment by largest overlap, independent per-region runs (parallel
//! across regions), deterministic merge in region-name order, and the final
//! attribute regeneration join. Geometry and attributes travel on separate
//! tracks: the attribute table is captured before the geometry pipeline
//! mangles columns and rejoined by dissolve key at the very end.

use crate::maybe_rayon::*;
use crate::pipeline::{
    classify_gaps, detect_gaps, extend_complex_gaps, fill_and_dissolve, Notice, PipelineParams,
};
use crate::vector::{clip, coverage, largest_overlap, validate};
use borderalign_core::{
    AttributeTable, AttributeValue, Error, FeatureCollection, Result,
};
use geo::Area;
use geo_types::MultiPolygon;
use tracing::{info, warn};

/// Caller-supplied parameters for a full alignment run.
#[derive(Debug, Clone)]
pub struct AlignParams {
    /// Whether the border layer holds several named regions
    pub multi_region: bool,
    /// Border field holding region names (multi-region only)
    pub border_name_field: String,
    /// Sub-polygon field rewritten with the matched region name
    /// (multi-region only)
    pub region_field: String,
    /// Unique identifier used to dissolve polygons and gaps
    pub dissolve_field: String,
    /// Raster extension tuning
    pub pipeline: PipelineParams,
}

/// Result of an alignment run.
///
/// In multi-region mode, regions that failed are reported here rather than
/// aborting their siblings; `features` holds the merged output of the
/// regions that succeeded.
#[derive(Debug)]
pub struct AlignOutcome {
    pub features: FeatureCollection,
    pub notices: Vec<Notice>,
    pub failed_regions: Vec<(String, Error)>,
}

/// Align `subpolys` to `border`, filling slivers and removing overlaps.
pub fn align_to_borders(
    border: &FeatureCollection,
    subpolys: &FeatureCollection,
    params: &AlignParams,
) -> Result<AlignOutcome> {
    validate_params(border, subpolys, params)?;

    if params.multi_region {
        align_multi(border, subpolys, params)
    } else {
        align_single(border, subpolys, params)
    }
}

fn validate_params(
    border: &FeatureCollection,
    subpolys: &FeatureCollection,
    params: &AlignParams,
) -> Result<()> {
    let require = |name: &'static str, value: &str| -> Result<()> {
        if value.is_empty() {
            return Err(Error::InvalidParameter {
                name,
                value: String::new(),
                reason: "field name must not be empty".into(),
            });
        }
        Ok(())
    };
    require("dissolve_field", &params.dissolve_field)?;
    if params.multi_region {
        require("border_name_field", &params.border_name_field)?;
        require("region_field", &params.region_field)?;
    }
    if !(params.pipeline.cell_size > 0.0) {
        return Err(Error::InvalidParameter {
            name: "cell_size",
            value: params.pipeline.cell_size.to_string(),
            reason: "must be positive".into(),
        });
    }
    if params.pipeline.buffer_distance < 0.0 {
        return Err(Error::InvalidParameter {
            name: "buffer_distance",
            value: params.pipeline.buffer_distance.to_string(),
            reason: "must not be negative".into(),
        });
    }
    if border.is_empty() {
        return Err(Error::InvalidParameter {
            name: "border",
            value: "<empty>".into(),
            reason: "border layer has no features".into(),
        });
    }
    if subpolys.is_empty() {
        return Err(Error::InvalidParameter {
            name: "subpolys",
            value: "<empty>".into(),
            reason: "sub-polygon layer has no features".into(),
        });
    }
    validate(border, &params.border_name_field)?;
    validate(subpolys, &params.dissolve_field)?;
    Ok(())
}

/// One region's pipeline: detect, classify, extend, fill.
fn run_region(
    region: &str,
    border_geom: &MultiPolygon<f64>,
    subpolys: FeatureCollection,
    params: &AlignParams,
) -> Result<(FeatureCollection, Vec<Notice>)> {
    let dissolve_field = &params.dissolve_field;
    let mut notices = Vec::new();

    let gaps = detect_gaps(border_geom, &subpolys, dissolve_field)?;
    if gaps.is_empty() {
        // Rare enough in real data to be worth a warning
        warn!(region, "no gaps were found");
        notices.push(Notice::NoGaps {
            region: region.to_string(),
        });
        return Ok((subpolys, notices));
    }
    info!(region, gaps = gaps.len(), "gaps detected");

    let classified = classify_gaps(gaps, &subpolys, dissolve_field)?;
    for gap in &classified.unassigned {
        let area = gap.geometry.unsigned_area();
        warn!(region, area, "gap touches no sub-polygon; leaving unfilled");
        notices.push(Notice::UnassignedGap {
            region: region.to_string(),
            area,
        });
    }

    let (extended, coarse) = extend_complex_gaps(
        &classified.complex,
        &subpolys,
        border_geom,
        dissolve_field,
        region,
        &params.pipeline,
    )?;
    for notice in &coarse {
        warn!(region, %notice, "raster resolution too coarse");
    }
    notices.extend(coarse);

    let aligned = fill_and_dissolve(
        subpolys,
        classified.simple,
        extended,
        border_geom,
        dissolve_field,
    )?;
    info!(region, "processing complete");
    Ok((aligned, notices))
}

fn align_single(
    border: &FeatureCollection,
    subpolys: &FeatureCollection,
    params: &AlignParams,
) -> Result<AlignOutcome> {
    let border_geom = coverage(border);

    // Pre-pipeline clip removes overlaps with the border outline; the
    // attribute table is captured from the clipped set so geometry and
    // table hold the same keys
    let clipped = clip(subpolys, &border_geom);
    if clipped.is_empty() {
        return Err(Error::InvalidParameter {
            name: "subpolys",
            value: "<disjoint>".into(),
            reason: "no sub-polygon intersects the border".into(),
        });
    }
    let table = AttributeTable::capture(&clipped, &params.dissolve_field)?;

    let (aligned, notices) = run_region("border", &border_geom, clipped, params)?;
    let features = table.join(aligned)?;

    Ok(AlignOutcome {
        features,
        notices,
        failed_regions: Vec::new(),
    })
}

fn align_multi(
    border: &FeatureCollection,
    subpolys: &FeatureCollection,
    params: &AlignParams,
) -> Result<AlignOutcome> {
    info!("aligning polygons to multiple borders");

    // Region name -> geometry; names must be unique within the border layer
    let mut regions: Vec<(String, MultiPolygon<f64>)> = Vec::new();
    for (idx, feature) in border.iter().enumerate() {
        let name = feature.require_key(&params.border_name_field, &idx.to_string())?;
        if regions.iter().any(|(existing, _)| existing == name) {
            return Err(Error::InvalidParameter {
                name: "border_name_field",
                value: name.to_string(),
                reason: "region names must be unique within the border layer".into(),
            });
        }
        regions.push((name.to_string(), feature.geometry.clone()));
    }
    // Sorted region order fixes both the tie rule of the overlap join and
    // the merge order of the outputs
    regions.sort_by(|a, b| a.0.cmp(&b.0));

    let all_borders = coverage(border);
    let clipped = clip(subpolys, &all_borders);

    // Largest-overlap assignment, rewriting the region field
    let matches = largest_overlap(&clipped, &regions);
    let mut assigned = FeatureCollection::new();
    for (mut feature, matched) in clipped.into_iter().zip(matches) {
        match matched {
            Some(idx) => {
                feature.set(
                    &params.region_field,
                    AttributeValue::String(regions[idx].0.clone()),
                );
                assigned.push(feature);
            }
            None => {
                warn!("sub-polygon overlaps no border region; dropping it");
            }
        }
    }
    if assigned.is_empty() {
        return Err(Error::InvalidParameter {
            name: "subpolys",
            value: "<disjoint>".into(),
            reason: "no sub-polygon overlaps any border region".into(),
        });
    }

    // Independent per-region pipelines; each owns its inputs and writes to
    // its own output slot, so the fan-out needs no locking
    let jobs: Vec<(String, MultiPolygon<f64>, FeatureCollection)> = regions
        .into_iter()
        .map(|(name, geom)| {
            let subs: FeatureCollection = assigned
                .iter()
                .filter(|f| f.key(&params.region_field) == Some(name.as_str()))
                .cloned()
                .collect();
            // A sub-polygon assigned by largest overlap may still overhang
            // its neighbors; clipping to the region keeps outputs disjoint
            let subs = clip(&subs, &geom);
            (name, geom, subs)
        })
        .collect();

    let results: Vec<(String, Result<(FeatureCollection, Vec<Notice>)>)> = jobs
        .into_par_iter()
        .map(|(name, geom, subs)| {
            let outcome =
                run_region(&name, &geom, subs, params).map_err(|e| e.in_region(name.clone()));
            (name, outcome)
        })
        .collect();

    let mut merged = FeatureCollection::new();
    let mut notices = Vec::new();
    let mut failed_regions = Vec::new();
    let mut succeeded: Vec<String> = Vec::new();
    for (name, result) in results {
        match result {
            Ok((fc, region_notices)) => {
                merged.features.extend(fc.features);
                notices.extend(region_notices);
                succeeded.push(name);
            }
            Err(e) => {
                warn!(region = %name, error = %e, "region pipeline failed");
                failed_regions.push((name, e));
            }
        }
    }

    // Regenerate attributes only for regions that made it through; a failed
    // region's keys never reached the merged geometry
    let survivors: FeatureCollection = assigned
        .into_iter()
        .filter(|f| {
            f.key(&params.region_field)
                .is_some_and(|r| succeeded.iter().any(|s| s == r))
        })
        .collect();
    let features = if merged.is_empty() {
        merged
    } else {
        let table = AttributeTable::capture(&survivors, &params.dissolve_field)?;
        table.join(merged)?
    };

    Ok(AlignOutcome {
        features,
        notices,
        failed_regions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use borderalign_core::Feature;
    use geo::Area;
    use geo_types::{LineString, Polygon};

    fn square(x0: f64, y0: f64, w: f64, h: f64) -> Polygon<f64> {
        Polygon::new(
            LineString::from(vec![
                (x0, y0),
                (x0 + w, y0),
                (x0 + w, y0 + h),
                (x0, y0 + h),
                (x0, y0),
            ]),
            vec![],
        )
    }

    fn feature(poly: Polygon<f64>, pairs: &[(&str, &str)]) -> Feature {
        let mut f = Feature::from_polygon(poly);
        for (k, v) in pairs {
            f.set(*k, AttributeValue::String((*v).to_string()));
        }
        f
    }

    fn params(multi: bool) -> AlignParams {
        AlignParams {
            multi_region: multi,
            border_name_field: "region".into(),
            region_field: "region".into(),
            dissolve_field: "unit".into(),
            pipeline: PipelineParams {
                cell_size: 0.1,
                buffer_distance: 1.0,
                buffer_segments: 8,
            },
        }
    }

    #[test]
    fn test_single_region_fills_gap() {
        let border: FeatureCollection =
            std::iter::once(feature(square(0.0, 0.0, 10.0, 10.0), &[])).collect();
        let mut subpolys = FeatureCollection::new();
        subpolys.push(feature(
            square(0.0, 0.0, 4.0, 10.0),
            &[("unit", "A"), ("name", "Alpha")],
        ));
        subpolys.push(feature(
            square(6.0, 0.0, 4.0, 10.0),
            &[("unit", "B"), ("name", "Beta")],
        ));

        let outcome = align_to_borders(&border, &subpolys, &params(false)).unwrap();
        assert!(outcome.failed_regions.is_empty());

        let total: f64 = outcome
            .features
            .iter()
            .map(|f| f.geometry.unsigned_area())
            .sum();
        assert!((total - 100.0).abs() < 1e-6, "total area {total}");

        // Attributes regenerated from the captured table
        let a = outcome
            .features
            .iter()
            .find(|f| f.key("unit") == Some("A"))
            .unwrap();
        assert_eq!(a.key("name"), Some("Alpha"));
    }

    #[test]
    fn test_single_region_no_gaps_passthrough() {
        let border: FeatureCollection =
            std::iter::once(feature(square(0.0, 0.0, 10.0, 10.0), &[])).collect();
        let mut subpolys = FeatureCollection::new();
        subpolys.push(feature(square(0.0, 0.0, 5.0, 10.0), &[("unit", "A")]));
        subpolys.push(feature(square(5.0, 0.0, 5.0, 10.0), &[("unit", "B")]));

        let outcome = align_to_borders(&border, &subpolys, &params(false)).unwrap();
        assert!(outcome
            .notices
            .iter()
            .any(|n| matches!(n, Notice::NoGaps { .. })));
        assert_eq!(outcome.features.len(), 2);
    }

    #[test]
    fn test_multi_region_assignment_and_merge() {
        let mut border = FeatureCollection::new();
        border.push(feature(square(0.0, 0.0, 10.0, 10.0), &[("region", "west")]));
        border.push(feature(square(10.0, 0.0, 10.0, 10.0), &[("region", "east")]));

        let mut subpolys = FeatureCollection::new();
        // Straddles the region boundary, mostly west
        subpolys.push(feature(
            square(0.0, 0.0, 11.0, 10.0),
            &[("unit", "U1"), ("region", "stale")],
        ));
        subpolys.push(feature(
            square(11.0, 0.0, 9.0, 10.0),
            &[("unit", "U2"), ("region", "stale")],
        ));

        let outcome = align_to_borders(&border, &subpolys, &params(true)).unwrap();
        assert!(outcome.failed_regions.is_empty());

        let u1 = outcome
            .features
            .iter()
            .find(|f| f.key("unit") == Some("U1"))
            .unwrap();
        assert_eq!(u1.key("region"), Some("west"));
        let u2 = outcome
            .features
            .iter()
            .find(|f| f.key("unit") == Some("U2"))
            .unwrap();
        assert_eq!(u2.key("region"), Some("east"));

        // Both borders fully covered after alignment
        let total: f64 = outcome
            .features
            .iter()
            .map(|f| f.geometry.unsigned_area())
            .sum();
        assert!((total - 200.0).abs() < 1e-6, "total area {total}");
    }

    #[test]
    fn test_duplicate_region_names_rejected() {
        let mut border = FeatureCollection::new();
        border.push(feature(square(0.0, 0.0, 10.0, 10.0), &[("region", "west")]));
        border.push(feature(square(10.0, 0.0, 10.0, 10.0), &[("region", "west")]));

        let subpolys: FeatureCollection =
            std::iter::once(feature(square(0.0, 0.0, 5.0, 5.0), &[("unit", "U1")])).collect();

        assert!(matches!(
            align_to_borders(&border, &subpolys, &params(true)),
            Err(Error::InvalidParameter { name: "border_name_field", .. })
        ));
    }

    #[test]
    fn test_missing_dissolve_field_rejected() {
        let border: FeatureCollection =
            std::iter::once(feature(square(0.0, 0.0, 10.0, 10.0), &[])).collect();
        let subpolys: FeatureCollection =
            std::iter::once(feature(square(0.0, 0.0, 5.0, 5.0), &[("unit", "U1")])).collect();

        let mut p = params(false);
        p.dissolve_field = String::new();
        assert!(align_to_borders(&border, &subpolys, &p).is_err());
    }

    #[test]
    fn test_invalid_subpoly_geometry_rejected() {
        let border: FeatureCollection =
            std::iter::once(feature(square(0.0, 0.0, 10.0, 10.0), &[])).collect();
        let bowtie = Polygon::new(
            LineString::from(vec![
                (0.0, 0.0),
                (2.0, 2.0),
                (2.0, 0.0),
                (0.0, 2.0),
                (0.0, 0.0),
            ]),
            vec![],
        );
        let subpolys: FeatureCollection =
            std::iter::once(feature(bowtie, &[("unit", "U1")])).collect();

        assert!(matches!(
            align_to_borders(&border, &subpolys, &params(false)),
            Err(Error::InvalidGeometry { .. })
        ));
    }
}
