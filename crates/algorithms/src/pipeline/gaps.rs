//! Gap detection
//!
//! A gap is border area claimed by no sub-polygon. The no-gaps union makes
//! those areas explicit as null-key fragments; exploding multipart results
//! gives one gap per connected component.

use crate::vector::{explode, union_no_gaps};
use borderalign_core::{Feature, FeatureCollection, Result};
use geo_types::MultiPolygon;

/// Detect gaps between `subpolys` and the border outline.
///
/// Returns one singlepart feature per gap, each carrying a null dissolve
/// key. An empty result is the common case and means the caller should pass
/// the sub-polygons through unchanged.
pub fn detect_gaps(
    border: &MultiPolygon<f64>,
    subpolys: &FeatureCollection,
    dissolve_field: &str,
) -> Result<Vec<Feature>> {
    let fragments = union_no_gaps(subpolys, border, dissolve_field);

    let uncovered: FeatureCollection = fragments
        .into_iter()
        .filter(|fragment| {
            fragment
                .get(dissolve_field)
                .is_none_or(borderalign_core::AttributeValue::is_empty)
        })
        .collect();

    Ok(explode(uncovered).features)
}

#[cfg(test)]
mod tests {
    use super::*;
    use borderalign_core::AttributeValue;
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

    fn keyed(poly: Polygon<f64>, key: &str) -> Feature {
        let mut f = Feature::from_polygon(poly);
        f.set("unit", AttributeValue::String(key.into()));
        f
    }

    #[test]
    fn test_no_gaps_when_tiled() {
        let border = MultiPolygon(vec![square(0.0, 0.0, 10.0, 10.0)]);
        let mut subpolys = FeatureCollection::new();
        subpolys.push(keyed(square(0.0, 0.0, 5.0, 10.0), "A"));
        subpolys.push(keyed(square(5.0, 0.0, 5.0, 10.0), "B"));

        let gaps = detect_gaps(&border, &subpolys, "unit").unwrap();
        assert!(gaps.is_empty());
    }

    #[test]
    fn test_single_gap_between_polys() {
        let border = MultiPolygon(vec![square(0.0, 0.0, 10.0, 10.0)]);
        let mut subpolys = FeatureCollection::new();
        subpolys.push(keyed(square(0.0, 0.0, 4.0, 10.0), "A"));
        subpolys.push(keyed(square(6.0, 0.0, 4.0, 10.0), "B"));

        let gaps = detect_gaps(&border, &subpolys, "unit").unwrap();
        assert_eq!(gaps.len(), 1);
        assert!((gaps[0].geometry.unsigned_area() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_multipart_gap_exploded() {
        // Two separate uncovered corners
        let border = MultiPolygon(vec![square(0.0, 0.0, 10.0, 10.0)]);
        let mut subpolys = FeatureCollection::new();
        subpolys.push(keyed(square(0.0, 0.0, 10.0, 8.0), "A"));
        subpolys.push(keyed(square(2.0, 8.0, 6.0, 2.0), "B"));

        // Uncovered: two 2x2 corners at the top
        let gaps = detect_gaps(&border, &subpolys, "unit").unwrap();
        assert_eq!(gaps.len(), 2);
        for gap in &gaps {
            assert!((gap.geometry.unsigned_area() - 4.0).abs() < 1e-9);
            assert_eq!(gap.geometry.0.len(), 1);
        }
    }
}
