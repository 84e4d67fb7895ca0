//! Outward polygon buffering
//!
//! Minkowski sum of a polygon with a disc, built as the union of the
//! polygon, a rectangle along every exterior edge and a circle (approximated
//! with `segments` vertices) at every exterior vertex. The pipeline uses it
//! only to establish the raster working extent around the border, where the
//! circle approximation error is irrelevant next to the buffer distance.

use geo::BooleanOps;
use geo_types::{Coord, LineString, MultiPolygon, Polygon};
use std::f64::consts::PI;

fn circle(center: Coord<f64>, radius: f64, segments: usize) -> Polygon<f64> {
    let n = segments.max(8);
    let mut coords = Vec::with_capacity(n + 1);
    for i in 0..n {
        let angle = 2.0 * PI * i as f64 / n as f64;
        coords.push((center.x + radius * angle.cos(), center.y + radius * angle.sin()));
    }
    coords.push(coords[0]);
    Polygon::new(LineString::from(coords), vec![])
}

fn edge_rectangle(p: Coord<f64>, q: Coord<f64>, distance: f64) -> Option<Polygon<f64>> {
    let dx = q.x - p.x;
    let dy = q.y - p.y;
    let len = (dx * dx + dy * dy).sqrt();
    if len <= 0.0 {
        return None;
    }
    // Unit normal scaled to the buffer distance
    let nx = -dy / len * distance;
    let ny = dx / len * distance;
    Some(Polygon::new(
        LineString::from(vec![
            (p.x + nx, p.y + ny),
            (q.x + nx, q.y + ny),
            (q.x - nx, q.y - ny),
            (p.x - nx, p.y - ny),
            (p.x + nx, p.y + ny),
        ]),
        vec![],
    ))
}

/// Buffer a multipolygon outward by `distance`.
///
/// Holes are left untouched; an outward buffer can only shrink them and the
/// working-extent use case never looks inside the geometry.
pub fn buffer_multipolygon(
    geometry: &MultiPolygon<f64>,
    distance: f64,
    segments: usize,
) -> MultiPolygon<f64> {
    if distance <= 0.0 {
        return geometry.clone();
    }

    let mut result = geometry.clone();
    for polygon in &geometry.0 {
        let ring = polygon.exterior();
        for window in ring.0.windows(2) {
            if let Some(rect) = edge_rectangle(window[0], window[1], distance) {
                result = result.union(&MultiPolygon(vec![rect]));
            }
        }
        for coord in &ring.0 {
            let disc = circle(*coord, distance, segments);
            result = result.union(&MultiPolygon(vec![disc]));
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Area, BoundingRect};

    fn square(size: f64) -> MultiPolygon<f64> {
        MultiPolygon(vec![Polygon::new(
            LineString::from(vec![
                (0.0, 0.0),
                (size, 0.0),
                (size, size),
                (0.0, size),
                (0.0, 0.0),
            ]),
            vec![],
        )])
    }

    #[test]
    fn test_buffer_expands_bounds() {
        let buffered = buffer_multipolygon(&square(10.0), 2.0, 16);
        let rect = buffered.bounding_rect().unwrap();

        assert!((rect.min().x - (-2.0)).abs() < 1e-9);
        assert!((rect.max().y - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_buffer_area_close_to_analytic() {
        // Square of side s buffered by d: s^2 + 4*s*d + pi*d^2
        let s = 10.0;
        let d = 1.0;
        let buffered = buffer_multipolygon(&square(s), d, 64);
        let expected = s * s + 4.0 * s * d + PI * d * d;
        let got = buffered.unsigned_area();

        let rel = (got - expected).abs() / expected;
        assert!(rel < 0.01, "area {got} vs analytic {expected}");
    }

    #[test]
    fn test_zero_distance_is_identity() {
        let original = square(5.0);
        let buffered = buffer_multipolygon(&original, 0.0, 16);
        assert!((buffered.unsigned_area() - original.unsigned_area()).abs() < 1e-12);
    }
}
