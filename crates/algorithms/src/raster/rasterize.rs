//! Polygon rasterization
//!
//! Scanline rasterization with cell-center sampling and the even-odd rule.
//! Each feature is burned with its 1-based position in the collection; 0 is
//! background. Later features overwrite earlier ones on the rare cells where
//! inputs overlap, which keeps the result deterministic.

use borderalign_core::{Error, FeatureCollection, GeoTransform, Raster, Result};
use geo::BoundingRect;
use geo_types::{LineString, Polygon, Rect};

/// Burn `features` onto a grid covering `extent` at `cell_size`.
///
/// The grid origin is the upper-left corner of the extent; dimensions are
/// rounded up so the grid covers the extent completely.
pub fn rasterize_labels(
    features: &FeatureCollection,
    extent: Rect<f64>,
    cell_size: f64,
) -> Result<Raster<i32>> {
    if !(cell_size > 0.0) {
        return Err(Error::InvalidParameter {
            name: "cell_size",
            value: cell_size.to_string(),
            reason: "must be positive".into(),
        });
    }

    let cols = (extent.width() / cell_size).ceil().max(1.0) as usize;
    let rows = (extent.height() / cell_size).ceil().max(1.0) as usize;
    let transform = GeoTransform::new(extent.min().x, extent.max().y, cell_size, -cell_size);
    let mut grid: Raster<i32> = Raster::new(rows, cols, transform)?;

    for (idx, feature) in features.iter().enumerate() {
        let label = idx as i32 + 1;
        for polygon in &feature.geometry.0 {
            burn_polygon(&mut grid, polygon, label, idx)?;
        }
    }
    Ok(grid)
}

fn burn_polygon(
    grid: &mut Raster<i32>,
    polygon: &Polygon<f64>,
    label: i32,
    idx: usize,
) -> Result<()> {
    let bbox = polygon.bounding_rect().ok_or_else(|| Error::InvalidGeometry {
        key: idx.to_string(),
        reason: "polygon without coordinates".into(),
    })?;

    let transform = *grid.transform();
    let (rows, cols) = grid.shape();
    let cell = transform.cell_size();

    // Row range overlapping the polygon's bbox, clamped to the grid; the
    // bbox may lie entirely outside the extent, where the raw pixel rows
    // go negative
    let (_, top) = transform.geo_to_pixel(bbox.min().x, bbox.max().y);
    let (_, bottom) = transform.geo_to_pixel(bbox.min().x, bbox.min().y);
    let row_start = (top.floor() as isize).clamp(0, rows as isize) as usize;
    let row_end = (bottom.ceil() as isize).clamp(0, rows as isize) as usize;
    if row_start >= row_end {
        return Ok(());
    }

    let mut crossings: Vec<f64> = Vec::new();
    for row in row_start..row_end {
        let (_, y) = transform.pixel_to_geo(0, row);
        crossings.clear();
        scanline_crossings(polygon.exterior(), y, &mut crossings);
        for hole in polygon.interiors() {
            scanline_crossings(hole, y, &mut crossings);
        }
        crossings.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        // Even-odd fill between crossing pairs
        for pair in crossings.chunks_exact(2) {
            let (xa, xb) = (pair[0], pair[1]);
            let c_min = ((xa - transform.origin_x) / cell - 0.5).ceil().max(0.0) as usize;
            let c_max = ((xb - transform.origin_x) / cell - 0.5).floor();
            if c_max < 0.0 {
                continue;
            }
            let c_max = (c_max as usize).min(cols.saturating_sub(1));
            for col in c_min..=c_max {
                if col < cols {
                    unsafe { grid.set_unchecked(row, col, label) };
                }
            }
        }
    }
    Ok(())
}

/// X coordinates where `ring` crosses the horizontal line at `y`.
///
/// Half-open edge rule (`y0 <= y < y1` or `y1 <= y < y0`) so shared vertices
/// count exactly once.
fn scanline_crossings(ring: &LineString<f64>, y: f64, out: &mut Vec<f64>) {
    for window in ring.0.windows(2) {
        let (p, q) = (window[0], window[1]);
        let crosses = (p.y <= y && q.y > y) || (q.y <= y && p.y > y);
        if crosses {
            let t = (y - p.y) / (q.y - p.y);
            out.push(p.x + t * (q.x - p.x));
        }
    }
}
