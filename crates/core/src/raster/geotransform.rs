//! Affine geotransformation for rasters

use serde::{Deserialize, Serialize};

/// North-up affine transform between pixel coordinates (col, row) and
/// geographic coordinates (x, y):
///
/// ```text
/// x = origin_x + col * pixel_width
/// y = origin_y + row * pixel_height
/// ```
///
/// The origin is the upper-left corner of the grid, so `pixel_height` is
/// negative for the usual y-up coordinate systems.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform {
    /// X coordinate of the upper-left corner
    pub origin_x: f64,
    /// Y coordinate of the upper-left corner
    pub origin_y: f64,
    /// Pixel width (cell size in X direction)
    pub pixel_width: f64,
    /// Pixel height (cell size in Y direction, usually negative)
    pub pixel_height: f64,
}

impl Default for GeoTransform {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0, -1.0)
    }
}

impl GeoTransform {
    pub fn new(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        Self {
            origin_x,
            origin_y,
            pixel_width,
            pixel_height,
        }
    }

    /// Geographic coordinates of the cell center
    pub fn pixel_to_geo(&self, col: usize, row: usize) -> (f64, f64) {
        let x = self.origin_x + (col as f64 + 0.5) * self.pixel_width;
        let y = self.origin_y + (row as f64 + 0.5) * self.pixel_height;
        (x, y)
    }

    /// Geographic coordinates of the cell's upper-left corner.
    ///
    /// `col` and `row` may equal the grid dimensions here: corner indices
    /// run one past the last cell.
    pub fn pixel_to_geo_corner(&self, col: usize, row: usize) -> (f64, f64) {
        let x = self.origin_x + col as f64 * self.pixel_width;
        let y = self.origin_y + row as f64 * self.pixel_height;
        (x, y)
    }

    /// Fractional pixel coordinates of a geographic point; use `.floor()`
    /// for integer cell indices.
    pub fn geo_to_pixel(&self, x: f64, y: f64) -> (f64, f64) {
        let col = (x - self.origin_x) / self.pixel_width;
        let row = (y - self.origin_y) / self.pixel_height;
        (col, row)
    }

    /// Cell size (assumes square cells)
    pub fn cell_size(&self) -> f64 {
        self.pixel_width.abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_geo_roundtrip() {
        let t = GeoTransform::new(100.0, 200.0, 0.5, -0.5);

        let (x, y) = t.pixel_to_geo(10, 4);
        assert_eq!(x, 100.0 + 10.5 * 0.5);
        assert_eq!(y, 200.0 - 4.5 * 0.5);

        let (col, row) = t.geo_to_pixel(x, y);
        assert_eq!(col.floor() as usize, 10);
        assert_eq!(row.floor() as usize, 4);
    }

    #[test]
    fn test_corner_indices_run_one_past_grid() {
        let t = GeoTransform::new(0.0, 10.0, 1.0, -1.0);
        assert_eq!(t.pixel_to_geo_corner(0, 0), (0.0, 10.0));
        assert_eq!(t.pixel_to_geo_corner(10, 10), (10.0, 0.0));
    }
}
