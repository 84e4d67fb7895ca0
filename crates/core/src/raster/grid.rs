//! Main Raster type

use crate::error::{Error, Result};
use crate::raster::{GeoTransform, RasterElement};
use ndarray::{Array2, ArrayView2};

/// A georeferenced 2D raster grid.
///
/// `Raster<T>` stores values of type `T` in row-major order together with
/// the affine transform anchoring the grid in geographic space. In this
/// pipeline rasters only live inside the extension engine: a label grid is
/// built over the working extent, propagated, vectorized and dropped.
#[derive(Debug, Clone)]
pub struct Raster<T: RasterElement> {
    data: Array2<T>,
    transform: GeoTransform,
}

impl<T: RasterElement> Raster<T> {
    /// Create a raster filled with zeros (the background value)
    pub fn new(rows: usize, cols: usize, transform: GeoTransform) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidDimensions {
                width: cols,
                height: rows,
            });
        }
        Ok(Self {
            data: Array2::zeros((rows, cols)),
            transform,
        })
    }

    /// Create a raster from existing row-major data
    pub fn from_vec(data: Vec<T>, rows: usize, cols: usize, transform: GeoTransform) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(Error::InvalidDimensions {
                width: cols,
                height: rows,
            });
        }
        let array = Array2::from_shape_vec((rows, cols), data)
            .map_err(|e| Error::Other(e.to_string()))?;
        Ok(Self {
            data: array,
            transform,
        })
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    /// Dimensions as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Get value at (row, col)
    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        self.data
            .get((row, col))
            .copied()
            .ok_or(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            })
    }

    /// Get value at (row, col) without bounds checking
    ///
    /// # Safety
    /// Caller must ensure row < self.rows() and col < self.cols()
    pub unsafe fn get_unchecked(&self, row: usize, col: usize) -> T {
        unsafe { *self.data.uget((row, col)) }
    }

    /// Set value at (row, col)
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        if row >= self.rows() || col >= self.cols() {
            return Err(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            });
        }
        self.data[(row, col)] = value;
        Ok(())
    }

    /// Set value at (row, col) without bounds checking
    ///
    /// # Safety
    /// Caller must ensure row < self.rows() and col < self.cols()
    pub unsafe fn set_unchecked(&mut self, row: usize, col: usize, value: T) {
        unsafe {
            *self.data.uget_mut((row, col)) = value;
        }
    }

    /// View of the underlying data
    pub fn view(&self) -> ArrayView2<'_, T> {
        self.data.view()
    }

    /// Mutable reference to the underlying array
    pub fn data_mut(&mut self) -> &mut Array2<T> {
        &mut self.data
    }

    /// The geotransform
    pub fn transform(&self) -> &GeoTransform {
        &self.transform
    }

    /// Cell size (assumes square cells)
    pub fn cell_size(&self) -> f64 {
        self.transform.cell_size()
    }

    /// Count of non-background cells
    pub fn occupied(&self) -> usize {
        self.data.iter().filter(|v| !v.is_background()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_zeroed() {
        let r: Raster<i32> = Raster::new(4, 6, GeoTransform::default()).unwrap();
        assert_eq!(r.shape(), (4, 6));
        assert_eq!(r.occupied(), 0);
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert!(Raster::<i32>::new(0, 5, GeoTransform::default()).is_err());
    }

    #[test]
    fn test_get_set() {
        let mut r: Raster<i32> = Raster::new(3, 3, GeoTransform::default()).unwrap();
        r.set(1, 2, 7).unwrap();
        assert_eq!(r.get(1, 2).unwrap(), 7);
        assert!(r.get(3, 0).is_err());
        assert_eq!(r.occupied(), 1);
    }

    #[test]
    fn test_from_vec_length_mismatch() {
        let res = Raster::from_vec(vec![1i32; 5], 2, 3, GeoTransform::default());
        assert!(res.is_err());
    }
}
