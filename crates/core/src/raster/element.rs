//! Raster element trait for generic cell values

use num_traits::{NumCast, Zero};
use std::fmt::Debug;

/// Trait for types that can be stored in a raster cell.
///
/// `Zero` doubles as the background value: label grids use 0 for
/// "no polygon here".
pub trait RasterElement:
    Copy + Clone + Debug + PartialOrd + PartialEq + NumCast + Zero + Send + Sync + 'static
{
    /// Whether this cell holds the background value
    fn is_background(&self) -> bool {
        self.is_zero()
    }

    /// Convert self to f64
    fn to_f64(self) -> Option<f64> {
        NumCast::from(self)
    }
}

impl RasterElement for u8 {}
impl RasterElement for i32 {}
impl RasterElement for i64 {}
impl RasterElement for f64 {}
