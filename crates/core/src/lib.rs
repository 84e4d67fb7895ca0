//! # BorderAlign Core
//!
//! Core types and I/O for the BorderAlign polygon alignment pipeline.
//!
//! This crate provides:
//! - `Feature` / `FeatureCollection`: polygon features with attribute records
//! - `AttributeTable`: keyed attribute export and join-by-key
//! - `Raster<T>`: generic raster grid used by the extension engine
//! - `GeoTransform`: affine georeferencing for rasters
//! - GeoJSON I/O for feature collections

pub mod error;
pub mod io;
pub mod raster;
pub mod vector;

pub use error::{Error, Result};
pub use raster::{GeoTransform, Raster, RasterElement};
pub use vector::{AttributeTable, AttributeValue, Feature, FeatureCollection};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::raster::{GeoTransform, Raster, RasterElement};
    pub use crate::vector::{AttributeTable, AttributeValue, Feature, FeatureCollection};
}
