//! Raster data structures
//!
//! The raster grid is an ephemeral structure inside the extension engine:
//! built per complex-gap batch, discarded afterwards. It never appears in
//! the pipeline's persistent data model.

mod element;
mod geotransform;
mod grid;

pub use element::RasterElement;
pub use geotransform::GeoTransform;
pub use grid::Raster;
