//! Raster engine: rasterization, distance allocation, vectorization
//!
//! These three operations are the discrete core of the extension engine:
//! polygons become a label grid, the grid is flooded so every cell holds its
//! nearest label, and the labeled regions become polygons again.

mod allocate;
mod rasterize;
mod vectorize;

pub use allocate::distance_allocation;
pub use rasterize::rasterize_labels;
pub use vectorize::vectorize_labels;
