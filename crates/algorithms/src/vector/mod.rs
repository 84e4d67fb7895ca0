//! Vector engine: the planar geometry services the pipeline calls
//!
//! - Overlay: no-gaps union, clip, coverage
//! - Join: touch-predicate spatial join, largest-overlap matching
//! - Dissolve: merge-by-key, multipart explosion
//! - Buffer: outward polygon offset for the raster working extent

mod buffer;
mod dissolve;
mod join;
mod overlay;

pub use buffer::buffer_multipolygon;
pub use dissolve::{dissolve_by_key, explode};
pub use join::{largest_overlap, touch_counts, touches};
pub use overlay::{clip, coverage, union_no_gaps, validate};
pub(crate) use overlay::SLIVER_AREA;
