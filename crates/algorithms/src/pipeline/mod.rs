//! The alignment pipeline
//!
//! Stage order within one region is fixed: detect gaps, classify them,
//! raster-extend the complex ones, fill and dissolve. The orchestrator in
//! [`align`] wires regions, parallelism and attribute regeneration around
//! those stages. Every stage consumes owned feature sets and returns new
//! ones; nothing is mutated in place and no stage leaves state behind.

mod align;
mod classify;
mod extend;
mod fill;
mod gaps;

pub use align::{align_to_borders, AlignOutcome, AlignParams};
pub use classify::{classify_gaps, Classified};
pub use extend::extend_complex_gaps;
pub use fill::fill_and_dissolve;
pub use gaps::detect_gaps;

use std::fmt;

/// Tuning parameters for the raster extension engine.
#[derive(Debug, Clone, Copy)]
pub struct PipelineParams {
    /// Raster cell size, in data units. Must be small relative to the
    /// narrowest gap the extension should resolve.
    pub cell_size: f64,
    /// How far beyond the border the working extent reaches, in data units.
    pub buffer_distance: f64,
    /// Vertices per circle when buffering the border outward.
    pub buffer_segments: usize,
}

impl Default for PipelineParams {
    fn default() -> Self {
        // 0.005 degree cells and a 20 km margin suit national-scale
        // administrative layers in geographic coordinates.
        Self {
            cell_size: 0.005,
            buffer_distance: 20_000.0,
            buffer_segments: 16,
        }
    }
}

/// Non-fatal conditions surfaced by a pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// The region had no gaps; its sub-polygons pass through unchanged.
    NoGaps { region: String },
    /// A gap touches no sub-polygon at all; it is left unfilled.
    UnassignedGap { region: String, area: f64 },
    /// A complex gap's fill came back empty: the cell size is coarser than
    /// the gap.
    ResolutionTooCoarse { region: String, gap_area: f64 },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::NoGaps { region } => {
                write!(f, "no gaps were found in region '{region}'")
            }
            Notice::UnassignedGap { region, area } => write!(
                f,
                "region '{region}': gap of area {area:.6} touches no sub-polygon; left unfilled"
            ),
            Notice::ResolutionTooCoarse { region, gap_area } => write!(
                f,
                "region '{region}': complex gap of area {gap_area:.6} is narrower than the \
                 raster cell size and received no fill"
            ),
        }
    }
}
