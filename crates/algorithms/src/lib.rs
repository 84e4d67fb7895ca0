//! # BorderAlign Algorithms
//!
//! Gap resolution and raster extension for polygon border alignment.
//!
//! ## Module map
//!
//! - **vector**: planar overlay, spatial joins, dissolve, buffer
//! - **raster**: label rasterization, distance allocation, vectorization
//! - **pipeline**: the alignment pipeline itself: gap detection,
//!   classification, raster extension, filling, and the multi-border
//!   orchestrator

pub mod maybe_rayon;
pub mod pipeline;
pub mod raster;
pub mod vector;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::pipeline::{
        align_to_borders, AlignOutcome, AlignParams, Notice, PipelineParams,
    };
    pub use borderalign_core::prelude::*;
}
