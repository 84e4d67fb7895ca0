//! Error types for BorderAlign

use thiserror::Error;

/// Main error type for BorderAlign operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid geometry on feature '{key}': {reason}")]
    InvalidGeometry { key: String, reason: String },

    #[error("field '{field}' missing or empty on feature '{key}'")]
    MissingField { field: String, key: String },

    #[error("attribute join mismatch: key '{key}' present on only one side of the join")]
    AttributeJoinMismatch { key: String },

    #[error("invalid raster dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("index out of bounds: ({row}, {col}) in raster of size ({rows}, {cols})")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("region '{name}' failed: {source}")]
    Region {
        name: String,
        #[source]
        source: Box<Error>,
    },

    #[error("GeoJSON error: {0}")]
    GeoJson(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Wrap an error with the name of the region whose pipeline produced it.
    pub fn in_region(self, name: impl Into<String>) -> Self {
        Error::Region {
            name: name.into(),
            source: Box::new(self),
        }
    }
}

impl From<geojson::Error> for Error {
    fn from(e: geojson::Error) -> Self {
        Error::GeoJson(e.to_string())
    }
}

/// Result type alias for BorderAlign operations
pub type Result<T> = std::result::Result<T, Error>;
