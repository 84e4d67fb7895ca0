//! Feature I/O
//!
//! The pipeline consumes and produces polygon feature collections; the only
//! on-disk format at this boundary is GeoJSON.

mod geojson_io;

pub use geojson_io::{from_geojson_str, read_geojson, to_geojson_string, write_geojson};
