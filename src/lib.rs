//! # Tilted Geometry Library Root
//!
//! ## Role
//! Per-sensor geometric corrections for track reconstruction: a lookup table
//! from detector id to tilt ratio (`drdz`) and slope, loaded from a plain-text
//! geometry file.
//!
//! There is no shared global table. The owning pipeline builds a
//! `TiltedGeometry` and hands a reference (or an `Arc`) to each stage.
//!
//! ## Module Structure
//! ```text
//! tilt_geometry
//! ├── config  # CLI arguments for the tiltgeo binary
//! ├── data    # DetId and the TiltedGeometry table
//! ├── error   # GeometryError and Result
//! └── io      # Geometry file parsing and writing
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod io;

// Re-export commonly used types
pub use config::Config;
pub use data::{DetId, GeometryEntry, TableState, TiltedGeometry};
pub use error::{GeometryError, Result};
pub use io::geometry_file::{LoadOptions, LoadReport, MalformedLine, MissingSource, SkippedLine};
