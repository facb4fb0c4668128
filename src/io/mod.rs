//! # I/O Module
//!
//! File reading/writing boundaries. Converts between the geometry text format
//! and the in-memory `TiltedGeometry` table.

pub mod geometry_file;

pub use geometry_file::{
    decode_line, parse_record, write_table, LoadOptions, LoadReport, MalformedLine, MissingSource,
    SkippedLine,
};
