//! # Configuration Logic
//!
//! CLI argument parsing and validation for the `tiltgeo` inspection tool.
//!
//! ## Example CLI
//! ```bash
//! tiltgeo --table tilted_geometry.txt 411309061 411309062
//! tiltgeo --table tilted_geometry.txt --strict --dump > normalized.txt
//! ```

use std::path::PathBuf;

use clap::Parser;

use crate::error::{GeometryError, Result};
use crate::io::geometry_file::{LoadOptions, MalformedLine, MissingSource};

#[derive(Parser, Debug, Clone)]
#[command(name = "tiltgeo", version, about = "Inspect a tilted geometry correction table")]
pub struct Config {
    /// Geometry file: `<detid> <drdz> <slope>` per line
    #[arg(long)]
    pub table: PathBuf,

    /// Abort on the first malformed line instead of skipping it
    #[arg(long)]
    pub strict: bool,

    /// Continue with an empty table if the file cannot be opened or read
    #[arg(long)]
    pub allow_missing: bool,

    /// Print the normalized table, sorted by detector id
    #[arg(long)]
    pub dump: bool,

    /// Print span timings to stderr
    #[arg(long)]
    pub profile: bool,

    /// Detector ids to look up
    pub ids: Vec<u32>,
}

impl Config {
    /// Parse command-line arguments and validate
    pub fn parse_and_validate() -> Result<Self> {
        let config = Self::parse();
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.table.as_os_str().is_empty() {
            return Err(GeometryError::config("--table must not be empty"));
        }
        Ok(())
    }

    /// Loading policy selected by the flags
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            on_malformed: if self.strict {
                MalformedLine::Abort
            } else {
                MalformedLine::Skip
            },
            missing_source: if self.allow_missing {
                MissingSource::Empty
            } else {
                MissingSource::Error
            },
        }
    }
}
