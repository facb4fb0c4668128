//! # Centralized Error Handling
//!
//! Unified error types for the entire crate using `thiserror`.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for tilted geometry operations
#[derive(Error, Debug)]
pub enum GeometryError {
    /// I/O errors (permission denied, read failures)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Geometry file does not exist
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Malformed geometry record
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Configuration errors (invalid CLI arguments)
    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Type alias for Results using GeometryError
pub type Result<T> = std::result::Result<T, GeometryError>;

impl GeometryError {
    /// Create a parse error
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Map an open failure to `FileNotFound` when the path is missing
    pub(crate) fn open(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound { path: path.into() }
        } else {
            Self::Io(err)
        }
    }
}
