//! # Data Module
//!
//! In-memory representation of the per-sensor geometry corrections.
//!
//! - **Zero-cost newtype:** `DetId` keeps detector identifiers apart from
//!   other integers at compile time with no runtime overhead.
//! - **One map, two attributes:** each identifier owns both of its correction
//!   factors, so the drdz and slope key sets can never drift apart.

pub mod tilted_geometry;

// Re-export commonly used types
pub use tilted_geometry::{GeometryEntry, TableState, TiltedGeometry};

/// Detector module identifier (raw 32-bit id from the geometry file)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DetId(pub u32);

impl DetId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl From<u32> for DetId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<DetId> for u32 {
    fn from(id: DetId) -> u32 {
        id.0
    }
}

impl std::fmt::Display for DetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
