//! # Tilted Geometry
//!
//! Per-sensor correction factors for tilted detector modules.
//!
//! Each detector id maps to a tilt ratio (`drdz`) and a `slope`. Lookups of
//! unknown ids return `0.0`, meaning "no correction". Use [`TiltedGeometry::get`]
//! when a stored zero must be told apart from a missing id.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, info_span, warn};

use crate::data::DetId;
use crate::error::{GeometryError, Result};
use crate::io::geometry_file::{
    decode_line, parse_record, LoadOptions, LoadReport, MalformedLine, MissingSource, SkippedLine,
};

/// One row of the geometry table
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeometryEntry {
    pub id: DetId,
    pub drdz: f32,
    pub slope: f32,
}

impl GeometryEntry {
    pub fn new(id: u32, drdz: f32, slope: f32) -> Self {
        Self {
            id: DetId::new(id),
            drdz,
            slope,
        }
    }
}

/// Table lifecycle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TableState {
    /// Never loaded
    #[default]
    Empty,
    /// At least one `load` call has run, whatever its input
    Loaded,
}

/// Lookup table from detector id to tilt corrections
///
/// Built once, then read from any number of threads. `load` takes `&mut self`,
/// so a reload cannot race with lookups on the same table; to reload under
/// concurrent readers, build a new table and swap an `Arc`.
#[derive(Clone, Debug, Default)]
pub struct TiltedGeometry {
    /// (drdz, slope) per detector
    corrections: HashMap<DetId, (f32, f32)>,
    state: TableState,
}

impl TiltedGeometry {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a geometry file with the default policy
    ///
    /// Malformed lines are skipped; a missing file is an error.
    pub fn from_file(path: &Path) -> Result<Self> {
        Self::from_file_with_options(path, &LoadOptions::default())
    }

    /// Load a geometry file with an explicit policy
    pub fn from_file_with_options(path: &Path, options: &LoadOptions) -> Result<Self> {
        let mut table = Self::new();
        table.load(path, options)?;
        Ok(table)
    }

    /// Build a table from in-memory entries; later entries win on duplicate ids
    pub fn from_entries(entries: impl IntoIterator<Item = GeometryEntry>) -> Self {
        let mut table = Self::new();
        for entry in entries {
            table.insert(entry);
        }
        table.state = TableState::Loaded;
        table
    }

    /// Replace the table contents with the records in `path`
    ///
    /// The table is cleared first, never merged. On error it is left empty.
    /// With `MissingSource::Empty`, a file that cannot be opened or read leaves
    /// an empty table and sets `LoadReport::source_missing`; parse aborts are
    /// still returned.
    pub fn load(&mut self, path: &Path, options: &LoadOptions) -> Result<LoadReport> {
        info_span!("load_tilted_geometry", path = ?path).in_scope(|| {
            self.reset();
            let degrade = options.missing_source == MissingSource::Empty;

            let file = match File::open(path) {
                Ok(file) => file,
                Err(err) if degrade => return Ok(self.unavailable(path, &err)),
                Err(err) => return Err(GeometryError::open(path, err)),
            };

            match self.load_from_reader(BufReader::new(file), options.on_malformed) {
                Err(GeometryError::Io(err)) if degrade => Ok(self.unavailable(path, &err)),
                result => result,
            }
        })
    }

    /// Empty table for a source that could not be read
    fn unavailable(&mut self, path: &Path, err: &std::io::Error) -> LoadReport {
        warn!(
            path = ?path,
            error = %err,
            "Geometry file unavailable, continuing with an empty table"
        );
        self.reset();
        LoadReport {
            source_missing: true,
            ..LoadReport::default()
        }
    }

    /// Replace the table contents with the records read from `reader`
    pub fn load_from_reader<R: BufRead>(
        &mut self,
        reader: R,
        on_malformed: MalformedLine,
    ) -> Result<LoadReport> {
        self.reset();
        let result = self.ingest(reader, on_malformed);
        match &result {
            Ok(report) => debug!(
                lines = report.lines_read,
                detectors = self.len(),
                duplicates = report.duplicates,
                skipped = report.skipped.len(),
                "Loaded tilted geometry"
            ),
            Err(_) => self.corrections.clear(),
        }
        result
    }

    fn ingest<R: BufRead>(
        &mut self,
        mut reader: R,
        on_malformed: MalformedLine,
    ) -> Result<LoadReport> {
        let mut report = LoadReport::default();
        let mut buf = Vec::new();
        let mut line_num = 0;

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            line_num += 1;
            report.lines_read = line_num;

            match decode_line(&buf, line_num == 1).and_then(parse_record) {
                Ok(Some(entry)) => {
                    if self.insert(entry) {
                        report.duplicates += 1;
                    }
                    report.records += 1;
                }
                Ok(None) => {}
                Err(reason) => {
                    let content = String::from_utf8_lossy(&buf).trim().to_string();
                    match on_malformed {
                        MalformedLine::Abort => {
                            return Err(GeometryError::parse(
                                line_num,
                                format!("{} in '{}'", reason, content),
                            ));
                        }
                        MalformedLine::Skip => {
                            warn!(
                                line = line_num,
                                content = content.as_str(),
                                reason = reason.as_str(),
                                "Skipping malformed geometry line"
                            );
                            report.skipped.push(SkippedLine {
                                line: line_num,
                                content,
                                reason,
                            });
                        }
                    }
                }
            }
        }

        Ok(report)
    }

    /// Insert or overwrite; returns true if the id was already present
    fn insert(&mut self, entry: GeometryEntry) -> bool {
        self.corrections
            .insert(entry.id, (entry.drdz, entry.slope))
            .is_some()
    }

    fn reset(&mut self) {
        self.corrections.clear();
        self.state = TableState::Loaded;
    }

    /// Tilt ratio for `id`, or `0.0` if unknown
    #[inline]
    pub fn drdz(&self, id: u32) -> f32 {
        self.corrections
            .get(&DetId::new(id))
            .map_or(0.0, |&(drdz, _)| drdz)
    }

    /// Slope for `id`, or `0.0` if unknown
    #[inline]
    pub fn slope(&self, id: u32) -> f32 {
        self.corrections
            .get(&DetId::new(id))
            .map_or(0.0, |&(_, slope)| slope)
    }

    /// Both factors for `id`, or `None` if it was never loaded
    pub fn get(&self, id: u32) -> Option<GeometryEntry> {
        let id = DetId::new(id);
        self.corrections
            .get(&id)
            .map(|&(drdz, slope)| GeometryEntry { id, drdz, slope })
    }

    pub fn contains(&self, id: u32) -> bool {
        self.corrections.contains_key(&DetId::new(id))
    }

    /// Number of detectors in the table
    pub fn len(&self) -> usize {
        self.corrections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.corrections.is_empty()
    }

    pub fn state(&self) -> TableState {
        self.state
    }

    /// All entries sorted by detector id
    pub fn entries(&self) -> Vec<GeometryEntry> {
        let mut entries: Vec<GeometryEntry> = self
            .corrections
            .iter()
            .map(|(&id, &(drdz, slope))| GeometryEntry { id, drdz, slope })
            .collect();
        entries.sort_unstable_by_key(|e| e.id);
        entries
    }
}

impl FromIterator<GeometryEntry> for TiltedGeometry {
    fn from_iter<I: IntoIterator<Item = GeometryEntry>>(iter: I) -> Self {
        Self::from_entries(iter)
    }
}
