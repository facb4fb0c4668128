//! # Geometry File Format
//!
//! Reading and writing the plain-text tilted geometry table.
//!
//! Format: one record per line, whitespace separated, no header, no comments
//! ```text
//! <detector_id:u32> <drdz:f32> <slope:f32>
//! ```
//! Blank lines carry no record. Tokens past the third are ignored.

use std::io::Write;

use crate::data::{DetId, GeometryEntry, TiltedGeometry};
use crate::error::Result;

/// What to do with a line that is not a valid record
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MalformedLine {
    /// Skip the line, record it in the `LoadReport` and keep going
    #[default]
    Skip,
    /// Stop loading and return a parse error for the line
    Abort,
}

/// What to do when the geometry file cannot be opened or read
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MissingSource {
    /// Return the I/O failure to the caller
    #[default]
    Error,
    /// Continue with an empty table and flag `LoadReport::source_missing`
    Empty,
}

/// Loading policy for a geometry file
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadOptions {
    pub on_malformed: MalformedLine,
    pub missing_source: MissingSource,
}

impl LoadOptions {
    /// Abort on the first malformed line, error on a missing file
    pub fn strict() -> Self {
        Self {
            on_malformed: MalformedLine::Abort,
            missing_source: MissingSource::Error,
        }
    }
}

/// A line rejected during a `Skip` load
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line number
    pub line: usize,
    pub content: String,
    pub reason: String,
}

/// Summary of one `load` call
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Lines read from the source, blank ones included
    pub lines_read: usize,
    /// Records inserted (duplicates counted each time)
    pub records: usize,
    /// Records that replaced an earlier line for the same id
    pub duplicates: usize,
    pub skipped: Vec<SkippedLine>,
    /// Source could not be opened or read and the table was left empty
    pub source_missing: bool,
}

impl LoadReport {
    /// Distinct identifiers now in the table
    pub fn distinct_ids(&self) -> usize {
        self.records - self.duplicates
    }
}

/// Decode one raw line: drop the line ending, check UTF-8, and on the first
/// line drop a byte-order mark
pub fn decode_line(raw: &[u8], first_line: bool) -> std::result::Result<&str, String> {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    let line = std::str::from_utf8(raw).map_err(|_| "Line is not valid UTF-8".to_string())?;
    if first_line {
        Ok(line.strip_prefix('\u{feff}').unwrap_or(line))
    } else {
        Ok(line)
    }
}

/// Parse one line of a geometry file
///
/// Returns `Ok(None)` for a blank line and `Err(reason)` for a malformed one.
pub fn parse_record(line: &str) -> std::result::Result<Option<GeometryEntry>, String> {
    let mut tokens = line.split_whitespace();

    let Some(id_token) = tokens.next() else {
        return Ok(None);
    };
    let (Some(drdz_token), Some(slope_token)) = (tokens.next(), tokens.next()) else {
        let found = line.split_whitespace().count();
        return Err(format!("Expected 3 columns, got {}", found));
    };

    let id: u32 = id_token
        .parse()
        .map_err(|_| format!("Invalid detector id '{}'", id_token))?;
    let drdz = parse_factor(drdz_token, "drdz")?;
    let slope = parse_factor(slope_token, "slope")?;

    Ok(Some(GeometryEntry {
        id: DetId::new(id),
        drdz,
        slope,
    }))
}

fn parse_factor(token: &str, name: &str) -> std::result::Result<f32, String> {
    let value: f32 = token
        .parse()
        .map_err(|_| format!("Invalid {} '{}'", name, token))?;
    if !value.is_finite() {
        return Err(format!("{} '{}' is not finite", name, token));
    }
    Ok(value)
}

/// Write a table in the geometry file format, sorted by detector id
///
/// The output loads back into an identical table.
pub fn write_table<W: Write>(table: &TiltedGeometry, mut writer: W) -> Result<()> {
    for entry in table.entries() {
        writeln!(writer, "{} {} {}", entry.id, entry.drdz, entry.slope)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_well_formed() {
        let entry = parse_record("101 0.5 1.25").unwrap().unwrap();
        assert_eq!(entry.id, DetId::new(101));
        assert_eq!(entry.drdz, 0.5);
        assert_eq!(entry.slope, 1.25);
    }

    #[test]
    fn test_parse_tolerates_whitespace_and_extra_tokens() {
        let entry = parse_record("  \t202   -0.3\t0.0  extra 17 ").unwrap().unwrap();
        assert_eq!(entry.id, DetId::new(202));
        assert!((entry.drdz - -0.3).abs() < 1e-6);
        assert_eq!(entry.slope, 0.0);
    }

    #[test]
    fn test_parse_blank_line() {
        assert_eq!(parse_record(""), Ok(None));
        assert_eq!(parse_record("   \t "), Ok(None));
    }

    #[test]
    fn test_parse_too_few_columns() {
        let err = parse_record("101 0.5").unwrap_err();
        assert_eq!(err, "Expected 3 columns, got 2");
        assert!(parse_record("101").is_err());
    }

    #[test]
    fn test_parse_non_numeric() {
        assert!(parse_record("abc 0.5 1.0").unwrap_err().contains("detector id"));
        assert!(parse_record("101 x 1.0").unwrap_err().contains("drdz"));
        assert!(parse_record("101 0.5 y").unwrap_err().contains("slope"));
    }

    #[test]
    fn test_parse_rejects_out_of_range_id() {
        assert!(parse_record("-1 0.5 1.0").is_err());
        assert!(parse_record("4294967296 0.5 1.0").is_err());
        assert!(parse_record("4294967295 0.5 1.0").unwrap().is_some());
    }

    #[test]
    fn test_parse_rejects_non_finite() {
        assert!(parse_record("101 nan 1.0").is_err());
        assert!(parse_record("101 0.5 inf").is_err());
    }

    #[test]
    fn test_decode_line_endings() {
        assert_eq!(decode_line(b"101 0.5 1.25\r\n", false), Ok("101 0.5 1.25"));
        assert_eq!(decode_line(b"101 0.5 1.25\n", false), Ok("101 0.5 1.25"));
        assert_eq!(decode_line(b"101 0.5 1.25", false), Ok("101 0.5 1.25"));
    }

    #[test]
    fn test_decode_line_invalid_utf8() {
        let err = decode_line(b"\xff\xfe garbage\n", false).unwrap_err();
        assert!(err.contains("UTF-8"), "reason: {}", err);
    }

    #[test]
    fn test_decode_line_strips_bom_on_first_line_only() {
        let raw = "\u{feff}101 0.5 1.25\n".as_bytes();
        assert_eq!(decode_line(raw, true), Ok("101 0.5 1.25"));
        assert_eq!(decode_line(raw, false), Ok("\u{feff}101 0.5 1.25"));
    }

    #[test]
    fn test_write_table_sorted() {
        let table: TiltedGeometry = [
            GeometryEntry::new(202, -0.3, 0.0),
            GeometryEntry::new(101, 0.75, 1.1),
        ]
        .into_iter()
        .collect();

        let mut out = Vec::new();
        write_table(&table, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "101 0.75 1.1\n202 -0.3 0\n");
    }

    #[test]
    fn test_report_distinct_ids() {
        let report = LoadReport {
            records: 3,
            duplicates: 1,
            ..LoadReport::default()
        };
        assert_eq!(report.distinct_ids(), 2);
    }
}
