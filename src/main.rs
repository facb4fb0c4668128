//! # tiltgeo: Tilted Geometry Table Inspector
//!
//! Loads a geometry correction file and prints the corrections for the
//! requested detector ids.
//!
//! ## Usage
//! ```bash
//! # Look up two detectors
//! tiltgeo --table tilted_geometry.txt 411309061 411309062
//!
//! # Validate a file and write it back sorted by id
//! tiltgeo --table tilted_geometry.txt --strict --dump
//!
//! # With profiling output
//! tiltgeo --table tilted_geometry.txt --profile 411309061
//! ```

use std::io::{self, Write};
use std::time::Instant;

use tilt_geometry::io::write_table;
use tilt_geometry::{Config, Result, TiltedGeometry};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing subscriber; `--profile` adds span timings
fn init_tracing(profile: bool) {
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let span_events = if profile {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_span_events(span_events)
                .with_target(false)
                .with_timer(fmt::time::uptime()),
        )
        .init();
}

fn run() -> Result<()> {
    let start = Instant::now();

    let config = Config::parse_and_validate()?;
    init_tracing(config.profile);

    let mut table = TiltedGeometry::new();
    let report = table.load(&config.table, &config.load_options())?;

    if report.source_missing {
        eprintln!("Table: {:?} (unavailable, empty)", config.table);
    } else {
        eprintln!(
            "Table: {:?} ({} detectors, {} duplicates, {} skipped)",
            config.table,
            table.len(),
            report.duplicates,
            report.skipped.len()
        );
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if config.dump {
        write_table(&table, &mut out)?;
    }

    for &id in &config.ids {
        match table.get(id) {
            Some(entry) => writeln!(out, "{} drdz={} slope={}", id, entry.drdz, entry.slope)?,
            None => writeln!(out, "{} drdz=0 slope=0 (unknown)", id)?,
        }
    }

    if config.profile {
        eprintln!("Completed in {:.3}s", start.elapsed().as_secs_f64());
    }

    Ok(())
}
