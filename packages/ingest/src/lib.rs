#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Crime incident loading.
//!
//! Reads a delimited incident export (the City of Chicago crimes CSV or
//! anything with the same headers) into [`Incident`] records. The header
//! row is validated once into a [`ColumnLayout`]; per-row parsing failures
//! degrade to `None` fields instead of rejecting the row.

pub mod discovery;
pub mod parsing;
pub mod progress;
pub mod schema;

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::StringRecord;
use safe_walk_crime_models::Incident;
use thiserror::Error;

use crate::parsing::{non_blank, parse_lat_lng_str, parse_timestamp};
use crate::progress::ProgressCallback;
use crate::schema::ColumnLayout;

/// How often, in rows, progress is reported while reading.
const PROGRESS_INTERVAL: u64 = 50_000;

/// Errors that can occur while loading incidents.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed delimited data.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required header is absent.
    #[error("Missing required column '{column}'")]
    MissingColumn {
        /// The header that was not found.
        column: String,
    },

    /// No dataset file exists at any of the tried locations.
    #[error("Could not find a crimes dataset; tried: {}", display_paths(.tried))]
    NotFound {
        /// Every path checked, in order.
        tried: Vec<PathBuf>,
    },
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Options controlling how an export is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Field delimiter byte (defaults to `,`).
    delimiter: u8,
    /// Optional cap on the number of records to parse.
    max_records: Option<u64>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadOptions {
    /// Comma-delimited, no record limit.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            delimiter: b',',
            max_records: None,
        }
    }

    /// Sets the field delimiter (e.g. `b'\t'` for TSV files).
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Limits the number of records that will be parsed.
    #[must_use]
    pub const fn with_max_records(mut self, max: Option<u64>) -> Self {
        self.max_records = max;
        self
    }
}

/// Loads every incident from the file at `path`.
///
/// Progress is reported in bytes read against the file size.
///
/// # Errors
///
/// Returns [`IngestError`] if the file cannot be opened, the header row
/// lacks a required column, or the data is not valid delimited text.
pub fn load_incidents(
    path: &Path,
    options: LoadOptions,
    progress: &dyn ProgressCallback,
) -> Result<Vec<Incident>, IngestError> {
    let file = File::open(path)?;
    let size = file.metadata()?.len();

    progress.set_message(format!("Loading {}", path.display()));
    progress.set_total(size);

    let incidents = read_incidents(file, options, progress)?;

    progress.set_position(size);
    progress.finish(format!("Loaded {} incidents", incidents.len()));

    Ok(incidents)
}

/// Reads incidents from any reader holding delimited text with a header
/// row.
///
/// # Errors
///
/// Returns [`IngestError::MissingColumn`] if a required header is absent,
/// or [`IngestError::Csv`] if the data is malformed.
pub fn read_incidents<R: Read>(
    reader: R,
    options: LoadOptions,
    progress: &dyn ProgressCallback,
) -> Result<Vec<Incident>, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .flexible(true)
        .from_reader(reader);

    let layout = ColumnLayout::from_headers(reader.headers()?)?;
    if !layout.has_coordinates() {
        log::warn!("No Latitude/Longitude columns found, incidents will have no location");
    }

    let mut incidents = Vec::new();
    let mut undated = 0_u64;
    let mut record = StringRecord::new();

    loop {
        if let Some(max) = options.max_records
            && incidents.len() as u64 >= max
        {
            log::info!("Reached max_records limit ({max}), stopping parse");
            break;
        }
        if !reader.read_record(&mut record)? {
            break;
        }

        let incident = to_incident(&record, &layout);
        if !incident.is_dated() {
            undated += 1;
        }
        incidents.push(incident);

        let count = incidents.len() as u64;
        if count % PROGRESS_INTERVAL == 0 {
            progress.set_position(reader.position().byte());
        }
    }

    log::info!(
        "Parsed {} incidents ({undated} with unparseable timestamps)",
        incidents.len()
    );

    Ok(incidents)
}

fn to_incident(record: &StringRecord, layout: &ColumnLayout) -> Incident {
    let cell = |idx: Option<usize>| idx.and_then(|i| record.get(i));

    let occurred_at = record.get(layout.date).and_then(parse_timestamp);
    let primary_type = record
        .get(layout.primary_type)
        .unwrap_or_default()
        .trim()
        .to_string();

    Incident {
        case_number: non_blank(cell(layout.case_number)).or_else(|| non_blank(cell(layout.id))),
        occurred_at,
        primary_type,
        description: non_blank(cell(layout.description)),
        block: non_blank(cell(layout.block)),
        location_description: non_blank(cell(layout.location_description)),
        location: parse_lat_lng_str(cell(layout.latitude), cell(layout.longitude)),
    }
}
