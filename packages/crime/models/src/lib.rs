#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Crime incident record types.
//!
//! This crate defines the canonical [`Incident`] row used across the entire
//! Safe Walk toolchain. The ingest crate produces incidents from delimited
//! files and the analytics crate narrows and aggregates them. Incidents are
//! never mutated after ingestion.

use chrono::{Datelike as _, NaiveDateTime, Timelike as _};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Day of the week an incident occurred on, Monday first.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum DayOfWeek {
    /// Monday
    Monday,
    /// Tuesday
    Tuesday,
    /// Wednesday
    Wednesday,
    /// Thursday
    Thursday,
    /// Friday
    Friday,
    /// Saturday
    Saturday,
    /// Sunday
    Sunday,
}

impl DayOfWeek {
    /// Returns the zero-based position of this day, with Monday at `0`.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns all variants of this enum in calendar order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Monday,
            Self::Tuesday,
            Self::Wednesday,
            Self::Thursday,
            Self::Friday,
            Self::Saturday,
            Self::Sunday,
        ]
    }
}

impl From<chrono::Weekday> for DayOfWeek {
    fn from(value: chrono::Weekday) -> Self {
        match value {
            chrono::Weekday::Mon => Self::Monday,
            chrono::Weekday::Tue => Self::Tuesday,
            chrono::Weekday::Wed => Self::Wednesday,
            chrono::Weekday::Thu => Self::Thursday,
            chrono::Weekday::Fri => Self::Friday,
            chrono::Weekday::Sat => Self::Saturday,
            chrono::Weekday::Sun => Self::Sunday,
        }
    }
}

/// A latitude/longitude pair in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinates {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl Coordinates {
    /// Creates a coordinate pair, returning `None` if either component is
    /// zero or not finite.
    ///
    /// Source exports use `0.0` as a placeholder for "no location", so a
    /// zero component is treated the same as a missing one.
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return None;
        }
        if latitude == 0.0 || longitude == 0.0 {
            return None;
        }
        Some(Self {
            latitude,
            longitude,
        })
    }
}

/// A single recorded crime event.
///
/// `occurred_at` is `None` when the source timestamp could not be parsed.
/// Such incidents stay in the dataset but have no year, month, weekday or
/// hour, so they never appear in time-indexed results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    /// Source case number, if present.
    pub case_number: Option<String>,
    /// When the incident occurred, or `None` if the timestamp was unparseable.
    pub occurred_at: Option<NaiveDateTime>,
    /// Crime-type label as published by the source (e.g. `THEFT`).
    pub primary_type: String,
    /// Free-text offense description.
    pub description: Option<String>,
    /// Redacted block address.
    pub block: Option<String>,
    /// Type of premises (e.g. `STREET`, `RESIDENCE`).
    pub location_description: Option<String>,
    /// Geographic location, if the source provided a usable one.
    pub location: Option<Coordinates>,
}

impl Incident {
    /// Creates an incident with only the required fields populated.
    #[must_use]
    pub fn new(occurred_at: Option<NaiveDateTime>, primary_type: impl Into<String>) -> Self {
        Self {
            case_number: None,
            occurred_at,
            primary_type: primary_type.into(),
            description: None,
            block: None,
            location_description: None,
            location: None,
        }
    }

    /// Sets the geographic location.
    #[must_use]
    pub const fn with_location(mut self, location: Option<Coordinates>) -> Self {
        self.location = location;
        self
    }

    /// Sets the source case number.
    #[must_use]
    pub fn with_case_number(mut self, case_number: impl Into<String>) -> Self {
        self.case_number = Some(case_number.into());
        self
    }

    /// Returns `true` if the incident has a parsed timestamp.
    #[must_use]
    pub const fn is_dated(&self) -> bool {
        self.occurred_at.is_some()
    }

    /// Calendar year of the incident.
    #[must_use]
    pub fn year(&self) -> Option<i32> {
        self.occurred_at.map(|dt| dt.year())
    }

    /// Month label in `YYYY-MM` form.
    #[must_use]
    pub fn month_label(&self) -> Option<String> {
        self.occurred_at
            .map(|dt| format!("{:04}-{:02}", dt.year(), dt.month()))
    }

    /// Day of the week.
    #[must_use]
    pub fn day_of_week(&self) -> Option<DayOfWeek> {
        self.occurred_at.map(|dt| dt.weekday().into())
    }

    /// Hour of day, `0..=23`.
    #[must_use]
    pub fn hour(&self) -> Option<u32> {
        self.occurred_at.map(|dt| dt.hour())
    }
}
