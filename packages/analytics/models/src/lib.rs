#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Analytics input and result types.
//!
//! Defines the filter criteria that narrow an incident set, the yearly
//! aggregate derived from it, the outcome of a linear trend projection and
//! the summary shapes handed to the presentation layer. Every result type
//! is a plain serde structure so it can be printed or serialized as JSON
//! without further conversion.

use std::collections::{BTreeMap, BTreeSet};

use safe_walk_crime_models::{Coordinates, DayOfWeek};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Number of trailing years fitted by the trend projector unless configured
/// otherwise.
pub const DEFAULT_WINDOW_SIZE: usize = 5;

/// Inclusive year range plus an optional set of allowed crime types.
///
/// An empty `crime_types` set disables type filtering entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    /// First year to include.
    pub min_year: i32,
    /// Last year to include.
    pub max_year: i32,
    /// Allowed crime-type labels. Empty means "all types".
    #[serde(default)]
    pub crime_types: BTreeSet<String>,
}

impl FilterCriteria {
    /// Creates criteria for `[min_year, max_year]` with no type filtering.
    #[must_use]
    pub const fn new(min_year: i32, max_year: i32) -> Self {
        Self {
            min_year,
            max_year,
            crime_types: BTreeSet::new(),
        }
    }

    /// Restricts the criteria to the given crime-type labels.
    #[must_use]
    pub fn with_crime_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.crime_types = types.into_iter().map(Into::into).collect();
        self
    }

    /// Returns `true` if no year can satisfy the range.
    #[must_use]
    pub const fn is_empty_range(&self) -> bool {
        self.min_year > self.max_year
    }

    /// Returns `true` if `year` lies within the inclusive range.
    #[must_use]
    pub const fn contains_year(&self, year: i32) -> bool {
        year >= self.min_year && year <= self.max_year
    }

    /// Returns `true` if the crime-type filter admits `label`.
    #[must_use]
    pub fn allows_type(&self, label: &str) -> bool {
        self.crime_types.is_empty() || self.crime_types.contains(label)
    }
}

/// Whether incidents with unknown timestamps count toward totals that are
/// not indexed by time (incident totals, type distributions, map points).
///
/// Time-indexed results (yearly and monthly series, weekday and hour
/// breakdowns) never include them regardless of this setting.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum UndatedPolicy {
    /// Undated incidents that pass the type filter are counted in totals.
    #[default]
    IncludeInTotals,
    /// Undated incidents are dropped everywhere.
    ExcludeFromTotals,
}

impl UndatedPolicy {
    /// Returns `true` if undated incidents participate in totals.
    #[must_use]
    pub const fn includes_undated(self) -> bool {
        matches!(self, Self::IncludeInTotals)
    }
}

/// One `(year, count)` point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearCount {
    /// Calendar year.
    pub year: i32,
    /// Number of incidents in that year.
    pub count: u64,
}

/// Mapping from calendar year to incident count.
///
/// Holds exactly one entry per distinct year present in the incidents it
/// was built from. Iteration is always in ascending year order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct YearlyAggregate(BTreeMap<i32, u64>);

impl YearlyAggregate {
    /// Creates an empty aggregate.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Adds one incident to `year`.
    pub fn record(&mut self, year: i32) {
        *self.0.entry(year).or_insert(0) += 1;
    }

    /// Count for `year`, or `0` if the year is absent.
    #[must_use]
    pub fn get(&self, year: i32) -> u64 {
        self.0.get(&year).copied().unwrap_or(0)
    }

    /// Number of distinct years.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no year has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all yearly counts.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    /// Most recent year present.
    #[must_use]
    pub fn latest_year(&self) -> Option<i32> {
        self.0.keys().next_back().copied()
    }

    /// Iterates `(year, count)` in ascending year order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = YearCount> + '_ {
        self.0
            .iter()
            .map(|(&year, &count)| YearCount { year, count })
    }

    /// Returns the aggregate as an ascending series.
    #[must_use]
    pub fn to_series(&self) -> Vec<YearCount> {
        self.iter().collect()
    }
}

impl FromIterator<YearCount> for YearlyAggregate {
    fn from_iter<T: IntoIterator<Item = YearCount>>(iter: T) -> Self {
        let mut map = BTreeMap::new();
        for point in iter {
            *map.entry(point.year).or_insert(0) += point.count;
        }
        Self(map)
    }
}

/// A fitted line evaluated at a target year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedTrend {
    /// Year the line was evaluated at.
    pub target_year: i32,
    /// Fitted change in incidents per year.
    pub slope: f64,
    /// Fitted count at year zero.
    pub intercept: f64,
    /// Unrounded, unclamped value of the line at `target_year`.
    pub raw_value: f64,
    /// Rounded value, floored at zero.
    pub projected_count: u64,
    /// The trailing points the line was fitted to.
    pub window: Vec<YearCount>,
}

/// Outcome of a linear trend projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "status",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum TrendProjection {
    /// A line was fitted and evaluated.
    Projected(ProjectedTrend),
    /// Fewer distinct years than the window requires.
    InsufficientData {
        /// Distinct years available.
        available: usize,
        /// Distinct years the window requires.
        required: usize,
    },
    /// The aggregate was empty.
    NoData,
}

impl TrendProjection {
    /// The projected count, if a projection was made.
    #[must_use]
    pub const fn projected_count(&self) -> Option<u64> {
        match self {
            Self::Projected(trend) => Some(trend.projected_count),
            Self::InsufficientData { .. } | Self::NoData => None,
        }
    }
}

/// A projected count with a hypothetical percentage reduction applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReductionScenario {
    /// Assumed reduction, `0..=100`.
    pub reduction_percent: f64,
    /// Count before the reduction.
    pub baseline: u64,
    /// Count after the reduction.
    pub reduced: u64,
}

/// Settings for one run of the filter, aggregate and projection pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineConfig {
    /// Number of trailing years fitted by the projector.
    pub window_size: usize,
    /// Year to evaluate the trend at. Defaults to the year after the latest
    /// observed one.
    pub target_year: Option<i32>,
    /// Filter applied before aggregation.
    pub criteria: FilterCriteria,
    /// Treatment of incidents without a parseable timestamp.
    pub undated_policy: UndatedPolicy,
}

impl PipelineConfig {
    /// Creates a config with the default window and policy.
    #[must_use]
    pub const fn new(criteria: FilterCriteria) -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            target_year: None,
            criteria,
            undated_policy: UndatedPolicy::IncludeInTotals,
        }
    }
}

/// Count of incidents for a single crime type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    /// Crime-type label.
    pub category: String,
    /// Number of incidents.
    pub count: u64,
}

/// A time-series data point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesPoint {
    /// Period label (e.g. `"2025-01"`).
    pub period: String,
    /// Total incident count in this period.
    pub count: u64,
}

/// Incident count for one day of the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayCount {
    /// Day of the week.
    pub day: DayOfWeek,
    /// Number of incidents.
    pub count: u64,
}

/// Incident counts by day of week and hour of day.
///
/// `counts[d][h]` holds the count for `DayOfWeek::all()[d]` at hour `h`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayHourHeatmap {
    /// Row labels, Monday first.
    pub days: Vec<DayOfWeek>,
    /// Seven rows of 24 hourly counts.
    pub counts: Vec<Vec<u64>>,
}

/// A located incident for map rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapPoint {
    /// Location of the incident.
    #[serde(flatten)]
    pub location: Coordinates,
    /// Crime-type label.
    pub primary_type: String,
    /// Year of the incident, if known.
    pub year: Option<i32>,
}

/// Headline metrics for a filtered incident set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    /// Incidents counted under the active [`UndatedPolicy`].
    pub total_incidents: u64,
    /// Incidents with a parsed timestamp inside the year range.
    pub dated_incidents: u64,
    /// Incidents without a parsed timestamp that passed the type filter.
    pub undated_incidents: u64,
    /// First year of the filter range.
    pub min_year: i32,
    /// Last year of the filter range.
    pub max_year: i32,
    /// Most frequent crime type.
    pub most_common_type: Option<String>,
    /// Number of distinct crime types.
    pub unique_types: usize,
    /// Most frequent day of the week.
    pub most_common_day: Option<DayOfWeek>,
}

/// Observed extent of a dataset, used to seed filter choices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetBounds {
    /// Earliest year with a parsed timestamp.
    pub min_year: Option<i32>,
    /// Latest year with a parsed timestamp.
    pub max_year: Option<i32>,
    /// Distinct non-blank crime-type labels, sorted.
    pub crime_types: Vec<String>,
    /// Total incidents in the dataset.
    pub total_incidents: u64,
    /// Incidents whose timestamp could not be parsed.
    pub undated_incidents: u64,
}

impl DatasetBounds {
    /// Criteria covering the last `span` years up to the latest observed
    /// year, with no type filtering. The lower bound never goes below the
    /// earliest observed year; a negative span is treated as zero.
    ///
    /// Returns `None` if the dataset has no dated incidents.
    #[must_use]
    pub fn default_criteria(&self, span: i32) -> Option<FilterCriteria> {
        let (min, max) = (self.min_year?, self.max_year?);
        Some(FilterCriteria::new(max.saturating_sub(span.max(0)).max(min), max))
    }

    /// Criteria covering every observed year and type.
    #[must_use]
    pub fn full_criteria(&self) -> Option<FilterCriteria> {
        let (min, max) = (self.min_year?, self.max_year?);
        Some(FilterCriteria::new(min, max).with_crime_types(self.crime_types.iter().cloned()))
    }
}
