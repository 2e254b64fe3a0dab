#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filter, aggregation and trend projection over crime incidents.
//!
//! The pipeline has two stages. [`filter::filter_incidents`] narrows an
//! incident slice to a borrowed view and buckets it by year, and
//! [`trend::project_trend`] fits a least-squares line through the most
//! recent yearly counts. [`summary`] derives the remaining dashboard
//! metrics from the same filtered view.
//!
//! Every function here is pure: identical inputs always produce identical
//! outputs, and the source incidents are never modified.

pub mod filter;
pub mod summary;
pub mod trend;

use safe_walk_analytics_models::{PipelineConfig, TrendProjection, YearlyAggregate};
use safe_walk_crime_models::Incident;
use thiserror::Error;

use crate::filter::FilteredIncidents;

/// Errors that can occur during analytics operations.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// The projection window cannot determine a line.
    #[error("Invalid projection window {window}: at least 2 years are required")]
    InvalidWindow {
        /// The rejected window size.
        window: usize,
    },

    /// Reduction percentage outside `0..=100`.
    #[error("Invalid reduction {percent}%: expected a value between 0 and 100")]
    InvalidReduction {
        /// The rejected percentage.
        percent: f64,
    },
}

/// Output of one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput<'a> {
    /// Incidents that passed the filter.
    pub filtered: FilteredIncidents<'a>,
    /// Dated filtered incidents bucketed by year.
    pub yearly: YearlyAggregate,
    /// Trend projection over `yearly`.
    pub projection: TrendProjection,
}

/// Filters `incidents`, aggregates them by year and projects the trend.
///
/// An empty or too-short aggregate is not an error; it is reported through
/// [`TrendProjection::NoData`] or [`TrendProjection::InsufficientData`] and
/// the filtered view stays usable.
///
/// # Errors
///
/// Returns [`AnalyticsError::InvalidWindow`] if the configured window is
/// smaller than two years.
pub fn run_pipeline<'a>(
    incidents: &'a [Incident],
    config: &PipelineConfig,
) -> Result<PipelineOutput<'a>, AnalyticsError> {
    let filtered = filter::filter_incidents(incidents, &config.criteria);
    let yearly = filtered.yearly_aggregate();
    let projection = trend::project_trend(&yearly, config.window_size, config.target_year)?;

    log::debug!(
        "Pipeline: {} dated, {} undated, {} years, projection {:?}",
        filtered.dated().len(),
        filtered.undated().len(),
        yearly.len(),
        projection.projected_count()
    );

    Ok(PipelineOutput {
        filtered,
        yearly,
        projection,
    })
}
