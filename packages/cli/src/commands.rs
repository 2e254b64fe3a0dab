//! Command implementations shared by the flag-driven and interactive modes.

use safe_walk_analytics::filter::filter_incidents;
use safe_walk_analytics::trend::{apply_reduction, validate_reduction};
use safe_walk_analytics::{run_pipeline, summary};
use safe_walk_analytics_models::{DatasetBounds, PipelineConfig};
use safe_walk_crime_models::Incident;

use crate::output::{self, HeatmapReport, TrendReport};

type CommandResult = Result<(), Box<dyn std::error::Error>>;

pub fn overview(incidents: &[Incident], config: &PipelineConfig, json: bool) -> CommandResult {
    let filtered = filter_incidents(incidents, &config.criteria);
    let overview = summary::overview(&filtered, &config.criteria, config.undated_policy);

    if json {
        output::print_json(&overview)?;
    } else {
        output::print_overview(&overview);
    }
    Ok(())
}

/// Prints the yearly series and its projection. The reduction is checked
/// up front but only applied when a projection was made.
pub fn trend(
    incidents: &[Incident],
    config: &PipelineConfig,
    reduction_percent: Option<f64>,
    json: bool,
) -> CommandResult {
    if let Some(percent) = reduction_percent {
        validate_reduction(percent)?;
    }

    let result = run_pipeline(incidents, config)?;

    let reduction = match (reduction_percent, result.projection.projected_count()) {
        (Some(percent), Some(baseline)) => Some(apply_reduction(baseline, percent)?),
        _ => None,
    };

    let report = TrendReport {
        yearly: result.yearly.to_series(),
        projection: result.projection,
        reduction,
    };

    if json {
        output::print_json(&report)?;
    } else {
        output::print_trend(&report);
    }
    Ok(())
}

pub fn top_types(
    incidents: &[Incident],
    config: &PipelineConfig,
    limit: usize,
    json: bool,
) -> CommandResult {
    let filtered = filter_incidents(incidents, &config.criteria);
    let types = summary::top_crime_types(&filtered, config.undated_policy, limit);

    if json {
        output::print_json(&types)?;
    } else {
        output::print_types(&types);
    }
    Ok(())
}

pub fn heatmap(incidents: &[Incident], config: &PipelineConfig, json: bool) -> CommandResult {
    let filtered = filter_incidents(incidents, &config.criteria);
    let report = HeatmapReport {
        days: summary::day_of_week_counts(&filtered),
        heatmap: summary::day_hour_heatmap(&filtered),
    };

    if json {
        output::print_json(&report)?;
    } else {
        output::print_heatmap(&report);
    }
    Ok(())
}

pub fn monthly(incidents: &[Incident], config: &PipelineConfig, json: bool) -> CommandResult {
    let filtered = filter_incidents(incidents, &config.criteria);
    let points = summary::monthly_counts(&filtered);

    if json {
        output::print_json(&points)?;
    } else {
        output::print_monthly(&points);
    }
    Ok(())
}

pub fn map(
    incidents: &[Incident],
    config: &PipelineConfig,
    limit: usize,
    json: bool,
) -> CommandResult {
    let filtered = filter_incidents(incidents, &config.criteria);
    let points = summary::map_points(&filtered, config.undated_policy, limit);

    if json {
        output::print_json(&points)?;
    } else {
        output::print_map(&points)?;
    }
    Ok(())
}

pub fn bounds(bounds: &DatasetBounds, json: bool) -> CommandResult {
    if json {
        output::print_json(bounds)?;
    } else {
        output::print_bounds(bounds);
    }
    Ok(())
}
