//! Interactive explorer.
//!
//! Prompts for a year range and crime types using `dialoguer`, then lets
//! the user flip between views without re-loading the dataset.

use std::collections::BTreeSet;

use dialoguer::{Input, MultiSelect, Select};
use safe_walk_analytics_models::{DatasetBounds, FilterCriteria};
use safe_walk_crime_models::Incident;

use crate::commands;
use crate::config::{Overrides, SafeWalkConfig, resolve};

/// Crime types pre-selected when no type filter is configured.
const DEFAULT_SELECTED_TYPES: usize = 12;

/// Views available in the interactive menu.
enum View {
    Overview,
    Trend,
    TopTypes,
    Heatmap,
    Monthly,
    ChangeFilters,
    Quit,
}

impl View {
    const ALL: &[Self] = &[
        Self::Overview,
        Self::Trend,
        Self::TopTypes,
        Self::Heatmap,
        Self::Monthly,
        Self::ChangeFilters,
        Self::Quit,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Trend => "Yearly trend & projection",
            Self::TopTypes => "Top crime types",
            Self::Heatmap => "Day & hour breakdown",
            Self::Monthly => "Monthly counts",
            Self::ChangeFilters => "Change filters",
            Self::Quit => "Quit",
        }
    }
}

/// Runs the interactive menu loop over an already-loaded dataset.
///
/// # Errors
///
/// Returns an error if a prompt fails or a view cannot be rendered.
pub fn run(
    incidents: &[Incident],
    bounds: &DatasetBounds,
    config: &SafeWalkConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut pipeline = resolve(&Overrides::default(), config, bounds);
    pipeline.criteria = prompt_filters(&pipeline.criteria, bounds)?;

    let labels: Vec<&str> = View::ALL.iter().map(View::label).collect();

    loop {
        println!();
        let idx = Select::new()
            .with_prompt("What would you like to see?")
            .items(&labels)
            .default(0)
            .interact()?;
        println!();

        match View::ALL[idx] {
            View::Overview => commands::overview(incidents, &pipeline, false)?,
            View::Trend => commands::trend(
                incidents,
                &pipeline,
                config.reduction_percent,
                false,
            )?,
            View::TopTypes => {
                let limit: usize = Input::new()
                    .with_prompt("Show top N types")
                    .default(10)
                    .interact_text()?;
                commands::top_types(incidents, &pipeline, limit, false)?;
            }
            View::Heatmap => commands::heatmap(incidents, &pipeline, false)?,
            View::Monthly => commands::monthly(incidents, &pipeline, false)?,
            View::ChangeFilters => {
                pipeline.criteria = prompt_filters(&pipeline.criteria, bounds)?;
            }
            View::Quit => return Ok(()),
        }
    }
}

/// Prompts for a year range and crime-type selection, starting from
/// `current`. Selecting no types disables type filtering.
fn prompt_filters(
    current: &FilterCriteria,
    bounds: &DatasetBounds,
) -> Result<FilterCriteria, Box<dyn std::error::Error>> {
    let min_year: i32 = Input::new()
        .with_prompt("From year")
        .default(current.min_year)
        .interact_text()?;
    let max_year: i32 = Input::new()
        .with_prompt("To year")
        .default(current.max_year)
        .interact_text()?;

    if bounds.crime_types.is_empty() {
        return Ok(FilterCriteria::new(min_year, max_year));
    }

    let defaults: Vec<bool> = bounds
        .crime_types
        .iter()
        .enumerate()
        .map(|(i, label)| {
            if current.crime_types.is_empty() {
                i < DEFAULT_SELECTED_TYPES
            } else {
                current.crime_types.contains(label)
            }
        })
        .collect();

    let selected = MultiSelect::new()
        .with_prompt("Crime types (space=toggle, a=all, enter=confirm)")
        .items(&bounds.crime_types)
        .defaults(&defaults)
        .max_length(20)
        .interact()?;

    let crime_types: BTreeSet<String> = selected
        .into_iter()
        .map(|i| bounds.crime_types[i].clone())
        .collect();

    log::debug!(
        "Filters: {min_year}..={max_year}, {} crime type(s)",
        crime_types.len()
    );

    Ok(FilterCriteria::new(min_year, max_year).with_crime_types(crime_types))
}
