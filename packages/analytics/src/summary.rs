//! Dashboard summaries derived from a filtered incident view.
//!
//! Time-indexed summaries (weekday, hour, month) read only the dated side
//! of a [`FilteredIncidents`]. Totals, type distributions and map points
//! follow the caller's [`UndatedPolicy`].

use std::collections::BTreeMap;

use safe_walk_analytics_models::{
    CategoryCount, DatasetBounds, DayCount, DayHourHeatmap, FilterCriteria, MapPoint, Overview,
    TimeSeriesPoint, UndatedPolicy,
};
use safe_walk_crime_models::{DayOfWeek, Incident};

use crate::filter::FilteredIncidents;

/// Returns the key with the highest count. Ties go to the smallest key, so
/// crime types tie-break alphabetically.
fn mode<K: Ord + Copy>(counts: &BTreeMap<K, u64>) -> Option<K> {
    let mut best: Option<(K, u64)> = None;
    for (&key, &count) in counts {
        if best.is_none_or(|(_, c)| count > c) {
            best = Some((key, count));
        }
    }
    best.map(|(key, _)| key)
}

/// Most frequent weekday. Ties go to the alphabetically first day name
/// (Friday before Monday), not to the earliest day of the week.
fn busiest_day(counts: &BTreeMap<DayOfWeek, u64>) -> Option<DayOfWeek> {
    counts
        .iter()
        .max_by(|(a_day, a), (b_day, b)| {
            a.cmp(b)
                .then_with(|| b_day.to_string().cmp(&a_day.to_string()))
        })
        .map(|(&day, _)| day)
}

fn type_counts<'a>(incidents: impl Iterator<Item = &'a Incident>) -> BTreeMap<&'a str, u64> {
    let mut counts = BTreeMap::new();
    for incident in incidents {
        *counts.entry(incident.primary_type.as_str()).or_insert(0) += 1;
    }
    counts
}

fn weekday_counts(incidents: &[&Incident]) -> BTreeMap<DayOfWeek, u64> {
    let mut counts = BTreeMap::new();
    for day in incidents.iter().filter_map(|i| i.day_of_week()) {
        *counts.entry(day).or_insert(0) += 1;
    }
    counts
}

/// Computes headline metrics for `filtered`.
#[must_use]
pub fn overview(
    filtered: &FilteredIncidents<'_>,
    criteria: &FilterCriteria,
    policy: UndatedPolicy,
) -> Overview {
    let types = type_counts(filtered.for_totals(policy));
    let days = weekday_counts(filtered.dated());

    Overview {
        total_incidents: filtered.total(policy),
        dated_incidents: filtered.dated().len() as u64,
        undated_incidents: filtered.undated().len() as u64,
        min_year: criteria.min_year,
        max_year: criteria.max_year,
        most_common_type: mode(&types).map(str::to_string),
        unique_types: types.len(),
        most_common_day: busiest_day(&days),
    }
}

/// Returns the `limit` most frequent crime types, most frequent first.
/// Equal counts are ordered alphabetically.
#[must_use]
pub fn top_crime_types(
    filtered: &FilteredIncidents<'_>,
    policy: UndatedPolicy,
    limit: usize,
) -> Vec<CategoryCount> {
    let mut counts: Vec<(&str, u64)> = type_counts(filtered.for_totals(policy))
        .into_iter()
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    counts
        .into_iter()
        .take(limit)
        .map(|(category, count)| CategoryCount {
            category: category.to_string(),
            count,
        })
        .collect()
}

/// Counts dated incidents per weekday, Monday first, including zero days.
#[must_use]
pub fn day_of_week_counts(filtered: &FilteredIncidents<'_>) -> Vec<DayCount> {
    let counts = weekday_counts(filtered.dated());
    DayOfWeek::all()
        .iter()
        .map(|&day| DayCount {
            day,
            count: counts.get(&day).copied().unwrap_or(0),
        })
        .collect()
}

/// Builds a zero-filled 7x24 weekday-by-hour matrix of dated incidents.
#[must_use]
pub fn day_hour_heatmap(filtered: &FilteredIncidents<'_>) -> DayHourHeatmap {
    let mut counts = vec![vec![0_u64; 24]; DayOfWeek::all().len()];

    for incident in filtered.dated() {
        let (Some(day), Some(hour)) = (incident.day_of_week(), incident.hour()) else {
            continue;
        };
        if let Some(cell) = counts[day.index()].get_mut(hour as usize) {
            *cell += 1;
        }
    }

    DayHourHeatmap {
        days: DayOfWeek::all().to_vec(),
        counts,
    }
}

/// Counts dated incidents per `YYYY-MM`, in chronological order.
#[must_use]
pub fn monthly_counts(filtered: &FilteredIncidents<'_>) -> Vec<TimeSeriesPoint> {
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for label in filtered.dated().iter().filter_map(|i| i.month_label()) {
        *counts.entry(label).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(period, count)| TimeSeriesPoint { period, count })
        .collect()
}

/// Returns located incidents, down-sampled by even stride to at most
/// `limit` points. The same input always yields the same sample.
#[must_use]
pub fn map_points(
    filtered: &FilteredIncidents<'_>,
    policy: UndatedPolicy,
    limit: usize,
) -> Vec<MapPoint> {
    let located: Vec<&Incident> = filtered
        .for_totals(policy)
        .filter(|i| i.location.is_some())
        .collect();

    let n = located.len();
    if n > limit {
        log::debug!("Sampling {limit} of {n} located incidents");
    }

    (0..n.min(limit))
        .map(|i| if n <= limit { located[i] } else { located[i * n / limit] })
        .filter_map(|incident| {
            Some(MapPoint {
                location: incident.location?,
                primary_type: incident.primary_type.clone(),
                year: incident.year(),
            })
        })
        .collect()
}

/// Computes the observed year range and crime-type options of a dataset.
#[must_use]
pub fn dataset_bounds(incidents: &[Incident]) -> DatasetBounds {
    let mut min_year: Option<i32> = None;
    let mut max_year: Option<i32> = None;
    let mut undated = 0_u64;

    for incident in incidents {
        match incident.year() {
            Some(year) => {
                min_year = Some(min_year.map_or(year, |m| m.min(year)));
                max_year = Some(max_year.map_or(year, |m| m.max(year)));
            }
            None => undated += 1,
        }
    }

    let crime_types: Vec<String> = type_counts(incidents.iter())
        .into_keys()
        .filter(|label| !label.trim().is_empty())
        .map(str::to_string)
        .collect();

    DatasetBounds {
        min_year,
        max_year,
        crime_types,
        total_incidents: incidents.len() as u64,
        undated_incidents: undated,
    }
}
