//! Incident filtering and yearly aggregation.
//!
//! Filtering produces a borrowed view over the caller's incidents. Incidents
//! whose timestamp could not be parsed have no year, so they can never
//! satisfy the year range; instead of vanishing they are kept in a separate
//! undated bucket (type filter still applied). Time-indexed results only
//! ever read the dated side, while totals consult
//! [`UndatedPolicy`] to decide whether to add the undated side.

use safe_walk_analytics_models::{FilterCriteria, UndatedPolicy, YearlyAggregate};
use safe_walk_crime_models::Incident;

/// Incidents that passed a [`FilterCriteria`], split by timestamp presence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredIncidents<'a> {
    dated: Vec<&'a Incident>,
    undated: Vec<&'a Incident>,
}

impl<'a> FilteredIncidents<'a> {
    /// Incidents with a parsed timestamp inside the year range and an
    /// allowed crime type, in source order.
    #[must_use]
    pub fn dated(&self) -> &[&'a Incident] {
        &self.dated
    }

    /// Incidents without a parsed timestamp whose crime type is allowed,
    /// in source order.
    #[must_use]
    pub fn undated(&self) -> &[&'a Incident] {
        &self.undated
    }

    /// Incidents that count toward non-time-based totals under `policy`:
    /// the dated incidents, followed by the undated ones if the policy
    /// includes them.
    pub fn for_totals(&self, policy: UndatedPolicy) -> impl Iterator<Item = &'a Incident> + '_ {
        let undated: &[&'a Incident] = if policy.includes_undated() {
            &self.undated
        } else {
            &[]
        };
        self.dated.iter().chain(undated.iter()).copied()
    }

    /// Number of incidents counted under `policy`.
    #[must_use]
    pub fn total(&self, policy: UndatedPolicy) -> u64 {
        let undated = if policy.includes_undated() {
            self.undated.len()
        } else {
            0
        };
        (self.dated.len() + undated) as u64
    }

    /// Buckets the dated incidents by year.
    #[must_use]
    pub fn yearly_aggregate(&self) -> YearlyAggregate {
        aggregate_by_year(&self.dated)
    }
}

/// Narrows `incidents` to those matching `criteria`.
///
/// When the criteria's range is inverted (`min_year > max_year`) the result
/// is entirely empty, including the undated bucket.
#[must_use]
pub fn filter_incidents<'a>(
    incidents: &'a [Incident],
    criteria: &FilterCriteria,
) -> FilteredIncidents<'a> {
    if criteria.is_empty_range() {
        log::debug!(
            "Empty year range {}..={}, nothing to filter",
            criteria.min_year,
            criteria.max_year
        );
        return FilteredIncidents::default();
    }

    let mut filtered = FilteredIncidents::default();

    for incident in incidents {
        if !criteria.allows_type(&incident.primary_type) {
            continue;
        }
        match incident.year() {
            Some(year) if criteria.contains_year(year) => filtered.dated.push(incident),
            Some(_) => {}
            None => filtered.undated.push(incident),
        }
    }

    log::debug!(
        "Filtered {} incidents to {} dated + {} undated",
        incidents.len(),
        filtered.dated.len(),
        filtered.undated.len()
    );

    filtered
}

/// Counts incidents per year. Incidents without a timestamp are skipped.
#[must_use]
pub fn aggregate_by_year(incidents: &[&Incident]) -> YearlyAggregate {
    let mut aggregate = YearlyAggregate::new();
    for year in incidents.iter().filter_map(|i| i.year()) {
        aggregate.record(year);
    }
    aggregate
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::{NaiveDate, NaiveDateTime};

    use super::*;

    fn at(year: i32) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(year, 3, 14)?.and_hms_opt(9, 30, 0)
    }

    fn sample() -> Vec<Incident> {
        vec![
            Incident::new(at(2019), "THEFT"),
            Incident::new(at(2020), "THEFT"),
            Incident::new(at(2020), "BATTERY"),
            Incident::new(at(2021), "NARCOTICS"),
            Incident::new(None, "THEFT"),
            Incident::new(at(2022), "BATTERY"),
            Incident::new(None, "ROBBERY"),
            Incident::new(at(2023), "THEFT"),
        ]
    }

    #[test]
    fn inverted_range_yields_empty_results() {
        let incidents = sample();
        let filtered = filter_incidents(&incidents, &FilterCriteria::new(2023, 2020));
        assert!(filtered.dated().is_empty());
        assert!(filtered.undated().is_empty());
        assert!(filtered.yearly_aggregate().is_empty());
    }

    #[test]
    fn full_range_and_types_returns_all_dated_incidents() {
        let incidents = sample();
        let types: BTreeSet<String> = incidents.iter().map(|i| i.primary_type.clone()).collect();
        let criteria = FilterCriteria::new(2019, 2023).with_crime_types(types);

        let filtered = filter_incidents(&incidents, &criteria);
        let expected: Vec<&Incident> = incidents.iter().filter(|i| i.is_dated()).collect();
        assert_eq!(filtered.dated(), expected.as_slice());
    }

    #[test]
    fn aggregate_sum_matches_dated_subset() {
        let incidents = sample();
        let filtered = filter_incidents(&incidents, &FilterCriteria::new(2020, 2022));
        let agg = filtered.yearly_aggregate();

        assert_eq!(agg.total(), filtered.dated().len() as u64);
        assert_eq!(agg.get(2020), 2);
        assert_eq!(agg.get(2021), 1);
        assert_eq!(agg.get(2022), 1);
        assert_eq!(agg.len(), 3);
    }

    #[test]
    fn type_filter_applies_to_both_buckets() {
        let incidents = sample();
        let criteria = FilterCriteria::new(2019, 2023).with_crime_types(["THEFT"]);
        let filtered = filter_incidents(&incidents, &criteria);

        assert_eq!(filtered.dated().len(), 3);
        assert_eq!(filtered.undated().len(), 1);
        assert!(filtered.undated().iter().all(|i| i.primary_type == "THEFT"));
    }

    #[test]
    fn undated_policy_only_affects_totals() {
        let incidents = sample();
        let filtered = filter_incidents(&incidents, &FilterCriteria::new(2019, 2023));

        assert_eq!(filtered.total(UndatedPolicy::IncludeInTotals), 8);
        assert_eq!(filtered.total(UndatedPolicy::ExcludeFromTotals), 6);
        assert_eq!(filtered.for_totals(UndatedPolicy::IncludeInTotals).count(), 8);
        assert_eq!(filtered.for_totals(UndatedPolicy::ExcludeFromTotals).count(), 6);
        assert_eq!(filtered.yearly_aggregate().total(), 6);
    }

    #[test]
    fn source_incidents_are_untouched() {
        let incidents = sample();
        let before = incidents.clone();
        let _ = filter_incidents(&incidents, &FilterCriteria::new(2020, 2020));
        assert_eq!(incidents, before);
    }
}
