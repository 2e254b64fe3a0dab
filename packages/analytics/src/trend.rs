//! Linear trend projection over yearly counts.
//!
//! Fits an ordinary least-squares line `count = slope * year + intercept`
//! through the trailing window of a [`YearlyAggregate`] and evaluates it at
//! a single target year. Years are centred on their mean before fitting so
//! the sums stay small; the resulting line is the same.

use safe_walk_analytics_models::{
    ProjectedTrend, ReductionScenario, TrendProjection, YearCount, YearlyAggregate,
};

use crate::AnalyticsError;

/// Projects the trend of the last `window` years to `target_year`.
///
/// `target_year` defaults to the year after the latest one in `aggregate`.
/// The projected count is rounded half-to-even and never negative.
///
/// # Errors
///
/// Returns [`AnalyticsError::InvalidWindow`] if `window < 2`.
pub fn project_trend(
    aggregate: &YearlyAggregate,
    window: usize,
    target_year: Option<i32>,
) -> Result<TrendProjection, AnalyticsError> {
    if window < 2 {
        return Err(AnalyticsError::InvalidWindow { window });
    }

    let Some(latest) = aggregate.latest_year() else {
        return Ok(TrendProjection::NoData);
    };

    if aggregate.len() < window {
        log::debug!(
            "Only {} distinct years available, {window} required",
            aggregate.len()
        );
        return Ok(TrendProjection::InsufficientData {
            available: aggregate.len(),
            required: window,
        });
    }

    let mut points: Vec<YearCount> = aggregate.iter().rev().take(window).collect();
    points.reverse();

    let target_year = target_year.unwrap_or(latest + 1);
    let fit = fit_line(&points);
    let raw_value = fit.evaluate(target_year);

    Ok(TrendProjection::Projected(ProjectedTrend {
        target_year,
        slope: fit.slope,
        intercept: fit.intercept(),
        raw_value,
        projected_count: clamp_count(raw_value),
        window: points,
    }))
}

/// Least-squares line stored relative to the mean year.
#[derive(Debug, Clone, Copy, PartialEq)]
struct LineFit {
    slope: f64,
    mean_x: f64,
    mean_y: f64,
}

impl LineFit {
    fn evaluate(&self, year: i32) -> f64 {
        self.mean_y + self.slope * (f64::from(year) - self.mean_x)
    }

    fn intercept(&self) -> f64 {
        self.mean_y - self.slope * self.mean_x
    }
}

/// Fits `points`, which must hold at least two distinct years.
#[allow(clippy::cast_precision_loss)]
fn fit_line(points: &[YearCount]) -> LineFit {
    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| f64::from(p.year)).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p.count as f64).sum::<f64>() / n;

    let (mut sxy, mut sxx) = (0.0, 0.0);
    for p in points {
        let dx = f64::from(p.year) - mean_x;
        sxy += dx * (p.count as f64 - mean_y);
        sxx += dx * dx;
    }

    let slope = if sxx > 0.0 { sxy / sxx } else { 0.0 };

    LineFit {
        slope,
        mean_x,
        mean_y,
    }
}

/// Rounds half-to-even and floors at zero.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_count(value: f64) -> u64 {
    let rounded = value.round_ties_even();
    if rounded.is_nan() || rounded <= 0.0 {
        0
    } else {
        rounded as u64
    }
}

/// Checks that `percent` is a usable reduction.
///
/// # Errors
///
/// Returns [`AnalyticsError::InvalidReduction`] if `percent` is not within
/// `0..=100`.
pub fn validate_reduction(percent: f64) -> Result<(), AnalyticsError> {
    if (0.0..=100.0).contains(&percent) {
        Ok(())
    } else {
        Err(AnalyticsError::InvalidReduction { percent })
    }
}

/// Applies a hypothetical percentage reduction to a projected count.
///
/// # Errors
///
/// Returns [`AnalyticsError::InvalidReduction`] if `percent` is not within
/// `0..=100`.
#[allow(clippy::cast_precision_loss)]
pub fn apply_reduction(baseline: u64, percent: f64) -> Result<ReductionScenario, AnalyticsError> {
    validate_reduction(percent)?;

    let reduced = clamp_count(baseline as f64 * (1.0 - percent / 100.0));

    Ok(ReductionScenario {
        reduction_percent: percent,
        baseline,
        reduced,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aggregate(points: &[(i32, u64)]) -> YearlyAggregate {
        points
            .iter()
            .map(|&(year, count)| YearCount { year, count })
            .collect()
    }

    fn projected(result: TrendProjection) -> ProjectedTrend {
        match result {
            TrendProjection::Projected(trend) => trend,
            other => panic!("expected a projection, got {other:?}"),
        }
    }

    #[test]
    fn reproduces_closed_form_line() {
        let agg = aggregate(&[
            (2020, 100),
            (2021, 110),
            (2022, 120),
            (2023, 130),
            (2024, 140),
        ]);
        let trend = projected(project_trend(&agg, 5, None).unwrap());

        assert_eq!(trend.target_year, 2025);
        assert!((trend.slope - 10.0).abs() < 1e-9);
        assert!((trend.intercept - -20_100.0).abs() < 1e-6);
        assert!((trend.raw_value - 150.0).abs() < 1e-9);
        assert_eq!(trend.projected_count, 150);
    }

    #[test]
    fn uses_most_recent_years_only() {
        let agg = aggregate(&[
            (2015, 9_000),
            (2016, 8_000),
            (2020, 100),
            (2021, 110),
            (2022, 120),
            (2023, 130),
            (2024, 140),
        ]);
        let trend = projected(project_trend(&agg, 5, None).unwrap());

        let years: Vec<i32> = trend.window.iter().map(|p| p.year).collect();
        assert_eq!(years, vec![2020, 2021, 2022, 2023, 2024]);
        assert_eq!(trend.projected_count, 150);
    }

    #[test]
    fn evaluates_explicit_target_year() {
        let agg = aggregate(&[
            (2020, 100),
            (2021, 110),
            (2022, 120),
            (2023, 130),
            (2024, 140),
        ]);
        let trend = projected(project_trend(&agg, 5, Some(2026)).unwrap());
        assert_eq!(trend.projected_count, 160);
    }

    #[test]
    fn too_few_years_is_insufficient_data() {
        let agg = aggregate(&[(2021, 10), (2022, 20), (2023, 30), (2024, 40)]);
        assert_eq!(
            project_trend(&agg, 5, None).unwrap(),
            TrendProjection::InsufficientData {
                available: 4,
                required: 5,
            }
        );
    }

    #[test]
    fn empty_aggregate_is_no_data() {
        assert_eq!(
            project_trend(&YearlyAggregate::new(), 5, None).unwrap(),
            TrendProjection::NoData
        );
    }

    #[test]
    fn declining_series_clamps_to_zero() {
        let agg = aggregate(&[(2020, 100), (2021, 60), (2022, 30), (2023, 10), (2024, 0)]);
        let trend = projected(project_trend(&agg, 5, None).unwrap());

        assert!(trend.raw_value < 0.0);
        assert_eq!(trend.projected_count, 0);
    }

    #[test]
    fn rounds_half_to_even() {
        // Line through these points evaluates to exactly 2.5 at 2023.
        let agg = aggregate(&[(2022, 1), (2024, 4)]);
        let trend = projected(project_trend(&agg, 2, Some(2023)).unwrap());
        assert!((trend.raw_value - 2.5).abs() < f64::EPSILON);
        assert_eq!(trend.projected_count, 2);

        assert_eq!(clamp_count(2.5), 2);
        assert_eq!(clamp_count(3.5), 4);
        assert_eq!(clamp_count(-0.4), 0);
    }

    #[test]
    fn rejects_window_below_two() {
        let agg = aggregate(&[(2024, 1)]);
        assert!(matches!(
            project_trend(&agg, 1, None),
            Err(AnalyticsError::InvalidWindow { window: 1 })
        ));
        assert!(matches!(
            project_trend(&agg, 0, None),
            Err(AnalyticsError::InvalidWindow { window: 0 })
        ));
    }

    #[test]
    fn reduction_scales_baseline() {
        let scenario = apply_reduction(1_000, 10.0).unwrap();
        assert_eq!(scenario.reduced, 900);
        assert_eq!(apply_reduction(1_000, 0.0).unwrap().reduced, 1_000);
        assert_eq!(apply_reduction(1_000, 100.0).unwrap().reduced, 0);
    }

    #[test]
    fn reduction_rejects_out_of_range_percent() {
        assert!(apply_reduction(100, -1.0).is_err());
        assert!(apply_reduction(100, 100.5).is_err());
        assert!(apply_reduction(100, f64::NAN).is_err());
        assert!(matches!(
            validate_reduction(500.0),
            Err(AnalyticsError::InvalidReduction { .. })
        ));
        assert!(validate_reduction(25.0).is_ok());
    }
}
