//! Plain-text and JSON rendering of analytics results.

use safe_walk_analytics_models::{
    CategoryCount, DatasetBounds, DayCount, DayHourHeatmap, MapPoint, Overview, ReductionScenario,
    TimeSeriesPoint, TrendProjection, YearCount,
};
use std::io::Write;

use serde::Serialize;

/// Yearly series plus its projection, as printed by the `trend` command.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendReport {
    /// Counts per year, ascending.
    pub yearly: Vec<YearCount>,
    /// Projection over the trailing window.
    pub projection: TrendProjection,
    /// Hypothetical reduction of the projected count.
    pub reduction: Option<ReductionScenario>,
}

/// Weekday totals and the weekday-by-hour matrix.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapReport {
    /// Incidents per weekday.
    pub days: Vec<DayCount>,
    /// Incidents per weekday and hour.
    pub heatmap: DayHourHeatmap,
}

/// Pretty-prints `value` as JSON on stdout.
///
/// # Errors
///
/// Returns an error if `value` cannot be serialized.
pub fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Formats `n` with comma thousands separators (`12,345`).
#[must_use]
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Describes an inclusive year range, treating the `i32` extremes as open.
#[must_use]
pub fn describe_year_range(min: i32, max: i32) -> String {
    match (min == i32::MIN, max == i32::MAX) {
        (true, true) => "all years".to_string(),
        (true, false) => format!("through {max}"),
        (false, true) => format!("since {min}"),
        (false, false) => format!("{min} – {max}"),
    }
}

pub fn print_overview(overview: &Overview) {
    println!("Overview");
    println!("{}", "-".repeat(40));
    println!(
        "{:<22} {}",
        "Total incidents",
        group_thousands(overview.total_incidents)
    );
    if overview.undated_incidents > 0 {
        println!(
            "{:<22} {}",
            "  without timestamp",
            group_thousands(overview.undated_incidents)
        );
    }
    println!(
        "{:<22} {}",
        "Time period",
        describe_year_range(overview.min_year, overview.max_year)
    );
    println!(
        "{:<22} {}",
        "Most common type",
        overview.most_common_type.as_deref().unwrap_or("–")
    );
    println!("{:<22} {}", "Unique crime types", overview.unique_types);
    println!(
        "{:<22} {}",
        "Most common day",
        overview
            .most_common_day
            .map_or_else(|| "–".to_string(), |d| d.to_string())
    );
}

pub fn print_trend(report: &TrendReport) {
    println!("{:<8} COUNT", "YEAR");
    println!("{}", "-".repeat(24));
    for point in &report.yearly {
        println!("{:<8} {}", point.year, group_thousands(point.count));
    }
    println!();

    match &report.projection {
        TrendProjection::Projected(trend) => {
            println!(
                "Projected {} incidents: {} (linear trend over {} years, {:+.1}/year)",
                trend.target_year,
                group_thousands(trend.projected_count),
                trend.window.len(),
                trend.slope
            );
        }
        TrendProjection::InsufficientData {
            available,
            required,
        } => {
            println!(
                "Not enough history for a projection: {available} year(s) available, {required} required"
            );
        }
        TrendProjection::NoData => println!("No incidents match the current filters"),
    }

    if let Some(scenario) = &report.reduction {
        println!(
            "With {}% reduction: {}",
            scenario.reduction_percent,
            group_thousands(scenario.reduced)
        );
    }
}

pub fn print_types(types: &[CategoryCount]) {
    println!("{:<36} COUNT", "TYPE");
    println!("{}", "-".repeat(48));
    for entry in types {
        println!("{:<36} {}", entry.category, group_thousands(entry.count));
    }
}

pub fn print_heatmap(report: &HeatmapReport) {
    println!("{:<12} COUNT", "DAY");
    println!("{}", "-".repeat(24));
    for day in &report.days {
        println!("{:<12} {}", day.day, group_thousands(day.count));
    }
    println!();

    print!("{:<10}", "");
    for hour in 0..24 {
        print!("{hour:>6}");
    }
    println!();
    for (day, row) in report.heatmap.days.iter().zip(&report.heatmap.counts) {
        print!("{day:<10}");
        for count in row {
            print!("{count:>6}");
        }
        println!();
    }
}

pub fn print_monthly(points: &[TimeSeriesPoint]) {
    println!("{:<10} COUNT", "MONTH");
    println!("{}", "-".repeat(24));
    for point in points {
        println!("{:<10} {}", point.period, group_thousands(point.count));
    }
}

/// Writes map points as CSV with a header row.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_map_csv<W: Write>(points: &[MapPoint], out: W) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(["latitude", "longitude", "primary_type", "year"])?;
    for point in points {
        writer.write_record([
            point.location.latitude.to_string(),
            point.location.longitude.to_string(),
            point.primary_type.clone(),
            point.year.map_or_else(String::new, |y| y.to_string()),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Prints map points as CSV on stdout.
///
/// # Errors
///
/// Returns an error if stdout cannot be written.
pub fn print_map(points: &[MapPoint]) -> Result<(), csv::Error> {
    write_map_csv(points, std::io::stdout().lock())
}

pub fn print_bounds(bounds: &DatasetBounds) {
    println!(
        "{:<22} {}",
        "Incidents",
        group_thousands(bounds.total_incidents)
    );
    println!(
        "{:<22} {}",
        "Unparseable timestamps",
        group_thousands(bounds.undated_incidents)
    );
    match (bounds.min_year, bounds.max_year) {
        (Some(min), Some(max)) => println!("{:<22} {min} – {max}", "Years"),
        _ => println!("{:<22} –", "Years"),
    }
    println!("Crime types ({}):", bounds.crime_types.len());
    for label in &bounds.crime_types {
        println!("  {label}");
    }
}

#[cfg(test)]
mod tests {
    use safe_walk_crime_models::Coordinates;

    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_000), "1,000");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
        assert_eq!(group_thousands(100_000), "100,000");
    }

    #[test]
    fn map_csv_quotes_labels_with_commas() {
        let points = vec![MapPoint {
            location: Coordinates::new(41.8, -87.6).unwrap(),
            primary_type: "WEAPONS, VIOLATION".to_string(),
            year: Some(2024),
        }];
        let mut buf = Vec::new();
        write_map_csv(&points, &mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "latitude,longitude,primary_type,year\n41.8,-87.6,\"WEAPONS, VIOLATION\",2024\n"
        );

        let mut reader = csv::Reader::from_reader(text.as_bytes());
        let row = reader.records().next().unwrap().unwrap();
        assert_eq!(row.len(), 4);
        assert_eq!(&row[2], "WEAPONS, VIOLATION");
    }

    #[test]
    fn describes_open_ranges() {
        assert_eq!(describe_year_range(2019, 2024), "2019 – 2024");
        assert_eq!(describe_year_range(i32::MIN, i32::MAX), "all years");
        assert_eq!(describe_year_range(2019, i32::MAX), "since 2019");
        assert_eq!(describe_year_range(i32::MIN, 2024), "through 2024");
    }
}
