//! Field parsing for incident exports.
//!
//! Timestamps and coordinates that cannot be parsed are reported as `None`
//! rather than errors, so one malformed cell never rejects a whole row.

use chrono::{NaiveDate, NaiveDateTime};
use safe_walk_crime_models::Coordinates;

/// Datetime formats tried in order. The first is the City of Chicago
/// export format (`01/15/2024 10:30:00 PM`).
const DATETIME_FORMATS: &[&str] = &[
    "%m/%d/%Y %I:%M:%S %p",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
];

/// Parses an incident timestamp, returning `None` if no known format
/// matches. Date-only values resolve to midnight.
#[must_use]
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Parses lat/lng from optional string fields. Returns `None` if either is
/// missing, unparseable or zero.
#[must_use]
pub fn parse_lat_lng_str(lat: Option<&str>, lng: Option<&str>) -> Option<Coordinates> {
    let latitude = lat?.trim().parse::<f64>().ok()?;
    let longitude = lng?.trim().parse::<f64>().ok()?;
    Coordinates::new(latitude, longitude)
}

/// Returns `None` for blank cells, otherwise the trimmed value.
#[must_use]
pub fn non_blank(s: Option<&str>) -> Option<String> {
    let s = s?.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_chicago_export_date() {
        let dt = parse_timestamp("01/15/2024 10:30:00 PM").unwrap();
        assert_eq!(dt.to_string(), "2024-01-15 22:30:00");
    }

    #[test]
    fn parses_socrata_date_with_fractional() {
        let dt = parse_timestamp("2024-01-15T14:30:00.000").unwrap();
        assert_eq!(dt.to_string(), "2024-01-15 14:30:00");
    }

    #[test]
    fn parses_socrata_date_without_fractional() {
        let dt = parse_timestamp("2024-01-15T14:30:00").unwrap();
        assert_eq!(dt.to_string(), "2024-01-15 14:30:00");
    }

    #[test]
    fn parses_space_separated_and_date_only() {
        assert_eq!(
            parse_timestamp("2023-07-04 09:05:00").unwrap().to_string(),
            "2023-07-04 09:05:00"
        );
        assert_eq!(
            parse_timestamp("2023-07-04").unwrap().to_string(),
            "2023-07-04 00:00:00"
        );
    }

    #[test]
    fn rejects_invalid_date() {
        assert!(parse_timestamp("not-a-date").is_none());
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("13/45/2024 10:30:00 PM").is_none());
    }

    #[test]
    fn parses_lat_lng_strings() {
        let c = parse_lat_lng_str(Some("41.8781"), Some(" -87.6298 ")).unwrap();
        assert!((c.latitude - 41.8781).abs() < f64::EPSILON);
        assert!((c.longitude - -87.6298).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_zero_or_missing_lat_lng() {
        assert!(parse_lat_lng_str(Some("0.0"), Some("-87.6298")).is_none());
        assert!(parse_lat_lng_str(None, Some("-87.6298")).is_none());
        assert!(parse_lat_lng_str(Some(""), Some("-87.6298")).is_none());
    }

    #[test]
    fn blank_cells_become_none() {
        assert_eq!(non_blank(Some("  ")), None);
        assert_eq!(non_blank(None), None);
        assert_eq!(non_blank(Some(" 051XX W MADISON ST ")).as_deref(), Some("051XX W MADISON ST"));
    }
}
