//! TOML configuration and filter resolution.
//!
//! Settings are layered: command-line flags override the config file, which
//! overrides defaults derived from the loaded dataset.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use safe_walk_analytics_models::{
    DEFAULT_WINDOW_SIZE, DatasetBounds, FilterCriteria, PipelineConfig, UndatedPolicy,
};
use safe_walk_ingest::LoadOptions;
use serde::Deserialize;
use thiserror::Error;

/// Environment variable consulted for the dataset path when neither a flag
/// nor the config file provides one.
pub const CSV_ENV_VAR: &str = "SAFE_WALK_CSV";

/// Years before the latest observed year covered when no range is given.
pub const DEFAULT_YEAR_SPAN: i32 = 5;

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config {}: {source}", path.display())]
    Io {
        /// Path of the config file.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`SafeWalkConfig`].
    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The delimiter is not a single ASCII character.
    #[error("Invalid delimiter '{0}': expected a single ASCII character")]
    Delimiter(String),
}

/// `[filter]` table of the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterSection {
    /// First year to include.
    pub min_year: Option<i32>,
    /// Last year to include.
    pub max_year: Option<i32>,
    /// Allowed crime types; empty means all.
    pub crime_types: Vec<String>,
}

/// Contents of a `safe_walk.toml` file. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SafeWalkConfig {
    /// Path to the crimes export.
    pub csv: Option<PathBuf>,
    /// Field delimiter, e.g. `","` or `"\t"`.
    pub delimiter: Option<String>,
    /// Stop after this many records.
    pub max_records: Option<u64>,
    /// Trailing years fitted by the trend projector.
    pub window_size: Option<usize>,
    /// Year to project to.
    pub target_year: Option<i32>,
    /// Treatment of incidents with unparseable timestamps.
    pub undated_policy: Option<UndatedPolicy>,
    /// Years before the latest covered by the default range.
    pub default_year_span: Option<i32>,
    /// Reduction applied to projections by the `trend` command.
    pub reduction_percent: Option<f64>,
    /// Default filter.
    pub filter: FilterSection,
}

impl SafeWalkConfig {
    /// Parses a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed TOML or unknown keys.
    pub fn parse(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::de::from_str(toml_str)?)
    }

    /// Reads and parses the config file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&text)?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Reader options for the dataset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Delimiter`] if the delimiter is not a single
    /// ASCII character.
    pub fn load_options(&self) -> Result<LoadOptions, ConfigError> {
        let mut options = LoadOptions::new().with_max_records(self.max_records);
        if let Some(delimiter) = &self.delimiter {
            let byte = match delimiter.as_bytes() {
                [b] if b.is_ascii() => *b,
                _ if delimiter == "\\t" => b'\t',
                _ => return Err(ConfigError::Delimiter(delimiter.clone())),
            };
            options = options.with_delimiter(byte);
        }
        Ok(options)
    }
}

/// Values given on the command line. `None` means "not given".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    /// `--from-year`
    pub from_year: Option<i32>,
    /// `--to-year`
    pub to_year: Option<i32>,
    /// `--types`
    pub crime_types: Option<Vec<String>>,
    /// `--window`
    pub window_size: Option<usize>,
    /// `--target-year`
    pub target_year: Option<i32>,
    /// `--exclude-undated`
    pub exclude_undated: bool,
}

/// Builds the pipeline config from flags, config file and dataset bounds.
///
/// With no year given anywhere, the range is the last
/// `default_year_span` years up to the latest observed year. A dataset
/// without any dated incident falls back to an unbounded range.
#[must_use]
pub fn resolve(
    overrides: &Overrides,
    config: &SafeWalkConfig,
    bounds: &DatasetBounds,
) -> PipelineConfig {
    let span = config.default_year_span.unwrap_or(DEFAULT_YEAR_SPAN);
    let fallback = bounds
        .default_criteria(span)
        .unwrap_or_else(|| FilterCriteria::new(i32::MIN, i32::MAX));

    let min_year = overrides
        .from_year
        .or(config.filter.min_year)
        .unwrap_or(fallback.min_year);
    let max_year = overrides
        .to_year
        .or(config.filter.max_year)
        .unwrap_or(fallback.max_year);

    let crime_types: BTreeSet<String> = overrides
        .crime_types
        .as_ref()
        .unwrap_or(&config.filter.crime_types)
        .iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();

    let undated_policy = if overrides.exclude_undated {
        UndatedPolicy::ExcludeFromTotals
    } else {
        config.undated_policy.unwrap_or_default()
    };

    PipelineConfig {
        window_size: overrides
            .window_size
            .or(config.window_size)
            .unwrap_or(DEFAULT_WINDOW_SIZE),
        target_year: overrides.target_year.or(config.target_year),
        criteria: FilterCriteria::new(min_year, max_year).with_crime_types(crime_types),
        undated_policy,
    }
}

/// Picks the dataset path: flag, then config, then [`CSV_ENV_VAR`]. Returns
/// `None` when none is set, leaving discovery to the ingest crate.
#[must_use]
pub fn dataset_path(flag: Option<&Path>, config: &SafeWalkConfig) -> Option<PathBuf> {
    flag.map(Path::to_path_buf)
        .or_else(|| config.csv.clone())
        .or_else(|| std::env::var_os(CSV_ENV_VAR).map(PathBuf::from))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> DatasetBounds {
        DatasetBounds {
            min_year: Some(2001),
            max_year: Some(2024),
            crime_types: vec!["BATTERY".to_string(), "THEFT".to_string()],
            total_incidents: 100,
            undated_incidents: 1,
        }
    }

    #[test]
    fn parses_full_config() {
        let config = SafeWalkConfig::parse(
            r#"
            csv = "archive/crimes.csv"
            delimiter = ";"
            max_records = 1000
            window_size = 4
            target_year = 2026
            undated_policy = "exclude_from_totals"
            default_year_span = 10
            reduction_percent = 12.5

            [filter]
            min_year = 2015
            max_year = 2020
            crime_types = ["THEFT"]
            "#,
        )
        .unwrap();

        assert_eq!(config.csv, Some(PathBuf::from("archive/crimes.csv")));
        assert_eq!(config.window_size, Some(4));
        assert_eq!(config.undated_policy, Some(UndatedPolicy::ExcludeFromTotals));
        assert_eq!(config.filter.crime_types, vec!["THEFT".to_string()]);
        assert_eq!(
            config.load_options().unwrap(),
            LoadOptions::new()
                .with_delimiter(b';')
                .with_max_records(Some(1000))
        );
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(matches!(
            SafeWalkConfig::parse("windw_size = 3"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn accepts_escaped_tab_delimiter() {
        let config = SafeWalkConfig::parse(r#"delimiter = "\\t""#).unwrap();
        assert_eq!(
            config.load_options().unwrap(),
            LoadOptions::new().with_delimiter(b'\t')
        );

        let config = SafeWalkConfig::parse(r#"delimiter = "||""#).unwrap();
        assert!(matches!(
            config.load_options(),
            Err(ConfigError::Delimiter(_))
        ));
    }

    #[test]
    fn defaults_come_from_dataset_bounds() {
        let resolved = resolve(&Overrides::default(), &SafeWalkConfig::default(), &bounds());

        assert_eq!(resolved.criteria, FilterCriteria::new(2019, 2024));
        assert_eq!(resolved.window_size, DEFAULT_WINDOW_SIZE);
        assert_eq!(resolved.target_year, None);
        assert_eq!(resolved.undated_policy, UndatedPolicy::IncludeInTotals);
    }

    #[test]
    fn flags_override_config() {
        let config = SafeWalkConfig {
            window_size: Some(3),
            target_year: Some(2030),
            undated_policy: Some(UndatedPolicy::IncludeInTotals),
            filter: FilterSection {
                min_year: Some(2010),
                max_year: Some(2012),
                crime_types: vec!["THEFT".to_string()],
            },
            ..SafeWalkConfig::default()
        };

        let resolved = resolve(&Overrides::default(), &config, &bounds());
        assert_eq!(
            resolved.criteria,
            FilterCriteria::new(2010, 2012).with_crime_types(["THEFT"])
        );
        assert_eq!(resolved.window_size, 3);
        assert_eq!(resolved.target_year, Some(2030));

        let overrides = Overrides {
            from_year: Some(2020),
            crime_types: Some(vec![" BATTERY ".to_string(), String::new()]),
            window_size: Some(6),
            exclude_undated: true,
            ..Overrides::default()
        };
        let resolved = resolve(&overrides, &config, &bounds());
        assert_eq!(
            resolved.criteria,
            FilterCriteria::new(2020, 2012).with_crime_types(["BATTERY"])
        );
        assert_eq!(resolved.window_size, 6);
        assert_eq!(resolved.undated_policy, UndatedPolicy::ExcludeFromTotals);
    }

    #[test]
    fn undated_only_dataset_is_unbounded() {
        let empty = DatasetBounds {
            min_year: None,
            max_year: None,
            crime_types: Vec::new(),
            total_incidents: 2,
            undated_incidents: 2,
        };
        let resolved = resolve(&Overrides::default(), &SafeWalkConfig::default(), &empty);
        assert_eq!(resolved.criteria, FilterCriteria::new(i32::MIN, i32::MAX));
    }

    #[test]
    fn missing_file_names_path() {
        let path = std::env::temp_dir().join("safe_walk_no_such_config.toml");
        let err = SafeWalkConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("safe_walk_no_such_config.toml"));
    }

    #[test]
    fn flag_path_wins() {
        let config = SafeWalkConfig {
            csv: Some(PathBuf::from("from_config.csv")),
            ..SafeWalkConfig::default()
        };
        assert_eq!(
            dataset_path(Some(Path::new("flag.csv")), &config),
            Some(PathBuf::from("flag.csv"))
        );
        assert_eq!(
            dataset_path(None, &config),
            Some(PathBuf::from("from_config.csv"))
        );
    }
}
