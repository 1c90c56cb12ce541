use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::calendar::ColorScale;
use crate::calendar::scale::DEFAULT_SCALE_MAX;
use crate::error::ConfigError;
use crate::stats::AirlineFilter;

pub const DEFAULT_BATCH_SIZE: NonZeroUsize = match NonZeroUsize::new(100_000) {
    Some(n) => n,
    None => unreachable!(),
};
pub const DEFAULT_AIRLINE: &str = "AA";
pub const DEFAULT_TARGET_YEAR: i32 = 2015;

/// Settings for one report run.
///
/// Can be loaded from a JSON file; every field except `archive_path` has a
/// default:
/// ```json
/// {
///   "archive_path": "data/flights.csv.zip",
///   "batch_size": 100000,
///   "airline_filter": ["AA", "DL"],
///   "target_year": 2015,
///   "scale_max": 0.6,
///   "delimiter": ",",
///   "output_dir": "charts"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    pub archive_path: PathBuf,
    /// Rows per batch. Affects memory use only, never the result.
    #[serde(default = "default_batch_size")]
    pub batch_size: NonZeroUsize,
    #[serde(default = "default_airline_filter")]
    pub airline_filter: AirlineFilter,
    #[serde(default = "default_target_year")]
    pub target_year: i32,
    /// Upper bound of the color scale.
    #[serde(default = "default_scale_max")]
    pub scale_max: f64,
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_batch_size() -> NonZeroUsize {
    DEFAULT_BATCH_SIZE
}

fn default_airline_filter() -> AirlineFilter {
    AirlineFilter(std::iter::once(DEFAULT_AIRLINE.to_string()).collect())
}

fn default_target_year() -> i32 {
    DEFAULT_TARGET_YEAR
}

fn default_scale_max() -> f64 {
    DEFAULT_SCALE_MAX
}

fn default_delimiter() -> char {
    ','
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("charts")
}

impl ReportConfig {
    pub fn new(archive_path: impl Into<PathBuf>) -> Self {
        ReportConfig {
            archive_path: archive_path.into(),
            batch_size: default_batch_size(),
            airline_filter: default_airline_filter(),
            target_year: default_target_year(),
            scale_max: default_scale_max(),
            delimiter: default_delimiter(),
            output_dir: default_output_dir(),
        }
    }

    /// Loads and validates the config from a JSON file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: ReportConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.scale_max.is_finite() || self.scale_max <= 0.0 {
            return Err(ConfigError::InvalidScaleMax(self.scale_max));
        }
        self.delimiter_byte()?;
        Ok(())
    }

    pub fn delimiter_byte(&self) -> Result<u8, ConfigError> {
        u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| ConfigError::InvalidDelimiter(self.delimiter.to_string()))
    }

    pub fn color_scale(&self) -> ColorScale {
        ColorScale::with_max(self.scale_max)
    }

    /// Output file for one airline's calendar.
    pub fn chart_path(&self, airline: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}_{}.svg", airline, self.target_year))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_applies_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.json");
        std::fs::write(&path, r#"{ "archive_path": "flights.csv.zip" }"#).unwrap();

        let config = ReportConfig::load(&path).unwrap();
        assert_eq!(config, ReportConfig::new("flights.csv.zip"));
        assert_eq!(config.batch_size.get(), 100_000);
        assert!(config.airline_filter.contains("AA"));
        assert_eq!(config.scale_max, 0.6);
    }

    #[test]
    fn test_load_full_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.json");
        std::fs::write(
            &path,
            r#"{
                "archive_path": "f.zip",
                "batch_size": 500,
                "airline_filter": ["DL", "UA"],
                "target_year": 2016,
                "scale_max": 0.4,
                "delimiter": ";",
                "output_dir": "out"
            }"#,
        )
        .unwrap();

        let config = ReportConfig::load(&path).unwrap();
        assert_eq!(config.batch_size.get(), 500);
        assert_eq!(config.airline_filter.len(), 2);
        assert_eq!(config.delimiter_byte().unwrap(), b';');
        assert_eq!(config.chart_path("DL"), PathBuf::from("out").join("DL_2016.svg"));
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.json");
        std::fs::write(&path, r#"{ "archive_path": "f.zip", "batch_size": 0 }"#).unwrap();

        assert!(matches!(ReportConfig::load(&path), Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_empty_airline_filter_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.json");
        std::fs::write(&path, r#"{ "archive_path": "f.zip", "airline_filter": [] }"#).unwrap();

        assert!(ReportConfig::load(&path).is_err());
    }

    #[test]
    fn test_validate_scale_and_delimiter() {
        let mut config = ReportConfig::new("f.zip");
        config.scale_max = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidScaleMax(_))));

        config.scale_max = 0.6;
        config.delimiter = 'é';
        assert!(matches!(config.validate(), Err(ConfigError::InvalidDelimiter(_))));

        config.delimiter = '\t';
        assert!(config.validate().is_ok());
    }
}
