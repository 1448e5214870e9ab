//! Atlas configuration: data files per census year, classification, labels and the remote service.

use std::{path::{Path, PathBuf}, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{classify::ClassBreakpoints, common::ConfigError};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "PRECINCT_OVERLAY_DATA_DIR";

pub(crate) const DEFAULT_SCALE_LABEL: &str = "DZN";
pub(crate) const DEFAULT_INDICATOR: &str = "number of jobs";

/// Top-level configuration, normally read from a TOML file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasConfig {
    /// Directory holding the GeoJSON files; relative file names resolve against it.
    pub data_dir: PathBuf,
    /// Precinct boundary FeatureCollection (`properties.name`).
    pub precincts: PathBuf,
    /// Spatial scale label used in narratives, e.g. "DZN".
    pub scale_label: String,
    /// Indicator name used in narratives, e.g. "number of jobs".
    pub indicator: String,
    pub breakpoints: BreakpointConfig,
    pub remote: RemoteConfig,
    /// One zone collection per census year.
    pub years: Vec<YearSource>,
}

/// How class breakpoints are chosen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum BreakpointConfig {
    /// Literal thresholds; fewer than four falls back to the defaults.
    Fixed { values: Vec<f64> },
    /// Five equal intervals over the maximum value across all years.
    Dynamic,
}

impl Default for BreakpointConfig {
    fn default() -> Self {
        Self::Fixed { values: ClassBreakpoints::DEFAULT.values().to_vec() }
    }
}

/// Optional server-side overlay service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Base URLs tried in order; empty disables the remote path.
    pub endpoints: Vec<String>,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self { endpoints: Vec::new(), timeout_ms: 4_000 }
    }
}

impl RemoteConfig {
    #[inline] pub fn timeout(&self) -> Duration { Duration::from_millis(self.timeout_ms) }
}

/// Zone collection for one census year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearSource {
    pub year: u16,
    pub file: PathBuf,
    /// Property holding the zone code, e.g. `DZN_CODE11`.
    pub code_field: String,
    /// Property holding the numeric value, e.g. `TotJob_11`.
    pub value_field: String,
}

impl YearSource {
    /// Jobs-per-DZN source using the census naming scheme (`DZN_CODE{yy}`, `TotJob_{yy}`).
    pub fn dzn_jobs(year: u16) -> Self {
        let yy = year % 100;
        Self {
            year,
            file: PathBuf::from(format!("Number_of_Jobs_DZN_{yy:02}.geojson")),
            code_field: format!("DZN_CODE{yy:02}"),
            value_field: format!("TotJob_{yy:02}"),
        }
    }
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("public/data"),
            precincts: PathBuf::from("fb-precincts-official-boundary.geojson"),
            scale_label: DEFAULT_SCALE_LABEL.into(),
            indicator: DEFAULT_INDICATOR.into(),
            breakpoints: BreakpointConfig::default(),
            remote: RemoteConfig::default(),
            years: [2011, 2016, 2021].into_iter().map(YearSource::dzn_jobs).collect(),
        }
    }
}

impl AtlasConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&content)
    }

    /// Check for duplicate years, empty property names and invalid literal breakpoints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut years = self.years.iter().map(|source| source.year).collect::<Vec<_>>();
        years.sort_unstable();
        if let Some(pair) = years.windows(2).find(|w| w[0] == w[1]) {
            return Err(ConfigError::Invalid(format!("year {} is listed more than once", pair[0])));
        }

        for source in &self.years {
            if source.code_field.trim().is_empty() || source.value_field.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("year {} has an empty code or value field", source.year)));
            }
        }

        if let BreakpointConfig::Fixed { values } = &self.breakpoints {
            if values.len() >= 4 {
                ClassBreakpoints::from_slice(values)
                    .map_err(|e| ConfigError::Invalid(format!("breakpoints: {e}")))?;
            }
        }

        Ok(())
    }

    /// Resolve the data directory. Priority: explicit argument, then the
    /// `PRECINCT_OVERLAY_DATA_DIR` environment variable, then the configured value.
    pub fn resolve_data_dir(&self, explicit: Option<&Path>) -> PathBuf {
        if let Some(path) = explicit {
            return path.to_path_buf();
        }
        if let Ok(path) = std::env::var(DATA_DIR_ENV) {
            if !path.trim().is_empty() {
                return PathBuf::from(path);
            }
        }
        self.data_dir.clone()
    }

    /// Look up the zone source for a year.
    pub fn year(&self, year: u16) -> Option<&YearSource> {
        self.years.iter().find(|source| source.year == year)
    }
}
