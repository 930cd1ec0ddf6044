//! Configuration management and validation.
//!
//! Configuration is layered: built-in defaults, then an optional TOML file,
//! then environment variables, then command-line overrides applied by the CLI.

use crate::constants::{
    APP_NAME, DEFAULT_COUNTRY, DEFAULT_GEOCODING_BASE_URL, DEFAULT_LAST_CHECKED_FILE,
    DEFAULT_MANIFEST_SUFFIX, DEFAULT_OUTPUT_DIR, DEFAULT_POSTAL_BASE_URL, DEFAULT_POSTAL_STATE,
    DEFAULT_REPORT_SUFFIX, DEFAULT_TIMEOUT_SECS, DEFAULT_TOP_N, OUTPUT_DATE_FORMAT, env_vars,
};
use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub providers: ProvidersConfig,
    pub report: ReportConfig,
    pub output: OutputConfig,
    pub watch: WatchConfig,
}

/// Postal directory and geocoding endpoints
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    /// ViaCEP base URL
    pub postal_base_url: String,

    /// State (UF) used for reverse street searches
    pub postal_state: String,

    pub geocoding_base_url: String,

    /// Google API key; usually supplied through `GOOGLE_API_KEY`
    #[serde(skip_serializing)]
    pub geocoding_api_key: Option<String>,

    /// Country appended to geocoding queries
    pub country: String,

    /// Per-call timeout in seconds; a timeout counts as "not found"
    pub timeout_secs: u64,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            postal_base_url: DEFAULT_POSTAL_BASE_URL.to_string(),
            postal_state: DEFAULT_POSTAL_STATE.to_string(),
            geocoding_base_url: DEFAULT_GEOCODING_BASE_URL.to_string(),
            geocoding_api_key: None,
            country: DEFAULT_COUNTRY.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

// The API key never reaches the logs
impl std::fmt::Debug for ProvidersConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProvidersConfig")
            .field("postal_base_url", &self.postal_base_url)
            .field("postal_state", &self.postal_state)
            .field("geocoding_base_url", &self.geocoding_base_url)
            .field(
                "geocoding_api_key",
                &self.geocoding_api_key.as_ref().map(|_| "<redacted>"),
            )
            .field("country", &self.country)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Entries per report section
    pub top_n: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
        }
    }
}

/// Where generated files go and how they are named
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,

    /// Corrected manifest name, after the date prefix
    pub manifest_suffix: String,

    /// Report name, after the date prefix
    pub report_suffix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(DEFAULT_OUTPUT_DIR),
            manifest_suffix: DEFAULT_MANIFEST_SUFFIX.to_string(),
            report_suffix: DEFAULT_REPORT_SUFFIX.to_string(),
        }
    }
}

impl OutputConfig {
    /// `<dir>/<dd-mm-YYYY> [label ]<manifest_suffix>`
    pub fn manifest_path(&self, date: NaiveDate, label: Option<&str>) -> PathBuf {
        self.dated_path(date, label, &self.manifest_suffix)
    }

    /// `<dir>/<dd-mm-YYYY> [label ]<report_suffix>`
    pub fn report_path(&self, date: NaiveDate, label: Option<&str>) -> PathBuf {
        self.dated_path(date, label, &self.report_suffix)
    }

    /// The label keeps outputs apart when several manifests run on one day
    fn dated_path(&self, date: NaiveDate, label: Option<&str>, suffix: &str) -> PathBuf {
        let date = date.format(OUTPUT_DATE_FORMAT);
        let name = match label {
            Some(label) => format!("{} {} {}", date, label, suffix),
            None => format!("{} {}", date, suffix),
        };
        self.directory.join(name)
    }
}

/// Directory polling state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// File holding the time of the last directory scan
    pub last_checked_file: PathBuf,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            last_checked_file: PathBuf::from(DEFAULT_LAST_CHECKED_FILE),
        }
    }
}

impl Config {
    /// `~/.config/manifest-reconciler/config.toml`
    pub fn default_config_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_NAME).join("config.toml"))
            .ok_or_else(|| Error::configuration("Could not determine user config directory"))
    }

    /// Parse a TOML config file; missing keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::io(format!("Failed to read config file '{}'", path.display()), e)
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::configuration(format!("Invalid config file: {}", e)))
    }

    /// Defaults, then `file` if given, then environment variables
    pub fn load_layered(file: Option<&Path>) -> Result<Self> {
        let mut config = match file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok());
        debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    /// Apply environment overrides through `lookup` so tests need not touch
    /// the process environment
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(key) = non_empty(env_vars::GOOGLE_API_KEY) {
            self.providers.geocoding_api_key = Some(key);
        }
        if let Some(dir) = non_empty(env_vars::OUTPUT_DIR) {
            self.output.directory = PathBuf::from(dir);
        }
        if let Some(file) = non_empty(env_vars::LAST_CHECKED_FILE) {
            self.watch.last_checked_file = PathBuf::from(file);
        }
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.report.top_n = top_n;
        self
    }

    pub fn with_output_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.output.directory = directory.into();
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.providers.timeout_secs = timeout_secs;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.report.top_n == 0 {
            return Err(Error::configuration("report.top_n must be at least 1"));
        }
        if self.providers.timeout_secs == 0 {
            return Err(Error::configuration(
                "providers.timeout_secs must be at least 1",
            ));
        }
        if self.providers.postal_base_url.trim().is_empty() {
            return Err(Error::configuration("providers.postal_base_url is empty"));
        }
        if self.providers.geocoding_base_url.trim().is_empty() {
            return Err(Error::configuration(
                "providers.geocoding_base_url is empty",
            ));
        }
        Ok(())
    }

    /// Create the output directory if needed
    pub fn ensure_output_directory(&self) -> Result<()> {
        std::fs::create_dir_all(&self.output.directory).map_err(|e| {
            Error::io(
                format!(
                    "Failed to create output directory '{}'",
                    self.output.directory.display()
                ),
                e,
            )
        })
    }
}
