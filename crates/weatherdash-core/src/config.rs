use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Environment variable that overrides `api.api_key`
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add an error
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Add a warning
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Weather provider settings
    #[serde(default)]
    pub api: ApiConfig,

    /// UI preferences
    #[serde(default)]
    pub ui: UiConfig,

    /// Location search settings
    #[serde(default)]
    pub search: SearchConfig,

    /// Position lookup settings
    #[serde(default)]
    pub geolocation: GeolocationConfig,

    /// Durable storage settings
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// OpenWeatherMap API key (can also be set via `OPENWEATHER_API_KEY`)
    #[serde(default)]
    pub api_key: String,

    /// Base URL for the current weather and forecast endpoints
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Base URL for the geocoding endpoint
    #[serde(default = "default_geo_url")]
    pub geo_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_geo_url() -> String {
    "https://api.openweathermap.org/geo/1.0".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            geo_url: default_geo_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiConfig {
    /// Check if an API key is configured (not a placeholder)
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty() && !self.api_key.starts_with("YOUR_")
    }
}

/// Display unit preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DisplayUnits {
    #[default]
    Metric,
    Imperial,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UiConfig {
    /// Dark mode enabled at startup
    #[serde(default)]
    pub dark_mode: bool,

    /// Unit system used at startup
    #[serde(default)]
    pub units: DisplayUnits,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Quiet period after the last keystroke before searching
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Queries shorter than this (after trimming) never hit the network
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,

    /// Maximum number of suggestions requested from the geocoder
    #[serde(default = "default_result_limit")]
    pub result_limit: u8,
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_min_query_len() -> usize {
    2
}

fn default_result_limit() -> u8 {
    5
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_query_len: default_min_query_len(),
            result_limit: default_result_limit(),
        }
    }
}

/// Where the current position comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GeolocationSource {
    /// IP-based lookup over HTTP
    #[default]
    Ip,
    /// Coordinates from `fixed_lat`/`fixed_lon`
    Fixed,
    /// No position capability
    None,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeolocationConfig {
    #[serde(default)]
    pub source: GeolocationSource,

    #[serde(default = "default_ip_url")]
    pub ip_url: String,

    #[serde(default)]
    pub fixed_lat: Option<f64>,

    #[serde(default)]
    pub fixed_lon: Option<f64>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// A fix younger than this may be reused instead of asking again
    #[serde(default = "default_max_cached_age_secs")]
    pub max_cached_age_secs: u64,
}

fn default_ip_url() -> String {
    "http://ip-api.com/json".to_string()
}

fn default_max_cached_age_secs() -> u64 {
    600
}

impl Default for GeolocationConfig {
    fn default() -> Self {
        Self {
            source: GeolocationSource::default(),
            ip_url: default_ip_url(),
            fixed_lat: None,
            fixed_lon: None,
            timeout_secs: default_timeout_secs(),
            max_cached_age_secs: default_max_cached_age_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding `lastLocation.json` and `weatherFavorites.json`
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("weatherdash")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let config = Self::default();
            config.save_to(&config_path)?;
            return Ok(config.with_env_overrides());
        }

        Self::load_from(&config_path).map(Self::with_env_overrides)
    }

    /// Load configuration from an explicit path without applying
    /// environment overrides
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                self.api.api_key = key;
            }
        }
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        validate_url(&self.api.base_url, "api.base_url", &mut result);
        validate_url(&self.api.geo_url, "api.geo_url", &mut result);

        if self.api.timeout_secs == 0 {
            result.add_error("api.timeout_secs", "Timeout must be greater than 0");
        }

        if !self.api.has_api_key() {
            result.add_warning(
                "api.api_key",
                format!(
                    "No API key configured (set it in config.toml or {}) - requests will be rejected",
                    API_KEY_ENV
                ),
            );
        }

        if self.search.min_query_len == 0 {
            result.add_error(
                "search.min_query_len",
                "Minimum query length must be at least 1",
            );
        }

        if self.search.result_limit == 0 {
            result.add_error("search.result_limit", "Result limit must be at least 1");
        }

        if self.search.debounce_ms > 5000 {
            result.add_warning(
                "search.debounce_ms",
                "Search debounce is longer than 5 seconds",
            );
        }

        match self.geolocation.source {
            GeolocationSource::Ip => {
                validate_url(&self.geolocation.ip_url, "geolocation.ip_url", &mut result);
            }
            GeolocationSource::Fixed => match (self.geolocation.fixed_lat, self.geolocation.fixed_lon) {
                (Some(lat), Some(lon)) => {
                    if !(-90.0..=90.0).contains(&lat) {
                        result.add_error("geolocation.fixed_lat", "Latitude must be within -90..90");
                    }
                    if !(-180.0..=180.0).contains(&lon) {
                        result.add_error(
                            "geolocation.fixed_lon",
                            "Longitude must be within -180..180",
                        );
                    }
                }
                _ => {
                    result.add_error(
                        "geolocation",
                        "Fixed source requires both fixed_lat and fixed_lon",
                    );
                }
            },
            GeolocationSource::None => {}
        }

        if self.geolocation.timeout_secs == 0 {
            result.add_error(
                "geolocation.timeout_secs",
                "Timeout must be greater than 0",
            );
        }

        result
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to an explicit path
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        // Ensure config directory exists
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(config_path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("weatherdash");

        Ok(config_dir.join("config.toml"))
    }
}

/// Validate a URL field
fn validate_url(url_str: &str, field_name: &str, result: &mut ValidationResult) {
    match Url::parse(url_str) {
        Ok(url) => {
            if url.scheme() != "http" && url.scheme() != "https" {
                result.add_error(
                    field_name,
                    format!("URL must use http or https scheme, got: {}", url.scheme()),
                );
            }

            if url.host().is_none() {
                result.add_error(field_name, "URL must have a host");
            }
        }
        Err(e) => {
            result.add_error(field_name, format!("Invalid URL: {}", e));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_default_config() {
        let config = Config::default();
        let result = config.validate();
        // Default config should be valid (only warnings, no errors)
        assert!(result.is_valid(), "Default config should be valid: {:?}", result.errors);
    }

    #[test]
    fn test_missing_api_key_is_warning() {
        let config = Config::default();
        let result = config.validate();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.field == "api.api_key"));
    }

    #[test]
    fn test_invalid_url() {
        let mut config = Config::default();
        config.api.base_url = "not-a-url".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "api.base_url"));
    }

    #[test]
    fn test_invalid_url_scheme() {
        let mut config = Config::default();
        config.api.geo_url = "ftp://api.openweathermap.org/geo/1.0".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.message.contains("http or https")));
    }

    #[test]
    fn test_zero_min_query_len() {
        let mut config = Config::default();
        config.search.min_query_len = 0;
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "search.min_query_len"));
    }

    #[test]
    fn test_fixed_source_requires_coordinates() {
        let mut config = Config::default();
        config.geolocation.source = GeolocationSource::Fixed;
        assert!(!config.validate().is_valid());

        config.geolocation.fixed_lat = Some(21.17);
        config.geolocation.fixed_lon = Some(72.83);
        assert!(config.validate().is_valid());

        config.geolocation.fixed_lat = Some(123.0);
        let result = config.validate();
        assert!(result.errors.iter().any(|e| e.field == "geolocation.fixed_lat"));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.ui.dark_mode = true;
        config.ui.units = DisplayUnits::Imperial;
        config.search.debounce_ms = 250;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert!(loaded.ui.dark_mode);
        assert_eq!(loaded.ui.units, DisplayUnits::Imperial);
        assert_eq!(loaded.search.debounce_ms, 250);
        assert_eq!(loaded.search.min_query_len, 2);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[ui]\nunits = \"imperial\"\n").unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.ui.units, DisplayUnits::Imperial);
        assert!(!loaded.ui.dark_mode);
        assert_eq!(loaded.api.timeout_secs, 10);
        assert_eq!(loaded.geolocation.source, GeolocationSource::Ip);
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[ui\n").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_validation_result_error_summary() {
        let mut result = ValidationResult::default();
        result.add_error("field1", "error1");
        result.add_error("field2", "error2");
        let summary = result.error_summary();
        assert!(summary.contains("field1"));
        assert!(summary.contains("field2"));
    }
}
