//! Centralized error types for weatherdash.
//!
//! Library crates keep their own `thiserror` enums; the app crate maps them
//! into [`AppError`] so every failure reaches the user through
//! [`AppError::user_message`] while the full error stays available for logs.

use thiserror::Error;

/// Top-level application error type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Weather service error: {0}")]
    Weather(#[from] WeatherError),

    #[error("Location error: {0}")]
    Location(#[from] LocationError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Returns a user-friendly message suitable for display in the UI.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Weather(e) => e.user_message(),
            AppError::Location(e) => e.user_message(),
            AppError::Storage(e) => e.user_message(),
            AppError::Config(e) => e.user_message(),
            AppError::Io(_) => "A file operation failed. Please try again.",
            AppError::Other(_) => "An unexpected error occurred. Please try again.",
        }
    }
}

/// Weather provider failures, one per remote operation.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Current weather request failed")]
    CurrentFailed,

    #[error("Forecast request failed")]
    ForecastFailed,

    #[error("Location search failed")]
    SearchFailed,

    #[error("Weather client could not be created: {0}")]
    ClientSetup(String),
}

impl WeatherError {
    pub fn user_message(&self) -> &'static str {
        match self {
            WeatherError::CurrentFailed => "Failed to fetch weather data. Please try again.",
            WeatherError::ForecastFailed => "Failed to fetch forecast data. Please try again.",
            WeatherError::SearchFailed => "Failed to search locations. Please try again.",
            WeatherError::ClientSetup(_) => {
                "Weather service unavailable. Check your network settings."
            }
        }
    }
}

/// Position lookup failures.
#[derive(Debug, Error)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,

    #[error("Location unavailable")]
    Unavailable,

    #[error("Location request timed out")]
    Timeout,

    #[error("Geolocation unsupported")]
    Unsupported,

    #[error("Location error: {0}")]
    Other(String),
}

impl LocationError {
    pub fn user_message(&self) -> &'static str {
        match self {
            LocationError::PermissionDenied => "Location access was denied",
            LocationError::Unavailable => "Location information is unavailable",
            LocationError::Timeout => "Location request timed out",
            LocationError::Unsupported => "Geolocation is not supported on this platform",
            LocationError::Other(_) => "Failed to get your location",
        }
    }
}

/// Durable storage failures.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),
}

impl StorageError {
    pub fn user_message(&self) -> &'static str {
        match self {
            StorageError::WriteFailed(_) => "Failed to save your changes. Please try again.",
            StorageError::ReadFailed(_) => "Unable to read saved data.",
            StorageError::Serialization(_) => "Saved data could not be processed.",
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),

    #[error("Missing required setting: {0}")]
    MissingSetting(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
            ConfigError::ParseError(_) => "Configuration file is malformed. Check your settings.",
            ConfigError::MissingSetting(_) => "A required setting is missing. Check your settings.",
        }
    }
}
