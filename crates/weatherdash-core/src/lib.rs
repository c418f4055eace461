pub mod config;
pub mod error;

pub use config::{
    ApiConfig, Config, DisplayUnits, GeolocationConfig, GeolocationSource, SearchConfig,
    StorageConfig, UiConfig, ValidationResult,
};
pub use error::{AppError, ConfigError, LocationError, StorageError, WeatherError};

use anyhow::Result;

/// Initialize logging for the application
pub fn init() -> Result<()> {
    // Initialize tracing/logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("weatherdash core initialized");
    Ok(())
}
