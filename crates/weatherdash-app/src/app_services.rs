//! Wires the dashboard and search controller from configuration.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use weatherdash_core::{AppError, Config, DisplayUnits, GeolocationConfig, GeolocationSource};
use weatherdash_store::{FileStore, KeyValueStore};
use weatherdash_weather::{
    ClientSettings, FixedPositionSource, GeolocationProvider, IpPositionSource, PositionOptions,
    PositionSource, UnitSystem, UnsupportedSource, WeatherApi, WeatherClient,
};

use crate::dashboard::{Dashboard, DashboardOptions};
use crate::error_mapping::IntoAppError;
use crate::search::{SearchController, SearchEvent, SearchSettings};

/// Shared application services.
pub struct AppServices {
    pub dashboard: Arc<Dashboard>,
    pub search: SearchController,
    /// Cancelled when the input loop exits
    pub shutdown: CancellationToken,
}

impl AppServices {
    /// Build every service from configuration with file-backed storage.
    pub fn from_config(
        config: &Config,
    ) -> Result<(Self, mpsc::UnboundedReceiver<SearchEvent>), AppError> {
        let storage: Arc<dyn KeyValueStore> =
            Arc::new(FileStore::new(config.storage.data_dir.clone()));
        let api: Arc<dyn WeatherApi> = Arc::new(
            WeatherClient::new(client_settings(config)).map_err(IntoAppError::into_app_error)?,
        );
        let source = position_source(&config.geolocation)?;

        Ok(Self::with_parts(config, api, source, storage))
    }

    /// Build from explicit parts; used by tests with fakes.
    pub fn with_parts(
        config: &Config,
        api: Arc<dyn WeatherApi>,
        source: Arc<dyn PositionSource>,
        storage: Arc<dyn KeyValueStore>,
    ) -> (Self, mpsc::UnboundedReceiver<SearchEvent>) {
        let geolocation = GeolocationProvider::new(source, position_options(&config.geolocation));
        let dashboard = Dashboard::new(
            Arc::clone(&api),
            geolocation,
            storage,
            DashboardOptions {
                units: unit_system(config.ui.units),
                dark_mode: config.ui.dark_mode,
            },
        );
        let (search, rx) = SearchController::new(api, SearchSettings::from(&config.search));

        let services = Self {
            dashboard: Arc::new(dashboard),
            search,
            shutdown: CancellationToken::new(),
        };
        (services, rx)
    }
}

pub fn unit_system(units: DisplayUnits) -> UnitSystem {
    match units {
        DisplayUnits::Metric => UnitSystem::Metric,
        DisplayUnits::Imperial => UnitSystem::Imperial,
    }
}

pub fn client_settings(config: &Config) -> ClientSettings {
    ClientSettings::new(config.api.api_key.clone())
        .with_base_url(config.api.base_url.clone())
        .with_geo_url(config.api.geo_url.clone())
        .with_timeout(Duration::from_secs(config.api.timeout_secs))
        .with_search_limit(config.search.result_limit)
}

pub fn position_options(config: &GeolocationConfig) -> PositionOptions {
    PositionOptions {
        timeout: Duration::from_secs(config.timeout_secs),
        max_cached_age: Duration::from_secs(config.max_cached_age_secs),
        ..PositionOptions::default()
    }
}

/// Select the position source named in configuration.
///
/// A fixed source without both coordinates falls back to unsupported.
pub fn position_source(config: &GeolocationConfig) -> Result<Arc<dyn PositionSource>, AppError> {
    let source: Arc<dyn PositionSource> = match config.source {
        GeolocationSource::Ip => Arc::new(
            IpPositionSource::new(config.ip_url.clone()).map_err(IntoAppError::into_app_error)?,
        ),
        GeolocationSource::Fixed => match (config.fixed_lat, config.fixed_lon) {
            (Some(lat), Some(lon)) => Arc::new(FixedPositionSource::new(lat, lon)),
            _ => {
                tracing::warn!("Fixed geolocation configured without coordinates");
                Arc::new(UnsupportedSource)
            }
        },
        GeolocationSource::None => Arc::new(UnsupportedSource),
    };
    Ok(source)
}
