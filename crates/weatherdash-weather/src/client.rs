//! OpenWeatherMap client: current conditions, 5-day/3-hour forecast and
//! location search.
//!
//! Each call is a single best-effort round trip. No retries, no caching.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::error::{Operation, WeatherError};
use crate::geocode::GeoCandidate;
use crate::types::{ForecastSeries, Location, UnitSystem, WeatherSnapshot};
use crate::wire::{CurrentResponse, ForecastResponse};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_GEO_URL: &str = "https://api.openweathermap.org/geo/1.0";
pub const DEFAULT_SEARCH_LIMIT: u8 = 5;
const REQUEST_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = concat!("weatherdash/", env!("CARGO_PKG_VERSION"));

/// Remote weather operations used by the dashboard and search controller.
#[async_trait]
pub trait WeatherApi: Send + Sync {
    async fn fetch_current(
        &self,
        location: &Location,
        units: UnitSystem,
    ) -> Result<WeatherSnapshot, WeatherError>;

    async fn fetch_forecast(
        &self,
        location: &Location,
        units: UnitSystem,
    ) -> Result<ForecastSeries, WeatherError>;

    /// Up to the configured limit of candidates for a free-text place name
    async fn search(&self, query: &str) -> Result<Vec<Location>, WeatherError>;
}

/// Connection settings for [`WeatherClient`]
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub api_key: String,
    pub base_url: String,
    pub geo_url: String,
    pub timeout: Duration,
    pub search_limit: u8,
}

impl ClientSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            geo_url: DEFAULT_GEO_URL.to_string(),
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            search_limit: DEFAULT_SEARCH_LIMIT,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_geo_url(mut self, geo_url: impl Into<String>) -> Self {
        self.geo_url = geo_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_search_limit(mut self, limit: u8) -> Self {
        self.search_limit = limit;
        self
    }
}

#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Arc<Client>,
    settings: ClientSettings,
}

impl WeatherClient {
    pub fn new(settings: ClientSettings) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client: Arc::new(client),
            settings,
        })
    }

    fn endpoint(base: &str, path: &str) -> String {
        format!("{}/{}", base.trim_end_matches('/'), path)
    }

    fn weather_query(&self, location: &Location, units: UnitSystem) -> Vec<(&'static str, String)> {
        vec![
            ("lat", location.lat.to_string()),
            ("lon", location.lon.to_string()),
            ("units", units.as_query().to_string()),
            ("appid", self.settings.api_key.clone()),
        ]
    }

    /// Issue a GET and decode the body. Every failure is logged with its
    /// detail and reported as `WeatherError::Failed(op)`.
    async fn get_json<T: DeserializeOwned>(
        &self,
        op: Operation,
        url: &str,
        query: &[(&'static str, String)],
    ) -> Result<T, WeatherError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(operation = %op, "Request failed: {}", e.without_url());
                WeatherError::Failed(op)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(operation = %op, status = status.as_u16(), "Provider returned error: {}", body);
            return Err(WeatherError::Failed(op));
        }

        let body = response.text().await.map_err(|e| {
            tracing::error!(operation = %op, "Failed to read response body: {}", e.without_url());
            WeatherError::Failed(op)
        })?;

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(operation = %op, "Malformed response: {}", e);
            WeatherError::Failed(op)
        })
    }
}

fn malformed(op: Operation, detail: String) -> WeatherError {
    tracing::error!(operation = %op, "Malformed response: {}", detail);
    WeatherError::Failed(op)
}

#[async_trait]
impl WeatherApi for WeatherClient {
    #[instrument(skip(self), level = "info")]
    async fn fetch_current(
        &self,
        location: &Location,
        units: UnitSystem,
    ) -> Result<WeatherSnapshot, WeatherError> {
        let url = Self::endpoint(&self.settings.base_url, "weather");
        let query = self.weather_query(location, units);

        let wire: CurrentResponse = self.get_json(Operation::Current, &url, &query).await?;
        wire.into_snapshot(units)
            .map_err(|detail| malformed(Operation::Current, detail))
    }

    #[instrument(skip(self), level = "info")]
    async fn fetch_forecast(
        &self,
        location: &Location,
        units: UnitSystem,
    ) -> Result<ForecastSeries, WeatherError> {
        let url = Self::endpoint(&self.settings.base_url, "forecast");
        let query = self.weather_query(location, units);

        let wire: ForecastResponse = self.get_json(Operation::Forecast, &url, &query).await?;
        wire.into_series(units)
            .map_err(|detail| malformed(Operation::Forecast, detail))
    }

    #[instrument(skip(self), level = "info")]
    async fn search(&self, query: &str) -> Result<Vec<Location>, WeatherError> {
        let url = Self::endpoint(&self.settings.geo_url, "direct");
        let params = [
            ("q", query.to_string()),
            ("limit", self.settings.search_limit.to_string()),
            ("appid", self.settings.api_key.clone()),
        ];

        let candidates: Vec<GeoCandidate> = self.get_json(Operation::Search, &url, &params).await?;
        let locations: Vec<Location> = candidates
            .into_iter()
            .take(usize::from(self.settings.search_limit))
            .map(Location::from)
            .collect();

        tracing::debug!("Search returned {} candidates", locations.len());
        Ok(locations)
    }
}
