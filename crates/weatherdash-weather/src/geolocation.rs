//! One-shot position lookup with loading/error/result state.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tokio::time::Instant;

use crate::error::LocationError;
use crate::types::Coordinates;

const POSITION_TIMEOUT_SECS: u64 = 10;
const MAX_CACHED_AGE_SECS: u64 = 600;

/// Options for a single position request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
    /// A previously obtained fix younger than this may be returned
    pub max_cached_age: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            high_accuracy: false,
            timeout: Duration::from_secs(POSITION_TIMEOUT_SECS),
            max_cached_age: Duration::from_secs(MAX_CACHED_AGE_SECS),
        }
    }
}

/// Platform capability that can answer "where am I?"
#[async_trait]
pub trait PositionSource: Send + Sync {
    fn is_supported(&self) -> bool {
        true
    }

    async fn current_position(&self, options: &PositionOptions)
        -> Result<Coordinates, LocationError>;
}

/// Observable provider state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeolocationState {
    pub location: Option<Coordinates>,
    pub is_loading: bool,
    pub error: Option<String>,
}

pub struct GeolocationProvider {
    source: Arc<dyn PositionSource>,
    options: PositionOptions,
    state: Mutex<GeolocationState>,
}

impl GeolocationProvider {
    pub fn new(source: Arc<dyn PositionSource>, options: PositionOptions) -> Self {
        Self {
            source,
            options,
            state: Mutex::new(GeolocationState::default()),
        }
    }

    pub fn state(&self) -> GeolocationState {
        self.state.lock().clone()
    }

    /// Issue one position request. Calling again re-issues it.
    ///
    /// Returns the coordinates on success; failures are recorded in the
    /// state as a human-readable message.
    pub async fn get_location(&self) -> Option<Coordinates> {
        if !self.source.is_supported() {
            self.state.lock().error = Some(LocationError::Unsupported.to_string());
            return None;
        }

        {
            let mut state = self.state.lock();
            state.is_loading = true;
            state.error = None;
        }

        let result = match tokio::time::timeout(
            self.options.timeout,
            self.source.current_position(&self.options),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(LocationError::Timeout),
        };

        let mut state = self.state.lock();
        state.is_loading = false;
        match result {
            Ok(coordinates) => {
                tracing::info!("Got location: {}, {}", coordinates.lat, coordinates.lon);
                state.location = Some(coordinates);
                Some(coordinates)
            }
            Err(e) => {
                tracing::warn!("Geolocation failed: {:?}", e);
                state.error = Some(e.to_string());
                None
            }
        }
    }
}

/// No position capability on this platform
#[derive(Debug, Default)]
pub struct UnsupportedSource;

#[async_trait]
impl PositionSource for UnsupportedSource {
    fn is_supported(&self) -> bool {
        false
    }

    async fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> Result<Coordinates, LocationError> {
        Err(LocationError::Unsupported)
    }
}

/// Always answers with configured coordinates
#[derive(Debug, Clone, Copy)]
pub struct FixedPositionSource {
    coordinates: Coordinates,
}

impl FixedPositionSource {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            coordinates: Coordinates { lat, lon },
        }
    }
}

#[async_trait]
impl PositionSource for FixedPositionSource {
    async fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> Result<Coordinates, LocationError> {
        Ok(self.coordinates)
    }
}

#[derive(Debug, Deserialize)]
struct IpLookupResponse {
    status: String,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
    #[serde(default)]
    message: Option<String>,
}

/// Approximate position from an IP geolocation service
/// (ip-api.com response shape)
pub struct IpPositionSource {
    client: Client,
    url: String,
    last_fix: Mutex<Option<(Instant, Coordinates)>>,
}

impl IpPositionSource {
    pub fn new(url: impl Into<String>) -> Result<Self, LocationError> {
        let client = Client::builder()
            .build()
            .map_err(|e| LocationError::Other(e.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
            last_fix: Mutex::new(None),
        })
    }

    fn cached(&self, max_age: Duration) -> Option<Coordinates> {
        let last_fix = self.last_fix.lock();
        last_fix
            .filter(|(at, _)| at.elapsed() <= max_age)
            .map(|(_, coordinates)| coordinates)
    }
}

#[async_trait]
impl PositionSource for IpPositionSource {
    async fn current_position(
        &self,
        options: &PositionOptions,
    ) -> Result<Coordinates, LocationError> {
        if let Some(coordinates) = self.cached(options.max_cached_age) {
            tracing::debug!("Reusing cached position fix");
            return Ok(coordinates);
        }

        let response = self
            .client
            .get(&self.url)
            .timeout(options.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LocationError::Timeout
                } else {
                    tracing::debug!("IP lookup request failed: {}", e);
                    LocationError::PositionUnavailable
                }
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(LocationError::PermissionDenied);
        }
        if !status.is_success() {
            tracing::debug!("IP lookup returned status {}", status);
            return Err(LocationError::PositionUnavailable);
        }

        let body: IpLookupResponse = response
            .json()
            .await
            .map_err(|e| LocationError::Other(format!("IP lookup parse error: {}", e)))?;

        let coordinates = match (body.status.as_str(), body.lat, body.lon) {
            ("success", Some(lat), Some(lon)) => Coordinates { lat, lon },
            _ => {
                tracing::debug!(
                    "IP lookup did not resolve: {}",
                    body.message.as_deref().unwrap_or("no message")
                );
                return Err(LocationError::PositionUnavailable);
            }
        };

        *self.last_fix.lock() = Some((Instant::now(), coordinates));
        Ok(coordinates)
    }
}
