//! Dashboard orchestration: which location is shown, in which units, and
//! whether the last fetch succeeded.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use weatherdash_core::{AppError, WeatherError as FetchError};
use weatherdash_store::{FavoritesStore, KeyValueStore, LastLocationStore};
use weatherdash_weather::{
    ForecastSeries, GeolocationProvider, GeolocationState, Location, UnitSystem, WeatherApi,
    WeatherError, WeatherSnapshot,
};

use crate::error_mapping::IntoAppError;

/// Cities offered as one-click shortcuts
pub const QUICK_PICKS: [(&str, f64, f64); 6] = [
    ("Surat", 21.1702, 72.8311),
    ("Ahmedabad", 23.0225, 72.5714),
    ("Nadiad", 22.7000, 72.8700),
    ("Anand", 22.5525, 72.9552),
    ("Rajkot", 22.3039, 70.8022),
    ("Vadodara", 22.3072, 73.1812),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DashboardStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Error,
}

/// Everything a renderer needs, copied out of the dashboard
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub status: DashboardStatus,
    pub weather: Option<WeatherSnapshot>,
    pub forecast: Option<ForecastSeries>,
    pub units: UnitSystem,
    pub dark_mode: bool,
    pub error: Option<String>,
    pub geolocation: GeolocationState,
    pub is_favorite: bool,
    pub favorites: Vec<Location>,
}

impl DashboardView {
    pub fn is_loading(&self) -> bool {
        self.status == DashboardStatus::Loading
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DashboardOptions {
    pub units: UnitSystem,
    pub dark_mode: bool,
}

#[derive(Debug, Default)]
struct DashboardState {
    status: DashboardStatus,
    weather: Option<WeatherSnapshot>,
    forecast: Option<ForecastSeries>,
    units: UnitSystem,
    dark_mode: bool,
    error: Option<String>,
    /// Location of the most recently issued fetch
    requested: Option<Location>,
}

pub struct Dashboard {
    api: Arc<dyn WeatherApi>,
    geolocation: GeolocationProvider,
    favorites: Mutex<FavoritesStore>,
    last_location: LastLocationStore,
    state: Mutex<DashboardState>,
    sequence: AtomicU64,
}

impl Dashboard {
    pub fn new(
        api: Arc<dyn WeatherApi>,
        geolocation: GeolocationProvider,
        storage: Arc<dyn KeyValueStore>,
        options: DashboardOptions,
    ) -> Self {
        Self {
            api,
            geolocation,
            favorites: Mutex::new(FavoritesStore::load(Arc::clone(&storage))),
            last_location: LastLocationStore::new(storage),
            state: Mutex::new(DashboardState {
                units: options.units,
                dark_mode: options.dark_mode,
                ..Default::default()
            }),
            sequence: AtomicU64::new(0),
        }
    }

    /// Show the last viewed location, or fall back to geolocation.
    pub async fn start(&self) {
        match self.last_location.load() {
            Some(location) => {
                tracing::info!("Restoring last location: {}", location.name);
                self.fetch_weather(location).await;
            }
            None => self.locate().await,
        }
    }

    /// Ask for the current position and show it as "Current Location".
    pub async fn locate(&self) {
        if let Some(coordinates) = self.geolocation.get_location().await {
            self.fetch_weather(Location::current(coordinates)).await;
        }
    }

    /// Load current conditions and forecast for `location`.
    ///
    /// Both must succeed for anything to change; a failure keeps whatever
    /// was displayed before. Completions overtaken by a newer fetch are
    /// dropped.
    pub async fn fetch_weather(&self, location: Location) {
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let units = {
            let mut state = self.state.lock();
            state.status = DashboardStatus::Loading;
            state.error = None;
            state.requested = Some(location.clone());
            state.units
        };

        tracing::info!("Fetching weather for {} ({})", location.name, units.as_query());
        let result = self.load(&location, units).await;

        let mut state = self.state.lock();
        if self.sequence.load(Ordering::SeqCst) != sequence {
            tracing::debug!("Discarding stale weather for {}", location.name);
            return;
        }

        match result {
            Ok((weather, forecast)) => {
                state.weather = Some(weather);
                state.forecast = Some(forecast);
                state.status = DashboardStatus::Ready;
                drop(state);

                if let Err(e) = self.last_location.save(&location) {
                    tracing::warn!("Failed to save last location: {}", e);
                }
            }
            Err(e) => {
                tracing::error!("Weather fetch for {} failed: {}", location.name, e);
                state.error = Some(FetchError::CurrentFailed.user_message().to_string());
                state.status = DashboardStatus::Error;
            }
        }
    }

    async fn load(
        &self,
        location: &Location,
        units: UnitSystem,
    ) -> Result<(WeatherSnapshot, ForecastSeries), AppError> {
        let weather = self
            .api
            .fetch_current(location, units)
            .await
            .map_err(WeatherError::into_app_error)?;
        let forecast = self
            .api
            .fetch_forecast(location, units)
            .await
            .map_err(WeatherError::into_app_error)?;
        Ok((weather, forecast))
    }

    /// Re-fetch so values never show in a stale unit.
    ///
    /// A fetch still in flight is re-issued in the new unit, which also
    /// makes its pending completion stale. Otherwise the displayed location
    /// is re-fetched.
    pub async fn toggle_units(&self) {
        let target = {
            let mut state = self.state.lock();
            state.units = state.units.toggled();
            tracing::info!("Units switched to {}", state.units.as_query());

            if state.status == DashboardStatus::Loading {
                state.requested.clone()
            } else {
                state.weather.as_ref().map(WeatherSnapshot::location)
            }
        };

        if let Some(location) = target {
            self.fetch_weather(location).await;
        }
    }

    /// Returns the new setting.
    pub fn toggle_dark_mode(&self) -> bool {
        let mut state = self.state.lock();
        state.dark_mode = !state.dark_mode;
        state.dark_mode
    }

    fn displayed_location(&self) -> Option<Location> {
        self.state.lock().weather.as_ref().map(WeatherSnapshot::location)
    }

    /// Toggle the displayed location in favorites.
    ///
    /// Returns `None` when nothing is displayed, otherwise the new
    /// favorite state.
    pub fn toggle_favorite(&self) -> Result<Option<bool>, AppError> {
        let Some(location) = self.displayed_location() else {
            return Ok(None);
        };

        self.favorites
            .lock()
            .toggle(location)
            .map(Some)
            .map_err(IntoAppError::into_app_error)
    }

    pub fn is_displayed_favorite(&self) -> bool {
        self.displayed_location()
            .is_some_and(|location| self.favorites.lock().is_favorite(&location))
    }

    pub fn favorites(&self) -> Vec<Location> {
        self.favorites.lock().favorites().to_vec()
    }

    pub fn remove_favorite(&self, location: &Location) -> Result<(), AppError> {
        self.favorites
            .lock()
            .remove(location)
            .map_err(IntoAppError::into_app_error)
    }

    pub fn quick_picks() -> Vec<Location> {
        QUICK_PICKS
            .iter()
            .map(|(name, lat, lon)| Location::new(*name, *lat, *lon))
            .collect()
    }

    pub fn view(&self) -> DashboardView {
        let is_favorite = self.is_displayed_favorite();
        let favorites = self.favorites();
        let geolocation = self.geolocation.state();

        let state = self.state.lock();
        DashboardView {
            status: state.status,
            weather: state.weather.clone(),
            forecast: state.forecast.clone(),
            units: state.units,
            dark_mode: state.dark_mode,
            error: state.error.clone(),
            geolocation,
            is_favorite,
            favorites,
        }
    }
}
