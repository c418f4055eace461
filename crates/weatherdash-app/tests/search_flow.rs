//! Search box to dashboard, wired the way the binary wires it.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use parking_lot::Mutex;
use weatherdash_app::{AppServices, DashboardStatus, SearchEvent};
use weatherdash_core::Config;
use weatherdash_store::MemoryStore;
use weatherdash_weather::{
    ForecastSeries, Location, Temperatures, UnitSystem, UnsupportedSource, WeatherApi,
    WeatherCondition, WeatherError, WeatherSnapshot,
};

#[derive(Default)]
struct Geocoder {
    searches: Mutex<Vec<String>>,
}

#[async_trait]
impl WeatherApi for Geocoder {
    async fn fetch_current(
        &self,
        location: &Location,
        units: UnitSystem,
    ) -> Result<WeatherSnapshot, WeatherError> {
        let at = Utc.timestamp_opt(1_709_281_800, 0).unwrap();
        Ok(WeatherSnapshot {
            name: location.name.clone(),
            coordinates: location.coordinates(),
            observed_at: at,
            condition: WeatherCondition::Rain,
            condition_code: 500,
            description: "light rain".to_string(),
            temperature: Temperatures {
                current: 9.0,
                min: 7.0,
                max: 11.0,
                feels_like: 6.5,
            },
            humidity: 80,
            wind_speed: 5.0,
            sunrise: at,
            sunset: at,
            utc_offset_secs: 0,
            units,
        })
    }

    async fn fetch_forecast(
        &self,
        _location: &Location,
        units: UnitSystem,
    ) -> Result<ForecastSeries, WeatherError> {
        Ok(ForecastSeries {
            samples: Vec::new(),
            utc_offset_secs: 0,
            units,
        })
    }

    async fn search(&self, query: &str) -> Result<Vec<Location>, WeatherError> {
        self.searches.lock().push(query.to_string());
        Ok(vec![Location::new("London, England, GB", 51.5073, -0.1276)])
    }
}

#[tokio::test(start_paused = true)]
async fn picking_a_suggestion_loads_it() {
    let geocoder = Arc::new(Geocoder::default());
    let (services, mut events) = AppServices::with_parts(
        &Config::default(),
        geocoder.clone(),
        Arc::new(UnsupportedSource),
        Arc::new(MemoryStore::new()),
    );

    services.search.set_query("Lon");
    while let Some(event) = events.recv().await {
        if event == SearchEvent::ResultsChanged && services.search.state().is_open {
            break;
        }
    }
    assert_eq!(*geocoder.searches.lock(), vec!["Lon".to_string()]);

    let location = services.search.select(0).unwrap();
    services.dashboard.fetch_weather(location).await;

    let view = services.dashboard.view();
    assert_eq!(view.status, DashboardStatus::Ready);
    assert_eq!(view.weather.unwrap().name, "London, England, GB");
    assert_eq!(services.search.state().query, "London, England, GB");
    assert_eq!(geocoder.searches.lock().len(), 1);
}
