//! Provider response schemas and their conversion into domain types.
//!
//! Conversion fails with a short description when a payload is missing data
//! the domain types require; the client logs it and reports a failed fetch.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::types::{
    Coordinates, ForecastSample, ForecastSeries, Temperatures, UnitSystem, WeatherCondition,
    WeatherSnapshot,
};

#[derive(Debug, Deserialize)]
pub(crate) struct CurrentResponse {
    coord: WireCoord,
    weather: Vec<WireCondition>,
    main: WireMain,
    wind: WireWind,
    dt: i64,
    sys: WireSys,
    #[serde(default)]
    timezone: i32,
    name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ForecastResponse {
    list: Vec<WireForecastItem>,
    city: WireCity,
}

#[derive(Debug, Deserialize)]
struct WireCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct WireCondition {
    id: i32,
    description: String,
}

#[derive(Debug, Deserialize)]
struct WireMain {
    temp: f64,
    feels_like: f64,
    temp_min: f64,
    temp_max: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct WireWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct WireSys {
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct WireForecastItem {
    dt: i64,
    main: WireMain,
    weather: Vec<WireCondition>,
    wind: WireWind,
    /// Probability of precipitation, 0.0..=1.0
    #[serde(default)]
    pop: f64,
}

#[derive(Debug, Deserialize)]
struct WireCity {
    #[serde(default)]
    timezone: i32,
}

fn timestamp(secs: i64, field: &str) -> Result<DateTime<Utc>, String> {
    DateTime::from_timestamp(secs, 0).ok_or_else(|| format!("{} out of range: {}", field, secs))
}

fn first_condition(conditions: &[WireCondition]) -> Result<&WireCondition, String> {
    conditions
        .first()
        .ok_or_else(|| "missing weather condition".to_string())
}

impl CurrentResponse {
    pub(crate) fn into_snapshot(self, units: UnitSystem) -> Result<WeatherSnapshot, String> {
        let condition = first_condition(&self.weather)?;

        Ok(WeatherSnapshot {
            coordinates: Coordinates {
                lat: self.coord.lat,
                lon: self.coord.lon,
            },
            observed_at: timestamp(self.dt, "dt")?,
            condition: WeatherCondition::from_code(condition.id),
            condition_code: condition.id,
            description: condition.description.clone(),
            temperature: Temperatures {
                current: self.main.temp,
                min: self.main.temp_min,
                max: self.main.temp_max,
                feels_like: self.main.feels_like,
            },
            humidity: self.main.humidity,
            wind_speed: self.wind.speed,
            sunrise: timestamp(self.sys.sunrise, "sys.sunrise")?,
            sunset: timestamp(self.sys.sunset, "sys.sunset")?,
            utc_offset_secs: self.timezone,
            units,
            name: self.name,
        })
    }
}

impl ForecastResponse {
    pub(crate) fn into_series(self, units: UnitSystem) -> Result<ForecastSeries, String> {
        let samples = self
            .list
            .into_iter()
            .map(|item| -> Result<ForecastSample, String> {
                let condition = first_condition(&item.weather)?;
                Ok(ForecastSample {
                    time: timestamp(item.dt, "list.dt")?,
                    temperature: item.main.temp,
                    temp_min: item.main.temp_min,
                    temp_max: item.main.temp_max,
                    feels_like: item.main.feels_like,
                    humidity: item.main.humidity,
                    wind_speed: item.wind.speed,
                    condition: WeatherCondition::from_code(condition.id),
                    condition_code: condition.id,
                    description: condition.description.clone(),
                    precipitation_chance: (item.pop.clamp(0.0, 1.0) * 100.0).round() as u8,
                })
            })
            .collect::<Result<Vec<_>, String>>()?;

        Ok(ForecastSeries {
            samples,
            utc_offset_secs: self.city.timezone,
            units,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn current_json() -> serde_json::Value {
        serde_json::json!({
            "coord": {"lon": 72.8311, "lat": 21.1702},
            "weather": [{"id": 802, "main": "Clouds", "description": "scattered clouds", "icon": "03d"}],
            "main": {"temp": 31.2, "feels_like": 34.0, "temp_min": 30.1, "temp_max": 32.4, "pressure": 1008, "humidity": 62},
            "wind": {"speed": 4.1, "deg": 240},
            "dt": 1_709_280_000,
            "sys": {"country": "IN", "sunrise": 1_709_256_600, "sunset": 1_709_298_900},
            "timezone": 19800,
            "name": "Surat"
        })
    }

    #[test]
    fn test_current_into_snapshot() {
        let wire: CurrentResponse = serde_json::from_value(current_json()).unwrap();
        let snapshot = wire.into_snapshot(UnitSystem::Metric).unwrap();

        assert_eq!(snapshot.name, "Surat");
        assert_eq!(snapshot.coordinates.lat, 21.1702);
        assert_eq!(snapshot.condition, WeatherCondition::PartlyCloudy);
        assert_eq!(snapshot.description, "scattered clouds");
        assert_eq!(snapshot.temperature.max, 32.4);
        assert_eq!(snapshot.humidity, 62);
        assert_eq!(snapshot.utc_offset_secs, 19_800);
        assert!(snapshot.is_day());
    }

    #[test]
    fn test_current_without_condition_is_rejected() {
        let mut json = current_json();
        json["weather"] = serde_json::json!([]);
        let wire: CurrentResponse = serde_json::from_value(json).unwrap();
        assert!(wire.into_snapshot(UnitSystem::Metric).is_err());
    }

    #[test]
    fn test_current_missing_field_fails_to_parse() {
        let mut json = current_json();
        json.as_object_mut().unwrap().remove("main");
        assert!(serde_json::from_value::<CurrentResponse>(json).is_err());
    }

    #[test]
    fn test_forecast_into_series() {
        let json = serde_json::json!({
            "cod": "200",
            "list": [
                {
                    "dt": 1_709_280_000,
                    "main": {"temp": 30.0, "feels_like": 31.0, "temp_min": 29.0, "temp_max": 31.0, "humidity": 55},
                    "weather": [{"id": 500, "main": "Rain", "description": "light rain"}],
                    "wind": {"speed": 2.5},
                    "pop": 0.46
                },
                {
                    "dt": 1_709_290_800,
                    "main": {"temp": 28.0, "feels_like": 29.0, "temp_min": 27.5, "temp_max": 28.0, "humidity": 60},
                    "weather": [{"id": 800, "main": "Clear", "description": "clear sky"}],
                    "wind": {"speed": 1.5}
                }
            ],
            "city": {"name": "Surat", "country": "IN", "timezone": 19800}
        });
        let wire: ForecastResponse = serde_json::from_value(json).unwrap();
        let series = wire.into_series(UnitSystem::Imperial).unwrap();

        assert_eq!(series.samples.len(), 2);
        assert_eq!(series.samples[0].precipitation_chance, 46);
        assert_eq!(series.samples[0].condition, WeatherCondition::Rain);
        assert_eq!(series.samples[1].precipitation_chance, 0);
        assert_eq!(series.utc_offset_secs, 19_800);
        assert_eq!(series.units, UnitSystem::Imperial);
    }
}
