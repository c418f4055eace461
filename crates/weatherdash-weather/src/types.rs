use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use serde::{Deserialize, Serialize};

/// Display name used for positions that came from geolocation
pub const CURRENT_LOCATION_NAME: &str = "Current Location";

/// Two locations with the same name are the same place when both
/// coordinates differ by less than this many degrees
pub const COORDINATE_TOLERANCE: f64 = 0.01;

/// Number of calendar days in the daily forecast view
pub const FORECAST_DAYS: usize = 5;

/// Number of 3-hour samples in the hourly forecast view
pub const HOURLY_SAMPLES: usize = 8;

/// Unit system for temperature and wind speed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    /// Value of the provider's `units` query parameter
    pub fn as_query(&self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::Imperial => "imperial",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Metric => Self::Imperial,
            Self::Imperial => Self::Metric,
        }
    }

    pub fn temperature_symbol(&self) -> &'static str {
        match self {
            Self::Metric => "°C",
            Self::Imperial => "°F",
        }
    }

    pub fn wind_speed_unit(&self) -> &'static str {
        match self {
            Self::Metric => "m/s",
            Self::Imperial => "mph",
        }
    }
}

/// Weather condition categories mapped from provider condition codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    #[default]
    Clear,
    PartlyCloudy,
    Cloudy,
    Fog,
    Haze,
    Drizzle,
    Rain,
    HeavyRain,
    Snow,
    Sleet,
    Thunderstorm,
}

impl WeatherCondition {
    /// Convert an OpenWeatherMap condition id to a WeatherCondition
    /// See: https://openweathermap.org/weather-conditions
    pub fn from_code(code: i32) -> Self {
        match code {
            200..=232 => Self::Thunderstorm,
            300..=321 => Self::Drizzle,
            502..=504 | 522 => Self::HeavyRain,
            511 => Self::Sleet, // Freezing rain
            500..=531 => Self::Rain,
            611..=616 => Self::Sleet,
            600..=622 => Self::Snow,
            701 | 721 | 741 => Self::Fog,
            700..=781 => Self::Haze, // Smoke, dust, sand, ash, squalls
            800 => Self::Clear,
            801 | 802 => Self::PartlyCloudy,
            803 | 804 => Self::Cloudy,
            _ => Self::Clear, // Unknown codes default to clear
        }
    }

    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::PartlyCloudy => "Partly Cloudy",
            Self::Cloudy => "Cloudy",
            Self::Fog => "Fog",
            Self::Haze => "Haze",
            Self::Drizzle => "Drizzle",
            Self::Rain => "Rain",
            Self::HeavyRain => "Heavy Rain",
            Self::Snow => "Snow",
            Self::Sleet => "Sleet",
            Self::Thunderstorm => "Thunderstorm",
        }
    }

    /// Get icon name; clear and partly cloudy skies differ between day and night
    pub fn icon_name(&self, is_day: bool) -> &'static str {
        match (self, is_day) {
            (Self::Clear, true) => "sun",
            (Self::Clear, false) => "moon",
            (Self::PartlyCloudy, true) => "cloud_sun",
            (Self::PartlyCloudy, false) => "cloud_moon",
            (Self::Cloudy, _) => "cloud",
            (Self::Fog, _) | (Self::Haze, _) => "cloud_fog",
            (Self::Drizzle, _) => "cloud_drizzle",
            (Self::Rain, _) | (Self::HeavyRain, _) => "cloud_rain",
            (Self::Snow, _) | (Self::Sleet, _) => "cloud_snow",
            (Self::Thunderstorm, _) => "cloud_lightning",
        }
    }
}

/// Bare geographic position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Named geographic point. Replaced wholesale, never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    pub fn new(name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            name: name.into(),
            lat,
            lon,
        }
    }

    /// Location for a geolocated position
    pub fn current(coordinates: Coordinates) -> Self {
        Self::new(CURRENT_LOCATION_NAME, coordinates.lat, coordinates.lon)
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            lat: self.lat,
            lon: self.lon,
        }
    }

    pub fn is_current_location(&self) -> bool {
        self.name == CURRENT_LOCATION_NAME
    }

    /// Equality used for favorites: same name, coordinates within
    /// [`COORDINATE_TOLERANCE`]
    pub fn same_place(&self, other: &Location) -> bool {
        self.name == other.name
            && (self.lat - other.lat).abs() < COORDINATE_TOLERANCE
            && (self.lon - other.lon).abs() < COORDINATE_TOLERANCE
    }
}

/// Current / min / max / feels-like temperatures in the snapshot's unit system
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Temperatures {
    pub current: f64,
    pub min: f64,
    pub max: f64,
    pub feels_like: f64,
}

/// Current conditions for one place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub name: String,
    pub coordinates: Coordinates,
    pub observed_at: DateTime<Utc>,
    pub condition: WeatherCondition,
    pub condition_code: i32,
    pub description: String,
    pub temperature: Temperatures,
    pub humidity: u8,
    pub wind_speed: f64,
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
    /// Shift from UTC of the observed place, in seconds
    pub utc_offset_secs: i32,
    pub units: UnitSystem,
}

impl WeatherSnapshot {
    /// The location key of this snapshot (name plus provider coordinates)
    pub fn location(&self) -> Location {
        Location::new(
            self.name.clone(),
            self.coordinates.lat,
            self.coordinates.lon,
        )
    }

    pub fn is_day(&self) -> bool {
        self.observed_at > self.sunrise && self.observed_at < self.sunset
    }

    pub fn icon_name(&self) -> &'static str {
        self.condition.icon_name(self.is_day())
    }

    /// Convert a timestamp into the observed place's local time
    pub fn local_time(&self, at: DateTime<Utc>) -> DateTime<FixedOffset> {
        at.with_timezone(&offset_from_secs(self.utc_offset_secs))
    }
}

/// One 3-hour forecast sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    pub time: DateTime<Utc>,
    pub temperature: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub feels_like: f64,
    pub humidity: u8,
    pub wind_speed: f64,
    pub condition: WeatherCondition,
    pub condition_code: i32,
    pub description: String,
    pub precipitation_chance: u8,
}

/// Aggregated forecast for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub low: f64,
    pub high: f64,
    pub condition: WeatherCondition,
    pub description: String,
    pub sample_count: usize,
}

/// Ordered 3-hour samples covering five days
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSeries {
    pub samples: Vec<ForecastSample>,
    pub utc_offset_secs: i32,
    pub units: UnitSystem,
}

impl ForecastSeries {
    /// Group samples by local calendar day, keeping the first
    /// [`FORECAST_DAYS`] distinct days.
    ///
    /// Low/high aggregate every sample of the day; condition and description
    /// come from the day's first sample.
    pub fn daily(&self) -> Vec<DaySummary> {
        let offset = offset_from_secs(self.utc_offset_secs);
        let mut days: Vec<DaySummary> = Vec::with_capacity(FORECAST_DAYS);

        for sample in &self.samples {
            let date = sample.time.with_timezone(&offset).date_naive();
            if let Some(day) = days.iter_mut().find(|d| d.date == date) {
                day.low = day.low.min(sample.temp_min);
                day.high = day.high.max(sample.temp_max);
                day.sample_count += 1;
                continue;
            }

            if days.len() < FORECAST_DAYS {
                days.push(DaySummary {
                    date,
                    low: sample.temp_min,
                    high: sample.temp_max,
                    condition: sample.condition,
                    description: sample.description.clone(),
                    sample_count: 1,
                });
            }
        }

        days
    }

    /// The first [`HOURLY_SAMPLES`] samples
    pub fn hourly(&self) -> &[ForecastSample] {
        let end = self.samples.len().min(HOURLY_SAMPLES);
        &self.samples[..end]
    }

    pub fn local_time(&self, at: DateTime<Utc>) -> DateTime<FixedOffset> {
        at.with_timezone(&offset_from_secs(self.utc_offset_secs))
    }
}

fn offset_from_secs(secs: i32) -> FixedOffset {
    FixedOffset::east_opt(secs).unwrap_or_else(|| Utc.fix())
}
