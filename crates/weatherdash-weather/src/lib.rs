//! Weather data for weatherdash
//!
//! Current conditions, 5-day/3-hour forecasts and place search from an
//! OpenWeatherMap-compatible provider, plus one-shot geolocation.

pub mod client;
pub mod error;
pub mod geocode;
pub mod geolocation;
pub mod types;
pub mod units;
mod wire;

pub use client::{ClientSettings, WeatherApi, WeatherClient};
pub use error::{LocationError, Operation, WeatherError};
pub use geolocation::{
    FixedPositionSource, GeolocationProvider, GeolocationState, IpPositionSource,
    PositionOptions, PositionSource, UnsupportedSource,
};
pub use types::*;
