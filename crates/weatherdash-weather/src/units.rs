//! Unit conversion and display formatting. Pure functions, no state.

use crate::types::UnitSystem;

const MPH_PER_METRE_PER_SEC: f64 = 2.236_936;

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) * 5.0 / 9.0
}

/// Convert a temperature between unit systems
pub fn convert_temperature(value: f64, from: UnitSystem, to: UnitSystem) -> f64 {
    match (from, to) {
        (UnitSystem::Metric, UnitSystem::Imperial) => celsius_to_fahrenheit(value),
        (UnitSystem::Imperial, UnitSystem::Metric) => fahrenheit_to_celsius(value),
        _ => value,
    }
}

/// Convert a wind speed between m/s and mph
pub fn convert_wind_speed(value: f64, from: UnitSystem, to: UnitSystem) -> f64 {
    match (from, to) {
        (UnitSystem::Metric, UnitSystem::Imperial) => value * MPH_PER_METRE_PER_SEC,
        (UnitSystem::Imperial, UnitSystem::Metric) => value / MPH_PER_METRE_PER_SEC,
        _ => value,
    }
}

fn round_to_tenth(value: f64) -> f64 {
    let rounded = (value * 10.0).round() / 10.0;
    // Avoid printing "-0"
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

fn round_whole(value: f64) -> i64 {
    let rounded = value.round();
    if rounded == 0.0 {
        0
    } else {
        rounded as i64
    }
}

/// "21.5°C" style: one decimal, trailing ".0" dropped
pub fn format_temperature(value: f64, units: UnitSystem) -> String {
    format!("{}{}", round_to_tenth(value), units.temperature_symbol())
}

/// "22°" style used in compact forecast cells
pub fn format_whole_temperature(value: f64) -> String {
    format!("{}°", round_whole(value))
}

/// "4 m/s" or "9 mph"
pub fn format_wind_speed(value: f64, units: UnitSystem) -> String {
    format!("{} {}", round_whole(value), units.wind_speed_unit())
}
