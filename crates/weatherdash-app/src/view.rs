//! Plain-text renderers for the dashboard panels.

use weatherdash_weather::units::{format_temperature, format_whole_temperature, format_wind_speed};
use weatherdash_weather::{ForecastSeries, Location, WeatherSnapshot};

use crate::dashboard::DashboardView;
use crate::search::SearchState;

const TIME_FORMAT: &str = "%H:%M";

pub const MANUAL_SEARCH_HINT: &str = "Please search for a location manually.";

/// Title line with the theme marker and active unit
pub fn header(view: &DashboardView) -> String {
    let theme = if view.dark_mode { "[dark]" } else { "[light]" };
    format!(
        "Weather Dashboard {} {}",
        theme,
        view.units.temperature_symbol()
    )
}

pub fn current_card(weather: &WeatherSnapshot, is_favorite: bool) -> String {
    let units = weather.units;
    let local = weather.local_time(weather.observed_at);
    let marker = if is_favorite { "★" } else { "☆" };

    [
        format!("{} {}", weather.name, marker),
        local.format("%A, %B %-d").to_string(),
        format!(
            "{} {} ({})",
            format_temperature(weather.temperature.current, units),
            weather.description,
            weather.icon_name()
        ),
        format!(
            "Feels like {}",
            format_temperature(weather.temperature.feels_like, units)
        ),
        format!(
            "Low / High {} / {}",
            format_whole_temperature(weather.temperature.min),
            format_whole_temperature(weather.temperature.max)
        ),
        format!(
            "Humidity {}%  Wind {}",
            weather.humidity,
            format_wind_speed(weather.wind_speed, units)
        ),
        format!("Last updated: {}", local.format(TIME_FORMAT)),
    ]
    .join("\n")
}

/// Daily cells; the first one is labelled "Today"
pub fn forecast_strip(forecast: &ForecastSeries) -> String {
    forecast
        .daily()
        .iter()
        .enumerate()
        .map(|(index, day)| {
            let label = if index == 0 {
                "Today".to_string()
            } else {
                day.date.format("%a").to_string()
            };
            format!(
                "{:<6} {:>5} / {:<5} {}",
                label,
                format_whole_temperature(day.high),
                format_whole_temperature(day.low),
                day.description
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn hourly_strip(forecast: &ForecastSeries) -> String {
    forecast
        .hourly()
        .iter()
        .map(|sample| {
            format!(
                "{} {} {}%",
                forecast.local_time(sample.time).format(TIME_FORMAT),
                format_temperature(sample.temperature, forecast.units),
                sample.precipitation_chance
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Numbered list for `open <n>` / `unfav <n>`
pub fn favorites_panel(favorites: &[Location]) -> String {
    if favorites.is_empty() {
        return "No favorite locations yet.".to_string();
    }

    numbered(favorites)
}

pub fn quick_picks_panel(locations: &[Location]) -> String {
    numbered(locations)
}

/// Suggestions are only listed while the list is open
pub fn search_panel(state: &SearchState) -> String {
    if state.is_loading {
        return format!("Searching for \"{}\"...", state.query.trim());
    }
    if !state.is_open {
        return String::new();
    }
    numbered(&state.results)
}

fn numbered(locations: &[Location]) -> String {
    locations
        .iter()
        .enumerate()
        .map(|(i, location)| format!("{:>2}. {}", i + 1, location.name))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Place details in the place's own local time. Not shown for a
/// geolocated position.
pub fn about_panel(weather: &WeatherSnapshot) -> Option<String> {
    if weather.location().is_current_location() {
        return None;
    }

    Some(format!(
        "About {}\nCoordinates: {:.2}, {:.2}\nLocal time: {}\nSunrise: {}\nSunset: {}",
        weather.name,
        weather.coordinates.lat,
        weather.coordinates.lon,
        weather.local_time(weather.observed_at).format(TIME_FORMAT),
        weather.local_time(weather.sunrise).format(TIME_FORMAT),
        weather.local_time(weather.sunset).format(TIME_FORMAT),
    ))
}

/// Loading / error line, if any
pub fn status_line(view: &DashboardView) -> Option<String> {
    if view.is_loading() {
        return Some("Loading weather data...".to_string());
    }
    if let Some(error) = &view.error {
        return Some(error.clone());
    }
    if view.weather.is_some() {
        return None;
    }
    if view.geolocation.is_loading {
        return Some("Detecting your location...".to_string());
    }
    view.geolocation
        .error
        .as_ref()
        .map(|error| format!("{}\n{}", error, MANUAL_SEARCH_HINT))
}

/// Whole screen
pub fn render(view: &DashboardView) -> String {
    let mut sections = vec![header(view)];

    if let Some(status) = status_line(view) {
        sections.push(status);
    }
    if let Some(weather) = &view.weather {
        sections.push(current_card(weather, view.is_favorite));
        if let Some(about) = about_panel(weather) {
            sections.push(about);
        }
    }
    if let Some(forecast) = &view.forecast {
        sections.push(format!("5-Day Forecast\n{}", forecast_strip(forecast)));
        sections.push(format!("Hourly Forecast\n{}", hourly_strip(forecast)));
    }
    sections.push(format!("Favorites\n{}", favorites_panel(&view.favorites)));

    sections.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::DashboardStatus;
    use chrono::{TimeZone, Utc};
    use weatherdash_weather::{
        Coordinates, ForecastSample, GeolocationState, Temperatures, UnitSystem,
        WeatherCondition,
    };

    const IST: i32 = 19_800;

    fn snapshot(name: &str) -> WeatherSnapshot {
        WeatherSnapshot {
            name: name.to_string(),
            coordinates: Coordinates {
                lat: 21.1702,
                lon: 72.8311,
            },
            // 2024-03-01 08:30 UTC = 14:00 IST
            observed_at: Utc.timestamp_opt(1_709_281_800, 0).unwrap(),
            condition: WeatherCondition::Clear,
            condition_code: 800,
            description: "clear sky".to_string(),
            temperature: Temperatures {
                current: 31.24,
                min: 29.4,
                max: 32.6,
                feels_like: 33.0,
            },
            humidity: 40,
            wind_speed: 4.1,
            // 01:15 UTC and 12:45 UTC
            sunrise: Utc.timestamp_opt(1_709_255_700, 0).unwrap(),
            sunset: Utc.timestamp_opt(1_709_297_100, 0).unwrap(),
            utc_offset_secs: IST,
            units: UnitSystem::Metric,
        }
    }

    fn series() -> ForecastSeries {
        // 2024-03-01 00:00 UTC, every 3 hours for 6 days
        let start = 1_709_251_200;
        let samples = (0..48)
            .map(|i| ForecastSample {
                time: Utc.timestamp_opt(start + i * 10_800, 0).unwrap(),
                temperature: 25.0 + i as f64 * 0.1,
                temp_min: 20.0,
                temp_max: 30.0,
                feels_like: 26.0,
                humidity: 50,
                wind_speed: 3.0,
                condition: WeatherCondition::Clear,
                condition_code: 800,
                description: "clear sky".to_string(),
                precipitation_chance: 10,
            })
            .collect();

        ForecastSeries {
            samples,
            utc_offset_secs: IST,
            units: UnitSystem::Metric,
        }
    }

    fn view() -> DashboardView {
        DashboardView {
            status: DashboardStatus::Idle,
            weather: None,
            forecast: None,
            units: UnitSystem::Metric,
            dark_mode: false,
            error: None,
            geolocation: GeolocationState::default(),
            is_favorite: false,
            favorites: Vec::new(),
        }
    }

    #[test]
    fn current_card_shows_local_details() {
        let card = current_card(&snapshot("Surat"), true);

        assert!(card.starts_with("Surat ★"));
        assert!(card.contains("31.2°C clear sky (sun)"));
        assert!(card.contains("Feels like 33°C"));
        assert!(card.contains("Low / High 29° / 33°"));
        assert!(card.contains("Humidity 40%  Wind 4 m/s"));
        assert!(card.ends_with("Last updated: 14:00"));
    }

    #[test]
    fn forecast_strip_labels_today_and_limits_days() {
        let strip = forecast_strip(&series());
        let lines: Vec<&str> = strip.lines().collect();

        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("Today"));
        assert!(lines[1].starts_with("Sat"));
        assert!(lines[0].contains("30°"));
        assert!(lines[0].contains("20°"));
    }

    #[test]
    fn hourly_strip_uses_local_time() {
        let strip = hourly_strip(&series());
        let lines: Vec<&str> = strip.lines().collect();

        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], "05:30 25°C 10%");
        assert!(lines[1].starts_with("08:30"));
    }

    #[test]
    fn about_panel_in_place_time() {
        let about = about_panel(&snapshot("Surat")).unwrap();

        assert!(about.contains("About Surat"));
        assert!(about.contains("Coordinates: 21.17, 72.83"));
        assert!(about.contains("Local time: 14:00"));
        assert!(about.contains("Sunrise: 06:45"));
        assert!(about.contains("Sunset: 18:15"));
    }

    #[test]
    fn about_panel_hidden_for_current_location() {
        assert!(about_panel(&snapshot("Current Location")).is_none());
    }

    #[test]
    fn favorites_panel_numbers_entries() {
        assert_eq!(favorites_panel(&[]), "No favorite locations yet.");

        let panel = favorites_panel(&[
            Location::new("Surat", 21.17, 72.83),
            Location::new("Rajkot", 22.30, 70.80),
        ]);
        assert_eq!(panel, " 1. Surat\n 2. Rajkot");
    }

    #[test]
    fn status_line_priorities() {
        let mut v = view();
        assert_eq!(status_line(&v), None);

        v.geolocation.error = Some("Location access was denied".to_string());
        assert_eq!(
            status_line(&v).as_deref(),
            Some("Location access was denied\nPlease search for a location manually.")
        );

        v.geolocation.is_loading = true;
        assert_eq!(
            status_line(&v).as_deref(),
            Some("Detecting your location...")
        );

        v.error = Some("Failed to fetch weather data. Please try again.".to_string());
        assert_eq!(
            status_line(&v).as_deref(),
            Some("Failed to fetch weather data. Please try again.")
        );

        v.status = DashboardStatus::Loading;
        assert_eq!(status_line(&v).as_deref(), Some("Loading weather data..."));
    }

    #[test]
    fn header_shows_theme() {
        let mut v = view();
        assert_eq!(header(&v), "Weather Dashboard [light] °C");

        v.dark_mode = true;
        v.units = UnitSystem::Imperial;
        assert_eq!(header(&v), "Weather Dashboard [dark] °F");
    }

    #[test]
    fn search_panel_hides_closed_list() {
        let mut state = SearchState {
            query: "Lon".to_string(),
            results: vec![Location::new("London, England, GB", 51.5, -0.12)],
            is_loading: false,
            is_open: false,
        };
        assert_eq!(search_panel(&state), "");

        state.is_open = true;
        assert_eq!(search_panel(&state), " 1. London, England, GB");
    }
}
