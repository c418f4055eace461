//! Forward geocoding: place-name candidates from the provider's
//! `/geo/1.0/direct` endpoint.

use serde::Deserialize;

use crate::types::Location;

/// One candidate returned by the geocoder
#[derive(Debug, Deserialize)]
pub(crate) struct GeoCandidate {
    name: String,
    lat: f64,
    lon: f64,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    country: Option<String>,
}

/// Compose a display name like "Springfield, Illinois, US".
/// The state segment is left out when absent or blank.
pub fn display_name(city: &str, state: Option<&str>, country: Option<&str>) -> String {
    let mut name = city.to_string();

    for part in [state, country].into_iter().flatten() {
        let part = part.trim();
        if !part.is_empty() {
            name.push_str(", ");
            name.push_str(part);
        }
    }

    name
}

impl From<GeoCandidate> for Location {
    fn from(candidate: GeoCandidate) -> Self {
        let name = display_name(
            &candidate.name,
            candidate.state.as_deref(),
            candidate.country.as_deref(),
        );
        Location::new(name, candidate.lat, candidate.lon)
    }
}
