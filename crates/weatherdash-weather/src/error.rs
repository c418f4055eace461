//! Weather and location error types.

use std::fmt;

use thiserror::Error;

/// Remote operation a [`WeatherError::Failed`] refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Current,
    Forecast,
    Search,
}

impl Operation {
    /// The single message shown to the user when this operation fails
    pub fn failure_message(&self) -> &'static str {
        match self {
            Self::Current => "Failed to fetch weather data. Please try again.",
            Self::Forecast => "Failed to fetch forecast data. Please try again.",
            Self::Search => "Failed to search locations. Please try again.",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Current => "current weather",
            Self::Forecast => "forecast",
            Self::Search => "location search",
        };
        f.write_str(name)
    }
}

/// Weather provider errors.
///
/// Transport failures, error statuses and malformed bodies all collapse into
/// `Failed`; the underlying detail is logged where it happens.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("{}", .0.failure_message())]
    Failed(Operation),

    #[error("Failed to create HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

impl WeatherError {
    pub fn operation(&self) -> Option<Operation> {
        match self {
            Self::Failed(op) => Some(*op),
            Self::Client(_) => None,
        }
    }
}

/// Location service errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("Location access was denied")]
    PermissionDenied,
    #[error("Location information is unavailable")]
    PositionUnavailable,
    #[error("Location request timed out")]
    Timeout,
    #[error("Geolocation is not supported on this platform")]
    Unsupported,
    #[error("Failed to get your location")]
    Other(String),
}

impl LocationError {
    /// Map a W3C-style position error code (1 denied, 2 unavailable,
    /// 3 timeout) to an error
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => Self::PermissionDenied,
            2 => Self::PositionUnavailable,
            3 => Self::Timeout,
            other => Self::Other(format!("position error code {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_display_is_generic() {
        assert_eq!(
            WeatherError::Failed(Operation::Current).to_string(),
            "Failed to fetch weather data. Please try again."
        );
        assert_eq!(
            WeatherError::Failed(Operation::Search).to_string(),
            "Failed to search locations. Please try again."
        );
    }

    #[test]
    fn test_location_code_mapping() {
        assert_eq!(LocationError::from_code(1), LocationError::PermissionDenied);
        assert_eq!(LocationError::from_code(2), LocationError::PositionUnavailable);
        assert_eq!(LocationError::from_code(3), LocationError::Timeout);
        assert!(matches!(LocationError::from_code(7), LocationError::Other(_)));
    }

    #[test]
    fn test_location_messages() {
        assert_eq!(
            LocationError::PermissionDenied.to_string(),
            "Location access was denied"
        );
        assert_eq!(
            LocationError::Other("code 9".into()).to_string(),
            "Failed to get your location"
        );
    }
}
