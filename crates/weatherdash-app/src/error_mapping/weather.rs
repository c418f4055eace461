use weatherdash_core::{AppError, WeatherError};
use weatherdash_weather::{Operation, WeatherError as ClientError};

use super::IntoAppError;

impl IntoAppError for ClientError {
    fn into_app_error(self) -> AppError {
        let mapped = match self {
            ClientError::Failed(Operation::Current) => WeatherError::CurrentFailed,
            ClientError::Failed(Operation::Forecast) => WeatherError::ForecastFailed,
            ClientError::Failed(Operation::Search) => WeatherError::SearchFailed,
            ClientError::Client(e) => WeatherError::ClientSetup(e.to_string()),
        };
        AppError::Weather(mapped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_failure_keeps_message() {
        let err = ClientError::Failed(Operation::Search).into_app_error();
        assert_eq!(
            err.user_message(),
            "Failed to search locations. Please try again."
        );
    }

    #[test]
    fn forecast_failure_maps_to_forecast() {
        let err = ClientError::Failed(Operation::Forecast).into_app_error();
        assert!(matches!(err, AppError::Weather(WeatherError::ForecastFailed)));
    }
}
