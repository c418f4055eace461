use weatherdash_core::{AppError, LocationError};
use weatherdash_weather::LocationError as PositionError;

use super::IntoAppError;

impl IntoAppError for PositionError {
    fn into_app_error(self) -> AppError {
        let mapped = match self {
            PositionError::PermissionDenied => LocationError::PermissionDenied,
            PositionError::PositionUnavailable => LocationError::Unavailable,
            PositionError::Timeout => LocationError::Timeout,
            PositionError::Unsupported => LocationError::Unsupported,
            PositionError::Other(s) => LocationError::Other(s),
        };
        AppError::Location(mapped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_provider_text() {
        for code in [1, 2, 3, 99] {
            let err = PositionError::from_code(code);
            let text = err.to_string();
            assert_eq!(err.into_app_error().user_message(), text);
        }
    }
}
