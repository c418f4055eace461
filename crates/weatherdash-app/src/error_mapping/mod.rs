//! Maps crate errors to weatherdash_core::AppError for consistent user-facing messages.
//! Each source crate has its own module to keep mappings small and readable.

mod location;
mod storage;
mod weather;

use weatherdash_core::AppError;

/// Conversion into the application-wide error type.
///
/// A local trait because both sides of the conversion live in other crates.
pub trait IntoAppError {
    fn into_app_error(self) -> AppError;
}
