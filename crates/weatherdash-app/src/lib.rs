//! Weather dashboard application layer: search, orchestration and text views.

pub mod app_services;
pub mod dashboard;
pub mod error_mapping;
pub mod search;
pub mod view;

pub use app_services::AppServices;
pub use dashboard::{Dashboard, DashboardOptions, DashboardStatus, DashboardView, QUICK_PICKS};
pub use search::{SearchController, SearchEvent, SearchSettings, SearchState};
