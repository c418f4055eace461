//! Durable local storage for weatherdash: a key/value backend plus the
//! favorites list and last-viewed location built on it.

pub mod favorites;
pub mod last_location;
pub mod storage;

pub use favorites::{FavoritesStore, FAVORITES_KEY};
pub use last_location::{LastLocationStore, LAST_LOCATION_KEY};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StoreError};
