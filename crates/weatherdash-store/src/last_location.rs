use std::sync::Arc;

use weatherdash_weather::Location;

use crate::storage::{KeyValueStore, StoreError};

/// Storage key holding the most recently displayed location
pub const LAST_LOCATION_KEY: &str = "lastLocation";

/// Remembers the last successfully displayed location across runs
pub struct LastLocationStore {
    storage: Arc<dyn KeyValueStore>,
}

impl LastLocationStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// Malformed values are discarded.
    pub fn load(&self) -> Option<Location> {
        let raw = match self.storage.get(LAST_LOCATION_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!("Failed to read last location: {}", e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(location) => Some(location),
            Err(e) => {
                tracing::warn!("Discarding corrupted last location: {}", e);
                if let Err(e) = self.storage.remove(LAST_LOCATION_KEY) {
                    tracing::warn!("Failed to remove corrupted last location: {}", e);
                }
                None
            }
        }
    }

    pub fn save(&self, location: &Location) -> Result<(), StoreError> {
        let json = serde_json::to_string(location)?;
        self.storage.set(LAST_LOCATION_KEY, &json)
    }
}
