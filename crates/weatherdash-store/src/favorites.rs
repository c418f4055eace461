//! Persisted list of favorite locations.

use std::sync::Arc;

use weatherdash_weather::Location;

use crate::storage::{KeyValueStore, StoreError};

/// Storage key holding the JSON array of favorites
pub const FAVORITES_KEY: &str = "weatherFavorites";

/// Ordered favorites, matched by name plus coordinate tolerance.
///
/// Every mutation rewrites the whole list to the backing store.
pub struct FavoritesStore {
    storage: Arc<dyn KeyValueStore>,
    favorites: Vec<Location>,
}

impl FavoritesStore {
    /// Hydrate from storage. Unreadable or malformed data yields an empty list.
    pub fn load(storage: Arc<dyn KeyValueStore>) -> Self {
        let favorites = Self::read(storage.as_ref());
        tracing::debug!("Loaded {} favorites", favorites.len());
        Self { storage, favorites }
    }

    fn read(storage: &dyn KeyValueStore) -> Vec<Location> {
        let raw = match storage.get(FAVORITES_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to read favorites: {}", e);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Location>>(&raw) {
            Ok(favorites) => favorites,
            Err(e) => {
                tracing::warn!("Discarding corrupted favorites: {}", e);
                if let Err(e) = storage.remove(FAVORITES_KEY) {
                    tracing::warn!("Failed to remove corrupted favorites: {}", e);
                }
                Vec::new()
            }
        }
    }

    pub fn favorites(&self) -> &[Location] {
        &self.favorites
    }

    pub fn is_favorite(&self, location: &Location) -> bool {
        self.favorites.iter().any(|f| f.same_place(location))
    }

    /// Append unless already present.
    pub fn add(&mut self, location: Location) -> Result<(), StoreError> {
        if self.is_favorite(&location) {
            return Ok(());
        }

        tracing::info!("Adding favorite: {}", location.name);
        self.favorites.push(location);
        self.persist()
    }

    /// Drop every entry matching `location`.
    pub fn remove(&mut self, location: &Location) -> Result<(), StoreError> {
        let before = self.favorites.len();
        self.favorites.retain(|f| !f.same_place(location));

        if self.favorites.len() != before {
            tracing::info!("Removed favorite: {}", location.name);
        }
        self.persist()
    }

    /// Returns whether the location is a favorite afterwards.
    pub fn toggle(&mut self, location: Location) -> Result<bool, StoreError> {
        if self.is_favorite(&location) {
            self.remove(&location)?;
            Ok(false)
        } else {
            self.add(location)?;
            Ok(true)
        }
    }

    fn persist(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string(&self.favorites)?;
        self.storage.set(FAVORITES_KEY, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStore, MemoryStore};
    use proptest::prelude::*;

    fn surat() -> Location {
        Location::new("Surat, Gujarat, IN", 21.17, 72.83)
    }

    fn memory_store() -> Arc<MemoryStore> {
        Arc::new(MemoryStore::new())
    }

    #[test]
    fn test_load_empty() {
        let favorites = FavoritesStore::load(memory_store());
        assert!(favorites.favorites().is_empty());
    }

    #[test]
    fn test_corrupted_storage_resets() {
        let storage = Arc::new(MemoryStore::with_value(FAVORITES_KEY, "{not json"));
        let favorites = FavoritesStore::load(storage.clone());

        assert!(favorites.favorites().is_empty());
        assert_eq!(storage.get(FAVORITES_KEY).unwrap(), None);
    }

    #[test]
    fn test_add_is_idempotent() {
        let storage = memory_store();
        let mut favorites = FavoritesStore::load(storage.clone());

        favorites.add(surat()).unwrap();
        favorites.add(surat()).unwrap();
        assert_eq!(favorites.favorites().len(), 1);

        let stored: Vec<Location> =
            serde_json::from_str(&storage.get(FAVORITES_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(stored, vec![surat()]);
    }

    #[test]
    fn test_nearby_coordinates_are_one_favorite() {
        let mut favorites = FavoritesStore::load(memory_store());

        favorites.add(surat()).unwrap();
        favorites
            .add(Location::new("Surat, Gujarat, IN", 21.175, 72.835))
            .unwrap();

        assert_eq!(favorites.favorites(), &[surat()]);
    }

    #[test]
    fn test_same_coordinates_different_name_are_distinct() {
        let mut favorites = FavoritesStore::load(memory_store());

        favorites.add(surat()).unwrap();
        favorites
            .add(Location::new("Current Location", 21.17, 72.83))
            .unwrap();

        assert_eq!(favorites.favorites().len(), 2);
    }

    #[test]
    fn test_remove_missing_leaves_list() {
        let mut favorites = FavoritesStore::load(memory_store());
        favorites.add(surat()).unwrap();

        favorites
            .remove(&Location::new("Rajkot", 22.3039, 70.8022))
            .unwrap();
        assert_eq!(favorites.favorites(), &[surat()]);
    }

    #[test]
    fn test_toggle() {
        let mut favorites = FavoritesStore::load(memory_store());

        assert!(favorites.toggle(surat()).unwrap());
        assert!(favorites.is_favorite(&surat()));
        assert!(!favorites.toggle(surat()).unwrap());
        assert!(favorites.favorites().is_empty());
    }

    #[test]
    fn test_insertion_order_and_reload() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let storage = Arc::new(FileStore::new(temp_dir.path()));

        let places = vec![
            Location::new("Surat", 21.1702, 72.8311),
            Location::new("Ahmedabad", 23.0225, 72.5714),
            Location::new("Nadiad", 22.7, 72.87),
        ];

        let mut favorites = FavoritesStore::load(storage.clone());
        for place in &places {
            favorites.add(place.clone()).unwrap();
        }

        let reloaded = FavoritesStore::load(storage);
        assert_eq!(reloaded.favorites(), places.as_slice());
    }

    proptest! {
        #[test]
        fn prop_tolerance_matches(
            lat in -80.0f64..80.0,
            lon in -170.0f64..170.0,
            dlat in -0.0099f64..0.0099,
            dlon in -0.0099f64..0.0099,
        ) {
            let mut favorites = FavoritesStore::load(memory_store());
            let original = Location::new("Place", lat, lon);
            let nearby = Location::new("Place", lat + dlat, lon + dlon);

            favorites.add(original).unwrap();
            prop_assert!(favorites.is_favorite(&nearby));

            favorites.remove(&nearby).unwrap();
            prop_assert!(favorites.favorites().is_empty());
        }

        #[test]
        fn prop_distant_coordinates_differ(
            lat in -80.0f64..80.0,
            lon in -170.0f64..170.0,
            dlat in 0.011f64..5.0,
        ) {
            let mut favorites = FavoritesStore::load(memory_store());
            favorites.add(Location::new("Place", lat, lon)).unwrap();

            prop_assert!(!favorites.is_favorite(&Location::new("Place", lat + dlat, lon)));
        }
    }
}
