// tutorfav core — durable tutor favorites
//
// One key, one list. Everything the app knows about a user's favorite
// tutors lives in a single serialized value, read and rewritten whole.

pub mod contact;
pub mod favorites;
pub mod store;

use std::time::Duration;
use thiserror::Error;

pub use contact::{ContactLink, DEFAULT_MESSAGING_SCHEME};
pub use favorites::{FavoriteRecord, FavoriteToggle, FavoritesSet, FavoritesStore};
pub use store::{MemoryStorage, SledStorage, StorageBackend, StorageError};

// ============================================================================
// ERROR TYPES
// ============================================================================

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FavoritesError {
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
    #[error("Corrupt persisted data: {0}")]
    CorruptPersistedData(String),
    #[error("Unsupported favorites schema version {0}")]
    UnsupportedSchemaVersion(u32),
    #[error("Favorites were modified concurrently")]
    ConcurrentModification,
    #[error("No favorite with id {0}")]
    NotFound(u64),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<StorageError> for FavoritesError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Unavailable(reason) => FavoritesError::StorageUnavailable(reason),
        }
    }
}

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Key under which the whole favorites list is stored
pub const DEFAULT_FAVORITES_KEY: &str = "favorites";

/// Upper bound on any single storage call
pub const DEFAULT_STORAGE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq)]
pub struct FavoritesConfig {
    pub key: String,
    pub timeout: Duration,
}

impl Default for FavoritesConfig {
    fn default() -> Self {
        Self {
            key: DEFAULT_FAVORITES_KEY.to_string(),
            timeout: DEFAULT_STORAGE_TIMEOUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_maps_to_unavailable() {
        let err: FavoritesError = StorageError::Unavailable("disk gone".to_string()).into();
        assert_eq!(err, FavoritesError::StorageUnavailable("disk gone".to_string()));
    }

    #[test]
    fn test_default_config() {
        let config = FavoritesConfig::default();
        assert_eq!(config.key, "favorites");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }
}
