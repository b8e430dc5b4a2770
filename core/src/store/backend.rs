// Storage abstraction for favorites persistence
//
// Async so platform stores (AsyncStorage-style bridges, IndexedDB) can sit
// behind the same trait as the local sled database. Favorites only ever
// read the whole list and swap it for a new one, so that is the surface.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Result of a compare-and-swap write
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CasOutcome {
    Swapped,
    /// Stored value did not match the expected one; nothing was written
    Conflict { current: Option<Vec<u8>> },
}

/// Key-value capability the favorites store is built on
#[async_trait]
pub trait StorageBackend: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;
    /// Write `new` only if the key currently holds `expected` (`None` = absent).
    /// A swap is durable once this returns.
    async fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<Vec<u8>>,
        new: Vec<u8>,
    ) -> Result<CasOutcome, StorageError>;
}

/// Run synchronous storage I/O on the blocking pool.
///
/// Keeps the calling future pending (and so cancellable by a timeout) while
/// the disk works, instead of stalling the runtime thread.
pub(crate) async fn run_blocking<T, F>(op: F) -> Result<T, StorageError>
where
    F: FnOnce() -> Result<T, StorageError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(op)
        .await
        .map_err(|e| StorageError::Unavailable(format!("storage task failed: {}", e)))?
}

/// In-memory storage useful for testing and ephemeral sessions
#[derive(Clone, Default)]
pub struct MemoryStorage {
    data: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a raw value, bypassing any encoding
    pub fn with_value(self, key: &str, value: impl Into<Vec<u8>>) -> Self {
        self.data.write().insert(key.to_string(), value.into());
        self
    }

    /// Raw snapshot of a key, for inspection in tests and diagnostics
    pub fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.data.read().get(key).cloned()
    }
}

#[async_trait]
impl StorageBackend for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.data.read().get(key).cloned())
    }

    async fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<Vec<u8>>,
        new: Vec<u8>,
    ) -> Result<CasOutcome, StorageError> {
        let mut data = self.data.write();
        let current = data.get(key);
        if current != expected.as_ref() {
            return Ok(CasOutcome::Conflict {
                current: current.cloned(),
            });
        }
        data.insert(key.to_string(), new);
        Ok(CasOutcome::Swapped)
    }
}

#[derive(Clone)]
pub struct SledStorage {
    db: sled::Db,
}

impl SledStorage {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let db = sled::open(path).map_err(unavailable)?;
        Ok(Self { db })
    }
}

fn unavailable(err: sled::Error) -> StorageError {
    StorageError::Unavailable(err.to_string())
}

#[async_trait]
impl StorageBackend for SledStorage {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let db = self.db.clone();
        let key = key.to_string();
        run_blocking(move || {
            let value = db.get(key).map_err(unavailable)?;
            Ok(value.map(|ivec| ivec.to_vec()))
        })
        .await
    }

    async fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<Vec<u8>>,
        new: Vec<u8>,
    ) -> Result<CasOutcome, StorageError> {
        let db = self.db.clone();
        let key = key.to_string();
        run_blocking(move || {
            let swapped = db
                .compare_and_swap(key, expected, Some(new))
                .map_err(unavailable)?;
            match swapped {
                Ok(()) => {
                    db.flush().map_err(unavailable)?;
                    Ok(CasOutcome::Swapped)
                }
                Err(conflict) => Ok(CasOutcome::Conflict {
                    current: conflict.current.map(|ivec| ivec.to_vec()),
                }),
            }
        })
        .await
    }
}
