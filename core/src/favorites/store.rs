// FavoritesStore — read-modify-write of the persisted favorites list
//
// The whole list lives under one key. Every toggle reads it, edits it and
// writes it back; nothing is cached between calls.

use super::codec;
use super::record::FavoriteRecord;
use super::set::FavoritesSet;
use crate::store::{CasOutcome, StorageBackend};
use crate::{FavoritesConfig, FavoritesError};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// One read of the key: the raw bytes are the expected side of the
/// compare-and-swap that follows
struct Loaded {
    raw: Option<Vec<u8>>,
    set: FavoritesSet,
    collapsed: usize,
}

/// Source of truth for which tutors are favorites.
///
/// Clones share the backend and the writer lock, so toggles issued through
/// any clone are applied one at a time. Writes are compare-and-swap against
/// the value that was read, which catches writers outside this process.
#[derive(Clone)]
pub struct FavoritesStore {
    backend: Arc<dyn StorageBackend>,
    config: FavoritesConfig,
    writer: Arc<Mutex<()>>,
}

impl FavoritesStore {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self::with_config(backend, FavoritesConfig::default())
    }

    pub fn with_config(backend: Arc<dyn StorageBackend>, config: FavoritesConfig) -> Self {
        Self {
            backend,
            config,
            writer: Arc::new(Mutex::new(())),
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.config.key = key.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn key(&self) -> &str {
        &self.config.key
    }

    pub fn timeout(&self) -> Duration {
        self.config.timeout
    }

    /// All favorites, in the order they were added
    pub async fn list(&self) -> Result<Vec<FavoriteRecord>, FavoritesError> {
        Ok(self.load_set().await?.into_vec())
    }

    pub async fn get(&self, id: u64) -> Result<FavoriteRecord, FavoritesError> {
        let set = self.load_set().await?;
        set.get(id).cloned().ok_or(FavoritesError::NotFound(id))
    }

    pub async fn is_favorite(&self, id: u64) -> Result<bool, FavoritesError> {
        Ok(self.load_set().await?.contains(id))
    }

    /// Flip a record's membership and return the new state (`!currently_favorited`).
    ///
    /// `currently_favorited` is what the caller believes. If the store
    /// disagrees, the call still succeeds without changing that record; the
    /// divergence is logged.
    pub async fn toggle_favorite(
        &self,
        record: &FavoriteRecord,
        currently_favorited: bool,
    ) -> Result<bool, FavoritesError> {
        if !record.cost.is_finite() {
            return Err(FavoritesError::InvalidInput(format!(
                "cost of favorite {} is not a finite number",
                record.id
            )));
        }

        let _writer = self.writer.lock().await;
        let Loaded {
            raw: previous,
            mut set,
            collapsed,
        } = self.load().await?;
        if collapsed > 0 {
            warn!(
                "Dropping {} duplicate favorite(s) from '{}' on rewrite",
                collapsed, self.config.key
            );
        }

        if currently_favorited {
            if set.remove(record.id).is_none() {
                warn!(
                    "Favorite {} was not stored; caller state has diverged from the store",
                    record.id
                );
            }
        } else if !set.insert(record.clone()) {
            warn!(
                "Favorite {} was already stored; caller state has diverged from the store",
                record.id
            );
        }

        let encoded = codec::encode(&set)?;
        let key = self.config.key.clone();
        let outcome = self
            .bounded(
                "write",
                self.backend.compare_and_swap(&key, previous, encoded),
            )
            .await?;

        match outcome {
            CasOutcome::Swapped => {
                debug!(
                    "Favorite {} is now {} ({} stored)",
                    record.id,
                    if currently_favorited { "off" } else { "on" },
                    set.len()
                );
                Ok(!currently_favorited)
            }
            CasOutcome::Conflict { .. } => {
                warn!(
                    "Favorites under '{}' changed during toggle of {}; nothing written",
                    key, record.id
                );
                Err(FavoritesError::ConcurrentModification)
            }
        }
    }

    async fn load(&self) -> Result<Loaded, FavoritesError> {
        let raw = self
            .bounded("read", self.backend.get(&self.config.key))
            .await?;
        let (set, collapsed) = match raw.as_deref() {
            Some(bytes) => codec::decode_counting(bytes)?,
            None => (FavoritesSet::new(), 0),
        };
        Ok(Loaded {
            raw,
            set,
            collapsed,
        })
    }

    /// Read-only paths leave stored duplicates for the next toggle to clean up
    async fn load_set(&self) -> Result<FavoritesSet, FavoritesError> {
        let loaded = self.load().await?;
        if loaded.collapsed > 0 {
            debug!(
                "Ignoring {} duplicate favorite(s) under '{}'",
                loaded.collapsed, self.config.key
            );
        }
        Ok(loaded.set)
    }

    async fn bounded<T, F>(&self, op: &str, call: F) -> Result<T, FavoritesError>
    where
        F: Future<Output = Result<T, crate::StorageError>>,
    {
        match tokio::time::timeout(self.config.timeout, call).await {
            Ok(result) => result.map_err(FavoritesError::from),
            Err(_) => Err(FavoritesError::StorageUnavailable(format!(
                "{} of '{}' timed out after {:?}",
                op, self.config.key, self.config.timeout
            ))),
        }
    }
}
