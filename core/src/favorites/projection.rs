// UI-side view of one record's favorite state

use super::record::FavoriteRecord;
use super::store::FavoritesStore;
use crate::contact::ContactLink;
use crate::FavoritesError;

/// What a list row holds: the record plus a cached favorited flag.
///
/// The flag is a projection of the store. It is seeded from the store and
/// only moves when a toggle has been committed.
#[derive(Debug, Clone)]
pub struct FavoriteToggle {
    record: FavoriteRecord,
    favorited: bool,
}

impl FavoriteToggle {
    /// Use a membership already known to the caller (e.g. from one `list()`
    /// for a whole screen)
    pub fn new(record: FavoriteRecord, favorited: bool) -> Self {
        Self { record, favorited }
    }

    pub async fn load(
        store: &FavoritesStore,
        record: FavoriteRecord,
    ) -> Result<Self, FavoritesError> {
        let favorited = store.is_favorite(record.id).await?;
        Ok(Self { record, favorited })
    }

    /// Seed a row per record from a single read of the store
    pub async fn load_all(
        store: &FavoritesStore,
        records: Vec<FavoriteRecord>,
    ) -> Result<Vec<Self>, FavoritesError> {
        let stored = store.list().await?;
        Ok(records
            .into_iter()
            .map(|record| {
                let favorited = stored.iter().any(|s| s.id == record.id);
                Self { record, favorited }
            })
            .collect())
    }

    pub fn record(&self) -> &FavoriteRecord {
        &self.record
    }

    pub fn is_favorited(&self) -> bool {
        self.favorited
    }

    /// On error the cached flag is left as it was.
    pub async fn toggle(&mut self, store: &FavoritesStore) -> Result<bool, FavoritesError> {
        let favorited = store.toggle_favorite(&self.record, self.favorited).await?;
        self.favorited = favorited;
        Ok(favorited)
    }

    pub fn contact_link(&self, scheme: &str) -> ContactLink {
        ContactLink::new(scheme, &self.record.contact_handle)
    }
}
