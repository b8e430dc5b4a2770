use async_trait::async_trait;
use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tutorfav_core::store::CasOutcome;
use tutorfav_core::{
    FavoriteRecord, FavoriteToggle, FavoritesError, FavoritesStore, MemoryStorage,
    StorageBackend, StorageError,
};

fn tutor(id: u64) -> FavoriteRecord {
    FavoriteRecord::new(id, format!("Tutor {}", id))
        .with_subject("Chemistry".to_string())
        .with_bio("Loves titrations".to_string())
        .with_cost(75.5)
        .with_avatar(format!("https://avatars.example/{}.png", id))
        .with_contact_handle(format!("551199999{:04}", id))
}

fn stored_ids(storage: &MemoryStorage) -> Vec<u64> {
    let raw = storage.raw("favorites").expect("favorites key written");
    let value: serde_json::Value = serde_json::from_slice(&raw).unwrap();
    value["favorites"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_u64().unwrap())
        .collect()
}

#[tokio::test]
async fn scenario_a_first_favorite_on_empty_store() {
    let storage = MemoryStorage::new();
    let store = FavoritesStore::new(Arc::new(storage.clone()));

    assert!(store.toggle_favorite(&tutor(1), false).await.unwrap());

    assert_eq!(stored_ids(&storage), vec![1]);
    let listed = store.list().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert!(listed[0].same_profile(&tutor(1)));
}

#[tokio::test]
async fn scenario_b_remove_keeps_relative_order() {
    let storage = MemoryStorage::new();
    let store = FavoritesStore::new(Arc::new(storage.clone()));
    for id in [1, 2, 3] {
        store.toggle_favorite(&tutor(id), false).await.unwrap();
    }

    assert!(!store.toggle_favorite(&tutor(2), true).await.unwrap());

    assert_eq!(stored_ids(&storage), vec![1, 3]);
}

#[tokio::test]
async fn scenario_c_malformed_value_is_surfaced() {
    let truncated = r#"{"version":1,"favorites":[{"id":1,"name":"Tu"#;
    let storage = MemoryStorage::new().with_value("favorites", truncated);
    let store = FavoritesStore::new(Arc::new(storage.clone()));

    for currently_favorited in [false, true] {
        let err = store
            .toggle_favorite(&tutor(1), currently_favorited)
            .await
            .unwrap_err();
        assert!(matches!(err, FavoritesError::CorruptPersistedData(_)));
    }
    let err = store.is_favorite(1).await.unwrap_err();
    assert!(matches!(err, FavoritesError::CorruptPersistedData(_)));

    // Not silently reset
    assert_eq!(storage.raw("favorites"), Some(truncated.as_bytes().to_vec()));
}

/// Backend whose reads stall, so overlapping toggles both read before
/// either writes.
struct DelayedStorage {
    inner: MemoryStorage,
    read_delay: Duration,
}

#[async_trait]
impl StorageBackend for DelayedStorage {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let value = self.inner.get(key).await?;
        tokio::time::sleep(self.read_delay).await;
        Ok(value)
    }

    async fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<Vec<u8>>,
        new: Vec<u8>,
    ) -> Result<CasOutcome, StorageError> {
        self.inner.compare_and_swap(key, expected, new).await
    }
}

fn delayed(storage: &MemoryStorage) -> Arc<DelayedStorage> {
    Arc::new(DelayedStorage {
        inner: storage.clone(),
        read_delay: Duration::from_millis(50),
    })
}

#[tokio::test(start_paused = true)]
async fn scenario_d_overlapping_toggles_are_serialized() {
    let storage = MemoryStorage::new();
    let store = FavoritesStore::new(delayed(&storage));
    let other_handle = store.clone();

    let rec_a = tutor(1);
    let rec_b = tutor(2);
    let (a, b) = tokio::join!(
        store.toggle_favorite(&rec_a, false),
        other_handle.toggle_favorite(&rec_b, false),
    );

    assert!(a.unwrap());
    assert!(b.unwrap());
    let mut ids = stored_ids(&storage);
    ids.sort();
    assert_eq!(ids, vec![1, 2]);
}

#[tokio::test(start_paused = true)]
async fn scenario_d_independent_writers_cannot_lose_updates() {
    let storage = MemoryStorage::new();
    // Separate stores share no writer lock; only compare-and-swap protects them
    let first = FavoritesStore::new(delayed(&storage));
    let second = FavoritesStore::new(delayed(&storage));

    let rec_a = tutor(1);
    let rec_b = tutor(2);
    let (a, b) = tokio::join!(
        first.toggle_favorite(&rec_a, false),
        second.toggle_favorite(&rec_b, false),
    );

    let committed: Vec<u64> = [(1, &a), (2, &b)]
        .iter()
        .filter(|(_, result)| result.is_ok())
        .map(|(id, _)| *id)
        .collect();
    assert_eq!(committed.len(), 1);
    for result in [&a, &b] {
        if let Err(err) = result {
            assert_eq!(*err, FavoritesError::ConcurrentModification);
        }
    }
    assert_eq!(stored_ids(&storage), committed);
}

#[tokio::test]
async fn legacy_list_is_upgraded_on_first_write() {
    let legacy = r#"[{"id":10,"avatar":"https://a/10.png","bio":"","cost":50,"name":"Leo","subject":"Art","whatsapp":"5510"},{"id":11,"avatar":"","bio":"","cost":60,"name":"Lia","subject":"Art","whatsapp":"5511"}]"#;
    let storage = MemoryStorage::new().with_value("favorites", legacy);
    let store = FavoritesStore::new(Arc::new(storage.clone()));

    assert!(store.is_favorite(10).await.unwrap());
    assert_eq!(store.get(11).await.unwrap().contact_handle, "5511");

    store.toggle_favorite(&tutor(12), false).await.unwrap();

    let raw = storage.raw("favorites").unwrap();
    let value: serde_json::Value = serde_json::from_slice(&raw).unwrap();
    assert_eq!(value["version"], 1);
    assert_eq!(stored_ids(&storage), vec![10, 11, 12]);
    assert_eq!(value["favorites"][0]["whatsapp"], "5510");
}

#[tokio::test]
async fn newer_schema_is_not_overwritten() {
    let future = r#"{"version":7,"favorites":[]}"#;
    let storage = MemoryStorage::new().with_value("favorites", future);
    let store = FavoritesStore::new(Arc::new(storage.clone()));

    let err = store.toggle_favorite(&tutor(1), false).await.unwrap_err();
    assert_eq!(err, FavoritesError::UnsupportedSchemaVersion(7));
    assert_eq!(storage.raw("favorites"), Some(future.as_bytes().to_vec()));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn well_behaved_toggles_never_duplicate(ops in prop::collection::vec(0u64..6, 0..40)) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();

        runtime.block_on(async {
            let store = FavoritesStore::new(Arc::new(MemoryStorage::new()));
            let mut rows = FavoriteToggle::load_all(&store, (0..6).map(tutor).collect())
                .await
                .unwrap();

            for id in ops {
                rows[id as usize].toggle(&store).await.unwrap();
            }

            let stored = store.list().await.unwrap();
            let unique: HashSet<u64> = stored.iter().map(|r| r.id).collect();
            assert_eq!(unique.len(), stored.len());

            for row in &rows {
                assert_eq!(
                    row.is_favorited(),
                    store.is_favorite(row.record().id).await.unwrap()
                );
            }
        });
    }
}
