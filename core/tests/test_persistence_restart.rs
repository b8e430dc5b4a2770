use std::sync::Arc;
use tutorfav_core::{FavoriteRecord, FavoritesStore, SledStorage};

#[tokio::test]
async fn test_favorites_persist_across_restarts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("favorites.db");

    // First instance: favorite two tutors, unfavorite one
    {
        let backend = SledStorage::open(&path).unwrap();
        let store = FavoritesStore::new(Arc::new(backend));
        let alice = FavoriteRecord::new(1, "Alice".to_string())
            .with_subject("Biology".to_string())
            .with_contact_handle("5521988887777".to_string());
        let bruno = FavoriteRecord::new(2, "Bruno".to_string());

        assert!(store.toggle_favorite(&alice, false).await.unwrap());
        assert!(store.toggle_favorite(&bruno, false).await.unwrap());
        assert!(!store.toggle_favorite(&bruno, true).await.unwrap());
    }
    // sled flushed on each swap and the db is dropped here

    // Second instance: verify data survived
    {
        let backend = SledStorage::open(&path).unwrap();
        let store = FavoritesStore::new(Arc::new(backend));

        assert!(store.is_favorite(1).await.unwrap());
        assert!(!store.is_favorite(2).await.unwrap());

        let alice = store.get(1).await.unwrap();
        assert_eq!(alice.subject, "Biology");
        assert_eq!(alice.contact_handle, "5521988887777");
    }
}
