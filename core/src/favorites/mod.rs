// Favorites module — tutor records the user has marked for quick access

pub mod codec;
pub mod projection;
pub mod record;
pub mod set;
pub mod store;

pub use projection::FavoriteToggle;
pub use record::FavoriteRecord;
pub use set::FavoritesSet;
pub use store::FavoritesStore;
