// Store module — key-value persistence backends

pub mod backend;

pub use backend::{CasOutcome, MemoryStorage, SledStorage, StorageBackend, StorageError};
