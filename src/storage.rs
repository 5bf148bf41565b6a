use thiserror::Error;

use crate::models::store::Store;

pub mod memory;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to parse session snapshot: {source}")]
    ParseFailed {
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize store to JSON: {source}")]
    SerializeFailed {
        #[source]
        source: serde_json::Error,
    },
}

/// Where the store is mirrored between changes. `load` seeds the session,
/// `save` runs after every applied change and the last write wins.
pub trait Storage {
    fn load(&self) -> Result<Store, StorageError>;
    fn save(&self, store: &Store) -> Result<(), StorageError>;
}
