use thiserror::Error;
use tracing::debug;

use crate::{
    models::{Outcome, store::Store},
    storage::{Storage, StorageError},
};

pub mod notes;
pub mod preferences;
pub mod tasks;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Mirrors the store after an applied change. Ignored operations leave the
/// store as it was, so there is nothing to write.
fn commit<T>(
    store: &Store,
    storage: &impl Storage,
    operation: &'static str,
    outcome: Outcome<T>,
) -> Result<Outcome<T>, ServiceError> {
    match &outcome {
        Outcome::Applied(_) => {
            storage.save(store)?;
            debug!(operation, "store mirrored");
        }
        Outcome::Ignored(reason) => {
            debug!(operation, %reason, "operation ignored");
        }
    }
    Ok(outcome)
}
