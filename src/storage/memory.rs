use std::cell::RefCell;

use crate::{
    models::store::Store,
    storage::{Storage, StorageError},
};

/// Session-lifetime slot holding a JSON snapshot of the store.
/// Nothing written here outlives the process.
pub struct MemoryStorage {
    slot: RefCell<Option<String>>,
    fallback: Store,
}

impl MemoryStorage {
    /// `fallback` is what `load` hands out while nothing has been saved yet
    pub fn new(fallback: Store) -> Self {
        Self {
            slot: RefCell::new(None),
            fallback,
        }
    }

    /// The last saved snapshot, if any
    pub fn snapshot(&self) -> Option<String> {
        self.slot.borrow().clone()
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new(Store::default())
    }
}

impl Storage for MemoryStorage {
    fn load(&self) -> Result<Store, StorageError> {
        match self.slot.borrow().as_deref() {
            Some(json) => {
                serde_json::from_str(json).map_err(|e| StorageError::ParseFailed { source: e })
            }
            None => Ok(self.fallback.clone()),
        }
    }

    fn save(&self, store: &Store) -> Result<(), StorageError> {
        let json =
            serde_json::to_string(store).map_err(|e| StorageError::SerializeFailed { source: e })?;
        self.slot.replace(Some(json));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{preferences::Theme, store::AddTaskParameters};

    #[test]
    fn test_load_empty_slot_returns_fallback() {
        let mut fallback = Store::default();
        fallback.preferences.theme = Theme::Dark;
        let storage = MemoryStorage::new(fallback.clone());

        assert!(storage.snapshot().is_none());
        assert_eq!(storage.load().unwrap(), fallback);
    }

    #[test]
    fn test_save_and_load() {
        let storage = MemoryStorage::default();
        let mut store = Store::default();
        let task = store
            .add_task(
                AddTaskParameters {
                    text: String::from("Some Task"),
                    due_date: Some(jiff::civil::date(2024, 6, 10)),
                    project: String::from("Work"),
                },
                jiff::Timestamp::UNIX_EPOCH,
            )
            .applied()
            .unwrap();
        store.add_subtask(task.id, String::from("Some Subtask"));
        store.add_note(Some(String::from("Some Note")), None, jiff::Timestamp::UNIX_EPOCH);

        if storage.save(&store).is_err() {
            panic!("Should correctly save the store");
        }
        match storage.load() {
            Ok(loaded_store) => assert_eq!(loaded_store, store),
            Err(_) => panic!("Should correctly load the saved store"),
        }
    }

    #[test]
    fn test_last_write_wins() {
        let storage = MemoryStorage::default();
        let mut store = Store::default();
        storage.save(&store).unwrap();

        store.add_project(String::from("Garden"));
        storage.save(&store).unwrap();

        assert!(storage.load().unwrap().projects.contains(&String::from("Garden")));
    }

    #[test]
    fn test_load_corrupt_snapshot() {
        let storage = MemoryStorage::default();
        storage.slot.replace(Some(String::from("{ this is not valid json }")));

        match storage.load() {
            Err(StorageError::ParseFailed { .. }) => {}
            _ => panic!("Expected ParseFailed error, got something else"),
        }
    }
}
