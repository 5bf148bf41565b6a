use tracing::info;

use crate::{
    models::{
        Outcome,
        preferences::{PreferenceUpdate, Preferences},
        store::Store,
    },
    services::{ServiceError, commit},
    storage::Storage,
};

pub fn set_preference(
    store: &mut Store,
    storage: &impl Storage,
    update: PreferenceUpdate,
) -> Result<Outcome<Preferences>, ServiceError> {
    info!(?update, "preference changed");
    let outcome = store.set_preference(update);
    commit(store, storage, "set_preference", outcome)
}

pub fn toggle_theme(
    store: &mut Store,
    storage: &impl Storage,
) -> Result<Outcome<Preferences>, ServiceError> {
    let theme = store.preferences.theme.toggled();
    set_preference(store, storage, PreferenceUpdate::Theme(theme))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::preferences::Theme, storage::memory::MemoryStorage};

    #[test]
    fn test_toggle_theme_twice() {
        let storage = MemoryStorage::default();
        let mut store = storage.load().unwrap();

        toggle_theme(&mut store, &storage).unwrap();
        assert_eq!(storage.load().unwrap().preferences.theme, Theme::Dark);

        toggle_theme(&mut store, &storage).unwrap();
        assert_eq!(store.preferences.theme, Theme::Light);
    }
}
