//! LocalStorage backend

#[cfg(target_arch = "wasm32")]
use super::decode;
use super::{PersistenceError, encode};
use crate::meta::ProgressionStore;

/// LocalStorage key (used only in wasm32)
pub const STORAGE_KEY: &str = "asterion_meta";

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten()
}

/// Load the map from LocalStorage (WASM only)
#[cfg(target_arch = "wasm32")]
pub fn load() -> ProgressionStore {
    if let Some(storage) = local_storage() {
        if let Ok(Some(json)) = storage.get_item(STORAGE_KEY) {
            let store = decode(&json);
            log::info!(
                "Loaded map ({} unlocked, {} cleared)",
                store.unlocked_nodes().len(),
                store.cleared_nodes().len()
            );
            return store;
        }
    }

    log::info!("No saved map found, starting fresh");
    ProgressionStore::new()
}

/// Save the map to LocalStorage (WASM only)
#[cfg(target_arch = "wasm32")]
pub fn save(store: &ProgressionStore) -> Result<(), PersistenceError> {
    let storage = local_storage().ok_or(PersistenceError::StorageUnavailable)?;
    let json = encode(store)?;
    storage
        .set_item(STORAGE_KEY, &json)
        .map_err(|_| PersistenceError::WriteRejected)?;
    log::info!("Map saved (current {})", store.current().node_id);
    Ok(())
}

/// Discard the saved map (WASM only)
#[cfg(target_arch = "wasm32")]
pub fn clear() {
    if let Some(storage) = local_storage() {
        let _ = storage.remove_item(STORAGE_KEY);
        log::info!("Saved map cleared");
    }
}

/// Native stubs
#[cfg(not(target_arch = "wasm32"))]
pub fn load() -> ProgressionStore {
    ProgressionStore::new()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn save(store: &ProgressionStore) -> Result<(), PersistenceError> {
    // Encode anyway so native callers see the same failures
    encode(store).map(|_| ())
}

#[cfg(not(target_arch = "wasm32"))]
pub fn clear() {
    // No-op for native
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn test_native_stubs() {
        let store = load();
        assert_eq!(store, ProgressionStore::new());
        assert!(save(&store).is_ok());
        clear();
    }
}
