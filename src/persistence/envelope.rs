//! Versioned JSON envelope for the meta save

use serde::Serialize;
use serde_json::Value;

use super::PersistenceError;
use crate::meta::ProgressionStore;

/// On-disk shape: the map lives under `map` next to other meta progress
#[derive(Serialize)]
struct SaveEnvelope<'a> {
    map: &'a ProgressionStore,
}

/// Serialize a store into the save envelope
pub fn encode(store: &ProgressionStore) -> Result<String, PersistenceError> {
    Ok(serde_json::to_string(&SaveEnvelope { map: store })?)
}

/// Parse a save envelope. Unreadable input yields a fresh, valid store.
pub fn decode(json: &str) -> ProgressionStore {
    let meta = serde_json::from_str::<Value>(json).unwrap_or_else(|e| {
        log::warn!("Save is not valid JSON ({}), starting fresh", e);
        Value::Null
    });
    ProgressionStore::initialize(&meta)
}
