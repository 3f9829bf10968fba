//! Save/load for the meta map
//!
//! Features:
//! - JSON envelope (`{ "map": ... }`), same shape the browser build writes
//! - Lenient decode: corrupt saves are repaired, never rejected
//! - LocalStorage backend on wasm32, stubs on native

pub mod envelope;
pub mod storage;

pub use envelope::{decode, encode};
pub use storage::{STORAGE_KEY, clear, load, save};

use thiserror::Error;

/// Save failures surfaced to the caller
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to encode save: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("local storage unavailable")]
    StorageUnavailable,
    #[error("local storage rejected write")]
    WriteRejected,
}
