//! Persistence port and its implementations.
//!
//! Everything the core persists goes through [`KeyValueStore`]: one key for
//! the timer snapshot, one for settings and one for the whole session list.

mod config;
mod memory;
mod slot;
mod sqlite;

pub use config::{Config, LoggingConfig, StorageBackend, StorageConfig};
pub use memory::MemoryStore;
pub use slot::JsonSlot;
pub use sqlite::SqliteStore;

use std::path::PathBuf;

use crate::error::StorageError;

pub const TIMER_KEY: &str = "pull-focus-timer.v1";
pub const SETTINGS_KEY: &str = "pull-focus-settings.v1";
pub const SESSIONS_KEY: &str = "pull-focus-sessions.v1";

/// Synchronous byte store. No transactions, no cross-process guarantees.
pub trait KeyValueStore: Send + Sync {
    /// `Ok(None)` when the key has never been written.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError>;

    /// Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Drops every key in the store.
    fn clear(&self) -> Result<(), StorageError>;
}

/// Returns `~/.config/pullfocus[-dev]/`.
///
/// `PULLFOCUS_DATA_DIR` wins when set; otherwise `PULLFOCUS_ENV=dev` selects
/// the development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var_os("PULLFOCUS_DATA_DIR") {
        Some(explicit) => PathBuf::from(explicit),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("PULLFOCUS_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("pullfocus-dev")
            } else {
                base_dir.join("pullfocus")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
