use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::warn;

use super::KeyValueStore;

/// One JSON value living under one key of a [`KeyValueStore`].
///
/// Every failure is logged and swallowed: loads degrade to `None` and saves
/// become no-ops, so callers keep working in memory when storage is gone.
pub struct JsonSlot<T> {
    store: Arc<dyn KeyValueStore>,
    key: &'static str,
    _value: PhantomData<fn() -> T>,
}

impl<T: Serialize + DeserializeOwned> JsonSlot<T> {
    pub fn new(store: Arc<dyn KeyValueStore>, key: &'static str) -> Self {
        Self {
            store,
            key,
            _value: PhantomData,
        }
    }

    /// Loads the stored value; `None` when absent, unreadable or corrupt.
    pub fn load(&self) -> Option<T> {
        let bytes = match self.store.get(self.key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(err) => {
                warn!(key = self.key, error = %err, "storage read failed");
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(key = self.key, error = %err, "discarding corrupt payload");
                None
            }
        }
    }

    /// Best-effort write. Returns whether the value reached the store.
    pub fn save(&self, value: &T) -> bool {
        let bytes = match serde_json::to_vec(value) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(key = self.key, error = %err, "failed to serialize value");
                return false;
            }
        };

        match self.store.set(self.key, &bytes) {
            Ok(()) => true,
            Err(err) => {
                warn!(key = self.key, error = %err, "storage write failed");
                false
            }
        }
    }

    pub fn remove(&self) -> bool {
        match self.store.remove(self.key) {
            Ok(()) => true,
            Err(err) => {
                warn!(key = self.key, error = %err, "storage remove failed");
                false
            }
        }
    }
}
