//! In-process cart store.

use std::sync::{Mutex, PoisonError};

use super::{CartStore, StorageError, StoredCart, check_revision};

/// Keeps the serialized record in memory.
///
/// The record goes through the same JSON encoding as the file store, so a
/// load returns exactly what a restart would see.
#[derive(Debug, Default)]
pub struct MemoryCartStore {
    record: Mutex<Option<String>>,
}

impl MemoryCartStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store already holding `raw`, which need not be valid JSON.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            record: Mutex::new(Some(raw.into())),
        }
    }
}

impl CartStore for MemoryCartStore {
    fn load(&self) -> Result<Option<StoredCart>, StorageError> {
        let record = self.record.lock().unwrap_or_else(PoisonError::into_inner);

        record
            .as_deref()
            .map(serde_json::from_str::<StoredCart>)
            .transpose()
            .map_err(StorageError::Corrupt)
    }

    fn save(&self, incoming: &StoredCart) -> Result<(), StorageError> {
        let mut record = self.record.lock().unwrap_or_else(PoisonError::into_inner);

        let stored = record
            .as_deref()
            .and_then(|raw| serde_json::from_str::<StoredCart>(raw).ok());

        check_revision(stored.as_ref(), incoming)?;

        *record = Some(serde_json::to_string(incoming).map_err(StorageError::Encode)?);

        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        *self.record.lock().unwrap_or_else(PoisonError::into_inner) = None;

        Ok(())
    }
}
