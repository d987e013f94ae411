//! File-backed cart store.

use std::{
    fs, io,
    io::Write as _,
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;
use tracing::debug;

use super::{CartStore, StorageError, StoredCart, check_revision};

/// Namespaced key of the current sale record.
pub const STORAGE_KEY: &str = "pos_current_sale";

/// One JSON file per register, replaced atomically on every save.
#[derive(Debug, Clone)]
pub struct FileCartStore {
    path: PathBuf,
}

impl FileCartStore {
    /// Store the record as `pos_current_sale.json` under `data_dir`.
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(format!("{STORAGE_KEY}.json")),
        }
    }

    /// Location of the record.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Option<StoredCart>, StorageError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(error.into()),
        };

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(StorageError::Corrupt)
    }
}

impl CartStore for FileCartStore {
    fn load(&self) -> Result<Option<StoredCart>, StorageError> {
        self.read()
    }

    fn save(&self, record: &StoredCart) -> Result<(), StorageError> {
        // An unreadable record is replaced, not guarded.
        let stored = match self.read() {
            Ok(stored) => stored,
            Err(StorageError::Corrupt(_)) => None,
            Err(error) => return Err(error),
        };

        check_revision(stored.as_ref(), record)?;

        let json = serde_json::to_vec_pretty(record).map_err(StorageError::Encode)?;

        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir)?;

        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(&json)?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|error| error.error)?;

        debug!(path = %self.path.display(), revision = record.revision, "cart saved");

        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "cart record removed");

                Ok(())
            }
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}
