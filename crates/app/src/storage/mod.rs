//! Cart storage
//!
//! The in-progress sale is mirrored to durable storage after every change so
//! a restart of the register picks up where the cashier left off. Records
//! carry a revision; a store never accepts a write that is not newer than
//! what it already holds.

mod errors;
mod file;
mod memory;

pub use errors::StorageError;
pub use file::{FileCartStore, STORAGE_KEY};
pub use memory::MemoryCartStore;

use mockall::automock;
use serde::{Deserialize, Serialize};
use till::cart::Cart;

/// A persisted cart plus its revision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCart {
    /// Monotonic write counter. Records written before revisions existed
    /// read as `0`.
    #[serde(default)]
    pub revision: u64,

    /// The cart itself, flattened into the same object.
    #[serde(flatten)]
    pub cart: Cart,
}

impl StoredCart {
    /// Wrap `cart` at `revision`.
    pub fn new(revision: u64, cart: Cart) -> Self {
        Self { revision, cart }
    }
}

/// Durable storage for the current sale.
#[automock]
pub trait CartStore: Send + Sync {
    /// Read the stored cart, if there is one.
    ///
    /// # Errors
    ///
    /// [`StorageError::Corrupt`] when a record exists but cannot be read.
    fn load(&self) -> Result<Option<StoredCart>, StorageError>;

    /// Overwrite the stored cart.
    ///
    /// # Errors
    ///
    /// [`StorageError::StaleWrite`] when the store already holds a record at
    /// the same or a later revision.
    fn save(&self, record: &StoredCart) -> Result<(), StorageError>;

    /// Remove the stored cart. Removing nothing is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage fails.
    fn clear(&self) -> Result<(), StorageError>;
}

/// Reject `incoming` unless it is newer than `stored`.
pub(crate) fn check_revision(
    stored: Option<&StoredCart>,
    incoming: &StoredCart,
) -> Result<(), StorageError> {
    match stored {
        Some(stored) if stored.revision >= incoming.revision => Err(StorageError::StaleWrite {
            stored: stored.revision,
            attempted: incoming.revision,
        }),
        _ => Ok(()),
    }
}
