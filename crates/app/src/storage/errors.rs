//! Storage errors.

use std::io;

use thiserror::Error;

/// Errors from a [`CartStore`](super::CartStore).
#[derive(Debug, Error)]
pub enum StorageError {
    /// The underlying storage could not be read or written.
    #[error("no se pudo acceder al almacenamiento local")]
    Io(#[from] io::Error),

    /// A record exists but is not a valid cart.
    #[error("el registro guardado está dañado")]
    Corrupt(#[source] serde_json::Error),

    /// The cart could not be serialized.
    #[error("no se pudo guardar el carrito")]
    Encode(#[source] serde_json::Error),

    /// The store already holds a record at the same or a later revision.
    #[error("el carrito fue modificado en otra ventana (revisión {stored}, se intentó {attempted})")]
    StaleWrite {
        /// Revision already stored
        stored: u64,

        /// Revision of the rejected write
        attempted: u64,
    },
}
