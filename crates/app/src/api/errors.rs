//! API errors.

use thiserror::Error;

/// Errors that can occur when talking to the backend REST API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure: connection refused, timeout, TLS.
    #[error("error de red: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status. `message` is the error
    /// reported by the server, untouched.
    #[error("{message}")]
    Status {
        /// HTTP status code
        status: u16,

        /// Server-reported error message
        message: String,
    },

    /// The session expired and could not be refreshed.
    #[error("Sesión expirada. Inicia sesión de nuevo.")]
    Unauthorized,

    /// The response body did not have the expected shape.
    #[error("respuesta inesperada del servidor")]
    Decode(#[source] serde_json::Error),

    /// The request body could not be encoded.
    #[error("no se pudo codificar la petición")]
    Encode(#[source] serde_json::Error),
}

impl ApiError {
    /// HTTP status of a server-side rejection, if that is what this is.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Unauthorized => Some(401),
            Self::Http(error) => error.status().map(|status| status.as_u16()),
            Self::Decode(_) | Self::Encode(_) => None,
        }
    }
}
