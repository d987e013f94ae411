//! Camera errors.

use thiserror::Error;

/// Why the scanner could not start.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CameraError {
    /// The user or device policy refused camera access.
    #[error(
        "Permiso de cámara denegado. Permite el acceso a la cámara o usa la búsqueda manual."
    )]
    PermissionDenied,

    /// No camera on this device.
    #[error("No se encontró ninguna cámara en tu dispositivo.")]
    NotFound,

    /// Another application holds the camera.
    #[error("La cámara está siendo usada por otra aplicación.")]
    Busy,

    /// This platform has no camera API.
    #[error("Este dispositivo no permite el acceso a la cámara.")]
    Unsupported,

    /// Any other device failure, with the device's own message.
    #[error("No se pudo acceder a la cámara: {0}")]
    Device(String),
}

impl CameraError {
    /// Classify a media-device error by its name.
    pub fn from_device_error(name: &str, message: &str) -> Self {
        match name {
            "NotAllowedError" | "PermissionDeniedError" => Self::PermissionDenied,
            "NotFoundError" | "DevicesNotFoundError" => Self::NotFound,
            "NotReadableError" | "TrackStartError" => Self::Busy,
            "NotSupportedError" => Self::Unsupported,
            _ => Self::Device(message.to_string()),
        }
    }
}
