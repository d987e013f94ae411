//! Decoder ports.

use async_trait::async_trait;
use mockall::automock;

use super::{CameraError, CameraFacing, ScanConfig};

/// Produces decoded strings from a camera.
#[automock]
#[async_trait]
pub trait BarcodeDecoder: Send + Sync {
    /// Ask for camera access without starting a stream.
    async fn check_permission(&self, facing: CameraFacing) -> Result<(), CameraError>;

    /// Start decoding. The camera is held until the returned stream is
    /// stopped.
    async fn start(
        &self,
        facing: CameraFacing,
        config: ScanConfig,
    ) -> Result<Box<dyn DecodeStream>, CameraError>;
}

/// A running decode stream.
///
/// Per-frame decode failures are not reported; frames without a readable
/// code are simply skipped.
#[async_trait]
pub trait DecodeStream: Send {
    /// Next decoded string, or `None` once the stream has ended.
    async fn next_decoded(&mut self) -> Option<String>;

    /// A decode that is already buffered, without waiting for the next one.
    fn try_next_decoded(&mut self) -> Option<String>;

    /// Release the camera. Calling it again does nothing.
    fn stop(&mut self);
}
