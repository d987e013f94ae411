//! Scoped scanner session.

use std::fmt;

use jiff::Timestamp;
use till::scan::{ScanEvent, ScanGuard};
use tracing::{debug, info};

use super::{BarcodeDecoder, CameraError, CameraFacing, DecodeStream, ScanConfig};

/// An open camera plus the de-duplication state of one scanning session.
///
/// The camera is released when the session is closed or dropped, so every
/// exit path (a successful scan, a cancel, an error, an unwinding task)
/// stops the stream.
pub struct ScannerSession {
    stream: Box<dyn DecodeStream>,
    guard: ScanGuard,
    stopped: bool,
}

impl ScannerSession {
    /// Check camera permission, then start decoding.
    ///
    /// # Errors
    ///
    /// Returns the classified [`CameraError`] if permission is refused or the
    /// camera cannot be started. No stream is left running on error.
    #[tracing::instrument(name = "scanner.open", skip(decoder, config), err)]
    pub async fn open(
        decoder: &dyn BarcodeDecoder,
        facing: CameraFacing,
        config: ScanConfig,
    ) -> Result<Self, CameraError> {
        decoder.check_permission(facing).await?;

        let stream = decoder.start(facing, config).await?;

        info!("scanner opened");

        Ok(Self {
            stream,
            guard: ScanGuard::new(),
            stopped: false,
        })
    }

    /// Wait for the next scan worth handling.
    ///
    /// Blank decodes, decodes arriving while a scan is being handled and
    /// repeats of the previous code are skipped. Returns `None` once the
    /// stream ends or the session is closed.
    pub async fn next_scan(&mut self) -> Option<ScanEvent> {
        if self.stopped {
            return None;
        }

        loop {
            let decoded = self.stream.next_decoded().await?;

            if let Some(event) = self.guard.accept(&decoded, Timestamp::now()) {
                return Some(event);
            }

            debug!(decoded = %decoded.trim(), "duplicate decode suppressed");
        }
    }

    /// Mark the current scan as handled.
    ///
    /// Decodes the stream buffered while the scan was being handled are
    /// discarded, so only codes read after this call can be accepted.
    pub fn complete(&mut self) {
        if self.guard.is_processing() && !self.stopped {
            let mut discarded = 0_usize;

            while self.stream.try_next_decoded().is_some() {
                discarded += 1;
            }

            if discarded > 0 {
                debug!(discarded, "decodes read while processing dropped");
            }
        }

        self.guard.complete();
    }

    /// Whether a scan is being handled.
    pub fn is_processing(&self) -> bool {
        self.guard.is_processing()
    }

    /// Forget the previous code so it can be scanned again.
    pub fn rearm(&mut self) {
        self.guard.reset();
    }

    /// Stop the camera now.
    pub fn close(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if self.stopped {
            return;
        }

        self.stream.stop();
        self.stopped = true;

        info!("scanner closed");
    }
}

impl fmt::Debug for ScannerSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScannerSession")
            .field("guard", &self.guard)
            .field("stopped", &self.stopped)
            .finish_non_exhaustive()
    }
}

impl Drop for ScannerSession {
    fn drop(&mut self) {
        self.stop();
    }
}
