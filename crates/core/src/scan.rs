//! Scan de-duplication.
//!
//! A camera decoder running at ~10 frames per second reports the same
//! physical barcode many times while it stays in frame. [`ScanGuard`] turns
//! that stream into one [`ScanEvent`] per intended scan.

use jiff::Timestamp;

/// One accepted barcode scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanEvent {
    /// Decoded barcode text
    pub code: String,

    /// When the decode was accepted
    pub scanned_at: Timestamp,
}

/// Suppresses decodes while a scan is being processed and decodes equal to
/// the immediately preceding accepted code.
#[derive(Debug, Default)]
pub struct ScanGuard {
    processing: bool,
    last: Option<String>,
}

impl ScanGuard {
    /// Create a guard for a new scanner session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer a decoded string; returns the event if it should be handled.
    ///
    /// An accepted decode puts the guard in the processing state until
    /// [`ScanGuard::complete`] is called.
    pub fn accept(&mut self, decoded: &str, at: Timestamp) -> Option<ScanEvent> {
        let code = decoded.trim();

        if code.is_empty() || self.processing || self.last.as_deref() == Some(code) {
            return None;
        }

        self.processing = true;
        self.last = Some(code.to_string());

        Some(ScanEvent {
            code: code.to_string(),
            scanned_at: at,
        })
    }

    /// Mark the current scan as handled. The code is still remembered, so
    /// the same barcode left in frame stays suppressed.
    pub fn complete(&mut self) {
        self.processing = false;
    }

    /// Forget everything, as when the scanner is restarted.
    pub fn reset(&mut self) {
        self.processing = false;
        self.last = None;
    }

    /// Whether an accepted scan is still being handled.
    pub fn is_processing(&self) -> bool {
        self.processing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_decodes_during_processing_are_dropped() {
        let mut guard = ScanGuard::new();
        let now = Timestamp::now();

        assert!(guard.accept("7501", now).is_some());
        assert!(guard.accept("7501", now).is_none());
        assert!(guard.accept("7502", now).is_none(), "busy while processing");
    }

    #[test]
    fn same_code_stays_suppressed_after_completion() {
        let mut guard = ScanGuard::new();
        let now = Timestamp::now();

        guard.accept("7501", now);
        guard.complete();

        assert!(guard.accept("7501", now).is_none());
        assert_eq!(
            guard.accept("7502", now).map(|event| event.code),
            Some("7502".to_string())
        );
    }

    #[test]
    fn reset_allows_rescanning_the_same_code() {
        let mut guard = ScanGuard::new();
        let now = Timestamp::now();

        guard.accept("7501", now);
        guard.reset();

        assert!(!guard.is_processing());
        assert!(guard.accept("7501", now).is_some());
    }

    #[test]
    fn blank_decodes_are_ignored() {
        let mut guard = ScanGuard::new();

        assert!(guard.accept("   ", Timestamp::now()).is_none());
        assert!(!guard.is_processing());
    }
}
