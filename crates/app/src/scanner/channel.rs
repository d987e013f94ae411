//! Keyboard-wedge decoder.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::debug;

use super::{BarcodeDecoder, CameraError, CameraFacing, DecodeStream, ScanConfig};

type Slot = Arc<Mutex<Option<mpsc::Receiver<String>>>>;

/// Decoder fed through a channel, e.g. by a USB scanner that types the code
/// followed by Enter.
///
/// Only one stream can be open at a time; the receiver is handed back when
/// the stream stops.
#[derive(Debug, Clone)]
pub struct ChannelDecoder {
    slot: Slot,
}

impl ChannelDecoder {
    /// Create a decoder and the sender that feeds it.
    pub fn new(buffer: usize) -> (Self, mpsc::Sender<String>) {
        let (sender, receiver) = mpsc::channel(buffer);

        (
            Self {
                slot: Arc::new(Mutex::new(Some(receiver))),
            },
            sender,
        )
    }
}

#[async_trait]
impl BarcodeDecoder for ChannelDecoder {
    async fn check_permission(&self, _facing: CameraFacing) -> Result<(), CameraError> {
        Ok(())
    }

    async fn start(
        &self,
        facing: CameraFacing,
        _config: ScanConfig,
    ) -> Result<Box<dyn DecodeStream>, CameraError> {
        let receiver = self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .ok_or(CameraError::Busy)?;

        debug!(%facing, "keyboard decoder started");

        Ok(Box::new(ChannelStream {
            receiver: Some(receiver),
            slot: Arc::clone(&self.slot),
        }))
    }
}

#[derive(Debug)]
struct ChannelStream {
    receiver: Option<mpsc::Receiver<String>>,
    slot: Slot,
}

#[async_trait]
impl DecodeStream for ChannelStream {
    async fn next_decoded(&mut self) -> Option<String> {
        self.receiver.as_mut()?.recv().await
    }

    fn try_next_decoded(&mut self) -> Option<String> {
        self.receiver.as_mut()?.try_recv().ok()
    }

    fn stop(&mut self) {
        if let Some(receiver) = self.receiver.take() {
            *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(receiver);

            debug!("keyboard decoder stopped");
        }
    }
}

impl Drop for ChannelStream {
    fn drop(&mut self) {
        self.stop();
    }
}
