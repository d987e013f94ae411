//! Barcode scanner
//!
//! A thin adapter over a continuous decode stream. Opening a
//! [`ScannerSession`] acquires the camera; dropping it releases the camera,
//! whichever way the session ends.

mod channel;
mod config;
mod decoder;
mod errors;
mod session;

pub use channel::ChannelDecoder;
pub use config::{CameraFacing, ScanConfig, ScanRegion};
pub use decoder::{BarcodeDecoder, DecodeStream, MockBarcodeDecoder};
pub use errors::CameraError;
pub use session::ScannerSession;
