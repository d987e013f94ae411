//! Scanner configuration.

use std::fmt;

/// Which camera to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CameraFacing {
    /// Rear camera, pointed at the product
    #[default]
    Environment,

    /// Front camera
    User,
}

impl fmt::Display for CameraFacing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Environment => "environment",
            Self::User => "user",
        })
    }
}

/// Area of the frame searched for a code, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanRegion {
    /// Box width
    pub width: u32,

    /// Box height
    pub height: u32,
}

/// Decoder tuning. Only meaningful to the decoder itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanConfig {
    /// Decode attempts per second
    pub fps: u32,

    /// Scan box
    pub region: ScanRegion,

    /// Video aspect ratio
    pub aspect_ratio: f32,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            fps: 10,
            region: ScanRegion {
                width: 250,
                height: 150,
            },
            aspect_ratio: 1.0,
        }
    }
}
