//! Raw vision sensor buffers

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Depth grid rows delivered to callers
pub const DEPTH_ROWS: usize = 480;
/// Depth grid columns delivered to callers
pub const DEPTH_COLS: usize = 640;

/// RGB raster as delivered by the vision sensor (row-major, 3 bytes per pixel).
///
/// Rows come bottom-up in sensor orientation; callers rotate before use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisionImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Bytes,
}

impl VisionImage {
    /// Expected byte count for the declared resolution
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * 3
    }
}

/// Depth buffer as delivered by the depth sensor (row-major)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepthBuffer {
    pub width: u32,
    pub height: u32,
    pub values: Vec<f32>,
}
