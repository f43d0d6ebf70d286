//! Camera, depth and LIDAR reads

use std::time::Duration;

use bytes::{Buf, Bytes};
use contracts::{LidarConfig, ObjectHandle, SignalMode, VisionImage, DEPTH_COLS, DEPTH_ROWS};
use image::{imageops, RgbImage};
use sim_gateway::SimulatorGateway;
use tracing::{debug, instrument};

use crate::error::{ControlError, Result};

/// Read the RGB raster of `sensor`, rotated by 180° into upright orientation
#[instrument(name = "sensing_capture_image", skip(gateway))]
pub async fn capture_image<G: SimulatorGateway + Sync>(
    gateway: &G,
    sensor: ObjectHandle,
) -> Result<RgbImage> {
    let raw = gateway.get_vision_sensor_image(sensor).await?;
    let image = to_rgb(raw)?;
    Ok(imageops::rotate180(&image))
}

/// Raster must hold exactly `width * height` RGB pixels
fn to_rgb(raw: VisionImage) -> Result<RgbImage> {
    let expected = raw.expected_len();
    let actual = raw.pixels.len();
    let shape_error = ControlError::ImageShape {
        width: raw.width,
        height: raw.height,
        expected,
        actual,
    };
    if actual != expected {
        return Err(shape_error);
    }
    RgbImage::from_raw(raw.width, raw.height, raw.pixels.to_vec()).ok_or(shape_error)
}

/// Read the depth buffer of `sensor` as `DEPTH_ROWS` rows of `DEPTH_COLS`
/// values, unrotated
#[instrument(name = "sensing_capture_depth", skip(gateway))]
pub async fn capture_depth<G: SimulatorGateway + Sync>(
    gateway: &G,
    sensor: ObjectHandle,
) -> Result<Vec<Vec<f32>>> {
    let depth = gateway.get_vision_sensor_depth(sensor).await?;
    let expected = DEPTH_ROWS * DEPTH_COLS;
    if depth.values.len() != expected {
        return Err(ControlError::DepthShape {
            expected,
            actual: depth.values.len(),
        });
    }
    Ok(depth
        .values
        .chunks_exact(DEPTH_COLS)
        .map(<[f32]>::to_vec)
        .collect())
}

/// LIDAR read settings
#[derive(Debug, Clone)]
pub struct LidarSettings {
    pub signal: String,
    /// Wait between subscribing and the first buffered read
    pub settle: Duration,
    pub max_polls: u64,
}

impl From<&LidarConfig> for LidarSettings {
    fn from(config: &LidarConfig) -> Self {
        Self {
            signal: config.signal.clone(),
            settle: Duration::from_millis(config.settle_ms),
            max_polls: config.max_polls,
        }
    }
}

/// One LIDAR sweep.
///
/// Subscribes to the range signal and waits `settle`. A non-empty subscribe
/// answer is used as is; otherwise the buffered value is read until it is
/// non-empty.
#[instrument(name = "sensing_lidar_scan", skip(gateway, settings), fields(signal = %settings.signal))]
pub async fn lidar_scan<G: SimulatorGateway + Sync>(
    gateway: &G,
    settings: &LidarSettings,
) -> Result<Vec<f32>> {
    let first = gateway
        .get_string_signal(&settings.signal, SignalMode::Streaming)
        .await?;
    tokio::time::sleep(settings.settle).await;
    if !first.is_empty() {
        let ranges = unpack_ranges(first);
        debug!(ranges = ranges.len(), "lidar scan received on subscribe");
        return Ok(ranges);
    }

    let mut polls = 0;
    while polls < settings.max_polls {
        let payload = gateway
            .get_string_signal(&settings.signal, SignalMode::Buffer)
            .await?;
        polls += 1;
        if !payload.is_empty() {
            let ranges = unpack_ranges(payload);
            debug!(polls, ranges = ranges.len(), "lidar scan received");
            return Ok(ranges);
        }
    }
    Err(ControlError::LidarUnavailable {
        signal: settings.signal.clone(),
        polls,
    })
}

/// Packed little-endian `f32` ranges. A trailing partial value is dropped.
pub fn unpack_ranges(mut payload: Bytes) -> Vec<f32> {
    let mut ranges = Vec::with_capacity(payload.len() / 4);
    while payload.remaining() >= 4 {
        ranges.push(payload.get_f32_le());
    }
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use sim_gateway::{GatewayCall, MockConfig, MockGateway};

    async fn gateway(config: MockConfig) -> MockGateway {
        let mut gateway = MockGateway::with_config(config);
        gateway.connect("127.0.0.1", 19997).await.unwrap();
        gateway.load_model("Models/youBot.ttm").await.unwrap();
        gateway
    }

    fn settings(max_polls: u64) -> LidarSettings {
        LidarSettings {
            signal: "scan ranges".to_string(),
            settle: Duration::from_millis(1),
            max_polls,
        }
    }

    #[tokio::test]
    async fn test_image_is_rotated_180() {
        let gateway = gateway(MockConfig {
            image_size: (4, 3),
            ..Default::default()
        })
        .await;
        let sensor = gateway.handle_of("kinect_rgb").unwrap();

        let image = capture_image(&gateway, sensor).await.unwrap();

        assert_eq!(image.dimensions(), (4, 3));
        // Mock raster pixel (x, y) is [x, y, x + y]
        assert_eq!(*image.get_pixel(0, 0), Rgb([3, 2, 5]));
        assert_eq!(*image.get_pixel(3, 2), Rgb([0, 0, 0]));
    }

    #[tokio::test]
    async fn test_depth_reshaped_to_rows() {
        let gateway = gateway(MockConfig::default()).await;
        let sensor = gateway.handle_of("kinect_depth").unwrap();

        let grid = capture_depth(&gateway, sensor).await.unwrap();

        assert_eq!(grid.len(), DEPTH_ROWS);
        assert!(grid.iter().all(|row| row.len() == DEPTH_COLS));
        assert_eq!(grid[0][0], 0.0);
        assert!(grid[1][0] > grid[0][DEPTH_COLS - 1]);
    }

    #[tokio::test]
    async fn test_depth_wrong_size_rejected() {
        let gateway = gateway(MockConfig {
            depth_size: (320, 240),
            ..Default::default()
        })
        .await;
        let sensor = gateway.handle_of("kinect_depth").unwrap();

        let err = capture_depth(&gateway, sensor).await.unwrap_err();
        assert!(matches!(
            err,
            ControlError::DepthShape {
                actual: 76_800,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_lidar_waits_for_non_empty_buffer() {
        let gateway = gateway(MockConfig {
            lidar_ranges: vec![0.5, 1.5, 2.5],
            lidar_empty_reads: 2,
            ..Default::default()
        })
        .await;

        let ranges = lidar_scan(&gateway, &settings(10)).await.unwrap();

        assert_eq!(ranges, vec![0.5, 1.5, 2.5]);
        let modes: Vec<SignalMode> = gateway
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                GatewayCall::GetStringSignal(_, mode) => Some(mode),
                _ => None,
            })
            .collect();
        assert_eq!(
            modes,
            vec![
                SignalMode::Streaming,
                SignalMode::Buffer,
                SignalMode::Buffer,
                SignalMode::Buffer,
            ]
        );
    }

    #[tokio::test]
    async fn test_lidar_bounded() {
        let gateway = gateway(MockConfig {
            lidar_empty_reads: 100,
            ..Default::default()
        })
        .await;

        let err = lidar_scan(&gateway, &settings(3)).await.unwrap_err();
        assert!(matches!(err, ControlError::LidarUnavailable { polls: 3, .. }));
    }

    #[tokio::test]
    async fn test_lidar_uses_subscribe_answer() {
        let gateway = gateway(MockConfig {
            lidar_ranges: vec![4.0, 2.0],
            lidar_on_subscribe: true,
            ..Default::default()
        })
        .await;

        let ranges = lidar_scan(&gateway, &settings(10)).await.unwrap();

        assert_eq!(ranges, vec![4.0, 2.0]);
        assert_eq!(
            gateway.count_calls(|c| matches!(c, GatewayCall::GetStringSignal(_, SignalMode::Buffer))),
            0
        );
    }

    #[test]
    fn test_raster_length_must_match_exactly() {
        let raster = |len: usize| VisionImage {
            width: 2,
            height: 2,
            pixels: Bytes::from(vec![7u8; len]),
        };

        assert_eq!(to_rgb(raster(12)).unwrap().dimensions(), (2, 2));
        for len in [9, 15] {
            match to_rgb(raster(len)).unwrap_err() {
                ControlError::ImageShape {
                    expected, actual, ..
                } => assert_eq!((expected, actual), (12, len)),
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }

    #[test]
    fn test_unpack_drops_partial_value() {
        let mut raw = 1.25f32.to_le_bytes().to_vec();
        raw.extend_from_slice(&[0, 1]);
        assert_eq!(unpack_ranges(Bytes::from(raw)), vec![1.25]);
    }
}
