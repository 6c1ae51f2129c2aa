// src/video.rs - Camera capture for the live window
use crate::config::CameraConfig;
use anyhow::{Context, Result};
use image::DynamicImage;
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution};
use nokhwa::Camera;
use std::io::Cursor;

pub struct CameraSource {
    camera: Camera,
}

impl CameraSource {
    pub fn open(config: &CameraConfig) -> Result<Self> {
        tracing::debug!(index = config.index, "opening camera");

        let format = CameraFormat::new(
            Resolution::new(config.width, config.height),
            FrameFormat::MJPEG,
            config.fps,
        );
        let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Exact(format));

        let camera = Camera::new(CameraIndex::Index(config.index), requested)
            .map_err(|e| anyhow::anyhow!("Failed to open camera {}: {}", config.index, e))?;

        Ok(Self { camera })
    }

    /// Grab the next frame, mirrored so the preview behaves like a mirror
    pub fn read_frame(&mut self) -> Result<DynamicImage> {
        if !self.camera.is_stream_open() {
            self.camera
                .open_stream()
                .map_err(|e| anyhow::anyhow!("Failed to open camera stream: {}", e))?;
        }

        let frame = self
            .camera
            .frame()
            .map_err(|e| anyhow::anyhow!("Failed to capture frame: {}", e))?;
        let decoded = frame
            .decode_image::<RgbFormat>()
            .map_err(|e| anyhow::anyhow!("Failed to decode frame: {}", e))?;

        let flipped = image::imageops::flip_horizontal(&decoded);
        Ok(DynamicImage::ImageRgb8(flipped))
    }
}

impl Drop for CameraSource {
    fn drop(&mut self) {
        let _ = self.camera.stop_stream();
    }
}

/// JPEG bytes handed to the pose estimator
pub fn encode_jpeg(frame: &DynamicImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    frame
        .write_to(&mut Cursor::new(&mut bytes), image::ImageOutputFormat::Jpeg(85))
        .context("Failed to encode frame")?;
    Ok(bytes)
}
