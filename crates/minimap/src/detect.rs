//! Adapters from `image` crate buffers into the detection pipeline.

use image::{GrayImage, RgbImage};
use minimap_core::{rgb_to_hsv, BinaryMask, HsvImage};
use minimap_detect::{DetectionEngine, DetectionResult};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors produced by the image adapters.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("invalid RGB buffer length (expected {expected} bytes, got {got})")]
    InvalidRgbBuffer { expected: usize, got: usize },

    #[error("invalid frame dimensions (width={width}, height={height})")]
    InvalidDimensions { width: u32, height: u32 },

    #[error(
        "region {width}x{height} at ({x}, {y}) does not fit a {image_width}x{image_height} frame"
    )]
    RegionOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        image_width: u32,
        image_height: u32,
    },
}

/// Convert an `image::RgbImage` into an owned HSV frame.
pub fn hsv_from_rgb_image(img: &RgbImage) -> HsvImage {
    HsvImage {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.pixels().map(|p| rgb_to_hsv(p[0], p[1], p[2])).collect(),
    }
}

/// Convert a raw interleaved RGB buffer into an owned HSV frame.
pub fn hsv_from_rgb_buffer(width: u32, height: u32, rgb: &[u8]) -> Result<HsvImage, FrameError> {
    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(3))
        .ok_or(FrameError::InvalidDimensions { width, height })?;
    HsvImage::from_rgb(width as usize, height as usize, rgb).ok_or(FrameError::InvalidRgbBuffer {
        expected,
        got: rgb.len(),
    })
}

/// Copy the `width`×`height` region at `(x, y)` out of a full frame.
pub fn crop_region(
    img: &RgbImage,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
) -> Result<RgbImage, FrameError> {
    let fits_x = x.checked_add(width).is_some_and(|r| r <= img.width());
    let fits_y = y.checked_add(height).is_some_and(|b| b <= img.height());
    if !(fits_x && fits_y) {
        return Err(FrameError::RegionOutOfBounds {
            x,
            y,
            width,
            height,
            image_width: img.width(),
            image_height: img.height(),
        });
    }
    Ok(image::imageops::crop_imm(img, x, y, width, height).to_image())
}

/// Binary mask as an 8-bit image (foreground 255).
pub fn mask_to_gray(mask: &BinaryMask) -> Result<GrayImage, FrameError> {
    let (width, height) = (mask.width as u32, mask.height as u32);
    GrayImage::from_raw(width, height, mask.to_luma_bytes())
        .ok_or(FrameError::InvalidDimensions { width, height })
}

/// Run one detection call on an RGB minimap region.
#[cfg_attr(
    feature = "tracing",
    instrument(
        level = "info",
        skip(engine, img),
        fields(width = img.width(), height = img.height())
    )
)]
pub fn detect_image(engine: &mut DetectionEngine, img: &RgbImage) -> DetectionResult {
    let hsv = hsv_from_rgb_image(img);
    engine.detect(&hsv.view())
}

/// Same as [`detect_image`] with an explicit timestamp.
pub fn detect_image_at(
    engine: &mut DetectionEngine,
    img: &RgbImage,
    timestamp_ms: u64,
) -> DetectionResult {
    let hsv = hsv_from_rgb_image(img);
    engine.detect_at(&hsv.view(), timestamp_ms)
}
