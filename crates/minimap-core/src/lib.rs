//! Core types and image utilities for minimap marker detection.
//!
//! This crate is intentionally small. It knows about HSV pixels, colour
//! acceptance ranges and binary masks, and nothing about blobs, markers or
//! waypoints. Every later stage of the pipeline borrows a [`HsvImageView`]
//! and produces or consumes a [`BinaryMask`].

mod hsv;
#[cfg(feature = "tracing")]
mod logger;
mod mask;
mod morphology;
mod range;

pub use hsv::{rgb_to_hsv, Hsv, HsvImage, HsvImageView, HUE_MAX, SAT_MAX, VAL_MAX};
pub use mask::{mask, mask_any, BinaryMask};
pub use morphology::{clean, close, dilate, erode, open};
pub use range::{Channel, ColorRange, ColorRangeError};

#[cfg(feature = "tracing")]
pub use logger::{init_tracing, LogFormat};
