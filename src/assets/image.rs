//! Image Decoding
//!
//! Thin adapter over the image codec. Textures are always expanded to
//! 8-bit RGBA regardless of the source channel layout.

use std::path::Path;

use crate::errors::Result;

/// Raw pixels ready for GPU upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// Tightly packed RGBA8 rows, `width * height * 4` bytes.
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Decodes the image at `path` into RGBA8.
pub fn decode_rgba(path: &Path) -> Result<DecodedImage> {
    let rgba = image::open(path)?.into_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(DecodedImage {
        pixels: rgba.into_raw(),
        width,
        height,
    })
}
