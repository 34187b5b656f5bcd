//! Asset Resolution & Decoding
//!
//! Everything between a caller-supplied asset name and bytes the device
//! can upload: path sandboxing under the configured asset roots, PNG
//! decoding, and scene import.

pub mod image;
pub(crate) mod importer;

pub use image::{DecodedImage, decode_rgba};

use std::path::{Path, PathBuf};

use crate::utils::strip_path_to_file_name;

/// Re-roots a requested asset under `root`.
///
/// Only the bare file name of `requested` survives, so references inside
/// model files (and hostile callers) cannot traverse outside the root.
#[must_use]
pub fn resolve_asset_path(root: &Path, requested: &str) -> PathBuf {
    root.join(strip_path_to_file_name(requested))
}
