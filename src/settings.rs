//! Device Settings
//!
//! Construction-time configuration for [`RenderingDevice`](crate::RenderingDevice).
//!
//! The asset roots replace process-wide path constants: every load call
//! strips its argument to a bare file name and re-roots it under one of
//! these directories, so callers cannot escape them via path traversal.

use std::path::PathBuf;

/// Base directories under which each asset class is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRoots {
    /// Directory searched by `compile_shader`.
    pub shaders: PathBuf,
    /// Directory searched by `load_texture` and material resolution.
    pub textures: PathBuf,
    /// Directory searched by `load_model`.
    pub models: PathBuf,
}

impl Default for AssetRoots {
    fn default() -> Self {
        Self {
            shaders: PathBuf::from("assets/shaders"),
            textures: PathBuf::from("assets/textures"),
            models: PathBuf::from("assets/models"),
        }
    }
}

/// Configuration consumed once by [`RenderingDevice::new`](crate::RenderingDevice::new).
///
/// Surface dimensions arrive as separate construction arguments next to
/// the window handle; they are not re-queried afterwards.
#[derive(Debug, Clone, Default)]
pub struct DeviceSettings {
    /// Whether the owning window is fullscreen. Recorded for logging;
    /// window style itself belongs to the windowing layer.
    pub fullscreen: bool,
    /// Asset root directories.
    pub asset_roots: AssetRoots,
}
