//! Error Types
//!
//! This module defines the error types used throughout the rendering core.
//!
//! # Overview
//!
//! The main error type [`SmaltError`] distinguishes two classes of failure:
//! - Fatal device construction errors (no adapter, device refused, surface
//!   unsupported) that abort [`RenderingDevice::new`](crate::RenderingDevice::new)
//! - Recoverable asset errors (I/O, decode, import) that the load paths
//!   catch, log, and collapse into the id `0` sentinel
//!
//! # Usage
//!
//! Public fallible APIs return [`Result<T>`], an alias for
//! `std::result::Result<T, SmaltError>`.
//!
//! ```rust,ignore
//! use smalt::{RenderingDevice, Result};
//!
//! fn boot() -> Result<()> {
//!     // Construction either fully succeeds or returns the fatal error.
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The main error type for the rendering core.
#[derive(Error, Debug)]
pub enum SmaltError {
    // ========================================================================
    // Device Construction Errors (fatal)
    // ========================================================================
    /// Failed to create the presentation surface from the window handle.
    #[error("Failed to create rendering surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),

    /// No enumerated adapter is a hardware GPU.
    #[error("No suitable graphics adapter found")]
    NoSuitableAdapter,

    /// The selected adapter refused the device request.
    #[error("Failed to create GPU device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),

    /// The surface cannot be configured against the selected adapter.
    #[error("Presentation surface is not supported by the selected adapter")]
    UnsupportedSurface,

    // ========================================================================
    // Asset Errors (recoverable at the load-call boundary)
    // ========================================================================
    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image file failed to decode.
    #[error("Image decode error: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// Scene file failed to parse.
    #[error("Scene import error: {0}")]
    SceneImport(#[from] gltf::Error),

    /// An embedded base64 buffer failed to decode.
    #[error("Embedded buffer data is not valid base64: {0}")]
    EmbeddedBufferData(#[from] base64::DecodeError),

    /// A buffer URI scheme the importer does not handle.
    #[error("Unsupported buffer URI: {0}")]
    UnsupportedBufferUri(String),

    /// A buffer resolved to fewer bytes than the document declares.
    #[error("Scene buffer {index} is shorter than its declared length")]
    TruncatedBuffer {
        /// Index of the buffer in the document's buffer table.
        index: usize,
    },
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, SmaltError>;
