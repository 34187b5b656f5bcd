//! # smalt
//!
//! The rendering-device core of a small real-time engine: GPU bring-up
//! against a caller-supplied window, concurrent resource construction,
//! and id-keyed caches for shaders, textures, and imported models.
//!
//! The entry point is [`RenderingDevice::new`], which owns the whole
//! pipeline for its lifetime. Loads hand out positive integer ids, with
//! `0` reserved to mean the load failed; failures after construction are
//! logged through the [`log`] facade rather than surfaced as errors.
//!
//! ```rust,no_run
//! use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
//! use smalt::{DeviceSettings, RasterizerMode, RenderingDevice};
//!
//! fn run<W>(window: W) -> smalt::Result<()>
//! where
//!     W: HasWindowHandle + HasDisplayHandle + Send + Sync + 'static,
//! {
//!     let mut device = RenderingDevice::new(window, &DeviceSettings::default(), 1280, 720)?;
//!
//!     device.load_model("teapot.gltf");
//!     device.set_rasterizer_mode(RasterizerMode::WireFrame);
//!     device.draw_frame();
//!     Ok(())
//! }
//! ```

pub mod assets;
pub mod device;
pub mod errors;
pub mod resources;
pub mod settings;
pub mod utils;

pub use assets::{DecodedImage, decode_rgba, resolve_asset_path};
pub use device::RenderingDevice;
pub use errors::{Result, SmaltError};
pub use resources::{
    CachedResource, Material, Mesh, Model, RasterizerMode, ResourceCache, Shader, Texture, Vertex,
};
pub use settings::{AssetRoots, DeviceSettings};
