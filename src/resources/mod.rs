//! Resource Records
//!
//! GPU-backed resource records owned by the rendering device:
//! - [`Shader`]: a compiled vertex/pixel stage pair plus input layout
//! - [`Texture`]: an uploaded image resource and its sampled view
//! - [`Material`]: per-mesh color and texture references by id
//! - [`Mesh`] / [`Model`]: flattened scene geometry
//!
//! Records are append-only for the lifetime of the owning device; ids are
//! unique positive integers and `0` is the reserved failure sentinel.

pub mod cache;

pub use cache::{CachedResource, ResourceCache};

use bytemuck::{Pod, Zeroable};
use glam::Vec4;

// ============================================================================
// Vertex
// ============================================================================

/// The fixed vertex format every mesh buffer uses.
///
/// Attribute order is part of the shader contract: position at location 0,
/// texture coordinates at location 1, normal at location 2.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Default, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub texcoord: [f32; 2],
    pub normal: [f32; 3],
}

impl Vertex {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x2, // texcoord
        2 => Float32x3  // normal
    ];

    /// Buffer layout matching [`Vertex`]'s memory representation.
    #[must_use]
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

// ============================================================================
// Rasterizer mode
// ============================================================================

/// Fill mode selector for the two prebuilt rasterizer pipelines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RasterizerMode {
    /// Filled triangles. Active immediately after device construction.
    #[default]
    Solid,
    /// Line rasterization of triangle edges.
    WireFrame,
}

// ============================================================================
// Cached records
// ============================================================================

/// A compiled shader program pair.
///
/// Created atomically: both stages compiled and the input layout derived,
/// or nothing is cached.
#[derive(Debug)]
pub struct Shader {
    pub id: u32,
    /// Resolved path of the vertex stage source.
    pub vertex_path: String,
    /// Resolved path of the pixel stage source.
    pub pixel_path: String,
    pub vertex_module: wgpu::ShaderModule,
    pub pixel_module: wgpu::ShaderModule,
    pub input_layout: wgpu::VertexBufferLayout<'static>,
}

/// An uploaded RGBA8 image and its shader-readable view.
#[derive(Debug)]
pub struct Texture {
    pub id: u32,
    /// The path this texture was requested under. Dedup key for
    /// [`find_texture_by_path`](crate::RenderingDevice::find_texture_by_path);
    /// compared by exact string equality.
    pub path: String,
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

/// Per-mesh surface description. Texture references are ids into the
/// texture cache, `0` meaning the role is unset.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Material {
    pub color: Vec4,
    pub diffuse_texture: u32,
    pub specular_texture: u32,
    pub normal_texture: u32,
}

/// One drawable chunk of a model.
///
/// Buffer handles are `None` when their creation failed; the mesh is still
/// recorded and the failure is only logged.
#[derive(Debug)]
pub struct Mesh {
    pub vertex_buffer: Option<wgpu::Buffer>,
    pub index_buffer: Option<wgpu::Buffer>,
    pub index_count: u32,
    pub material: Material,
}

/// A flattened imported scene: the meshes of every node in traversal
/// order. Meshes are owned by exactly one model.
#[derive(Debug)]
pub struct Model {
    pub id: u32,
    /// Resolved path of the source scene file.
    pub path: String,
    pub meshes: Vec<Mesh>,
}

impl CachedResource for Shader {
    fn id(&self) -> u32 {
        self.id
    }
}

impl CachedResource for Texture {
    fn id(&self) -> u32 {
        self.id
    }
}

impl CachedResource for Model {
    fn id(&self) -> u32 {
        self.id
    }
}
