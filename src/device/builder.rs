//! GPU Object Creation Units
//!
//! One function per creation step of the device and its resources. The
//! concurrent call sites in [`super`] fork these on scoped threads; each
//! unit produces its own handle and reports its own failure through the
//! log, so a failing unit never cancels a sibling.

use std::fs;
use std::path::Path;

use wgpu::util::DeviceExt as _;

use crate::assets::{DecodedImage, decode_rgba};
use crate::resources::{RasterizerMode, Vertex};

/// Depth/stencil buffer format, the 24-bit depth + 8-bit stencil layout.
pub(crate) const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24PlusStencil8;

/// Fixed texture format: 8-bit RGBA, no compression.
pub(crate) const TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

// ============================================================================
// Device state objects
// ============================================================================

/// Depth test-and-write state shared by both rasterizer pipelines.
///
/// Depth: less-than test with writes enabled. Stencil: always pass,
/// increment on front-face depth fail, decrement on back-face depth fail,
/// full read/write masks.
pub(crate) fn depth_stencil_state() -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled: true,
        depth_compare: wgpu::CompareFunction::Less,
        stencil: wgpu::StencilState {
            front: wgpu::StencilFaceState {
                compare: wgpu::CompareFunction::Always,
                fail_op: wgpu::StencilOperation::Keep,
                depth_fail_op: wgpu::StencilOperation::IncrementWrap,
                pass_op: wgpu::StencilOperation::Keep,
            },
            back: wgpu::StencilFaceState {
                compare: wgpu::CompareFunction::Always,
                fail_op: wgpu::StencilOperation::Keep,
                depth_fail_op: wgpu::StencilOperation::DecrementWrap,
                pass_op: wgpu::StencilOperation::Keep,
            },
            read_mask: 0xFF,
            write_mask: 0xFF,
        },
        bias: wgpu::DepthBiasState::default(),
    }
}

/// Depth/stencil buffer and view sized to the surface.
pub(crate) fn create_depth_target(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
) -> wgpu::TextureView {
    log::info!("Creating depth/stencil buffer...");

    let size = wgpu::Extent3d {
        width: config.width,
        height: config.height,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Buffer"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    });
    log::info!("Depth/stencil buffer created");

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    log::info!("Depth/stencil view created");

    view
}

/// Trilinear sampler with repeat addressing on all axes.
pub(crate) fn create_linear_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    log::info!("Creating sampler...");

    let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("Linear Sampler"),
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::Repeat,
        address_mode_w: wgpu::AddressMode::Repeat,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::MipmapFilterMode::Linear,
        lod_min_clamp: 0.0,
        lod_max_clamp: f32::MAX,
        ..Default::default()
    });

    log::info!("Sampler created");
    sampler
}

/// Empty pipeline layout shared by both rasterizer pipelines.
pub(crate) fn create_rasterizer_layout(device: &wgpu::Device) -> wgpu::PipelineLayout {
    device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Rasterizer Pipeline Layout"),
        bind_group_layouts: &[],
        immediate_size: 0,
    })
}

/// One of the two prebuilt rasterizer variants: back-face culling,
/// clockwise front faces, fill mode from `mode`.
pub(crate) fn create_rasterizer_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    vertex_module: &wgpu::ShaderModule,
    pixel_module: &wgpu::ShaderModule,
    color_format: wgpu::TextureFormat,
    depth_stencil: wgpu::DepthStencilState,
    mode: RasterizerMode,
) -> wgpu::RenderPipeline {
    let (label, polygon_mode) = match mode {
        RasterizerMode::Solid => ("Solid Rasterizer Pipeline", wgpu::PolygonMode::Fill),
        RasterizerMode::WireFrame => ("WireFrame Rasterizer Pipeline", wgpu::PolygonMode::Line),
    };
    log::info!("Creating {mode:?} rasterizer pipeline");

    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: vertex_module,
            entry_point: Some("main"),
            buffers: &[Vertex::layout()],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: pixel_module,
            entry_point: Some("main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            front_face: wgpu::FrontFace::Cw,
            cull_mode: Some(wgpu::Face::Back),
            polygon_mode,
            ..Default::default()
        },
        depth_stencil: Some(depth_stencil),
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    });

    log::info!("Rasterizer pipeline created");
    pipeline
}

// ============================================================================
// Shader stages
// ============================================================================

/// Reads and compiles one WGSL stage.
///
/// Compilation errors surface through a validation error scope; the stage
/// yields `None` and the reason is logged.
pub(crate) fn compile_shader_stage(
    device: &wgpu::Device,
    path: &Path,
) -> Option<wgpu::ShaderModule> {
    log::info!("Compiling {}", path.display());

    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            log::error!("Failed to read {}: {err}", path.display());
            return None;
        }
    };

    let label = path.display().to_string();
    let error_scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(&label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });
    if let Some(err) = pollster::block_on(error_scope.pop()) {
        log::error!("{} compilation failed! Reason: {err}", path.display());
        return None;
    }

    log::info!("{} compiled", path.display());
    Some(module)
}

/// Vertex stage plus the input layout it consumes.
pub(crate) fn compile_vertex_stage(
    device: &wgpu::Device,
    path: &Path,
) -> Option<(wgpu::ShaderModule, wgpu::VertexBufferLayout<'static>)> {
    let module = compile_shader_stage(device, path)?;
    let layout = Vertex::layout();
    log::info!("Derived input layout for {}", path.display());
    Some((module, layout))
}

// ============================================================================
// Textures and buffers
// ============================================================================

/// Uploads decoded RGBA8 pixels into a new texture and creates its
/// sampled view.
pub(crate) fn create_texture_with_view(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    image: &DecodedImage,
    path: &str,
) -> Option<(wgpu::Texture, wgpu::TextureView)> {
    let max_dimension = device.limits().max_texture_dimension_2d;
    if image.width == 0
        || image.height == 0
        || image.width > max_dimension
        || image.height > max_dimension
    {
        log::error!(
            "Texture creation failed for {path}: {}x{} is outside device limits",
            image.width,
            image.height
        );
        return None;
    }

    let size = wgpu::Extent3d {
        width: image.width,
        height: image.height,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(path),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: TEXTURE_FORMAT,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        &image.pixels,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(image.width * 4),
            rows_per_image: Some(image.height),
        },
        size,
    );
    log::info!("Texture data uploaded");

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    log::info!("Texture view created");

    Some((texture, view))
}

/// Decode-and-upload unit behind every texture load. Takes the already
/// resolved file path.
pub(crate) fn load_texture_from_file(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    path: &Path,
) -> Option<(wgpu::Texture, wgpu::TextureView)> {
    log::info!("Loading {}", path.display());

    let image = match decode_rgba(path) {
        Ok(image) => image,
        Err(err) => {
            log::error!("Failed to load texture {}: {err}", path.display());
            return None;
        }
    };
    log::info!("Texture decoded");

    let label = path.display().to_string();
    create_texture_with_view(device, queue, &image, &label)
}

/// Vertex buffer from assembled vertices. Empty input is the failure
/// case: a zero-sized buffer is not creatable.
pub(crate) fn create_vertex_buffer(
    device: &wgpu::Device,
    vertices: &[Vertex],
) -> Option<wgpu::Buffer> {
    if vertices.is_empty() {
        log::error!("Vertex buffer creation failed: no vertex data");
        return None;
    }
    Some(
        device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Vertex Buffer"),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        }),
    )
}

/// Index buffer from a triangle list. Empty input is the failure case.
pub(crate) fn create_index_buffer(device: &wgpu::Device, indices: &[u32]) -> Option<wgpu::Buffer> {
    if indices.is_empty() {
        log::error!("Index buffer creation failed: no index data");
        return None;
    }
    Some(
        device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Index Buffer"),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        }),
    )
}
