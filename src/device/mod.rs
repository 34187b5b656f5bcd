//! Rendering Device
//!
//! [`RenderingDevice`] is the crate's root object. It owns the GPU device
//! and queue, the presentation surface, the depth/stencil target, the two
//! prebuilt rasterizer pipelines, and the shader/texture/model caches.
//!
//! Construction brings the pipeline up in a fixed order; the three
//! independent state objects (both rasterizer pipelines and the sampler)
//! build on forked threads while the depth resources are created on the
//! calling thread, and everything is joined before the constructor
//! returns. After construction every operation is blocking and takes the
//! device exclusively; resource ids handed out by the load operations are
//! unique positive integers, with `0` reserved as the failure sentinel.

pub(crate) mod adapter;
pub(crate) mod assembler;
pub(crate) mod builder;
pub(crate) mod parallel;

use std::thread;

use raw_window_handle::{HasDisplayHandle, HasWindowHandle};

use crate::assets::{importer, resolve_asset_path};
use crate::errors::{Result, SmaltError};
use crate::resources::{Model, RasterizerMode, ResourceCache, Shader, Texture};
use crate::settings::{AssetRoots, DeviceSettings};

/// Clear color of every frame.
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 0.2,
    b: 0.6,
    a: 1.0,
};

/// The rendering pipeline and its resource caches.
pub struct RenderingDevice {
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,
    sampler: wgpu::Sampler,
    solid_pipeline: wgpu::RenderPipeline,
    wireframe_pipeline: wgpu::RenderPipeline,
    rasterizer_mode: RasterizerMode,
    roots: AssetRoots,
    shaders: ResourceCache<Shader>,
    textures: ResourceCache<Texture>,
    models: ResourceCache<Model>,
}

impl RenderingDevice {
    /// Brings the full rendering pipeline up against `window`.
    ///
    /// Fails only on the fatal bring-up errors: surface creation, no
    /// suitable hardware adapter, device request, or a surface the
    /// adapter cannot present to. Everything after construction reports
    /// failure through the log and the `0` id sentinel instead.
    pub fn new<W>(window: W, settings: &DeviceSettings, width: u32, height: u32) -> Result<Self>
    where
        W: HasWindowHandle + HasDisplayHandle + Send + Sync + 'static,
    {
        log::info!("Initializing rendering pipeline...");

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            flags: wgpu::InstanceFlags::from_build_config(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;
        log::info!("Instance and surface created");

        let adapter = adapter::find_suitable_adapter(
            pollster::block_on(instance.enumerate_adapters(wgpu::Backends::PRIMARY)),
        )
        .ok_or(SmaltError::NoSuitableAdapter)?;

        log::info!("Creating device...");
        let (device, queue) =
            pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
                label: Some("Rendering Device"),
                required_features: wgpu::Features::POLYGON_MODE_LINE,
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::Performance,
                ..Default::default()
            }))?;
        log::info!("Device and queue created");

        log::info!("Creating swapchain...");
        let mut config = surface
            .get_default_config(&adapter, width, height)
            .ok_or(SmaltError::UnsupportedSurface)?;
        config.present_mode = wgpu::PresentMode::AutoNoVsync;
        surface.configure(&device, &config);
        if settings.fullscreen {
            log::info!("Fullscreen requested; the windowing layer owns the mode switch");
        }
        log::info!(
            "Swapchain configured: {}x{} {:?}",
            config.width,
            config.height,
            config.format
        );

        let depth_stencil = builder::depth_stencil_state();
        log::info!("Depth/stencil state prepared");
        let vertex_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Default Vertex Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/default.vert.wgsl").into()),
        });
        let pixel_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Default Pixel Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/default.frag.wgsl").into()),
        });
        let layout = builder::create_rasterizer_layout(&device);

        // State objects fork here; depth resources are created on this
        // thread in the gap before the join.
        let (wireframe_pipeline, solid_pipeline, sampler, depth_view) = thread::scope(|scope| {
            let wireframe = scope.spawn(|| {
                builder::create_rasterizer_pipeline(
                    &device,
                    &layout,
                    &vertex_module,
                    &pixel_module,
                    config.format,
                    depth_stencil.clone(),
                    RasterizerMode::WireFrame,
                )
            });
            let solid = scope.spawn(|| {
                builder::create_rasterizer_pipeline(
                    &device,
                    &layout,
                    &vertex_module,
                    &pixel_module,
                    config.format,
                    depth_stencil.clone(),
                    RasterizerMode::Solid,
                )
            });
            let sampler = scope.spawn(|| builder::create_linear_sampler(&device));

            let depth_view = builder::create_depth_target(&device, &config);

            (
                parallel::join_unit(wireframe),
                parallel::join_unit(solid),
                parallel::join_unit(sampler),
                depth_view,
            )
        });

        let mut this = Self {
            device,
            queue,
            surface,
            config,
            depth_view,
            sampler,
            solid_pipeline,
            wireframe_pipeline,
            rasterizer_mode: RasterizerMode::Solid,
            roots: settings.asset_roots.clone(),
            shaders: ResourceCache::new(),
            textures: ResourceCache::new(),
            models: ResourceCache::new(),
        };
        this.set_rasterizer_mode(RasterizerMode::Solid);

        log::info!("Pipeline initialization finished");
        Ok(this)
    }

    /// Clears and presents one frame.
    ///
    /// The depth/stencil target clears to 1.0/0 and the back buffer to
    /// the fixed clear color, with the active rasterizer pipeline bound
    /// and the viewport covering the surface. Acquisition and present
    /// problems are logged, never surfaced.
    pub fn draw_frame(&self) {
        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(err) => {
                log::error!("Failed to acquire back buffer: {err}");
                return;
            }
        };
        let back_buffer = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Frame Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &back_buffer,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(0),
                        store: wgpu::StoreOp::Store,
                    }),
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
            pass.set_pipeline(self.active_pipeline());
            pass.set_viewport(
                0.0,
                0.0,
                self.config.width as f32,
                self.config.height as f32,
                0.0,
                1.0,
            );
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
    }

    /// Compiles a vertex/pixel shader pair, both stages concurrently, and
    /// caches the program.
    ///
    /// Returns the new shader's id, or `0` if either stage failed. The
    /// program is cached atomically: a failed stage caches nothing.
    pub fn compile_shader(&mut self, vertex_path: &str, pixel_path: &str) -> u32 {
        let vertex_file = resolve_asset_path(&self.roots.shaders, vertex_path);
        let pixel_file = resolve_asset_path(&self.roots.shaders, pixel_path);

        let device = &self.device;
        let (vertex_stage, pixel_stage) = parallel::join2(
            || builder::compile_vertex_stage(device, &vertex_file),
            || builder::compile_shader_stage(device, &pixel_file),
        );

        let (Some((vertex_module, input_layout)), Some(pixel_module)) =
            (vertex_stage, pixel_stage)
        else {
            log::error!("Failed to compile shaders!");
            return 0;
        };

        self.shaders.insert_with(|id| Shader {
            id,
            vertex_path: vertex_file.to_string_lossy().into_owned(),
            pixel_path: pixel_file.to_string_lossy().into_owned(),
            vertex_module,
            pixel_module,
            input_layout,
        })
    }

    /// Loads a PNG texture from the texture root and caches it under its
    /// resolved path.
    ///
    /// Returns the new texture's id, or `0` on failure. Every call loads
    /// and caches a fresh entry; dedup by path is the scene import's
    /// behavior, not this one's.
    pub fn load_texture(&mut self, path: &str) -> u32 {
        let resolved = resolve_asset_path(&self.roots.textures, path);
        let Some((texture, view)) =
            builder::load_texture_from_file(&self.device, &self.queue, &resolved)
        else {
            return 0;
        };

        let resolved = resolved.to_string_lossy().into_owned();
        log::info!("{resolved} loaded");
        self.textures.insert_with(|id| Texture {
            id,
            path: resolved,
            texture,
            view,
        })
    }

    /// Imports a scene file from the model root and builds GPU meshes for
    /// every node, in traversal order.
    ///
    /// Returns the new model's id, or `0` if the file failed to import.
    /// Per-mesh buffer failures and per-material texture failures are
    /// logged and degrade the affected record instead of failing the
    /// model.
    pub fn load_model(&mut self, path: &str) -> u32 {
        let resolved = resolve_asset_path(&self.roots.models, path);
        log::info!("Loading {}", resolved.display());

        let scene = match importer::import_scene(&resolved) {
            Ok(scene) => scene,
            Err(err) => {
                log::error!("Failed to load {}: {err}", resolved.display());
                return 0;
            }
        };

        let mut meshes = Vec::new();
        for imported in assembler::flatten_nodes(&scene.roots) {
            meshes.push(self.process_mesh(imported, &scene.materials));
        }

        let resolved = resolved.to_string_lossy().into_owned();
        log::info!("{resolved} loaded");
        self.models.insert_with(|id| Model {
            id,
            path: resolved,
            meshes,
        })
    }

    /// Id of the cached texture loaded under exactly `path`, or `0`.
    ///
    /// Comparison is exact string equality on the recorded path, with no
    /// normalization. Earliest-loaded wins if duplicates exist.
    #[must_use]
    pub fn find_texture_by_path(&self, path: &str) -> u32 {
        self.textures
            .find_id(|texture| texture.path == path)
            .unwrap_or(0)
    }

    /// Selects which prebuilt rasterizer pipeline subsequent frames use.
    pub fn set_rasterizer_mode(&mut self, mode: RasterizerMode) {
        self.rasterizer_mode = mode;
        match mode {
            RasterizerMode::Solid => log::info!("Rasterizer mode set to solid"),
            RasterizerMode::WireFrame => log::info!("Rasterizer mode set to wireframe"),
        }
    }

    fn active_pipeline(&self) -> &wgpu::RenderPipeline {
        match self.rasterizer_mode {
            RasterizerMode::Solid => &self.solid_pipeline,
            RasterizerMode::WireFrame => &self.wireframe_pipeline,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[must_use]
    pub fn rasterizer_mode(&self) -> RasterizerMode {
        self.rasterizer_mode
    }

    /// Current surface dimensions as configured at construction.
    #[must_use]
    pub fn surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// The device's persistent linear/repeat sampler.
    #[must_use]
    pub fn sampler(&self) -> &wgpu::Sampler {
        &self.sampler
    }

    #[must_use]
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    #[must_use]
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    #[must_use]
    pub fn shader(&self, id: u32) -> Option<&Shader> {
        self.shaders.get(id)
    }

    #[must_use]
    pub fn texture(&self, id: u32) -> Option<&Texture> {
        self.textures.get(id)
    }

    #[must_use]
    pub fn model(&self, id: u32) -> Option<&Model> {
        self.models.get(id)
    }

    #[must_use]
    pub fn shader_count(&self) -> usize {
        self.shaders.len()
    }

    #[must_use]
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    #[must_use]
    pub fn model_count(&self) -> usize {
        self.models.len()
    }
}
