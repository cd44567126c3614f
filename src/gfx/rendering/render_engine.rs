//! WGPU-based rendering engine
//!
//! Owns the surface, device and queue, the global uniform block, and the
//! two scene pipelines (colored and textured vertices).

use std::sync::Arc;

use crate::{
    error::RenderError,
    gfx::{
        geometry::VertexFormat,
        resources::{
            global_bindings::{GlobalBindings, GlobalUBO, UniformBinder},
            material::MaterialLayout,
            texture_resource::{TextureRegistry, TextureResource},
        },
        scene::{
            object::{DrawObject, ModelLayout},
            scene::Scene,
        },
    },
};

use super::pipeline_manager::{PipelineConfig, PipelineManager};

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.2,
    g: 0.3,
    b: 0.3,
    a: 1.0,
};

/// Pipeline drawing meshes of `format`.
pub fn pipeline_name(format: VertexFormat) -> &'static str {
    match format {
        VertexFormat::Colored => "Colored",
        VertexFormat::Textured => "Textured",
    }
}

fn vertex_entry(format: VertexFormat) -> &'static str {
    match format {
        VertexFormat::Colored => "vs_colored",
        VertexFormat::Textured => "vs_textured",
    }
}

fn present_mode(vsync: bool) -> wgpu::PresentMode {
    if vsync {
        wgpu::PresentMode::AutoVsync
    } else {
        wgpu::PresentMode::AutoNoVsync
    }
}

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    pub pipeline_manager: PipelineManager,
    global_ubo: GlobalUBO,
    global_bindings: GlobalBindings,
    model_layout: ModelLayout,
    material_layout: MaterialLayout,
    textures: TextureRegistry,
    binder: UniformBinder,
}

impl RenderEngine {
    /// Creates a new render engine for the given window
    ///
    /// # Arguments
    /// * `window` - Window surface target for rendering
    /// * `width` - Initial surface width in pixels
    /// * `height` - Initial surface height in pixels
    /// * `vsync` - Present with vsync
    ///
    /// # Errors
    /// Any failure to create the surface, adapter or device, and shader or
    /// pipeline compilation failures.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        vsync: bool,
    ) -> Result<RenderEngine, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("using adapter {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 4096,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or(RenderError::NoSurfaceFormat)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: present_mode(vsync),
            alpha_mode: surface_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::info!("surface {width}x{height}, format {format:?}, {:?}", config.present_mode);

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "depth_texture");

        let global_ubo = GlobalUBO::new(&device);
        let global_bindings = GlobalBindings::new(&device, &global_ubo);
        let model_layout = ModelLayout::new(&device);
        let material_layout = MaterialLayout::new(&device);
        let textures = TextureRegistry::new(&device, &queue);

        let device_handle: Arc<wgpu::Device> = device.into();
        let queue_handle: Arc<wgpu::Queue> = queue.into();
        let mut pipeline_manager = PipelineManager::new(device_handle.clone());

        pipeline_manager.load_shader("scene", include_str!("scene.wgsl"))?;

        for vertex_format in [VertexFormat::Colored, VertexFormat::Textured] {
            let name = pipeline_name(vertex_format);
            pipeline_manager.register_pipeline(
                name,
                PipelineConfig::default()
                    .with_label(name)
                    .with_shader("scene")
                    .with_vertex(vertex_entry(vertex_format), vertex_format)
                    .with_depth_format(TextureResource::DEPTH_FORMAT)
                    .with_color_format(format)
                    // Reference scene is drawn without face culling
                    .with_cull_mode(None)
                    .with_bind_group_layouts(vec![
                        global_bindings.bind_group_layout().clone(),
                        model_layout.layout().clone(),
                        material_layout.layout().clone(),
                    ]),
            );
        }
        pipeline_manager.create_all_pipelines()?;
        log::debug!("pipelines ready: {:?}", pipeline_manager.get_stats());

        Ok(RenderEngine {
            device: device_handle,
            config,
            surface,
            queue: queue_handle,
            depth_texture,
            pipeline_manager,
            global_ubo,
            global_bindings,
            model_layout,
            material_layout,
            textures,
            binder: UniformBinder::new(),
        })
    }

    /// Uploads meshes, textures and per-object bindings for `scene`.
    pub fn prepare_scene(&mut self, scene: &mut Scene) -> Result<(), RenderError> {
        scene.init_gpu_resources(
            &self.device,
            &self.queue,
            &self.model_layout,
            &self.material_layout,
            &mut self.textures,
        )
    }

    /// Advances `scene` by `dt` seconds and uploads this frame's uniforms.
    pub fn update(&mut self, scene: &mut Scene, dt: f32) {
        scene.update(dt, &mut self.binder);
        self.binder.flush(&mut self.global_ubo, &self.queue);
        for object in &mut scene.objects {
            object.update_transform(&self.queue);
        }
    }

    /// Draws one frame. A lost or outdated surface is reconfigured and the
    /// frame skipped; running out of memory is an error.
    pub fn render_frame(&mut self, scene: &Scene) -> Result<(), RenderError> {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("timed out acquiring frame, skipping");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);

            for vertex_format in [VertexFormat::Colored, VertexFormat::Textured] {
                let Some(pipeline) = self.pipeline_manager.get_pipeline(pipeline_name(vertex_format))
                else {
                    continue;
                };
                render_pass.set_pipeline(pipeline);

                for object in scene.objects.iter().filter(|o| o.format() == vertex_format) {
                    render_pass.draw_object(object);
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(())
    }

    /// Reconfigures the surface and depth buffer. Zero sizes (minimized
    /// window) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);

        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_per_vertex_format() {
        assert_eq!(pipeline_name(VertexFormat::Colored), "Colored");
        assert_eq!(pipeline_name(VertexFormat::Textured), "Textured");
        assert_eq!(vertex_entry(VertexFormat::Textured), "vs_textured");
        assert_eq!(present_mode(true), wgpu::PresentMode::AutoVsync);
        assert_eq!(present_mode(false), wgpu::PresentMode::AutoNoVsync);
    }
}
