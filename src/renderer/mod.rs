pub mod gpu_context;
pub mod pipelines;

pub use gpu_context::GpuContext;
pub use pipelines::{LineVertex, MeshVertex, SceneUniform};

use anyhow::Result;
use glam::Vec3;
use std::sync::Arc;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::camera::PerspectiveCamera;
use crate::overlay::Overlay;
use crate::scene::{LineSegment, Lighting, WorldMesh};

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Uploaded triangle list
struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    double_sided: bool,
}

/// Depth and (with MSAA) color attachments sized to the surface
struct FrameTargets {
    depth: wgpu::TextureView,
    msaa_color: Option<wgpu::TextureView>,
}

impl FrameTargets {
    fn new(gpu: &GpuContext) -> Self {
        let (width, height) = gpu.size();
        let texture = |label, format, sample_count| {
            gpu.device
                .create_texture(&wgpu::TextureDescriptor {
                    label: Some(label),
                    size: wgpu::Extent3d {
                        width: width.max(1),
                        height: height.max(1),
                        depth_or_array_layers: 1,
                    },
                    mip_level_count: 1,
                    sample_count,
                    dimension: wgpu::TextureDimension::D2,
                    format,
                    usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                    view_formats: &[],
                })
                .create_view(&wgpu::TextureViewDescriptor::default())
        };

        Self {
            depth: texture("Depth Texture", DEPTH_FORMAT, gpu.sample_count),
            msaa_color: (gpu.sample_count > 1)
                .then(|| texture("MSAA Color Texture", gpu.format(), gpu.sample_count)),
        }
    }
}

/// Rasterizes the scene and draws the egui overlay on top
pub struct Renderer {
    gpu: GpuContext,
    targets: FrameTargets,
    mesh_pipeline: wgpu::RenderPipeline,
    double_sided_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    meshes: Vec<GpuMesh>,
    lines: Option<(wgpu::Buffer, u32)>,
    lighting: Lighting,
    clear_color: wgpu::Color,
    egui_renderer: egui_wgpu::Renderer,
    egui_state: egui_winit::State,
    egui_ctx: egui::Context,
}

impl Renderer {
    pub async fn new(window: Arc<Window>, lighting: Lighting, background: Vec3) -> Result<Self> {
        let gpu = GpuContext::new(window.clone()).await?;
        let format = gpu.format();

        let uniform_buffer = gpu.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Scene Uniform Buffer"),
            contents: bytemuck::bytes_of(&SceneUniform::new(glam::Mat4::IDENTITY, &lighting)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = pipelines::create_scene_bind_group_layout(&gpu.device);
        let uniform_bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = gpu.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let samples = gpu.sample_count;
        let mesh_pipeline = pipelines::create_mesh_pipeline(
            &gpu.device,
            &pipeline_layout,
            format,
            samples,
            Some(wgpu::Face::Back),
        );
        let double_sided_pipeline =
            pipelines::create_mesh_pipeline(&gpu.device, &pipeline_layout, format, samples, None);
        let line_pipeline =
            pipelines::create_line_pipeline(&gpu.device, &pipeline_layout, format, samples);

        let targets = FrameTargets::new(&gpu);

        // Initialize egui
        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer =
            egui_wgpu::Renderer::new(&gpu.device, format, egui_wgpu::RendererOptions::default());

        Ok(Self {
            gpu,
            targets,
            mesh_pipeline,
            double_sided_pipeline,
            line_pipeline,
            uniform_buffer,
            uniform_bind_group,
            meshes: Vec::new(),
            lines: None,
            lighting,
            clear_color: wgpu::Color {
                r: background.x as f64,
                g: background.y as f64,
                b: background.z as f64,
                a: 1.0,
            },
            egui_renderer,
            egui_state,
            egui_ctx,
        })
    }

    /// Replace the uploaded model geometry
    pub fn upload_scene(&mut self, meshes: &[WorldMesh]) {
        self.meshes = meshes
            .iter()
            .filter(|mesh| !mesh.indices.is_empty())
            .map(|mesh| {
                let vertices = MeshVertex::from_world_mesh(mesh);
                GpuMesh {
                    vertex_buffer: self.gpu.device.create_buffer_init(
                        &wgpu::util::BufferInitDescriptor {
                            label: Some(&format!("{} Vertices", mesh.name)),
                            contents: bytemuck::cast_slice(&vertices),
                            usage: wgpu::BufferUsages::VERTEX,
                        },
                    ),
                    index_buffer: self.gpu.device.create_buffer_init(
                        &wgpu::util::BufferInitDescriptor {
                            label: Some(&format!("{} Indices", mesh.name)),
                            contents: bytemuck::cast_slice(&mesh.indices),
                            usage: wgpu::BufferUsages::INDEX,
                        },
                    ),
                    index_count: mesh.indices.len() as u32,
                    double_sided: mesh.double_sided,
                }
            })
            .collect();

        let triangles: usize = meshes.iter().map(WorldMesh::triangle_count).sum();
        log::info!("Uploaded {} meshes, {} triangles", self.meshes.len(), triangles);
    }

    pub fn set_lines(&mut self, segments: &[LineSegment]) {
        if segments.is_empty() {
            self.lines = None;
            return;
        }
        let vertices = LineVertex::from_segments(segments);
        let buffer = self.gpu.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Line Vertices"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        self.lines = Some((buffer, vertices.len() as u32));
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if self.gpu.resize(width, height) {
            self.targets = FrameTargets::new(&self.gpu);
        }
    }

    /// Surface `Lost` / `Outdated` recovery
    pub fn reconfigure(&mut self) {
        self.gpu.reconfigure();
    }

    pub fn size(&self) -> (u32, u32) {
        self.gpu.size()
    }

    /// Keep egui's input state current. The overlay is never interactable,
    /// so the result is not used to withhold events from the controls.
    pub fn handle_event(&mut self, window: &Window, event: &winit::event::WindowEvent) {
        let _ = self.egui_state.on_window_event(window, event);
    }

    pub fn render(
        &mut self,
        window: &Window,
        camera: &PerspectiveCamera,
        overlay: &Overlay,
    ) -> std::result::Result<(), wgpu::SurfaceError> {
        let uniform = SceneUniform::new(camera.view_projection(), &self.lighting);
        self.gpu
            .queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniform));

        let output = self.gpu.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        // Scene pass - meshes then axes
        {
            let (color_view, resolve_target) = match &self.targets.msaa_color {
                Some(msaa) => (msaa, Some(&view)),
                None => (&view, None),
            };

            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: color_view,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.targets.depth,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);

            for mesh in &self.meshes {
                let pipeline = if mesh.double_sided {
                    &self.double_sided_pipeline
                } else {
                    &self.mesh_pipeline
                };
                render_pass.set_pipeline(pipeline);
                render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                render_pass
                    .set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }

            if let Some((buffer, count)) = &self.lines {
                render_pass.set_pipeline(&self.line_pipeline);
                render_pass.set_vertex_buffer(0, buffer.slice(..));
                render_pass.draw(0..*count, 0..1);
            }
        }

        // egui pass - labels, tooltip, status
        let raw_input = self.egui_state.take_egui_input(window);
        let pixels_per_point = window.scale_factor() as f32;
        let full_output = self
            .egui_ctx
            .run(raw_input, |ctx| overlay.draw(ctx, pixels_per_point));

        self.egui_state
            .handle_platform_output(window, full_output.platform_output);

        let tris = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.gpu.device, &self.gpu.queue, *id, image_delta);
        }

        let (width, height) = self.gpu.size();
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point: full_output.pixels_per_point,
        };

        let user_buffers = self.egui_renderer.update_buffers(
            &self.gpu.device,
            &self.gpu.queue,
            &mut encoder,
            &tris,
            &screen_descriptor,
        );

        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            self.egui_renderer
                .render(&mut render_pass.forget_lifetime(), &tris, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        self.gpu
            .queue
            .submit(user_buffers.into_iter().chain(std::iter::once(encoder.finish())));
        window.pre_present_notify();
        output.present();
        Ok(())
    }
}
