//! # `renderer.rs` - Renderer Module
//!
//! The `renderer.rs` module contains the [`Renderer`], which turns a [`FrameData`] snapshot of the
//! scene into pixels, and then draws the `egui` overlay on top.
//!
//! ## Frame Structure
//!
//! Each call to [`Renderer::render_frame`] records two passes into one command buffer:
//!
//! 1. **Shadow pass**: depth-only, rendered from the spotlight's shadow camera into a square
//!    `Depth32Float` map. Only meshes flagged `cast_shadow` are drawn.
//! 2. **Main pass**: cleared to the scene's background colour. Lit meshes are drawn with Lambert
//!    shading and sample the shadow map when they are flagged `receive_shadow`. Then come the
//!    unlit helper lines, and finally the GUI paint jobs.
//!
//! ## GPU Resources
//!
//! Geometry is uploaded once, when the renderer is created, from the meshes and helpers present
//! in the [`Scene`]. After that only uniforms change: one frame-wide block (camera and light) and
//! one block per scene node (model matrix, colour, flags).
//!
//! ## Error Handling
//!
//! Construction fails with [`crate::Error`] when no graphics context is available. At render
//! time a lost or outdated surface is reconfigured and the frame is skipped; any other surface
//! error is logged and the frame is skipped.

use crate::error::Result;
use crate::frame_data::FrameData;
use crate::gpu::Gpu;
use crate::scene::{NodeId, Scene};
use crate::uniform_binding::UniformBinding;
use crate::uniform_buffer::{FrameUniforms, ObjectUniforms};
use crate::vertex::Vertex;

/// The WGSL source for every pipeline used by the renderer.
///
/// Entry points:
/// - `vertex_main` / `fragment_main`: lit, shadow-receiving meshes.
/// - `shadow_main`: depth-only vertex stage for the shadow pass.
/// - `unlit_vertex_main` / `unlit_fragment_main`: flat-coloured helper lines.
pub const SHADER_SOURCE: &str = include_str!("shader.wgsl");

/// How a node is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DrawKind {
    Lit { cast_shadow: bool },
    Lines,
}

/// GPU-side copy of one scene node.
struct GpuNode {
    id: NodeId,
    kind: DrawKind,
    vertex_buffer: wgpu::Buffer,
    index_buffer: Option<wgpu::Buffer>,
    element_count: u32,
    uniform: UniformBinding<ObjectUniforms>,
}

impl GpuNode {
    fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_bind_group(1, &self.uniform.bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        match &self.index_buffer {
            Some(index_buffer) => {
                render_pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..self.element_count, 0, 0..1);
            }
            None => render_pass.draw(0..self.element_count, 0..1),
        }
    }
}

/// The spotlight's depth map and the bind group that exposes it to the main pass.
struct ShadowMap {
    view: wgpu::TextureView,
    bind_group: wgpu::BindGroup,
}

struct Pipelines {
    lit: wgpu::RenderPipeline,
    lines: wgpu::RenderPipeline,
    shadow: wgpu::RenderPipeline,
}

/// Draws the scene and the GUI to the window surface.
pub struct Renderer {
    /// Device, queue and surface.
    gpu: Gpu,

    /// Depth buffer for the main pass; recreated on resize.
    depth_texture_view: wgpu::TextureView,

    /// Renders `egui` paint jobs inside the main pass.
    egui_renderer: egui_wgpu::Renderer,

    /// Camera and light uniforms shared by every draw.
    frame_uniform: UniformBinding<FrameUniforms>,

    shadow_map: ShadowMap,
    pipelines: Pipelines,
    nodes: Vec<GpuNode>,
}

impl Renderer {
    /// Depth format used by the main pass, the shadow map and the GUI pipeline.
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Side length of the shadow map when the scene has no spotlight to ask.
    const DEFAULT_SHADOW_MAP_SIZE: u32 = 512;

    /// Creates the GPU context for `window` and uploads the geometry of `scene`.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        scene: &Scene,
    ) -> Result<Self> {
        let gpu = Gpu::new_async(window, width, height).await?;
        let depth_texture_view = gpu.create_depth_texture(
            "Depth Texture",
            gpu.surface_config.width,
            gpu.surface_config.height,
        );

        let egui_renderer = egui_wgpu::Renderer::new(
            &gpu.device,
            gpu.surface_config.format,
            Some(Self::DEPTH_FORMAT),
            1,
            false,
        );

        let frame_layout = UniformBinding::<FrameUniforms>::layout(
            &gpu.device,
            "frame_bind_group_layout",
            wgpu::ShaderStages::VERTEX_FRAGMENT,
        );
        let object_layout = UniformBinding::<ObjectUniforms>::layout(
            &gpu.device,
            "object_bind_group_layout",
            wgpu::ShaderStages::VERTEX_FRAGMENT,
        );
        let shadow_layout = Self::create_shadow_layout(&gpu.device);

        let frame_uniform = UniformBinding::new(&gpu.device, &frame_layout, "Frame Uniforms");

        let shadow_map_size = scene
            .spot_light()
            .map_or(Self::DEFAULT_SHADOW_MAP_SIZE, |light| light.shadow.map_size);
        let shadow_map = Self::create_shadow_map(&gpu, &shadow_layout, shadow_map_size);

        let pipelines = Self::create_pipelines(
            &gpu.device,
            gpu.surface_format,
            &frame_layout,
            &object_layout,
            &shadow_layout,
        );

        let nodes = Self::upload_scene(&gpu.device, &object_layout, scene);
        log::info!(
            "Renderer ready: {} GPU nodes, {}x{} shadow map",
            nodes.len(),
            shadow_map_size,
            shadow_map_size
        );

        Ok(Self {
            gpu,
            depth_texture_view,
            egui_renderer,
            frame_uniform,
            shadow_map,
            pipelines,
            nodes,
        })
    }

    /// Current width / height of the surface.
    pub fn aspect_ratio(&self) -> f32 {
        self.gpu.aspect_ratio()
    }

    /// Resizes the surface and the depth buffer. Zero-sized requests are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.gpu.resize(width, height) {
            self.depth_texture_view = self.gpu.create_depth_texture("Depth Texture", width, height);
        }
    }

    /// Renders one frame: shadow pass, scene, helpers, then the GUI.
    pub fn render_frame(
        &mut self,
        frame: &FrameData,
        screen_descriptor: egui_wgpu::ScreenDescriptor,
        paint_jobs: Vec<egui::epaint::ClippedPrimitive>,
        textures_delta: egui::TexturesDelta,
    ) {
        self.frame_uniform.update_buffer(&self.gpu.queue, &frame.frame);
        for (id, uniforms) in &frame.objects {
            if let Some(node) = self.nodes.iter().find(|node| node.id == *id) {
                node.uniform.update_buffer(&self.gpu.queue, uniforms);
            }
        }

        for (id, image_delta) in &textures_delta.set {
            self.egui_renderer
                .update_texture(&self.gpu.device, &self.gpu.queue, *id, image_delta);
        }

        for id in &textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        let surface_texture = match self.gpu.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated, reconfiguring");
                self.gpu.reconfigure();
                return;
            }
            Err(error) => {
                log::error!("Failed to acquire surface texture: {error}");
                return;
            }
        };

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        let gui_command_buffers = self.egui_renderer.update_buffers(
            &self.gpu.device,
            &self.gpu.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );

        let surface_texture_view =
            surface_texture
                .texture
                .create_view(&wgpu::TextureViewDescriptor {
                    label: wgpu::Label::default(),
                    aspect: wgpu::TextureAspect::default(),
                    format: Some(self.gpu.surface_format),
                    dimension: None,
                    base_mip_level: 0,
                    mip_level_count: None,
                    base_array_layer: 0,
                    array_layer_count: None,
                    usage: None,
                });

        let shadows_enabled = frame.frame.shadow[0] > 0.0;
        if shadows_enabled {
            encoder.insert_debug_marker("Render shadow map");
            let mut shadow_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Shadow Pass"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.shadow_map.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            shadow_pass.set_pipeline(&self.pipelines.shadow);
            shadow_pass.set_bind_group(0, &self.frame_uniform.bind_group, &[]);
            for node in &self.nodes {
                if node.kind == (DrawKind::Lit { cast_shadow: true }) {
                    node.draw(&mut shadow_pass);
                }
            }
        }

        encoder.insert_debug_marker("Render scene");
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(frame.clear_color.into()),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.pipelines.lit);
            render_pass.set_bind_group(0, &self.frame_uniform.bind_group, &[]);
            render_pass.set_bind_group(2, &self.shadow_map.bind_group, &[]);
            for node in self.nodes.iter().filter(|node| matches!(node.kind, DrawKind::Lit { .. })) {
                node.draw(&mut render_pass);
            }

            render_pass.set_pipeline(&self.pipelines.lines);
            render_pass.set_bind_group(0, &self.frame_uniform.bind_group, &[]);
            for node in self.nodes.iter().filter(|node| node.kind == DrawKind::Lines) {
                node.draw(&mut render_pass);
            }

            self.egui_renderer.render(
                &mut render_pass.forget_lifetime(),
                &paint_jobs,
                &screen_descriptor,
            );
        }

        self.gpu.queue.submit(
            gui_command_buffers
                .into_iter()
                .chain(std::iter::once(encoder.finish())),
        );
        surface_texture.present();
    }

    /// Builds vertex/index buffers and a uniform binding for each drawable node.
    fn upload_scene(
        device: &wgpu::Device,
        object_layout: &wgpu::BindGroupLayout,
        scene: &Scene,
    ) -> Vec<GpuNode> {
        use wgpu::util::DeviceExt;

        let meshes = scene.meshes().map(|(id, mesh)| {
            let data = mesh.geometry.tessellate();
            let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(mesh.name),
                contents: bytemuck::cast_slice(&data.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
            let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(mesh.name),
                contents: bytemuck::cast_slice(&data.indices),
                usage: wgpu::BufferUsages::INDEX,
            });
            GpuNode {
                id,
                kind: DrawKind::Lit {
                    cast_shadow: mesh.cast_shadow,
                },
                vertex_buffer,
                index_buffer: Some(index_buffer),
                element_count: data.indices.len() as u32,
                uniform: UniformBinding::new(device, object_layout, mesh.name),
            }
        });

        let helpers = scene.helpers().map(|(id, helper)| {
            let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Spotlight Helper"),
                contents: bytemuck::cast_slice(helper.vertices()),
                usage: wgpu::BufferUsages::VERTEX,
            });
            GpuNode {
                id,
                kind: DrawKind::Lines,
                vertex_buffer,
                index_buffer: None,
                element_count: helper.vertices().len() as u32,
                uniform: UniformBinding::new(device, object_layout, "Spotlight Helper"),
            }
        });

        meshes.chain(helpers).collect()
    }

    fn create_shadow_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("shadow_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Depth,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Comparison),
                    count: None,
                },
            ],
        })
    }

    fn create_shadow_map(gpu: &Gpu, layout: &wgpu::BindGroupLayout, size: u32) -> ShadowMap {
        let view = gpu.create_depth_texture("Shadow Map", size, size);

        let sampler = gpu.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Shadow Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            compare: Some(wgpu::CompareFunction::LessEqual),
            ..Default::default()
        });

        let bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("shadow_bind_group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        ShadowMap { view, bind_group }
    }

    fn create_pipelines(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        frame_layout: &wgpu::BindGroupLayout,
        object_layout: &wgpu::BindGroupLayout,
        shadow_layout: &wgpu::BindGroupLayout,
    ) -> Pipelines {
        let shader_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(std::borrow::Cow::Borrowed(SHADER_SOURCE)),
        });

        let lit_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Lit Pipeline Layout"),
            bind_group_layouts: &[frame_layout, object_layout, shadow_layout],
            push_constant_ranges: &[],
        });

        let unshadowed_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Unshadowed Pipeline Layout"),
            bind_group_layouts: &[frame_layout, object_layout],
            push_constant_ranges: &[],
        });

        let color_target = [Some(wgpu::ColorTargetState {
            format: surface_format,
            blend: Some(wgpu::BlendState::REPLACE),
            write_mask: wgpu::ColorWrites::ALL,
        })];

        let lit = Self::create_pipeline(
            device,
            &PipelineSpec {
                label: "Lit Pipeline",
                layout: &lit_layout,
                module: &shader_module,
                vertex_entry: "vertex_main",
                fragment: Some(("fragment_main", &color_target[..])),
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
                depth_bias: wgpu::DepthBiasState::default(),
            },
        );

        let lines = Self::create_pipeline(
            device,
            &PipelineSpec {
                label: "Helper Line Pipeline",
                layout: &unshadowed_layout,
                module: &shader_module,
                vertex_entry: "unlit_vertex_main",
                fragment: Some(("unlit_fragment_main", &color_target[..])),
                topology: wgpu::PrimitiveTopology::LineList,
                cull_mode: None,
                depth_bias: wgpu::DepthBiasState::default(),
            },
        );

        let shadow = Self::create_pipeline(
            device,
            &PipelineSpec {
                label: "Shadow Pipeline",
                layout: &unshadowed_layout,
                module: &shader_module,
                vertex_entry: "shadow_main",
                fragment: None,
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                depth_bias: wgpu::DepthBiasState {
                    constant: 2,
                    slope_scale: 2.0,
                    clamp: 0.0,
                },
            },
        );

        Pipelines { lit, lines, shadow }
    }

    fn create_pipeline(device: &wgpu::Device, spec: &PipelineSpec<'_>) -> wgpu::RenderPipeline {
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(spec.label),
            layout: Some(spec.layout),
            vertex: wgpu::VertexState {
                module: spec.module,
                entry_point: Some(spec.vertex_entry),
                buffers: &[Vertex::description()],
                compilation_options: Default::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: spec.topology,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: spec.cull_mode,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
                unclipped_depth: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: Self::DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: spec.depth_bias,
            }),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            fragment: spec
                .fragment
                .map(|(entry_point, targets)| wgpu::FragmentState {
                    module: spec.module,
                    entry_point: Some(entry_point),
                    targets,
                    compilation_options: Default::default(),
                }),
            multiview: None,
            cache: None,
        })
    }
}

/// The parts that differ between the renderer's pipelines.
struct PipelineSpec<'a> {
    label: &'a str,
    layout: &'a wgpu::PipelineLayout,
    module: &'a wgpu::ShaderModule,
    vertex_entry: &'a str,
    fragment: Option<(&'a str, &'a [Option<wgpu::ColorTargetState>])>,
    topology: wgpu::PrimitiveTopology,
    cull_mode: Option<wgpu::Face>,
    depth_bias: wgpu::DepthBiasState,
}
