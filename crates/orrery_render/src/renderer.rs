//! The scene renderer.
//!
//! [`Renderer`] owns every GPU resource.  Each frame the runner wraps the
//! swapchain view in a [`FrameTarget`], which implements the core
//! [`SceneRenderer`] seam: `begin_frame` uploads the camera, `draw` records,
//! and `end_frame` encodes one render pass in submission order and submits
//! it.
use std::collections::HashMap;
use std::sync::Arc;

use orrery_assets::{ring_vertices, skybox_vertices, CubemapData, MeshData};
use orrery_core::{BodyId, Color, DrawCommand, Drawable, FrameUniforms, SceneRenderer};

use crate::camera::GpuCamera;
use crate::context::EngineContext;
use crate::geometry::{GpuMesh, GpuPositions};
use crate::pipeline::{PipelineLayouts, ScenePipelines};
use crate::render_target::DepthTarget;
use crate::resources::{texture, ObjectBuffer, ObjectUniform};

/// Line segments per orbit ring.
pub const RING_SEGMENTS: u32 = 128;

/// A recorded command resolved against the resources the renderer has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DrawOp {
    Skybox,
    Body { id: BodyId, slot: usize },
    Ring { slot: usize },
}

/// Resolve `commands` in order, dropping drawables with nothing to draw.
/// Each surviving op reads the object slot equal to its command index.
pub(crate) fn plan(
    commands: &[DrawCommand],
    has_skybox: bool,
    has_mesh: impl Fn(BodyId) -> bool,
) -> Vec<DrawOp> {
    commands
        .iter()
        .enumerate()
        .filter_map(|(slot, cmd)| match cmd.drawable {
            Drawable::Skybox => has_skybox.then_some(DrawOp::Skybox),
            Drawable::Body(id) => has_mesh(id).then_some(DrawOp::Body { id, slot }),
            Drawable::OrbitRing(_) => Some(DrawOp::Ring { slot }),
        })
        .collect()
}

pub struct Renderer {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    pipelines: ScenePipelines,
    camera: GpuCamera,
    objects: ObjectBuffer,
    sampler: wgpu::Sampler,
    meshes: HashMap<BodyId, GpuMesh>,
    ring: GpuPositions,
    sky_cube: GpuPositions,
    skybox: Option<Arc<wgpu::BindGroup>>,
    depth: DepthTarget,
    commands: Vec<DrawCommand>,
    /// Background behind the skybox (visible only when no cubemap is set).
    pub clear_color: wgpu::Color,
}

impl Renderer {
    pub fn new(ctx: &EngineContext, format: wgpu::TextureFormat, width: u32, height: u32) -> Self {
        let device = ctx.device.clone();
        let queue = ctx.queue.clone();

        let layouts = PipelineLayouts::new(&device);
        let pipelines = ScenePipelines::new(&device, format, layouts);
        let camera = GpuCamera::new(&device, &pipelines.layouts.camera);
        let objects = ObjectBuffer::new(&device, &pipelines.layouts.object, 16);
        let sampler = texture::create_sampler(&device, "Scene Sampler");
        let ring = GpuPositions::new(&device, "Orbit Ring", &ring_vertices(RING_SEGMENTS));
        let sky_cube = GpuPositions::new(&device, "Skybox Cube", &skybox_vertices());
        let depth = DepthTarget::new(&device, width, height);

        Self {
            device,
            queue,
            pipelines,
            camera,
            objects,
            sampler,
            meshes: HashMap::new(),
            ring,
            sky_cube,
            skybox: None,
            depth,
            commands: Vec::new(),
            clear_color: to_wgpu(Color::BLACK),
        }
    }

    /// Upload the mesh drawn for `id`.  Empty meshes are skipped, so that
    /// body is simply not drawn.  Returns whether anything was uploaded.
    pub fn register_mesh(&mut self, id: BodyId, label: &str, mesh: &MeshData) -> bool {
        match GpuMesh::new(
            &self.device,
            &self.queue,
            label,
            mesh,
            &self.pipelines.layouts.texture,
            &self.sampler,
        ) {
            Some(gpu) => {
                self.meshes.insert(id, gpu);
                true
            }
            None => {
                log::warn!("mesh for {label} is empty; it will not be drawn");
                self.meshes.remove(&id);
                false
            }
        }
    }

    pub fn set_skybox(&mut self, cube: &CubemapData) {
        let (_texture, view) = texture::upload_cubemap(&self.device, &self.queue, cube);
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Skybox Bind Group"),
            layout: &self.pipelines.layouts.cubemap,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });
        self.skybox = Some(Arc::new(bind_group));
    }

    pub fn set_clear_color(&mut self, color: Color) {
        self.clear_color = to_wgpu(color);
    }

    /// Recreate the depth buffer for a new surface size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.depth.resize(&self.device, width, height);
    }

    /// Wrap a swapchain view for one frame of the scene loop.
    pub fn target<'a>(&'a mut self, view: &'a wgpu::TextureView) -> FrameTarget<'a> {
        FrameTarget { renderer: self, view }
    }

    fn submit(&mut self, view: &wgpu::TextureView) {
        let ops = plan(&self.commands, self.skybox.is_some(), |id| self.meshes.contains_key(&id));

        self.objects
            .ensure_capacity(&self.device, &self.pipelines.layouts.object, self.commands.len());
        for (slot, cmd) in self.commands.iter().enumerate() {
            self.objects
                .write(&self.queue, slot, &ObjectUniform::new(cmd.model, cmd.color));
        }

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Scene Encoder"),
        });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            rpass.set_bind_group(0, &*self.camera.bind_group, &[]);
            for op in &ops {
                match *op {
                    DrawOp::Skybox => {
                        if let Some(sky) = &self.skybox {
                            rpass.set_pipeline(&self.pipelines.skybox);
                            rpass.set_bind_group(1, &**sky, &[]);
                            rpass.set_vertex_buffer(0, self.sky_cube.vertex_buffer.slice(..));
                            rpass.draw(0..self.sky_cube.vertex_count, 0..1);
                        }
                    }
                    DrawOp::Body { id, slot } => {
                        if let Some(mesh) = self.meshes.get(&id) {
                            rpass.set_pipeline(&self.pipelines.mesh);
                            rpass.set_bind_group(1, &*self.objects.bind_group, &[self.objects.offset(slot)]);
                            rpass.set_bind_group(2, &*mesh.texture_bind_group, &[]);
                            rpass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                            rpass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                            rpass.draw_indexed(0..mesh.index_count, 0, 0..1);
                        }
                    }
                    DrawOp::Ring { slot } => {
                        rpass.set_pipeline(&self.pipelines.ring);
                        rpass.set_bind_group(1, &*self.objects.bind_group, &[self.objects.offset(slot)]);
                        rpass.set_vertex_buffer(0, self.ring.vertex_buffer.slice(..));
                        rpass.draw(0..self.ring.vertex_count, 0..1);
                    }
                }
            }
        }
        self.queue.submit(Some(encoder.finish()));
    }
}

/// One frame's [`SceneRenderer`]: a renderer bound to a swapchain view.
pub struct FrameTarget<'a> {
    renderer: &'a mut Renderer,
    view: &'a wgpu::TextureView,
}

impl SceneRenderer for FrameTarget<'_> {
    fn begin_frame(&mut self, uniforms: &FrameUniforms) {
        let r = &mut *self.renderer;
        r.camera.sync(&r.queue, uniforms);
        r.commands.clear();
    }

    fn draw(&mut self, command: &DrawCommand) {
        self.renderer.commands.push(*command);
    }

    fn end_frame(&mut self) {
        self.renderer.submit(self.view);
    }
}

fn to_wgpu(color: Color) -> wgpu::Color {
    wgpu::Color {
        r: f64::from(color.r),
        g: f64::from(color.g),
        b: f64::from(color.b),
        a: f64::from(color.a),
    }
}
