pub mod layout;

pub use layout::PipelineLayouts;

use std::sync::Arc;

use crate::geometry::{mesh_vertex_layout, position_layout};
use crate::render_target::DepthTarget;

/// The three render pipelines a frame switches between.
#[derive(Clone)]
pub struct ScenePipelines {
    /// Textured bodies: camera, object, texture.
    pub mesh: Arc<wgpu::RenderPipeline>,
    /// Orbit rings as line strips: camera, object.
    pub ring: Arc<wgpu::RenderPipeline>,
    /// Cubemap background at the far plane, no depth writes: camera, cubemap.
    pub skybox: Arc<wgpu::RenderPipeline>,
    pub layouts: PipelineLayouts,
}

/// Per-pipeline knobs; everything else is shared.
struct PipelineDesc<'a> {
    label: &'a str,
    shader: wgpu::ShaderModuleDescriptor<'a>,
    bind_groups: &'a [&'a wgpu::BindGroupLayout],
    vertex: wgpu::VertexBufferLayout<'a>,
    topology: wgpu::PrimitiveTopology,
    cull_mode: Option<wgpu::Face>,
    depth_write: bool,
    depth_compare: wgpu::CompareFunction,
}

impl ScenePipelines {
    pub fn new(device: &wgpu::Device, target_format: wgpu::TextureFormat, layouts: PipelineLayouts) -> Self {
        let mesh = build(
            device,
            target_format,
            PipelineDesc {
                label: "Mesh Pipeline",
                shader: wgpu::include_wgsl!("../../../../assets/shaders/mesh.wgsl"),
                bind_groups: &[&*layouts.camera, &*layouts.object, &*layouts.texture],
                vertex: mesh_vertex_layout(),
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
                depth_write: true,
                depth_compare: wgpu::CompareFunction::Less,
            },
        );
        let ring = build(
            device,
            target_format,
            PipelineDesc {
                label: "Ring Pipeline",
                shader: wgpu::include_wgsl!("../../../../assets/shaders/ring.wgsl"),
                bind_groups: &[&*layouts.camera, &*layouts.object],
                vertex: position_layout(),
                topology: wgpu::PrimitiveTopology::LineStrip,
                cull_mode: None,
                depth_write: true,
                depth_compare: wgpu::CompareFunction::Less,
            },
        );
        // The skybox writes z = w, so it must pass at the cleared depth of 1.0.
        let skybox = build(
            device,
            target_format,
            PipelineDesc {
                label: "Skybox Pipeline",
                shader: wgpu::include_wgsl!("../../../../assets/shaders/skybox.wgsl"),
                bind_groups: &[&*layouts.camera, &*layouts.cubemap],
                vertex: position_layout(),
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                depth_write: false,
                depth_compare: wgpu::CompareFunction::LessEqual,
            },
        );

        Self {
            mesh,
            ring,
            skybox,
            layouts,
        }
    }
}

fn build(
    device: &wgpu::Device,
    target_format: wgpu::TextureFormat,
    desc: PipelineDesc<'_>,
) -> Arc<wgpu::RenderPipeline> {
    let shader = device.create_shader_module(desc.shader);
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(desc.label),
        bind_group_layouts: desc.bind_groups,
        push_constant_ranges: &[],
    });

    Arc::new(device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(desc.label),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[desc.vertex],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: target_format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: desc.topology,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: desc.cull_mode,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DepthTarget::FORMAT,
            depth_write_enabled: desc.depth_write,
            depth_compare: desc.depth_compare,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    }))
}
