/// Bind-group layouts shared by the built-in pipelines.
use std::sync::Arc;

use crate::resources::ObjectUniform;

#[derive(Clone)]
pub struct PipelineLayouts {
    /// group(0): camera matrices, one `UNIFORM` buffer at binding 0.
    pub camera: Arc<wgpu::BindGroupLayout>,
    /// group(1): per-draw [`ObjectUniform`] via a dynamic offset.
    pub object: Arc<wgpu::BindGroupLayout>,
    /// group(2) of the mesh pipeline: 2-D texture + sampler.
    pub texture: Arc<wgpu::BindGroupLayout>,
    /// group(1) of the skybox pipeline: cube texture + sampler.
    pub cubemap: Arc<wgpu::BindGroupLayout>,
}

impl PipelineLayouts {
    pub fn new(device: &wgpu::Device) -> Self {
        let camera = Arc::new(device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Layout: Camera"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        }));

        let object = Arc::new(device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Layout: Object (dynamic)"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(ObjectUniform::SIZE),
                },
                count: None,
            }],
        }));

        let texture = Arc::new(sampled_layout(device, "Layout: Texture", wgpu::TextureViewDimension::D2));
        let cubemap = Arc::new(sampled_layout(device, "Layout: Cubemap", wgpu::TextureViewDimension::Cube));

        Self {
            camera,
            object,
            texture,
            cubemap,
        }
    }
}

fn sampled_layout(
    device: &wgpu::Device,
    label: &str,
    view_dimension: wgpu::TextureViewDimension,
) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension,
                    multisampled: false,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
    })
}
