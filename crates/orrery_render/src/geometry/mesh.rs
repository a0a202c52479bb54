/// GPU-resident geometry.
use std::sync::Arc;

use orrery_assets::MeshData;

use crate::geometry::PositionVertex;
use crate::resources::{buffer, texture};

/// Indexed, textured triangle mesh with its group(2) texture bind group.
pub struct GpuMesh {
    pub vertex_buffer: Arc<wgpu::Buffer>,
    pub index_buffer: Arc<wgpu::Buffer>,
    pub index_count: u32,
    pub texture_bind_group: Arc<wgpu::BindGroup>,
}

impl GpuMesh {
    /// Upload `mesh` and its base-colour texture (white when it has none).
    /// Returns `None` for an empty mesh.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        mesh: &MeshData,
        texture_layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
    ) -> Option<Self> {
        if mesh.is_empty() {
            return None;
        }
        let vertex_buffer = buffer::create_vertex(device, label, &mesh.vertices);
        let index_buffer = buffer::create_index(device, label, &mesh.indices);
        let (_texture, view) = texture::upload_2d(device, queue, label, &mesh.texture_or_white());
        let texture_bind_group = Arc::new(device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        }));
        Some(Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
            texture_bind_group,
        })
    }
}

/// Non-indexed position-only geometry: the ring line strip and the skybox
/// cube.
pub struct GpuPositions {
    pub vertex_buffer: Arc<wgpu::Buffer>,
    pub vertex_count: u32,
}

impl GpuPositions {
    pub fn new(device: &wgpu::Device, label: &str, points: &[PositionVertex]) -> Self {
        Self {
            vertex_buffer: buffer::create_vertex(device, label, points),
            vertex_count: points.len() as u32,
        }
    }
}
