/// GPU-side camera resources: the uniform buffer and its group(0) bind group.
use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use orrery_core::FrameUniforms;

use crate::resources::buffer;

/// Matches `struct Camera` in the WGSL shaders.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    /// Projection times the translation-free view, for the skybox.
    pub sky_view_proj: [[f32; 4]; 4],
    pub eye: [f32; 4],
}

impl CameraUniform {
    pub fn from_frame(frame: &FrameUniforms) -> Self {
        Self {
            view_proj: (frame.projection * frame.view).to_cols_array_2d(),
            sky_view_proj: (frame.projection * frame.sky_view).to_cols_array_2d(),
            eye: frame.camera_position.extend(1.0).to_array(),
        }
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        let identity = glam::Mat4::IDENTITY.to_cols_array_2d();
        Self {
            view_proj: identity,
            sky_view_proj: identity,
            eye: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

pub struct GpuCamera {
    pub uniform: CameraUniform,
    pub buffer: Arc<wgpu::Buffer>,
    pub bind_group: Arc<wgpu::BindGroup>,
}

impl GpuCamera {
    pub fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout) -> Self {
        let uniform = CameraUniform::default();
        let buf = buffer::create_uniform(device, "Camera Uniform Buffer", &uniform);
        let bind_group = Arc::new(device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buf.as_entire_binding(),
            }],
        }));
        Self {
            uniform,
            buffer: buf,
            bind_group,
        }
    }

    /// Upload this frame's matrices.  Call before encoding any pass.
    pub fn sync(&mut self, queue: &wgpu::Queue, frame: &FrameUniforms) {
        self.uniform = CameraUniform::from_frame(frame);
        buffer::update_uniform(queue, &self.buffer, &self.uniform);
    }
}
