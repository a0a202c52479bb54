/// Buffer constructors.  Everything the renderer allocates up front is
/// immutable except uniforms, which are rewritten each frame.
use std::sync::Arc;

use bytemuck::Pod;
use wgpu::util::DeviceExt;

fn init(device: &wgpu::Device, label: &str, contents: &[u8], usage: wgpu::BufferUsages) -> Arc<wgpu::Buffer> {
    Arc::new(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents,
        usage,
    }))
}

/// `UNIFORM | COPY_DST`, so [`update_uniform`] can overwrite it.
pub fn create_uniform<T: Pod>(device: &wgpu::Device, label: &str, data: &T) -> Arc<wgpu::Buffer> {
    let usage = wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST;
    init(device, label, bytemuck::bytes_of(data), usage)
}

pub fn create_vertex<T: Pod>(device: &wgpu::Device, label: &str, vertices: &[T]) -> Arc<wgpu::Buffer> {
    init(device, label, bytemuck::cast_slice(vertices), wgpu::BufferUsages::VERTEX)
}

/// Indices are always `u32`; draw with `IndexFormat::Uint32`.
pub fn create_index(device: &wgpu::Device, label: &str, indices: &[u32]) -> Arc<wgpu::Buffer> {
    init(device, label, bytemuck::cast_slice(indices), wgpu::BufferUsages::INDEX)
}

pub fn update_uniform<T: Pod>(queue: &wgpu::Queue, buffer: &wgpu::Buffer, data: &T) {
    queue.write_buffer(buffer, 0, bytemuck::bytes_of(data));
}
