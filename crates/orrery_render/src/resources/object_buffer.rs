/// Dynamic uniform buffer holding one [`ObjectUniform`] per draw.
///
/// All per-draw data lives in one buffer bound once at group(1); each draw
/// only supplies a byte offset:
///
/// ```text
/// rpass.set_bind_group(1, &objects.bind_group, &[objects.offset(slot)]);
/// ```
///
/// Each slot is padded to the device's `min_uniform_buffer_offset_alignment`
/// (256 bytes on most desktop GPUs).
use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use orrery_core::Color;
use wgpu::util::DeviceExt;

/// Per-draw uniform: model matrix and flat colour.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

impl ObjectUniform {
    pub const SIZE: u64 = std::mem::size_of::<Self>() as u64;

    pub fn new(model: Mat4, color: Color) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color: color.to_array(),
        }
    }
}

impl Default for ObjectUniform {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY, Color::WHITE)
    }
}

pub struct ObjectBuffer {
    pub buffer: wgpu::Buffer,
    pub bind_group: Arc<wgpu::BindGroup>,
    /// Byte stride between slots (≥ `ObjectUniform::SIZE`, multiple of the
    /// alignment).
    pub stride: u32,
    capacity: usize,
}

impl ObjectBuffer {
    /// `layout` must be the object layout with `has_dynamic_offset: true`.
    pub fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, initial_capacity: usize) -> Self {
        let alignment = device.limits().min_uniform_buffer_offset_alignment;
        let stride = align_up(ObjectUniform::SIZE as u32, alignment);
        let capacity = initial_capacity.max(1);
        let (buffer, bind_group) = allocate(device, layout, capacity, stride);
        Self {
            buffer,
            bind_group,
            stride,
            capacity,
        }
    }

    #[inline]
    pub fn offset(&self, slot: usize) -> u32 {
        (slot as u32).wrapping_mul(self.stride)
    }

    pub fn write(&self, queue: &wgpu::Queue, slot: usize, data: &ObjectUniform) {
        debug_assert!(slot < self.capacity, "object slot {slot} out of range");
        queue.write_buffer(&self.buffer, u64::from(self.offset(slot)), bytemuck::bytes_of(data));
    }

    /// Reallocate to the next power of two holding `needed` slots.  The bind
    /// group is replaced too, so call this before writing a frame's slots.
    pub fn ensure_capacity(&mut self, device: &wgpu::Device, layout: &wgpu::BindGroupLayout, needed: usize) {
        if needed <= self.capacity {
            return;
        }
        let capacity = needed.next_power_of_two();
        log::debug!("object buffer: {} -> {capacity} slots", self.capacity);
        (self.buffer, self.bind_group) = allocate(device, layout, capacity, self.stride);
        self.capacity = capacity;
    }
}

/// A zero-filled buffer of `capacity` slots, every slot holding the
/// default uniform, and the bind group viewing one slot of it.
fn allocate(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    capacity: usize,
    stride: u32,
) -> (wgpu::Buffer, Arc<wgpu::BindGroup>) {
    let blank = ObjectUniform::default();
    let mut contents = vec![0u8; capacity * stride as usize];
    for slot in contents.chunks_exact_mut(stride as usize) {
        slot[..ObjectUniform::SIZE as usize].copy_from_slice(bytemuck::bytes_of(&blank));
    }
    let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Object Uniforms"),
        contents: &contents,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Object Uniforms BindGroup"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer: &buffer,
                offset: 0,
                size: wgpu::BufferSize::new(ObjectUniform::SIZE),
            }),
        }],
    });
    (buffer, Arc::new(bind_group))
}

/// `value` rounded up to a multiple of the power-of-two `alignment`.
fn align_up(value: u32, alignment: u32) -> u32 {
    value.div_ceil(alignment) * alignment
}
