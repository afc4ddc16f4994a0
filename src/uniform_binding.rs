//! # Uniform Binding Module
//!
//! This module defines the `UniformBinding` struct, which ties a single uniform buffer to the bind
//! group that exposes it to the shaders. It is generic over the uniform layout, so the same code
//! serves the per-frame block ([`crate::uniform_buffer::FrameUniforms`]) and the per-object blocks
//! ([`crate::uniform_buffer::ObjectUniforms`]).
//!
//! ## Overview
//!
//! The `UniformBinding` struct encapsulates:
//!
//! - **Uniform buffer**: a GPU buffer sized for exactly one `T`, writable from the CPU.
//! - **Bind group**: binds the buffer at binding 0 of the given layout.
//!
//! Bind group *layouts* are shared: every object binding uses the same layout, created once with
//! [`UniformBinding::layout`], so one pipeline can draw all meshes by swapping bind groups.
//!
//! ## Example
//!
//! ```ignore
//! let visibility = wgpu::ShaderStages::VERTEX_FRAGMENT;
//! let layout = UniformBinding::<ObjectUniforms>::layout(&device, "object", visibility);
//! let binding = UniformBinding::<ObjectUniforms>::new(&device, &layout, "cube");
//! binding.update_buffer(&queue, &uniforms);
//! render_pass.set_bind_group(1, &binding.bind_group, &[]);
//! ```

use std::marker::PhantomData;

/// A uniform buffer holding one `T` plus the bind group exposing it.
pub struct UniformBinding<T> {
    /// The GPU buffer that stores the uniform value.
    ///
    /// Created with `UNIFORM | COPY_DST` so it can be bound to shaders and rewritten each frame.
    pub buffer: wgpu::Buffer,

    /// Bind group referencing `buffer` at binding 0.
    pub bind_group: wgpu::BindGroup,

    _marker: PhantomData<T>,
}

impl<T: bytemuck::Pod + Default> UniformBinding<T> {
    /// Creates the bind group layout for a single uniform block visible to `visibility`.
    pub fn layout(
        device: &wgpu::Device,
        label: &str,
        visibility: wgpu::ShaderStages,
    ) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<T>() as u64),
                },
                count: None,
            }],
            label: Some(label),
        })
    }

    /// Allocates the buffer, initialised to `T::default()`, and binds it against `layout`.
    pub fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, label: &str) -> Self {
        let buffer = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(&[T::default()]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            },
        );

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some(label),
        });

        Self {
            buffer,
            bind_group,
            _marker: PhantomData,
        }
    }

    /// Writes `value` into the buffer. The copy is scheduled on the queue and lands before the
    /// next submitted command buffer executes.
    pub fn update_buffer(&self, queue: &wgpu::Queue, value: &T) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(value));
    }
}
