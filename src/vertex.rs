//! # Vertex Module
//!
//! Defines the [`Vertex`] layout shared by every mesh in the scene and by the spotlight helper's
//! line list. Each vertex carries a position and a normal in object space; colour comes from the
//! per-object uniform rather than from the vertex, since every mesh has a single flat material.
//!
//! ## Memory Layout
//!
//! The struct is `#[repr(C)]` and derives `bytemuck::Pod`, so a `&[Vertex]` can be uploaded to a
//! GPU buffer directly through `bytemuck::cast_slice`:
//!
//! | Location | Field      | Format      | Offset |
//! |----------|------------|-------------|--------|
//! | 0        | `position` | `Float32x3` | 0      |
//! | 1        | `normal`   | `Float32x3` | 12     |
//!
//! The shader's `VertexInput` declares the same two locations.

/// A single vertex of a tessellated mesh.
///
/// Line vertices (used for the spotlight helper) reuse this layout with a zero normal; the unlit
/// shader entry point ignores it.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Object-space position `[x, y, z]`.
    pub position: [f32; 3],

    /// Object-space unit normal `[x, y, z]`.
    pub normal: [f32; 3],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    pub fn new(position: [f32; 3], normal: [f32; 3]) -> Self {
        Self { position, normal }
    }

    /// A vertex with no meaningful normal, used for line geometry.
    pub fn point(position: [f32; 3]) -> Self {
        Self {
            position,
            normal: [0.0; 3],
        }
    }

    /// Describes how a vertex buffer of [`Vertex`] values is laid out for the pipeline.
    ///
    /// The stride is the size of one `Vertex`, and the buffer advances once per vertex (not per
    /// instance).
    pub fn description() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stride_covers_both_attributes() {
        let layout = Vertex::description();
        assert_eq!(layout.array_stride, 24);
        assert_eq!(layout.attributes.len(), 2);
        assert_eq!(layout.attributes[1].offset, 12);
    }
}
