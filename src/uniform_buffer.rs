//! # Uniform Buffer Layouts
//!
//! CPU-side mirrors of the uniform structs declared in `shader.wgsl`. Both are `#[repr(C)]` and
//! `bytemuck::Pod` so they can be written to the GPU with `queue.write_buffer` without any manual
//! packing.
//!
//! ## Alignment
//!
//! WGSL aligns `vec3<f32>` to 16 bytes, so every vector here is stored as a four-component array
//! and the spare lane carries a scalar parameter instead of padding:
//!
//! | Struct           | Field             | Lanes                                         |
//! |------------------|-------------------|-----------------------------------------------|
//! | `FrameUniforms`  | `light_position`  | xyz = world position, w = unused (1.0)        |
//! | `FrameUniforms`  | `light_direction` | xyz = unit direction, w = cosine of cone angle |
//! | `FrameUniforms`  | `light_color`     | rgb = colour, a = intensity                   |
//! | `FrameUniforms`  | `shadow`          | x = enabled, y = depth bias, z = texel size   |
//! | `ObjectUniforms` | `flags`           | x = receives shadow                           |

/// Values shared by every draw call of a frame (bind group 0).
#[repr(C)]
#[derive(Default, Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniforms {
    /// Camera projection * view.
    pub view_proj: nalgebra_glm::Mat4,

    /// Spotlight shadow camera projection * view.
    pub light_view_proj: nalgebra_glm::Mat4,

    pub light_position: [f32; 4],
    pub light_direction: [f32; 4],
    pub light_color: [f32; 4],
    pub shadow: [f32; 4],
}

/// Per-object values (bind group 1).
#[repr(C)]
#[derive(Default, Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniforms {
    pub model: nalgebra_glm::Mat4,
    pub color: [f32; 4],
    pub flags: [f32; 4],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_are_multiples_of_sixteen() {
        assert_eq!(std::mem::size_of::<FrameUniforms>(), 192);
        assert_eq!(std::mem::size_of::<ObjectUniforms>(), 96);
    }
}
