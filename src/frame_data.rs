//! Per-frame snapshot handed from the scene state to the renderer.
//!
//! The application builds a [`FrameData`] from its [`crate::state::SceneState`] once per redraw;
//! the renderer uploads it and draws. Keeping this step free of GPU types means the exact values
//! that reach the shaders can be checked in tests.

use crate::camera::Camera;
use crate::scene::{Color, NodeId, Scene, SceneNode};
use crate::uniform_buffer::{FrameUniforms, ObjectUniforms};

/// Everything the renderer needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameData {
    pub clear_color: Color,
    pub frame: FrameUniforms,
    /// Uniforms for every mesh and helper, in scene order.
    pub objects: Vec<(NodeId, ObjectUniforms)>,
}

impl FrameData {
    /// Captures the scene as seen from `camera`.
    pub fn capture(scene: &Scene, camera: &Camera, clear_color: Color, shadows: bool) -> Self {
        let mut frame = FrameUniforms {
            view_proj: camera.view_projection(),
            ..Default::default()
        };

        if let Some(light) = scene.spot_light() {
            let direction = light.direction();
            let shadows = shadows && light.cast_shadow;
            frame.light_view_proj = light.shadow_view_projection();
            frame.light_position = [light.position.x, light.position.y, light.position.z, 1.0];
            frame.light_direction = [direction.x, direction.y, direction.z, light.cone_cos()];
            let color = light.color;
            frame.light_color = [color.r, color.g, color.b, light.intensity];
            frame.shadow = [
                if shadows { 1.0 } else { 0.0 },
                light.shadow.bias,
                1.0 / light.shadow.map_size as f32,
                0.0,
            ];
        }

        let objects = scene
            .nodes()
            .filter_map(|(id, node)| match node {
                SceneNode::Mesh(mesh) => Some((
                    id,
                    ObjectUniforms {
                        model: mesh.model_matrix(),
                        color: mesh.material.color.to_rgba(),
                        flags: [if mesh.receive_shadow { 1.0 } else { 0.0 }, 0.0, 0.0, 0.0],
                    },
                )),
                SceneNode::SpotLightHelper(helper) => Some((
                    id,
                    ObjectUniforms {
                        model: nalgebra_glm::Mat4::identity(),
                        color: helper.color.to_rgba(),
                        flags: [0.0; 4],
                    },
                )),
                SceneNode::SpotLight(_) => None,
            })
            .collect();

        Self {
            clear_color,
            frame,
            objects,
        }
    }

    pub fn object(&self, id: NodeId) -> Option<&ObjectUniforms> {
        self.objects
            .iter()
            .find_map(|(node, uniforms)| (*node == id).then_some(uniforms))
    }
}
