//! # Spotlight Module
//!
//! The scene is lit by a single [`SpotLight`]. Besides its colour and position, the light owns the
//! perspective "shadow camera" used to render the shadow map: it looks from the light towards its
//! target with a field of view wide enough to cover the whole cone.
//!
//! [`SpotLightHelper`] produces the wireframe cone shown in the animated variant so the light's
//! reach is visible on screen.

use std::f32::consts::PI;

use nalgebra_glm::{Mat4, Vec3};

use crate::scene::Color;
use crate::vertex::Vertex;

/// Parameters of the perspective projection used for the shadow map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotShadow {
    pub near: f32,
    pub far: f32,
    /// Width and height of the square depth texture.
    pub map_size: u32,
    /// Depth offset applied when comparing against the map.
    pub bias: f32,
}

impl Default for SpotShadow {
    fn default() -> Self {
        Self {
            near: 0.5,
            far: 500.0,
            map_size: 512,
            bias: 0.0005,
        }
    }
}

/// A cone-shaped light pointing from `position` towards `target`.
#[derive(Debug, Clone, PartialEq)]
pub struct SpotLight {
    pub color: Color,
    pub intensity: f32,
    pub position: Vec3,
    pub target: Vec3,
    /// Half-angle of the cone, in radians.
    pub angle: f32,
    /// Maximum reach; `0.0` means unlimited.
    pub distance: f32,
    pub cast_shadow: bool,
    pub shadow: SpotShadow,
}

impl SpotLight {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            intensity: 1.0,
            position: Vec3::zeros(),
            target: Vec3::zeros(),
            angle: PI / 3.0,
            distance: 0.0,
            cast_shadow: false,
            shadow: SpotShadow::default(),
        }
    }

    /// Unit vector from the light towards its target.
    pub fn direction(&self) -> Vec3 {
        nalgebra_glm::normalize(&(self.target - self.position))
    }

    /// Cosine of the cone half-angle; fragments with a smaller cosine are unlit.
    pub fn cone_cos(&self) -> f32 {
        self.angle.cos()
    }

    /// View-projection of the shadow camera.
    pub fn shadow_view_projection(&self) -> Mat4 {
        let far = if self.distance > 0.0 {
            self.distance
        } else {
            self.shadow.far
        };
        let projection =
            nalgebra_glm::perspective_rh_zo(1.0, 2.0 * self.angle, self.shadow.near, far);
        let up = Self::up_for(&self.direction());
        let view = nalgebra_glm::look_at_rh(&self.position, &self.target, &up);
        projection * view
    }

    /// An up vector that is never parallel to `direction`.
    fn up_for(direction: &Vec3) -> Vec3 {
        if direction.y.abs() > 0.999 {
            Vec3::z()
        } else {
            Vec3::y()
        }
    }
}

/// Wireframe cone visualising a [`SpotLight`].
///
/// The geometry is captured when the helper is built; the light is static so it never needs
/// refreshing.
#[derive(Debug, Clone, PartialEq)]
pub struct SpotLightHelper {
    pub color: Color,
    vertices: Vec<Vertex>,
}

impl SpotLightHelper {
    /// Lines from the apex to the rim.
    pub const SPOKES: usize = 5;
    /// Segments making up the rim circle.
    pub const RIM_SEGMENTS: usize = 32;
    /// Cone length used when the light has unlimited reach.
    const DEFAULT_LENGTH: f32 = 1000.0;

    pub fn new(light: &SpotLight) -> Self {
        let length = if light.distance > 0.0 {
            light.distance
        } else {
            Self::DEFAULT_LENGTH
        };
        let radius = length * light.angle.tan();

        let forward = light.direction();
        let up = SpotLight::up_for(&forward);
        let right = nalgebra_glm::normalize(&nalgebra_glm::cross(&forward, &up));
        let up = nalgebra_glm::cross(&right, &forward);

        // Local cone space: z along the light, unit rim at z = 1.
        let to_world = |x: f32, y: f32, z: f32| -> [f32; 3] {
            let p = light.position
                + (right * x * radius)
                + (up * y * radius)
                + (forward * z * length);
            [p.x, p.y, p.z]
        };

        let mut vertices = Vec::with_capacity((Self::SPOKES + Self::RIM_SEGMENTS) * 2);
        let apex = to_world(0.0, 0.0, 0.0);
        for (x, y) in [(0.0, 0.0), (1.0, 0.0), (-1.0, 0.0), (0.0, 1.0), (0.0, -1.0)] {
            vertices.push(Vertex::point(apex));
            vertices.push(Vertex::point(to_world(x, y, 1.0)));
        }
        for i in 0..Self::RIM_SEGMENTS {
            let a = i as f32 / Self::RIM_SEGMENTS as f32 * 2.0 * PI;
            let b = (i + 1) as f32 / Self::RIM_SEGMENTS as f32 * 2.0 * PI;
            vertices.push(Vertex::point(to_world(a.cos(), a.sin(), 1.0)));
            vertices.push(Vertex::point(to_world(b.cos(), b.sin(), 1.0)));
        }

        Self {
            color: light.color,
            vertices,
        }
    }

    /// Line-list vertices in world space.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene_light() -> SpotLight {
        let mut light = SpotLight::new(Color::from_hex(0xFF0000));
        light.position = nalgebra_glm::vec3(-40.0, 60.0, -10.0);
        light.cast_shadow = true;
        light
    }

    #[test]
    fn defaults() {
        let light = scene_light();
        assert_eq!(light.intensity, 1.0);
        assert_eq!(light.target, Vec3::zeros());
        assert!((light.cone_cos() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn target_is_inside_shadow_frustum() {
        let light = scene_light();
        let clip = light.shadow_view_projection() * nalgebra_glm::vec4(0.0, 0.0, 0.0, 1.0);
        let ndc = nalgebra_glm::vec4_to_vec3(&clip) / clip.w;
        assert!(ndc.x.abs() < 1e-4 && ndc.y.abs() < 1e-4);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn helper_is_a_closed_line_list() {
        let helper = SpotLightHelper::new(&scene_light());
        let vertices = helper.vertices();
        assert_eq!(
            vertices.len(),
            (SpotLightHelper::SPOKES + SpotLightHelper::RIM_SEGMENTS) * 2
        );
        assert_eq!(vertices[0].position, [-40.0, 60.0, -10.0]);

        let rim = &vertices[SpotLightHelper::SPOKES * 2..];
        let first = rim[0].position;
        let last = rim[rim.len() - 1].position;
        for axis in 0..3 {
            assert!((first[axis] - last[axis]).abs() < 1e-2);
        }
    }
}
