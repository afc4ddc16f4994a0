//! # Scene Module
//!
//! The [`Scene`] is the container holding every renderable object and light of a frame. It is a
//! flat, ordered list of [`SceneNode`]s; nodes are addressed by the [`NodeId`] returned when they
//! are added, which lets the frame updater reach the cube and sphere directly without searching.
//!
//! The scene is pure data: no GPU resources live here. The [`crate::renderer::Renderer`] builds its
//! buffers from the nodes once at start-up and afterwards only reads their transforms through
//! [`crate::frame_data::FrameData`].

use nalgebra_glm::{Mat4, Vec3};

use crate::geometry::Geometry;
use crate::light::{SpotLight, SpotLightHelper};

/// An opaque RGB colour, stored as normalized floats.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    /// Builds a colour from a `0xRRGGBB` literal.
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xFF) as f32 / 255.0;
        Self {
            r: channel(16),
            g: channel(8),
            b: channel(0),
        }
    }

    pub fn to_rgba(self) -> [f32; 4] {
        [self.r, self.g, self.b, 1.0]
    }
}

impl From<Color> for wgpu::Color {
    fn from(color: Color) -> Self {
        wgpu::Color {
            r: color.r as f64,
            g: color.g as f64,
            b: color.b as f64,
            a: 1.0,
        }
    }
}

/// A diffuse material that responds to scene lighting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LambertMaterial {
    pub color: Color,
}

/// A renderable object: a shape, a material and a transform.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub name: &'static str,
    pub geometry: Geometry,
    pub material: LambertMaterial,
    pub position: Vec3,
    /// Euler angles in radians, applied in X, Y, Z order.
    pub rotation: Vec3,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl Mesh {
    pub fn new(name: &'static str, geometry: Geometry, material: LambertMaterial) -> Self {
        Self {
            name,
            geometry,
            material,
            position: Vec3::zeros(),
            rotation: Vec3::zeros(),
            cast_shadow: false,
            receive_shadow: false,
        }
    }

    /// Object-to-world transform: translate, then rotate X * Y * Z.
    pub fn model_matrix(&self) -> Mat4 {
        let model = nalgebra_glm::translation(&self.position);
        let model = nalgebra_glm::rotate_x(&model, self.rotation.x);
        let model = nalgebra_glm::rotate_y(&model, self.rotation.y);
        nalgebra_glm::rotate_z(&model, self.rotation.z)
    }
}

/// One top-level child of the scene.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneNode {
    Mesh(Mesh),
    SpotLight(SpotLight),
    SpotLightHelper(SpotLightHelper),
}

/// Index of a node inside its [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Ordered collection of everything drawn or lit in a frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    nodes: Vec<SceneNode>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, node: SceneNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.nodes.iter().enumerate().map(|(i, node)| (NodeId(i), node))
    }

    pub fn meshes(&self) -> impl Iterator<Item = (NodeId, &Mesh)> {
        self.nodes().filter_map(|(id, node)| match node {
            SceneNode::Mesh(mesh) => Some((id, mesh)),
            _ => None,
        })
    }

    pub fn mesh(&self, id: NodeId) -> Option<&Mesh> {
        match self.nodes.get(id.0) {
            Some(SceneNode::Mesh(mesh)) => Some(mesh),
            _ => None,
        }
    }

    pub fn mesh_mut(&mut self, id: NodeId) -> Option<&mut Mesh> {
        match self.nodes.get_mut(id.0) {
            Some(SceneNode::Mesh(mesh)) => Some(mesh),
            _ => None,
        }
    }

    /// The first spotlight in the scene, which is the one that casts shadows.
    pub fn spot_light(&self) -> Option<&SpotLight> {
        self.nodes.iter().find_map(|node| match node {
            SceneNode::SpotLight(light) => Some(light),
            _ => None,
        })
    }

    pub fn helpers(&self) -> impl Iterator<Item = (NodeId, &SpotLightHelper)> {
        self.nodes().filter_map(|(id, node)| match node {
            SceneNode::SpotLightHelper(helper) => Some((id, helper)),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors() {
        assert_eq!(Color::from_hex(0xFFFF00).to_rgba(), [1.0, 1.0, 0.0, 1.0]);
        let gray = Color::from_hex(0xEEEEEE);
        assert!((gray.r - 238.0 / 255.0).abs() < f32::EPSILON);
    }

    #[test]
    fn rotated_plane_faces_up() {
        let mut plane = Mesh::new(
            "plane",
            Geometry::Plane {
                width: 60.0,
                height: 20.0,
            },
            LambertMaterial {
                color: Color::from_hex(0xCCCCCC),
            },
        );
        plane.rotation.x = -0.5 * std::f32::consts::PI;
        let normal = plane.model_matrix() * nalgebra_glm::vec4(0.0, 0.0, 1.0, 0.0);
        assert!((normal.y - 1.0).abs() < 1e-6);
        assert!(normal.z.abs() < 1e-6);
    }

    #[test]
    fn typed_lookup_rejects_other_nodes() {
        let mut scene = Scene::new();
        let light = scene.add(SceneNode::SpotLight(SpotLight::new(Color::from_hex(0xFF0000))));
        assert!(scene.mesh(light).is_none());
        assert!(scene.spot_light().is_some());
        assert_eq!(scene.len(), 1);
    }
}
