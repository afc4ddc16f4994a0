//! # Scene State (`state.rs`)
//!
//! [`SceneState`] is the explicit application state: the scene container, the camera, the
//! control parameters and the bounce phase, all created once by [`SceneState::bootstrap`] and then
//! mutated only by [`SceneState::resize`] and [`SceneState::advance_frame`].
//!
//! It holds no GPU or window handles, so the whole lifecycle of the scene can be driven and checked
//! without a graphics device.

use std::f32::consts::PI;

use nalgebra_glm::{vec3, Vec3};

use crate::animation::{self, Bounce};
use crate::camera::Camera;
use crate::controls::Controls;
use crate::frame_data::FrameData;
use crate::geometry::Geometry;
use crate::light::{SpotLight, SpotLightHelper};
use crate::scene::{Color, LambertMaterial, Mesh, NodeId, Scene, SceneNode};
use crate::variant::Variant;

/// Background colour the surface is cleared to.
pub const CLEAR_COLOR: u32 = 0xEEEEEE;

pub struct SceneState {
    pub scene: Scene,
    pub camera: Camera,
    pub controls: Controls,
    bounce: Bounce,
    variant: Variant,
    cube: NodeId,
    sphere: NodeId,
    clear_color: Color,
    shadows_enabled: bool,
    surface_size: (u32, u32),
}

impl SceneState {
    /// Builds the scene for a surface of `width` x `height` pixels.
    pub fn bootstrap(variant: Variant, width: u32, height: u32) -> Self {
        let mut scene = Scene::new();

        let aspect = Camera::aspect_for(width, height).unwrap_or(1.0);
        let mut camera = Camera::new(45.0, aspect, 0.1, 1000.0);
        camera.position = vec3(-30.0, 40.0, 30.0);
        camera.look_at(Vec3::zeros());

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
        plane.receive_shadow = true;
        plane.rotation.x = -0.5 * PI;
        plane.position = vec3(15.0, 0.0, 0.0);
        scene.add(SceneNode::Mesh(plane));

        let mut cube = Mesh::new(
            "cube",
            Geometry::Box {
                width: 4.0,
                height: 4.0,
                depth: 4.0,
            },
            LambertMaterial {
                color: Color::from_hex(0xFFFF00),
            },
        );
        cube.cast_shadow = true;
        cube.position = vec3(-4.0, 3.0, 0.0);
        let cube = scene.add(SceneNode::Mesh(cube));

        let mut sphere = Mesh::new(
            "sphere",
            Geometry::Sphere {
                radius: 4.0,
                width_segments: 20,
                height_segments: 20,
            },
            LambertMaterial {
                color: Color::from_hex(0x7777FF),
            },
        );
        sphere.cast_shadow = true;
        sphere.position = vec3(20.0, 4.0, 2.0);
        let sphere = scene.add(SceneNode::Mesh(sphere));

        let mut spot_light = SpotLight::new(Color::from_hex(0xFF0000));
        spot_light.position = vec3(-40.0, 60.0, -10.0);
        spot_light.cast_shadow = true;
        let helper = variant
            .is_animated()
            .then(|| SpotLightHelper::new(&spot_light));
        scene.add(SceneNode::SpotLight(spot_light));

        if let Some(helper) = helper {
            scene.add(SceneNode::SpotLightHelper(helper));
        }

        log::info!(
            "Scene bootstrapped ({variant:?}): {} nodes, surface {width}x{height}",
            scene.len()
        );

        Self {
            scene,
            camera,
            controls: Controls::default(),
            bounce: Bounce::default(),
            variant,
            cube,
            sphere,
            clear_color: Color::from_hex(CLEAR_COLOR),
            shadows_enabled: true,
            surface_size: (width, height),
        }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn cube(&self) -> NodeId {
        self.cube
    }

    pub fn sphere(&self) -> NodeId {
        self.sphere
    }

    pub fn phase(&self) -> f64 {
        self.bounce.step()
    }

    pub fn surface_size(&self) -> (u32, u32) {
        self.surface_size
    }

    pub fn shadows_enabled(&self) -> bool {
        self.shadows_enabled
    }

    /// Keeps the camera aspect and surface size in step with the window.
    ///
    /// Returns `false`, leaving everything untouched, when either dimension is zero (for example
    /// while the window is minimised).
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || !self.camera.set_viewport(width, height) {
            log::debug!("Ignoring degenerate resize to {width}x{height}");
            return false;
        }
        self.surface_size = (width, height);
        true
    }

    /// Runs one step of the animation: spin the cube, advance the phase, move the sphere.
    ///
    /// Does nothing for the static variant.
    pub fn advance_frame(&mut self) {
        if !self.variant.is_animated() {
            return;
        }

        if let Some(cube) = self.scene.mesh_mut(self.cube) {
            animation::spin(&mut cube.rotation);
        }

        let step = self.bounce.advance(self.controls.bouncing_speed());
        if let Some(sphere) = self.scene.mesh_mut(self.sphere) {
            sphere.position = animation::sphere_position(step, sphere.position.z);
        }
    }

    /// Snapshot of the current scene for the renderer.
    pub fn frame_data(&self) -> FrameData {
        FrameData::capture(&self.scene, &self.camera, self.clear_color, self.shadows_enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_variant_has_four_children() {
        let state = SceneState::bootstrap(Variant::Static, 800, 600);
        assert_eq!(state.scene.len(), 4);
        assert_eq!(state.scene.helpers().count(), 0);
    }

    #[test]
    fn animated_variant_adds_helper() {
        let state = SceneState::bootstrap(Variant::Animated, 800, 600);
        assert_eq!(state.scene.len(), 5);
        assert_eq!(state.scene.helpers().count(), 1);
    }

    #[test]
    fn bootstrap_places_objects() {
        let state = SceneState::bootstrap(Variant::Animated, 800, 600);
        let cube = state.scene.mesh(state.cube()).unwrap();
        assert_eq!(cube.position, vec3(-4.0, 3.0, 0.0));
        assert!(cube.cast_shadow && !cube.receive_shadow);
        let sphere = state.scene.mesh(state.sphere()).unwrap();
        assert_eq!(sphere.position, vec3(20.0, 4.0, 2.0));
        let plane = state.scene.meshes().find(|(_, m)| m.name == "plane").unwrap().1;
        assert!(plane.receive_shadow);
        assert_eq!(state.camera.fov_y, 45.0);
        assert_eq!(state.camera.aspect, 800.0 / 600.0);
    }

    #[test]
    fn static_variant_ignores_frame_updates() {
        let mut state = SceneState::bootstrap(Variant::Static, 800, 600);
        let before = state.frame_data();
        state.advance_frame();
        assert_eq!(state.frame_data(), before);
        assert_eq!(state.phase(), 0.0);
    }

    #[test]
    fn frame_moves_cube_and_sphere() {
        let mut state = SceneState::bootstrap(Variant::Animated, 800, 600);
        state.advance_frame();
        let cube = state.scene.mesh(state.cube()).unwrap();
        assert_eq!(cube.rotation, vec3(0.02, 0.02, 0.02));
        let sphere = state.scene.mesh(state.sphere()).unwrap();
        let expected = animation::sphere_position(0.03, 2.0);
        assert_eq!(sphere.position, expected);
    }

    #[test]
    fn rotation_slider_does_not_change_spin() {
        let mut state = SceneState::bootstrap(Variant::Animated, 800, 600);
        state.controls.set_rotation_speed(0.5);
        state.advance_frame();
        let cube = state.scene.mesh(state.cube()).unwrap();
        assert_eq!(cube.rotation.x, animation::CUBE_ROTATION_STEP);
    }

    #[test]
    fn zero_sized_resize_is_ignored() {
        let mut state = SceneState::bootstrap(Variant::Animated, 800, 600);
        assert!(!state.resize(0, 600));
        assert!(!state.resize(800, 0));
        assert_eq!(state.surface_size(), (800, 600));
        assert_eq!(state.camera.aspect, 800.0 / 600.0);
    }

    #[test]
    fn frame_data_carries_light_and_objects() {
        let state = SceneState::bootstrap(Variant::Animated, 800, 600);
        let data = state.frame_data();
        assert_eq!(data.objects.len(), 4);
        assert_eq!(data.frame.light_position, [-40.0, 60.0, -10.0, 1.0]);
        assert_eq!(data.frame.light_color, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(data.frame.shadow[0], 1.0);
        let cube = data.object(state.cube()).unwrap();
        assert_eq!(cube.color, [1.0, 1.0, 0.0, 1.0]);
        assert_eq!(cube.flags[0], 0.0);
    }
}
