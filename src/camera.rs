use nalgebra_glm::{Mat4, Vec3};

/// Perspective camera looking at a fixed target.
///
/// The projection is never cached: it is rebuilt from the current aspect ratio whenever a frame
/// is prepared, so updating [`Camera::aspect`] is all a resize has to do.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Vertical field of view, in degrees.
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub target: Vec3,
}

impl Camera {
    pub fn new(fov_y: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            fov_y,
            aspect,
            near,
            far,
            position: Vec3::zeros(),
            target: Vec3::zeros(),
        }
    }

    /// Aspect ratio for a surface of the given size, or `None` for a degenerate height.
    pub fn aspect_for(width: u32, height: u32) -> Option<f32> {
        (height > 0).then(|| width as f32 / height as f32)
    }

    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    /// Updates the aspect ratio after a resize. Zero-height surfaces are ignored.
    pub fn set_viewport(&mut self, width: u32, height: u32) -> bool {
        match Self::aspect_for(width, height) {
            Some(aspect) => {
                self.aspect = aspect;
                true
            }
            None => false,
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        nalgebra_glm::look_at_rh(&self.position, &self.target, &Vec3::y())
    }

    pub fn projection_matrix(&self) -> Mat4 {
        nalgebra_glm::perspective_rh_zo(self.aspect, self.fov_y.to_radians(), self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene_camera() -> Camera {
        let mut camera = Camera::new(45.0, 16.0 / 9.0, 0.1, 1000.0);
        camera.position = nalgebra_glm::vec3(-30.0, 40.0, 30.0);
        camera.look_at(Vec3::zeros());
        camera
    }

    #[test]
    fn target_projects_to_screen_center() {
        let clip = scene_camera().view_projection() * nalgebra_glm::vec4(0.0, 0.0, 0.0, 1.0);
        let ndc = nalgebra_glm::vec4_to_vec3(&clip) / clip.w;
        assert!(ndc.x.abs() < 1e-5);
        assert!(ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn zero_height_viewport_is_ignored() {
        let mut camera = scene_camera();
        let before = camera.aspect;
        assert!(!camera.set_viewport(800, 0));
        assert_eq!(camera.aspect, before);
    }

    #[test]
    fn viewport_sets_exact_ratio() {
        let mut camera = scene_camera();
        assert!(camera.set_viewport(1280, 720));
        assert_eq!(camera.aspect, 1280_f32 / 720_f32);
    }
}
