//! Per-frame motion of the animated variant.
//!
//! Motion is step-based: every frame advances by a fixed amount, with no notion of elapsed wall
//! time, so the perceived speed follows the display refresh rate.

use std::f32::consts::TAU;

use nalgebra_glm::Vec3;

/// Radians added to each of the cube's Euler angles every frame.
///
/// This does not read [`crate::controls::Controls::rotation_speed`]. The rotation slider is shown
/// but has no effect on the cube, and that behaviour is kept deliberately.
pub const CUBE_ROTATION_STEP: f32 = 0.02;

/// Centre of the sphere's horizontal swing.
pub const BOUNCE_CENTER_X: f32 = 20.0;
/// Lowest point of the bounce.
pub const BOUNCE_FLOOR_Y: f32 = 2.0;
/// Amplitude of both the swing and the bounce.
pub const BOUNCE_AMPLITUDE: f32 = 10.0;

/// Phase accumulator driving the sphere's bounce.
///
/// The phase only ever grows; it is never wrapped, relying on the periodicity of `sin`/`cos`.
/// It is kept in `f64` so that small per-frame speeds still move it after days of running.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounce {
    step: f64,
}

impl Bounce {
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Moves the phase forward by `speed` and returns the new phase.
    pub fn advance(&mut self, speed: f32) -> f64 {
        self.step += f64::from(speed);
        self.step
    }
}

/// Sphere position for a given phase, keeping the sphere's depth unchanged.
///
/// x swings around [`BOUNCE_CENTER_X`]; y is a rectified sine, so the sphere never dips below
/// [`BOUNCE_FLOOR_Y`]. The trigonometry runs on the full-precision phase.
pub fn sphere_position(step: f64, z: f32) -> Vec3 {
    let center = f64::from(BOUNCE_CENTER_X);
    let floor = f64::from(BOUNCE_FLOOR_Y);
    let amplitude = f64::from(BOUNCE_AMPLITUDE);
    nalgebra_glm::vec3(
        (center + amplitude * step.cos()) as f32,
        (floor + amplitude * step.sin().abs()) as f32,
        z,
    )
}

/// Adds one frame's worth of spin to a set of Euler angles, wrapped into `[0, 2π)`.
pub fn spin(rotation: &mut Vec3) {
    for angle in rotation.iter_mut() {
        *angle = (*angle + CUBE_ROTATION_STEP).rem_euclid(TAU);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounce_stays_in_bounds() {
        let mut phase = 0.0_f64;
        while phase < 50.0 {
            let p = sphere_position(phase, 2.0);
            assert!(p.y >= BOUNCE_FLOOR_Y, "y = {} at phase {phase}", p.y);
            assert!((10.0..=30.0).contains(&p.x), "x = {} at phase {phase}", p.x);
            assert_eq!(p.z, 2.0);
            phase += 0.0137;
        }
    }

    #[test]
    fn phase_zero_starts_at_right_extreme() {
        let p = sphere_position(0.0, 2.0);
        assert_eq!(p.x, 30.0);
        assert_eq!(p.y, 2.0);
    }

    #[test]
    fn phase_accumulates_linearly() {
        let mut bounce = Bounce::default();
        for _ in 0..100 {
            bounce.advance(0.03);
        }
        assert!((bounce.step() - 3.0).abs() < 1e-4);
    }

    #[test]
    fn phase_keeps_moving_over_long_runs() {
        let speed = 0.03_f32;
        let frames = 20_000_000_u64;
        let mut bounce = Bounce::default();
        for _ in 0..frames {
            bounce.advance(speed);
        }

        let expected = frames as f64 * f64::from(speed);
        assert!(
            (bounce.step() - expected).abs() < 1e-2,
            "phase {} drifted from {expected}",
            bounce.step()
        );

        let before = bounce.step();
        assert!(bounce.advance(speed) > before);
    }

    #[test]
    fn sphere_stays_in_bounds_at_large_phase() {
        let mut bounce = Bounce { step: 524_288.0 };
        let first = sphere_position(bounce.step(), 2.0);
        let second = sphere_position(bounce.advance(0.03), 2.0);
        assert_ne!(first, second);
        assert!(second.y >= BOUNCE_FLOOR_Y);
        assert!((10.0..=30.0).contains(&second.x));
    }

    #[test]
    fn zero_speed_freezes_phase() {
        let mut bounce = Bounce::default();
        bounce.advance(0.0);
        assert_eq!(bounce.step(), 0.0);
    }

    #[test]
    fn spin_adds_fixed_step_on_every_axis() {
        let mut rotation = Vec3::zeros();
        spin(&mut rotation);
        spin(&mut rotation);
        assert_eq!(rotation, nalgebra_glm::vec3(0.04, 0.04, 0.04));
    }

    #[test]
    fn spin_wraps_and_keeps_turning() {
        let mut rotation = Vec3::zeros();
        for _ in 0..5_000_000 {
            spin(&mut rotation);
        }
        for angle in rotation.iter() {
            assert!((0.0..TAU).contains(angle), "angle {angle} escaped [0, 2pi)");
        }

        let before = rotation;
        spin(&mut rotation);
        assert_ne!(rotation, before);
    }
}
