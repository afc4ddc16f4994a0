//! User-tunable animation speeds, edited live from the control panel.

use std::ops::RangeInclusive;

/// The two slider-backed speeds of the animated variant.
///
/// Values are always kept inside [`Controls::SPEED_RANGE`]: the setters clamp anything outside it
/// and ignore `NaN`, so the frame updater never sees an invalid speed.
///
/// Note that only [`Controls::bouncing_speed`] feeds the animation. The cube spins at a fixed step
/// regardless of [`Controls::rotation_speed`]; see [`crate::animation::CUBE_ROTATION_STEP`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Controls {
    rotation_speed: f32,
    bouncing_speed: f32,
}

impl Controls {
    /// Accepted range for both sliders.
    pub const SPEED_RANGE: RangeInclusive<f32> = 0.0..=0.5;

    pub const DEFAULT_ROTATION_SPEED: f32 = 0.02;
    pub const DEFAULT_BOUNCING_SPEED: f32 = 0.03;

    pub fn rotation_speed(&self) -> f32 {
        self.rotation_speed
    }

    pub fn bouncing_speed(&self) -> f32 {
        self.bouncing_speed
    }

    pub fn set_rotation_speed(&mut self, value: f32) {
        if let Some(value) = Self::clamp(value) {
            self.rotation_speed = value;
        }
    }

    pub fn set_bouncing_speed(&mut self, value: f32) {
        if let Some(value) = Self::clamp(value) {
            self.bouncing_speed = value;
        }
    }

    fn clamp(value: f32) -> Option<f32> {
        if value.is_nan() {
            log::warn!("Ignoring NaN speed value");
            return None;
        }
        Some(value.clamp(*Self::SPEED_RANGE.start(), *Self::SPEED_RANGE.end()))
    }
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            rotation_speed: Self::DEFAULT_ROTATION_SPEED,
            bouncing_speed: Self::DEFAULT_BOUNCING_SPEED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_panel() {
        let controls = Controls::default();
        assert_eq!(controls.rotation_speed(), 0.02);
        assert_eq!(controls.bouncing_speed(), 0.03);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let mut controls = Controls::default();
        controls.set_bouncing_speed(3.0);
        assert_eq!(controls.bouncing_speed(), 0.5);
        controls.set_rotation_speed(-1.0);
        assert_eq!(controls.rotation_speed(), 0.0);
    }

    #[test]
    fn boundaries_are_accepted() {
        let mut controls = Controls::default();
        controls.set_bouncing_speed(0.5);
        assert_eq!(controls.bouncing_speed(), 0.5);
        controls.set_bouncing_speed(0.0);
        assert_eq!(controls.bouncing_speed(), 0.0);
    }

    #[test]
    fn nan_keeps_previous_value() {
        let mut controls = Controls::default();
        controls.set_bouncing_speed(0.25);
        controls.set_bouncing_speed(f32::NAN);
        assert_eq!(controls.bouncing_speed(), 0.25);
    }
}
