//! Third-person orbit camera

use crate::config::CameraConfig;
use chrono_engine::foundation::math::Vec3;
use chrono_engine::input::PITCH_LIMIT;

/// Camera that orbits and trails the player
#[derive(Debug, Clone)]
pub struct FollowCamera {
    distance: f32,
    height: f32,
    smoothing: f32,
    position: Vec3,
    target: Vec3,
}

impl FollowCamera {
    /// Create a camera resting at its default offset from the origin
    pub fn new(config: &CameraConfig) -> Self {
        let mut camera = Self {
            distance: config.distance,
            height: config.height,
            smoothing: config.smoothing,
            position: Vec3::zeros(),
            target: Vec3::zeros(),
        };
        camera.snap_to(Vec3::zeros(), 0.0, 0.0);
        camera
    }

    /// Desired eye position for an orbit angle.
    ///
    /// Yaw 0 places the camera on the +Z side of the player, behind a
    /// character facing -Z. Pitch is clamped to ±[`PITCH_LIMIT`].
    pub fn desired_position(&self, player: Vec3, yaw: f32, pitch: f32) -> Vec3 {
        let pitch = pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        let horizontal = self.distance * pitch.cos();
        player
            + Vec3::new(
                horizontal * yaw.sin(),
                self.height + self.distance * pitch.sin(),
                horizontal * yaw.cos(),
            )
    }

    /// Move a fraction of the way toward the desired position (once per frame)
    pub fn update(&mut self, player: Vec3, yaw: f32, pitch: f32) {
        let desired = self.desired_position(player, yaw, pitch);
        self.position = self.position.lerp(&desired, self.smoothing);
        self.target = player;
    }

    /// Jump straight to the desired position (level load)
    pub fn snap_to(&mut self, player: Vec3, yaw: f32, pitch: f32) {
        self.position = self.desired_position(player, yaw, pitch);
        self.target = player;
    }

    /// Eye position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Look-at point
    pub fn target(&self) -> Vec3 {
        self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_offset_is_behind_and_above() {
        let camera = FollowCamera::new(&CameraConfig::default());
        assert_relative_eq!(camera.position(), Vec3::new(0.0, 3.0, 6.0), epsilon = 1e-5);
    }

    #[test]
    fn test_update_smooths_toward_target() {
        let mut camera = FollowCamera::new(&CameraConfig::default());
        camera.update(Vec3::new(10.0, 0.0, 0.0), 0.0, 0.0);

        assert_relative_eq!(camera.position().x, 1.0, epsilon = 1e-5);
        assert_eq!(camera.target(), Vec3::new(10.0, 0.0, 0.0));

        for _ in 0..200 {
            camera.update(Vec3::new(10.0, 0.0, 0.0), 0.0, 0.0);
        }
        assert_relative_eq!(camera.position(), Vec3::new(10.0, 3.0, 6.0), epsilon = 1e-3);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let camera = FollowCamera::new(&CameraConfig::default());
        let steep = camera.desired_position(Vec3::zeros(), 0.0, 10.0);
        let limit = camera.desired_position(Vec3::zeros(), 0.0, PITCH_LIMIT);
        assert_relative_eq!(steep, limit);
    }
}
