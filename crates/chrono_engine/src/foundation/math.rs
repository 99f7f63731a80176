//! Math utilities and types
//!
//! Thin aliases over `nalgebra` plus the handful of scalar helpers the
//! simulation needs (angle wrapping, shortest-path angle interpolation).

pub use nalgebra::{Quaternion, Unit, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// World-space transform (position, rotation and uniform-or-not scale)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform from a position and a rotation about the Y axis
    pub fn from_position_yaw(position: Vec3, yaw: f32) -> Self {
        Self {
            position,
            rotation: Quat::from_axis_angle(&Vec3::y_axis(), yaw),
            ..Default::default()
        }
    }
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// 2 * Pi
    pub const TAU: f32 = std::f32::consts::TAU;

    /// Pi / 2
    pub const HALF_PI: f32 = std::f32::consts::FRAC_PI_2;
}

/// Math utility functions
pub mod utils {
    use super::{constants, Vec3};

    /// Linear interpolation
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }

    /// Wrap an angle into `[-PI, PI)`
    pub fn wrap_angle(angle: f32) -> f32 {
        (angle + constants::PI).rem_euclid(constants::TAU) - constants::PI
    }

    /// Interpolate from angle `a` toward angle `b` along the shorter arc.
    ///
    /// `t` is clamped to `[0, 1]`, so `t = 1` lands exactly on `b` (modulo a
    /// full turn) and never overshoots. The result is kept in `[-PI, PI)`.
    pub fn lerp_angle(a: f32, b: f32, t: f32) -> f32 {
        let delta = wrap_angle(b - a);
        wrap_angle(a + delta * t.clamp(0.0, 1.0))
    }

    /// Unit direction in the XZ plane for a yaw angle (yaw 0 faces +Z)
    pub fn yaw_direction(yaw: f32) -> Vec3 {
        Vec3::new(yaw.sin(), 0.0, yaw.cos())
    }
}
