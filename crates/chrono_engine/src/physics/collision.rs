//! Collision primitives
//!
//! Axis-aligned boxes for static obstacles and bounding spheres for actors.
//! Everything here is a pure geometric query; registration and response live
//! in [`crate::physics::collision_system`].

use crate::foundation::math::Vec3;
use serde::{Deserialize, Serialize};

/// Axis-Aligned Bounding Box in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB from min and max points (not validated)
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB centered at a point with given half-extents
    pub fn from_center_extents(center: Vec3, extents: Vec3) -> Self {
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// Create an AABB centered at a point with given full size
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        Self::from_center_extents(center, size * 0.5)
    }

    /// True when every coordinate is finite and `min <= max` on every axis.
    ///
    /// Zero-thickness boxes (planes) are valid.
    pub fn is_valid(&self) -> bool {
        self.min.iter().chain(self.max.iter()).all(|c| c.is_finite())
            && self.min.x <= self.max.x
            && self.min.y <= self.max.y
            && self.min.z <= self.max.z
    }

    /// Check if this AABB contains a point
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x &&
        point.y >= self.min.y && point.y <= self.max.y &&
        point.z >= self.min.z && point.z <= self.max.z
    }

    /// Point inside or on the box closest to `point`
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        Vec3::new(
            point.x.clamp(self.min.x, self.max.x),
            point.y.clamp(self.min.y, self.max.y),
            point.z.clamp(self.min.z, self.max.z),
        )
    }

    /// Sphere/box overlap test (touching counts as intersecting)
    pub fn intersects_sphere(&self, sphere: &BoundingSphere) -> bool {
        let closest = self.closest_point(sphere.center);
        (closest - sphere.center).magnitude_squared() <= sphere.radius * sphere.radius
    }
}

/// A bounding sphere for collision detection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    /// The center position of the sphere in world space
    pub center: Vec3,
    /// The radius of the sphere
    pub radius: f32,
}

impl BoundingSphere {
    /// Creates a new bounding sphere with the given center and radius
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Check if this sphere intersects with another
    pub fn intersects(&self, other: &BoundingSphere) -> bool {
        let distance_squared = (self.center - other.center).magnitude_squared();
        let radius_sum = self.radius + other.radius;
        distance_squared <= radius_sum * radius_sum
    }

    /// Check whether a point lies strictly inside the sphere
    pub fn contains_point(&self, point: Vec3) -> bool {
        (point - self.center).magnitude_squared() < self.radius * self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Aabb {
        Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_sphere_box_separated() {
        let sphere = BoundingSphere::new(Vec3::new(3.0, 0.0, 0.0), 0.5);
        assert!(!unit_box().intersects_sphere(&sphere));
    }

    #[test]
    fn test_sphere_box_touching_face() {
        let sphere = BoundingSphere::new(Vec3::new(1.5, 0.0, 0.0), 0.5);
        assert!(unit_box().intersects_sphere(&sphere));
    }

    #[test]
    fn test_sphere_near_corner_misses() {
        // Inside the face slabs' bounding box but outside the rounded corner
        let sphere = BoundingSphere::new(Vec3::new(1.4, 0.0, 1.4), 0.5);
        assert!(!unit_box().intersects_sphere(&sphere));
    }

    #[test]
    fn test_sphere_center_inside_box() {
        let sphere = BoundingSphere::new(Vec3::zeros(), 0.1);
        assert!(unit_box().intersects_sphere(&sphere));
    }

    #[test]
    fn test_validity() {
        assert!(unit_box().is_valid());
        assert!(Aabb::new(Vec3::zeros(), Vec3::new(1.0, 0.0, 1.0)).is_valid());
        assert!(!Aabb::new(Vec3::new(1.0, 0.0, 0.0), Vec3::zeros()).is_valid());
        assert!(!Aabb::new(Vec3::new(f32::NAN, 0.0, 0.0), Vec3::zeros()).is_valid());
    }

    #[test]
    fn test_from_center_size() {
        let aabb = Aabb::from_center_size(Vec3::new(15.0, 5.0, -15.0), Vec3::new(3.0, 10.0, 3.0));
        assert_eq!(aabb.min, Vec3::new(13.5, 0.0, -16.5));
        assert_eq!(aabb.max, Vec3::new(16.5, 10.0, -13.5));
    }

    #[test]
    fn test_sphere_sphere() {
        let a = BoundingSphere::new(Vec3::zeros(), 5.0);
        let b = BoundingSphere::new(Vec3::new(8.0, 0.0, 0.0), 5.0);
        assert!(a.intersects(&b));
        assert!(!a.contains_point(Vec3::new(5.0, 0.0, 0.0)));
    }
}
