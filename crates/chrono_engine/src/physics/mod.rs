//! Physics module for collision detection and response
//!
//! Static obstacle volumes are axis-aligned boxes; actors are spheres. There
//! is no rigid-body dynamics here, only overlap queries and a push-out hint.

pub mod collision;
pub mod collision_system;

pub use collision::{Aabb, BoundingSphere};
pub use collision_system::{
    Collider, ColliderId, ColliderKind, CollisionError, CollisionSystem, BOUNDARY_THICKNESS,
    RESPONSE_MARGIN,
};
