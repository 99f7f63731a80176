//! Static collision registry
//!
//! Holds the obstacle and boundary volumes of one level and answers
//! "does a sphere here touch anything" plus a cheap axis-snapped push-out
//! response. Storage is an append-only `Vec`, so iteration order is insertion
//! order and the first-hit response is reproducible run to run.
//!
//! Every query is O(#colliders); levels keep collider counts in the tens.

use crate::foundation::math::Vec3;
use crate::physics::collision::{Aabb, BoundingSphere};
use crate::scene::NodeHandle;
use thiserror::Error;

/// Extra distance added to the actor radius when pushing out of a collider
pub const RESPONSE_MARGIN: f32 = 0.1;

/// Thickness of each boundary wall
pub const BOUNDARY_THICKNESS: f32 = 1.0;

/// What a collider represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColliderKind {
    /// Volume derived from level geometry
    StaticGeometry,
    /// One of the four perimeter walls
    Boundary,
}

/// Index of a collider in insertion order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColliderId(pub usize);

/// Immutable collision volume
#[derive(Debug, Clone, PartialEq)]
pub struct Collider {
    volume: Aabb,
    kind: ColliderKind,
    owner: Option<NodeHandle>,
}

impl Collider {
    /// World-space volume
    pub fn volume(&self) -> &Aabb {
        &self.volume
    }

    /// Collider kind tag
    pub fn kind(&self) -> ColliderKind {
        self.kind
    }

    /// Scene node this collider was built from, if any
    pub fn owner(&self) -> Option<NodeHandle> {
        self.owner
    }
}

/// Collision registration errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CollisionError {
    /// A volume with min > max on some axis, or non-finite coordinates
    #[error("degenerate collider volume: min {min:?} max {max:?}")]
    DegenerateVolume {
        /// Offending minimum corner
        min: [f32; 3],
        /// Offending maximum corner
        max: [f32; 3],
    },
}

impl CollisionError {
    fn degenerate(volume: &Aabb) -> Self {
        Self::DegenerateVolume {
            min: [volume.min.x, volume.min.y, volume.min.z],
            max: [volume.max.x, volume.max.y, volume.max.z],
        }
    }
}

/// Static spatial registry of obstacle and boundary volumes
#[derive(Debug, Default, Clone)]
pub struct CollisionSystem {
    colliders: Vec<Collider>,
}

impl CollisionSystem {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a static volume without an owning node
    pub fn add_collider(&mut self, volume: Aabb, kind: ColliderKind) -> Result<ColliderId, CollisionError> {
        self.insert(volume, kind, None)
    }

    /// Register a static volume built from a scene node
    pub fn add_owned_collider(
        &mut self,
        volume: Aabb,
        kind: ColliderKind,
        owner: NodeHandle,
    ) -> Result<ColliderId, CollisionError> {
        self.insert(volume, kind, Some(owner))
    }

    fn insert(
        &mut self,
        volume: Aabb,
        kind: ColliderKind,
        owner: Option<NodeHandle>,
    ) -> Result<ColliderId, CollisionError> {
        if !volume.is_valid() {
            log::warn!("Rejecting degenerate collider {:?}", volume);
            return Err(CollisionError::degenerate(&volume));
        }
        let id = ColliderId(self.colliders.len());
        self.colliders.push(Collider { volume, kind, owner });
        log::trace!("Registered {:?} collider {:?}: {:?}", kind, id, volume);
        Ok(id)
    }

    /// Register four walls just outside the rectangle `[min_x, max_x] x [min_z, max_z]`.
    ///
    /// Walls are `BOUNDARY_THICKNESS` thick, span `[-height, height]`
    /// vertically, and the west/east walls overlap the corners so the
    /// perimeter has no gap.
    pub fn add_boundary(
        &mut self,
        min_x: f32,
        max_x: f32,
        min_z: f32,
        max_z: f32,
        height: f32,
    ) -> Result<[ColliderId; 4], CollisionError> {
        let t = BOUNDARY_THICKNESS;
        let walls = [
            // West
            Aabb::new(Vec3::new(min_x - t, -height, min_z - t), Vec3::new(min_x, height, max_z + t)),
            // East
            Aabb::new(Vec3::new(max_x, -height, min_z - t), Vec3::new(max_x + t, height, max_z + t)),
            // North
            Aabb::new(Vec3::new(min_x, -height, min_z - t), Vec3::new(max_x, height, min_z)),
            // South
            Aabb::new(Vec3::new(min_x, -height, max_z), Vec3::new(max_x, height, max_z + t)),
        ];

        // Validate all four up front so a bad rectangle never leaves a partial perimeter
        if min_x > max_x || min_z > max_z {
            return Err(CollisionError::DegenerateVolume {
                min: [min_x, -height, min_z],
                max: [max_x, height, max_z],
            });
        }
        if let Some(bad) = walls.iter().find(|wall| !wall.is_valid()) {
            return Err(CollisionError::degenerate(bad));
        }

        let [west, east, north, south] = walls;
        Ok([
            self.insert(west, ColliderKind::Boundary, None)?,
            self.insert(east, ColliderKind::Boundary, None)?,
            self.insert(north, ColliderKind::Boundary, None)?,
            self.insert(south, ColliderKind::Boundary, None)?,
        ])
    }

    /// True iff a sphere of `radius` at `position` touches any collider
    pub fn check_collision(&self, position: Vec3, radius: f32) -> bool {
        self.first_hit(position, radius).is_some()
    }

    /// First collider (insertion order) touched by the sphere
    pub fn first_hit(&self, position: Vec3, radius: f32) -> Option<(ColliderId, &Collider)> {
        let sphere = BoundingSphere::new(position, radius);
        self.colliders
            .iter()
            .enumerate()
            .find(|(_, collider)| collider.volume.intersects_sphere(&sphere))
            .map(|(index, collider)| (ColliderId(index), collider))
    }

    /// Axis-snapped push-out for a move from `previous` to `intended`.
    ///
    /// Picks the dominant horizontal axis of travel (`|dx| > |dz|` selects X,
    /// otherwise Z) and returns a vector of length `radius + RESPONSE_MARGIN`
    /// opposite the travel on that axis. Y is ignored. Returns `None` when the
    /// intended sphere touches nothing.
    pub fn collision_response(&self, intended: Vec3, previous: Vec3, radius: f32) -> Option<Vec3> {
        let (id, collider) = self.first_hit(intended, radius)?;
        let direction = intended - previous;
        let push = radius + RESPONSE_MARGIN;

        let mut response = Vec3::zeros();
        if direction.x.abs() > direction.z.abs() {
            response.x = if direction.x > 0.0 { -push } else { push };
        } else {
            response.z = if direction.z > 0.0 { -push } else { push };
        }

        log::trace!(
            "Collision with {:?} {:?} -> response {:?}",
            collider.kind,
            id,
            response
        );
        Some(response)
    }

    /// All colliders in insertion order
    pub fn colliders(&self) -> &[Collider] {
        &self.colliders
    }

    /// Number of registered colliders
    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    /// Number of boundary walls registered
    pub fn boundary_count(&self) -> usize {
        self.colliders
            .iter()
            .filter(|c| c.kind == ColliderKind::Boundary)
            .count()
    }

    /// Drop every collider (level teardown)
    pub fn clear(&mut self) {
        self.colliders.clear();
    }
}
