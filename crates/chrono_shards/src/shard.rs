//! Collectible time shards

use crate::config::ShardConfig;
use chrono_engine::foundation::math::{Transform, Vec3};
use chrono_engine::scene::{NodeHandle, NodeKind, SceneGraph, SceneNode};

/// Shard mesh radius (visual only)
pub const SHARD_MESH_RADIUS: f32 = 0.5;

/// Shard base color
pub const SHARD_COLOR: u32 = 0x00_FF_FF;

/// Shard lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShardState {
    /// Waiting to be picked up
    Active,
    /// Picked up (terminal)
    Collected,
}

/// A single collectible shard
#[derive(Debug, Clone)]
pub struct ShardEntity {
    position: Vec3,
    trigger_radius: f32,
    state: ShardState,
    bob_amplitude: f32,
    bob_frequency: f32,
    spin_speed: f32,
    display: Transform,
    node: Option<NodeHandle>,
}

impl ShardEntity {
    /// Create an active shard at a fixed position
    pub fn new(position: Vec3, config: &ShardConfig) -> Self {
        Self {
            position,
            trigger_radius: config.trigger_radius,
            state: ShardState::Active,
            bob_amplitude: config.bob_amplitude,
            bob_frequency: config.bob_frequency,
            spin_speed: config.spin_speed,
            display: Transform::from_position(position),
            node: None,
        }
    }

    /// Create the shard's scene node
    pub fn spawn(&mut self, scene: &mut dyn SceneGraph, index: usize) -> NodeHandle {
        let node = SceneNode::new(
            format!("shard_{index}"),
            NodeKind::Shard { radius: SHARD_MESH_RADIUS },
            self.position,
        )
        .with_color(SHARD_COLOR);
        let handle = scene.add(node);
        self.node = Some(handle);
        handle
    }

    /// Cosmetic bob and spin at absolute time `time` (seconds)
    pub fn update(&mut self, time: f32, scene: &mut dyn SceneGraph) {
        if self.state == ShardState::Collected {
            return;
        }
        let bob = (time * self.bob_frequency).sin() * self.bob_amplitude;
        self.display = Transform::from_position_yaw(
            self.position + Vec3::new(0.0, bob, 0.0),
            time * self.spin_speed,
        );
        if let Some(handle) = self.node {
            scene.set_transform(handle, self.display);
        }
    }

    /// Proximity trigger.
    ///
    /// Returns true exactly once: on the call that moves the shard from
    /// active to collected. Collected shards are inert.
    pub fn check_collision(&mut self, player_position: Vec3, scene: &mut dyn SceneGraph) -> bool {
        if self.state == ShardState::Collected {
            return false;
        }

        let distance = (player_position - self.position).norm();
        if distance < self.trigger_radius {
            self.state = ShardState::Collected;
            if let Some(handle) = self.node {
                scene.set_visible(handle, false);
            }
            log::info!("Shard at {:?} collected (distance {:.2})", self.position, distance);
            return true;
        }
        false
    }

    /// Remove the shard's node from the scene
    pub fn dispose(&mut self, scene: &mut dyn SceneGraph) {
        if let Some(handle) = self.node.take() {
            scene.remove(handle);
        }
    }

    /// Fixed base position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Current state
    pub fn state(&self) -> ShardState {
        self.state
    }

    /// Whether the shard has been picked up
    pub fn is_collected(&self) -> bool {
        self.state == ShardState::Collected
    }

    /// Pickup distance
    pub fn trigger_radius(&self) -> f32 {
        self.trigger_radius
    }

    /// Cosmetic transform (bobbing and spinning)
    pub fn display_transform(&self) -> Transform {
        self.display
    }

    /// Scene node, while spawned
    pub fn node(&self) -> Option<NodeHandle> {
        self.node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono_engine::scene::SimpleScene;

    fn spawned(position: Vec3) -> (ShardEntity, SimpleScene) {
        let mut scene = SimpleScene::new();
        let mut shard = ShardEntity::new(position, &ShardConfig::default());
        shard.spawn(&mut scene, 0);
        (shard, scene)
    }

    #[test]
    fn test_collects_inside_trigger_radius() {
        let (mut shard, mut scene) = spawned(Vec3::new(5.0, 1.0, 0.0));
        assert!(!shard.check_collision(Vec3::new(0.0, 0.0, 0.0), &mut scene));
        assert_eq!(shard.state(), ShardState::Active);

        assert!(shard.check_collision(Vec3::new(3.5, 0.0, 0.0), &mut scene));
        assert!(shard.is_collected());
        let node = scene.get(shard.node().unwrap()).unwrap();
        assert!(!node.visible);
    }

    #[test]
    fn test_collected_shard_is_inert() {
        let (mut shard, mut scene) = spawned(Vec3::zeros());
        assert!(shard.check_collision(Vec3::zeros(), &mut scene));
        for _ in 0..3 {
            assert!(!shard.check_collision(Vec3::zeros(), &mut scene));
        }
        assert_eq!(shard.state(), ShardState::Collected);

        let before = shard.display_transform();
        shard.update(10.0, &mut scene);
        assert_eq!(shard.display_transform(), before);
    }

    #[test]
    fn test_boundary_distance_does_not_trigger() {
        let (mut shard, mut scene) = spawned(Vec3::zeros());
        assert!(!shard.check_collision(Vec3::new(2.5, 0.0, 0.0), &mut scene));
    }

    #[test]
    fn test_bob_is_cosmetic() {
        let (mut shard, mut scene) = spawned(Vec3::new(0.0, 1.0, 0.0));
        let quarter_period = std::f32::consts::FRAC_PI_2 / 3.0;
        shard.update(quarter_period, &mut scene);

        assert_relative_eq!(shard.display_transform().position.y, 1.2, epsilon = 1e-5);
        assert_eq!(shard.position(), Vec3::new(0.0, 1.0, 0.0));
        let node = scene.get(shard.node().unwrap()).unwrap();
        assert_relative_eq!(node.transform.position.y, 1.2, epsilon = 1e-5);
    }

    #[test]
    fn test_dispose_removes_node() {
        let (mut shard, mut scene) = spawned(Vec3::zeros());
        shard.dispose(&mut scene);
        assert!(scene.is_empty());
        assert!(shard.node().is_none());
    }
}
