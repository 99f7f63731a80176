//! Level controller
//!
//! Builds one level from its layout, owns the level's collision world and
//! shards, and runs the per-frame sequence:
//! input → player → camera → shard scan → completion countdown.
//!
//! The player is borrowed from the session for the lifetime of the level and
//! handed back by [`LevelController::dispose`].

use crate::camera::FollowCamera;
use crate::config::GameConfig;
use crate::layout::{LevelLayout, PortalSpec};
use crate::player::PlayerController;
use crate::shard::ShardEntity;
use bitflags::bitflags;
use chrono_engine::foundation::math::Vec3;
use chrono_engine::foundation::time::Countdown;
use chrono_engine::input::InputState;
use chrono_engine::physics::{ColliderKind, CollisionError, CollisionSystem};
use chrono_engine::scene::{NodeHandle, NodeKind, SceneGraph, SceneNode};
use thiserror::Error;

bitflags! {
    /// What happened during one level update
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct LevelEvents: u8 {
        /// At least one shard was collected this frame
        const SHARD_COLLECTED = 1 << 0;
        /// The last shard was collected this frame
        const ALL_COLLECTED = 1 << 1;
        /// The post-collection delay elapsed; advance to the next level
        const COMPLETE = 1 << 2;
    }
}

/// Level construction errors
#[derive(Error, Debug)]
pub enum LevelError {
    /// A level must have something to collect
    #[error("level {0} has no shards")]
    NoShards(u32),

    /// The session had no player to hand over
    #[error("no player available for level {0}")]
    NoPlayer(u32),

    /// Level geometry was rejected by the collision system
    #[error("invalid level geometry: {0}")]
    Collision(#[from] CollisionError),
}

/// One running level
#[derive(Debug)]
pub struct LevelController {
    index: u32,
    name: String,
    collision: CollisionSystem,
    player: PlayerController,
    camera: FollowCamera,
    shards: Vec<ShardEntity>,
    nodes: Vec<NodeHandle>,
    portal_spec: PortalSpec,
    portal: Option<NodeHandle>,
    completion: Option<Countdown>,
    completion_delay: f32,
    collected: usize,
    elapsed: f32,
}

impl LevelController {
    /// Build level `index` from `layout` and adopt the session's player.
    ///
    /// The player is taken out of `player` only once the level has been
    /// built; on error it stays in the slot and no scene nodes are left
    /// behind.
    pub fn load(
        index: u32,
        layout: &LevelLayout,
        config: &GameConfig,
        scene: &mut dyn SceneGraph,
        player: &mut Option<PlayerController>,
    ) -> Result<Self, LevelError> {
        if layout.shards.is_empty() {
            return Err(LevelError::NoShards(index));
        }
        if player.is_none() {
            return Err(LevelError::NoPlayer(index));
        }

        let mut collision = CollisionSystem::new();
        if let Some(b) = layout.boundary {
            collision.add_boundary(b.min_x, b.max_x, b.min_z, b.max_z, config.level.boundary_height)?;
        }

        let mut nodes = Vec::new();
        if let Err(e) = build_environment(layout, scene, &mut collision, &mut nodes) {
            for handle in nodes {
                scene.remove(handle);
            }
            return Err(e);
        }

        let shards = layout
            .shards
            .iter()
            .enumerate()
            .map(|(i, position)| {
                let mut shard = ShardEntity::new(*position, &config.shard);
                shard.spawn(scene, i);
                shard
            })
            .collect();

        let Some(mut player) = player.take() else {
            return Err(LevelError::NoPlayer(index));
        };
        player.reset(layout.spawn);
        player.attach(scene);
        player.sync_scene(scene);

        let mut camera = FollowCamera::new(&config.camera);
        camera.snap_to(player.position(), 0.0, 0.0);

        log::info!(
            "Loaded level {} '{}': {} colliders, {} shards",
            index,
            layout.name,
            collision.len(),
            layout.shards.len()
        );

        Ok(Self {
            index,
            name: layout.name.clone(),
            collision,
            player,
            camera,
            shards,
            nodes,
            portal_spec: layout.portal,
            portal: None,
            completion: None,
            completion_delay: config.level.completion_delay,
            collected: 0,
            elapsed: 0.0,
        })
    }

    /// Advance the level by one frame
    pub fn update(&mut self, delta_time: f32, input: &InputState, scene: &mut dyn SceneGraph) -> LevelEvents {
        let mut events = LevelEvents::empty();
        self.elapsed += delta_time;

        self.player.handle_input(input, delta_time, &self.collision);
        self.player.update(delta_time);
        self.player.sync_scene(scene);

        self.camera
            .update(self.player.position(), input.camera_yaw, input.camera_pitch);

        if let Some(countdown) = self.completion.as_mut() {
            if countdown.tick(delta_time) {
                log::info!("Level {} complete", self.index);
                events |= LevelEvents::COMPLETE;
            }
        }

        let player_position = self.player.position();
        let total = self.shards.len();
        for shard in &mut self.shards {
            shard.update(self.elapsed, scene);
            if shard.check_collision(player_position, scene) {
                self.collected += 1;
                events |= LevelEvents::SHARD_COLLECTED;
                log::info!(
                    "Level {}: {}/{} shards",
                    self.index,
                    self.collected,
                    total
                );
            }
        }

        if events.contains(LevelEvents::SHARD_COLLECTED) && self.all_collected() && self.completion.is_none() {
            events |= LevelEvents::ALL_COLLECTED;
            self.open_portal(scene);
            self.completion = Some(Countdown::start(self.completion_delay));
        }

        events
    }

    fn open_portal(&mut self, scene: &mut dyn SceneGraph) {
        log::info!("All shards collected, opening portal");
        let node = SceneNode::new("portal", self.portal_spec.node_kind(), self.portal_spec.position)
            .with_color(0x00_FF_FF);
        self.portal = Some(scene.add(node));
    }

    /// Tear the level down and hand the player back.
    ///
    /// Removes every node this level created, except the player's, and
    /// cancels a pending completion.
    pub fn dispose(mut self, scene: &mut dyn SceneGraph) -> PlayerController {
        if let Some(countdown) = self.completion.as_mut() {
            countdown.cancel();
        }
        for shard in &mut self.shards {
            shard.dispose(scene);
        }
        for handle in self.nodes.drain(..).chain(self.portal.take()) {
            scene.remove(handle);
        }
        log::debug!("Disposed level {}", self.index);
        self.player
    }

    /// 1-based level index
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shards collected so far
    pub fn collected_count(&self) -> usize {
        self.collected
    }

    /// Shards in the level
    pub fn total_shards(&self) -> usize {
        self.shards.len()
    }

    /// Whether every shard has been collected
    pub fn all_collected(&self) -> bool {
        self.collected == self.shards.len()
    }

    /// Whether the post-collection delay is still running
    pub fn completion_pending(&self) -> bool {
        self.completion.as_ref().is_some_and(Countdown::is_running)
    }

    /// Shards
    pub fn shards(&self) -> &[ShardEntity] {
        &self.shards
    }

    /// Collision world
    pub fn collision(&self) -> &CollisionSystem {
        &self.collision
    }

    /// Follow camera
    pub fn camera(&self) -> &FollowCamera {
        &self.camera
    }

    /// The adopted player
    pub fn player(&self) -> &PlayerController {
        &self.player
    }

    /// The adopted player, mutably (asset delivery)
    pub fn player_mut(&mut self) -> &mut PlayerController {
        &mut self.player
    }

    /// Portal node, once opened
    pub fn portal(&self) -> Option<NodeHandle> {
        self.portal
    }
}

fn build_environment(
    layout: &LevelLayout,
    scene: &mut dyn SceneGraph,
    collision: &mut CollisionSystem,
    nodes: &mut Vec<NodeHandle>,
) -> Result<(), LevelError> {
    let (width, depth) = layout.floor_size;
    nodes.push(scene.add(
        SceneNode::new("floor", NodeKind::Plane { width, depth }, Vec3::zeros()).with_color(layout.floor_color),
    ));

    for light in &layout.lights {
        nodes.push(scene.add(SceneNode::new(
            "light",
            NodeKind::Light { color: light.color, intensity: light.intensity },
            light.position,
        )));
    }

    for prop in &layout.props {
        let handle = scene.add(
            SceneNode::new(prop.name.clone(), prop.shape.node_kind(), prop.position).with_color(prop.color),
        );
        nodes.push(handle);
        if prop.solid {
            collision.add_owned_collider(
                prop.shape.bounds(prop.position),
                ColliderKind::StaticGeometry,
                handle,
            )?;
        }
    }
    Ok(())
}
