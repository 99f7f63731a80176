//! Player character controller
//!
//! Owns the character's position and vertical velocity, turns per-frame
//! input into collision-aware movement, integrates gravity against the ground
//! plane, and drives the animation state driver once the model has loaded.
//!
//! Frame order is [`PlayerController::handle_input`] followed by
//! [`PlayerController::update`].

use crate::animation::AnimationStateDriver;
use crate::config::{AnimationConfig, GameConfig, PlayerConfig};
use chrono_engine::animation::AnimationEvent;
use chrono_engine::assets::{AssetError, ModelAsset};
use chrono_engine::foundation::math::{constants, utils, Transform, Vec3};
use chrono_engine::input::InputState;
use chrono_engine::physics::CollisionSystem;
use chrono_engine::scene::{NodeHandle, NodeKind, SceneGraph, SceneNode};
use serde::{Deserialize, Serialize};

/// Heights this close to the ground count as landed
const LANDING_EPSILON: f32 = 1e-4;

/// Upper bound on movement substeps per frame
const MAX_SUBSTEPS: f32 = 64.0;

/// Symbolic locomotion/action state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocomotionState {
    /// Standing still on the ground
    Idle,
    /// Moving at walk speed
    Walk,
    /// Moving with the run modifier
    Run,
    /// Airborne and rising
    Jump,
    /// Airborne and descending
    Fall,
    /// Playing the one-shot attack
    Attack,
}

/// The player character
#[derive(Debug)]
pub struct PlayerController {
    config: PlayerConfig,
    fades: AnimationConfig,
    position: Vec3,
    vertical_velocity: f32,
    grounded: bool,
    heading: f32,
    state: LocomotionState,
    intent: Vec3,
    running: bool,
    attack_locked: bool,
    model: Option<String>,
    animation: Option<AnimationStateDriver>,
    node: Option<NodeHandle>,
}

impl PlayerController {
    /// Create a grounded player at the origin facing -Z
    pub fn new(config: &GameConfig) -> Self {
        let ground = config.player.ground_height;
        Self {
            config: config.player.clone(),
            fades: config.animation.clone(),
            position: Vec3::new(0.0, ground, 0.0),
            vertical_velocity: 0.0,
            grounded: true,
            heading: constants::PI,
            state: LocomotionState::Idle,
            intent: Vec3::zeros(),
            running: false,
            attack_locked: false,
            model: None,
            animation: None,
            node: None,
        }
    }

    /// Move the player to a level's spawn point and clear all motion
    pub fn reset(&mut self, spawn: Vec3) {
        self.position = Vec3::new(spawn.x, self.config.ground_height, spawn.z);
        self.vertical_velocity = 0.0;
        self.grounded = true;
        self.intent = Vec3::zeros();
        self.running = false;
        self.attack_locked = false;
        self.state = LocomotionState::Idle;
        if let Some(driver) = self.animation.as_mut() {
            driver.apply(LocomotionState::Idle);
        }
        log::debug!("Player reset to {:?}", self.position);
    }

    /// Receive the character model load result.
    ///
    /// A failed load keeps the placeholder hitbox; the simulation carries on
    /// without animation.
    pub fn on_asset_loaded(&mut self, result: Result<ModelAsset, AssetError>) {
        match result {
            Ok(model) => {
                log::info!("Player model '{}' loaded with {} clips", model.uri, model.clips.len());
                self.animation = if model.clips.is_empty() {
                    None
                } else {
                    let mut driver = AnimationStateDriver::new(model.clips, &self.fades);
                    driver.apply(self.state);
                    Some(driver)
                };
                self.model = Some(model.uri);
            }
            Err(e) => {
                log::error!("Error loading player model: {}", e);
            }
        }
    }

    /// Read this frame's input and apply horizontal movement
    pub fn handle_input(&mut self, input: &InputState, delta_time: f32, collision: &CollisionSystem) {
        self.intent = Vec3::zeros();

        if self.attack_locked {
            if self.is_attack_playing() {
                self.state = LocomotionState::Attack;
                return;
            }
            self.attack_locked = false;
        }

        if input.jump && self.grounded {
            self.vertical_velocity = self.config.jump_strength;
            self.grounded = false;
            log::trace!("Jump from {:?}", self.position);
        } else if input.attack && self.can_attack() {
            self.attack_locked = true;
            self.state = LocomotionState::Attack;
            if let Some(driver) = self.animation.as_mut() {
                driver.apply(LocomotionState::Attack);
            }
            return;
        }

        let raw = input.movement_intent();
        if raw.norm_squared() > 0.0 {
            self.intent = raw.normalize();
            self.running = input.run;
            self.turn_toward_intent(delta_time);
            self.translate(delta_time, collision);
        } else {
            self.running = false;
        }

        self.state = self.resolve_state();
    }

    /// Integrate gravity and advance animation
    pub fn update(&mut self, delta_time: f32) {
        if !self.grounded {
            // Exact for constant gravity, so landing time does not depend on dt
            let gravity = self.config.gravity;
            self.position.y += self.vertical_velocity * delta_time + 0.5 * gravity * delta_time * delta_time;
            self.vertical_velocity += gravity * delta_time;

            if self.position.y <= self.config.ground_height + LANDING_EPSILON {
                self.position.y = self.config.ground_height;
                self.vertical_velocity = 0.0;
                self.grounded = true;
                log::trace!("Landed at {:?}", self.position);
            }
        }

        if let Some(driver) = self.animation.as_mut() {
            if let Some(AnimationEvent::Finished { clip }) = driver.update(delta_time) {
                if self.attack_locked && clip == driver.clip_for(LocomotionState::Attack) {
                    self.attack_locked = false;
                    log::trace!("Attack finished");
                }
            }
        }

        self.state = self.resolve_state();
        if let Some(driver) = self.animation.as_mut() {
            driver.apply(self.state);
        }
    }

    fn turn_toward_intent(&mut self, delta_time: f32) {
        let target = self.intent.x.atan2(self.intent.z);
        self.heading = utils::lerp_angle(self.heading, target, delta_time * self.config.rotation_speed);
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn translate(&mut self, delta_time: f32, collision: &CollisionSystem) {
        let speed = if self.running {
            self.config.move_speed * self.config.run_multiplier
        } else {
            self.config.move_speed
        };

        // Substeps no longer than the radius, so a long frame cannot skip a wall
        let travel = self.forward() * speed * delta_time;
        let steps = ((travel.norm() / self.config.radius).ceil().min(MAX_SUBSTEPS) as usize).max(1);
        let step = travel / steps as f32;

        for _ in 0..steps {
            if !self.advance(step, collision) {
                break;
            }
        }
    }

    /// Move by `step`; returns false once the move touched something
    fn advance(&mut self, step: Vec3, collision: &CollisionSystem) -> bool {
        let previous = self.position;
        let intended = previous + step;
        let radius = self.config.radius;

        if !collision.check_collision(intended, radius) {
            self.position = intended;
            return true;
        }

        // Slide back along the dominant axis, or stay put
        if let Some(response) = collision.collision_response(intended, previous, radius) {
            let slid = previous + response;
            if !collision.check_collision(slid, radius) {
                self.position = slid;
            }
        }
        false
    }

    fn resolve_state(&self) -> LocomotionState {
        if self.attack_locked {
            LocomotionState::Attack
        } else if !self.grounded {
            if self.vertical_velocity > 0.0 {
                LocomotionState::Jump
            } else {
                LocomotionState::Fall
            }
        } else if self.intent.norm_squared() > 0.0 {
            if self.running {
                LocomotionState::Run
            } else {
                LocomotionState::Walk
            }
        } else {
            LocomotionState::Idle
        }
    }

    fn can_attack(&self) -> bool {
        self.animation
            .as_ref()
            .is_some_and(|driver| driver.can_play(LocomotionState::Attack))
    }

    fn is_attack_playing(&self) -> bool {
        self.animation
            .as_ref()
            .is_some_and(|driver| driver.is_playing(LocomotionState::Attack))
    }

    /// Add the persistent player node to the scene if it is not there yet
    pub fn attach(&mut self, scene: &mut dyn SceneGraph) -> NodeHandle {
        match self.node {
            Some(handle) if scene.contains(handle) => handle,
            _ => {
                let node = SceneNode::new("player", NodeKind::Group, self.position)
                    .with_transform(self.transform());
                let handle = scene.add(node);
                self.node = Some(handle);
                handle
            }
        }
    }

    /// Push the current transform to the scene
    pub fn sync_scene(&self, scene: &mut dyn SceneGraph) {
        if let Some(handle) = self.node {
            scene.set_transform(handle, self.transform());
        }
    }

    /// World transform of the character root
    pub fn transform(&self) -> Transform {
        Transform::from_position_yaw(self.position, self.heading)
    }

    /// Unit facing direction on the XZ plane
    pub fn forward(&self) -> Vec3 {
        utils::yaw_direction(self.heading)
    }

    /// World position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Heading in radians (0 faces +Z)
    pub fn heading(&self) -> f32 {
        self.heading
    }

    /// Vertical velocity
    pub fn vertical_velocity(&self) -> f32 {
        self.vertical_velocity
    }

    /// Whether the player stands on the ground plane
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// Current locomotion/action state
    pub fn state(&self) -> LocomotionState {
        self.state
    }

    /// Normalized movement intent of the last handled frame
    pub fn intent(&self) -> Vec3 {
        self.intent
    }

    /// Whether an attack is locking out movement
    pub fn is_attack_locked(&self) -> bool {
        self.attack_locked
    }

    /// Collision sphere radius
    pub fn radius(&self) -> f32 {
        self.config.radius
    }

    /// Whether the character model has arrived
    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    /// Animation driver, once the model has loaded with clips
    pub fn animation(&self) -> Option<&AnimationStateDriver> {
        self.animation.as_ref()
    }

    /// Scene node of the character root
    pub fn node(&self) -> Option<NodeHandle> {
        self.node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono_engine::animation::{AnimationClip, ClipLibrary};
    use chrono_engine::physics::Aabb;
    use chrono_engine::scene::SimpleScene;

    fn player() -> PlayerController {
        PlayerController::new(&GameConfig::default())
    }

    fn character() -> ModelAsset {
        let clips: ClipLibrary = vec![
            AnimationClip::looping("Idle", 2.0),
            AnimationClip::looping("Walk", 1.0),
            AnimationClip::looping("Run", 0.8),
            AnimationClip::once("Jump", 0.9),
            AnimationClip::once("Attack", 0.6),
        ]
        .into_iter()
        .collect();
        ModelAsset::new("models/character.glb", clips)
    }

    fn step(player: &mut PlayerController, input: &InputState, dt: f32, collision: &CollisionSystem) {
        player.handle_input(input, dt, collision);
        player.update(dt);
    }

    #[test]
    fn test_forward_for_one_second_walks_four_units() {
        let collision = CollisionSystem::new();
        let mut player = player();
        step(&mut player, &InputState::forward(), 1.0, &collision);

        assert_relative_eq!(player.position(), Vec3::new(0.0, 0.0, -4.0), epsilon = 1e-4);
        assert_eq!(player.state(), LocomotionState::Walk);
    }

    #[test]
    fn test_forward_over_many_frames() {
        let collision = CollisionSystem::new();
        let mut player = player();
        for _ in 0..60 {
            step(&mut player, &InputState::forward(), 1.0 / 60.0, &collision);
        }
        assert_relative_eq!(player.position(), Vec3::new(0.0, 0.0, -4.0), epsilon = 1e-3);
    }

    #[test]
    fn test_run_doubles_speed() {
        let collision = CollisionSystem::new();
        let mut player = player();
        let input = InputState { run: true, ..InputState::forward() };
        step(&mut player, &input, 0.5, &collision);

        assert_relative_eq!(player.position().z, -4.0, epsilon = 1e-4);
        assert_eq!(player.state(), LocomotionState::Run);
    }

    #[test]
    fn test_heading_turns_gradually() {
        let collision = CollisionSystem::new();
        let mut player = player();
        let right = InputState { right: true, ..InputState::default() };
        step(&mut player, &right, 1.0 / 60.0, &collision);

        // One frame covers a tenth of the 90 degree turn toward +X
        let turned = utils::wrap_angle(player.heading() - constants::PI).abs();
        assert_relative_eq!(turned, constants::HALF_PI * 0.1, epsilon = 1e-4);

        for _ in 0..120 {
            step(&mut player, &right, 1.0 / 60.0, &collision);
        }
        assert_relative_eq!(player.forward(), Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-3);
    }

    /// Steps a jump at `dt` and returns (landing time, peak height)
    fn jump_flight(player: &mut PlayerController, dt: f32) -> (f32, f32) {
        let collision = CollisionSystem::new();
        let mut input = InputState { jump: true, ..InputState::default() };
        let mut time = 0.0;
        let mut peak: f32 = 0.0;
        loop {
            step(player, &input, dt, &collision);
            input = InputState::default();
            time += dt;
            peak = peak.max(player.position().y);
            if player.is_grounded() {
                return (time, peak);
            }
            assert!(time < 1.0, "never landed");
        }
    }

    #[test]
    fn test_jump_lands_after_expected_time() {
        let mut player = player();
        // Airborne time is 2 * 8 / 20 = 0.8s
        let (time, peak) = jump_flight(&mut player, 0.01);

        assert!((0.8 - 1e-3..=0.81 + 1e-3).contains(&time), "landed at t={time}");
        assert_relative_eq!(peak, 1.6, epsilon = 1e-3);
        assert_relative_eq!(player.position().y, 0.0);
        assert_relative_eq!(player.vertical_velocity(), 0.0);
        assert_eq!(player.state(), LocomotionState::Idle);
    }

    #[test]
    fn test_jump_flight_time_holds_at_coarse_steps() {
        for dt in [0.1, 0.05, 1.0 / 30.0] {
            let mut player = player();
            let (time, peak) = jump_flight(&mut player, dt);
            assert!(time >= 0.8 - 1e-4, "dt={dt}: landed early at t={time}");
            assert!(time < 0.8 + dt, "dt={dt}: landed late at t={time}");
            assert!(peak <= 1.6 + 1e-4);
        }

        // With dt = 0.1 the eighth frame lands exactly on the ground
        let mut player = player();
        let (time, _) = jump_flight(&mut player, 0.1);
        assert_relative_eq!(time, 0.8, epsilon = 1e-4);
        assert_relative_eq!(player.position().y, 0.0);
    }

    #[test]
    fn test_descent_reports_fall() {
        let collision = CollisionSystem::new();
        let mut player = player();
        step(&mut player, &InputState { jump: true, ..InputState::default() }, 0.01, &collision);
        assert!(!player.is_grounded());
        assert_eq!(player.state(), LocomotionState::Jump);
        for _ in 0..50 {
            step(&mut player, &InputState::default(), 0.01, &collision);
        }
        assert!(player.vertical_velocity() < 0.0);
        assert_eq!(player.state(), LocomotionState::Fall);
    }

    #[test]
    fn test_wall_blocks_movement() {
        let mut collision = CollisionSystem::new();
        collision
            .add_collider(
                Aabb::new(Vec3::new(-5.0, 0.0, -3.0), Vec3::new(5.0, 4.0, -2.0)),
                chrono_engine::physics::ColliderKind::StaticGeometry,
            )
            .unwrap();

        let mut player = player();
        for _ in 0..120 {
            step(&mut player, &InputState::forward(), 1.0 / 60.0, &collision);
            assert!(!collision.check_collision(player.position(), player.radius()));
        }
        assert!(player.position().z > -2.0);
    }

    #[test]
    fn test_long_frame_stops_at_wall() {
        let mut collision = CollisionSystem::new();
        collision
            .add_collider(
                Aabb::new(Vec3::new(-5.0, 0.0, -3.0), Vec3::new(5.0, 4.0, -2.0)),
                chrono_engine::physics::ColliderKind::StaticGeometry,
            )
            .unwrap();

        let mut player = player();
        step(&mut player, &InputState::forward(), 1.0, &collision);
        assert!(player.position().z > -2.0, "passed through wall to {:?}", player.position());
        assert!(!collision.check_collision(player.position(), player.radius()));
    }

    #[test]
    fn test_long_frame_stays_inside_boundary() {
        let mut collision = CollisionSystem::new();
        collision.add_boundary(-22.0, 22.0, -22.0, 22.0, 10.0).unwrap();

        let mut player = player();
        player.reset(Vec3::new(0.0, 0.0, 19.0));
        let back = InputState { back: true, run: true, ..InputState::default() };
        step(&mut player, &back, 1.0, &collision);

        let p = player.position();
        assert!(p.z > 19.0 && p.z < 22.0, "escaped to {p:?}");
        assert!(!collision.check_collision(p, player.radius()));

        // Holding the input keeps the player inside
        for _ in 0..5 {
            step(&mut player, &back, 1.0, &collision);
            assert!(player.position().z < 22.0);
        }
    }

    #[test]
    fn test_boundary_containment() {
        let mut collision = CollisionSystem::new();
        collision.add_boundary(-22.0, 22.0, -22.0, 22.0, 10.0).unwrap();

        let mut player = player();
        let left = InputState { left: true, run: true, ..InputState::default() };
        for _ in 0..600 {
            step(&mut player, &left, 1.0 / 60.0, &collision);
            let p = player.position();
            assert!(p.x >= -22.0 && p.x <= 22.0, "escaped to {p:?}");
        }
        assert!(player.position().x < -20.0);
    }

    #[test]
    fn test_attack_locks_movement_until_clip_finishes() {
        let collision = CollisionSystem::new();
        let mut player = player();
        player.on_asset_loaded(Ok(character()));
        let dt = 1.0 / 60.0;

        for _ in 0..10 {
            step(&mut player, &InputState::forward(), dt, &collision);
        }
        assert_eq!(player.state(), LocomotionState::Walk);

        let attack = InputState { attack: true, ..InputState::forward() };
        player.handle_input(&attack, dt, &collision);
        assert_eq!(player.state(), LocomotionState::Attack);
        assert!(player.is_attack_locked());
        player.update(dt);

        let locked_at = player.position();
        let mut frames = 1;
        while player.is_attack_locked() {
            step(&mut player, &InputState::forward(), dt, &collision);
            assert_relative_eq!(player.position(), locked_at);
            frames += 1;
            assert!(frames < 120, "attack never finished");
        }
        // 0.6s clip at 60 fps
        assert!((35..=38).contains(&frames), "attack lasted {frames} frames");

        step(&mut player, &InputState::forward(), dt, &collision);
        assert_eq!(player.state(), LocomotionState::Walk);
        assert!(player.position().z < locked_at.z);
    }

    #[test]
    fn test_attack_needs_loaded_clip() {
        let collision = CollisionSystem::new();
        let mut player = player();
        let attack = InputState { attack: true, ..InputState::forward() };
        step(&mut player, &attack, 0.1, &collision);

        assert!(!player.is_attack_locked());
        assert_eq!(player.state(), LocomotionState::Walk);
    }

    #[test]
    fn test_failed_asset_keeps_simulating() {
        let collision = CollisionSystem::new();
        let mut player = player();
        player.on_asset_loaded(Err(AssetError::NotFound("models/character.glb".to_string())));
        assert!(!player.has_model());
        assert!(player.animation().is_none());

        step(&mut player, &InputState::forward(), 0.5, &collision);
        assert_relative_eq!(player.position().z, -2.0, epsilon = 1e-4);
    }

    #[test]
    fn test_loaded_model_follows_state() {
        let collision = CollisionSystem::new();
        let mut player = player();
        player.on_asset_loaded(Ok(character()));
        assert_eq!(player.animation().and_then(|a| a.current_clip()), Some("Idle"));

        step(&mut player, &InputState::forward(), 0.1, &collision);
        assert_eq!(player.animation().and_then(|a| a.current_clip()), Some("Walk"));
    }

    #[test]
    fn test_reset_restores_grounded_invariant() {
        let collision = CollisionSystem::new();
        let mut player = player();
        step(&mut player, &InputState { jump: true, ..InputState::default() }, 0.05, &collision);
        player.reset(Vec3::new(3.0, 5.0, -2.0));

        assert!(player.is_grounded());
        assert_eq!(player.vertical_velocity(), 0.0);
        assert_eq!(player.position(), Vec3::new(3.0, 0.0, -2.0));
        assert_eq!(player.state(), LocomotionState::Idle);
    }

    #[test]
    fn test_attach_is_idempotent() {
        let mut scene = SimpleScene::new();
        let mut player = player();
        let first = player.attach(&mut scene);
        let second = player.attach(&mut scene);
        assert_eq!(first, second);
        assert_eq!(scene.len(), 1);

        scene.remove(first);
        let third = player.attach(&mut scene);
        assert_ne!(first, third);
    }
}
