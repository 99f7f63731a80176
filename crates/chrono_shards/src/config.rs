//! Game configuration
//!
//! Every tunable of the simulation lives here. Missing fields fall back to
//! the defaults below, so a config file only needs the values it changes.

use chrono_engine::config::{Config, ConfigError};
use serde::{Deserialize, Serialize};

/// Game configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Player movement and physics
    pub player: PlayerConfig,

    /// Shard pickup behavior
    pub shard: ShardConfig,

    /// Level sequencing
    pub level: LevelConfig,

    /// Follow camera
    pub camera: CameraConfig,

    /// Animation cross-fades
    pub animation: AnimationConfig,

    /// External assets
    pub assets: AssetConfig,
}

/// Player movement and physics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Walk speed (units per second)
    pub move_speed: f32,

    /// Speed multiplier while the run modifier is held
    pub run_multiplier: f32,

    /// Initial upward velocity of a jump
    pub jump_strength: f32,

    /// Vertical acceleration (negative is down)
    pub gravity: f32,

    /// Heading interpolation rate (per second)
    pub rotation_speed: f32,

    /// Collision sphere radius
    pub radius: f32,

    /// Height of the implicit ground plane
    pub ground_height: f32,
}

/// Shard pickup behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShardConfig {
    /// Pickup distance from the shard's base position
    pub trigger_radius: f32,

    /// Cosmetic bob amplitude
    pub bob_amplitude: f32,

    /// Cosmetic bob angular frequency (radians per second)
    pub bob_frequency: f32,

    /// Cosmetic spin rate (radians per second)
    pub spin_speed: f32,
}

/// Level sequencing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// Seconds between collecting the last shard and advancing
    pub completion_delay: f32,

    /// Half-height of the boundary walls
    pub boundary_height: f32,

    /// Seed for the cosmetic randomness of the built-in layouts
    pub layout_seed: u64,
}

/// Follow camera
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Orbit distance from the player
    pub distance: f32,

    /// Height above the player
    pub height: f32,

    /// Per-frame position smoothing factor in `(0, 1]`
    pub smoothing: f32,
}

/// Animation cross-fades
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Fade for idle/walk/run/fall transitions (seconds)
    pub locomotion_fade: f32,

    /// Fade into attack and jump (seconds)
    pub action_fade: f32,
}

/// External assets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Character model location handed to the asset loader
    pub character_model: String,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            move_speed: 4.0,
            run_multiplier: 2.0,
            jump_strength: 8.0,
            gravity: -20.0,
            rotation_speed: 6.0,
            radius: 0.5,
            ground_height: 0.0,
        }
    }
}

impl Default for ShardConfig {
    fn default() -> Self {
        Self {
            trigger_radius: 2.5,
            bob_amplitude: 0.2,
            bob_frequency: 3.0,
            spin_speed: 0.6,
        }
    }
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            completion_delay: 2.0,
            boundary_height: 10.0,
            layout_seed: 0x5EED,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            distance: 6.0,
            height: 3.0,
            smoothing: 0.1,
        }
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            locomotion_fade: 0.2,
            action_fade: 0.1,
        }
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            character_model: "models/character.glb".to_string(),
        }
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be positive, got {value}"),
        })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must not be negative, got {value}"),
        })
    }
}

impl Config for GameConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.player;
        positive("player.move_speed", p.move_speed)?;
        positive("player.run_multiplier", p.run_multiplier)?;
        positive("player.jump_strength", p.jump_strength)?;
        positive("player.rotation_speed", p.rotation_speed)?;
        positive("player.radius", p.radius)?;
        if !(p.gravity.is_finite() && p.gravity < 0.0) {
            return Err(ConfigError::Invalid {
                field: "player.gravity",
                reason: format!("must be negative, got {}", p.gravity),
            });
        }

        positive("shard.trigger_radius", self.shard.trigger_radius)?;
        non_negative("shard.bob_amplitude", self.shard.bob_amplitude)?;

        non_negative("level.completion_delay", self.level.completion_delay)?;
        positive("level.boundary_height", self.level.boundary_height)?;

        positive("camera.distance", self.camera.distance)?;
        if !(self.camera.smoothing > 0.0 && self.camera.smoothing <= 1.0) {
            return Err(ConfigError::Invalid {
                field: "camera.smoothing",
                reason: format!("must be in (0, 1], got {}", self.camera.smoothing),
            });
        }

        non_negative("animation.locomotion_fade", self.animation.locomotion_fade)?;
        non_negative("animation.action_fade", self.animation.action_fade)?;

        if self.assets.character_model.is_empty() {
            return Err(ConfigError::Invalid {
                field: "assets.character_model",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
