//! # Chrono Engine
//!
//! Headless simulation layer used by the Chrono Shards game.
//!
//! ## Features
//!
//! - **Collision**: static AABB registry with sphere queries and an
//!   axis-snapped slide response
//! - **Animation**: two-layer cross-fade mixer over named clips
//! - **Scene contract**: renderer-facing [`scene::SceneGraph`] trait plus an
//!   in-memory implementation for headless runs
//! - **Assets**: poll-based model loading contract
//! - **Input**: per-frame input snapshots and key bindings
//! - **Config**: TOML/RON configuration files
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono_engine::prelude::*;
//!
//! let mut collision = CollisionSystem::new();
//! collision.add_boundary(-10.0, 10.0, -10.0, 10.0, 10.0).unwrap();
//! assert!(!collision.check_collision(Vec3::zeros(), 0.5));
//! assert!(collision.check_collision(Vec3::new(9.8, 0.0, 0.0), 0.5));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::cast_possible_truncation
)]

pub mod animation;
pub mod assets;
pub mod config;
pub mod events;
pub mod foundation;
pub mod input;
pub mod physics;
pub mod scene;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        animation::{AnimationClip, AnimationError, AnimationEvent, Animator, BlendedPose, ClipLibrary},
        assets::{AssetError, AssetLoader, AssetRequestId, ModelAsset, ScriptedAssetLoader},
        config::{Config, ConfigError, ConfigFormat},
        events::{EventBus, EventHandler},
        foundation::{
            math::{Transform, Vec3},
            time::{Countdown, Timer},
        },
        input::{InputManager, InputSource, InputState, KeyBindings, KeyCode, MouseButton, ScriptedInput},
        physics::{Aabb, BoundingSphere, ColliderKind, CollisionError, CollisionSystem},
        scene::{NodeHandle, NodeKind, SceneGraph, SceneNode, SimpleScene},
    };
}
