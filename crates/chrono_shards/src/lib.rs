//! # Chrono Shards
//!
//! Third-person collect-a-thon simulation: walk, run and jump through three
//! levels, pick up every time shard, and step through the portal to advance.
//!
//! The crate is headless. Rendering, audio and model import sit behind the
//! engine's [`SceneGraph`](chrono_engine::scene::SceneGraph) and
//! [`AssetLoader`](chrono_engine::assets::AssetLoader) contracts.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono_shards::prelude::*;
//!
//! let config = GameConfig::default();
//! let catalog = LevelCatalog::builtin(config.level.layout_seed);
//! let mut game = GameStateMachine::new(config, catalog, SimpleScene::new(), ScriptedAssetLoader::new(1));
//!
//! game.handle_command(UiCommand::StartGame).unwrap();
//! game.update(1.0 / 60.0, &InputState::forward()).unwrap();
//! assert_eq!(game.mode(), GameMode::Playing);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::cast_precision_loss
)]

pub mod animation;
pub mod camera;
pub mod config;
pub mod game;
pub mod layout;
pub mod level;
pub mod player;
pub mod shard;


/// Common imports for game hosts
pub mod prelude {
    pub use crate::{
        animation::AnimationStateDriver,
        camera::FollowCamera,
        config::GameConfig,
        game::{GameError, GameEvent, GameMode, GameStateMachine, Overlay, UiCommand},
        layout::{LevelCatalog, LevelLayout, PortalSpec},
        level::{LevelController, LevelError, LevelEvents},
        player::{LocomotionState, PlayerController},
        shard::{ShardEntity, ShardState},
    };
    pub use chrono_engine::prelude::*;
}
