//! Session state machine
//!
//! ```text
//! Menu ──StartGame──▶ Playing ◀──Resume/TogglePause──▶ Paused
//!  ▲                    │  ▲                              │
//!  │                    │  └──────CloseSettings───┐       │
//!  │              OpenSettings                 Settings ◀─┘
//!  │                    │                         │
//!  └──ReturnToMenu──────┴──── last level done ──▶ End
//! ```
//!
//! [`GameStateMachine::update`] is the single gate for the simulation: the
//! level only advances while the mode is [`GameMode::Playing`].

use crate::config::GameConfig;
use crate::layout::LevelCatalog;
use crate::level::{LevelController, LevelError, LevelEvents};
use crate::player::PlayerController;
use chrono_engine::assets::{AssetLoader, AssetRequestId};
use chrono_engine::events::{EventBus, EventHandler};
use chrono_engine::foundation::math::Vec3;
use chrono_engine::input::InputState;
use chrono_engine::scene::SceneGraph;
use std::fmt;
use thiserror::Error;

/// Top-level session mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameMode {
    /// Main menu, no level loaded
    Menu,
    /// Simulation running
    Playing,
    /// Simulation suspended, level kept
    Paused,
    /// Settings screen
    Settings,
    /// Every level completed
    End,
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Menu => "menu",
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::Settings => "settings",
            Self::End => "end",
        };
        f.write_str(name)
    }
}

/// Commands coming from the menu/HUD layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiCommand {
    /// Start a new run at level 1
    StartGame,
    /// Pause a running level
    Pause,
    /// Resume a paused level
    Resume,
    /// Escape key: pause or resume
    TogglePause,
    /// Open the settings screen
    OpenSettings,
    /// Leave the settings screen
    CloseSettings,
    /// Abandon the run and go back to the main menu
    ReturnToMenu,
}

/// Notifications for the UI/HUD layer
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// The session mode changed
    ModeChanged(GameMode),
    /// A level finished loading
    LevelLoaded {
        /// 1-based level index
        index: u32,
        /// Display name
        name: String,
        /// Shards to collect
        shards: usize,
    },
    /// A shard was picked up
    ShardCollected {
        /// 1-based level index
        level: u32,
        /// Shards collected so far
        collected: usize,
        /// Shards in the level
        total: usize,
    },
    /// The last shard of a level was picked up
    AllShardsCollected {
        /// 1-based level index
        level: u32,
    },
    /// A level finished and the next one is about to load
    LevelComplete {
        /// 1-based level index
        level: u32,
    },
    /// The final level finished
    GameComplete,
}

/// Session errors
#[derive(Error, Debug)]
pub enum GameError {
    /// The command is not valid in the current mode
    #[error("cannot {command:?} while in {mode}")]
    InvalidTransition {
        /// Rejected command
        command: UiCommand,
        /// Mode at the time
        mode: GameMode,
    },

    /// A level could not be built
    #[error(transparent)]
    Level(#[from] LevelError),
}

/// Per-level overlay system (a minimap, for instance)
pub trait Overlay {
    /// A level was loaded
    fn attach(&mut self, level: &LevelController);

    /// Called every simulated frame
    fn update(&mut self, player_position: Vec3);

    /// The run ended or was abandoned
    fn teardown(&mut self);
}

/// The game session
pub struct GameStateMachine<S: SceneGraph, L: AssetLoader> {
    config: GameConfig,
    catalog: LevelCatalog,
    scene: S,
    loader: L,
    mode: GameMode,
    level_index: u32,
    level: Option<LevelController>,
    player: Option<PlayerController>,
    model_request: Option<AssetRequestId>,
    events: EventBus<GameEvent>,
    overlays: Vec<Box<dyn Overlay>>,
}

impl<S: SceneGraph, L: AssetLoader> GameStateMachine<S, L> {
    /// Create a session in the main menu
    pub fn new(config: GameConfig, catalog: LevelCatalog, scene: S, loader: L) -> Self {
        Self {
            config,
            catalog,
            scene,
            loader,
            mode: GameMode::Menu,
            level_index: 0,
            level: None,
            player: None,
            model_request: None,
            events: EventBus::new(),
            overlays: Vec::new(),
        }
    }

    /// Apply a UI command
    pub fn handle_command(&mut self, command: UiCommand) -> Result<(), GameError> {
        match (command, self.mode) {
            (UiCommand::StartGame, GameMode::Menu | GameMode::End) => self.start_game(),
            (UiCommand::Pause | UiCommand::TogglePause, GameMode::Playing) => {
                self.set_mode(GameMode::Paused);
                Ok(())
            }
            (UiCommand::Resume | UiCommand::TogglePause, GameMode::Paused) => {
                self.set_mode(GameMode::Playing);
                Ok(())
            }
            (UiCommand::OpenSettings, GameMode::Menu | GameMode::Playing | GameMode::Paused) => {
                self.set_mode(GameMode::Settings);
                Ok(())
            }
            (UiCommand::CloseSettings, GameMode::Settings) => {
                let back = if self.level.is_some() { GameMode::Playing } else { GameMode::Menu };
                self.set_mode(back);
                Ok(())
            }
            (UiCommand::ReturnToMenu, _) => {
                self.return_to_menu();
                Ok(())
            }
            _ => {
                log::warn!("Rejected {:?} in {}", command, self.mode);
                Err(GameError::InvalidTransition { command, mode: self.mode })
            }
        }
    }

    /// Advance the session by one frame (no-op unless playing)
    pub fn update(&mut self, delta_time: f32, input: &InputState) -> Result<(), GameError> {
        if self.mode != GameMode::Playing {
            return Ok(());
        }
        self.poll_assets();

        let Some(level) = self.level.as_mut() else {
            return Ok(());
        };
        let events = level.update(delta_time, input, &mut self.scene);

        let position = level.player().position();
        for overlay in &mut self.overlays {
            overlay.update(position);
        }

        if events.contains(LevelEvents::SHARD_COLLECTED) {
            self.events.send(GameEvent::ShardCollected {
                level: level.index(),
                collected: level.collected_count(),
                total: level.total_shards(),
            });
        }
        if events.contains(LevelEvents::ALL_COLLECTED) {
            self.events.send(GameEvent::AllShardsCollected { level: level.index() });
        }
        if events.contains(LevelEvents::COMPLETE) {
            self.events.send(GameEvent::LevelComplete { level: level.index() });
            self.advance_level()?;
        }
        Ok(())
    }

    fn start_game(&mut self) -> Result<(), GameError> {
        self.unload_level();
        if self.player.is_none() {
            self.player = Some(PlayerController::new(&self.config));
            let request = self.loader.load(&self.config.assets.character_model);
            self.model_request = Some(request);
        }
        self.level_index = 1;
        log::info!("Starting new game");
        self.load_level(self.level_index)
    }

    fn advance_level(&mut self) -> Result<(), GameError> {
        self.unload_level();
        self.level_index += 1;
        if self.catalog.get(self.level_index).is_some() {
            self.load_level(self.level_index)
        } else {
            log::info!("All levels complete");
            for overlay in &mut self.overlays {
                overlay.teardown();
            }
            self.events.send(GameEvent::GameComplete);
            self.set_mode(GameMode::End);
            Ok(())
        }
    }

    fn load_level(&mut self, index: u32) -> Result<(), GameError> {
        let Some(layout) = self.catalog.get(index) else {
            self.set_mode(GameMode::End);
            return Ok(());
        };

        match LevelController::load(index, layout, &self.config, &mut self.scene, &mut self.player) {
            Ok(level) => {
                for overlay in &mut self.overlays {
                    overlay.attach(&level);
                }
                self.events.send(GameEvent::LevelLoaded {
                    index,
                    name: level.name().to_string(),
                    shards: level.total_shards(),
                });
                self.level = Some(level);
                self.set_mode(GameMode::Playing);
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to load level {}: {}", index, e);
                self.return_to_menu();
                Err(e.into())
            }
        }
    }

    fn unload_level(&mut self) {
        if let Some(level) = self.level.take() {
            self.player = Some(level.dispose(&mut self.scene));
        }
    }

    fn return_to_menu(&mut self) {
        self.unload_level();
        for overlay in &mut self.overlays {
            overlay.teardown();
        }
        self.level_index = 0;
        self.set_mode(GameMode::Menu);
    }

    fn set_mode(&mut self, mode: GameMode) {
        if self.mode != mode {
            log::info!("Game state: {} -> {}", self.mode, mode);
            self.mode = mode;
            self.events.send(GameEvent::ModeChanged(mode));
        }
    }

    fn poll_assets(&mut self) {
        for (id, result) in self.loader.poll() {
            if Some(id) != self.model_request {
                log::debug!("Ignoring unrequested asset {:?}", id);
                continue;
            }
            self.model_request = None;
            if let Some(player) = self.player_mut() {
                player.on_asset_loaded(result);
            }
        }
    }

    fn player_mut(&mut self) -> Option<&mut PlayerController> {
        match self.level.as_mut() {
            Some(level) => Some(level.player_mut()),
            None => self.player.as_mut(),
        }
    }

    /// The player, wherever it currently lives
    pub fn player(&self) -> Option<&PlayerController> {
        self.level.as_ref().map(LevelController::player).or(self.player.as_ref())
    }

    /// Register an overlay system
    pub fn add_overlay(&mut self, overlay: Box<dyn Overlay>) {
        self.overlays.push(overlay);
    }

    /// Register a HUD event handler
    pub fn register_handler(&mut self, handler: Box<dyn EventHandler<GameEvent>>) {
        self.events.register_handler(handler);
    }

    /// Deliver queued events; returns those no handler consumed
    pub fn dispatch_events(&mut self) -> Vec<GameEvent> {
        self.events.dispatch()
    }

    /// Current mode
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// Current 1-based level index (0 when no run is active)
    pub fn level_index(&self) -> u32 {
        self.level_index
    }

    /// Active level
    pub fn level(&self) -> Option<&LevelController> {
        self.level.as_ref()
    }

    /// Renderer-side scene
    pub fn scene(&self) -> &S {
        &self.scene
    }

    /// Asset loader
    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Session configuration
    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LevelLayout;
    use chrono_engine::assets::ScriptedAssetLoader;
    use chrono_engine::scene::SimpleScene;

    fn session() -> GameStateMachine<SimpleScene, ScriptedAssetLoader> {
        let layout = LevelLayout {
            shards: vec![Vec3::new(0.0, 1.0, -6.0)],
            ..LevelLayout::default()
        };
        GameStateMachine::new(
            GameConfig::default(),
            LevelCatalog::new(vec![layout]),
            SimpleScene::new(),
            ScriptedAssetLoader::new(1),
        )
    }

    #[test]
    fn test_starts_in_menu_without_level() {
        let game = session();
        assert_eq!(game.mode(), GameMode::Menu);
        assert!(game.level().is_none());
        assert!(game.player().is_none());
    }

    #[test]
    fn test_pause_and_resume() {
        let mut game = session();
        game.handle_command(UiCommand::StartGame).unwrap();
        assert_eq!(game.mode(), GameMode::Playing);

        game.handle_command(UiCommand::TogglePause).unwrap();
        assert_eq!(game.mode(), GameMode::Paused);
        game.handle_command(UiCommand::Resume).unwrap();
        assert_eq!(game.mode(), GameMode::Playing);
        game.handle_command(UiCommand::Pause).unwrap();
        game.handle_command(UiCommand::TogglePause).unwrap();
        assert_eq!(game.mode(), GameMode::Playing);
    }

    #[test]
    fn test_invalid_commands_leave_state_untouched() {
        let mut game = session();
        let err = game.handle_command(UiCommand::Resume).unwrap_err();
        assert!(matches!(
            err,
            GameError::InvalidTransition { command: UiCommand::Resume, mode: GameMode::Menu }
        ));
        assert!(game.handle_command(UiCommand::CloseSettings).is_err());
        assert_eq!(game.mode(), GameMode::Menu);

        game.handle_command(UiCommand::StartGame).unwrap();
        assert!(game.handle_command(UiCommand::StartGame).is_err());
        assert_eq!(game.mode(), GameMode::Playing);
    }

    #[test]
    fn test_settings_returns_to_where_it_makes_sense() {
        let mut game = session();
        game.handle_command(UiCommand::OpenSettings).unwrap();
        game.handle_command(UiCommand::CloseSettings).unwrap();
        assert_eq!(game.mode(), GameMode::Menu);

        game.handle_command(UiCommand::StartGame).unwrap();
        game.handle_command(UiCommand::Pause).unwrap();
        game.handle_command(UiCommand::OpenSettings).unwrap();
        assert_eq!(game.mode(), GameMode::Settings);
        game.handle_command(UiCommand::CloseSettings).unwrap();
        assert_eq!(game.mode(), GameMode::Playing);
    }

    #[test]
    fn test_update_is_gated_on_playing() {
        let mut game = session();
        game.handle_command(UiCommand::StartGame).unwrap();
        game.handle_command(UiCommand::Pause).unwrap();

        for _ in 0..30 {
            game.update(1.0 / 30.0, &InputState::forward()).unwrap();
        }
        assert_eq!(game.player().unwrap().position(), Vec3::zeros());

        game.handle_command(UiCommand::Resume).unwrap();
        game.update(0.25, &InputState::forward()).unwrap();
        assert!(game.player().unwrap().position().z < 0.0);
    }

    #[test]
    fn test_return_to_menu_resets_session() {
        let mut game = session();
        game.handle_command(UiCommand::StartGame).unwrap();
        game.handle_command(UiCommand::ReturnToMenu).unwrap();

        assert_eq!(game.mode(), GameMode::Menu);
        assert!(game.level().is_none());
        assert_eq!(game.level_index(), 0);
        // Only the persistent player node survives
        assert_eq!(game.scene().len(), 1);
        assert!(game.player().is_some());
    }

    #[test]
    fn test_mode_changes_are_published() {
        let mut game = session();
        game.handle_command(UiCommand::StartGame).unwrap();
        game.handle_command(UiCommand::Pause).unwrap();

        let events = game.dispatch_events();
        let modes: Vec<GameMode> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::ModeChanged(mode) => Some(*mode),
                _ => None,
            })
            .collect();
        assert_eq!(modes, vec![GameMode::Playing, GameMode::Paused]);
        assert!(events.iter().any(|e| matches!(e, GameEvent::LevelLoaded { index: 1, .. })));
    }

    #[test]
    fn test_empty_layout_fails_back_to_menu() {
        let mut game = GameStateMachine::new(
            GameConfig::default(),
            LevelCatalog::new(vec![LevelLayout::default()]),
            SimpleScene::new(),
            ScriptedAssetLoader::new(1),
        );
        let err = game.handle_command(UiCommand::StartGame).unwrap_err();
        assert!(matches!(err, GameError::Level(LevelError::NoShards(1))));
        assert_eq!(game.mode(), GameMode::Menu);
        assert!(game.player().is_some());
    }
}
