//! Headless Chrono Shards session
//!
//! Drives a scripted run at a fixed time step: clears the training grounds,
//! looks around the next level, pauses, and returns to the menu. Pass a
//! config file (`.toml` or `.ron`) as the first argument to override defaults.

use chrono_engine::foundation::logging;
use chrono_shards::prelude::*;
use std::env;

const FIXED_DT: f32 = 1.0 / 60.0;
const MAX_FRAMES: usize = 60 * 30;

fn character_clips() -> Vec<AnimationClip> {
    vec![
        AnimationClip::looping("Idle", 2.0),
        AnimationClip::looping("Walk", 1.0),
        AnimationClip::looping("Run", 0.7),
        AnimationClip::once("Jump", 0.9),
        AnimationClip::once("Attack", 0.6),
    ]
}

fn script() -> ScriptedInput {
    let idle = InputState::default();
    let walk_right = InputState { right: true, ..InputState::default() };
    let run_forward = InputState { forward: true, run: true, ..InputState::default() };
    let jump = InputState { jump: true, ..InputState::default() };
    let attack = InputState { attack: true, ..InputState::default() };

    ScriptedInput::default()
        .hold(idle, 30)
        .hold(walk_right, 90)
        .hold(idle, 150)
        .hold(run_forward, 45)
        .hold(jump, 1)
        .hold(idle, 60)
        .hold(attack, 1)
        .hold(idle, 60)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let config = match env::args().nth(1) {
        Some(path) => GameConfig::load_from_file(&path)?,
        None => GameConfig::default(),
    };

    let catalog = LevelCatalog::builtin(config.level.layout_seed);
    log::info!("Chrono Shards: {} levels", catalog.len());

    let loader = ScriptedAssetLoader::new(20).with_model(config.assets.character_model.clone(), character_clips());
    let mut game = GameStateMachine::new(config, catalog, SimpleScene::new(), loader);
    let mut input = script();

    game.handle_command(UiCommand::StartGame)?;

    let mut timer = Timer::new();
    for _ in 0..MAX_FRAMES {
        if input.remaining() == 0 || game.mode() != GameMode::Playing {
            break;
        }
        timer.tick();
        let state = input.input_state();
        game.update(FIXED_DT, &state)?;

        for event in game.dispatch_events() {
            log::info!("Event: {:?}", event);
        }
    }

    if game.mode() == GameMode::Playing {
        game.handle_command(UiCommand::TogglePause)?;
    }
    if let Some(player) = game.player() {
        log::info!(
            "Stopped at level {} with player at {:?} ({:?})",
            game.level_index(),
            player.position(),
            player.state()
        );
    }

    log::info!(
        "Simulated {} frames ({:.1}s game time) in {:.3}s",
        timer.frame_count(),
        timer.frame_count() as f32 * FIXED_DT,
        timer.total_time()
    );

    game.handle_command(UiCommand::ReturnToMenu)?;
    for event in game.dispatch_events() {
        log::info!("Event: {:?}", event);
    }
    log::info!("Session finished in {} mode, {} scene nodes left", game.mode(), game.scene().len());
    Ok(())
}
