//! Input management system
//!
//! Raw device events are folded into an [`InputState`] snapshot once per
//! frame. Gameplay code only ever reads snapshots, pulled through an
//! [`InputSource`].

use crate::foundation::math::{constants, Vec3};
use std::collections::{HashMap, HashSet};

/// Radians of camera orbit per pixel of mouse drag
pub const DRAG_SENSITIVITY: f32 = 0.005;

/// Camera pitch limit (radians, symmetric)
pub const PITCH_LIMIT: f32 = constants::PI / 3.0;

/// Key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A key
    A,
    /// D key
    D,
    /// F key
    F,
    /// S key
    S,
    /// W key
    W,
    /// Space key
    Space,
    /// Enter key
    Enter,
    /// Escape key
    Escape,
    /// Left shift
    LeftShift,
    /// Right shift
    RightShift,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
}

/// Mouse buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button
    Middle,
}

/// Gameplay action a key can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    /// Move toward -Z
    Forward,
    /// Move toward +Z
    Back,
    /// Move toward -X
    Left,
    /// Move toward +X
    Right,
    /// Run modifier
    Run,
    /// Jump
    Jump,
    /// Attack
    Attack,
}

/// Per-frame input snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputState {
    /// Forward held
    pub forward: bool,
    /// Back held
    pub back: bool,
    /// Left held
    pub left: bool,
    /// Right held
    pub right: bool,
    /// Run modifier held
    pub run: bool,
    /// Jump held
    pub jump: bool,
    /// Attack held
    pub attack: bool,
    /// Camera orbit yaw (radians)
    pub camera_yaw: f32,
    /// Camera orbit pitch (radians, clamped to ±[`PITCH_LIMIT`])
    pub camera_pitch: f32,
}

impl InputState {
    /// Snapshot with only forward held
    pub fn forward() -> Self {
        Self { forward: true, ..Self::default() }
    }

    /// Raw world-space movement intent on the XZ plane (not normalized).
    ///
    /// Forward is -Z, right is +X. Opposing keys cancel.
    pub fn movement_intent(&self) -> Vec3 {
        let mut intent = Vec3::zeros();
        if self.forward {
            intent.z -= 1.0;
        }
        if self.back {
            intent.z += 1.0;
        }
        if self.left {
            intent.x -= 1.0;
        }
        if self.right {
            intent.x += 1.0;
        }
        intent
    }

    /// Whether any movement key produces a non-zero intent
    pub fn has_movement(&self) -> bool {
        self.movement_intent().norm_squared() > 0.0
    }

    /// Set or clear the flag for an action
    pub fn set_action(&mut self, action: InputAction, held: bool) {
        match action {
            InputAction::Forward => self.forward = held,
            InputAction::Back => self.back = held,
            InputAction::Left => self.left = held,
            InputAction::Right => self.right = held,
            InputAction::Run => self.run = held,
            InputAction::Jump => self.jump = held,
            InputAction::Attack => self.attack = held,
        }
    }
}

/// Key → action table
#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings: HashMap<KeyCode, InputAction>,
}

impl KeyBindings {
    /// Empty binding table
    pub fn empty() -> Self {
        Self { bindings: HashMap::new() }
    }

    /// Bind a key (builder style); rebinding replaces the old action
    pub fn with(mut self, key: KeyCode, action: InputAction) -> Self {
        self.bindings.insert(key, action);
        self
    }

    /// Action bound to a key
    pub fn action_for(&self, key: KeyCode) -> Option<InputAction> {
        self.bindings.get(&key).copied()
    }
}

impl Default for KeyBindings {
    /// WASD/arrows, shift to run, space to jump, F to attack
    fn default() -> Self {
        Self::empty()
            .with(KeyCode::W, InputAction::Forward)
            .with(KeyCode::Up, InputAction::Forward)
            .with(KeyCode::S, InputAction::Back)
            .with(KeyCode::Down, InputAction::Back)
            .with(KeyCode::A, InputAction::Left)
            .with(KeyCode::Left, InputAction::Left)
            .with(KeyCode::D, InputAction::Right)
            .with(KeyCode::Right, InputAction::Right)
            .with(KeyCode::LeftShift, InputAction::Run)
            .with(KeyCode::RightShift, InputAction::Run)
            .with(KeyCode::Space, InputAction::Jump)
            .with(KeyCode::F, InputAction::Attack)
    }
}

/// Anything that can hand the simulation a per-frame input snapshot
pub trait InputSource {
    /// Snapshot for the current frame
    fn input_state(&mut self) -> InputState;
}

/// Input manager folding key and mouse events into an [`InputState`]
#[derive(Debug, Clone, Default)]
pub struct InputManager {
    bindings: KeyBindings,
    held_keys: HashSet<KeyCode>,
    dragging: bool,
    last_cursor: Option<(f64, f64)>,
    yaw: f32,
    pitch: f32,
}

impl InputManager {
    /// Create a manager with the default bindings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a manager with custom bindings
    pub fn with_bindings(bindings: KeyBindings) -> Self {
        Self { bindings, ..Self::default() }
    }

    /// Handle key input
    pub fn handle_key_input(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            self.held_keys.insert(key);
        } else {
            self.held_keys.remove(&key);
        }
    }

    /// Handle mouse button input; any button starts an orbit drag
    pub fn handle_mouse_button(&mut self, _button: MouseButton, pressed: bool) {
        self.dragging = pressed;
        if !pressed {
            self.last_cursor = None;
        }
    }

    /// Handle mouse movement (orbits the camera while dragging)
    pub fn handle_mouse_move(&mut self, x: f64, y: f64) {
        if self.dragging {
            if let Some((last_x, last_y)) = self.last_cursor {
                let dx = (x - last_x) as f32;
                let dy = (y - last_y) as f32;
                self.yaw += dx * DRAG_SENSITIVITY;
                self.pitch = (self.pitch - dy * DRAG_SENSITIVITY).clamp(-PITCH_LIMIT, PITCH_LIMIT);
            }
            self.last_cursor = Some((x, y));
        }
    }

    /// Whether a key is currently held
    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.held_keys.contains(&key)
    }

    /// Release everything (focus loss, pause)
    pub fn reset(&mut self) {
        self.held_keys.clear();
        self.dragging = false;
        self.last_cursor = None;
    }
}

impl InputSource for InputManager {
    fn input_state(&mut self) -> InputState {
        let mut state = InputState {
            camera_yaw: self.yaw,
            camera_pitch: self.pitch,
            ..InputState::default()
        };
        for key in &self.held_keys {
            if let Some(action) = self.bindings.action_for(*key) {
                state.set_action(action, true);
            }
        }
        state
    }
}

/// Replays a fixed list of snapshots, then repeats the last one
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    frames: Vec<InputState>,
    cursor: usize,
}

impl ScriptedInput {
    /// Create from a frame list
    pub fn new(frames: Vec<InputState>) -> Self {
        Self { frames, cursor: 0 }
    }

    /// Append `count` copies of a snapshot (builder style)
    pub fn hold(mut self, state: InputState, count: usize) -> Self {
        self.frames.extend(std::iter::repeat(state).take(count));
        self
    }

    /// Number of scripted frames not yet consumed
    pub fn remaining(&self) -> usize {
        self.frames.len().saturating_sub(self.cursor)
    }
}

impl InputSource for ScriptedInput {
    fn input_state(&mut self) -> InputState {
        let state = self
            .frames
            .get(self.cursor)
            .or_else(|| self.frames.last())
            .copied()
            .unwrap_or_default();
        self.cursor = (self.cursor + 1).min(self.frames.len());
        state
    }
}
