//! Locomotion state → animation clip mapping
//!
//! Wraps the engine [`Animator`] with the character's clip naming and the
//! fade lengths for each kind of transition.

use crate::config::AnimationConfig;
use crate::player::LocomotionState;
use chrono_engine::animation::{AnimationEvent, Animator, BlendedPose, ClipLibrary};
use std::collections::HashSet;

/// Drives the character's cross-fades from its locomotion state
#[derive(Debug, Clone)]
pub struct AnimationStateDriver {
    animator: Animator,
    fades: AnimationConfig,
    reported_missing: HashSet<LocomotionState>,
}

impl AnimationStateDriver {
    /// Create a driver over the clips shipped with the character model
    pub fn new(clips: ClipLibrary, fades: &AnimationConfig) -> Self {
        Self {
            animator: Animator::new(clips),
            fades: fades.clone(),
            reported_missing: HashSet::new(),
        }
    }

    /// Clip used for a state.
    ///
    /// Falling reuses the jump clip when the model has no dedicated one.
    pub fn clip_for(&self, state: LocomotionState) -> &'static str {
        match state {
            LocomotionState::Idle => "Idle",
            LocomotionState::Walk => "Walk",
            LocomotionState::Run => "Run",
            LocomotionState::Jump => "Jump",
            LocomotionState::Fall if self.animator.has_clip("Fall") => "Fall",
            LocomotionState::Fall => "Jump",
            LocomotionState::Attack => "Attack",
        }
    }

    /// Fade length when entering a state
    pub fn fade_for(&self, state: LocomotionState) -> f32 {
        match state {
            LocomotionState::Attack | LocomotionState::Jump => self.fades.action_fade,
            _ => self.fades.locomotion_fade,
        }
    }

    /// Whether the model has a clip for the state
    pub fn can_play(&self, state: LocomotionState) -> bool {
        self.animator.has_clip(self.clip_for(state))
    }

    /// Fade toward the state's clip.
    ///
    /// Returns true when a new fade started. Requesting the active clip is a
    /// no-op (only an attack restarts a finished clip); a missing clip is
    /// logged once per state and leaves the current pose playing.
    pub fn apply(&mut self, state: LocomotionState) -> bool {
        let clip = self.clip_for(state);
        if state != LocomotionState::Attack && self.animator.current_clip() == Some(clip) {
            return false;
        }
        match self.animator.play(clip, self.fade_for(state)) {
            Ok(started) => started,
            Err(e) => {
                if self.reported_missing.insert(state) {
                    log::warn!("No animation for {:?}: {}", state, e);
                }
                false
            }
        }
    }

    /// Advance the mixer; reports one-shot completions
    pub fn update(&mut self, delta_time: f32) -> Option<AnimationEvent> {
        self.animator.update(delta_time)
    }

    /// Whether the state's clip is the active, unfinished clip
    pub fn is_playing(&self, state: LocomotionState) -> bool {
        self.animator.is_playing(self.clip_for(state))
    }

    /// Name of the active clip
    pub fn current_clip(&self) -> Option<&str> {
        self.animator.current_clip()
    }

    /// Whether two clips are currently blending
    pub fn is_crossfading(&self) -> bool {
        self.animator.pose().layers.len() > 1
    }

    /// Blended pose for the renderer
    pub fn pose(&self) -> BlendedPose {
        self.animator.pose()
    }
}
