//! Cross-fading clip mixer
//!
//! The active clip fades in while every previously active clip fades out in
//! proportion. Re-targeting mid-fade folds the whole current blend into the
//! fading-out set, so layer weights always sum to one. All fade bookkeeping
//! is explicit state advanced by [`Animator::update`]; nothing is callback
//! driven.

use crate::animation::clip::{AnimationClip, ClipLibrary};
use crate::foundation::math::utils;
use thiserror::Error;

/// Animation playback errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnimationError {
    /// The requested clip is not in the library
    #[error("animation clip '{0}' not found")]
    MissingClip(String),
}

/// Mixer playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// Nothing has been played yet
    Stopped,
    /// One clip at full weight
    Playing,
    /// Blending from the previous clip into the active one
    Crossfading,
}

/// Notification produced by [`Animator::update`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnimationEvent {
    /// A non-looping clip reached its last frame
    Finished {
        /// Name of the finished clip
        clip: String,
    },
}

/// One weighted clip sample in a blended pose
#[derive(Debug, Clone, PartialEq)]
pub struct PoseLayer {
    /// Clip name
    pub clip: String,
    /// Playback time in seconds
    pub time: f32,
    /// Blend weight in `[0, 1]`
    pub weight: f32,
}

/// Blended pose handed to the renderer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlendedPose {
    /// Contributing layers, active clip first
    pub layers: Vec<PoseLayer>,
}

impl BlendedPose {
    /// Sum of layer weights
    pub fn total_weight(&self) -> f32 {
        self.layers.iter().map(|l| l.weight).sum()
    }

    /// Weight of a clip in this pose (0 if absent)
    pub fn weight_of(&self, clip: &str) -> f32 {
        self.layers
            .iter()
            .filter(|l| l.clip == clip)
            .map(|l| l.weight)
            .sum()
    }
}

#[derive(Debug, Clone)]
struct ActiveClip {
    clip: AnimationClip,
    time: f32,
    weight: f32,
    fade_from: f32,
    finished: bool,
}

impl ActiveClip {
    fn start(clip: AnimationClip, weight: f32) -> Self {
        Self {
            clip,
            time: 0.0,
            weight,
            fade_from: weight,
            finished: false,
        }
    }

    fn layer(&self) -> PoseLayer {
        PoseLayer {
            clip: self.clip.name.clone(),
            time: self.time,
            weight: self.weight,
        }
    }
}

/// Cross-fading animation mixer over a clip library
#[derive(Debug, Clone)]
pub struct Animator {
    library: ClipLibrary,
    current: Option<ActiveClip>,
    outgoing: Vec<ActiveClip>,
    fade_duration: f32,
    fade_elapsed: f32,
    state: PlaybackState,
}

impl Animator {
    /// Create a mixer with nothing playing
    pub fn new(library: ClipLibrary) -> Self {
        Self {
            library,
            current: None,
            outgoing: Vec::new(),
            fade_duration: 0.0,
            fade_elapsed: 0.0,
            state: PlaybackState::Stopped,
        }
    }

    /// Fade to `name` over `fade_duration` seconds.
    ///
    /// Returns `Ok(false)` without touching playback when `name` is already
    /// the active clip and still running. A finished one-shot clip is
    /// restarted. A missing clip leaves playback untouched.
    pub fn play(&mut self, name: &str, fade_duration: f32) -> Result<bool, AnimationError> {
        if let Some(current) = &self.current {
            if current.clip.name == name && !current.finished {
                return Ok(false);
            }
        }

        let clip = self
            .library
            .get(name)
            .cloned()
            .ok_or_else(|| AnimationError::MissingClip(name.to_string()))?;

        match self.current.take() {
            Some(previous) if fade_duration > 0.0 => {
                // Everything audible now fades out from its present weight
                self.outgoing.push(previous);
                self.outgoing.retain(|layer| layer.weight > 0.0);
                for layer in &mut self.outgoing {
                    layer.fade_from = layer.weight;
                }
                self.current = Some(ActiveClip::start(clip, 0.0));
                self.fade_duration = fade_duration;
                self.fade_elapsed = 0.0;
                self.state = PlaybackState::Crossfading;
            }
            _ => {
                self.outgoing.clear();
                self.current = Some(ActiveClip::start(clip, 1.0));
                self.fade_duration = 0.0;
                self.fade_elapsed = 0.0;
                self.state = PlaybackState::Playing;
            }
        }

        log::trace!("Animator -> '{}' (fade {:.2}s)", name, fade_duration);
        Ok(true)
    }

    /// Advance playback and fades (call once per frame)
    pub fn update(&mut self, delta_time: f32) -> Option<AnimationEvent> {
        let mut event = None;

        if let Some(current) = self.current.as_mut() {
            let (time, reached_end) = current.clip.advance(current.time, delta_time);
            current.time = time;
            if reached_end && !current.finished {
                current.finished = true;
                event = Some(AnimationEvent::Finished {
                    clip: current.clip.name.clone(),
                });
            }
        }

        for layer in &mut self.outgoing {
            let (time, _) = layer.clip.advance(layer.time, delta_time);
            layer.time = time;
        }

        if self.state == PlaybackState::Crossfading {
            self.fade_elapsed += delta_time;
            let fade = (self.fade_elapsed / self.fade_duration).clamp(0.0, 1.0);

            if let Some(current) = self.current.as_mut() {
                current.weight = utils::lerp(0.0, 1.0, fade);
            }
            for layer in &mut self.outgoing {
                layer.weight = utils::lerp(layer.fade_from, 0.0, fade);
            }

            if fade >= 1.0 {
                self.outgoing.clear();
                self.state = PlaybackState::Playing;
            }
        }

        event
    }

    /// Current blended pose (active clip first, then fading-out clips)
    pub fn pose(&self) -> BlendedPose {
        BlendedPose {
            layers: self
                .current
                .iter()
                .chain(self.outgoing.iter())
                .map(ActiveClip::layer)
                .collect(),
        }
    }

    /// Name of the active (incoming) clip
    pub fn current_clip(&self) -> Option<&str> {
        self.current.as_ref().map(|c| c.clip.name.as_str())
    }

    /// Whether `name` is the active clip and has not finished
    pub fn is_playing(&self, name: &str) -> bool {
        self.current
            .as_ref()
            .is_some_and(|c| c.clip.name == name && !c.finished)
    }

    /// Whether a clip exists in the library
    pub fn has_clip(&self, name: &str) -> bool {
        self.library.contains(name)
    }

    /// Current playback state
    pub fn state(&self) -> PlaybackState {
        self.state
    }
}
