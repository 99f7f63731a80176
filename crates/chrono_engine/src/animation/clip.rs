//! Animation clip metadata
//!
//! The simulation never samples keyframes. A clip is a name, a length and a
//! loop flag; the renderer maps the blended pose back onto real skeletons.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Named animation clip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationClip {
    /// Clip name as authored in the asset
    pub name: String,
    /// Length in seconds
    pub duration: f32,
    /// Whether playback wraps around at the end
    pub looping: bool,
}

impl AnimationClip {
    /// Create a looping clip
    pub fn looping(name: impl Into<String>, duration: f32) -> Self {
        Self {
            name: name.into(),
            duration: duration.max(0.0),
            looping: true,
        }
    }

    /// Create a clip that plays once and holds its last frame
    pub fn once(name: impl Into<String>, duration: f32) -> Self {
        Self {
            name: name.into(),
            duration: duration.max(0.0),
            looping: false,
        }
    }

    /// Advance a playback time by `delta_time`, wrapping or clamping.
    ///
    /// Returns the new time and whether the clip reached its end on this step
    /// (always false for looping clips).
    pub fn advance(&self, time: f32, delta_time: f32) -> (f32, bool) {
        let next = time + delta_time;
        if self.looping {
            if self.duration > 0.0 {
                (next.rem_euclid(self.duration), false)
            } else {
                (0.0, false)
            }
        } else if next >= self.duration {
            (self.duration, true)
        } else {
            (next, false)
        }
    }
}

/// Clip table keyed by name
#[derive(Debug, Clone, Default)]
pub struct ClipLibrary {
    clips: HashMap<String, AnimationClip>,
}

impl ClipLibrary {
    /// Create an empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a clip, replacing any clip with the same name
    pub fn insert(&mut self, clip: AnimationClip) {
        if let Some(previous) = self.clips.insert(clip.name.clone(), clip) {
            log::debug!("Replaced animation clip '{}'", previous.name);
        }
    }

    /// Look up a clip
    pub fn get(&self, name: &str) -> Option<&AnimationClip> {
        self.clips.get(name)
    }

    /// Whether a clip exists
    pub fn contains(&self, name: &str) -> bool {
        self.clips.contains_key(name)
    }

    /// Number of clips
    pub fn len(&self) -> usize {
        self.clips.len()
    }

    /// Whether the library is empty
    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}

impl FromIterator<AnimationClip> for ClipLibrary {
    fn from_iter<I: IntoIterator<Item = AnimationClip>>(iter: I) -> Self {
        let mut library = Self::new();
        for clip in iter {
            library.insert(clip);
        }
        library
    }
}
