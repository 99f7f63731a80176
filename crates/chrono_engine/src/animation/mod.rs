//! Animation playback
//!
//! [`Animator`] is a two-layer cross-fade mixer over named clips. It knows
//! nothing about gameplay states; games map their own states onto clip names.

mod animator;
mod clip;

pub use animator::{AnimationError, AnimationEvent, Animator, BlendedPose, PlaybackState, PoseLayer};
pub use clip::{AnimationClip, ClipLibrary};
