//! Asset loading contract
//!
//! Model import happens outside the simulation. Loads are requested with
//! [`AssetLoader::load`] and their results collected with
//! [`AssetLoader::poll`] on some later frame, so consumers must treat a
//! model as optional until its result arrives.

use crate::animation::{AnimationClip, ClipLibrary};
use std::collections::HashMap;
use thiserror::Error;

/// Asset loading errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    /// Nothing exists at the requested location
    #[error("asset not found: {0}")]
    NotFound(String),

    /// The asset exists but could not be decoded
    #[error("failed to decode '{uri}': {reason}")]
    Decode {
        /// Asset location
        uri: String,
        /// Decoder message
        reason: String,
    },
}

/// Identifier of an outstanding load request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetRequestId(pub u64);

/// Skinned model as seen by the simulation: a handle plus its clips
#[derive(Debug, Clone)]
pub struct ModelAsset {
    /// Location the model was loaded from
    pub uri: String,
    /// Animation clips shipped with the model
    pub clips: ClipLibrary,
}

impl ModelAsset {
    /// Create a model description
    pub fn new(uri: impl Into<String>, clips: ClipLibrary) -> Self {
        Self {
            uri: uri.into(),
            clips,
        }
    }
}

/// Result of a completed load
pub type LoadResult = (AssetRequestId, Result<ModelAsset, AssetError>);

/// External model loader
pub trait AssetLoader {
    /// Start loading `uri`; the result arrives through [`AssetLoader::poll`]
    fn load(&mut self, uri: &str) -> AssetRequestId;

    /// Collect loads that completed since the last poll
    fn poll(&mut self) -> Vec<LoadResult>;
}

#[derive(Debug)]
struct PendingLoad {
    id: AssetRequestId,
    uri: String,
    polls_left: u32,
}

/// In-memory loader that completes each request after a fixed number of polls
#[derive(Debug, Default)]
pub struct ScriptedAssetLoader {
    catalog: HashMap<String, Result<ClipLibrary, String>>,
    pending: Vec<PendingLoad>,
    latency: u32,
    next_id: u64,
}

impl ScriptedAssetLoader {
    /// Create a loader whose requests complete on the `latency`-th poll
    pub fn new(latency: u32) -> Self {
        Self {
            latency,
            ..Self::default()
        }
    }

    /// Make a model available (builder style)
    pub fn with_model(mut self, uri: impl Into<String>, clips: Vec<AnimationClip>) -> Self {
        self.catalog.insert(uri.into(), Ok(clips.into_iter().collect()));
        self
    }

    /// Make loads of `uri` fail to decode (builder style)
    pub fn with_failure(mut self, uri: impl Into<String>, reason: impl Into<String>) -> Self {
        self.catalog.insert(uri.into(), Err(reason.into()));
        self
    }

    /// Number of requests still in flight
    pub fn in_flight(&self) -> usize {
        self.pending.len()
    }

    fn resolve(&self, uri: &str) -> Result<ModelAsset, AssetError> {
        match self.catalog.get(uri) {
            Some(Ok(clips)) => Ok(ModelAsset::new(uri, clips.clone())),
            Some(Err(reason)) => Err(AssetError::Decode {
                uri: uri.to_string(),
                reason: reason.clone(),
            }),
            None => Err(AssetError::NotFound(uri.to_string())),
        }
    }
}

impl AssetLoader for ScriptedAssetLoader {
    fn load(&mut self, uri: &str) -> AssetRequestId {
        let id = AssetRequestId(self.next_id);
        self.next_id += 1;
        log::debug!("Loading model '{}' ({:?})", uri, id);
        self.pending.push(PendingLoad {
            id,
            uri: uri.to_string(),
            polls_left: self.latency.max(1),
        });
        id
    }

    fn poll(&mut self) -> Vec<LoadResult> {
        for load in &mut self.pending {
            load.polls_left = load.polls_left.saturating_sub(1);
        }
        let (ready, waiting): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.pending).into_iter().partition(|l| l.polls_left == 0);
        self.pending = waiting;

        ready
            .into_iter()
            .map(|load| (load.id, self.resolve(&load.uri)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loader() -> ScriptedAssetLoader {
        ScriptedAssetLoader::new(2)
            .with_model(
                "models/character.glb",
                vec![AnimationClip::looping("Idle", 2.0), AnimationClip::once("Attack", 0.6)],
            )
            .with_failure("models/broken.glb", "truncated buffer")
    }

    #[test]
    fn test_load_completes_after_latency() {
        let mut loader = loader();
        let id = loader.load("models/character.glb");

        assert!(loader.poll().is_empty());
        assert_eq!(loader.in_flight(), 1);

        let done = loader.poll();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].0, id);
        let model = done[0].1.as_ref().unwrap();
        assert!(model.clips.contains("Attack"));
        assert_eq!(loader.in_flight(), 0);
    }

    #[test]
    fn test_failures_are_reported_not_panicked() {
        let mut loader = ScriptedAssetLoader::new(0)
            .with_failure("models/broken.glb", "truncated buffer");
        loader.load("models/broken.glb");
        loader.load("models/missing.glb");

        let done = loader.poll();
        assert!(matches!(done[0].1, Err(AssetError::Decode { .. })));
        assert_eq!(
            done[1].1.as_ref().unwrap_err(),
            &AssetError::NotFound("models/missing.glb".to_string())
        );
    }

    #[test]
    fn test_request_ids_are_unique() {
        let mut loader = loader();
        let a = loader.load("models/character.glb");
        let b = loader.load("models/character.glb");
        assert_ne!(a, b);
    }
}
