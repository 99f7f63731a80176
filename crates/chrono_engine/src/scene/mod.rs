//! Scene management contract
//!
//! ```text
//! Simulation (levels, player, shards)
//!      ↓  add / remove / set_transform / set_visible
//! SceneGraph (renderer-owned)
//! ```
//!
//! The simulation only holds [`NodeHandle`]s; a renderer implements
//! [`SceneGraph`] and decides how nodes are drawn.

mod scene_graph;

pub use scene_graph::{NodeHandle, NodeKind, SceneGraph, SceneNode, SimpleScene};
