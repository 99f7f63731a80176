//! Scene graph contract and a headless implementation
//!
//! The simulation never renders. It only tells the scene which objects exist,
//! where they are and whether they are visible; the renderer owns everything
//! else. [`SimpleScene`] keeps that bookkeeping in memory for headless runs
//! and tests.

use crate::foundation::math::{Transform, Vec3};
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle to a node created by a [`SceneGraph`]
    pub struct NodeHandle;
}

/// What a scene node represents, with just enough shape data for a renderer
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Empty transform group (the player root, for instance)
    Group,
    /// Axis-aligned box mesh of the given full size
    Box {
        /// Full size on each axis
        size: Vec3,
    },
    /// Sphere mesh
    Sphere {
        /// Sphere radius
        radius: f32,
    },
    /// Upright cylinder mesh
    Cylinder {
        /// Cylinder radius
        radius: f32,
        /// Cylinder height
        height: f32,
    },
    /// Upright cone mesh
    Cone {
        /// Base radius
        radius: f32,
        /// Cone height
        height: f32,
    },
    /// Flat ground plane of the given extent
    Plane {
        /// Width along X
        width: f32,
        /// Depth along Z
        depth: f32,
    },
    /// Ring/portal effect
    Ring {
        /// Inner radius
        inner_radius: f32,
        /// Outer radius
        outer_radius: f32,
    },
    /// Collectible shard mesh
    Shard {
        /// Approximate radius of the shard mesh
        radius: f32,
    },
    /// Light source
    Light {
        /// Packed 0xRRGGBB color
        color: u32,
        /// Light intensity
        intensity: f32,
    },
}

/// Description of a node handed to the scene
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    /// Debug name
    pub name: String,
    /// Shape or role of the node
    pub kind: NodeKind,
    /// Packed 0xRRGGBB base color
    pub color: u32,
    /// World transform
    pub transform: Transform,
    /// Whether the renderer should draw it
    pub visible: bool,
}

impl SceneNode {
    /// Create a visible node at the given position
    pub fn new(name: impl Into<String>, kind: NodeKind, position: Vec3) -> Self {
        Self {
            name: name.into(),
            kind,
            color: 0xFF_FF_FF,
            transform: Transform::from_position(position),
            visible: true,
        }
    }

    /// Set the base color (builder style)
    pub fn with_color(mut self, color: u32) -> Self {
        self.color = color;
        self
    }

    /// Set the full transform (builder style)
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }
}

/// Renderer-side scene the simulation talks to
pub trait SceneGraph {
    /// Add a node and return its handle
    fn add(&mut self, node: SceneNode) -> NodeHandle;

    /// Remove a node; unknown handles are ignored
    fn remove(&mut self, handle: NodeHandle);

    /// Update a node's world transform
    fn set_transform(&mut self, handle: NodeHandle, transform: Transform);

    /// Show or hide a node
    fn set_visible(&mut self, handle: NodeHandle, visible: bool);

    /// Whether the handle still refers to a live node
    fn contains(&self, handle: NodeHandle) -> bool;

    /// Number of live nodes
    fn len(&self) -> usize;

    /// Whether the scene holds no nodes
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory scene used for headless simulation
#[derive(Debug, Default)]
pub struct SimpleScene {
    nodes: SlotMap<NodeHandle, SceneNode>,
}

impl SimpleScene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a node
    pub fn get(&self, handle: NodeHandle) -> Option<&SceneNode> {
        self.nodes.get(handle)
    }

    /// Iterate over live nodes
    pub fn iter(&self) -> impl Iterator<Item = (NodeHandle, &SceneNode)> {
        self.nodes.iter()
    }

    /// Count live nodes whose name starts with `prefix`
    pub fn count_named(&self, prefix: &str) -> usize {
        self.nodes.values().filter(|n| n.name.starts_with(prefix)).count()
    }
}

impl SceneGraph for SimpleScene {
    fn add(&mut self, node: SceneNode) -> NodeHandle {
        self.nodes.insert(node)
    }

    fn remove(&mut self, handle: NodeHandle) {
        if self.nodes.remove(handle).is_none() {
            log::trace!("Ignoring removal of stale node {:?}", handle);
        }
    }

    fn set_transform(&mut self, handle: NodeHandle, transform: Transform) {
        if let Some(node) = self.nodes.get_mut(handle) {
            node.transform = transform;
        }
    }

    fn set_visible(&mut self, handle: NodeHandle, visible: bool) {
        if let Some(node) = self.nodes.get_mut(handle) {
            node.visible = visible;
        }
    }

    fn contains(&self, handle: NodeHandle) -> bool {
        self.nodes.contains_key(handle)
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }
}
