//! Hand-authored level layouts
//!
//! A [`LevelLayout`] is plain data: floor, boundary, props, lights, shard
//! positions, the spawn point and the exit portal. The three built-in levels live in
//! [`LevelCatalog::builtin`]; layouts can also be loaded from RON or TOML
//! files through [`Config`].

use chrono_engine::config::{Config, ConfigError};
use chrono_engine::foundation::math::Vec3;
use chrono_engine::physics::Aabb;
use chrono_engine::scene::NodeKind;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Prop geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropShape {
    /// Box of the given full size
    Box {
        /// Full size on each axis
        size: Vec3,
    },
    /// Upright cylinder
    Cylinder {
        /// Widest radius
        radius: f32,
        /// Height
        height: f32,
    },
    /// Upright cone
    Cone {
        /// Base radius
        radius: f32,
        /// Height
        height: f32,
    },
    /// Sphere
    Sphere {
        /// Radius
        radius: f32,
    },
    /// Flat decal on the ground
    Plane {
        /// Extent along X
        width: f32,
        /// Extent along Z
        depth: f32,
    },
}

impl PropShape {
    /// World-space bounds when centered at `position`
    pub fn bounds(&self, position: Vec3) -> Aabb {
        let size = match *self {
            Self::Box { size } => size,
            Self::Cylinder { radius, height } | Self::Cone { radius, height } => {
                Vec3::new(radius * 2.0, height, radius * 2.0)
            }
            Self::Sphere { radius } => Vec3::repeat(radius * 2.0),
            Self::Plane { width, depth } => Vec3::new(width, 0.0, depth),
        };
        Aabb::from_center_size(position, size)
    }

    /// Scene node kind for the renderer
    pub fn node_kind(&self) -> NodeKind {
        match *self {
            Self::Box { size } => NodeKind::Box { size },
            Self::Cylinder { radius, height } => NodeKind::Cylinder { radius, height },
            Self::Cone { radius, height } => NodeKind::Cone { radius, height },
            Self::Sphere { radius } => NodeKind::Sphere { radius },
            Self::Plane { width, depth } => NodeKind::Plane { width, depth },
        }
    }
}

/// A piece of static environment geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prop {
    /// Debug name
    pub name: String,
    /// Geometry
    pub shape: PropShape,
    /// Center position
    pub position: Vec3,
    /// Packed 0xRRGGBB color
    pub color: u32,
    /// Whether the prop blocks movement
    pub solid: bool,
}

impl Prop {
    /// Blocking prop
    pub fn solid(name: impl Into<String>, shape: PropShape, position: Vec3, color: u32) -> Self {
        Self {
            name: name.into(),
            shape,
            position,
            color,
            solid: true,
        }
    }

    /// Decorative prop the player can pass through
    pub fn decor(name: impl Into<String>, shape: PropShape, position: Vec3, color: u32) -> Self {
        Self {
            solid: false,
            ..Self::solid(name, shape, position, color)
        }
    }
}

/// Light placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightSpec {
    /// Position
    pub position: Vec3,
    /// Packed 0xRRGGBB color
    pub color: u32,
    /// Intensity
    pub intensity: f32,
}

/// Playable rectangle on the XZ plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Boundary {
    /// West edge
    pub min_x: f32,
    /// East edge
    pub max_x: f32,
    /// North edge
    pub min_z: f32,
    /// South edge
    pub max_z: f32,
}

impl Boundary {
    /// Square boundary of half-size `half`
    pub fn square(half: f32) -> Self {
        Self {
            min_x: -half,
            max_x: half,
            min_z: -half,
            max_z: half,
        }
    }
}

/// Exit ring that appears once every shard is collected
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PortalSpec {
    /// Ring center
    pub position: Vec3,
    /// Hole radius
    pub inner_radius: f32,
    /// Rim radius
    pub outer_radius: f32,
}

impl PortalSpec {
    /// Scene node kind for the renderer
    pub fn node_kind(&self) -> NodeKind {
        NodeKind::Ring {
            inner_radius: self.inner_radius,
            outer_radius: self.outer_radius,
        }
    }
}

impl Default for PortalSpec {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 2.0, 0.0),
            inner_radius: 1.5,
            outer_radius: 4.0,
        }
    }
}

/// Complete description of one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelLayout {
    /// Display name
    pub name: String,
    /// Ground plane size (width, depth)
    pub floor_size: (f32, f32),
    /// Ground plane color
    pub floor_color: u32,
    /// Walls around the playable area
    pub boundary: Option<Boundary>,
    /// Where the player starts
    pub spawn: Vec3,
    /// Static geometry
    pub props: Vec<Prop>,
    /// Lights
    pub lights: Vec<LightSpec>,
    /// Shard base positions
    pub shards: Vec<Vec3>,
    /// Exit portal
    pub portal: PortalSpec,
}

impl Default for LevelLayout {
    fn default() -> Self {
        Self {
            name: "Untitled".to_string(),
            floor_size: (20.0, 20.0),
            floor_color: 0xDD_DD_AA,
            boundary: None,
            spawn: Vec3::zeros(),
            props: Vec::new(),
            lights: Vec::new(),
            shards: Vec::new(),
            portal: PortalSpec::default(),
        }
    }
}

impl Config for LevelLayout {
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(b) = self.boundary {
            if !(b.min_x < b.max_x && b.min_z < b.max_z) {
                return Err(ConfigError::Invalid {
                    field: "boundary",
                    reason: format!("empty rectangle {b:?}"),
                });
            }
        }
        let portal = self.portal;
        if !(portal.inner_radius >= 0.0 && portal.inner_radius < portal.outer_radius) {
            return Err(ConfigError::Invalid {
                field: "portal",
                reason: format!("ring radii {} .. {}", portal.inner_radius, portal.outer_radius),
            });
        }
        if let Some(prop) = self.props.iter().find(|p| !p.shape.bounds(p.position).is_valid()) {
            return Err(ConfigError::Invalid {
                field: "props",
                reason: format!("'{}' has invalid dimensions", prop.name),
            });
        }
        Ok(())
    }
}

/// Ordered set of levels (index 1 is the first level)
#[derive(Debug, Clone, Default)]
pub struct LevelCatalog {
    layouts: Vec<LevelLayout>,
}

impl LevelCatalog {
    /// Catalog from explicit layouts
    pub fn new(layouts: Vec<LevelLayout>) -> Self {
        Self { layouts }
    }

    /// The three built-in levels.
    ///
    /// Cosmetic variation (building heights, crystal and orb placement) is
    /// drawn from `seed`, so the same seed always builds the same world.
    pub fn builtin(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::new(vec![
            training_grounds(),
            neon_city(&mut rng),
            dream_realm(&mut rng),
        ])
    }

    /// Load layouts from files, in order
    pub fn from_files<P: AsRef<Path>>(paths: &[P]) -> Result<Self, ConfigError> {
        let layouts = paths
            .iter()
            .map(|path| LevelLayout::load_from_file(path.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(layouts))
    }

    /// Layout for a 1-based level index
    pub fn get(&self, index: u32) -> Option<&LevelLayout> {
        let slot = usize::try_from(index).ok()?.checked_sub(1)?;
        self.layouts.get(slot)
    }

    /// Number of levels
    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    /// Whether there are no levels
    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }
}

fn training_grounds() -> LevelLayout {
    LevelLayout {
        name: "Training Grounds".to_string(),
        floor_size: (20.0, 20.0),
        floor_color: 0xDD_DD_AA,
        boundary: Some(Boundary::square(10.0)),
        spawn: Vec3::zeros(),
        props: Vec::new(),
        lights: vec![LightSpec {
            position: Vec3::new(5.0, 10.0, 5.0),
            color: 0xFF_FF_FF,
            intensity: 1.0,
        }],
        shards: vec![Vec3::new(5.0, 1.0, 0.0)],
        portal: PortalSpec::default(),
    }
}

fn neon_city(rng: &mut StdRng) -> LevelLayout {
    let mut props = Vec::new();

    for offset in [-20.0, -10.0, 0.0, 10.0, 20.0] {
        props.push(Prop::decor(
            "road_x",
            PropShape::Plane { width: 50.0, depth: 2.0 },
            Vec3::new(0.0, 0.01, offset),
            0x33_33_44,
        ));
        props.push(Prop::decor(
            "road_z",
            PropShape::Plane { width: 2.0, depth: 50.0 },
            Vec3::new(offset, 0.01, 0.0),
            0x33_33_44,
        ));
    }

    let buildings = [
        (-15.0, -15.0), (15.0, -15.0), (-15.0, 15.0), (15.0, 15.0),
        (-8.0, -8.0), (8.0, -8.0), (-8.0, 8.0), (8.0, 8.0),
    ];
    for (x, z) in buildings {
        let height: f32 = rng.gen_range(8.0..14.0);
        props.push(Prop::solid(
            "building",
            PropShape::Box { size: Vec3::new(3.0, height, 3.0) },
            Vec3::new(x, height / 2.0, z),
            0x44_44_66,
        ));
    }

    let platforms = [
        (Vec3::new(0.0, 3.0, 0.0), 8.0),
        (Vec3::new(-12.0, 5.0, -12.0), 6.0),
        (Vec3::new(12.0, 4.0, 12.0), 7.0),
    ];
    for (top, width) in platforms {
        props.push(Prop::solid(
            "platform",
            PropShape::Box { size: Vec3::new(width, 0.5, width) },
            top,
            0x44_44_FF,
        ));
        props.push(Prop::solid(
            "support",
            PropShape::Cylinder { radius: 0.5, height: top.y },
            Vec3::new(top.x, top.y / 2.0, top.z),
            0x88_88_FF,
        ));
    }

    props.push(Prop::solid(
        "bridge",
        PropShape::Box { size: Vec3::new(12.0, 0.3, 2.0) },
        Vec3::new(0.0, 3.0, 6.0),
        0x66_66_FF,
    ));

    for position in [Vec3::new(8.0, 1.0, -5.0), Vec3::new(-5.0, 1.0, 8.0), Vec3::new(10.0, 1.0, 10.0)] {
        props.push(Prop::solid(
            "console",
            PropShape::Box { size: Vec3::new(1.5, 1.0, 0.5) },
            position,
            0x33_33_55,
        ));
    }

    LevelLayout {
        name: "Neon City".to_string(),
        floor_size: (50.0, 50.0),
        floor_color: 0x11_11_33,
        boundary: Some(Boundary::square(25.0)),
        spawn: Vec3::new(0.0, 0.0, 15.0),
        props,
        lights: vec![
            LightSpec { position: Vec3::new(10.0, 15.0, 5.0), color: 0x44_88_FF, intensity: 1.0 },
            LightSpec { position: Vec3::new(8.0, 3.0, -5.0), color: 0x00_FF_FF, intensity: 0.8 },
            LightSpec { position: Vec3::new(-6.0, 3.0, 8.0), color: 0xFF_00_FF, intensity: 0.8 },
            LightSpec { position: Vec3::new(15.0, 4.0, 12.0), color: 0x00_FF_88, intensity: 0.8 },
        ],
        shards: vec![
            Vec3::new(15.0, 2.0, -10.0),
            Vec3::new(-12.0, 2.0, 15.0),
            Vec3::new(20.0, 2.0, 18.0),
        ],
        portal: PortalSpec::default(),
    }
}

fn dream_realm(rng: &mut StdRng) -> LevelLayout {
    let mut props = Vec::new();

    let islands = [
        (Vec3::new(0.0, 8.0, 0.0), 5.0),
        (Vec3::new(-15.0, 12.0, -10.0), 4.0),
        (Vec3::new(18.0, 10.0, 15.0), 6.0),
        (Vec3::new(12.0, 15.0, -18.0), 3.0),
        (Vec3::new(-20.0, 8.0, 12.0), 5.0),
    ];
    for (center, radius) in islands {
        props.push(Prop::solid("island", PropShape::Sphere { radius }, center, 0x88_44_AA));
        for _ in 0..3 {
            let spread = radius * 0.8;
            let crystal = Vec3::new(
                center.x + rng.gen_range(-0.5..0.5) * spread,
                center.y + radius + 0.8,
                center.z + rng.gen_range(-0.5..0.5) * spread,
            );
            props.push(Prop::solid(
                "crystal",
                PropShape::Cone { radius: 0.3, height: 1.5 },
                crystal,
                0xFF_00_FF,
            ));
        }
    }

    // Runs along Z between the islands
    props.push(Prop::solid(
        "sky_bridge",
        PropShape::Box { size: Vec3::new(1.5, 0.2, 20.0) },
        Vec3::new(0.0, 8.0, 8.0),
        0xAA_44_CC,
    ));

    for i in 0..8u8 {
        props.push(Prop::solid(
            "pillar",
            PropShape::Cylinder { radius: 0.7, height: 10.0 },
            Vec3::new(-25.0 + f32::from(i) * 7.0, 5.0, -20.0),
            0xAA_44_CC,
        ));
    }

    for _ in 0..6 {
        let orb = Vec3::new(
            rng.gen_range(-20.0..20.0),
            rng.gen_range(5.0..15.0),
            rng.gen_range(-15.0..15.0),
        );
        let color = if rng.gen_bool(0.5) { 0xFF_00_FF } else { 0x00_FF_FF };
        props.push(Prop::solid("orb", PropShape::Sphere { radius: 1.2 }, orb, color));
    }

    LevelLayout {
        name: "Dream Realm".to_string(),
        floor_size: (60.0, 60.0),
        floor_color: 0x44_00_44,
        boundary: Some(Boundary::square(30.0)),
        spawn: Vec3::zeros(),
        props,
        lights: vec![
            LightSpec { position: Vec3::new(10.0, 20.0, 5.0), color: 0xFF_44_FF, intensity: 1.0 },
            LightSpec { position: Vec3::new(15.0, 8.0, -10.0), color: 0xFF_00_FF, intensity: 0.7 },
            LightSpec { position: Vec3::new(-12.0, 10.0, 15.0), color: 0x00_FF_FF, intensity: 0.7 },
            LightSpec { position: Vec3::new(20.0, 12.0, 18.0), color: 0xFF_FF_00, intensity: 0.7 },
            LightSpec { position: Vec3::new(-18.0, 6.0, -15.0), color: 0xFF_88_00, intensity: 0.7 },
        ],
        shards: vec![
            Vec3::new(20.0, 2.0, -15.0),
            Vec3::new(-18.0, 2.0, 20.0),
            Vec3::new(25.0, 2.0, 22.0),
        ],
        // Larger and raised above the sky bridge
        portal: PortalSpec {
            position: Vec3::new(0.0, 5.0, 0.0),
            inner_radius: 2.0,
            outer_radius: 6.0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_engine::config::ConfigFormat;

    #[test]
    fn test_builtin_catalog_is_one_based() {
        let catalog = LevelCatalog::builtin(7);
        assert_eq!(catalog.len(), 3);
        assert!(catalog.get(0).is_none());
        assert_eq!(catalog.get(1).unwrap().shards.len(), 1);
        assert_eq!(catalog.get(2).unwrap().shards.len(), 3);
        assert_eq!(catalog.get(3).unwrap().name, "Dream Realm");
        assert!(catalog.get(4).is_none());
    }

    #[test]
    fn test_builtin_layouts_are_valid() {
        let catalog = LevelCatalog::builtin(7);
        for index in 1..=3 {
            assert!(catalog.get(index).unwrap().validate().is_ok(), "level {index}");
        }
    }

    #[test]
    fn test_same_seed_same_world() {
        assert_eq!(LevelCatalog::builtin(42).get(2), LevelCatalog::builtin(42).get(2));
        assert_ne!(LevelCatalog::builtin(1).get(3), LevelCatalog::builtin(2).get(3));
    }

    #[test]
    fn test_building_heights_in_range() {
        let catalog = LevelCatalog::builtin(3);
        let city = catalog.get(2).unwrap();
        let heights: Vec<f32> = city
            .props
            .iter()
            .filter(|p| p.name == "building")
            .filter_map(|p| match p.shape {
                PropShape::Box { size } => Some(size.y),
                _ => None,
            })
            .collect();
        assert_eq!(heights.len(), 8);
        assert!(heights.iter().all(|h| (8.0..14.0).contains(h)));
    }

    #[test]
    fn test_spawn_points_are_clear() {
        let catalog = LevelCatalog::builtin(11);
        for index in 1..=3 {
            let layout = catalog.get(index).unwrap();
            let blocked = layout
                .props
                .iter()
                .filter(|p| p.solid)
                .any(|p| p.shape.bounds(p.position).contains_point(layout.spawn));
            assert!(!blocked, "level {index} spawns inside geometry");
        }
    }

    #[test]
    fn test_ron_layout_roundtrip() {
        let layout = LevelCatalog::builtin(5).get(2).cloned().unwrap();
        let text = layout.to_string_with(ConfigFormat::Ron).unwrap();
        let parsed = LevelLayout::from_str_with(&text, ConfigFormat::Ron).unwrap();
        assert_eq!(parsed, layout);
    }

    #[test]
    fn test_rejects_empty_boundary() {
        let layout = LevelLayout {
            boundary: Some(Boundary { min_x: 5.0, max_x: -5.0, min_z: -5.0, max_z: 5.0 }),
            ..LevelLayout::default()
        };
        assert!(matches!(layout.validate(), Err(ConfigError::Invalid { field: "boundary", .. })));
    }

    #[test]
    fn test_rejects_inverted_portal() {
        let layout = LevelLayout {
            shards: vec![Vec3::zeros()],
            portal: PortalSpec { inner_radius: 4.0, outer_radius: 2.0, ..PortalSpec::default() },
            ..LevelLayout::default()
        };
        assert!(matches!(layout.validate(), Err(ConfigError::Invalid { field: "portal", .. })));
    }

    #[test]
    fn test_dream_realm_portal_is_larger() {
        let catalog = LevelCatalog::builtin(1);
        assert_eq!(catalog.get(1).unwrap().portal, PortalSpec::default());
        let realm = catalog.get(3).unwrap().portal;
        assert_eq!(realm.position, Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(realm.node_kind(), NodeKind::Ring { inner_radius: 2.0, outer_radius: 6.0 });
    }

    #[test]
    fn test_shape_bounds() {
        let bounds = PropShape::Cylinder { radius: 0.5, height: 3.0 }.bounds(Vec3::new(0.0, 1.5, 0.0));
        assert_eq!(bounds.min, Vec3::new(-0.5, 0.0, -0.5));
        assert_eq!(bounds.max, Vec3::new(0.5, 3.0, 0.5));
    }
}
