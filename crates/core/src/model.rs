//! Compiled data model: the flat, macro-free records handed to the
//! serializer and to consumers.

use std::collections::BTreeMap;

/// Three components of an arm rotation. The compiler does not interpret
/// units; the animation host reads them as scaled degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const ZERO: Vector3 = Vector3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Vector3 { x, y, z }
    }

    pub fn components(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

/// One keyframe: a hand-pose id and three arm rotations per side.
#[derive(Debug, Clone, PartialEq)]
pub struct PoseEntry {
    /// Right-hand pose asset id (`RH`).
    pub rh: String,
    /// Right arm rotations (`R1`..`R3`).
    pub right: [Vector3; 3],
    /// Left-hand pose asset id (`LH`).
    pub lh: String,
    /// Left arm rotations (`L1`..`L3`).
    pub left: [Vector3; 3],
    /// Playback speed multiplier, always >= 1.
    pub speed: u32,
}

pub const DEFAULT_SPEED: u32 = 1;

#[derive(Debug, Clone, PartialEq)]
pub struct AnimationEntry {
    pub name: String,
    pub poses: Vec<PoseEntry>,
}

/// Every animation of one compiled script, in source order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompiledDocument {
    pub animations: Vec<AnimationEntry>,
}

/// An animation name that appears more than once. `indices` are positions
/// in [`CompiledDocument::animations`], ascending; the last one wins in
/// the keyed view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameCollision {
    pub name: String,
    pub indices: Vec<usize>,
}

/// Name-keyed projection of a document.
#[derive(Debug, Clone)]
pub struct NamedView<'a> {
    pub map: BTreeMap<&'a str, &'a AnimationEntry>,
    pub collisions: Vec<NameCollision>,
}

impl CompiledDocument {
    pub fn len(&self) -> usize {
        self.animations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }

    pub fn pose_count(&self) -> usize {
        self.animations.iter().map(|a| a.poses.len()).sum()
    }

    /// Project into a name-keyed view. Duplicate names resolve
    /// last-write-wins and are listed in `collisions`; the ordered list
    /// itself is never touched.
    pub fn by_name(&self) -> NamedView<'_> {
        let mut map = BTreeMap::new();
        let mut seen: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
        for (i, anim) in self.animations.iter().enumerate() {
            map.insert(anim.name.as_str(), anim);
            seen.entry(anim.name.as_str()).or_default().push(i);
        }
        let collisions = seen
            .into_iter()
            .filter(|(_, idx)| idx.len() > 1)
            .map(|(name, indices)| NameCollision {
                name: name.to_owned(),
                indices,
            })
            .collect();
        NamedView { map, collisions }
    }
}
