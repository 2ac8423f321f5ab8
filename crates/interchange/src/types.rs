//! Typed structs for the compiled animation JSON document.

use serde::{Deserialize, Serialize};

/// One rotation vector, `[x, y, z]`.
pub type Rotation = [f64; 3];

/// One keyframe as read back from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledPose {
    /// Right-hand pose asset name.
    pub rh: String,
    /// `R1`, `R2`, `R3`.
    pub right: [Rotation; 3],
    /// Left-hand pose asset name.
    pub lh: String,
    /// `L1`, `L2`, `L3`.
    pub left: [Rotation; 3],
    pub speed: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledAnimation {
    pub name: String,
    pub poses: Vec<CompiledPose>,
}
