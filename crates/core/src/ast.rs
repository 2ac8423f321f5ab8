//! AST produced by the parser, before macro expansion.
//!
//! `REPEAT` and `SPEED` survive here as tree nodes; [`crate::expand`]
//! flattens them into [`crate::model::PoseEntry`] sequences.

use crate::error::Position;
use crate::model::Vector3;

// ──────────────────────────────────────────────
// Poses
// ──────────────────────────────────────────────

/// One hand: pose id plus its three arm rotations.
#[derive(Debug, Clone, PartialEq)]
pub struct RawHand {
    pub pose: String,
    pub arm: [Vector3; 3],
}

/// A bare `{right}-{left}` pose literal.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPose {
    pub right: RawHand,
    pub left: RawHand,
    pub pos: Position,
}

// ──────────────────────────────────────────────
// Pose list items
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum PoseNode {
    Pose(RawPose),
    /// `REPEAT(count, body)`
    Repeat {
        count: u32,
        body: Vec<PoseNode>,
        pos: Position,
    },
    /// `SPEED(speed, body)`
    Speed {
        speed: u32,
        body: Vec<PoseNode>,
        pos: Position,
    },
}

impl PoseNode {
    pub fn pos(&self) -> Position {
        match self {
            PoseNode::Pose(p) => p.pos,
            PoseNode::Repeat { pos, .. } | PoseNode::Speed { pos, .. } => *pos,
        }
    }
}

// ──────────────────────────────────────────────
// Animations
// ──────────────────────────────────────────────

/// `(NAME) poseList .`
#[derive(Debug, Clone, PartialEq)]
pub struct RawAnimation {
    pub name: String,
    pub body: Vec<PoseNode>,
    pub pos: Position,
}
