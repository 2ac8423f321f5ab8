//! Macro expansion: REPEAT/SPEED trees into flat pose sequences.
//!
//! `REPEAT(n, L)` concatenates `n` owned copies of the expansion of `L`.
//! `SPEED(n, L)` stamps speed `n` on every pose inside `L`; the innermost
//! SPEED around a pose decides its speed, nothing accumulates.

use crate::ast::{PoseNode, RawAnimation, RawPose};
use crate::error::{ExpansionError, Position};
use crate::model::{AnimationEntry, CompiledDocument, PoseEntry, DEFAULT_SPEED};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileOptions {
    /// Upper bound on the number of poses in one compiled document.
    pub max_poses: usize,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions { max_poses: 100_000 }
    }
}

/// Expand every animation. The pose limit applies to the document as a
/// whole and is checked before anything is allocated.
pub fn expand_document(
    animations: &[RawAnimation],
    opts: &CompileOptions,
) -> Result<CompiledDocument, ExpansionError> {
    let mut remaining = opts.max_poses;
    let mut out = Vec::with_capacity(animations.len());
    for anim in animations {
        let entry = expand_within(anim, remaining, opts.max_poses)?;
        remaining -= entry.poses.len();
        out.push(entry);
    }
    Ok(CompiledDocument { animations: out })
}

pub fn expand_animation(
    anim: &RawAnimation,
    opts: &CompileOptions,
) -> Result<AnimationEntry, ExpansionError> {
    expand_within(anim, opts.max_poses, opts.max_poses)
}

fn expand_within(
    anim: &RawAnimation,
    budget: usize,
    limit: usize,
) -> Result<AnimationEntry, ExpansionError> {
    let total = measure(&anim.body, budget).map_err(|pos| ExpansionError { limit, pos })?;
    let mut poses = Vec::with_capacity(total);
    expand_into(&anim.body, None, &mut poses);
    tracing::debug!(
        name = %anim.name,
        line = anim.pos.line,
        poses = poses.len(),
        "expanded animation"
    );
    Ok(AnimationEntry {
        name: anim.name.clone(),
        poses,
    })
}

/// Number of poses `nodes` expands to, or the position of the node at
/// which the count passes `budget` (or overflows).
fn measure(nodes: &[PoseNode], budget: usize) -> Result<usize, Position> {
    let mut total: usize = 0;
    for node in nodes {
        let n = match node {
            PoseNode::Pose(_) => 1,
            PoseNode::Speed { body, .. } => measure(body, budget)?,
            PoseNode::Repeat { count, body, pos } => measure(body, budget)?
                .checked_mul(*count as usize)
                .filter(|n| *n <= budget)
                .ok_or(*pos)?,
        };
        total = total
            .checked_add(n)
            .filter(|t| *t <= budget)
            .ok_or_else(|| node.pos())?;
    }
    Ok(total)
}

/// Append the expansion of `nodes` to `out`. `speed` is the speed of the
/// nearest enclosing SPEED block, if any. Callers bound the size with
/// [`measure`] first.
fn expand_into(nodes: &[PoseNode], speed: Option<u32>, out: &mut Vec<PoseEntry>) {
    for node in nodes {
        match node {
            PoseNode::Pose(p) => out.push(entry(p, speed.unwrap_or(DEFAULT_SPEED))),
            PoseNode::Speed { speed, body, .. } => expand_into(body, Some(*speed), out),
            PoseNode::Repeat { count, body, .. } => {
                let mut once = Vec::new();
                expand_into(body, speed, &mut once);
                if once.is_empty() {
                    continue;
                }
                for _ in 0..*count {
                    out.extend(once.iter().cloned());
                }
            }
        }
    }
}

fn entry(p: &RawPose, speed: u32) -> PoseEntry {
    PoseEntry {
        rh: p.right.pose.clone(),
        right: p.right.arm,
        lh: p.left.pose.clone(),
        left: p.left.arm,
        speed,
    }
}
