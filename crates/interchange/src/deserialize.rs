//! Deserialization from compiled JSON into typed structs.
//!
//! The main entry point is [`from_compiled`], which takes a
//! `&serde_json::Value` holding the top-level list and produces the
//! animations in document order.

use crate::types::*;
use serde_json::Value;
use std::fmt;

/// Errors during compiled-document deserialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterchangeError {
    /// The top level is not a list of single-key objects.
    InvalidDocument(String),
    /// An animation or pose is missing a field or has the wrong shape.
    AnimationError {
        animation: String,
        message: String,
    },
}

impl fmt::Display for InterchangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterchangeError::InvalidDocument(msg) => write!(f, "invalid document: {}", msg),
            InterchangeError::AnimationError { animation, message } => {
                write!(f, "animation '{}': {}", animation, message)
            }
        }
    }
}

impl std::error::Error for InterchangeError {}

/// Deserialize a compiled document.
pub fn from_compiled(doc: &Value) -> Result<Vec<CompiledAnimation>, InterchangeError> {
    let entries = doc.as_array().ok_or_else(|| {
        InterchangeError::InvalidDocument("top level must be an array".to_string())
    })?;

    let mut animations = Vec::with_capacity(entries.len());
    for (i, entry) in entries.iter().enumerate() {
        let obj = entry.as_object().ok_or_else(|| {
            InterchangeError::InvalidDocument(format!("entry {} is not an object", i))
        })?;
        let mut iter = obj.iter();
        let (key, body) = match (iter.next(), iter.next()) {
            (Some(kv), None) => kv,
            _ => {
                return Err(InterchangeError::InvalidDocument(format!(
                    "entry {} must have exactly one key, found {}",
                    i,
                    obj.len()
                )))
            }
        };
        animations.push(parse_animation(key, body)?);
    }
    Ok(animations)
}

fn parse_animation(key: &str, body: &Value) -> Result<CompiledAnimation, InterchangeError> {
    let err = |message: String| InterchangeError::AnimationError {
        animation: key.to_string(),
        message,
    };

    let name = body
        .get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| err("missing 'name'".to_string()))?
        .to_string();
    if name != key {
        return Err(err(format!("key does not match name '{}'", name)));
    }

    let poses_arr = body
        .get("poses")
        .and_then(|v| v.as_array())
        .ok_or_else(|| err("missing 'poses' array".to_string()))?;

    let poses = poses_arr
        .iter()
        .enumerate()
        .map(|(i, p)| parse_pose(p).map_err(|m| err(format!("pose {}: {}", i, m))))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CompiledAnimation { name, poses })
}

fn parse_pose(pose: &Value) -> Result<CompiledPose, String> {
    let text = |field: &str| -> Result<String, String> {
        pose.get(field)
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| format!("missing '{}'", field))
    };
    let rotation = |field: &str| -> Result<Rotation, String> {
        let v = pose
            .get(field)
            .ok_or_else(|| format!("missing '{}'", field))?;
        parse_rotation(v).map_err(|m| format!("'{}': {}", field, m))
    };

    let speed = pose
        .get("speed")
        .and_then(|v| v.as_u64())
        .and_then(|n| u32::try_from(n).ok())
        .filter(|n| *n >= 1)
        .ok_or_else(|| "'speed' must be a positive integer".to_string())?;

    Ok(CompiledPose {
        rh: text("RH")?,
        right: [rotation("R1")?, rotation("R2")?, rotation("R3")?],
        lh: text("LH")?,
        left: [rotation("L1")?, rotation("L2")?, rotation("L3")?],
        speed,
    })
}

fn parse_rotation(v: &Value) -> Result<Rotation, String> {
    match v {
        Value::Array(items) => {
            let nums = items
                .iter()
                .map(|n| n.as_f64().ok_or_else(|| format!("non-numeric component {}", n)))
                .collect::<Result<Vec<_>, _>>()?;
            to_rotation(&nums)
        }
        Value::String(s) => parse_vector_text(s),
        other => Err(format!("expected vector, got {}", other)),
    }
}

fn to_rotation(nums: &[f64]) -> Result<Rotation, String> {
    match nums {
        [x, y, z] => Ok([*x, *y, *z]),
        _ => Err(format!("expected 3 components, got {}", nums.len())),
    }
}

/// Parse the quoted single-line vector form, `"[a, b, c]"`.
pub fn parse_vector_text(s: &str) -> Result<Rotation, String> {
    let inner = s
        .trim()
        .strip_prefix('[')
        .and_then(|r| r.strip_suffix(']'))
        .ok_or_else(|| format!("'{}' is not a bracketed vector", s))?;
    let nums = inner
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .map_err(|_| format!("'{}' is not a number", part.trim()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    to_rotation(&nums)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pose_json(r1: Value) -> Value {
        json!({
            "RH": "R_P1", "R1": r1, "R2": [0, 0, 0], "R3": [0.0, 0.0, 0.0],
            "LH": "L_P1", "L1": "[1.0, 2.0, 3.0]", "L2": [0, 0, 0], "L3": [0, 0, 0],
            "speed": 2
        })
    }

    #[test]
    fn reads_both_vector_styles() {
        let doc = json!([{ "A": { "name": "A", "poses": [pose_json(json!([0.5, -0.25, 1]))] } }]);
        let anims = from_compiled(&doc).unwrap();
        assert_eq!(anims.len(), 1);
        let p = &anims[0].poses[0];
        assert_eq!(p.right[0], [0.5, -0.25, 1.0]);
        assert_eq!(p.left[0], [1.0, 2.0, 3.0]);
        assert_eq!(p.speed, 2);
    }

    #[test]
    fn rejects_two_component_vector() {
        let doc = json!([{ "A": { "name": "A", "poses": [pose_json(json!([0.5, 1]))] } }]);
        let err = from_compiled(&doc).unwrap_err();
        assert_eq!(
            err.to_string(),
            "animation 'A': pose 0: 'R1': expected 3 components, got 2"
        );
    }

    #[test]
    fn rejects_multi_key_entries() {
        let doc = json!([{ "A": {}, "B": {} }]);
        assert!(matches!(
            from_compiled(&doc),
            Err(InterchangeError::InvalidDocument(_))
        ));
    }

    #[test]
    fn key_must_match_name() {
        let doc = json!([{ "A": { "name": "B", "poses": [] } }]);
        assert!(from_compiled(&doc).is_err());
    }

    #[test]
    fn vector_text_parsing() {
        assert_eq!(parse_vector_text("[0.28, -0.11, 0.94]").unwrap(), [0.28, -0.11, 0.94]);
        assert!(parse_vector_text("[1, 2]").is_err());
        assert!(parse_vector_text("1, 2, 3").is_err());
        assert!(parse_vector_text("[a, 2, 3]").is_err());
    }
}
