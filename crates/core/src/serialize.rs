//! Compiled document -> JSON text.
//!
//! Output is indented JSON with one exception: an array whose elements
//! are all numbers (the rotation vectors) stays on a single line,
//! `[a, b, c]`. Top level is a list of single-key objects,
//! `{"<NAME>": {"name": "<NAME>", "poses": [...]}}`, in source order.

use crate::error::SerializeError;
use crate::model::{AnimationEntry, CompiledDocument, PoseEntry, Vector3};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// How rotation vectors are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VectorStyle {
    /// A JSON array of numbers on one line: `[0.28, -0.11, 0.94]`.
    #[default]
    Inline,
    /// The same text as a JSON string: `"[0.28, -0.11, 0.94]"`. This is
    /// what the animation host's rotation parser reads.
    Quoted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerializeOptions {
    pub vector_style: VectorStyle,
    pub indent_width: usize,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        SerializeOptions {
            vector_style: VectorStyle::Inline,
            indent_width: 4,
        }
    }
}

const RIGHT_KEYS: [&str; 3] = ["R1", "R2", "R3"];
const LEFT_KEYS: [&str; 3] = ["L1", "L2", "L3"];

/// Build the JSON value tree for a document. Key order inside each pose
/// is `RH, R1..R3, LH, L1..L3, speed`.
pub fn to_value(doc: &CompiledDocument, style: VectorStyle) -> Result<Value, SerializeError> {
    let mut out = Vec::with_capacity(doc.animations.len());
    for anim in &doc.animations {
        let mut wrapper = Map::new();
        wrapper.insert(anim.name.clone(), animation_value(anim, style)?);
        out.push(Value::Object(wrapper));
    }
    Ok(Value::Array(out))
}

fn animation_value(anim: &AnimationEntry, style: VectorStyle) -> Result<Value, SerializeError> {
    let poses = anim
        .poses
        .iter()
        .enumerate()
        .map(|(i, p)| pose_value(p, style).map_err(|e| e.at(&anim.name, i)))
        .collect::<Result<Vec<_>, _>>()?;
    let mut m = Map::new();
    m.insert("name".to_owned(), Value::String(anim.name.clone()));
    m.insert("poses".to_owned(), Value::Array(poses));
    Ok(Value::Object(m))
}

/// Non-finite component found while building one pose; the caller fills
/// in which animation and pose it belongs to.
struct BadComponent {
    field: &'static str,
    value: f64,
}

impl BadComponent {
    fn at(self, animation: &str, pose: usize) -> SerializeError {
        SerializeError::NonFinite {
            animation: animation.to_owned(),
            pose,
            field: self.field.to_owned(),
            value: self.value,
        }
    }
}

fn pose_value(p: &PoseEntry, style: VectorStyle) -> Result<Value, BadComponent> {
    let mut m = Map::new();
    m.insert("RH".to_owned(), Value::String(p.rh.clone()));
    for (key, v) in RIGHT_KEYS.iter().zip(&p.right) {
        m.insert((*key).to_owned(), vector_value(key, v, style)?);
    }
    m.insert("LH".to_owned(), Value::String(p.lh.clone()));
    for (key, v) in LEFT_KEYS.iter().zip(&p.left) {
        m.insert((*key).to_owned(), vector_value(key, v, style)?);
    }
    m.insert("speed".to_owned(), Value::Number(p.speed.into()));
    Ok(Value::Object(m))
}

fn vector_value(
    field: &'static str,
    v: &Vector3,
    style: VectorStyle,
) -> Result<Value, BadComponent> {
    let nums = v
        .components()
        .into_iter()
        .map(|c| {
            Number::from_f64(c)
                .map(Value::Number)
                .ok_or(BadComponent { field, value: c })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(match style {
        VectorStyle::Inline => Value::Array(nums),
        VectorStyle::Quoted => Value::String(inline_array(&nums)),
    })
}

fn inline_array(items: &[Value]) -> String {
    let parts: Vec<String> = items.iter().map(Value::to_string).collect();
    format!("[{}]", parts.join(", "))
}

/// Render a document as JSON text.
pub fn to_json_string(
    doc: &CompiledDocument,
    opts: &SerializeOptions,
) -> Result<String, SerializeError> {
    let value = to_value(doc, opts.vector_style)?;
    Ok(write_pretty(&value, opts.indent_width))
}

/// Pretty-print any JSON value, keeping arrays of plain numbers on one
/// line. Non-empty all-number arrays are the only single-line composites.
pub fn write_pretty(value: &Value, indent_width: usize) -> String {
    let mut out = String::new();
    write_value(&mut out, value, 0, indent_width);
    out
}

fn pad(out: &mut String, depth: usize, indent_width: usize) {
    out.extend(std::iter::repeat(' ').take(depth * indent_width));
}

fn write_value(out: &mut String, value: &Value, depth: usize, indent_width: usize) {
    match value {
        Value::Array(items) if items.is_empty() => out.push_str("[]"),
        Value::Array(items) if items.iter().all(Value::is_number) => {
            out.push_str(&inline_array(items));
        }
        Value::Array(items) => {
            out.push_str("[\n");
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(",\n");
                }
                pad(out, depth + 1, indent_width);
                write_value(out, item, depth + 1, indent_width);
            }
            out.push('\n');
            pad(out, depth, indent_width);
            out.push(']');
        }
        Value::Object(map) if map.is_empty() => out.push_str("{}"),
        Value::Object(map) => {
            out.push_str("{\n");
            for (i, (k, v)) in map.iter().enumerate() {
                if i > 0 {
                    out.push_str(",\n");
                }
                pad(out, depth + 1, indent_width);
                out.push_str(&Value::String(k.clone()).to_string());
                out.push_str(": ");
                write_value(out, v, depth + 1, indent_width);
            }
            out.push('\n');
            pad(out, depth, indent_width);
            out.push('}');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}
