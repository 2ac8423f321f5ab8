//! Row cleaning, animation-name normalization, and filtering.

use crate::error::RecordsError;
use crate::record::{IndexEntry, Record, Table, FACE_COLUMN, SCRIPT_COLUMN, WORDS_COLUMN};

fn column(header: &[String], name: &str) -> Result<usize, RecordsError> {
    header
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| RecordsError::MissingColumn {
            column: name.to_string(),
        })
}

/// Turn every data row into a [`Record`], in row order.
pub fn clean_table(table: &Table) -> Result<Vec<Record>, RecordsError> {
    let header = table.header().ok_or(RecordsError::EmptyTable)?;
    let cols = [
        (WORDS_COLUMN, column(header, WORDS_COLUMN)?),
        (FACE_COLUMN, column(header, FACE_COLUMN)?),
        (SCRIPT_COLUMN, column(header, SCRIPT_COLUMN)?),
    ];

    let mut records = Vec::with_capacity(table.data_rows().len());
    for (i, row) in table.data_rows().iter().enumerate() {
        let cell = |(name, idx): (&str, usize)| {
            row.get(idx).cloned().ok_or_else(|| RecordsError::RaggedRow {
                row: i + 1,
                len: row.len(),
                column: name.to_string(),
                needed: idx + 1,
            })
        };
        let name = cell(cols[0])?;
        records.push(Record {
            arms: arms_name(&name),
            face: cell(cols[1])?,
            script: cell(cols[2])?,
            name,
        });
    }
    Ok(records)
}

/// Characters dropped outright from animation names.
const DROPPED: &str = "!¡?¿.,;:*+-=|@#$%&/\\^~`{}\"'";

fn fold_accent(c: char) -> Option<char> {
    Some(match c {
        'á' | 'à' | 'â' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ñ' => 'n',
        _ => return None,
    })
}

/// Derive the animation name for a sheet word: lower-case, spaces to
/// underscores, punctuation removed, accents folded, then upper-cased.
///
/// Anything that still is not `[A-Za-z0-9_]` is removed as well, and a
/// leading digit gets a `_` prefix, so the result is always usable as a
/// script identifier (or empty).
pub fn arms_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.trim().to_lowercase().chars() {
        let c = match c {
            ' ' => '_',
            c if DROPPED.contains(c) => continue,
            c => fold_accent(c).unwrap_or(c),
        };
        if c.is_ascii_alphanumeric() || c == '_' {
            out.push(c.to_ascii_uppercase());
        }
    }
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

/// Keep the records whose script is long enough to hold at least one pose.
/// Records whose name normalizes to nothing are dropped too, since they
/// cannot be named in the database script.
pub fn retain_compilable(records: Vec<Record>, min_script_len: usize) -> Vec<Record> {
    records
        .into_iter()
        .filter(|r| {
            if r.script.chars().count() < min_script_len {
                return false;
            }
            if r.arms.is_empty() {
                tracing::warn!(name = %r.name, "record has no usable animation name, skipped");
                return false;
            }
            true
        })
        .collect()
}

/// Index entries for records whose script is strictly longer than
/// `min_script_len`.
pub fn animation_index(records: &[Record], min_script_len: usize) -> Vec<IndexEntry> {
    records
        .iter()
        .filter(|r| r.script.chars().count() > min_script_len)
        .map(IndexEntry::from)
        .collect()
}
