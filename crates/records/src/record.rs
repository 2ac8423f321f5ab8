use serde::{Deserialize, Serialize};

use crate::error::RecordsError;

/// Header names of the columns the pipeline reads.
pub const WORDS_COLUMN: &str = "Words";
pub const FACE_COLUMN: &str = "Face";
pub const SCRIPT_COLUMN: &str = "Script";

/// A rectangular table: the header row followed by data rows, as exported
/// by a spreadsheet "get all values" call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table {
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Table { rows }
    }

    /// Parse a JSON array of string arrays.
    pub fn from_json_str(s: &str) -> Result<Self, RecordsError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn header(&self) -> Option<&[String]> {
        self.rows.first().map(Vec::as_slice)
    }

    pub fn data_rows(&self) -> &[Vec<String>] {
        self.rows.get(1..).unwrap_or(&[])
    }
}

/// One cleaned spreadsheet row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Display word or phrase, as written in the sheet.
    pub name: String,
    /// Facial expression id.
    pub face: String,
    /// Raw, unformatted arm script.
    pub script: String,
    /// Animation name derived from `name`, see [`crate::arms_name`].
    pub arms: String,
}

/// Entry of the animation index consumed by the front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub name: String,
    pub arms: String,
    pub face: String,
}

impl From<&Record> for IndexEntry {
    fn from(r: &Record) -> Self {
        IndexEntry {
            name: r.name.clone(),
            arms: r.arms.clone(),
            face: r.face.clone(),
        }
    }
}
