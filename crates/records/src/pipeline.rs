//! End-to-end build: table -> dictionary, index, database script, compiled JSON.

use serde_json::{Map, Value};
use signscript_core::serialize::{to_json_string, write_pretty};
use signscript_core::{CompileError, FormatWarning, LexError, NameCollision};

use crate::clean::{animation_index, clean_table, retain_compilable};
use crate::config::PipelineConfig;
use crate::database::write_database;
use crate::error::RecordsError;
use crate::record::{IndexEntry, Record, Table};

#[derive(Debug, Clone)]
pub struct BuildOutput {
    /// Every cleaned record, keyed by data-row number (`"0"`, `"1"`, ...).
    pub dictionary: String,
    /// JSON list of [`IndexEntry`].
    pub index: String,
    pub index_entries: Vec<IndexEntry>,
    /// Canonical database script.
    pub database: String,
    /// Compiled JSON of `database`.
    pub compiled: String,
    pub records_total: usize,
    pub records_compiled: usize,
    pub lex_errors: Vec<LexError>,
    pub format_warnings: Vec<(String, FormatWarning)>,
    pub collisions: Vec<NameCollision>,
}

/// Dictionary JSON for all records, in row order.
pub fn dictionary_json(records: &[Record], indent_width: usize) -> Result<String, RecordsError> {
    let mut map = Map::new();
    for (i, r) in records.iter().enumerate() {
        map.insert(i.to_string(), serde_json::to_value(r)?);
    }
    Ok(write_pretty(&Value::Object(map), indent_width))
}

pub fn build(table: &Table, config: &PipelineConfig) -> Result<BuildOutput, RecordsError> {
    let indent = config.output.indent_width;
    let records = clean_table(table)?;
    let records_total = records.len();
    let dictionary = dictionary_json(&records, indent)?;

    let index_entries = animation_index(&records, config.records.index_min_script_len);
    let index = write_pretty(&serde_json::to_value(&index_entries)?, indent);

    let kept = retain_compilable(records, config.records.min_script_len);
    let records_compiled = kept.len();
    let db = write_database(&kept, &config.format, config.records.idle_preamble);

    let compiled = signscript_core::compile_with(&db.text, &config.compile)?;
    let collisions = compiled.document.by_name().collisions;
    for c in &collisions {
        tracing::warn!(name = %c.name, count = c.indices.len(), "duplicate animation name");
    }
    let json = match to_json_string(&compiled.document, &config.output) {
        Ok(json) => json,
        Err(error) => {
            return Err(CompileError::Serialize {
                error,
                lex_errors: compiled.lex_errors,
            }
            .into())
        }
    };

    tracing::info!(
        records = records_total,
        compiled = records_compiled,
        indexed = index_entries.len(),
        animations = compiled.document.len(),
        "build complete"
    );

    Ok(BuildOutput {
        dictionary,
        index,
        index_entries,
        database: db.text,
        compiled: json,
        records_total,
        records_compiled,
        lex_errors: compiled.lex_errors,
        format_warnings: db.warnings,
        collisions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dictionary_is_keyed_by_row_number() {
        let r = Record {
            name: "Hola".to_owned(),
            face: "F1".to_owned(),
            script: "x".to_owned(),
            arms: "HOLA".to_owned(),
        };
        let text = dictionary_json(&[r.clone(), r], 4).unwrap();
        let v: Value = serde_json::from_str(&text).unwrap();
        let keys: Vec<_> = v.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["0", "1"]);
        let fields: Vec<_> = v["0"].as_object().unwrap().keys().cloned().collect();
        assert_eq!(fields, vec!["name", "face", "script", "arms"]);
    }

    #[test]
    fn build_fails_on_broken_script() {
        let body = "{R_P1,[0.00,0.00,0.00],[0.00,0.00,0.00],[0.00,0.00,0.00]}-";
        let table = Table::new(vec![
            vec!["Words".into(), "Face".into(), "Script".into()],
            vec!["Hola".into(), "F".into(), body.into()],
        ]);
        assert!(matches!(
            build(&table, &PipelineConfig::default()),
            Err(RecordsError::Compile(CompileError::Syntax { .. }))
        ));
    }

    #[test]
    fn build_respects_pose_limit() {
        let pose = "{R_P1,[0.00,0.00,0.00],[0.00,0.00,0.00],[0.00,0.00,0.00]}-{L_P1,[0.00,0.00,0.00],[0.00,0.00,0.00],[0.00,0.00,0.00]}";
        let table = Table::new(vec![
            vec!["Words".into(), "Face".into(), "Script".into()],
            vec!["Hola".into(), "F".into(), format!("REPEAT(4000000000,{pose})")],
        ]);
        assert!(matches!(
            build(&table, &PipelineConfig::default()),
            Err(RecordsError::Compile(CompileError::Expansion { .. }))
        ));
    }
}
