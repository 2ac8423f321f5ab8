//! `signscript build`: sheet rows -> dictionary, index, database script and
//! compiled JSON in one output directory.

use std::path::Path;
use std::process;

use signscript_records::{build, PipelineConfig, Table};

use crate::{read_source, report_error, OutputFormat};

pub(crate) const DICTIONARY_FILE: &str = "dictionary.json";
pub(crate) const INDEX_FILE: &str = "animations.json";
pub(crate) const DATABASE_FILE: &str = "database.txt";
pub(crate) const COMPILED_FILE: &str = "database.json";

pub(crate) fn cmd_build(
    rows_path: &Path,
    out_dir: &Path,
    config: &PipelineConfig,
    output: OutputFormat,
    quiet: bool,
) {
    let rows = read_source(rows_path, output, quiet);
    let table = match Table::from_json_str(&rows) {
        Ok(t) => t,
        Err(e) => {
            let msg = format!("error reading rows '{}': {}", rows_path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    let built = match build(&table, config) {
        Ok(b) => b,
        Err(e) => {
            report_error(&format!("build failed: {}", e), output, quiet);
            process::exit(1);
        }
    };

    if let Err(e) = std::fs::create_dir_all(out_dir) {
        let msg = format!("error creating '{}': {}", out_dir.display(), e);
        report_error(&msg, output, quiet);
        process::exit(1);
    }
    let files = [
        (DICTIONARY_FILE, &built.dictionary),
        (INDEX_FILE, &built.index),
        (DATABASE_FILE, &built.database),
        (COMPILED_FILE, &built.compiled),
    ];
    for (name, contents) in files {
        let path = out_dir.join(name);
        let mut text = contents.clone();
        if !text.ends_with('\n') {
            text.push('\n');
        }
        if let Err(e) = std::fs::write(&path, text) {
            let msg = format!("error writing '{}': {}", path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
        tracing::debug!(path = %path.display(), "wrote artifact");
    }

    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => {
            println!(
                "built {} of {} records into {}",
                built.records_compiled,
                built.records_total,
                out_dir.display()
            );
            if !built.format_warnings.is_empty() || !built.collisions.is_empty() {
                println!(
                    "  {} format warning(s), {} duplicate name(s)",
                    built.format_warnings.len(),
                    built.collisions.len()
                );
            }
        }
        OutputFormat::Json => {
            let value = serde_json::json!({
                "records": built.records_total,
                "compiled": built.records_compiled,
                "indexed": built.index_entries.len(),
                "format_warnings": built.format_warnings.len(),
                "collisions": built.collisions.iter().map(|c| c.name.clone()).collect::<Vec<_>>(),
                "out": out_dir.display().to_string(),
            });
            let pretty = serde_json::to_string_pretty(&value)
                .unwrap_or_else(|e| format!("{{\"error\": \"serialization: {}\"}}", e));
            println!("{}", pretty);
        }
    }
}
