//! signscript-records: spreadsheet rows to a script database.
//!
//! Cleans the exported word table, derives animation names, writes the
//! canonical database script and compiles it with `signscript-core`.

pub mod clean;
pub mod config;
pub mod database;
pub mod error;
pub mod pipeline;
pub mod record;

pub use clean::{animation_index, arms_name, clean_table, retain_compilable};
pub use config::{PipelineConfig, RecordsConfig};
pub use database::{format_body, write_database, Database, IDLE_NAME, IDLE_SCRIPT};
pub use error::RecordsError;
pub use pipeline::{build, dictionary_json, BuildOutput};
pub use record::{IndexEntry, Record, Table};
