//! Pipeline configuration, loaded from `signscript.toml`.
//!
//! # Example
//!
//! ```toml
//! [compile]
//! max_poses = 100000
//!
//! [format]
//! indent_width = 4
//!
//! [output]
//! vector_style = "quoted"
//! indent_width = 4
//!
//! [records]
//! min_script_len = 55
//! index_min_script_len = 50
//! idle_preamble = true
//! ```
//!
//! Every key is optional.

use std::path::Path;

use serde::{Deserialize, Serialize};
use signscript_core::{CompileOptions, FormatOptions, SerializeOptions};

use crate::error::RecordsError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub compile: CompileOptions,
    pub format: FormatOptions,
    pub output: SerializeOptions,
    pub records: RecordsConfig,
}

/// `[records]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RecordsConfig {
    /// Scripts shorter than this are not compiled.
    pub min_script_len: usize,
    /// Scripts must be strictly longer than this to be listed in the index.
    pub index_min_script_len: usize,
    /// Start the database script with the built-in IDLE animation.
    pub idle_preamble: bool,
}

impl Default for RecordsConfig {
    fn default() -> Self {
        RecordsConfig {
            min_script_len: 55,
            index_min_script_len: 50,
            idle_preamble: true,
        }
    }
}

impl PipelineConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, RecordsError> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: &Path) -> Result<Self, RecordsError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signscript_core::VectorStyle;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = PipelineConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, PipelineConfig::default());
        assert_eq!(cfg.records.min_script_len, 55);
        assert_eq!(cfg.format.indent_width, 4);
        assert_eq!(cfg.output.vector_style, VectorStyle::Inline);
        assert_eq!(cfg.compile.max_poses, 100_000);
    }

    #[test]
    fn compile_section_sets_pose_limit() {
        let cfg = PipelineConfig::from_toml_str("[compile]\nmax_poses = 12\n").unwrap();
        assert_eq!(cfg.compile.max_poses, 12);
        assert_eq!(cfg.records, RecordsConfig::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = PipelineConfig::from_toml_str(
            "[output]\nvector_style = \"quoted\"\n\n[records]\nidle_preamble = false\n",
        )
        .unwrap();
        assert_eq!(cfg.output.vector_style, VectorStyle::Quoted);
        assert_eq!(cfg.output.indent_width, 4);
        assert!(!cfg.records.idle_preamble);
        assert_eq!(cfg.records.index_min_script_len, 50);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(
            PipelineConfig::from_toml_str("[records]\nmin_len = 3\n"),
            Err(RecordsError::Config(_))
        ));
    }
}
