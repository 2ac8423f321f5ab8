use signscript_core::CompileError;

/// All errors that can be returned by the records pipeline.
#[derive(Debug, thiserror::Error)]
pub enum RecordsError {
    /// The header row lacks one of the required columns.
    #[error("missing column '{column}' in header row")]
    MissingColumn { column: String },

    /// A data row is shorter than the columns it must provide.
    #[error("row {row} has {len} cells, column '{column}' needs at least {needed}")]
    RaggedRow {
        row: usize,
        len: usize,
        column: String,
        needed: usize,
    },

    /// The table has no header row at all.
    #[error("table is empty")]
    EmptyTable,

    /// The generated database script did not compile.
    #[error("database script failed to compile: {0}")]
    Compile(#[from] CompileError),

    #[error("invalid table JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
