use serde::Serialize;
use std::fmt;

/// A position in the source text. Lines and columns are 1-based,
/// `offset` is the byte offset from the start of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
    pub offset: usize,
}

impl Position {
    pub const START: Position = Position {
        line: 1,
        column: 1,
        offset: 0,
    };
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// An unrecognized character. Recoverable: the lexer skips it and keeps going.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("illegal character '{ch}' at {pos}")]
pub struct LexError {
    pub ch: char,
    pub pos: Position,
}

/// The token stream does not match the grammar. Fatal for the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("syntax error at {pos}: expected {expected}, found {found}")]
pub struct SyntaxError {
    /// Description of the offending token, e.g. `'}'` or `end of input`.
    pub found: String,
    pub expected: String,
    pub pos: Position,
}

/// Macro expansion would produce more poses than the configured limit.
/// `pos` is the construct that crossed it: a `REPEAT` whose product is too
/// large, or the pose list item that pushed the running total over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("expansion at {pos} exceeds the limit of {limit} poses")]
pub struct ExpansionError {
    pub limit: usize,
    pub pos: Position,
}

/// An internal invariant of the compiled document was violated while
/// rendering it to JSON.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
pub enum SerializeError {
    #[error("animation '{animation}' pose {pose}: {field} component is not a finite number ({value})")]
    NonFinite {
        animation: String,
        pose: usize,
        field: String,
        value: f64,
    },
    #[error("json rendering failed: {0}")]
    Json(String),
}

/// Failure of a compile call. Lexical errors recovered before the failure
/// are carried along so they can be reported in the same batch.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompileError {
    #[error("{error}")]
    Syntax {
        error: SyntaxError,
        lex_errors: Vec<LexError>,
    },
    #[error("{error}")]
    Expansion {
        error: ExpansionError,
        lex_errors: Vec<LexError>,
    },
    #[error("{error}")]
    Serialize {
        error: SerializeError,
        lex_errors: Vec<LexError>,
    },
}

impl CompileError {
    pub fn lex_errors(&self) -> &[LexError] {
        match self {
            CompileError::Syntax { lex_errors, .. }
            | CompileError::Expansion { lex_errors, .. }
            | CompileError::Serialize { lex_errors, .. } => lex_errors,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            CompileError::Syntax { .. } => "syntax",
            CompileError::Expansion { .. } => "expansion",
            CompileError::Serialize { .. } => "serialize",
        }
    }

    /// Structured form used by the CLI's `--output json` mode.
    /// Position fields are null for errors that have no source location.
    pub fn to_json_value(&self) -> serde_json::Value {
        let (line, column) = match self {
            CompileError::Syntax { error, .. } => (Some(error.pos.line), Some(error.pos.column)),
            CompileError::Expansion { error, .. } => (Some(error.pos.line), Some(error.pos.column)),
            CompileError::Serialize { .. } => (None, None),
        };
        let lexical: Vec<serde_json::Value> = self
            .lex_errors()
            .iter()
            .map(|e| {
                serde_json::json!({
                    "char":    e.ch.to_string(),
                    "column":  e.pos.column,
                    "line":    e.pos.line,
                })
            })
            .collect();
        serde_json::json!({
            "column":          column,
            "kind":            self.kind(),
            "lexical_errors":  lexical,
            "line":            line,
            "message":         self.to_string(),
        })
    }
}
