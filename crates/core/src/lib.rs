//! signscript-core: compiler for sign-language animation scripts.
//!
//! Turns the line-oriented pose script (hand-pose ids, arm rotation
//! vectors, `REPEAT`/`SPEED` macros) into the JSON document consumed by
//! the animation host, and renders raw scripts into canonical layout.
//!
//! # Public API
//!
//! - [`compile()`] / [`compile_with()`] -- source text to [`CompiledDocument`]
//! - [`compile_to_json()`] -- source text straight to JSON text
//! - [`format_script()`] -- raw script to canonical indented script
//! - [`serialize::to_json_string()`] -- document to JSON text
//!
//! Every call owns its token stream and AST; nothing is shared between
//! calls, so independent compiles can run on separate threads.

pub mod ast;
pub mod error;
pub mod expand;
pub mod format;
pub mod lexer;
pub mod model;
pub mod parser;
pub mod serialize;

// ── Convenience re-exports ───────────────────────────────────────────

pub use error::{CompileError, ExpansionError, LexError, Position, SerializeError, SyntaxError};
pub use expand::CompileOptions;
pub use format::{format_script, FormatOptions, FormatWarning, Formatted};
pub use model::{AnimationEntry, CompiledDocument, NameCollision, PoseEntry, Vector3};
pub use serialize::{SerializeOptions, VectorStyle};

/// A successful compile. `lex_errors` lists the illegal characters that
/// were skipped on the way; they do not affect the document.
#[derive(Debug, Clone, PartialEq)]
pub struct Compiled {
    pub document: CompiledDocument,
    pub lex_errors: Vec<LexError>,
}

/// Compile a whole script with default [`CompileOptions`]. Either every
/// animation compiles or the call fails with the first error; there is no
/// partial output.
pub fn compile(src: &str) -> Result<Compiled, CompileError> {
    compile_with(src, &CompileOptions::default())
}

pub fn compile_with(src: &str, opts: &CompileOptions) -> Result<Compiled, CompileError> {
    let lexed = lexer::lex(src);
    let animations = match parser::parse(&lexed.tokens) {
        Ok(a) => a,
        Err(error) => {
            tracing::debug!(%error, "compile failed");
            return Err(CompileError::Syntax {
                error,
                lex_errors: lexed.errors,
            });
        }
    };
    let document = match expand::expand_document(&animations, opts) {
        Ok(d) => d,
        Err(error) => {
            tracing::debug!(%error, "compile failed");
            return Err(CompileError::Expansion {
                error,
                lex_errors: lexed.errors,
            });
        }
    };
    tracing::debug!(
        animations = document.len(),
        poses = document.pose_count(),
        lexical_errors = lexed.errors.len(),
        "compiled script"
    );
    Ok(Compiled {
        document,
        lex_errors: lexed.errors,
    })
}

/// [`compile_with()`] followed by serialization.
pub fn compile_to_json(
    src: &str,
    compile_opts: &CompileOptions,
    opts: &SerializeOptions,
) -> Result<(String, Vec<LexError>), CompileError> {
    let Compiled {
        document,
        lex_errors,
    } = compile_with(src, compile_opts)?;
    match serialize::to_json_string(&document, opts) {
        Ok(json) => Ok((json, lex_errors)),
        Err(error) => Err(CompileError::Serialize { error, lex_errors }),
    }
}
