//! signscript-interchange: typed reader for compiled animation documents.
//!
//! Consumers of the compiler's JSON (the animation host, test harnesses)
//! go through [`from_compiled`] instead of walking `serde_json::Value`
//! by hand. Both vector renderings are accepted: native arrays
//! `[0.1, 0.2, 0.3]` and the quoted form `"[0.1, 0.2, 0.3]"`.

pub mod deserialize;
pub mod types;

pub use deserialize::{from_compiled, parse_vector_text, InterchangeError};
pub use types::*;
