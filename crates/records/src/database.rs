//! Database script writer.

use signscript_core::{format_script, FormatOptions, FormatWarning};

use crate::record::Record;

/// Name of the resting animation the host falls back to between words.
pub const IDLE_NAME: &str = "IDLE";

/// Body of the resting animation, laid out by [`format_body`] like any
/// record script.
pub const IDLE_SCRIPT: &str = "SPEED(2,
    {R_P3, [0.28, -0.11, 0.94], [0.00, 0.27, 0.00], [0.22, 0.33, 0.00]} - {L_P3, [0.28, -0.11, 0.94], [0.00, 0.27, 0.00], [0.22, 0.33, 0.00]},
    {R_P3, [0.29, -0.10, 0.95], [0.01, 0.28, 0.01], [0.23, 0.34, 0.01]} - {L_P3, [0.29, -0.10, 0.95], [0.01, 0.28, 0.01], [0.23, 0.34, 0.01]}
)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Database {
    pub text: String,
    /// Formatter warnings, tagged with the animation they came from.
    pub warnings: Vec<(String, FormatWarning)>,
}

/// Canonical layout of one record's script body, always ending in `.`.
pub fn format_body(script: &str, opts: &FormatOptions) -> (String, Vec<FormatWarning>) {
    let formatted = format_script(script, opts);
    let mut text = formatted.text;
    if !text.ends_with('.') {
        text.push('.');
    }
    (text, formatted.warnings)
}

/// Write every record as `(<ARMS>)`, a blank line, its formatted script
/// and another blank line.
pub fn write_database(records: &[Record], opts: &FormatOptions, idle_preamble: bool) -> Database {
    let mut db = Database {
        text: String::new(),
        warnings: Vec::new(),
    };
    if idle_preamble {
        db.push(IDLE_NAME, IDLE_SCRIPT, opts);
    }
    for record in records {
        db.push(&record.arms, &record.script, opts);
    }
    db
}

impl Database {
    fn push(&mut self, name: &str, script: &str, opts: &FormatOptions) {
        let (body, w) = format_body(script, opts);
        if !w.is_empty() {
            tracing::warn!(
                animation = %name,
                skipped = w.len(),
                "script contains unrecognized characters"
            );
        }
        self.warnings.extend(w.into_iter().map(|w| (name.to_owned(), w)));
        self.text.push('(');
        self.text.push_str(name);
        self.text.push_str(")\n\n");
        self.text.push_str(&body);
        self.text.push_str("\n\n");
    }
}
