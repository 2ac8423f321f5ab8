//! Canonical formatter: raw or condensed script text -> indented script.
//!
//! All whitespace is dropped first, then the text is re-scanned with the
//! lexer's token shapes ([`crate::lexer::match_token`]) and laid out:
//!
//! - `(NAME)` on its own line, followed by a blank line
//! - `REPEAT(n,` / `SPEED(n,` on its own line; following lines indent one step
//! - `)` on its own line at the current indentation, then indentation drops
//! - each pose literal on its own line
//! - a `,` after `)` or a pose stays on that line
//! - `.` closes the line it follows and is followed by a blank line
//!
//! This is a layout pass, not a parser. Tokens that fit none of the shapes
//! above are appended to the current line unchanged; characters that start
//! no token at all are dropped and reported as [`FormatWarning`]s.

use crate::lexer::{is_blank, match_token, Token};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    /// Spaces per indentation step.
    pub indent_width: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        FormatOptions { indent_width: 4 }
    }
}

/// A raw character that matched no token shape and was left out of the
/// output. `offset` is the byte offset in the raw input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("unrecognized character '{ch}' at byte {offset}")]
pub struct FormatWarning {
    pub ch: char,
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatted {
    pub text: String,
    pub warnings: Vec<FormatWarning>,
}

impl Formatted {
    /// False when some input was skipped and the output may be incomplete.
    pub fn is_complete(&self) -> bool {
        self.warnings.is_empty()
    }
}

// ──────────────────────────────────────────────
// Scanner
// ──────────────────────────────────────────────

struct Piece<'a> {
    token: Token,
    text: &'a str,
}

/// Whitespace-free copy of `raw`, plus the raw byte offset of each kept byte.
fn compact(raw: &str) -> (String, Vec<usize>) {
    let mut text = String::with_capacity(raw.len());
    let mut origin = Vec::with_capacity(raw.len());
    for (offset, c) in raw.char_indices() {
        if is_blank(c) {
            continue;
        }
        text.push(c);
        origin.extend(std::iter::repeat(offset).take(c.len_utf8()));
    }
    (text, origin)
}

fn scan<'a>(text: &'a str, origin: &[usize], warnings: &mut Vec<FormatWarning>) -> Vec<Piece<'a>> {
    let mut pieces = Vec::new();
    let mut at = 0;
    while at < text.len() {
        let rest = &text[at..];
        match match_token(rest) {
            Some((token, len)) => {
                pieces.push(Piece {
                    token,
                    text: &rest[..len],
                });
                at += len;
            }
            None => {
                // `rest` is non-empty here
                let ch = rest.chars().next().unwrap_or('\u{FFFD}');
                let warning = FormatWarning {
                    ch,
                    offset: origin.get(at).copied().unwrap_or(at),
                };
                tracing::debug!(%warning, "formatter skipped input");
                warnings.push(warning);
                at += ch.len_utf8();
            }
        }
    }
    pieces
}

// ──────────────────────────────────────────────
// Shape matching over scanned pieces
// ──────────────────────────────────────────────

struct Shape<'p, 'a> {
    pieces: &'p [Piece<'a>],
    at: usize,
}

impl Shape<'_, '_> {
    fn eat(&mut self, pred: impl Fn(&Token) -> bool) -> Option<()> {
        let piece = self.pieces.get(self.at)?;
        if pred(&piece.token) {
            self.at += 1;
            Some(())
        } else {
            None
        }
    }

    fn tok(&mut self, t: Token) -> Option<()> {
        self.eat(|x| *x == t)
    }

    fn ident(&mut self) -> Option<()> {
        self.eat(|t| matches!(t, Token::Ident(_)))
    }

    fn number(&mut self) -> Option<()> {
        self.eat(|t| matches!(t, Token::Int(_) | Token::Float(_)))
    }

    fn vec3(&mut self) -> Option<()> {
        self.tok(Token::LBracket)?;
        self.number()?;
        self.tok(Token::Comma)?;
        self.number()?;
        self.tok(Token::Comma)?;
        self.number()?;
        self.tok(Token::RBracket)
    }

    fn hand(&mut self) -> Option<()> {
        self.tok(Token::LBrace)?;
        self.ident()?;
        for _ in 0..3 {
            self.tok(Token::Comma)?;
            self.vec3()?;
        }
        self.tok(Token::RBrace)
    }
}

/// Number of pieces taken by `f` when it matches at the start of `pieces`.
fn shape_len<'p, 'a>(
    pieces: &'p [Piece<'a>],
    f: impl FnOnce(&mut Shape<'p, 'a>) -> Option<()>,
) -> Option<usize> {
    let mut s = Shape { pieces, at: 0 };
    f(&mut s).map(|()| s.at)
}

fn header_len(pieces: &[Piece<'_>]) -> Option<usize> {
    shape_len(pieces, |s| {
        s.tok(Token::LParen)?;
        s.ident()?;
        s.tok(Token::RParen)
    })
}

fn opener_len(pieces: &[Piece<'_>]) -> Option<usize> {
    shape_len(pieces, |s| {
        s.eat(|t| matches!(t, Token::Repeat | Token::Speed))?;
        s.tok(Token::LParen)?;
        s.eat(|t| matches!(t, Token::Int(_)))?;
        s.tok(Token::Comma)
    })
}

fn pose_len(pieces: &[Piece<'_>]) -> Option<usize> {
    shape_len(pieces, |s| {
        s.hand()?;
        s.tok(Token::Dash)?;
        s.hand()
    })
}

fn joined(pieces: &[Piece<'_>]) -> String {
    pieces.iter().map(|p| p.text).collect()
}

// ──────────────────────────────────────────────
// Layout
// ──────────────────────────────────────────────

struct Layout {
    lines: Vec<String>,
    indent: usize,
    step: String,
}

impl Layout {
    fn line(&mut self, text: &str) {
        let mut l = self.step.repeat(self.indent);
        l.push_str(text);
        self.lines.push(l);
    }

    fn append(&mut self, text: &str) {
        match self.lines.last_mut() {
            Some(last) => last.push_str(text),
            None => self.line(text),
        }
    }

    fn blank(&mut self) {
        if self.lines.last().is_some_and(|l| !l.is_empty()) {
            self.lines.push(String::new());
        }
    }

    fn finish(mut self) -> String {
        while self.lines.last().is_some_and(|l| l.trim().is_empty()) {
            self.lines.pop();
        }
        self.lines.join("\n")
    }
}

/// Lay out `raw` in canonical form. Never fails; see [`Formatted::warnings`].
pub fn format_script(raw: &str, opts: &FormatOptions) -> Formatted {
    let (text, origin) = compact(raw);
    let mut warnings = Vec::new();
    let pieces = scan(&text, &origin, &mut warnings);

    let mut out = Layout {
        lines: Vec::new(),
        indent: 0,
        step: " ".repeat(opts.indent_width),
    };

    let mut i = 0;
    while i < pieces.len() {
        let rest = &pieces[i..];
        if let Some(n) = header_len(rest) {
            out.indent = 0;
            out.blank();
            out.line(&joined(&rest[..n]));
            out.blank();
            i += n;
        } else if let Some(n) = opener_len(rest) {
            out.line(&joined(&rest[..n]));
            out.indent += 1;
            i += n;
        } else if rest[0].token == Token::RParen {
            out.line(rest[0].text);
            out.indent = out.indent.saturating_sub(1);
            i += 1;
        } else if let Some(n) = pose_len(rest) {
            out.line(&joined(&rest[..n]));
            i += n;
        } else if rest[0].token == Token::Dot {
            out.append(rest[0].text);
            out.blank();
            out.indent = 0;
            i += 1;
            continue;
        } else {
            out.append(rest[0].text);
            i += 1;
            continue;
        }
        // A comma right after `)` or a pose stays on the same line.
        if pieces.get(i).is_some_and(|p| p.token == Token::Comma) {
            out.append(pieces[i].text);
            i += 1;
        }
    }

    Formatted {
        text: out.finish(),
        warnings,
    }
}
