use crate::error::{LexError, Position};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Dash,
    Dot,
    // Keywords -- only the exact words, case-sensitive
    Repeat,
    Speed,
    /// Signed decimal with a decimal point
    Float(f64),
    /// Signed decimal integer
    Int(i64),
    /// `[A-Za-z_][A-Za-z_0-9]*`
    Ident(String),
    // End of input
    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::LParen => write!(f, "'('"),
            Token::RParen => write!(f, "')'"),
            Token::LBrace => write!(f, "'{{'"),
            Token::RBrace => write!(f, "'}}'"),
            Token::LBracket => write!(f, "'['"),
            Token::RBracket => write!(f, "']'"),
            Token::Comma => write!(f, "','"),
            Token::Dash => write!(f, "'-'"),
            Token::Dot => write!(f, "'.'"),
            Token::Repeat => write!(f, "'REPEAT'"),
            Token::Speed => write!(f, "'SPEED'"),
            Token::Float(x) => write!(f, "float {}", x),
            Token::Int(n) => write!(f, "integer {}", n),
            Token::Ident(s) => write!(f, "identifier '{}'", s),
            Token::Eof => write!(f, "end of input"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub pos: Position,
}

/// Match one token at the very start of `rest`.
///
/// Returns the token and its length in bytes, or `None` when the first
/// character starts no token. Whitespace is not handled here. This is the
/// single definition of token shapes; both [`Lexer`] and the canonical
/// formatter go through it.
pub(crate) fn match_token(rest: &str) -> Option<(Token, usize)> {
    let bytes = rest.as_bytes();
    let first = *bytes.first()?;

    // Numbers before punctuation, so that `-1` is a number and `}-{` a dash.
    if first.is_ascii_digit() || (first == b'-' && bytes.get(1).is_some_and(u8::is_ascii_digit)) {
        let mut end = if first == b'-' { 1 } else { 0 };
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        if end + 1 < bytes.len() && bytes[end] == b'.' && bytes[end + 1].is_ascii_digit() {
            end += 1;
            while end < bytes.len() && bytes[end].is_ascii_digit() {
                end += 1;
            }
            // Digits and at most one sign/point: parse cannot fail, but a
            // very long literal may overflow to infinity.
            let value = rest[..end].parse::<f64>().ok()?;
            return Some((Token::Float(value), end));
        }
        let text = &rest[..end];
        let token = match text.parse::<i64>() {
            Ok(n) => Token::Int(n),
            // Out of i64 range: keep the magnitude as a float rather than
            // dropping the literal.
            Err(_) => Token::Float(text.parse::<f64>().ok()?),
        };
        return Some((token, end));
    }

    let punct = match first {
        b'(' => Some(Token::LParen),
        b')' => Some(Token::RParen),
        b'{' => Some(Token::LBrace),
        b'}' => Some(Token::RBrace),
        b'[' => Some(Token::LBracket),
        b']' => Some(Token::RBracket),
        b',' => Some(Token::Comma),
        b'-' => Some(Token::Dash),
        b'.' => Some(Token::Dot),
        _ => None,
    };
    if let Some(token) = punct {
        return Some((token, 1));
    }

    if first.is_ascii_alphabetic() || first == b'_' {
        let mut end = 1;
        while end < bytes.len() && (bytes[end].is_ascii_alphanumeric() || bytes[end] == b'_') {
            end += 1;
        }
        let word = &rest[..end];
        let token = match word {
            "REPEAT" => Token::Repeat,
            "SPEED" => Token::Speed,
            _ => Token::Ident(word.to_owned()),
        };
        return Some((token, end));
    }

    None
}

pub(crate) fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

/// Lazy tokenizer over a source string.
///
/// Yields `Ok(Spanned)` for tokens and `Err(LexError)` for each illegal
/// character (which is then skipped), finishing with a single
/// [`Token::Eof`]. [`Lexer::restart`] rewinds to the beginning.
pub struct Lexer<'a> {
    src: &'a str,
    pos: Position,
    done: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Lexer {
            src,
            pos: Position::START,
            done: false,
        }
    }

    pub fn restart(&mut self) {
        self.pos = Position::START;
        self.done = false;
    }

    fn bump(&mut self, len: usize) {
        for c in self.src[self.pos.offset..self.pos.offset + len].chars() {
            if c == '\n' {
                self.pos.line += 1;
                self.pos.column = 1;
            } else {
                self.pos.column += 1;
            }
        }
        self.pos.offset += len;
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Spanned, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            let rest = &self.src[self.pos.offset..];
            let Some(c) = rest.chars().next() else {
                self.done = true;
                return Some(Ok(Spanned {
                    token: Token::Eof,
                    pos: self.pos,
                }));
            };
            if is_blank(c) {
                self.bump(c.len_utf8());
                continue;
            }
            let start = self.pos;
            return match match_token(rest) {
                Some((token, len)) => {
                    self.bump(len);
                    Some(Ok(Spanned { token, pos: start }))
                }
                None => {
                    self.bump(c.len_utf8());
                    Some(Err(LexError { ch: c, pos: start }))
                }
            };
        }
    }
}

/// Result of a full lexing pass: every token (ending in `Eof`) plus the
/// batch of recovered lexical errors.
#[derive(Debug, Clone, PartialEq)]
pub struct Lexed {
    pub tokens: Vec<Spanned>,
    pub errors: Vec<LexError>,
}

pub fn lex(src: &str) -> Lexed {
    let mut tokens = Vec::new();
    let mut errors = Vec::new();
    for item in Lexer::new(src) {
        match item {
            Ok(tok) => tokens.push(tok),
            Err(e) => {
                tracing::debug!(ch = %e.ch, line = e.pos.line, column = e.pos.column, "illegal character skipped");
                errors.push(e);
            }
        }
    }
    Lexed { tokens, errors }
}
