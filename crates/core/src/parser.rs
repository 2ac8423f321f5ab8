//! Recursive-descent parser for animation scripts.
//!
//! ```text
//! document    := animation+
//! animation   := '(' IDENT ')' poseList '.'
//! poseList    := poseItem (',' poseItem)*
//! poseItem    := pose | repeatBlock | speedBlock
//! repeatBlock := 'REPEAT' '(' INT ',' poseList ')'
//! speedBlock  := 'SPEED'  '(' INT ',' poseList ')'
//! pose        := '{' IDENT ',' vec ',' vec ',' vec '}' '-' '{' IDENT ',' vec ',' vec ',' vec '}'
//! vec         := '[' number ',' number ',' number ']'
//! ```
//!
//! The first unexpected token aborts the parse; there is no recovery.

use crate::ast::{PoseNode, RawAnimation, RawHand, RawPose};
use crate::error::{Position, SyntaxError};
use crate::lexer::{Spanned, Token};
use crate::model::Vector3;

// ──────────────────────────────────────────────
// Parser
// ──────────────────────────────────────────────

struct Parser<'a> {
    tokens: &'a [Spanned],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Spanned]) -> Self {
        Parser { tokens, pos: 0 }
    }

    fn cur(&self) -> Option<&Spanned> {
        self.tokens.get(self.pos)
    }

    fn peek(&self) -> &Token {
        self.cur().map_or(&Token::Eof, |s| &s.token)
    }

    fn cur_pos(&self) -> Position {
        match self.cur() {
            Some(s) => s.pos,
            None => self.tokens.last().map_or(Position::START, |s| s.pos),
        }
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn err(&self, expected: impl Into<String>) -> SyntaxError {
        SyntaxError {
            found: self.peek().to_string(),
            expected: expected.into(),
            pos: self.cur_pos(),
        }
    }

    fn expect(&mut self, tok: Token) -> Result<(), SyntaxError> {
        if self.peek() == &tok {
            self.advance();
            Ok(())
        } else {
            Err(self.err(tok.to_string()))
        }
    }

    fn take_ident(&mut self) -> Result<String, SyntaxError> {
        if let Token::Ident(w) = self.peek() {
            let w = w.clone();
            self.advance();
            Ok(w)
        } else {
            Err(self.err("identifier"))
        }
    }

    fn take_int(&mut self) -> Result<i64, SyntaxError> {
        if let Token::Int(n) = *self.peek() {
            self.advance();
            Ok(n)
        } else {
            Err(self.err("integer"))
        }
    }

    fn take_number(&mut self) -> Result<f64, SyntaxError> {
        match *self.peek() {
            Token::Int(n) => {
                self.advance();
                Ok(n as f64)
            }
            Token::Float(x) => {
                self.advance();
                Ok(x)
            }
            _ => Err(self.err("number")),
        }
    }

    // -- Document -----------------------------------------------

    fn parse_document(&mut self) -> Result<Vec<RawAnimation>, SyntaxError> {
        let mut animations = vec![self.parse_animation()?];
        while self.peek() != &Token::Eof {
            animations.push(self.parse_animation()?);
        }
        Ok(animations)
    }

    fn parse_animation(&mut self) -> Result<RawAnimation, SyntaxError> {
        let pos = self.cur_pos();
        self.expect(Token::LParen)?;
        let name = self.take_ident()?;
        self.expect(Token::RParen)?;
        let body = self.parse_pose_list()?;
        self.expect(Token::Dot)?;
        tracing::trace!(%name, items = body.len(), "parsed animation");
        Ok(RawAnimation { name, body, pos })
    }

    // -- Pose lists and macros ----------------------------------

    fn parse_pose_list(&mut self) -> Result<Vec<PoseNode>, SyntaxError> {
        let mut items = vec![self.parse_pose_item()?];
        while self.peek() == &Token::Comma {
            self.advance();
            items.push(self.parse_pose_item()?);
        }
        Ok(items)
    }

    fn parse_pose_item(&mut self) -> Result<PoseNode, SyntaxError> {
        match self.peek() {
            Token::LBrace => Ok(PoseNode::Pose(self.parse_pose()?)),
            Token::Repeat => {
                let pos = self.cur_pos();
                self.advance();
                let (count, body) = self.parse_macro_args(0, "repeat count >= 0")?;
                Ok(PoseNode::Repeat { count, body, pos })
            }
            Token::Speed => {
                let pos = self.cur_pos();
                self.advance();
                let (speed, body) = self.parse_macro_args(1, "speed >= 1")?;
                Ok(PoseNode::Speed { speed, body, pos })
            }
            _ => Err(self.err("'{', 'REPEAT' or 'SPEED'")),
        }
    }

    /// `'(' INT ',' poseList ')'` shared by REPEAT and SPEED.
    fn parse_macro_args(
        &mut self,
        min: u32,
        expected: &str,
    ) -> Result<(u32, Vec<PoseNode>), SyntaxError> {
        self.expect(Token::LParen)?;
        let arg_err = self.err(expected);
        let n = self.take_int()?;
        let n = u32::try_from(n)
            .ok()
            .filter(|n| *n >= min)
            .ok_or(arg_err)?;
        self.expect(Token::Comma)?;
        let body = self.parse_pose_list()?;
        self.expect(Token::RParen)?;
        Ok((n, body))
    }

    // -- Pose literals ------------------------------------------

    fn parse_pose(&mut self) -> Result<RawPose, SyntaxError> {
        let pos = self.cur_pos();
        let right = self.parse_hand()?;
        self.expect(Token::Dash)?;
        let left = self.parse_hand()?;
        Ok(RawPose { right, left, pos })
    }

    fn parse_hand(&mut self) -> Result<RawHand, SyntaxError> {
        self.expect(Token::LBrace)?;
        let pose = self.take_ident()?;
        let mut arm = [Vector3::ZERO; 3];
        for v in arm.iter_mut() {
            self.expect(Token::Comma)?;
            *v = self.parse_vec()?;
        }
        self.expect(Token::RBrace)?;
        Ok(RawHand { pose, arm })
    }

    fn parse_vec(&mut self) -> Result<Vector3, SyntaxError> {
        self.expect(Token::LBracket)?;
        let x = self.take_number()?;
        self.expect(Token::Comma)?;
        let y = self.take_number()?;
        self.expect(Token::Comma)?;
        let z = self.take_number()?;
        self.expect(Token::RBracket)?;
        Ok(Vector3::new(x, y, z))
    }
}

/// Parse a token stream (as produced by [`crate::lexer::lex`]) into the
/// animation AST. Stops at the first syntax error.
pub fn parse(tokens: &[Spanned]) -> Result<Vec<RawAnimation>, SyntaxError> {
    Parser::new(tokens).parse_document()
}
