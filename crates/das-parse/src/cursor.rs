//! Bounded-lookahead cursor over a token source
//!
//! The grammar never needs more than three tokens of pushback. Tokens that
//! were pushed back live on a small stack; the last three tokens handed out
//! by [`TokenCursor::next`] are remembered so that pushback can only replay
//! tokens the parser actually saw.

use std::collections::VecDeque;

use crate::error::Abort;
use crate::token::{Token, TokenKind, TokenSource};

/// Maximum number of tokens that may be pushed back at once.
pub const MAX_PUSHBACK: usize = 3;

/// Token cursor with peek and up to three tokens of pushback.
pub struct TokenCursor<S> {
    source: S,
    /// Pushed-back or peeked tokens; the top of the stack comes out first.
    pending: Vec<Token>,
    /// Recently returned tokens, most recent at the back.
    returned: VecDeque<Token>,
}

impl<S: TokenSource> TokenCursor<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            pending: Vec::with_capacity(MAX_PUSHBACK),
            returned: VecDeque::with_capacity(MAX_PUSHBACK),
        }
    }

    /// Consume and return the next token.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Token {
        let token = match self.pending.pop() {
            Some(token) => token,
            None => self.source.next_token(),
        };
        if self.returned.len() == MAX_PUSHBACK {
            self.returned.pop_front();
        }
        self.returned.push_back(token.clone());
        token
    }

    /// Return the next token without consuming it.
    pub fn peek(&mut self) -> &Token {
        if self.pending.is_empty() {
            let token = self.source.next_token();
            self.pending.push(token);
        }
        &self.pending[self.pending.len() - 1]
    }

    /// Push back the most recently returned token.
    pub fn backup(&mut self) -> Result<(), Abort> {
        self.ensure_room(1)?;
        let token = self.take_returned(None)?;
        self.pending.push(token);
        Ok(())
    }

    /// Push back the two most recently returned tokens. `t1` is the one
    /// returned before the latest and comes out first.
    pub fn backup2(&mut self, t1: &Token) -> Result<(), Abort> {
        self.ensure_room(2)?;
        let t0 = self.take_returned(None)?;
        let t1 = self.take_returned(Some(t1))?;
        self.pending.push(t0);
        self.pending.push(t1);
        Ok(())
    }

    /// Push back the three most recently returned tokens, given oldest
    /// first. `t2` comes out first.
    pub fn backup3(&mut self, t2: &Token, t1: &Token) -> Result<(), Abort> {
        self.ensure_room(3)?;
        let t0 = self.take_returned(None)?;
        let t1 = self.take_returned(Some(t1))?;
        let t2 = self.take_returned(Some(t2))?;
        self.pending.push(t0);
        self.pending.push(t1);
        self.pending.push(t2);
        Ok(())
    }

    /// Consume and return the next token that is not whitespace.
    pub fn next_non_space(&mut self) -> Token {
        loop {
            let token = self.next();
            if token.kind != TokenKind::Space {
                return token;
            }
        }
    }

    /// Skip whitespace and return the following token without consuming it.
    pub fn peek_non_space(&mut self) -> Result<&Token, Abort> {
        self.next_non_space();
        self.backup()?;
        Ok(self.peek())
    }

    /// Number of tokens currently waiting to be replayed.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    fn ensure_room(&self, count: usize) -> Result<(), Abort> {
        if self.pending.len() + count > MAX_PUSHBACK {
            return Err(Abort::internal(
                self.position(),
                format!(
                    "pushback of {count} token(s) exceeds depth {MAX_PUSHBACK} ({} pending)",
                    self.pending.len()
                ),
            ));
        }
        Ok(())
    }

    fn take_returned(&mut self, expected: Option<&Token>) -> Result<Token, Abort> {
        let position = self.position();
        let Some(token) = self.returned.pop_back() else {
            return Err(Abort::internal(
                position,
                "pushback of a token that was never returned",
            ));
        };
        if let Some(expected) = expected {
            if *expected != token {
                return Err(Abort::internal(
                    expected.offset,
                    format!("pushback out of order: expected {expected}, last returned {token}"),
                ));
            }
        }
        Ok(token)
    }

    fn position(&self) -> usize {
        self.pending
            .last()
            .or(self.returned.back())
            .map_or(0, |t| t.offset)
    }
}
