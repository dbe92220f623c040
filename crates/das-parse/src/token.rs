//! Token types consumed by the parser
//!
//! The lexer lives outside this crate. Anything that can hand out tokens one
//! at a time implements [`TokenSource`]; [`TokenVec`] and [`SourceBuilder`]
//! cover pre-lexed input.

use std::fmt;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Kinds of tokens produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum TokenKind {
    /// Unquoted word
    Bare,
    /// Single-quoted literal, delimiters included in the raw text
    SingleQuoted,
    /// Double-quoted literal, delimiters included in the raw text
    DoubleQuoted,
    /// `|`
    Pipe,
    /// `^`
    Caret,
    /// `$`
    Dollar,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// Redirection leader such as `>`, `<>` or `>>[1=2]`
    RedirLeader,
    /// Run of whitespace that does not end a line
    Space,
    /// End of line
    EndOfLine,
    /// End of input
    EndOfInput,
}

impl TokenKind {
    /// Whether a token of this kind can start a factor.
    ///
    /// This is the single token of lookahead used throughout the grammar to
    /// decide whether another term follows.
    pub fn starts_factor(self) -> bool {
        matches!(
            self,
            TokenKind::Bare
                | TokenKind::SingleQuoted
                | TokenKind::DoubleQuoted
                | TokenKind::LParen
                | TokenKind::LBracket
                | TokenKind::Dollar
        )
    }

    /// Whether this kind carries literal text the decoder understands.
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            TokenKind::Bare | TokenKind::SingleQuoted | TokenKind::DoubleQuoted
        )
    }
}

/// A lexical token.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Token {
    pub kind: TokenKind,
    /// Raw source text of the token
    pub text: String,
    /// Byte offset of the token in the source text
    pub offset: usize,
    /// Set when the lexer could not tell whether the token is complete.
    /// Only feeds the completion hint, never grammar decisions.
    pub may_continue: bool,
}

impl Token {
    /// Create a complete token.
    pub fn new(kind: TokenKind, text: impl Into<String>, offset: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            offset,
            may_continue: false,
        }
    }

    /// Create the end-of-input token at the given offset.
    pub fn end_of_input(offset: usize) -> Self {
        Self::new(TokenKind::EndOfInput, "", offset)
    }

    /// Mark the token as possibly incomplete.
    pub fn continuable(mut self) -> Self {
        self.may_continue = true;
        self
    }

    /// Whether this token is the literal bare `=` used by table pairs.
    pub fn is_equals(&self) -> bool {
        self.kind == TokenKind::Bare && self.text == "="
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::EndOfInput => write!(f, "end of input"),
            TokenKind::EndOfLine => write!(f, "end of line"),
            _ => write!(f, "`{}`", self.text),
        }
    }
}

/// Pull interface over the lexer.
///
/// Implementations must keep returning an end-of-input token once the input
/// is exhausted instead of failing.
pub trait TokenSource {
    /// Produce the token at the current position and advance past it.
    fn next_token(&mut self) -> Token;
}

impl<S: TokenSource + ?Sized> TokenSource for &mut S {
    fn next_token(&mut self) -> Token {
        (**self).next_token()
    }
}

impl<S: TokenSource + ?Sized> TokenSource for Box<S> {
    fn next_token(&mut self) -> Token {
        (**self).next_token()
    }
}

/// Token source over an already lexed token vector.
///
/// Once the vector runs out, an end-of-input token positioned at `end` is
/// returned forever.
#[derive(Debug, Clone)]
pub struct TokenVec {
    tokens: std::vec::IntoIter<Token>,
    end: usize,
}

impl TokenVec {
    /// Create a source; `end` is the byte length of the source text.
    pub fn new(tokens: Vec<Token>, end: usize) -> Self {
        Self {
            tokens: tokens.into_iter(),
            end,
        }
    }
}

impl TokenSource for TokenVec {
    fn next_token(&mut self) -> Token {
        match self.tokens.next() {
            Some(token) => {
                if token.kind == TokenKind::EndOfInput {
                    self.end = token.offset;
                }
                token
            }
            None => Token::end_of_input(self.end),
        }
    }
}

/// Assembles a source text and its token stream side by side.
///
/// Offsets are computed from the accumulated text, so the resulting tokens
/// always point at the right place in the returned source.
///
/// ```
/// use das_parse::token::{SourceBuilder, TokenKind};
///
/// let (text, tokens) = SourceBuilder::new()
///     .bare("echo")
///     .space(" ")
///     .single("'hi'")
///     .finish();
/// assert_eq!(text, "echo 'hi'");
/// assert_eq!(tokens[2].kind, TokenKind::SingleQuoted);
/// assert_eq!(tokens[2].offset, 5);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SourceBuilder {
    text: String,
    tokens: Vec<Token>,
}

impl SourceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a token of any kind with the given raw text.
    pub fn push(mut self, kind: TokenKind, text: &str) -> Self {
        let offset = self.text.len();
        self.text.push_str(text);
        self.tokens.push(Token::new(kind, text, offset));
        self
    }

    pub fn bare(self, text: &str) -> Self {
        self.push(TokenKind::Bare, text)
    }

    /// Raw single-quoted literal, delimiters included.
    pub fn single(self, text: &str) -> Self {
        self.push(TokenKind::SingleQuoted, text)
    }

    /// Raw double-quoted literal, delimiters included.
    pub fn double(self, text: &str) -> Self {
        self.push(TokenKind::DoubleQuoted, text)
    }

    pub fn space(self, text: &str) -> Self {
        self.push(TokenKind::Space, text)
    }

    pub fn pipe(self) -> Self {
        self.push(TokenKind::Pipe, "|")
    }

    pub fn caret(self) -> Self {
        self.push(TokenKind::Caret, "^")
    }

    pub fn dollar(self) -> Self {
        self.push(TokenKind::Dollar, "$")
    }

    pub fn lparen(self) -> Self {
        self.push(TokenKind::LParen, "(")
    }

    pub fn rparen(self) -> Self {
        self.push(TokenKind::RParen, ")")
    }

    pub fn lbracket(self) -> Self {
        self.push(TokenKind::LBracket, "[")
    }

    pub fn rbracket(self) -> Self {
        self.push(TokenKind::RBracket, "]")
    }

    /// Redirection leader, e.g. `>>` or `>[2=1]`.
    pub fn redir(self, leader: &str) -> Self {
        self.push(TokenKind::RedirLeader, leader)
    }

    pub fn eol(self) -> Self {
        self.push(TokenKind::EndOfLine, "\n")
    }

    /// Flag the most recently pushed token as possibly incomplete.
    pub fn continuable(mut self) -> Self {
        if let Some(last) = self.tokens.last_mut() {
            last.may_continue = true;
        }
        self
    }

    /// Source text and tokens, without the trailing end-of-input token.
    pub fn finish(self) -> (String, Vec<Token>) {
        (self.text, self.tokens)
    }

    /// Source text and a ready-to-use token source.
    pub fn into_source(self) -> (String, TokenVec) {
        let end = self.text.len();
        (self.text, TokenVec::new(self.tokens, end))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_factor() {
        assert!(TokenKind::Bare.starts_factor());
        assert!(TokenKind::SingleQuoted.starts_factor());
        assert!(TokenKind::DoubleQuoted.starts_factor());
        assert!(TokenKind::LParen.starts_factor());
        assert!(TokenKind::LBracket.starts_factor());
        assert!(TokenKind::Dollar.starts_factor());

        assert!(!TokenKind::RParen.starts_factor());
        assert!(!TokenKind::RBracket.starts_factor());
        assert!(!TokenKind::Caret.starts_factor());
        assert!(!TokenKind::Pipe.starts_factor());
        assert!(!TokenKind::Space.starts_factor());
        assert!(!TokenKind::RedirLeader.starts_factor());
        assert!(!TokenKind::EndOfInput.starts_factor());
    }

    #[test]
    fn test_token_display() {
        assert_eq!(Token::new(TokenKind::RParen, ")", 3).to_string(), "`)`");
        assert_eq!(Token::end_of_input(0).to_string(), "end of input");
        assert_eq!(
            Token::new(TokenKind::EndOfLine, "\n", 0).to_string(),
            "end of line"
        );
    }

    #[test]
    fn test_token_vec_repeats_end_of_input() {
        let mut source = TokenVec::new(vec![Token::new(TokenKind::Bare, "ls", 0)], 2);
        assert_eq!(source.next_token().text, "ls");
        assert_eq!(source.next_token(), Token::end_of_input(2));
        assert_eq!(source.next_token(), Token::end_of_input(2));
    }

    #[test]
    fn test_builder_offsets() {
        let (text, tokens) = SourceBuilder::new()
            .bare("cat")
            .space("  ")
            .redir("<")
            .bare("in")
            .continuable()
            .finish();

        assert_eq!(text, "cat  <in");
        let offsets: Vec<usize> = tokens.iter().map(|t| t.offset).collect();
        assert_eq!(offsets, vec![0, 3, 5, 6]);
        assert!(tokens[3].may_continue);
        assert!(!tokens[0].may_continue);
    }

    #[test]
    fn test_is_equals() {
        assert!(Token::new(TokenKind::Bare, "=", 0).is_equals());
        assert!(!Token::new(TokenKind::SingleQuoted, "'='", 0).is_equals());
        assert!(!Token::new(TokenKind::Bare, "==", 0).is_equals());
    }
}
