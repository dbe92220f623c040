//! Error types for das-parse
//!
//! A parse either produces a complete tree or exactly one diagnostic. Inside
//! the grammar, productions return [`Abort`], which carries the byte offset
//! of the offending token and an [`ErrorKind`]. The entry point attaches the
//! script name and source text, turning it into an [`Error`].

use std::fmt;

use thiserror::Error;

use crate::decode::DecodeError;
use crate::limits::LimitExceeded;
use crate::token::{Token, TokenKind};

/// Result type alias using das-parse's Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Which side of a `[lhs=rhs]` qualifier held a bad fd.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FdRole {
    /// The fd being redirected (`lhs`, or the whole qualifier)
    New,
    /// The fd being duplicated (`rhs`)
    Old,
}

impl fmt::Display for FdRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FdRole::New => write!(f, "new"),
            FdRole::Old => write!(f, "old"),
        }
    }
}

/// Grammar violation categories.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A token that the current production does not accept.
    #[error("unexpected {found} in {context}")]
    UnexpectedToken {
        /// Rendered token, e.g. "`)`" or "end of input"
        found: String,
        kind: TokenKind,
        /// Human-readable production name
        context: &'static str,
    },

    /// Malformed quoted literal.
    #[error("{0}")]
    Decode(#[from] DecodeError),

    /// Redirection leader whose direction part is not `<`, `<>`, `>` or `>>`.
    #[error("unexpected redirection direction {0:?}")]
    InvalidRedirectionDirection(String),

    /// Qualifier fd text that is not an unsigned integer.
    #[error("invalid {role} fd in qualified redirection {text:?}")]
    InvalidFdNumber { role: FdRole, text: String },

    /// A configured parser limit was hit.
    #[error("{0}")]
    Limit(#[from] LimitExceeded),

    /// Logic error inside the parser.
    ///
    /// Never caused by input text; a well-behaved token source cannot
    /// trigger it.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ErrorKind {
    pub(crate) fn unexpected(token: &Token, context: &'static str) -> Self {
        Self::UnexpectedToken {
            found: token.to_string(),
            kind: token.kind,
            context,
        }
    }
}

/// First violation found while parsing, before the script context is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Abort {
    /// Byte offset of the offending token
    pub offset: usize,
    pub kind: ErrorKind,
}

impl Abort {
    pub fn new(offset: usize, kind: impl Into<ErrorKind>) -> Self {
        Self {
            offset,
            kind: kind.into(),
        }
    }

    /// Unexpected `token` while parsing `context`.
    pub fn unexpected(token: &Token, context: &'static str) -> Self {
        Self::new(token.offset, ErrorKind::unexpected(token, context))
    }

    pub fn internal(offset: usize, message: impl Into<String>) -> Self {
        Self::new(offset, ErrorKind::Internal(message.into()))
    }
}

/// Parse diagnostic.
///
/// Carries everything a caller needs to point at the problem: the script
/// name, the full source text, the byte offset and its line/column.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{name}:{line}:{column}: {kind}")]
pub struct Error {
    /// Name of the script being parsed
    pub name: String,
    /// Full source text
    pub source_text: String,
    /// 0-based byte offset of the offending token
    pub offset: usize,
    /// 1-based line number
    pub line: usize,
    /// 1-based column number (in characters)
    pub column: usize,
    #[source]
    pub kind: ErrorKind,
}

impl Error {
    /// Build a diagnostic from an abort and the script context.
    pub fn from_abort(name: impl Into<String>, source_text: impl Into<String>, abort: Abort) -> Self {
        let source_text = source_text.into();
        let offset = clamp_to_boundary(&source_text, abort.offset);
        let (line, column) = line_column(&source_text, offset);
        Self {
            name: name.into(),
            source_text,
            offset,
            line,
            column,
            kind: abort.kind,
        }
    }

    /// The rendered message without location prefix.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    /// Text of the line containing the offset, without its line ending.
    pub fn source_line(&self) -> &str {
        let start = self.source_text[..self.offset]
            .rfind('\n')
            .map_or(0, |i| i + 1);
        let end = self.source_text[self.offset..]
            .find('\n')
            .map_or(self.source_text.len(), |i| self.offset + i);
        self.source_text[start..end].trim_end_matches('\r')
    }

    /// Pointer-style rendering: header, the offending line, and a caret.
    pub fn render(&self) -> String {
        let line = self.source_line();
        let pad: String = line
            .chars()
            .take(self.column - 1)
            .map(|c| if c == '\t' { '\t' } else { ' ' })
            .collect();
        format!("{self}\n  {line}\n  {pad}^")
    }
}

fn clamp_to_boundary(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while offset > 0 && !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

/// 1-based line and column of a byte offset.
fn line_column(text: &str, offset: usize) -> (usize, usize) {
    let before = &text[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}
