//! das-parse - syntactic front end for the das command language
//!
//! Turns a token stream into the AST of a pipeline: commands made of terms,
//! I/O redirections, parenthesized groups and table literals. The lexer is
//! not part of this crate; any [`TokenSource`] can drive the parser.
//!
//! # Example
//!
//! ```rust
//! use das_parse::{Parser, SourceBuilder};
//!
//! let (text, tokens) = SourceBuilder::new()
//!     .bare("cat")
//!     .space(" ")
//!     .bare("notes")
//!     .space(" ")
//!     .pipe()
//!     .space(" ")
//!     .bare("sort")
//!     .redir(">>[2]")
//!     .bare("log")
//!     .into_source();
//!
//! let parsed = Parser::new("example").parse(&text, tokens).unwrap();
//! assert_eq!(parsed.root.len(), 2);
//! assert_eq!(parsed.root.to_string(), "cat notes | sort >>[2] log");
//! ```
//!
//! # Errors
//!
//! Parsing stops at the first problem and reports it as an [`Error`] that
//! knows the script name, the source text and the offending offset:
//!
//! ```rust
//! use das_parse::{Parser, SourceBuilder};
//!
//! let (text, tokens) = SourceBuilder::new()
//!     .lparen()
//!     .bare("a")
//!     .space(" ")
//!     .bare("b")
//!     .into_source();
//!
//! let err = Parser::new("demo").parse(&text, tokens).unwrap_err();
//! assert_eq!(err.to_string(), "demo:1:5: unexpected end of input in factor of item list");
//! ```

pub mod ast;
pub mod cursor;
pub mod decode;
mod error;
mod limits;
pub mod parser;
pub mod redir;
pub mod token;

pub use ast::{CommandNode, FactorNode, Join, ListKind, ListNode, Node, Redir, StringNode, TableNode};
pub use error::{Abort, Error, ErrorKind, FdRole, Result};
pub use limits::{LimitExceeded, ParseLimits};
pub use parser::{ArgContext, ParseOutcome, Parsed, Parser, parse};
pub use redir::{Direction, Fd, OpenMode};
pub use token::{SourceBuilder, Token, TokenKind, TokenSource, TokenVec};
