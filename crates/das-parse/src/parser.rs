//! Recursive descent parser
//!
//! ```text
//! Pipeline  = [ Command { '|' Command } ]
//! Command   = TermList { RedirLeader [ Term ] }
//! TermList  = Term { Term }
//! Term      = Factor { Factor | '^' Factor }
//! Factor    = '$'* ( Bare | SingleQuoted | DoubleQuoted
//!                  | '(' TermList ')' | '[' Table ']' )
//! Table     = { ( Term '=' Term ) | Term }
//! ```
//!
//! Whitespace is allowed before a term-list, between terms, around `^`, and
//! between the elements of a table. The first violation aborts the whole
//! parse; no partial tree is ever returned.

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::ast::{CommandNode, FactorNode, Join, ListKind, ListNode, Redir, StringNode, TableNode};
use crate::cursor::TokenCursor;
use crate::decode::decode;
use crate::error::{Abort, Error, Result};
use crate::limits::{DepthCounter, ParseLimits};
use crate::redir::{self, Resolved};
use crate::token::{Token, TokenKind, TokenSource};

/// Result of a parse: the tree or a diagnostic.
pub type ParseOutcome = Result<Parsed>;

/// Completion hint for the last literal token, when the lexer flagged it as
/// possibly incomplete.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ArgContext {
    /// Byte offset of the token
    pub offset: usize,
    /// Raw token text
    pub raw: String,
    /// Decoded token text
    pub text: String,
}

/// A successfully parsed pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Parsed {
    /// The pipeline; its children are [`CommandNode`]s
    pub root: ListNode,
    /// Hint for interactive completion
    pub context: Option<ArgContext>,
}

/// Parser for one script.
///
/// A parser is consumed by [`Parser::parse`]; create a new one per parse.
#[derive(Debug, Clone)]
pub struct Parser {
    name: String,
    limits: ParseLimits,
}

impl Parser {
    /// Create a parser for the script called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            limits: ParseLimits::default(),
        }
    }

    /// Replace the default limits.
    pub fn with_limits(mut self, limits: ParseLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parse `text`, pulling its tokens from `source`.
    ///
    /// `text` is only used to render diagnostics; the grammar sees nothing
    /// but the tokens.
    pub fn parse<S: TokenSource>(self, text: &str, source: S) -> ParseOutcome {
        #[cfg(feature = "logging")]
        tracing::debug!(script = %self.name, len = text.len(), "parsing pipeline");

        let mut grammar = Grammar {
            cursor: TokenCursor::new(source),
            limits: &self.limits,
            depth: DepthCounter::new(),
            context: None,
        };

        match grammar.pipeline() {
            Ok(root) => {
                #[cfg(feature = "logging")]
                tracing::debug!(
                    script = %self.name,
                    commands = root.len(),
                    hint = grammar.context.is_some(),
                    "parsed pipeline"
                );
                Ok(Parsed {
                    root,
                    context: grammar.context,
                })
            }
            Err(abort) => {
                #[cfg(feature = "logging")]
                tracing::debug!(
                    script = %self.name,
                    offset = abort.offset,
                    error = %abort.kind,
                    "parse aborted"
                );
                Err(Error::from_abort(self.name, text, abort))
            }
        }
    }
}

/// Transient state of one parse.
struct Grammar<'l, S> {
    cursor: TokenCursor<S>,
    limits: &'l ParseLimits,
    depth: DepthCounter,
    context: Option<ArgContext>,
}

impl<S: TokenSource> Grammar<'_, S> {
    // Pipeline = [ Command { '|' Command } ]
    fn pipeline(&mut self) -> std::result::Result<ListNode, Abort> {
        let mut pipe = ListNode::new(self.cursor.peek().offset, ListKind::Pipeline);
        if self.cursor.peek_non_space()?.kind == TokenKind::EndOfInput {
            return Ok(pipe);
        }
        loop {
            pipe.append(self.command()?);

            let token = self.cursor.next();
            match token.kind {
                TokenKind::Pipe => continue,
                TokenKind::EndOfLine | TokenKind::EndOfInput => break,
                _ => return Err(Abort::unexpected(&token, "end of pipeline")),
            }
        }
        Ok(pipe)
    }

    // Command = TermList { RedirLeader [ Term ] }
    fn command(&mut self) -> std::result::Result<CommandNode, Abort> {
        let pos = self.cursor.peek_non_space()?.offset;
        let mut cmd = CommandNode::new(pos, self.term_list()?);
        while self.cursor.peek_non_space()?.kind == TokenKind::RedirLeader {
            let redir = self.redir()?;
            cmd.redirs.push(redir);
        }
        Ok(cmd)
    }

    // TermList = [ space ] Term { [ space ] Term } [ space ]
    fn term_list(&mut self) -> std::result::Result<ListNode, Abort> {
        let mut list = ListNode::new(self.cursor.peek_non_space()?.offset, ListKind::TermList);
        list.append(self.term(false)?);
        while self.cursor.peek_non_space()?.kind.starts_factor() {
            list.append(self.term(false)?);
        }
        Ok(list)
    }

    // Term = Factor { Factor | [ space ] '^' [ space ] Factor } [ space ]
    //
    // A table key stops at an adjacent bare `=` so that `k=v` splits into a
    // pair.
    fn term(&mut self, table_key: bool) -> std::result::Result<ListNode, Abort> {
        let mut term = ListNode::new(self.cursor.peek().offset, ListKind::Term);
        term.append(self.factor(Join::Start)?);
        loop {
            let next = self.cursor.peek();
            if next.kind.starts_factor() && !(table_key && next.is_equals()) {
                term.append(self.factor(Join::Adjacent)?);
            } else if self.cursor.peek_non_space()?.kind == TokenKind::Caret {
                self.cursor.next();
                self.cursor.peek_non_space()?;
                term.append(self.factor(Join::Caret)?);
            } else {
                break;
            }
        }
        Ok(term)
    }

    // Factor = '$'* ( Bare | SingleQuoted | DoubleQuoted
    //               | '(' TermList ')' | '[' Table ']' )
    fn factor(&mut self, join: Join) -> std::result::Result<FactorNode, Abort> {
        let pos = self.cursor.peek().offset;
        let mut dollar = 0;
        while self.cursor.peek().kind == TokenKind::Dollar {
            self.cursor.next();
            dollar += 1;
        }

        let token = self.cursor.next();
        let mut factor = match token.kind {
            TokenKind::Bare | TokenKind::SingleQuoted | TokenKind::DoubleQuoted => {
                let string = self.string(token)?;
                FactorNode::new(pos, dollar, string)
            }
            TokenKind::LParen => {
                self.enter(&token)?;
                let list = self.term_list()?;
                let close = self.cursor.next();
                if close.kind != TokenKind::RParen {
                    return Err(Abort::unexpected(&close, "factor of item list"));
                }
                self.depth.pop();
                FactorNode::new(pos, dollar, list)
            }
            TokenKind::LBracket => {
                self.enter(&token)?;
                let table = self.table()?;
                self.depth.pop();
                FactorNode::new(pos, dollar, table)
            }
            _ => return Err(Abort::unexpected(&token, "factor")),
        };
        factor.join = join;
        Ok(factor)
    }

    /// Decode an accepted literal and update the completion hint.
    fn string(&mut self, token: Token) -> std::result::Result<StringNode, Abort> {
        let text = decode(&token).map_err(|e| Abort::new(token.offset, e))?;
        self.context = token.may_continue.then(|| ArgContext {
            offset: token.offset,
            raw: token.text.clone(),
            text: text.clone(),
        });
        Ok(StringNode::new(token.offset, token.text, text))
    }

    // Table = '[' { [ space ] ( Term [ space ] '=' [ space ] Term | Term ) [ space ] } ']'
    //
    // The opening bracket has been consumed.
    fn table(&mut self) -> std::result::Result<TableNode, Abort> {
        let mut table = TableNode::new(self.cursor.peek().offset);
        loop {
            let token = self.cursor.next_non_space();
            if token.kind.starts_factor() {
                self.cursor.backup()?;
                let key = self.term(true)?;
                if self.cursor.peek_non_space()?.is_equals() {
                    self.cursor.next();
                    self.cursor.peek_non_space()?;
                    let value = self.term(false)?;
                    table.append_to_dict(key, value);
                } else {
                    table.append_to_list(key);
                }
            } else if token.kind == TokenKind::RBracket {
                return Ok(table);
            } else {
                return Err(Abort::unexpected(&token, "table literal"));
            }
        }
    }

    // Redir = RedirLeader [ [ space ] Term ]
    //
    // The term is required unless the qualifier duplicates or closes an fd.
    fn redir(&mut self) -> std::result::Result<Redir, Abort> {
        let leader = self.cursor.next();
        let resolved = redir::resolve(&leader)?;

        #[cfg(feature = "logging")]
        tracing::trace!(leader = %leader.text, offset = leader.offset, ?resolved, "redirection");

        match resolved {
            Resolved::Dup { fd, old_fd } => Ok(Redir::Fd { fd, old_fd }),
            Resolved::Close { fd } => Ok(Redir::Close { fd }),
            Resolved::NeedsTarget { fd, mode } => {
                self.cursor.peek_non_space()?;
                let target = self.term(false)?;
                Ok(Redir::Filename { fd, mode, target })
            }
        }
    }

    fn enter(&mut self, token: &Token) -> std::result::Result<(), Abort> {
        self.depth
            .push(self.limits)
            .map_err(|e| Abort::new(token.offset, e))
    }
}

/// Parse `text` as the script `name`, pulling tokens from `source`.
pub fn parse<S: TokenSource>(name: &str, text: &str, source: S) -> ParseOutcome {
    Parser::new(name).parse(text, source)
}
