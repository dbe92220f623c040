//! AST types for parsed pipelines
//!
//! Every node records the byte offset it started at, for diagnostics. The
//! tree is strictly owned: each node has exactly one parent.

use std::fmt;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::redir::{Direction, Fd, OpenMode};

/// A node of the syntax tree.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Node {
    List(ListNode),
    Command(CommandNode),
    Factor(FactorNode),
    String(StringNode),
    Table(TableNode),
}

impl Node {
    /// Byte offset where the node starts.
    pub fn pos(&self) -> usize {
        match self {
            Node::List(n) => n.pos,
            Node::Command(n) => n.pos,
            Node::Factor(n) => n.pos,
            Node::String(n) => n.pos,
            Node::Table(n) => n.pos,
        }
    }

    pub fn as_list(&self) -> Option<&ListNode> {
        match self {
            Node::List(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_command(&self) -> Option<&CommandNode> {
        match self {
            Node::Command(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_factor(&self) -> Option<&FactorNode> {
        match self {
            Node::Factor(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&StringNode> {
        match self {
            Node::String(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&TableNode> {
        match self {
            Node::Table(n) => Some(n),
            _ => None,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::List(n) => n.fmt(f),
            Node::Command(n) => n.fmt(f),
            Node::Factor(n) => n.fmt(f),
            Node::String(n) => n.fmt(f),
            Node::Table(n) => n.fmt(f),
        }
    }
}

/// What a [`ListNode`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum ListKind {
    /// Commands separated by `|`
    Pipeline,
    /// Whitespace-separated terms; also the body of a `( ... )` group
    TermList,
    /// Factors joined by adjacency or `^`
    Term,
}

/// Ordered sequence of child nodes, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ListNode {
    pub pos: usize,
    pub kind: ListKind,
    pub nodes: Vec<Node>,
}

impl ListNode {
    pub fn new(pos: usize, kind: ListKind) -> Self {
        Self {
            pos,
            kind,
            nodes: Vec::new(),
        }
    }

    pub fn append(&mut self, node: impl Into<Node>) {
        self.nodes.push(node.into());
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }

    /// Commands of a pipeline.
    pub fn commands(&self) -> impl Iterator<Item = &CommandNode> {
        self.nodes.iter().filter_map(Node::as_command)
    }

    /// Factors of a term.
    pub fn factors(&self) -> impl Iterator<Item = &FactorNode> {
        self.nodes.iter().filter_map(Node::as_factor)
    }

    /// Terms of a term-list.
    pub fn terms(&self) -> impl Iterator<Item = &ListNode> {
        self.nodes.iter().filter_map(Node::as_list)
    }
}

impl<'a> IntoIterator for &'a ListNode {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

impl fmt::Display for ListNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = match self.kind {
            ListKind::Pipeline => " | ",
            ListKind::TermList => " ",
            ListKind::Term => "",
        };
        for (i, node) in self.nodes.iter().enumerate() {
            if i > 0 {
                f.write_str(sep)?;
            }
            write!(f, "{}", node)?;
        }
        Ok(())
    }
}

/// A command: its argument terms plus its redirections.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct CommandNode {
    pub pos: usize,
    /// Argument terms (a term-list, never empty)
    pub args: ListNode,
    /// Redirections in source order
    pub redirs: Vec<Redir>,
}

impl CommandNode {
    pub fn new(pos: usize, args: ListNode) -> Self {
        Self {
            pos,
            args,
            redirs: Vec::new(),
        }
    }
}

impl fmt::Display for CommandNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.args)?;
        for redir in &self.redirs {
            write!(f, " {}", redir)?;
        }
        Ok(())
    }
}

/// How a factor is attached to the one before it in a term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Join {
    /// First factor of its term
    Start,
    /// Directly adjacent to the previous factor
    Adjacent,
    /// Joined with an explicit `^`
    Caret,
}

/// `$`-prefixed primary: a literal, a group, or a table.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct FactorNode {
    pub pos: usize,
    /// Number of leading `$`
    pub dollar: usize,
    pub join: Join,
    /// A [`StringNode`], a term-list [`ListNode`] or a [`TableNode`]
    pub node: Box<Node>,
}

impl FactorNode {
    pub fn new(pos: usize, dollar: usize, node: impl Into<Node>) -> Self {
        Self {
            pos,
            dollar,
            join: Join::Start,
            node: Box::new(node.into()),
        }
    }
}

impl fmt::Display for FactorNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.join == Join::Caret {
            f.write_str("^")?;
        }
        for _ in 0..self.dollar {
            f.write_str("$")?;
        }
        match self.node.as_ref() {
            Node::List(list) => write!(f, "({})", list),
            other => write!(f, "{}", other),
        }
    }
}

/// A literal with both its raw and decoded text.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct StringNode {
    pub pos: usize,
    /// Source text, quotes included
    pub raw: String,
    /// Decoded text
    pub text: String,
}

impl StringNode {
    pub fn new(pos: usize, raw: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            pos,
            raw: raw.into(),
            text: text.into(),
        }
    }
}

impl fmt::Display for StringNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Table literal: positional elements plus key/value pairs.
///
/// Pairs keep source order and duplicate keys are kept as-is; resolving
/// them is up to the evaluator.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TableNode {
    pub pos: usize,
    pub list: Vec<Node>,
    pub dict: Vec<(Node, Node)>,
}

impl TableNode {
    pub fn new(pos: usize) -> Self {
        Self {
            pos,
            list: Vec::new(),
            dict: Vec::new(),
        }
    }

    pub fn append_to_list(&mut self, node: impl Into<Node>) {
        self.list.push(node.into());
    }

    pub fn append_to_dict(&mut self, key: impl Into<Node>, value: impl Into<Node>) {
        self.dict.push((key.into(), value.into()));
    }
}

impl fmt::Display for TableNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        let mut first = true;
        for node in &self.list {
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            write!(f, "{}", node)?;
        }
        for (key, value) in &self.dict {
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            write!(f, "{}={}", key, value)?;
        }
        f.write_str("]")
    }
}

/// I/O redirection with its fd already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Redir {
    /// Open `target` with `mode` on `fd`.
    Filename {
        fd: Fd,
        mode: OpenMode,
        /// Target term
        target: ListNode,
    },
    /// Make `fd` a copy of `old_fd`.
    Fd { fd: Fd, old_fd: Fd },
    /// Close `fd`.
    Close { fd: Fd },
}

impl Redir {
    /// The fd this redirection acts on.
    pub fn fd(&self) -> Fd {
        match self {
            Redir::Filename { fd, .. } | Redir::Fd { fd, .. } | Redir::Close { fd } => *fd,
        }
    }
}

impl fmt::Display for Redir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Redir::Filename { fd, mode, target } => {
                let dir = mode.direction();
                if *fd == dir.default_fd() {
                    write!(f, "{} {}", dir, target)
                } else {
                    write!(f, "{}[{}] {}", dir, fd, target)
                }
            }
            Redir::Fd { fd, old_fd } => write!(f, "{}[{}={}]", Direction::Write, fd, old_fd),
            Redir::Close { fd } => write!(f, "{}[{}=]", Direction::Write, fd),
        }
    }
}

macro_rules! impl_into_node {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Node {
                fn from(node: $ty) -> Self {
                    Node::$variant(node)
                }
            }
        )*
    };
}

impl_into_node! {
    ListNode => List,
    CommandNode => Command,
    FactorNode => Factor,
    StringNode => String,
    TableNode => Table,
}
