//! Redirection leaders
//!
//! A leader token such as `>>[1=2]` has a direction (`<`, `<>`, `>`, `>>`)
//! and an optional bracketed qualifier. The direction decides the open mode
//! and the default fd; the qualifier can override the fd, duplicate another
//! fd or close one.
//!
//! | direction | open mode                  | default fd |
//! |-----------|----------------------------|------------|
//! | `<`       | read-only                  | 0          |
//! | `<>`      | read-write, create         | 0          |
//! | `>`       | write-only, create         | 1          |
//! | `>>`      | write-only, create, append | 1          |

use std::fmt;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::error::{Abort, ErrorKind, FdRole};
use crate::token::Token;

/// File descriptor number.
pub type Fd = u32;

/// Redirection direction, the part of a leader before `[`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Direction {
    /// `<`
    Read,
    /// `<>`
    ReadWrite,
    /// `>`
    Write,
    /// `>>`
    Append,
}

impl Direction {
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "<" => Some(Direction::Read),
            "<>" => Some(Direction::ReadWrite),
            ">" => Some(Direction::Write),
            ">>" => Some(Direction::Append),
            _ => None,
        }
    }

    /// fd used when the leader carries no fd of its own
    pub fn default_fd(self) -> Fd {
        match self {
            Direction::Read | Direction::ReadWrite => 0,
            Direction::Write | Direction::Append => 1,
        }
    }

    pub fn open_mode(self) -> OpenMode {
        match self {
            Direction::Read => OpenMode::ReadOnly,
            Direction::ReadWrite => OpenMode::ReadWriteCreate,
            Direction::Write => OpenMode::WriteCreate,
            Direction::Append => OpenMode::WriteCreateAppend,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Read => "<",
            Direction::ReadWrite => "<>",
            Direction::Write => ">",
            Direction::Append => ">>",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the target of a filename redirection is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum OpenMode {
    ReadOnly,
    ReadWriteCreate,
    WriteCreate,
    WriteCreateAppend,
}

impl OpenMode {
    pub fn read(self) -> bool {
        matches!(self, OpenMode::ReadOnly | OpenMode::ReadWriteCreate)
    }

    pub fn write(self) -> bool {
        !matches!(self, OpenMode::ReadOnly)
    }

    pub fn create(self) -> bool {
        self.write()
    }

    pub fn append(self) -> bool {
        matches!(self, OpenMode::WriteCreateAppend)
    }

    /// The direction that produces this mode.
    pub fn direction(self) -> Direction {
        match self {
            OpenMode::ReadOnly => Direction::Read,
            OpenMode::ReadWriteCreate => Direction::ReadWrite,
            OpenMode::WriteCreate => Direction::Write,
            OpenMode::WriteCreateAppend => Direction::Append,
        }
    }
}

/// What a leader resolves to before any target term is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved {
    /// A target term must follow; it becomes a filename redirection.
    NeedsTarget { fd: Fd, mode: OpenMode },
    /// `[fd=old]`: duplicate `old` onto `fd`.
    Dup { fd: Fd, old_fd: Fd },
    /// `[fd=]`: close `fd`.
    Close { fd: Fd },
}

impl Resolved {
    /// Whether a target term has to be parsed after the leader.
    pub fn needs_target(&self) -> bool {
        matches!(self, Resolved::NeedsTarget { .. })
    }
}

/// Split a leader into its direction and qualifier text.
///
/// `">>[1=2]"` gives `(">>", "1=2")`; without brackets the qualifier is
/// empty.
pub fn split_leader(text: &str) -> (&str, &str) {
    match text.find('[') {
        Some(i) => {
            let qual = &text[i + 1..];
            (&text[..i], qual.strip_suffix(']').unwrap_or(qual))
        }
        None => (text, ""),
    }
}

/// Resolve a redirection leader token.
///
/// Every error is reported at the leader's offset.
pub fn resolve(leader: &Token) -> Result<Resolved, Abort> {
    let (dir, qual) = split_leader(&leader.text);
    let direction = Direction::parse(dir).ok_or_else(|| {
        Abort::new(
            leader.offset,
            ErrorKind::InvalidRedirectionDirection(dir.to_string()),
        )
    })?;
    let mode = direction.open_mode();
    let mut fd = direction.default_fd();

    if qual.is_empty() {
        return Ok(Resolved::NeedsTarget { fd, mode });
    }

    let Some((lhs, rhs)) = qual.split_once('=') else {
        // Filename redirection with the fd altered
        let fd = parse_fd(qual).map_err(|_| bad_fd(leader, FdRole::New, qual))?;
        return Ok(Resolved::NeedsTarget { fd, mode });
    };

    if !lhs.is_empty() {
        fd = parse_fd(lhs).map_err(|_| bad_fd(leader, FdRole::New, lhs))?;
    }
    if rhs.is_empty() {
        return Ok(Resolved::Close { fd });
    }
    let old_fd = parse_fd(rhs).map_err(|_| bad_fd(leader, FdRole::Old, rhs))?;
    Ok(Resolved::Dup { fd, old_fd })
}

fn bad_fd(leader: &Token, role: FdRole, text: &str) -> Abort {
    Abort::new(
        leader.offset,
        ErrorKind::InvalidFdNumber {
            role,
            text: text.to_string(),
        },
    )
}

/// Invalid unsigned integer text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidFd;

/// Parse an fd number: one or more ASCII digits that fit in [`Fd`].
pub fn parse_fd(text: &str) -> Result<Fd, InvalidFd> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(InvalidFd);
    }
    text.parse().map_err(|_| InvalidFd)
}
