#![forbid(unsafe_code)]

mod geometry;

pub use geometry::{Command, CommandKind, Point};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Position {
    pub line: usize,
    pub col: usize,
    pub byte: usize,
}

impl Position {
    /// Resolve a byte offset into `source` to a 1-based line and column.
    ///
    /// Offsets past the end are clamped to the end of the source.
    #[must_use]
    pub fn locate(source: &str, byte: usize) -> Self {
        let byte = byte.min(source.len());
        let mut line = 1;
        let mut col = 1;
        for (index, ch) in source.char_indices() {
            if index >= byte {
                break;
            }
            if ch == '\n' {
                line += 1;
                col = 1;
            } else {
                col += 1;
            }
        }
        Self { line, col, byte }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    #[must_use]
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub fn from_bytes(source: &str, start: usize, end: usize) -> Self {
        Self::new(Position::locate(source, start), Position::locate(source, end))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum PathErrorCode {
    #[default]
    MalformedPath,
    NumberFormat,
    InternalInvariant,
}

impl PathErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MalformedPath => "pathdata/error/malformed-path",
            Self::NumberFormat => "pathdata/error/number-format",
            Self::InternalInvariant => "pathdata/error/internal-invariant",
        }
    }
}

/// Failure of a single parse call. No partial output accompanies an error.
#[derive(Debug, Clone, Serialize, Deserialize, Error, PartialEq, Eq)]
pub enum PathError {
    /// The input breaks the grammar's structure, e.g. an operand with no
    /// active command.
    #[error("{message}")]
    MalformedPath { message: String, span: Span },
    /// A token in operand position is not a number.
    #[error("invalid number '{token}'")]
    NumberFormat { token: String, span: Span },
    /// The parser reached a state it should never reach. This is a bug in
    /// the parser, not a problem with the input.
    #[error("internal parser error: {message}")]
    InternalInvariant { message: String },
}

impl PathError {
    #[must_use]
    pub fn code(&self) -> PathErrorCode {
        match self {
            Self::MalformedPath { .. } => PathErrorCode::MalformedPath,
            Self::NumberFormat { .. } => PathErrorCode::NumberFormat,
            Self::InternalInvariant { .. } => PathErrorCode::InternalInvariant,
        }
    }

    #[must_use]
    pub const fn span(&self) -> Option<Span> {
        match self {
            Self::MalformedPath { span, .. } | Self::NumberFormat { span, .. } => Some(*span),
            Self::InternalInvariant { .. } => None,
        }
    }

    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::InternalInvariant { .. })
    }
}
