//! Error types surfaced by the lexer, arena and parser.
//!
//! The core never panics on malformed input: unknown lexical input becomes an
//! `ERROR` token (see [`crate::token::TokenKind::Error`]), and the only
//! failures that propagate to callers are genuine integrity violations
//! (storage capacity exhausted, a pathologically deep parse) or a strategy's
//! explicit `expect` mismatch.

use thiserror::Error;

/// Errors raised while driving the token cursor or a `ParseStrategy`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// `ParseContext::expect` was called and the current token didn't match.
    #[error("expected {expected:?}, found {actual:?} at offset {offset}")]
    UnexpectedToken {
        offset: u32,
        expected: &'static str,
        actual: &'static str,
    },

    /// `ParseContext::enterRecursion` observed depth exceeding the configured limit.
    #[error("recursion limit reached at offset {offset}")]
    RecursionLimit { offset: u32 },

    /// A strategy reported a malformed construct without a more specific token mismatch.
    #[error("{message} at offset {offset}")]
    Malformed { message: String, offset: u32 },

    /// The arena rejected an allocation or mutation a strategy attempted.
    /// Always an implementation-integrity error (capacity under-budgeted,
    /// or a strategy referencing a stale id), never raised by ordinary
    /// malformed source.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ParseError {
    pub fn offset(&self) -> u32 {
        match self {
            ParseError::UnexpectedToken { offset, .. } => *offset,
            ParseError::RecursionLimit { offset } => *offset,
            ParseError::Malformed { offset, .. } => *offset,
            ParseError::Storage(_) => 0,
        }
    }
}

/// Errors raised by [`crate::tree::NodeStorage`] when a caller violates one
/// of its invariants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("node storage capacity ({capacity}) exhausted, requested node {requested}")]
    StorageFull { capacity: u32, requested: u32 },

    #[error("invalid node id {requested} (storage holds {capacity} nodes)")]
    InvalidNodeId { capacity: u32, requested: u32 },

    #[error("node {node} length invalid: start {start} + length {length} overflows u32")]
    InvalidLength { node: u32, start: u32, length: u32 },

    #[error("operation attempted on released storage")]
    ReleasedStorageAccess,

    #[error("initial capacity must be >= 1, got {requested}")]
    InvalidCapacity { capacity: u32, requested: u32 },
}
