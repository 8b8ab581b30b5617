// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Crate-wide error type
//!
//! One enum covers the whole engine: accessor misuse, recursion faults,
//! wire-format violations, and raw stream failures. Callers match on the
//! variant; the Display text is for logs.

use crate::kind::TcKind;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by TypeCode construction, comparison, marshaling and
/// value copy-through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // === Accessor misuse ===
    /// An accessor was invoked on a kind it does not apply to.
    BadKind { op: &'static str, kind: TcKind },
    /// A member index was out of range.
    Bounds { index: u32, count: u32 },

    // === Recursion faults ===
    /// An indirect placeholder (or recursive sequence) could not be
    /// resolved to a concrete descriptor.
    UnresolvedRecursiveType,

    // === Conversion ===
    /// A foreign descriptor was malformed or still recursive.
    BadForeignTypeCode,

    // === Wire format ===
    /// TK_NATIVE descriptors are never marshalable.
    CannotMarshalNative,
    /// A simple-form payload did not match its kind.
    InvalidSimpleTypeCode,
    /// A complex-form encapsulation did not match its kind.
    InvalidComplexTypeCode,
    /// The kind field held a value outside the TCKind range.
    InvalidTypeCodeKindMarshal(u32),
    /// An indirection resolved to a position no TypeCode starts at.
    IndirectionNotFound(usize),
    /// An indirection offset was positive or pointed inside its own field.
    InvalidIndirectionOffset(i32),
    /// An indirect placeholder's identifier was absent from the stream's
    /// position table.
    IndirectionIdNotFound(String),

    // === Value copy-through ===
    /// A string length prefix exceeded the descriptor's bound.
    BadStringBounds { length: u32, bound: u32 },
    /// A sequence length prefix exceeded the descriptor's bound.
    BadSequenceBounds { length: u32, bound: u32 },
    /// A union discriminant selected no branch and no default exists.
    UnexpectedUnionDefault,
    /// The union discriminator kind cannot key a label.
    IllegalUnionDiscriminator(TcKind),
    /// 128-bit floating point payloads are not supported.
    LongDoubleNotSupported,

    // === Raw stream ===
    /// The input buffer ended before the requested bytes.
    BufferUnderflow { need: usize, have: usize },
    /// A string payload was not NUL-terminated valid UTF-8.
    InvalidString,
    /// A wide string payload was not zero-terminated valid UTF-16.
    InvalidWString,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::BadKind { op, kind } => {
                write!(f, "operation {op} does not apply to kind {}", kind.name())
            }
            Error::Bounds { index, count } => {
                write!(f, "member index {index} out of range (count {count})")
            }
            Error::UnresolvedRecursiveType => write!(f, "unresolved recursive TypeCode"),
            Error::BadForeignTypeCode => write!(f, "malformed foreign TypeCode"),
            Error::CannotMarshalNative => write!(f, "cannot marshal native TypeCode"),
            Error::InvalidSimpleTypeCode => write!(f, "invalid simple TypeCode payload"),
            Error::InvalidComplexTypeCode => write!(f, "invalid complex TypeCode payload"),
            Error::InvalidTypeCodeKindMarshal(v) => {
                write!(f, "invalid TCKind value {v} on the wire")
            }
            Error::IndirectionNotFound(pos) => {
                write!(f, "indirection target {pos} matches no TypeCode position")
            }
            Error::InvalidIndirectionOffset(off) => {
                write!(f, "invalid indirection offset {off}")
            }
            Error::IndirectionIdNotFound(id) => {
                write!(f, "no TypeCode with id {id:?} written to this stream")
            }
            Error::BadStringBounds { length, bound } => {
                write!(f, "string length {length} exceeds bound {bound}")
            }
            Error::BadSequenceBounds { length, bound } => {
                write!(f, "sequence length {length} exceeds bound {bound}")
            }
            Error::UnexpectedUnionDefault => {
                write!(f, "union discriminant selects no branch and no default exists")
            }
            Error::IllegalUnionDiscriminator(kind) => {
                write!(f, "kind {} cannot discriminate a union", kind.name())
            }
            Error::LongDoubleNotSupported => write!(f, "longdouble payloads are not supported"),
            Error::BufferUnderflow { need, have } => {
                write!(f, "buffer underflow: need {need} bytes, have {have}")
            }
            Error::InvalidString => write!(f, "malformed string payload"),
            Error::InvalidWString => write!(f, "malformed wide string payload"),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_context() {
        let e = Error::BadKind {
            op: "member_count",
            kind: TcKind::TK_STRING,
        };
        assert!(e.to_string().contains("member_count"));
        assert!(e.to_string().contains("string"));

        let e = Error::BufferUnderflow { need: 8, have: 3 };
        assert!(e.to_string().contains('8'));
        assert!(e.to_string().contains('3'));
    }
}
