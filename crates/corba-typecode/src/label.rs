// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Typed union branch labels
//!
//! A union member's label carries a discriminant value whose type is the
//! union's discriminator. Labels compare by typed value, and marshal keyed
//! on the discriminator's alias-resolved kind. The default branch is
//! labelled with a zero octet, which no real discriminator kind produces.

use crate::cdr::{CdrInput, CdrOutput};
use crate::error::{Error, Result};
use crate::kind::TcKind;

/// A union branch label value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Label {
    /// Zero octet marks the default branch.
    Octet(u8),
    Short(i16),
    UShort(u16),
    Long(i32),
    ULong(u32),
    Boolean(bool),
    Char(u8),
    WChar(u16),
    LongLong(i64),
    ULongLong(u64),
    Float(f32),
    Double(f64),
    Enum(u32),
}

impl Label {
    /// The conventional default-branch marker.
    pub const DEFAULT: Label = Label::Octet(0);

    /// True for the zero-octet label that marks a default branch.
    pub fn is_default_marker(&self) -> bool {
        matches!(self, Label::Octet(0))
    }

    /// Marshal this label keyed on the discriminator kind. The default
    /// branch always marshals as a single octet regardless of kind.
    pub fn write(&self, out: &mut CdrOutput, discriminator_kind: TcKind) -> Result<()> {
        if let Label::Octet(v) = self {
            out.write_u8(*v);
            return Ok(());
        }
        match (discriminator_kind, self) {
            (TcKind::TK_SHORT, Label::Short(v)) => out.write_i16(*v),
            (TcKind::TK_USHORT, Label::UShort(v)) => out.write_u16(*v),
            (TcKind::TK_LONG, Label::Long(v)) => out.write_i32(*v),
            (TcKind::TK_ULONG, Label::ULong(v)) => out.write_u32(*v),
            (TcKind::TK_BOOLEAN, Label::Boolean(v)) => out.write_bool(*v),
            (TcKind::TK_CHAR, Label::Char(v)) => out.write_u8(*v),
            (TcKind::TK_WCHAR, Label::WChar(v)) => out.write_u16(*v),
            (TcKind::TK_LONGLONG, Label::LongLong(v)) => out.write_i64(*v),
            (TcKind::TK_ULONGLONG, Label::ULongLong(v)) => out.write_u64(*v),
            (TcKind::TK_FLOAT, Label::Float(v)) => out.write_f32(*v),
            (TcKind::TK_DOUBLE, Label::Double(v)) => out.write_f64(*v),
            (TcKind::TK_ENUM, Label::Enum(v)) => out.write_u32(*v),
            (kind, _) => return Err(Error::IllegalUnionDiscriminator(kind)),
        }
        Ok(())
    }

    /// Unmarshal a non-default label keyed on the discriminator kind.
    pub fn read(input: &mut CdrInput<'_>, discriminator_kind: TcKind) -> Result<Label> {
        Ok(match discriminator_kind {
            TcKind::TK_SHORT => Label::Short(input.read_i16()?),
            TcKind::TK_USHORT => Label::UShort(input.read_u16()?),
            TcKind::TK_LONG => Label::Long(input.read_i32()?),
            TcKind::TK_ULONG => Label::ULong(input.read_u32()?),
            TcKind::TK_BOOLEAN => Label::Boolean(input.read_bool()?),
            TcKind::TK_CHAR => Label::Char(input.read_u8()?),
            TcKind::TK_WCHAR => Label::WChar(input.read_u16()?),
            TcKind::TK_LONGLONG => Label::LongLong(input.read_i64()?),
            TcKind::TK_ULONGLONG => Label::ULongLong(input.read_u64()?),
            TcKind::TK_FLOAT => Label::Float(input.read_f32()?),
            TcKind::TK_DOUBLE => Label::Double(input.read_f64()?),
            TcKind::TK_ENUM => Label::Enum(input.read_u32()?),
            TcKind::TK_OCTET => Label::Octet(input.read_u8()?),
            kind => return Err(Error::IllegalUnionDiscriminator(kind)),
        })
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Label::Octet(0) => write!(f, "default"),
            Label::Octet(v) => write!(f, "octet {v}"),
            Label::Short(v) => write!(f, "{v}"),
            Label::UShort(v) => write!(f, "{v}"),
            Label::Long(v) => write!(f, "{v}"),
            Label::ULong(v) => write!(f, "{v}"),
            Label::Boolean(v) => write!(f, "{v}"),
            Label::Char(v) => write!(f, "'{}'", *v as char),
            Label::WChar(v) => write!(f, "wchar {v}"),
            Label::LongLong(v) => write!(f, "{v}"),
            Label::ULongLong(v) => write!(f, "{v}"),
            Label::Float(v) => write!(f, "{v}"),
            Label::Double(v) => write!(f, "{v}"),
            Label::Enum(v) => write!(f, "enum {v}"),
        }
    }
}
