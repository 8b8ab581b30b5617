// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! TCKind constants per OMG CORBA v3.0 specification
//!
//! Section 4.11: TypeCodes

/// Wire marker signalling an indirection instead of a TCKind value.
///
/// A TypeCode whose kind field holds this value is followed by a negative
/// byte offset pointing at an earlier TypeCode in the same top-level stream.
/// The marker is internal to the codec and never appears in [`TcKind`].
pub const INDIRECTION_MARKER: u32 = 0xFFFF_FFFF;

/// Repository id of the generic `CORBA::Object` interface.
///
/// Treated as a wildcard when comparing object-reference TypeCodes for
/// equality (OMG CORBA v3.0 Section 4.11.2).
pub const OBJECT_REPOSITORY_ID: &str = "IDL:omg.org/CORBA/Object:1.0";

/// TCKind identifies primitive and constructed TypeCodes
///
/// Discriminant values are the OMG-assigned TCKind integers and double as
/// the on-wire kind field, so the mapping must stay in exact lexical
/// correspondence with the spec table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
#[allow(non_camel_case_types)]
pub enum TcKind {
    TK_NULL = 0,
    TK_VOID = 1,
    /// Signed 16-bit integer
    TK_SHORT = 2,
    /// Signed 32-bit integer
    TK_LONG = 3,
    /// Unsigned 16-bit integer
    TK_USHORT = 4,
    /// Unsigned 32-bit integer
    TK_ULONG = 5,
    /// 32-bit IEEE floating point
    TK_FLOAT = 6,
    /// 64-bit IEEE floating point
    TK_DOUBLE = 7,
    TK_BOOLEAN = 8,
    /// Single 8-bit character
    TK_CHAR = 9,
    /// Uninterpreted 8-bit quantity
    TK_OCTET = 10,
    /// Self-describing value (TypeCode + payload)
    TK_ANY = 11,
    /// A TypeCode carried as a value
    TK_TYPECODE = 12,
    /// Legacy principal (octet sequence)
    TK_PRINCIPAL = 13,
    /// Object reference
    TK_OBJREF = 14,
    TK_STRUCT = 15,
    /// Discriminated union
    TK_UNION = 16,
    TK_ENUM = 17,
    /// 8-bit character string (bound 0 = unbounded)
    TK_STRING = 18,
    TK_SEQUENCE = 19,
    TK_ARRAY = 20,
    /// Type alias (typedef)
    TK_ALIAS = 21,
    /// User exception
    TK_EXCEPT = 22,
    /// Signed 64-bit integer
    TK_LONGLONG = 23,
    /// Unsigned 64-bit integer
    TK_ULONGLONG = 24,
    /// 128-bit floating point (not marshalable by this engine)
    TK_LONGDOUBLE = 25,
    /// Wide character (16-bit)
    TK_WCHAR = 26,
    /// Wide character string
    TK_WSTRING = 27,
    /// Fixed-point decimal (digits + scale)
    TK_FIXED = 28,
    /// Value type
    TK_VALUE = 29,
    /// Value box
    TK_VALUE_BOX = 30,
    /// Native type (never marshalable)
    TK_NATIVE = 31,
    TK_ABSTRACT_INTERFACE = 32,
}

/// Wire-encoding shape of a TypeCode's parameter list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingForm {
    /// The kind carries no parameters.
    Empty,
    /// Fixed-format scalar parameters follow the kind directly.
    Simple,
    /// Parameters are wrapped in a length-prefixed CDR encapsulation.
    Complex,
}

impl TcKind {
    /// Return the canonical u32 wire representation for this kind.
    pub const fn to_u32(self) -> u32 {
        self as u32
    }

    /// Convert from the u32 wire representation.
    pub const fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(TcKind::TK_NULL),
            1 => Some(TcKind::TK_VOID),
            2 => Some(TcKind::TK_SHORT),
            3 => Some(TcKind::TK_LONG),
            4 => Some(TcKind::TK_USHORT),
            5 => Some(TcKind::TK_ULONG),
            6 => Some(TcKind::TK_FLOAT),
            7 => Some(TcKind::TK_DOUBLE),
            8 => Some(TcKind::TK_BOOLEAN),
            9 => Some(TcKind::TK_CHAR),
            10 => Some(TcKind::TK_OCTET),
            11 => Some(TcKind::TK_ANY),
            12 => Some(TcKind::TK_TYPECODE),
            13 => Some(TcKind::TK_PRINCIPAL),
            14 => Some(TcKind::TK_OBJREF),
            15 => Some(TcKind::TK_STRUCT),
            16 => Some(TcKind::TK_UNION),
            17 => Some(TcKind::TK_ENUM),
            18 => Some(TcKind::TK_STRING),
            19 => Some(TcKind::TK_SEQUENCE),
            20 => Some(TcKind::TK_ARRAY),
            21 => Some(TcKind::TK_ALIAS),
            22 => Some(TcKind::TK_EXCEPT),
            23 => Some(TcKind::TK_LONGLONG),
            24 => Some(TcKind::TK_ULONGLONG),
            25 => Some(TcKind::TK_LONGDOUBLE),
            26 => Some(TcKind::TK_WCHAR),
            27 => Some(TcKind::TK_WSTRING),
            28 => Some(TcKind::TK_FIXED),
            29 => Some(TcKind::TK_VALUE),
            30 => Some(TcKind::TK_VALUE_BOX),
            31 => Some(TcKind::TK_NATIVE),
            32 => Some(TcKind::TK_ABSTRACT_INTERFACE),
            _ => None,
        }
    }

    /// Wire-encoding shape of this kind's parameters.
    ///
    /// Consulted by both the encoder and the decoder to select the
    /// payload-handling branch; listed in kind order.
    pub const fn encoding_form(self) -> EncodingForm {
        match self {
            TcKind::TK_NULL
            | TcKind::TK_VOID
            | TcKind::TK_SHORT
            | TcKind::TK_LONG
            | TcKind::TK_USHORT
            | TcKind::TK_ULONG
            | TcKind::TK_FLOAT
            | TcKind::TK_DOUBLE
            | TcKind::TK_BOOLEAN
            | TcKind::TK_CHAR
            | TcKind::TK_OCTET
            | TcKind::TK_ANY
            | TcKind::TK_TYPECODE
            | TcKind::TK_PRINCIPAL
            | TcKind::TK_LONGLONG
            | TcKind::TK_ULONGLONG
            | TcKind::TK_LONGDOUBLE
            | TcKind::TK_WCHAR => EncodingForm::Empty,
            TcKind::TK_STRING | TcKind::TK_WSTRING | TcKind::TK_FIXED => EncodingForm::Simple,
            TcKind::TK_OBJREF
            | TcKind::TK_STRUCT
            | TcKind::TK_UNION
            | TcKind::TK_ENUM
            | TcKind::TK_SEQUENCE
            | TcKind::TK_ARRAY
            | TcKind::TK_ALIAS
            | TcKind::TK_EXCEPT
            | TcKind::TK_VALUE
            | TcKind::TK_VALUE_BOX
            | TcKind::TK_NATIVE
            | TcKind::TK_ABSTRACT_INTERFACE => EncodingForm::Complex,
        }
    }

    /// Returns true if the `id()` accessor applies to this kind.
    pub const fn has_id(self) -> bool {
        matches!(
            self,
            TcKind::TK_OBJREF
                | TcKind::TK_STRUCT
                | TcKind::TK_UNION
                | TcKind::TK_ENUM
                | TcKind::TK_ALIAS
                | TcKind::TK_EXCEPT
                | TcKind::TK_VALUE
                | TcKind::TK_VALUE_BOX
                | TcKind::TK_NATIVE
                | TcKind::TK_ABSTRACT_INTERFACE
        )
    }

    /// Returns true if the member accessors apply to this kind.
    pub const fn has_members(self) -> bool {
        matches!(
            self,
            TcKind::TK_STRUCT
                | TcKind::TK_UNION
                | TcKind::TK_ENUM
                | TcKind::TK_EXCEPT
                | TcKind::TK_VALUE
        )
    }

    /// Returns true if the `length()` accessor applies to this kind.
    pub const fn has_length(self) -> bool {
        matches!(
            self,
            TcKind::TK_STRING | TcKind::TK_WSTRING | TcKind::TK_SEQUENCE | TcKind::TK_ARRAY
        )
    }

    /// Returns true if the `content_type()` accessor applies to this kind.
    pub const fn has_content_type(self) -> bool {
        matches!(
            self,
            TcKind::TK_SEQUENCE | TcKind::TK_ARRAY | TcKind::TK_ALIAS | TcKind::TK_VALUE_BOX
        )
    }

    /// Human-readable kind name, used by the Display rendering.
    pub const fn name(self) -> &'static str {
        match self {
            TcKind::TK_NULL => "null",
            TcKind::TK_VOID => "void",
            TcKind::TK_SHORT => "short",
            TcKind::TK_LONG => "long",
            TcKind::TK_USHORT => "ushort",
            TcKind::TK_ULONG => "ulong",
            TcKind::TK_FLOAT => "float",
            TcKind::TK_DOUBLE => "double",
            TcKind::TK_BOOLEAN => "boolean",
            TcKind::TK_CHAR => "char",
            TcKind::TK_OCTET => "octet",
            TcKind::TK_ANY => "any",
            TcKind::TK_TYPECODE => "typecode",
            TcKind::TK_PRINCIPAL => "principal",
            TcKind::TK_OBJREF => "objref",
            TcKind::TK_STRUCT => "struct",
            TcKind::TK_UNION => "union",
            TcKind::TK_ENUM => "enum",
            TcKind::TK_STRING => "string",
            TcKind::TK_SEQUENCE => "sequence",
            TcKind::TK_ARRAY => "array",
            TcKind::TK_ALIAS => "alias",
            TcKind::TK_EXCEPT => "exception",
            TcKind::TK_LONGLONG => "longlong",
            TcKind::TK_ULONGLONG => "ulonglong",
            TcKind::TK_LONGDOUBLE => "longdouble",
            TcKind::TK_WCHAR => "wchar",
            TcKind::TK_WSTRING => "wstring",
            TcKind::TK_FIXED => "fixed",
            TcKind::TK_VALUE => "value",
            TcKind::TK_VALUE_BOX => "valueBox",
            TcKind::TK_NATIVE => "native",
            TcKind::TK_ABSTRACT_INTERFACE => "abstractInterface",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tckind_roundtrip() {
        for v in 0..=32u32 {
            let kind = TcKind::from_u32(v).expect("kind in range");
            assert_eq!(kind.to_u32(), v);
        }
        assert_eq!(TcKind::from_u32(33), None);
        assert_eq!(TcKind::from_u32(INDIRECTION_MARKER), None);
    }

    #[test]
    fn test_encoding_form_table() {
        assert_eq!(TcKind::TK_NULL.encoding_form(), EncodingForm::Empty);
        assert_eq!(TcKind::TK_LONGLONG.encoding_form(), EncodingForm::Empty);
        assert_eq!(TcKind::TK_PRINCIPAL.encoding_form(), EncodingForm::Empty);
        assert_eq!(TcKind::TK_STRING.encoding_form(), EncodingForm::Simple);
        assert_eq!(TcKind::TK_WSTRING.encoding_form(), EncodingForm::Simple);
        assert_eq!(TcKind::TK_FIXED.encoding_form(), EncodingForm::Simple);
        assert_eq!(TcKind::TK_OBJREF.encoding_form(), EncodingForm::Complex);
        assert_eq!(TcKind::TK_STRUCT.encoding_form(), EncodingForm::Complex);
        assert_eq!(TcKind::TK_NATIVE.encoding_form(), EncodingForm::Complex);
        assert_eq!(
            TcKind::TK_ABSTRACT_INTERFACE.encoding_form(),
            EncodingForm::Complex
        );
    }

    #[test]
    fn test_accessor_applicability() {
        assert!(TcKind::TK_STRUCT.has_id());
        assert!(TcKind::TK_NATIVE.has_id());
        assert!(!TcKind::TK_STRING.has_id());
        assert!(TcKind::TK_ENUM.has_members());
        assert!(!TcKind::TK_SEQUENCE.has_members());
        assert!(TcKind::TK_WSTRING.has_length());
        assert!(!TcKind::TK_FIXED.has_length());
        assert!(TcKind::TK_VALUE_BOX.has_content_type());
        assert!(!TcKind::TK_STRUCT.has_content_type());
    }
}
