// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Value copy-through
//!
//! Streams one value of a described type from a source to a destination
//! without building an in-memory representation of it. Dispatch is purely
//! on kind; unions copy only the branch their discriminant selects, and
//! bounded strings and sequences enforce their bounds in transit.

use crate::cdr::{CdrInput, CdrOutput};
use crate::error::{Error, Result};
use crate::kind::TcKind;
use crate::label::Label;
use crate::registry::TypeCodeFactory;
use crate::typecode::TypeCode;

impl TypeCode {
    /// Copy one value of this type from `src` to `dst`.
    pub fn copy_value(&self, src: &mut CdrInput<'_>, dst: &mut CdrOutput) -> Result<()> {
        let tc = self.concrete()?;
        match tc.kind()? {
            TcKind::TK_NULL
            | TcKind::TK_VOID
            | TcKind::TK_NATIVE
            | TcKind::TK_ABSTRACT_INTERFACE => Ok(()),
            TcKind::TK_BOOLEAN | TcKind::TK_CHAR | TcKind::TK_OCTET => {
                dst.write_u8(src.read_u8()?);
                Ok(())
            }
            TcKind::TK_SHORT => {
                dst.write_i16(src.read_i16()?);
                Ok(())
            }
            TcKind::TK_USHORT | TcKind::TK_WCHAR => {
                dst.write_u16(src.read_u16()?);
                Ok(())
            }
            TcKind::TK_LONG => {
                dst.write_i32(src.read_i32()?);
                Ok(())
            }
            TcKind::TK_ULONG | TcKind::TK_ENUM => {
                dst.write_u32(src.read_u32()?);
                Ok(())
            }
            TcKind::TK_LONGLONG => {
                dst.write_i64(src.read_i64()?);
                Ok(())
            }
            TcKind::TK_ULONGLONG => {
                dst.write_u64(src.read_u64()?);
                Ok(())
            }
            TcKind::TK_FLOAT => {
                dst.write_f32(src.read_f32()?);
                Ok(())
            }
            TcKind::TK_DOUBLE => {
                dst.write_f64(src.read_f64()?);
                Ok(())
            }
            TcKind::TK_LONGDOUBLE => Err(Error::LongDoubleNotSupported),
            TcKind::TK_STRING => {
                let s = src.read_string()?;
                let bound = tc.length()?;
                let length = s.len() as u32;
                if bound != 0 && length > bound {
                    return Err(Error::BadStringBounds { length, bound });
                }
                dst.write_string(&s);
                Ok(())
            }
            TcKind::TK_WSTRING => {
                let s = src.read_wstring()?;
                let bound = tc.length()?;
                let length = s.encode_utf16().count() as u32;
                if bound != 0 && length > bound {
                    return Err(Error::BadStringBounds { length, bound });
                }
                dst.write_wstring(&s);
                Ok(())
            }
            TcKind::TK_FIXED => {
                dst.write_u16(src.read_u16()?);
                dst.write_i16(src.read_i16()?);
                Ok(())
            }
            TcKind::TK_ANY => {
                // An any is a TypeCode followed by one value of that type.
                let scratch = TypeCodeFactory::new();
                let embedded = TypeCode::read(src, &scratch)?;
                embedded.write(dst)?;
                embedded.copy_value(src, dst)
            }
            TcKind::TK_TYPECODE => {
                let scratch = TypeCodeFactory::new();
                let embedded = TypeCode::read(src, &scratch)?;
                embedded.write(dst)
            }
            TcKind::TK_PRINCIPAL => copy_octet_sequence(src, dst),
            TcKind::TK_OBJREF => {
                // IOR shape: type id, then tagged profiles.
                let type_id = src.read_string()?;
                dst.write_string(&type_id);
                let profiles = src.read_u32()?;
                dst.write_u32(profiles);
                for _ in 0..profiles {
                    let tag = src.read_u32()?;
                    dst.write_u32(tag);
                    copy_octet_sequence(src, dst)?;
                }
                Ok(())
            }
            TcKind::TK_STRUCT | TcKind::TK_VALUE => {
                for i in 0..tc.member_count()? {
                    tc.member_type(i)?.copy_value(src, dst)?;
                }
                Ok(())
            }
            TcKind::TK_EXCEPT => {
                // Exceptions carry their repository id ahead of the members.
                let id = src.read_string()?;
                dst.write_string(&id);
                for i in 0..tc.member_count()? {
                    tc.member_type(i)?.copy_value(src, dst)?;
                }
                Ok(())
            }
            TcKind::TK_UNION => {
                let disc_kind = tc.discriminator_type()?.unalias()?.kind()?;
                let label = Label::read(src, disc_kind)?;
                label.write(dst, disc_kind)?;
                let index = tc.current_union_member_index(&label)?;
                if index < 0 {
                    return Err(Error::UnexpectedUnionDefault);
                }
                tc.member_type(index as u32)?.copy_value(src, dst)
            }
            TcKind::TK_SEQUENCE => {
                let length = src.read_u32()?;
                let bound = tc.length()?;
                if bound != 0 && length > bound {
                    return Err(Error::BadSequenceBounds { length, bound });
                }
                dst.write_u32(length);
                let content = tc.content_type()?;
                for _ in 0..length {
                    content.copy_value(src, dst)?;
                }
                Ok(())
            }
            TcKind::TK_ARRAY => {
                let content = tc.content_type()?;
                for _ in 0..tc.length()? {
                    content.copy_value(src, dst)?;
                }
                Ok(())
            }
            TcKind::TK_ALIAS | TcKind::TK_VALUE_BOX => {
                tc.content_type()?.copy_value(src, dst)
            }
        }
    }
}

fn copy_octet_sequence(src: &mut CdrInput<'_>, dst: &mut CdrOutput) -> Result<()> {
    let len = src.read_u32()?;
    dst.write_u32(len);
    dst.write_bytes(src.read_bytes(len as usize)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typecode::{StructMember, UnionMember};

    fn copy_through(tc: &TypeCode, src_bytes: &[u8]) -> Result<Vec<u8>> {
        let mut src = CdrInput::new(src_bytes);
        let mut dst = CdrOutput::new();
        tc.copy_value(&mut src, &mut dst)?;
        Ok(dst.into_bytes())
    }

    #[test]
    fn test_struct_copy_matches_source() {
        let f = TypeCodeFactory::new();
        let tc = TypeCode::structure(
            &f,
            TcKind::TK_STRUCT,
            "IDL:acme/Pair:1.0",
            "Pair",
            vec![
                StructMember {
                    name: "tag".into(),
                    tc: TypeCode::primitive(&f, TcKind::TK_OCTET),
                },
                StructMember {
                    name: "count".into(),
                    tc: TypeCode::primitive(&f, TcKind::TK_ULONG),
                },
            ],
        );
        let mut src = CdrOutput::new();
        src.write_u8(9);
        src.write_u32(1234);
        let bytes = src.into_bytes();
        assert_eq!(copy_through(&tc, &bytes).unwrap(), bytes);
    }

    #[test]
    fn test_string_bound_enforced() {
        let f = TypeCodeFactory::new();
        let tc = TypeCode::string(&f, TcKind::TK_STRING, 3);
        let mut src = CdrOutput::new();
        src.write_string("toolong");
        let bytes = src.into_bytes();
        assert_eq!(
            copy_through(&tc, &bytes),
            Err(Error::BadStringBounds { length: 7, bound: 3 })
        );

        let mut src = CdrOutput::new();
        src.write_string("ok");
        let bytes = src.into_bytes();
        assert_eq!(copy_through(&tc, &bytes).unwrap(), bytes);
    }

    #[test]
    fn test_union_copies_selected_branch_only() {
        let f = TypeCodeFactory::new();
        let disc = TypeCode::primitive(&f, TcKind::TK_LONG);
        let make = |with_default: bool| {
            let mut members = vec![
                UnionMember {
                    name: "a".into(),
                    label: Label::Long(1),
                    tc: TypeCode::primitive(&f, TcKind::TK_OCTET),
                },
                UnionMember {
                    name: "b".into(),
                    label: Label::Long(2),
                    tc: TypeCode::primitive(&f, TcKind::TK_ULONG),
                },
            ];
            if with_default {
                members.push(UnionMember {
                    name: "other".into(),
                    label: Label::DEFAULT,
                    tc: TypeCode::primitive(&f, TcKind::TK_BOOLEAN),
                });
            }
            TypeCode::union(&f, TcKind::TK_UNION, "IDL:acme/U:1.0", "U", &disc, members)
        };

        // Discriminant 2 selects branch "b": one u32 payload.
        let mut src = CdrOutput::new();
        src.write_i32(2);
        src.write_u32(7);
        let bytes = src.into_bytes();
        assert_eq!(copy_through(&make(true), &bytes).unwrap(), bytes);

        // Discriminant 99 without a default branch is a mismatch.
        let mut src = CdrOutput::new();
        src.write_i32(99);
        src.write_bool(true);
        let bytes = src.into_bytes();
        assert_eq!(
            copy_through(&make(false), &bytes),
            Err(Error::UnexpectedUnionDefault)
        );
        // With a default branch it copies the default payload.
        assert!(copy_through(&make(true), &bytes).is_ok());
    }

    #[test]
    fn test_sequence_bound_enforced() {
        let f = TypeCodeFactory::new();
        let tc = TypeCode::sequence(
            &f,
            TcKind::TK_SEQUENCE,
            2,
            &TypeCode::primitive(&f, TcKind::TK_OCTET),
        );
        let mut src = CdrOutput::new();
        src.write_u32(3);
        src.write_bytes(&[1, 2, 3]);
        let bytes = src.into_bytes();
        assert_eq!(
            copy_through(&tc, &bytes),
            Err(Error::BadSequenceBounds { length: 3, bound: 2 })
        );
    }

    #[test]
    fn test_longdouble_rejected() {
        let f = TypeCodeFactory::new();
        let tc = TypeCode::primitive(&f, TcKind::TK_LONGDOUBLE);
        assert_eq!(
            copy_through(&tc, &[0u8; 16]),
            Err(Error::LongDoubleNotSupported)
        );
    }

    #[test]
    fn test_any_copies_typecode_and_value() {
        let f = TypeCodeFactory::new();
        let any_tc = TypeCode::primitive(&f, TcKind::TK_ANY);
        let mut src = CdrOutput::new();
        TypeCode::primitive(&f, TcKind::TK_ULONG)
            .write(&mut src)
            .unwrap();
        src.write_u32(55);
        let bytes = src.into_bytes();
        assert_eq!(copy_through(&any_tc, &bytes).unwrap(), bytes);
    }
}
