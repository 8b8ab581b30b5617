// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Foreign-descriptor conversion
//!
//! [`ForeignTypeCode`] is the accessor contract of any TypeCode
//! implementation, this crate's included. [`TypeCode::from_foreign`]
//! rebuilds a descriptor graph behind that contract into a native one,
//! reading each field only for the kinds it applies to.

use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::kind::TcKind;
use crate::label::Label;
use crate::registry::TypeCodeFactory;
use crate::typecode::{StructMember, TypeCode, UnionMember, ValueMember};

/// Accessor surface of a TypeCode from another implementation.
pub trait ForeignTypeCode {
    fn kind(&self) -> Result<TcKind>;
    fn id(&self) -> Result<String>;
    fn name(&self) -> Result<String>;
    fn member_count(&self) -> Result<u32>;
    fn member_name(&self, index: u32) -> Result<String>;
    fn member_type(&self, index: u32) -> Result<Box<dyn ForeignTypeCode>>;
    fn member_label(&self, index: u32) -> Result<Label>;
    fn discriminator_type(&self) -> Result<Box<dyn ForeignTypeCode>>;
    fn default_index(&self) -> Result<i32>;
    fn length(&self) -> Result<u32>;
    fn content_type(&self) -> Result<Box<dyn ForeignTypeCode>>;
    fn fixed_digits(&self) -> Result<u16>;
    fn fixed_scale(&self) -> Result<i16>;
    fn member_visibility(&self, index: u32) -> Result<i16>;
    fn type_modifier(&self) -> Result<i16>;
    fn concrete_base_type(&self) -> Result<Option<Box<dyn ForeignTypeCode>>>;
    fn is_recursive(&self) -> bool;
}

impl ForeignTypeCode for TypeCode {
    fn kind(&self) -> Result<TcKind> {
        TypeCode::kind(self)
    }
    fn id(&self) -> Result<String> {
        TypeCode::id(self)
    }
    fn name(&self) -> Result<String> {
        TypeCode::name(self)
    }
    fn member_count(&self) -> Result<u32> {
        TypeCode::member_count(self)
    }
    fn member_name(&self, index: u32) -> Result<String> {
        TypeCode::member_name(self, index)
    }
    fn member_type(&self, index: u32) -> Result<Box<dyn ForeignTypeCode>> {
        Ok(Box::new(TypeCode::member_type(self, index)?))
    }
    fn member_label(&self, index: u32) -> Result<Label> {
        TypeCode::member_label(self, index)
    }
    fn discriminator_type(&self) -> Result<Box<dyn ForeignTypeCode>> {
        Ok(Box::new(TypeCode::discriminator_type(self)?))
    }
    fn default_index(&self) -> Result<i32> {
        TypeCode::default_index(self)
    }
    fn length(&self) -> Result<u32> {
        TypeCode::length(self)
    }
    fn content_type(&self) -> Result<Box<dyn ForeignTypeCode>> {
        Ok(Box::new(TypeCode::content_type(self)?))
    }
    fn fixed_digits(&self) -> Result<u16> {
        TypeCode::fixed_digits(self)
    }
    fn fixed_scale(&self) -> Result<i16> {
        TypeCode::fixed_scale(self)
    }
    fn member_visibility(&self, index: u32) -> Result<i16> {
        TypeCode::member_visibility(self, index)
    }
    fn type_modifier(&self) -> Result<i16> {
        TypeCode::type_modifier(self)
    }
    fn concrete_base_type(&self) -> Result<Option<Box<dyn ForeignTypeCode>>> {
        Ok(TypeCode::concrete_base_type(self)?
            .map(|tc| Box::new(tc) as Box<dyn ForeignTypeCode>))
    }
    fn is_recursive(&self) -> bool {
        TypeCode::is_recursive(self)
    }
}

/// Any accessor failure on a foreign descriptor means the descriptor does
/// not honor the contract for its claimed kind.
fn fg<T>(r: Result<T>) -> Result<T> {
    r.map_err(|_| Error::BadForeignTypeCode)
}

impl TypeCode {
    /// Rebuild a descriptor graph from a foreign implementation, bottom-up.
    /// Recursive foreign graphs are rejected, whether they surface as an
    /// unresolved placeholder or as a closed cycle of resolved nodes.
    pub fn from_foreign(
        factory: &TypeCodeFactory,
        foreign: &dyn ForeignTypeCode,
    ) -> Result<TypeCode> {
        let mut in_progress = HashSet::new();
        convert(factory, foreign, &mut in_progress)
    }
}

fn convert(
    factory: &TypeCodeFactory,
    foreign: &dyn ForeignTypeCode,
    in_progress: &mut HashSet<String>,
) -> Result<TypeCode> {
    if foreign.is_recursive() {
        return Err(Error::BadForeignTypeCode);
    }
    let kind = fg(foreign.kind())?;
    // A repository id repeating on the descent path is a cycle. Sharing
    // the same descriptor across sibling branches stays allowed: ids are
    // removed again once their subtree completes.
    let guard_id = if kind.has_id() {
        let id = fg(foreign.id())?;
        if !id.is_empty() && !in_progress.insert(id.clone()) {
            return Err(Error::BadForeignTypeCode);
        }
        Some(id)
    } else {
        None
    };
    let converted = convert_kind(factory, foreign, kind, in_progress);
    if let Some(id) = guard_id {
        in_progress.remove(&id);
    }
    converted
}

fn convert_kind(
    factory: &TypeCodeFactory,
    foreign: &dyn ForeignTypeCode,
    kind: TcKind,
    in_progress: &mut HashSet<String>,
) -> Result<TypeCode> {
    match kind {
        TcKind::TK_STRING | TcKind::TK_WSTRING => {
            Ok(TypeCode::string(factory, kind, fg(foreign.length())?))
        }
        TcKind::TK_FIXED => Ok(TypeCode::fixed(
            factory,
            kind,
            fg(foreign.fixed_digits())?,
            fg(foreign.fixed_scale())?,
        )),
        TcKind::TK_OBJREF | TcKind::TK_NATIVE | TcKind::TK_ABSTRACT_INTERFACE => {
            Ok(TypeCode::with_id(
                factory,
                kind,
                &fg(foreign.id())?,
                &fg(foreign.name())?,
            ))
        }
        TcKind::TK_STRUCT | TcKind::TK_EXCEPT => {
            let id = fg(foreign.id())?;
            let name = fg(foreign.name())?;
            let count = fg(foreign.member_count())?;
            let mut members = Vec::with_capacity(count as usize);
            for i in 0..count {
                members.push(StructMember {
                    name: fg(foreign.member_name(i))?,
                    tc: convert(factory, fg(foreign.member_type(i))?.as_ref(), in_progress)?,
                });
            }
            Ok(TypeCode::structure(factory, kind, &id, &name, members))
        }
        TcKind::TK_UNION => {
            let id = fg(foreign.id())?;
            let name = fg(foreign.name())?;
            let discriminator =
                convert(factory, fg(foreign.discriminator_type())?.as_ref(), in_progress)?;
            let count = fg(foreign.member_count())?;
            let mut members = Vec::with_capacity(count as usize);
            for i in 0..count {
                members.push(UnionMember {
                    name: fg(foreign.member_name(i))?,
                    label: fg(foreign.member_label(i))?,
                    tc: convert(factory, fg(foreign.member_type(i))?.as_ref(), in_progress)?,
                });
            }
            Ok(TypeCode::union(
                factory,
                kind,
                &id,
                &name,
                &discriminator,
                members,
            ))
        }
        TcKind::TK_ENUM => {
            let id = fg(foreign.id())?;
            let name = fg(foreign.name())?;
            let count = fg(foreign.member_count())?;
            let mut member_names = Vec::with_capacity(count as usize);
            for i in 0..count {
                member_names.push(fg(foreign.member_name(i))?);
            }
            Ok(TypeCode::enumeration(factory, kind, &id, &name, member_names))
        }
        TcKind::TK_SEQUENCE | TcKind::TK_ARRAY => {
            let content =
                convert(factory, fg(foreign.content_type())?.as_ref(), in_progress)?;
            Ok(TypeCode::sequence(
                factory,
                kind,
                fg(foreign.length())?,
                &content,
            ))
        }
        TcKind::TK_ALIAS | TcKind::TK_VALUE_BOX => {
            let content =
                convert(factory, fg(foreign.content_type())?.as_ref(), in_progress)?;
            Ok(TypeCode::alias(
                factory,
                kind,
                &fg(foreign.id())?,
                &fg(foreign.name())?,
                &content,
            ))
        }
        TcKind::TK_VALUE => {
            let id = fg(foreign.id())?;
            let name = fg(foreign.name())?;
            let modifier = fg(foreign.type_modifier())?;
            let concrete_base = match fg(foreign.concrete_base_type())? {
                Some(base) => Some(convert(factory, base.as_ref(), in_progress)?),
                None => None,
            };
            let count = fg(foreign.member_count())?;
            let mut members = Vec::with_capacity(count as usize);
            for i in 0..count {
                members.push(ValueMember {
                    name: fg(foreign.member_name(i))?,
                    tc: convert(factory, fg(foreign.member_type(i))?.as_ref(), in_progress)?,
                    visibility: fg(foreign.member_visibility(i))?,
                });
            }
            Ok(TypeCode::value(
                factory,
                kind,
                &id,
                &name,
                modifier,
                concrete_base.as_ref(),
                members,
            ))
        }
        _ => Ok(TypeCode::primitive(factory, kind)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal handwritten foreign descriptor: struct { x: long, y: long }.
    struct OtherOrbStruct;
    struct OtherOrbLong;

    macro_rules! not_applicable {
        () => {
            fn member_label(&self, _: u32) -> Result<Label> {
                Err(Error::BadForeignTypeCode)
            }
            fn discriminator_type(&self) -> Result<Box<dyn ForeignTypeCode>> {
                Err(Error::BadForeignTypeCode)
            }
            fn default_index(&self) -> Result<i32> {
                Err(Error::BadForeignTypeCode)
            }
            fn length(&self) -> Result<u32> {
                Err(Error::BadForeignTypeCode)
            }
            fn content_type(&self) -> Result<Box<dyn ForeignTypeCode>> {
                Err(Error::BadForeignTypeCode)
            }
            fn fixed_digits(&self) -> Result<u16> {
                Err(Error::BadForeignTypeCode)
            }
            fn fixed_scale(&self) -> Result<i16> {
                Err(Error::BadForeignTypeCode)
            }
            fn member_visibility(&self, _: u32) -> Result<i16> {
                Err(Error::BadForeignTypeCode)
            }
            fn type_modifier(&self) -> Result<i16> {
                Err(Error::BadForeignTypeCode)
            }
            fn concrete_base_type(&self) -> Result<Option<Box<dyn ForeignTypeCode>>> {
                Err(Error::BadForeignTypeCode)
            }
            fn is_recursive(&self) -> bool {
                false
            }
        };
    }

    impl ForeignTypeCode for OtherOrbLong {
        fn kind(&self) -> Result<TcKind> {
            Ok(TcKind::TK_LONG)
        }
        fn id(&self) -> Result<String> {
            Err(Error::BadForeignTypeCode)
        }
        fn name(&self) -> Result<String> {
            Err(Error::BadForeignTypeCode)
        }
        fn member_count(&self) -> Result<u32> {
            Err(Error::BadForeignTypeCode)
        }
        fn member_name(&self, _: u32) -> Result<String> {
            Err(Error::BadForeignTypeCode)
        }
        fn member_type(&self, _: u32) -> Result<Box<dyn ForeignTypeCode>> {
            Err(Error::BadForeignTypeCode)
        }
        not_applicable!();
    }

    impl ForeignTypeCode for OtherOrbStruct {
        fn kind(&self) -> Result<TcKind> {
            Ok(TcKind::TK_STRUCT)
        }
        fn id(&self) -> Result<String> {
            Ok("IDL:acme/Point:1.0".into())
        }
        fn name(&self) -> Result<String> {
            Ok("Point".into())
        }
        fn member_count(&self) -> Result<u32> {
            Ok(2)
        }
        fn member_name(&self, i: u32) -> Result<String> {
            Ok(if i == 0 { "x".into() } else { "y".into() })
        }
        fn member_type(&self, _: u32) -> Result<Box<dyn ForeignTypeCode>> {
            Ok(Box::new(OtherOrbLong))
        }
        not_applicable!();
    }

    #[test]
    fn test_from_foreign_matches_native_construction() {
        let f = TypeCodeFactory::new();
        let converted = TypeCode::from_foreign(&f, &OtherOrbStruct).unwrap();

        let long_tc = TypeCode::primitive(&f, TcKind::TK_LONG);
        let native = TypeCode::structure(
            &f,
            TcKind::TK_STRUCT,
            "IDL:acme/Point:1.0",
            "Point",
            vec![
                crate::typecode::StructMember { name: "x".into(), tc: long_tc.clone() },
                crate::typecode::StructMember { name: "y".into(), tc: long_tc },
            ],
        );
        assert!(converted.equal(&native).unwrap());
    }

    #[test]
    fn test_native_typecode_converts_through_trait() {
        let f = TypeCodeFactory::new();
        let fx = TypeCode::fixed(&f, TcKind::TK_FIXED, 5, 2);
        let other = TypeCodeFactory::new();
        let converted = TypeCode::from_foreign(&other, &fx).unwrap();
        assert_eq!(converted.fixed_digits().unwrap(), 5);
        assert_eq!(converted.fixed_scale().unwrap(), 2);
        assert!(converted.equal(&fx).unwrap());
    }

    #[test]
    fn test_recursive_foreign_rejected() {
        let f = TypeCodeFactory::new();
        let placeholder = TypeCode::recursive(&f, "IDL:acme/Open:1.0");
        let other = TypeCodeFactory::new();
        assert_eq!(
            TypeCode::from_foreign(&other, &placeholder).unwrap_err(),
            Error::BadForeignTypeCode
        );
    }

    #[test]
    fn test_closed_cyclic_foreign_rejected() {
        // struct Node { next: sequence<Node> }, with the placeholder
        // already resolved. Conversion must reject the cycle instead of
        // descending it forever.
        let f = TypeCodeFactory::new();
        let placeholder = TypeCode::recursive(&f, "IDL:acme/Node:1.0");
        let seq = TypeCode::sequence(&f, TcKind::TK_SEQUENCE, 0, &placeholder);
        let node = TypeCode::structure(
            &f,
            TcKind::TK_STRUCT,
            "IDL:acme/Node:1.0",
            "Node",
            vec![crate::typecode::StructMember { name: "next".into(), tc: seq }],
        );
        assert_eq!(placeholder.kind().unwrap(), TcKind::TK_STRUCT);
        assert!(!placeholder.is_recursive());

        let other = TypeCodeFactory::new();
        assert_eq!(
            TypeCode::from_foreign(&other, &node).unwrap_err(),
            Error::BadForeignTypeCode
        );
    }

    #[test]
    fn test_shared_member_is_not_a_cycle() {
        // The same identified struct used by two sibling members is a DAG,
        // not a cycle, and converts fine.
        let f = TypeCodeFactory::new();
        let inner = TypeCode::structure(
            &f,
            TcKind::TK_STRUCT,
            "IDL:acme/Inner:1.0",
            "Inner",
            vec![crate::typecode::StructMember {
                name: "v".into(),
                tc: TypeCode::primitive(&f, TcKind::TK_LONG),
            }],
        );
        let outer = TypeCode::structure(
            &f,
            TcKind::TK_STRUCT,
            "IDL:acme/Outer:1.0",
            "Outer",
            vec![
                crate::typecode::StructMember { name: "a".into(), tc: inner.clone() },
                crate::typecode::StructMember { name: "b".into(), tc: inner },
            ],
        );
        let other = TypeCodeFactory::new();
        let converted = TypeCode::from_foreign(&other, &outer).unwrap();
        assert!(converted.equal(&outer).unwrap());
    }
}
