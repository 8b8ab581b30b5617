// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! TypeCode comparison
//!
//! `equal` is strict structural identity; `equivalent` is the looser form
//! used for values held in generic containers: it unwinds alias chains and
//! short-circuits on matching non-empty repository ids. Both terminate on
//! cyclic graphs because cycles pass through indirection nodes, which
//! compare by identifier without descending. Inapplicable-accessor errors
//! during a comparison mean "not equal", never a failure.

use std::sync::Arc;

use crate::error::Result;
use crate::kind::{TcKind, OBJECT_REPOSITORY_ID};
use crate::typecode::{Body, TypeCode};

impl TypeCode {
    /// Strict equality. Kind, scalar parameters, identifiers and the whole
    /// member structure must match; member names are not significant.
    pub fn equal(&self, other: &TypeCode) -> Result<bool> {
        Ok(equal_tc(self, other))
    }

    /// Loose equality for generic-container compatibility checks. Never use
    /// this to establish identity for marshaling decisions.
    pub fn equivalent(&self, other: &TypeCode) -> Result<bool> {
        Ok(equivalent_tc(self, other))
    }
}

fn equal_tc(a: &TypeCode, b: &TypeCode) -> bool {
    if Arc::ptr_eq(&a.inner, &b.inner) {
        return true;
    }
    // Indirection nodes compare by identifier, without resolving. This is
    // also what terminates the descent on cyclic graphs.
    match (a.indirect_id(), b.indirect_id()) {
        (Some(x), Some(y)) => return x == y,
        (Some(x), None) => return b.id().is_ok_and(|id| id == x),
        (None, Some(y)) => return a.id().is_ok_and(|id| id == y),
        (None, None) => {}
    }
    equal_concrete(a, b).unwrap_or(false)
}

fn equal_concrete(a: &TypeCode, b: &TypeCode) -> Result<bool> {
    let (ka, body_a) = a.parts()?;
    let (kb, body_b) = b.parts()?;
    if ka != kb {
        return Ok(false);
    }
    let res = match (body_a, body_b) {
        (Body::Empty, Body::Empty) => true,
        (Body::String { bound: x }, Body::String { bound: y }) => x == y,
        (
            Body::Fixed { digits: dx, scale: sx },
            Body::Fixed { digits: dy, scale: sy },
        ) => dx == dy && sx == sy,
        (Body::Id { id: x, .. }, Body::Id { id: y, .. }) => {
            if ka == TcKind::TK_OBJREF {
                // The generic Object id is compatible with any specific
                // interface id, in both directions.
                x == y || x == OBJECT_REPOSITORY_ID || y == OBJECT_REPOSITORY_ID
            } else {
                x == y
            }
        }
        (Body::Collection { bound: bx, .. }, Body::Collection { bound: by, .. }) => {
            // content_type resolves a lazy recursive-sequence element first.
            bx == by && equal_tc(&a.content_type()?, &b.content_type()?)
        }
        (
            Body::Alias { id: ix, content: cx, .. },
            Body::Alias { id: iy, content: cy, .. },
        ) => ix == iy && equal_tc(cx, cy),
        (
            Body::Struct { id: ix, members: mx, .. },
            Body::Struct { id: iy, members: my, .. },
        ) => {
            ix == iy
                && mx.len() == my.len()
                && mx.iter().zip(my).all(|(p, q)| equal_tc(&p.tc, &q.tc))
        }
        (
            Body::Union {
                id: ix,
                discriminator: dx,
                default_index: dix,
                members: mx,
                ..
            },
            Body::Union {
                id: iy,
                discriminator: dy,
                default_index: diy,
                members: my,
                ..
            },
        ) => {
            ix == iy
                && dix == diy
                && mx.len() == my.len()
                && equal_tc(dx, dy)
                && mx
                    .iter()
                    .zip(my)
                    .all(|(p, q)| p.label == q.label && equal_tc(&p.tc, &q.tc))
        }
        (
            Body::Enum { id: ix, member_names: nx, .. },
            Body::Enum { id: iy, member_names: ny, .. },
        ) => ix == iy && nx.len() == ny.len(),
        (
            Body::Value {
                id: ix,
                modifier: mox,
                concrete_base: cbx,
                members: mx,
                ..
            },
            Body::Value {
                id: iy,
                modifier: moy,
                concrete_base: cby,
                members: my,
                ..
            },
        ) => {
            let base_ok = match (cbx, cby) {
                (None, None) => true,
                (Some(x), Some(y)) => equal_tc(x, y),
                _ => false,
            };
            ix == iy
                && mox == moy
                && base_ok
                && mx.len() == my.len()
                && mx
                    .iter()
                    .zip(my)
                    .all(|(p, q)| p.visibility == q.visibility && equal_tc(&p.tc, &q.tc))
        }
        _ => false,
    };
    Ok(res)
}

fn equivalent_tc(a: &TypeCode, b: &TypeCode) -> bool {
    if Arc::ptr_eq(&a.inner, &b.inner) {
        return true;
    }
    equivalent_unaliased(a, b).unwrap_or(false)
}

fn equivalent_unaliased(a: &TypeCode, b: &TypeCode) -> Result<bool> {
    let a = a.unalias()?;
    let b = b.unalias()?;
    let (ka, body_a) = a.parts()?;
    let (kb, body_b) = b.parts()?;
    if ka != kb {
        return Ok(false);
    }
    // Matching non-empty identifiers settle equivalence without any
    // structural descent. This also terminates on recursive graphs, whose
    // cycles necessarily carry an identifier.
    if let (Some(x), Some(y)) = (body_a.id(), body_b.id()) {
        if !x.is_empty() && !y.is_empty() && x == y {
            return Ok(true);
        }
    }
    let res = match (body_a, body_b) {
        (Body::Empty, Body::Empty) => true,
        (Body::String { bound: x }, Body::String { bound: y }) => x == y,
        (
            Body::Fixed { digits: dx, scale: sx },
            Body::Fixed { digits: dy, scale: sy },
        ) => dx == dy && sx == sy,
        (Body::Id { id: x, .. }, Body::Id { id: y, .. }) => x == y,
        (Body::Collection { bound: bx, .. }, Body::Collection { bound: by, .. }) => {
            bx == by && equivalent_tc(&a.content_type()?, &b.content_type()?)
        }
        (Body::Struct { members: mx, .. }, Body::Struct { members: my, .. }) => {
            mx.len() == my.len()
                && mx.iter().zip(my).all(|(p, q)| equivalent_tc(&p.tc, &q.tc))
        }
        (
            Body::Union {
                discriminator: dx,
                default_index: dix,
                members: mx,
                ..
            },
            Body::Union {
                discriminator: dy,
                default_index: diy,
                members: my,
                ..
            },
        ) => {
            dix == diy
                && mx.len() == my.len()
                && equivalent_tc(dx, dy)
                && mx
                    .iter()
                    .zip(my)
                    .all(|(p, q)| p.label == q.label && equivalent_tc(&p.tc, &q.tc))
        }
        (
            Body::Enum { member_names: nx, .. },
            Body::Enum { member_names: ny, .. },
        ) => nx.len() == ny.len(),
        (Body::Value { members: mx, .. }, Body::Value { members: my, .. }) => {
            mx.len() == my.len()
                && mx.iter().zip(my).all(|(p, q)| equivalent_tc(&p.tc, &q.tc))
        }
        // Aliases were unwound above.
        _ => false,
    };
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::Label;
    use crate::registry::TypeCodeFactory;
    use crate::typecode::{StructMember, UnionMember};

    fn point(f: &TypeCodeFactory, id: &str, member_kind: TcKind) -> TypeCode {
        let m = TypeCode::primitive(f, member_kind);
        TypeCode::structure(
            f,
            TcKind::TK_STRUCT,
            id,
            "Point",
            vec![
                StructMember { name: "x".into(), tc: m.clone() },
                StructMember { name: "y".into(), tc: m },
            ],
        )
    }

    #[test]
    fn test_equal_reflexive_and_structural() {
        let f = TypeCodeFactory::new();
        let a = point(&f, "IDL:acme/Point:1.0", TcKind::TK_LONG);
        let b = point(&f, "IDL:acme/Point:1.0", TcKind::TK_LONG);
        assert!(a.equal(&a).unwrap());
        assert!(a.equal(&b).unwrap());

        let other_id = point(&f, "IDL:acme/Other:1.0", TcKind::TK_LONG);
        assert!(!a.equal(&other_id).unwrap());
        let other_member = point(&f, "IDL:acme/Point:1.0", TcKind::TK_SHORT);
        assert!(!a.equal(&other_member).unwrap());
    }

    #[test]
    fn test_equal_ignores_member_names() {
        let f = TypeCodeFactory::new();
        let m = TypeCode::primitive(&f, TcKind::TK_LONG);
        let a = TypeCode::structure(
            &f,
            TcKind::TK_STRUCT,
            "IDL:acme/S:1.0",
            "S",
            vec![StructMember { name: "first".into(), tc: m.clone() }],
        );
        let b = TypeCode::structure(
            &f,
            TcKind::TK_STRUCT,
            "IDL:acme/S:1.0",
            "S",
            vec![StructMember { name: "renamed".into(), tc: m }],
        );
        assert!(a.equal(&b).unwrap());
    }

    #[test]
    fn test_objref_generic_object_wildcard() {
        let f = TypeCodeFactory::new();
        let specific = TypeCode::with_id(&f, TcKind::TK_OBJREF, "IDL:Foo:1.0", "Foo");
        let generic = TypeCode::primitive(&f, TcKind::TK_OBJREF);
        assert!(specific.equal(&generic).unwrap());
        assert!(generic.equal(&specific).unwrap());

        let other = TypeCode::with_id(&f, TcKind::TK_OBJREF, "IDL:Bar:1.0", "Bar");
        assert!(!specific.equal(&other).unwrap());
    }

    #[test]
    fn test_equal_on_cyclic_graph_terminates() {
        let f = TypeCodeFactory::new();
        let build = |f: &TypeCodeFactory| {
            let next = TypeCode::recursive(f, "IDL:acme/Node:1.0");
            let seq = TypeCode::sequence(f, TcKind::TK_SEQUENCE, 0, &next);
            TypeCode::structure(
                f,
                TcKind::TK_STRUCT,
                "IDL:acme/Node:1.0",
                "Node",
                vec![StructMember { name: "children".into(), tc: seq }],
            )
        };
        let a = build(&f);
        let b = build(&f);
        assert!(a.equal(&a).unwrap());
        assert!(a.equal(&b).unwrap());
    }

    #[test]
    fn test_union_labels_must_match() {
        let f = TypeCodeFactory::new();
        let disc = TypeCode::primitive(&f, TcKind::TK_LONG);
        let m = TypeCode::primitive(&f, TcKind::TK_FLOAT);
        let make = |label| {
            TypeCode::union(
                &f,
                TcKind::TK_UNION,
                "IDL:acme/U:1.0",
                "U",
                &disc,
                vec![UnionMember { name: "a".into(), label, tc: m.clone() }],
            )
        };
        let one = make(Label::Long(1));
        let two = make(Label::Long(2));
        assert!(one.equal(&one).unwrap());
        assert!(!one.equal(&two).unwrap());
    }

    #[test]
    fn test_equivalent_unwinds_aliases() {
        let f = TypeCodeFactory::new();
        let base = TypeCode::primitive(&f, TcKind::TK_LONG);
        let aliased = TypeCode::alias(&f, TcKind::TK_ALIAS, "IDL:acme/MyLong:1.0", "MyLong", &base);
        assert!(!aliased.equal(&base).unwrap());
        assert!(aliased.equivalent(&base).unwrap());

        let deep = TypeCode::alias(&f, TcKind::TK_ALIAS, "IDL:acme/Deep:1.0", "Deep", &aliased);
        assert!(deep.equivalent(&base).unwrap());
    }

    #[test]
    fn test_equivalent_id_short_circuit() {
        let f = TypeCodeFactory::new();
        // Same id, different member types: equivalent by id, not equal.
        let a = point(&f, "IDL:acme/P:1.0", TcKind::TK_LONG);
        let b = point(&f, "IDL:acme/P:1.0", TcKind::TK_SHORT);
        assert!(a.equivalent(&b).unwrap());
        assert!(!a.equal(&b).unwrap());
    }

    #[test]
    fn test_equivalent_implied_by_equal() {
        let f = TypeCodeFactory::new();
        let a = point(&f, "IDL:acme/P:1.0", TcKind::TK_LONG);
        let b = point(&f, "IDL:acme/P:1.0", TcKind::TK_LONG);
        assert!(a.equal(&b).unwrap());
        assert!(a.equivalent(&b).unwrap());
    }

    #[test]
    fn test_accessor_mismatch_means_not_equal() {
        let f = TypeCodeFactory::new();
        let seq = TypeCode::recursive_sequence(&f, TcKind::TK_SEQUENCE, 0, 1);
        let other = TypeCode::sequence(
            &f,
            TcKind::TK_SEQUENCE,
            0,
            &TypeCode::primitive(&f, TcKind::TK_LONG),
        );
        // The orphan recursive sequence cannot resolve its element type;
        // comparison reports false rather than an error.
        assert!(!seq.equal(&other).unwrap());
    }
}
