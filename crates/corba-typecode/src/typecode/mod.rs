// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! TypeCode descriptors
//!
//! A [`TypeCode`] is an immutable, cheaply cloneable description of an IDL
//! type: its kind plus the kind-specific parameters (bounds, members,
//! discriminators, repository id). Descriptor graphs may be cyclic; cycles
//! always pass through an indirect placeholder that resolves by repository
//! id through the owning [`TypeCodeFactory`].
//!
//! Construction happens through the shape constructors below. Accessors are
//! kind-checked: asking a string for its members is a `BadKind` error, not
//! a panic.

pub mod codec;
pub mod compare;
pub mod copy;
pub mod foreign;

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock, Weak};

use parking_lot::RwLock;

use crate::error::{Error, Result};
use crate::kind::{EncodingForm, TcKind, OBJECT_REPOSITORY_ID};
use crate::label::Label;
use crate::registry::{TypeCodeFactory, WeakFactory};

/// Visibility of a value-type member.
pub const PRIVATE_MEMBER: i16 = 0;
/// Visibility of a value-type member.
pub const PUBLIC_MEMBER: i16 = 1;

/// Default index value for a union without a default branch.
pub const NO_DEFAULT_BRANCH: i32 = -1;

/// Member of a struct or exception.
#[derive(Clone)]
pub struct StructMember {
    pub name: String,
    pub tc: TypeCode,
}

/// Member of a union, with its branch label.
#[derive(Clone)]
pub struct UnionMember {
    pub name: String,
    pub label: Label,
    pub tc: TypeCode,
}

/// Member of a value type, with its visibility.
#[derive(Clone)]
pub struct ValueMember {
    pub name: String,
    pub tc: TypeCode,
    pub visibility: i16,
}

/// Kind-specific descriptor parameters.
pub(crate) enum Body {
    /// No parameters.
    Empty,
    /// string / wstring. Bound 0 = unbounded.
    String { bound: u32 },
    /// Fixed-point decimal.
    Fixed { digits: u16, scale: i16 },
    /// objref / native / abstract_interface.
    Id { id: String, name: String },
    /// sequence / array. Unset content = unresolved recursive sequence.
    Collection {
        bound: u32,
        content: OnceLock<TypeCode>,
    },
    /// alias / value_box.
    Alias {
        id: String,
        name: String,
        content: TypeCode,
    },
    /// struct / except.
    Struct {
        id: String,
        name: String,
        members: Vec<StructMember>,
    },
    Union {
        id: String,
        name: String,
        discriminator: TypeCode,
        default_index: i32,
        members: Vec<UnionMember>,
    },
    Enum {
        id: String,
        name: String,
        member_names: Vec<String>,
    },
    Value {
        id: String,
        name: String,
        modifier: i16,
        concrete_base: Option<TypeCode>,
        members: Vec<ValueMember>,
    },
}

impl Body {
    fn id(&self) -> Option<&str> {
        match self {
            Body::Id { id, .. }
            | Body::Alias { id, .. }
            | Body::Struct { id, .. }
            | Body::Union { id, .. }
            | Body::Enum { id, .. }
            | Body::Value { id, .. } => Some(id),
            _ => None,
        }
    }

    fn name(&self) -> Option<&str> {
        match self {
            Body::Id { name, .. }
            | Body::Alias { name, .. }
            | Body::Struct { name, .. }
            | Body::Union { name, .. }
            | Body::Enum { name, .. }
            | Body::Value { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Child descriptors that should point back at the descriptor owning
    /// this body, for recursive-sequence resolution.
    fn children(&self) -> Vec<TypeCode> {
        match self {
            Body::Collection { content, .. } => content.get().cloned().into_iter().collect(),
            Body::Alias { content, .. } => vec![content.clone()],
            Body::Struct { members, .. } => members.iter().map(|m| m.tc.clone()).collect(),
            Body::Union { members, .. } => members.iter().map(|m| m.tc.clone()).collect(),
            Body::Value { members, .. } => members.iter().map(|m| m.tc.clone()).collect(),
            _ => Vec::new(),
        }
    }
}

pub(crate) enum Repr {
    Concrete { kind: TcKind, body: Body },
    /// Synthetic indirection node. `resolved` caches the target weakly;
    /// the strong owner of every identified descriptor is the factory.
    /// A weak cache keeps cyclic graphs reclaimable.
    Indirect {
        id: String,
        resolved: RwLock<Option<Weak<Inner>>>,
    },
}

pub(crate) struct Inner {
    pub(crate) repr: Repr,
    /// Enclosing descriptor, for recursive-sequence offset walks.
    parent: OnceLock<Weak<Inner>>,
    /// Levels up the parent chain to the descriptor a recursive sequence
    /// refers to. Zero for everything else.
    parent_offset: u32,
    factory: WeakFactory,
    cache: RwLock<Option<Arc<[u8]>>>,
    caching_enabled: AtomicBool,
}

/// Shared handle to a type descriptor.
#[derive(Clone)]
pub struct TypeCode {
    pub(crate) inner: Arc<Inner>,
}

impl TypeCode {
    fn build(factory: &TypeCodeFactory, kind: TcKind, body: Body, parent_offset: u32) -> TypeCode {
        let children = body.children();
        let tc = TypeCode {
            inner: Arc::new(Inner {
                repr: Repr::Concrete { kind, body },
                parent: OnceLock::new(),
                parent_offset,
                factory: factory.handle(),
                cache: RwLock::new(None),
                caching_enabled: AtomicBool::new(false),
            }),
        };
        for child in children {
            child.adopt(&tc);
        }
        if let Repr::Concrete { body, .. } = &tc.inner.repr {
            if let Some(id) = body.id() {
                factory.register(id, tc.clone());
            }
        }
        tc
    }

    /// Record `parent` as this descriptor's enclosing descriptor. First
    /// parent wins; re-parenting a shared descriptor is a no-op.
    fn adopt(&self, parent: &TypeCode) {
        let _ = self.inner.parent.set(Arc::downgrade(&parent.inner));
    }

    /// Unresolved indirection node.
    pub(crate) fn indirect(factory: WeakFactory, id: String) -> TypeCode {
        TypeCode {
            inner: Arc::new(Inner {
                repr: Repr::Indirect {
                    id,
                    resolved: RwLock::new(None),
                },
                parent: OnceLock::new(),
                parent_offset: 0,
                factory,
                cache: RwLock::new(None),
                caching_enabled: AtomicBool::new(false),
            }),
        }
    }

    /// Indirection node already pointing at its target. The target must
    /// stay reachable through the surrounding graph or the factory.
    pub(crate) fn indirect_resolved(id: String, target: &TypeCode) -> TypeCode {
        TypeCode {
            inner: Arc::new(Inner {
                repr: Repr::Indirect {
                    id,
                    resolved: RwLock::new(Some(Arc::downgrade(&target.inner))),
                },
                parent: OnceLock::new(),
                parent_offset: 0,
                factory: target.inner.factory.clone(),
                cache: RwLock::new(None),
                caching_enabled: AtomicBool::new(false),
            }),
        }
    }

    /// All-defaults descriptor, also the result of a shape constructor
    /// handed a kind it does not apply to.
    fn null(factory: &TypeCodeFactory) -> TypeCode {
        TypeCode::build(factory, TcKind::TK_NULL, Body::Empty, 0)
    }

    // === Shape constructors ===

    /// Descriptor for a parameterless kind. objref gets the well-known
    /// generic Object identity, string kinds an unbounded bound.
    pub fn primitive(factory: &TypeCodeFactory, kind: TcKind) -> TypeCode {
        match kind {
            TcKind::TK_OBJREF => TypeCode::build(
                factory,
                kind,
                Body::Id {
                    id: OBJECT_REPOSITORY_ID.to_owned(),
                    name: "Object".to_owned(),
                },
                0,
            ),
            TcKind::TK_STRING | TcKind::TK_WSTRING => {
                TypeCode::build(factory, kind, Body::String { bound: 0 }, 0)
            }
            TcKind::TK_FIXED => TypeCode::build(
                factory,
                kind,
                Body::Fixed {
                    digits: 0,
                    scale: 0,
                },
                0,
            ),
            _ if kind.encoding_form() == EncodingForm::Empty => {
                TypeCode::build(factory, kind, Body::Empty, 0)
            }
            _ => TypeCode::null(factory),
        }
    }

    /// objref / native / abstract_interface descriptor.
    pub fn with_id(factory: &TypeCodeFactory, kind: TcKind, id: &str, name: &str) -> TypeCode {
        match kind {
            TcKind::TK_OBJREF | TcKind::TK_NATIVE | TcKind::TK_ABSTRACT_INTERFACE => {
                TypeCode::build(
                    factory,
                    kind,
                    Body::Id {
                        id: id.to_owned(),
                        name: name.to_owned(),
                    },
                    0,
                )
            }
            _ => TypeCode::null(factory),
        }
    }

    /// Bounded or unbounded string / wstring descriptor.
    pub fn string(factory: &TypeCodeFactory, kind: TcKind, bound: u32) -> TypeCode {
        match kind {
            TcKind::TK_STRING | TcKind::TK_WSTRING => {
                TypeCode::build(factory, kind, Body::String { bound }, 0)
            }
            _ => TypeCode::null(factory),
        }
    }

    /// Fixed-point decimal descriptor.
    pub fn fixed(factory: &TypeCodeFactory, kind: TcKind, digits: u16, scale: i16) -> TypeCode {
        match kind {
            TcKind::TK_FIXED => TypeCode::build(factory, kind, Body::Fixed { digits, scale }, 0),
            _ => TypeCode::null(factory),
        }
    }

    /// sequence / array descriptor with a known element type.
    pub fn sequence(
        factory: &TypeCodeFactory,
        kind: TcKind,
        bound: u32,
        content: &TypeCode,
    ) -> TypeCode {
        match kind {
            TcKind::TK_SEQUENCE | TcKind::TK_ARRAY => {
                let cell = OnceLock::new();
                let _ = cell.set(content.clone());
                TypeCode::build(
                    factory,
                    kind,
                    Body::Collection {
                        bound,
                        content: cell,
                    },
                    0,
                )
            }
            _ => TypeCode::null(factory),
        }
    }

    /// Recursive sequence whose element type is the enclosing descriptor
    /// `offset` levels up. The element stays unresolved until the first
    /// `content_type` call, by which point the ancestors must exist.
    pub fn recursive_sequence(
        factory: &TypeCodeFactory,
        kind: TcKind,
        bound: u32,
        offset: u32,
    ) -> TypeCode {
        match kind {
            TcKind::TK_SEQUENCE => TypeCode::build(
                factory,
                kind,
                Body::Collection {
                    bound,
                    content: OnceLock::new(),
                },
                offset,
            ),
            _ => TypeCode::null(factory),
        }
    }

    /// alias / value_box descriptor.
    pub fn alias(
        factory: &TypeCodeFactory,
        kind: TcKind,
        id: &str,
        name: &str,
        original: &TypeCode,
    ) -> TypeCode {
        match kind {
            TcKind::TK_ALIAS | TcKind::TK_VALUE_BOX => TypeCode::build(
                factory,
                kind,
                Body::Alias {
                    id: id.to_owned(),
                    name: name.to_owned(),
                    content: original.clone(),
                },
                0,
            ),
            _ => TypeCode::null(factory),
        }
    }

    /// struct / except descriptor.
    pub fn structure(
        factory: &TypeCodeFactory,
        kind: TcKind,
        id: &str,
        name: &str,
        members: Vec<StructMember>,
    ) -> TypeCode {
        match kind {
            TcKind::TK_STRUCT | TcKind::TK_EXCEPT => TypeCode::build(
                factory,
                kind,
                Body::Struct {
                    id: id.to_owned(),
                    name: name.to_owned(),
                    members,
                },
                0,
            ),
            _ => TypeCode::null(factory),
        }
    }

    /// Union descriptor. The default branch, if any, is detected by its
    /// zero-octet label.
    pub fn union(
        factory: &TypeCodeFactory,
        kind: TcKind,
        id: &str,
        name: &str,
        discriminator: &TypeCode,
        members: Vec<UnionMember>,
    ) -> TypeCode {
        match kind {
            TcKind::TK_UNION => {
                let default_index = members
                    .iter()
                    .position(|m| m.label.is_default_marker())
                    .map_or(NO_DEFAULT_BRANCH, |i| i as i32);
                TypeCode::build(
                    factory,
                    kind,
                    Body::Union {
                        id: id.to_owned(),
                        name: name.to_owned(),
                        discriminator: discriminator.clone(),
                        default_index,
                        members,
                    },
                    0,
                )
            }
            _ => TypeCode::null(factory),
        }
    }

    /// Enumeration descriptor.
    pub fn enumeration(
        factory: &TypeCodeFactory,
        kind: TcKind,
        id: &str,
        name: &str,
        member_names: Vec<String>,
    ) -> TypeCode {
        match kind {
            TcKind::TK_ENUM => TypeCode::build(
                factory,
                kind,
                Body::Enum {
                    id: id.to_owned(),
                    name: name.to_owned(),
                    member_names,
                },
                0,
            ),
            _ => TypeCode::null(factory),
        }
    }

    /// Value-type descriptor.
    pub fn value(
        factory: &TypeCodeFactory,
        kind: TcKind,
        id: &str,
        name: &str,
        modifier: i16,
        concrete_base: Option<&TypeCode>,
        members: Vec<ValueMember>,
    ) -> TypeCode {
        match kind {
            TcKind::TK_VALUE => TypeCode::build(
                factory,
                kind,
                Body::Value {
                    id: id.to_owned(),
                    name: name.to_owned(),
                    modifier,
                    concrete_base: concrete_base.cloned(),
                    members,
                },
                0,
            ),
            _ => TypeCode::null(factory),
        }
    }

    /// Placeholder for a type that is still being defined, referenced by
    /// repository id. Resolution is attempted eagerly and retried lazily
    /// on first accessor use.
    pub fn recursive(factory: &TypeCodeFactory, id: &str) -> TypeCode {
        let tc = TypeCode::indirect(factory.handle(), id.to_owned());
        let _ = tc.concrete();
        tc
    }

    // === Resolution ===

    /// This descriptor with any indirection peeled off, resolving it
    /// through the factory if needed. Racing first resolutions both land
    /// on the same registered descriptor, so the overwrite is harmless.
    pub(crate) fn concrete(&self) -> Result<TypeCode> {
        match &self.inner.repr {
            Repr::Concrete { .. } => Ok(self.clone()),
            Repr::Indirect { id, resolved } => {
                if let Some(inner) = resolved.read().as_ref().and_then(Weak::upgrade) {
                    return Ok(TypeCode { inner });
                }
                let found = self
                    .inner
                    .factory
                    .lookup(id)
                    .ok_or(Error::UnresolvedRecursiveType)?;
                *resolved.write() = Some(Arc::downgrade(&found.inner));
                Ok(found)
            }
        }
    }

    pub(crate) fn parts(&self) -> Result<(TcKind, &Body)> {
        match &self.inner.repr {
            Repr::Concrete { kind, body } => Ok((*kind, body)),
            Repr::Indirect { .. } => Err(Error::UnresolvedRecursiveType),
        }
    }

    /// True for an indirection node that has not resolved yet.
    pub fn is_recursive(&self) -> bool {
        match &self.inner.repr {
            Repr::Indirect { resolved, .. } => {
                resolved.read().as_ref().and_then(Weak::upgrade).is_none()
            }
            Repr::Concrete { .. } => false,
        }
    }

    pub(crate) fn indirect_id(&self) -> Option<&str> {
        match &self.inner.repr {
            Repr::Indirect { id, .. } => Some(id),
            Repr::Concrete { .. } => None,
        }
    }

    /// Resolve an unset recursive-sequence element by walking the parent
    /// chain `parent_offset` levels and pointing back at that ancestor.
    fn resolve_recursive_content(&self) -> Result<TypeCode> {
        let mut cur = Arc::clone(&self.inner);
        for _ in 0..self.inner.parent_offset {
            let weak = cur.parent.get().ok_or(Error::UnresolvedRecursiveType)?;
            cur = weak.upgrade().ok_or(Error::UnresolvedRecursiveType)?;
        }
        let ancestor = TypeCode { inner: cur };
        let id = ancestor
            .id()
            .map_err(|_| Error::UnresolvedRecursiveType)?;
        let placeholder = TypeCode::indirect_resolved(id, &ancestor);
        match &self.inner.repr {
            Repr::Concrete {
                body: Body::Collection { content, .. },
                ..
            } => Ok(content.get_or_init(|| placeholder).clone()),
            _ => Err(Error::UnresolvedRecursiveType),
        }
    }

    // === Accessors ===

    pub fn kind(&self) -> Result<TcKind> {
        let tc = self.concrete()?;
        let (kind, _) = tc.parts()?;
        Ok(kind)
    }

    pub fn id(&self) -> Result<String> {
        let tc = self.concrete()?;
        let (kind, body) = tc.parts()?;
        body.id()
            .map(str::to_owned)
            .ok_or(Error::BadKind { op: "id", kind })
    }

    pub fn name(&self) -> Result<String> {
        let tc = self.concrete()?;
        let (kind, body) = tc.parts()?;
        body.name()
            .map(str::to_owned)
            .ok_or(Error::BadKind { op: "name", kind })
    }

    pub fn member_count(&self) -> Result<u32> {
        let tc = self.concrete()?;
        let (kind, body) = tc.parts()?;
        match body {
            Body::Struct { members, .. } => Ok(members.len() as u32),
            Body::Union { members, .. } => Ok(members.len() as u32),
            Body::Enum { member_names, .. } => Ok(member_names.len() as u32),
            Body::Value { members, .. } => Ok(members.len() as u32),
            _ => Err(Error::BadKind {
                op: "member_count",
                kind,
            }),
        }
    }

    pub fn member_name(&self, index: u32) -> Result<String> {
        let tc = self.concrete()?;
        let (kind, body) = tc.parts()?;
        let i = index as usize;
        match body {
            Body::Struct { members, .. } => members
                .get(i)
                .map(|m| m.name.clone())
                .ok_or(Error::Bounds {
                    index,
                    count: members.len() as u32,
                }),
            Body::Union { members, .. } => members
                .get(i)
                .map(|m| m.name.clone())
                .ok_or(Error::Bounds {
                    index,
                    count: members.len() as u32,
                }),
            Body::Enum { member_names, .. } => {
                member_names.get(i).cloned().ok_or(Error::Bounds {
                    index,
                    count: member_names.len() as u32,
                })
            }
            Body::Value { members, .. } => members
                .get(i)
                .map(|m| m.name.clone())
                .ok_or(Error::Bounds {
                    index,
                    count: members.len() as u32,
                }),
            _ => Err(Error::BadKind {
                op: "member_name",
                kind,
            }),
        }
    }

    pub fn member_type(&self, index: u32) -> Result<TypeCode> {
        let tc = self.concrete()?;
        let (kind, body) = tc.parts()?;
        let i = index as usize;
        match body {
            Body::Struct { members, .. } => {
                members.get(i).map(|m| m.tc.clone()).ok_or(Error::Bounds {
                    index,
                    count: members.len() as u32,
                })
            }
            Body::Union { members, .. } => {
                members.get(i).map(|m| m.tc.clone()).ok_or(Error::Bounds {
                    index,
                    count: members.len() as u32,
                })
            }
            Body::Value { members, .. } => {
                members.get(i).map(|m| m.tc.clone()).ok_or(Error::Bounds {
                    index,
                    count: members.len() as u32,
                })
            }
            _ => Err(Error::BadKind {
                op: "member_type",
                kind,
            }),
        }
    }

    pub fn member_label(&self, index: u32) -> Result<Label> {
        let tc = self.concrete()?;
        let (kind, body) = tc.parts()?;
        match body {
            Body::Union { members, .. } => members
                .get(index as usize)
                .map(|m| m.label)
                .ok_or(Error::Bounds {
                    index,
                    count: members.len() as u32,
                }),
            _ => Err(Error::BadKind {
                op: "member_label",
                kind,
            }),
        }
    }

    pub fn discriminator_type(&self) -> Result<TypeCode> {
        let tc = self.concrete()?;
        let (kind, body) = tc.parts()?;
        match body {
            Body::Union { discriminator, .. } => Ok(discriminator.clone()),
            _ => Err(Error::BadKind {
                op: "discriminator_type",
                kind,
            }),
        }
    }

    /// Index of the default branch, or [`NO_DEFAULT_BRANCH`].
    pub fn default_index(&self) -> Result<i32> {
        let tc = self.concrete()?;
        let (kind, body) = tc.parts()?;
        match body {
            Body::Union { default_index, .. } => Ok(*default_index),
            _ => Err(Error::BadKind {
                op: "default_index",
                kind,
            }),
        }
    }

    /// Bound of a string or collection. Zero = unbounded.
    pub fn length(&self) -> Result<u32> {
        let tc = self.concrete()?;
        let (kind, body) = tc.parts()?;
        match body {
            Body::String { bound } => Ok(*bound),
            Body::Collection { bound, .. } => Ok(*bound),
            _ => Err(Error::BadKind { op: "length", kind }),
        }
    }

    pub fn content_type(&self) -> Result<TypeCode> {
        let tc = self.concrete()?;
        let (kind, body) = tc.parts()?;
        match body {
            Body::Collection { content, .. } => match content.get() {
                Some(c) => Ok(c.clone()),
                None => tc.resolve_recursive_content(),
            },
            Body::Alias { content, .. } => Ok(content.clone()),
            _ => Err(Error::BadKind {
                op: "content_type",
                kind,
            }),
        }
    }

    pub fn fixed_digits(&self) -> Result<u16> {
        let tc = self.concrete()?;
        let (kind, body) = tc.parts()?;
        match body {
            Body::Fixed { digits, .. } => Ok(*digits),
            _ => Err(Error::BadKind {
                op: "fixed_digits",
                kind,
            }),
        }
    }

    pub fn fixed_scale(&self) -> Result<i16> {
        let tc = self.concrete()?;
        let (kind, body) = tc.parts()?;
        match body {
            Body::Fixed { scale, .. } => Ok(*scale),
            _ => Err(Error::BadKind {
                op: "fixed_scale",
                kind,
            }),
        }
    }

    pub fn member_visibility(&self, index: u32) -> Result<i16> {
        let tc = self.concrete()?;
        let (kind, body) = tc.parts()?;
        match body {
            Body::Value { members, .. } => members
                .get(index as usize)
                .map(|m| m.visibility)
                .ok_or(Error::Bounds {
                    index,
                    count: members.len() as u32,
                }),
            _ => Err(Error::BadKind {
                op: "member_visibility",
                kind,
            }),
        }
    }

    pub fn type_modifier(&self) -> Result<i16> {
        let tc = self.concrete()?;
        let (kind, body) = tc.parts()?;
        match body {
            Body::Value { modifier, .. } => Ok(*modifier),
            _ => Err(Error::BadKind {
                op: "type_modifier",
                kind,
            }),
        }
    }

    pub fn concrete_base_type(&self) -> Result<Option<TypeCode>> {
        let tc = self.concrete()?;
        let (kind, body) = tc.parts()?;
        match body {
            Body::Value { concrete_base, .. } => Ok(concrete_base.clone()),
            _ => Err(Error::BadKind {
                op: "concrete_base_type",
                kind,
            }),
        }
    }

    /// TypeCodes carry no optional parts to strip; compaction is identity.
    pub fn compact(&self) -> TypeCode {
        self.clone()
    }

    /// Index of the union branch matching `label`, falling back to the
    /// default branch index.
    pub fn current_union_member_index(&self, label: &Label) -> Result<i32> {
        let tc = self.concrete()?;
        let (kind, body) = tc.parts()?;
        match body {
            Body::Union {
                members,
                default_index,
                ..
            } => {
                for (i, m) in members.iter().enumerate() {
                    if !m.label.is_default_marker() && m.label == *label {
                        return Ok(i as i32);
                    }
                }
                Ok(*default_index)
            }
            _ => Err(Error::BadKind {
                op: "current_union_member_index",
                kind,
            }),
        }
    }

    /// Follow alias chains to the underlying descriptor. Resolves
    /// indirection along the way.
    pub(crate) fn unalias(&self) -> Result<TypeCode> {
        let mut tc = self.concrete()?;
        loop {
            let next = {
                let (_, body) = tc.parts()?;
                match body {
                    Body::Alias { content, .. } => content.clone(),
                    _ => return Ok(tc),
                }
            };
            tc = next.concrete()?;
        }
    }

    // === Encoded-bytes cache ===

    /// Switch on replay of the first encoded form of this descriptor.
    pub fn enable_caching(&self, enabled: bool) {
        self.inner.caching_enabled.store(enabled, Ordering::Relaxed);
        if !enabled {
            *self.inner.cache.write() = None;
        }
    }

    pub(crate) fn caching_enabled(&self) -> bool {
        self.inner.caching_enabled.load(Ordering::Relaxed)
    }

    pub(crate) fn cached_bytes(&self) -> Option<Arc<[u8]>> {
        self.inner.cache.read().clone()
    }

    pub(crate) fn store_cached_bytes(&self, bytes: Arc<[u8]>) {
        *self.inner.cache.write() = Some(bytes);
    }
}

impl fmt::Display for TypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner.repr {
            Repr::Indirect { id, .. } => write!(f, "indirect {id}"),
            Repr::Concrete { kind, body } => match body {
                Body::Empty => write!(f, "{}", kind.name()),
                Body::String { bound: 0 } => write!(f, "{}", kind.name()),
                Body::String { bound } => write!(f, "{}<{bound}>", kind.name()),
                Body::Fixed { digits, scale } => write!(f, "fixed<{digits},{scale}>"),
                Body::Id { name, .. } => write!(f, "{} {name}", kind.name()),
                Body::Collection { bound, content } => {
                    write!(f, "{}<", kind.name())?;
                    match content.get() {
                        Some(c) => write!(f, "{c}")?,
                        None => write!(f, "?")?,
                    }
                    if *bound > 0 {
                        write!(f, ",{bound}")?;
                    }
                    write!(f, ">")
                }
                Body::Alias { name, content, .. } => {
                    write!(f, "{} {name} = {content}", kind.name())
                }
                Body::Struct { name, members, .. } => {
                    write!(f, "{} {name} {{", kind.name())?;
                    for (i, m) in members.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{}: {}", m.name, m.tc)?;
                    }
                    write!(f, "}}")
                }
                Body::Union {
                    name,
                    discriminator,
                    members,
                    ..
                } => {
                    write!(f, "union {name} switch({discriminator}) {{")?;
                    for (i, m) in members.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{}: {}: {}", m.label, m.name, m.tc)?;
                    }
                    write!(f, "}}")
                }
                Body::Enum {
                    name, member_names, ..
                } => {
                    write!(f, "enum {name} {{{}}}", member_names.join(", "))
                }
                Body::Value { name, members, .. } => {
                    write!(f, "value {name} {{")?;
                    for (i, m) in members.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{}: {}", m.name, m.tc)?;
                    }
                    write!(f, "}}")
                }
            },
        }
    }
}

impl fmt::Debug for TypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeCode({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factory() -> TypeCodeFactory {
        TypeCodeFactory::new()
    }

    #[test]
    fn test_primitive_defaults() {
        let f = factory();
        let obj = TypeCode::primitive(&f, TcKind::TK_OBJREF);
        assert_eq!(obj.id().unwrap(), OBJECT_REPOSITORY_ID);
        assert_eq!(obj.name().unwrap(), "Object");

        let s = TypeCode::primitive(&f, TcKind::TK_STRING);
        assert_eq!(s.length().unwrap(), 0);

        let l = TypeCode::primitive(&f, TcKind::TK_LONG);
        assert_eq!(l.kind().unwrap(), TcKind::TK_LONG);
        assert_eq!(
            l.id(),
            Err(Error::BadKind {
                op: "id",
                kind: TcKind::TK_LONG
            })
        );
    }

    #[test]
    fn test_inapplicable_kind_yields_null_descriptor() {
        let f = factory();
        let tc = TypeCode::string(&f, TcKind::TK_STRUCT, 10);
        assert_eq!(tc.kind().unwrap(), TcKind::TK_NULL);
        let tc = TypeCode::fixed(&f, TcKind::TK_LONG, 5, 2);
        assert_eq!(tc.kind().unwrap(), TcKind::TK_NULL);
    }

    #[test]
    fn test_struct_members() {
        let f = factory();
        let long_tc = TypeCode::primitive(&f, TcKind::TK_LONG);
        let tc = TypeCode::structure(
            &f,
            TcKind::TK_STRUCT,
            "IDL:acme/Point:1.0",
            "Point",
            vec![
                StructMember {
                    name: "x".into(),
                    tc: long_tc.clone(),
                },
                StructMember {
                    name: "y".into(),
                    tc: long_tc,
                },
            ],
        );
        assert_eq!(tc.member_count().unwrap(), 2);
        assert_eq!(tc.member_name(1).unwrap(), "y");
        assert_eq!(tc.member_type(0).unwrap().kind().unwrap(), TcKind::TK_LONG);
        assert_eq!(tc.member_name(2), Err(Error::Bounds { index: 2, count: 2 }));
        // Constructed descriptors with an id register themselves.
        assert!(f.lookup("IDL:acme/Point:1.0").is_some());
    }

    #[test]
    fn test_union_default_detection() {
        let f = factory();
        let long_tc = TypeCode::primitive(&f, TcKind::TK_LONG);
        let disc = TypeCode::primitive(&f, TcKind::TK_LONG);
        let tc = TypeCode::union(
            &f,
            TcKind::TK_UNION,
            "IDL:acme/U:1.0",
            "U",
            &disc,
            vec![
                UnionMember {
                    name: "a".into(),
                    label: Label::Long(1),
                    tc: long_tc.clone(),
                },
                UnionMember {
                    name: "other".into(),
                    label: Label::DEFAULT,
                    tc: long_tc,
                },
            ],
        );
        assert_eq!(tc.default_index().unwrap(), 1);
        assert_eq!(
            tc.current_union_member_index(&Label::Long(1)).unwrap(),
            0
        );
        assert_eq!(
            tc.current_union_member_index(&Label::Long(99)).unwrap(),
            1
        );
    }

    #[test]
    fn test_recursive_placeholder_resolution() {
        let f = factory();
        let placeholder = TypeCode::recursive(&f, "IDL:acme/Node:1.0");
        assert!(placeholder.is_recursive());
        assert_eq!(placeholder.kind(), Err(Error::UnresolvedRecursiveType));

        let node = TypeCode::structure(
            &f,
            TcKind::TK_STRUCT,
            "IDL:acme/Node:1.0",
            "Node",
            vec![StructMember {
                name: "next".into(),
                tc: placeholder.clone(),
            }],
        );
        // Registering the definition makes the placeholder resolvable.
        assert_eq!(placeholder.kind().unwrap(), TcKind::TK_STRUCT);
        assert!(!placeholder.is_recursive());
        assert_eq!(node.member_type(0).unwrap().name().unwrap(), "Node");
    }

    #[test]
    fn test_recursive_sequence_resolves_through_parent() {
        let f = factory();
        let seq = TypeCode::recursive_sequence(&f, TcKind::TK_SEQUENCE, 0, 1);
        let node = TypeCode::structure(
            &f,
            TcKind::TK_STRUCT,
            "IDL:acme/Tree:1.0",
            "Tree",
            vec![StructMember {
                name: "children".into(),
                tc: seq.clone(),
            }],
        );
        let content = seq.content_type().unwrap();
        assert_eq!(content.id().unwrap(), "IDL:acme/Tree:1.0");
        assert!(content.kind().is_ok());
        drop(node);
    }

    #[test]
    fn test_recursive_sequence_without_parent_fails() {
        let f = factory();
        let seq = TypeCode::recursive_sequence(&f, TcKind::TK_SEQUENCE, 0, 1);
        assert_eq!(
            seq.content_type().unwrap_err(),
            Error::UnresolvedRecursiveType
        );
    }

    #[test]
    fn test_unalias_chain() {
        let f = factory();
        let base = TypeCode::primitive(&f, TcKind::TK_SHORT);
        let a = TypeCode::alias(&f, TcKind::TK_ALIAS, "IDL:acme/A:1.0", "A", &base);
        let b = TypeCode::alias(&f, TcKind::TK_ALIAS, "IDL:acme/B:1.0", "B", &a);
        assert_eq!(b.unalias().unwrap().kind().unwrap(), TcKind::TK_SHORT);
    }

    #[test]
    fn test_display_sketches() {
        let f = factory();
        assert_eq!(TypeCode::primitive(&f, TcKind::TK_LONG).to_string(), "long");
        assert_eq!(TypeCode::string(&f, TcKind::TK_STRING, 8).to_string(), "string<8>");
        let tc = TypeCode::recursive(&f, "IDL:acme/X:1.0");
        assert_eq!(tc.to_string(), "indirect IDL:acme/X:1.0");
    }
}
