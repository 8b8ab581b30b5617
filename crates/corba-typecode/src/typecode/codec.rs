// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! TypeCode wire codec
//!
//! Encodes a descriptor as its u32 kind followed by kind-specific
//! parameters: nothing for the parameterless kinds, bare scalars for the
//! simple kinds, a length-prefixed encapsulation for the complex kinds.
//! Cyclic graphs stay compact on the wire: an indirection node encodes as
//! the reserved marker plus a negative byte offset back to the first
//! occurrence of its target, tracked in stream-scoped position tables on
//! both sides.

use std::collections::HashMap;
use std::sync::Arc;

use crate::cdr::{CdrInput, CdrOutput};
use crate::error::{Error, Result};
use crate::kind::{EncodingForm, TcKind, INDIRECTION_MARKER};
use crate::label::Label;
use crate::registry::TypeCodeFactory;
use crate::typecode::{Body, StructMember, TypeCode, UnionMember, ValueMember};

/// Encode-side table: repository id -> absolute position of the kind field
/// of the first descriptor written under that id.
type IdTable = HashMap<String, usize>;

/// Decode-side table entry for a position at which a kind field was read.
enum Seen {
    /// Payload still being decoded; the id is filled in as soon as the
    /// encapsulation yields it.
    InProgress(Option<String>),
    Done(TypeCode),
}

impl TypeCode {
    /// Write this descriptor to `out`. A single call owns its indirection
    /// table, so all back-references must target descriptors written by
    /// this same call.
    pub fn write(&self, out: &mut CdrOutput) -> Result<()> {
        if self.caching_enabled() {
            if let Some(bytes) = self.cached_bytes() {
                log::debug!("[typecode] replaying {} cached bytes", bytes.len());
                out.align(4);
                out.write_bytes(&bytes);
                return Ok(());
            }
            // Build at a fresh aligned origin. The recording is position
            // independent: offsets are relative distances and alignment
            // above 4 only occurs inside encapsulations, which restart it.
            let mut fresh = CdrOutput::new();
            let mut ids = IdTable::new();
            write_tc(self, &mut fresh, &mut ids)?;
            let bytes: Arc<[u8]> = fresh.into_bytes().into();
            self.store_cached_bytes(Arc::clone(&bytes));
            out.align(4);
            out.write_bytes(&bytes);
            return Ok(());
        }
        let mut ids = IdTable::new();
        write_tc(self, out, &mut ids)
    }

    /// Read one descriptor from `input`. Identified descriptors register
    /// in `factory` as they complete, which is also what resolves the
    /// placeholders synthesized for true recursion.
    pub fn read(input: &mut CdrInput<'_>, factory: &TypeCodeFactory) -> Result<TypeCode> {
        let mut seen = HashMap::new();
        read_tc(input, factory, &mut seen)
    }
}

fn write_tc(tc: &TypeCode, out: &mut CdrOutput, ids: &mut IdTable) -> Result<()> {
    if let Some(id) = tc.indirect_id() {
        let target = *ids
            .get(id)
            .ok_or_else(|| Error::IndirectionIdNotFound(id.to_owned()))?;
        out.write_u32(INDIRECTION_MARKER);
        let offset_pos = out.position();
        out.write_i32(target as i32 - offset_pos as i32);
        return Ok(());
    }
    let (kind, body) = tc.parts()?;
    if kind == TcKind::TK_NATIVE {
        return Err(Error::CannotMarshalNative);
    }
    out.align(4);
    let kind_pos = out.position();
    out.write_u32(kind.to_u32());
    if let Some(id) = body.id() {
        if !id.is_empty() {
            ids.entry(id.to_owned()).or_insert(kind_pos);
        }
    }
    match kind.encoding_form() {
        EncodingForm::Empty => Ok(()),
        EncodingForm::Simple => match body {
            Body::String { bound } => {
                out.write_u32(*bound);
                Ok(())
            }
            Body::Fixed { digits, scale } => {
                out.write_u16(*digits);
                out.write_i16(*scale);
                Ok(())
            }
            _ => Err(Error::InvalidSimpleTypeCode),
        },
        EncodingForm::Complex => {
            out.write_encapsulation(|enc| write_complex(tc, body, enc, ids))
        }
    }
}

fn write_complex(
    tc: &TypeCode,
    body: &Body,
    enc: &mut CdrOutput,
    ids: &mut IdTable,
) -> Result<()> {
    match body {
        Body::Id { id, name } => {
            enc.write_string(id);
            enc.write_string(name);
            Ok(())
        }
        Body::Struct { id, name, members } => {
            enc.write_string(id);
            enc.write_string(name);
            enc.write_u32(members.len() as u32);
            for m in members {
                enc.write_string(&m.name);
                write_tc(&m.tc, enc, ids)?;
            }
            Ok(())
        }
        Body::Union {
            id,
            name,
            discriminator,
            default_index,
            members,
        } => {
            enc.write_string(id);
            enc.write_string(name);
            write_tc(discriminator, enc, ids)?;
            enc.write_i32(*default_index);
            enc.write_u32(members.len() as u32);
            let label_kind = discriminator.unalias()?.kind()?;
            for m in members {
                m.label.write(enc, label_kind)?;
                enc.write_string(&m.name);
                write_tc(&m.tc, enc, ids)?;
            }
            Ok(())
        }
        Body::Enum {
            id,
            name,
            member_names,
        } => {
            enc.write_string(id);
            enc.write_string(name);
            enc.write_u32(member_names.len() as u32);
            for n in member_names {
                enc.write_string(n);
            }
            Ok(())
        }
        Body::Collection { bound, .. } => {
            // content_type resolves a lazy recursive-sequence element.
            let content = tc.content_type()?;
            write_tc(&content, enc, ids)?;
            enc.write_u32(*bound);
            Ok(())
        }
        Body::Alias { id, name, content } => {
            enc.write_string(id);
            enc.write_string(name);
            write_tc(content, enc, ids)
        }
        Body::Value {
            id,
            name,
            modifier,
            concrete_base,
            members,
        } => {
            enc.write_string(id);
            enc.write_string(name);
            enc.write_i16(*modifier);
            match concrete_base {
                Some(base) => write_tc(base, enc, ids)?,
                // Absent base marshals as a null TypeCode.
                None => enc.write_u32(TcKind::TK_NULL.to_u32()),
            }
            enc.write_u32(members.len() as u32);
            for m in members {
                enc.write_string(&m.name);
                write_tc(&m.tc, enc, ids)?;
                enc.write_i16(m.visibility);
            }
            Ok(())
        }
        _ => Err(Error::InvalidComplexTypeCode),
    }
}

fn read_tc(
    input: &mut CdrInput<'_>,
    factory: &TypeCodeFactory,
    seen: &mut HashMap<usize, Seen>,
) -> Result<TypeCode> {
    input.align(4)?;
    let kind_pos = input.position();
    let raw = input.read_u32()?;
    if raw == INDIRECTION_MARKER {
        let offset_pos = input.position();
        let offset = input.read_i32()?;
        if offset > -4 {
            return Err(Error::InvalidIndirectionOffset(offset));
        }
        let target = offset_pos as i64 + i64::from(offset);
        if target < 0 {
            return Err(Error::InvalidIndirectionOffset(offset));
        }
        let target = target as usize;
        return match seen.get(&target) {
            Some(Seen::Done(tc)) => Ok(tc.clone()),
            Some(Seen::InProgress(Some(id))) => {
                // True recursion: the target is an ancestor of this very
                // decode. Resolve by id once the ancestor registers.
                log::debug!("[typecode] recursive indirection to id {id:?}");
                Ok(TypeCode::indirect(factory.handle(), id.clone()))
            }
            Some(Seen::InProgress(None)) | None => Err(Error::IndirectionNotFound(target)),
        };
    }
    let kind = TcKind::from_u32(raw).ok_or(Error::InvalidTypeCodeKindMarshal(raw))?;
    if kind == TcKind::TK_NATIVE {
        return Err(Error::CannotMarshalNative);
    }
    seen.insert(kind_pos, Seen::InProgress(None));
    let tc = match kind.encoding_form() {
        EncodingForm::Empty => TypeCode::primitive(factory, kind),
        EncodingForm::Simple => match kind {
            TcKind::TK_STRING | TcKind::TK_WSTRING => {
                let bound = input.read_u32()?;
                TypeCode::string(factory, kind, bound)
            }
            TcKind::TK_FIXED => {
                let digits = input.read_u16()?;
                let scale = input.read_i16()?;
                TypeCode::fixed(factory, kind, digits, scale)
            }
            _ => return Err(Error::InvalidSimpleTypeCode),
        },
        EncodingForm::Complex => {
            let mut enc = input.read_encapsulation()?;
            match kind {
                TcKind::TK_SEQUENCE | TcKind::TK_ARRAY => {
                    read_collection(kind, &mut enc, factory, seen)?
                }
                _ => read_complex(kind, &mut enc, factory, seen, kind_pos)?,
            }
        }
    };
    seen.insert(kind_pos, Seen::Done(tc.clone()));
    Ok(tc)
}

fn read_complex(
    kind: TcKind,
    enc: &mut CdrInput<'_>,
    factory: &TypeCodeFactory,
    seen: &mut HashMap<usize, Seen>,
    kind_pos: usize,
) -> Result<TypeCode> {
    let id = enc.read_string()?;
    let name = enc.read_string()?;
    // From here on, back-references into this descriptor can resolve by id.
    seen.insert(kind_pos, Seen::InProgress(Some(id.clone())));
    match kind {
        TcKind::TK_OBJREF | TcKind::TK_ABSTRACT_INTERFACE => {
            Ok(TypeCode::with_id(factory, kind, &id, &name))
        }
        TcKind::TK_STRUCT | TcKind::TK_EXCEPT => {
            let count = enc.read_u32()?;
            let mut members = Vec::with_capacity(count as usize);
            for _ in 0..count {
                let member_name = enc.read_string()?;
                let tc = read_tc(enc, factory, seen)?;
                members.push(StructMember {
                    name: member_name,
                    tc,
                });
            }
            Ok(TypeCode::structure(factory, kind, &id, &name, members))
        }
        TcKind::TK_UNION => {
            let discriminator = read_tc(enc, factory, seen)?;
            let default_index = enc.read_i32()?;
            let count = enc.read_u32()?;
            let label_kind = discriminator.unalias()?.kind()?;
            let mut members = Vec::with_capacity(count as usize);
            for i in 0..count {
                let label = if default_index >= 0 && i == default_index as u32 {
                    Label::Octet(enc.read_u8()?)
                } else {
                    Label::read(enc, label_kind)?
                };
                let member_name = enc.read_string()?;
                let tc = read_tc(enc, factory, seen)?;
                members.push(UnionMember {
                    name: member_name,
                    label,
                    tc,
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
            let count = enc.read_u32()?;
            let mut member_names = Vec::with_capacity(count as usize);
            for _ in 0..count {
                member_names.push(enc.read_string()?);
            }
            Ok(TypeCode::enumeration(factory, kind, &id, &name, member_names))
        }
        TcKind::TK_ALIAS | TcKind::TK_VALUE_BOX => {
            let content = read_tc(enc, factory, seen)?;
            Ok(TypeCode::alias(factory, kind, &id, &name, &content))
        }
        TcKind::TK_VALUE => {
            let modifier = enc.read_i16()?;
            let base = read_tc(enc, factory, seen)?;
            let concrete_base = match base.kind() {
                Ok(TcKind::TK_NULL) => None,
                _ => Some(base),
            };
            let count = enc.read_u32()?;
            let mut members = Vec::with_capacity(count as usize);
            for _ in 0..count {
                let member_name = enc.read_string()?;
                let tc = read_tc(enc, factory, seen)?;
                let visibility = enc.read_i16()?;
                members.push(ValueMember {
                    name: member_name,
                    tc,
                    visibility,
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
        _ => Err(Error::InvalidComplexTypeCode),
    }
}

/// Sequence and array encapsulations carry no id or name, so they bypass
/// [`read_complex`].
fn read_collection(
    kind: TcKind,
    enc: &mut CdrInput<'_>,
    factory: &TypeCodeFactory,
    seen: &mut HashMap<usize, Seen>,
) -> Result<TypeCode> {
    let content = read_tc(enc, factory, seen)?;
    let bound = enc.read_u32()?;
    Ok(TypeCode::sequence(factory, kind, bound, &content))
}
