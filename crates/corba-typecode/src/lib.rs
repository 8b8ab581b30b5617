// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # corba-typecode - CORBA TypeCode engine
//!
//! A pure Rust implementation of the CORBA TypeCode machinery per the OMG
//! CORBA specification: self-describing type descriptors for the full IDL
//! type system, with structural comparison, a CDR wire codec, and
//! descriptor-driven value copy-through.
//!
//! ## Quick Start
//!
//! ```rust
//! use corba_typecode::{StructMember, TcKind, TypeCode, TypeCodeFactory};
//! use corba_typecode::cdr::{CdrInput, CdrOutput};
//!
//! fn main() -> corba_typecode::Result<()> {
//!     let factory = TypeCodeFactory::new();
//!     let long_tc = TypeCode::primitive(&factory, TcKind::TK_LONG);
//!     let point = TypeCode::structure(
//!         &factory,
//!         TcKind::TK_STRUCT,
//!         "IDL:demo/Point:1.0",
//!         "Point",
//!         vec![
//!             StructMember { name: "x".into(), tc: long_tc.clone() },
//!             StructMember { name: "y".into(), tc: long_tc },
//!         ],
//!     );
//!
//!     // Marshal the descriptor and read it back.
//!     let mut out = CdrOutput::new();
//!     point.write(&mut out)?;
//!     let bytes = out.into_bytes();
//!     let decoded = TypeCode::read(&mut CdrInput::new(&bytes), &factory)?;
//!     assert!(decoded.equal(&point)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`TypeCode`] | Immutable descriptor handle, one shape constructor per kind family |
//! | [`TypeCodeFactory`] | Owning context, maps repository ids to descriptors |
//! | [`TcKind`] | The 33 OMG TCKind values with their encoding classification |
//! | [`Label`] | Typed union branch label |
//! | [`ForeignTypeCode`] | Accessor contract for descriptors from other implementations |
//!
//! ## Modules Overview
//!
//! - [`typecode`] - Descriptor model, constructors, accessors (start here)
//! - [`cdr`] - CDR stream primitives and encapsulations
//! - [`registry`] - Repository-id registry
//! - [`kind`] - TCKind table
//! - [`label`] - Union labels
//!
//! ## See Also
//!
//! - [CORBA Specification](https://www.omg.org/spec/CORBA/3.0/) (Section 4.11, TypeCodes)

pub mod cdr;
pub mod error;
pub mod kind;
pub mod label;
pub mod registry;
pub mod typecode;

pub use error::{Error, Result};
pub use kind::{EncodingForm, TcKind, INDIRECTION_MARKER, OBJECT_REPOSITORY_ID};
pub use label::Label;
pub use registry::TypeCodeFactory;
pub use typecode::foreign::ForeignTypeCode;
pub use typecode::{
    StructMember, TypeCode, UnionMember, ValueMember, NO_DEFAULT_BRANCH, PRIVATE_MEMBER,
    PUBLIC_MEMBER,
};
