// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Repository-id registry
//!
//! Every TypeCode is created against a [`TypeCodeFactory`], the owning
//! context that maps repository identifiers to the descriptors built under
//! it. Constructors register identified descriptors here; indirect
//! placeholders resolve through it. Descriptors hold a [`WeakFactory`]
//! handle back to their factory, so the factory owning its descriptors
//! does not form a reference cycle.

use std::sync::{Arc, Weak};

use dashmap::DashMap;

use crate::typecode::TypeCode;

type IdMap = DashMap<String, TypeCode>;

/// Concurrent identifier -> descriptor registry.
#[derive(Clone)]
pub struct TypeCodeFactory {
    map: Arc<IdMap>,
}

/// Non-owning handle to a factory, held by descriptors.
#[derive(Clone)]
pub struct WeakFactory {
    map: Weak<IdMap>,
}

impl TypeCodeFactory {
    pub fn new() -> Self {
        TypeCodeFactory {
            map: Arc::new(DashMap::new()),
        }
    }

    /// Register a descriptor under its repository id. Last writer wins;
    /// empty identifiers are never registered.
    pub fn register(&self, id: &str, tc: TypeCode) {
        if !id.is_empty() {
            self.map.insert(id.to_owned(), tc);
        }
    }

    /// Look up a previously registered descriptor.
    pub fn lookup(&self, id: &str) -> Option<TypeCode> {
        self.map.get(id).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// A weak handle suitable for embedding in descriptors.
    pub fn handle(&self) -> WeakFactory {
        WeakFactory {
            map: Arc::downgrade(&self.map),
        }
    }
}

impl Default for TypeCodeFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl WeakFactory {
    /// Handle that resolves nothing, for descriptors built without a
    /// surviving factory.
    pub fn dangling() -> Self {
        WeakFactory { map: Weak::new() }
    }

    /// Look up through the weak handle. `None` when the id is unknown or
    /// the factory has been dropped.
    pub fn lookup(&self, id: &str) -> Option<TypeCode> {
        let map = self.map.upgrade()?;
        map.get(id).map(|entry| entry.value().clone())
    }
}
