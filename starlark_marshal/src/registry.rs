/*
 * Copyright 2019 The Starlark in Rust Authors.
 * Copyright (c) Facebook, Inc. and its affiliates.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     https://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! Constructor registry for unmarshaling structs.
//!
//! A struct only records which constructor built it. To turn it back into a
//! native value we need to know which Rust type owns that constructor, and this
//! registry provides that mapping. Entries are collected at link time with the
//! `inventory` crate (see [`register_constructor!`](crate::register_constructor)),
//! the lookup table is built on first use, and it is never modified afterwards.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::error::ConvertError;
use crate::protocol::Marshaler;
use crate::protocol::Unmarshaler;
use crate::values::Constructor;
use crate::values::Struct;

/// Builds a native value from a struct whose constructor was already checked.
pub type UnmarshalFn = fn(&Struct) -> anyhow::Result<Arc<dyn Marshaler>>;

/// Registry entry binding a constructor to a native type.
/// Collected at compile time via the `inventory` crate.
pub struct ConstructorRegistryEntry {
    /// The constructor identity.
    pub constructor: Constructor,
    /// Name of the native type, for error messages.
    pub type_name: &'static str,
    /// `None` if the type does not implement [`Unmarshaler`].
    pub unmarshal: Option<UnmarshalFn>,
}

inventory::collect!(ConstructorRegistryEntry);

enum Registered {
    Unique(&'static ConstructorRegistryEntry),
    Ambiguous,
}

/// Lookup table mapping constructor to entry, built lazily from inventory.
static CONSTRUCTOR_REGISTRY: Lazy<HashMap<Constructor, Registered>> = Lazy::new(|| {
    let mut registry = HashMap::new();
    for entry in inventory::iter::<ConstructorRegistryEntry> {
        registry
            .entry(entry.constructor)
            .and_modify(|registered| {
                tracing::warn!(
                    constructor = %entry.constructor,
                    type_name = entry.type_name,
                    "constructor registered more than once"
                );
                *registered = Registered::Ambiguous;
            })
            .or_insert(Registered::Unique(entry));
    }
    tracing::debug!("constructor registry built with {} entries", registry.len());
    registry
});

/// Look up the native type bound to a constructor.
///
/// `Ok(None)` if no type claims it.
pub fn lookup_constructor(
    constructor: Constructor,
) -> Result<Option<&'static ConstructorRegistryEntry>, ConvertError> {
    match CONSTRUCTOR_REGISTRY.get(&constructor) {
        None => Ok(None),
        Some(Registered::Unique(entry)) => Ok(Some(*entry)),
        Some(Registered::Ambiguous) => Err(ConvertError::AmbiguousConstructor(constructor)),
    }
}

/// Populate a fresh `T::default()` from `value`. Used by [`register_constructor!`](crate::register_constructor).
pub fn unmarshal_fresh<T>(value: &Struct) -> anyhow::Result<Arc<dyn Marshaler>>
where
    T: Marshaler + Unmarshaler + Default,
{
    let mut receiver = T::default();
    receiver.from_dynamic(value)?;
    Ok(Arc::new(receiver))
}

/// Bind `T`'s constructor to `T` so [`unmarshal`](fn@crate::unmarshal) can rebuild it.
///
/// `T` must implement `Marshaler`, `Unmarshaler` and `Default`.
#[macro_export]
macro_rules! register_constructor {
    ($t:ty) => {
        $crate::__derive_refs::inventory::submit! {
            $crate::registry::ConstructorRegistryEntry {
                constructor: <$t as $crate::ProvidesConstructor>::CONSTRUCTOR,
                type_name: stringify!($t),
                unmarshal: Some($crate::registry::unmarshal_fresh::<$t>),
            }
        }
    };
}

/// Claim `T`'s constructor for a type that can be marshaled but not unmarshaled.
///
/// Unmarshaling a struct with this constructor fails with a type mismatch
/// instead of an unrecognized type.
#[macro_export]
macro_rules! register_marshaler {
    ($t:ty) => {
        $crate::__derive_refs::inventory::submit! {
            $crate::registry::ConstructorRegistryEntry {
                constructor: <$t as $crate::ProvidesConstructor>::CONSTRUCTOR,
                type_name: stringify!($t),
                unmarshal: None,
            }
        }
    };
}
