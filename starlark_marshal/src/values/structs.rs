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

//! Records tagged with the identity of the constructor that built them.

use std::hash::Hash;
use std::hash::Hasher;

use allocative::Allocative;
use display_container::fmt_keyed_container;
use dupe::Dupe;
use starlark_map::StarlarkHasher;
use starlark_map::small_map::SmallMap;

use crate::values::Value;

/// Identity of the constructor a [`Struct`] was created by.
///
/// Two structs represent the same native type iff their constructors are equal.
/// Field shape plays no part in that decision.
#[derive(
    Debug,
    Clone,
    Copy,
    Dupe,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Allocative,
    derive_more::Display
)]
pub struct Constructor(&'static str);

impl Constructor {
    /// Create a constructor identity from its name.
    pub const fn new(name: &'static str) -> Constructor {
        Constructor(name)
    }

    /// The constructor name.
    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

/// A named-field record.
#[derive(Debug, Clone, Allocative)]
pub struct Struct {
    constructor: Constructor,
    fields: SmallMap<String, Value>,
}

impl Struct {
    /// Create a struct. A repeated field name keeps the last value.
    pub fn new<K: Into<String>>(
        constructor: Constructor,
        fields: impl IntoIterator<Item = (K, Value)>,
    ) -> Struct {
        let mut map = SmallMap::new();
        for (name, value) in fields {
            map.insert(name.into(), value);
        }
        Struct {
            constructor,
            fields: map,
        }
    }

    /// The constructor this struct was tagged with.
    pub fn constructor(&self) -> Constructor {
        self.constructor
    }

    /// Field by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Iterate over the fields in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// `true` if the struct has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub(crate) fn freeze(&mut self) {
        for value in self.fields.values_mut() {
            value.freeze();
        }
    }

    pub(crate) fn write_hash(
        &self,
        hasher: &mut StarlarkHasher,
        max_depth: u32,
    ) -> anyhow::Result<()> {
        self.constructor.hash(hasher);
        // Equality ignores field order, so the combined hash must too.
        let mut unordered = 0u64;
        for (k, v) in self.fields.iter() {
            let mut entry_hasher = StarlarkHasher::new();
            k.hash(&mut entry_hasher);
            v.write_hash_limited(&mut entry_hasher, max_depth)?;
            unordered = unordered.wrapping_add(entry_hasher.finish());
        }
        hasher.write_u64(unordered);
        Ok(())
    }
}

impl PartialEq for Struct {
    fn eq(&self, other: &Struct) -> bool {
        self.constructor == other.constructor
            && self.fields.len() == other.fields.len()
            && self
                .fields
                .iter()
                .all(|(k, v)| other.fields.get(k.as_str()) == Some(v))
    }
}

impl std::fmt::Display for Struct {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fmt_keyed_container(
            f,
            &format!("{}(", self.constructor),
            ")",
            "=",
            self.iter(),
        )
    }
}
