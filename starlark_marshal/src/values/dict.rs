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

//! Mutable insertion-ordered dictionary.

use std::fmt;
use std::fmt::Display;

use allocative::Allocative;
use display_container::fmt_keyed_container;
use starlark_map::Hashed;
use starlark_map::small_map::SmallMap;

use crate::values::Value;
use crate::values::error::ValueError;
use crate::values::stack_guard::MAX_RECURSION;

/// A mutable dictionary preserving insertion order.
///
/// Keys are hashed with [`Value::get_hash`] on the way in, so unhashable
/// keys are rejected with the error the key itself produced.
#[derive(Debug, Clone, Default, Allocative)]
pub struct Dict {
    content: SmallMap<Value, Value>,
    frozen: bool,
}

impl Dict {
    /// The result of calling `type()` on dicts.
    pub const TYPE: &'static str = "dict";

    /// Create an empty dict.
    pub fn new() -> Dict {
        Dict::default()
    }

    /// Create an empty dict with room for `n` entries.
    pub fn with_capacity(n: usize) -> Dict {
        Dict {
            content: SmallMap::with_capacity(n),
            frozen: false,
        }
    }

    /// Insert an entry, returning the previous value for an equal key.
    pub fn insert(&mut self, key: Value, value: Value) -> anyhow::Result<Option<Value>> {
        self.insert_limited(key, value, MAX_RECURSION)
    }

    /// [`insert`](Self::insert), hashing keys nested up to `max_depth` levels.
    pub(crate) fn insert_limited(
        &mut self,
        key: Value,
        value: Value,
        max_depth: u32,
    ) -> anyhow::Result<Option<Value>> {
        if self.frozen {
            return Err(ValueError::CannotMutateFrozen(Self::TYPE).into());
        }
        let hash = key.get_hash_limited(max_depth)?;
        Ok(self
            .content
            .insert_hashed(Hashed::new_unchecked(hash, key), value))
    }

    /// Look up a key. Fails if the key is unhashable.
    pub fn get(&self, key: &Value) -> anyhow::Result<Option<&Value>> {
        let hash = key.get_hash()?;
        Ok(self.content.get_hashed(Hashed::new_unchecked(hash, key)))
    }

    /// Look up a string key.
    pub fn get_str(&self, key: &str) -> Option<&Value> {
        // String hashing cannot fail.
        self.get(&Value::from(key)).ok().flatten()
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.content.iter()
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.content.keys()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// `true` if the dict is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// `true` if the dict has been frozen.
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub(crate) fn freeze(&mut self) {
        self.frozen = true;
        // Keys are hashable, hence contain no mutable containers.
        for value in self.content.values_mut() {
            value.freeze();
        }
    }
}

impl PartialEq for Dict {
    fn eq(&self, other: &Dict) -> bool {
        self.content.len() == other.content.len()
            && self
                .content
                .iter_hashed()
                .all(|(k, v)| other.content.get_hashed(k) == Some(v))
    }
}

impl Display for Dict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_keyed_container(f, "{", "}", ": ", self.content.iter())
    }
}
