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

//! Host-defined values living inside the engine.

use std::any::Any;
use std::fmt::Debug;
use std::fmt::Display;

use starlark_map::StarlarkHasher;

use crate::values::error::ValueError;

/// Access to a value as [`Any`], implemented for every `'static` type.
///
/// Used as a supertrait so trait objects can be downcast back to
/// their concrete type.
pub trait AsAny: Any {
    /// Upcast to [`Any`].
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A host type that lives inside the engine as an opaque value.
///
/// Implementors take part in the engine's equality and hashing contract:
/// two instances must compare equal iff their payloads compare equal under the
/// type's own rule, and equal values must write equal hashes. A type that must
/// not be used as a dict key keeps the default [`write_hash`](Self::write_hash),
/// which refuses.
pub trait StarlarkValue: AsAny + Debug + Display + Send + Sync {
    /// The result of calling `type()` on the value.
    fn get_type(&self) -> &'static str;

    /// Truthiness of the value.
    fn to_bool(&self) -> bool {
        true
    }

    /// Compare with another engine object. Identity is checked before this is called.
    fn equals(&self, _other: &dyn StarlarkValue) -> bool {
        false
    }

    /// Hash the value. Errors are returned unchanged to whoever tried to hash.
    fn write_hash(&self, _hasher: &mut StarlarkHasher) -> anyhow::Result<()> {
        Err(ValueError::NotHashable(self.get_type().to_owned()).into())
    }
}

impl dyn StarlarkValue {
    /// Downcast to a concrete type.
    pub fn downcast_ref<T: StarlarkValue>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}
