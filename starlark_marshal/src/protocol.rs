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

//! Opt-in protocol for types that convert themselves.

use std::fmt::Debug;

use crate::values::AsAny;
use crate::values::Constructor;
use crate::values::Struct;
use crate::values::Value;

/// Declares the constructor identity records of this type are tagged with.
pub trait ProvidesConstructor {
    /// The identity. Must be unique across registered types.
    const CONSTRUCTOR: Constructor;
}

/// A native type that produces its own engine value.
///
/// Once wrapped in [`NativeValue::Custom`](crate::NativeValue::Custom), the
/// value is never inspected structurally, including as a collection element.
/// Whatever `to_dynamic` returns, value or error, is the result of `marshal`.
pub trait Marshaler: AsAny + Debug + Send + Sync {
    /// Convert to an engine value.
    fn to_dynamic(&self) -> anyhow::Result<Value>;
}

impl dyn Marshaler {
    /// Downcast to a concrete type.
    pub fn downcast_ref<T: Marshaler>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

/// A native type that populates itself from a struct tagged with its constructor.
///
/// `from_dynamic` is only called after the struct's constructor has been
/// checked against [`ProvidesConstructor::CONSTRUCTOR`].
pub trait Unmarshaler: ProvidesConstructor {
    /// Populate `self` from `value`.
    fn from_dynamic(&mut self, value: &Struct) -> anyhow::Result<()>;
}
