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

//! The value model of the embedded engine.
//!
//! This is the contract the conversion core depends on: a closed set of
//! variants, their equality, truth, hash and freeze semantics, and the
//! constructor identity carried by [`Struct`].

mod dict;
pub(crate) mod error;
mod list;
mod object;
pub(crate) mod stack_guard;
mod structs;
mod tuple;
mod value;

pub use crate::values::dict::Dict;
pub use crate::values::error::ControlError;
pub use crate::values::error::ValueError;
pub use crate::values::list::List;
pub use crate::values::object::AsAny;
pub use crate::values::object::StarlarkValue;
pub use crate::values::structs::Constructor;
pub use crate::values::structs::Struct;
pub use crate::values::tuple::Tuple;
pub use crate::values::value::Value;
