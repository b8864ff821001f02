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

//! Conversion between Rust values and the values of an embedded Starlark engine.
//!
//! Host code builds a [`NativeValue`], hands it to [`marshal`](fn@marshal) before passing it to
//! a script, and recovers script results with [`unmarshal`](fn@unmarshal). Types that want to
//! control their own representation implement [`Marshaler`] and [`Unmarshaler`]
//! and register their [`Constructor`](values::Constructor) with
//! [`register_constructor!`].
//!
//! ```
//! use starlark_marshal::NativeMap;
//! use starlark_marshal::NativeValue;
//! use starlark_marshal::marshal;
//! use starlark_marshal::unmarshal;
//!
//! let mut map = NativeMap::new();
//! map.insert("foo", 42);
//! let value = marshal(&NativeValue::Map(map.clone())).unwrap();
//! assert_eq!(r#"{"foo": 42}"#, value.to_string());
//! assert_eq!(NativeValue::Map(map), unmarshal(&value).unwrap());
//! ```

#![deny(rustdoc::broken_intra_doc_links)]

mod error;
mod marshal;
mod native;
mod options;
mod protocol;
pub mod registry;
mod unmarshal;
pub mod values;

#[cfg(test)]
mod tests;

#[doc(hidden)]
pub mod __derive_refs {
    pub use inventory;
}

pub use crate::error::ConvertError;
pub use crate::error::ErrorKind;
pub use crate::marshal::marshal;
pub use crate::marshal::marshal_with;
pub use crate::native::NativeMap;
pub use crate::native::NativeValue;
pub use crate::native::OpaqueValue;
pub use crate::options::ConvertOptions;
pub use crate::protocol::Marshaler;
pub use crate::protocol::ProvidesConstructor;
pub use crate::protocol::Unmarshaler;
pub use crate::unmarshal::unmarshal;
pub use crate::unmarshal::unmarshal_int;
pub use crate::unmarshal::unmarshal_into;
pub use crate::unmarshal::unmarshal_into_with;
pub use crate::unmarshal::unmarshal_with;
