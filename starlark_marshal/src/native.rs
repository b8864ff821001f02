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

//! The host side of a conversion.

use std::any::Any;
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fmt;
use std::fmt::Debug;
use std::fmt::Display;
use std::sync::Arc;
use std::time::SystemTime;

use chrono::DateTime;
use chrono::Utc;

use crate::protocol::Marshaler;

/// A host value that can be handed to, or returned from, the engine.
///
/// [`unmarshal`](fn@crate::unmarshal) produces integers no wider than 64 bits.
/// An [`I128`](NativeValue::I128) or [`U128`](NativeValue::U128) outside the
/// 64-bit range marshals fine but fails to unmarshal with an out-of-range
/// error; read such values back with [`unmarshal_int`](crate::unmarshal_int).
#[derive(Debug, Clone)]
pub enum NativeValue {
    /// Absence.
    None,
    Bool(bool),
    String(String),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    /// Marshal-only beyond the 64-bit range.
    I128(i128),
    Isize(isize),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    /// Marshal-only beyond the 64-bit range.
    U128(u128),
    Usize(usize),
    F32(f32),
    F64(f64),
    Time(DateTime<Utc>),
    /// Ordered sequence.
    Seq(Vec<NativeValue>),
    /// Mapping with keys of any native kind.
    Map(NativeMap),
    /// A type that converts itself.
    Custom(Arc<dyn Marshaler>),
    /// Any other host value. No rule converts it.
    Opaque(OpaqueValue),
}

static_assertions::assert_impl_all!(NativeValue: Send, Sync);

impl NativeValue {
    /// Wrap a type implementing the conversion protocol.
    pub fn custom<T: Marshaler>(value: T) -> NativeValue {
        NativeValue::Custom(Arc::new(value))
    }

    /// Wrap a host value no rule knows how to convert.
    pub fn opaque<T: Debug + Send + Sync + 'static>(value: T) -> NativeValue {
        NativeValue::Opaque(OpaqueValue::new(value))
    }

    /// `true` for absence.
    pub fn is_none(&self) -> bool {
        matches!(self, NativeValue::None)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            NativeValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            NativeValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Any integer variant whose value fits in `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            NativeValue::I8(x) => Some(x.into()),
            NativeValue::I16(x) => Some(x.into()),
            NativeValue::I32(x) => Some(x.into()),
            NativeValue::I64(x) => Some(x),
            NativeValue::I128(x) => x.try_into().ok(),
            NativeValue::Isize(x) => x.try_into().ok(),
            NativeValue::U8(x) => Some(x.into()),
            NativeValue::U16(x) => Some(x.into()),
            NativeValue::U32(x) => Some(x.into()),
            NativeValue::U64(x) => x.try_into().ok(),
            NativeValue::U128(x) => x.try_into().ok(),
            NativeValue::Usize(x) => x.try_into().ok(),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&[NativeValue]> {
        match self {
            NativeValue::Seq(xs) => Some(xs),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&NativeMap> {
        match self {
            NativeValue::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Recover the concrete type of a [`Custom`](NativeValue::Custom) value.
    pub fn downcast_custom<T: Marshaler>(&self) -> Option<&T> {
        match self {
            NativeValue::Custom(x) => x.downcast_ref::<T>(),
            _ => None,
        }
    }
}

impl PartialEq for NativeValue {
    fn eq(&self, other: &NativeValue) -> bool {
        match (self, other) {
            (NativeValue::None, NativeValue::None) => true,
            (NativeValue::Bool(a), NativeValue::Bool(b)) => a == b,
            (NativeValue::String(a), NativeValue::String(b)) => a == b,
            (NativeValue::I8(a), NativeValue::I8(b)) => a == b,
            (NativeValue::I16(a), NativeValue::I16(b)) => a == b,
            (NativeValue::I32(a), NativeValue::I32(b)) => a == b,
            (NativeValue::I64(a), NativeValue::I64(b)) => a == b,
            (NativeValue::I128(a), NativeValue::I128(b)) => a == b,
            (NativeValue::Isize(a), NativeValue::Isize(b)) => a == b,
            (NativeValue::U8(a), NativeValue::U8(b)) => a == b,
            (NativeValue::U16(a), NativeValue::U16(b)) => a == b,
            (NativeValue::U32(a), NativeValue::U32(b)) => a == b,
            (NativeValue::U64(a), NativeValue::U64(b)) => a == b,
            (NativeValue::U128(a), NativeValue::U128(b)) => a == b,
            (NativeValue::Usize(a), NativeValue::Usize(b)) => a == b,
            (NativeValue::F32(a), NativeValue::F32(b)) => a == b,
            (NativeValue::F64(a), NativeValue::F64(b)) => a == b,
            (NativeValue::Time(a), NativeValue::Time(b)) => a == b,
            (NativeValue::Seq(a), NativeValue::Seq(b)) => a == b,
            (NativeValue::Map(a), NativeValue::Map(b)) => a == b,
            // Host objects have no structural equality; identity only.
            (NativeValue::Custom(a), NativeValue::Custom(b)) => Arc::ptr_eq(a, b),
            (NativeValue::Opaque(a), NativeValue::Opaque(b)) => Arc::ptr_eq(&a.value, &b.value),
            _ => false,
        }
    }
}

macro_rules! native_from {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$t> for NativeValue {
                fn from(x: $t) -> NativeValue {
                    NativeValue::$variant(x)
                }
            }
        )*
    };
}

native_from!(
    bool => Bool,
    String => String,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    i128 => I128,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    u128 => U128,
    usize => Usize,
    f32 => F32,
    f64 => F64,
    DateTime<Utc> => Time,
    NativeMap => Map,
    OpaqueValue => Opaque,
);

impl From<&str> for NativeValue {
    fn from(x: &str) -> NativeValue {
        NativeValue::String(x.to_owned())
    }
}

impl From<SystemTime> for NativeValue {
    fn from(x: SystemTime) -> NativeValue {
        NativeValue::Time(DateTime::<Utc>::from(x))
    }
}

impl<T: Into<NativeValue>> From<Vec<T>> for NativeValue {
    fn from(xs: Vec<T>) -> NativeValue {
        NativeValue::Seq(xs.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<NativeValue>> From<Option<T>> for NativeValue {
    fn from(x: Option<T>) -> NativeValue {
        match x {
            Some(x) => x.into(),
            None => NativeValue::None,
        }
    }
}

impl<K: Into<NativeValue>, V: Into<NativeValue>, S> From<HashMap<K, V, S>> for NativeValue {
    fn from(m: HashMap<K, V, S>) -> NativeValue {
        NativeValue::Map(m.into_iter().collect())
    }
}

impl<K: Into<NativeValue>, V: Into<NativeValue>> From<BTreeMap<K, V>> for NativeValue {
    fn from(m: BTreeMap<K, V>) -> NativeValue {
        NativeValue::Map(m.into_iter().collect())
    }
}

/// A mapping whose keys may be of any native kind.
///
/// Entries keep the order they were inserted in, which is the order they are
/// marshaled in; equality ignores it.
#[derive(Debug, Clone, Default)]
pub struct NativeMap {
    entries: Vec<(NativeValue, NativeValue)>,
}

impl NativeMap {
    pub fn new() -> NativeMap {
        NativeMap::default()
    }

    pub fn with_capacity(n: usize) -> NativeMap {
        NativeMap {
            entries: Vec::with_capacity(n),
        }
    }

    /// Insert an entry, replacing and returning the value of an equal key.
    pub fn insert(
        &mut self,
        key: impl Into<NativeValue>,
        value: impl Into<NativeValue>,
    ) -> Option<NativeValue> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => Some(std::mem::replace(v, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Append without looking for an equal key. Caller guarantees keys are distinct.
    pub(crate) fn push_unique(&mut self, key: NativeValue, value: NativeValue) {
        self.entries.push((key, value));
    }

    pub fn get(&self, key: &NativeValue) -> Option<&NativeValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_str(&self, key: &str) -> Option<&NativeValue> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_str() == Some(key))
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&NativeValue, &NativeValue)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Convert to a string-keyed map if every key is a string,
    /// otherwise give the map back unchanged.
    pub fn into_string_keyed(self) -> Result<HashMap<String, NativeValue>, NativeMap> {
        if !self
            .entries
            .iter()
            .all(|(k, _)| matches!(k, NativeValue::String(_)))
        {
            return Err(self);
        }
        Ok(self
            .entries
            .into_iter()
            .filter_map(|(k, v)| match k {
                NativeValue::String(k) => Some((k, v)),
                _ => None,
            })
            .collect())
    }
}

impl PartialEq for NativeMap {
    fn eq(&self, other: &NativeMap) -> bool {
        self.len() == other.len() && self.entries.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K: Into<NativeValue>, V: Into<NativeValue>> FromIterator<(K, V)> for NativeMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> NativeMap {
        let mut map = NativeMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl IntoIterator for NativeMap {
    type Item = (NativeValue, NativeValue);
    type IntoIter = std::vec::IntoIter<(NativeValue, NativeValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// A host value with no conversion rule.
///
/// Remembers its Rust type name and `Debug` rendering for error messages.
#[derive(Clone)]
pub struct OpaqueValue {
    type_name: &'static str,
    repr: String,
    value: Arc<dyn Any + Send + Sync>,
}

impl OpaqueValue {
    pub fn new<T: Debug + Send + Sync + 'static>(value: T) -> OpaqueValue {
        OpaqueValue {
            type_name: std::any::type_name::<T>(),
            repr: format!("{:?}", value),
            value: Arc::new(value),
        }
    }

    /// The Rust type name of the wrapped value.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }
}

impl Debug for OpaqueValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.repr)
    }
}

impl Display for OpaqueValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.type_name, self.repr)
    }
}
