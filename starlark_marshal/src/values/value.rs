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

//! The engine's value type.

use std::fmt;
use std::fmt::Display;
use std::hash::Hash;
use std::hash::Hasher;
use std::sync::Arc;

use allocative::Allocative;
use chrono::DateTime;
use chrono::SecondsFormat;
use chrono::Utc;
use num_bigint::BigInt;
use num_bigint::BigUint;
use num_traits::Zero;
use starlark_map::StarlarkHashValue;
use starlark_map::StarlarkHasher;

use crate::values::Dict;
use crate::values::List;
use crate::values::StarlarkValue;
use crate::values::Struct;
use crate::values::Tuple;
use crate::values::error::ValueError;
use crate::values::stack_guard::MAX_RECURSION;
use crate::values::stack_guard::stack_guard;

/// A value in the embedded engine.
///
/// The variant set is closed; host types enter the engine either as a
/// [`Struct`] tagged with their constructor, or as an [`Object`](Value::Object).
#[derive(Debug, Clone, Allocative)]
pub enum Value {
    /// `None`.
    None,
    /// `True` or `False`.
    Bool(bool),
    /// Arbitrary-precision signed integer.
    Int(BigInt),
    /// Arbitrary-precision unsigned integer.
    UInt(BigUint),
    /// Double precision float.
    Float(f64),
    /// Unicode string.
    String(String),
    /// A point in time.
    Time(#[allocative(skip)] DateTime<Utc>),
    /// Mutable list.
    List(List),
    /// Mutable dictionary.
    Dict(Dict),
    /// Immutable tuple.
    Tuple(Tuple),
    /// Record tagged with its constructor.
    Struct(Struct),
    /// Host-defined value.
    Object(#[allocative(skip)] Arc<dyn StarlarkValue>),
}

static_assertions::assert_impl_all!(Value: Send, Sync);

impl Value {
    /// Wrap a host type as an engine object.
    pub fn new_object<T: StarlarkValue>(value: T) -> Value {
        Value::Object(Arc::new(value))
    }

    /// The result of calling `type()` on this value.
    pub fn get_type(&self) -> &'static str {
        match self {
            Value::None => "NoneType",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::UInt(_) => "uint",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Time(_) => "time",
            Value::List(_) => List::TYPE,
            Value::Dict(_) => Dict::TYPE,
            Value::Tuple(_) => Tuple::TYPE,
            Value::Struct(s) => s.constructor().as_str(),
            Value::Object(o) => o.get_type(),
        }
    }

    /// Truthiness.
    pub fn to_bool(&self) -> bool {
        match self {
            Value::None => false,
            Value::Bool(b) => *b,
            Value::Int(i) => !i.is_zero(),
            Value::UInt(u) => !u.is_zero(),
            Value::Float(f) => *f != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::Time(_) => true,
            Value::List(l) => !l.is_empty(),
            Value::Dict(d) => !d.is_empty(),
            Value::Tuple(t) => !t.is_empty(),
            Value::Struct(_) => true,
            Value::Object(o) => o.to_bool(),
        }
    }

    /// Hash the value into `hasher`.
    ///
    /// Lists and dicts are unhashable; objects hash themselves and their
    /// errors are returned as is.
    pub fn write_hash(&self, hasher: &mut StarlarkHasher) -> anyhow::Result<()> {
        self.write_hash_limited(hasher, MAX_RECURSION)
    }

    /// [`write_hash`](Self::write_hash) failing past `max_depth` nesting levels.
    pub(crate) fn write_hash_limited(
        &self,
        hasher: &mut StarlarkHasher,
        max_depth: u32,
    ) -> anyhow::Result<()> {
        let _guard = stack_guard(max_depth)?;
        match self {
            Value::None => hasher.write_u8(0),
            Value::Bool(b) => {
                hasher.write_u8(1);
                b.hash(hasher);
            }
            Value::Int(i) => {
                hasher.write_u8(2);
                i.hash(hasher);
            }
            Value::UInt(u) => {
                // Must agree with `Int` for equal values.
                hasher.write_u8(2);
                BigInt::from(u.clone()).hash(hasher);
            }
            Value::Float(f) => {
                hasher.write_u8(3);
                let f = if *f == 0.0 {
                    0.0
                } else if f.is_nan() {
                    f64::NAN
                } else {
                    *f
                };
                hasher.write_u64(f.to_bits());
            }
            Value::String(s) => {
                hasher.write_u8(4);
                s.hash(hasher);
            }
            Value::Time(t) => {
                hasher.write_u8(5);
                t.hash(hasher);
            }
            Value::Tuple(t) => {
                hasher.write_u8(6);
                hasher.write_usize(t.len());
                for x in t.iter() {
                    x.write_hash_limited(hasher, max_depth)?;
                }
            }
            Value::Struct(s) => {
                hasher.write_u8(7);
                s.write_hash(hasher, max_depth)?;
            }
            Value::List(_) | Value::Dict(_) => {
                return Err(ValueError::NotHashable(self.get_type().to_owned()).into());
            }
            Value::Object(o) => o.write_hash(hasher)?,
        }
        Ok(())
    }

    /// Hash value used for dict keys.
    pub fn get_hash(&self) -> anyhow::Result<StarlarkHashValue> {
        self.get_hash_limited(MAX_RECURSION)
    }

    pub(crate) fn get_hash_limited(&self, max_depth: u32) -> anyhow::Result<StarlarkHashValue> {
        let mut hasher = StarlarkHasher::new();
        self.write_hash_limited(&mut hasher, max_depth)?;
        Ok(StarlarkHashValue::new_unchecked(hasher.finish() as u32))
    }

    /// Freeze the value: mutable containers reachable from it reject
    /// further mutation.
    pub fn freeze(&mut self) {
        match self {
            Value::List(l) => l.freeze(),
            Value::Dict(d) => d.freeze(),
            Value::Tuple(t) => t.freeze(),
            Value::Struct(s) => s.freeze(),
            _ => {}
        }
    }

    /// `true` if the value cannot be mutated.
    pub fn is_frozen(&self) -> bool {
        match self {
            Value::List(l) => l.is_frozen(),
            Value::Dict(d) => d.is_frozen(),
            Value::Tuple(t) => t.iter().all(Value::is_frozen),
            Value::Struct(s) => s.iter().all(|(_, v)| v.is_frozen()),
            _ => true,
        }
    }

    /// Unpack a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Unpack a struct.
    pub fn as_struct(&self) -> Option<&Struct> {
        match self {
            Value::Struct(s) => Some(s),
            _ => None,
        }
    }

    /// Unpack a list.
    pub fn as_list(&self) -> Option<&List> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    /// Unpack a dict.
    pub fn as_dict(&self) -> Option<&Dict> {
        match self {
            Value::Dict(d) => Some(d),
            _ => None,
        }
    }

    /// Unpack an engine object of type `T`.
    pub fn downcast_object<T: StarlarkValue>(&self) -> Option<&T> {
        match self {
            Value::Object(o) => o.downcast_ref::<T>(),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::UInt(a), Value::UInt(b)) => a == b,
            (Value::Int(a), Value::UInt(b)) | (Value::UInt(b), Value::Int(a)) => {
                a.to_biguint().as_ref() == Some(b)
            }
            (Value::Float(a), Value::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Time(a), Value::Time(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Dict(a), Value::Dict(b)) => a == b,
            (Value::Tuple(a), Value::Tuple(b)) => a == b,
            (Value::Struct(a), Value::Struct(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => {
                Arc::ptr_eq(a, b) || a.equals(b.as_ref())
            }
            _ => false,
        }
    }
}

// NaN is equal to itself, so equality is reflexive.
impl Eq for Value {}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "None"),
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::Int(i) => Display::fmt(i, f),
            Value::UInt(u) => Display::fmt(u, f),
            Value::Float(x) => fmt_float(*x, f),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Time(t) => write!(
                f,
                "time(\"{}\")",
                t.to_rfc3339_opts(SecondsFormat::AutoSi, true)
            ),
            Value::List(l) => Display::fmt(l, f),
            Value::Dict(d) => Display::fmt(d, f),
            Value::Tuple(t) => Display::fmt(t, f),
            Value::Struct(s) => Display::fmt(s, f),
            Value::Object(o) => Display::fmt(o, f),
        }
    }
}

fn fmt_float(x: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if x.is_nan() {
        write!(f, "nan")
    } else if x.is_infinite() {
        write!(f, "{}inf", if x > 0.0 { "+" } else { "-" })
    } else if x.fract() == 0.0 && x.abs() < 1e16 {
        write!(f, "{:.1}", x)
    } else {
        write!(f, "{}", x)
    }
}

macro_rules! value_from_int {
    ($variant:ident, $big:ty, $($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(x: $t) -> Value {
                    Value::$variant(<$big>::from(x))
                }
            }
        )*
    };
}

value_from_int!(Int, BigInt, i8, i16, i32, i64, i128, isize);
value_from_int!(UInt, BigUint, u8, u16, u32, u64, u128, usize);

impl From<bool> for Value {
    fn from(x: bool) -> Value {
        Value::Bool(x)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Value {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(x: &str) -> Value {
        Value::String(x.to_owned())
    }
}

impl From<String> for Value {
    fn from(x: String) -> Value {
        Value::String(x)
    }
}

impl From<BigInt> for Value {
    fn from(x: BigInt) -> Value {
        Value::Int(x)
    }
}

impl From<BigUint> for Value {
    fn from(x: BigUint) -> Value {
        Value::UInt(x)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(x: DateTime<Utc>) -> Value {
        Value::Time(x)
    }
}

impl From<List> for Value {
    fn from(x: List) -> Value {
        Value::List(x)
    }
}

impl From<Dict> for Value {
    fn from(x: Dict) -> Value {
        Value::Dict(x)
    }
}

impl From<Tuple> for Value {
    fn from(x: Tuple) -> Value {
        Value::Tuple(x)
    }
}

impl From<Struct> for Value {
    fn from(x: Struct) -> Value {
        Value::Struct(x)
    }
}

#[cfg(test)]
mod tests {
    use std::fmt;

    use super::*;
    use crate::values::Constructor;

    #[derive(Debug)]
    struct Unhashable;

    impl fmt::Display for Unhashable {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "<unhashable>")
        }
    }

    impl StarlarkValue for Unhashable {
        fn get_type(&self) -> &'static str {
            "unhashable_thing"
        }
    }

    #[test]
    fn test_truth() {
        assert!(!Value::None.to_bool());
        assert!(!Value::from(0).to_bool());
        assert!(!Value::from(0u8).to_bool());
        assert!(!Value::from("").to_bool());
        assert!(!Value::List(List::default()).to_bool());
        assert!(Value::from(-1).to_bool());
        assert!(Value::from(0.5).to_bool());
        let empty = Struct::new(Constructor::new("c"), Vec::<(String, Value)>::new());
        assert!(Value::Struct(empty).to_bool());
    }

    #[test]
    fn test_int_uint_equality() {
        assert_eq!(Value::from(3i32), Value::from(3u64));
        assert_ne!(Value::from(-3i32), Value::from(3u64));
        assert_eq!(
            Value::from(3i32).get_hash().unwrap(),
            Value::from(3u8).get_hash().unwrap()
        );
    }

    #[test]
    fn test_float_equality() {
        assert_eq!(Value::from(f64::NAN), Value::from(f64::NAN));
        assert_eq!(Value::from(0.0), Value::from(-0.0));
        assert_eq!(
            Value::from(0.0).get_hash().unwrap(),
            Value::from(-0.0).get_hash().unwrap()
        );
    }

    #[test]
    fn test_repr() {
        assert_eq!("None", Value::None.to_string());
        assert_eq!("True", Value::from(true).to_string());
        assert_eq!("1.0", Value::from(1.0).to_string());
        assert_eq!("1.5", Value::from(1.5).to_string());
        assert_eq!("\"a\\\"b\"", Value::from("a\"b").to_string());
        assert_eq!(
            "(1,)",
            Value::Tuple(Tuple::new(vec![Value::from(1)])).to_string()
        );
        let t: DateTime<Utc> = "2009-11-10T23:00:00Z".parse().unwrap();
        assert_eq!("time(\"2009-11-10T23:00:00Z\")", Value::from(t).to_string());
    }

    #[test]
    fn test_object_hash_error_is_unchanged() {
        let err = Value::new_object(Unhashable).get_hash().unwrap_err();
        assert_eq!("unhashable type: `unhashable_thing`", err.to_string());
    }

    #[test]
    fn test_tuple_hash_requires_hashable_elements() {
        let t = Value::Tuple(Tuple::new(vec![
            Value::from(1),
            Value::List(List::default()),
        ]));
        assert!(t.get_hash().is_err());
    }

    #[test]
    fn test_freeze_reaches_nested_lists() {
        let mut v = Value::Tuple(Tuple::new(vec![Value::List(List::default())]));
        assert!(!v.is_frozen());
        v.freeze();
        assert!(v.is_frozen());
    }
}
