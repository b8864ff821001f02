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

//! Engine to native conversion.

use num_bigint::BigInt;
use num_bigint::BigUint;

use crate::error::ConvertError;
use crate::native::NativeMap;
use crate::native::NativeValue;
use crate::options::ConvertOptions;
use crate::protocol::Unmarshaler;
use crate::registry::lookup_constructor;
use crate::values::Struct;
use crate::values::Value;
use crate::values::stack_guard::stack_guard;

/// Convert an engine value to a native value with default options.
pub fn unmarshal(value: &Value) -> Result<NativeValue, ConvertError> {
    unmarshal_with(&ConvertOptions::default(), value)
}

/// Convert an engine value to a native value.
///
/// Integers come back as `i32`/`u32`, or `i64`/`u64` when they do not fit.
/// Structs are rebuilt by the type registered for their constructor.
pub fn unmarshal_with(options: &ConvertOptions, value: &Value) -> Result<NativeValue, ConvertError> {
    let _guard = stack_guard(options.max_depth)?;
    Ok(match value {
        Value::None => NativeValue::None,
        Value::Bool(b) => NativeValue::Bool(*b),
        Value::String(s) => NativeValue::String(s.clone()),
        Value::Int(i) => unmarshal_signed(i)?,
        Value::UInt(u) => unmarshal_unsigned(u)?,
        Value::Float(f) => NativeValue::F64(*f),
        Value::Time(t) => NativeValue::Time(*t),
        Value::List(xs) => unmarshal_seq(options, xs.content())?,
        Value::Tuple(xs) => unmarshal_seq(options, xs.content())?,
        Value::Dict(d) => {
            let mut map = NativeMap::with_capacity(d.len());
            for (k, v) in d.iter() {
                // Dict keys are distinct under engine equality, and distinct
                // engine keys never unmarshal to equal native keys.
                map.push_unique(unmarshal_with(options, k)?, unmarshal_with(options, v)?);
            }
            NativeValue::Map(map)
        }
        Value::Struct(s) => unmarshal_struct(s)?,
        Value::Object(_) => return Err(unrecognized(value)),
    })
}

fn unmarshal_seq(options: &ConvertOptions, xs: &[Value]) -> Result<NativeValue, ConvertError> {
    Ok(NativeValue::Seq(
        xs.iter()
            .map(|x| unmarshal_with(options, x))
            .collect::<Result<_, _>>()?,
    ))
}

fn unmarshal_signed(i: &BigInt) -> Result<NativeValue, ConvertError> {
    if let Ok(x) = i32::try_from(i) {
        Ok(NativeValue::I32(x))
    } else if let Ok(x) = i64::try_from(i) {
        Ok(NativeValue::I64(x))
    } else {
        Err(ConvertError::IntOutOfRange {
            value: i.to_string(),
            target: "i64",
        })
    }
}

fn unmarshal_unsigned(u: &BigUint) -> Result<NativeValue, ConvertError> {
    if let Ok(x) = u32::try_from(u) {
        Ok(NativeValue::U32(x))
    } else if let Ok(x) = u64::try_from(u) {
        Ok(NativeValue::U64(x))
    } else {
        Err(ConvertError::IntOutOfRange {
            value: u.to_string(),
            target: "u64",
        })
    }
}

fn unmarshal_struct(s: &Struct) -> Result<NativeValue, ConvertError> {
    let constructor = s.constructor();
    let entry = match lookup_constructor(constructor)? {
        Some(entry) => entry,
        None => return Err(ConvertError::UnrecognizedType(describe_struct(s))),
    };
    let rebuild = entry.unmarshal.ok_or(ConvertError::NotUnmarshaler {
        constructor,
        type_name: entry.type_name,
    })?;
    tracing::trace!(%constructor, type_name = entry.type_name, "delegating to Unmarshaler");
    rebuild(s)
        .map(NativeValue::Custom)
        .map_err(ConvertError::Delegated)
}

/// Populate a caller-supplied receiver from a struct, with default options.
pub fn unmarshal_into<T: Unmarshaler>(value: &Value, receiver: &mut T) -> Result<(), ConvertError> {
    unmarshal_into_with(&ConvertOptions::default(), value, receiver)
}

/// Populate a caller-supplied receiver from a struct.
///
/// Fails with a type mismatch unless `value` is a struct built by
/// `T::CONSTRUCTOR`. Errors from `from_dynamic` are returned unchanged.
pub fn unmarshal_into_with<T: Unmarshaler>(
    options: &ConvertOptions,
    value: &Value,
    receiver: &mut T,
) -> Result<(), ConvertError> {
    let _guard = stack_guard(options.max_depth)?;
    let s = match value {
        Value::Struct(s) if s.constructor() == T::CONSTRUCTOR => s,
        Value::Struct(s) => {
            return Err(ConvertError::TypeMismatch {
                expected: T::CONSTRUCTOR.to_string(),
                actual: s.constructor().to_string(),
            });
        }
        _ => {
            return Err(ConvertError::TypeMismatch {
                expected: T::CONSTRUCTOR.to_string(),
                actual: value.get_type().to_owned(),
            });
        }
    };
    receiver.from_dynamic(s).map_err(ConvertError::Delegated)
}

/// Convert an `int` or `uint` to a specific integer width.
///
/// Fails if the value does not fit, rather than truncating.
pub fn unmarshal_int<T>(value: &Value) -> Result<T, ConvertError>
where
    T: for<'a> TryFrom<&'a BigInt>,
{
    let widened;
    let i = match value {
        Value::Int(i) => i,
        Value::UInt(u) => {
            widened = BigInt::from(u.clone());
            &widened
        }
        _ => {
            return Err(ConvertError::TypeMismatch {
                expected: "int".to_owned(),
                actual: value.get_type().to_owned(),
            });
        }
    };
    T::try_from(i).map_err(|_| ConvertError::IntOutOfRange {
        value: i.to_string(),
        target: std::any::type_name::<T>(),
    })
}

fn describe_struct(s: &Struct) -> String {
    format!("{} ({})", s.constructor(), s)
}

fn unrecognized(value: &Value) -> ConvertError {
    ConvertError::UnrecognizedType(format!("{} ({})", value.get_type(), value))
}
