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

//! Native to engine conversion.

use crate::error::ConvertError;
use crate::native::NativeValue;
use crate::options::ConvertOptions;
use crate::values::Dict;
use crate::values::List;
use crate::values::ControlError;
use crate::values::Value;
use crate::values::stack_guard::stack_guard;

/// Convert a native value to an engine value with default options.
pub fn marshal(native: &NativeValue) -> Result<Value, ConvertError> {
    marshal_with(&ConvertOptions::default(), native)
}

/// Convert a native value to an engine value.
///
/// A [`Custom`](NativeValue::Custom) value is handed to its `Marshaler` at any
/// nesting level and its result is returned as is. Everything else is
/// converted by kind; [`Opaque`](NativeValue::Opaque) values fail.
pub fn marshal_with(options: &ConvertOptions, native: &NativeValue) -> Result<Value, ConvertError> {
    let _guard = stack_guard(options.max_depth)?;
    Ok(match native {
        NativeValue::None => Value::None,
        NativeValue::Custom(x) => {
            tracing::trace!(value = ?x, "delegating to Marshaler");
            return x.to_dynamic().map_err(ConvertError::Delegated);
        }
        NativeValue::Bool(b) => Value::Bool(*b),
        NativeValue::String(s) => Value::String(s.clone()),
        NativeValue::I8(x) => Value::from(*x),
        NativeValue::I16(x) => Value::from(*x),
        NativeValue::I32(x) => Value::from(*x),
        NativeValue::I64(x) => Value::from(*x),
        NativeValue::I128(x) => Value::from(*x),
        NativeValue::Isize(x) => Value::from(*x),
        NativeValue::U8(x) => Value::from(*x),
        NativeValue::U16(x) => Value::from(*x),
        NativeValue::U32(x) => Value::from(*x),
        NativeValue::U64(x) => Value::from(*x),
        NativeValue::U128(x) => Value::from(*x),
        NativeValue::Usize(x) => Value::from(*x),
        NativeValue::F32(x) => Value::Float(f64::from(*x)),
        NativeValue::F64(x) => Value::Float(*x),
        NativeValue::Time(t) => Value::Time(*t),
        NativeValue::Seq(xs) => Value::List(
            xs.iter()
                .map(|x| marshal_with(options, x))
                .collect::<Result<List, _>>()?,
        ),
        NativeValue::Map(m) => {
            let mut dict = Dict::with_capacity(m.len());
            for (native_key, v) in m.iter() {
                let k = marshal_with(options, native_key)?;
                let v = marshal_with(options, v)?;
                match dict.insert_limited(k, v, options.max_depth) {
                    Ok(None) => {}
                    // Distinct native keys, such as `I32(1)` and `U8(1)`, can be equal here.
                    Ok(Some(_)) => {
                        return Err(ConvertError::DuplicateKey(format!("{:?}", native_key)));
                    }
                    Err(e) => return Err(engine_error(e)),
                }
            }
            Value::Dict(dict)
        }
        NativeValue::Opaque(x) => return Err(ConvertError::UnrecognizedType(x.to_string())),
    })
}

/// Recursion failures keep their own kind; anything else is the engine's error, unchanged.
fn engine_error(e: anyhow::Error) -> ConvertError {
    match e.downcast::<ControlError>() {
        Ok(e) => ConvertError::Control(e),
        Err(e) => ConvertError::Delegated(e),
    }
}

#[cfg(test)]
mod tests {
    use num_bigint::BigInt;
    use num_bigint::BigUint;

    use super::*;
    use crate::native::NativeMap;

    #[test]
    fn test_absence() {
        assert_eq!(Value::None, marshal(&NativeValue::None).unwrap());
    }

    #[test]
    fn test_integers_keep_signedness() {
        assert!(matches!(
            marshal(&NativeValue::I8(-3)).unwrap(),
            Value::Int(i) if i == BigInt::from(-3)
        ));
        assert!(matches!(
            marshal(&NativeValue::U8(3)).unwrap(),
            Value::UInt(u) if u == BigUint::from(3u8)
        ));
        assert!(matches!(
            marshal(&NativeValue::I128(i128::MIN)).unwrap(),
            Value::Int(i) if i == BigInt::from(i128::MIN)
        ));
        assert!(matches!(
            marshal(&NativeValue::U128(u128::MAX)).unwrap(),
            Value::UInt(u) if u == BigUint::from(u128::MAX)
        ));
    }

    #[test]
    fn test_f32_is_widened() {
        assert_eq!(Value::Float(0.5), marshal(&NativeValue::F32(0.5)).unwrap());
    }

    #[test]
    fn test_seq_keeps_order() {
        let v = marshal(&NativeValue::from(vec!["a", "b", "c"])).unwrap();
        let list = v.as_list().unwrap();
        assert_eq!(
            vec![Value::from("a"), Value::from("b"), Value::from("c")],
            list.content()
        );
    }

    #[test]
    fn test_nested_opaque_fails_whole_call() {
        let mut m = NativeMap::new();
        m.insert("ok", 1);
        m.insert(
            "bad",
            NativeValue::Seq(vec![NativeValue::opaque(std::time::Duration::ZERO)]),
        );
        let err = marshal(&NativeValue::Map(m)).unwrap_err();
        assert!(
            err.to_string()
                .starts_with("unrecognized type: core::time::Duration")
        );
    }

    #[test]
    fn test_map_with_tuple_like_key_is_unhashable() {
        let mut m = NativeMap::new();
        m.insert(vec![1, 2], "pair");
        let err = marshal(&NativeValue::Map(m)).unwrap_err();
        assert_eq!("unhashable type: `list`", err.to_string());
    }

    #[test]
    fn test_keys_equal_after_conversion() {
        let mut m = NativeMap::new();
        m.insert(NativeValue::I32(1), "a");
        m.insert(NativeValue::I64(1), "b");
        m.insert(NativeValue::U8(1), "c");
        assert_eq!(3, m.len());
        let err = marshal(&NativeValue::Map(m)).unwrap_err();
        assert_eq!(crate::ErrorKind::DuplicateKey, err.kind());
        assert!(err.to_string().starts_with("duplicate dict key `I64(1)`"));
    }

    #[test]
    fn test_distinct_numeric_keys() {
        let mut m = NativeMap::new();
        m.insert(NativeValue::I32(1), "a");
        m.insert(NativeValue::U8(2), "b");
        m.insert(NativeValue::F64(1.0), "c");
        let v = marshal(&NativeValue::Map(m)).unwrap();
        assert_eq!(r#"{1: "a", 2: "b", 1.0: "c"}"#, v.to_string());
    }

    #[test]
    fn test_depth_limit() {
        let mut v = NativeValue::from(1);
        for _ in 0..20 {
            v = NativeValue::Seq(vec![v]);
        }
        let options = ConvertOptions { max_depth: 10 };
        let err = marshal_with(&options, &v).unwrap_err();
        assert_eq!(crate::ErrorKind::RecursionLimit, err.kind());
        assert!(marshal_with(&ConvertOptions { max_depth: 30 }, &v).is_ok());
    }
}
