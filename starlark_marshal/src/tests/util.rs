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

//! Helpers shared by the conversion tests.

use std::fmt;

use crate::ConvertError;
use crate::Marshaler;
use crate::NativeValue;
use crate::ProvidesConstructor;
use crate::Unmarshaler;
use crate::marshal;
use crate::unmarshal;
use crate::unmarshal_int;
use crate::values::Constructor;
use crate::values::StarlarkValue;
use crate::values::Struct;
use crate::values::Value;

/// Marshal then unmarshal, panicking on failure.
pub(crate) fn roundtrip(native: &NativeValue) -> NativeValue {
    let value = marshal(native).unwrap();
    unmarshal(&value).unwrap()
}

/// What `unmarshal(marshal(native))` is expected to produce.
pub(crate) fn normalize(native: &NativeValue) -> NativeValue {
    // Values beyond 64 bits do not come back at all, so they have no expectation.
    fn signed(x: i128) -> NativeValue {
        match i32::try_from(x) {
            Ok(x) => NativeValue::I32(x),
            Err(_) => NativeValue::I64(i64::try_from(x).unwrap()),
        }
    }

    fn unsigned(x: u128) -> NativeValue {
        match u32::try_from(x) {
            Ok(x) => NativeValue::U32(x),
            Err(_) => NativeValue::U64(u64::try_from(x).unwrap()),
        }
    }

    match *native {
        NativeValue::I8(x) => signed(x.into()),
        NativeValue::I16(x) => signed(x.into()),
        NativeValue::I32(x) => signed(x.into()),
        NativeValue::I64(x) => signed(x.into()),
        NativeValue::I128(x) => signed(x),
        NativeValue::Isize(x) => signed(x as i128),
        NativeValue::U8(x) => unsigned(x.into()),
        NativeValue::U16(x) => unsigned(x.into()),
        NativeValue::U32(x) => unsigned(x.into()),
        NativeValue::U64(x) => unsigned(x.into()),
        NativeValue::U128(x) => unsigned(x),
        NativeValue::Usize(x) => unsigned(x as u128),
        NativeValue::F32(x) => NativeValue::F64(x.into()),
        NativeValue::Seq(ref xs) => NativeValue::Seq(xs.iter().map(normalize).collect()),
        _ => native.clone(),
    }
}

/// Assert the conversion failed with a message containing `msg`.
#[track_caller]
pub(crate) fn assert_fails<T: fmt::Debug>(
    result: Result<T, ConvertError>,
    msg: &str,
) -> ConvertError {
    match result {
        Ok(x) => panic!("Expected failure containing `{}`, got {:?}", msg, x),
        Err(e) => {
            let s = e.to_string();
            assert!(
                s.contains(msg),
                "Expected failure containing `{}`, got `{}`",
                msg,
                s
            );
            e
        }
    }
}

/// A host type converting itself to a `custom_type(foo = ...)` struct.
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct CustomType {
    pub(crate) foo: i64,
}

impl ProvidesConstructor for CustomType {
    const CONSTRUCTOR: Constructor = Constructor::new("custom_type");
}

impl Marshaler for CustomType {
    fn to_dynamic(&self) -> anyhow::Result<Value> {
        Ok(Value::Struct(Struct::new(
            Self::CONSTRUCTOR,
            [("foo", Value::from(self.foo))],
        )))
    }
}

impl Unmarshaler for CustomType {
    fn from_dynamic(&mut self, value: &Struct) -> anyhow::Result<()> {
        let foo = value
            .get("foo")
            .ok_or_else(|| anyhow::anyhow!("`custom_type` has no field `foo`"))?;
        self.foo = unmarshal_int(foo)?;
        Ok(())
    }
}

crate::register_constructor!(CustomType);

/// A host type living in the engine as an object that refuses hashing.
#[derive(Debug, Clone)]
pub(crate) struct Handle {
    pub(crate) payload: i64,
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<handle {}>", self.payload)
    }
}

impl StarlarkValue for Handle {
    fn get_type(&self) -> &'static str {
        "handle"
    }

    fn equals(&self, other: &dyn StarlarkValue) -> bool {
        other
            .downcast_ref::<Handle>()
            .is_some_and(|other| other.payload == self.payload)
    }
}

impl Marshaler for Handle {
    fn to_dynamic(&self) -> anyhow::Result<Value> {
        Ok(Value::new_object(self.clone()))
    }
}
