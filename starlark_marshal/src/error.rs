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

//! Conversion errors.

use crate::values::Constructor;
use crate::values::ControlError;

/// Classification of a [`ConvertError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum ErrorKind {
    /// No conversion rule matched the input.
    UnrecognizedType,
    /// A struct could not be bound to the requested native type.
    TypeMismatch,
    /// Returned unchanged from a protocol method or the engine.
    Delegated,
    /// An integer did not fit the native width.
    OutOfRange,
    /// The constructor registry is inconsistent.
    Registry,
    /// Input nested deeper than the configured limit.
    RecursionLimit,
    /// Distinct native keys became equal engine keys.
    DuplicateKey,
}

/// Error returned by [`marshal`](fn@crate::marshal) and [`unmarshal`](fn@crate::unmarshal).
///
/// Conversion is all-or-nothing: the first failure anywhere in a nested
/// value aborts the call.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// No rule matched; carries the type and a rendering of the value.
    #[error("unrecognized type: {0}")]
    UnrecognizedType(String),
    #[error("type mismatch: expected `{expected}`, got `{actual}`")]
    TypeMismatch { expected: String, actual: String },
    #[error(
        "constructor `{constructor}` is bound to `{type_name}`, which does not implement Unmarshaler"
    )]
    NotUnmarshaler {
        constructor: Constructor,
        type_name: &'static str,
    },
    #[error("integer `{value}` does not fit in `{target}`")]
    IntOutOfRange { value: String, target: &'static str },
    #[error("constructor `{0}` is registered by more than one type")]
    AmbiguousConstructor(Constructor),
    /// Two keys of a native map convert to equal dict keys, e.g. `1i32` and `1u8`.
    #[error("duplicate dict key `{0}`: distinct map keys convert to equal values")]
    DuplicateKey(String),
    #[error(transparent)]
    Control(#[from] ControlError),
    /// Error from a `Marshaler`, an `Unmarshaler` or the engine, unchanged.
    #[error(transparent)]
    Delegated(anyhow::Error),
}

impl ConvertError {
    /// Which kind of failure this is.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConvertError::UnrecognizedType(_) => ErrorKind::UnrecognizedType,
            ConvertError::TypeMismatch { .. } | ConvertError::NotUnmarshaler { .. } => {
                ErrorKind::TypeMismatch
            }
            ConvertError::IntOutOfRange { .. } => ErrorKind::OutOfRange,
            ConvertError::AmbiguousConstructor(_) => ErrorKind::Registry,
            ConvertError::DuplicateKey(_) => ErrorKind::DuplicateKey,
            ConvertError::Control(_) => ErrorKind::RecursionLimit,
            ConvertError::Delegated(_) => ErrorKind::Delegated,
        }
    }

    /// The underlying error of a delegated failure.
    pub fn delegated(&self) -> Option<&anyhow::Error> {
        match self {
            ConvertError::Delegated(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("payload is odd")]
    struct OddPayload;

    #[test]
    fn test_delegated_is_transparent() {
        let err = ConvertError::Delegated(OddPayload.into());
        assert_eq!("payload is odd", err.to_string());
        assert_eq!(ErrorKind::Delegated, err.kind());
        assert!(err.delegated().unwrap().downcast_ref::<OddPayload>().is_some());
    }

    #[test]
    fn test_mismatch_names_both_constructors() {
        let err = ConvertError::TypeMismatch {
            expected: "point".to_owned(),
            actual: "vector".to_owned(),
        };
        assert_eq!(
            "type mismatch: expected `point`, got `vector`",
            err.to_string()
        );
        assert_eq!(ErrorKind::TypeMismatch, err.kind());
    }
}
