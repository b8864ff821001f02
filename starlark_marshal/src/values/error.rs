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

//! Errors raised by the value model itself.

/// Errors that abort an operation regardless of the values involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ControlError {
    /// Nesting exceeded the configured maximum depth.
    #[error("Too many recursion levels")]
    TooManyRecursionLevel,
}

/// Errors returned by operations on [`Value`](crate::values::Value).
#[derive(Debug, thiserror::Error)]
pub enum ValueError {
    /// The value cannot be used as a dict key.
    #[error("unhashable type: `{0}`")]
    NotHashable(String),
    /// Mutation was attempted on a frozen container.
    #[error("Cannot mutate a frozen `{0}`")]
    CannotMutateFrozen(&'static str),
}
