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

//! Guard to check we don't recurse too deeply while converting or hashing
//! nested values.

use std::cell::Cell;

use crate::values::error::ControlError;

// Default maximum nesting level of a converted value.
#[cfg(debug_assertions)]
pub(crate) const MAX_RECURSION: u32 = 200;

#[cfg(not(debug_assertions))]
pub(crate) const MAX_RECURSION: u32 = 3000;

// A thread-local counter is used to detect too deep recursion.
//
// Thread-local is chosen instead of an explicit depth parameter because
// recursion crosses caller-supplied code: a `Marshaler` may call back into
// `marshal` for its fields, and the depth must not reset there.
thread_local! {
    static STACK_DEPTH: Cell<u32> = const { Cell::new(0) };
}

/// Stored previous stack depth before calling `try_inc`.
///
/// Stores that previous stack depths back to thread-local on drop.
#[must_use]
pub(crate) struct StackGuard {
    prev_depth: u32,
}

impl Drop for StackGuard {
    fn drop(&mut self) {
        STACK_DEPTH.with(|stack_depth| {
            stack_depth.set(self.prev_depth);
        });
    }
}

/// Increment stack depth.
fn inc() -> StackGuard {
    STACK_DEPTH.with(|stack_depth| {
        let prev_depth = stack_depth.get();
        stack_depth.set(prev_depth + 1);
        StackGuard { prev_depth }
    })
}

/// Check stack depth does not exceed `max_depth`.
fn check(max_depth: u32) -> Result<(), ControlError> {
    if STACK_DEPTH.with(|stack_depth| stack_depth.get()) >= max_depth {
        return Err(ControlError::TooManyRecursionLevel);
    }
    Ok(())
}

/// Try increment stack depth.
///
/// Return opaque object which resets stack to previous value
/// on `drop`.
///
/// If stack depth exceeds `max_depth`, return error.
pub(crate) fn stack_guard(max_depth: u32) -> Result<StackGuard, ControlError> {
    check(max_depth)?;
    Ok(inc())
}
