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

//! Immutable tuple.

use std::fmt;
use std::fmt::Display;

use allocative::Allocative;
use display_container::fmt_container;

use crate::values::Value;

/// An immutable fixed-length sequence.
#[derive(Debug, Clone, Default, PartialEq, Allocative)]
pub struct Tuple {
    content: Vec<Value>,
}

impl Tuple {
    /// The result of calling `type()` on tuples.
    pub const TYPE: &'static str = "tuple";

    /// Create a tuple.
    pub fn new(content: Vec<Value>) -> Tuple {
        Tuple { content }
    }

    /// Elements of the tuple.
    pub fn content(&self) -> &[Value] {
        &self.content
    }

    /// Iterate over elements in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.content.iter()
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// `true` for the empty tuple.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub(crate) fn freeze(&mut self) {
        for value in &mut self.content {
            value.freeze();
        }
    }
}

impl Display for Tuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.content.as_slice() {
            [x] => write!(f, "({},)", x),
            xs => fmt_container(f, "(", ")", xs),
        }
    }
}

impl FromIterator<Value> for Tuple {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Tuple {
        Tuple::new(iter.into_iter().collect())
    }
}
