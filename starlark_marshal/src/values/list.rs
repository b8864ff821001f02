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

//! Mutable list.

use std::fmt;
use std::fmt::Display;

use allocative::Allocative;
use display_container::fmt_container;

use crate::values::Value;
use crate::values::error::ValueError;

/// A mutable ordered list. Mutation fails once frozen.
#[derive(Debug, Clone, Default, Allocative)]
pub struct List {
    content: Vec<Value>,
    frozen: bool,
}

impl List {
    /// The result of calling `type()` on lists.
    pub const TYPE: &'static str = "list";

    /// Create an unfrozen list.
    pub fn new(content: Vec<Value>) -> List {
        List {
            content,
            frozen: false,
        }
    }

    /// Append an element.
    pub fn push(&mut self, value: Value) -> anyhow::Result<()> {
        if self.frozen {
            return Err(ValueError::CannotMutateFrozen(Self::TYPE).into());
        }
        self.content.push(value);
        Ok(())
    }

    /// Elements of the list.
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

    /// `true` if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// `true` if the list has been frozen.
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub(crate) fn freeze(&mut self) {
        self.frozen = true;
        for value in &mut self.content {
            value.freeze();
        }
    }
}

impl PartialEq for List {
    fn eq(&self, other: &List) -> bool {
        self.content == other.content
    }
}

impl Display for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_container(f, "[", "]", &self.content)
    }
}

impl FromIterator<Value> for List {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> List {
        List::new(iter.into_iter().collect())
    }
}
