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

use dupe::Dupe;

use crate::values::stack_guard::MAX_RECURSION;

/// How a conversion is performed.
#[derive(Debug, Clone, Copy, Dupe, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Deepest nesting accepted before the call fails with a recursion error.
    /// Also bounds hashing of dict keys while marshaling a map.
    pub max_depth: u32,
}

impl Default for ConvertOptions {
    fn default() -> ConvertOptions {
        ConvertOptions {
            max_depth: MAX_RECURSION,
        }
    }
}
