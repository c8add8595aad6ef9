// Copyright 2026 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

//! Control flow graph and dominance queries over a procedure's blocks.
//!
//! The graph is built once by the caller from the lifted procedure and stays
//! immutable for the lifetime of a transform run: the live-copy pass inserts
//! statements inside blocks but never adds or removes edges, so the
//! [`DominatorTree`] computed from a [`Cfg`] remains valid throughout.

mod dominators;
mod graph;

pub use dominators::DominatorTree;
pub use graph::Cfg;
