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

#![doc(html_no_source)]
#![deny(missing_docs)]
#![allow(dead_code)]

//! # relift
//!
//! SSA liveness analysis and live-copy insertion for decompiled machine-code procedures.
//!
//! When a decompiler leaves SSA form it coalesces the SSA versions of each storage
//! location back into a single variable. That is unsound in the presence of loops:
//! a value produced by a phi function can still be live while a loop-carried operand
//! of the same phi redefines the shared slot on the back edge, so the coalesced
//! variable is overwritten before all forward uses execute. This is the classic
//! "lost copy" problem. `relift` implements the repair pass that runs right before
//! out-of-SSA conversion: it detects the conflicts, inserts protecting copy
//! statements of the form `new = old`, and renames the dominated uses so that later
//! coalescing is safe.
//!
//! ## Architecture
//!
//! - [`crate::ir`] — Procedures, basic blocks, statements, storage locations and
//!   the SSA identifier table with def/use bookkeeping
//! - [`crate::cfg`] — Control flow graph and dominator tree queries
//! - [`crate::analysis`] — The per-identifier liveness oracle and the
//!   [`crate::analysis::LiveCopyInserter`] pass itself
//! - [`crate::utils`] — Small shared containers (bit sets)
//!
//! ## Quick Start
//!
//! ```rust
//! use relift::prelude::*;
//!
//! let mut proc = Procedure::new("example");
//! let b0 = proc.add_block();
//! let x = proc.identifiers_mut().define("x", Storage::Register(0));
//! proc.append(b0, Instruction::Assign { dst: x, src: Expression::Const(1) })?;
//! proc.append(b0, Instruction::Return { value: Some(Operand::Id(x)) })?;
//!
//! let cfg = Cfg::new(proc.block_count(), b0);
//! let dominators = DominatorTree::compute(&cfg);
//!
//! let stats = LiveCopyInserter::new(&mut proc, &cfg, &dominators).transform()?;
//! assert_eq!(stats.copies_inserted, 0);
//! # Ok::<(), relift::Error>(())
//! ```

pub mod analysis;
pub mod cfg;
pub mod ir;
pub mod prelude;
pub mod utils;

pub(crate) mod error;

pub use error::Error;

/// Standard result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
