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

//! SSA intermediate representation for lifted procedures.
//!
//! A [`Procedure`] owns an ordered list of [`BasicBlock`]s and the
//! [`SsaIdentifierTable`]. Blocks hold [`Statement`]s, each wrapping one
//! [`Instruction`]. Every SSA identifier records its backing [`Storage`]
//! location, its definition site and its use sites; the procedure keeps those
//! records consistent as statements are appended or inserted.
//!
//! The representation is append-only: the live-copy repair pass only ever adds
//! statements, so no deletion or reordering operations exist.

mod block;
mod instruction;
mod procedure;
mod storage;
mod table;

pub use block::{BasicBlock, BlockId, Statement};
pub use instruction::{BinOp, Expression, Instruction, InstructionDisplay, Operand, PhiOperand};
pub use procedure::Procedure;
pub use storage::{ConditionFlags, Storage};
pub use table::{DefSite, SsaId, SsaIdentifier, SsaIdentifierTable, StatementRef};
