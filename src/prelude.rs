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

//! Convenient re-exports of the most commonly used types.
//!
//! ```rust
//! use relift::prelude::*;
//! ```

pub use crate::{
    analysis::{transform_all, LiveCopyInserter, Liveness, ProcedureUnit, TransformStats},
    cfg::{Cfg, DominatorTree},
    ir::{
        BasicBlock, BinOp, BlockId, ConditionFlags, DefSite, Expression, Instruction, Operand,
        PhiOperand, Procedure, SsaId, SsaIdentifier, SsaIdentifierTable, Statement, StatementRef,
        Storage,
    },
    Error, Result,
};
