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

//! Analyses and the live-copy repair pass.
//!
//! [`Liveness`] answers per-identifier liveness queries with storage-level
//! kills; [`LiveCopyInserter`] uses it to repair lost-copy conflicts before
//! out-of-SSA conversion. Procedures are independent of each other, so
//! [`transform_all`] fans the pass out over a thread pool.

mod live_copy;
mod liveness;

pub use live_copy::{LiveCopyInserter, TransformStats};
pub use liveness::Liveness;

use rayon::prelude::*;

use crate::{
    cfg::{Cfg, DominatorTree},
    ir::Procedure,
    Result,
};

/// A procedure bundled with its control flow context, ready for analysis.
#[derive(Debug, Clone)]
pub struct ProcedureUnit {
    /// The procedure under transformation.
    pub procedure: Procedure,
    /// Its control flow graph.
    pub cfg: Cfg,
    /// The dominator tree of `cfg`.
    pub dominators: DominatorTree,
}

impl ProcedureUnit {
    /// Bundles a procedure with its graph, computing the dominator tree.
    #[must_use]
    pub fn new(procedure: Procedure, cfg: Cfg) -> Self {
        let dominators = DominatorTree::compute(&cfg);
        Self {
            procedure,
            cfg,
            dominators,
        }
    }

    /// Runs live-copy insertion over this procedure.
    pub fn transform(&mut self) -> Result<TransformStats> {
        LiveCopyInserter::new(&mut self.procedure, &self.cfg, &self.dominators).transform()
    }
}

/// Runs live-copy insertion over every unit in parallel.
///
/// Returns one [`TransformStats`] per unit, in input order. The first error
/// aborts the whole batch.
pub fn transform_all(units: &mut [ProcedureUnit]) -> Result<Vec<TransformStats>> {
    units
        .par_iter_mut()
        .map(ProcedureUnit::transform)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Expression, Instruction, Operand, Storage};

    fn trivial_unit(name: &str) -> ProcedureUnit {
        let mut procedure = Procedure::new(name);
        let b0 = procedure.add_block();
        let x = procedure.identifiers_mut().define("x", Storage::Register(0));
        procedure
            .append(b0, Instruction::Assign { dst: x, src: Expression::Const(1) })
            .expect("append");
        procedure
            .append(b0, Instruction::Return { value: Some(Operand::Id(x)) })
            .expect("append");
        let cfg = Cfg::new(procedure.block_count(), b0);
        ProcedureUnit::new(procedure, cfg)
    }

    #[test]
    fn batch_transform_covers_every_unit() {
        let mut units = vec![trivial_unit("a"), trivial_unit("b"), trivial_unit("c")];
        let stats = transform_all(&mut units).expect("batch");
        assert_eq!(stats.len(), 3);
        assert!(stats.iter().all(|s| s.copies_inserted == 0));
    }
}
