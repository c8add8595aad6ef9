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

//! Per-identifier backward liveness with storage-level kills.
//!
//! An identifier is live at a program point when some forward path reaches a
//! use of it without first crossing a definition whose [`Storage`] interferes
//! with the identifier's own. Kills operate at storage level rather than SSA
//! level because the pass decides post-coalescing conflicts: once versions are
//! folded back into one variable, any same-storage write clobbers the slot.
//!
//! Phi operands are uses at the end of the corresponding predecessor block,
//! never in-block uses of the phi's own block.
//!
//! Queries are pure. Block-level live-in/live-out sets are computed per queried
//! identifier by a worklist fixpoint over postorder and cached, so repeated
//! queries against an unmodified procedure reuse them. The oracle borrows the
//! procedure immutably; after a mutation, build a fresh oracle.

use std::{cell::RefCell, collections::HashMap};

use crate::{
    cfg::Cfg,
    ir::{BlockId, Procedure, SsaId, StatementRef, Storage},
    utils::BitSet,
    Error, Result,
};

struct LiveSets {
    live_in: BitSet,
    live_out: BitSet,
}

/// Liveness oracle over a procedure in SSA form.
pub struct Liveness<'a> {
    procedure: &'a Procedure,
    cfg: &'a Cfg,
    sets: RefCell<HashMap<SsaId, LiveSets>>,
}

impl<'a> Liveness<'a> {
    /// Creates an oracle for `procedure` under the given control flow graph.
    #[must_use]
    pub fn new(procedure: &'a Procedure, cfg: &'a Cfg) -> Self {
        Self {
            procedure,
            cfg,
            sets: RefCell::new(HashMap::new()),
        }
    }

    /// Whether `id` is live immediately after the statement at `site`.
    pub fn is_live_out(&self, id: SsaId, site: StatementRef) -> Result<bool> {
        self.is_live_at(id, site.block, site.index + 1)
    }

    /// Whether `id` is live just before statement `index` of `block`.
    ///
    /// An `index` equal to the block length queries liveness at the block exit.
    pub fn is_live_at(&self, id: SsaId, block: BlockId, index: usize) -> Result<bool> {
        let storage = self.storage_of(id)?;
        let block_ref = self
            .procedure
            .block(block)
            .ok_or(Error::BlockNotFound(block))?;
        for statement in block_ref.statements().iter().skip(index) {
            let instruction = statement.instruction();
            if !instruction.is_phi() && instruction.uses().contains(&id) {
                return Ok(true);
            }
            if let Some(defined) = instruction.defined() {
                if self.storage_of(defined)?.interferes(&storage) {
                    return Ok(false);
                }
            }
        }
        self.live_out_of_block(id, block)
    }

    /// Whether `id` is live at the exit of `block`.
    pub fn live_out_of_block(&self, id: SsaId, block: BlockId) -> Result<bool> {
        for &successor in self.cfg.successors(block) {
            if self.phi_uses_on_edge(id, block, successor) {
                return Ok(true);
            }
            if self.block_live_in(id, successor)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn storage_of(&self, id: SsaId) -> Result<Storage> {
        self.procedure
            .identifiers()
            .get(id)
            .map(crate::ir::SsaIdentifier::storage)
            .ok_or(Error::IdentifierNotFound(id))
    }

    /// Whether a phi in `to` consumes `id` along the edge `from -> to`.
    fn phi_uses_on_edge(&self, id: SsaId, from: BlockId, to: BlockId) -> bool {
        let Some(block) = self.procedure.block(to) else {
            return false;
        };
        block.statements().iter().any(|statement| {
            statement
                .instruction()
                .phi_operands()
                .is_some_and(|operands| {
                    operands
                        .iter()
                        .any(|op| op.value == id && op.predecessor == from)
                })
        })
    }

    fn block_live_in(&self, id: SsaId, block: BlockId) -> Result<bool> {
        self.ensure_sets(id)?;
        Ok(self
            .sets
            .borrow()
            .get(&id)
            .is_some_and(|sets| sets.live_in.contains(block.index())))
    }

    fn ensure_sets(&self, id: SsaId) -> Result<()> {
        if self.sets.borrow().contains_key(&id) {
            return Ok(());
        }
        let computed = self.compute_sets(id)?;
        self.sets.borrow_mut().insert(id, computed);
        Ok(())
    }

    fn compute_sets(&self, id: SsaId) -> Result<LiveSets> {
        let storage = self.storage_of(id)?;
        let count = self.cfg.block_count();
        let mut upward_exposed = BitSet::new(count);
        let mut killed = BitSet::new(count);

        for block in self.procedure.blocks() {
            let mut redefined = false;
            for statement in block.statements() {
                let instruction = statement.instruction();
                if !redefined && !instruction.is_phi() && instruction.uses().contains(&id) {
                    upward_exposed.insert(block.id().index());
                }
                if let Some(defined) = instruction.defined() {
                    if self.storage_of(defined)?.interferes(&storage) {
                        redefined = true;
                    }
                }
            }
            if redefined {
                killed.insert(block.id().index());
            }
        }

        let mut sets = LiveSets {
            live_in: BitSet::new(count),
            live_out: BitSet::new(count),
        };
        let order = self.cfg.postorder();
        let mut changed = true;
        while changed {
            changed = false;
            for &block in &order {
                let out = self.cfg.successors(block).iter().any(|&successor| {
                    sets.live_in.contains(successor.index())
                        || self.phi_uses_on_edge(id, block, successor)
                });
                if out {
                    changed |= sets.live_out.insert(block.index());
                }
                let live_in = upward_exposed.contains(block.index())
                    || (out && !killed.contains(block.index()));
                if live_in {
                    changed |= sets.live_in.insert(block.index());
                }
            }
        }
        Ok(sets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Expression, Instruction, Operand, Storage};

    // b0: x = 1; y = x + 1; return y
    fn straight_line() -> (Procedure, Cfg, SsaId, SsaId) {
        let mut proc = Procedure::new("straight");
        let b0 = proc.add_block();
        let x = proc.identifiers_mut().define("x", Storage::Register(0));
        let y = proc.identifiers_mut().define("y", Storage::Register(1));
        proc.append(b0, Instruction::Assign { dst: x, src: Expression::Const(1) })
            .expect("append");
        proc.append(
            b0,
            Instruction::Assign {
                dst: y,
                src: Expression::Binary {
                    op: crate::ir::BinOp::Add,
                    left: Operand::Id(x),
                    right: Operand::Const(1),
                },
            },
        )
        .expect("append");
        proc.append(b0, Instruction::Return { value: Some(Operand::Id(y)) })
            .expect("append");
        let cfg = Cfg::new(proc.block_count(), b0);
        (proc, cfg, x, y)
    }

    #[test]
    fn live_between_def_and_last_use() {
        let (proc, cfg, x, y) = straight_line();
        let liveness = Liveness::new(&proc, &cfg);
        let b0 = BlockId::new(0);
        assert!(liveness.is_live_at(x, b0, 1).expect("query"));
        assert!(!liveness.is_live_at(x, b0, 2).expect("query"));
        assert!(liveness.is_live_at(y, b0, 2).expect("query"));
        assert!(!liveness
            .is_live_out(y, StatementRef { block: b0, index: 2 })
            .expect("query"));
    }

    #[test]
    fn same_storage_redefinition_kills() {
        // b0: x = 1; x2 = 2; return x2   (x and x2 share a register)
        let mut proc = Procedure::new("kill");
        let b0 = proc.add_block();
        let x = proc.identifiers_mut().define("x", Storage::Register(0));
        let x2 = proc.identifiers_mut().define_version("x", Storage::Register(0));
        proc.append(b0, Instruction::Assign { dst: x, src: Expression::Const(1) })
            .expect("append");
        proc.append(b0, Instruction::Assign { dst: x2, src: Expression::Const(2) })
            .expect("append");
        proc.append(b0, Instruction::Return { value: Some(Operand::Id(x2)) })
            .expect("append");
        let cfg = Cfg::new(proc.block_count(), b0);
        let liveness = Liveness::new(&proc, &cfg);
        // the redefinition at index 1 ends any live range of x
        assert!(!liveness.is_live_at(x, b0, 1).expect("query"));
    }

    #[test]
    fn phi_operand_is_live_out_of_its_predecessor() {
        // b0 -> b1, b0 -> b2, b1/b2 -> b3 with phi in b3
        let mut proc = Procedure::new("merge");
        let b0 = proc.add_block();
        let b1 = proc.add_block();
        let b2 = proc.add_block();
        let b3 = proc.add_block();
        let a = proc.identifiers_mut().define("a", Storage::Register(0));
        let a1 = proc.identifiers_mut().define_version("a", Storage::Register(0));
        let a2 = proc.identifiers_mut().define_version("a", Storage::Register(0));
        proc.append(b0, Instruction::Assign { dst: a, src: Expression::Const(0) })
            .expect("append");
        proc.append(
            b0,
            Instruction::Branch { condition: Expression::Id(a), target: b2 },
        )
        .expect("append");
        proc.append(b1, Instruction::Assign { dst: a1, src: Expression::Const(1) })
            .expect("append");
        proc.append(b1, Instruction::Jump { target: b3 }).expect("append");
        proc.append(b2, Instruction::Assign { dst: a2, src: Expression::Const(2) })
            .expect("append");
        proc.append(b2, Instruction::Jump { target: b3 }).expect("append");
        let a3 = proc.identifiers_mut().define_version("a", Storage::Register(0));
        proc.append(
            b3,
            Instruction::Assign {
                dst: a3,
                src: Expression::Phi(vec![
                    crate::ir::PhiOperand { value: a1, predecessor: b1 },
                    crate::ir::PhiOperand { value: a2, predecessor: b2 },
                ]),
            },
        )
        .expect("append");
        proc.append(b3, Instruction::Return { value: Some(Operand::Id(a3)) })
            .expect("append");

        let mut cfg = Cfg::new(proc.block_count(), b0);
        cfg.add_edge(b0, b2);
        cfg.add_edge(b0, b1);
        cfg.add_edge(b1, b3);
        cfg.add_edge(b2, b3);
        let liveness = Liveness::new(&proc, &cfg);
        // a1 is consumed on the b1 edge: live out of b1, not into b3 itself
        assert!(liveness.live_out_of_block(a1, b1).expect("query"));
        assert!(!liveness.is_live_at(a1, b3, 0).expect("query"));
        assert!(!liveness.live_out_of_block(a1, b2).expect("query"));
    }

    #[test]
    fn unknown_identifier_is_an_error() {
        let (proc, cfg, _, _) = straight_line();
        let liveness = Liveness::new(&proc, &cfg);
        assert!(matches!(
            liveness.is_live_at(SsaId::new(99), BlockId::new(0), 0),
            Err(Error::IdentifierNotFound(_))
        ));
    }
}
