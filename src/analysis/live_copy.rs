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

//! Live-copy insertion: the lost-copy repair pass.
//!
//! Out-of-SSA conversion coalesces the versions of each storage location back
//! into one variable. When a phi destination is still live at the point where a
//! loop-carried operand of the same phi redefines the shared slot, coalescing
//! would overwrite the value before its forward uses execute. The repair splits
//! the destination's live range: a copy `fresh = dest` goes in just before the
//! phi block's control transfer, and every use of `dest` dominated by the copy
//! is renamed to `fresh`. The remaining uses of `dest` all precede the copy, so
//! the conflict disappears and a rerun of the pass changes nothing.
//!
//! The pass only inserts; it never deletes or reorders statements and never
//! touches CFG edges, so dominance information stays valid throughout.

use std::collections::HashSet;

use crate::{
    analysis::Liveness,
    cfg::{Cfg, DominatorTree},
    ir::{BlockId, DefSite, Expression, Instruction, Procedure, SsaId, StatementRef},
    Error, Result,
};

/// Change summary of a [`LiveCopyInserter::transform`] run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TransformStats {
    /// Number of protecting copy statements inserted.
    pub copies_inserted: usize,
    /// Number of identifier uses rewritten to the fresh copies.
    pub uses_renamed: usize,
}

/// The live-copy insertion pass over one procedure.
///
/// The CFG and dominator tree are collaborators computed by the caller; the
/// pass never mutates them.
pub struct LiveCopyInserter<'a> {
    procedure: &'a mut Procedure,
    cfg: &'a Cfg,
    dominators: &'a DominatorTree,
}

impl<'a> LiveCopyInserter<'a> {
    /// Creates the pass over `procedure` with its control flow context.
    pub fn new(
        procedure: &'a mut Procedure,
        cfg: &'a Cfg,
        dominators: &'a DominatorTree,
    ) -> Self {
        Self {
            procedure,
            cfg,
            dominators,
        }
    }

    /// The statement index at which a repair copy may be inserted in `block`.
    ///
    /// Inserting just before the block's trailing control transfer keeps every
    /// identifier defined earlier in the block available to the copy; a block
    /// without a trailing control transfer takes the copy at its end.
    pub fn index_of_inserted_copy(&self, block: BlockId) -> Result<usize> {
        let block_ref = self
            .procedure
            .block(block)
            .ok_or(Error::BlockNotFound(block))?;
        let len = block_ref.len();
        if len > 0
            && block_ref
                .statement(len - 1)
                .is_some_and(|s| s.instruction().is_control_flow())
        {
            Ok(len - 1)
        } else {
            Ok(len)
        }
    }

    /// Whether `id` is live at the copy point of `block`.
    pub fn is_live_at_copy_point(&self, id: SsaId, block: BlockId) -> Result<bool> {
        let index = self.index_of_inserted_copy(block)?;
        Liveness::new(self.procedure, self.cfg).is_live_at(id, block, index)
    }

    /// Whether `id` is live immediately after the statement at `site`.
    pub fn is_live_out(&self, id: SsaId, site: StatementRef) -> Result<bool> {
        Liveness::new(self.procedure, self.cfg).is_live_out(id, site)
    }

    /// Inserts the copy `fresh = old` at `index` in `block` and returns the
    /// freshly allocated identifier.
    ///
    /// The fresh identifier is a compiler-generated temporary named after
    /// `old`'s original variable, its definition recorded at the inserted
    /// statement. Out-of-range indices and unknown identifiers are fatal.
    pub fn insert_assignment_new_id(
        &mut self,
        old: SsaId,
        block: BlockId,
        index: usize,
    ) -> Result<SsaId> {
        let len = self
            .procedure
            .block(block)
            .ok_or(Error::BlockNotFound(block))?
            .len();
        if index > len {
            return Err(Error::StatementIndexOutOfRange { block, index, len });
        }
        let fresh = self.procedure.identifiers_mut().allocate_related(old)?;
        self.procedure.insert(
            block,
            index,
            Instruction::Assign {
                dst: fresh,
                src: Expression::Id(old),
            },
        )?;
        Ok(fresh)
    }

    /// Rewrites every use of `old` strictly dominated by `new`'s definition to
    /// use `new`, returning the number of rewritten operands.
    ///
    /// `new` must be defined by a statement and `old`'s definition must
    /// dominate it; anything else has no provable dominance relation and is
    /// rejected. Phi operand uses are judged at the end of the operand's
    /// predecessor edge. The defining copy itself keeps reading `old`.
    pub fn rename_dominated_identifiers(&mut self, old: SsaId, new: SsaId) -> Result<usize> {
        let table = self.procedure.identifiers();
        let new_def = match table
            .get(new)
            .ok_or(Error::IdentifierNotFound(new))?
            .definition()
        {
            DefSite::Statement(site) => site,
            DefSite::Entry => return Err(Error::NoDominanceRelation { old, new }),
        };
        let old_entry = table.get(old).ok_or(Error::IdentifierNotFound(old))?;
        let old_dominates = match old_entry.definition() {
            DefSite::Entry => true,
            DefSite::Statement(site) => self.site_dominates(site, new_def),
        };
        if !old_dominates {
            return Err(Error::NoDominanceRelation { old, new });
        }

        let sites = old_entry.uses().to_vec();
        let mut seen = HashSet::new();
        let mut renamed = 0;
        for site in sites {
            if !seen.insert(site) || site == new_def {
                continue;
            }
            let statement = self.procedure.statement(site)?;
            if let Some(operands) = statement.instruction().phi_operands() {
                let edges: Vec<BlockId> = operands
                    .iter()
                    .filter(|op| op.value == old && self.edge_dominated(new_def, op.predecessor))
                    .map(|op| op.predecessor)
                    .collect();
                for predecessor in edges {
                    if self
                        .procedure
                        .rename_phi_operand_at(site, old, new, predecessor)?
                    {
                        renamed += 1;
                    }
                }
            } else if self.statement_dominated(new_def, site) {
                renamed += self.procedure.rename_use_at(site, old, new)?;
            }
        }
        Ok(renamed)
    }

    /// Runs the pass to fixpoint: detect each phi destination still live at its
    /// block's copy point while a loop-carried operand redefines the slot,
    /// insert the protecting copy and rename the dominated uses.
    ///
    /// A destination that is not live at the copy point is skipped. Every
    /// repair moves the destination's remaining uses before the copy point, so
    /// no destination triggers twice and the pass is idempotent.
    pub fn transform(&mut self) -> Result<TransformStats> {
        let mut stats = TransformStats::default();
        while let Some((block, dest)) = self.next_candidate()? {
            let index = self.index_of_inserted_copy(block)?;
            let fresh = self.insert_assignment_new_id(dest, block, index)?;
            stats.uses_renamed += self.rename_dominated_identifiers(dest, fresh)?;
            stats.copies_inserted += 1;
        }
        Ok(stats)
    }

    /// Finds the first phi destination in block order that needs a repair.
    ///
    /// Blocks come in procedure order, so loop headers are visited before the
    /// blocks they dominate. An operand is loop-carried when it arrives from a
    /// predecessor the phi's own block dominates.
    fn next_candidate(&self) -> Result<Option<(BlockId, SsaId)>> {
        let liveness = Liveness::new(self.procedure, self.cfg);
        for block in self.procedure.blocks() {
            for statement in block.statements() {
                let instruction = statement.instruction();
                let Some(operands) = instruction.phi_operands() else {
                    continue;
                };
                let Some(dest) = instruction.defined() else {
                    continue;
                };
                let loop_carried = operands.iter().any(|op| {
                    op.value != dest && self.dominators.dominates(block.id(), op.predecessor)
                });
                if !loop_carried {
                    continue;
                }
                let index = self.index_of_inserted_copy(block.id())?;
                if liveness.is_live_at(dest, block.id(), index)? {
                    return Ok(Some((block.id(), dest)));
                }
            }
        }
        Ok(None)
    }

    fn site_dominates(&self, a: StatementRef, b: StatementRef) -> bool {
        if a.block == b.block {
            a.index < b.index
        } else {
            self.dominators.strictly_dominates(a.block, b.block)
        }
    }

    fn statement_dominated(&self, def: StatementRef, site: StatementRef) -> bool {
        if def.block == site.block {
            site.index > def.index
        } else {
            self.dominators.strictly_dominates(def.block, site.block)
        }
    }

    fn edge_dominated(&self, def: StatementRef, predecessor: BlockId) -> bool {
        def.block == predecessor || self.dominators.strictly_dominates(def.block, predecessor)
    }
}
