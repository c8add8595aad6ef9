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

//! Procedures: blocks plus the identifier table, with def/use bookkeeping.

use std::fmt;

use crate::{
    ir::{BasicBlock, BlockId, Instruction, SsaId, SsaIdentifierTable, Statement, StatementRef},
    Error, Result,
};

/// A lifted procedure in SSA form.
///
/// Appending or inserting a statement through the procedure keeps the
/// identifier table's def-site and use-site records consistent: the defined
/// identifier gets the statement as its definition, every used identifier gets
/// a use entry per operand occurrence, and insertion shifts the recorded sites
/// of later statements in the block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Procedure {
    name: String,
    blocks: Vec<BasicBlock>,
    identifiers: SsaIdentifierTable,
}

impl Procedure {
    /// Creates an empty procedure.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            blocks: Vec::new(),
            identifiers: SsaIdentifierTable::new(),
        }
    }

    /// The procedure name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Appends an empty block, returning its id.
    pub fn add_block(&mut self) -> BlockId {
        let id = BlockId::new(self.blocks.len());
        self.blocks.push(BasicBlock::new(id));
        id
    }

    /// The blocks in arena order.
    #[must_use]
    pub fn blocks(&self) -> &[BasicBlock] {
        &self.blocks
    }

    /// Number of blocks.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// The block with the given id, if present.
    #[must_use]
    pub fn block(&self, id: BlockId) -> Option<&BasicBlock> {
        self.blocks.get(id.index())
    }

    /// The identifier table.
    #[must_use]
    pub const fn identifiers(&self) -> &SsaIdentifierTable {
        &self.identifiers
    }

    /// Mutable access to the identifier table.
    pub fn identifiers_mut(&mut self) -> &mut SsaIdentifierTable {
        &mut self.identifiers
    }

    /// The statement at `site`.
    pub fn statement(&self, site: StatementRef) -> Result<&Statement> {
        let block = self
            .block(site.block)
            .ok_or(Error::BlockNotFound(site.block))?;
        block
            .statement(site.index)
            .ok_or(Error::StatementIndexOutOfRange {
                block: site.block,
                index: site.index,
                len: block.len(),
            })
    }

    /// Renders the statement at `site` with identifier names resolved.
    pub fn statement_to_string(&self, site: StatementRef) -> Result<String> {
        Ok(self
            .statement(site)?
            .instruction()
            .display(&self.identifiers)
            .to_string())
    }

    /// Appends `instruction` to the end of `block` and records its def/use sites.
    pub fn append(&mut self, block: BlockId, instruction: Instruction) -> Result<StatementRef> {
        let len = self
            .block(block)
            .ok_or(Error::BlockNotFound(block))?
            .len();
        self.insert(block, len, instruction)
    }

    /// Inserts `instruction` at `index` in `block`, shifting the recorded sites
    /// of later statements, and records the new statement's def/use sites.
    pub fn insert(
        &mut self,
        block: BlockId,
        index: usize,
        instruction: Instruction,
    ) -> Result<StatementRef> {
        let len = self
            .block(block)
            .ok_or(Error::BlockNotFound(block))?
            .len();
        if index > len {
            return Err(Error::StatementIndexOutOfRange { block, index, len });
        }
        self.identifiers.shift_for_insertion(block, index);
        let site = StatementRef { block, index };
        if let Some(dst) = instruction.defined() {
            self.identifiers.set_definition(dst, site)?;
        }
        for used in instruction.uses() {
            self.identifiers.add_use(used, site)?;
        }
        self.blocks[block.index()].insert(index, Statement::new(instruction));
        Ok(site)
    }

    /// Rewrites every use of `old` to `new` in the statement at `site`,
    /// moving the use-site records along. Returns the number of rewrites.
    pub fn rename_use_at(&mut self, site: StatementRef, old: SsaId, new: SsaId) -> Result<usize> {
        let block = self
            .blocks
            .get_mut(site.block.index())
            .ok_or(Error::BlockNotFound(site.block))?;
        let len = block.len();
        let statement = block
            .statement_mut(site.index)
            .ok_or(Error::StatementIndexOutOfRange {
                block: site.block,
                index: site.index,
                len,
            })?;
        let count = statement.instruction_mut().rename_use(old, new);
        for _ in 0..count {
            self.identifiers.remove_use(old, site);
            self.identifiers.add_use(new, site)?;
        }
        Ok(count)
    }

    /// Rewrites the phi operand arriving from `predecessor` in the phi statement
    /// at `site` when its value is `old`. Returns `true` if an operand changed.
    pub fn rename_phi_operand_at(
        &mut self,
        site: StatementRef,
        old: SsaId,
        new: SsaId,
        predecessor: BlockId,
    ) -> Result<bool> {
        let block = self
            .blocks
            .get_mut(site.block.index())
            .ok_or(Error::BlockNotFound(site.block))?;
        let len = block.len();
        let statement = block
            .statement_mut(site.index)
            .ok_or(Error::StatementIndexOutOfRange {
                block: site.block,
                index: site.index,
                len,
            })?;
        let changed = statement
            .instruction_mut()
            .rename_phi_operand(old, new, predecessor);
        if changed {
            self.identifiers.remove_use(old, site);
            self.identifiers.add_use(new, site)?;
        }
        Ok(changed)
    }
}

impl fmt::Display for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "fn {}:", self.name)?;
        for block in &self.blocks {
            writeln!(f, "{}:", block.id())?;
            for statement in block.statements() {
                writeln!(f, "    {}", statement.instruction().display(&self.identifiers))?;
            }
        }
        Ok(())
    }
}
