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

//! Basic blocks and the statements they own.

use std::fmt;

use crate::ir::Instruction;

/// Arena index of a basic block within its procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(usize);

impl BlockId {
    /// Creates a block id from a raw arena index.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// The raw arena index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "b{}", self.0)
    }
}

/// A statement: position-addressed owner of exactly one [`Instruction`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    instruction: Instruction,
}

impl Statement {
    /// Wraps an instruction in a statement.
    #[must_use]
    pub const fn new(instruction: Instruction) -> Self {
        Self { instruction }
    }

    /// The owned instruction.
    #[must_use]
    pub const fn instruction(&self) -> &Instruction {
        &self.instruction
    }

    /// Mutable access to the owned instruction.
    pub fn instruction_mut(&mut self) -> &mut Instruction {
        &mut self.instruction
    }
}

/// A basic block: an ordered, append/insert-only sequence of statements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicBlock {
    id: BlockId,
    statements: Vec<Statement>,
}

impl BasicBlock {
    pub(crate) const fn new(id: BlockId) -> Self {
        Self {
            id,
            statements: Vec::new(),
        }
    }

    /// The block's id within its procedure.
    #[must_use]
    pub const fn id(&self) -> BlockId {
        self.id
    }

    /// The statements in program order.
    #[must_use]
    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    /// The statement at `index`, if in range.
    #[must_use]
    pub fn statement(&self, index: usize) -> Option<&Statement> {
        self.statements.get(index)
    }

    pub(crate) fn statement_mut(&mut self, index: usize) -> Option<&mut Statement> {
        self.statements.get_mut(index)
    }

    /// Number of statements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    /// Whether the block holds no statements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub(crate) fn insert(&mut self, index: usize, statement: Statement) {
        self.statements.insert(index, statement);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Expression;

    #[test]
    fn block_id_display() {
        assert_eq!(BlockId::new(7).to_string(), "b7");
        assert_eq!(BlockId::new(7).index(), 7);
    }

    #[test]
    fn insertion_shifts_later_statements() {
        let mut block = BasicBlock::new(BlockId::new(0));
        block.insert(0, Statement::new(Instruction::Jump { target: BlockId::new(1) }));
        block.insert(
            0,
            Statement::new(Instruction::Assign {
                dst: crate::ir::SsaId::new(0),
                src: Expression::Const(1),
            }),
        );
        assert_eq!(block.len(), 2);
        assert!(block.statement(1).is_some_and(|s| s.instruction().is_control_flow()));
    }
}
