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

//! Instructions and expressions of the SSA representation.
//!
//! The live-copy pass treats instructions almost opaquely; what it needs to know
//! is which identifiers an instruction uses and defines, whether it is a phi
//! function, a copy, or a control transfer, and how to rewrite identifier uses
//! in place. The expression forms here are the subset a lifter produces after
//! value propagation: copies, constants, binary expressions, memory accesses
//! and phi functions.

use std::fmt;

use crate::ir::{BlockId, SsaId, SsaIdentifierTable};

/// A leaf operand: an SSA identifier or an immediate constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// An SSA identifier use.
    Id(SsaId),
    /// An immediate constant.
    Const(i64),
}

impl Operand {
    /// The identifier this operand uses, if any.
    #[must_use]
    pub const fn id(&self) -> Option<SsaId> {
        match self {
            Operand::Id(id) => Some(*id),
            Operand::Const(_) => None,
        }
    }

    fn rename(&mut self, old: SsaId, new: SsaId) -> usize {
        match self {
            Operand::Id(id) if *id == old => {
                *id = new;
                1
            }
            _ => 0,
        }
    }
}

/// Binary operator of a lifted expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum BinOp {
    /// Addition
    #[strum(serialize = "+")]
    Add,
    /// Subtraction
    #[strum(serialize = "-")]
    Sub,
    /// Multiplication
    #[strum(serialize = "*")]
    Mul,
    /// Equality comparison
    #[strum(serialize = "==")]
    Eq,
    /// Inequality comparison
    #[strum(serialize = "!=")]
    Ne,
    /// Signed less-than
    #[strum(serialize = "<")]
    Lt,
    /// Signed less-or-equal
    #[strum(serialize = "<=")]
    Le,
    /// Signed greater-than
    #[strum(serialize = ">")]
    Gt,
    /// Signed greater-or-equal
    #[strum(serialize = ">=")]
    Ge,
}

/// One incoming value of a phi function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhiOperand {
    /// The identifier flowing in along the edge.
    pub value: SsaId,
    /// The predecessor block the value arrives from.
    pub predecessor: BlockId,
}

/// Right-hand side of an assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    /// A plain identifier copy.
    Id(SsaId),
    /// An immediate constant.
    Const(i64),
    /// A binary expression over two operands.
    Binary {
        /// The operator
        op: BinOp,
        /// Left operand
        left: Operand,
        /// Right operand
        right: Operand,
    },
    /// A memory load from the given address.
    Load {
        /// Address operand
        address: Operand,
    },
    /// A phi function merging one value per predecessor edge.
    Phi(Vec<PhiOperand>),
}

impl Expression {
    fn collect_uses(&self, out: &mut Vec<SsaId>) {
        match self {
            Expression::Id(id) => out.push(*id),
            Expression::Const(_) => {}
            Expression::Binary { left, right, .. } => {
                out.extend(left.id());
                out.extend(right.id());
            }
            Expression::Load { address } => out.extend(address.id()),
            Expression::Phi(operands) => out.extend(operands.iter().map(|op| op.value)),
        }
    }

    fn rename(&mut self, old: SsaId, new: SsaId) -> usize {
        match self {
            Expression::Id(id) if *id == old => {
                *id = new;
                1
            }
            Expression::Id(_) | Expression::Const(_) => 0,
            Expression::Binary { left, right, .. } => {
                left.rename(old, new) + right.rename(old, new)
            }
            Expression::Load { address } => address.rename(old, new),
            Expression::Phi(operands) => operands
                .iter_mut()
                .filter(|op| op.value == old)
                .map(|op| {
                    op.value = new;
                })
                .count(),
        }
    }
}

/// A single lifted instruction in SSA form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// `dst = src`
    Assign {
        /// The identifier being defined
        dst: SsaId,
        /// The defining expression
        src: Expression,
    },
    /// `mem[address] = value`
    Store {
        /// Address operand
        address: Operand,
        /// Stored operand
        value: Operand,
    },
    /// Conditional transfer to `target` when `condition` is non-zero.
    Branch {
        /// The branch condition
        condition: Expression,
        /// The taken-edge target block
        target: BlockId,
    },
    /// Unconditional transfer to `target`.
    Jump {
        /// The target block
        target: BlockId,
    },
    /// Procedure return, optionally carrying a value.
    Return {
        /// The returned operand, if any
        value: Option<Operand>,
    },
}

impl Instruction {
    /// All identifiers this instruction uses, in operand order.
    ///
    /// Phi operand values are included; callers that need edge semantics must
    /// check [`Instruction::phi_operands`] themselves.
    #[must_use]
    pub fn uses(&self) -> Vec<SsaId> {
        let mut out = Vec::new();
        match self {
            Instruction::Assign { src, .. } => src.collect_uses(&mut out),
            Instruction::Store { address, value } => {
                out.extend(address.id());
                out.extend(value.id());
            }
            Instruction::Branch { condition, .. } => condition.collect_uses(&mut out),
            Instruction::Jump { .. } => {}
            Instruction::Return { value } => out.extend(value.and_then(|v| v.id())),
        }
        out
    }

    /// The identifier this instruction defines, if any.
    #[must_use]
    pub const fn defined(&self) -> Option<SsaId> {
        match self {
            Instruction::Assign { dst, .. } => Some(*dst),
            _ => None,
        }
    }

    /// Whether this is a phi-function assignment.
    #[must_use]
    pub const fn is_phi(&self) -> bool {
        matches!(
            self,
            Instruction::Assign {
                src: Expression::Phi(_),
                ..
            }
        )
    }

    /// Whether this is a plain identifier copy `dst = src`.
    #[must_use]
    pub const fn is_copy(&self) -> bool {
        matches!(
            self,
            Instruction::Assign {
                src: Expression::Id(_),
                ..
            }
        )
    }

    /// Whether this instruction transfers control out of the block.
    #[must_use]
    pub const fn is_control_flow(&self) -> bool {
        matches!(
            self,
            Instruction::Branch { .. } | Instruction::Jump { .. } | Instruction::Return { .. }
        )
    }

    /// The phi operands when this is a phi-function assignment.
    #[must_use]
    pub fn phi_operands(&self) -> Option<&[PhiOperand]> {
        match self {
            Instruction::Assign {
                src: Expression::Phi(operands),
                ..
            } => Some(operands),
            _ => None,
        }
    }

    /// Rewrites every use of `old` to `new`, returning the number of rewrites.
    ///
    /// Phi operands are rewritten as well; use
    /// [`Instruction::rename_phi_operand`] when only a specific edge may change.
    pub fn rename_use(&mut self, old: SsaId, new: SsaId) -> usize {
        match self {
            Instruction::Assign { src, .. } => src.rename(old, new),
            Instruction::Store { address, value } => {
                address.rename(old, new) + value.rename(old, new)
            }
            Instruction::Branch { condition, .. } => condition.rename(old, new),
            Instruction::Jump { .. } => 0,
            Instruction::Return { value } => value.as_mut().map_or(0, |v| v.rename(old, new)),
        }
    }

    /// Rewrites the phi operand arriving from `predecessor` when its value is
    /// `old`. Returns `true` if an operand changed.
    pub fn rename_phi_operand(&mut self, old: SsaId, new: SsaId, predecessor: BlockId) -> bool {
        let Instruction::Assign {
            src: Expression::Phi(operands),
            ..
        } = self
        else {
            return false;
        };
        let mut changed = false;
        for operand in operands.iter_mut() {
            if operand.value == old && operand.predecessor == predecessor {
                operand.value = new;
                changed = true;
            }
        }
        changed
    }

    /// Renders the instruction with identifier names resolved through `identifiers`.
    #[must_use]
    pub fn display<'a>(&'a self, identifiers: &'a SsaIdentifierTable) -> InstructionDisplay<'a> {
        InstructionDisplay {
            instruction: self,
            identifiers,
        }
    }
}

/// Display adapter resolving [`SsaId`]s to their table names.
pub struct InstructionDisplay<'a> {
    instruction: &'a Instruction,
    identifiers: &'a SsaIdentifierTable,
}

fn write_id(f: &mut fmt::Formatter<'_>, table: &SsaIdentifierTable, id: SsaId) -> fmt::Result {
    match table.get(id) {
        Some(ident) => write!(f, "{}", ident.name()),
        None => write!(f, "{id}"),
    }
}

fn write_operand(
    f: &mut fmt::Formatter<'_>,
    table: &SsaIdentifierTable,
    operand: &Operand,
) -> fmt::Result {
    match operand {
        Operand::Id(id) => write_id(f, table, *id),
        Operand::Const(value) => write!(f, "{value}"),
    }
}

fn write_expression(
    f: &mut fmt::Formatter<'_>,
    table: &SsaIdentifierTable,
    expr: &Expression,
) -> fmt::Result {
    match expr {
        Expression::Id(id) => write_id(f, table, *id),
        Expression::Const(value) => write!(f, "{value}"),
        Expression::Binary { op, left, right } => {
            write_operand(f, table, left)?;
            write!(f, " {op} ")?;
            write_operand(f, table, right)
        }
        Expression::Load { address } => {
            write!(f, "mem[")?;
            write_operand(f, table, address)?;
            write!(f, "]")
        }
        Expression::Phi(operands) => {
            write!(f, "phi(")?;
            for (i, operand) in operands.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write_id(f, table, operand.value)?;
                write!(f, " from {}", operand.predecessor)?;
            }
            write!(f, ")")
        }
    }
}

impl fmt::Display for InstructionDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = self.identifiers;
        match self.instruction {
            Instruction::Assign { dst, src } => {
                write_id(f, table, *dst)?;
                write!(f, " = ")?;
                write_expression(f, table, src)
            }
            Instruction::Store { address, value } => {
                write!(f, "mem[")?;
                write_operand(f, table, address)?;
                write!(f, "] = ")?;
                write_operand(f, table, value)
            }
            Instruction::Branch { condition, target } => {
                write!(f, "if ")?;
                write_expression(f, table, condition)?;
                write!(f, " goto {target}")
            }
            Instruction::Jump { target } => write!(f, "goto {target}"),
            Instruction::Return { value } => match value {
                Some(operand) => {
                    write!(f, "return ")?;
                    write_operand(f, table, operand)
                }
                None => write!(f, "return"),
            },
        }
    }
}
