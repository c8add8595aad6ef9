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

//! Pre-SSA storage locations backing SSA identifiers.

use std::fmt;

use bitflags::bitflags;

bitflags! {
    /// Individual condition flags of the lifted architecture.
    ///
    /// Lifters model condition-code writes as definitions of flag *groups*; a
    /// compare that sets SF, ZF and CF clobbers any group overlapping those bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ConditionFlags: u8 {
        /// Carry flag
        const CF = 1;
        /// Zero flag
        const ZF = 1 << 1;
        /// Sign flag
        const SF = 1 << 2;
        /// Overflow flag
        const OF = 1 << 3;
        /// Parity flag
        const PF = 1 << 4;
    }
}

/// The storage location an SSA identifier is a version of.
///
/// Liveness kills operate at this level: a definition kills an identifier when
/// the two storages [`interfere`](Storage::interferes), regardless of SSA
/// version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Storage {
    /// A machine register, identified by its lifter-assigned number.
    Register(u16),
    /// A stack slot at the given frame offset.
    StackSlot(i32),
    /// A group of condition flags written together.
    FlagGroup(ConditionFlags),
    /// A compiler-generated temporary with its own slot.
    Temp(u32),
}

impl Storage {
    /// Whether a write to `other` clobbers a value held in `self`.
    ///
    /// Registers, stack slots and temporaries interfere only with themselves;
    /// flag groups interfere when they share any flag.
    #[must_use]
    pub fn interferes(&self, other: &Storage) -> bool {
        match (self, other) {
            (Storage::FlagGroup(a), Storage::FlagGroup(b)) => a.intersects(*b),
            _ => self == other,
        }
    }

    /// Whether this is a compiler-generated temporary.
    #[must_use]
    pub const fn is_temp(&self) -> bool {
        matches!(self, Storage::Temp(_))
    }
}

impl fmt::Display for Storage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Storage::Register(n) => write!(f, "r{n}"),
            Storage::StackSlot(offset) => write!(f, "fp[{offset}]"),
            Storage::FlagGroup(flags) => write!(f, "cc[{:?}]", flags.bits()),
            Storage::Temp(n) => write!(f, "tmp{n}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_storages_interfere_only_with_themselves() {
        assert!(Storage::Register(3).interferes(&Storage::Register(3)));
        assert!(!Storage::Register(3).interferes(&Storage::Register(4)));
        assert!(!Storage::Register(3).interferes(&Storage::StackSlot(-8)));
        assert!(Storage::StackSlot(-8).interferes(&Storage::StackSlot(-8)));
        assert!(!Storage::Temp(0).interferes(&Storage::Temp(1)));
    }

    #[test]
    fn flag_groups_interfere_on_overlap() {
        let szc = Storage::FlagGroup(ConditionFlags::SF | ConditionFlags::ZF | ConditionFlags::CF);
        let z = Storage::FlagGroup(ConditionFlags::ZF);
        let o = Storage::FlagGroup(ConditionFlags::OF);
        assert!(szc.interferes(&z));
        assert!(!szc.interferes(&o));
    }
}
