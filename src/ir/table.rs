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

//! The SSA identifier table: every version of every storage location, with its
//! definition site and recorded uses.
//!
//! The table is an append-only arena. Display names encode the table position
//! at creation time (`i`, `i_4`, `i_6`, ...), so the table length bounds the
//! version numbering and freshly allocated repair temporaries slot into the
//! same scheme.

use std::fmt;

use crate::{
    error::inconsistent_error,
    ir::{BlockId, Storage},
    Error, Result,
};

/// Arena index of an SSA identifier within its table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SsaId(usize);

impl SsaId {
    /// Creates an identifier id from a raw arena index.
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

impl fmt::Display for SsaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Position of a statement: owning block plus statement index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatementRef {
    /// The owning block.
    pub block: BlockId,
    /// The statement index within the block.
    pub index: usize,
}

impl fmt::Display for StatementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.block, self.index)
    }
}

/// Where an identifier receives its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefSite {
    /// Defined implicitly at procedure entry (arguments, live-in machine state).
    Entry,
    /// Defined by the statement at the given position.
    Statement(StatementRef),
}

/// One SSA version of a storage location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SsaIdentifier {
    id: SsaId,
    original: String,
    name: String,
    storage: Storage,
    definition: DefSite,
    uses: Vec<StatementRef>,
    temp: bool,
}

impl SsaIdentifier {
    /// The identifier's arena id.
    #[must_use]
    pub const fn id(&self) -> SsaId {
        self.id
    }

    /// The pre-SSA variable name this identifier is a version of.
    #[must_use]
    pub fn original(&self) -> &str {
        &self.original
    }

    /// The display name (`i`, `i_4`, ...).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The backing storage location.
    #[must_use]
    pub const fn storage(&self) -> Storage {
        self.storage
    }

    /// The definition site.
    #[must_use]
    pub const fn definition(&self) -> DefSite {
        self.definition
    }

    /// The recorded use sites, one entry per operand occurrence.
    #[must_use]
    pub fn uses(&self) -> &[StatementRef] {
        &self.uses
    }

    /// Whether this identifier was generated by a pass rather than the lifter.
    #[must_use]
    pub const fn is_temp(&self) -> bool {
        self.temp
    }

    /// Whether the identifier has no recorded uses.
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.uses.is_empty()
    }
}

/// Append-only arena of [`SsaIdentifier`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SsaIdentifierTable {
    entries: Vec<SsaIdentifier>,
}

impl SsaIdentifierTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered identifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registers the initial version of `original`, displayed under the bare name.
    ///
    /// The definition defaults to [`DefSite::Entry`] until a defining statement
    /// is recorded.
    pub fn define(&mut self, original: &str, storage: Storage) -> SsaId {
        self.push(original.to_string(), original.to_string(), storage, false)
    }

    /// Registers a renamed version of `original`, displayed as
    /// `original_{index}` where index is the current table length.
    pub fn define_version(&mut self, original: &str, storage: Storage) -> SsaId {
        let name = format!("{original}_{}", self.entries.len());
        self.push(original.to_string(), name, storage, false)
    }

    /// Allocates a compiler-generated temporary related to `old`: same original
    /// variable, versioned display name, fresh temporary storage.
    pub fn allocate_related(&mut self, old: SsaId) -> Result<SsaId> {
        let original = self
            .get(old)
            .ok_or(Error::IdentifierNotFound(old))?
            .original()
            .to_string();
        let index = self.entries.len();
        let name = format!("{original}_{index}");
        Ok(self.push(original, name, Storage::Temp(index as u32), true))
    }

    fn push(&mut self, original: String, name: String, storage: Storage, temp: bool) -> SsaId {
        let id = SsaId::new(self.entries.len());
        self.entries.push(SsaIdentifier {
            id,
            original,
            name,
            storage,
            definition: DefSite::Entry,
            uses: Vec::new(),
            temp,
        });
        id
    }

    /// Looks up an identifier by id.
    #[must_use]
    pub fn get(&self, id: SsaId) -> Option<&SsaIdentifier> {
        self.entries.get(id.index())
    }

    /// Looks up an identifier by its display name.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<SsaId> {
        self.entries.iter().find(|e| e.name == name).map(|e| e.id)
    }

    /// All versions of the given original variable, in creation order.
    pub fn versions_of<'a>(&'a self, original: &'a str) -> impl Iterator<Item = SsaId> + 'a {
        self.entries
            .iter()
            .filter(move |e| e.original == original)
            .map(|e| e.id)
    }

    /// Iterates over all identifiers in arena order.
    pub fn iter(&self) -> impl Iterator<Item = &SsaIdentifier> {
        self.entries.iter()
    }

    /// Records the defining statement of `id`.
    ///
    /// An identifier may move from an entry definition to a statement definition
    /// once; a second statement definition violates single assignment.
    pub fn set_definition(&mut self, id: SsaId, site: StatementRef) -> Result<()> {
        let entry = self
            .entries
            .get_mut(id.index())
            .ok_or(Error::IdentifierNotFound(id))?;
        if let DefSite::Statement(existing) = entry.definition {
            return Err(inconsistent_error!(
                "second definition of {} at {site}, already defined at {existing}",
                entry.name
            ));
        }
        entry.definition = DefSite::Statement(site);
        Ok(())
    }

    /// Records a use of `id` at `site`. One entry per operand occurrence.
    pub fn add_use(&mut self, id: SsaId, site: StatementRef) -> Result<()> {
        self.entries
            .get_mut(id.index())
            .ok_or(Error::IdentifierNotFound(id))?
            .uses
            .push(site);
        Ok(())
    }

    /// Removes one recorded use of `id` at `site`, if present.
    pub fn remove_use(&mut self, id: SsaId, site: StatementRef) {
        if let Some(entry) = self.entries.get_mut(id.index()) {
            if let Some(pos) = entry.uses.iter().position(|u| *u == site) {
                entry.uses.swap_remove(pos);
            }
        }
    }

    /// Shifts every recorded site in `block` at or past `index` by one, making
    /// room for a statement inserted there.
    pub fn shift_for_insertion(&mut self, block: BlockId, index: usize) {
        for entry in &mut self.entries {
            if let DefSite::Statement(site) = &mut entry.definition {
                if site.block == block && site.index >= index {
                    site.index += 1;
                }
            }
            for site in &mut entry.uses {
                if site.block == block && site.index >= index {
                    site.index += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(block: usize, index: usize) -> StatementRef {
        StatementRef {
            block: BlockId::new(block),
            index,
        }
    }

    #[test]
    fn version_names_encode_table_position() {
        let mut table = SsaIdentifierTable::new();
        let fp = table.define("fp", Storage::Register(5));
        let i = table.define("i", Storage::StackSlot(-8));
        let i4 = {
            let _ = table.define("data", Storage::StackSlot(-12));
            let _ = table.define("sp", Storage::Register(4));
            table.define_version("i", Storage::StackSlot(-8))
        };
        assert_eq!(table.get(fp).map(SsaIdentifier::name), Some("fp"));
        assert_eq!(table.get(i).map(SsaIdentifier::name), Some("i"));
        assert_eq!(table.get(i4).map(SsaIdentifier::name), Some("i_4"));
        assert_eq!(table.find_by_name("i_4"), Some(i4));
        assert_eq!(table.versions_of("i").collect::<Vec<_>>(), vec![i, i4]);
    }

    #[test]
    fn related_allocation_is_a_temp_in_sequence() {
        let mut table = SsaIdentifierTable::new();
        let reg = table.define("reg", Storage::Register(0));
        for _ in 0..6 {
            table.define_version("x", Storage::Register(1));
        }
        let fresh = table.allocate_related(reg).expect("reg is registered");
        let entry = table.get(fresh).expect("fresh is registered");
        assert_eq!(entry.name(), "reg_7");
        assert_eq!(entry.original(), "reg");
        assert!(entry.is_temp());
        assert!(entry.storage().is_temp());
    }

    #[test]
    fn second_statement_definition_is_rejected() {
        let mut table = SsaIdentifierTable::new();
        let x = table.define("x", Storage::Register(0));
        table.set_definition(x, site(0, 0)).expect("first definition");
        let err = table.set_definition(x, site(0, 1)).expect_err("single assignment");
        assert!(matches!(err, Error::Inconsistent { .. }));
    }

    #[test]
    fn shift_moves_sites_at_or_past_the_insertion_point() {
        let mut table = SsaIdentifierTable::new();
        let x = table.define("x", Storage::Register(0));
        let y = table.define("y", Storage::Register(1));
        table.set_definition(x, site(0, 1)).expect("definition");
        table.add_use(x, site(0, 2)).expect("use");
        table.add_use(y, site(1, 0)).expect("use in another block");
        table.shift_for_insertion(BlockId::new(0), 1);
        assert_eq!(
            table.get(x).map(SsaIdentifier::definition),
            Some(DefSite::Statement(site(0, 2)))
        );
        assert_eq!(table.get(x).map(|e| e.uses()[0]), Some(site(0, 3)));
        assert_eq!(table.get(y).map(|e| e.uses()[0]), Some(site(1, 0)));
    }

    #[test]
    fn unknown_identifier_is_an_error() {
        let mut table = SsaIdentifierTable::new();
        let ghost = SsaId::new(9);
        assert!(matches!(
            table.allocate_related(ghost),
            Err(Error::IdentifierNotFound(_))
        ));
        assert!(matches!(
            table.add_use(ghost, site(0, 0)),
            Err(Error::IdentifierNotFound(_))
        ));
    }
}
