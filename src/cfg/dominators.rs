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

//! Dominator tree construction and queries.
//!
//! Uses the iterative reverse-postorder algorithm of Cooper, Harvey and
//! Kennedy. Decompiled procedures rarely exceed a few hundred blocks, where
//! the iterative scheme beats the asymptotically better alternatives and the
//! implementation stays small.

use crate::{cfg::Cfg, ir::BlockId};

/// Immediate-dominator array over a procedure's blocks.
///
/// Block `a` dominates block `b` when every path from the entry to `b` passes
/// through `a`. The entry's recorded immediate dominator is itself; unreachable
/// blocks have none and dominate nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DominatorTree {
    entry: BlockId,
    idom: Vec<Option<BlockId>>,
}

impl DominatorTree {
    /// Computes the dominator tree of `cfg`.
    #[must_use]
    pub fn compute(cfg: &Cfg) -> Self {
        let count = cfg.block_count();
        let postorder = cfg.postorder();
        let mut po_number = vec![usize::MAX; count];
        for (number, block) in postorder.iter().enumerate() {
            po_number[block.index()] = number;
        }

        let mut idom: Vec<Option<BlockId>> = vec![None; count];
        if cfg.entry().index() < count {
            idom[cfg.entry().index()] = Some(cfg.entry());
        }

        let mut changed = true;
        while changed {
            changed = false;
            for &block in postorder.iter().rev() {
                if block == cfg.entry() {
                    continue;
                }
                let mut new_idom: Option<BlockId> = None;
                for &pred in cfg.predecessors(block) {
                    if idom.get(pred.index()).copied().flatten().is_none() {
                        continue;
                    }
                    new_idom = Some(match new_idom {
                        None => pred,
                        Some(current) => Self::intersect(&idom, &po_number, pred, current),
                    });
                }
                if new_idom.is_some() && new_idom != idom[block.index()] {
                    idom[block.index()] = new_idom;
                    changed = true;
                }
            }
        }

        Self {
            entry: cfg.entry(),
            idom,
        }
    }

    fn intersect(
        idom: &[Option<BlockId>],
        po_number: &[usize],
        mut a: BlockId,
        mut b: BlockId,
    ) -> BlockId {
        while a != b {
            while po_number[a.index()] < po_number[b.index()] {
                match idom[a.index()] {
                    Some(parent) => a = parent,
                    None => return b,
                }
            }
            while po_number[b.index()] < po_number[a.index()] {
                match idom[b.index()] {
                    Some(parent) => b = parent,
                    None => return a,
                }
            }
        }
        a
    }

    /// The entry block the tree is rooted at.
    #[must_use]
    pub const fn entry(&self) -> BlockId {
        self.entry
    }

    /// The immediate dominator of `block`, or `None` for the entry and for
    /// unreachable blocks.
    #[must_use]
    pub fn immediate_dominator(&self, block: BlockId) -> Option<BlockId> {
        let parent = self.idom.get(block.index()).copied().flatten()?;
        if parent == block {
            None
        } else {
            Some(parent)
        }
    }

    /// Whether `block` is reachable from the entry.
    #[must_use]
    pub fn is_reachable(&self, block: BlockId) -> bool {
        self.idom.get(block.index()).copied().flatten().is_some()
    }

    /// Whether `a` dominates `b` (reflexively).
    #[must_use]
    pub fn dominates(&self, a: BlockId, b: BlockId) -> bool {
        if !self.is_reachable(b) {
            return false;
        }
        let mut current = b;
        loop {
            if current == a {
                return true;
            }
            let Some(parent) = self.idom.get(current.index()).copied().flatten() else {
                return false;
            };
            if parent == current {
                return false;
            }
            current = parent;
        }
    }

    /// Whether `a` dominates `b` and `a != b`.
    #[must_use]
    pub fn strictly_dominates(&self, a: BlockId, b: BlockId) -> bool {
        a != b && self.dominates(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn b(index: usize) -> BlockId {
        BlockId::new(index)
    }

    #[test]
    fn linear_chain() {
        let mut cfg = Cfg::new(3, b(0));
        cfg.add_edge(b(0), b(1));
        cfg.add_edge(b(1), b(2));
        let doms = DominatorTree::compute(&cfg);
        assert_eq!(doms.immediate_dominator(b(0)), None);
        assert_eq!(doms.immediate_dominator(b(1)), Some(b(0)));
        assert_eq!(doms.immediate_dominator(b(2)), Some(b(1)));
        assert!(doms.dominates(b(0), b(2)));
        assert!(doms.strictly_dominates(b(0), b(2)));
        assert!(!doms.strictly_dominates(b(2), b(2)));
    }

    #[test]
    fn diamond_joins_at_the_fork() {
        let mut cfg = Cfg::new(4, b(0));
        cfg.add_edge(b(0), b(1));
        cfg.add_edge(b(0), b(2));
        cfg.add_edge(b(1), b(3));
        cfg.add_edge(b(2), b(3));
        let doms = DominatorTree::compute(&cfg);
        assert_eq!(doms.immediate_dominator(b(3)), Some(b(0)));
        assert!(!doms.dominates(b(1), b(3)));
        assert!(!doms.dominates(b(2), b(3)));
        assert!(doms.dominates(b(0), b(3)));
    }

    #[test]
    fn loop_header_dominates_the_body() {
        // b0 -> b1 <-> b2, b1 -> b3
        let mut cfg = Cfg::new(4, b(0));
        cfg.add_edge(b(0), b(1));
        cfg.add_edge(b(1), b(2));
        cfg.add_edge(b(2), b(1));
        cfg.add_edge(b(1), b(3));
        let doms = DominatorTree::compute(&cfg);
        assert_eq!(doms.immediate_dominator(b(2)), Some(b(1)));
        assert_eq!(doms.immediate_dominator(b(3)), Some(b(1)));
        assert!(doms.dominates(b(1), b(2)));
        assert!(!doms.dominates(b(2), b(3)));
    }

    #[test]
    fn unreachable_blocks_dominate_nothing() {
        let mut cfg = Cfg::new(3, b(0));
        cfg.add_edge(b(0), b(1));
        let doms = DominatorTree::compute(&cfg);
        assert!(!doms.is_reachable(b(2)));
        assert!(!doms.dominates(b(2), b(1)));
        assert!(!doms.dominates(b(0), b(2)));
        assert_eq!(doms.immediate_dominator(b(2)), None);
    }
}
