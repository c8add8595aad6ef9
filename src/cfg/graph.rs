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

//! Successor/predecessor adjacency over block ids.

use crate::ir::BlockId;

/// Control flow graph of a procedure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cfg {
    entry: BlockId,
    successors: Vec<Vec<BlockId>>,
    predecessors: Vec<Vec<BlockId>>,
}

impl Cfg {
    /// Creates a graph over `block_count` blocks with the given entry and no edges.
    #[must_use]
    pub fn new(block_count: usize, entry: BlockId) -> Self {
        Self {
            entry,
            successors: vec![Vec::new(); block_count],
            predecessors: vec![Vec::new(); block_count],
        }
    }

    /// Adds the edge `from -> to`. Duplicate edges are ignored.
    pub fn add_edge(&mut self, from: BlockId, to: BlockId) {
        if from.index() >= self.successors.len() || to.index() >= self.predecessors.len() {
            return;
        }
        if !self.successors[from.index()].contains(&to) {
            self.successors[from.index()].push(to);
            self.predecessors[to.index()].push(from);
        }
    }

    /// The entry block.
    #[must_use]
    pub const fn entry(&self) -> BlockId {
        self.entry
    }

    /// Number of blocks the graph covers.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.successors.len()
    }

    /// The successors of `block`, in insertion order.
    #[must_use]
    pub fn successors(&self, block: BlockId) -> &[BlockId] {
        self.successors
            .get(block.index())
            .map_or(&[], Vec::as_slice)
    }

    /// The predecessors of `block`, in insertion order.
    #[must_use]
    pub fn predecessors(&self, block: BlockId) -> &[BlockId] {
        self.predecessors
            .get(block.index())
            .map_or(&[], Vec::as_slice)
    }

    /// The reachable blocks in depth-first postorder.
    #[must_use]
    pub fn postorder(&self) -> Vec<BlockId> {
        let mut order = Vec::with_capacity(self.block_count());
        let mut visited = vec![false; self.block_count()];
        // iterative DFS keeping a per-node successor cursor
        let mut stack = vec![(self.entry, 0usize)];
        if self.entry.index() < visited.len() {
            visited[self.entry.index()] = true;
        }
        while let Some((block, cursor)) = stack.pop() {
            let succs = self.successors(block);
            if cursor < succs.len() {
                stack.push((block, cursor + 1));
                let next = succs[cursor];
                if !visited[next.index()] {
                    visited[next.index()] = true;
                    stack.push((next, 0));
                }
            } else {
                order.push(block);
            }
        }
        order
    }

    /// The reachable blocks in reverse postorder.
    #[must_use]
    pub fn reverse_postorder(&self) -> Vec<BlockId> {
        let mut order = self.postorder();
        order.reverse();
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn b(index: usize) -> BlockId {
        BlockId::new(index)
    }

    fn diamond() -> Cfg {
        let mut cfg = Cfg::new(4, b(0));
        cfg.add_edge(b(0), b(1));
        cfg.add_edge(b(0), b(2));
        cfg.add_edge(b(1), b(3));
        cfg.add_edge(b(2), b(3));
        cfg
    }

    #[test]
    fn edges_and_duplicates() {
        let mut cfg = diamond();
        cfg.add_edge(b(0), b(1));
        assert_eq!(cfg.successors(b(0)), &[b(1), b(2)]);
        assert_eq!(cfg.predecessors(b(3)), &[b(1), b(2)]);
        assert!(cfg.successors(b(3)).is_empty());
    }

    #[test]
    fn postorder_ends_at_entry() {
        let cfg = diamond();
        let order = cfg.postorder();
        assert_eq!(order.len(), 4);
        assert_eq!(order.last(), Some(&b(0)));
        assert_eq!(cfg.reverse_postorder().first(), Some(&b(0)));
    }

    #[test]
    fn unreachable_blocks_are_skipped() {
        let mut cfg = Cfg::new(3, b(0));
        cfg.add_edge(b(0), b(1));
        let order = cfg.postorder();
        assert_eq!(order, vec![b(1), b(0)]);
    }

    #[test]
    fn loop_traversal_terminates() {
        let mut cfg = Cfg::new(3, b(0));
        cfg.add_edge(b(0), b(1));
        cfg.add_edge(b(1), b(2));
        cfg.add_edge(b(2), b(1));
        assert_eq!(cfg.postorder().len(), 3);
    }
}
