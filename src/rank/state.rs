//! Double-buffered pointer-jumping state
//!
//! A round reads only the front buffer and writes only the back buffer;
//! the swap is the commit. No node can observe another node's update from
//! the same round.

use crate::util::parallel::{count_indices, fill_indexed};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Per-node pointer-jumping cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RankCell {
    /// Accumulated distance to `ancestor`
    pub rank: usize,
    /// Current jump target
    pub ancestor: usize,
}

/// Front (committed) and back (staging) buffers
#[derive(Debug, Clone)]
pub struct RankState {
    front: Vec<RankCell>,
    back: Vec<RankCell>,
}

impl RankState {
    /// Seed from parent indices where the root points at itself
    ///
    /// The root gets rank 0, every other node rank 1 (one edge to its
    /// parent). The root cell is an absorbing identity: jumping through it
    /// adds nothing and lands on the root again.
    pub fn initial(ancestor_seed: &[usize], root: usize) -> Self {
        let front: Vec<RankCell> = ancestor_seed
            .iter()
            .enumerate()
            .map(|(v, &ancestor)| RankCell {
                rank: usize::from(v != root),
                ancestor,
            })
            .collect();
        let back = vec![RankCell::default(); front.len()];
        Self { front, back }
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.front.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.front.is_empty()
    }

    /// Committed cells
    pub fn cells(&self) -> &[RankCell] {
        &self.front
    }

    /// Committed ranks
    pub fn ranks(&self) -> Vec<usize> {
        self.front.iter().map(|cell| cell.rank).collect()
    }

    /// Committed ancestors
    pub fn ancestors(&self) -> Vec<usize> {
        self.front.iter().map(|cell| cell.ancestor).collect()
    }

    /// One synchronous round; returns how many ancestor pointers moved
    pub fn round(&mut self) -> usize {
        self.stage();
        let changed = {
            let (front, back) = (&self.front, &self.back);
            count_indices(front.len(), |v| front[v].ancestor != back[v].ancestor)
        };
        self.commit();
        changed
    }

    /// Read phase: every node reads its ancestor's committed cell
    fn stage(&mut self) {
        let front = &self.front;
        fill_indexed(&mut self.back, |v| {
            let ancestor = front[front[v].ancestor];
            RankCell {
                rank: front[v].rank + ancestor.rank,
                ancestor: ancestor.ancestor,
            }
        });
    }

    /// Barrier: staged cells become the committed snapshot
    fn commit(&mut self) {
        std::mem::swap(&mut self.front, &mut self.back);
    }
}
