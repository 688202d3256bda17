//! Convergence ledger
//!
//! One bit per node: set once the node's ancestor pointer has collapsed
//! onto the root. All bits set is the fixed point; from there every round
//! is a no-op.

use super::state::RankCell;
use bitvec::prelude::*;

/// Settled-node bitmap
#[derive(Debug, Clone)]
pub struct ConvergenceLedger {
    settled: BitVec,
    root: usize,
}

impl ConvergenceLedger {
    /// Create ledger and record the initial state
    pub fn new(cells: &[RankCell], root: usize) -> Self {
        let mut ledger = Self {
            settled: bitvec![0; cells.len()],
            root,
        };
        ledger.observe(cells);
        ledger
    }

    /// Refresh bits from committed cells; returns the settled count
    pub fn observe(&mut self, cells: &[RankCell]) -> usize {
        for (v, cell) in cells.iter().enumerate() {
            self.settled.set(v, cell.ancestor == self.root);
        }
        self.settled_count()
    }

    /// Number of settled nodes
    pub fn settled_count(&self) -> usize {
        self.settled.count_ones()
    }

    /// Every node settled
    pub fn all_settled(&self) -> bool {
        self.settled.all()
    }

    /// Nodes still jumping
    pub fn unsettled(&self) -> impl Iterator<Item = usize> + '_ {
        self.settled.iter_zeros()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_settled_nodes() {
        let mut cells = vec![
            RankCell { rank: 0, ancestor: 0 },
            RankCell { rank: 1, ancestor: 0 },
            RankCell { rank: 1, ancestor: 1 },
        ];
        let mut ledger = ConvergenceLedger::new(&cells, 0);
        assert_eq!(ledger.settled_count(), 2);
        assert!(!ledger.all_settled());
        assert_eq!(ledger.unsettled().collect::<Vec<_>>(), vec![2]);

        cells[2] = RankCell { rank: 2, ancestor: 0 };
        assert_eq!(ledger.observe(&cells), 3);
        assert!(ledger.all_settled());
    }
}
