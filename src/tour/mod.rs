//! Euler tour compaction: filter + scan + scatter
//!
//! Three PRAM phases turn an Euler tour into the preorder discovery
//! sequence:
//! 1. **Filter**: mark tour positions that are first visits
//! 2. **Scan**: exclusive prefix sum of the mask gives scatter offsets
//! 3. **Scatter**: each marked position writes its node to its offset
//!
//! Each phase is one or more synchronous parallel steps; nothing inside a
//! phase depends on another index of the same phase.

mod compact;
mod filter;
mod scan;

pub use compact::{Compactor, DiscoveryOrder};
pub use filter::{first_visit_mask, FilterMask};
pub use scan::{blelloch_exclusive_scan, exclusive_scan, ScanOffsets};

use crate::tree::{NodeId, TreeModel};
use crate::util::parallel::first_index;
use crate::PramError;
use tracing::info_span;

/// Euler tour validated against a tree
///
/// Length `2n - 1`, starts and ends at the root, and every step follows a
/// tree edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EulerTour {
    entries: Vec<usize>,
}

impl EulerTour {
    /// Validate `entries` as an Euler tour of `tree`
    pub fn new<V: Sync>(tree: &TreeModel<V>, entries: Vec<usize>) -> Result<Self, PramError> {
        let n = tree.len();
        let expected = 2 * n - 1;
        if entries.len() != expected {
            return Err(PramError::InconsistentTour(format!(
                "tour has {} entries, a {}-node tree needs {}",
                entries.len(),
                n,
                expected
            )));
        }

        if let Some(pos) = first_index(entries.len(), |i| entries[i] >= n) {
            return Err(PramError::InconsistentTour(format!(
                "entry {} at position {} is outside [0, {})",
                entries[pos], pos, n
            )));
        }

        let root = tree.root().index();
        if entries[0] != root || entries[expected - 1] != root {
            return Err(PramError::InconsistentTour(format!(
                "tour must start and end at root {}",
                root
            )));
        }

        let is_edge = |a: usize, b: usize| {
            tree.parent(NodeId(a)).is(b) || tree.parent(NodeId(b)).is(a)
        };
        if let Some(pos) = first_index(expected - 1, |i| !is_edge(entries[i], entries[i + 1])) {
            return Err(PramError::InconsistentTour(format!(
                "step {} -> {} at position {} is not a tree edge",
                entries[pos],
                entries[pos + 1],
                pos
            )));
        }

        Ok(Self { entries })
    }

    /// Wrap a tour produced by a trusted traversal
    pub(crate) fn from_validated(entries: Vec<usize>) -> Self {
        Self { entries }
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty (never true for a validated tour)
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Raw node indices
    pub fn as_slice(&self) -> &[usize] {
        &self.entries
    }

    /// Entries as node ids
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.entries.iter().map(|&i| NodeId(i))
    }
}

/// Run filter, scan and scatter over a validated tour
///
/// `tour` must have been validated against `tree`; a tour of a different
/// size fails with [`PramError::InconsistentTour`] before any phase runs.
pub fn discovery_order<V: Sync>(
    tree: &TreeModel<V>,
    tour: &EulerTour,
    compactor: &Compactor,
) -> Result<DiscoveryOrder, PramError> {
    let span = info_span!("discovery_order", n = tree.len(), tour_len = tour.len());
    let _enter = span.enter();

    // A tour validated against another tree
    if tour.len() != 2 * tree.len() - 1 {
        return Err(PramError::InconsistentTour(format!(
            "tour has {} entries, a {}-node tree needs {}",
            tour.len(),
            tree.len(),
            2 * tree.len() - 1
        )));
    }

    let mask = {
        let span = info_span!("filter");
        let _enter = span.enter();
        first_visit_mask(tree, tour)
    };

    let offsets = {
        let span = info_span!("scan");
        let _enter = span.enter();
        exclusive_scan(&mask)
    };

    let span = info_span!("compact");
    let _enter = span.enter();
    compactor.compact(tour, &offsets, tree.len())
}
