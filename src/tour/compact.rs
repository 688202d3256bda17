//! Scatter of filtered tour entries into the discovery order
//!
//! Every boundary position `i` (where the offset advances) owns exactly one
//! output slot `offsets[i]`, so the writes into A never collide. Writes into
//! the inverse index D collide only when a node is discovered twice, which
//! means the tour is not a genuine Euler tour; slots are claimed atomically
//! so that case is detected instead of silently overwritten.

use super::{EulerTour, ScanOffsets};
use crate::tree::NodeId;
use crate::util::parallel::{first_index, for_each_index};
use crate::PramError;
use std::ops::{Index, Range};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const UNCLAIMED: usize = usize::MAX;

/// Preorder discovery sequence (A) and its inverse (D)
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DiscoveryOrder {
    order: Vec<NodeId>,
    index: Vec<usize>,
}

impl DiscoveryOrder {
    /// Number of discovered nodes
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Nodes in discovery order (A)
    pub fn order(&self) -> &[NodeId] {
        &self.order
    }

    /// Position of `node` in the discovery order (D)
    ///
    /// # Panics
    ///
    /// If `node` is outside `0..len`; see [`DiscoveryOrder::get_position`].
    pub fn position(&self, node: NodeId) -> usize {
        self.index[node.index()]
    }

    /// Position of `node`, or `None` if it is out of range
    pub fn get_position(&self, node: NodeId) -> Option<usize> {
        self.index.get(node.index()).copied()
    }

    /// Inverse index, node → position (D)
    pub fn positions(&self) -> &[usize] {
        &self.index
    }

    /// Iterate nodes in discovery order
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.order.iter().copied()
    }
}

impl Index<usize> for DiscoveryOrder {
    type Output = NodeId;

    fn index(&self, k: usize) -> &Self::Output {
        &self.order[k]
    }
}

/// Scatter stage of the compaction
///
/// The window selects which tour positions are scattered. The default
/// covers the whole tour, final entry included.
#[derive(Debug, Clone, Default)]
pub struct Compactor {
    window: Option<Range<usize>>,
}

impl Compactor {
    /// Compact the whole tour
    pub fn new() -> Self {
        Self { window: None }
    }

    /// Compact only tour positions in `window`
    pub fn with_window(window: Range<usize>) -> Self {
        Self {
            window: Some(window),
        }
    }

    /// Scatter boundary entries of `tour` into a discovery order over `n` nodes
    ///
    /// Fails unless the result is a permutation of `0..n`. Size and entry
    /// range are checked before anything is scattered.
    pub fn compact(
        &self,
        tour: &EulerTour,
        offsets: &ScanOffsets,
        n: usize,
    ) -> Result<DiscoveryOrder, PramError> {
        let window = self.window.clone().unwrap_or(0..tour.len());
        if window.start > window.end || window.end > tour.len() || offsets.len() != tour.len() {
            return Err(PramError::InconsistentTour(format!(
                "compaction window {:?} does not fit a tour of {} entries",
                window,
                tour.len()
            )));
        }

        let base = offsets.get(window.start);
        let size = offsets.get(window.end) - base;
        let entries = tour.as_slice();

        if size != n {
            return Err(PramError::InconsistentTour(format!(
                "compaction produced {} entries, expected {}",
                size, n
            )));
        }
        if let Some(pos) = first_index(entries.len(), |i| entries[i] >= n) {
            return Err(PramError::InconsistentTour(format!(
                "entry {} at position {} is outside [0, {})",
                entries[pos], pos, n
            )));
        }

        let order: Vec<AtomicUsize> = (0..size).map(|_| AtomicUsize::new(UNCLAIMED)).collect();
        let index: Vec<AtomicUsize> = (0..n).map(|_| AtomicUsize::new(UNCLAIMED)).collect();
        let duplicate = AtomicUsize::new(UNCLAIMED);

        for_each_index(window.clone(), |i| {
            if !offsets.is_boundary(i) {
                return;
            }
            let slot = offsets.get(i) - base;
            let node = entries[i];
            order[slot].store(node, Ordering::Relaxed);
            if index[node]
                .compare_exchange(UNCLAIMED, slot, Ordering::Relaxed, Ordering::Relaxed)
                .is_err()
            {
                duplicate.fetch_min(node, Ordering::Relaxed);
            }
        });

        debug!(?window, size, n, "scatter complete");

        let duplicate = duplicate.into_inner();
        if duplicate != UNCLAIMED {
            return Err(PramError::InconsistentTour(format!(
                "node {} discovered more than once",
                duplicate
            )));
        }

        Ok(DiscoveryOrder {
            order: order
                .into_iter()
                .map(|slot| NodeId(slot.into_inner()))
                .collect(),
            index: index.into_iter().map(AtomicUsize::into_inner).collect(),
        })
    }
}
