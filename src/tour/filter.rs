//! First-visit filter over an Euler tour
//!
//! Position `i + 1` is a first visit unless the tour is stepping back up,
//! i.e. unless `tour[i + 1]` is the parent of `tour[i]`. Each bit depends
//! only on two adjacent tour entries and the static parent relation.

use super::EulerTour;
use crate::tree::{NodeId, TreeModel};
use crate::util::parallel::map_indexed;
use bitvec::prelude::*;

/// Boolean mask aligned with tour positions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterMask {
    bits: BitVec,
}

impl FilterMask {
    /// Number of tour positions covered
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Is position `i` a first visit
    #[inline]
    pub fn get(&self, i: usize) -> bool {
        self.bits[i]
    }

    /// Number of marked positions
    pub fn count(&self) -> usize {
        self.bits.count_ones()
    }

    /// Mask as 0/1 counts, the input to the scan
    pub fn to_counts(&self) -> Vec<usize> {
        self.bits.iter().map(|bit| usize::from(*bit)).collect()
    }

    /// Underlying bits
    pub fn as_bitslice(&self) -> &BitSlice {
        &self.bits
    }
}

impl FromIterator<bool> for FilterMask {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self {
            bits: iter.into_iter().collect(),
        }
    }
}

/// Mark first-visit positions of `tour`
///
/// `mask[0]` is always set: the root is discovered first.
///
/// # Panics
///
/// If an entry is not a node of `tree`. [`discovery_order`](super::discovery_order)
/// rejects such tours before filtering.
pub fn first_visit_mask<V: Sync>(tree: &TreeModel<V>, tour: &EulerTour) -> FilterMask {
    let entries = tour.as_slice();
    map_indexed(entries.len(), |i| {
        i == 0 || !tree.parent(NodeId(entries[i - 1])).is(entries[i])
    })
    .into_iter()
    .collect()
}
