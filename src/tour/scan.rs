//! Work-efficient exclusive prefix scan (Blelloch)
//!
//! 1. **Up-sweep**: build partial sums in an implicit binary tree
//! 2. **Down-sweep**: push prefixes back down to the leaves
//!
//! The buffer is padded to a power of two `w`. Each sweep has `log₂ w`
//! levels; a level is one parallel step over disjoint chunks of the buffer,
//! so levels are separated by a barrier and no index reads a slot another
//! index writes within the same level.
//!
//! Work: O(n). Depth: O(log n).

use super::FilterMask;
use crate::util::parallel::for_each_chunk_mut;
use tracing::trace;

/// Exclusive prefix sums of the filter mask
///
/// `len() + 1` offsets: `offsets[0] = 0`, `offsets[i + 1] = offsets[i] + mask[i]`,
/// so the last offset is the total count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOffsets {
    offsets: Vec<usize>,
}

impl ScanOffsets {
    /// Number of scanned positions
    pub fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Check if no positions were scanned
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Offset at boundary `i` (`0..=len`)
    #[inline]
    pub fn get(&self, i: usize) -> usize {
        self.offsets[i]
    }

    /// Total of the mask
    pub fn total(&self) -> usize {
        self.offsets[self.offsets.len() - 1]
    }

    /// Does position `i` contribute an element (`offsets[i] != offsets[i + 1]`)
    #[inline]
    pub fn is_boundary(&self, i: usize) -> bool {
        self.offsets[i] != self.offsets[i + 1]
    }

    /// All `len() + 1` offsets
    pub fn as_slice(&self) -> &[usize] {
        &self.offsets
    }
}

/// Scan the mask into scatter offsets
pub fn exclusive_scan(mask: &FilterMask) -> ScanOffsets {
    let (mut offsets, total) = blelloch_exclusive_scan(&mask.to_counts());
    offsets.push(total);
    ScanOffsets { offsets }
}

/// Blelloch exclusive scan, returning the prefixes and the grand total
pub fn blelloch_exclusive_scan(values: &[usize]) -> (Vec<usize>, usize) {
    let n = values.len();
    if n == 0 {
        return (Vec::new(), 0);
    }

    let width = n.next_power_of_two();
    let mut buf = vec![0usize; width];
    buf[..n].copy_from_slice(values);

    let mut stride = 2;
    while stride <= width {
        let half = stride / 2;
        for_each_chunk_mut(&mut buf, stride, |chunk| {
            chunk[stride - 1] += chunk[half - 1];
        });
        trace!(stride, "up-sweep level");
        stride *= 2;
    }

    let total = buf[width - 1];
    buf[width - 1] = 0;

    let mut stride = width;
    while stride >= 2 {
        let half = stride / 2;
        for_each_chunk_mut(&mut buf, stride, |chunk| {
            let left = chunk[half - 1];
            chunk[half - 1] = chunk[stride - 1];
            chunk[stride - 1] += left;
        });
        trace!(stride, "down-sweep level");
        stride /= 2;
    }

    buf.truncate(n);
    (buf, total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sequential(values: &[usize]) -> Vec<usize> {
        let mut out = Vec::with_capacity(values.len());
        let mut sum = 0;
        for &v in values {
            out.push(sum);
            sum += v;
        }
        out
    }

    #[test]
    fn matches_sequential_scan_for_odd_lengths() {
        for len in 0..40 {
            let values: Vec<usize> = (0..len).map(|i| (i * 7 + 3) % 5).collect();
            let (prefix, total) = blelloch_exclusive_scan(&values);
            assert_eq!(prefix, sequential(&values), "len {len}");
            assert_eq!(total, values.iter().sum::<usize>());
        }
    }

    #[test]
    fn single_element() {
        assert_eq!(blelloch_exclusive_scan(&[42]), (vec![0], 42));
    }

    #[test]
    fn fixture_offsets() {
        let mask: FilterMask = [true, true, true, true, false, true, false, false, false, true, false]
            .into_iter()
            .collect();
        let offsets = exclusive_scan(&mask);
        assert_eq!(offsets.as_slice(), &[0, 1, 2, 3, 4, 4, 5, 5, 5, 5, 6, 6]);
        assert_eq!(offsets.total(), 6);
        assert!(offsets.is_boundary(9));
        assert!(!offsets.is_boundary(10));
    }
}
