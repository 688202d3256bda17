//! Utility functions

pub mod parallel;

/// ⌈log₂ x⌉, with ⌈log₂ 0⌉ = ⌈log₂ 1⌉ = 0
#[inline]
pub fn ceil_log2(x: usize) -> usize {
    if x <= 1 {
        0
    } else {
        (usize::BITS - (x - 1).leading_zeros()) as usize
    }
}
