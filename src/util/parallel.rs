//! Index-parallel primitives
//!
//! Every helper here is one synchronous PRAM step: all indices run
//! independently and the call returns only once every index has finished,
//! which is the barrier between steps.
//!
//! With the `parallel` feature the steps run on the rayon pool; without it
//! they run as a sequential emulation with identical results.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::ops::Range;

/// Parallel map: `out[i] = f(i)` for every slot
pub fn fill_indexed<T, F>(out: &mut [T], f: F)
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    #[cfg(feature = "parallel")]
    out.par_iter_mut()
        .enumerate()
        .for_each(|(i, slot)| *slot = f(i));

    #[cfg(not(feature = "parallel"))]
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = f(i);
    }
}

/// Parallel map into a fresh vector of length `len`
pub fn map_indexed<T, F>(len: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        (0..len).into_par_iter().map(f).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        (0..len).map(f).collect()
    }
}

/// Run `f` once per index in `range`
///
/// Side effects must go through synchronised slots (atomics); the closure
/// gets no mutable access.
pub fn for_each_index<F>(range: Range<usize>, f: F)
where
    F: Fn(usize) + Sync + Send,
{
    #[cfg(feature = "parallel")]
    range.into_par_iter().for_each(f);

    #[cfg(not(feature = "parallel"))]
    range.for_each(f);
}

/// Apply `f` to every disjoint chunk of exactly `chunk_len` elements
///
/// Trailing elements that do not fill a whole chunk are left untouched.
pub fn for_each_chunk_mut<T, F>(data: &mut [T], chunk_len: usize, f: F)
where
    T: Send,
    F: Fn(&mut [T]) + Sync + Send,
{
    debug_assert!(chunk_len > 0, "chunk length must be positive");

    #[cfg(feature = "parallel")]
    data.par_chunks_exact_mut(chunk_len).for_each(f);

    #[cfg(not(feature = "parallel"))]
    data.chunks_exact_mut(chunk_len).for_each(f);
}

/// Parallel reduction: does `pred` hold for every index in `0..len`
pub fn all_indices<F>(len: usize, pred: F) -> bool
where
    F: Fn(usize) -> bool + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        (0..len).into_par_iter().all(pred)
    }

    #[cfg(not(feature = "parallel"))]
    {
        (0..len).all(pred)
    }
}

/// Lowest index in `0..len` satisfying `pred`, if any
pub fn first_index<F>(len: usize, pred: F) -> Option<usize>
where
    F: Fn(usize) -> bool + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        (0..len).into_par_iter().position_first(pred)
    }

    #[cfg(not(feature = "parallel"))]
    {
        (0..len).position(pred)
    }
}

/// Parallel reduction: number of indices in `0..len` satisfying `pred`
pub fn count_indices<F>(len: usize, pred: F) -> usize
where
    F: Fn(usize) -> bool + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        (0..len).into_par_iter().filter(|&i| pred(i)).count()
    }

    #[cfg(not(feature = "parallel"))]
    {
        (0..len).filter(|&i| pred(i)).count()
    }
}
