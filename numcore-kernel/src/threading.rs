//! Rayon-based parallel execution for flat elementwise loops.
//!
//! Only contiguous slices reach this module; strided walks stay sequential.
//! Each worker writes a disjoint chunk of the destination, so no
//! synchronisation beyond rayon's own splitting is needed.

use numcore_traits::Element;
use rayon::prelude::*;

/// Smallest chunk a rayon worker is handed.
pub(crate) const MIN_CHUNK_LEN: usize = 1 << 12;

/// `dst[i] = f(a[i], b[i])` across the rayon pool.
pub(crate) fn par_zip_map2<L: Element, R: Element, O: Element>(
    dst: &mut [O],
    a: &[L],
    b: &[R],
    f: fn(L, R) -> O,
) {
    tracing::trace!(len = dst.len(), "parallel zip_map2");
    dst.par_iter_mut()
        .zip(a.par_iter())
        .zip(b.par_iter())
        .with_min_len(MIN_CHUNK_LEN)
        .for_each(|((d, &x), &y)| *d = f(x, y));
}

/// `dst[i] = f(src[i])` across the rayon pool.
pub(crate) fn par_map1<I, O, F>(dst: &mut [O], src: &[I], f: F)
where
    I: Element,
    O: Element,
    F: Fn(I) -> O + Sync + Send,
{
    tracing::trace!(len = dst.len(), "parallel map1");
    dst.par_iter_mut()
        .zip(src.par_iter())
        .with_min_len(MIN_CHUNK_LEN)
        .for_each(|(d, &x)| *d = f(x));
}
