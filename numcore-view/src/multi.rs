//! Synchronized traversal of two element iterators.
//!
//! Broadcasting pairs an operand with the full broadcast extent (the driver)
//! and an operand that repeats. The repeating side either auto-resets or is
//! rewound by the [`StopPolicy`]; neither operand is ever materialized.

use crate::block::{MemoryBlock, MemoryBlockMut};
use crate::iter::{NdIter, NdIterMut};
use crate::shape::{broadcast_dims, Shape};
use crate::Result;

/// Which side governs termination of a [`MultiIterator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopPolicy {
    /// The rhs governs; the lhs is never rewound and running dry ends the
    /// sequence.
    ///
    /// Only the rhs is consulted before a step, so over two bounded operands
    /// this yields the same pairs as [`StopPolicy::Any`]. It names the rhs as
    /// the driver when the lhs is an auto-resetting operand.
    OnlyRhs,
    /// The rhs governs; an exhausted lhs is rewound.
    Rhs,
    /// The lhs governs; an exhausted rhs is rewound.
    Lhs,
    /// Stop as soon as either side is exhausted.
    Any,
    /// Run for the longer side, rewinding whichever side runs out.
    Both,
}

/// Pairs of elements drawn from two iterators in lockstep.
#[derive(Debug, Clone)]
pub struct MultiIterator<'a, L, R> {
    lhs: NdIter<'a, L>,
    rhs: NdIter<'a, R>,
    policy: StopPolicy,
    emitted: usize,
}

impl<'a, L: Copy, R: Copy> MultiIterator<'a, L, R> {
    pub fn new(lhs: NdIter<'a, L>, rhs: NdIter<'a, R>, policy: StopPolicy) -> Self {
        Self {
            lhs,
            rhs,
            policy,
            emitted: 0,
        }
    }

    #[inline]
    pub fn policy(&self) -> StopPolicy {
        self.policy
    }

    /// Larger of the two operand sizes.
    #[inline]
    pub fn size(&self) -> usize {
        self.lhs.size().max(self.rhs.size())
    }

    /// Both sides have another element.
    #[inline]
    pub fn has_next(&self) -> bool {
        self.lhs.has_next() && self.rhs.has_next()
    }

    /// At least one side has another element.
    #[inline]
    pub fn any_has_next(&self) -> bool {
        self.lhs.has_next() || self.rhs.has_next()
    }

    pub fn reset(&mut self) {
        self.lhs.reset();
        self.rhs.reset();
        self.emitted = 0;
    }

    pub fn move_next(&mut self) -> Option<(L, R)> {
        match self.policy {
            StopPolicy::Lhs => {
                if !self.lhs.has_next() {
                    return None;
                }
                if !self.rhs.has_next() {
                    self.rhs.reset();
                }
            }
            StopPolicy::Rhs => {
                if !self.rhs.has_next() {
                    return None;
                }
                if !self.lhs.has_next() {
                    self.lhs.reset();
                }
            }
            StopPolicy::OnlyRhs => {
                if !self.rhs.has_next() {
                    return None;
                }
            }
            StopPolicy::Any => {
                if !self.has_next() {
                    return None;
                }
            }
            StopPolicy::Both => {
                if self.emitted >= self.size() || !self.any_has_next() {
                    return None;
                }
                if !self.lhs.has_next() {
                    self.lhs.reset();
                }
                if !self.rhs.has_next() {
                    self.rhs.reset();
                }
            }
        }
        let l = self.lhs.move_next()?;
        let r = self.rhs.move_next()?;
        self.emitted += 1;
        Some((l, r))
    }
}

impl<L: Copy, R: Copy> Iterator for MultiIterator<'_, L, R> {
    type Item = (L, R);

    #[inline]
    fn next(&mut self) -> Option<(L, R)> {
        self.move_next()
    }
}

/// Pair two shaped slices for a broadcasting traversal.
///
/// The pairs come out in row-major order of the broadcast shape. When one
/// side already has the broadcast dims and the other is a trailing suffix of
/// them, the smaller side auto-resets. Otherwise both sides are rewritten as
/// stride-0 broadcast views of equal size.
pub fn broadcast_pair<'a, L: Copy, R: Copy>(
    lhs: &'a [L],
    lhs_shape: &Shape,
    rhs: &'a [R],
    rhs_shape: &Shape,
) -> Result<MultiIterator<'a, L, R>> {
    let dims = broadcast_dims(lhs_shape.dims(), rhs_shape.dims())?;
    let size: usize = dims.iter().product();

    if lhs_shape.dims() == rhs_shape.dims() {
        return Ok(MultiIterator::new(
            NdIter::new(lhs, lhs_shape, false)?,
            NdIter::new(rhs, rhs_shape, false)?,
            StopPolicy::Any,
        ));
    }
    if size > 0 {
        if lhs_shape.dims() == dims.as_slice() && rhs_shape.is_suffix_of(&dims) {
            return Ok(MultiIterator::new(
                NdIter::new(lhs, lhs_shape, false)?,
                NdIter::new(rhs, rhs_shape, true)?,
                StopPolicy::Lhs,
            ));
        }
        if rhs_shape.dims() == dims.as_slice() && lhs_shape.is_suffix_of(&dims) {
            return Ok(MultiIterator::new(
                NdIter::new(lhs, lhs_shape, true)?,
                NdIter::new(rhs, rhs_shape, false)?,
                StopPolicy::Rhs,
            ));
        }
    }
    let lhs_view = lhs_shape.broadcast_to(&dims)?;
    let rhs_view = rhs_shape.broadcast_to(&dims)?;
    Ok(MultiIterator::new(
        NdIter::new(lhs, &lhs_view, false)?,
        NdIter::new(rhs, &rhs_view, false)?,
        StopPolicy::Both,
    ))
}

/// Copy `src` into the view `dst_shape` of `dst`, broadcasting `src` to the
/// destination dims.
///
/// Both views are checked before the first write. The destination may be
/// sliced, reversed or transposed; `src` must broadcast to its dims exactly
/// (the destination never grows).
pub fn assign<T: Copy>(
    dst: &mut [T],
    dst_shape: &Shape,
    src: &[T],
    src_shape: &Shape,
) -> Result<()> {
    let src_view = src_shape.broadcast_to(dst_shape.dims())?;
    let mut values = NdIter::new(src, &src_view, false)?;
    let mut slots = NdIterMut::new(dst, dst_shape)?;
    while let (Some(slot), Some(x)) = (slots.move_next_mut(), values.move_next()) {
        *slot = x;
    }
    Ok(())
}

/// [`assign`] over type-tagged blocks. The blocks must hold the same type.
pub fn assign_block(
    dst: &mut MemoryBlockMut<'_>,
    dst_shape: &Shape,
    src: &MemoryBlock<'_>,
    src_shape: &Shape,
) -> Result<()> {
    dispatch_variants!(MemoryBlockMut, dst, d => assign(&mut **d, dst_shape, src.typed()?, src_shape))
}
