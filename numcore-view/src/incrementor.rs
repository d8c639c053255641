//! Multi-radix counters over dims.
//!
//! [`CoordinateIncrementor`] walks coordinates in row-major order;
//! [`OffsetIncrementor`] turns that walk into flat offsets for a strided view.
//! Both are explicit cursors: each step depends on the previous one, so a
//! traversal that uses them is sequential.

use crate::shape::Shape;
use crate::{Result, SVec, ViewError};

/// What a [`CoordinateIncrementor`] does once the left-most axis overflows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndPolicy {
    /// Report exhaustion with `None` until [`CoordinateIncrementor::reset`].
    Stop,
    /// Rewind to the all-zero coordinate and keep going.
    Reset,
}

/// Row-major counter over a dims vector.
///
/// The current coordinate starts at all zeros; [`next`](Self::next) moves to
/// the following one. Size-1 axes never vary.
#[derive(Debug, Clone)]
pub struct CoordinateIncrementor {
    dims: SVec<usize>,
    index: SVec<usize>,
    policy: EndPolicy,
    finished: bool,
}

impl CoordinateIncrementor {
    pub fn new(dims: &[usize]) -> Result<Self> {
        Self::with_policy(dims, EndPolicy::Stop)
    }

    /// Counter that cycles forever.
    pub fn auto_reset(dims: &[usize]) -> Result<Self> {
        Self::with_policy(dims, EndPolicy::Reset)
    }

    pub fn with_policy(dims: &[usize], policy: EndPolicy) -> Result<Self> {
        if dims.iter().any(|&d| d == 0) {
            return Err(ViewError::EmptyShape);
        }
        let dims: SVec<usize> = if dims.is_empty() {
            SVec::from_slice(&[1])
        } else {
            SVec::from_slice(dims)
        };
        Ok(Self {
            index: SVec::from_elem(0, dims.len()),
            dims,
            policy,
            finished: false,
        })
    }

    #[inline]
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Current coordinate.
    #[inline]
    pub fn index(&self) -> &[usize] {
        &self.index
    }

    #[inline]
    pub fn policy(&self) -> EndPolicy {
        self.policy
    }

    pub fn reset(&mut self) {
        self.index.iter_mut().for_each(|i| *i = 0);
        self.finished = false;
    }

    /// Advance to the next coordinate.
    ///
    /// Returns `None` once the left-most axis overflows (always, for `Stop`,
    /// until reset). With `Reset` the cursor rewinds and the all-zero
    /// coordinate is returned instead.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<&[usize]> {
        if self.finished {
            return None;
        }
        for axis in (0..self.dims.len()).rev() {
            if self.dims[axis] == 1 {
                continue;
            }
            self.index[axis] += 1;
            if self.index[axis] < self.dims[axis] {
                return Some(self.index.as_slice());
            }
            self.index[axis] = 0;
        }
        match self.policy {
            EndPolicy::Reset => Some(self.index.as_slice()),
            EndPolicy::Stop => {
                self.finished = true;
                None
            }
        }
    }
}

/// Flat offsets of a strided view in row-major coordinate order.
#[derive(Debug, Clone)]
pub struct OffsetIncrementor {
    coords: CoordinateIncrementor,
    strides: SVec<isize>,
    offset: usize,
    size: usize,
    emitted: usize,
}

impl OffsetIncrementor {
    /// Bounded walk of `shape`.
    pub fn new(shape: &Shape) -> Result<Self> {
        Self::with_policy(shape, EndPolicy::Stop)
    }

    /// Walk of `shape` that rewinds instead of ending.
    pub fn auto_reset(shape: &Shape) -> Result<Self> {
        Self::with_policy(shape, EndPolicy::Reset)
    }

    pub fn with_policy(shape: &Shape, policy: EndPolicy) -> Result<Self> {
        let coords = CoordinateIncrementor::with_policy(shape.dims(), policy)?;
        let strides: SVec<isize> = if shape.is_scalar() {
            SVec::from_slice(&[0])
        } else {
            SVec::from_slice(shape.strides())
        };
        Ok(Self {
            coords,
            strides,
            offset: shape.offset(),
            size: shape.size(),
            emitted: 0,
        })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn is_auto_reset(&self) -> bool {
        self.coords.policy() == EndPolicy::Reset
    }

    /// Whether another offset is available. Always `true` when auto-resetting.
    #[inline]
    pub fn has_next(&self) -> bool {
        self.is_auto_reset() || self.emitted < self.size
    }

    /// Offset of the current coordinate.
    #[inline]
    pub fn current(&self) -> usize {
        let mut acc = self.offset as i64;
        for (&c, &s) in self.coords.index().iter().zip(self.strides.iter()) {
            acc += c as i64 * s as i64;
        }
        acc as usize
    }

    /// Return the current offset and advance.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<usize> {
        if !self.has_next() {
            return None;
        }
        let off = self.current();
        self.coords.next();
        self.emitted += 1;
        if self.emitted == self.size && self.is_auto_reset() {
            self.emitted = 0;
        }
        Some(off)
    }

    pub fn reset(&mut self) {
        self.coords.reset();
        self.emitted = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(inc: &mut CoordinateIncrementor) -> Vec<Vec<usize>> {
        let mut out = vec![inc.index().to_vec()];
        while let Some(idx) = inc.next() {
            out.push(idx.to_vec());
        }
        out
    }

    #[test]
    fn test_coordinate_order() {
        let mut inc = CoordinateIncrementor::new(&[2, 3]).unwrap();
        assert_eq!(
            collect(&mut inc),
            vec![
                vec![0, 0],
                vec![0, 1],
                vec![0, 2],
                vec![1, 0],
                vec![1, 1],
                vec![1, 2]
            ]
        );
        assert!(inc.next().is_none());
    }

    #[test]
    fn test_unit_axes_never_vary() {
        let mut inc = CoordinateIncrementor::new(&[2, 1, 2]).unwrap();
        let coords = collect(&mut inc);
        assert_eq!(coords.len(), 4);
        assert!(coords.iter().all(|c| c[1] == 0));
    }

    #[test]
    fn test_all_unit_dims_finish_immediately() {
        let mut inc = CoordinateIncrementor::new(&[1, 1]).unwrap();
        assert!(inc.next().is_none());
        let mut inc = CoordinateIncrementor::new(&[]).unwrap();
        assert_eq!(inc.dims(), &[1]);
        assert!(inc.next().is_none());
    }

    #[test]
    fn test_zero_dim_rejected() {
        assert!(matches!(
            CoordinateIncrementor::new(&[3, 0]),
            Err(ViewError::EmptyShape)
        ));
    }

    #[test]
    fn test_reset_reproduces_sequence() {
        let mut inc = CoordinateIncrementor::new(&[3, 2]).unwrap();
        let first = collect(&mut inc);
        inc.reset();
        assert_eq!(collect(&mut inc), first);
    }

    #[test]
    fn test_auto_reset_cycles() {
        let mut inc = CoordinateIncrementor::auto_reset(&[2]).unwrap();
        assert_eq!(inc.next(), Some(&[1][..]));
        assert_eq!(inc.next(), Some(&[0][..]));
        assert_eq!(inc.next(), Some(&[1][..]));
    }

    #[test]
    fn test_offsets_of_transposed_view() {
        let shape = Shape::new(&[2, 3]).transposed();
        let mut inc = OffsetIncrementor::new(&shape).unwrap();
        let mut offsets = Vec::new();
        while inc.has_next() {
            offsets.push(inc.next().unwrap());
        }
        assert_eq!(offsets, vec![0, 3, 1, 4, 2, 5]);
        assert_eq!(inc.next(), None);
    }

    #[test]
    fn test_offsets_auto_reset() {
        let shape = Shape::with_strides(&[2], &[3], 1).unwrap();
        let mut inc = OffsetIncrementor::auto_reset(&shape).unwrap();
        let offsets: Vec<usize> = (0..5).map(|_| inc.next().unwrap()).collect();
        assert_eq!(offsets, vec![1, 4, 1, 4, 1]);
        assert!(inc.has_next());
    }

    #[test]
    fn test_scalar_offset() {
        let shape = Shape::with_strides(&[], &[], 7).unwrap();
        let mut inc = OffsetIncrementor::new(&shape).unwrap();
        assert_eq!(inc.next(), Some(7));
        assert!(!inc.has_next());
    }
}
