//! Typed element iteration over a shaped slice.

use crate::incrementor::OffsetIncrementor;
use crate::shape::Shape;
use crate::{Result, ViewError};

/// Addressing strategy chosen once at construction.
#[derive(Debug, Clone)]
enum Lane {
    /// Exactly one element.
    Scalar { offset: usize, consumed: bool },
    /// `start + index * stride`: rank-1 views and contiguous views.
    Linear {
        index: usize,
        start: usize,
        stride: isize,
    },
    /// Rank >= 2 non-contiguous views.
    Strided(OffsetIncrementor),
}

impl Lane {
    fn new(shape: &Shape, auto_reset: bool) -> Result<Self> {
        let size = shape.size();
        if size == 0 && auto_reset {
            return Err(ViewError::EmptyShape);
        }
        Ok(if size == 1 {
            Lane::Scalar {
                offset: shape.offset(),
                consumed: false,
            }
        } else if shape.ndim() == 1 {
            Lane::Linear {
                index: 0,
                start: shape.offset(),
                stride: shape.strides()[0],
            }
        } else if shape.is_contiguous() || size == 0 {
            Lane::Linear {
                index: 0,
                start: shape.offset(),
                stride: 1,
            }
        } else if auto_reset {
            Lane::Strided(OffsetIncrementor::auto_reset(shape)?)
        } else {
            Lane::Strided(OffsetIncrementor::new(shape)?)
        })
    }

    fn has_next(&self, size: usize) -> bool {
        match self {
            Lane::Scalar { consumed, .. } => !consumed,
            Lane::Linear { index, .. } => *index < size,
            Lane::Strided(inc) => inc.has_next(),
        }
    }

    /// Offset of the next element, or `None` once a bounded walk ends.
    #[inline]
    fn next_offset(&mut self, size: usize, auto_reset: bool) -> Option<usize> {
        match self {
            Lane::Scalar { offset, consumed } => {
                if *consumed && !auto_reset {
                    return None;
                }
                *consumed = true;
                Some(*offset)
            }
            Lane::Linear {
                index,
                start,
                stride,
            } => {
                if *index >= size {
                    if !auto_reset {
                        return None;
                    }
                    *index = 0;
                }
                let pos = (*start as isize + *index as isize * *stride) as usize;
                *index += 1;
                Some(pos)
            }
            Lane::Strided(inc) => inc.next(),
        }
    }

    fn reset(&mut self) {
        match self {
            Lane::Scalar { consumed, .. } => *consumed = false,
            Lane::Linear { index, .. } => *index = 0,
            Lane::Strided(inc) => inc.reset(),
        }
    }
}

/// Element iterator over `data` laid out by a [`Shape`], in row-major
/// coordinate order.
///
/// A bounded iterator yields `size` elements then `None`. An auto-resetting
/// iterator never reports exhaustion: after the last element it rewinds and
/// starts over, which is how the smaller operand of a broadcast repeats.
#[derive(Debug, Clone)]
pub struct NdIter<'a, T> {
    data: &'a [T],
    lane: Lane,
    size: usize,
    auto_reset: bool,
}

impl<'a, T: Copy> NdIter<'a, T> {
    /// Build an iterator, checking that `shape` stays inside `data`.
    pub fn new(data: &'a [T], shape: &Shape, auto_reset: bool) -> Result<Self> {
        shape.validate(data.len())?;
        Ok(Self {
            data,
            lane: Lane::new(shape, auto_reset)?,
            size: shape.size(),
            auto_reset,
        })
    }

    /// Number of elements in one pass.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn is_auto_reset(&self) -> bool {
        self.auto_reset
    }

    /// Whether [`move_next`](Self::move_next) will yield. Always `true` when
    /// auto-resetting.
    pub fn has_next(&self) -> bool {
        self.auto_reset || self.lane.has_next(self.size)
    }

    /// Next element, or `None` once a bounded iterator is exhausted.
    #[inline]
    pub fn move_next(&mut self) -> Option<T> {
        self.lane
            .next_offset(self.size, self.auto_reset)
            .map(|off| self.data[off])
    }

    /// Rewind to the first element.
    pub fn reset(&mut self) {
        self.lane.reset();
    }
}

impl<T: Copy> Iterator for NdIter<'_, T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.move_next()
    }
}

/// Bounded write-through walk of a view of `data`, in the same order as
/// [`NdIter`].
///
/// Each call to [`move_next_mut`](Self::move_next_mut) lends the next
/// element mutably. A view with stride-0 axes yields the same element more
/// than once.
#[derive(Debug)]
pub struct NdIterMut<'a, T> {
    data: &'a mut [T],
    lane: Lane,
    size: usize,
}

impl<'a, T> NdIterMut<'a, T> {
    /// Build a walk, checking that `shape` stays inside `data`.
    pub fn new(data: &'a mut [T], shape: &Shape) -> Result<Self> {
        shape.validate(data.len())?;
        Ok(Self {
            lane: Lane::new(shape, false)?,
            size: shape.size(),
            data,
        })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn has_next(&self) -> bool {
        self.lane.has_next(self.size)
    }

    /// Next element of the view, or `None` once the walk is exhausted.
    #[inline]
    pub fn move_next_mut(&mut self) -> Option<&mut T> {
        let off = self.lane.next_offset(self.size, false)?;
        self.data.get_mut(off)
    }

    pub fn reset(&mut self) {
        self.lane.reset();
    }
}
