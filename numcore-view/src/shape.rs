//! View metadata: dims, element strides and start offset.

use crate::{Result, SVec, ViewError};

/// Compute row-major strides (C default: last index varies fastest).
pub fn row_major_strides(dims: &[usize]) -> Vec<isize> {
    let rank = dims.len();
    if rank == 0 {
        return vec![];
    }
    let mut strides = vec![1isize; rank];
    for i in (0..rank - 1).rev() {
        strides[i] = strides[i + 1] * dims[i + 1] as isize;
    }
    strides
}

/// Row-major contiguity test. Axes of length 1 never move the cursor, so
/// their strides are ignored.
fn is_row_major(dims: &[usize], strides: &[isize]) -> bool {
    let mut expected = 1isize;
    for (&d, &s) in dims.iter().zip(strides.iter()).rev() {
        if d != 1 && s != expected {
            return false;
        }
        expected *= d as isize;
    }
    true
}

/// Immutable description of how an N-d view maps onto a flat block.
///
/// Strides are in elements; `0` marks a broadcast axis and negative strides
/// walk an axis backwards. `offset` is the position of the all-zero
/// coordinate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    dims: Vec<usize>,
    strides: Vec<isize>,
    offset: usize,
    size: usize,
    contiguous: bool,
}

impl Shape {
    /// Natural row-major layout starting at offset 0.
    pub fn new(dims: &[usize]) -> Self {
        let strides = row_major_strides(dims);
        Self {
            size: dims.iter().product(),
            dims: dims.to_vec(),
            strides,
            offset: 0,
            contiguous: true,
        }
    }

    /// Rank-0 shape holding a single element.
    pub fn scalar() -> Self {
        Self::new(&[])
    }

    /// Rank-1 shape of length `n`.
    pub fn vector(n: usize) -> Self {
        Self::new(&[n])
    }

    /// Arbitrary strided layout.
    pub fn with_strides(dims: &[usize], strides: &[isize], offset: usize) -> Result<Self> {
        if dims.len() != strides.len() {
            return Err(ViewError::StrideLengthMismatch);
        }
        Ok(Self {
            size: dims.iter().product(),
            dims: dims.to_vec(),
            strides: strides.to_vec(),
            offset,
            contiguous: is_row_major(dims, strides),
        })
    }

    #[inline]
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    #[inline]
    pub fn strides(&self) -> &[isize] {
        &self.strides
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    /// Number of elements (1 for rank 0).
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    #[inline]
    pub fn is_scalar(&self) -> bool {
        self.dims.is_empty()
    }

    /// Elements occupy `offset..offset + size` in row-major order.
    #[inline]
    pub fn is_contiguous(&self) -> bool {
        self.contiguous
    }

    /// Anything other than the natural row-major layout starting at 0.
    #[inline]
    pub fn is_sliced(&self) -> bool {
        !self.contiguous || self.offset != 0
    }

    /// Check that every addressed element lies inside a block of `len`.
    pub fn validate(&self, len: usize) -> Result<()> {
        if self.size == 0 {
            return Ok(());
        }
        let mut min_offset = self.offset as i64;
        let mut max_offset = self.offset as i64;
        for (&dim, &stride) in self.dims.iter().zip(self.strides.iter()) {
            if dim > 1 {
                let end = (stride as i64)
                    .checked_mul(dim as i64 - 1)
                    .ok_or(ViewError::OffsetOverflow)?;
                if end >= 0 {
                    max_offset = max_offset
                        .checked_add(end)
                        .ok_or(ViewError::OffsetOverflow)?;
                } else {
                    min_offset = min_offset
                        .checked_add(end)
                        .ok_or(ViewError::OffsetOverflow)?;
                }
            }
        }
        if min_offset < 0 {
            return Err(ViewError::OffsetOverflow);
        }
        if max_offset as u64 >= len as u64 {
            return Err(ViewError::OutOfBounds {
                required: max_offset as usize + 1,
                len,
            });
        }
        Ok(())
    }

    /// Flat offset of a coordinate, accumulated in 64 bits.
    pub fn offset_of(&self, coord: &[usize]) -> usize {
        let mut acc = self.offset as i64;
        for (&c, &s) in coord.iter().zip(self.strides.iter()) {
            acc += c as i64 * s as i64;
        }
        acc as usize
    }

    /// Flat offset of the `linear`-th element in row-major order.
    pub fn transform_offset(&self, linear: usize) -> usize {
        if self.contiguous {
            return self.offset + linear;
        }
        let mut coord: SVec<usize> = SVec::from_elem(0, self.dims.len());
        let mut rem = linear;
        for axis in (0..self.dims.len()).rev() {
            let d = self.dims[axis].max(1);
            coord[axis] = rem % d;
            rem /= d;
        }
        self.offset_of(&coord)
    }

    /// Permute dimensions.
    pub fn permute(&self, perm: &[usize]) -> Result<Shape> {
        let rank = self.dims.len();
        if perm.len() != rank {
            return Err(ViewError::RankMismatch(perm.len(), rank));
        }
        let mut seen = vec![false; rank];
        for &p in perm {
            if p >= rank || seen[p] {
                return Err(ViewError::InvalidAxis { axis: p, rank });
            }
            seen[p] = true;
        }
        let dims: Vec<usize> = perm.iter().map(|&p| self.dims[p]).collect();
        let strides: Vec<isize> = perm.iter().map(|&p| self.strides[p]).collect();
        Shape::with_strides(&dims, &strides, self.offset)
    }

    /// Reverse the axes (matrix transpose for rank 2).
    pub fn transposed(&self) -> Shape {
        let dims: Vec<usize> = self.dims.iter().rev().copied().collect();
        let strides: Vec<isize> = self.strides.iter().rev().copied().collect();
        Shape {
            size: self.size,
            contiguous: is_row_major(&dims, &strides),
            dims,
            strides,
            offset: self.offset,
        }
    }

    /// Keep indices `start, start + step, ...` below `stop` along `axis`.
    pub fn slice_axis(&self, axis: usize, start: usize, stop: usize, step: usize) -> Result<Shape> {
        let rank = self.dims.len();
        if axis >= rank {
            return Err(ViewError::InvalidAxis { axis, rank });
        }
        let len = self.dims[axis];
        if step == 0 || start > stop || stop > len {
            return Err(ViewError::InvalidSlice {
                axis,
                start,
                stop,
                step,
                len,
            });
        }
        let n = (stop - start).div_ceil(step);
        let mut dims = self.dims.clone();
        let mut strides = self.strides.clone();
        dims[axis] = n;
        let offset = if n == 0 {
            self.offset
        } else {
            self.shifted(start, self.strides[axis])?
        };
        strides[axis] = self.strides[axis]
            .checked_mul(step as isize)
            .ok_or(ViewError::OffsetOverflow)?;
        Shape::with_strides(&dims, &strides, offset)
    }

    /// Walk `axis` backwards.
    pub fn reversed_axis(&self, axis: usize) -> Result<Shape> {
        let rank = self.dims.len();
        if axis >= rank {
            return Err(ViewError::InvalidAxis { axis, rank });
        }
        let len = self.dims[axis];
        if len <= 1 {
            return Ok(self.clone());
        }
        let offset = self.shifted(len - 1, self.strides[axis])?;
        let mut strides = self.strides.clone();
        strides[axis] = -strides[axis];
        Shape::with_strides(&self.dims, &strides, offset)
    }

    fn shifted(&self, steps: usize, stride: isize) -> Result<usize> {
        let delta = (steps as i64)
            .checked_mul(stride as i64)
            .ok_or(ViewError::OffsetOverflow)?;
        let offset = (self.offset as i64)
            .checked_add(delta)
            .ok_or(ViewError::OffsetOverflow)?;
        usize::try_from(offset).map_err(|_| ViewError::OffsetOverflow)
    }

    /// Broadcast this view to `target` dims.
    ///
    /// Dims are right-aligned; missing leading axes and size-1 axes get
    /// stride 0.
    pub fn broadcast_to(&self, target: &[usize]) -> Result<Shape> {
        let rank = self.dims.len();
        if rank > target.len() {
            return Err(ViewError::ShapeMismatch(self.dims.clone(), target.to_vec()));
        }
        let lead = target.len() - rank;
        let mut strides = vec![0isize; target.len()];
        for i in 0..rank {
            let (d, t) = (self.dims[i], target[lead + i]);
            if d == t {
                strides[lead + i] = self.strides[i];
            } else if d != 1 {
                return Err(ViewError::ShapeMismatch(self.dims.clone(), target.to_vec()));
            }
        }
        Shape::with_strides(target, &strides, self.offset)
    }

    /// `true` when cycling this view in row-major order reproduces its
    /// broadcast to `target`, i.e. its dims minus leading 1s are a suffix of
    /// `target`.
    pub fn is_suffix_of(&self, target: &[usize]) -> bool {
        let lead = self.dims.iter().take_while(|&&d| d == 1).count();
        let own = &self.dims[lead..];
        own.len() <= target.len() && target[target.len() - own.len()..] == *own
    }
}

/// NumPy broadcast of two dim vectors (right-aligned).
pub fn broadcast_dims(a: &[usize], b: &[usize]) -> Result<Vec<usize>> {
    let rank = a.len().max(b.len());
    let mut out = vec![0usize; rank];
    for i in 0..rank {
        let da = if i < rank - a.len() { 1 } else { a[i - (rank - a.len())] };
        let db = if i < rank - b.len() { 1 } else { b[i - (rank - b.len())] };
        out[i] = if da == db || db == 1 {
            da
        } else if da == 1 {
            db
        } else {
            return Err(ViewError::ShapeMismatch(a.to_vec(), b.to_vec()));
        };
    }
    Ok(out)
}

/// Broadcast two shapes against each other.
pub fn broadcast_shapes(a: &Shape, b: &Shape) -> Result<(Shape, Shape)> {
    let dims = broadcast_dims(a.dims(), b.dims())?;
    Ok((a.broadcast_to(&dims)?, b.broadcast_to(&dims)?))
}
