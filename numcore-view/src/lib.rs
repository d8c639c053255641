//! Shapes, typed memory blocks and strided element iteration.
//!
//! This crate is the addressing layer of numcore. It knows how to walk any
//! rank of view, contiguous or not, over a typed slice, and how to pair two
//! such walks for broadcasting. It never performs arithmetic.
//!
//! # Core Types
//!
//! - [`Shape`]: dims, element strides, start offset and derived flags
//! - [`MemoryBlock`] / [`MemoryBlockMut`] / [`OwnedBlock`]: typed slices tagged
//!   with their [`NpType`](numcore_traits::NpType)
//! - [`CoordinateIncrementor`] / [`OffsetIncrementor`]: multi-radix counters
//! - [`NdIter`]: typed element iterator, [`DynIter`] its type-erased form,
//!   [`NdIterMut`] its write-through counterpart
//! - [`MultiIterator`]: synchronized traversal of two iterators under a
//!   [`StopPolicy`]
//!
//! # Metadata Transformations
//!
//! These operate only on dims/strides/offset and never access data:
//! - `permute`: reorder dimensions
//! - `slice_axis`: restrict an axis to a stepped range
//! - `reversed_axis`: flip an axis
//! - `broadcast_to`: right-align and expand size-1 dimensions

use numcore_traits::NpType;
use smallvec::SmallVec;

/// Stack-allocated Vec for coordinates and strides.
/// 8 elements covers the ranks seen in practice without spilling.
pub(crate) type SVec<T> = SmallVec<[T; 8]>;

/// Expand `$body` once per element-type variant of a block-like enum.
macro_rules! dispatch_variants {
    ($enum:ident, $value:expr, $s:ident => $body:expr) => {
        match $value {
            $enum::Bool($s) => $body,
            $enum::Int8($s) => $body,
            $enum::UInt8($s) => $body,
            $enum::Int16($s) => $body,
            $enum::UInt16($s) => $body,
            $enum::Int32($s) => $body,
            $enum::UInt32($s) => $body,
            $enum::Int64($s) => $body,
            $enum::UInt64($s) => $body,
            $enum::Char($s) => $body,
            $enum::Float32($s) => $body,
            $enum::Float64($s) => $body,
            $enum::Decimal($s) => $body,
        }
    };
}

pub mod block;
pub mod dyn_iter;
pub mod incrementor;
pub mod iter;
pub mod multi;
pub mod shape;

pub use block::{BlockElement, MemoryBlock, MemoryBlockMut, OwnedBlock};
pub use dyn_iter::{create_iterator, DynIter};
pub use incrementor::{CoordinateIncrementor, EndPolicy, OffsetIncrementor};
pub use iter::{NdIter, NdIterMut};
pub use multi::{assign, assign_block, broadcast_pair, MultiIterator, StopPolicy};
pub use shape::{broadcast_dims, broadcast_shapes, row_major_strides, Shape};

// ============================================================================
// Error types
// ============================================================================

/// Errors raised while describing or traversing a view.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViewError {
    /// Ranks do not match.
    #[error("rank mismatch: {0} vs {1}")]
    RankMismatch(usize, usize),

    /// Shapes cannot be broadcast together.
    #[error("shape mismatch: {0:?} vs {1:?}")]
    ShapeMismatch(Vec<usize>, Vec<usize>),

    /// Stride array length doesn't match dimensions.
    #[error("stride and dims length mismatch")]
    StrideLengthMismatch,

    /// Invalid axis index for the given rank.
    #[error("invalid axis {axis} for rank {rank}")]
    InvalidAxis { axis: usize, rank: usize },

    /// Slice range or step is not valid for the axis.
    #[error("invalid slice {start}..{stop} step {step} for axis {axis} of length {len}")]
    InvalidSlice {
        axis: usize,
        start: usize,
        stop: usize,
        step: usize,
        len: usize,
    },

    /// The view addresses elements past the end of its block.
    #[error("view addresses element {required} but the block holds {len}")]
    OutOfBounds { required: usize, len: usize },

    /// Integer overflow, or a negative offset, while computing an offset.
    #[error("offset overflow while computing element offset")]
    OffsetOverflow,

    /// A traversal was requested over a shape with no elements.
    #[error("shape has no elements")]
    EmptyShape,

    /// The block's element type differs from the one requested.
    #[error("unsupported type: expected {expected}, found {found}")]
    UnsupportedType { expected: NpType, found: NpType },

    /// Two lengths that must agree do not.
    #[error("length mismatch: expected {expected}, found {found}")]
    LengthMismatch { expected: usize, found: usize },
}

/// Result type for view operations.
pub type Result<T> = std::result::Result<T, ViewError>;
