//! NumPy-style elementwise kernels over typed strided memory.
//!
//! numcore evaluates binary and unary operators over runtime-typed memory
//! blocks described by arbitrary strided [`Shape`]s, following NumPy's type
//! promotion, integer wraparound and broadcasting rules. This crate is a thin
//! facade over the workspace crates:
//!
//! - [`numcore_traits`]: element types, [`NpType`] tags and promotion
//! - [`numcore_view`]: shapes, memory blocks and strided iterators
//! - [`numcore_kernel`]: the operator table, dispatcher and execution loops
//!
//! # Primary API
//!
//! - [`binary`] / [`unary`]: allocate a contiguous result and evaluate into it
//! - [`add`], [`subtract`], [`multiply`], [`divide`], [`modulo`]: shorthands
//! - [`resolve_binary`] / [`resolve_unary`]: resolve once and execute into
//!   caller-owned output
//! - [`assign`] / [`assign_block`]: broadcast copy into a strided view
//!
//! # Example
//!
//! ```rust
//! use numcore::{add, MemoryBlock, Shape};
//!
//! // (3, 1) + (1, 4) broadcasts to (3, 4)
//! let col = vec![0i32, 10, 20];
//! let row = vec![1i64, 2, 3, 4];
//! let (out, shape) = add(
//!     &MemoryBlock::from(&col),
//!     &Shape::new(&[3, 1]),
//!     &MemoryBlock::from(&row),
//!     &Shape::new(&[1, 4]),
//! )
//! .unwrap();
//!
//! assert_eq!(shape.dims(), &[3, 4]);
//! assert_eq!(
//!     out.typed::<i64>().unwrap(),
//!     &[1, 2, 3, 4, 11, 12, 13, 14, 21, 22, 23, 24]
//! );
//! ```

mod ops;

pub use numcore_kernel::{
    default_dispatcher, resolve_binary, resolve_unary, result_type, unary_result_type, BinaryOp,
    BinaryOperation, Dispatcher, KernelConfig, KernelError, Strategy, UnaryOp, UnaryOperation,
};
pub use numcore_traits::{
    promote, promote_with_scalar, true_divide_type, Decimal, Element, NpChar, NpType, Value,
};
pub use numcore_view::{
    assign, assign_block, broadcast_pair, create_iterator, BlockElement, DynIter, MemoryBlock,
    MemoryBlockMut, MultiIterator, NdIter, NdIterMut, OwnedBlock, Shape, StopPolicy, ViewError,
};

pub use ops::{add, binary, binary_with, divide, modulo, multiply, subtract, unary, unary_with};

// ============================================================================
// Error types
// ============================================================================

/// Errors returned by the facade operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Kernel(#[from] KernelError),

    #[error(transparent)]
    View(#[from] ViewError),
}

/// Result type for facade operations.
pub type Result<T> = std::result::Result<T, Error>;
