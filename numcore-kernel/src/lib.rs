//! Type-dispatched elementwise kernels for numcore.
//!
//! Binary and unary operations are resolved from runtime element types to a
//! monomorphized [`Operator`] once, cached, and then executed over typed
//! memory blocks with NumPy promotion, wraparound and broadcasting rules.
//!
//! # Primary API
//!
//! - [`resolve_binary`] / [`resolve_unary`]: look up (or build and cache) an
//!   operation for a `(op, lhs, rhs, out)` or `(op, input, out)` key
//! - [`BinaryOperation::execute`] / [`UnaryOperation::execute`]: run it over
//!   blocks and shapes, writing a contiguous output
//! - [`result_type`] / [`unary_result_type`]: the output type the operator
//!   table assigns to a key
//! - [`Dispatcher`]: a cache with its own [`KernelConfig`]; the free functions
//!   use a process-wide default
//!
//! # Execution strategies
//!
//! - contiguous operands of equal dims run a flat loop, split across rayon
//!   workers above [`KernelConfig::min_parallel_len`] elements
//! - a size-1 operand against a contiguous one broadcasts the scalar in the
//!   same flat loop
//! - everything else walks a [`MultiIterator`](numcore_view::MultiIterator)
//!   sequentially
//!
//! # Example
//!
//! ```rust
//! use numcore_kernel::{resolve_binary, BinaryOp};
//! use numcore_traits::NpType;
//! use numcore_view::{MemoryBlock, MemoryBlockMut, Shape};
//!
//! let a = vec![1i32, 2, 3];
//! let b = vec![10i64];
//! let mut out = vec![0i64; 3];
//!
//! let op = resolve_binary(BinaryOp::Add, NpType::Int32, NpType::Int64, NpType::Int64).unwrap();
//! op.execute(
//!     &MemoryBlock::from(&a),
//!     &Shape::vector(3),
//!     &MemoryBlock::from(&b),
//!     &Shape::scalar(),
//!     &mut MemoryBlockMut::from(&mut out[..]),
//!     &Shape::vector(3),
//! )
//! .unwrap();
//! assert_eq!(out, vec![11, 12, 13]);
//! ```

pub mod config;
pub mod dispatch;
mod exec;
pub mod op;
pub mod operator;
#[cfg(feature = "parallel")]
mod threading;

pub use config::{KernelConfig, MIN_PARALLEL_LEN_ENV, MINTHREADLENGTH};
pub use dispatch::{
    default_dispatcher, resolve_binary, resolve_unary, BinaryOperation, Dispatcher,
    UnaryOperation,
};
pub use exec::Strategy;
pub use op::{result_type, unary_result_type, BinaryOp, UnaryOp};
pub use operator::{Operator, Signature, UnaryOperator, UnarySignature};

use numcore_traits::NpType;
use numcore_view::ViewError;

// ============================================================================
// Error types
// ============================================================================

/// Errors raised while resolving or executing an operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KernelError {
    /// The operator table has no entry for this operand pair.
    #[error("operator {op} is not supported for {lhs} and {rhs}")]
    UnsupportedOperator {
        op: BinaryOp,
        lhs: NpType,
        rhs: NpType,
    },

    /// The unary operator is not defined for this input type.
    #[error("operator {op} is not supported for {input}")]
    UnsupportedUnary { op: UnaryOp, input: NpType },

    /// The requested output type differs from the table's result type.
    #[error("result type mismatch: expected {expected}, found {found}")]
    ResultTypeMismatch { expected: NpType, found: NpType },

    /// Output shapes must be row-major contiguous.
    #[error("output view must be contiguous")]
    NonContiguousOutput,

    /// Output dims differ from the (broadcast) input dims.
    #[error("output shape mismatch: expected {expected:?}, found {found:?}")]
    OutputShapeMismatch {
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    #[error(transparent)]
    View(#[from] ViewError),
}

/// Result type for kernel operations.
pub type Result<T> = std::result::Result<T, KernelError>;
