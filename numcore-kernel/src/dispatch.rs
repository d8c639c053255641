//! Operation resolution and the per-signature cache.
//!
//! Resolving a `(op, lhs, rhs, out)` key checks it against the operator
//! table, monomorphizes the scalar function for the concrete element types
//! and caches the result. Later lookups for the same key return the same
//! [`Arc`].

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;

use numcore_traits::{with_np_type, NpType, Value};
use numcore_view::{MemoryBlock, MemoryBlockMut, Shape};

use crate::config::KernelConfig;
use crate::exec::Strategy;
use crate::op::{result_type, unary_result_type, BinaryOp, UnaryOp};
use crate::operator::{
    build_binary, build_unary, BinaryKernel, Signature, UnaryKernel, UnarySignature,
};
use crate::{KernelError, Result};

/// A resolved binary operation, ready to run over memory blocks.
pub struct BinaryOperation {
    signature: Signature,
    config: KernelConfig,
    kernel: Box<dyn BinaryKernel>,
}

impl fmt::Debug for BinaryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinaryOperation")
            .field("signature", &self.signature)
            .field("config", &self.config)
            .finish()
    }
}

impl BinaryOperation {
    #[inline]
    pub fn signature(&self) -> Signature {
        self.signature
    }

    /// Compute `out = op(lhs, rhs)` elementwise with broadcasting.
    ///
    /// `lhs` and `rhs` may be arbitrary strided views; `out_shape` must be
    /// row-major contiguous with the broadcast dims of the two inputs. The
    /// blocks must hold exactly the element types of [`signature`].
    /// Nothing is written when an error is returned.
    ///
    /// [`signature`]: Self::signature
    pub fn execute(
        &self,
        lhs: &MemoryBlock<'_>,
        lhs_shape: &Shape,
        rhs: &MemoryBlock<'_>,
        rhs_shape: &Shape,
        out: &mut MemoryBlockMut<'_>,
        out_shape: &Shape,
    ) -> Result<Strategy> {
        self.kernel.execute(
            lhs,
            lhs_shape,
            rhs,
            rhs_shape,
            out,
            out_shape,
            &self.config,
        )
    }

    /// Apply the scalar function to two values, casting them to the
    /// signature's operand types first.
    pub fn apply(&self, lhs: Value, rhs: Value) -> Value {
        self.kernel.apply_value(lhs, rhs)
    }
}

/// A resolved unary operation.
pub struct UnaryOperation {
    signature: UnarySignature,
    config: KernelConfig,
    kernel: Box<dyn UnaryKernel>,
}

impl fmt::Debug for UnaryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnaryOperation")
            .field("signature", &self.signature)
            .field("config", &self.config)
            .finish()
    }
}

impl UnaryOperation {
    #[inline]
    pub fn signature(&self) -> UnarySignature {
        self.signature
    }

    /// Compute `out = op(input)` elementwise. `out_shape` must be contiguous
    /// with the dims of `in_shape`.
    pub fn execute(
        &self,
        input: &MemoryBlock<'_>,
        in_shape: &Shape,
        out: &mut MemoryBlockMut<'_>,
        out_shape: &Shape,
    ) -> Result<Strategy> {
        self.kernel
            .execute(input, in_shape, out, out_shape, &self.config)
    }

    pub fn apply(&self, input: Value) -> Value {
        self.kernel.apply_value(input)
    }
}

/// Resolves and caches operations.
///
/// Safe to share between threads; concurrent resolution of the same key
/// builds the operation once.
#[derive(Debug)]
pub struct Dispatcher {
    config: KernelConfig,
    binary: DashMap<Signature, Arc<BinaryOperation>>,
    unary: DashMap<UnarySignature, Arc<UnaryOperation>>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(KernelConfig::default())
    }
}

impl Dispatcher {
    pub fn new(config: KernelConfig) -> Self {
        Self {
            config,
            binary: DashMap::new(),
            unary: DashMap::new(),
        }
    }

    #[inline]
    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    /// Look up the operation for `op` on `lhs` and `rhs` producing `out`.
    ///
    /// Fails with [`KernelError::UnsupportedOperator`] when the table has no
    /// entry for the pair and with [`KernelError::ResultTypeMismatch`] when
    /// `out` is not the table's result type.
    pub fn resolve_binary(
        &self,
        op: BinaryOp,
        lhs: NpType,
        rhs: NpType,
        out: NpType,
    ) -> Result<Arc<BinaryOperation>> {
        let expected =
            result_type(op, lhs, rhs).ok_or(KernelError::UnsupportedOperator { op, lhs, rhs })?;
        if expected != out {
            return Err(KernelError::ResultTypeMismatch {
                expected,
                found: out,
            });
        }
        let signature = Signature { op, lhs, rhs, out };
        if let Some(found) = self.binary.get(&signature) {
            tracing::trace!(%signature, "binary cache hit");
            return Ok(Arc::clone(found.value()));
        }

        let entry = self.binary.entry(signature).or_insert_with(|| {
            tracing::debug!(%signature, "building binary operation");
            let kernel = with_np_type!(lhs, L => with_np_type!(rhs, R => build_binary::<L, R>(signature)));
            Arc::new(BinaryOperation {
                signature,
                config: self.config,
                kernel,
            })
        });
        Ok(Arc::clone(entry.value()))
    }

    /// Look up the operation for `op` on `input` producing `out`.
    ///
    /// [`UnaryOp::Cast`] accepts any `(input, out)` pair. The other
    /// operators require `out` to match [`unary_result_type`].
    pub fn resolve_unary(
        &self,
        op: UnaryOp,
        input: NpType,
        out: NpType,
    ) -> Result<Arc<UnaryOperation>> {
        if op != UnaryOp::Cast {
            let expected =
                unary_result_type(op, input).ok_or(KernelError::UnsupportedUnary { op, input })?;
            if expected != out {
                return Err(KernelError::ResultTypeMismatch {
                    expected,
                    found: out,
                });
            }
        }
        let signature = UnarySignature { op, input, out };
        if let Some(found) = self.unary.get(&signature) {
            tracing::trace!(%signature, "unary cache hit");
            return Ok(Arc::clone(found.value()));
        }

        let entry = self.unary.entry(signature).or_insert_with(|| {
            tracing::debug!(%signature, "building unary operation");
            let kernel = with_np_type!(input, I => build_unary::<I>(signature));
            Arc::new(UnaryOperation {
                signature,
                config: self.config,
                kernel,
            })
        });
        Ok(Arc::clone(entry.value()))
    }

    /// Number of cached operations, binary and unary together.
    pub fn cached_len(&self) -> usize {
        self.binary.len() + self.unary.len()
    }

    pub fn clear_cache(&self) {
        self.binary.clear();
        self.unary.clear();
    }
}

static DEFAULT: Lazy<Dispatcher> = Lazy::new(|| {
    let config = KernelConfig::from_env();
    tracing::debug!(?config, "initializing default dispatcher");
    Dispatcher::new(config)
});

/// The process-wide dispatcher used by [`resolve_binary`] and
/// [`resolve_unary`], configured from the environment on first use.
pub fn default_dispatcher() -> &'static Dispatcher {
    &DEFAULT
}

/// [`Dispatcher::resolve_binary`] on the default dispatcher.
pub fn resolve_binary(
    op: BinaryOp,
    lhs: NpType,
    rhs: NpType,
    out: NpType,
) -> Result<Arc<BinaryOperation>> {
    DEFAULT.resolve_binary(op, lhs, rhs, out)
}

/// [`Dispatcher::resolve_unary`] on the default dispatcher.
pub fn resolve_unary(op: UnaryOp, input: NpType, out: NpType) -> Result<Arc<UnaryOperation>> {
    DEFAULT.resolve_unary(op, input, out)
}
