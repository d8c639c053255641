//! Allocating entry points over the kernel dispatcher.

use numcore_kernel::{default_dispatcher, result_type, BinaryOp, Dispatcher, KernelError, UnaryOp};
use numcore_traits::{promote_with_scalar, NpType};
use numcore_view::{broadcast_dims, MemoryBlock, OwnedBlock, Shape};

use crate::Result;

/// Evaluate `op(lhs, rhs)` into a freshly allocated contiguous block.
///
/// The result type comes from the operator table and the result shape is the
/// broadcast of the two input shapes. A rank-0 operand paired with an array
/// is weakly typed: it is first cast to
/// [`promote_with_scalar`](numcore_traits::promote_with_scalar) of the pair,
/// so `uint8[] + int32` yields `uint8`. Uses the process-wide dispatcher.
pub fn binary(
    op: BinaryOp,
    lhs: &MemoryBlock<'_>,
    lhs_shape: &Shape,
    rhs: &MemoryBlock<'_>,
    rhs_shape: &Shape,
) -> Result<(OwnedBlock, Shape)> {
    binary_with(default_dispatcher(), op, lhs, lhs_shape, rhs, rhs_shape)
}

/// [`binary`] on a caller-provided dispatcher.
pub fn binary_with(
    dispatcher: &Dispatcher,
    op: BinaryOp,
    lhs: &MemoryBlock<'_>,
    lhs_shape: &Shape,
    rhs: &MemoryBlock<'_>,
    rhs_shape: &Shape,
) -> Result<(OwnedBlock, Shape)> {
    let (lhs_cast, rhs_cast) = match (lhs_shape.is_scalar(), rhs_shape.is_scalar()) {
        (true, false) => {
            let to = promote_with_scalar(rhs.np_type(), lhs.np_type());
            (weak_scalar(dispatcher, lhs, lhs_shape, to)?, None)
        }
        (false, true) => {
            let to = promote_with_scalar(lhs.np_type(), rhs.np_type());
            (None, weak_scalar(dispatcher, rhs, rhs_shape, to)?)
        }
        _ => (None, None),
    };
    let lhs_view = lhs_cast.as_ref().map(|(block, shape)| (block.as_block(), shape));
    let rhs_view = rhs_cast.as_ref().map(|(block, shape)| (block.as_block(), shape));
    let (lhs, lhs_shape) = lhs_view.as_ref().map_or((lhs, lhs_shape), |(b, s)| (b, *s));
    let (rhs, rhs_shape) = rhs_view.as_ref().map_or((rhs, rhs_shape), |(b, s)| (b, *s));

    let (l, r) = (lhs.np_type(), rhs.np_type());
    let out_type = result_type(op, l, r).ok_or(KernelError::UnsupportedOperator {
        op,
        lhs: l,
        rhs: r,
    })?;
    let dims = broadcast_dims(lhs_shape.dims(), rhs_shape.dims())?;
    let out_shape = Shape::new(&dims);
    let mut out = OwnedBlock::zeros(out_type, out_shape.size());

    let operation = dispatcher.resolve_binary(op, l, r, out_type)?;
    let strategy = operation.execute(
        lhs,
        lhs_shape,
        rhs,
        rhs_shape,
        &mut out.as_block_mut(),
        &out_shape,
    )?;
    tracing::debug!(signature = %operation.signature(), ?strategy, size = out_shape.size(), "binary");
    Ok((out, out_shape))
}

/// Cast a rank-0 operand to `to`, or `None` when it already has that type.
fn weak_scalar(
    dispatcher: &Dispatcher,
    scalar: &MemoryBlock<'_>,
    shape: &Shape,
    to: NpType,
) -> Result<Option<(OwnedBlock, Shape)>> {
    if scalar.np_type() == to {
        return Ok(None);
    }
    tracing::trace!(from = %scalar.np_type(), %to, "casting weak scalar");
    unary_with(dispatcher, UnaryOp::Cast, scalar, shape, to).map(Some)
}

/// Evaluate `op(input)` into a freshly allocated contiguous block of
/// `out_type`, with the dims of `shape`.
pub fn unary(
    op: UnaryOp,
    input: &MemoryBlock<'_>,
    shape: &Shape,
    out_type: NpType,
) -> Result<(OwnedBlock, Shape)> {
    unary_with(default_dispatcher(), op, input, shape, out_type)
}

/// [`unary`] on a caller-provided dispatcher.
pub fn unary_with(
    dispatcher: &Dispatcher,
    op: UnaryOp,
    input: &MemoryBlock<'_>,
    shape: &Shape,
    out_type: NpType,
) -> Result<(OwnedBlock, Shape)> {
    let operation = dispatcher.resolve_unary(op, input.np_type(), out_type)?;
    let out_shape = Shape::new(shape.dims());
    let mut out = OwnedBlock::zeros(out_type, out_shape.size());
    let strategy = operation.execute(input, shape, &mut out.as_block_mut(), &out_shape)?;
    tracing::debug!(signature = %operation.signature(), ?strategy, size = out_shape.size(), "unary");
    Ok((out, out_shape))
}

macro_rules! binary_shorthand {
    ($($(#[$doc:meta])* $name:ident => $op:ident),* $(,)?) => {
        $(
            $(#[$doc])*
            pub fn $name(
                lhs: &MemoryBlock<'_>,
                lhs_shape: &Shape,
                rhs: &MemoryBlock<'_>,
                rhs_shape: &Shape,
            ) -> Result<(OwnedBlock, Shape)> {
                binary(BinaryOp::$op, lhs, lhs_shape, rhs, rhs_shape)
            }
        )*
    };
}

binary_shorthand!(
    /// Elementwise `lhs + rhs`.
    add => Add,
    /// Elementwise `lhs - rhs`.
    subtract => Subtract,
    /// Elementwise `lhs * rhs`.
    multiply => Multiply,
    /// Elementwise true division; integral inputs produce `float64`.
    divide => Divide,
    /// Elementwise remainder with the sign of the divisor.
    modulo => Mod,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use numcore_view::ViewError;

    #[test]
    fn test_scalar_broadcast() {
        let a = vec![1u8, 2, 3];
        let b = vec![-1i8];
        let (out, shape) = subtract(
            &MemoryBlock::from(&a),
            &Shape::vector(3),
            &MemoryBlock::from(&b),
            &Shape::scalar(),
        )
        .unwrap();
        assert_eq!(shape.dims(), &[3]);
        assert_eq!(out.np_type(), NpType::UInt8);
        assert_eq!(out.typed::<u8>().unwrap(), &[2, 3, 4]);
    }

    #[test]
    fn test_scalar_keeps_array_type() {
        let a = vec![250u8, 1, 2];
        let b = vec![10i32];
        let (out, _) = add(
            &MemoryBlock::from(&a),
            &Shape::vector(3),
            &MemoryBlock::from(&b),
            &Shape::scalar(),
        )
        .unwrap();
        assert_eq!(out.np_type(), NpType::UInt8);
        assert_eq!(out.typed::<u8>().unwrap(), &[4, 11, 12]);

        // the same operand as a one-element array promotes as arrays do
        let (out, _) = add(
            &MemoryBlock::from(&a),
            &Shape::vector(3),
            &MemoryBlock::from(&b),
            &Shape::vector(1),
        )
        .unwrap();
        assert_eq!(out.typed::<i32>().unwrap(), &[260, 11, 12]);
    }

    #[test]
    fn test_scalar_lhs_and_cross_kind() {
        let a = vec![1.5f32, -2.0];
        let b = vec![2.0f64];
        let (out, _) = multiply(
            &MemoryBlock::from(&b),
            &Shape::scalar(),
            &MemoryBlock::from(&a),
            &Shape::vector(2),
        )
        .unwrap();
        assert_eq!(out.np_type(), NpType::Float32);
        assert_eq!(out.typed::<f32>().unwrap(), &[3.0, -4.0]);

        let c = vec![3i32, 4];
        let half = vec![0.5f32];
        let (out, _) = multiply(
            &MemoryBlock::from(&c),
            &Shape::vector(2),
            &MemoryBlock::from(&half),
            &Shape::scalar(),
        )
        .unwrap();
        assert_eq!(out.np_type(), NpType::Float64);
        assert_eq!(out.typed::<f64>().unwrap(), &[1.5, 2.0]);
    }

    #[test]
    fn test_incompatible_shapes() {
        let a = vec![1i32; 3];
        let b = vec![1i32; 2];
        let err = add(
            &MemoryBlock::from(&a),
            &Shape::vector(3),
            &MemoryBlock::from(&b),
            &Shape::vector(2),
        )
        .unwrap_err();
        assert!(matches!(err, Error::View(ViewError::ShapeMismatch(_, _))));
    }

    #[test]
    fn test_unsupported_pair() {
        let a = vec![1.0f64];
        let b = vec![1i32];
        let err = binary(
            BinaryOp::BitwiseOr,
            &MemoryBlock::from(&a),
            &Shape::scalar(),
            &MemoryBlock::from(&b),
            &Shape::scalar(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::Kernel(KernelError::UnsupportedOperator { .. })
        ));
    }

    #[test]
    fn test_unary_transposed_input() {
        let a: Vec<i16> = (0..6).collect();
        let shape = Shape::new(&[2, 3]).transposed();
        let (out, out_shape) = unary(UnaryOp::Negate, &MemoryBlock::from(&a), &shape, NpType::Int16)
            .unwrap();
        assert_eq!(out_shape.dims(), &[3, 2]);
        assert_eq!(out.typed::<i16>().unwrap(), &[0, -3, -1, -4, -2, -5]);
    }
}
