//! Execution strategies for resolved operations.
//!
//! All validation (shapes against blocks, broadcast compatibility, output
//! dims and contiguity) happens before the first write, so a failed call
//! leaves the output untouched.

use numcore_traits::Element;
use numcore_view::{broadcast_dims, broadcast_pair, NdIter, OffsetIncrementor, Shape};

use crate::config::KernelConfig;
use crate::{KernelError, Result};

/// Loop chosen for one execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Operands and output are contiguous with equal dims.
    Contiguous,
    /// The lhs has one element; the rhs is contiguous with the output dims.
    ScalarLhs,
    /// The rhs has one element; the lhs is contiguous with the output dims.
    ScalarRhs,
    /// The innermost axis is unit-stride or broadcast on both sides: an
    /// offset walk over the outer axes runs a flat loop per output row.
    InnerBlock,
    /// Anything else: a sequential coordinate walk.
    Strided,
}

fn check_output(expected: &[usize], out_shape: &Shape, out_len: usize) -> Result<()> {
    if out_shape.dims() != expected {
        return Err(KernelError::OutputShapeMismatch {
            expected: expected.to_vec(),
            found: out_shape.dims().to_vec(),
        });
    }
    if !out_shape.is_contiguous() {
        return Err(KernelError::NonContiguousOutput);
    }
    out_shape.validate(out_len)?;
    Ok(())
}

pub(crate) fn select_binary(lhs: &Shape, rhs: &Shape, out_dims: &[usize]) -> Strategy {
    if lhs.is_contiguous() && rhs.is_contiguous() && lhs.dims() == rhs.dims() {
        Strategy::Contiguous
    } else if lhs.size() == 1 && rhs.is_contiguous() && rhs.dims() == out_dims {
        Strategy::ScalarLhs
    } else if rhs.size() == 1 && lhs.is_contiguous() && lhs.dims() == out_dims {
        Strategy::ScalarRhs
    } else if out_dims.len() >= 2
        && out_dims.last().is_some_and(|&n| n > 1)
        && inner_is_flat(lhs)
        && inner_is_flat(rhs)
    {
        Strategy::InnerBlock
    } else {
        Strategy::Strided
    }
}

/// Innermost axis is unit-stride, or absent or of extent 1 and so broadcast.
fn inner_is_flat(shape: &Shape) -> bool {
    match shape.dims().last() {
        None | Some(1) => true,
        Some(_) => shape.strides().last() == Some(&1),
    }
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn binary<L: Element, R: Element, O: Element>(
    f: fn(L, R) -> O,
    lhs: &[L],
    lhs_shape: &Shape,
    rhs: &[R],
    rhs_shape: &Shape,
    out: &mut [O],
    out_shape: &Shape,
    config: &KernelConfig,
) -> Result<Strategy> {
    lhs_shape.validate(lhs.len())?;
    rhs_shape.validate(rhs.len())?;
    let dims = broadcast_dims(lhs_shape.dims(), rhs_shape.dims())?;
    check_output(&dims, out_shape, out.len())?;

    let size = out_shape.size();
    let strategy = select_binary(lhs_shape, rhs_shape, &dims);
    tracing::trace!(?strategy, size, "binary kernel");
    if size == 0 {
        return Ok(strategy);
    }
    let dst = &mut out[out_shape.offset()..out_shape.offset() + size];

    match strategy {
        Strategy::Contiguous => {
            let a = &lhs[lhs_shape.offset()..lhs_shape.offset() + size];
            let b = &rhs[rhs_shape.offset()..rhs_shape.offset() + size];
            zip_map2(dst, a, b, f, config);
        }
        Strategy::ScalarLhs => {
            let x = lhs[lhs_shape.offset()];
            let b = &rhs[rhs_shape.offset()..rhs_shape.offset() + size];
            map_scalar_lhs(dst, x, b, f, config);
        }
        Strategy::ScalarRhs => {
            let a = &lhs[lhs_shape.offset()..lhs_shape.offset() + size];
            let y = rhs[rhs_shape.offset()];
            map_scalar_rhs(dst, a, y, f, config);
        }
        Strategy::InnerBlock => {
            inner_blocks(f, lhs, lhs_shape, rhs, rhs_shape, dst, &dims, config)?;
        }
        Strategy::Strided => {
            let pairs = broadcast_pair(lhs, lhs_shape, rhs, rhs_shape)?;
            for (d, (x, y)) in dst.iter_mut().zip(pairs) {
                *d = f(x, y);
            }
        }
    }
    Ok(strategy)
}

/// Row loop of [`Strategy::InnerBlock`] over the contiguous `dst`.
#[allow(clippy::too_many_arguments)]
fn inner_blocks<L: Element, R: Element, O: Element>(
    f: fn(L, R) -> O,
    lhs: &[L],
    lhs_shape: &Shape,
    rhs: &[R],
    rhs_shape: &Shape,
    dst: &mut [O],
    dims: &[usize],
    config: &KernelConfig,
) -> Result<()> {
    let (outer, n) = dims.split_at(dims.len() - 1);
    let n = n[0];
    let (mut lhs_rows, lhs_step) = row_walk(lhs_shape, dims, outer)?;
    let (mut rhs_rows, rhs_step) = row_walk(rhs_shape, dims, outer)?;

    for row in dst.chunks_exact_mut(n) {
        let (Some(a), Some(b)) = (lhs_rows.next(), rhs_rows.next()) else {
            break;
        };
        match (lhs_step, rhs_step) {
            (0, 0) => row.fill(f(lhs[a], rhs[b])),
            (0, _) => map_scalar_lhs(row, lhs[a], &rhs[b..b + n], f, config),
            (_, 0) => map_scalar_rhs(row, &lhs[a..a + n], rhs[b], f, config),
            _ => zip_map2(row, &lhs[a..a + n], &rhs[b..b + n], f, config),
        }
    }
    Ok(())
}

/// Offsets of the rows of `shape` broadcast to `dims`, and the inner stride.
fn row_walk(
    shape: &Shape,
    dims: &[usize],
    outer: &[usize],
) -> Result<(OffsetIncrementor, isize)> {
    let view = shape.broadcast_to(dims)?;
    let (outer_strides, inner) = view.strides().split_at(outer.len());
    let rows = Shape::with_strides(outer, outer_strides, view.offset())?;
    Ok((OffsetIncrementor::new(&rows)?, inner[0]))
}

pub(crate) fn unary<I: Element, O: Element>(
    f: fn(I) -> O,
    input: &[I],
    in_shape: &Shape,
    out: &mut [O],
    out_shape: &Shape,
    config: &KernelConfig,
) -> Result<Strategy> {
    in_shape.validate(input.len())?;
    check_output(in_shape.dims(), out_shape, out.len())?;

    let size = out_shape.size();
    let strategy = if in_shape.is_contiguous() {
        Strategy::Contiguous
    } else {
        Strategy::Strided
    };
    tracing::trace!(?strategy, size, "unary kernel");
    if size == 0 {
        return Ok(strategy);
    }
    let dst = &mut out[out_shape.offset()..out_shape.offset() + size];

    match strategy {
        Strategy::Contiguous => {
            let src = &input[in_shape.offset()..in_shape.offset() + size];
            map1(dst, src, f, config);
        }
        _ => {
            let src = NdIter::new(input, in_shape, false)?;
            for (d, x) in dst.iter_mut().zip(src) {
                *d = f(x);
            }
        }
    }
    Ok(strategy)
}

// ============================================================================
// Flat loops
// ============================================================================

fn zip_map2<L: Element, R: Element, O: Element>(
    dst: &mut [O],
    a: &[L],
    b: &[R],
    f: fn(L, R) -> O,
    config: &KernelConfig,
) {
    #[cfg(feature = "parallel")]
    if config.should_parallelize(dst.len()) {
        crate::threading::par_zip_map2(dst, a, b, f);
        return;
    }
    let _ = config;
    for ((d, &x), &y) in dst.iter_mut().zip(a).zip(b) {
        *d = f(x, y);
    }
}

fn map_scalar_lhs<L: Element, R: Element, O: Element>(
    dst: &mut [O],
    x: L,
    b: &[R],
    f: fn(L, R) -> O,
    config: &KernelConfig,
) {
    #[cfg(feature = "parallel")]
    if config.should_parallelize(dst.len()) {
        crate::threading::par_map1(dst, b, move |y| f(x, y));
        return;
    }
    let _ = config;
    for (d, &y) in dst.iter_mut().zip(b) {
        *d = f(x, y);
    }
}

fn map_scalar_rhs<L: Element, R: Element, O: Element>(
    dst: &mut [O],
    a: &[L],
    y: R,
    f: fn(L, R) -> O,
    config: &KernelConfig,
) {
    #[cfg(feature = "parallel")]
    if config.should_parallelize(dst.len()) {
        crate::threading::par_map1(dst, a, move |x| f(x, y));
        return;
    }
    let _ = config;
    for (d, &x) in dst.iter_mut().zip(a) {
        *d = f(x, y);
    }
}

fn map1<I: Element, O: Element>(dst: &mut [O], src: &[I], f: fn(I) -> O, config: &KernelConfig) {
    #[cfg(feature = "parallel")]
    if config.should_parallelize(dst.len()) {
        crate::threading::par_map1(dst, src, f);
        return;
    }
    let _ = config;
    for (d, &x) in dst.iter_mut().zip(src) {
        *d = f(x);
    }
}
