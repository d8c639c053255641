//! Property-based tests for promotion, traversal and strided execution.

use numcore::{
    binary, promote, unary, BinaryOp, MemoryBlock, NdIter, NpType, Shape, UnaryOp,
};
use numcore_view::{CoordinateIncrementor, OffsetIncrementor};
use proptest::prelude::*;

fn np_type() -> impl Strategy<Value = NpType> {
    prop::sample::select(NpType::ALL.to_vec())
}

fn small_dims() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(1usize..5, 1..4)
}

proptest! {
    #[test]
    fn test_promote_symmetric(a in np_type(), b in np_type()) {
        prop_assert_eq!(promote(a, b), promote(b, a));
        prop_assert_eq!(promote(a, a), a);
    }

    #[test]
    fn test_int32_add_wraps(a in any::<i32>(), b in any::<i32>()) {
        let (x, y) = (vec![a], vec![b]);
        let (out, _) = binary(
            BinaryOp::Add,
            &MemoryBlock::from(&x),
            &Shape::scalar(),
            &MemoryBlock::from(&y),
            &Shape::scalar(),
        )
        .unwrap();
        prop_assert_eq!(out.typed::<i32>().unwrap(), &[a.wrapping_add(b)]);
    }

    #[test]
    fn test_modulo_sign_follows_divisor(a in any::<i64>(), b in any::<i64>()) {
        prop_assume!(b != 0);
        let (x, y) = (vec![a], vec![b]);
        let (out, _) = binary(
            BinaryOp::Mod,
            &MemoryBlock::from(&x),
            &Shape::scalar(),
            &MemoryBlock::from(&y),
            &Shape::scalar(),
        )
        .unwrap();
        let r = out.typed::<i64>().unwrap()[0];
        prop_assert!(r == 0 || (r < 0) == (b < 0));
        prop_assert!(r.unsigned_abs() < b.unsigned_abs());
    }

    #[test]
    fn test_coordinates_are_row_major(dims in small_dims()) {
        let mut inc = CoordinateIncrementor::new(&dims).unwrap();
        let mut seen = vec![inc.index().to_vec()];
        while let Some(c) = inc.next() {
            seen.push(c.to_vec());
        }
        prop_assert_eq!(seen.len(), dims.iter().product::<usize>());
        for pair in seen.windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }
        for (axis, &d) in dims.iter().enumerate() {
            if d == 1 {
                prop_assert!(seen.iter().all(|c| c[axis] == 0));
            }
        }
    }

    #[test]
    fn test_auto_reset_repeats(dims in small_dims(), extra in 0usize..20) {
        let shape = Shape::new(&dims);
        let data: Vec<u32> = (0..shape.size() as u32).collect();
        let mut it = NdIter::new(&data, &shape, true).unwrap();
        let total = 2 * shape.size() + extra;
        let mut seen = Vec::with_capacity(total);
        for _ in 0..total {
            prop_assert!(it.has_next());
            seen.push(it.move_next().unwrap());
        }
        for (k, &v) in seen.iter().enumerate() {
            prop_assert_eq!(v, data[k % data.len()]);
        }
    }

    #[test]
    fn test_reset_replays_sequence(dims in small_dims(), perm_seed in any::<u64>()) {
        let base = Shape::new(&dims);
        let mut perm: Vec<usize> = (0..dims.len()).collect();
        perm.rotate_left((perm_seed as usize) % dims.len());
        let shape = base.permute(&perm).unwrap();

        let mut inc = OffsetIncrementor::new(&shape).unwrap();
        let first: Vec<usize> = std::iter::from_fn(|| inc.next()).collect();
        inc.reset();
        let second: Vec<usize> = std::iter::from_fn(|| inc.next()).collect();
        prop_assert_eq!(first.len(), shape.size());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_permuted_matches_materialized(dims in small_dims(), rotate in 0usize..3) {
        let base = Shape::new(&dims);
        let mut perm: Vec<usize> = (0..dims.len()).collect();
        perm.rotate_left(rotate % dims.len());
        let view = base.permute(&perm).unwrap();

        let data: Vec<i16> = (0..base.size() as i16).map(|x| x * 3 - 7).collect();
        let other: Vec<f32> = (0..base.size()).map(|x| x as f32 * 0.5).collect();
        let (a, b) = (MemoryBlock::from(&data), MemoryBlock::from(&other));
        let contiguous = Shape::new(view.dims());

        let (strided, _) = binary(BinaryOp::Multiply, &a, &view, &b, &contiguous).unwrap();
        let (copy, copy_shape) = unary(UnaryOp::Cast, &a, &view, NpType::Int16).unwrap();
        let (flat, _) =
            binary(BinaryOp::Multiply, &copy.as_block(), &copy_shape, &b, &contiguous).unwrap();
        prop_assert_eq!(strided, flat);
    }
}
