use approx::assert_relative_eq;
use numcore_traits::Value;
use numcore_view::{
    broadcast_dims, broadcast_pair, create_iterator, MemoryBlock, NdIter, Shape, StopPolicy,
};
use proptest::prelude::*;

fn small_dims() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(1usize..5, 1..4)
}

/// Element at row-major coordinate `k` of `shape`, computed directly.
fn direct<T: Copy>(data: &[T], shape: &Shape, mut k: usize) -> T {
    let mut coord = vec![0; shape.ndim()];
    for axis in (0..shape.ndim()).rev() {
        coord[axis] = k % shape.dims()[axis];
        k /= shape.dims()[axis];
    }
    data[shape.offset_of(&coord)]
}

#[test]
fn test_reversed_float_view() {
    let data = [0.5f32, 1.5, 2.5, 3.5, 4.5, 5.5];
    let shape = Shape::new(&[2, 3]).reversed_axis(1).unwrap();
    let got: Vec<f32> = NdIter::new(&data, &shape, false).unwrap().collect();
    let expected = [2.5f32, 1.5, 0.5, 5.5, 4.5, 3.5];
    for (g, e) in got.iter().zip(expected.iter()) {
        assert_relative_eq!(*g, *e);
    }
}

#[test]
fn test_dyn_iter_casts() {
    let data = vec![1.75f64, -2.25];
    let mut it = create_iterator(&MemoryBlock::from(&data), &Shape::vector(2), false).unwrap();
    assert_eq!(it.move_next_as::<i32>(), Some(1));
    assert_eq!(it.move_next(), Some(Value::Float64(-2.25)));
    assert_eq!(it.move_next(), None);
}

#[test]
fn test_broadcast_pair_policies() {
    let a: Vec<i32> = (0..6).collect();
    let b = [10, 20, 30];
    let suffix = broadcast_pair(&a, &Shape::new(&[2, 3]), &b, &Shape::vector(3)).unwrap();
    assert_eq!(suffix.policy(), StopPolicy::Lhs);

    let col = [1, 2];
    let both = broadcast_pair(&col, &Shape::new(&[2, 1]), &b, &Shape::new(&[1, 3])).unwrap();
    assert_eq!(both.policy(), StopPolicy::Both);
    let pairs: Vec<_> = both.collect();
    assert_eq!(
        pairs,
        vec![(1, 10), (1, 20), (1, 30), (2, 10), (2, 20), (2, 30)]
    );
}

proptest! {
    #[test]
    fn test_broadcast_dims_symmetric(a in small_dims(), b in small_dims()) {
        prop_assert_eq!(broadcast_dims(&a, &b).ok(), broadcast_dims(&b, &a).ok());
    }

    #[test]
    fn test_permuted_iteration_matches_coordinates(dims in small_dims(), rotate in 0usize..3) {
        let base = Shape::new(&dims);
        let mut perm: Vec<usize> = (0..dims.len()).collect();
        perm.rotate_left(rotate % dims.len());
        let view = base.permute(&perm).unwrap();
        let data: Vec<u32> = (0..base.size() as u32).collect();

        let walked: Vec<u32> = NdIter::new(&data, &view, false).unwrap().collect();
        prop_assert_eq!(walked.len(), view.size());
        for (k, &v) in walked.iter().enumerate() {
            prop_assert_eq!(v, direct(&data, &view, k));
        }
    }

    #[test]
    fn test_broadcast_pair_matches_coordinates(
        dims in small_dims(),
        mask in prop::collection::vec(any::<bool>(), 3),
    ) {
        // rhs keeps a trailing subset of axes, collapsing masked ones to 1
        let rhs_dims: Vec<usize> = dims
            .iter()
            .zip(&mask)
            .map(|(&d, &keep)| if keep { d } else { 1 })
            .collect();
        let (ls, rs) = (Shape::new(&dims), Shape::new(&rhs_dims));
        let lhs: Vec<i64> = (0..ls.size() as i64).collect();
        let rhs: Vec<i64> = (0..rs.size() as i64).map(|x| -x).collect();

        let pairs: Vec<_> = broadcast_pair(&lhs, &ls, &rhs, &rs).unwrap().collect();
        let rv = rs.broadcast_to(&dims).unwrap();
        prop_assert_eq!(pairs.len(), ls.size());
        for (k, &(l, r)) in pairs.iter().enumerate() {
            prop_assert_eq!(l, lhs[k]);
            prop_assert_eq!(r, direct(&rhs, &rv, k));
        }
    }
}
