use approx::assert_relative_eq;
use numcore::{
    add, assign_block, binary, binary_with, divide, modulo, multiply, resolve_binary, unary,
    BinaryOp, Decimal, Dispatcher, Error, KernelConfig, KernelError, MemoryBlock, MemoryBlockMut,
    NpChar, NpType, OwnedBlock, Shape, Strategy, UnaryOp,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn iota_i32(n: usize) -> Vec<i32> {
    (0..n as i32).collect()
}

/// Copy a strided view into a contiguous block of the same type.
fn materialize(block: &MemoryBlock<'_>, shape: &Shape) -> (OwnedBlock, Shape) {
    unary(UnaryOp::Cast, block, shape, block.np_type()).unwrap()
}

#[test]
fn test_broadcast_column_plus_row() {
    let a = vec![1.0f64, 2.0, 3.0];
    let b = vec![10.0f64, 20.0, 30.0, 40.0];
    let (out, shape) = add(
        &MemoryBlock::from(&a),
        &Shape::new(&[3, 1]),
        &MemoryBlock::from(&b),
        &Shape::new(&[1, 4]),
    )
    .unwrap();
    assert_eq!(shape.dims(), &[3, 4]);
    let got = out.typed::<f64>().unwrap();
    for i in 0..3 {
        for j in 0..4 {
            assert_relative_eq!(got[i * 4 + j], a[i] + b[j]);
        }
    }
}

#[test]
fn test_suffix_broadcast_matrix_plus_row() {
    let a = iota_i32(12);
    let b = vec![100i32, 200, 300, 400];
    let (out, shape) = add(
        &MemoryBlock::from(&a),
        &Shape::new(&[3, 4]),
        &MemoryBlock::from(&b),
        &Shape::vector(4),
    )
    .unwrap();
    assert_eq!(shape.dims(), &[3, 4]);
    let got = out.typed::<i32>().unwrap();
    for (k, &v) in got.iter().enumerate() {
        assert_eq!(v, a[k] + b[k % 4]);
    }
}

#[test]
fn test_integer_wraparound() {
    let a = vec![i32::MAX];
    let b = vec![1i32];
    let (out, _) = add(
        &MemoryBlock::from(&a),
        &Shape::scalar(),
        &MemoryBlock::from(&b),
        &Shape::scalar(),
    )
    .unwrap();
    assert_eq!(out.typed::<i32>().unwrap(), &[i32::MIN]);

    let a = vec![255u8, 128];
    let b = vec![1u8, 2];
    let (out, _) = add(
        &MemoryBlock::from(&a),
        &Shape::vector(2),
        &MemoryBlock::from(&b),
        &Shape::vector(2),
    )
    .unwrap();
    assert_eq!(out.np_type(), NpType::UInt8);
    assert_eq!(out.typed::<u8>().unwrap(), &[0, 130]);

    let (out, _) = multiply(
        &MemoryBlock::from(&a),
        &Shape::vector(2),
        &MemoryBlock::from(&b),
        &Shape::vector(2),
    )
    .unwrap();
    assert_eq!(out.typed::<u8>().unwrap(), &[255, 0]);
}

#[test]
fn test_mixed_int_float_promotes() {
    let a = vec![1i32, 2];
    let b = vec![0.5f64];
    let (out, _) = add(
        &MemoryBlock::from(&a),
        &Shape::vector(2),
        &MemoryBlock::from(&b),
        &Shape::scalar(),
    )
    .unwrap();
    assert_eq!(out.np_type(), NpType::Float64);
    assert_eq!(out.typed::<f64>().unwrap(), &[1.5, 2.5]);
}

#[test]
fn test_bool_logic() {
    let a = vec![true, true, false, false];
    let b = vec![true, false, true, false];
    let blocks = (MemoryBlock::from(&a), MemoryBlock::from(&b));
    let v = Shape::vector(4);

    let (sum, _) = add(&blocks.0, &v, &blocks.1, &v).unwrap();
    assert_eq!(sum.np_type(), NpType::Bool);
    assert_eq!(sum.typed::<bool>().unwrap(), &[true, true, true, false]);

    let (product, _) = multiply(&blocks.0, &v, &blocks.1, &v).unwrap();
    assert_eq!(product.typed::<bool>().unwrap(), &[true, false, false, false]);
}

#[test]
fn test_modulo_takes_divisor_sign() {
    let a = vec![-7i32, 7, -7, 7];
    let b = vec![3i32, -3, -3, 3];
    let v = Shape::vector(4);
    let (out, _) = modulo(&MemoryBlock::from(&a), &v, &MemoryBlock::from(&b), &v).unwrap();
    assert_eq!(out.typed::<i32>().unwrap(), &[2, -2, -1, 1]);
}

#[test]
fn test_true_division() {
    let a = vec![7i64, -1, 1];
    let b = vec![2i64, 0, 0];
    let v = Shape::vector(3);
    let (out, _) = divide(&MemoryBlock::from(&a), &v, &MemoryBlock::from(&b), &v).unwrap();
    assert_eq!(out.np_type(), NpType::Float64);
    let got = out.typed::<f64>().unwrap();
    assert_relative_eq!(got[0], 3.5);
    assert_eq!(got[1], f64::NEG_INFINITY);
    assert_eq!(got[2], f64::INFINITY);
}

#[test]
fn test_comparisons() {
    let a = vec![1i8, -1, 5];
    let b = vec![1u8, 255, 4];
    let v = Shape::vector(3);
    let (out, _) = binary(
        BinaryOp::Less,
        &MemoryBlock::from(&a),
        &v,
        &MemoryBlock::from(&b),
        &v,
    )
    .unwrap();
    assert_eq!(out.typed::<bool>().unwrap(), &[false, true, false]);
}

#[test]
fn test_decimal_and_char() {
    let a = vec![Decimal::new(125, 2), Decimal::new(-3, 0)];
    let b = vec![2i32];
    let (out, _) = multiply(
        &MemoryBlock::from(&a),
        &Shape::vector(2),
        &MemoryBlock::from(&b),
        &Shape::scalar(),
    )
    .unwrap();
    assert_eq!(out.np_type(), NpType::Decimal);
    assert_eq!(
        out.typed::<Decimal>().unwrap(),
        &[Decimal::new(250, 2), Decimal::new(-6, 0)]
    );

    let c = vec![NpChar(u16::MAX), NpChar('a' as u16)];
    let one = vec![NpChar(1)];
    let (out, _) = add(
        &MemoryBlock::from(&c),
        &Shape::vector(2),
        &MemoryBlock::from(&one),
        &Shape::scalar(),
    )
    .unwrap();
    assert_eq!(out.np_type(), NpType::Char);
    assert_eq!(out.typed::<NpChar>().unwrap(), &[NpChar(0), NpChar('b' as u16)]);
}

#[test]
fn test_strided_views_match_materialized() {
    let a = iota_i32(24);
    let b: Vec<i64> = (0..24).map(|x| x * 7 - 30).collect();
    let (ba, bb) = (MemoryBlock::from(&a), MemoryBlock::from(&b));

    let full = Shape::new(&[2, 3, 4]);
    let views = [
        (full.permute(&[2, 0, 1]).unwrap(), full.permute(&[2, 0, 1]).unwrap()),
        (
            full.permute(&[2, 0, 1]).unwrap(),
            Shape::new(&[4, 2, 3]),
        ),
        (
            full.reversed_axis(1).unwrap(),
            full.slice_axis(2, 0, 4, 1).unwrap(),
        ),
        (
            full.slice_axis(2, 1, 4, 2).unwrap(),
            full.slice_axis(2, 0, 3, 2).unwrap().reversed_axis(0).unwrap(),
        ),
    ];

    for (ls, rs) in &views {
        let (strided, strided_shape) = binary(BinaryOp::Subtract, &ba, ls, &bb, rs).unwrap();
        let (la, la_shape) = materialize(&ba, ls);
        let (rb, rb_shape) = materialize(&bb, rs);
        let (flat, flat_shape) = binary(
            BinaryOp::Subtract,
            &la.as_block(),
            &la_shape,
            &rb.as_block(),
            &rb_shape,
        )
        .unwrap();
        assert_eq!(strided_shape.dims(), flat_shape.dims());
        assert_eq!(strided, flat);
    }
}

#[test]
fn test_parallel_matches_sequential() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let n = 50_000;
    let a: Vec<f32> = (0..n).map(|_| rng.gen_range(-100.0..100.0)).collect();
    // nonzero so float remainders stay comparable
    let b: Vec<i16> = (0..n)
        .map(|_| match rng.gen::<i16>() {
            0 => 1,
            x => x,
        })
        .collect();
    let s = vec![3i16];

    let parallel = Dispatcher::new(KernelConfig::default().with_min_parallel_len(0));
    let sequential = Dispatcher::new(KernelConfig::sequential());
    let v = Shape::vector(n);

    for op in [BinaryOp::Add, BinaryOp::Multiply, BinaryOp::Divide, BinaryOp::Mod] {
        let (ba, bb, bs) = (
            MemoryBlock::from(&a),
            MemoryBlock::from(&b),
            MemoryBlock::from(&s),
        );
        let (p, _) = binary_with(&parallel, op, &ba, &v, &bb, &v).unwrap();
        let (q, _) = binary_with(&sequential, op, &ba, &v, &bb, &v).unwrap();
        assert_eq!(p, q, "{op} contiguous");

        let (p, _) = binary_with(&parallel, op, &bs, &Shape::scalar(), &bb, &v).unwrap();
        let (q, _) = binary_with(&sequential, op, &bs, &Shape::scalar(), &bb, &v).unwrap();
        assert_eq!(p, q, "{op} scalar lhs");
    }
}

#[test]
fn test_execute_reports_strategy() {
    let op = resolve_binary(BinaryOp::Add, NpType::Int32, NpType::Int32, NpType::Int32).unwrap();
    let a = iota_i32(6);
    let mut out = vec![0i32; 6];
    let shape = Shape::new(&[2, 3]);

    let strategy = op
        .execute(
            &MemoryBlock::from(&a),
            &shape,
            &MemoryBlock::from(&a),
            &shape,
            &mut MemoryBlockMut::from(&mut out[..]),
            &shape,
        )
        .unwrap();
    assert_eq!(strategy, Strategy::Contiguous);
    assert_eq!(out, vec![0, 2, 4, 6, 8, 10]);

    let strategy = op
        .execute(
            &MemoryBlock::from(&a),
            &shape.transposed(),
            &MemoryBlock::from(&a),
            &shape.transposed(),
            &mut MemoryBlockMut::from(&mut out[..]),
            &Shape::new(&[3, 2]),
        )
        .unwrap();
    assert_eq!(strategy, Strategy::Strided);
    assert_eq!(out, vec![0, 6, 2, 8, 4, 10]);
}

#[test]
fn test_failed_execute_leaves_output() {
    let op = resolve_binary(BinaryOp::Add, NpType::Int32, NpType::Int32, NpType::Int32).unwrap();
    let a = iota_i32(4);
    let mut out = vec![-1i32; 4];
    // shape claims more elements than the block holds
    let err = op
        .execute(
            &MemoryBlock::from(&a),
            &Shape::new(&[2, 3]),
            &MemoryBlock::from(&a),
            &Shape::vector(3),
            &mut MemoryBlockMut::from(&mut out[..]),
            &Shape::new(&[2, 3]),
        )
        .unwrap_err();
    assert!(matches!(err, KernelError::View(_)));
    assert_eq!(out, vec![-1; 4]);
}

#[test]
fn test_cast_saturates() {
    let a = vec![-1.5f64, 1e10, f64::NAN, 42.9];
    let (out, _) = unary(
        UnaryOp::Cast,
        &MemoryBlock::from(&a),
        &Shape::vector(4),
        NpType::Int32,
    )
    .unwrap();
    assert_eq!(out.typed::<i32>().unwrap(), &[-1, i32::MAX, 0, 42]);
}

#[test]
fn test_unary_type_mismatch() {
    let a = vec![1i32];
    let err = unary(
        UnaryOp::Absolute,
        &MemoryBlock::from(&a),
        &Shape::scalar(),
        NpType::Int64,
    )
    .unwrap_err();
    assert_eq!(
        err,
        Error::Kernel(KernelError::ResultTypeMismatch {
            expected: NpType::Int32,
            found: NpType::Int64,
        })
    );
}

#[test]
fn test_empty_operands() {
    let a: Vec<f64> = Vec::new();
    let b = vec![1.0f64];
    let (out, shape) = add(
        &MemoryBlock::from(&a),
        &Shape::new(&[0, 3]),
        &MemoryBlock::from(&b),
        &Shape::scalar(),
    )
    .unwrap();
    assert_eq!(shape.dims(), &[0, 3]);
    assert!(out.is_empty());
}

#[test]
fn test_result_assigned_into_sliced_view() {
    // even rows of a 4x3 target receive row + 100
    let mut target = vec![0i64; 12];
    let even_rows = Shape::new(&[4, 3]).slice_axis(0, 0, 4, 2).unwrap();
    let row = vec![1i64, 2, 3];
    let hundred = vec![100i64];
    let (sum, sum_shape) = add(
        &MemoryBlock::from(&row),
        &Shape::vector(3),
        &MemoryBlock::from(&hundred),
        &Shape::scalar(),
    )
    .unwrap();

    let mut block = MemoryBlockMut::from(&mut target[..]);
    assign_block(&mut block, &even_rows, &sum.as_block(), &sum_shape).unwrap();
    assert_eq!(target, vec![101, 102, 103, 0, 0, 0, 101, 102, 103, 0, 0, 0]);
}

#[test]
fn test_row_sliced_operand_matches_materialized() {
    let a: Vec<f32> = (0..48).map(|x| x as f32 * 0.25).collect();
    let b: Vec<i16> = (0..8).map(|x| x * 3 - 5).collect();
    let rows = Shape::new(&[6, 8]).slice_axis(0, 1, 6, 2).unwrap();
    let (ba, bb) = (MemoryBlock::from(&a), MemoryBlock::from(&b));

    let op = resolve_binary(BinaryOp::Multiply, NpType::Float32, NpType::Int16, NpType::Float32)
        .unwrap();
    let mut out = vec![0.0f32; 24];
    let strategy = op
        .execute(
            &ba,
            &rows,
            &bb,
            &Shape::vector(8),
            &mut MemoryBlockMut::from(&mut out[..]),
            &Shape::new(&[3, 8]),
        )
        .unwrap();
    assert_eq!(strategy, Strategy::InnerBlock);

    let (copy, copy_shape) = materialize(&ba, &rows);
    let (flat, _) = multiply(&copy.as_block(), &copy_shape, &bb, &Shape::vector(8)).unwrap();
    assert_eq!(flat.typed::<f32>().unwrap(), out.as_slice());
}
