//! Arithmetic type promotion.
//!
//! The runtime function [`promote`] and the type-level [`Promote`] table encode
//! the same rules:
//!
//! 1. equal types promote to themselves;
//! 2. `Bool` and `Char` yield to the other operand;
//! 3. `Decimal` absorbs everything;
//! 4. `Float64` absorbs every non-decimal type, `Float32` survives only against
//!    integers of at most 16 bits;
//! 5. integers of equal signedness promote to the wider one;
//! 6. signed `S` with unsigned `U`: `S` if `U` is narrower, `Float64` if `U` is
//!    64-bit, otherwise the signed type twice as wide as `U`.

use rust_decimal::Decimal;

use crate::dtype::NpType;
use crate::element::{Element, NpChar};

/// Computation type of a binary arithmetic operation on `lhs` and `rhs`.
pub fn promote(lhs: NpType, rhs: NpType) -> NpType {
    use NpType as T;

    if lhs == rhs {
        return lhs;
    }
    match (lhs, rhs) {
        (T::Bool, x) | (x, T::Bool) => x,
        (T::Char, x) | (x, T::Char) => x,
        (T::Decimal, _) | (_, T::Decimal) => T::Decimal,
        (T::Float64, _) | (_, T::Float64) => T::Float64,
        (T::Float32, x) | (x, T::Float32) => {
            if x.bits() <= 16 {
                T::Float32
            } else {
                T::Float64
            }
        }
        (a, b) => promote_integers(a, b),
    }
}

fn promote_integers(a: NpType, b: NpType) -> NpType {
    let (signed, unsigned) = match (a.is_signed_integer(), b.is_signed_integer()) {
        (true, false) => (a, b),
        (false, true) => (b, a),
        _ => return if a.bits() >= b.bits() { a } else { b },
    };
    if unsigned.bits() < signed.bits() {
        signed
    } else if unsigned.bits() == 64 {
        NpType::Float64
    } else {
        NpType::signed_with_bits(unsigned.bits() * 2)
    }
}

/// Computation type of an array of type `array` combined with a rank-0
/// operand of type `scalar`.
///
/// The scalar is weakly typed: a scalar of the same or a lower kind
/// (bool < integer < float) never widens the array type, so
/// `uint8[] + int32` stays `uint8` and `float32[] + float64` stays `float32`.
/// `Bool` arrays take the scalar's type; `Char` arrays keep `Char` against
/// 8-bit and bool scalars and take the wider integer type otherwise. A float
/// scalar on an integral array promotes as [`promote`] does, and a `Decimal`
/// scalar never changes the array type.
pub fn promote_with_scalar(array: NpType, scalar: NpType) -> NpType {
    use NpType as T;

    match (array, scalar) {
        (a, T::Decimal) => a,
        (T::Decimal, _) => T::Decimal,
        (a, _) if a.is_float() => a,
        (a, s) if s.is_float() => promote(a, s),
        (T::Bool, s) => s,
        (T::Char, s) if s.bits() <= 8 || s == T::Char => T::Char,
        (T::Char, s) => s,
        (a, _) => a,
    }
}

/// Result type of true division: integral promotions become `Float64`.
pub fn true_divide_type(lhs: NpType, rhs: NpType) -> NpType {
    let p = promote(lhs, rhs);
    if p.is_integral() {
        NpType::Float64
    } else {
        p
    }
}

/// Type-level form of [`promote`].
pub trait Promote<Rhs: Element>: Element {
    type Output: Element;
}

/// Result type of true division in a given computation type.
pub trait Quotient: Element {
    type Output: Element;
}

/// Shorthand for the promoted type of `L` and `R`.
pub type Promoted<L, R> = <L as Promote<R>>::Output;

/// Shorthand for the true-division result of `L` and `R`.
pub type TrueQuotient<L, R> = <Promoted<L, R> as Quotient>::Output;

macro_rules! impl_quotient {
    ($($t:ty => $q:ty),* $(,)?) => {
        $( impl Quotient for $t { type Output = $q; } )*
    };
}

impl_quotient!(
    bool => f64, i8 => f64, u8 => f64, i16 => f64, u16 => f64,
    i32 => f64, u32 => f64, i64 => f64, u64 => f64, NpChar => f64,
    f32 => f32, f64 => f64, Decimal => Decimal,
);

macro_rules! promote_row {
    ($lhs:ty => [$($rhs:ty: $out:ty),* $(,)?]) => {
        $( impl Promote<$rhs> for $lhs { type Output = $out; } )*
    };
}

promote_row!(bool => [
    bool: bool, i8: i8, u8: u8, i16: i16, u16: u16, i32: i32, u32: u32,
    i64: i64, u64: u64, NpChar: NpChar, f32: f32, f64: f64, Decimal: Decimal,
]);
promote_row!(i8 => [
    bool: i8, i8: i8, u8: i16, i16: i16, u16: i32, i32: i32, u32: i64,
    i64: i64, u64: f64, NpChar: i8, f32: f32, f64: f64, Decimal: Decimal,
]);
promote_row!(u8 => [
    bool: u8, i8: i16, u8: u8, i16: i16, u16: u16, i32: i32, u32: u32,
    i64: i64, u64: u64, NpChar: u8, f32: f32, f64: f64, Decimal: Decimal,
]);
promote_row!(i16 => [
    bool: i16, i8: i16, u8: i16, i16: i16, u16: i32, i32: i32, u32: i64,
    i64: i64, u64: f64, NpChar: i16, f32: f32, f64: f64, Decimal: Decimal,
]);
promote_row!(u16 => [
    bool: u16, i8: i32, u8: u16, i16: i32, u16: u16, i32: i32, u32: u32,
    i64: i64, u64: u64, NpChar: u16, f32: f32, f64: f64, Decimal: Decimal,
]);
promote_row!(i32 => [
    bool: i32, i8: i32, u8: i32, i16: i32, u16: i32, i32: i32, u32: i64,
    i64: i64, u64: f64, NpChar: i32, f32: f64, f64: f64, Decimal: Decimal,
]);
promote_row!(u32 => [
    bool: u32, i8: i64, u8: u32, i16: i64, u16: u32, i32: i64, u32: u32,
    i64: i64, u64: u64, NpChar: u32, f32: f64, f64: f64, Decimal: Decimal,
]);
promote_row!(i64 => [
    bool: i64, i8: i64, u8: i64, i16: i64, u16: i64, i32: i64, u32: i64,
    i64: i64, u64: f64, NpChar: i64, f32: f64, f64: f64, Decimal: Decimal,
]);
promote_row!(u64 => [
    bool: u64, i8: f64, u8: u64, i16: f64, u16: u64, i32: f64, u32: u64,
    i64: f64, u64: u64, NpChar: u64, f32: f64, f64: f64, Decimal: Decimal,
]);
promote_row!(NpChar => [
    bool: NpChar, i8: i8, u8: u8, i16: i16, u16: u16, i32: i32, u32: u32,
    i64: i64, u64: u64, NpChar: NpChar, f32: f32, f64: f64, Decimal: Decimal,
]);
promote_row!(f32 => [
    bool: f32, i8: f32, u8: f32, i16: f32, u16: f32, i32: f64, u32: f64,
    i64: f64, u64: f64, NpChar: f32, f32: f32, f64: f64, Decimal: Decimal,
]);
promote_row!(f64 => [
    bool: f64, i8: f64, u8: f64, i16: f64, u16: f64, i32: f64, u32: f64,
    i64: f64, u64: f64, NpChar: f64, f32: f64, f64: f64, Decimal: Decimal,
]);
promote_row!(Decimal => [
    bool: Decimal, i8: Decimal, u8: Decimal, i16: Decimal, u16: Decimal,
    i32: Decimal, u32: Decimal, i64: Decimal, u64: Decimal, NpChar: Decimal,
    f32: Decimal, f64: Decimal, Decimal: Decimal,
]);

#[cfg(test)]
mod tests {
    use super::*;
    use NpType as T;

    #[test]
    fn test_promote_examples() {
        assert_eq!(promote(T::Bool, T::Bool), T::Bool);
        assert_eq!(promote(T::Int8, T::UInt8), T::Int16);
        assert_eq!(promote(T::Int16, T::UInt16), T::Int32);
        assert_eq!(promote(T::Int32, T::UInt32), T::Int64);
        assert_eq!(promote(T::Int64, T::UInt64), T::Float64);
        assert_eq!(promote(T::UInt8, T::Int32), T::Int32);
        assert_eq!(promote(T::Int16, T::Float32), T::Float32);
        assert_eq!(promote(T::Int32, T::Float32), T::Float64);
        assert_eq!(promote(T::Float32, T::Float64), T::Float64);
        assert_eq!(promote(T::Char, T::Int8), T::Int8);
        assert_eq!(promote(T::Bool, T::Char), T::Char);
        assert_eq!(promote(T::Float64, T::Decimal), T::Decimal);
    }

    #[test]
    fn test_scalar_keeps_array_kind() {
        assert_eq!(promote_with_scalar(T::UInt8, T::Int32), T::UInt8);
        assert_eq!(promote_with_scalar(T::UInt8, T::Int64), T::UInt8);
        assert_eq!(promote_with_scalar(T::UInt16, T::Int16), T::UInt16);
        assert_eq!(promote_with_scalar(T::UInt64, T::Int64), T::UInt64);
        assert_eq!(promote_with_scalar(T::Int16, T::UInt64), T::Int16);
        assert_eq!(promote_with_scalar(T::Float32, T::Int64), T::Float32);
        assert_eq!(promote_with_scalar(T::Float32, T::Float64), T::Float32);
        assert_eq!(promote_with_scalar(T::Int64, T::Decimal), T::Int64);
        assert_eq!(promote_with_scalar(T::Decimal, T::Float64), T::Decimal);
    }

    #[test]
    fn test_scalar_of_higher_kind_promotes() {
        assert_eq!(promote_with_scalar(T::UInt8, T::Float32), T::Float32);
        assert_eq!(promote_with_scalar(T::Int16, T::Float32), T::Float32);
        assert_eq!(promote_with_scalar(T::Int32, T::Float32), T::Float64);
        assert_eq!(promote_with_scalar(T::UInt64, T::Float64), T::Float64);
        assert_eq!(promote_with_scalar(T::Bool, T::Int32), T::Int32);
        assert_eq!(promote_with_scalar(T::Bool, T::Decimal), T::Bool);
        assert_eq!(promote_with_scalar(T::Char, T::UInt8), T::Char);
        assert_eq!(promote_with_scalar(T::Char, T::Int16), T::Int16);
        assert_eq!(promote_with_scalar(T::Char, T::UInt64), T::UInt64);
        assert_eq!(promote_with_scalar(T::Char, T::Float64), T::Float64);
    }

    #[test]
    fn test_scalar_result_absorbs_array() {
        // the result can always hold the array type under the array table
        for a in NpType::ALL {
            assert_eq!(promote_with_scalar(a, a), a);
            for s in NpType::ALL {
                let p = promote_with_scalar(a, s);
                assert_eq!(promote(a, p), p, "{a} with scalar {s}");
            }
        }
    }

    #[test]
    fn test_promote_is_symmetric() {
        for l in NpType::ALL {
            for r in NpType::ALL {
                assert_eq!(promote(l, r), promote(r, l), "{l} vs {r}");
            }
        }
    }

    #[test]
    fn test_type_level_table_agrees() {
        for l in NpType::ALL {
            for r in NpType::ALL {
                let table = crate::with_np_type!(l, L => crate::with_np_type!(r, R => {
                    <Promoted<L, R> as Element>::TYPE
                }));
                assert_eq!(table, promote(l, r), "{l} vs {r}");
            }
        }
    }

    #[test]
    fn test_true_divide() {
        assert_eq!(true_divide_type(T::Int32, T::Int32), T::Float64);
        assert_eq!(true_divide_type(T::Bool, T::Bool), T::Float64);
        assert_eq!(true_divide_type(T::Char, T::UInt8), T::Float64);
        assert_eq!(true_divide_type(T::Float32, T::Int8), T::Float32);
        assert_eq!(true_divide_type(T::Decimal, T::Int64), T::Decimal);
        for l in NpType::ALL {
            for r in NpType::ALL {
                let table = crate::with_np_type!(l, L => crate::with_np_type!(r, R => {
                    <TrueQuotient<L, R> as Element>::TYPE
                }));
                assert_eq!(table, true_divide_type(l, r));
            }
        }
    }
}
