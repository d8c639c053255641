//! Element types and their fixed-width scalar semantics.
//!
//! Every supported element type implements [`Element`], which carries:
//! - its runtime [`NpType`] tag,
//! - a lossless-enough conversion route through [`Widened`] so any element can
//!   be cast to any other (`as`-style truncation for integers, saturation for
//!   float-to-integer, `x != 0` for bool),
//! - the scalar arithmetic used by the operator table, with wraparound for
//!   integers and IEEE-754 behaviour for floats.
//!
//! Division and modulo by zero on integer lanes produce `0` instead of
//! panicking. Modulo takes the sign of the divisor on every lane.

use std::fmt;

use num_traits::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

use crate::dtype::NpType;
use crate::value::Value;

/// 16-bit unsigned character code unit.
///
/// Arithmetic wraps like `u16`. This is a storage type, not a Unicode scalar;
/// use [`NpChar::to_char`] to interpret it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct NpChar(pub u16);

impl NpChar {
    /// Interpret the code unit as a Unicode scalar, if it is one.
    pub fn to_char(self) -> Option<char> {
        char::from_u32(self.0 as u32)
    }
}

impl From<u16> for NpChar {
    fn from(v: u16) -> Self {
        NpChar(v)
    }
}

impl fmt::Display for NpChar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_char() {
            Some(c) => write!(f, "{c}"),
            None => write!(f, "\\u{{{:04x}}}", self.0),
        }
    }
}

/// Intermediate representation used for casts between element types.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Widened {
    Bool(bool),
    Int(i128),
    Float(f64),
    Decimal(Decimal),
}

/// A fixed-size numeric element usable in memory blocks and kernels.
pub trait Element:
    Copy + Send + Sync + PartialEq + PartialOrd + Default + fmt::Debug + 'static
{
    /// Runtime tag of this type.
    const TYPE: NpType;

    fn widen(self) -> Widened;
    fn narrow(w: Widened) -> Self;
    fn to_value(self) -> Value;

    /// Convert to another element type with NumPy `astype` semantics.
    #[inline(always)]
    fn cast<U: Element>(self) -> U {
        U::narrow(self.widen())
    }

    fn np_add(self, rhs: Self) -> Self;
    fn np_sub(self, rhs: Self) -> Self;
    fn np_mul(self, rhs: Self) -> Self;
    /// Native division: truncating for integers, IEEE for floats.
    fn np_div(self, rhs: Self) -> Self;
    /// Floored remainder (sign follows the divisor).
    fn np_rem(self, rhs: Self) -> Self;
    fn np_and(self, rhs: Self) -> Self;
    fn np_or(self, rhs: Self) -> Self;
    fn np_xor(self, rhs: Self) -> Self;
    fn np_neg(self) -> Self;
    fn np_abs(self) -> Self;
    fn np_is_zero(self) -> bool;
}

// ---------------------------------------------------------------------------
// Integers
// ---------------------------------------------------------------------------

macro_rules! int_common {
    ($t:ty, $tag:ident) => {
        const TYPE: NpType = NpType::$tag;

        #[inline(always)]
        fn widen(self) -> Widened {
            Widened::Int(self as i128)
        }

        #[inline(always)]
        fn narrow(w: Widened) -> Self {
            match w {
                Widened::Bool(b) => b as $t,
                Widened::Int(i) => i as $t,
                Widened::Float(f) => f as $t,
                Widened::Decimal(d) => d
                    .trunc()
                    .to_i128()
                    .unwrap_or(0)
                    .clamp(<$t>::MIN as i128, <$t>::MAX as i128) as $t,
            }
        }

        fn to_value(self) -> Value {
            Value::$tag(self)
        }

        #[inline(always)]
        fn np_add(self, rhs: Self) -> Self {
            self.wrapping_add(rhs)
        }

        #[inline(always)]
        fn np_sub(self, rhs: Self) -> Self {
            self.wrapping_sub(rhs)
        }

        #[inline(always)]
        fn np_mul(self, rhs: Self) -> Self {
            self.wrapping_mul(rhs)
        }

        #[inline(always)]
        fn np_div(self, rhs: Self) -> Self {
            if rhs == 0 {
                0
            } else {
                self.wrapping_div(rhs)
            }
        }

        #[inline(always)]
        fn np_and(self, rhs: Self) -> Self {
            self & rhs
        }

        #[inline(always)]
        fn np_or(self, rhs: Self) -> Self {
            self | rhs
        }

        #[inline(always)]
        fn np_xor(self, rhs: Self) -> Self {
            self ^ rhs
        }

        #[inline(always)]
        fn np_neg(self) -> Self {
            self.wrapping_neg()
        }

        #[inline(always)]
        fn np_is_zero(self) -> bool {
            self == 0
        }
    };
}

macro_rules! impl_element_signed {
    ($($t:ty => $tag:ident),* $(,)?) => {
        $(
            impl Element for $t {
                int_common!($t, $tag);

                #[inline(always)]
                fn np_rem(self, rhs: Self) -> Self {
                    if rhs == 0 {
                        return 0;
                    }
                    let r = self.wrapping_rem(rhs);
                    if r != 0 && ((r < 0) != (rhs < 0)) {
                        r.wrapping_add(rhs)
                    } else {
                        r
                    }
                }

                #[inline(always)]
                fn np_abs(self) -> Self {
                    self.wrapping_abs()
                }
            }
        )*
    };
}

macro_rules! impl_element_unsigned {
    ($($t:ty => $tag:ident),* $(,)?) => {
        $(
            impl Element for $t {
                int_common!($t, $tag);

                #[inline(always)]
                fn np_rem(self, rhs: Self) -> Self {
                    if rhs == 0 {
                        0
                    } else {
                        self % rhs
                    }
                }

                #[inline(always)]
                fn np_abs(self) -> Self {
                    self
                }
            }
        )*
    };
}

impl_element_signed!(i8 => Int8, i16 => Int16, i32 => Int32, i64 => Int64);
impl_element_unsigned!(u8 => UInt8, u16 => UInt16, u32 => UInt32, u64 => UInt64);

// ---------------------------------------------------------------------------
// Floats
// ---------------------------------------------------------------------------

macro_rules! impl_element_float {
    ($($t:ty => $tag:ident),* $(,)?) => {
        $(
            impl Element for $t {
                const TYPE: NpType = NpType::$tag;

                #[inline(always)]
                fn widen(self) -> Widened {
                    Widened::Float(self as f64)
                }

                #[inline(always)]
                fn narrow(w: Widened) -> Self {
                    match w {
                        Widened::Bool(b) => if b { 1.0 } else { 0.0 },
                        Widened::Int(i) => i as $t,
                        Widened::Float(f) => f as $t,
                        Widened::Decimal(d) => d.to_f64().unwrap_or(0.0) as $t,
                    }
                }

                fn to_value(self) -> Value {
                    Value::$tag(self)
                }

                #[inline(always)]
                fn np_add(self, rhs: Self) -> Self {
                    self + rhs
                }

                #[inline(always)]
                fn np_sub(self, rhs: Self) -> Self {
                    self - rhs
                }

                #[inline(always)]
                fn np_mul(self, rhs: Self) -> Self {
                    self * rhs
                }

                #[inline(always)]
                fn np_div(self, rhs: Self) -> Self {
                    self / rhs
                }

                #[inline(always)]
                fn np_rem(self, rhs: Self) -> Self {
                    let r = self % rhs;
                    if r != 0.0 && ((r < 0.0) != (rhs < 0.0)) {
                        r + rhs
                    } else {
                        r
                    }
                }

                // Bitwise operators are rejected for float lanes at resolution
                // time; these act on the bit patterns so the lane stays total.
                #[inline(always)]
                fn np_and(self, rhs: Self) -> Self {
                    <$t>::from_bits(self.to_bits() & rhs.to_bits())
                }

                #[inline(always)]
                fn np_or(self, rhs: Self) -> Self {
                    <$t>::from_bits(self.to_bits() | rhs.to_bits())
                }

                #[inline(always)]
                fn np_xor(self, rhs: Self) -> Self {
                    <$t>::from_bits(self.to_bits() ^ rhs.to_bits())
                }

                #[inline(always)]
                fn np_neg(self) -> Self {
                    -self
                }

                #[inline(always)]
                fn np_abs(self) -> Self {
                    self.abs()
                }

                #[inline(always)]
                fn np_is_zero(self) -> bool {
                    self == 0.0
                }
            }
        )*
    };
}

impl_element_float!(f32 => Float32, f64 => Float64);

// ---------------------------------------------------------------------------
// Bool
// ---------------------------------------------------------------------------

impl Element for bool {
    const TYPE: NpType = NpType::Bool;

    #[inline(always)]
    fn widen(self) -> Widened {
        Widened::Bool(self)
    }

    #[inline(always)]
    fn narrow(w: Widened) -> Self {
        match w {
            Widened::Bool(b) => b,
            Widened::Int(i) => i != 0,
            Widened::Float(f) => f != 0.0,
            Widened::Decimal(d) => !d.is_zero(),
        }
    }

    fn to_value(self) -> Value {
        Value::Bool(self)
    }

    /// Logical OR.
    #[inline(always)]
    fn np_add(self, rhs: Self) -> Self {
        self | rhs
    }

    /// `(a - b) != 0` computed in integers.
    #[inline(always)]
    fn np_sub(self, rhs: Self) -> Self {
        self ^ rhs
    }

    /// Logical AND.
    #[inline(always)]
    fn np_mul(self, rhs: Self) -> Self {
        self & rhs
    }

    #[inline(always)]
    fn np_div(self, rhs: Self) -> Self {
        self & rhs
    }

    /// `a % b` is 0 for every 0/1 operand pair.
    #[inline(always)]
    fn np_rem(self, _rhs: Self) -> Self {
        false
    }

    #[inline(always)]
    fn np_and(self, rhs: Self) -> Self {
        self & rhs
    }

    #[inline(always)]
    fn np_or(self, rhs: Self) -> Self {
        self | rhs
    }

    #[inline(always)]
    fn np_xor(self, rhs: Self) -> Self {
        self ^ rhs
    }

    #[inline(always)]
    fn np_neg(self) -> Self {
        self
    }

    #[inline(always)]
    fn np_abs(self) -> Self {
        self
    }

    #[inline(always)]
    fn np_is_zero(self) -> bool {
        !self
    }
}

// ---------------------------------------------------------------------------
// Char
// ---------------------------------------------------------------------------

impl Element for NpChar {
    const TYPE: NpType = NpType::Char;

    #[inline(always)]
    fn widen(self) -> Widened {
        Widened::Int(self.0 as i128)
    }

    #[inline(always)]
    fn narrow(w: Widened) -> Self {
        NpChar(u16::narrow(w))
    }

    fn to_value(self) -> Value {
        Value::Char(self)
    }

    #[inline(always)]
    fn np_add(self, rhs: Self) -> Self {
        NpChar(self.0.np_add(rhs.0))
    }

    #[inline(always)]
    fn np_sub(self, rhs: Self) -> Self {
        NpChar(self.0.np_sub(rhs.0))
    }

    #[inline(always)]
    fn np_mul(self, rhs: Self) -> Self {
        NpChar(self.0.np_mul(rhs.0))
    }

    #[inline(always)]
    fn np_div(self, rhs: Self) -> Self {
        NpChar(self.0.np_div(rhs.0))
    }

    #[inline(always)]
    fn np_rem(self, rhs: Self) -> Self {
        NpChar(self.0.np_rem(rhs.0))
    }

    #[inline(always)]
    fn np_and(self, rhs: Self) -> Self {
        NpChar(self.0 & rhs.0)
    }

    #[inline(always)]
    fn np_or(self, rhs: Self) -> Self {
        NpChar(self.0 | rhs.0)
    }

    #[inline(always)]
    fn np_xor(self, rhs: Self) -> Self {
        NpChar(self.0 ^ rhs.0)
    }

    #[inline(always)]
    fn np_neg(self) -> Self {
        NpChar(self.0.wrapping_neg())
    }

    #[inline(always)]
    fn np_abs(self) -> Self {
        self
    }

    #[inline(always)]
    fn np_is_zero(self) -> bool {
        self.0 == 0
    }
}

// ---------------------------------------------------------------------------
// Decimal
// ---------------------------------------------------------------------------

#[inline]
fn saturated(negative: bool) -> Decimal {
    if negative {
        Decimal::MIN
    } else {
        Decimal::MAX
    }
}

#[inline]
fn decimal_bits(a: Decimal, b: Decimal, f: impl Fn(i128, i128) -> i128) -> Decimal {
    let x = a.trunc().to_i128().unwrap_or(0);
    let y = b.trunc().to_i128().unwrap_or(0);
    Decimal::from_i128(f(x, y)).unwrap_or(Decimal::ZERO)
}

/// Overflow saturates to `Decimal::MAX` / `Decimal::MIN`; division and
/// remainder by zero produce zero.
impl Element for Decimal {
    const TYPE: NpType = NpType::Decimal;

    #[inline(always)]
    fn widen(self) -> Widened {
        Widened::Decimal(self)
    }

    fn narrow(w: Widened) -> Self {
        match w {
            Widened::Bool(b) => {
                if b {
                    Decimal::ONE
                } else {
                    Decimal::ZERO
                }
            }
            Widened::Int(i) => Decimal::from_i128(i).unwrap_or_else(|| saturated(i < 0)),
            Widened::Float(f) => {
                if f.is_nan() {
                    Decimal::ZERO
                } else {
                    Decimal::from_f64(f).unwrap_or_else(|| saturated(f < 0.0))
                }
            }
            Widened::Decimal(d) => d,
        }
    }

    fn to_value(self) -> Value {
        Value::Decimal(self)
    }

    fn np_add(self, rhs: Self) -> Self {
        self.checked_add(rhs)
            .unwrap_or_else(|| saturated(self.is_sign_negative()))
    }

    fn np_sub(self, rhs: Self) -> Self {
        self.checked_sub(rhs)
            .unwrap_or_else(|| saturated(self.is_sign_negative()))
    }

    fn np_mul(self, rhs: Self) -> Self {
        self.checked_mul(rhs)
            .unwrap_or_else(|| saturated(self.is_sign_negative() != rhs.is_sign_negative()))
    }

    fn np_div(self, rhs: Self) -> Self {
        if rhs.is_zero() {
            return Decimal::ZERO;
        }
        self.checked_div(rhs)
            .unwrap_or_else(|| saturated(self.is_sign_negative() != rhs.is_sign_negative()))
    }

    fn np_rem(self, rhs: Self) -> Self {
        if rhs.is_zero() {
            return Decimal::ZERO;
        }
        let r = self.checked_rem(rhs).unwrap_or(Decimal::ZERO);
        if !r.is_zero() && (r.is_sign_negative() != rhs.is_sign_negative()) {
            r + rhs
        } else {
            r
        }
    }

    fn np_and(self, rhs: Self) -> Self {
        decimal_bits(self, rhs, |x, y| x & y)
    }

    fn np_or(self, rhs: Self) -> Self {
        decimal_bits(self, rhs, |x, y| x | y)
    }

    fn np_xor(self, rhs: Self) -> Self {
        decimal_bits(self, rhs, |x, y| x ^ y)
    }

    fn np_neg(self) -> Self {
        -self
    }

    fn np_abs(self) -> Self {
        self.abs()
    }

    fn np_is_zero(self) -> bool {
        self.is_zero()
    }
}
