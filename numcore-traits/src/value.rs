//! Dynamically typed scalar.

use std::fmt;

use rust_decimal::Decimal;

use crate::dtype::NpType;
use crate::element::{Element, NpChar, Widened};

/// One element of any supported type, tagged at runtime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Bool(bool),
    Int8(i8),
    UInt8(u8),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Char(NpChar),
    Float32(f32),
    Float64(f64),
    Decimal(Decimal),
}

macro_rules! value_dispatch {
    ($value:expr, $v:ident => $body:expr) => {
        match $value {
            Value::Bool($v) => $body,
            Value::Int8($v) => $body,
            Value::UInt8($v) => $body,
            Value::Int16($v) => $body,
            Value::UInt16($v) => $body,
            Value::Int32($v) => $body,
            Value::UInt32($v) => $body,
            Value::Int64($v) => $body,
            Value::UInt64($v) => $body,
            Value::Char($v) => $body,
            Value::Float32($v) => $body,
            Value::Float64($v) => $body,
            Value::Decimal($v) => $body,
        }
    };
}

impl Value {
    pub fn np_type(&self) -> NpType {
        value_dispatch!(*self, v => tag_of(&v))
    }

    pub fn widen(self) -> Widened {
        value_dispatch!(self, v => v.widen())
    }

    /// Convert to `T` with the same rules as [`Element::cast`].
    pub fn cast<T: Element>(self) -> T {
        T::narrow(self.widen())
    }

    /// Re-tag the value as `target`.
    pub fn cast_to(self, target: NpType) -> Value {
        crate::with_np_type!(target, T => self.cast::<T>().to_value())
    }

    /// The value as `T` if it already has that type.
    pub fn get<T: Element>(self) -> Option<T> {
        if self.np_type() == T::TYPE {
            Some(self.cast())
        } else {
            None
        }
    }
}

fn tag_of<T: Element>(_: &T) -> NpType {
    T::TYPE
}

macro_rules! impl_from_element {
    ($($t:ty => $tag:ident),* $(,)?) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::$tag(v)
                }
            }
        )*
    };
}

impl_from_element!(
    bool => Bool, i8 => Int8, u8 => UInt8, i16 => Int16, u16 => UInt16,
    i32 => Int32, u32 => UInt32, i64 => Int64, u64 => UInt64, NpChar => Char,
    f32 => Float32, f64 => Float64, Decimal => Decimal,
);

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        value_dispatch!(self, v => fmt::Display::fmt(v, f))
    }
}
