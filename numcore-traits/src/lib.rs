//! Element types shared across the numcore workspace.
//!
//! This crate defines the closed set of supported element types
//! ([`NpType`]), the [`Element`] trait carrying their scalar semantics,
//! the dynamically typed [`Value`], and the arithmetic promotion table
//! ([`promote`] at runtime, [`Promote`] at the type level).
//!
//! `numcore-view` and `numcore-kernel` build on these definitions; they never
//! inspect element types any other way.

pub mod dtype;
pub mod element;
pub mod promote;
pub mod value;

pub use dtype::NpType;
pub use element::{Element, NpChar, Widened};
pub use promote::{
    promote, promote_with_scalar, true_divide_type, Promote, Promoted, Quotient, TrueQuotient,
};
pub use rust_decimal::Decimal;
pub use value::Value;

/// Run `body` with `T` bound to the Rust type of a runtime [`NpType`].
///
/// ```
/// use numcore_traits::{with_np_type, NpType};
///
/// let size = with_np_type!(NpType::Int16, T => std::mem::size_of::<T>());
/// assert_eq!(size, 2);
/// ```
#[macro_export]
macro_rules! with_np_type {
    ($tag:expr, $T:ident => $body:expr) => {
        match $tag {
            $crate::NpType::Bool => {
                type $T = bool;
                $body
            }
            $crate::NpType::Int8 => {
                type $T = i8;
                $body
            }
            $crate::NpType::UInt8 => {
                type $T = u8;
                $body
            }
            $crate::NpType::Int16 => {
                type $T = i16;
                $body
            }
            $crate::NpType::UInt16 => {
                type $T = u16;
                $body
            }
            $crate::NpType::Int32 => {
                type $T = i32;
                $body
            }
            $crate::NpType::UInt32 => {
                type $T = u32;
                $body
            }
            $crate::NpType::Int64 => {
                type $T = i64;
                $body
            }
            $crate::NpType::UInt64 => {
                type $T = u64;
                $body
            }
            $crate::NpType::Char => {
                type $T = $crate::NpChar;
                $body
            }
            $crate::NpType::Float32 => {
                type $T = f32;
                $body
            }
            $crate::NpType::Float64 => {
                type $T = f64;
                $body
            }
            $crate::NpType::Decimal => {
                type $T = $crate::Decimal;
                $body
            }
        }
    };
}
