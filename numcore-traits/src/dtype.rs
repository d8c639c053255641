//! Runtime element type tags.

use std::fmt;

/// Element type tag carried by memory blocks and used as a dispatch key.
///
/// The set is closed: every operator table entry and every kernel
/// instantiation is keyed by a pair (or triple) of these tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NpType {
    Bool,
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    /// 16-bit unsigned code unit, see [`crate::NpChar`].
    Char,
    Float32,
    Float64,
    Decimal,
}

impl NpType {
    /// Every supported tag, in promotion-table order.
    pub const ALL: [NpType; 13] = [
        NpType::Bool,
        NpType::Int8,
        NpType::UInt8,
        NpType::Int16,
        NpType::UInt16,
        NpType::Int32,
        NpType::UInt32,
        NpType::Int64,
        NpType::UInt64,
        NpType::Char,
        NpType::Float32,
        NpType::Float64,
        NpType::Decimal,
    ];

    /// NumPy-style dtype name.
    pub fn name(self) -> &'static str {
        match self {
            NpType::Bool => "bool",
            NpType::Int8 => "int8",
            NpType::UInt8 => "uint8",
            NpType::Int16 => "int16",
            NpType::UInt16 => "uint16",
            NpType::Int32 => "int32",
            NpType::UInt32 => "uint32",
            NpType::Int64 => "int64",
            NpType::UInt64 => "uint64",
            NpType::Char => "char",
            NpType::Float32 => "float32",
            NpType::Float64 => "float64",
            NpType::Decimal => "decimal",
        }
    }

    /// Size in bytes of one element.
    pub fn size_of(self) -> usize {
        match self {
            NpType::Bool | NpType::Int8 | NpType::UInt8 => 1,
            NpType::Int16 | NpType::UInt16 | NpType::Char => 2,
            NpType::Int32 | NpType::UInt32 | NpType::Float32 => 4,
            NpType::Int64 | NpType::UInt64 | NpType::Float64 => 8,
            NpType::Decimal => 16,
        }
    }

    /// Width in bits of the value range (bool counts as 1).
    pub fn bits(self) -> u32 {
        match self {
            NpType::Bool => 1,
            NpType::Decimal => 96,
            other => other.size_of() as u32 * 8,
        }
    }

    /// Fixed-width integers, excluding `Bool` and `Char`.
    pub fn is_integer(self) -> bool {
        self.is_signed_integer() || self.is_unsigned_integer()
    }

    pub fn is_signed_integer(self) -> bool {
        matches!(
            self,
            NpType::Int8 | NpType::Int16 | NpType::Int32 | NpType::Int64
        )
    }

    pub fn is_unsigned_integer(self) -> bool {
        matches!(
            self,
            NpType::UInt8 | NpType::UInt16 | NpType::UInt32 | NpType::UInt64
        )
    }

    pub fn is_float(self) -> bool {
        matches!(self, NpType::Float32 | NpType::Float64)
    }

    /// Types that support bitwise operators: integers, `Bool` and `Char`.
    pub fn is_integral(self) -> bool {
        self.is_integer() || matches!(self, NpType::Bool | NpType::Char)
    }

    /// Signed integer tag with the given bit width.
    pub(crate) fn signed_with_bits(bits: u32) -> NpType {
        match bits {
            8 => NpType::Int8,
            16 => NpType::Int16,
            32 => NpType::Int32,
            _ => NpType::Int64,
        }
    }
}

impl fmt::Display for NpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sizes_and_bits() {
        assert_eq!(NpType::Bool.size_of(), 1);
        assert_eq!(NpType::Char.size_of(), 2);
        assert_eq!(NpType::Decimal.size_of(), 16);
        assert_eq!(NpType::Int32.bits(), 32);
        assert_eq!(NpType::Bool.bits(), 1);
    }

    #[test]
    fn test_classification() {
        assert!(NpType::Int8.is_signed_integer());
        assert!(NpType::UInt64.is_unsigned_integer());
        assert!(!NpType::Char.is_integer());
        assert!(NpType::Char.is_integral());
        assert!(NpType::Bool.is_integral());
        assert!(!NpType::Float32.is_integral());
        assert!(!NpType::Decimal.is_integral());
    }

    #[test]
    fn test_display() {
        assert_eq!(NpType::Float64.to_string(), "float64");
        assert_eq!(format!("{}", NpType::UInt16), "uint16");
    }
}
