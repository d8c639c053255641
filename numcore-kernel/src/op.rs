//! Operator kinds and the result-type half of the operator table.

use std::fmt;

use numcore_traits::{promote, true_divide_type, NpType};

/// Elementwise binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    /// True division: integral operands produce `float64`.
    Divide,
    /// Remainder with the sign of the divisor.
    Mod,
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
}

impl BinaryOp {
    pub const ALL: [BinaryOp; 14] = [
        BinaryOp::Add,
        BinaryOp::Subtract,
        BinaryOp::Multiply,
        BinaryOp::Divide,
        BinaryOp::Mod,
        BinaryOp::BitwiseAnd,
        BinaryOp::BitwiseOr,
        BinaryOp::BitwiseXor,
        BinaryOp::Equal,
        BinaryOp::NotEqual,
        BinaryOp::Less,
        BinaryOp::LessEqual,
        BinaryOp::Greater,
        BinaryOp::GreaterEqual,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BinaryOp::Add => "add",
            BinaryOp::Subtract => "subtract",
            BinaryOp::Multiply => "multiply",
            BinaryOp::Divide => "divide",
            BinaryOp::Mod => "mod",
            BinaryOp::BitwiseAnd => "bitwise_and",
            BinaryOp::BitwiseOr => "bitwise_or",
            BinaryOp::BitwiseXor => "bitwise_xor",
            BinaryOp::Equal => "equal",
            BinaryOp::NotEqual => "not_equal",
            BinaryOp::Less => "less",
            BinaryOp::LessEqual => "less_equal",
            BinaryOp::Greater => "greater",
            BinaryOp::GreaterEqual => "greater_equal",
        }
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Equal
                | BinaryOp::NotEqual
                | BinaryOp::Less
                | BinaryOp::LessEqual
                | BinaryOp::Greater
                | BinaryOp::GreaterEqual
        )
    }

    pub fn is_bitwise(self) -> bool {
        matches!(
            self,
            BinaryOp::BitwiseAnd | BinaryOp::BitwiseOr | BinaryOp::BitwiseXor
        )
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Elementwise unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UnaryOp {
    /// Wrapping negation; not defined for `bool`.
    Negate,
    /// Wrapping absolute value; identity on unsigned, bool and char.
    Absolute,
    /// `x == 0`, producing `bool`.
    LogicalNot,
    /// Conversion to the requested output type.
    Cast,
}

impl UnaryOp {
    pub fn name(self) -> &'static str {
        match self {
            UnaryOp::Negate => "negative",
            UnaryOp::Absolute => "absolute",
            UnaryOp::LogicalNot => "logical_not",
            UnaryOp::Cast => "astype",
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Output type of `op` on `lhs` and `rhs`, or `None` if the pair is not in
/// the table.
pub fn result_type(op: BinaryOp, lhs: NpType, rhs: NpType) -> Option<NpType> {
    match op {
        BinaryOp::Add | BinaryOp::Subtract | BinaryOp::Multiply | BinaryOp::Mod => {
            Some(promote(lhs, rhs))
        }
        BinaryOp::Divide => Some(true_divide_type(lhs, rhs)),
        BinaryOp::BitwiseAnd | BinaryOp::BitwiseOr | BinaryOp::BitwiseXor => {
            let p = promote(lhs, rhs);
            p.is_integral().then_some(p)
        }
        _ => Some(NpType::Bool),
    }
}

/// Output type of `op` on `input`. `Cast` has no fixed output and returns
/// `None`, as do unsupported inputs.
pub fn unary_result_type(op: UnaryOp, input: NpType) -> Option<NpType> {
    match op {
        UnaryOp::Negate if input == NpType::Bool => None,
        UnaryOp::Negate | UnaryOp::Absolute => Some(input),
        UnaryOp::LogicalNot => Some(NpType::Bool),
        UnaryOp::Cast => None,
    }
}
