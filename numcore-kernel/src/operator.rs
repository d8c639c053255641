//! The operator table: scalar functions for every supported type pair.
//!
//! Every binary scalar function casts both operands to the promoted type of
//! the pair and applies the operator there (see
//! [`Element`](numcore_traits::Element) for the per-type semantics). The
//! functions are generic over `(L, R)`; [`build_binary`] picks the one for an
//! operator and wraps it in an [`Operator`] for the concrete pair.

use std::fmt;

use numcore_traits::{
    with_np_type, Element, NpType, Promote, Promoted, Quotient, TrueQuotient, Value,
};
use numcore_view::{BlockElement, MemoryBlock, MemoryBlockMut, Shape};

use crate::config::KernelConfig;
use crate::exec::{self, Strategy};
use crate::op::{BinaryOp, UnaryOp};
use crate::Result;

/// Key of a resolved binary operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature {
    pub op: BinaryOp,
    pub lhs: NpType,
    pub rhs: NpType,
    pub out: NpType,
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}, {}) -> {}", self.op, self.lhs, self.rhs, self.out)
    }
}

/// Key of a resolved unary operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnarySignature {
    pub op: UnaryOp,
    pub input: NpType,
    pub out: NpType,
}

impl fmt::Display for UnarySignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}) -> {}", self.op, self.input, self.out)
    }
}

/// A scalar binary function together with its signature.
#[derive(Clone, Copy)]
pub struct Operator<L, R, O> {
    f: fn(L, R) -> O,
    signature: Signature,
}

impl<L, R, O> fmt::Debug for Operator<L, R, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operator")
            .field("signature", &self.signature)
            .finish()
    }
}

impl<L: Element, R: Element, O: Element> Operator<L, R, O> {
    pub fn new(f: fn(L, R) -> O, signature: Signature) -> Self {
        Self { f, signature }
    }

    #[inline(always)]
    pub fn apply(&self, lhs: L, rhs: R) -> O {
        (self.f)(lhs, rhs)
    }

    #[inline]
    pub fn signature(&self) -> Signature {
        self.signature
    }

    #[inline]
    pub fn function(&self) -> fn(L, R) -> O {
        self.f
    }
}

/// A scalar unary function together with its signature.
#[derive(Clone, Copy)]
pub struct UnaryOperator<I, O> {
    f: fn(I) -> O,
    signature: UnarySignature,
}

impl<I, O> fmt::Debug for UnaryOperator<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnaryOperator")
            .field("signature", &self.signature)
            .finish()
    }
}

impl<I: Element, O: Element> UnaryOperator<I, O> {
    pub fn new(f: fn(I) -> O, signature: UnarySignature) -> Self {
        Self { f, signature }
    }

    #[inline(always)]
    pub fn apply(&self, input: I) -> O {
        (self.f)(input)
    }

    #[inline]
    pub fn signature(&self) -> UnarySignature {
        self.signature
    }
}

// ============================================================================
// Type-erased execution
// ============================================================================

/// Object-safe face of an [`Operator`] for a concrete `(L, R, O)`.
pub(crate) trait BinaryKernel: Send + Sync + fmt::Debug {
    #[allow(clippy::too_many_arguments)]
    fn execute(
        &self,
        lhs: &MemoryBlock<'_>,
        lhs_shape: &Shape,
        rhs: &MemoryBlock<'_>,
        rhs_shape: &Shape,
        out: &mut MemoryBlockMut<'_>,
        out_shape: &Shape,
        config: &KernelConfig,
    ) -> Result<Strategy>;

    fn apply_value(&self, lhs: Value, rhs: Value) -> Value;
}

impl<L, R, O> BinaryKernel for Operator<L, R, O>
where
    L: BlockElement,
    R: BlockElement,
    O: BlockElement,
{
    fn execute(
        &self,
        lhs: &MemoryBlock<'_>,
        lhs_shape: &Shape,
        rhs: &MemoryBlock<'_>,
        rhs_shape: &Shape,
        out: &mut MemoryBlockMut<'_>,
        out_shape: &Shape,
        config: &KernelConfig,
    ) -> Result<Strategy> {
        let lhs = lhs.typed::<L>()?;
        let rhs = rhs.typed::<R>()?;
        let out = out.typed_mut::<O>()?;
        exec::binary(self.f, lhs, lhs_shape, rhs, rhs_shape, out, out_shape, config)
    }

    fn apply_value(&self, lhs: Value, rhs: Value) -> Value {
        self.apply(lhs.cast::<L>(), rhs.cast::<R>()).to_value()
    }
}

/// Object-safe face of a [`UnaryOperator`] for a concrete `(I, O)`.
pub(crate) trait UnaryKernel: Send + Sync + fmt::Debug {
    fn execute(
        &self,
        input: &MemoryBlock<'_>,
        in_shape: &Shape,
        out: &mut MemoryBlockMut<'_>,
        out_shape: &Shape,
        config: &KernelConfig,
    ) -> Result<Strategy>;

    fn apply_value(&self, input: Value) -> Value;
}

impl<I, O> UnaryKernel for UnaryOperator<I, O>
where
    I: BlockElement,
    O: BlockElement,
{
    fn execute(
        &self,
        input: &MemoryBlock<'_>,
        in_shape: &Shape,
        out: &mut MemoryBlockMut<'_>,
        out_shape: &Shape,
        config: &KernelConfig,
    ) -> Result<Strategy> {
        let input = input.typed::<I>()?;
        let out = out.typed_mut::<O>()?;
        exec::unary(self.f, input, in_shape, out, out_shape, config)
    }

    fn apply_value(&self, input: Value) -> Value {
        self.apply(input.cast::<I>()).to_value()
    }
}

// ============================================================================
// Scalar functions
// ============================================================================

macro_rules! promoted_fn {
    ($($name:ident => $method:ident),* $(,)?) => {
        $(
            #[inline(always)]
            fn $name<L: Promote<R>, R: Element>(lhs: L, rhs: R) -> Promoted<L, R> {
                lhs.cast::<Promoted<L, R>>().$method(rhs.cast())
            }
        )*
    };
}

promoted_fn!(
    add => np_add,
    subtract => np_sub,
    multiply => np_mul,
    modulo => np_rem,
    bitwise_and => np_and,
    bitwise_or => np_or,
    bitwise_xor => np_xor,
);

macro_rules! compare_fn {
    ($($name:ident => $op:tt),* $(,)?) => {
        $(
            #[inline(always)]
            fn $name<L: Promote<R>, R: Element>(lhs: L, rhs: R) -> bool {
                lhs.cast::<Promoted<L, R>>() $op rhs.cast::<Promoted<L, R>>()
            }
        )*
    };
}

compare_fn!(
    equal => ==,
    not_equal => !=,
    less => <,
    less_equal => <=,
    greater => >,
    greater_equal => >=,
);

#[inline(always)]
fn true_divide<L, R>(lhs: L, rhs: R) -> TrueQuotient<L, R>
where
    L: Promote<R>,
    R: Element,
    Promoted<L, R>: Quotient,
{
    lhs.cast::<TrueQuotient<L, R>>().np_div(rhs.cast())
}

#[inline(always)]
fn negate<I: Element>(x: I) -> I {
    x.np_neg()
}

#[inline(always)]
fn absolute<I: Element>(x: I) -> I {
    x.np_abs()
}

#[inline(always)]
fn logical_not<I: Element>(x: I) -> bool {
    x.np_is_zero()
}

#[inline(always)]
fn cast<I: Element, O: Element>(x: I) -> O {
    x.cast()
}

/// Monomorphize `signature.op` for the pair `(L, R)`.
///
/// The caller has checked `signature` against [`result_type`](crate::result_type),
/// so the output type below always equals `signature.out`.
pub(crate) fn build_binary<L, R>(signature: Signature) -> Box<dyn BinaryKernel>
where
    L: BlockElement + Promote<R>,
    R: BlockElement,
    Promoted<L, R>: BlockElement + Quotient,
    TrueQuotient<L, R>: BlockElement,
{
    macro_rules! promoted {
        ($f:ident) => {
            Box::new(Operator::<L, R, Promoted<L, R>>::new($f::<L, R>, signature))
        };
    }
    macro_rules! boolean {
        ($f:ident) => {
            Box::new(Operator::<L, R, bool>::new($f::<L, R>, signature))
        };
    }
    match signature.op {
        BinaryOp::Add => promoted!(add),
        BinaryOp::Subtract => promoted!(subtract),
        BinaryOp::Multiply => promoted!(multiply),
        BinaryOp::Mod => promoted!(modulo),
        BinaryOp::BitwiseAnd => promoted!(bitwise_and),
        BinaryOp::BitwiseOr => promoted!(bitwise_or),
        BinaryOp::BitwiseXor => promoted!(bitwise_xor),
        BinaryOp::Divide => Box::new(Operator::<L, R, TrueQuotient<L, R>>::new(
            true_divide::<L, R>,
            signature,
        )),
        BinaryOp::Equal => boolean!(equal),
        BinaryOp::NotEqual => boolean!(not_equal),
        BinaryOp::Less => boolean!(less),
        BinaryOp::LessEqual => boolean!(less_equal),
        BinaryOp::Greater => boolean!(greater),
        BinaryOp::GreaterEqual => boolean!(greater_equal),
    }
}

/// Monomorphize `signature.op` for input `I`.
///
/// Casts pick their output type from `signature.out`; every other operator
/// has a fixed output type the caller has already checked.
pub(crate) fn build_unary<I: BlockElement>(signature: UnarySignature) -> Box<dyn UnaryKernel> {
    match signature.op {
        UnaryOp::Negate => Box::new(UnaryOperator::<I, I>::new(negate::<I>, signature)),
        UnaryOp::Absolute => Box::new(UnaryOperator::<I, I>::new(absolute::<I>, signature)),
        UnaryOp::LogicalNot => Box::new(UnaryOperator::<I, bool>::new(logical_not::<I>, signature)),
        UnaryOp::Cast => with_np_type!(signature.out, O => build_cast::<I, O>(signature)),
    }
}

fn build_cast<I: BlockElement, O: BlockElement>(signature: UnarySignature) -> Box<dyn UnaryKernel> {
    Box::new(UnaryOperator::<I, O>::new(cast::<I, O>, signature))
}
