//! Type-erased element iteration.

use numcore_traits::{Decimal, Element, NpChar, NpType, Value};

use crate::block::MemoryBlock;
use crate::iter::NdIter;
use crate::shape::Shape;
use crate::Result;

/// [`NdIter`] over a block whose element type is only known at runtime.
#[derive(Debug, Clone)]
pub enum DynIter<'a> {
    Bool(NdIter<'a, bool>),
    Int8(NdIter<'a, i8>),
    UInt8(NdIter<'a, u8>),
    Int16(NdIter<'a, i16>),
    UInt16(NdIter<'a, u16>),
    Int32(NdIter<'a, i32>),
    UInt32(NdIter<'a, u32>),
    Int64(NdIter<'a, i64>),
    UInt64(NdIter<'a, u64>),
    Char(NdIter<'a, NpChar>),
    Float32(NdIter<'a, f32>),
    Float64(NdIter<'a, f64>),
    Decimal(NdIter<'a, Decimal>),
}

/// Iterator over `block` laid out by `shape`.
///
/// With `auto_reset` the iterator cycles forever; see [`NdIter`].
pub fn create_iterator<'a>(
    block: &MemoryBlock<'a>,
    shape: &Shape,
    auto_reset: bool,
) -> Result<DynIter<'a>> {
    Ok(match *block {
        MemoryBlock::Bool(s) => DynIter::Bool(NdIter::new(s, shape, auto_reset)?),
        MemoryBlock::Int8(s) => DynIter::Int8(NdIter::new(s, shape, auto_reset)?),
        MemoryBlock::UInt8(s) => DynIter::UInt8(NdIter::new(s, shape, auto_reset)?),
        MemoryBlock::Int16(s) => DynIter::Int16(NdIter::new(s, shape, auto_reset)?),
        MemoryBlock::UInt16(s) => DynIter::UInt16(NdIter::new(s, shape, auto_reset)?),
        MemoryBlock::Int32(s) => DynIter::Int32(NdIter::new(s, shape, auto_reset)?),
        MemoryBlock::UInt32(s) => DynIter::UInt32(NdIter::new(s, shape, auto_reset)?),
        MemoryBlock::Int64(s) => DynIter::Int64(NdIter::new(s, shape, auto_reset)?),
        MemoryBlock::UInt64(s) => DynIter::UInt64(NdIter::new(s, shape, auto_reset)?),
        MemoryBlock::Char(s) => DynIter::Char(NdIter::new(s, shape, auto_reset)?),
        MemoryBlock::Float32(s) => DynIter::Float32(NdIter::new(s, shape, auto_reset)?),
        MemoryBlock::Float64(s) => DynIter::Float64(NdIter::new(s, shape, auto_reset)?),
        MemoryBlock::Decimal(s) => DynIter::Decimal(NdIter::new(s, shape, auto_reset)?),
    })
}

fn iter_type<T: Element>(_: &NdIter<'_, T>) -> NpType {
    T::TYPE
}

impl DynIter<'_> {
    pub fn np_type(&self) -> NpType {
        dispatch_variants!(DynIter, self, it => iter_type(it))
    }

    pub fn size(&self) -> usize {
        dispatch_variants!(DynIter, self, it => it.size())
    }

    pub fn has_next(&self) -> bool {
        dispatch_variants!(DynIter, self, it => it.has_next())
    }

    pub fn reset(&mut self) {
        dispatch_variants!(DynIter, self, it => it.reset())
    }

    /// Next element as a tagged [`Value`].
    pub fn move_next(&mut self) -> Option<Value> {
        dispatch_variants!(DynIter, self, it => it.move_next().map(Element::to_value))
    }

    /// Next element converted to `U` with [`Element::cast`] semantics.
    pub fn move_next_as<U: Element>(&mut self) -> Option<U> {
        dispatch_variants!(DynIter, self, it => it.move_next().map(|v| v.cast::<U>()))
    }
}

impl Iterator for DynIter<'_> {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        self.move_next()
    }
}
