//! Typed memory blocks.
//!
//! A block is a slice of one supported element type tagged with its
//! [`NpType`]. Kernels receive blocks, check their tags once, and then work on
//! the typed slices directly.

use numcore_traits::{Decimal, Element, NpChar, NpType, Value};

use crate::{Result, ViewError};

/// Borrowed, read-only block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MemoryBlock<'a> {
    Bool(&'a [bool]),
    Int8(&'a [i8]),
    UInt8(&'a [u8]),
    Int16(&'a [i16]),
    UInt16(&'a [u16]),
    Int32(&'a [i32]),
    UInt32(&'a [u32]),
    Int64(&'a [i64]),
    UInt64(&'a [u64]),
    Char(&'a [NpChar]),
    Float32(&'a [f32]),
    Float64(&'a [f64]),
    Decimal(&'a [Decimal]),
}

/// Borrowed, writable block.
#[derive(Debug, PartialEq)]
pub enum MemoryBlockMut<'a> {
    Bool(&'a mut [bool]),
    Int8(&'a mut [i8]),
    UInt8(&'a mut [u8]),
    Int16(&'a mut [i16]),
    UInt16(&'a mut [u16]),
    Int32(&'a mut [i32]),
    UInt32(&'a mut [u32]),
    Int64(&'a mut [i64]),
    UInt64(&'a mut [u64]),
    Char(&'a mut [NpChar]),
    Float32(&'a mut [f32]),
    Float64(&'a mut [f64]),
    Decimal(&'a mut [Decimal]),
}

/// Heap-allocated block.
#[derive(Debug, Clone, PartialEq)]
pub enum OwnedBlock {
    Bool(Vec<bool>),
    Int8(Vec<i8>),
    UInt8(Vec<u8>),
    Int16(Vec<i16>),
    UInt16(Vec<u16>),
    Int32(Vec<i32>),
    UInt32(Vec<u32>),
    Int64(Vec<i64>),
    UInt64(Vec<u64>),
    Char(Vec<NpChar>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
    Decimal(Vec<Decimal>),
}

/// Element types that can be wrapped in and extracted from blocks.
pub trait BlockElement: Element {
    fn wrap(data: &[Self]) -> MemoryBlock<'_>;
    fn wrap_mut(data: &mut [Self]) -> MemoryBlockMut<'_>;
    fn wrap_owned(data: Vec<Self>) -> OwnedBlock;
    fn unwrap<'a>(block: &MemoryBlock<'a>) -> Option<&'a [Self]>;
    fn unwrap_mut<'b>(block: &'b mut MemoryBlockMut<'_>) -> Option<&'b mut [Self]>;
    fn unwrap_owned(block: OwnedBlock) -> std::result::Result<Vec<Self>, OwnedBlock>;
}

macro_rules! impl_block_element {
    ($($t:ty => $v:ident),* $(,)?) => {
        $(
            impl BlockElement for $t {
                #[inline]
                fn wrap(data: &[Self]) -> MemoryBlock<'_> {
                    MemoryBlock::$v(data)
                }

                #[inline]
                fn wrap_mut(data: &mut [Self]) -> MemoryBlockMut<'_> {
                    MemoryBlockMut::$v(data)
                }

                #[inline]
                fn wrap_owned(data: Vec<Self>) -> OwnedBlock {
                    OwnedBlock::$v(data)
                }

                #[inline]
                fn unwrap<'a>(block: &MemoryBlock<'a>) -> Option<&'a [Self]> {
                    match *block {
                        MemoryBlock::$v(s) => Some(s),
                        _ => None,
                    }
                }

                #[inline]
                fn unwrap_mut<'b>(block: &'b mut MemoryBlockMut<'_>) -> Option<&'b mut [Self]> {
                    match block {
                        MemoryBlockMut::$v(s) => Some(&mut **s),
                        _ => None,
                    }
                }

                #[inline]
                fn unwrap_owned(block: OwnedBlock) -> std::result::Result<Vec<Self>, OwnedBlock> {
                    match block {
                        OwnedBlock::$v(v) => Ok(v),
                        other => Err(other),
                    }
                }
            }
        )*
    };
}

impl_block_element!(
    bool => Bool, i8 => Int8, u8 => UInt8, i16 => Int16, u16 => UInt16,
    i32 => Int32, u32 => UInt32, i64 => Int64, u64 => UInt64, NpChar => Char,
    f32 => Float32, f64 => Float64, Decimal => Decimal,
);

fn slice_type<T: Element>(_: &[T]) -> NpType {
    T::TYPE
}

impl<'a> MemoryBlock<'a> {
    pub fn new<T: BlockElement>(data: &'a [T]) -> Self {
        T::wrap(data)
    }

    pub fn np_type(&self) -> NpType {
        dispatch_variants!(MemoryBlock, self, s => slice_type(&**s))
    }

    pub fn len(&self) -> usize {
        dispatch_variants!(MemoryBlock, self, s => s.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element at flat position `i`.
    pub fn get(&self, i: usize) -> Option<Value> {
        dispatch_variants!(MemoryBlock, self, s => s.get(i).map(|v| v.to_value()))
    }

    /// The typed slice, if this block holds `T`.
    pub fn typed<T: BlockElement>(&self) -> Result<&'a [T]> {
        T::unwrap(self).ok_or(ViewError::UnsupportedType {
            expected: T::TYPE,
            found: self.np_type(),
        })
    }
}

impl<'a, T: BlockElement> From<&'a [T]> for MemoryBlock<'a> {
    fn from(data: &'a [T]) -> Self {
        T::wrap(data)
    }
}

impl<'a, T: BlockElement> From<&'a Vec<T>> for MemoryBlock<'a> {
    fn from(data: &'a Vec<T>) -> Self {
        T::wrap(data)
    }
}

impl<'a> MemoryBlockMut<'a> {
    pub fn new<T: BlockElement>(data: &'a mut [T]) -> Self {
        T::wrap_mut(data)
    }

    pub fn np_type(&self) -> NpType {
        dispatch_variants!(MemoryBlockMut, self, s => slice_type(&**s))
    }

    pub fn len(&self) -> usize {
        dispatch_variants!(MemoryBlockMut, self, s => s.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read-only reborrow.
    pub fn as_block(&self) -> MemoryBlock<'_> {
        dispatch_variants!(MemoryBlockMut, self, s => MemoryBlock::new(&**s))
    }

    /// The typed slice, if this block holds `T`.
    pub fn typed_mut<T: BlockElement>(&mut self) -> Result<&mut [T]> {
        let found = self.np_type();
        T::unwrap_mut(self).ok_or(ViewError::UnsupportedType {
            expected: T::TYPE,
            found,
        })
    }
}

impl<'a, T: BlockElement> From<&'a mut [T]> for MemoryBlockMut<'a> {
    fn from(data: &'a mut [T]) -> Self {
        T::wrap_mut(data)
    }
}

impl OwnedBlock {
    pub fn from_vec<T: BlockElement>(data: Vec<T>) -> Self {
        T::wrap_owned(data)
    }

    /// `len` default values (zero / false) of `np_type`.
    pub fn zeros(np_type: NpType, len: usize) -> Self {
        numcore_traits::with_np_type!(np_type, T => T::wrap_owned(vec![T::default(); len]))
    }

    pub fn np_type(&self) -> NpType {
        self.as_block().np_type()
    }

    pub fn len(&self) -> usize {
        dispatch_variants!(OwnedBlock, self, v => v.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, i: usize) -> Option<Value> {
        self.as_block().get(i)
    }

    pub fn as_block(&self) -> MemoryBlock<'_> {
        dispatch_variants!(OwnedBlock, self, v => MemoryBlock::new(v.as_slice()))
    }

    pub fn as_block_mut(&mut self) -> MemoryBlockMut<'_> {
        dispatch_variants!(OwnedBlock, self, v => MemoryBlockMut::new(v.as_mut_slice()))
    }

    pub fn typed<T: BlockElement>(&self) -> Result<&[T]> {
        self.as_block().typed()
    }

    pub fn into_vec<T: BlockElement>(self) -> Result<Vec<T>> {
        T::unwrap_owned(self).map_err(|block| ViewError::UnsupportedType {
            expected: T::TYPE,
            found: block.np_type(),
        })
    }

    /// All elements as dynamic values.
    pub fn to_values(&self) -> Vec<Value> {
        dispatch_variants!(OwnedBlock, self, v => v.iter().map(|x| x.to_value()).collect())
    }
}

impl<T: BlockElement> From<Vec<T>> for OwnedBlock {
    fn from(data: Vec<T>) -> Self {
        T::wrap_owned(data)
    }
}
