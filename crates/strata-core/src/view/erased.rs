use std::marker::PhantomData;
use std::ops::Range;

use bytemuck::Pod;

use super::RawView;
use crate::{Access, Enforcer, InvariantError, Mutability, RankKind, ReadOnly, ReadWrite, Shape, TensorView};

/// A view whose element type has been forgotten.
///
/// Sizes and strides are in bytes. An erased view addresses memory but cannot read or
/// write it; [`ErasedView::retype`] recovers a typed view.
///
/// The byte range covered by the typed view it came from travels with it, and a retyped
/// view may not reach outside that range.
pub struct ErasedView<'a, A = ReadOnly> {
    raw: RawView<u8>,
    extent: Range<isize>,
    _marker: PhantomData<(&'a [u8], A)>,
}

pub type ErasedViewMut<'a> = ErasedView<'a, ReadWrite>;

impl<A> Clone for ErasedView<'_, A> {
    fn clone(&self) -> Self {
        Self {
            raw: self.raw.clone(),
            extent: self.extent.clone(),
            _marker: PhantomData,
        }
    }
}

impl<'a, A: Mutability> ErasedView<'a, A> {
    pub(crate) fn from_typed<T>(typed: &RawView<T>) -> Self {
        let width = std::mem::size_of::<T>() as isize;
        let extent = match typed.shape().span() {
            Some((lo, hi)) => lo * width..(hi + 1) * width,
            None => 0..0,
        };
        Self {
            raw: typed.erase(),
            extent,
            _marker: PhantomData,
        }
    }

    pub fn shape(&self) -> &Shape {
        self.raw.shape()
    }

    pub fn rank(&self) -> usize {
        self.shape().rank()
    }

    pub fn kind(&self) -> RankKind {
        self.shape().kind()
    }

    pub fn access(&self) -> Access {
        Access::Erased
    }

    pub fn is_writable(&self) -> bool {
        A::ACCESS.is_writable()
    }

    pub fn as_ptr(&self) -> *const u8 {
        self.raw.ptr()
    }

    /// Reinterprets the bytes as elements of `U`.
    ///
    /// Every size and stride must be a multiple of `size_of::<U>()`, the base address
    /// must be aligned for `U`, and the result must stay inside the erased byte range.
    pub fn retype<U: Pod>(&self) -> Result<TensorView<'a, U, A>, InvariantError> {
        let raw = self.raw.retype::<U>()?;
        Enforcer::check_byte_extent(raw.shape(), std::mem::size_of::<U>(), self.extent.clone())?;
        Ok(TensorView::from_raw(raw))
    }

    /// Byte offsets, relative to the base address, this view may cover.
    pub fn extent(&self) -> Range<isize> {
        self.extent.clone()
    }

    pub fn into_read_only(self) -> ErasedView<'a, ReadOnly> {
        ErasedView {
            raw: self.raw,
            extent: self.extent,
            _marker: PhantomData,
        }
    }
}

impl<A: Mutability> std::fmt::Debug for ErasedView<'_, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErasedView")
            .field("ptr", &self.as_ptr())
            .field("shape", self.shape())
            .field("strides", self.shape().strides())
            .field("extent", &self.extent)
            .field("writable", &self.is_writable())
            .finish()
    }
}
