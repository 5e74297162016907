use std::marker::PhantomData;

use bytemuck::Pod;

use super::{AxisCursor, AxisIter, ErasedView, RawView};
use crate::{
    rvec, Access, Enforcer, InvariantError, Mutability, RankKind, ReadOnly, ReadWrite, Shape,
};

/// A non-owning, strided view of elements of type `T`.
///
/// The view is a base address plus a [`Shape`]. It borrows the buffer it was built
/// from for `'a` but never owns it; any number of views may alias the same region.
/// Elements are always read and written by value, so aliasing writable views are fine
/// as long as they stay on one thread (views are neither `Send` nor `Sync`).
///
/// `A` is [`ReadOnly`] or [`ReadWrite`]; see [`TensorViewMut`].
pub struct TensorView<'a, T, A = ReadOnly> {
    raw: RawView<T>,
    _marker: PhantomData<(&'a [T], A)>,
}

/// A [`TensorView`] that may also write.
pub type TensorViewMut<'a, T> = TensorView<'a, T, ReadWrite>;

impl<T, A> Clone for TensorView<'_, T, A> {
    fn clone(&self) -> Self {
        Self {
            raw: self.raw.clone(),
            _marker: PhantomData,
        }
    }
}

impl<'a, T: Pod> TensorView<'a, T, ReadOnly> {
    /// Views `data` under `shape`. Fails if some in-range index would leave `data`.
    pub fn from_slice(data: &'a [T], shape: Shape) -> Result<Self, InvariantError> {
        Enforcer::check_extent(&shape, data.len())?;
        Ok(Self::from_raw(RawView::new(data.as_ptr() as *mut T, shape)))
    }

    /// Views `data` as a dense rank 1 array.
    pub fn from_linear(data: &'a [T]) -> Self {
        let shape = Shape::new(rvec![data.len()]);
        Self::from_raw(RawView::new(data.as_ptr() as *mut T, shape))
    }

    /// Views a single element as a rank 0 array.
    pub fn scalar(value: &'a T) -> Self {
        Self::from_raw(RawView::new(value as *const T as *mut T, Shape::scalar()))
    }

    /// # Safety
    ///
    /// Every address `ptr + shape.index(i)` for in-range `i` must be valid for reads of
    /// `T` for `'a`, and must not be written through any `&mut` for that long.
    pub unsafe fn from_raw_parts(ptr: *const T, shape: Shape) -> Self {
        Self::from_raw(RawView::new(ptr as *mut T, shape))
    }
}

impl<'a, T: Pod> TensorView<'a, T, ReadWrite> {
    /// Views `data` under `shape`. Fails if some in-range index would leave `data`.
    pub fn from_slice_mut(data: &'a mut [T], shape: Shape) -> Result<Self, InvariantError> {
        Enforcer::check_extent(&shape, data.len())?;
        Ok(Self::from_raw(RawView::new(data.as_mut_ptr(), shape)))
    }

    /// Views `data` as a dense rank 1 array.
    pub fn from_linear_mut(data: &'a mut [T]) -> Self {
        let shape = Shape::new(rvec![data.len()]);
        Self::from_raw(RawView::new(data.as_mut_ptr(), shape))
    }

    /// Views a single element as a rank 0 array.
    pub fn scalar_mut(value: &'a mut T) -> Self {
        Self::from_raw(RawView::new(value as *mut T, Shape::scalar()))
    }

    /// # Safety
    ///
    /// Every address `ptr + shape.index(i)` for in-range `i` must be valid for reads and
    /// writes of `T` for `'a`, and must not be accessed through any reference for that
    /// long.
    pub unsafe fn from_raw_parts_mut(ptr: *mut T, shape: Shape) -> Self {
        Self::from_raw(RawView::new(ptr, shape))
    }

    pub fn as_mut_ptr(&self) -> *mut T {
        self.raw.ptr()
    }

    /// Writes `value` at `indices`.
    ///
    /// # Panics
    ///
    /// If `indices` does not address an element of the view.
    pub fn set(&mut self, indices: &[isize], value: T) {
        if let Err(e) = self.try_set(indices, value) {
            panic!("{}", e);
        }
    }

    pub fn try_set(&mut self, indices: &[isize], value: T) -> Result<(), InvariantError> {
        let ptr = self.raw.checked_element_ptr(indices)?;
        unsafe { ptr.write(value) };
        Ok(())
    }

    /// Writes `value` at `indices` without range checks outside debug builds.
    ///
    /// # Safety
    ///
    /// `indices` must address an element of the view.
    pub unsafe fn set_unchecked(&mut self, indices: &[isize], value: T) {
        self.raw.element_ptr(indices).write(value)
    }

    /// Copies `src` into this view element by element, outer axis first.
    pub fn assign<B: Mutability>(&mut self, src: &TensorView<'_, T, B>) -> Result<(), InvariantError> {
        src.copy_to(self)
    }

    pub fn as_read_only(&self) -> TensorView<'a, T, ReadOnly> {
        TensorView::from_raw(self.raw.clone())
    }

    pub fn into_read_only(self) -> TensorView<'a, T, ReadOnly> {
        TensorView::from_raw(self.raw)
    }
}

impl<'a, T: Pod, A: Mutability> TensorView<'a, T, A> {
    pub(crate) fn from_raw(raw: RawView<T>) -> Self {
        Self {
            raw,
            _marker: PhantomData,
        }
    }

    pub(crate) fn raw(&self) -> &RawView<T> {
        &self.raw
    }

    pub fn shape(&self) -> &Shape {
        self.raw.shape()
    }

    pub fn rank(&self) -> usize {
        self.shape().rank()
    }

    pub fn numel(&self) -> usize {
        self.shape().numel()
    }

    pub fn kind(&self) -> RankKind {
        self.shape().kind()
    }

    pub fn access(&self) -> Access {
        A::ACCESS
    }

    pub fn as_ptr(&self) -> *const T {
        self.raw.ptr()
    }

    /// Address of the element at `indices`. Range checked in debug builds only.
    pub fn ptr_at(&self, indices: &[isize]) -> *const T {
        self.raw.element_ptr(indices)
    }

    /// Reads the element at `indices`; negative indices count back from the end.
    ///
    /// # Panics
    ///
    /// If `indices` does not address an element of the view.
    pub fn at(&self, indices: &[isize]) -> T {
        match self.get(indices) {
            Ok(value) => value,
            Err(e) => panic!("{}", e),
        }
    }

    pub fn get(&self, indices: &[isize]) -> Result<T, InvariantError> {
        let ptr = self.raw.checked_element_ptr(indices)?;
        Ok(unsafe { ptr.read() })
    }

    /// Reads the element at `indices` without range checks outside debug builds.
    ///
    /// # Safety
    ///
    /// `indices` must address an element of the view.
    pub unsafe fn at_unchecked(&self, indices: &[isize]) -> T {
        self.raw.element_ptr(indices).read()
    }

    /// The single element of a rank 0 view.
    pub fn item(&self) -> T {
        self.at(&[])
    }

    /// Element `i` of the outermost axis, one rank lower. At rank 1 this is a rank 0
    /// view of the element.
    pub fn index_outer(&self, i: usize) -> Result<Self, InvariantError> {
        Ok(Self::from_raw(self.raw.index_outer(i)?))
    }

    /// Fixes axis `dim` at `index`, dropping that axis. Both may be negative.
    pub fn slice(&self, dim: isize, index: isize) -> Result<Self, InvariantError> {
        Ok(Self::from_raw(self.raw.slice(dim, index)?))
    }

    /// Restricts axis `dim` to `begin..end`, keeping the rank. All may be negative.
    pub fn slice_range(&self, dim: isize, begin: isize, end: isize) -> Result<Self, InvariantError> {
        Ok(Self::from_raw(self.raw.slice_range(dim, begin, end)?))
    }

    /// Drops the unit axis `dim`.
    pub fn squeeze(&self, dim: usize) -> Result<Self, InvariantError> {
        Ok(Self::from_raw(self.raw.squeeze(dim)?))
    }

    /// Inserts a unit axis after `dim`. Only densely strided views can be unsqueezed.
    pub fn unsqueeze(&self, dim: usize) -> Result<Self, InvariantError> {
        Ok(Self::from_raw(self.raw.unsqueeze(dim)?))
    }

    /// Widens to `rank` by prepending unit axes. Only densely strided views can be
    /// promoted.
    pub fn promote(&self, rank: usize) -> Result<Self, InvariantError> {
        Ok(Self::from_raw(self.raw.promote(rank)?))
    }

    /// Forgets the element type; the shape is rescaled to byte units.
    pub fn erase(&self) -> ErasedView<'a, A> {
        ErasedView::from_typed(&self.raw)
    }

    /// Copies this view into `dst` element by element, outer axis first.
    ///
    /// Every axis must match in size; nothing is written otherwise.
    pub fn copy_to(&self, dst: &mut TensorViewMut<'_, T>) -> Result<(), InvariantError> {
        Enforcer::check_copy_shapes(self.shape(), dst.shape())?;
        self.copy_unchecked(dst)
    }

    fn copy_unchecked(&self, dst: &mut TensorViewMut<'_, T>) -> Result<(), InvariantError> {
        match self.kind() {
            RankKind::Scalar => dst.try_set(&[], self.item()),
            _ => {
                for (src, mut dst) in self.outer_views().zip(dst.outer_views()) {
                    src.copy_unchecked(&mut dst)?;
                }
                Ok(())
            }
        }
    }

    /// Every element of the outermost axis, counted by index rather than by address, so
    /// a zero outer stride still visits each position.
    pub(crate) fn outer_views(&self) -> impl Iterator<Item = Self> + '_ {
        let size = self.shape().dims().first().copied().unwrap_or(0);
        (0..size).map(move |i| Self::from_raw(self.raw.outer_at(i)))
    }

    /// Cursor at the first element of the outermost axis.
    pub fn begin(&self) -> AxisCursor<'a, T, A> {
        let (begin, _, stride, minor) = self.raw.outer_bounds();
        AxisCursor::new(begin, stride, self.shape()[0], minor)
    }

    /// Cursor one step past the last element of the outermost axis.
    pub fn end(&self) -> AxisCursor<'a, T, A> {
        let (_, end, stride, minor) = self.raw.outer_bounds();
        AxisCursor::new(end, stride, 0, minor)
    }

    /// Iterates the outermost axis, yielding views one rank lower.
    ///
    /// # Panics
    ///
    /// If the view is rank 0.
    pub fn iter(&self) -> AxisIter<'a, T, A> {
        AxisIter::new(self.begin(), self.end())
    }

    /// Gathers the viewed elements in row-major order.
    pub fn to_vec(&self) -> Vec<T> {
        match self.kind() {
            RankKind::Scalar => vec![self.item()],
            RankKind::Dense1D => {
                let len = self.numel();
                if len == 0 {
                    return vec![];
                }
                unsafe { std::slice::from_raw_parts(self.as_ptr(), len) }.to_vec()
            }
            RankKind::StridedND => {
                let mut out = Vec::with_capacity(self.numel());
                for sub in self.outer_views() {
                    out.extend(sub.to_vec());
                }
                out
            }
        }
    }
}

impl<'a, T: Pod, A: Mutability> IntoIterator for &TensorView<'a, T, A> {
    type Item = TensorView<'a, T, A>;
    type IntoIter = AxisIter<'a, T, A>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Pod, A: Mutability> std::fmt::Debug for TensorView<'_, T, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TensorView")
            .field("dtype", &std::any::type_name::<T>())
            .field("ptr", &self.as_ptr())
            .field("shape", self.shape())
            .field("strides", self.shape().strides())
            .field("kind", &self.kind())
            .field("access", &self.access())
            .finish()
    }
}
