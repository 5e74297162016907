use crate::{Enforcer, InvariantError, Shape};

/// Base address plus shape, with no lifetime or access attached.
///
/// All pointer arithmetic uses `wrapping_offset`: deriving a view never dereferences,
/// and one-past-the-end cursors may leave the allocation.
pub(crate) struct RawView<T> {
    ptr: *mut T,
    shape: Shape,
}

impl<T> Clone for RawView<T> {
    fn clone(&self) -> Self {
        Self {
            ptr: self.ptr,
            shape: self.shape.clone(),
        }
    }
}

impl<T> RawView<T> {
    pub(crate) fn new(ptr: *mut T, shape: Shape) -> Self {
        Self { ptr, shape }
    }

    pub(crate) fn ptr(&self) -> *mut T {
        self.ptr
    }

    pub(crate) fn shape(&self) -> &Shape {
        &self.shape
    }

    #[inline]
    pub(crate) fn element_ptr(&self, indices: &[isize]) -> *mut T {
        self.ptr.wrapping_offset(self.shape.index(indices))
    }

    pub(crate) fn checked_element_ptr(&self, indices: &[isize]) -> Result<*mut T, InvariantError> {
        Ok(self.ptr.wrapping_offset(self.shape.try_index(indices)?))
    }

    pub(crate) fn index_outer(&self, i: usize) -> Result<Self, InvariantError> {
        Enforcer::check_rank(&self.shape, 1..=usize::MAX)?;
        Enforcer::normalize_index(0, i as isize, self.shape[0])?;
        let ptr = self.ptr.wrapping_offset(self.shape.index_outer(i as isize));
        Ok(Self::new(ptr, self.shape.minor()))
    }

    pub(crate) fn slice(&self, dim: isize, index: isize) -> Result<Self, InvariantError> {
        let dim = Enforcer::normalize_axis(dim, self.shape.rank())?;
        let index = Enforcer::normalize_index(dim, index, self.shape[dim])?;
        let ptr = self
            .ptr
            .wrapping_offset(self.shape.stride(dim) * index as isize);
        log::trace!("slice {:?} at axis {} index {}", self.shape, dim, index);
        Ok(Self::new(ptr, self.shape.remove_axis(dim)))
    }

    pub(crate) fn slice_range(
        &self,
        dim: isize,
        begin: isize,
        end: isize,
    ) -> Result<Self, InvariantError> {
        let dim = Enforcer::normalize_axis(dim, self.shape.rank())?;
        let (begin, end) = Enforcer::normalize_range(dim, begin, end, self.shape[dim])?;
        let ptr = self
            .ptr
            .wrapping_offset(self.shape.stride(dim) * begin as isize);
        let mut shape = self.shape.clone();
        shape.set_size(dim, end - begin);
        Ok(Self::new(ptr, shape))
    }

    pub(crate) fn squeeze(&self, dim: usize) -> Result<Self, InvariantError> {
        let shape = self.shape.squeeze_dim(dim)?;
        log::trace!("squeeze {:?} at axis {}", self.shape, dim);
        Ok(Self::new(self.ptr, shape))
    }

    pub(crate) fn unsqueeze(&self, dim: usize) -> Result<Self, InvariantError> {
        Enforcer::check_dense(&self.shape)?;
        let shape = self.shape.unsqueeze(dim)?;
        log::trace!("unsqueeze {:?} after axis {}", self.shape, dim);
        Ok(Self::new(self.ptr, shape))
    }

    pub(crate) fn promote(&self, rank: usize) -> Result<Self, InvariantError> {
        Enforcer::check_dense(&self.shape)?;
        if rank < self.shape.rank() {
            return Err(InvariantError::RankMismatch {
                accepted: self.shape.rank()..=usize::MAX,
                actual: rank,
            });
        }
        let shape = self.shape.left_padded(rank);
        log::debug!("promote {:?} to {:?}", self.shape, shape);
        Ok(Self::new(self.ptr, shape))
    }

    /// Rescales to byte units. Always exact.
    pub(crate) fn erase(&self) -> RawView<u8> {
        let shape = self.shape.copy_scaled(std::mem::size_of::<T>(), 1);
        log::debug!(
            "erase {} view {:?} to {:?} bytes",
            std::any::type_name::<T>(),
            self.shape,
            shape
        );
        RawView::new(self.ptr.cast(), shape)
    }

    /// Element `i` of the outermost axis. `i` must be below the outer size.
    pub(crate) fn outer_at(&self, i: usize) -> Self {
        let ptr = self.ptr.wrapping_offset(self.shape.index_outer(i as isize));
        Self::new(ptr, self.shape.minor())
    }

    /// Start and one-past-the-end cursors over the outermost axis.
    pub(crate) fn outer_bounds(&self) -> (*mut T, *mut T, isize, Shape) {
        assert!(
            !self.shape.is_scalar(),
            "Cannot iterate the outer axis of a scalar view"
        );
        let stride = self.shape.stride(0);
        let end = self
            .ptr
            .wrapping_offset(stride * self.shape[0] as isize);
        (self.ptr, end, stride, self.shape.minor())
    }
}

impl RawView<u8> {
    pub(crate) fn retype<U>(&self) -> Result<RawView<U>, InvariantError> {
        let shape = self.shape.try_scaled(1, std::mem::size_of::<U>())?;
        Enforcer::check_alignment::<U>(self.ptr)?;
        log::debug!(
            "retype {:?} bytes to {} view {:?}",
            self.shape,
            std::any::type_name::<U>(),
            shape
        );
        Ok(RawView::new(self.ptr.cast(), shape))
    }
}
