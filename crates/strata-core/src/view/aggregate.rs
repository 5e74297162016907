use bytemuck::Pod;

use super::RawView;
use crate::{Enforcer, FieldLayout, InvariantError, Mutability, TensorView};

impl<T: FieldLayout> RawView<T> {
    /// Views every record as its fields, along a new innermost axis.
    pub(crate) fn unfold(&self) -> Result<RawView<T::Field>, InvariantError> {
        Enforcer::check_layout::<T>()?;
        Enforcer::check_alignment::<T::Field>(self.ptr().cast::<u8>())?;
        let count = T::field_count();
        let mut shape = self.shape().clone();
        for axis in 0..shape.rank() {
            shape.set_stride(axis, shape.stride(axis) * count as isize);
        }
        shape.push_axis(count, 1);
        log::debug!(
            "unfold {:?} of {} into {:?} of {}",
            self.shape(),
            std::any::type_name::<T>(),
            shape,
            std::any::type_name::<T::Field>()
        );
        Ok(RawView::new(self.ptr().cast(), shape))
    }
}

impl<F: Pod> RawView<F> {
    /// Collapses the packed innermost axis into records of `Agg`.
    pub(crate) fn fold<Agg: FieldLayout<Field = F>>(&self) -> Result<RawView<Agg>, InvariantError> {
        Enforcer::check_layout::<Agg>()?;
        let count = Agg::field_count();
        Enforcer::check_fold_axis(self.shape(), count)?;
        let mut shape = self.shape().remove_axis(self.shape().rank() - 1);
        for axis in 0..shape.rank() {
            let stride = shape.stride(axis);
            Enforcer::check_divisible(stride, 1, count)?;
            shape.set_stride(axis, stride / count as isize);
        }
        Enforcer::check_alignment::<Agg>(self.ptr().cast::<u8>())?;
        log::debug!(
            "fold {:?} into {:?} of {}",
            self.shape(),
            shape,
            std::any::type_name::<Agg>()
        );
        Ok(RawView::new(self.ptr().cast(), shape))
    }
}

impl<'a, T: FieldLayout, A: Mutability> TensorView<'a, T, A> {
    /// Exposes the fields of each record on a new innermost axis of size
    /// `T::field_count()`. Outer strides are rescaled to field units.
    pub fn unfold(&self) -> Result<TensorView<'a, T::Field, A>, InvariantError> {
        Ok(TensorView::from_raw(self.raw().unfold()?))
    }
}

impl<'a, F: Pod, A: Mutability> TensorView<'a, F, A> {
    /// Inverse of [`TensorView::unfold`]: the innermost axis must hold exactly one packed
    /// record of `Agg`, and every other stride must be a whole number of records.
    pub fn fold<Agg: FieldLayout<Field = F>>(&self) -> Result<TensorView<'a, Agg, A>, InvariantError> {
        Ok(TensorView::from_raw(self.raw().fold::<Agg>()?))
    }
}
