use bytemuck::Pod;

/// Describes an aggregate made of homogeneous fields, so that a view of aggregates can
/// be unfolded into a view of its fields and folded back.
///
/// Derive it with `#[derive(FieldLayout)]` on a `#[repr(C)]` struct whose fields all
/// share one type.
///
/// # Safety
///
/// `Self` must consist of exactly [`FieldLayout::field_count`] consecutive values of
/// [`FieldLayout::Field`], with no other bytes.
pub unsafe trait FieldLayout: Pod {
    type Field: Pod;

    fn field_count() -> usize;

    /// Whether `size_of::<Self>() == field_count() * size_of::<Self::Field>()`.
    fn byte_size_consistent() -> bool {
        std::mem::size_of::<Self>() == Self::field_count() * std::mem::size_of::<Self::Field>()
    }
}

unsafe impl<F: Pod, const N: usize> FieldLayout for [F; N]
where
    [F; N]: Pod,
{
    type Field = F;

    fn field_count() -> usize {
        N
    }
}

#[cfg(test)]
mod tests {
    use super::FieldLayout;

    #[test]
    fn arrays_are_homogeneous_aggregates() {
        assert_eq!(<[f32; 3] as FieldLayout>::field_count(), 3);
        assert!(<[f32; 3] as FieldLayout>::byte_size_consistent());
        assert!(<[u8; 16] as FieldLayout>::byte_size_consistent());
    }
}
