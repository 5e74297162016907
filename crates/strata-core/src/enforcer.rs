use std::ops::{Range, RangeInclusive};

use crate::{FieldLayout, Shape};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantError {
    #[error("Rank mismatch. {accepted:?} != {actual}.")]
    RankMismatch {
        accepted: RangeInclusive<usize>,
        actual: usize,
    },
    #[error("Wrong number of indices, expected {expected}, got {actual}.")]
    WrongNumberOfIndices { expected: usize, actual: usize },
    #[error("Index {index} out of bounds for axis {axis} of size {size}.")]
    IndexOutOfBounds {
        axis: usize,
        index: isize,
        size: usize,
    },
    #[error("Slice {begin}..{end} out of bounds for axis {axis} of size {size}.")]
    SliceOutOfBounds {
        axis: usize,
        begin: isize,
        end: isize,
        size: usize,
    },
    #[error("Axis {axis} out of bounds for rank {rank}.")]
    AxisOutOfBounds { axis: isize, rank: usize },
    #[error("Cannot squeeze axis {axis} of size {size}.")]
    NonUnitSqueeze { axis: usize, size: usize },
    #[error("Size mismatch at axis {axis}, {src} != {dst}.")]
    SizeMismatch { axis: usize, src: usize, dst: usize },
    #[error("{value} * {numerator} is not divisible by {denominator}.")]
    IndivisibleScale {
        value: isize,
        numerator: usize,
        denominator: usize,
    },
    #[error("Address {addr:#x} is not aligned to {align} bytes.")]
    Misaligned { addr: usize, align: usize },
    #[error("Fold axis must be packed, found stride {stride}.")]
    NonContiguousFold { stride: isize },
    #[error("Fold axis has size {actual}, aggregate has {expected} fields.")]
    FieldCountMismatch { expected: usize, actual: usize },
    #[error("Aggregate of {aggregate} bytes is not {count} fields of {field} bytes.")]
    InconsistentLayout {
        aggregate: usize,
        count: usize,
        field: usize,
    },
    #[error("Cannot promote non-dense shape {0:?}.")]
    NonDensePromotion(Shape),
    #[error("Buffer of {len} elements cannot hold shape {shape:?} with strides {strides:?}.")]
    BufferTooSmall {
        len: usize,
        shape: Shape,
        strides: Vec<isize>,
    },
    #[error("View reaches bytes {lo}..{hi}, outside of {extent:?}.")]
    ExtentExceeded {
        lo: isize,
        hi: isize,
        extent: Range<isize>,
    },
    #[error("Got {strides} strides for {dims} dims.")]
    StrideCountMismatch { dims: usize, strides: usize },
}

/// # Enforcer
///
/// Enforcer checks the preconditions of shape and view derivations.
pub struct Enforcer;

impl Enforcer {
    pub fn check_rank(
        shape: &Shape,
        accepted: RangeInclusive<usize>,
    ) -> Result<(), InvariantError> {
        let actual = shape.rank();
        if !accepted.contains(&actual) {
            return Err(InvariantError::RankMismatch { accepted, actual });
        }
        Ok(())
    }

    pub fn check_stride_count(dims: usize, strides: usize) -> Result<(), InvariantError> {
        if dims != strides {
            return Err(InvariantError::StrideCountMismatch { dims, strides });
        }
        Ok(())
    }

    /// Resolves a possibly negative axis against `rank`.
    pub fn normalize_axis(axis: isize, rank: usize) -> Result<usize, InvariantError> {
        let resolved = if axis < 0 { rank as isize + axis } else { axis };
        if resolved < 0 || resolved >= rank as isize {
            return Err(InvariantError::AxisOutOfBounds { axis, rank });
        }
        Ok(resolved as usize)
    }

    /// Resolves a possibly negative index against the size of `axis`.
    pub fn normalize_index(axis: usize, index: isize, size: usize) -> Result<usize, InvariantError> {
        let resolved = if index < 0 { size as isize + index } else { index };
        if resolved < 0 || resolved >= size as isize {
            return Err(InvariantError::IndexOutOfBounds { axis, index, size });
        }
        Ok(resolved as usize)
    }

    pub fn check_indices(shape: &Shape, indices: &[isize]) -> Result<(), InvariantError> {
        if indices.len() != shape.rank() {
            return Err(InvariantError::WrongNumberOfIndices {
                expected: shape.rank(),
                actual: indices.len(),
            });
        }
        for (axis, (&index, &size)) in indices.iter().zip(shape.dims()).enumerate() {
            Self::normalize_index(axis, index, size)?;
        }
        Ok(())
    }

    /// Resolves `begin..end` against the size of `axis`. `end` may equal the size.
    pub fn normalize_range(
        axis: usize,
        begin: isize,
        end: isize,
        size: usize,
    ) -> Result<(usize, usize), InvariantError> {
        let resolve = |i: isize| if i < 0 { size as isize + i } else { i };
        let (b, e) = (resolve(begin), resolve(end));
        if b < 0 || b > e || e > size as isize {
            return Err(InvariantError::SliceOutOfBounds {
                axis,
                begin,
                end,
                size,
            });
        }
        Ok((b as usize, e as usize))
    }

    pub fn check_unit_axis(shape: &Shape, axis: usize) -> Result<(), InvariantError> {
        if axis >= shape.rank() {
            return Err(InvariantError::AxisOutOfBounds {
                axis: axis as isize,
                rank: shape.rank(),
            });
        }
        let size = shape[axis];
        if size != 1 {
            return Err(InvariantError::NonUnitSqueeze { axis, size });
        }
        Ok(())
    }

    /// Every axis of `src` must match `dst`, starting from the outermost.
    pub fn check_copy_shapes(src: &Shape, dst: &Shape) -> Result<(), InvariantError> {
        if src.rank() != dst.rank() {
            return Err(InvariantError::RankMismatch {
                accepted: dst.rank()..=dst.rank(),
                actual: src.rank(),
            });
        }
        for (axis, (&s, &d)) in src.dims().iter().zip(dst.dims()).enumerate() {
            if s != d {
                return Err(InvariantError::SizeMismatch {
                    axis,
                    src: s,
                    dst: d,
                });
            }
        }
        Ok(())
    }

    pub fn check_divisible(
        value: isize,
        numerator: usize,
        denominator: usize,
    ) -> Result<(), InvariantError> {
        if denominator == 0 || (value * numerator as isize) % denominator as isize != 0 {
            return Err(InvariantError::IndivisibleScale {
                value,
                numerator,
                denominator,
            });
        }
        Ok(())
    }

    pub fn check_alignment<U>(ptr: *const u8) -> Result<(), InvariantError> {
        let (addr, align) = (ptr as usize, std::mem::align_of::<U>());
        if addr % align != 0 {
            return Err(InvariantError::Misaligned { addr, align });
        }
        Ok(())
    }

    pub fn check_dense(shape: &Shape) -> Result<(), InvariantError> {
        if !shape.is_continuous() {
            return Err(InvariantError::NonDensePromotion(shape.clone()));
        }
        Ok(())
    }

    pub fn check_layout<A: FieldLayout>() -> Result<(), InvariantError> {
        if !A::byte_size_consistent() {
            return Err(InvariantError::InconsistentLayout {
                aggregate: std::mem::size_of::<A>(),
                count: A::field_count(),
                field: std::mem::size_of::<A::Field>(),
            });
        }
        Ok(())
    }

    /// The innermost axis of a flat field view must hold exactly one packed record.
    pub fn check_fold_axis(shape: &Shape, field_count: usize) -> Result<(), InvariantError> {
        Self::check_rank(shape, 1..=usize::MAX)?;
        let last = shape.rank() - 1;
        if shape[last] != field_count {
            return Err(InvariantError::FieldCountMismatch {
                expected: field_count,
                actual: shape[last],
            });
        }
        let stride = shape.stride(last);
        if stride != 1 {
            return Err(InvariantError::NonContiguousFold { stride });
        }
        Ok(())
    }

    /// Every address reachable through in-range indices must fall inside a buffer of
    /// `len` elements.
    pub fn check_extent(shape: &Shape, len: usize) -> Result<(), InvariantError> {
        if let Some((lo, hi)) = shape.span() {
            if lo < 0 || hi >= len as isize {
                return Err(InvariantError::BufferTooSmall {
                    len,
                    shape: shape.clone(),
                    strides: shape.strides().to_vec(),
                });
            }
        }
        Ok(())
    }

    /// The bytes reachable through `shape`, with elements `width` bytes wide, must lie
    /// inside `extent`.
    pub fn check_byte_extent(
        shape: &Shape,
        width: usize,
        extent: Range<isize>,
    ) -> Result<(), InvariantError> {
        if let Some((lo, hi)) = shape.span() {
            let width = width as isize;
            let (lo, hi) = (lo * width, (hi + 1) * width);
            if lo < extent.start || hi > extent.end {
                return Err(InvariantError::ExtentExceeded { lo, hi, extent });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape;

    #[test]
    fn normalize_negative_axis() {
        assert_eq!(Enforcer::normalize_axis(-1, 3).unwrap(), 2);
        assert_eq!(Enforcer::normalize_axis(-3, 3).unwrap(), 0);
        assert!(matches!(
            Enforcer::normalize_axis(-4, 3),
            Err(InvariantError::AxisOutOfBounds { axis: -4, rank: 3 })
        ));
    }

    #[test]
    fn normalize_range_allows_full_axis() {
        assert_eq!(Enforcer::normalize_range(0, 0, 5, 5).unwrap(), (0, 5));
        assert_eq!(Enforcer::normalize_range(0, -2, 5, 5).unwrap(), (3, 5));
        assert_eq!(Enforcer::normalize_range(0, 2, 2, 5).unwrap(), (2, 2));
        assert!(Enforcer::normalize_range(0, 3, 2, 5).is_err());
        assert!(Enforcer::normalize_range(0, 0, 6, 5).is_err());
    }

    #[test]
    fn divisibility_rejects_zero_denominator() {
        assert!(Enforcer::check_divisible(4, 1, 0).is_err());
        assert!(Enforcer::check_divisible(8, 1, 4).is_ok());
        assert!(Enforcer::check_divisible(6, 1, 4).is_err());
        assert!(Enforcer::check_divisible(-8, 1, 4).is_ok());
    }

    #[test]
    fn extent_of_dense_shape() {
        let shape = shape![5, 4];
        assert!(Enforcer::check_extent(&shape, 20).is_ok());
        assert!(matches!(
            Enforcer::check_extent(&shape, 19),
            Err(InvariantError::BufferTooSmall { len: 19, .. })
        ));
        assert!(Enforcer::check_extent(&shape![0, 4], 0).is_ok());
    }
}
