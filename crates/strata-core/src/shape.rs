use crate::{rvec, Enforcer, InvariantError, RVec, RankKind, Strides};

/// Sizes and signed strides of every axis, in element units.
///
/// A rank 0 shape has no axes and addresses exactly one element.
#[derive(Clone, Default)]
pub struct Shape {
    dims: RVec<usize>,
    strides: Strides,
}

impl Shape {
    /// Densely packed, row-major shape.
    pub fn new(dims: RVec<usize>) -> Self {
        let strides = Strides::dense(&dims);
        Self { dims, strides }
    }

    pub fn scalar() -> Self {
        Self::default()
    }

    /// Shape with caller supplied strides, for non-dense layouts.
    pub fn with_strides(dims: RVec<usize>, strides: Strides) -> Result<Self, InvariantError> {
        Enforcer::check_stride_count(dims.len(), strides.len())?;
        Ok(Self { dims, strides })
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    pub fn strides(&self) -> &Strides {
        &self.strides
    }

    pub fn stride(&self, dim: usize) -> isize {
        self.strides[dim]
    }

    pub fn set_size(&mut self, dim: usize, size: usize) {
        self.dims[dim] = size;
    }

    pub fn set_stride(&mut self, dim: usize, stride: isize) {
        self.strides[dim] = stride;
    }

    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    pub fn is_scalar(&self) -> bool {
        self.dims.is_empty()
    }

    pub fn kind(&self) -> RankKind {
        match self.rank() {
            0 => RankKind::Scalar,
            1 if self.strides[0] == 1 => RankKind::Dense1D,
            _ => RankKind::StridedND,
        }
    }

    pub fn numel(&self) -> usize {
        self.dims.iter().product()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, usize> {
        self.dims.iter()
    }

    /// Resets the strides to the row-major packing of the current sizes.
    pub fn recompute_strides(&mut self) {
        self.strides = Strides::dense(&self.dims);
    }

    /// True iff the strides are exactly the row-major packing of the sizes.
    pub fn is_continuous(&self) -> bool {
        self.strides == Strides::dense(&self.dims)
    }

    /// Offset of the element at `indices`, one per axis. Negative indices count back
    /// from the end of their axis.
    ///
    /// The hot path: indices are only range checked in debug builds or with the
    /// `bounds-check` feature, where a violation panics.
    #[inline]
    pub fn index(&self, indices: &[isize]) -> isize {
        #[cfg(any(debug_assertions, feature = "bounds-check"))]
        if let Err(e) = Enforcer::check_indices(self, indices) {
            panic!("{}", e);
        }
        self.offset_of(indices)
    }

    /// Checked variant of [`Shape::index`].
    pub fn try_index(&self, indices: &[isize]) -> Result<isize, InvariantError> {
        Enforcer::check_indices(self, indices)?;
        Ok(self.offset_of(indices))
    }

    #[inline]
    fn offset_of(&self, indices: &[isize]) -> isize {
        indices
            .iter()
            .zip(self.dims.iter().zip(self.strides.iter()))
            .map(|(&idx, (&size, &stride))| stride * rev_index(idx, size))
            .sum()
    }

    /// Steps `idx` positions along the outermost axis only.
    pub fn index_outer(&self, idx: isize) -> isize {
        match self.strides.inner().first() {
            Some(stride) => stride * idx,
            None => 0,
        }
    }

    /// Translates a dense, C-order flat offset into the offset of the same logical
    /// element under this shape's strides. An empty shape has no elements and maps
    /// everything to 0.
    pub fn linear_index(&self, flat: usize) -> isize {
        if self.numel() == 0 {
            return 0;
        }
        let mut rem = flat;
        let mut out = 0;
        for (&size, &stride) in self.dims.iter().zip(self.strides.iter()).skip(1).rev() {
            out += stride * (rem % size) as isize;
            rem /= size;
        }
        out + self.index_outer(rem as isize)
    }

    /// Drops the outermost axis, keeping the remaining sizes and strides.
    pub fn minor(&self) -> Shape {
        assert!(!self.is_scalar(), "Cannot strip the outer axis of a scalar");
        Shape {
            dims: self.dims[1..].into(),
            strides: Strides::from(&self.strides.inner()[1..]),
        }
    }

    /// Multiplies every size and stride by `numerator / denominator`, truncating.
    pub fn copy_scaled(&self, numerator: usize, denominator: usize) -> Shape {
        let dims = self
            .dims
            .iter()
            .map(|&d| d * numerator / denominator)
            .collect();
        let strides = self
            .strides
            .iter()
            .map(|&s| s * numerator as isize / denominator as isize)
            .collect::<RVec<_>>();
        Shape {
            dims,
            strides: Strides::new(strides),
        }
    }

    /// [`Shape::copy_scaled`], refusing any size or stride that would truncate.
    pub fn try_scaled(&self, numerator: usize, denominator: usize) -> Result<Shape, InvariantError> {
        for &d in self.dims.iter() {
            Enforcer::check_divisible(d as isize, numerator, denominator)?;
        }
        for &s in self.strides.iter() {
            Enforcer::check_divisible(s, numerator, denominator)?;
        }
        Ok(self.copy_scaled(numerator, denominator))
    }

    /// Removes the unit axis `dim`.
    pub fn squeeze_dim(&self, dim: usize) -> Result<Shape, InvariantError> {
        Enforcer::check_unit_axis(self, dim)?;
        Ok(self.remove_axis(dim))
    }

    pub(crate) fn remove_axis(&self, dim: usize) -> Shape {
        let mut out = self.clone();
        out.dims.remove(dim);
        out.strides.remove(dim);
        out
    }

    /// Inserts a unit axis after `dim`.
    ///
    /// Strides are recomputed densely from the new sizes, so a non-dense input does not
    /// keep its layout. A rank 0 input becomes `[1]`.
    pub fn unsqueeze(&self, dim: usize) -> Result<Shape, InvariantError> {
        if self.is_scalar() {
            return Ok(Shape::new(rvec![1]));
        }
        if dim >= self.rank() {
            return Err(InvariantError::AxisOutOfBounds {
                axis: dim as isize,
                rank: self.rank(),
            });
        }
        if !self.is_continuous() {
            log::warn!("unsqueeze of non-dense shape {:?} discards its strides", self);
        }
        let mut dims = self.dims.clone();
        dims.insert(dim + 1, 1);
        Ok(Shape::new(dims))
    }

    /// Promotes to `rank` by prepending unit axes. The new outer strides span the whole
    /// of the current shape's outermost axis.
    pub fn left_padded(&self, rank: usize) -> Shape {
        let span = match (self.dims.first(), self.strides.inner().first()) {
            (Some(&size), Some(&stride)) => size as isize * stride,
            _ => 1,
        };
        let mut out = self.clone();
        while out.rank() < rank {
            out.dims.insert(0, 1);
            out.strides.insert(0, span);
        }
        out
    }

    pub(crate) fn push_axis(&mut self, size: usize, stride: isize) {
        self.dims.push(size);
        self.strides.push(stride);
    }

    /// Lowest and highest offsets reachable through in-range indices, or `None` when
    /// some axis is empty.
    pub(crate) fn span(&self) -> Option<(isize, isize)> {
        let mut lo = 0;
        let mut hi = 0;
        for (&size, &stride) in self.dims.iter().zip(self.strides.iter()) {
            if size == 0 {
                return None;
            }
            let reach = stride * (size as isize - 1);
            if reach < 0 {
                lo += reach;
            } else {
                hi += reach;
            }
        }
        Some((lo, hi))
    }
}

/// Counts negative indices back from `size`.
#[inline]
pub fn rev_index(idx: isize, size: usize) -> isize {
    if idx < 0 {
        size as isize + idx
    } else {
        idx
    }
}

/// Shapes compare by sizes only.
impl PartialEq for Shape {
    fn eq(&self, other: &Self) -> bool {
        self.dims == other.dims
    }
}

impl Eq for Shape {}

impl std::hash::Hash for Shape {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.dims.hash(state);
    }
}

impl std::fmt::Debug for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut shape = String::from("[");
        for (i, dim) in self.dims.iter().enumerate() {
            if i > 0 {
                shape.push('x');
            }
            shape.push_str(&dim.to_string());
        }
        write!(f, "{}]", shape)
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn join<T: ToString>(items: impl Iterator<Item = T>) -> String {
            items.map(|i| i.to_string()).collect::<Vec<_>>().join(" ")
        }
        write!(
            f,
            "size: {}\nstride: {}",
            join(self.dims.iter()),
            join(self.strides.iter())
        )
    }
}

impl std::ops::Index<usize> for Shape {
    type Output = usize;

    fn index(&self, index: usize) -> &Self::Output {
        &self.dims[index]
    }
}

impl From<Vec<usize>> for Shape {
    fn from(shape: Vec<usize>) -> Self {
        Self::new(shape.into())
    }
}

impl From<&[usize]> for Shape {
    fn from(slice: &[usize]) -> Self {
        Self::new(slice.into())
    }
}

macro_rules! impl_try_into_for_shape {
    ($($N:expr),*) => {
        $(
            impl TryInto<[usize; $N]> for &Shape {
                type Error = anyhow::Error;

                fn try_into(self) -> Result<[usize; $N], Self::Error> {
                    if self.dims.len() == $N {
                        let mut arr = [0; $N];
                        for (i, &item) in self.dims.iter().enumerate().take($N) {
                            arr[i] = item;
                        }
                        Ok(arr)
                    } else {
                        Err(anyhow::anyhow!("Shape has length {} but expected {}", self.dims.len(), $N))
                    }
                }
            }
        )*
    };
}

impl_try_into_for_shape!(0, 1, 2, 3, 4);
