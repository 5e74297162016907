use crate::{rvec, RVec};

/// Per-axis element strides. Signed, so that reversed layouts can be described.
#[derive(Clone, PartialEq, Eq, Default, Hash)]
pub struct Strides(RVec<isize>);

impl Strides {
    pub fn new(strides: RVec<isize>) -> Self {
        Self(strides)
    }

    /// Row-major strides for `dims`: the innermost axis is packed, every outer
    /// stride is the product of all strictly-inner sizes.
    pub fn dense(dims: &[usize]) -> Self {
        let mut strides = rvec![];
        let mut stride = 1;
        for size in dims.iter().rev() {
            strides.push(stride);
            stride *= *size as isize;
        }
        strides.reverse();
        Self(strides)
    }

    pub fn inner(&self) -> &RVec<isize> {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, isize> {
        self.0.iter()
    }

    pub fn to_vec(&self) -> Vec<isize> {
        self.0.to_vec()
    }

    pub(crate) fn insert(&mut self, index: usize, stride: isize) {
        self.0.insert(index, stride);
    }

    pub(crate) fn remove(&mut self, index: usize) -> isize {
        self.0.remove(index)
    }

    pub(crate) fn push(&mut self, stride: isize) {
        self.0.push(stride);
    }
}

impl std::fmt::Debug for Strides {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut strides = String::from("[");
        for (i, stride) in self.0.iter().enumerate() {
            if i > 0 {
                strides.push('x');
            }
            strides.push_str(&stride.to_string());
        }
        write!(f, "{}]", strides)
    }
}

impl std::ops::Index<usize> for Strides {
    type Output = isize;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl std::ops::IndexMut<usize> for Strides {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.0[index]
    }
}

impl From<Vec<isize>> for Strides {
    fn from(strides: Vec<isize>) -> Self {
        Self(strides.into())
    }
}

impl From<&[isize]> for Strides {
    fn from(strides: &[isize]) -> Self {
        Self(strides.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dense_strides() {
        let strides = Strides::dense(&[2, 3, 4]);
        assert_eq!(strides.to_vec(), vec![12, 4, 1]);
    }

    #[test]
    fn test_dense_strides_scalar() {
        assert!(Strides::dense(&[]).is_empty());
    }

    #[test]
    fn test_debug() {
        let strides = Strides::from(vec![24, 6, 2, 1]);
        assert_eq!(format!("{:?}", strides), "[24x6x2x1]");
    }
}
