use std::marker::PhantomData;

use bytemuck::Pod;

use super::RawView;
use crate::{Mutability, ReadOnly, Shape, TensorView};

/// A position on the outermost axis of a view.
///
/// Cursors compare by address alone: two cursors are equal exactly when they point at
/// the same element, whatever their strides or shapes. This is what ends an iteration.
///
/// A cursor also counts the steps left on its axis, so only in-range positions can be
/// dereferenced.
pub struct AxisCursor<'a, T, A = ReadOnly> {
    ptr: *mut T,
    stride: isize,
    remaining: usize,
    minor: Shape,
    _marker: PhantomData<(&'a [T], A)>,
}

impl<'a, T: Pod, A: Mutability> AxisCursor<'a, T, A> {
    pub(crate) fn new(ptr: *mut T, stride: isize, remaining: usize, minor: Shape) -> Self {
        Self {
            ptr,
            stride,
            remaining,
            minor,
            _marker: PhantomData,
        }
    }

    pub fn addr(&self) -> *const T {
        self.ptr
    }

    /// Steps one element along the outer axis.
    pub fn advance(&mut self) {
        self.ptr = self.ptr.wrapping_offset(self.stride);
        self.remaining = self.remaining.saturating_sub(1);
    }

    /// The view one rank lower at this position, or `None` once the cursor has left the
    /// axis.
    pub fn get(&self) -> Option<TensorView<'a, T, A>> {
        if self.remaining == 0 {
            return None;
        }
        Some(TensorView::from_raw(RawView::new(
            self.ptr,
            self.minor.clone(),
        )))
    }
}

impl<T, A> PartialEq for AxisCursor<'_, T, A> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr == other.ptr
    }
}

impl<T, A> Eq for AxisCursor<'_, T, A> {}

impl<T, A> std::fmt::Debug for AxisCursor<'_, T, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AxisCursor({:p} +{})", self.ptr, self.stride)
    }
}

/// Iterator over the outermost axis of a view, see [`TensorView::iter`].
///
/// Not restartable; derive a new one from the view instead.
#[derive(derive_new::new)]
pub struct AxisIter<'a, T, A = ReadOnly> {
    cursor: AxisCursor<'a, T, A>,
    end: AxisCursor<'a, T, A>,
}

impl<'a, T: Pod, A: Mutability> Iterator for AxisIter<'a, T, A> {
    type Item = TensorView<'a, T, A>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor == self.end {
            return None;
        }
        let item = self.cursor.get()?;
        self.cursor.advance();
        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use crate::{rvec, shape, Shape, Strides, TensorView, TensorViewMut};

    #[test]
    fn iterates_outer_axis() {
        let data: Vec<f32> = (0..20).map(|i| i as f32).collect();
        let view = TensorView::from_slice(&data, shape![5, 4]).unwrap();
        let rows = view.iter().map(|row| row.to_vec()).collect::<Vec<_>>();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[4], vec![16., 17., 18., 19.]);
    }

    #[test]
    fn end_is_begin_plus_outer_extent() {
        let data = [0u32; 20];
        let view = TensorView::from_slice(&data, shape![5, 4]).unwrap();
        let mut cursor = view.begin();
        for _ in 0..5 {
            assert_ne!(cursor, view.end());
            cursor.advance();
        }
        assert_eq!(cursor, view.end());
        assert_eq!(view.end().addr(), data.as_ptr().wrapping_add(20));
    }

    #[test]
    fn cursors_compare_by_address_only() {
        let data = [0u32; 20];
        let rows = TensorView::from_slice(&data, shape![5, 4]).unwrap();
        let flat = TensorView::from_slice(&data, shape![20]).unwrap();
        assert_eq!(rows.begin().addr(), flat.begin().addr());
        let mut a = rows.begin();
        let mut b = rows.begin();
        a.advance();
        b.advance();
        assert_eq!(a, b);
    }

    #[test]
    fn end_cursor_yields_no_view() {
        let big: Vec<f32> = (0..24).map(|i| i as f32).collect();
        let view = TensorView::from_slice(&big[..20], shape![5, 4]).unwrap();
        assert!(view.end().get().is_none());
        let mut past = view.end();
        past.advance();
        assert!(past.get().is_none());
        let mut cursor = view.begin();
        for _ in 0..4 {
            cursor.advance();
        }
        assert_eq!(cursor.get().unwrap().to_vec(), vec![16., 17., 18., 19.]);
        cursor.advance();
        assert_eq!(cursor, view.end());
        assert!(cursor.get().is_none());
    }

    #[test]
    fn writes_through_yielded_views() {
        let mut data = [0i32; 6];
        let view = TensorViewMut::from_slice_mut(&mut data, shape![3, 2]).unwrap();
        for (i, mut row) in view.iter().enumerate() {
            row.set(&[1], i as i32 + 1);
        }
        assert_eq!(data, [0, 1, 0, 2, 0, 3]);
    }

    #[test]
    fn empty_outer_axis() {
        let data: [f32; 0] = [];
        let view = TensorView::from_slice(&data, shape![0, 3]).unwrap();
        assert_eq!(view.iter().count(), 0);
    }

    #[test]
    fn zero_outer_stride_terminates_immediately() {
        let data = [1f32, 2., 3.];
        let shape = Shape::with_strides(rvec![4, 3], Strides::from(vec![0, 1])).unwrap();
        let view = TensorView::from_slice(&data, shape).unwrap();
        assert_eq!(view.at(&[3, 2]), 3.);
        assert_eq!(view.iter().count(), 0);
    }

    #[test]
    fn for_loop_over_reference() {
        let data: Vec<f32> = (0..8).map(|i| i as f32).collect();
        let view = TensorView::from_slice(&data, shape![2, 2, 2]).unwrap();
        let mut sums = vec![];
        for plane in &view {
            sums.push(plane.to_vec().iter().sum::<f32>());
        }
        assert_eq!(sums, vec![6., 22.]);
    }
}
