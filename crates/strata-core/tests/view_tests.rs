#[cfg(test)]
mod tests {
    use bytemuck::{Pod, Zeroable};
    use strata::prelude::*;
    use strata::{InvariantError, RankKind};

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[repr(C)]
    #[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable, FieldLayout)]
    struct Point {
        x: f32,
        y: f32,
        z: f32,
    }

    #[derive(Debug, derive_new::new)]
    struct CopyCase {
        src: Shape,
        dst: Shape,
        expected: Result<(), InvariantError>,
    }

    fn run_copy(case: &CopyCase) -> Result<(), InvariantError> {
        let src: Vec<i32> = (0..case.src.numel() as i32).collect();
        let mut dst = vec![-1; case.dst.numel()];
        let src_view = TensorView::from_slice(&src, case.src.clone())?;
        let mut dst_view = TensorViewMut::from_slice_mut(&mut dst, case.dst.clone())?;
        src_view.copy_to(&mut dst_view)
    }

    #[test]
    fn copy_shape_checks() {
        init();
        let cases = vec![
            CopyCase::new(shape![5, 4], shape![5, 4], Ok(())),
            CopyCase::new(
                shape![5, 4],
                shape![4, 5],
                Err(InvariantError::SizeMismatch {
                    axis: 0,
                    src: 5,
                    dst: 4,
                }),
            ),
            CopyCase::new(
                shape![5, 4],
                shape![5, 3],
                Err(InvariantError::SizeMismatch {
                    axis: 1,
                    src: 4,
                    dst: 3,
                }),
            ),
            CopyCase::new(
                shape![20],
                shape![5, 4],
                Err(InvariantError::RankMismatch {
                    accepted: 2..=2,
                    actual: 1,
                }),
            ),
        ];
        for case in cases {
            assert_eq!(run_copy(&case), case.expected, "{:?}", case);
        }
    }

    #[test]
    fn copy_into_strided_destination() -> anyhow::Result<()> {
        init();
        let src: Vec<i32> = (0..6).collect();
        let mut dst = vec![0; 12];
        let src_view = TensorView::from_slice(&src, shape![3, 2])?;
        let mut wide = TensorViewMut::from_slice_mut(&mut dst, shape![3, 4])?;
        let mut inner = wide.slice_range(1, 1, 3)?;
        inner.assign(&src_view)?;
        assert_eq!(wide.at(&[2, 2]), 5);
        assert_eq!(dst, vec![0, 0, 1, 0, 0, 2, 3, 0, 0, 4, 5, 0]);
        Ok(())
    }

    #[test]
    fn failed_copy_writes_nothing() {
        init();
        let src = [1u8; 6];
        let mut dst = [0u8; 8];
        let src_view = TensorView::from_slice(&src, shape![2, 3]).unwrap();
        let mut dst_view = TensorViewMut::from_slice_mut(&mut dst, shape![2, 4]).unwrap();
        assert!(src_view.copy_to(&mut dst_view).is_err());
        assert_eq!(dst, [0u8; 8]);
    }

    #[test]
    fn derived_points_unfold_and_fold() -> anyhow::Result<()> {
        init();
        let mut points = vec![Point::zeroed(); 20];
        let view = TensorViewMut::from_slice_mut(&mut points, shape![20])?;
        let mut coords = view.unfold()?;
        assert_eq!(coords.shape().dims(), &[20, 3]);
        for i in 0..20 {
            for k in 0..3 {
                coords.set(&[i, k], (i * 10 + k) as f32);
            }
        }
        let folded = coords.fold::<Point>()?;
        assert_eq!(folded.shape(), view.shape());
        assert_eq!(folded.as_ptr(), view.as_ptr());
        assert_eq!(
            folded.at(&[3]),
            Point {
                x: 30.,
                y: 31.,
                z: 32.
            }
        );
        assert_eq!(points[19].z, 192.);
        Ok(())
    }

    #[test]
    fn walk_a_nested_view() -> anyhow::Result<()> {
        init();
        let data: Vec<f32> = (0..120).map(|i| i as f32).collect();
        let view = TensorView::from_slice(&data, shape![5, 4, 3, 2])?;
        assert_eq!(view.shape().strides().to_vec(), vec![24, 6, 2, 1]);
        assert_eq!(view.at(&[1, 1, 1, 1]), 33.);
        assert_eq!(view.at(&[-1, -1, -1, -1]), 119.);

        let mut visited = 0;
        for cube in &view {
            for plane in &cube {
                for row in &plane {
                    assert_eq!(row.kind(), RankKind::Dense1D);
                    visited += row.numel();
                }
            }
        }
        assert_eq!(visited, 120);

        let column = view.slice(-1, 1)?;
        assert_eq!(column.kind(), RankKind::StridedND);
        assert_eq!(column.to_vec().len(), 60);
        assert_eq!(column.at(&[4, 3, 2]), 119.);
        Ok(())
    }

    #[test]
    fn erased_views_keep_access() -> anyhow::Result<()> {
        init();
        let mut data: Vec<u32> = (0..8).collect();
        let view = TensorViewMut::from_slice_mut(&mut data, shape![2, 4])?;
        let erased: ErasedViewMut = view.erase();
        let mut as_floats = erased.retype::<f32>()?;
        as_floats.set(&[1, 3], 1.0);
        assert_eq!(view.at(&[1, 3]), 1f32.to_bits());
        Ok(())
    }

    #[test]
    fn render_nested_dump() {
        init();
        let data: Vec<i32> = (0..20).collect();
        let view = TensorView::from_slice(&data, shape![5, 4]).unwrap();
        let rendered = format!("{}", view);
        assert!(rendered.starts_with("size: 5 4\nstride: 4 1\n 0 1 2 3\n"));
        assert!(rendered.ends_with(" 16 17 18 19\n\n"));
    }
}
