use ndarray::{ArrayD, IxDyn};

use super::*;

fn counted(shape: &[usize]) -> ArrayD<f64> {
    let len: usize = shape.iter().product();
    ArrayD::from_shape_vec(IxDyn(shape), (0..len).map(|v| v as f64).collect()).unwrap()
}

fn resolved(text: &str, size: usize) -> ResolvedRange {
    match DimSlice::parse(text, size).unwrap() {
        DimSlice::Range(range) => range.resolve(size).unwrap(),
        other => panic!("expected a range, got {other:?}"),
    }
}

#[test]
fn empty_text_selects_the_whole_dimension() {
    assert_eq!(DimSlice::parse("", 5).unwrap(), DimSlice::full());
    assert_eq!(DimSlice::parse("  ", 5).unwrap(), DimSlice::full());
    let full = resolved("", 5);
    assert_eq!((full.start, full.stop, full.step), (0, 5, 1));
    assert_eq!(full.len(), 5);
}

#[test]
fn scalars_clamp_into_bounds() {
    assert_eq!(DimSlice::parse("3", 5).unwrap(), DimSlice::Scalar(3));
    assert_eq!(DimSlice::parse("10", 5).unwrap(), DimSlice::Scalar(4));
    assert_eq!(DimSlice::parse("-10", 5).unwrap(), DimSlice::Scalar(-5));
    assert_eq!(
        DimSlice::Scalar(4).canonical_text(),
        Some("4".to_string())
    );
}

#[test]
fn lists_clamp_dedup_and_keep_typed_order() {
    let dim = DimSlice::parse("4, 1, 9, 4,", 5).unwrap();
    assert_eq!(dim, DimSlice::List(vec![4, 1]));
    assert_eq!(dim.canonical_text(), Some("4,1".to_string()));

    let single = DimSlice::parse("2,", 5).unwrap();
    assert_eq!(single, DimSlice::List(vec![2]));
    assert_eq!(single.canonical_text(), Some("2,".to_string()));
}

#[test]
fn unparsable_lists_are_rejected() {
    assert!(matches!(
        DimSlice::parse("1,x", 5),
        Err(SliceError::BadIndex { .. })
    ));
    assert!(matches!(
        DimSlice::parse(",,", 5),
        Err(SliceError::BadIndex { .. })
    ));
}

#[test]
fn ranges_resolve_like_python_slices() {
    let r = resolved("1:4", 5);
    assert_eq!((r.start, r.stop, r.step, r.len()), (1, 4, 1, 3));
    let r = resolved("::2", 5);
    assert_eq!((r.start, r.stop, r.step, r.len()), (0, 5, 2, 3));
    let r = resolved("::-1", 5);
    assert_eq!((r.start, r.stop, r.step, r.len()), (4, -1, -1, 5));
    let r = resolved("4:0:-1", 5);
    assert_eq!((r.start, r.stop, r.step, r.len()), (4, 0, -1, 4));
    let r = resolved("-3:", 5);
    assert_eq!((r.start, r.stop, r.step, r.len()), (2, 5, 1, 3));
    assert!(resolved("3:1", 5).is_empty());
    assert!(resolved("10:20", 5).is_empty());
}

#[test]
fn bad_ranges_are_rejected() {
    assert!(matches!(DimSlice::parse("::0", 5), Err(SliceError::ZeroStep)));
    assert!(matches!(
        DimSlice::parse("1:2:3:4", 5),
        Err(SliceError::BadRange { .. })
    ));
    assert!(matches!(
        DimSlice::parse("a:b", 5),
        Err(SliceError::BadRange { .. })
    ));
}

#[test]
fn malformed_texts_fall_back_to_the_full_dimension() {
    let texts = vec!["abc".to_string(), "1".to_string()];
    let (dims, notices) = parse_texts(&texts, &[4, 4]);
    assert_eq!(dims[0], DimSlice::full());
    assert_eq!(dims[1], DimSlice::Scalar(1));
    assert_eq!(notices.len(), 1);
    assert_eq!(scalar_dims(&dims), vec![1]);
}

#[test]
fn extract_drops_scalar_axes_and_reduced_axes() {
    let data = counted(&[4, 5, 6]);
    let dims = vec![DimSlice::Scalar(1), DimSlice::full(), DimSlice::full()];
    let cut = extract(&data, &dims, &[2], Reduction::Mean, false).unwrap();
    assert_eq!(cut.shape(), &[5]);
    assert_eq!(cut.axes.len(), 1);
    assert_eq!(cut.axes[0].source_dim, 1);
    for j in 0..5 {
        assert_eq!(cut.data[[j]], 30.0 + j as f64 * 6.0 + 2.5);
    }
}

#[test]
fn lists_select_rows_in_the_typed_order() {
    let data = counted(&[4, 3]);
    let dims = vec![DimSlice::parse("2,0", 4).unwrap(), DimSlice::full()];
    let cut = extract(&data, &dims, &[], Reduction::None, false).unwrap();
    assert_eq!(cut.shape(), &[2, 3]);
    assert_eq!(cut.data[[0, 2]], 8.0);
    assert_eq!(cut.data[[1, 0]], 0.0);
    assert_eq!(cut.axes[0].tick, TickSource::List(vec![2, 0]));
}

#[test]
fn negative_steps_walk_backwards() {
    let data = counted(&[6]);
    let dims = vec![DimSlice::parse("::-2", 6).unwrap()];
    let cut = extract(&data, &dims, &[], Reduction::None, false).unwrap();
    assert_eq!(cut.data.iter().copied().collect::<Vec<_>>(), [5.0, 3.0, 1.0]);

    let dims = vec![DimSlice::parse("4:0:-1", 6).unwrap()];
    let cut = extract(&data, &dims, &[], Reduction::None, false).unwrap();
    assert_eq!(
        cut.data.iter().copied().collect::<Vec<_>>(),
        [4.0, 3.0, 2.0, 1.0]
    );
}

#[test]
fn joint_reduction_covers_all_operation_dimensions_at_once() {
    let data = ArrayD::from_shape_vec(
        IxDyn(&[2, 2, 2]),
        vec![0.0, 1.0, 2.0, 10.0, 5.0, 5.0, 5.0, 9.0],
    )
    .unwrap();
    let out = Reduction::Median.apply(&data, &[1, 2]);
    assert_eq!(out.shape(), &[2]);
    assert_eq!(out[[0]], 1.5);
    assert_eq!(out[[1]], 5.0);
}

#[test]
fn reductions_skip_nan_values() {
    let data =
        ArrayD::from_shape_vec(IxDyn(&[1, 4]), vec![f64::NAN, 3.0, 1.0, f64::NAN]).unwrap();
    assert_eq!(Reduction::Min.apply(&data, &[1])[[0]], 1.0);
    assert_eq!(Reduction::Max.apply(&data, &[1])[[0]], 3.0);
    assert_eq!(Reduction::Mean.apply(&data, &[1])[[0]], 2.0);
    assert_eq!(Reduction::Median.apply(&data, &[1])[[0]], 2.0);

    let blank = ArrayD::from_shape_vec(IxDyn(&[1, 2]), vec![f64::NAN, f64::NAN]).unwrap();
    assert!(Reduction::Mean.apply(&blank, &[1])[[0]].is_nan());
}

#[test]
fn reduction_names_round_trip() {
    for reduction in [
        Reduction::None,
        Reduction::Min,
        Reduction::Max,
        Reduction::Mean,
        Reduction::Median,
    ] {
        assert_eq!(Reduction::parse(reduction.name()), Some(reduction));
    }
    assert_eq!(Reduction::parse("mean"), Some(Reduction::Mean));
    assert_eq!(Reduction::parse("sum"), None);
}

#[test]
fn operation_dimensions_on_scalar_axes_are_ignored() {
    let data = counted(&[4, 5]);
    let dims = vec![DimSlice::Scalar(0), DimSlice::full()];
    let cut = extract(&data, &dims, &[0], Reduction::Mean, false).unwrap();
    assert_eq!(cut.shape(), &[5]);
}

#[test]
fn transpose_swaps_the_display_axes() {
    let data = counted(&[2, 3]);
    let dims = vec![DimSlice::full(), DimSlice::full()];
    let cut = extract(&data, &dims, &[], Reduction::None, true).unwrap();
    assert_eq!(cut.shape(), &[3, 2]);
    assert_eq!(cut.data[[2, 1]], 5.0);
    assert!(cut.transposed);
    let axes = cut.display_axes();
    assert_eq!(axes[0].source_dim, 1);
    assert_eq!(axes[1].source_dim, 0);
    assert_eq!(cut.limits(), Some((0.0, 5.0)));
}

#[test]
fn empty_selections_are_reported_not_returned() {
    let empty = ArrayD::<f64>::zeros(IxDyn(&[0, 3]));
    let dims = vec![DimSlice::full(), DimSlice::full()];
    assert!(matches!(
        extract(&empty, &dims, &[], Reduction::None, false),
        Err(SliceError::EmptyView)
    ));

    let data = counted(&[5]);
    let dims = vec![DimSlice::parse("3:1", 5).unwrap()];
    assert!(matches!(
        extract(&data, &dims, &[], Reduction::None, false),
        Err(SliceError::EmptyView)
    ));
}

#[test]
fn rank_mismatch_is_rejected() {
    let data = counted(&[4, 4]);
    assert!(matches!(
        extract(&data, &[DimSlice::full()], &[], Reduction::None, false),
        Err(SliceError::RankMismatch { expected: 2, got: 1 })
    ));
}

#[test]
fn mosaic_grid_matches_the_page_count() {
    let layout = MosaicLayout::plan(&[4, 4, 6], 1).unwrap();
    assert_eq!((layout.rows, layout.cols), (2, 3));
    assert_eq!((layout.height(), layout.width()), (11, 16));

    let prime = MosaicLayout::plan(&[2, 2, 5], 0).unwrap();
    assert_eq!((prime.rows, prime.cols), (1, 5));
}

#[test]
fn balanced_four_dimensional_pages_keep_their_own_grid() {
    let layout = MosaicLayout::plan(&[4, 4, 2, 3], 1).unwrap();
    assert_eq!((layout.rows, layout.cols), (2, 3));

    let skewed = MosaicLayout::plan(&[4, 4, 1, 12], 1).unwrap();
    assert_eq!((skewed.rows, skewed.cols), (3, 4));
}

#[test]
fn mosaics_need_at_least_three_dimensions() {
    assert!(matches!(
        MosaicLayout::plan(&[4, 4], 1),
        Err(SliceError::NotAMosaic { ndim: 2 })
    ));
    assert!(matches!(
        MosaicLayout::plan(&[4, 0, 6], 1),
        Err(SliceError::EmptyView)
    ));
}

#[test]
fn mosaic_flatten_and_source_index_invert_each_other() {
    let data = counted(&[4, 4, 6]);
    let layout = MosaicLayout::plan(data.shape(), 1).unwrap();
    let raster = layout.flatten(&data);
    assert_eq!(raster.shape(), &[11, 16]);

    let mut seen = 0;
    for y in 0..raster.shape()[0] {
        for x in 0..raster.shape()[1] {
            match layout.source_index(x as f64, y as f64) {
                Some((i0, i1, page)) => {
                    let mut index = vec![i0, i1];
                    index.extend(page);
                    assert_eq!(raster[[y, x]], data[IxDyn(&index)]);
                    seen += 1;
                }
                None => assert!(raster[[y, x]].is_nan()),
            }
        }
    }
    assert_eq!(seen, data.len());
}

#[test]
fn mosaic_unravels_pages_over_all_trailing_dimensions() {
    let layout = MosaicLayout::plan(&[2, 2, 2, 3], 1).unwrap();
    let (i0, i1, page) = layout.source_index(4.0, 1.0).unwrap();
    assert_eq!((i0, i1), (0, 0));
    assert_eq!(page, vec![0, 1]);
}
