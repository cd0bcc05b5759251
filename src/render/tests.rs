use ndarray::{Array2, ArrayD, IxDyn};

use crate::slicing::{Cutout, DimSlice, Reduction, TickSource, extract};

use super::*;

fn counted(shape: &[usize]) -> ArrayD<f64> {
    let len: usize = shape.iter().product();
    ArrayD::from_shape_vec(IxDyn(shape), (0..len).map(|v| v as f64).collect()).unwrap()
}

fn cutout(shape: &[usize]) -> Cutout {
    let data = counted(shape);
    let dims = vec![DimSlice::full(); shape.len()];
    extract(&data, &dims, &[], Reduction::None, false).unwrap()
}

#[test]
fn rank_zero_prints_text() {
    let data = counted(&[3]);
    let cut = extract(&data, &[DimSlice::Scalar(1)], &[], Reduction::None, false).unwrap();
    let out = build_plan(&cut, PlotToggles::default(), &PlanSettings::default()).unwrap();
    assert_eq!(out.plan, RenderPlan::Text { body: "1".to_string() });
}

#[test]
fn print_flat_wins_over_every_rank() {
    let mut toggles = PlotToggles::default();
    toggles.set(ToggleKind::PrintFlat, true);
    let out = build_plan(&cutout(&[2, 2]), toggles, &PlanSettings::default()).unwrap();
    assert_eq!(out.plan.kind(), "text");
}

#[test]
fn rank_one_plots_a_line() {
    let out = build_plan(&cutout(&[4]), PlotToggles::default(), &PlanSettings::default()).unwrap();
    match out.plan {
        RenderPlan::Line { values, x } => {
            assert_eq!(values.to_vec(), vec![0.0, 1.0, 2.0, 3.0]);
            assert_eq!(x, TickSource::Range { start: 0.0, step: 1.0 });
        }
        other => panic!("expected a line plan, got {}", other.kind()),
    }
    assert_eq!(out.limits, Some((0.0, 3.0)));
}

#[test]
fn plain_rank_two_shows_a_transposed_image() {
    let out = build_plan(&cutout(&[2, 3]), PlotToggles::default(), &PlanSettings::default()).unwrap();
    assert!(out.plan.inverts_y());
    match out.plan {
        RenderPlan::Image { raster, .. } => {
            assert_eq!(raster.shape(), &[3, 2]);
            assert_eq!(raster[[2, 1]], 5.0);
        }
        other => panic!("expected an image plan, got {}", other.kind()),
    }
}

#[test]
fn line_plot_respects_the_column_limit() {
    let mut toggles = PlotToggles::default();
    toggles.set(ToggleKind::Plot2d, true);
    let settings = PlanSettings { line_limit: 2, unsafe_plotting: false };
    assert!(matches!(
        build_plan(&cutout(&[2, 3]), toggles, &settings),
        Err(RenderError::TooManyLines { count: 3, limit: 2 })
    ));

    let unlocked = PlanSettings { line_limit: 2, unsafe_plotting: true };
    let out = build_plan(&cutout(&[2, 3]), toggles, &unlocked).unwrap();
    assert_eq!(out.plan.kind(), "lines");
}

#[test]
fn scatter_scales_sizes_and_colors() {
    let columns = Array2::from_shape_vec(
        (3, 4),
        vec![0.0, 5.0, 2.0, 1.0, 1.0, 6.0, 4.0, 1.0, 2.0, 7.0, 10.0, 3.0],
    )
    .unwrap()
    .into_dyn();
    let dims = vec![DimSlice::full(), DimSlice::full()];
    let cut = extract(&columns, &dims, &[], Reduction::None, false).unwrap();
    let mut toggles = PlotToggles::default();
    toggles.set(ToggleKind::Scatter, true);
    let out = build_plan(&cut, toggles, &PlanSettings::default()).unwrap();
    match out.plan {
        RenderPlan::Scatter { x, y, sizes, colors } => {
            assert_eq!(x.to_vec(), vec![0.0, 1.0, 2.0]);
            assert_eq!(y.to_vec(), vec![5.0, 6.0, 7.0]);
            assert_eq!(sizes.unwrap().to_vec(), vec![1.0, 26.0, 101.0]);
            assert_eq!(colors.unwrap().to_vec(), vec![0.0, 0.0, 1.0]);
        }
        other => panic!("expected a scatter plan, got {}", other.kind()),
    }
}

#[test]
fn scatter_drops_channels_without_spread() {
    let columns = Array2::from_shape_vec((2, 3), vec![0.0, 1.0, 3.0, 1.0, 2.0, 3.0])
        .unwrap()
        .into_dyn();
    let dims = vec![DimSlice::full(), DimSlice::full()];
    let cut = extract(&columns, &dims, &[], Reduction::None, false).unwrap();
    let mut toggles = PlotToggles::default();
    toggles.set(ToggleKind::Scatter, true);
    let out = build_plan(&cut, toggles, &PlanSettings::default()).unwrap();
    match out.plan {
        RenderPlan::Scatter { sizes, colors, .. } => {
            assert!(sizes.is_none());
            assert!(colors.is_none());
        }
        other => panic!("expected a scatter plan, got {}", other.kind()),
    }
}

#[test]
fn scatter_needs_two_to_four_columns() {
    let mut toggles = PlotToggles::default();
    toggles.set(ToggleKind::Scatter, true);
    let out = build_plan(&cutout(&[2, 5]), toggles, &PlanSettings::default()).unwrap();
    assert_eq!(out.plan.kind(), "image");
}

#[test]
fn min_mean_max_reduces_each_column() {
    let mut toggles = PlotToggles::default();
    toggles.set(ToggleKind::MinMeanMax, true);
    let out = build_plan(&cutout(&[2, 3]), toggles, &PlanSettings::default()).unwrap();
    match out.plan {
        RenderPlan::MinMeanMax { min, mean, max, x } => {
            assert_eq!(min.to_vec(), vec![0.0, 1.0, 2.0]);
            assert_eq!(mean.to_vec(), vec![1.5, 2.5, 3.5]);
            assert_eq!(max.to_vec(), vec![3.0, 4.0, 5.0]);
            assert_eq!(x, TickSource::Range { start: 0.0, step: 1.0 });
        }
        other => panic!("expected a min/mean/max plan, got {}", other.kind()),
    }
}

#[test]
fn toggles_keep_line_and_band_plots_exclusive() {
    let mut toggles = PlotToggles::default();
    toggles.set(ToggleKind::Plot2d, true);
    toggles.set(ToggleKind::MinMeanMax, true);
    assert!(!toggles.plot_2d);
    assert!(toggles.min_mean_max);
    toggles.set(ToggleKind::Plot2d, true);
    assert!(toggles.plot_2d);
    assert!(!toggles.min_mean_max);
}

#[test]
fn rgb_normalizes_and_reorients() {
    let mut toggles = PlotToggles::default();
    toggles.set(ToggleKind::Plot3d, true);
    let out = build_plan(&cutout(&[2, 3, 3]), toggles, &PlanSettings::default()).unwrap();
    match out.plan {
        RenderPlan::Rgb { raster } => {
            assert_eq!(raster.shape(), &[3, 2, 3]);
            assert!((raster[[2, 1, 0]] - 15.0 / 17.0).abs() < 1e-12);
            assert_eq!(raster[[0, 0, 0]], 0.0);
            assert_eq!(raster[[2, 1, 2]], 1.0);
        }
        other => panic!("expected an rgb plan, got {}", other.kind()),
    }
}

#[test]
fn rank_three_without_rgb_channels_tiles_a_mosaic() {
    let out = build_plan(&cutout(&[4, 4, 6]), PlotToggles::default(), &PlanSettings::default())
        .unwrap();
    match out.plan {
        RenderPlan::Mosaic { raster, layout, x, .. } => {
            assert_eq!(raster.shape(), &[11, 16]);
            assert_eq!((layout.rows, layout.cols), (2, 3));
            assert_eq!(x.positions, vec![-5.0, 0.0, 5.0, 10.0, 15.0]);
            assert_eq!(x.labels, vec!["-4", "0", "4", "8", "12"]);
        }
        other => panic!("expected a mosaic plan, got {}", other.kind()),
    }
    assert_eq!(out.limits, Some((0.0, 95.0)));
}

#[test]
fn rgb_toggle_only_applies_to_three_channel_cutouts() {
    let mut toggles = PlotToggles::default();
    toggles.set(ToggleKind::Plot3d, true);
    let out = build_plan(&cutout(&[2, 2, 6]), toggles, &PlanSettings::default()).unwrap();
    assert_eq!(out.plan.kind(), "mosaic");
}

#[test]
fn range_ticks_restate_typed_start_and_step() {
    let labels = range_labels(&[0.0, 1.0, 2.0], 1.0, 2.0);
    assert_eq!(labels, vec!["-1", "1", "3"]);

    let sparse = range_labels(&[0.0, 4.0], 0.0, 1.0);
    assert_eq!(sparse, vec!["-1", "0"]);
}

#[test]
fn list_ticks_label_literal_indices() {
    let ticks = list_labels(&[4, 1]);
    assert_eq!(ticks.positions, vec![0.0, 1.0]);
    assert_eq!(ticks.labels, vec!["4", "1"]);

    let tick = TickSource::List(vec![4, 1]);
    assert_eq!(source_labels(&tick, &[0.0, 1.0, 2.0]), vec!["4", "1", ""]);
}

#[test]
fn display_positions_map_back_to_source_indices() {
    let range = TickSource::Range { start: 1.0, step: 2.0 };
    assert_eq!(display_to_source(&range, 3.0), Some(7.0));

    let list = TickSource::List(vec![4, 1]);
    assert_eq!(display_to_source(&list, 1.2), Some(1.0));
    assert_eq!(display_to_source(&list, -0.6), None);
    assert_eq!(display_to_source(&list, 5.0), None);
}

#[test]
fn format_value_switches_to_scientific_outside_the_window() {
    assert_eq!(format_value(3.141592653), "3.14159");
    assert_eq!(format_value(0.0001), "0.00010");
    assert_eq!(format_value(100000.0), "1.00000e5");
    assert_eq!(format_value(0.0), "0.00000e0");
    assert_eq!(format_value(-12.5), "-12.50000");
}

#[test]
fn mosaic_ticks_skip_the_padding() {
    let ticks = mosaic_ticks(4, 1, 16);
    assert_eq!(ticks.positions, vec![-5.0, 0.0, 5.0, 10.0, 15.0]);
    assert_eq!(ticks.labels, vec!["-4", "0", "4", "8", "12"]);
}
