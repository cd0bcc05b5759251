use std::fs::{self, File};
use std::path::{Path, PathBuf};

use ndarray::Array3;
use ndarray_npy::WriteNpyExt;
use tempfile::tempdir;

use crate::model::Entry;
use crate::render::PlanSettings;

use super::*;

const NO_LIMIT: u64 = u64::MAX;

fn stack_file(dir: &Path) -> PathBuf {
    let path = dir.join("stack.npy");
    let data = Array3::from_shape_vec((4, 4, 6), (0..96).map(f64::from).collect()).expect("shape");
    data.write_npy(File::create(&path).expect("create")).expect("write npy");
    path
}

fn spec_for(input: PathBuf) -> ViewSpec {
    ViewSpec {
        input,
        dataset: String::new(),
        slices: Vec::new(),
        reduction: None,
        reduce_dims: Vec::new(),
        toggles: SpecToggles::default(),
        export_png: None,
        export_npy: None,
    }
}

fn value_shape(path: &Path) -> Vec<usize> {
    let loaded = crate::formats::read_file(path, NO_LIMIT, false).expect("read export");
    match loaded.root.get("Value") {
        Some(Entry::Leaf(value)) => value.shape().map(<[usize]>::to_vec).unwrap_or_default(),
        other => panic!("expected a leaf, got {other:?}"),
    }
}

#[test]
fn yaml_specs_load_by_extension() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("view.yaml");
    fs::write(
        &path,
        "input: stack.npy\ndataset: Value\nslices: [\"\", \"\", \"0\"]\nreduction: nanmean\nreduce_dims: [0]\ntoggles:\n  transpose: true\n",
    )
    .expect("write spec");

    let spec = load_spec(&path).expect("load spec");
    assert_eq!(spec.input, PathBuf::from("stack.npy"));
    assert_eq!(spec.dataset, "Value");
    assert_eq!(spec.slices, vec!["", "", "0"]);
    assert_eq!(spec.reduction.as_deref(), Some("nanmean"));
    assert_eq!(spec.reduce_dims, vec![0]);
    assert!(spec.toggles.transpose);
    assert!(!spec.toggles.scatter);
}

#[test]
fn json_specs_default_everything_but_the_input() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("view.json");
    fs::write(&path, "{\"input\": \"a.npy\"}").expect("write spec");

    let spec = load_spec(&path).expect("load spec");
    assert_eq!(spec, spec_for(PathBuf::from("a.npy")));
}

#[test]
fn unknown_reductions_are_rejected() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("view.yml");
    fs::write(&path, "input: a.npy\nreduction: average\n").expect("write spec");

    let message = load_spec(&path).expect_err("must reject").to_string();
    assert!(message.contains("unknown reduction"));
}

#[test]
fn empty_inputs_are_rejected() {
    let spec = spec_for(PathBuf::new());
    let message = run_view(&spec, &PlanSettings::default(), NO_LIMIT, false)
        .expect_err("must reject")
        .to_string();
    assert!(message.contains("must name an input file"));
}

#[test]
fn missing_datasets_are_reported() {
    let dir = tempdir().expect("tempdir");
    let mut spec = spec_for(stack_file(dir.path()));
    spec.dataset = "nope".to_string();

    let message = run_view(&spec, &PlanSettings::default(), NO_LIMIT, false)
        .expect_err("must reject")
        .to_string();
    assert!(message.contains("no dataset `nope`"));
}

#[test]
fn scripted_page_view_reports_an_image() {
    let dir = tempdir().expect("tempdir");
    let mut spec = spec_for(stack_file(dir.path()));
    spec.slices = vec![String::new(), String::new(), "0".to_string()];

    let report = run_view(&spec, &PlanSettings::default(), NO_LIMIT, false).expect("run");
    assert_eq!(report.kind, "image");
    assert_eq!(report.source_shape, vec![4, 4, 6]);
    assert_eq!(report.cutout_shape, vec![4, 4]);
    assert!(report.dataset.ends_with("/Value"));
    assert_eq!(report.limits, Some((0.0, 90.0)));
    assert!(report.notices.is_empty());
    assert!(report.exports.is_empty());
}

#[test]
fn reduction_applies_before_projection() {
    let dir = tempdir().expect("tempdir");
    let mut spec = spec_for(stack_file(dir.path()));
    spec.slices = vec![String::new(); 3];
    spec.reduction = Some("nanmean".to_string());
    spec.reduce_dims = vec![2];

    let report = run_view(&spec, &PlanSettings::default(), NO_LIMIT, false).expect("run");
    assert_eq!(report.kind, "image");
    assert_eq!(report.cutout_shape, vec![4, 4]);
    assert_eq!(report.limits, Some((2.5, 92.5)));
}

#[test]
fn mosaic_exports_write_png_and_npy() {
    let dir = tempdir().expect("tempdir");
    let mut spec = spec_for(stack_file(dir.path()));
    spec.slices = vec![String::new(); 3];
    spec.export_png = Some(dir.path().join("mosaic.png"));
    spec.export_npy = Some(dir.path().join("cut.npy"));

    let report = run_view(&spec, &PlanSettings::default(), NO_LIMIT, false).expect("run");
    assert_eq!(report.kind, "mosaic");
    assert_eq!(report.cutout_shape, vec![4, 4, 6]);
    assert_eq!(report.exports.len(), 2);
    // 2x3 page grid of 4x4 tiles with padding 1 -> raster (11, 16)
    assert_eq!(value_shape(&report.exports[0]), vec![16, 11]);
    assert_eq!(value_shape(&report.exports[1]), vec![4, 4, 6]);
}

#[test]
fn line_displays_refuse_png_export() {
    let dir = tempdir().expect("tempdir");
    let mut spec = spec_for(stack_file(dir.path()));
    spec.slices = vec![String::new(), "0".to_string(), "0".to_string()];
    spec.export_png = Some(dir.path().join("line.png"));

    let message = run_view(&spec, &PlanSettings::default(), NO_LIMIT, false)
        .expect_err("must reject")
        .to_string();
    assert!(message.contains("does not rasterize"));
}

#[test]
fn reports_round_trip_as_json() {
    let dir = tempdir().expect("tempdir");
    let mut spec = spec_for(stack_file(dir.path()));
    spec.slices = vec![String::new(), String::new(), "0".to_string()];
    let report = run_view(&spec, &PlanSettings::default(), NO_LIMIT, false).expect("run");

    let path = dir.path().join("report.json");
    save_report(&path, &report).expect("save report");
    let text = fs::read_to_string(&path).expect("read report");
    assert!(text.contains("\"kind\": \"image\""));
    let parsed: ViewReport = serde_json::from_str(&text).expect("parse report");
    assert_eq!(parsed, report);
}
