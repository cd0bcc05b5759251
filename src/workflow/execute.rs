use std::path::Path;

use tracing::debug;

use crate::formats::{read_file, write_cutout_npy, write_gray_png, write_rgb_png};
use crate::model::{DataStore, Value};
use crate::render::{PlanSettings, RenderPlan};
use crate::slicing::Reduction;
use crate::view::{ViewSession, ViewState, ViewStateStore};

use super::{Result, ViewReport, ViewSpec, WorkflowError};

/// Runs one scripted view end to end: load the file, slice the dataset,
/// pick a display and write the requested exports.
pub fn run_view(
    spec: &ViewSpec,
    settings: &PlanSettings,
    max_bytes: u64,
    first_to_last: bool,
) -> Result<ViewReport> {
    spec.validate()?;
    let file = read_file(&spec.input, max_bytes, first_to_last)?;
    let mut store = DataStore::new();
    let file_key = file.key.clone();
    store.insert_file(file.key, file.root);

    let (path, value) =
        resolve_dataset(&store, &file_key, &spec.dataset).ok_or_else(|| {
            WorkflowError::MissingDataset {
                path: spec.dataset.clone(),
                input: spec.input.display().to_string(),
            }
        })?;
    let source_shape = value.shape().map(<[usize]>::to_vec).unwrap_or_default();

    let mut state = ViewState::for_shape(&source_shape);
    for (dim, text) in spec.slices.iter().enumerate() {
        if dim < state.slice_texts.len() {
            state.slice_texts[dim] = text.clone();
        }
    }
    if let Some(name) = &spec.reduction {
        if let Some(reduction) = Reduction::parse(name) {
            state.reduction = reduction;
        }
    }
    state.op_dims = spec
        .reduce_dims
        .iter()
        .copied()
        .filter(|&dim| dim < source_shape.len())
        .collect();
    state.op_dims.sort_unstable();
    state.op_dims.dedup();
    state.toggles = spec.toggles.to_toggles();

    let mut session = ViewSession::new(ViewStateStore::key(&path), value, state);
    let outcome = session.render(value, settings);
    let (kind, limits) = match &outcome.output {
        Some(output) => (output.plan.kind().to_string(), output.limits),
        None => ("none".to_string(), None),
    };
    debug!("view of {} resolved to a {kind} display", path.join("/"));

    let mut exports = Vec::new();
    if let Some(png) = &spec.export_png {
        match &outcome.output {
            Some(output) => {
                rasterize_plan(&output.plan, png)?;
                exports.push(png.clone());
            }
            None => return Err(WorkflowError::NotRasterizable { kind: kind.clone() }),
        }
    }
    if let Some(npy) = &spec.export_npy {
        if let Some(cutout) = session.cutout() {
            write_cutout_npy(npy, &cutout.data)?;
            exports.push(npy.clone());
        }
    }

    let cutout_shape = session
        .cutout()
        .map(|cutout| cutout.shape().to_vec())
        .unwrap_or_default();
    Ok(ViewReport {
        input: spec.input.clone(),
        dataset: path.join("/"),
        source_shape,
        cutout_shape,
        kind,
        limits,
        notices: outcome.notices,
        exports,
    })
}

fn resolve_dataset<'a>(
    store: &'a DataStore,
    file_key: &str,
    dataset: &str,
) -> Option<(Vec<String>, &'a Value)> {
    let path = if dataset.is_empty() {
        store.first_leaf_path()?
    } else {
        let mut path = vec![file_key.to_string()];
        path.extend(dataset.split('/').map(str::to_string));
        path
    };
    let value = store.value(&path)?;
    Some((path, value))
}

/// Writes the raster of an image-like plan as a PNG.
pub fn rasterize_plan(plan: &RenderPlan, path: &Path) -> Result<()> {
    match plan {
        RenderPlan::Image { raster, .. } | RenderPlan::Mosaic { raster, .. } => {
            write_gray_png(path, raster)?;
        }
        RenderPlan::Rgb { raster } => {
            write_rgb_png(path, raster)?;
        }
        other => {
            return Err(WorkflowError::NotRasterizable {
                kind: other.kind().to_string(),
            });
        }
    }
    Ok(())
}
