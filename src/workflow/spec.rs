use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::render::PlotToggles;
use crate::slicing::Reduction;

use super::{Result, WorkflowError};

/// One scripted view: which file and dataset to open, how to slice it,
/// and what to export.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ViewSpec {
    pub input: PathBuf,
    /// `/`-separated dataset path inside the file, without the file key.
    /// Empty picks the first leaf.
    #[serde(default)]
    pub dataset: String,
    /// Slice texts by dimension; dimensions past the list keep their
    /// defaults.
    #[serde(default)]
    pub slices: Vec<String>,
    #[serde(default)]
    pub reduction: Option<String>,
    #[serde(default)]
    pub reduce_dims: Vec<usize>,
    #[serde(default)]
    pub toggles: SpecToggles,
    #[serde(default)]
    pub export_png: Option<PathBuf>,
    #[serde(default)]
    pub export_npy: Option<PathBuf>,
}

/// Display toggles in their serialized form.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SpecToggles {
    pub plot_2d: bool,
    pub scatter: bool,
    pub plot_3d: bool,
    pub min_mean_max: bool,
    pub print_flat: bool,
    pub transpose: bool,
}

impl SpecToggles {
    pub fn to_toggles(self) -> PlotToggles {
        PlotToggles {
            plot_2d: self.plot_2d,
            scatter: self.scatter,
            plot_3d: self.plot_3d,
            min_mean_max: self.min_mean_max,
            print_flat: self.print_flat,
            transpose: self.transpose,
        }
    }
}

impl ViewSpec {
    pub fn validate(&self) -> Result<()> {
        if self.input.as_os_str().is_empty() {
            return Err(WorkflowError::Parse(
                "view must name an input file".to_string(),
            ));
        }
        if let Some(name) = &self.reduction {
            if Reduction::parse(name).is_none() {
                return Err(WorkflowError::Parse(format!("unknown reduction `{name}`")));
            }
        }
        Ok(())
    }
}
