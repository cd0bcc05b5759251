use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// What one scripted view produced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ViewReport {
    pub input: PathBuf,
    /// Full store path of the displayed dataset, file key included.
    pub dataset: String,
    pub source_shape: Vec<usize>,
    pub cutout_shape: Vec<usize>,
    pub kind: String,
    pub limits: Option<(f64, f64)>,
    pub notices: Vec<String>,
    pub exports: Vec<PathBuf>,
}
