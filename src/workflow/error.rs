use crate::formats::IoError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, WorkflowError>;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("view specification parse failure: {0}")]
    Parse(String),

    #[error("workflow I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("workflow serialization failure: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("workflow YAML serialization failure: {0}")]
    SerdeYaml(#[from] serde_yaml::Error),

    #[error("data access failure: {0}")]
    Data(#[from] IoError),

    #[error("no dataset `{path}` in {input}")]
    MissingDataset { path: String, input: String },

    #[error("a {kind} display does not rasterize to an image")]
    NotRasterizable { kind: String },
}
