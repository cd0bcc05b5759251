use crate::formats::IoError;
use crate::model::CoreError;
use crate::workflow::WorkflowError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("store error: {0}")]
    Store(#[from] CoreError),

    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    #[error("workflow error: {0}")]
    Workflow(#[from] WorkflowError),

    #[error("preferences I/O failure: {0}")]
    PrefsIo(#[from] std::io::Error),

    #[error("preferences encoding failure: {0}")]
    PrefsJson(#[from] serde_json::Error),
}
