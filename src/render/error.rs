use crate::slicing::SliceError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RenderError>;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("{count} columns exceed the line plot limit of {limit}")]
    TooManyLines { count: usize, limit: usize },

    #[error("slice failure: {0}")]
    Slice(#[from] SliceError),
}
