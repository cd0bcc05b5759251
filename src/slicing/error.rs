use thiserror::Error;

pub type Result<T> = std::result::Result<T, SliceError>;

#[derive(Debug, Error)]
pub enum SliceError {
    #[error("could not convert {text:?} to an index")]
    BadIndex { text: String },

    #[error("could not read a range from {text:?}")]
    BadRange { text: String },

    #[error("range step cannot be zero")]
    ZeroStep,

    #[error("expected {expected} slice expressions, got {got}")]
    RankMismatch { expected: usize, got: usize },

    #[error("the selection is empty")]
    EmptyView,

    #[error("a mosaic needs at least 3 dimensions, got {ndim}")]
    NotAMosaic { ndim: usize },
}
