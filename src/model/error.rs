use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("no entry at {path}")]
    NotFound { path: String },

    #[error("{path} is not a group")]
    NotAGroup { path: String },

    #[error("{path} is not an array")]
    NotAnArray { path: String },

    #[error("an entry named {name} already exists")]
    NameTaken { name: String },

    #[error("group {path} has no members that can be combined")]
    NotCombinable { path: String },

    #[error("shape mismatch: {left:?} != {right:?}")]
    ShapeMismatch { left: Vec<usize>, right: Vec<usize> },

    #[error("{order:?} is not a permutation of the {ndim} dimensions")]
    InvalidPermutation { order: Vec<usize>, ndim: usize },

    #[error("cannot reshape {len} elements into {shape:?}")]
    ReshapeMismatch { len: usize, shape: Vec<usize> },
}
