use thiserror::Error;

pub type Result<T> = std::result::Result<T, IoError>;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("file is {size} bytes, over the {limit} byte load limit")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("unrecognized element type: {0}")]
    UnknownDtype(String),

    #[error("TIFF page layout mismatch: expected {expected} samples, got {got}")]
    TiffLayout { expected: usize, got: usize },

    #[error("raster has {channels} channels, needs at least {needed}")]
    ChannelCount { channels: usize, needed: usize },

    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("NPY read failure: {0}")]
    NpyRead(#[from] ndarray_npy::ReadNpyError),

    #[error("NPZ read failure: {0}")]
    NpzRead(#[from] ndarray_npy::ReadNpzError),

    #[error("NPY write failure: {0}")]
    NpyWrite(#[from] ndarray_npy::WriteNpyError),

    #[error("CSV parse failure: {0}")]
    Csv(#[from] csv::Error),

    #[error("image decode/encode failure: {0}")]
    Image(#[from] image::ImageError),

    #[error("TIFF decode failure: {0}")]
    Tiff(#[from] tiff::TiffError),

    #[cfg(feature = "hdf5")]
    #[error("HDF5 read failure: {0}")]
    Hdf5(#[from] hdf5::Error),
}
