mod api;
mod error;
#[cfg(feature = "hdf5")]
mod hdf5;
mod npy;
mod raster;
mod table;
mod tiff;
mod util;


pub use api::{LoadedFile, read_file, supported_extensions, write_cutout_npy};
pub use error::{IoError, Result};
pub use raster::{write_gray_png, write_rgb_png};
