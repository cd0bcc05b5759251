use std::fs::{self, File};
use std::path::Path;

use ndarray::ArrayD;
use ndarray_npy::WriteNpyExt;
use tracing::debug;

use crate::model::{Entry, Group, Value};

use super::util::{extension, file_key, switch_first_to_last};
use super::{IoError, Result, npy, raster, table, tiff};

#[cfg(feature = "hdf5")]
use super::hdf5;

/// One loaded file: the tree key it lands under and its member values.
#[derive(Debug, Clone)]
pub struct LoadedFile {
    pub key: String,
    pub root: Group,
}

pub fn supported_extensions() -> &'static [&'static str] {
    &[
        "npy",
        "npz",
        "csv",
        "txt",
        "dat",
        "png",
        "jpg",
        "jpeg",
        "bmp",
        "gif",
        "tif",
        "tiff",
        #[cfg(feature = "hdf5")]
        "h5",
        #[cfg(feature = "hdf5")]
        "hdf5",
        #[cfg(feature = "hdf5")]
        "mat",
    ]
}

/// Reads any supported file into a value tree. `max_bytes` guards against
/// accidental multi-gigabyte loads; `first_to_last` moves every array's
/// first axis to the end right after decoding.
pub fn read_file(
    path: impl AsRef<Path>,
    max_bytes: u64,
    first_to_last: bool,
) -> Result<LoadedFile> {
    let path = path.as_ref();
    let size = fs::metadata(path)?.len();
    if size > max_bytes {
        return Err(IoError::FileTooLarge {
            size,
            limit: max_bytes,
        });
    }
    debug!("reading {:?} ({size} bytes)", path.display());
    let ext = extension(path)?;
    let mut root = match ext.as_str() {
        "npy" => single_value(npy::read_npy_file(path)?),
        "npz" => npy::read_npz_file(path)?,
        "csv" => single_value(table::read_csv(path)?),
        "txt" | "dat" => single_value(table::read_text(path)?),
        "png" | "jpg" | "jpeg" | "bmp" | "gif" => single_value(raster::read_raster(path)?),
        "tif" | "tiff" => single_value(tiff::read_tiff(path)?),
        #[cfg(feature = "hdf5")]
        "h5" | "hdf5" | "mat" => hdf5::read_hdf5(path, max_bytes)?,
        _ => single_value(
            raster::read_raster(path)
                .map_err(|_| IoError::UnsupportedFormat(path.to_string_lossy().to_string()))?,
        ),
    };
    if first_to_last {
        switch_first_to_last(&mut root);
    }
    Ok(LoadedFile {
        key: file_key(path),
        root,
    })
}

/// Formats holding a single dataset wrap it as the file's one member.
fn single_value(value: Value) -> Group {
    let mut group = Group::new();
    group.insert("Value".to_string(), Entry::Leaf(value));
    group
}

/// Writes a cutout as an NPY file, in logical element order.
pub fn write_cutout_npy(path: impl AsRef<Path>, data: &ArrayD<f64>) -> Result<()> {
    let file = File::create(path.as_ref())?;
    data.as_standard_layout().write_npy(file)?;
    Ok(())
}
