use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use ndarray::ArrayD;
use ndarray_npy::{NpzReader, ReadNpyExt, ReadableElement};
use tracing::warn;

use crate::model::{DType, Entry, Group, Value};

use super::util::wrap_array;
use super::{IoError, Result};

pub(crate) fn read_npy_file(path: &Path) -> Result<Value> {
    let mut file = File::open(path)?;
    decode_npy(&mut file)?
        .ok_or_else(|| IoError::UnknownDtype(path.to_string_lossy().to_string()))
}

/// The NPY header does not say which Rust type to decode into, so every
/// supported element type is tried in turn, widest first.
fn decode_npy<R: Read + Seek>(reader: &mut R) -> Result<Option<Value>> {
    if let Some(value) = try_dtype::<R, f64>(reader, DType::F64, |v| v)? {
        return Ok(Some(value));
    }
    if let Some(value) = try_dtype::<R, f32>(reader, DType::F32, |v| v as f64)? {
        return Ok(Some(value));
    }
    if let Some(value) = try_dtype::<R, i64>(reader, DType::I64, |v| v as f64)? {
        return Ok(Some(value));
    }
    if let Some(value) = try_dtype::<R, i32>(reader, DType::I32, |v| v as f64)? {
        return Ok(Some(value));
    }
    if let Some(value) = try_dtype::<R, i16>(reader, DType::I16, |v| v as f64)? {
        return Ok(Some(value));
    }
    if let Some(value) = try_dtype::<R, i8>(reader, DType::I8, |v| v as f64)? {
        return Ok(Some(value));
    }
    if let Some(value) = try_dtype::<R, u64>(reader, DType::U64, |v| v as f64)? {
        return Ok(Some(value));
    }
    if let Some(value) = try_dtype::<R, u32>(reader, DType::U32, |v| v as f64)? {
        return Ok(Some(value));
    }
    if let Some(value) = try_dtype::<R, u16>(reader, DType::U16, |v| v as f64)? {
        return Ok(Some(value));
    }
    if let Some(value) = try_dtype::<R, u8>(reader, DType::U8, |v| v as f64)? {
        return Ok(Some(value));
    }
    if let Some(value) = try_dtype::<R, bool>(reader, DType::Bool, |v| v as u8 as f64)? {
        return Ok(Some(value));
    }
    Ok(None)
}

fn try_dtype<R, T>(reader: &mut R, dtype: DType, cast: fn(T) -> f64) -> Result<Option<Value>>
where
    R: Read + Seek,
    T: ReadableElement + Clone,
{
    reader.seek(SeekFrom::Start(0))?;
    match ArrayD::<T>::read_npy(&mut *reader) {
        Ok(array) => Ok(Some(wrap_array(array.mapv(cast), dtype))),
        Err(_) => Ok(None),
    }
}

pub(crate) fn read_npz_file(path: &Path) -> Result<Group> {
    let file = File::open(path)?;
    let mut npz = NpzReader::new(file)?;
    let names = npz.names()?;
    let mut group = Group::new();
    for name in names {
        let member = name.strip_suffix(".npy").unwrap_or(&name).to_string();
        match decode_npz_member(&mut npz, &name) {
            Some(value) => {
                group.insert(member, Entry::Leaf(value));
            }
            None => warn!("skipping npz member {name:?}: unrecognized element type"),
        }
    }
    Ok(group)
}

fn decode_npz_member(npz: &mut NpzReader<File>, name: &str) -> Option<Value> {
    macro_rules! attempt {
        ($ty:ty, $dtype:expr, $cast:expr) => {
            let result: std::result::Result<ArrayD<$ty>, _> = npz.by_name(name);
            if let Ok(array) = result {
                return Some(wrap_array(array.mapv($cast), $dtype));
            }
        };
    }
    attempt!(f64, DType::F64, |v| v);
    attempt!(f32, DType::F32, |v: f32| v as f64);
    attempt!(i64, DType::I64, |v: i64| v as f64);
    attempt!(i32, DType::I32, |v: i32| v as f64);
    attempt!(i16, DType::I16, |v: i16| v as f64);
    attempt!(i8, DType::I8, |v: i8| v as f64);
    attempt!(u64, DType::U64, |v: u64| v as f64);
    attempt!(u32, DType::U32, |v: u32| v as f64);
    attempt!(u16, DType::U16, |v: u16| v as f64);
    attempt!(u8, DType::U8, |v: u8| v as f64);
    attempt!(bool, DType::Bool, |v: bool| v as u8 as f64);
    None
}
