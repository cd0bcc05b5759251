use std::path::Path;

use hdf5::types::{FloatSize, IntSize, TypeDescriptor, VarLenAscii, VarLenUnicode};
use tracing::warn;

use crate::model::{ArrayRef, DType, Entry, Group, Value};

use super::Result;
use super::util::wrap_array;

/// Walks an HDF5 file (or MATLAB v7.3 file) into a value tree. Datasets
/// with element types the viewer cannot show are skipped with a warning.
pub(crate) fn read_hdf5(path: &Path, max_bytes: u64) -> Result<Group> {
    let file = hdf5::File::open(path)?;
    read_group(&file, path, max_bytes)
}

fn read_group(group: &hdf5::Group, source: &Path, max_bytes: u64) -> Result<Group> {
    let mut out = Group::new();
    for name in group.member_names()? {
        if name == "#refs#" {
            continue;
        }
        if let Ok(child) = group.group(&name) {
            out.insert(name, Entry::Group(read_group(&child, source, max_bytes)?));
            continue;
        }
        let Ok(dataset) = group.dataset(&name) else {
            continue;
        };
        match read_dataset(&dataset, &name, source, max_bytes) {
            Some(value) => {
                out.insert(name, Entry::Leaf(value));
            }
            None => warn!("skipping dataset {name:?}: unrecognized element type"),
        }
    }
    Ok(out)
}

fn read_dataset(
    dataset: &hdf5::Dataset,
    name: &str,
    source: &Path,
    max_bytes: u64,
) -> Option<Value> {
    let descriptor = dataset.dtype().ok()?.to_descriptor().ok()?;
    match &descriptor {
        TypeDescriptor::Integer(_)
        | TypeDescriptor::Unsigned(_)
        | TypeDescriptor::Float(_)
        | TypeDescriptor::Boolean => {
            // Compressed files can hold datasets far larger than the file
            // itself, so the byte guard re-applies to the widened size.
            let widened = (dataset.size() as u64).saturating_mul(size_of::<f64>() as u64);
            if widened > max_bytes {
                warn!("keeping dataset {name:?} as a reference ({widened} bytes widened)");
                return Some(Value::Ref(ArrayRef {
                    source: source.to_path_buf(),
                    dataset: name.to_string(),
                    shape: dataset.shape(),
                    dtype: dtype_for(&descriptor),
                }));
            }
            let data = dataset.read_dyn::<f64>().ok()?;
            Some(wrap_array(data, dtype_for(&descriptor)))
        }
        TypeDescriptor::VarLenUnicode => {
            let strings = dataset.read_dyn::<VarLenUnicode>().ok()?;
            Some(text_value(strings.iter().map(|s| s.to_string()).collect()))
        }
        TypeDescriptor::VarLenAscii => {
            let strings = dataset.read_dyn::<VarLenAscii>().ok()?;
            Some(text_value(strings.iter().map(|s| s.to_string()).collect()))
        }
        _ => None,
    }
}

fn text_value(mut items: Vec<String>) -> Value {
    if items.len() == 1 {
        Value::Text(items.remove(0))
    } else {
        Value::TextList(items)
    }
}

fn dtype_for(descriptor: &TypeDescriptor) -> DType {
    match descriptor {
        TypeDescriptor::Integer(IntSize::U1) => DType::I8,
        TypeDescriptor::Integer(IntSize::U2) => DType::I16,
        TypeDescriptor::Integer(IntSize::U4) => DType::I32,
        TypeDescriptor::Integer(IntSize::U8) => DType::I64,
        TypeDescriptor::Unsigned(IntSize::U1) => DType::U8,
        TypeDescriptor::Unsigned(IntSize::U2) => DType::U16,
        TypeDescriptor::Unsigned(IntSize::U4) => DType::U32,
        TypeDescriptor::Unsigned(IntSize::U8) => DType::U64,
        TypeDescriptor::Float(FloatSize::U4) => DType::F32,
        TypeDescriptor::Boolean => DType::Bool,
        _ => DType::F64,
    }
}
