use std::path::Path;

use ndarray::{ArrayD, IxDyn};

use crate::model::{DType, Entry, Group, Value};

use super::{IoError, Result};

pub(crate) fn extension(path: &Path) -> Result<String> {
    path.extension()
        .and_then(|value| value.to_str())
        .map(|value| value.to_ascii_lowercase())
        .ok_or_else(|| IoError::UnsupportedFormat(path.to_string_lossy().to_string()))
}

/// Tree key for a loaded file: its directory name and file name, so two
/// files with the same name from different runs stay apart.
pub(crate) fn file_key(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|part| part.to_string_lossy().to_string())
        .unwrap_or_default();
    let parent = path
        .parent()
        .and_then(Path::file_name)
        .map(|part| part.to_string_lossy().to_string())
        .unwrap_or_default();
    format!("{parent} - {name}")
}

/// Zero-dimensional arrays become plain scalars.
pub(crate) fn wrap_array(data: ArrayD<f64>, dtype: DType) -> Value {
    if data.ndim() == 0 {
        Value::Scalar(data.iter().next().copied().unwrap_or(f64::NAN))
    } else {
        Value::array(data, dtype)
    }
}

/// Moves every array's first axis to the end, recursively. Lets data
/// recorded frame-first display frame-last without editing each member.
pub(crate) fn switch_first_to_last(group: &mut Group) {
    for entry in group.values_mut() {
        match entry {
            Entry::Group(child) => switch_first_to_last(child),
            Entry::Leaf(Value::Array { data, .. }) if data.ndim() > 1 => {
                let mut order: Vec<usize> = (1..data.ndim()).collect();
                order.push(0);
                let moved = std::mem::replace(data, ArrayD::zeros(IxDyn(&[0])));
                *data = moved.permuted_axes(order);
            }
            Entry::Leaf(_) => {}
        }
    }
}
