use ndarray::{ArrayD, IxDyn};

use super::{CoreError, Result};

pub fn permute(data: &ArrayD<f64>, order: &[usize]) -> Result<ArrayD<f64>> {
    let ndim = data.ndim();
    let mut seen = vec![false; ndim];
    let valid = order.len() == ndim
        && order
            .iter()
            .all(|&dim| dim < ndim && !std::mem::replace(&mut seen[dim], true));
    if !valid {
        return Err(CoreError::InvalidPermutation {
            order: order.to_vec(),
            ndim,
        });
    }
    Ok(data.view().permuted_axes(order.to_vec()).to_owned())
}

pub fn reshape(data: &ArrayD<f64>, shape: &[usize]) -> Result<ArrayD<f64>> {
    let count = shape
        .iter()
        .try_fold(1usize, |acc, &n| acc.checked_mul(n));
    if count != Some(data.len()) {
        return Err(CoreError::ReshapeMismatch {
            len: data.len(),
            shape: shape.to_vec(),
        });
    }
    let flat: Vec<f64> = data.iter().copied().collect();
    Ok(ArrayD::from_shape_vec(IxDyn(shape), flat).expect("element count checked above"))
}

/// Reads dimension numbers out of texts like `0,2,1` or `[2, 3, 4]`.
pub fn parse_dims(text: &str) -> Option<Vec<usize>> {
    let trimmed = text
        .trim()
        .trim_start_matches(['[', '('])
        .trim_end_matches([']', ')']);
    let mut dims = Vec::new();
    for part in trimmed.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        dims.push(part.parse().ok()?);
    }
    (!dims.is_empty()).then_some(dims)
}
