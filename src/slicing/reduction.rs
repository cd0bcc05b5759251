use ndarray::{ArrayD, ArrayView1, Axis, IxDyn};

/// Reductions applied over the operation dimensions. All of them ignore
/// NaN values; a lane without any finite value reduces to NaN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Reduction {
    #[default]
    None,
    Min,
    Max,
    Mean,
    Median,
}

impl Reduction {
    pub fn parse(name: &str) -> Option<Reduction> {
        match name.trim() {
            "None" | "none" => Some(Reduction::None),
            "nanmin" | "min" => Some(Reduction::Min),
            "nanmax" | "max" => Some(Reduction::Max),
            "nanmean" | "mean" => Some(Reduction::Mean),
            "nanmedian" | "median" => Some(Reduction::Median),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Reduction::None => "None",
            Reduction::Min => "nanmin",
            Reduction::Max => "nanmax",
            Reduction::Mean => "nanmean",
            Reduction::Median => "nanmedian",
        }
    }

    pub fn is_none(self) -> bool {
        self == Reduction::None
    }

    /// Reduces jointly over `axes`: the reduced axes merge into a single
    /// lane per output element, so the statistic covers all of them at
    /// once rather than folding one axis at a time.
    pub fn apply(self, data: &ArrayD<f64>, axes: &[usize]) -> ArrayD<f64> {
        if self.is_none() || axes.is_empty() {
            return data.clone();
        }
        let ndim = data.ndim();
        let mut order: Vec<usize> = (0..ndim).filter(|dim| !axes.contains(dim)).collect();
        let mut shape: Vec<usize> = order.iter().map(|&dim| data.shape()[dim]).collect();
        order.extend_from_slice(axes);
        let merged: usize = axes.iter().map(|&dim| data.shape()[dim]).product();
        shape.push(merged);

        let lane_axis = Axis(shape.len() - 1);
        let flat: Vec<f64> = data.view().permuted_axes(order).iter().copied().collect();
        let stacked =
            ArrayD::from_shape_vec(IxDyn(&shape), flat).expect("axis merge keeps the element count");
        match self {
            Reduction::Min => stacked.map_axis(lane_axis, |lane| nan_min(lane.iter().copied())),
            Reduction::Max => stacked.map_axis(lane_axis, |lane| nan_max(lane.iter().copied())),
            Reduction::Mean => stacked.map_axis(lane_axis, |lane| nan_mean(lane.iter().copied())),
            Reduction::Median => {
                stacked.map_axis(lane_axis, |lane: ArrayView1<f64>| nan_median(lane.iter().copied()))
            }
            Reduction::None => unreachable!("handled above"),
        }
    }
}

pub(crate) fn nan_min(values: impl Iterator<Item = f64>) -> f64 {
    values.filter(|v| !v.is_nan()).fold(f64::NAN, f64::min)
}

pub(crate) fn nan_max(values: impl Iterator<Item = f64>) -> f64 {
    values.filter(|v| !v.is_nan()).fold(f64::NAN, f64::max)
}

pub(crate) fn nan_mean(values: impl Iterator<Item = f64>) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for value in values {
        if !value.is_nan() {
            sum += value;
            count += 1;
        }
    }
    if count == 0 { f64::NAN } else { sum / count as f64 }
}

pub(crate) fn nan_median(values: impl Iterator<Item = f64>) -> f64 {
    let mut finite: Vec<f64> = values.filter(|v| !v.is_nan()).collect();
    if finite.is_empty() {
        return f64::NAN;
    }
    finite.sort_unstable_by(f64::total_cmp);
    let mid = finite.len() / 2;
    if finite.len() % 2 == 1 {
        finite[mid]
    } else {
        (finite[mid - 1] + finite[mid]) / 2.0
    }
}
