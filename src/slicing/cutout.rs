use ndarray::{ArrayD, Axis, IxDyn, SliceInfo, SliceInfoElem};

use super::{DimSlice, Reduction, ResolvedRange, Result, SliceError, TickSource};

/// One surviving cutout axis: which source dimension it came from, how
/// long it is, and where its tick labels come from.
#[derive(Debug, Clone)]
pub struct CutoutAxis {
    pub source_dim: usize,
    pub len: usize,
    pub tick: TickSource,
}

#[derive(Debug, Clone)]
pub struct Cutout {
    pub data: ArrayD<f64>,
    /// Axis metadata in pre-transpose order.
    pub axes: Vec<CutoutAxis>,
    pub transposed: bool,
}

impl Cutout {
    pub fn ndim(&self) -> usize {
        self.data.ndim()
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// Axis metadata in displayed order: transposing swaps the first two.
    pub fn display_axes(&self) -> Vec<&CutoutAxis> {
        let mut axes: Vec<&CutoutAxis> = self.axes.iter().collect();
        if self.transposed && axes.len() > 1 {
            axes.swap(0, 1);
        }
        axes
    }

    /// NaN-aware (min, max) over the whole cutout.
    pub fn limits(&self) -> Option<(f64, f64)> {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for &value in self.data.iter() {
            if value.is_nan() {
                continue;
            }
            lo = lo.min(value);
            hi = hi.max(value);
        }
        (lo <= hi).then_some((lo, hi))
    }
}

/// Applies the per-dimension slices, the joint reduction over the
/// operation dimensions and the transpose toggle.
///
/// Index lists select first, then scalars and ranges apply as one basic
/// slice; only scalar dimensions lose their axis. The reduction targets
/// shift down by the number of scalar dimensions in front of them.
pub fn extract(
    data: &ArrayD<f64>,
    slices: &[DimSlice],
    op_dims: &[usize],
    reduction: Reduction,
    transpose: bool,
) -> Result<Cutout> {
    let ndim = data.ndim();
    if slices.len() != ndim {
        return Err(SliceError::RankMismatch {
            expected: ndim,
            got: slices.len(),
        });
    }
    if data.shape().contains(&0) {
        return Err(SliceError::EmptyView);
    }

    let mut taken: Option<ArrayD<f64>> = None;
    for (dim, spec) in slices.iter().enumerate() {
        if let DimSlice::List(values) = spec {
            let size = data.shape()[dim];
            let picks: Vec<usize> = values.iter().map(|&v| resolve_index(v, size)).collect();
            let source = taken.as_ref().unwrap_or(data);
            taken = Some(source.select(Axis(dim), &picks));
        }
    }

    let mut elems = Vec::with_capacity(ndim);
    let mut scalars = Vec::new();
    for (dim, spec) in slices.iter().enumerate() {
        let size = data.shape()[dim];
        match spec {
            DimSlice::Scalar(value) => {
                scalars.push(dim);
                elems.push(SliceInfoElem::Index(resolve_index(*value, size) as isize));
            }
            DimSlice::List(_) => {
                elems.push(SliceInfoElem::Slice { start: 0, end: None, step: 1 });
            }
            DimSlice::Range(range) => {
                elems.push(range_elem(range.resolve(size)?));
            }
        }
    }
    let info = SliceInfo::<_, IxDyn, IxDyn>::try_from(elems).expect("one element per axis");
    let base = taken.unwrap_or_else(|| data.clone());
    let mut cut = base.slice_move(info);
    if cut.shape().contains(&0) {
        return Err(SliceError::EmptyView);
    }

    let mut axes: Vec<CutoutAxis> = slices
        .iter()
        .enumerate()
        .filter_map(|(dim, spec)| {
            spec.tick_source().map(|tick| CutoutAxis { source_dim: dim, len: 0, tick })
        })
        .collect();
    for (axis, &len) in axes.iter_mut().zip(cut.shape()) {
        axis.len = len;
    }

    if !reduction.is_none() {
        let mut targets: Vec<usize> = op_dims
            .iter()
            .copied()
            .filter(|dim| *dim < ndim && !scalars.contains(dim))
            .collect();
        targets.sort_unstable();
        targets.dedup();
        let adjusted: Vec<usize> = targets
            .iter()
            .map(|&dim| dim - scalars.iter().filter(|&&s| s < dim).count())
            .collect();
        if !adjusted.is_empty() {
            cut = reduction.apply(&cut, &adjusted);
            for &axis in adjusted.iter().rev() {
                axes.remove(axis);
            }
        }
    }

    let transposed = transpose && cut.ndim() > 1;
    if transposed {
        cut.swap_axes(0, 1);
    }
    Ok(Cutout { data: cut, axes, transposed })
}

fn range_elem(range: ResolvedRange) -> SliceInfoElem {
    if range.is_empty() {
        return SliceInfoElem::Slice { start: 0, end: Some(0), step: 1 };
    }
    if range.step > 0 {
        SliceInfoElem::Slice {
            start: range.start as isize,
            end: Some(range.stop as isize),
            step: range.step as isize,
        }
    } else {
        // A descending selection covers the region (stop, start] and is
        // walked from its upper end.
        SliceInfoElem::Slice {
            start: (range.stop + 1) as isize,
            end: Some((range.start + 1) as isize),
            step: range.step as isize,
        }
    }
}

fn resolve_index(value: i64, size: usize) -> usize {
    let size = size as i64;
    let value = value.clamp(-size, size - 1);
    if value < 0 { (value + size) as usize } else { value as usize }
}
