mod cutout;
mod error;
mod mosaic;
mod reduction;
mod spec;

#[cfg(test)]
mod tests;

pub use cutout::{Cutout, CutoutAxis, extract};
pub use error::{Result, SliceError};
pub use mosaic::MosaicLayout;
pub use reduction::Reduction;
pub(crate) use reduction::{nan_max, nan_mean, nan_min};
pub use spec::{DimSlice, RangeSpec, ResolvedRange, TickSource, parse_texts, scalar_dims};
