use super::{Result, SliceError};

/// One per-dimension slice expression, parsed from the text the user typed.
#[derive(Debug, Clone, PartialEq)]
pub enum DimSlice {
    Scalar(i64),
    List(Vec<i64>),
    Range(RangeSpec),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RangeSpec {
    pub start: Option<i64>,
    pub stop: Option<i64>,
    pub step: Option<i64>,
}

/// Where an axis gets its tick labels from. Ranges carry the literal typed
/// start and step, lists carry the literal index values.
#[derive(Debug, Clone, PartialEq)]
pub enum TickSource {
    Range { start: f64, step: f64 },
    List(Vec<i64>),
}

impl DimSlice {
    pub fn full() -> DimSlice {
        DimSlice::Range(RangeSpec::default())
    }

    /// Parses one dimension's text. Digits make a scalar, a comma makes an
    /// index list, a colon makes a range, empty text selects everything.
    /// Scalar and list entries clamp into `[-size, size-1]`.
    pub fn parse(text: &str, size: usize) -> Result<DimSlice> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(DimSlice::full());
        }
        if text.contains(',') {
            let mut values = Vec::new();
            for part in text.split(',') {
                let part = part.trim();
                if part.is_empty() {
                    continue;
                }
                let value: i64 = part
                    .parse()
                    .map_err(|_| SliceError::BadIndex { text: text.to_string() })?;
                let value = clamp_index(value, size);
                if !values.contains(&value) {
                    values.push(value);
                }
            }
            if values.is_empty() {
                return Err(SliceError::BadIndex { text: text.to_string() });
            }
            return Ok(DimSlice::List(values));
        }
        if text.contains(':') {
            let parts: Vec<&str> = text.split(':').collect();
            if parts.len() > 3 {
                return Err(SliceError::BadRange { text: text.to_string() });
            }
            let mut bounds = [None; 3];
            for (slot, part) in bounds.iter_mut().zip(&parts) {
                let part = part.trim();
                if !part.is_empty() {
                    *slot = Some(part.parse::<i64>().map_err(|_| SliceError::BadRange {
                        text: text.to_string(),
                    })?);
                }
            }
            if bounds[2] == Some(0) {
                return Err(SliceError::ZeroStep);
            }
            return Ok(DimSlice::Range(RangeSpec {
                start: bounds[0],
                stop: bounds[1],
                step: bounds[2],
            }));
        }
        let value: i64 = text
            .parse()
            .map_err(|_| SliceError::BadIndex { text: text.to_string() })?;
        Ok(DimSlice::Scalar(clamp_index(value, size)))
    }

    /// The clamped text to hand back to the input field. Ranges keep
    /// whatever the user typed.
    pub fn canonical_text(&self) -> Option<String> {
        match self {
            DimSlice::Scalar(value) => Some(value.to_string()),
            DimSlice::List(values) => {
                let joined = values
                    .iter()
                    .map(i64::to_string)
                    .collect::<Vec<_>>()
                    .join(",");
                if values.len() == 1 {
                    Some(format!("{joined},"))
                } else {
                    Some(joined)
                }
            }
            DimSlice::Range(_) => None,
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, DimSlice::Scalar(_))
    }

    pub fn tick_source(&self) -> Option<TickSource> {
        match self {
            DimSlice::Scalar(_) => None,
            DimSlice::List(values) => Some(TickSource::List(values.clone())),
            DimSlice::Range(range) => Some(TickSource::Range {
                start: range.start.unwrap_or(0) as f64,
                step: range.step.unwrap_or(1) as f64,
            }),
        }
    }
}

impl RangeSpec {
    /// Start, stop and step against a concrete size, with Python slice
    /// semantics: missing pieces default to the whole dimension, negative
    /// values count from the end, everything clamps into bounds.
    pub fn resolve(&self, size: usize) -> Result<ResolvedRange> {
        let size = size as i64;
        let step = self.step.unwrap_or(1);
        if step == 0 {
            return Err(SliceError::ZeroStep);
        }
        let (lower, upper) = if step > 0 { (0, size) } else { (-1, size - 1) };
        let start = match self.start {
            Some(start) => {
                let start = if start < 0 { start + size } else { start };
                start.clamp(lower, upper)
            }
            None => {
                if step > 0 {
                    lower
                } else {
                    upper
                }
            }
        };
        let stop = match self.stop {
            Some(stop) => {
                let stop = if stop < 0 { stop + size } else { stop };
                stop.clamp(lower, upper)
            }
            None => {
                if step > 0 {
                    upper
                } else {
                    lower
                }
            }
        };
        Ok(ResolvedRange { start, stop, step })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedRange {
    pub start: i64,
    pub stop: i64,
    pub step: i64,
}

impl ResolvedRange {
    pub fn len(&self) -> usize {
        if self.step > 0 {
            if self.stop > self.start {
                ((self.stop - self.start - 1) / self.step + 1) as usize
            } else {
                0
            }
        } else if self.start > self.stop {
            ((self.start - self.stop - 1) / -self.step + 1) as usize
        } else {
            0
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Parses every dimension's text. Malformed texts fall back to the whole
/// dimension and are reported, never fatal.
pub fn parse_texts(texts: &[String], shape: &[usize]) -> (Vec<DimSlice>, Vec<String>) {
    let mut dims = Vec::with_capacity(texts.len());
    let mut notices = Vec::new();
    for (text, &size) in texts.iter().zip(shape) {
        match DimSlice::parse(text, size) {
            Ok(dim) => dims.push(dim),
            Err(err) => {
                notices.push(err.to_string());
                dims.push(DimSlice::full());
            }
        }
    }
    (dims, notices)
}

pub fn scalar_dims(dims: &[DimSlice]) -> Vec<usize> {
    dims.iter()
        .enumerate()
        .filter(|(_, dim)| dim.is_scalar())
        .map(|(index, _)| index)
        .collect()
}

fn clamp_index(value: i64, size: usize) -> i64 {
    if size == 0 {
        return 0;
    }
    let size = size as i64;
    value.clamp(-size, size - 1)
}
