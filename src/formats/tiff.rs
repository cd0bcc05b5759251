use std::fs::File;
use std::path::Path;

use ndarray::{Array2, Array3};
use tiff::decoder::{Decoder, DecodingResult};

use crate::model::{DType, Value};

use super::{IoError, Result};

/// Reads every page of a grayscale TIFF. One page stays a 2-D array, a
/// stack becomes width x height x pages. Sample values stay raw.
pub(crate) fn read_tiff(path: &Path) -> Result<Value> {
    let file = File::open(path)?;
    let mut decoder = Decoder::new(file)?;
    let (width, height) = decoder.dimensions()?;
    let mut pages: Vec<Vec<f64>> = Vec::new();
    let mut dtype = DType::F64;

    loop {
        let (page, page_dtype) = decode_page(&mut decoder, width, height)?;
        dtype = if pages.is_empty() {
            page_dtype
        } else {
            dtype.promote(page_dtype)
        };
        pages.push(page);
        if !decoder.more_images() {
            break;
        }
        decoder.next_image()?;
        let (other_width, other_height) = decoder.dimensions()?;
        if (other_width, other_height) != (width, height) {
            return Err(IoError::TiffLayout {
                expected: (width as usize) * (height as usize),
                got: (other_width as usize) * (other_height as usize),
            });
        }
    }

    let (width, height) = (width as usize, height as usize);
    if pages.len() == 1 {
        let page = pages.remove(0);
        let data = Array2::from_shape_vec((height, width), page)
            .expect("page length checked")
            .reversed_axes();
        return Ok(Value::array(data.into_dyn(), dtype));
    }
    let depth = pages.len();
    let flat: Vec<f64> = pages.into_iter().flatten().collect();
    let data = Array3::from_shape_vec((depth, height, width), flat)
        .expect("page lengths checked")
        .permuted_axes([2, 1, 0]);
    Ok(Value::array(data.into_dyn(), dtype))
}

fn decode_page(
    decoder: &mut Decoder<File>,
    width: u32,
    height: u32,
) -> Result<(Vec<f64>, DType)> {
    let expected = (width as usize) * (height as usize);
    let (values, dtype): (Vec<f64>, DType) = match decoder.read_image()? {
        DecodingResult::U8(buffer) => (buffer.into_iter().map(f64::from).collect(), DType::U8),
        DecodingResult::U16(buffer) => (buffer.into_iter().map(f64::from).collect(), DType::U16),
        DecodingResult::U32(buffer) => (buffer.into_iter().map(f64::from).collect(), DType::U32),
        DecodingResult::U64(buffer) => {
            (buffer.into_iter().map(|v| v as f64).collect(), DType::U64)
        }
        DecodingResult::I8(buffer) => (buffer.into_iter().map(f64::from).collect(), DType::I8),
        DecodingResult::I16(buffer) => (buffer.into_iter().map(f64::from).collect(), DType::I16),
        DecodingResult::I32(buffer) => (buffer.into_iter().map(f64::from).collect(), DType::I32),
        DecodingResult::I64(buffer) => {
            (buffer.into_iter().map(|v| v as f64).collect(), DType::I64)
        }
        DecodingResult::F32(buffer) => (buffer.into_iter().map(f64::from).collect(), DType::F32),
        DecodingResult::F64(buffer) => (buffer, DType::F64),
        other => {
            return Err(IoError::UnknownDtype(format!(
                "TIFF sample type {other:?}"
            )));
        }
    };
    if values.len() != expected {
        return Err(IoError::TiffLayout {
            expected,
            got: values.len(),
        });
    }
    Ok((values, dtype))
}
