use std::path::Path;

use image::{DynamicImage, GrayImage, ImageBuffer, Luma, Pixel, Rgb, RgbImage, Rgba, RgbaImage};
use ndarray::{Array2, Array3};
use rayon::prelude::*;

use crate::model::{DType, Value};
use crate::slicing::{nan_max, nan_min};

use super::{IoError, Result};

/// Reads a common raster image. Grayscale becomes a 2-D array, color a
/// 3-D array with channels last; dimension 0 runs along image width in
/// both. Sample values stay raw.
pub(crate) fn read_raster(path: &Path) -> Result<Value> {
    let image = image::open(path)?;
    Ok(match image {
        DynamicImage::ImageLuma8(gray) => gray_value(&gray, DType::U8),
        DynamicImage::ImageLuma16(gray) => gray_value(&gray, DType::U16),
        image if image.color().has_alpha() => color_value(&image.to_rgba8(), 4),
        image => color_value(&image.to_rgb8(), 3),
    })
}

fn gray_value<P>(image: &ImageBuffer<Luma<P>, Vec<P>>, dtype: DType) -> Value
where
    P: image::Primitive,
    f64: From<P>,
{
    let (width, height) = image.dimensions();
    let mut data = Array2::zeros((width as usize, height as usize));
    for (x, y, pixel) in image.enumerate_pixels() {
        data[[x as usize, y as usize]] = f64::from(pixel.0[0]);
    }
    Value::array(data.into_dyn(), dtype)
}

fn color_value<Px>(image: &ImageBuffer<Px, Vec<u8>>, channels: usize) -> Value
where
    Px: Pixel<Subpixel = u8>,
{
    let (width, height) = image.dimensions();
    let mut data = Array3::zeros((width as usize, height as usize, channels));
    for (x, y, pixel) in image.enumerate_pixels() {
        for (c, &sample) in pixel.channels().iter().take(channels).enumerate() {
            data[[x as usize, y as usize, c]] = f64::from(sample);
        }
    }
    Value::array(data.into_dyn(), DType::U8)
}

/// Writes a display raster as an 8-bit grayscale PNG, min-max scaled.
/// NaN cells write as black.
pub fn write_gray_png(path: &Path, raster: &Array2<f64>) -> Result<()> {
    let (height, width) = raster.dim();
    let samples = scale_to_u8(raster);
    let image = GrayImage::from_raw(width as u32, height as u32, samples)
        .expect("buffer length matches the dimensions");
    image.save(path)?;
    Ok(())
}

/// Writes a unit-normalized color raster (rows, columns, channels) as a
/// PNG, with or without alpha.
pub fn write_rgb_png(path: &Path, raster: &Array3<f64>) -> Result<()> {
    let (height, width, channels) = raster.dim();
    if channels < 3 {
        return Err(IoError::ChannelCount { channels, needed: 3 });
    }
    let sample = |y: u32, x: u32, c: usize| {
        let value = raster[[y as usize, x as usize, c]];
        if value.is_nan() {
            0
        } else {
            (value.clamp(0.0, 1.0) * 255.0).round() as u8
        }
    };
    if channels >= 4 {
        let image = RgbaImage::from_fn(width as u32, height as u32, |x, y| {
            Rgba([sample(y, x, 0), sample(y, x, 1), sample(y, x, 2), sample(y, x, 3)])
        });
        image.save(path)?;
    } else {
        let image = RgbImage::from_fn(width as u32, height as u32, |x, y| {
            Rgb([sample(y, x, 0), sample(y, x, 1), sample(y, x, 2)])
        });
        image.save(path)?;
    }
    Ok(())
}

fn scale_to_u8(raster: &Array2<f64>) -> Vec<u8> {
    let lo = nan_min(raster.iter().copied());
    let hi = nan_max(raster.iter().copied());
    let span = if hi > lo { hi - lo } else { 1.0 };
    let values: Vec<f64> = raster.iter().copied().collect();
    values
        .par_iter()
        .map(|&value| {
            if value.is_nan() {
                0
            } else {
                (((value - lo) / span).clamp(0.0, 1.0) * 255.0).round() as u8
            }
        })
        .collect()
}
