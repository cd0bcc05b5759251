use ndarray::{Array2, ArrayD};

use super::{Result, SliceError};

/// Tiling of a rank >= 3 cutout into a 2-D page grid. Cutout dimension 0
/// runs along x, dimension 1 along y, and the trailing dimensions flatten
/// row-major into pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MosaicLayout {
    pub tile_w: usize,
    pub tile_h: usize,
    pub page_dims: Vec<usize>,
    pub pages: usize,
    pub rows: usize,
    pub cols: usize,
    pub padding: usize,
}

impl MosaicLayout {
    /// Grid choice: a rank-4 cutout with a page aspect ratio inside
    /// (0.18, 5.5) keeps its two page dimensions as the grid; otherwise
    /// the column count is the smallest divisor of the page count whose
    /// square reaches it.
    pub fn plan(shape: &[usize], padding: usize) -> Result<MosaicLayout> {
        if shape.len() < 3 {
            return Err(SliceError::NotAMosaic { ndim: shape.len() });
        }
        let tile_w = shape[0];
        let tile_h = shape[1];
        let page_dims = shape[2..].to_vec();
        let pages: usize = page_dims.iter().product();
        if tile_w == 0 || tile_h == 0 || pages == 0 {
            return Err(SliceError::EmptyView);
        }
        let (rows, cols) = if shape.len() == 4 && aspect_ok(shape[2], shape[3]) {
            (shape[2], shape[3])
        } else {
            let cols = smallest_grid_divisor(pages);
            (pages / cols, cols)
        };
        Ok(MosaicLayout {
            tile_w,
            tile_h,
            page_dims,
            pages,
            rows,
            cols,
            padding,
        })
    }

    pub fn width(&self) -> usize {
        self.padding + self.cols * (self.tile_w + self.padding)
    }

    pub fn height(&self) -> usize {
        self.padding + self.rows * (self.tile_h + self.padding)
    }

    /// Lays the pages out into one 2-D raster, each tile transposed so
    /// cutout dimension 0 runs along x. Padding cells stay NaN.
    pub fn flatten(&self, cutout: &ArrayD<f64>) -> Array2<f64> {
        let mut out = Array2::from_elem((self.height(), self.width()), f64::NAN);
        let flat: Vec<f64> = cutout.iter().copied().collect();
        for page in 0..self.pages {
            let x0 = self.padding + (page % self.cols) * (self.tile_w + self.padding);
            let y0 = self.padding + (page / self.cols) * (self.tile_h + self.padding);
            for i0 in 0..self.tile_w {
                for i1 in 0..self.tile_h {
                    out[[y0 + i1, x0 + i0]] = flat[(i0 * self.tile_h + i1) * self.pages + page];
                }
            }
        }
        out
    }

    /// Maps a raster position back to the cutout index it displays:
    /// intra-tile coordinates plus the unraveled page index. Positions in
    /// the padding or past the grid map to nothing. Exact left inverse of
    /// `flatten` on every valid index.
    pub fn source_index(&self, x: f64, y: f64) -> Option<(usize, usize, Vec<usize>)> {
        let x = x.round() as i64 - self.padding as i64;
        let y = y.round() as i64 - self.padding as i64;
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        let stride_x = self.tile_w + self.padding;
        let stride_y = self.tile_h + self.padding;
        let bx = x / stride_x;
        let by = y / stride_y;
        if bx >= self.cols || by >= self.rows {
            return None;
        }
        let i0 = x % stride_x;
        let i1 = y % stride_y;
        if i0 >= self.tile_w || i1 >= self.tile_h {
            return None;
        }
        let page = by * self.cols + bx;
        if page >= self.pages {
            return None;
        }
        Some((i0, i1, unravel(page, &self.page_dims)))
    }
}

fn aspect_ok(rows: usize, cols: usize) -> bool {
    let ratio = rows as f64 / cols as f64;
    ratio > 0.18 && ratio < 5.5
}

fn smallest_grid_divisor(pages: usize) -> usize {
    (1..=pages)
        .find(|n| pages % n == 0 && n * n >= pages)
        .unwrap_or(pages)
}

fn unravel(mut index: usize, dims: &[usize]) -> Vec<usize> {
    let mut out = vec![0; dims.len()];
    for (slot, &size) in out.iter_mut().zip(dims).rev() {
        *slot = index % size;
        index /= size;
    }
    out
}
