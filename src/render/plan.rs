use ndarray::{Array1, Array2, Array3, Axis, Ix1, Ix2, Ix3};

use crate::slicing::{Cutout, MosaicLayout, TickSource, nan_max, nan_mean, nan_min};

use super::error::{RenderError, Result};
use super::ticks::{TickLabels, mosaic_ticks};

/// One display toggle, as exposed in the UI and on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleKind {
    Plot2d,
    Scatter,
    Plot3d,
    MinMeanMax,
    PrintFlat,
    Transpose,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlotToggles {
    pub plot_2d: bool,
    pub scatter: bool,
    pub plot_3d: bool,
    pub min_mean_max: bool,
    pub print_flat: bool,
    pub transpose: bool,
}

impl PlotToggles {
    /// Sets one toggle. The 2-D line plot and the min/mean/max plot
    /// exclude each other; switching one on drops the other.
    pub fn set(&mut self, kind: ToggleKind, on: bool) {
        match kind {
            ToggleKind::Plot2d => {
                self.plot_2d = on;
                if on {
                    self.min_mean_max = false;
                }
            }
            ToggleKind::MinMeanMax => {
                self.min_mean_max = on;
                if on {
                    self.plot_2d = false;
                }
            }
            ToggleKind::Scatter => self.scatter = on,
            ToggleKind::Plot3d => self.plot_3d = on,
            ToggleKind::PrintFlat => self.print_flat = on,
            ToggleKind::Transpose => self.transpose = on,
        }
    }
}

/// Plot limits read from the viewer preferences.
#[derive(Debug, Clone, Copy)]
pub struct PlanSettings {
    pub line_limit: usize,
    pub unsafe_plotting: bool,
}

impl Default for PlanSettings {
    fn default() -> PlanSettings {
        PlanSettings {
            line_limit: 500,
            unsafe_plotting: false,
        }
    }
}

/// What the display host should draw. Plans carry plain arrays and tick
/// mappings, never toolkit types.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderPlan {
    Text {
        body: String,
    },
    Line {
        values: Array1<f64>,
        x: TickSource,
    },
    Lines {
        columns: Array2<f64>,
        x: TickSource,
    },
    Scatter {
        x: Array1<f64>,
        y: Array1<f64>,
        sizes: Option<Array1<f64>>,
        colors: Option<Array1<f64>>,
    },
    MinMeanMax {
        min: Array1<f64>,
        mean: Array1<f64>,
        max: Array1<f64>,
        x: TickSource,
    },
    Image {
        raster: Array2<f64>,
        x: TickSource,
        y: TickSource,
    },
    Rgb {
        raster: Array3<f64>,
    },
    Mosaic {
        raster: Array2<f64>,
        layout: MosaicLayout,
        x: TickLabels,
        y: TickLabels,
    },
}

impl RenderPlan {
    pub fn kind(&self) -> &'static str {
        match self {
            RenderPlan::Text { .. } => "text",
            RenderPlan::Line { .. } => "line",
            RenderPlan::Lines { .. } => "lines",
            RenderPlan::Scatter { .. } => "scatter",
            RenderPlan::MinMeanMax { .. } => "min-mean-max",
            RenderPlan::Image { .. } => "image",
            RenderPlan::Rgb { .. } => "rgb",
            RenderPlan::Mosaic { .. } => "mosaic",
        }
    }

    /// Rasters draw with the origin in the upper left; hosts flip the y
    /// axis for these plans.
    pub fn inverts_y(&self) -> bool {
        matches!(
            self,
            RenderPlan::Image { .. } | RenderPlan::Rgb { .. } | RenderPlan::Mosaic { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderOutput {
    pub plan: RenderPlan,
    pub limits: Option<(f64, f64)>,
}

/// Picks the projection for a cutout. Rank decides the family, toggles
/// pick within it; toggles that do not apply to the rank are ignored.
pub fn build_plan(
    cutout: &Cutout,
    toggles: PlotToggles,
    settings: &PlanSettings,
) -> Result<RenderOutput> {
    let limits = cutout.limits();
    let plan = select_plan(cutout, toggles, settings)?;
    Ok(RenderOutput { plan, limits })
}

fn select_plan(
    cutout: &Cutout,
    toggles: PlotToggles,
    settings: &PlanSettings,
) -> Result<RenderPlan> {
    if toggles.print_flat || cutout.ndim() == 0 {
        return Ok(RenderPlan::Text {
            body: cutout.data.to_string(),
        });
    }
    match cutout.ndim() {
        1 => {
            let values = cutout
                .data
                .clone()
                .into_dimensionality::<Ix1>()
                .expect("rank checked above");
            Ok(RenderPlan::Line {
                values,
                x: cutout.display_axes()[0].tick.clone(),
            })
        }
        2 => plan_rank2(cutout, toggles, settings),
        _ => plan_rank_n(cutout, toggles),
    }
}

fn plan_rank2(
    cutout: &Cutout,
    toggles: PlotToggles,
    settings: &PlanSettings,
) -> Result<RenderPlan> {
    let axes = cutout.display_axes();
    let columns = cutout
        .data
        .clone()
        .into_dimensionality::<Ix2>()
        .expect("rank checked above");
    let cols = columns.ncols();
    if toggles.plot_2d {
        if cols > settings.line_limit && !settings.unsafe_plotting {
            return Err(RenderError::TooManyLines {
                count: cols,
                limit: settings.line_limit,
            });
        }
        return Ok(RenderPlan::Lines {
            columns,
            x: axes[0].tick.clone(),
        });
    }
    if toggles.scatter && (2..=4).contains(&cols) {
        return Ok(scatter_plan(&columns));
    }
    if toggles.min_mean_max {
        let min = columns.map_axis(Axis(0), |lane| nan_min(lane.iter().copied()));
        let mean = columns.map_axis(Axis(0), |lane| nan_mean(lane.iter().copied()));
        let max = columns.map_axis(Axis(0), |lane| nan_max(lane.iter().copied()));
        return Ok(RenderPlan::MinMeanMax {
            min,
            mean,
            max,
            x: axes[1].tick.clone(),
        });
    }
    Ok(RenderPlan::Image {
        raster: columns.t().to_owned(),
        x: axes[0].tick.clone(),
        y: axes[1].tick.clone(),
    })
}

/// Columns as scatter channels: the first two are coordinates, a third
/// scales marker sizes into [1, 101], a fourth maps to colors in [0, 1].
fn scatter_plan(columns: &Array2<f64>) -> RenderPlan {
    let x = columns.column(0).to_owned();
    let y = columns.column(1).to_owned();
    let sizes = if columns.ncols() >= 3 {
        scaled(&columns.column(2).to_owned(), 1.0, 100.0)
    } else {
        None
    };
    let colors = if columns.ncols() == 4 {
        scaled(&columns.column(3).to_owned(), 0.0, 1.0)
    } else {
        None
    };
    RenderPlan::Scatter { x, y, sizes, colors }
}

/// Shifts a column to zero and spreads it over `scale` starting at
/// `base`. A column without spread yields nothing.
fn scaled(column: &Array1<f64>, base: f64, scale: f64) -> Option<Array1<f64>> {
    let lo = nan_min(column.iter().copied());
    let shifted = column.mapv(|value| value - lo);
    let hi = nan_max(shifted.iter().copied());
    if !hi.is_finite() || hi <= 0.0 {
        return None;
    }
    Some(shifted.mapv(|value| base + scale * value / hi))
}

fn plan_rank_n(cutout: &Cutout, toggles: PlotToggles) -> Result<RenderPlan> {
    let shape = cutout.shape();
    if toggles.plot_3d && cutout.ndim() == 3 && matches!(shape[2], 3 | 4) {
        return Ok(rgb_plan(cutout));
    }
    let padding = shape[0] / 100 + 1;
    let layout = MosaicLayout::plan(shape, padding)?;
    let raster = layout.flatten(&cutout.data);
    let x = mosaic_ticks(layout.tile_w, padding, layout.width());
    let y = mosaic_ticks(layout.tile_h, padding, layout.height());
    Ok(RenderPlan::Mosaic { raster, layout, x, y })
}

/// A rank-3 cutout with 3 or 4 channels, min-max normalized over all
/// channels at once and reoriented to rows, columns, channels.
fn rgb_plan(cutout: &Cutout) -> RenderPlan {
    let mut raster = cutout
        .data
        .clone()
        .into_dimensionality::<Ix3>()
        .expect("rank checked above");
    if let Some((lo, hi)) = cutout.limits() {
        if hi > lo {
            let span = hi - lo;
            raster.par_mapv_inplace(|value| (value - lo) / span);
        }
    }
    raster.swap_axes(0, 1);
    RenderPlan::Rgb { raster }
}
