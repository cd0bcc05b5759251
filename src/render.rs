mod error;
mod plan;
mod ticks;

#[cfg(test)]
mod tests;

pub use error::{RenderError, Result};
pub use plan::{PlanSettings, PlotToggles, RenderOutput, RenderPlan, ToggleKind, build_plan};
pub use ticks::{
    TickLabels, display_to_source, format_value, list_labels, mosaic_ticks, range_labels,
    source_labels,
};
