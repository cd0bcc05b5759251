use crate::slicing::TickSource;

/// Explicit tick positions with one label each, for hosts that cannot run
/// a formatter callback per tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickLabels {
    pub positions: Vec<f64>,
    pub labels: Vec<String>,
}

/// Labels the tick positions a plotting host picked for a range-sliced
/// axis. The label restates the source index: the typed start plus the
/// typed step scaled by the host's tick spacing. With fewer than three
/// positions the spacing falls back to one.
pub fn range_labels(positions: &[f64], start: f64, step: f64) -> Vec<String> {
    let spacing = if positions.len() >= 3 {
        positions[2] - positions[1]
    } else {
        1.0
    };
    (0..positions.len())
        .map(|index| {
            let value = (index as f64 - 1.0) * spacing * step + start;
            format_index(value)
        })
        .collect()
}

/// Labels for a list-sliced axis: one position per selected index, labeled
/// with the index the user typed.
pub fn list_labels(values: &[i64]) -> TickLabels {
    TickLabels {
        positions: (0..values.len()).map(|index| index as f64).collect(),
        labels: values.iter().map(i64::to_string).collect(),
    }
}

/// Labels either kind of axis at the host's positions.
pub fn source_labels(tick: &TickSource, positions: &[f64]) -> Vec<String> {
    match tick {
        TickSource::Range { start, step } => range_labels(positions, *start, *step),
        TickSource::List(values) => positions
            .iter()
            .map(|&pos| {
                let index = pos.round();
                if index >= 0.0 && (index as usize) < values.len() {
                    values[index as usize].to_string()
                } else {
                    String::new()
                }
            })
            .collect(),
    }
}

/// Grid ticks for a mosaic raster: one tick per tile boundary along one
/// raster axis, labeled with the cumulative tile coordinate so padding
/// cells do not shift the numbers.
pub fn mosaic_ticks(tile: usize, padding: usize, extent: usize) -> TickLabels {
    let stride = (tile + padding) as i64;
    let mut positions = Vec::new();
    let mut labels = Vec::new();
    let mut pos = -stride;
    let mut index = 0i64;
    while pos < extent as i64 {
        positions.push(pos as f64);
        labels.push(((index - 1) * tile as i64).to_string());
        pos += stride;
        index += 1;
    }
    TickLabels { positions, labels }
}

/// Maps a display coordinate back to the source index it shows. Range
/// axes rescale through the typed start and step, list axes look the
/// rounded position up in the typed indices.
pub fn display_to_source(tick: &TickSource, display: f64) -> Option<f64> {
    match tick {
        TickSource::Range { start, step } => Some(step * display + start),
        TickSource::List(values) => {
            let index = display.round();
            if index < 0.0 {
                return None;
            }
            values.get(index as usize).map(|&value| value as f64)
        }
    }
}

/// Five significant decimals, switching to scientific notation outside
/// (1e-5, 1e5).
pub fn format_value(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude > 1e-5 && magnitude < 1e5 {
        format!("{value:.5}")
    } else {
        format!("{value:.5e}")
    }
}

fn format_index(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format_value(value)
    }
}
