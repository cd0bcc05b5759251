use ndarray::{Array1, ArrayD, Axis, Ix1, IxDyn};

use crate::model::Value;
use crate::render::{
    PlanSettings, RenderOutput, RenderPlan, build_plan, display_to_source, format_value,
};
use crate::slicing::{
    Cutout, MosaicLayout, Reduction, extract, nan_max, nan_mean, nan_min, parse_texts,
};

use super::animation::Animation;
use super::events::{ClickModifier, ViewEvent};
use super::state::ViewState;

/// What one render or event pass hands the host: the plan to draw, an
/// optional inspection annotation, an optional micro plot and any
/// degradation notices.
#[derive(Debug, Default)]
pub struct ViewOutcome {
    pub output: Option<RenderOutput>,
    pub micro: Option<RenderPlan>,
    pub annotation: Option<String>,
    pub annotation_hidden: bool,
    pub notices: Vec<String>,
}

/// One dataset bound to its view state. Applies events, extracts cutouts
/// and picks plans; display failures degrade into notices instead of
/// ending the session.
#[derive(Debug)]
pub struct ViewSession {
    pub key: String,
    pub shape: Vec<usize>,
    pub state: ViewState,
    pub animation: Option<Animation>,
    last_cutout: Option<Cutout>,
    last_click: Option<(i64, i64)>,
}

impl ViewSession {
    pub fn new(key: String, value: &Value, mut state: ViewState) -> ViewSession {
        let shape = value.shape().map(<[usize]>::to_vec).unwrap_or_default();
        state.conform(&shape);
        ViewSession {
            key,
            shape,
            state,
            animation: None,
            last_cutout: None,
            last_click: None,
        }
    }

    /// Parses the slice texts, extracts the cutout and picks a plan.
    /// Scalar and list texts write back in clamped canonical form.
    pub fn render(&mut self, value: &Value, settings: &PlanSettings) -> ViewOutcome {
        let mut outcome = ViewOutcome::default();
        let Some(array) = value.as_array() else {
            self.last_cutout = None;
            outcome.output = Some(RenderOutput {
                plan: RenderPlan::Text {
                    body: text_body(value),
                },
                limits: None,
            });
            return outcome;
        };

        let (dims, mut notices) = parse_texts(&self.state.slice_texts, array.shape());
        for (text, dim) in self.state.slice_texts.iter_mut().zip(&dims) {
            if let Some(canonical) = dim.canonical_text() {
                *text = canonical;
            }
        }
        let cutout = match extract(
            array,
            &dims,
            &self.state.op_dims,
            self.state.reduction,
            self.state.toggles.transpose,
        ) {
            Ok(cutout) => cutout,
            Err(error) => {
                notices.push(error.to_string());
                self.last_cutout = None;
                outcome.notices = notices;
                return outcome;
            }
        };
        match build_plan(&cutout, self.state.toggles, settings) {
            Ok(output) => outcome.output = Some(output),
            Err(error) => notices.push(error.to_string()),
        }
        self.last_cutout = Some(cutout);
        outcome.notices = notices;
        outcome
    }

    /// The cutout of the most recent successful extraction.
    pub fn cutout(&self) -> Option<&Cutout> {
        self.last_cutout.as_ref()
    }

    pub fn handle(
        &mut self,
        event: ViewEvent,
        value: &Value,
        settings: &PlanSettings,
    ) -> ViewOutcome {
        match event {
            ViewEvent::SliceEdited { dim, text } => {
                if dim < self.state.slice_texts.len() {
                    self.state.slice_texts[dim] = text;
                }
                self.render(value, settings)
            }
            ViewEvent::ToggleSet { kind, on } => {
                self.state.toggles.set(kind, on);
                self.render(value, settings)
            }
            ViewEvent::ReductionSelected { name } => match Reduction::parse(&name) {
                Some(reduction) => {
                    self.state.reduction = reduction;
                    if reduction.is_none() {
                        self.state.op_dims.clear();
                    }
                    self.render(value, settings)
                }
                None => {
                    let mut outcome = self.render(value, settings);
                    outcome.notices.push(format!("unknown reduction: {name}"));
                    outcome
                }
            },
            ViewEvent::OperationDimToggled { dim } => {
                if dim < self.shape.len() {
                    match self.state.op_dims.iter().position(|&d| d == dim) {
                        Some(at) => {
                            self.state.op_dims.remove(at);
                        }
                        None => {
                            self.state.op_dims.push(dim);
                            self.state.op_dims.sort_unstable();
                        }
                    }
                }
                self.render(value, settings)
            }
            ViewEvent::OperationCleared => {
                self.state.op_dims.clear();
                self.render(value, settings)
            }
            ViewEvent::AnimationToggled { dim } => self.toggle_animation(dim, value, settings),
            ViewEvent::AnimationTick => {
                if self.animation.is_none() {
                    return ViewOutcome::default();
                }
                self.tick_animation();
                self.render(value, settings)
            }
            ViewEvent::Clicked { x, y, modifier } => {
                self.handle_click(x, y, modifier, value, settings)
            }
        }
    }

    fn toggle_animation(
        &mut self,
        dim: usize,
        value: &Value,
        settings: &PlanSettings,
    ) -> ViewOutcome {
        if dim >= self.shape.len() {
            let mut outcome = ViewOutcome::default();
            outcome.notices.push(format!("no dimension {dim} to animate"));
            return outcome;
        }
        match self.animation.take() {
            Some(previous) if previous.dim == dim => {
                previous.stop(&mut self.state.slice_texts);
            }
            previous => {
                if let Some(previous) = previous {
                    previous.stop(&mut self.state.slice_texts);
                }
                self.state.op_dims.retain(|&other| other != dim);
                self.animation = Some(Animation::begin(dim, &mut self.state.slice_texts));
            }
        }
        self.render(value, settings)
    }

    fn tick_animation(&mut self) {
        if let Some(animation) = &mut self.animation {
            let size = self.shape[animation.dim];
            animation.advance(size, &mut self.state.slice_texts);
        }
    }

    fn handle_click(
        &mut self,
        x: f64,
        y: f64,
        modifier: ClickModifier,
        value: &Value,
        settings: &PlanSettings,
    ) -> ViewOutcome {
        let Some(cutout) = self.last_cutout.clone() else {
            return ViewOutcome::default();
        };
        match modifier {
            ClickModifier::None => self.inspect(&cutout, x, y),
            ClickModifier::Shift => self.pin_clicked_indices(&cutout, x, y, value, settings),
            ClickModifier::Ctrl => self.select_tile(&cutout, x, y, value, settings),
            ClickModifier::Alt => self.micro_plot(&cutout, x, y),
        }
    }

    /// Plain click: annotate the value under the cursor. A second click on
    /// the same rounded position hides the annotation again.
    fn inspect(&mut self, cutout: &Cutout, x: f64, y: f64) -> ViewOutcome {
        let mut outcome = ViewOutcome::default();
        let rounded = (x.round() as i64, y.round() as i64);
        if self.last_click == Some(rounded) {
            self.last_click = None;
            outcome.annotation_hidden = true;
            return outcome;
        }
        let Some(annotation) = self.annotate(cutout, x, y) else {
            return outcome;
        };
        self.last_click = Some(rounded);
        outcome.annotation = Some(annotation);
        outcome
    }

    fn annotate(&self, cutout: &Cutout, x: f64, y: f64) -> Option<String> {
        if self.state.toggles.print_flat || cutout.ndim() == 0 {
            return None;
        }
        match cutout.ndim() {
            1 => {
                let xi = checked_index(x, cutout.shape()[0])?;
                Some(format!("x: {xi}, y: {}", format_value(cutout.data[[xi]])))
            }
            2 => self.annotate_rank2(cutout, x, y),
            _ => self.annotate_rank_n(cutout, x, y),
        }
    }

    fn annotate_rank2(&self, cutout: &Cutout, x: f64, y: f64) -> Option<String> {
        let toggles = &self.state.toggles;
        let shape = cutout.shape();
        let (rows, cols) = (shape[0], shape[1]);
        if toggles.scatter && (2..=4).contains(&cols) {
            let mut best: Option<(f64, usize)> = None;
            for row in 0..rows {
                let dx = cutout.data[[row, 0]] - x;
                let dy = cutout.data[[row, 1]] - y;
                let dist = dx * dx + dy * dy;
                if dist.is_nan() {
                    continue;
                }
                if best.is_none_or(|(closest, _)| dist < closest) {
                    best = Some((dist, row));
                }
            }
            let (_, row) = best?;
            let fields: Vec<String> = (0..cols)
                .map(|col| format_value(cutout.data[[row, col]]))
                .collect();
            return Some(fields.join(", "));
        }
        if toggles.plot_2d {
            let xi = checked_index(x, rows)?;
            let mut best: Option<(f64, usize)> = None;
            for col in 0..cols {
                let dist = (cutout.data[[xi, col]] - y).abs();
                if dist.is_nan() {
                    continue;
                }
                if best.is_none_or(|(closest, _)| dist < closest) {
                    best = Some((dist, col));
                }
            }
            let (_, col) = best?;
            return Some(format!(
                "x: {xi}, line {col}: {}",
                format_value(cutout.data[[xi, col]])
            ));
        }
        if toggles.min_mean_max {
            let xi = checked_index(x, cols)?;
            let column: Vec<f64> = (0..rows).map(|row| cutout.data[[row, xi]]).collect();
            return Some(format!(
                "x: {xi}, min: {}, mean: {}, max: {}",
                format_value(nan_min(column.iter().copied())),
                format_value(nan_mean(column.iter().copied())),
                format_value(nan_max(column.iter().copied())),
            ));
        }
        let xi = checked_index(x, rows)?;
        let yi = checked_index(y, cols)?;
        Some(format!(
            "x: {xi}, y: {yi}, z: {}",
            format_value(cutout.data[[xi, yi]])
        ))
    }

    fn annotate_rank_n(&self, cutout: &Cutout, x: f64, y: f64) -> Option<String> {
        let shape = cutout.shape();
        if self.rgb_displayed(cutout) {
            let xi = checked_index(x, shape[0])?;
            let yi = checked_index(y, shape[1])?;
            let channels: Vec<String> = (0..shape[2])
                .map(|channel| format_value(cutout.data[[xi, yi, channel]]))
                .collect();
            return Some(format!(
                "x: {xi}, y: {yi}, channels: [{}]",
                channels.join(", ")
            ));
        }
        let layout = mosaic_layout(cutout)?;
        let (i0, i1, page) = layout.source_index(x, y)?;
        let mut index = vec![i0, i1];
        index.extend(page.iter().copied());
        let value = cutout.data[IxDyn(&index)];
        Some(format!(
            "x: {i0}, y: {i1}, page: {page:?}, z: {}",
            format_value(value)
        ))
    }

    /// Shift click: write the clicked source indices into the slice texts
    /// of the displayed dimensions, pinning the view to that position.
    fn pin_clicked_indices(
        &mut self,
        cutout: &Cutout,
        x: f64,
        y: f64,
        value: &Value,
        settings: &PlanSettings,
    ) -> ViewOutcome {
        let Some(updates) = self.clicked_source_indices(cutout, x, y) else {
            return ViewOutcome::default();
        };
        for (source_dim, index) in updates {
            if let Some(text) = self.state.slice_texts.get_mut(source_dim) {
                *text = index.to_string();
            }
        }
        self.render(value, settings)
    }

    /// The source index under a click for every displayed axis the click
    /// determines. Only index-addressed displays can answer.
    fn clicked_source_indices(
        &self,
        cutout: &Cutout,
        x: f64,
        y: f64,
    ) -> Option<Vec<(usize, i64)>> {
        let toggles = &self.state.toggles;
        if toggles.print_flat {
            return None;
        }
        let axes = cutout.display_axes();
        let shape = cutout.shape();
        match cutout.ndim() {
            0 => None,
            1 => {
                let xi = checked_index(x, shape[0])?;
                let source = display_to_source(&axes[0].tick, xi as f64)?;
                Some(vec![(axes[0].source_dim, source.round() as i64)])
            }
            2 => {
                if toggles.scatter || toggles.plot_2d || toggles.min_mean_max {
                    return None;
                }
                let xi = checked_index(x, shape[0])?;
                let yi = checked_index(y, shape[1])?;
                let sx = display_to_source(&axes[0].tick, xi as f64)?;
                let sy = display_to_source(&axes[1].tick, yi as f64)?;
                Some(vec![
                    (axes[0].source_dim, sx.round() as i64),
                    (axes[1].source_dim, sy.round() as i64),
                ])
            }
            _ => {
                if self.rgb_displayed(cutout) {
                    let xi = checked_index(x, shape[0])?;
                    let yi = checked_index(y, shape[1])?;
                    let sx = display_to_source(&axes[0].tick, xi as f64)?;
                    let sy = display_to_source(&axes[1].tick, yi as f64)?;
                    return Some(vec![
                        (axes[0].source_dim, sx.round() as i64),
                        (axes[1].source_dim, sy.round() as i64),
                    ]);
                }
                let layout = mosaic_layout(cutout)?;
                let (i0, i1, page) = layout.source_index(x, y)?;
                let mut pairs = vec![
                    (
                        axes[0].source_dim,
                        display_to_source(&axes[0].tick, i0 as f64)?.round() as i64,
                    ),
                    (
                        axes[1].source_dim,
                        display_to_source(&axes[1].tick, i1 as f64)?.round() as i64,
                    ),
                ];
                for (axis, &page_index) in axes[2..].iter().zip(&page) {
                    let source = display_to_source(&axis.tick, page_index as f64)?;
                    pairs.push((axis.source_dim, source.round() as i64));
                }
                Some(pairs)
            }
        }
    }

    /// Ctrl click: pin only the page dimensions of a tiled view to the
    /// clicked tile, keeping the tile axes free.
    fn select_tile(
        &mut self,
        cutout: &Cutout,
        x: f64,
        y: f64,
        value: &Value,
        settings: &PlanSettings,
    ) -> ViewOutcome {
        if cutout.ndim() < 3 || self.rgb_displayed(cutout) {
            return ViewOutcome::default();
        }
        let Some(layout) = mosaic_layout(cutout) else {
            return ViewOutcome::default();
        };
        let Some((_, _, page)) = layout.source_index(x, y) else {
            return ViewOutcome::default();
        };
        let mut updates = Vec::new();
        {
            let axes = cutout.display_axes();
            for (axis, &page_index) in axes[2..].iter().zip(&page) {
                let Some(source) = display_to_source(&axis.tick, page_index as f64) else {
                    return ViewOutcome::default();
                };
                updates.push((axis.source_dim, source.round() as i64));
            }
        }
        for (source_dim, index) in updates {
            if let Some(text) = self.state.slice_texts.get_mut(source_dim) {
                *text = index.to_string();
            }
        }
        self.render(value, settings)
    }

    /// Alt click: a micro line plot of the values along displayed axis 0
    /// through the clicked position.
    fn micro_plot(&self, cutout: &Cutout, x: f64, y: f64) -> ViewOutcome {
        ViewOutcome {
            micro: self.fiber_plan(cutout, x, y),
            ..ViewOutcome::default()
        }
    }

    fn fiber_plan(&self, cutout: &Cutout, x: f64, y: f64) -> Option<RenderPlan> {
        let toggles = &self.state.toggles;
        if toggles.print_flat {
            return None;
        }
        let shape = cutout.shape();
        let trailing: Vec<usize> = match cutout.ndim() {
            0 => return None,
            1 => Vec::new(),
            2 => {
                if toggles.scatter || toggles.plot_2d || toggles.min_mean_max {
                    return None;
                }
                vec![checked_index(y, shape[1])?]
            }
            _ => {
                if self.rgb_displayed(cutout) {
                    return None;
                }
                let layout = mosaic_layout(cutout)?;
                let (_, i1, page) = layout.source_index(x, y)?;
                let mut trailing = vec![i1];
                trailing.extend(page);
                trailing
            }
        };
        let values = fiber(&cutout.data, &trailing);
        Some(RenderPlan::Line {
            values,
            x: cutout.display_axes()[0].tick.clone(),
        })
    }

    fn rgb_displayed(&self, cutout: &Cutout) -> bool {
        self.state.toggles.plot_3d
            && cutout.ndim() == 3
            && matches!(cutout.shape()[2], 3 | 4)
    }
}

fn mosaic_layout(cutout: &Cutout) -> Option<MosaicLayout> {
    if cutout.ndim() < 3 {
        return None;
    }
    let padding = cutout.shape()[0] / 100 + 1;
    MosaicLayout::plan(cutout.shape(), padding).ok()
}

fn checked_index(coord: f64, size: usize) -> Option<usize> {
    let index = coord.round();
    if index < 0.0 || index >= size as f64 {
        return None;
    }
    Some(index as usize)
}

/// The line along axis 0 with every other axis fixed.
fn fiber(data: &ArrayD<f64>, trailing: &[usize]) -> Array1<f64> {
    let mut view = data.view();
    for (offset, &index) in trailing.iter().enumerate().rev() {
        view = view.index_axis_move(Axis(offset + 1), index);
    }
    view.to_owned()
        .into_dimensionality::<Ix1>()
        .expect("one axis left after fixing the others")
}

fn text_body(value: &Value) -> String {
    match value {
        Value::Scalar(scalar) => scalar.to_string(),
        Value::Text(text) => text.clone(),
        Value::TextList(items) => items.join("\n"),
        other => other.summary(),
    }
}
