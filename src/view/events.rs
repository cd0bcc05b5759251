use crate::render::ToggleKind;

/// One user interaction with a view session.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    SliceEdited { dim: usize, text: String },
    ToggleSet { kind: ToggleKind, on: bool },
    ReductionSelected { name: String },
    OperationDimToggled { dim: usize },
    OperationCleared,
    Clicked { x: f64, y: f64, modifier: ClickModifier },
    AnimationToggled { dim: usize },
    AnimationTick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickModifier {
    None,
    Shift,
    Ctrl,
    Alt,
}
