use std::collections::HashMap;

use crate::render::PlotToggles;
use crate::slicing::Reduction;

/// Display state for one dataset: slice texts, operation dimensions, the
/// reduction and the plot toggles.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub slice_texts: Vec<String>,
    pub op_dims: Vec<usize>,
    pub reduction: Reduction,
    pub toggles: PlotToggles,
}

impl ViewState {
    /// Fresh state for a shape: the first two dimensions show fully, the
    /// rest pin to index zero.
    pub fn for_shape(shape: &[usize]) -> ViewState {
        ViewState {
            slice_texts: default_texts(shape),
            op_dims: Vec::new(),
            reduction: Reduction::None,
            toggles: PlotToggles::default(),
        }
    }

    /// Re-targets saved state at a possibly different shape. A rank change
    /// resets the slice texts but keeps toggles and reduction; operation
    /// dimensions past the new rank drop.
    pub fn conform(&mut self, shape: &[usize]) {
        if self.slice_texts.len() != shape.len() {
            self.slice_texts = default_texts(shape);
        }
        self.op_dims.retain(|&dim| dim < shape.len());
    }
}

fn default_texts(shape: &[usize]) -> Vec<String> {
    (0..shape.len())
        .map(|dim| if dim < 2 { String::new() } else { "0".to_string() })
        .collect()
}

/// Remembers the view state of every dataset ever displayed, so switching
/// back restores slices and toggles exactly.
#[derive(Debug, Default)]
pub struct ViewStateStore {
    states: HashMap<String, ViewState>,
}

impl ViewStateStore {
    pub fn key(path: &[String]) -> String {
        path.join("/")
    }

    pub fn save(&mut self, key: &str, state: ViewState) {
        self.states.insert(key.to_string(), state);
    }

    pub fn restore(&self, key: &str, shape: &[usize]) -> ViewState {
        match self.states.get(key) {
            Some(saved) => {
                let mut state = saved.clone();
                state.conform(shape);
                state
            }
            None => ViewState::for_shape(shape),
        }
    }

    pub fn forget(&mut self, key: &str) {
        self.states.remove(key);
    }

    /// Follows a dimension permutation of the stored dataset: slice texts
    /// move with their dimensions and operation dimensions renumber.
    pub fn permute(&mut self, key: &str, order: &[usize]) {
        let Some(state) = self.states.get_mut(key) else {
            return;
        };
        if state.slice_texts.len() != order.len() {
            return;
        }
        state.slice_texts = order
            .iter()
            .map(|&dim| state.slice_texts[dim].clone())
            .collect();
        let mut op_dims: Vec<usize> = state
            .op_dims
            .iter()
            .filter_map(|&dim| order.iter().position(|&source| source == dim))
            .collect();
        op_dims.sort_unstable();
        state.op_dims = op_dims;
    }
}
