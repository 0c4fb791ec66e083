//! Transient interaction state and its store.
//!
//! Everything here is session-scoped: which cell is active, what sits in
//! the input buffer, which rows are selected, which view is showing. None
//! of it is persisted; the autosave task snapshots quote data only.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use quotegrid_engine::item::Column;

/// Application views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum View {
    QuickQuote,
    DetailConfig,
}

impl View {
    /// The full column set a view shows by default.
    pub fn default_columns(self) -> Vec<Column> {
        match self {
            View::QuickQuote => vec![
                Column::Sequence,
                Column::Width,
                Column::Height,
                Column::Type,
                Column::Price,
            ],
            View::DetailConfig => vec![
                Column::Sequence,
                Column::Location,
                Column::Fabric,
                Column::Color,
                Column::Over,
                Column::Oi,
                Column::Lr,
            ],
        }
    }
}

/// The grid cell currently receiving input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveCell {
    pub row: usize,
    pub column: Column,
}

/// All transient UI state.
///
/// INVARIANT: `multi_delete_selection` is non-empty only while
/// `multi_delete_mode` is true, and single-row selection and multi-delete
/// mode are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiState {
    pub active_cell: Option<ActiveCell>,
    pub input_mode: Option<Column>,
    pub input_value: String,
    pub selected_row: Option<usize>,
    pub multi_delete_mode: bool,
    pub multi_delete_selection: BTreeSet<usize>,
    pub sum_outdated: bool,
    pub view: View,
    pub visible_columns: Vec<Column>,
}

impl UiState {
    pub fn new(view: View) -> Self {
        Self {
            active_cell: None,
            input_mode: None,
            input_value: String::new(),
            selected_row: None,
            multi_delete_mode: false,
            multi_delete_selection: BTreeSet::new(),
            sum_outdated: false,
            view,
            visible_columns: view.default_columns(),
        }
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new(View::QuickQuote)
    }
}

/// Owns the UI state. All setters are total and synchronous.
#[derive(Debug, Clone, Default)]
pub struct UiStore {
    state: UiState,
}

impl UiStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    /// Replace the state wholesale, preserving the current view (view mode
    /// survives reset and load).
    pub fn reset(&mut self) {
        self.state = UiState::new(self.state.view);
    }

    pub fn set_active_cell(&mut self, row: usize, column: Column) {
        self.state.active_cell = Some(ActiveCell { row, column });
        self.state.input_mode = Some(column);
    }

    pub fn clear_active_cell(&mut self) {
        self.state.active_cell = None;
        self.state.input_mode = None;
    }

    pub fn set_input_value(&mut self, value: &str) {
        self.state.input_value = value.to_string();
    }

    pub fn append_input_value(&mut self, ch: char) {
        self.state.input_value.push(ch);
    }

    pub fn delete_last_input_char(&mut self) {
        self.state.input_value.pop();
    }

    pub fn clear_input_value(&mut self) {
        self.state.input_value.clear();
    }

    /// Select a row, or deselect it if it was already selected.
    pub fn toggle_row_selection(&mut self, row: usize) {
        self.state.selected_row = if self.state.selected_row == Some(row) {
            None
        } else {
            Some(row)
        };
    }

    pub fn clear_row_selection(&mut self) {
        self.state.selected_row = None;
    }

    /// Enter or leave multi-delete mode. Returns true when entering.
    ///
    /// Entering seeds the batch selection from the current single-row
    /// selection; both directions clear the single selection so the two
    /// selection kinds never coexist.
    pub fn toggle_multi_delete_mode(&mut self) -> bool {
        let entering = !self.state.multi_delete_mode;
        self.state.multi_delete_mode = entering;
        self.state.multi_delete_selection.clear();

        if entering {
            if let Some(row) = self.state.selected_row {
                self.state.multi_delete_selection.insert(row);
            }
        }
        self.clear_row_selection();
        entering
    }

    pub fn toggle_multi_delete_selection(&mut self, row: usize) {
        if !self.state.multi_delete_selection.remove(&row) {
            self.state.multi_delete_selection.insert(row);
        }
    }

    /// The batch selection in the order deletions must run (descending).
    pub fn multi_delete_rows_descending(&self) -> Vec<usize> {
        self.state.multi_delete_selection.iter().rev().copied().collect()
    }

    pub fn set_sum_outdated(&mut self, outdated: bool) {
        self.state.sum_outdated = outdated;
    }

    pub fn set_current_view(&mut self, view: View) {
        self.state.view = view;
    }

    pub fn set_visible_columns(&mut self, columns: Vec<Column>) {
        self.state.visible_columns = columns;
    }
}
