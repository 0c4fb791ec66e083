//! Focus rules: where the active cell lands after each structural action.

use serde::{Deserialize, Serialize};

use quotegrid_engine::item::Column;
use quotegrid_engine::quote::QuoteStore;

use crate::ui_state::UiStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// After inserting: the new row's width cell, selection dropped.
pub fn focus_after_insert(ui: &mut UiStore, new_row: usize) {
    ui.set_active_cell(new_row, Column::Width);
    ui.clear_input_value();
    ui.clear_row_selection();
}

/// After a single delete: the row now occupying the deleted position, or
/// the last row when the position fell off the end.
pub fn focus_after_delete(ui: &mut UiStore, quote: &QuoteStore, deleted_row: usize) {
    let last = quote.len().saturating_sub(1);
    ui.set_active_cell(deleted_row.min(last), Column::Width);
    ui.clear_input_value();
}

/// After clearing: the cleared row's width cell.
pub fn focus_after_clear(ui: &mut UiStore, row: usize) {
    ui.set_active_cell(row, Column::Width);
    ui.clear_input_value();
}

/// After committing a value: the next row down whose cell in the same
/// column is still empty; with nothing left to fill, the active cell is
/// cleared.
pub fn focus_after_commit(ui: &mut UiStore, quote: &QuoteStore) {
    let Some(cell) = ui.state().active_cell else {
        return;
    };
    let column = cell.column;
    let next = quote
        .items()
        .iter()
        .enumerate()
        .skip(cell.row + 1)
        .find(|(_, item)| match column {
            Column::Width => item.width.is_none(),
            Column::Height => item.height.is_none(),
            _ => false,
        })
        .map(|(row, _)| row);

    match next {
        Some(row) => ui.set_active_cell(row, column),
        None => ui.clear_active_cell(),
    }
    ui.clear_input_value();
}

/// Jump to the first row whose cell in `column` is empty (the last row
/// qualifies by construction; it is the fallback regardless).
pub fn focus_first_empty_cell(ui: &mut UiStore, quote: &QuoteStore, column: Column) {
    let row = quote
        .items()
        .iter()
        .position(|item| match column {
            Column::Width => item.width.is_none(),
            Column::Height => item.height.is_none(),
            _ => true,
        })
        .unwrap_or_else(|| quote.len().saturating_sub(1));
    ui.set_active_cell(row, column);
    ui.clear_input_value();
}

/// Move the active cell one step within the grid.
///
/// The column order is the current view's editable columns (sequence and
/// price are display-only); rows span the whole item list. Moving past an
/// edge is a no-op. Arriving on a dimension cell loads its value into the
/// input buffer.
pub fn move_active_cell(ui: &mut UiStore, quote: &QuoteStore, direction: Direction) {
    let columns: Vec<Column> = ui
        .state()
        .visible_columns
        .iter()
        .copied()
        .filter(|c| !matches!(c, Column::Sequence | Column::Price))
        .collect();
    if columns.is_empty() || quote.is_empty() {
        return;
    }

    let Some(cell) = ui.state().active_cell else {
        // No active cell yet: enter the grid at its top-left editable cell.
        sync_active_cell(ui, quote, 0, columns[0]);
        return;
    };

    let col_idx = columns.iter().position(|&c| c == cell.column).unwrap_or(0);
    let last_row = quote.len() - 1;

    let (row, col_idx) = match direction {
        Direction::Up if cell.row > 0 => (cell.row - 1, col_idx),
        Direction::Down if cell.row < last_row => (cell.row + 1, col_idx),
        Direction::Left if col_idx > 0 => (cell.row, col_idx - 1),
        Direction::Right if col_idx + 1 < columns.len() => (cell.row, col_idx + 1),
        _ => return, // at the edge
    };
    sync_active_cell(ui, quote, row, columns[col_idx]);
}

fn sync_active_cell(ui: &mut UiStore, quote: &QuoteStore, row: usize, column: Column) {
    ui.set_active_cell(row, column);
    let value = quote.item(row).and_then(|item| match column {
        Column::Width => item.width.map(|v| v.to_string()),
        Column::Height => item.height.map(|v| v.to_string()),
        _ => None,
    });
    ui.set_input_value(value.as_deref().unwrap_or(""));
}

#[cfg(test)]
mod tests {
    use super::*;
    use quotegrid_engine::item::Column;

    fn store_with_rows(widths: &[Option<u32>]) -> QuoteStore {
        let mut store = QuoteStore::new();
        for (i, w) in widths.iter().enumerate() {
            if let Some(w) = w {
                store.update_item_value(i, Column::Width, Some(*w));
                store.update_item_value(i, Column::Height, Some(*w));
            }
        }
        store
    }

    #[test]
    fn test_focus_after_delete_clamps_to_last_row() {
        let quote = store_with_rows(&[Some(600), Some(700)]); // 3 rows
        let mut ui = UiStore::new();
        focus_after_delete(&mut ui, &quote, 1);
        assert_eq!(ui.state().active_cell.unwrap().row, 1);
        focus_after_delete(&mut ui, &quote, 9);
        assert_eq!(ui.state().active_cell.unwrap().row, 2);
    }

    #[test]
    fn test_focus_after_commit_finds_next_empty_same_column() {
        let mut quote = store_with_rows(&[Some(600), Some(700)]); // 3 rows
        quote.update_item_value(1, Column::Height, None); // hole at row 1
        let mut ui = UiStore::new();
        ui.set_active_cell(0, Column::Height);
        focus_after_commit(&mut ui, &quote);
        let cell = ui.state().active_cell.unwrap();
        assert_eq!((cell.row, cell.column), (1, Column::Height));
        assert_eq!(ui.state().input_value, "");
    }

    #[test]
    fn test_focus_after_commit_clears_when_done() {
        let quote = store_with_rows(&[Some(600)]);
        let mut ui = UiStore::new();
        // Active on the trailing row's width; no later row has an empty
        // width cell.
        ui.set_active_cell(1, Column::Width);
        focus_after_commit(&mut ui, &quote);
        assert_eq!(ui.state().active_cell, None);
    }

    #[test]
    fn test_focus_first_empty_cell_picks_first_hole() {
        let mut quote = store_with_rows(&[Some(600), Some(700), Some(800)]);
        quote.update_item_value(1, Column::Width, None);
        let mut ui = UiStore::new();
        focus_first_empty_cell(&mut ui, &quote, Column::Width);
        assert_eq!(ui.state().active_cell.unwrap().row, 1);
    }

    #[test]
    fn test_move_bounded_by_grid_edges() {
        let quote = store_with_rows(&[Some(600)]); // 2 rows
        let mut ui = UiStore::new();

        // First move enters the grid.
        move_active_cell(&mut ui, &quote, Direction::Down);
        let cell = ui.state().active_cell.unwrap();
        assert_eq!((cell.row, cell.column), (0, Column::Width));
        assert_eq!(ui.state().input_value, "600");

        move_active_cell(&mut ui, &quote, Direction::Up); // edge: no-op
        assert_eq!(ui.state().active_cell.unwrap().row, 0);

        move_active_cell(&mut ui, &quote, Direction::Right);
        assert_eq!(ui.state().active_cell.unwrap().column, Column::Height);
        move_active_cell(&mut ui, &quote, Direction::Right);
        assert_eq!(ui.state().active_cell.unwrap().column, Column::Type);
        move_active_cell(&mut ui, &quote, Direction::Right); // edge: no-op
        assert_eq!(ui.state().active_cell.unwrap().column, Column::Type);

        move_active_cell(&mut ui, &quote, Direction::Down);
        let cell = ui.state().active_cell.unwrap();
        assert_eq!(cell.row, 1);
        assert_eq!(ui.state().input_value, "");
        move_active_cell(&mut ui, &quote, Direction::Down); // edge: no-op
        assert_eq!(ui.state().active_cell.unwrap().row, 1);
    }
}
