//! Plain-text rendering of the quote grid.
//!
//! One table per snapshot: the view's visible columns, a row marker
//! column, the active cell in brackets, then the total line. `quote_table`
//! is the UI-less variant for the one-shot subcommands.

use quotegrid_app::events::Snapshot;
use quotegrid_app::ui_state::UiState;
use quotegrid_engine::item::{Column, QuoteItem};
use quotegrid_engine::quote::QuoteData;

pub fn render(snapshot: &Snapshot) -> String {
    let mut out = table(
        &snapshot.quote,
        &snapshot.ui.visible_columns,
        Some(&snapshot.ui),
    );
    if snapshot.ui.multi_delete_mode {
        out.push_str("mode: multi-delete\n");
    }
    if !snapshot.ui.input_value.is_empty() {
        out.push_str(&format!("input: {}\n", snapshot.ui.input_value));
    }
    out
}

/// The quick-quote table without any interaction state.
pub fn quote_table(quote: &QuoteData) -> String {
    table(
        quote,
        &[
            Column::Sequence,
            Column::Width,
            Column::Height,
            Column::Type,
            Column::Price,
        ],
        None,
    )
}

fn table(quote: &QuoteData, columns: &[Column], ui: Option<&UiState>) -> String {
    let mut rows: Vec<Vec<String>> = Vec::new();

    let mut header: Vec<String> = vec![" ".to_string()];
    header.extend(columns.iter().map(|&c| header_label(c).to_string()));
    rows.push(header);

    for (i, item) in quote.items.iter().enumerate() {
        let marker = match ui {
            Some(ui) if ui.multi_delete_selection.contains(&i) => "x",
            Some(ui) if ui.selected_row == Some(i) => ">",
            _ => " ",
        };
        let mut cells = vec![marker.to_string()];
        for &column in columns {
            let mut text = cell_text(item, i + 1, column);
            let active = ui
                .and_then(|ui| ui.active_cell)
                .is_some_and(|a| a.row == i && a.column == column);
            if active {
                text = format!("[{}]", text);
            }
            cells.push(text);
        }
        rows.push(cells);
    }

    let cols = rows[0].len();
    let widths: Vec<usize> = (0..cols)
        .map(|c| rows.iter().map(|r| r[c].len()).max().unwrap_or(0))
        .collect();

    let mut out = String::new();
    for row in &rows {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, w)| format!("{:<width$}", cell, width = w))
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    }

    let total = quote
        .summary
        .total_sum
        .map(|t| format!("{:.2}", t))
        .unwrap_or_else(|| "-".to_string());
    let outdated = match ui {
        Some(ui) if ui.sum_outdated => " (outdated)",
        _ => "",
    };
    out.push_str(&format!("Total: {}{}\n", total, outdated));
    out
}

fn header_label(column: Column) -> &'static str {
    match column {
        Column::Sequence => "#",
        Column::Width => "Width",
        Column::Height => "Height",
        Column::Type => "Type",
        Column::Price => "Price",
        Column::Location => "Location",
        Column::Fabric => "Fabric",
        Column::Color => "Color",
        Column::Over => "Over",
        Column::Oi => "OI",
        Column::Lr => "LR",
    }
}

fn cell_text(item: &QuoteItem, sequence: usize, column: Column) -> String {
    match column {
        Column::Sequence => sequence.to_string(),
        Column::Width => item.width.map(|v| v.to_string()).unwrap_or_default(),
        Column::Height => item.height.map(|v| v.to_string()).unwrap_or_default(),
        Column::Type => item.fabric_type.map(|t| t.to_string()).unwrap_or_default(),
        Column::Price => item
            .line_price
            .map(|p| format!("{:.2}", p))
            .unwrap_or_default(),
        _ => item.detail.get(column).unwrap_or("").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quotegrid_app::ui_state::UiStore;
    use quotegrid_engine::quote::QuoteStore;

    fn store() -> QuoteStore {
        let mut store = QuoteStore::new();
        store.update_item_value(0, Column::Width, Some(600));
        store.update_item_value(0, Column::Height, Some(900));
        store.cycle_item_type(0);
        store.data_mut().items[0].line_price = Some(118.0);
        store.data_mut().summary.total_sum = Some(118.0);
        store
    }

    #[test]
    fn test_quote_table_lists_rows_and_total() {
        let out = quote_table(store().data());
        assert!(out.contains("Width"));
        assert!(out.contains("600"));
        assert!(out.contains("BO"));
        assert!(out.contains("118.00"));
        assert!(out.contains("Total: 118.00"));
        // The trailing entry row renders with its sequence number only.
        assert!(out.lines().any(|l| l.trim() == "2"));
    }

    #[test]
    fn test_render_marks_active_cell_and_outdated_total() {
        let store = store();
        let mut ui = UiStore::new();
        ui.set_active_cell(0, Column::Width);
        ui.set_sum_outdated(true);
        let out = render(&Snapshot {
            ui: ui.state().clone(),
            quote: store.data().clone(),
        });
        assert!(out.contains("[600]"));
        assert!(out.contains("Total: 118.00 (outdated)"));
    }

    #[test]
    fn test_render_shows_selection_and_mode() {
        let store = store();
        let mut ui = UiStore::new();
        ui.toggle_multi_delete_mode();
        ui.toggle_multi_delete_selection(0);
        let out = render(&Snapshot {
            ui: ui.state().clone(),
            quote: store.data().clone(),
        });
        assert!(out.contains("mode: multi-delete"));
        assert!(out.lines().any(|l| l.starts_with('x')));
    }
}
