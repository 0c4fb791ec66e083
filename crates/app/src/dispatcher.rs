//! The intent dispatcher.
//!
//! Owns the two stores and the pricing setup, maps every named user intent
//! to an ordered sequence of store calls, and returns the outputs for that
//! intent. State-mutating intents end with exactly one `StateChanged`
//! snapshot; notices and dialog requests precede it.

use std::path::PathBuf;
use std::time::Duration;

use quotegrid_config::PriceBook;
use quotegrid_engine::calc;
use quotegrid_engine::item::Column;
use quotegrid_engine::pricing::{PricingStrategy, RollerBlindStrategy};
use quotegrid_engine::quote::QuoteStore;
use quotegrid_io::snapshot::SnapshotStore;
use quotegrid_io::{csv, json};

use crate::autosave::{Autosave, AUTOSAVE_INTERVAL};
use crate::events::{Intent, NumKey, Output, Snapshot};
use crate::focus::{self, Direction};
use crate::ui_state::{UiStore, View};
use crate::views::{self, Handled, ViewCtx};

pub struct Dispatcher {
    quote: QuoteStore,
    ui: UiStore,
    strategy: RollerBlindStrategy,
    pricebook: PriceBook,
    save_dir: PathBuf,
    autosave: Autosave,
}

impl Dispatcher {
    pub fn new(pricebook: PriceBook, save_dir: PathBuf, store: Option<SnapshotStore>) -> Self {
        Self::with_autosave_interval(pricebook, save_dir, store, AUTOSAVE_INTERVAL)
    }

    pub fn with_autosave_interval(
        pricebook: PriceBook,
        save_dir: PathBuf,
        store: Option<SnapshotStore>,
        interval: Duration,
    ) -> Self {
        Self {
            quote: QuoteStore::new(),
            ui: UiStore::new(),
            strategy: RollerBlindStrategy::new(),
            pricebook,
            save_dir,
            autosave: Autosave::new(store, interval),
        }
    }

    pub fn quote(&self) -> &QuoteStore {
        &self.quote
    }

    pub fn ui(&self) -> &UiStore {
        &self.ui
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            ui: self.ui.state().clone(),
            quote: self.quote.data().clone(),
        }
    }

    /// The snapshot the renderer draws before any intent arrives.
    pub fn initial_state(&self) -> Vec<Output> {
        vec![Output::StateChanged(self.snapshot())]
    }

    // ---- startup snapshot restore ----

    /// A restorable autosave snapshot from a previous session, if any.
    pub fn pending_snapshot(&self) -> bool {
        self.autosave.load_snapshot().is_some()
    }

    /// Adopt the autosaved quote. The total is untrusted until the
    /// operator recalculates.
    pub fn restore_snapshot(&mut self) {
        if let Some(data) = self.autosave.load_snapshot() {
            self.quote = QuoteStore::from_data(data);
            self.ui.set_sum_outdated(true);
        }
        self.autosave.restart();
    }

    pub fn discard_snapshot(&mut self) {
        self.autosave.discard();
        self.autosave.restart();
    }

    /// Host loop hook: autosave when its interval has elapsed.
    pub fn autosave_tick(&mut self) {
        self.autosave.tick(&self.quote);
    }

    // ---- intent dispatch ----

    pub fn dispatch(&mut self, intent: Intent) -> Vec<Output> {
        let mut outputs = Vec::new();
        match intent {
            Intent::NumericKeyPressed(key) => self.on_numeric_key(key, &mut outputs),
            Intent::TableCellClicked { row, column } => {
                self.on_table_cell_click(row, column, &mut outputs)
            }
            Intent::SequenceCellClicked { row } => self.on_sequence_cell_click(row, &mut outputs),
            Intent::InsertRowRequested => self.on_insert_row(&mut outputs),
            Intent::DeleteRowRequested => self.on_delete_row(&mut outputs),
            Intent::ClearRowRequested => self.on_clear_row(&mut outputs),
            Intent::MoveActiveCell(direction) => self.on_move_active_cell(direction, &mut outputs),
            Intent::CycleTypeRequested => self.on_cycle_type(&mut outputs),
            Intent::CalculateRequested => self.on_calculate(&mut outputs),
            Intent::MultiDeleteModeToggled => self.on_toggle_multi_delete(&mut outputs),
            Intent::SaveRequested => self.on_save(&mut outputs),
            Intent::ExportCsvRequested => self.on_export_csv(&mut outputs),
            Intent::LoadRequested => self.on_load_requested(&mut outputs),
            Intent::SaveThenLoadChosen => {
                self.on_save(&mut outputs);
                outputs.push(Output::TriggerFileLoad);
            }
            Intent::LoadDirectlyChosen => outputs.push(Output::TriggerFileLoad),
            Intent::FileLoaded { name, content } => self.on_file_loaded(&name, &content, &mut outputs),
            Intent::ResetRequested => self.on_reset(&mut outputs),
            Intent::NavigateToDetailView => self.on_navigate_detail(&mut outputs),
            Intent::FocusModeRequested { column } => self.on_focus_mode(column, &mut outputs),
            Intent::BatchUpdateRequested { column, value } => {
                self.quote.batch_update_property(column, &value);
                outputs.push(Output::StateChanged(self.snapshot()));
            }
            Intent::DetailCellEdited { row, column, value } => {
                self.quote.update_item_property(row, column, &value);
                self.ui.clear_active_cell();
                outputs.push(Output::StateChanged(self.snapshot()));
            }
        }
        outputs
    }

    fn view_ctx<'a>(&'a mut self, outputs: &'a mut Vec<Output>) -> ViewCtx<'a> {
        ViewCtx {
            quote: &mut self.quote,
            ui: &mut self.ui,
            strategy: &self.strategy,
            outputs,
        }
    }

    fn on_numeric_key(&mut self, key: NumKey, outputs: &mut Vec<Output>) {
        let view = self.ui.state().view;
        let handled = {
            let mut ctx = self.view_ctx(outputs);
            views::handler_for(view).handle_numeric_key(&mut ctx, key)
        };
        match handled {
            Handled::Yes => outputs.push(Output::StateChanged(self.snapshot())),
            Handled::No => {
                eprintln!("numeric key {:?} unhandled in {:?} view", key, view);
            }
        }
    }

    fn on_table_cell_click(&mut self, row: usize, column: Column, outputs: &mut Vec<Output>) {
        let view = self.ui.state().view;
        let handled = {
            let mut ctx = self.view_ctx(outputs);
            views::handler_for(view).handle_cell_click(&mut ctx, row, column)
        };
        match handled {
            Handled::Yes => outputs.push(Output::StateChanged(self.snapshot())),
            Handled::No => {
                eprintln!("cell click on {} unhandled in {:?} view", column, view);
            }
        }
    }

    fn on_sequence_cell_click(&mut self, row: usize, outputs: &mut Vec<Output>) {
        if self.ui.state().multi_delete_mode {
            let is_last = row + 1 == self.quote.len();
            let is_empty_entry_row = self
                .quote
                .item(row)
                .is_some_and(|item| !item.has_any_dimension());
            if is_last && is_empty_entry_row {
                outputs.push(Output::error("Cannot select the final empty row."));
                return;
            }
            self.ui.toggle_multi_delete_selection(row);
        } else {
            self.ui.toggle_row_selection(row);
        }
        outputs.push(Output::StateChanged(self.snapshot()));
    }

    fn on_insert_row(&mut self, outputs: &mut Vec<Output>) {
        let Some(selected) = self.ui.state().selected_row else {
            return; // insert needs a reference row
        };
        match self.quote.insert_row(selected) {
            Ok(new_row) => {
                focus::focus_after_insert(&mut self.ui, new_row);
                outputs.push(Output::StateChanged(self.snapshot()));
                outputs.push(Output::OperationSuccessfulAutoHidePanel);
            }
            Err(e) => outputs.push(Output::error(e.to_string())),
        }
    }

    fn on_delete_row(&mut self, outputs: &mut Vec<Output>) {
        if self.ui.state().multi_delete_mode {
            if self.ui.state().multi_delete_selection.is_empty() {
                outputs.push(Output::info("Please select rows to delete."));
                return;
            }
            let rows = self.ui.multi_delete_rows_descending();
            self.quote.delete_multiple_rows(rows);
            self.ui.toggle_multi_delete_mode(); // leave the mode
            self.ui.set_sum_outdated(true);
            focus::focus_first_empty_cell(&mut self.ui, &self.quote, Column::Width);
        } else {
            let Some(selected) = self.ui.state().selected_row else {
                return;
            };
            self.quote.delete_row(selected);
            self.ui.clear_row_selection();
            self.ui.set_sum_outdated(true);
            focus::focus_after_delete(&mut self.ui, &self.quote, selected);
        }
        outputs.push(Output::StateChanged(self.snapshot()));
        outputs.push(Output::OperationSuccessfulAutoHidePanel);
    }

    fn on_clear_row(&mut self, outputs: &mut Vec<Output>) {
        let Some(selected) = self.ui.state().selected_row else {
            outputs.push(Output::error("Please select a row to clear."));
            return;
        };
        self.quote.clear_row(selected);
        self.ui.clear_row_selection();
        self.ui.set_sum_outdated(true);
        focus::focus_after_clear(&mut self.ui, selected);
        outputs.push(Output::StateChanged(self.snapshot()));
    }

    fn on_move_active_cell(&mut self, direction: Direction, outputs: &mut Vec<Output>) {
        focus::move_active_cell(&mut self.ui, &self.quote, direction);
        outputs.push(Output::StateChanged(self.snapshot()));
    }

    fn on_cycle_type(&mut self, outputs: &mut Vec<Output>) {
        if self.quote.cycle_all_types() {
            self.ui.set_sum_outdated(true);
            outputs.push(Output::StateChanged(self.snapshot()));
        }
    }

    fn on_calculate(&mut self, outputs: &mut Vec<Output>) {
        let failure = calc::calculate_and_sum(
            self.quote.data_mut(),
            &self.strategy,
            self.pricebook.matrices(),
        );
        match failure {
            Some(failure) => {
                self.ui.set_sum_outdated(true);
                self.ui.set_active_cell(failure.row, failure.column);
                outputs.push(Output::error(failure.message));
            }
            None => self.ui.set_sum_outdated(false),
        }
        outputs.push(Output::StateChanged(self.snapshot()));
    }

    fn on_toggle_multi_delete(&mut self, outputs: &mut Vec<Output>) {
        let entering = self.ui.toggle_multi_delete_mode();
        if !entering {
            focus::focus_first_empty_cell(&mut self.ui, &self.quote, Column::Width);
        }
        outputs.push(Output::StateChanged(self.snapshot()));
    }

    fn on_save(&mut self, outputs: &mut Vec<Output>) {
        match json::save_quote(self.quote.data(), &self.save_dir) {
            Ok(path) => outputs.push(Output::info(format!("Quote saved to {}.", path.display()))),
            Err(e) => outputs.push(Output::error(format!("Save failed: {}", e))),
        }
    }

    fn on_export_csv(&mut self, outputs: &mut Vec<Output>) {
        match csv::export_quote(self.quote.data(), &self.save_dir) {
            Ok(path) => outputs.push(Output::info(format!("Exported to {}.", path.display()))),
            Err(e) => outputs.push(Output::error(format!("Export failed: {}", e))),
        }
    }

    fn on_load_requested(&mut self, outputs: &mut Vec<Output>) {
        if self.quote.has_data() {
            outputs.push(Output::ShowLoadConfirmationDialog);
        } else {
            outputs.push(Output::TriggerFileLoad);
        }
    }

    fn on_file_loaded(&mut self, name: &str, content: &str, outputs: &mut Vec<Output>) {
        match json::parse_file_content(name, content) {
            Ok(data) => {
                self.quote = QuoteStore::from_data(data);
                self.ui.reset();
                self.ui.set_sum_outdated(true);
                outputs.push(Output::info(format!("Loaded '{}'.", name)));
                outputs.push(Output::StateChanged(self.snapshot()));
            }
            Err(message) => outputs.push(Output::error(message)),
        }
    }

    fn on_reset(&mut self, outputs: &mut Vec<Output>) {
        self.quote.reset();
        self.ui.reset();
        self.autosave.restart();
        outputs.push(Output::info("Quote has been reset."));
        outputs.push(Output::StateChanged(self.snapshot()));
    }

    fn on_navigate_detail(&mut self, outputs: &mut Vec<Output>) {
        self.ui.set_current_view(View::DetailConfig);
        self.ui
            .set_visible_columns(View::DetailConfig.default_columns());
        self.ui.clear_active_cell();
        outputs.push(Output::StateChanged(self.snapshot()));
    }

    fn on_focus_mode(&mut self, column: Column, outputs: &mut Vec<Output>) {
        self.ui
            .set_visible_columns(vec![Column::Sequence, column]);
        self.ui.set_active_cell(0, column);
        outputs.push(Output::StateChanged(self.snapshot()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::NotificationKind;
    use quotegrid_engine::item::FabricType;
    use tempfile::tempdir;

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(PriceBook::builtin(), std::env::temp_dir(), None)
    }

    fn state_changes(outputs: &[Output]) -> usize {
        outputs
            .iter()
            .filter(|o| matches!(o, Output::StateChanged(_)))
            .count()
    }

    fn enter_dimension(d: &mut Dispatcher, row: usize, column: Column, value: &str) {
        d.dispatch(Intent::TableCellClicked { row, column });
        d.dispatch(Intent::NumericKeyPressed(NumKey::Delete)); // clear loaded value
        for ch in value.chars() {
            let digit = ch.to_digit(10).unwrap() as u8;
            d.dispatch(Intent::NumericKeyPressed(NumKey::Digit(digit)));
        }
        d.dispatch(Intent::NumericKeyPressed(NumKey::Enter));
    }

    #[test]
    fn test_commit_flow_updates_item_and_moves_focus() {
        let mut d = dispatcher();
        d.dispatch(Intent::TableCellClicked {
            row: 0,
            column: Column::Width,
        });
        for digit in [6, 0, 0] {
            d.dispatch(Intent::NumericKeyPressed(NumKey::Digit(digit)));
        }
        let outputs = d.dispatch(Intent::NumericKeyPressed(NumKey::Enter));
        assert_eq!(state_changes(&outputs), 1);
        assert_eq!(d.quote().item(0).unwrap().width, Some(600));
        assert!(d.ui().state().sum_outdated);
        // Focus moved to the next empty width cell (the fresh trailing row).
        assert_eq!(d.ui().state().active_cell.unwrap().row, 1);
        assert_eq!(d.ui().state().input_value, "");
    }

    #[test]
    fn test_out_of_range_commit_is_rejected_without_mutation() {
        let mut d = dispatcher();
        d.dispatch(Intent::TableCellClicked {
            row: 0,
            column: Column::Width,
        });
        d.dispatch(Intent::NumericKeyPressed(NumKey::Digit(1)));
        d.dispatch(Intent::NumericKeyPressed(NumKey::Digit(0)));
        d.dispatch(Intent::NumericKeyPressed(NumKey::Digit(0)));
        let outputs = d.dispatch(Intent::NumericKeyPressed(NumKey::Enter));

        let notice = outputs.iter().find_map(|o| match o {
            Output::Notification { message, kind } => Some((message.clone(), *kind)),
            _ => None,
        });
        let (message, kind) = notice.expect("rejection notice");
        assert_eq!(message, "Width must be between 250 and 3300.");
        assert_eq!(kind, NotificationKind::Error);
        // Buffer cleared, no item mutation, still one snapshot.
        assert_eq!(d.ui().state().input_value, "");
        assert_eq!(d.quote().item(0).unwrap().width, None);
        assert_eq!(d.quote().len(), 1);
        assert_eq!(state_changes(&outputs), 1);
    }

    #[test]
    fn test_calculate_success_clears_outdated_sum() {
        let mut d = dispatcher();
        enter_dimension(&mut d, 0, Column::Width, "600");
        enter_dimension(&mut d, 0, Column::Height, "600");
        d.dispatch(Intent::TableCellClicked {
            row: 0,
            column: Column::Type,
        });
        assert!(d.ui().state().sum_outdated);

        let outputs = d.dispatch(Intent::CalculateRequested);
        assert_eq!(state_changes(&outputs), 1);
        assert!(!d.ui().state().sum_outdated);
        assert!(d.quote().item(0).unwrap().line_price.is_some());
        assert!(d.quote().data().summary.total_sum.is_some());
    }

    #[test]
    fn test_calculate_failure_jumps_to_offending_cell() {
        let mut d = dispatcher();
        enter_dimension(&mut d, 0, Column::Width, "600");
        enter_dimension(&mut d, 0, Column::Height, "600");
        // No fabric type set: IncompleteData pointing at the type column.
        let outputs = d.dispatch(Intent::CalculateRequested);
        assert!(matches!(
            outputs.first(),
            Some(Output::Notification {
                kind: NotificationKind::Error,
                ..
            })
        ));
        let cell = d.ui().state().active_cell.unwrap();
        assert_eq!((cell.row, cell.column), (0, Column::Type));
        assert!(d.ui().state().sum_outdated);
        assert_eq!(d.quote().item(0).unwrap().line_price, None);
    }

    #[test]
    fn test_insert_rejected_next_to_empty_row() {
        let mut d = dispatcher();
        enter_dimension(&mut d, 0, Column::Width, "600");
        // Select the filled row; inserting before the trailing empty row
        // is a structural rejection, so nothing changes.
        d.dispatch(Intent::SequenceCellClicked { row: 0 });
        let outputs = d.dispatch(Intent::InsertRowRequested);
        assert_eq!(state_changes(&outputs), 0);
        assert!(matches!(
            outputs.first(),
            Some(Output::Notification {
                kind: NotificationKind::Error,
                ..
            })
        ));
        assert_eq!(d.quote().len(), 2);
    }

    #[test]
    fn test_insert_between_rows_focuses_new_row() {
        let mut d = dispatcher();
        enter_dimension(&mut d, 0, Column::Width, "600");
        enter_dimension(&mut d, 1, Column::Width, "700");
        d.dispatch(Intent::SequenceCellClicked { row: 0 });
        let outputs = d.dispatch(Intent::InsertRowRequested);
        assert_eq!(state_changes(&outputs), 1);
        assert!(outputs
            .iter()
            .any(|o| matches!(o, Output::OperationSuccessfulAutoHidePanel)));
        assert_eq!(d.quote().len(), 4);
        let cell = d.ui().state().active_cell.unwrap();
        assert_eq!((cell.row, cell.column), (1, Column::Width));
        assert_eq!(d.ui().state().selected_row, None);
    }

    #[test]
    fn test_single_delete_focuses_surviving_row() {
        let mut d = dispatcher();
        enter_dimension(&mut d, 0, Column::Width, "600");
        enter_dimension(&mut d, 1, Column::Width, "700");
        d.dispatch(Intent::SequenceCellClicked { row: 0 });
        let outputs = d.dispatch(Intent::DeleteRowRequested);
        assert_eq!(state_changes(&outputs), 1);
        assert_eq!(d.quote().item(0).unwrap().width, Some(700));
        assert_eq!(d.ui().state().active_cell.unwrap().row, 0);
        assert!(d.ui().state().sum_outdated);
    }

    #[test]
    fn test_multi_delete_flow() {
        let mut d = dispatcher();
        enter_dimension(&mut d, 0, Column::Width, "600");
        enter_dimension(&mut d, 1, Column::Width, "700");
        enter_dimension(&mut d, 2, Column::Width, "800");

        d.dispatch(Intent::MultiDeleteModeToggled);
        d.dispatch(Intent::SequenceCellClicked { row: 0 });
        d.dispatch(Intent::SequenceCellClicked { row: 2 });

        // The trailing entry row cannot join the batch.
        let outputs = d.dispatch(Intent::SequenceCellClicked { row: 3 });
        assert_eq!(state_changes(&outputs), 0);
        assert!(matches!(
            outputs.first(),
            Some(Output::Notification {
                kind: NotificationKind::Error,
                ..
            })
        ));

        let outputs = d.dispatch(Intent::DeleteRowRequested);
        assert_eq!(state_changes(&outputs), 1);
        // Rows 0 and 2 removed; mode exited; batch selection gone.
        assert_eq!(d.quote().item(0).unwrap().width, Some(700));
        assert_eq!(d.quote().len(), 2);
        assert!(!d.ui().state().multi_delete_mode);
        assert!(d.ui().state().multi_delete_selection.is_empty());
    }

    #[test]
    fn test_multi_delete_with_empty_selection_only_notifies() {
        let mut d = dispatcher();
        enter_dimension(&mut d, 0, Column::Width, "600");
        d.dispatch(Intent::MultiDeleteModeToggled);
        let outputs = d.dispatch(Intent::DeleteRowRequested);
        assert_eq!(state_changes(&outputs), 0);
        assert!(matches!(
            outputs.first(),
            Some(Output::Notification {
                kind: NotificationKind::Info,
                ..
            })
        ));
        assert_eq!(d.quote().len(), 2);
    }

    #[test]
    fn test_leaving_multi_delete_mode_refocuses_entry() {
        let mut d = dispatcher();
        enter_dimension(&mut d, 0, Column::Width, "600");
        d.dispatch(Intent::MultiDeleteModeToggled);
        let outputs = d.dispatch(Intent::MultiDeleteModeToggled);
        assert_eq!(state_changes(&outputs), 1);
        let cell = d.ui().state().active_cell.unwrap();
        // First row with an empty width cell is the trailing row.
        assert_eq!((cell.row, cell.column), (1, Column::Width));
    }

    #[test]
    fn test_cycle_type_intent_marks_sum_outdated() {
        let mut d = dispatcher();
        enter_dimension(&mut d, 0, Column::Width, "600");
        enter_dimension(&mut d, 0, Column::Height, "600");
        let outputs = d.dispatch(Intent::CycleTypeRequested);
        assert_eq!(state_changes(&outputs), 1);
        assert_eq!(d.quote().item(0).unwrap().fabric_type, Some(FabricType::Bo));
        assert!(d.ui().state().sum_outdated);

        // With no eligible rows nothing happens and nothing is published.
        let mut d = dispatcher();
        assert!(d.dispatch(Intent::CycleTypeRequested).is_empty());
    }

    #[test]
    fn test_load_flow_asks_before_discarding_work() {
        let mut d = dispatcher();
        let outputs = d.dispatch(Intent::LoadRequested);
        assert!(matches!(outputs.first(), Some(Output::TriggerFileLoad)));

        enter_dimension(&mut d, 0, Column::Width, "600");
        let outputs = d.dispatch(Intent::LoadRequested);
        assert!(matches!(
            outputs.first(),
            Some(Output::ShowLoadConfirmationDialog)
        ));
    }

    #[test]
    fn test_file_loaded_replaces_quote_and_preserves_view() {
        let mut d = dispatcher();
        d.dispatch(Intent::NavigateToDetailView);

        let mut source = dispatcher();
        enter_dimension(&mut source, 0, Column::Width, "900");
        let content = json::to_json_string(source.quote().data()).unwrap();

        let outputs = d.dispatch(Intent::FileLoaded {
            name: "saved.json".into(),
            content,
        });
        assert_eq!(state_changes(&outputs), 1);
        assert_eq!(d.quote().item(0).unwrap().width, Some(900));
        assert!(d.ui().state().sum_outdated);
        assert_eq!(d.ui().state().view, View::DetailConfig);
    }

    #[test]
    fn test_file_loaded_with_bad_content_changes_nothing() {
        let mut d = dispatcher();
        enter_dimension(&mut d, 0, Column::Width, "600");
        let before = d.quote().data().clone();
        let outputs = d.dispatch(Intent::FileLoaded {
            name: "bad.json".into(),
            content: "not json".into(),
        });
        assert_eq!(state_changes(&outputs), 0);
        assert!(matches!(
            outputs.first(),
            Some(Output::Notification {
                kind: NotificationKind::Error,
                ..
            })
        ));
        assert_eq!(d.quote().data(), &before);
    }

    #[test]
    fn test_reset_clears_quote_and_notifies() {
        let mut d = dispatcher();
        enter_dimension(&mut d, 0, Column::Width, "600");
        let outputs = d.dispatch(Intent::ResetRequested);
        assert_eq!(state_changes(&outputs), 1);
        assert!(!d.quote().has_data());
        assert_eq!(d.ui().state().active_cell, None);
    }

    #[test]
    fn test_save_and_export_round_trip_through_dir() {
        let dir = tempdir().unwrap();
        let mut d = Dispatcher::new(PriceBook::builtin(), dir.path().to_path_buf(), None);
        enter_dimension(&mut d, 0, Column::Width, "600");
        enter_dimension(&mut d, 0, Column::Height, "600");
        d.dispatch(Intent::TableCellClicked {
            row: 0,
            column: Column::Type,
        });
        d.dispatch(Intent::CalculateRequested);

        let outputs = d.dispatch(Intent::SaveRequested);
        assert!(matches!(
            outputs.first(),
            Some(Output::Notification {
                kind: NotificationKind::Info,
                ..
            })
        ));
        let outputs = d.dispatch(Intent::ExportCsvRequested);
        assert!(matches!(
            outputs.first(),
            Some(Output::Notification {
                kind: NotificationKind::Info,
                ..
            })
        ));

        let saved: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert!(saved.iter().any(|p| p.extension().unwrap() == "json"));
        assert!(saved.iter().any(|p| p.extension().unwrap() == "csv"));
    }

    #[test]
    fn test_detail_view_edits_and_focus_mode() {
        let mut d = dispatcher();
        enter_dimension(&mut d, 0, Column::Width, "600");
        d.dispatch(Intent::NavigateToDetailView);

        let outputs = d.dispatch(Intent::FocusModeRequested {
            column: Column::Location,
        });
        assert_eq!(state_changes(&outputs), 1);
        assert_eq!(
            d.ui().state().visible_columns,
            vec![Column::Sequence, Column::Location]
        );

        d.dispatch(Intent::DetailCellEdited {
            row: 0,
            column: Column::Location,
            value: "Kitchen".into(),
        });
        assert_eq!(
            d.quote().item(0).unwrap().detail.location.as_deref(),
            Some("Kitchen")
        );
        assert_eq!(d.ui().state().active_cell, None);

        d.dispatch(Intent::BatchUpdateRequested {
            column: Column::Color,
            value: "White".into(),
        });
        assert_eq!(
            d.quote().item(0).unwrap().detail.color.as_deref(),
            Some("White")
        );

        // The numeric pad has no meaning here; no snapshot is published.
        let outputs = d.dispatch(Intent::NumericKeyPressed(NumKey::Digit(5)));
        assert_eq!(state_changes(&outputs), 0);
    }

    #[test]
    fn test_snapshot_restore_and_discard() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("autosave.db");

        let store = SnapshotStore::open(&path).unwrap();
        let mut d = Dispatcher::with_autosave_interval(
            PriceBook::builtin(),
            dir.path().to_path_buf(),
            Some(store),
            Duration::ZERO,
        );
        enter_dimension(&mut d, 0, Column::Width, "600");
        d.autosave_tick();

        // A new session sees the snapshot and can restore it.
        let store = SnapshotStore::open(&path).unwrap();
        let mut next =
            Dispatcher::new(PriceBook::builtin(), dir.path().to_path_buf(), Some(store));
        assert!(next.pending_snapshot());
        next.restore_snapshot();
        assert_eq!(next.quote().item(0).unwrap().width, Some(600));
        assert!(next.ui().state().sum_outdated);

        // Or discard it for a blank session.
        let store = SnapshotStore::open(&path).unwrap();
        let mut blank =
            Dispatcher::new(PriceBook::builtin(), dir.path().to_path_buf(), Some(store));
        blank.discard_snapshot();
        assert!(!blank.pending_snapshot());
    }
}
