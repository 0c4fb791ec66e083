//! Per-view interaction handling.
//!
//! Each view implements a fixed capability interface; the dispatcher picks
//! the handler from the current `View` variant. An interaction a view does
//! not support returns `Handled::No` explicitly, never a silent miss.

use quotegrid_engine::item::Column;
use quotegrid_engine::pricing::PricingStrategy;
use quotegrid_engine::quote::QuoteStore;

use crate::events::{NumKey, Output};
use crate::focus;
use crate::ui_state::{UiStore, View};

/// Cyclic option lists for the detail-view option columns. The leading
/// empty string is the absent value.
pub const OVER_OPTIONS: [&str; 2] = ["", "O"];
pub const OI_OPTIONS: [&str; 3] = ["", "IN", "OUT"];
pub const LR_OPTIONS: [&str; 3] = ["", "L", "R"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    Yes,
    /// The current view has no behavior for this interaction.
    No,
}

/// Mutable access a view handler gets for one interaction.
pub struct ViewCtx<'a> {
    pub quote: &'a mut QuoteStore,
    pub ui: &'a mut UiStore,
    pub strategy: &'a dyn PricingStrategy,
    pub outputs: &'a mut Vec<Output>,
}

pub trait ViewHandler {
    fn handle_numeric_key(&self, ctx: &mut ViewCtx<'_>, key: NumKey) -> Handled;
    fn handle_cell_click(&self, ctx: &mut ViewCtx<'_>, row: usize, column: Column) -> Handled;
}

pub fn handler_for(view: View) -> &'static dyn ViewHandler {
    match view {
        View::QuickQuote => &QuickQuoteView,
        View::DetailConfig => &DetailConfigView,
    }
}

/// The main entry grid: sequence / width / height / type / price.
pub struct QuickQuoteView;

impl ViewHandler for QuickQuoteView {
    fn handle_numeric_key(&self, ctx: &mut ViewCtx<'_>, key: NumKey) -> Handled {
        match key {
            NumKey::Digit(d) => {
                ctx.ui.append_input_value(char::from(b'0' + (d % 10)));
            }
            NumKey::Delete => ctx.ui.delete_last_input_char(),
            NumKey::Width => focus::focus_first_empty_cell(ctx.ui, ctx.quote, Column::Width),
            NumKey::Height => focus::focus_first_empty_cell(ctx.ui, ctx.quote, Column::Height),
            NumKey::Enter => commit_input(ctx),
        }
        Handled::Yes
    }

    fn handle_cell_click(&self, ctx: &mut ViewCtx<'_>, row: usize, column: Column) -> Handled {
        let Some(item) = ctx.quote.item(row) else {
            return Handled::Yes; // click on a ghost row: nothing to do
        };
        match column {
            Column::Width | Column::Height => {
                let value = match column {
                    Column::Width => item.width,
                    _ => item.height,
                };
                ctx.ui.clear_row_selection();
                ctx.ui.set_active_cell(row, column);
                let text = value.map(|v| v.to_string()).unwrap_or_default();
                ctx.ui.set_input_value(&text);
                Handled::Yes
            }
            Column::Type => {
                ctx.ui.clear_row_selection();
                ctx.ui.set_active_cell(row, column);
                if ctx.quote.cycle_item_type(row) {
                    ctx.ui.set_sum_outdated(true);
                }
                Handled::Yes
            }
            _ => Handled::No,
        }
    }
}

/// Commit the input buffer to the active cell.
///
/// Out-of-range values are rejected before any store mutation: the buffer
/// is cleared and a notice is pushed, item data untouched.
fn commit_input(ctx: &mut ViewCtx<'_>) {
    let Some(cell) = ctx.ui.state().active_cell else {
        ctx.ui.clear_input_value();
        return;
    };

    let buffer = ctx.ui.state().input_value.clone();
    let value = if buffer.is_empty() {
        None
    } else {
        match buffer.parse::<u32>() {
            Ok(v) => Some(v),
            Err(_) => {
                // Digit-only pad; an unparseable buffer means overflow.
                if let Some(rule) = ctx.strategy.validation_rule(cell.column) {
                    ctx.outputs.push(Output::error(rule.rejection_message()));
                }
                ctx.ui.clear_input_value();
                return;
            }
        }
    };

    if let (Some(v), Some(rule)) = (value, ctx.strategy.validation_rule(cell.column)) {
        if !rule.contains(v) {
            ctx.outputs.push(Output::error(rule.rejection_message()));
            ctx.ui.clear_input_value();
            return;
        }
    }

    if ctx.quote.update_item_value(cell.row, cell.column, value) {
        ctx.ui.set_sum_outdated(true);
    }
    focus::focus_after_commit(ctx.ui, ctx.quote);
}

/// The attribute editing grid: location / fabric / color plus the
/// cyclable option columns.
pub struct DetailConfigView;

impl ViewHandler for DetailConfigView {
    fn handle_numeric_key(&self, _ctx: &mut ViewCtx<'_>, _key: NumKey) -> Handled {
        // The numeric pad drives dimension entry; this view has none.
        Handled::No
    }

    fn handle_cell_click(&self, ctx: &mut ViewCtx<'_>, row: usize, column: Column) -> Handled {
        if column.is_detail_text() {
            ctx.ui.clear_row_selection();
            ctx.ui.set_active_cell(row, column);
            return Handled::Yes;
        }
        let options: &[&str] = match column {
            Column::Over => &OVER_OPTIONS,
            Column::Oi => &OI_OPTIONS,
            Column::Lr => &LR_OPTIONS,
            _ => return Handled::No,
        };
        ctx.quote.cycle_item_property(row, column, options);
        Handled::Yes
    }
}
