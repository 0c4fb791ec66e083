//! Calculation pass over the quote.
//!
//! Recomputes every row whose price is stale, accumulates the total, and
//! reports the first failure while still processing later rows (the
//! operator fixes one problem at a time; partial pricing is kept).

use crate::item::Column;
use crate::pricing::{MatrixSet, PricingStrategy};
use crate::quote::QuoteData;

/// The first pricing failure of a calculation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct CalcFailure {
    pub row: usize,
    pub column: Column,
    pub message: String,
}

/// Price all stale rows and rewrite the total.
///
/// Rows that already carry a price are trusted (prices are cleared on any
/// edit of the inputs, so a present price is current). Structurally empty
/// rows are skipped. The total is the sum of every line price present
/// after the pass; it is written even when a row failed, and the caller
/// keeps the sum flagged as outdated in that case.
pub fn calculate_and_sum(
    quote: &mut QuoteData,
    strategy: &dyn PricingStrategy,
    matrices: &MatrixSet,
) -> Option<CalcFailure> {
    let mut first_failure: Option<CalcFailure> = None;

    for (row, item) in quote.items.iter_mut().enumerate() {
        if item.is_empty() || item.line_price.is_some() {
            continue;
        }
        match strategy.calculate_price(item, matrices) {
            Ok(price) => {
                item.line_price = Some(price);
            }
            Err(err) => {
                if first_failure.is_none() {
                    first_failure = Some(CalcFailure {
                        row,
                        column: err.failing_column(item),
                        message: err.to_string(),
                    });
                }
            }
        }
    }

    let total: f64 = quote.items.iter().filter_map(|i| i.line_price).sum();
    quote.summary.total_sum = Some(total);

    first_failure
}
