//! Quote data store and its structural invariants.
//!
//! The store owns the ordered list of line items and enforces two rules on
//! every mutation:
//!
//! - a non-empty sequence ends in exactly one structurally empty row, and
//!   no two adjacent empty rows exist (restored by `consolidate_empty_rows`);
//! - editing width, height or fabric type clears the row's stale price.

use serde::{Deserialize, Serialize};

use crate::item::{Column, FabricType, QuoteItem};

/// Running total of the quote. Absent until a clean calculation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_sum: Option<f64>,
}

/// The full persisted quote: ordered items plus the summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteData {
    pub items: Vec<QuoteItem>,
    #[serde(default)]
    pub summary: Summary,
}

impl QuoteData {
    /// A new quote: one fresh empty row, no total.
    pub fn new() -> Self {
        Self {
            items: vec![QuoteItem::new()],
            summary: Summary::default(),
        }
    }
}

impl Default for QuoteData {
    fn default() -> Self {
        Self::new()
    }
}

/// Why an insert was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertError {
    /// Inserting after the trailing row would produce two empty rows.
    AfterLastRow,
    /// The row after the insertion point is already empty.
    BeforeEmptyRow,
    /// No row at the given index.
    OutOfBounds,
}

impl std::fmt::Display for InsertError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InsertError::AfterLastRow => write!(f, "Cannot insert after the last row."),
            InsertError::BeforeEmptyRow => write!(f, "Cannot insert before an empty row."),
            InsertError::OutOfBounds => write!(f, "No row at that position."),
        }
    }
}

/// Owns the quote data and applies every structural mutation.
///
/// All methods are synchronous and in-memory; callers are expected to be
/// single-threaded (intents are fully processed one at a time).
#[derive(Debug, Clone)]
pub struct QuoteStore {
    data: QuoteData,
}

impl QuoteStore {
    pub fn new() -> Self {
        Self {
            data: QuoteData::new(),
        }
    }

    /// Adopt an existing quote wholesale (session start / load), then run
    /// one consolidation so loaded data cannot violate the trailing-row rule.
    pub fn from_data(mut data: QuoteData) -> Self {
        if data.items.is_empty() {
            data.items.push(QuoteItem::new());
        }
        let mut store = Self { data };
        store.consolidate_empty_rows();
        store
    }

    pub fn data(&self) -> &QuoteData {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut QuoteData {
        &mut self.data
    }

    pub fn items(&self) -> &[QuoteItem] {
        &self.data.items
    }

    pub fn item(&self, index: usize) -> Option<&QuoteItem> {
        self.data.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.data.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.items.is_empty()
    }

    /// Insert a fresh empty row immediately after `after_index`.
    ///
    /// Rejected when `after_index` is the trailing row or the row after it
    /// is already empty: both would break the one-trailing-empty-row rule.
    /// Returns the index of the new row.
    pub fn insert_row(&mut self, after_index: usize) -> Result<usize, InsertError> {
        let items = &self.data.items;
        if after_index >= items.len() {
            return Err(InsertError::OutOfBounds);
        }
        if after_index == items.len() - 1 {
            return Err(InsertError::AfterLastRow);
        }
        if items[after_index + 1].is_empty() {
            return Err(InsertError::BeforeEmptyRow);
        }

        let new_index = after_index + 1;
        self.data.items.insert(new_index, QuoteItem::new());
        Ok(new_index)
    }

    /// Delete a row.
    ///
    /// Degrades to `clear_row` when the target is the trailing non-empty
    /// row or the sole remaining row, so the sequence never shrinks below
    /// one row and never loses its trailing slot.
    pub fn delete_row(&mut self, index: usize) {
        let items = &self.data.items;
        let Some(item) = items.get(index) else {
            return;
        };

        let is_last = index == items.len() - 1;
        if (is_last && !item.is_empty()) || items.len() == 1 {
            self.clear_row(index);
            return;
        }

        self.data.items.remove(index);
        self.consolidate_empty_rows();
    }

    /// Clear width/height/type/price of a row. No-op on a bad index.
    pub fn clear_row(&mut self, index: usize) {
        if let Some(item) = self.data.items.get_mut(index) {
            item.width = None;
            item.height = None;
            item.fabric_type = None;
            item.line_price = None;
        }
        self.consolidate_empty_rows();
    }

    /// Delete a batch of rows.
    ///
    /// Indices are applied in descending order so earlier indices stay
    /// stable while later rows are removed; consolidation runs once at the
    /// end.
    pub fn delete_multiple_rows(&mut self, indices: impl IntoIterator<Item = usize>) {
        let mut sorted: Vec<usize> = indices.into_iter().collect();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        sorted.dedup();

        for index in sorted {
            let items = &self.data.items;
            let Some(item) = items.get(index) else {
                continue;
            };
            // Same degradation rules as delete_row, without per-row
            // consolidation.
            let is_last = index == items.len() - 1;
            if (is_last && !item.is_empty()) || items.len() == 1 {
                let item = &mut self.data.items[index];
                item.width = None;
                item.height = None;
                item.fabric_type = None;
                item.line_price = None;
            } else {
                self.data.items.remove(index);
            }
        }

        self.consolidate_empty_rows();
    }

    /// Set width or height of a row. Returns whether the value changed.
    ///
    /// A change clears the now-stale line price and re-runs consolidation
    /// (filling the trailing row grows the sequence; emptying rows shrinks
    /// it).
    pub fn update_item_value(&mut self, index: usize, column: Column, value: Option<u32>) -> bool {
        let Some(item) = self.data.items.get_mut(index) else {
            return false;
        };
        let slot = match column {
            Column::Width => &mut item.width,
            Column::Height => &mut item.height,
            _ => return false,
        };
        if *slot == value {
            return false;
        }
        *slot = value;
        item.line_price = None;
        self.consolidate_empty_rows();
        true
    }

    /// Cycle a row's fabric type one step (BO -> BO1 -> SN -> BO).
    ///
    /// Only rows with at least one dimension participate. Returns whether
    /// the type changed; a change clears the stale price.
    pub fn cycle_item_type(&mut self, index: usize) -> bool {
        let Some(item) = self.data.items.get_mut(index) else {
            return false;
        };
        if !item.has_any_dimension() {
            return false;
        }
        let next = FabricType::next_after(item.fabric_type);
        if item.fabric_type == Some(next) {
            return false;
        }
        item.fabric_type = Some(next);
        item.line_price = None;
        true
    }

    /// Cycle a detail option field through a fixed option list, wrapping.
    ///
    /// The empty string in `options` stands for an absent value. Rows
    /// without any dimension are skipped, matching type cycling. Returns
    /// whether the value changed.
    pub fn cycle_item_property(&mut self, index: usize, column: Column, options: &[&str]) -> bool {
        if options.is_empty() || !column.is_detail_cycle() {
            return false;
        }
        let Some(item) = self.data.items.get_mut(index) else {
            return false;
        };
        if !item.has_any_dimension() {
            return false;
        }

        let current = item.detail.get(column).unwrap_or("");
        let idx = options.iter().position(|&o| o == current).unwrap_or(0);
        let next = options[(idx + 1) % options.len()];
        if next == current {
            return false;
        }
        item.detail.set(column, Some(next.to_string()))
    }

    /// Set a free-text detail field (location / fabric / color).
    /// Detail fields do not affect pricing, so the line price is kept.
    pub fn update_item_property(&mut self, index: usize, column: Column, value: &str) -> bool {
        if !column.is_detail_text() {
            return false;
        }
        let Some(item) = self.data.items.get_mut(index) else {
            return false;
        };
        if item.detail.get(column).unwrap_or("") == value {
            return false;
        }
        item.detail.set(column, Some(value.to_string()))
    }

    /// Apply one detail value to every non-empty row.
    pub fn batch_update_property(&mut self, column: Column, value: &str) -> bool {
        let mut changed = false;
        for index in 0..self.data.items.len() {
            if self.data.items[index].is_empty() {
                continue;
            }
            if column.is_detail_text() || column.is_detail_cycle() {
                if self.data.items[index].detail.get(column).unwrap_or("") != value {
                    self.data.items[index].detail.set(column, Some(value.to_string()));
                    changed = true;
                }
            }
        }
        changed
    }

    /// One synchronized type-cycle step for every row with both dimensions.
    ///
    /// The target type is taken from the first eligible row's current type,
    /// so mixed rows converge onto the same type. Returns whether anything
    /// changed; changed rows get their price cleared.
    pub fn cycle_all_types(&mut self) -> bool {
        let first_type = self
            .data
            .items
            .iter()
            .find(|i| i.has_both_dimensions())
            .map(|i| i.fabric_type);
        let Some(current) = first_type else {
            return false; // no eligible rows
        };
        let next = FabricType::next_after(current);

        let mut changed = false;
        for item in &mut self.data.items {
            if item.has_both_dimensions() && item.fabric_type != Some(next) {
                item.fabric_type = Some(next);
                item.line_price = None;
                changed = true;
            }
        }
        changed
    }

    /// Replace the quote with a single fresh empty row and no total.
    pub fn reset(&mut self) {
        self.data = QuoteData::new();
    }

    /// True when the quote holds anything worth keeping: more than one row,
    /// or a dimension entered on the sole row.
    pub fn has_data(&self) -> bool {
        let items = &self.data.items;
        items.len() > 1 || items.first().is_some_and(|i| i.has_any_dimension())
    }

    /// Restore the empty-row invariants.
    ///
    /// Collapses every run of adjacent empty rows to a single row (clearing
    /// neighbouring rows can create mid-grid runs, not just trailing ones),
    /// then appends one fresh empty row if the last row is non-empty.
    /// Idempotent: a second call in a row changes nothing.
    pub fn consolidate_empty_rows(&mut self) {
        let items = &mut self.data.items;

        items.dedup_by(|later, earlier| earlier.is_empty() && later.is_empty());

        if let Some(last) = items.last() {
            if !last.is_empty() {
                items.push(QuoteItem::new());
            }
        }
    }
}

impl Default for QuoteStore {
    fn default() -> Self {
        Self::new()
    }
}
