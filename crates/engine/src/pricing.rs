//! Pricing strategy for one product type.
//!
//! A strategy bundles the numeric input validation rules, the breakpoint
//! price-matrix lookup, and the construction of fresh line items. One
//! strategy exists per product; roller blinds are the only product today.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::item::{Column, FabricType, QuoteItem};

/// Inclusive numeric bounds for one input column, with the label used in
/// rejection notices.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationRule {
    pub min: u32,
    pub max: u32,
    pub label: &'static str,
}

impl ValidationRule {
    pub fn contains(&self, value: u32) -> bool {
        value >= self.min && value <= self.max
    }

    /// The notice shown when a committed value falls outside the bounds.
    pub fn rejection_message(&self) -> String {
        format!("{} must be between {} and {}.", self.label, self.min, self.max)
    }
}

/// A 2-D breakpoint price table for one fabric type.
///
/// `widths` and `drops` are ascending breakpoints; `prices[drop][width]`
/// holds the price for the smallest breakpoints that cover the item. A
/// `None` cell is a combination the supplier does not quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceMatrix {
    pub widths: Vec<u32>,
    pub drops: Vec<u32>,
    pub prices: Vec<Vec<Option<f64>>>,
}

impl PriceMatrix {
    /// First index whose breakpoint covers `value` (ascending scan).
    fn breakpoint_index(breakpoints: &[u32], value: u32) -> Option<usize> {
        breakpoints.iter().position(|&b| value <= b)
    }
}

/// Why a row could not be priced.
#[derive(Debug, Clone, PartialEq)]
pub enum CalcError {
    /// Width, height or fabric type is absent.
    IncompleteData,
    /// No price matrix registered for the item's fabric type.
    MatrixNotFound(FabricType),
    /// Width exceeds the largest width breakpoint.
    WidthOutOfRange(u32),
    /// Height exceeds the largest drop breakpoint.
    HeightOutOfRange(u32),
    /// The matrix cell for this combination is absent.
    PriceNotFound,
}

impl std::fmt::Display for CalcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CalcError::IncompleteData => write!(f, "Incomplete item data."),
            CalcError::MatrixNotFound(t) => {
                write!(f, "Price matrix not found for fabric type: {}", t)
            }
            CalcError::WidthOutOfRange(w) => {
                write!(f, "Width {} exceeds the maximum width in the price matrix.", w)
            }
            CalcError::HeightOutOfRange(h) => {
                write!(f, "Height {} exceeds the maximum height in the price matrix.", h)
            }
            CalcError::PriceNotFound => write!(f, "Price not found for the given dimensions."),
        }
    }
}

impl CalcError {
    /// The grid column a failure points the operator at.
    ///
    /// Incomplete rows point at the first absent input field; matrix and
    /// price-cell misses point at the type column, since the fabric type
    /// selects the matrix.
    pub fn failing_column(&self, item: &QuoteItem) -> Column {
        match self {
            CalcError::IncompleteData => {
                if item.width.is_none() {
                    Column::Width
                } else if item.height.is_none() {
                    Column::Height
                } else {
                    Column::Type
                }
            }
            CalcError::WidthOutOfRange(_) => Column::Width,
            CalcError::HeightOutOfRange(_) => Column::Height,
            CalcError::MatrixNotFound(_) | CalcError::PriceNotFound => Column::Type,
        }
    }
}

/// Price matrices keyed by fabric type.
#[derive(Debug, Clone, Default)]
pub struct MatrixSet {
    matrices: FxHashMap<FabricType, PriceMatrix>,
}

impl MatrixSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, fabric: FabricType, matrix: PriceMatrix) {
        self.matrices.insert(fabric, matrix);
    }

    pub fn get(&self, fabric: FabricType) -> Option<&PriceMatrix> {
        self.matrices.get(&fabric)
    }

    pub fn is_empty(&self) -> bool {
        self.matrices.is_empty()
    }
}

/// Per-product pricing and validation behavior.
pub trait PricingStrategy {
    /// Validation rule for a numeric input column, if that column is
    /// range-checked.
    fn validation_rule(&self, column: Column) -> Option<&ValidationRule>;

    /// Price one item against the registered matrices.
    fn calculate_price(&self, item: &QuoteItem, matrices: &MatrixSet) -> Result<f64, CalcError>;

    /// A fresh line item for this product.
    fn initial_item(&self) -> QuoteItem {
        QuoteItem::new()
    }
}

/// The roller blind product.
pub struct RollerBlindStrategy {
    width_rule: ValidationRule,
    height_rule: ValidationRule,
}

impl RollerBlindStrategy {
    pub fn new() -> Self {
        Self {
            width_rule: ValidationRule {
                min: 250,
                max: 3300,
                label: "Width",
            },
            height_rule: ValidationRule {
                min: 300,
                max: 3300,
                label: "Height",
            },
        }
    }
}

impl Default for RollerBlindStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl PricingStrategy for RollerBlindStrategy {
    fn validation_rule(&self, column: Column) -> Option<&ValidationRule> {
        match column {
            Column::Width => Some(&self.width_rule),
            Column::Height => Some(&self.height_rule),
            _ => None,
        }
    }

    fn calculate_price(&self, item: &QuoteItem, matrices: &MatrixSet) -> Result<f64, CalcError> {
        let (Some(width), Some(height), Some(fabric)) =
            (item.width, item.height, item.fabric_type)
        else {
            return Err(CalcError::IncompleteData);
        };

        let matrix = matrices
            .get(fabric)
            .ok_or(CalcError::MatrixNotFound(fabric))?;

        let width_idx = PriceMatrix::breakpoint_index(&matrix.widths, width)
            .ok_or(CalcError::WidthOutOfRange(width))?;
        let drop_idx = PriceMatrix::breakpoint_index(&matrix.drops, height)
            .ok_or(CalcError::HeightOutOfRange(height))?;

        matrix
            .prices
            .get(drop_idx)
            .and_then(|row| row.get(width_idx))
            .copied()
            .flatten()
            .ok_or(CalcError::PriceNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn test_matrix() -> PriceMatrix {
        PriceMatrix {
            widths: vec![900, 1500, 2100],
            drops: vec![900, 1500, 2100],
            prices: vec![
                vec![Some(100.0), Some(130.0), Some(160.0)],
                vec![Some(120.0), Some(155.0), Some(190.0)],
                vec![Some(140.0), Some(180.0), None],
            ],
        }
    }

    fn matrices() -> MatrixSet {
        let mut set = MatrixSet::new();
        set.insert(FabricType::Bo, test_matrix());
        set
    }

    fn item(width: u32, height: u32, fabric: FabricType) -> QuoteItem {
        QuoteItem {
            width: Some(width),
            height: Some(height),
            fabric_type: Some(fabric),
            ..QuoteItem::new()
        }
    }

    #[test]
    fn test_lookup_picks_smallest_covering_breakpoint() {
        let strategy = RollerBlindStrategy::new();
        let set = matrices();
        // 600x600 rounds up to the 900x900 cell.
        assert_eq!(
            strategy.calculate_price(&item(600, 600, FabricType::Bo), &set),
            Ok(100.0)
        );
        // Exact breakpoint hit uses that breakpoint, not the next.
        assert_eq!(
            strategy.calculate_price(&item(900, 900, FabricType::Bo), &set),
            Ok(100.0)
        );
        // One past a breakpoint moves to the next column.
        assert_eq!(
            strategy.calculate_price(&item(901, 900, FabricType::Bo), &set),
            Ok(130.0)
        );
    }

    #[test]
    fn test_incomplete_rows_are_rejected() {
        let strategy = RollerBlindStrategy::new();
        let set = matrices();
        let mut partial = item(600, 600, FabricType::Bo);
        partial.height = None;
        assert_eq!(
            strategy.calculate_price(&partial, &set),
            Err(CalcError::IncompleteData)
        );
        assert_eq!(
            CalcError::IncompleteData.failing_column(&partial),
            Column::Height
        );
    }

    #[test]
    fn test_missing_matrix() {
        let strategy = RollerBlindStrategy::new();
        let set = matrices();
        assert_eq!(
            strategy.calculate_price(&item(600, 600, FabricType::Sn), &set),
            Err(CalcError::MatrixNotFound(FabricType::Sn))
        );
    }

    #[test]
    fn test_dimension_out_of_range() {
        let strategy = RollerBlindStrategy::new();
        let set = matrices();
        let wide = item(4000, 600, FabricType::Bo);
        let err = strategy.calculate_price(&wide, &set).unwrap_err();
        assert_eq!(err, CalcError::WidthOutOfRange(4000));
        assert_eq!(err.failing_column(&wide), Column::Width);

        let tall = item(600, 4000, FabricType::Bo);
        let err = strategy.calculate_price(&tall, &set).unwrap_err();
        assert_eq!(err, CalcError::HeightOutOfRange(4000));
        assert_eq!(err.failing_column(&tall), Column::Height);
    }

    #[test]
    fn test_absent_price_cell() {
        let strategy = RollerBlindStrategy::new();
        let set = matrices();
        assert_eq!(
            strategy.calculate_price(&item(2100, 2100, FabricType::Bo), &set),
            Err(CalcError::PriceNotFound)
        );
    }

    #[test]
    fn test_validation_rules() {
        let strategy = RollerBlindStrategy::new();
        let width = strategy.validation_rule(Column::Width).unwrap();
        assert!(!width.contains(100));
        assert!(width.contains(250));
        assert!(width.contains(3300));
        assert!(!width.contains(3301));
        assert_eq!(
            width.rejection_message(),
            "Width must be between 250 and 3300."
        );
        assert!(strategy.validation_rule(Column::Type).is_none());
    }
}
