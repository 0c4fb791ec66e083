use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fabric type for a roller blind line item.
///
/// The three-element cycle order is fixed: BO -> BO1 -> SN -> BO.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FabricType {
    #[serde(rename = "BO")]
    Bo,
    #[serde(rename = "BO1")]
    Bo1,
    #[serde(rename = "SN")]
    Sn,
}

impl FabricType {
    /// Fixed cycle order used by type cycling (single row and all-rows).
    pub const SEQUENCE: [FabricType; 3] = [FabricType::Bo, FabricType::Bo1, FabricType::Sn];

    /// Next type in the cycle, wrapping at the end.
    pub fn next(self) -> FabricType {
        let idx = Self::SEQUENCE.iter().position(|&t| t == self).unwrap_or(0);
        Self::SEQUENCE[(idx + 1) % Self::SEQUENCE.len()]
    }

    /// Successor of an optional type: an absent type starts the cycle at BO.
    pub fn next_after(current: Option<FabricType>) -> FabricType {
        match current {
            Some(t) => t.next(),
            None => FabricType::Bo,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FabricType::Bo => "BO",
            FabricType::Bo1 => "BO1",
            FabricType::Sn => "SN",
        }
    }
}

impl std::fmt::Display for FabricType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grid column identifiers.
///
/// Quick-quote view shows Sequence/Width/Height/Type/Price; the detail
/// configuration view shows Sequence plus the attribute columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Column {
    Sequence,
    Width,
    Height,
    #[serde(rename = "TYPE")]
    Type,
    Price,
    Location,
    Fabric,
    Color,
    Over,
    Oi,
    Lr,
}

impl Column {
    /// True for the two numeric-input columns.
    pub fn is_dimension(self) -> bool {
        matches!(self, Column::Width | Column::Height)
    }

    /// True for the free-text detail attribute columns.
    pub fn is_detail_text(self) -> bool {
        matches!(self, Column::Location | Column::Fabric | Column::Color)
    }

    /// True for the detail columns driven by a fixed cyclic option list.
    pub fn is_detail_cycle(self) -> bool {
        matches!(self, Column::Over | Column::Oi | Column::Lr)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Column::Sequence => "sequence",
            Column::Width => "width",
            Column::Height => "height",
            Column::Type => "TYPE",
            Column::Price => "price",
            Column::Location => "location",
            Column::Fabric => "fabric",
            Column::Color => "color",
            Column::Over => "over",
            Column::Oi => "oi",
            Column::Lr => "lr",
        }
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional per-item attributes edited in the detail configuration view.
///
/// The cyclic fields (over, oi, lr) store the option string directly; an
/// absent value renders as blank and is the first entry of each cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailFields {
    pub location: Option<String>,
    pub fabric: Option<String>,
    pub color: Option<String>,
    pub over: Option<String>,
    pub oi: Option<String>,
    pub lr: Option<String>,
}

impl DetailFields {
    pub fn get(&self, column: Column) -> Option<&str> {
        match column {
            Column::Location => self.location.as_deref(),
            Column::Fabric => self.fabric.as_deref(),
            Column::Color => self.color.as_deref(),
            Column::Over => self.over.as_deref(),
            Column::Oi => self.oi.as_deref(),
            Column::Lr => self.lr.as_deref(),
            _ => None,
        }
    }

    /// Set a detail field. An empty string stores as absent.
    /// Returns false if the column is not a detail field.
    pub fn set(&mut self, column: Column, value: Option<String>) -> bool {
        let value = value.filter(|v| !v.is_empty());
        let slot = match column {
            Column::Location => &mut self.location,
            Column::Fabric => &mut self.fabric,
            Column::Color => &mut self.color,
            Column::Over => &mut self.over,
            Column::Oi => &mut self.oi,
            Column::Lr => &mut self.lr,
            _ => return false,
        };
        *slot = value;
        true
    }
}

/// One line of the quote grid.
///
/// INVARIANT: `line_price` is only ever set by a successful price
/// calculation for the current (width, height, fabric_type) triple. Any
/// mutation of those three fields clears it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteItem {
    pub item_id: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub fabric_type: Option<FabricType>,
    pub line_price: Option<f64>,
    #[serde(default, skip_serializing_if = "is_default_detail")]
    pub detail: DetailFields,
}

fn is_default_detail(d: &DetailFields) -> bool {
    *d == DetailFields::default()
}

impl QuoteItem {
    /// A fresh item with a newly generated identifier and no data.
    pub fn new() -> Self {
        Self {
            item_id: format!("item-{}", Uuid::new_v4()),
            width: None,
            height: None,
            fabric_type: None,
            line_price: None,
            detail: DetailFields::default(),
        }
    }

    /// Structurally empty: width, height and fabric type all absent.
    /// Detail attributes do not count; a row with only a location note is
    /// still structurally empty for consolidation purposes.
    pub fn is_empty(&self) -> bool {
        self.width.is_none() && self.height.is_none() && self.fabric_type.is_none()
    }

    /// A row is eligible for type cycling once it has at least one dimension.
    pub fn has_any_dimension(&self) -> bool {
        self.width.is_some() || self.height.is_some()
    }

    /// A row is priceable only when both dimensions are present.
    pub fn has_both_dimensions(&self) -> bool {
        self.width.is_some() && self.height.is_some()
    }
}

impl Default for QuoteItem {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fabric_type_cycle_wraps() {
        assert_eq!(FabricType::Bo.next(), FabricType::Bo1);
        assert_eq!(FabricType::Bo1.next(), FabricType::Sn);
        assert_eq!(FabricType::Sn.next(), FabricType::Bo);
        assert_eq!(FabricType::next_after(None), FabricType::Bo);
    }

    #[test]
    fn test_item_ids_are_unique() {
        let a = QuoteItem::new();
        let b = QuoteItem::new();
        assert_ne!(a.item_id, b.item_id);
    }

    #[test]
    fn test_structurally_empty_ignores_detail() {
        let mut item = QuoteItem::new();
        assert!(item.is_empty());
        item.detail.set(Column::Location, Some("Kitchen".into()));
        assert!(item.is_empty());
        item.width = Some(600);
        assert!(!item.is_empty());
    }

    #[test]
    fn test_detail_set_empty_string_clears() {
        let mut d = DetailFields::default();
        assert!(d.set(Column::Color, Some("White".into())));
        assert_eq!(d.get(Column::Color), Some("White"));
        assert!(d.set(Column::Color, Some(String::new())));
        assert_eq!(d.get(Column::Color), None);
        assert!(!d.set(Column::Width, Some("x".into())));
    }

    #[test]
    fn test_fabric_type_serde_wire_names() {
        let json = serde_json::to_string(&FabricType::Bo1).unwrap();
        assert_eq!(json, "\"BO1\"");
        let back: FabricType = serde_json::from_str("\"SN\"").unwrap();
        assert_eq!(back, FabricType::Sn);
    }
}
