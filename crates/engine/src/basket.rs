//! The ten weighted basket items and their weight assignment.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Items of the escalation basket, declared in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BasketItem {
    /// (CPI + PPI) / 2
    Mixed,
    Cpi,
    Ppi,
    ServicesPpi,
    Usd,
    Eur,
    Brent,
    Gasoline,
    Diesel,
    Gold,
}

impl BasketItem {
    pub const ALL: [BasketItem; 10] = [
        BasketItem::Mixed,
        BasketItem::Cpi,
        BasketItem::Ppi,
        BasketItem::ServicesPpi,
        BasketItem::Usd,
        BasketItem::Eur,
        BasketItem::Brent,
        BasketItem::Gasoline,
        BasketItem::Diesel,
        BasketItem::Gold,
    ];

    /// Row label in the breakdown table.
    pub fn label(&self) -> &'static str {
        match self {
            BasketItem::Mixed => "TÜFE+ÜFE/2",
            BasketItem::Cpi => "TÜFE",
            BasketItem::Ppi => "ÜFE",
            BasketItem::ServicesPpi => "H-ÜFE",
            BasketItem::Usd => "Dolar",
            BasketItem::Eur => "Euro",
            BasketItem::Brent => "Brent",
            BasketItem::Gasoline => "Benzin",
            BasketItem::Diesel => "Motorin",
            BasketItem::Gold => "Altın",
        }
    }
}

impl std::fmt::Display for BasketItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BasketItem::Mixed => write!(f, "mixed"),
            BasketItem::Cpi => write!(f, "cpi"),
            BasketItem::Ppi => write!(f, "ppi"),
            BasketItem::ServicesPpi => write!(f, "services_ppi"),
            BasketItem::Usd => write!(f, "usd"),
            BasketItem::Eur => write!(f, "eur"),
            BasketItem::Brent => write!(f, "brent"),
            BasketItem::Gasoline => write!(f, "gasoline"),
            BasketItem::Diesel => write!(f, "diesel"),
            BasketItem::Gold => write!(f, "gold"),
        }
    }
}

/// Percent change per basket item. Missing items count as 0.
pub type IndicatorChanges = BTreeMap<BasketItem, f64>;

/// Integer weights in percentage points of a 100-point budget.
///
/// Missing items carry weight 0. Negative weights are accepted and offset
/// the others; only the total is constrained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Weights(BTreeMap<BasketItem, i32>);

impl Weights {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, item: BasketItem, weight: i32) -> Self {
        self.0.insert(item, weight);
        self
    }

    pub fn get(&self, item: BasketItem) -> i32 {
        self.0.get(&item).copied().unwrap_or(0)
    }

    /// Sum over all ten items.
    pub fn total(&self) -> i64 {
        BasketItem::ALL.iter().map(|item| i64::from(self.get(*item))).sum()
    }

    /// The dashboard's starting allocation.
    pub fn dashboard_default() -> Self {
        Self::new()
            .with(BasketItem::Mixed, 0)
            .with(BasketItem::Cpi, 40)
            .with(BasketItem::Ppi, 0)
            .with(BasketItem::ServicesPpi, 20)
            .with(BasketItem::Usd, 20)
            .with(BasketItem::Eur, 10)
            .with(BasketItem::Brent, 0)
            .with(BasketItem::Gasoline, 0)
            .with(BasketItem::Diesel, 10)
            .with(BasketItem::Gold, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_is_in_ord_order() {
        let mut sorted = BasketItem::ALL;
        sorted.sort();
        assert_eq!(sorted, BasketItem::ALL);
    }

    #[test]
    fn test_missing_weight_is_zero() {
        let weights = Weights::new().with(BasketItem::Cpi, 100);
        assert_eq!(weights.get(BasketItem::Gold), 0);
        assert_eq!(weights.total(), 100);
    }

    #[test]
    fn test_default_allocation_sums_to_budget() {
        assert_eq!(Weights::dashboard_default().total(), 100);
    }

    #[test]
    fn test_negative_weight_offsets_the_total() {
        let weights: Weights = serde_json::from_str(r#"{"cpi": 110, "usd": -10}"#).unwrap();
        assert_eq!(weights.get(BasketItem::Usd), -10);
        assert_eq!(weights.total(), 100);
    }

    #[test]
    fn test_weights_deserialize_from_named_map() {
        let weights: Weights =
            serde_json::from_str(r#"{"cpi": 60, "services_ppi": 40}"#).unwrap();
        assert_eq!(weights.get(BasketItem::Cpi), 60);
        assert_eq!(weights.get(BasketItem::ServicesPpi), 40);
        assert_eq!(weights.total(), 100);
    }
}
