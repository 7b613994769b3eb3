//! Dashboard evaluation pipeline.
//!
//! Takes every operator input as one explicit struct and produces the full
//! report in a single pass:
//! 1. Resolve market percent changes (manual override where the snapshot has
//!    no current value)
//! 2. Derive fuel changes and the mixed CPI/PPI index
//! 3. Gate on the weight sum
//! 4. Blend, apply to the principal and build the breakdown
//!
//! Every step degrades instead of failing: the report always carries the
//! resolved market and fuel figures, whatever the outcome.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use escalator_common::types::{IndicatorEntry, Instrument};

use crate::basket::{BasketItem, IndicatorChanges, Weights};
use crate::calculator::{
    Adjustment, BreakdownRow, CalcError, apply_to_principal, breakdown, compute_blend,
    fuel_percent_change, reference_fuel_expectation, validate_weights,
};

/// Old/new pump price for one fuel type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FuelPrice {
    pub old_price: f64,
    pub new_price: f64,
}

impl FuelPrice {
    pub fn percent_change(&self) -> f64 {
        fuel_percent_change(self.old_price, self.new_price)
    }
}

/// Manually entered inflation figures, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InflationInputs {
    pub cpi: f64,
    pub ppi: f64,
    pub services_ppi: f64,
    /// Informational only
    pub us_inflation: f64,
    /// Informational only
    pub euro_area_inflation: f64,
}

impl InflationInputs {
    /// (CPI + PPI) / 2
    pub fn mixed(&self) -> f64 {
        (self.cpi + self.ppi) / 2.0
    }
}

impl Default for InflationInputs {
    fn default() -> Self {
        Self {
            cpi: 3.45,
            ppi: 4.15,
            services_ppi: 5.00,
            us_inflation: 0.4,
            euro_area_inflation: 0.0,
        }
    }
}

/// Everything the calculation depends on.
#[derive(Debug, Clone, PartialEq)]
pub struct EscalationInputs {
    pub principal: Decimal,
    /// Snapshot entries, placeholders included.
    pub market: BTreeMap<Instrument, IndicatorEntry>,
    /// Operator percentages for instruments without a current value.
    pub manual_overrides: BTreeMap<Instrument, f64>,
    pub inflation: InflationInputs,
    pub gasoline: FuelPrice,
    pub diesel: FuelPrice,
    pub weights: Weights,
}

/// A market instrument after override resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResolvedIndicator {
    pub instrument: Instrument,
    pub entry: IndicatorEntry,
    /// Percent change actually used downstream.
    pub percent_change: f64,
    /// True when the figure came from the operator.
    pub manual: bool,
}

/// Fuel card figures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FuelReport {
    pub gasoline: FuelPrice,
    pub gasoline_change: f64,
    pub diesel: FuelPrice,
    pub diesel_change: f64,
    /// Brent change + USD change, shown on both fuel cards.
    pub reference_expectation: f64,
}

/// Summary produced when the weights are valid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EscalationSummary {
    pub blended_rate: Decimal,
    pub adjustment: Adjustment,
    pub breakdown: Vec<BreakdownRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// Computation withheld; `total` is the current weight sum.
    InvalidWeights { total: i64 },
    /// A figure could not be carried through exact decimal arithmetic (a
    /// non-finite or out-of-range change, or an amount past the decimal range).
    Unrepresentable { message: String },
    Computed(EscalationSummary),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EscalationReport {
    pub principal: Decimal,
    pub market: Vec<ResolvedIndicator>,
    pub changes: IndicatorChanges,
    pub fuel: FuelReport,
    pub inflation: InflationInputs,
    pub weight_total: i64,
    pub outcome: Outcome,
}

/// Resolve one market instrument: the snapshot's change, or the operator's
/// figure (default 0) when the snapshot has no current value.
pub fn resolve_indicator(
    instrument: Instrument,
    market: &BTreeMap<Instrument, IndicatorEntry>,
    overrides: &BTreeMap<Instrument, f64>,
) -> ResolvedIndicator {
    let entry = market.get(&instrument).copied().unwrap_or_default();
    if entry.requires_manual() {
        ResolvedIndicator {
            instrument,
            entry,
            percent_change: overrides.get(&instrument).copied().unwrap_or(0.0),
            manual: true,
        }
    } else {
        ResolvedIndicator {
            instrument,
            entry,
            percent_change: entry.percent_change,
            manual: false,
        }
    }
}

/// Run the whole dashboard computation.
///
/// Never fails: an invalid weight sum and an unrepresentable figure are both
/// reported as outcomes.
pub fn evaluate(inputs: &EscalationInputs) -> EscalationReport {
    let market: Vec<ResolvedIndicator> = Instrument::ALL
        .iter()
        .map(|i| resolve_indicator(*i, &inputs.market, &inputs.manual_overrides))
        .collect();
    let change = |instrument: Instrument| {
        market
            .iter()
            .find(|r| r.instrument == instrument)
            .map(|r| r.percent_change)
            .unwrap_or(0.0)
    };

    let usd = change(Instrument::UsdTry);
    let brent = change(Instrument::Brent);
    let fuel = FuelReport {
        gasoline: inputs.gasoline,
        gasoline_change: inputs.gasoline.percent_change(),
        diesel: inputs.diesel,
        diesel_change: inputs.diesel.percent_change(),
        reference_expectation: reference_fuel_expectation(brent, usd),
    };

    let changes: IndicatorChanges = [
        (BasketItem::Mixed, inputs.inflation.mixed()),
        (BasketItem::Cpi, inputs.inflation.cpi),
        (BasketItem::Ppi, inputs.inflation.ppi),
        (BasketItem::ServicesPpi, inputs.inflation.services_ppi),
        (BasketItem::Usd, usd),
        (BasketItem::Eur, change(Instrument::EurTry)),
        (BasketItem::Brent, brent),
        (BasketItem::Gasoline, fuel.gasoline_change),
        (BasketItem::Diesel, fuel.diesel_change),
        (BasketItem::Gold, change(Instrument::GramGoldTry)),
    ]
    .into_iter()
    .collect();

    let weight_total = inputs.weights.total();
    let outcome = if !validate_weights(&inputs.weights) {
        tracing::debug!(weight_total, "Escalation withheld, weights do not sum to 100");
        Outcome::InvalidWeights {
            total: weight_total,
        }
    } else {
        match summarize(inputs.principal, &changes, &inputs.weights) {
            Ok(summary) => {
                tracing::debug!(
                    blended_rate = %summary.blended_rate,
                    delta = %summary.adjustment.delta,
                    rows = summary.breakdown.len(),
                    "Escalation computed"
                );
                Outcome::Computed(summary)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Escalation not representable");
                Outcome::Unrepresentable {
                    message: e.to_string(),
                }
            }
        }
    };

    EscalationReport {
        principal: inputs.principal,
        market,
        changes,
        fuel,
        inflation: inputs.inflation,
        weight_total,
        outcome,
    }
}

fn summarize(
    principal: Decimal,
    changes: &IndicatorChanges,
    weights: &Weights,
) -> Result<EscalationSummary, CalcError> {
    let blended_rate = compute_blend(changes, weights)?;
    let adjustment = apply_to_principal(principal, blended_rate)?;
    let rows = breakdown(changes, weights)?;
    Ok(EscalationSummary {
        blended_rate,
        adjustment,
        breakdown: rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_uses_snapshot_when_present() {
        let market = BTreeMap::from([(Instrument::UsdTry, IndicatorEntry::from_endpoints(40.0, 42.0))]);
        let overrides = BTreeMap::from([(Instrument::UsdTry, 99.0)]);
        let resolved = resolve_indicator(Instrument::UsdTry, &market, &overrides);
        assert!(!resolved.manual);
        assert!((resolved.percent_change - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_resolve_uses_override_for_placeholder() {
        let market = BTreeMap::from([(Instrument::EurTry, IndicatorEntry::zero())]);
        let overrides = BTreeMap::from([(Instrument::EurTry, 2.5)]);
        let resolved = resolve_indicator(Instrument::EurTry, &market, &overrides);
        assert!(resolved.manual);
        assert_eq!(resolved.percent_change, 2.5);
    }

    #[test]
    fn test_resolve_missing_without_override_is_zero() {
        let resolved = resolve_indicator(Instrument::Us10y, &BTreeMap::new(), &BTreeMap::new());
        assert!(resolved.manual);
        assert_eq!(resolved.percent_change, 0.0);
    }

    #[test]
    fn test_mixed_index() {
        let inflation = InflationInputs::default();
        assert!((inflation.mixed() - 3.8).abs() < 1e-12);
    }
}
