//! End-to-end tests for the escalation pipeline.
//!
//! ```bash
//! cargo test -p escalator-engine --test integration
//! ```

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use escalator_common::types::{IndicatorEntry, Instrument};
use escalator_engine::basket::{BasketItem, IndicatorChanges, Weights};
use escalator_engine::calculator::{apply_to_principal, breakdown, compute_blend, validate_weights};
use escalator_engine::pipeline::{EscalationInputs, FuelPrice, InflationInputs, Outcome, evaluate};

// ============================================================
// Shared helpers
// ============================================================

/// Market entry with a given percent change off a base of 100.
fn entry(percent: f64) -> IndicatorEntry {
    IndicatorEntry::from_endpoints(100.0, 100.0 + percent)
}

fn scenario_weights() -> Weights {
    Weights::new()
        .with(BasketItem::Cpi, 40)
        .with(BasketItem::ServicesPpi, 20)
        .with(BasketItem::Usd, 20)
        .with(BasketItem::Eur, 10)
        .with(BasketItem::Diesel, 10)
}

fn dashboard_inputs() -> EscalationInputs {
    let market = BTreeMap::from([
        (Instrument::UsdTry, entry(5.0)),
        (Instrument::EurTry, entry(2.0)),
        (Instrument::EurUsd, entry(-2.0)),
        (Instrument::GoldOunce, entry(1.0)),
        (Instrument::Brent, IndicatorEntry::from_endpoints(80.0, 80.0)),
        (Instrument::Us10y, IndicatorEntry::from_endpoints(4.0, 4.0)),
        (Instrument::GramGoldTry, entry(3.0)),
    ]);
    EscalationInputs {
        principal: dec!(100000),
        market,
        manual_overrides: BTreeMap::new(),
        inflation: InflationInputs::default(),
        gasoline: FuelPrice {
            old_price: 42.0,
            new_price: 44.0,
        },
        diesel: FuelPrice {
            old_price: 43.0,
            new_price: 45.0,
        },
        weights: scenario_weights(),
    }
}

// ============================================================
// Calculator scenarios
// ============================================================

#[test]
fn test_reference_scenario() {
    let changes: IndicatorChanges = [
        (BasketItem::Usd, 5.0),
        (BasketItem::Eur, 2.0),
        (BasketItem::Gold, 3.0),
        (BasketItem::Brent, 0.0),
        (BasketItem::Cpi, 3.45),
        (BasketItem::Ppi, 4.15),
        (BasketItem::ServicesPpi, 5.0),
        (BasketItem::Gasoline, 4.76),
        (BasketItem::Diesel, 4.65),
    ]
    .into_iter()
    .collect();
    let weights = scenario_weights();
    assert!(validate_weights(&weights));

    let rate = compute_blend(&changes, &weights).unwrap();
    assert_eq!(rate, dec!(4.045));

    let adj = apply_to_principal(dec!(100000), rate).unwrap();
    assert_eq!(adj.delta, dec!(4045));
    assert_eq!(adj.new_amount, dec!(104045));

    let rows = breakdown(&changes, &weights).unwrap();
    let names: Vec<_> = rows.iter().map(|r| r.name).collect();
    assert_eq!(names, vec!["TÜFE", "H-ÜFE", "Dolar", "Euro", "Motorin"]);
    let sum: Decimal = rows.iter().map(|r| r.contribution).sum();
    assert_eq!(sum, rate);
}

// ============================================================
// Pipeline
// ============================================================

#[test]
fn test_pipeline_computes_summary() {
    let report = evaluate(&dashboard_inputs());

    assert_eq!(report.weight_total, 100);
    let Outcome::Computed(summary) = &report.outcome else {
        panic!("expected a computed outcome, got {:?}", report.outcome);
    };

    // Diesel comes from the pump prices: 2/43 = 4.6511...%
    let diesel = report.changes[&BasketItem::Diesel];
    assert!((diesel - 200.0 / 43.0).abs() < 1e-12);

    // 1.38 + 1.0 + 1.0 + 0.2 + ~0.4651 = ~4.0451
    let rate = summary.blended_rate;
    assert!(rate > dec!(4.045) && rate < dec!(4.0452));
    assert_eq!(
        summary.adjustment.new_amount,
        dec!(100000) + summary.adjustment.delta
    );
    let sum: Decimal = summary.breakdown.iter().map(|r| r.contribution).sum();
    assert_eq!(sum, rate);
}

#[test]
fn test_pipeline_withholds_on_bad_weight_sum() {
    let mut inputs = dashboard_inputs();
    inputs.weights = scenario_weights().with(BasketItem::Diesel, 5);

    let report = evaluate(&inputs);
    assert_eq!(report.weight_total, 95);
    assert_eq!(report.outcome, Outcome::InvalidWeights { total: 95 });
}

#[test]
fn test_pipeline_degraded_market_with_overrides() {
    let mut inputs = dashboard_inputs();
    inputs.market = Instrument::ALL
        .iter()
        .map(|i| (*i, IndicatorEntry::zero()))
        .collect();
    inputs.manual_overrides = BTreeMap::from([(Instrument::UsdTry, 6.0), (Instrument::EurTry, 4.0)]);
    inputs.weights = Weights::new()
        .with(BasketItem::Usd, 50)
        .with(BasketItem::Eur, 50);

    let report = evaluate(&inputs);
    assert!(report.market.iter().all(|r| r.manual));
    let Outcome::Computed(summary) = report.outcome else {
        panic!("expected a computed outcome");
    };
    assert_eq!(summary.blended_rate, dec!(5));
    assert_eq!(summary.adjustment.delta, dec!(5000));
}

#[test]
fn test_pipeline_all_zero_indicators_is_valid() {
    let mut inputs = dashboard_inputs();
    inputs.market = BTreeMap::new();
    inputs.inflation = InflationInputs {
        cpi: 0.0,
        ppi: 0.0,
        services_ppi: 0.0,
        us_inflation: 0.0,
        euro_area_inflation: 0.0,
    };
    inputs.diesel = FuelPrice {
        old_price: 0.0,
        new_price: 44.0,
    };

    let report = evaluate(&inputs);
    assert_eq!(report.fuel.diesel_change, 0.0);
    let Outcome::Computed(summary) = report.outcome else {
        panic!("expected a computed outcome");
    };
    assert_eq!(summary.blended_rate, Decimal::ZERO);
    assert_eq!(summary.adjustment.new_amount, dec!(100000));
}

#[test]
fn test_pipeline_out_of_range_principal_keeps_report() {
    let mut inputs = dashboard_inputs();
    inputs.principal = Decimal::MAX;

    let report = evaluate(&inputs);
    assert_eq!(report.weight_total, 100);
    assert_eq!(report.market.len(), Instrument::ALL.len());
    let Outcome::Unrepresentable { message } = &report.outcome else {
        panic!("expected an unrepresentable outcome, got {:?}", report.outcome);
    };
    assert!(message.contains("overflow"));
}

#[test]
fn test_pipeline_huge_override_keeps_report() {
    let mut inputs = dashboard_inputs();
    inputs.market.insert(Instrument::UsdTry, IndicatorEntry::zero());
    inputs.manual_overrides = BTreeMap::from([(Instrument::UsdTry, 1e30)]);

    let report = evaluate(&inputs);
    let usd = report
        .market
        .iter()
        .find(|r| r.instrument == Instrument::UsdTry)
        .unwrap();
    assert!(usd.manual);
    assert_eq!(usd.percent_change, 1e30);
    assert!(matches!(report.outcome, Outcome::Unrepresentable { .. }));
}

#[test]
fn test_pipeline_accepts_negative_weights() {
    let mut inputs = dashboard_inputs();
    inputs.weights = Weights::new()
        .with(BasketItem::Cpi, 110)
        .with(BasketItem::Usd, -10);

    let report = evaluate(&inputs);
    assert_eq!(report.weight_total, 100);
    let Outcome::Computed(summary) = report.outcome else {
        panic!("expected a computed outcome");
    };
    // 3.45 * 1.1 - 5 * 0.1 = 3.295
    assert_eq!(summary.blended_rate, dec!(3.295));
}

#[test]
fn test_reference_expectation_uses_brent_and_usd() {
    let mut inputs = dashboard_inputs();
    inputs.market.insert(Instrument::Brent, IndicatorEntry::from_endpoints(80.0, 84.0));

    let report = evaluate(&inputs);
    // Brent +5% and USD +5%
    assert!((report.fuel.reference_expectation - 10.0).abs() < 1e-9);
}

#[test]
fn test_pipeline_is_idempotent() {
    let inputs = dashboard_inputs();
    let first = evaluate(&inputs);
    let second = evaluate(&inputs);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}
