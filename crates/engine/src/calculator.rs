//! Escalation calculator.
//!
//! Blended rate = Σ (percent_change_i × weight_i) / 100
//!
//! Weights are whole percentage points of a 100-point budget, not fractions:
//! a weight of 40 on a +3.45% index contributes 3.45 × 40 / 100 = 1.38 points.
//! All money and contribution arithmetic runs on `Decimal`; rounding happens
//! only when figures are formatted for display.

use rust_decimal::prelude::*;
use serde::Serialize;
use thiserror::Error;

use crate::basket::{BasketItem, IndicatorChanges, Weights};

/// The weight budget every assignment must add up to.
pub const WEIGHT_BUDGET: i64 = 100;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    #[error("weights sum to {total}, expected 100")]
    WeightSum { total: i64 },

    #[error("percent change for {item} is not a representable number")]
    NotRepresentable { item: BasketItem },

    #[error("amount overflow while applying the rate")]
    Overflow,
}

/// Monetary effect of a blended rate on the principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Adjustment {
    pub delta: Decimal,
    pub new_amount: Decimal,
}

/// One row of the contribution table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownRow {
    pub item: BasketItem,
    pub name: &'static str,
    pub percent_change: f64,
    pub weight: i32,
    pub contribution: Decimal,
}

/// True iff the ten weights add up to exactly 100.
pub fn validate_weights(weights: &Weights) -> bool {
    weights.total() == WEIGHT_BUDGET
}

/// Weighted blend of the ten basket items.
///
/// Refuses to compute unless the weights sum to 100.
pub fn compute_blend(changes: &IndicatorChanges, weights: &Weights) -> Result<Decimal, CalcError> {
    if !validate_weights(weights) {
        return Err(CalcError::WeightSum {
            total: weights.total(),
        });
    }

    BasketItem::ALL.iter().try_fold(Decimal::ZERO, |acc, item| {
        let c = contribution(*item, change_of(changes, *item), weights.get(*item))?;
        acc.checked_add(c).ok_or(CalcError::Overflow)
    })
}

/// delta = principal × rate / 100; new amount = principal + delta.
pub fn apply_to_principal(principal: Decimal, blended_rate: Decimal) -> Result<Adjustment, CalcError> {
    let delta = principal
        .checked_mul(blended_rate)
        .and_then(|v| v.checked_div(HUNDRED))
        .ok_or(CalcError::Overflow)?;
    let new_amount = principal.checked_add(delta).ok_or(CalcError::Overflow)?;
    Ok(Adjustment { delta, new_amount })
}

/// Percent change between two fuel prices; 0 when there is no positive old price.
pub fn fuel_percent_change(old_price: f64, new_price: f64) -> f64 {
    if old_price > 0.0 {
        (new_price - old_price) / old_price * 100.0
    } else {
        0.0
    }
}

/// Advisory fuel expectation: oil change plus USD change. Not part of the blend.
pub fn reference_fuel_expectation(oil_change: f64, usd_change: f64) -> f64 {
    oil_change + usd_change
}

/// Per-item contributions in basket order, zero-weight items left out.
///
/// Contributions of the listed rows add up to the blended rate exactly, since
/// every omitted row contributes zero.
pub fn breakdown(changes: &IndicatorChanges, weights: &Weights) -> Result<Vec<BreakdownRow>, CalcError> {
    BasketItem::ALL
        .iter()
        .filter(|item| weights.get(**item) != 0)
        .map(|item| {
            let percent_change = change_of(changes, *item);
            let weight = weights.get(*item);
            Ok(BreakdownRow {
                item: *item,
                name: item.label(),
                percent_change,
                weight,
                contribution: contribution(*item, percent_change, weight)?,
            })
        })
        .collect()
}

fn change_of(changes: &IndicatorChanges, item: BasketItem) -> f64 {
    changes.get(&item).copied().unwrap_or(0.0)
}

fn contribution(item: BasketItem, percent_change: f64, weight: i32) -> Result<Decimal, CalcError> {
    if weight == 0 {
        return Ok(Decimal::ZERO);
    }
    let change = Decimal::from_f64(percent_change).ok_or(CalcError::NotRepresentable { item })?;
    change
        .checked_mul(Decimal::from(weight))
        .and_then(|v| v.checked_div(HUNDRED))
        .ok_or(CalcError::Overflow)
}
