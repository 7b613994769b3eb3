//! Presentation model returned to the dashboard.
//!
//! Raw figures travel alongside their locale-formatted strings; all rounding
//! for display happens here and nowhere upstream.

use rust_decimal::Decimal;
use serde::Serialize;

use escalator_common::locale::LocaleFormat;
use escalator_common::types::Period;
use escalator_engine::calculator::BreakdownRow;
use escalator_engine::pipeline::{
    EscalationReport, EscalationSummary, FuelPrice, InflationInputs, Outcome, ResolvedIndicator,
};

pub const DEGRADED_WARNING: &str = "⚠️ Piyasa verisine ulaşılamadı. Manuel mod aktif.";
pub const PRINCIPAL_HINT: &str = "Lütfen geçerli bir sayı giriniz (Örn: 100.000,00)";
pub const UNREPRESENTABLE_WARNING: &str = "⚠️ Hesaplama yapılamadı, girilen değerler çok büyük";

/// Sign colouring for a percent change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
}

impl Trend {
    pub fn of(value: f64) -> Self {
        if value >= 0.0 { Trend::Up } else { Trend::Down }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct IndicatorCard {
    pub key: String,
    pub title: &'static str,
    pub previous: String,
    pub current: String,
    pub percent_change: f64,
    pub change: String,
    pub trend: Trend,
    /// No current value: the dashboard shows a manual percent input instead.
    pub requires_manual: bool,
}

impl IndicatorCard {
    fn from_resolved(locale: &LocaleFormat, resolved: &ResolvedIndicator) -> Self {
        Self {
            key: resolved.instrument.to_string(),
            title: resolved.instrument.label(),
            previous: locale.format_float(resolved.entry.first_value, 2),
            current: locale.format_float(resolved.entry.last_value, 2),
            percent_change: resolved.percent_change,
            change: locale.format_percent(resolved.percent_change, 2),
            trend: Trend::of(resolved.percent_change),
            requires_manual: resolved.manual,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MarketView {
    pub period: Period,
    pub period_label: &'static str,
    pub degraded: bool,
    pub warning: Option<String>,
    pub cards: Vec<IndicatorCard>,
}

impl MarketView {
    pub fn build(
        locale: &LocaleFormat,
        period: Period,
        degraded: bool,
        indicators: &[ResolvedIndicator],
    ) -> Self {
        Self {
            period,
            period_label: period.label(),
            degraded,
            warning: degraded.then(|| DEGRADED_WARNING.to_string()),
            cards: indicators
                .iter()
                .map(|r| IndicatorCard::from_resolved(locale, r))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PrincipalView {
    pub input: String,
    pub value: Decimal,
    pub formatted: String,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FuelCard {
    pub name: &'static str,
    pub old_price: f64,
    pub new_price: f64,
    pub percent_change: f64,
    pub change: String,
    pub trend: Trend,
    /// Advisory "Tahmin" tag, identical on both fuel cards.
    pub expectation: String,
}

impl FuelCard {
    fn build(
        locale: &LocaleFormat,
        name: &'static str,
        price: FuelPrice,
        change: f64,
        expectation: f64,
    ) -> Self {
        Self {
            name,
            old_price: price.old_price,
            new_price: price.new_price,
            percent_change: change,
            change: locale.format_percent(change, 2),
            trend: Trend::of(change),
            expectation: format!("Tahmin: {}", locale.format_percent(expectation, 1)),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BreakdownRowView {
    pub name: &'static str,
    pub percent_change: f64,
    pub change: String,
    pub weight: i32,
    pub contribution: Decimal,
    pub impact: String,
}

impl BreakdownRowView {
    fn build(locale: &LocaleFormat, row: &BreakdownRow) -> Self {
        Self {
            name: row.name,
            percent_change: row.percent_change,
            change: locale.format_float(row.percent_change, 2),
            weight: row.weight,
            contribution: row.contribution,
            impact: locale.format_amount(row.contribution),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryView {
    pub blended_rate: Decimal,
    pub blended_rate_display: String,
    pub delta: Decimal,
    pub delta_display: String,
    pub new_amount: Decimal,
    pub new_amount_display: String,
    /// "YENİ TUTAR: 104.045,00 TL"
    pub headline: String,
    /// "Fark: 4.045,00 TL (%+4,05)"
    pub detail: String,
}

impl SummaryView {
    fn build(locale: &LocaleFormat, currency: &str, summary: &EscalationSummary) -> Self {
        let adj = summary.adjustment;
        let rate = locale.format_rate(summary.blended_rate, 2);
        let delta = locale.format_amount(adj.delta);
        let new_amount = locale.format_amount(adj.new_amount);
        Self {
            blended_rate: summary.blended_rate,
            headline: format!("YENİ TUTAR: {} {}", new_amount, currency),
            detail: format!("Fark: {} {} ({})", delta, currency, rate),
            blended_rate_display: rate,
            delta: adj.delta,
            delta_display: delta,
            new_amount: adj.new_amount,
            new_amount_display: new_amount,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResultView {
    /// Validation banner; nothing is computed.
    InvalidWeights { total: i64, message: String },
    /// A figure was out of range; cards stay usable, nothing is computed.
    Unrepresentable { message: String, detail: String },
    Computed {
        summary: SummaryView,
        breakdown: Vec<BreakdownRowView>,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub market: MarketView,
    pub principal: PrincipalView,
    pub fuel: Vec<FuelCard>,
    pub inflation: InflationInputs,
    pub weight_total: i64,
    pub result: ResultView,
}

impl DashboardView {
    pub fn build(
        locale: &LocaleFormat,
        currency: &str,
        period: Period,
        degraded: bool,
        principal: PrincipalView,
        report: &EscalationReport,
    ) -> Self {
        let fuel = &report.fuel;
        let result = match &report.outcome {
            Outcome::InvalidWeights { total } => ResultView::InvalidWeights {
                total: *total,
                message: format!("⚠️ Toplam: %{}", total),
            },
            Outcome::Unrepresentable { message } => ResultView::Unrepresentable {
                message: UNREPRESENTABLE_WARNING.to_string(),
                detail: message.clone(),
            },
            Outcome::Computed(summary) => ResultView::Computed {
                summary: SummaryView::build(locale, currency, summary),
                breakdown: summary
                    .breakdown
                    .iter()
                    .map(|row| BreakdownRowView::build(locale, row))
                    .collect(),
            },
        };

        Self {
            market: MarketView::build(locale, period, degraded, &report.market),
            principal,
            fuel: vec![
                FuelCard::build(
                    locale,
                    "Benzin",
                    fuel.gasoline,
                    fuel.gasoline_change,
                    fuel.reference_expectation,
                ),
                FuelCard::build(
                    locale,
                    "Motorin",
                    fuel.diesel,
                    fuel.diesel_change,
                    fuel.reference_expectation,
                ),
            ],
            inflation: report.inflation,
            weight_total: report.weight_total,
            result,
        }
    }
}
