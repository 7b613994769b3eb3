use std::collections::BTreeMap;

use serde::Serialize;

use escalator_common::types::{GRAMS_PER_TROY_OUNCE, IndicatorEntry, Instrument, Period};

use crate::source::PriceSeries;

/// Indicator entries for one period, as handed to the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketSnapshot {
    pub period: Period,
    /// Set when the data source could not be reached or returned nothing.
    pub degraded: bool,
    pub entries: BTreeMap<Instrument, IndicatorEntry>,
}

impl MarketSnapshot {
    /// Build a snapshot from fetched close series.
    ///
    /// Instruments with fewer than two observations become zero entries so
    /// the operator is asked for a manual figure.
    pub fn from_series(period: Period, series: &PriceSeries) -> Self {
        let mut entries = BTreeMap::new();

        for instrument in Instrument::BASE {
            let entry = series
                .get(&instrument)
                .map(|closes| entry_from_closes(closes))
                .unwrap_or_default();
            entries.insert(instrument, entry);
        }

        if let (Some(gold), Some(usd)) = (
            entries.get(&Instrument::GoldOunce),
            entries.get(&Instrument::UsdTry),
        ) {
            let gram = derive_gram_gold(gold, usd);
            entries.insert(Instrument::GramGoldTry, gram);
        }

        Self {
            period,
            degraded: false,
            entries,
        }
    }

    /// Result of a failed fetch: flagged and empty.
    pub fn degraded(period: Period) -> Self {
        Self {
            period,
            degraded: true,
            entries: BTreeMap::new(),
        }
    }

    /// Fill every expected key that is missing with a zero placeholder.
    ///
    /// Covers all seven instruments, bond yield included.
    pub fn with_placeholders(mut self) -> Self {
        for instrument in Instrument::ALL {
            self.entries.entry(instrument).or_insert_with(IndicatorEntry::zero);
        }
        self
    }

    /// Entry for an instrument, zero when absent.
    pub fn entry(&self, instrument: Instrument) -> IndicatorEntry {
        self.entries.get(&instrument).copied().unwrap_or_default()
    }
}

fn entry_from_closes(closes: &[f64]) -> IndicatorEntry {
    match (closes.first(), closes.last()) {
        (Some(first), Some(last)) if closes.len() > 1 => IndicatorEntry::from_endpoints(*first, *last),
        _ => IndicatorEntry::zero(),
    }
}

/// Gram gold in local currency: ounce price / grams per ounce * USD rate, at
/// both period endpoints.
pub fn derive_gram_gold(gold_ounce: &IndicatorEntry, usd_try: &IndicatorEntry) -> IndicatorEntry {
    let first_value = gold_ounce.first_value / GRAMS_PER_TROY_OUNCE * usd_try.first_value;
    let last_value = gold_ounce.last_value / GRAMS_PER_TROY_OUNCE * usd_try.last_value;
    let percent_change = if first_value > 0.0 {
        (last_value - first_value) / first_value * 100.0
    } else {
        0.0
    };
    IndicatorEntry {
        first_value,
        last_value,
        percent_change,
    }
}
