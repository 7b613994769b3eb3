use serde::{Deserialize, Serialize};

/// Troy ounce expressed in grams, used to turn the gold future into a gram price.
pub const GRAMS_PER_TROY_OUNCE: f64 = 31.1035;

/// Lookback window for market snapshots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Period {
    #[default]
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
    #[serde(rename = "6mo")]
    SixMonths,
    #[serde(rename = "ytd")]
    YearToDate,
    #[serde(rename = "1y")]
    OneYear,
}

impl Period {
    pub const ALL: [Period; 5] = [
        Period::OneMonth,
        Period::ThreeMonths,
        Period::SixMonths,
        Period::YearToDate,
        Period::OneYear,
    ];

    /// Range code understood by the chart service (`1mo`, `ytd`, ...).
    pub fn code(&self) -> &'static str {
        match self {
            Period::OneMonth => "1mo",
            Period::ThreeMonths => "3mo",
            Period::SixMonths => "6mo",
            Period::YearToDate => "ytd",
            Period::OneYear => "1y",
        }
    }

    /// Operator-facing label.
    pub fn label(&self) -> &'static str {
        match self {
            Period::OneMonth => "1 Ay",
            Period::ThreeMonths => "3 Ay",
            Period::SixMonths => "6 Ay",
            Period::YearToDate => "Yılbaşından Bugüne (YTD)",
            Period::OneYear => "1 Yıl",
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::str::FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Period::ALL
            .into_iter()
            .find(|p| p.code() == s)
            .ok_or_else(|| format!("Unknown period '{}', expected one of 1mo, 3mo, 6mo, ytd, 1y", s))
    }
}

/// Market instruments tracked by the snapshot provider.
///
/// The first six are fetched; `GramGoldTry` is derived from gold and USD/TRY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Instrument {
    UsdTry,
    EurTry,
    EurUsd,
    GoldOunce,
    Brent,
    Us10y,
    GramGoldTry,
}

impl Instrument {
    /// Instruments fetched from the data source.
    pub const BASE: [Instrument; 6] = [
        Instrument::UsdTry,
        Instrument::EurTry,
        Instrument::EurUsd,
        Instrument::GoldOunce,
        Instrument::Brent,
        Instrument::Us10y,
    ];

    /// Every key a complete snapshot carries, including the derived gram gold.
    pub const ALL: [Instrument; 7] = [
        Instrument::UsdTry,
        Instrument::EurTry,
        Instrument::EurUsd,
        Instrument::GoldOunce,
        Instrument::Brent,
        Instrument::Us10y,
        Instrument::GramGoldTry,
    ];

    /// Ticker symbol at the chart service, `None` for derived instruments.
    pub fn symbol(&self) -> Option<&'static str> {
        match self {
            Instrument::UsdTry => Some("TRY=X"),
            Instrument::EurTry => Some("EURTRY=X"),
            Instrument::EurUsd => Some("EURUSD=X"),
            Instrument::GoldOunce => Some("GC=F"),
            Instrument::Brent => Some("BZ=F"),
            Instrument::Us10y => Some("^TNX"),
            Instrument::GramGoldTry => None,
        }
    }

    /// Card title shown on the dashboard.
    pub fn label(&self) -> &'static str {
        match self {
            Instrument::UsdTry => "USD/TL",
            Instrument::EurTry => "EUR/TL",
            Instrument::EurUsd => "EUR/USD",
            Instrument::GoldOunce => "Ons Altın ($)",
            Instrument::Brent => "Brent ($)",
            Instrument::Us10y => "ABD 10Y",
            Instrument::GramGoldTry => "Gram Altın",
        }
    }
}

impl std::fmt::Display for Instrument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Instrument::UsdTry => write!(f, "usd_try"),
            Instrument::EurTry => write!(f, "eur_try"),
            Instrument::EurUsd => write!(f, "eur_usd"),
            Instrument::GoldOunce => write!(f, "gold_ounce"),
            Instrument::Brent => write!(f, "brent"),
            Instrument::Us10y => write!(f, "us10y"),
            Instrument::GramGoldTry => write!(f, "gram_gold_try"),
        }
    }
}

/// First/last observation over a period and the derived percent change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorEntry {
    pub first_value: f64,
    pub last_value: f64,
    pub percent_change: f64,
}

impl IndicatorEntry {
    /// Placeholder used when no usable data exists.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Build an entry from period endpoints.
    ///
    /// A zero (or non-finite) first value yields an all-zero entry rather than
    /// an infinite change.
    pub fn from_endpoints(first_value: f64, last_value: f64) -> Self {
        if first_value == 0.0 || !first_value.is_finite() || !last_value.is_finite() {
            return Self::zero();
        }
        Self {
            first_value,
            last_value,
            percent_change: (last_value - first_value) / first_value * 100.0,
        }
    }

    /// The dashboard asks the operator for a manual percentage when the
    /// current value is missing.
    pub fn requires_manual(&self) -> bool {
        self.last_value == 0.0
    }
}
