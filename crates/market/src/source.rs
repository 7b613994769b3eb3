use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use serde::Deserialize;
use thiserror::Error;

use escalator_common::types::{Instrument, Period};

/// Close prices per instrument, oldest first, gaps already removed.
pub type PriceSeries = BTreeMap<Instrument, Vec<f64>>;

/// Failures while retrieving market data.
#[derive(Debug, Error)]
pub enum MarketError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{symbol} returned HTTP {status}")]
    Status { symbol: String, status: u16 },

    #[error("chart error for {symbol}: {message}")]
    Chart { symbol: String, message: String },

    #[error("no instrument returned usable data")]
    NoData,
}

/// Anything that can produce close-price series for a lookback period.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Fetch close series for the base instruments over `period`.
    ///
    /// Instruments that fail individually may be missing from the result;
    /// an `Err` means nothing usable came back at all.
    async fn close_series(&self, period: Period) -> Result<PriceSeries, MarketError>;

    /// Human-readable name for logging (e.g. "yahoo-chart").
    fn name(&self) -> &'static str;
}

/// Yahoo Finance chart endpoint client.
pub struct YahooChartSource {
    client: reqwest::Client,
    base_url: String,
}

impl YahooChartSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, MarketError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("escalator/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn chart_url(&self, symbol: &str) -> String {
        // `^` is not allowed raw in a path segment
        format!(
            "{}/v8/finance/chart/{}",
            self.base_url,
            symbol.replace('^', "%5E")
        )
    }

    async fn fetch_symbol(&self, symbol: &str, period: Period) -> Result<Vec<f64>, MarketError> {
        let response = self
            .client
            .get(self.chart_url(symbol))
            .query(&[("range", period.code()), ("interval", "1d")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MarketError::Status {
                symbol: symbol.to_string(),
                status: status.as_u16(),
            });
        }

        let chart: ChartResponse = response.json().await?;
        closes_from_chart(symbol, chart)
    }
}

#[async_trait]
impl MarketDataSource for YahooChartSource {
    async fn close_series(&self, period: Period) -> Result<PriceSeries, MarketError> {
        let fetches = Instrument::BASE
            .into_iter()
            .filter_map(|instrument| instrument.symbol().map(|symbol| (instrument, symbol)))
            .map(|(instrument, symbol)| async move {
                (instrument, symbol, self.fetch_symbol(symbol, period).await)
            });

        let mut series = PriceSeries::new();
        for (instrument, symbol, result) in join_all(fetches).await {
            match result {
                Ok(closes) => {
                    tracing::debug!(
                        instrument = %instrument,
                        symbol,
                        points = closes.len(),
                        "Fetched close series"
                    );
                    series.insert(instrument, closes);
                }
                Err(e) => {
                    tracing::warn!(
                        instrument = %instrument,
                        symbol,
                        error = %e,
                        "Close series unavailable"
                    );
                }
            }
        }

        if series.values().all(|closes| closes.is_empty()) {
            return Err(MarketError::NoData);
        }
        Ok(series)
    }

    fn name(&self) -> &'static str {
        "yahoo-chart"
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChartResponse {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ChartErrorBody {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<Quote>,
}

#[derive(Debug, Deserialize)]
struct Quote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

/// Pull the close column out of a chart payload, dropping null and
/// non-finite observations.
pub(crate) fn closes_from_chart(symbol: &str, chart: ChartResponse) -> Result<Vec<f64>, MarketError> {
    if let Some(err) = chart.chart.error {
        return Err(MarketError::Chart {
            symbol: symbol.to_string(),
            message: format!("{}: {}", err.code, err.description),
        });
    }

    let closes = chart
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .and_then(|result| result.indicators.quote.into_iter().next())
        .map(|quote| quote.close)
        .unwrap_or_default();

    Ok(closes
        .into_iter()
        .flatten()
        .filter(|v| v.is_finite())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> ChartResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_closes_drop_nulls() {
        let chart = parse(
            r#"{"chart":{"result":[{"meta":{"symbol":"TRY=X"},"timestamp":[1,2,3,4],
            "indicators":{"quote":[{"close":[32.1,null,32.9,33.4]}]}}],"error":null}}"#,
        );
        let closes = closes_from_chart("TRY=X", chart).unwrap();
        assert_eq!(closes, vec![32.1, 32.9, 33.4]);
    }

    #[test]
    fn test_chart_error_is_reported() {
        let chart = parse(
            r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#,
        );
        let err = closes_from_chart("XXX", chart).unwrap_err();
        assert!(matches!(err, MarketError::Chart { ref symbol, .. } if symbol == "XXX"));
        assert!(err.to_string().contains("delisted"));
    }

    #[test]
    fn test_missing_quote_yields_empty_series() {
        let chart = parse(r#"{"chart":{"result":[{"indicators":{"quote":[]}}],"error":null}}"#);
        assert!(closes_from_chart("BZ=F", chart).unwrap().is_empty());
    }

    #[test]
    fn test_chart_url_escapes_caret() {
        let source = YahooChartSource::new("https://example.test/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            source.chart_url("^TNX"),
            "https://example.test/v8/finance/chart/%5ETNX"
        );
        assert_eq!(
            source.chart_url("EURTRY=X"),
            "https://example.test/v8/finance/chart/EURTRY=X"
        );
    }
}
