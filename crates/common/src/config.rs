use serde::Deserialize;

/// Global application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Socket address the dashboard API binds to
    pub bind_addr: String,

    /// Base URL of the market-data chart service
    pub market_data_url: String,

    /// How long a successful market snapshot stays fresh (default: 600 = 10 min)
    pub market_cache_ttl_secs: u64,

    /// Per-request timeout for market-data calls
    pub market_request_timeout_secs: u64,

    /// Currency label appended to monetary figures (e.g. "TL")
    pub currency_label: String,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            market_data_url: std::env::var("MARKET_DATA_URL")
                .unwrap_or_else(|_| "https://query1.finance.yahoo.com".to_string()),
            market_cache_ttl_secs: std::env::var("MARKET_CACHE_TTL_SECS")
                .unwrap_or_else(|_| "600".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("MARKET_CACHE_TTL_SECS must be a valid u64"))?,
            market_request_timeout_secs: std::env::var("MARKET_REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("MARKET_REQUEST_TIMEOUT_SECS must be a valid u64"))?,
            currency_label: std::env::var("CURRENCY_LABEL").unwrap_or_else(|_| "TL".to_string()),
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            market_data_url: "https://query1.finance.yahoo.com".to_string(),
            market_cache_ttl_secs: 600,
            market_request_timeout_secs: 10,
            currency_label: "TL".to_string(),
        }
    }
}
