use std::time::Duration;

/// Crypto names accepted in place of a ticker, mapped to Yahoo Finance symbols.
pub const CRYPTO_MAPPING: &[(&str, &str)] = &[
    ("bitcoin", "BTC-USD"),
    ("ethereum", "ETH-USD"),
    ("ripple", "XRP-USD"),
    ("cardano", "ADA-USD"),
    ("dogecoin", "DOGE-USD"),
];

/// How a single history download is bounded and retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetrySettings {
    pub timeout_ms: u64,
    pub retries: u32,
    pub backoff_ms: u64,
}

impl RetrySettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }
}

impl Default for RetrySettings {
    fn default() -> Self {
        MARKET.client
    }
}

pub struct MarketApiConfig {
    pub chart_base_url: &'static str,
    pub user_agent: &'static str,
    /// Yahoo `range` parameter for the history window.
    pub history_period: &'static str,
    /// Yahoo `interval` parameter (daily candles).
    pub interval: &'static str,
    pub client: RetrySettings,
}

pub const MARKET: MarketApiConfig = MarketApiConfig {
    chart_base_url: "https://query1.finance.yahoo.com/v8/finance/chart",
    user_agent: "Mozilla/5.0",
    history_period: "3y",
    interval: "1d",
    client: RetrySettings {
        timeout_ms: 10_000,
        retries: 3,
        backoff_ms: 5_000,
    },
};
