use {
    crate::{config::MARKET, domain::Candle, utils::epoch_sec_to_date},
    anyhow::{Context, Result, bail},
    async_trait::async_trait,
    reqwest::Client,
    serde::Deserialize,
};

/// Abstract interface for fetching market data.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Daily candles for `ticker` over `period` (e.g. "3y") at `interval` (e.g. "1d").
    ///
    /// An unknown symbol is an empty result, not an error.
    async fn fetch_history(&self, ticker: &str, period: &str, interval: &str)
    -> Result<Vec<Candle>>;
}

pub struct YahooProvider {
    client: Client,
    base_url: String,
}

impl YahooProvider {
    pub fn new() -> Result<Self> {
        Self::with_base_url(MARKET.chart_base_url)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(MARKET.user_agent)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl MarketDataProvider for YahooProvider {
    async fn fetch_history(
        &self,
        ticker: &str,
        period: &str,
        interval: &str,
    ) -> Result<Vec<Candle>> {
        let url = format!("{}/{}", self.base_url, ticker);

        let response = self
            .client
            .get(&url)
            .query(&[("range", period), ("interval", interval)])
            .send()
            .await
            .with_context(|| format!("Request to {url} failed"))?;

        // Unknown symbols come back as 404 with a chart error body.
        let status = response.status();
        let body: ChartResponse = response
            .json()
            .await
            .with_context(|| format!("Unreadable chart response for {ticker} ({status})"))?;

        candles_from_chart(body)
    }
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<Quote>,
}

#[derive(Debug, Default, Deserialize)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

fn candles_from_chart(body: ChartResponse) -> Result<Vec<Candle>> {
    if let Some(error) = body.chart.error {
        if error.code.eq_ignore_ascii_case("Not Found") {
            return Ok(Vec::new());
        }
        bail!("Yahoo Finance error: {} - {}", error.code, error.description);
    }

    let Some(data) = body.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(Vec::new());
    };
    let timestamps = data.timestamp.unwrap_or_default();
    let quote = data.indicators.quote.into_iter().next().unwrap_or_default();

    // Rows with any missing field (holidays, halted sessions) are dropped.
    let candles = timestamps
        .iter()
        .enumerate()
        .filter_map(|(i, &ts)| {
            let date = epoch_sec_to_date(ts)?;
            let open = quote.open.get(i).copied().flatten()?;
            let high = quote.high.get(i).copied().flatten()?;
            let low = quote.low.get(i).copied().flatten()?;
            let close = quote.close.get(i).copied().flatten()?;
            Some(Candle::new(date, open, high, low, close))
        })
        .filter(Candle::is_finite)
        .collect();

    Ok(candles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::TimeUtils;

    fn parse(json: &str) -> Result<Vec<Candle>> {
        candles_from_chart(serde_json::from_str(json)?)
    }

    #[test]
    fn parses_chart_rows_and_skips_gaps() {
        let json = r#"{"chart":{"result":[{
            "meta":{"symbol":"AAPL"},
            "timestamp":[1672756200,1672842600,1672929000],
            "indicators":{"quote":[{
                "open":[130.28,null,127.13],
                "high":[130.9,128.66,127.77],
                "low":[124.17,125.08,124.76],
                "close":[125.07,126.36,125.02],
                "volume":[112117500,89113600,80962700]
            }],"adjclose":[{"adjclose":[124.2,125.5,124.1]}]}
        }],"error":null}}"#;

        let candles = parse(json).unwrap();
        assert_eq!(candles.len(), 2);
        assert_eq!(TimeUtils::format_date(candles[0].date), "2023-01-03");
        assert_eq!(candles[0].close_price, 125.07);
        assert_eq!(TimeUtils::format_date(candles[1].date), "2023-01-05");
    }

    #[test]
    fn unknown_symbol_is_empty() {
        let json = r#"{"chart":{"result":null,"error":{
            "code":"Not Found","description":"No data found, symbol may be delisted"
        }}}"#;
        assert!(parse(json).unwrap().is_empty());
    }

    #[test]
    fn other_chart_errors_fail() {
        let json = r#"{"chart":{"result":null,"error":{
            "code":"Bad Request","description":"Invalid input - interval=7d is not supported"
        }}}"#;
        let err = parse(json).unwrap_err();
        assert!(err.to_string().contains("Bad Request"));
    }

    #[test]
    fn missing_timestamps_are_empty() {
        let json = r#"{"chart":{"result":[{"indicators":{"quote":[{}]}}],"error":null}}"#;
        assert!(parse(json).unwrap().is_empty());
    }
}
