use {
    crate::{domain::Candle, utils::TimeUtils},
    chrono::NaiveDate,
    serde::{Deserialize, Serialize},
};

/// One row of the `ohlc` array returned alongside predictions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OhlcRecord {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Open")]
    pub open: f64,
    #[serde(rename = "High")]
    pub high: f64,
    #[serde(rename = "Low")]
    pub low: f64,
    #[serde(rename = "Close")]
    pub close: f64,
}

/// Daily OHLC history for one ticker, strictly chronological with no duplicate dates.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    pub ticker: String,
    pub dates: Vec<NaiveDate>,
    pub open_prices: Vec<f64>,
    pub high_prices: Vec<f64>,
    pub low_prices: Vec<f64>,
    pub close_prices: Vec<f64>,
}

impl PriceSeries {
    /// Builds the series from raw provider candles.
    /// Candles are sorted by date; for a repeated date the last one supplied wins.
    pub fn from_candles(ticker: impl Into<String>, mut candles: Vec<Candle>) -> Self {
        // Stable sort keeps supply order within a date, so the last duplicate is the freshest.
        candles.sort_by_key(|c| c.date);
        let mut deduped: Vec<Candle> = Vec::with_capacity(candles.len());
        for candle in candles {
            match deduped.last_mut() {
                Some(last) if last.date == candle.date => *last = candle,
                _ => deduped.push(candle),
            }
        }

        let len = deduped.len();
        let mut series = Self {
            ticker: ticker.into(),
            dates: Vec::with_capacity(len),
            open_prices: Vec::with_capacity(len),
            high_prices: Vec::with_capacity(len),
            low_prices: Vec::with_capacity(len),
            close_prices: Vec::with_capacity(len),
        };
        for c in deduped {
            series.dates.push(c.date);
            series.open_prices.push(c.open_price);
            series.high_prices.push(c.high_price);
            series.low_prices.push(c.low_price);
            series.close_prices.push(c.close_price);
        }
        series
    }

    pub fn len(&self) -> usize {
        self.close_prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.close_prices.is_empty()
    }

    pub fn closes(&self) -> &[f64] {
        &self.close_prices
    }

    /// The most recent `n` closes (all of them if fewer exist).
    pub fn recent_closes(&self, n: usize) -> &[f64] {
        let start = self.close_prices.len().saturating_sub(n);
        &self.close_prices[start..]
    }

    pub fn ohlc_records(&self) -> Vec<OhlcRecord> {
        (0..self.len())
            .map(|i| OhlcRecord {
                date: TimeUtils::format_date(self.dates[i]),
                open: self.open_prices[i],
                high: self.high_prices[i],
                low: self.low_prices[i],
                close: self.close_prices[i],
            })
            .collect()
    }
}
