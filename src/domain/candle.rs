use chrono::NaiveDate;

/// One trading day of OHLC prices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candle {
    pub date: NaiveDate,

    pub open_price: f64,
    pub high_price: f64,
    pub low_price: f64,
    pub close_price: f64,
}

impl Candle {
    // A constructor for convenience
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64) -> Self {
        Candle {
            date,
            open_price: open,
            high_price: high,
            low_price: low,
            close_price: close,
        }
    }

    /// All four prices are finite numbers.
    pub fn is_finite(&self) -> bool {
        [self.open_price, self.high_price, self.low_price, self.close_price]
            .iter()
            .all(|p| p.is_finite())
    }
}
