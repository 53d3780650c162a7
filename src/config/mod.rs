//! Configuration module for the forecasting and risk service.

// Can all be private now because we have a public re-export.
mod debug;
mod forecast;
mod market;
mod risk;

// Public
pub mod constants;

// Re-export commonly used items
pub use debug::{DF, LogFlags};
pub use forecast::{FORECAST, ForecastConfig};
pub use market::{CRYPTO_MAPPING, MARKET, MarketApiConfig, RetrySettings};
pub use risk::{RISK, RiskConfig};
