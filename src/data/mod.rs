mod provider;
mod retry;

pub use {
    provider::{MarketDataProvider, YahooProvider},
    retry::fetch_with_retry,
};
