use {
    crate::{
        config::{DF, MARKET, RetrySettings},
        data::MarketDataProvider,
        domain::Candle,
        utils::format_duration,
    },
    anyhow::{Result, anyhow},
};

/// Downloads the full daily history for `ticker`, bounding each attempt by
/// `settings.timeout()` and sleeping `settings.backoff()` between attempts.
///
/// `settings.retries` is the total number of attempts (at least one is made).
/// An empty result is a valid answer (unknown symbol) and is returned at once.
pub async fn fetch_with_retry(
    provider: &dyn MarketDataProvider,
    ticker: &str,
    settings: RetrySettings,
) -> Result<Vec<Candle>> {
    let attempts = settings.retries.max(1);
    let mut last_error = anyhow!("no attempt made for {ticker}");

    for attempt in 1..=attempts {
        let fetch = provider.fetch_history(ticker, MARKET.history_period, MARKET.interval);
        match tokio::time::timeout(settings.timeout(), fetch).await {
            Ok(Ok(candles)) => return Ok(candles),
            Ok(Err(e)) => last_error = e,
            Err(_) => {
                last_error = anyhow!(
                    "fetching {} timed out after {}ms",
                    ticker,
                    settings.timeout_ms
                )
            }
        }

        if attempt < attempts {
            if DF.log_provider_retries {
                log::warn!(
                    "⚠️ Fetch {}/{} for [{}] failed: {:#}. Retrying in {}...",
                    attempt,
                    attempts,
                    ticker,
                    last_error,
                    format_duration(settings.backoff_ms as i64)
                );
            }
            tokio::time::sleep(settings.backoff()).await;
        }
    }

    Err(last_error.context(format!("giving up on {ticker} after {attempts} attempts")))
}
