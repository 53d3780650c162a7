use std::sync::Arc;

use anyhow::bail;

use crate::analysis::{self, SentimentReport, SentimentScorer};
use crate::config::{DF, FORECAST, RetrySettings};
use crate::data::{MarketDataProvider, fetch_with_retry};
use crate::domain::Ticker;
use crate::error::{AnalysisError, AnalysisResult, Outcome};
use crate::models::{ModelHandle, PriceSeries};

use super::messages::{
    PredictRequest, PredictResponse, RiskScoreRequest, RiskScoreResponse, SentimentRequest,
};

/// Ties the market data provider, the forecasting model and the sentiment scorer
/// together behind the three request types.
///
/// All collaborators are shared read-only, so one engine can serve concurrent requests.
pub struct RiskEngine {
    provider: Arc<dyn MarketDataProvider>,
    model: ModelHandle,
    scorer: Arc<dyn SentimentScorer>,
    settings: RetrySettings,
    window_len: usize,
}

impl RiskEngine {
    /// Fails if the model was trained on a different window length.
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        model: ModelHandle,
        scorer: Arc<dyn SentimentScorer>,
    ) -> anyhow::Result<Self> {
        let window_len = FORECAST.window_len;
        if model.window_len() != window_len {
            bail!(
                "model expects a {}-day window but the service seeds {} days",
                model.window_len(),
                window_len
            );
        }
        Ok(Self {
            provider,
            model,
            scorer,
            settings: RetrySettings::default(),
            window_len,
        })
    }

    pub fn with_retry_settings(mut self, settings: RetrySettings) -> Self {
        self.settings = settings;
        self
    }

    /// Forecasts `days` closing prices and returns them with the full daily history.
    pub async fn predict(&self, req: PredictRequest) -> AnalysisResult<PredictResponse> {
        let ticker = Self::parse_ticker(&req.ticker)?;
        let result = self.run_predict(&ticker, req.days).await;
        self.report_failure("predict", &ticker, req.days, result)
    }

    pub fn analyze_sentiment(&self, req: SentimentRequest) -> SentimentReport {
        analysis::average_sentiment(self.scorer.as_ref(), &req.articles)
    }

    /// Forecasts `days` ahead and scores the risk of holding `ticker` over that horizon.
    pub async fn risk_score(&self, req: RiskScoreRequest) -> AnalysisResult<RiskScoreResponse> {
        let ticker = Self::parse_ticker(&req.ticker)?;
        let result = self.run_risk_score(&ticker, req.average_sentiment, req.days).await;
        self.report_failure("risk_score", &ticker, req.days, result)
    }

    async fn run_predict(&self, ticker: &Ticker, days: usize) -> AnalysisResult<PredictResponse> {
        Self::validate_days(days)?;
        let series = self.load_series(ticker).await?;
        let predictions = analysis::forecast(
            self.model.as_ref(),
            series.closes(),
            self.window_len,
            days,
        )?;

        Ok(PredictResponse {
            ticker: ticker.symbol().to_string(),
            predictions,
            ohlc: series.ohlc_records(),
        })
    }

    async fn run_risk_score(
        &self,
        ticker: &Ticker,
        average_sentiment: f64,
        days: usize,
    ) -> AnalysisResult<RiskScoreResponse> {
        Self::validate_days(days)?;
        if !average_sentiment.is_finite() || !(-1.0..=1.0).contains(&average_sentiment) {
            return Err(AnalysisError::InvalidRequest(format!(
                "average_sentiment must be within [-1, 1], got {average_sentiment}"
            )));
        }

        let series = self.load_series(ticker).await?;
        let forecast = analysis::forecast(
            self.model.as_ref(),
            series.closes(),
            self.window_len,
            days,
        )?;
        let recent = series.recent_closes(self.window_len);
        let assessment = analysis::risk_score(average_sentiment, &forecast, recent)?;

        if DF.log_risk_breakdown {
            log::info!(
                "Risk [{}] {:.2} ({}): sentiment {:.3}, trend {:.3}, volatility {:.3}",
                ticker,
                assessment.score,
                assessment.verdict,
                assessment.sentiment_risk,
                assessment.trend_risk,
                assessment.volatility_risk
            );
        }

        Ok(RiskScoreResponse {
            ticker: ticker.symbol().to_string(),
            risk_score: assessment.score,
            verdict: assessment.verdict,
        })
    }

    async fn load_series(&self, ticker: &Ticker) -> AnalysisResult<PriceSeries> {
        let candles = fetch_with_retry(self.provider.as_ref(), ticker.symbol(), self.settings)
            .await
            .map_err(AnalysisError::Provider)?;
        if candles.is_empty() {
            return Err(AnalysisError::NoData {
                ticker: ticker.symbol().to_string(),
            });
        }
        Ok(PriceSeries::from_candles(ticker.symbol(), candles))
    }

    fn parse_ticker(raw: &str) -> AnalysisResult<Ticker> {
        if raw.trim().is_empty() {
            return Err(AnalysisError::InvalidRequest("ticker must not be empty".into()));
        }
        Ok(Ticker::resolve(raw))
    }

    fn validate_days(days: usize) -> AnalysisResult<()> {
        if days > FORECAST.max_horizon_days {
            return Err(AnalysisError::InvalidRequest(format!(
                "days must be at most {}, got {}",
                FORECAST.max_horizon_days, days
            )));
        }
        Ok(())
    }

    /// Internal failures are logged with full context here; callers only see the
    /// public message.
    fn report_failure<T>(
        &self,
        op: &str,
        ticker: &Ticker,
        days: usize,
        result: AnalysisResult<T>,
    ) -> AnalysisResult<T> {
        if let Err(err) = &result
            && err.outcome() == Outcome::Internal
        {
            log::error!(
                "{} failed for [{}] (horizon {}, window {}): {}",
                op,
                ticker,
                days,
                self.window_len,
                err
            );
        }
        result
    }
}
