use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use anyhow::Result;
use approx::assert_abs_diff_eq;
use async_trait::async_trait;
use chrono::{Days, NaiveDate};

use invest_ai::{
    AnalysisError, AnalysisResult, Candle, LexiconScorer, LstmModel, MarketDataProvider,
    ModelHandle, Outcome, PredictRequest, RetrySettings, RiskEngine, RiskScoreRequest,
    SentimentRequest, SequenceModel, Verdict,
};

/// Serves `days` of steadily rising candles for any ticker except "NODATA".
struct FakeProvider {
    days: usize,
    calls: AtomicU32,
}

impl FakeProvider {
    fn new(days: usize) -> Self {
        Self {
            days,
            calls: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl MarketDataProvider for FakeProvider {
    async fn fetch_history(
        &self,
        ticker: &str,
        _period: &str,
        _interval: &str,
    ) -> Result<Vec<Candle>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if ticker == "NODATA" {
            return Ok(Vec::new());
        }
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        Ok((0..self.days)
            .map(|i| {
                let close = 100.0 + i as f64;
                Candle::new(
                    start + Days::new(i as u64),
                    close - 0.5,
                    close + 1.0,
                    close - 1.0,
                    close,
                )
            })
            .collect())
    }
}

/// Serves `days` candles that all close at the same price.
struct FlatProvider {
    days: usize,
    close: f64,
}

#[async_trait]
impl MarketDataProvider for FlatProvider {
    async fn fetch_history(&self, _t: &str, _p: &str, _i: &str) -> Result<Vec<Candle>> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        Ok((0..self.days)
            .map(|i| {
                let c = self.close;
                Candle::new(start + Days::new(i as u64), c, c, c, c)
            })
            .collect())
    }
}

struct BrokenProvider;

#[async_trait]
impl MarketDataProvider for BrokenProvider {
    async fn fetch_history(&self, _t: &str, _p: &str, _i: &str) -> Result<Vec<Candle>> {
        anyhow::bail!("upstream 503 from 192.0.2.7")
    }
}

/// Always predicts the middle of the normalized range.
struct DummyModel;

impl SequenceModel for DummyModel {
    fn window_len(&self) -> usize {
        60
    }

    fn predict(&self, _window: &[f64]) -> AnalysisResult<f64> {
        Ok(0.5)
    }
}

fn fast_settings() -> RetrySettings {
    RetrySettings {
        timeout_ms: 1_000,
        retries: 2,
        backoff_ms: 1,
    }
}

fn engine_with(provider: Arc<dyn MarketDataProvider>, model: ModelHandle) -> RiskEngine {
    RiskEngine::new(provider, model, Arc::new(LexiconScorer::new()))
        .unwrap()
        .with_retry_settings(fast_settings())
}

fn engine(days: usize) -> RiskEngine {
    engine_with(Arc::new(FakeProvider::new(days)), Arc::new(DummyModel))
}

#[tokio::test]
async fn predict_returns_forecast_and_history() {
    let resp = engine(61)
        .predict(PredictRequest {
            ticker: "AAPL".into(),
            days: 5,
        })
        .await
        .unwrap();

    assert_eq!(resp.ticker, "AAPL");
    assert_eq!(resp.predictions.len(), 5);
    assert_eq!(resp.ohlc.len(), 61);
    // Scale spans closes 100..=160, midpoint 130.
    for p in &resp.predictions {
        assert_abs_diff_eq!(*p, 130.0, epsilon = 1e-9);
    }

    let json = serde_json::to_value(&resp).unwrap();
    assert_eq!(json["ohlc"][0]["Date"], "2024-01-01");
    assert_eq!(json["ohlc"][60]["Close"], 160.0);
}

#[tokio::test]
async fn crypto_names_are_resolved() {
    let resp = engine(70)
        .predict(PredictRequest {
            ticker: "Bitcoin".into(),
            days: 1,
        })
        .await
        .unwrap();
    assert_eq!(resp.ticker, "BTC-USD");
}

#[tokio::test]
async fn zero_day_horizon_returns_only_history() {
    let resp = engine(61)
        .predict(PredictRequest {
            ticker: "AAPL".into(),
            days: 0,
        })
        .await
        .unwrap();
    assert!(resp.predictions.is_empty());
    assert_eq!(resp.ohlc.len(), 61);
}

#[tokio::test]
async fn unknown_ticker_is_not_found() {
    let provider = Arc::new(FakeProvider::new(61));
    let engine = engine_with(provider.clone(), Arc::new(DummyModel));
    let err = engine
        .predict(PredictRequest {
            ticker: "NODATA".into(),
            days: 5,
        })
        .await
        .unwrap_err();

    assert_eq!(err.outcome(), Outcome::NotFound);
    assert_eq!(err.public_message(), "No data found for NODATA");
    // Empty history is final, not retried.
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn short_history_is_bad_request() {
    let err = engine(10)
        .predict(PredictRequest {
            ticker: "AAPL".into(),
            days: 5,
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AnalysisError::InsufficientData { required: 60, available: 10 }
    ));
    assert_eq!(err.outcome(), Outcome::BadRequest);
}

#[tokio::test]
async fn request_validation() {
    let engine = engine(61);

    let err = engine
        .predict(PredictRequest {
            ticker: "AAPL".into(),
            days: 366,
        })
        .await
        .unwrap_err();
    assert_eq!(err.outcome(), Outcome::BadRequest);

    let err = engine
        .predict(PredictRequest {
            ticker: "  ".into(),
            days: 5,
        })
        .await
        .unwrap_err();
    assert_eq!(err.outcome(), Outcome::BadRequest);

    for bad in [1.5, -2.0, f64::NAN] {
        let err = engine
            .risk_score(RiskScoreRequest {
                ticker: "AAPL".into(),
                average_sentiment: bad,
                days: 5,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidRequest(_)));
    }
}

#[tokio::test]
async fn provider_failure_is_internal_and_opaque() {
    let err = engine_with(Arc::new(BrokenProvider), Arc::new(DummyModel))
        .predict(PredictRequest {
            ticker: "AAPL".into(),
            days: 5,
        })
        .await
        .unwrap_err();

    assert_eq!(err.outcome(), Outcome::Internal);
    assert!(!err.public_message().contains("192.0.2.7"));
}

#[tokio::test]
async fn flat_history_is_scored_not_rejected() {
    let flat = |days| {
        engine_with(
            Arc::new(FlatProvider { days, close: 104.0 }),
            Arc::new(DummyModel),
        )
    };

    let resp = flat(61)
        .predict(PredictRequest {
            ticker: "AAPL".into(),
            days: 5,
        })
        .await
        .unwrap();
    assert_eq!(resp.ohlc.len(), 61);
    // Zero range is treated as one: 0.5 maps back to 104.5.
    assert_eq!(resp.predictions, vec![104.5; 5]);

    let resp = flat(65)
        .risk_score(RiskScoreRequest {
            ticker: "AAPL".into(),
            average_sentiment: 0.1,
            days: 3,
        })
        .await
        .unwrap();
    assert_eq!(resp.risk_score, 0.0);
    assert_eq!(resp.verdict, Verdict::Low);
}

#[tokio::test]
async fn risk_score_response() {
    let resp = engine(61)
        .risk_score(RiskScoreRequest {
            ticker: "AAPL".into(),
            average_sentiment: -0.5,
            days: 5,
        })
        .await
        .unwrap();

    assert_eq!(resp.ticker, "AAPL");
    assert!((0.0..=100.0).contains(&resp.risk_score));
    assert_eq!(resp.verdict, Verdict::from_score(resp.risk_score));
    // Sentiment alone contributes 50 points; the forecast dips below the last close.
    assert!(resp.risk_score >= 50.0);

    let json = serde_json::to_value(&resp).unwrap();
    let obj = json.as_object().unwrap();
    assert_eq!(obj.len(), 3);
    assert!(obj["verdict"].as_str().unwrap().ends_with("Risk"));
}

#[tokio::test]
async fn sentiment_endpoint_averages_articles() {
    let report = engine(61).analyze_sentiment(SentimentRequest {
        articles: vec![
            "Shares surge after record profit".into(),
            "Company faces fraud investigation".into(),
        ],
    });
    assert_eq!(report.individual_scores.len(), 2);
    assert!(report.individual_scores[0] > 0.0);
    assert!(report.individual_scores[1] < 0.0);

    let empty = engine(61).analyze_sentiment(SentimentRequest::default());
    assert_eq!(empty.average_sentiment, 0.0);
}

/// Zero-weight single-unit LSTM followed by a dense layer whose bias is 0.5.
fn constant_model_json(window_len: usize) -> String {
    serde_json::json!({
        "window_len": window_len,
        "lstm_layers": [{
            "forward": {
                "kernel": [[0.0, 0.0, 0.0, 0.0]],
                "recurrent_kernel": [[0.0, 0.0, 0.0, 0.0]],
                "bias": [0.0, 0.0, 0.0, 0.0]
            }
        }],
        "dense_layers": [{"kernel": [[0.0]], "bias": [0.5]}]
    })
    .to_string()
}

#[tokio::test]
async fn model_file_drives_the_engine() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(constant_model_json(60).as_bytes()).unwrap();

    let model: ModelHandle = Arc::new(LstmModel::load(file.path()).unwrap());
    let resp = engine_with(Arc::new(FakeProvider::new(80)), model)
        .predict(PredictRequest {
            ticker: "MSFT".into(),
            days: 3,
        })
        .await
        .unwrap();

    // Closes 100..=179, midpoint 139.5.
    assert_eq!(resp.predictions.len(), 3);
    for p in &resp.predictions {
        assert_abs_diff_eq!(*p, 139.5, epsilon = 1e-9);
    }
}

#[test]
fn model_window_must_match_service_window() {
    let model: ModelHandle = Arc::new(LstmModel::from_json_str(&constant_model_json(30)).unwrap());
    let result = RiskEngine::new(
        Arc::new(FakeProvider::new(61)),
        model,
        Arc::new(LexiconScorer::new()),
    );
    assert!(result.is_err());
}
