// Forecasting and risk scoring
pub mod forecaster;
pub mod risk;
pub mod sentiment;
pub mod volatility;

pub use forecaster::{forecast, roll_forward};
pub use risk::{
    RiskAssessment, Verdict, combine, compute_sentiment_risk, compute_trend_risk,
    normalize_volatility, risk_score,
};
pub use sentiment::{LexiconScorer, SentimentReport, SentimentScorer, average_sentiment};
pub use volatility::compute_volatility;
