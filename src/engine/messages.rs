use {
    crate::{
        analysis::Verdict, config::FORECAST, error::AnalysisError, models::OhlcRecord,
    },
    serde::{Deserialize, Serialize},
};

fn default_days() -> usize {
    FORECAST.default_horizon_days
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictRequest {
    pub ticker: String,
    #[serde(default = "default_days")]
    pub days: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub ticker: String,
    pub predictions: Vec<f64>,
    pub ohlc: Vec<OhlcRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentRequest {
    #[serde(default)]
    pub articles: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskScoreRequest {
    pub ticker: String,
    pub average_sentiment: f64,
    #[serde(default = "default_days")]
    pub days: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskScoreResponse {
    pub ticker: String,
    pub risk_score: f64,
    pub verdict: Verdict,
}

/// Body returned for any failed request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<&AnalysisError> for ErrorResponse {
    fn from(err: &AnalysisError) -> Self {
        Self {
            error: err.public_message(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn days_default_when_omitted() {
        let req: PredictRequest = serde_json::from_str(r#"{"ticker":"AAPL"}"#).unwrap();
        assert_eq!(req.days, 30);

        let req: RiskScoreRequest =
            serde_json::from_str(r#"{"ticker":"bitcoin","average_sentiment":-0.2,"days":7}"#)
                .unwrap();
        assert_eq!(req.days, 7);
    }

    #[test]
    fn risk_response_shape() {
        let resp = RiskScoreResponse {
            ticker: "AAPL".into(),
            risk_score: 60.06,
            verdict: Verdict::Moderate,
        };
        assert_eq!(
            serde_json::to_value(&resp).unwrap(),
            serde_json::json!({"ticker": "AAPL", "risk_score": 60.06, "verdict": "Moderate Risk"})
        );
    }

    #[test]
    fn error_body_uses_public_message() {
        let err = AnalysisError::computation("division by zero in layer 2");
        let body = ErrorResponse::from(&err);
        assert_eq!(body.error, "Internal error while computing the result.");
    }
}
