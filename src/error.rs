use thiserror::Error;

/// Transport-neutral classification of a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Outcome {
    #[strum(to_string = "not found")]
    NotFound,
    #[strum(to_string = "bad request")]
    BadRequest,
    #[strum(to_string = "internal error")]
    Internal,
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("No data found for {ticker}")]
    NoData { ticker: String },

    #[error("Insufficient data for prediction: need {required} observations, have {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Price window is constant at {value}; cannot scale")]
    DegenerateScale { value: f64 },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Computation failed: {0}")]
    Computation(String),

    #[error("Market data provider failed: {0:#}")]
    Provider(anyhow::Error),
}

impl AnalysisError {
    pub fn outcome(&self) -> Outcome {
        match self {
            Self::NoData { .. } => Outcome::NotFound,
            Self::InsufficientData { .. }
            | Self::DegenerateScale { .. }
            | Self::InvalidRequest(_) => Outcome::BadRequest,
            Self::Computation(_) | Self::Provider(_) => Outcome::Internal,
        }
    }

    /// Message safe to hand back to a caller. Internal failures stay generic.
    pub fn public_message(&self) -> String {
        match self.outcome() {
            Outcome::Internal => "Internal error while computing the result.".to_string(),
            _ => self.to_string(),
        }
    }

    pub(crate) fn computation(msg: impl Into<String>) -> Self {
        Self::Computation(msg.into())
    }
}

pub type AnalysisResult<T> = std::result::Result<T, AnalysisError>;
