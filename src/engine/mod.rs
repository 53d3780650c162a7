mod core;
mod messages;

pub use core::RiskEngine;

pub use messages::{
    ErrorResponse, PredictRequest, PredictResponse, RiskScoreRequest, RiskScoreResponse,
    SentimentRequest,
};
