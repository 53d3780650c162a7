//! Composite risk score.
//!
//! Three independent sub-risks, each in [0, 1], are combined as a noisy-OR: the
//! combined "no risk" probability is the product of each factor's complement.
//! All zero gives exactly 0; any single saturated factor gives exactly 1.

use {
    crate::{
        analysis::volatility::compute_volatility,
        config::{RISK, RiskConfig},
        error::AnalysisResult,
        utils::{get_min, round_to_places},
    },
    serde::{Deserialize, Serialize},
    strum_macros::{Display, EnumIter},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumIter)]
pub enum Verdict {
    #[strum(to_string = "Low Risk")]
    #[serde(rename = "Low Risk")]
    Low,
    #[strum(to_string = "Moderate Risk")]
    #[serde(rename = "Moderate Risk")]
    Moderate,
    #[strum(to_string = "High Risk")]
    #[serde(rename = "High Risk")]
    High,
}

impl Verdict {
    pub fn from_score(score: f64) -> Self {
        Self::from_score_with(score, &RISK)
    }

    fn from_score_with(score: f64, config: &RiskConfig) -> Self {
        if score < config.low_below {
            Self::Low
        } else if score < config.moderate_below {
            Self::Moderate
        } else {
            Self::High
        }
    }
}

/// Final score plus the factors that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskAssessment {
    /// 0..=100, two decimals.
    pub score: f64,
    pub verdict: Verdict,
    pub sentiment_risk: f64,
    pub trend_risk: f64,
    pub volatility_risk: f64,
}

/// Only negative sentiment carries risk.
pub fn compute_sentiment_risk(average_sentiment: f64) -> f64 {
    if average_sentiment >= 0.0 {
        0.0
    } else {
        (-average_sentiment).min(1.0)
    }
}

pub fn normalize_volatility(volatility: f64, v_max: f64) -> f64 {
    if v_max <= 0.0 {
        return 1.0;
    }
    (volatility / v_max).clamp(0.0, 1.0)
}

/// Size of the deepest forecast dip below the last real price, capped at 1.
pub fn compute_trend_risk(forecast: &[f64], last_real: f64) -> f64 {
    let Some(p_min) = get_min(forecast) else {
        return 0.0;
    };
    if last_real == 0.0 {
        return 0.0;
    }
    let drop = (p_min - last_real) / last_real;
    if drop < 0.0 { drop.abs().min(1.0) } else { 0.0 }
}

/// Noisy-OR of the three sub-risks, in [0, 1].
pub fn combine(sentiment_risk: f64, trend_risk: f64, volatility_risk: f64) -> f64 {
    1.0 - (1.0 - sentiment_risk) * (1.0 - trend_risk) * (1.0 - volatility_risk)
}

/// Scores risk from sentiment, the real-valued forecast and recent real closes.
///
/// The last element of `recent_real_prices` is the reference for the forecast dip.
pub fn risk_score(
    average_sentiment: f64,
    forecast: &[f64],
    recent_real_prices: &[f64],
) -> AnalysisResult<RiskAssessment> {
    let sentiment_risk = compute_sentiment_risk(average_sentiment);
    let trend_risk = recent_real_prices
        .last()
        .map_or(0.0, |&last| compute_trend_risk(forecast, last));
    let volatility = compute_volatility(recent_real_prices)?;
    let volatility_risk = normalize_volatility(volatility, RISK.volatility_max);

    let raw = combine(sentiment_risk, trend_risk, volatility_risk);
    let score = round_to_places((raw * 100.0).clamp(0.0, 100.0), 2);

    Ok(RiskAssessment {
        score,
        verdict: Verdict::from_score(score),
        sentiment_risk,
        trend_risk,
        volatility_risk,
    })
}
