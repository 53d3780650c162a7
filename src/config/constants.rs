// Top Level Constants

/// Number of most recent daily closes fed to the model per step.
pub const WINDOW_LEN: usize = 60;

/// A 5% daily-return standard deviation counts as maximal volatility risk.
pub const VOLATILITY_MAX: f64 = 0.05;

/// Scores strictly below this are "Low Risk".
pub const LOW_RISK_BELOW: f64 = 33.0;
/// Scores strictly below this (and not Low) are "Moderate Risk".
pub const MODERATE_RISK_BELOW: f64 = 66.0;

pub const DEFAULT_HORIZON_DAYS: usize = 30;
pub const MAX_HORIZON_DAYS: usize = 365;

pub mod sentiment {
    /// VADER's compound normalisation constant: s / sqrt(s^2 + ALPHA).
    pub const NORMALIZATION_ALPHA: f64 = 15.0;
    /// Valence multiplier applied when a negator precedes a word.
    pub const NEGATION_SCALAR: f64 = -0.74;
    /// How many preceding tokens are searched for negators and boosters.
    pub const LOOKBACK_TOKENS: usize = 3;
    pub const BOOSTER_INCREMENT: f64 = 0.293;
}
