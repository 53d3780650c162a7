//! Risk composition calibration

use crate::config::constants::{LOW_RISK_BELOW, MODERATE_RISK_BELOW, VOLATILITY_MAX};

#[derive(Debug, Clone, Copy)]
pub struct RiskConfig {
    /// Daily-return stdev that saturates volatility risk to 1.
    pub volatility_max: f64,
    pub low_below: f64,
    pub moderate_below: f64,
}

pub const RISK: RiskConfig = RiskConfig {
    volatility_max: VOLATILITY_MAX,
    low_below: LOW_RISK_BELOW,
    moderate_below: MODERATE_RISK_BELOW,
};
