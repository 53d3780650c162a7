//! Forecast horizon and window configuration

use crate::config::constants::{DEFAULT_HORIZON_DAYS, MAX_HORIZON_DAYS, WINDOW_LEN};

#[derive(Debug, Clone, Copy)]
pub struct ForecastConfig {
    /// Seed window length (W). The loaded model must agree with it.
    pub window_len: usize,
    /// Horizon used when a request does not say otherwise.
    pub default_horizon_days: usize,
    /// Requests asking for more days than this are rejected.
    pub max_horizon_days: usize,
}

pub const FORECAST: ForecastConfig = ForecastConfig {
    window_len: WINDOW_LEN,
    default_horizon_days: DEFAULT_HORIZON_DAYS,
    max_horizon_days: MAX_HORIZON_DAYS,
};
