//! Debugging feature flags.

pub struct LogFlags {
    /// Log every prediction of the autoregressive loop.
    pub log_forecast_steps: bool,

    /// Log each failed download attempt before backing off.
    pub log_provider_retries: bool,

    /// Log sub-risk breakdown for every risk score request.
    pub log_risk_breakdown: bool,

    /// Activate trace_time macro (for cool scope-level timing)
    pub log_performance: bool,
}

pub const DF: LogFlags = LogFlags {
    log_forecast_steps: false,
    log_provider_retries: true,
    log_risk_breakdown: true,
    log_performance: false,
};
