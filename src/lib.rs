#![allow(clippy::const_is_empty)]
#![allow(clippy::collapsible_if)]
#![allow(clippy::collapsible_else_if)]

// Core modules
pub mod analysis;
pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod error;
pub mod models;
pub mod report;
pub mod utils;

// Re-export commonly used types outside of crate (for main.rs and integration tests)
pub use analysis::{LexiconScorer, SentimentReport, SentimentScorer, Verdict};
pub use config::{FORECAST, MARKET, RetrySettings};
pub use data::{MarketDataProvider, YahooProvider};
pub use domain::{Candle, Ticker};
pub use engine::{
    ErrorResponse, PredictRequest, PredictResponse, RiskEngine, RiskScoreRequest,
    RiskScoreResponse, SentimentRequest,
};
pub use error::{AnalysisError, AnalysisResult, Outcome};
pub use models::{LstmModel, ModelHandle, SequenceModel};

// CLI argument parsing
use {
    anyhow::{Context, Result},
    clap::{Parser, Subcommand},
    std::path::{Path, PathBuf},
};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Price forecasting and risk scoring", long_about = None)]
pub struct Cli {
    /// Download attempts before giving up
    #[arg(long, global = true, default_value_t = MARKET.client.retries)]
    pub retries: u32,

    /// Pause between download attempts (ms)
    #[arg(long, global = true, default_value_t = MARKET.client.backoff_ms)]
    pub backoff_ms: u64,

    /// Upper bound for a single download attempt (ms)
    #[arg(long, global = true, default_value_t = MARKET.client.timeout_ms)]
    pub timeout_ms: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Forecast the next N daily closes
    Predict {
        /// Ticker symbol or crypto name (e.g. AAPL, bitcoin)
        ticker: String,

        #[arg(long, default_value_t = FORECAST.default_horizon_days)]
        days: usize,

        /// Trained model weights (JSON)
        #[arg(long)]
        model: PathBuf,

        /// Render a table instead of JSON
        #[arg(long, default_value_t = false)]
        table: bool,
    },

    /// Score the sentiment of news articles
    Sentiment {
        /// Article texts
        texts: Vec<String>,

        /// File with one article per line
        #[arg(long)]
        file: Option<PathBuf>,

        #[arg(long, default_value_t = false)]
        table: bool,
    },

    /// Score the risk of holding a ticker over the forecast horizon
    Risk {
        ticker: String,

        #[arg(long)]
        model: PathBuf,

        #[arg(long, default_value_t = FORECAST.default_horizon_days)]
        days: usize,

        /// Average news sentiment in [-1, 1]
        #[arg(
            long,
            allow_negative_numbers = true,
            conflicts_with = "articles",
            required_unless_present = "articles"
        )]
        sentiment: Option<f64>,

        /// Score these articles (one per line) instead of passing --sentiment
        #[arg(long)]
        articles: Option<PathBuf>,

        #[arg(long, default_value_t = false)]
        table: bool,
    },
}

impl Cli {
    pub fn retry_settings(&self) -> RetrySettings {
        RetrySettings {
            timeout_ms: self.timeout_ms,
            retries: self.retries,
            backoff_ms: self.backoff_ms,
        }
    }
}

/// Reads one article per non-blank line.
pub fn read_articles(path: &Path) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read articles from {}", path.display()))?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
