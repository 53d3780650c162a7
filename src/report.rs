//! Terminal tables for CLI output.

use {
    crate::{
        analysis::SentimentReport,
        engine::{PredictResponse, RiskScoreResponse},
    },
    tabled::{Table, Tabled},
};

/// How many trailing history rows to show above the forecast.
const HISTORY_TAIL: usize = 5;

#[derive(Tabled)]
struct PriceRow {
    #[tabled(rename = "Day")]
    day: String,
    #[tabled(rename = "Close")]
    close: String,
    #[tabled(rename = "Kind")]
    kind: &'static str,
}

#[derive(Tabled)]
struct SentimentRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Score")]
    score: String,
}

#[derive(Tabled)]
struct RiskRow {
    #[tabled(rename = "Ticker")]
    ticker: String,
    #[tabled(rename = "Risk Score")]
    risk_score: String,
    #[tabled(rename = "Verdict")]
    verdict: String,
}

/// Last few real closes followed by the forecast, one row per day.
pub fn predictions_table(resp: &PredictResponse) -> String {
    let start = resp.ohlc.len().saturating_sub(HISTORY_TAIL);
    let history = resp.ohlc[start..].iter().map(|r| PriceRow {
        day: r.date.clone(),
        close: format!("{:.2}", r.close),
        kind: "actual",
    });
    let forecast = resp.predictions.iter().enumerate().map(|(i, p)| PriceRow {
        day: format!("+{}", i + 1),
        close: format!("{:.2}", p),
        kind: "forecast",
    });
    Table::new(history.chain(forecast)).to_string()
}

pub fn sentiment_table(report: &SentimentReport) -> String {
    let rows = report
        .individual_scores
        .iter()
        .enumerate()
        .map(|(i, s)| SentimentRow {
            index: i + 1,
            score: format!("{:+.4}", s),
        });
    format!(
        "{}\nAverage: {:+.4}",
        Table::new(rows),
        report.average_sentiment
    )
}

pub fn risk_table(resp: &RiskScoreResponse) -> String {
    Table::new([RiskRow {
        ticker: resp.ticker.clone(),
        risk_score: format!("{:.2}", resp.risk_score),
        verdict: resp.verdict.to_string(),
    }])
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{analysis::Verdict, models::OhlcRecord};

    #[test]
    fn prediction_rows_follow_history() {
        let ohlc = (1..=7)
            .map(|d| OhlcRecord {
                date: format!("2024-01-0{d}"),
                open: 1.0,
                high: 1.0,
                low: 1.0,
                close: 100.0 + d as f64,
            })
            .collect();
        let resp = PredictResponse {
            ticker: "AAPL".into(),
            predictions: vec![108.123, 109.5],
            ohlc,
        };
        let table = predictions_table(&resp);
        assert!(!table.contains("2024-01-02"));
        assert!(table.contains("2024-01-03"));
        assert!(table.contains("108.12"));
        assert!(table.contains("+2"));
    }

    #[test]
    fn risk_table_shows_verdict() {
        let table = risk_table(&RiskScoreResponse {
            ticker: "BTC-USD".into(),
            risk_score: 71.5,
            verdict: Verdict::High,
        });
        assert!(table.contains("High Risk"));
        assert!(table.contains("71.50"));
    }

    #[test]
    fn sentiment_table_has_average() {
        let table = sentiment_table(&SentimentReport {
            average_sentiment: -0.25,
            individual_scores: vec![0.5, -1.0],
        });
        assert!(table.contains("Average: -0.2500"));
        assert!(table.contains("+0.5000"));
    }
}
