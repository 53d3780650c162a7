//! News sentiment scoring.
//!
//! `LexiconScorer` is a rule-based polarity scorer in the VADER family: word
//! valences from a lexicon, shifted by nearby intensifiers and negators, summed and
//! squashed into a compound score in [-1, 1].

use {
    crate::{
        config::constants::sentiment::{
            BOOSTER_INCREMENT, LOOKBACK_TOKENS, NEGATION_SCALAR, NORMALIZATION_ALPHA,
        },
        utils::mean,
    },
    serde::{Deserialize, Serialize},
    std::collections::HashMap,
};

/// Maps a text to a compound polarity score in [-1, 1].
pub trait SentimentScorer: Send + Sync {
    fn score_text(&self, text: &str) -> f64;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentReport {
    pub average_sentiment: f64,
    pub individual_scores: Vec<f64>,
}

/// Scores every text and averages them. No texts means neutral (0.0), not an error.
pub fn average_sentiment<S: AsRef<str>>(
    scorer: &dyn SentimentScorer,
    texts: &[S],
) -> SentimentReport {
    let individual_scores: Vec<f64> = texts.iter().map(|t| scorer.score_text(t.as_ref())).collect();
    SentimentReport {
        average_sentiment: mean(&individual_scores),
        individual_scores,
    }
}

const LEXICON: &[(&str, f64)] = &[
    // general
    ("good", 1.9),
    ("great", 3.1),
    ("excellent", 2.7),
    ("positive", 2.6),
    ("strong", 2.3),
    ("best", 3.2),
    ("better", 1.9),
    ("love", 3.2),
    ("happy", 2.7),
    ("win", 2.8),
    ("success", 2.7),
    ("successful", 2.8),
    ("optimistic", 2.2),
    ("confident", 2.2),
    ("bad", -2.5),
    ("worse", -2.1),
    ("worst", -3.1),
    ("poor", -2.1),
    ("negative", -2.7),
    ("weak", -1.9),
    ("fail", -2.5),
    ("failure", -2.3),
    ("fear", -2.2),
    ("worried", -1.9),
    ("worry", -1.9),
    ("concern", -1.3),
    ("concerns", -1.3),
    ("uncertain", -1.2),
    ("uncertainty", -1.4),
    ("crisis", -3.1),
    ("panic", -2.3),
    ("disaster", -3.1),
    ("terrible", -2.5),
    ("problem", -1.7),
    ("risk", -1.1),
    ("risky", -1.4),
    ("threat", -2.4),
    ("warning", -1.4),
    ("scandal", -2.4),
    ("fraud", -2.8),
    ("lawsuit", -1.6),
    ("investigation", -1.1),
    // markets
    ("gain", 2.0),
    ("gains", 1.8),
    ("growth", 1.6),
    ("profit", 1.9),
    ("profits", 1.9),
    ("profitable", 1.9),
    ("rally", 1.8),
    ("rallies", 1.8),
    ("surge", 1.6),
    ("surges", 1.6),
    ("soar", 1.8),
    ("soars", 1.8),
    ("jump", 1.2),
    ("jumps", 1.2),
    ("rise", 1.0),
    ("rises", 1.0),
    ("record", 1.0),
    ("beat", 1.4),
    ("beats", 1.4),
    ("upgrade", 1.7),
    ("upgraded", 1.7),
    ("outperform", 1.9),
    ("bullish", 2.0),
    ("boom", 1.9),
    ("recovery", 1.6),
    ("rebound", 1.4),
    ("dividend", 0.8),
    ("breakthrough", 2.1),
    ("loss", -1.3),
    ("losses", -1.6),
    ("lose", -1.7),
    ("drop", -1.1),
    ("drops", -1.1),
    ("fall", -1.1),
    ("falls", -1.1),
    ("decline", -1.5),
    ("declines", -1.5),
    ("plunge", -2.1),
    ("plunges", -2.1),
    ("crash", -2.7),
    ("crashes", -2.7),
    ("slump", -1.9),
    ("tumble", -1.7),
    ("tumbles", -1.7),
    ("miss", -1.3),
    ("misses", -1.3),
    ("downgrade", -1.8),
    ("downgraded", -1.8),
    ("underperform", -1.8),
    ("bearish", -2.0),
    ("recession", -2.5),
    ("bankruptcy", -3.0),
    ("default", -1.9),
    ("layoffs", -2.1),
    ("volatile", -1.2),
    ("volatility", -0.9),
    ("selloff", -2.0),
    ("inflation", -0.9),
    ("debt", -1.1),
];

const NEGATORS: &[&str] = &[
    "not", "no", "never", "none", "nobody", "nothing", "neither", "nor", "cannot", "without",
    "hardly",
];

const BOOSTERS: &[(&str, f64)] = &[
    ("very", BOOSTER_INCREMENT),
    ("extremely", BOOSTER_INCREMENT),
    ("highly", BOOSTER_INCREMENT),
    ("really", BOOSTER_INCREMENT),
    ("significantly", BOOSTER_INCREMENT),
    ("sharply", BOOSTER_INCREMENT),
    ("strongly", BOOSTER_INCREMENT),
    ("hugely", BOOSTER_INCREMENT),
    ("deeply", BOOSTER_INCREMENT),
    ("slightly", -BOOSTER_INCREMENT),
    ("somewhat", -BOOSTER_INCREMENT),
    ("marginally", -BOOSTER_INCREMENT),
    ("barely", -BOOSTER_INCREMENT),
];

/// Each `!` pushes the sum further in its direction, up to this many.
const MAX_EXCLAMATIONS: usize = 4;
const EXCLAMATION_INCREMENT: f64 = 0.292;

pub struct LexiconScorer {
    valences: HashMap<&'static str, f64>,
    boosters: HashMap<&'static str, f64>,
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconScorer {
    pub fn new() -> Self {
        Self {
            valences: LEXICON.iter().copied().collect(),
            boosters: BOOSTERS.iter().copied().collect(),
        }
    }

    fn tokenize(text: &str) -> Vec<String> {
        text.split_whitespace()
            .map(|w| {
                w.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
                    .to_lowercase()
            })
            .filter(|w| !w.is_empty())
            .collect()
    }

    fn is_negator(token: &str) -> bool {
        NEGATORS.contains(&token) || token.ends_with("n't")
    }

    /// Valence of the token at `idx` after booster and negation rules.
    fn token_valence(&self, tokens: &[String], idx: usize) -> Option<f64> {
        let mut valence = *self.valences.get(tokens[idx].as_str())?;

        let start = idx.saturating_sub(LOOKBACK_TOKENS);
        for (distance, prev) in tokens[start..idx].iter().rev().enumerate() {
            if let Some(&boost) = self.boosters.get(prev.as_str()) {
                // Farther intensifiers count for less.
                let damp = 1.0 - 0.05 * distance as f64;
                let signed = if valence > 0.0 { boost } else { -boost };
                valence += signed * damp;
            }
        }
        if tokens[start..idx].iter().any(|t| Self::is_negator(t)) {
            valence *= NEGATION_SCALAR;
        }
        Some(valence)
    }
}

impl SentimentScorer for LexiconScorer {
    fn score_text(&self, text: &str) -> f64 {
        let tokens = Self::tokenize(text);
        if tokens.is_empty() {
            return 0.0;
        }

        // Contrast: what follows "but" outweighs what precedes it.
        let but_idx = tokens.iter().position(|t| t == "but");
        let mut sum = 0.0;
        for idx in 0..tokens.len() {
            if let Some(mut v) = self.token_valence(&tokens, idx) {
                match but_idx {
                    Some(b) if idx < b => v *= 0.5,
                    Some(b) if idx > b => v *= 1.5,
                    _ => {}
                }
                sum += v;
            }
        }
        if sum == 0.0 {
            return 0.0;
        }

        let exclamations = text.matches('!').count().min(MAX_EXCLAMATIONS) as f64;
        sum += sum.signum() * exclamations * EXCLAMATION_INCREMENT;

        (sum / (sum * sum + NORMALIZATION_ALPHA).sqrt()).clamp(-1.0, 1.0)
    }
}
