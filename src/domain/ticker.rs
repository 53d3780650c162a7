use {
    crate::config::CRYPTO_MAPPING,
    serde::{Deserialize, Serialize},
};

/// A user-supplied symbol resolved to the symbol the market data provider understands.
#[derive(Serialize, Deserialize, Debug, Clone, Hash, Eq, PartialEq)]
pub struct Ticker {
    pub requested: String,
    pub symbol: String,
}

impl Ticker {
    /// Crypto names (case-insensitive) map to their USD pair; anything else is upper-cased.
    pub fn resolve(raw: &str) -> Self {
        let trimmed = raw.trim();
        let lower = trimmed.to_lowercase();
        let symbol = CRYPTO_MAPPING
            .iter()
            .find(|(name, _)| *name == lower)
            .map(|(_, symbol)| symbol.to_string())
            .unwrap_or_else(|| trimmed.to_uppercase());
        Self {
            requested: trimmed.to_string(),
            symbol,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }
}

impl std::fmt::Display for Ticker {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if self.requested.eq_ignore_ascii_case(&self.symbol) {
            write!(f, "{}", self.symbol)
        } else {
            write!(f, "{} ({})", self.symbol, self.requested)
        }
    }
}
