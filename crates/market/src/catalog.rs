use serde::{Deserialize, Serialize};

use common::MarketType;

/// Instrument catalog file (TOML). File order is the fixed enumeration
/// order every scan cycle uses.
///
/// Example `config/assets.toml`:
/// ```toml
/// [[asset]]
/// symbol = "EURUSD"
/// market = "REAL"
/// base_price = 1.085
///
/// [[asset]]
/// symbol = "EURUSD-OTC"
/// market = "OTC"
/// base_price = 1.085
/// volatility_bps = 25.0
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AssetCatalog {
    #[serde(rename = "asset")]
    pub assets: Vec<AssetSpec>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AssetSpec {
    /// Instrument id, e.g. "EURUSD" or "EURUSD-OTC".
    pub symbol: String,
    /// Market segment tag.
    pub market: MarketType,
    /// Starting price of the synthetic random walk.
    pub base_price: f64,
    /// Per-tick move bound in basis points.
    #[serde(default = "default_volatility_bps")]
    pub volatility_bps: f64,
}

fn default_volatility_bps() -> f64 {
    15.0
}

impl AssetCatalog {
    /// Load from a TOML file. Exits process on error.
    pub fn load(path: &str) -> Self {
        let content = std::fs::read_to_string(path)
            .unwrap_or_else(|e| panic!("Failed to read asset catalog at '{path}': {e}"));
        toml::from_str(&content)
            .unwrap_or_else(|e| panic!("Failed to parse asset catalog at '{path}': {e}"))
    }
}
