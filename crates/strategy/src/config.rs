use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use common::TradingConfig;

/// Top-level strategy config file (TOML).
///
/// Example `config/strategies.toml`:
/// ```toml
/// [trading]
/// pairs = ["EURUSD_otc", "GBPUSD_otc"]
/// stake = 1.0
///
/// [[strategy]]
/// type = "stochastic_trend"
/// name = "Stochastic + SMA200"
///
/// [strategy.params]
/// oversold = 20.0
/// overbought = 80.0
/// ```
///
/// `[[strategy]]` order is the evaluation order, which is also the consensus
/// tie-break order.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StrategyFileConfig {
    #[serde(default)]
    pub trading: TradingConfig,
    #[serde(rename = "strategy", default)]
    pub strategies: Vec<StrategyConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StrategyConfig {
    /// Strategy type identifier: "stochastic_trend", "continuation",
    /// "fibonacci" or "structure".
    #[serde(rename = "type")]
    pub strategy_type: String,
    /// Human-readable name shown in logs, notifications and the journal.
    pub name: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    /// Strategy-specific parameters.
    #[serde(default)]
    pub params: HashMap<String, toml::Value>,
}

fn enabled_by_default() -> bool {
    true
}

impl StrategyFileConfig {
    /// Load from a TOML file. Exits process on error.
    pub fn load(path: &str) -> Self {
        let content = std::fs::read_to_string(path).unwrap_or_else(|e| {
            panic!("Failed to read strategy config at '{path}': {e}")
        });
        Self::parse(&content).unwrap_or_else(|e| {
            panic!("Failed to parse strategy config at '{path}': {e}")
        })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
