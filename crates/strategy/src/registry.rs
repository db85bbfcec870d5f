use std::collections::HashMap;

use thiserror::Error;
use tracing::{debug, info};

use common::Signal;

use crate::config::{StrategyConfig, StrategyFileConfig};
use crate::series::EnrichedSeries;
use crate::strategies::{Continuation, FibonacciRetracement, StochasticTrend, StructureChange};
use crate::Strategy;

#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("unknown strategy type '{0}'")]
    UnknownType(String),

    #[error("strategy '{name}': invalid parameter '{param}'")]
    InvalidParam { name: String, param: String },
}

/// Ordered, fixed collection of strategies evaluated every cycle.
///
/// Order matters: it is the tie-break order used by consensus.
pub struct StrategySet {
    strategies: Vec<Box<dyn Strategy>>,
}

impl StrategySet {
    /// Build the set from config, skipping disabled entries.
    pub fn from_config(file_cfg: &StrategyFileConfig) -> Result<Self, StrategyError> {
        let mut strategies: Vec<Box<dyn Strategy>> = Vec::new();

        for cfg in file_cfg.strategies.iter().filter(|c| c.enabled) {
            let strategy = build_strategy(cfg)?;
            info!(name = %strategy.name(), kind = %cfg.strategy_type, "Registered strategy");
            strategies.push(strategy);
        }

        Ok(Self { strategies })
    }

    /// All four strategies with default parameters.
    pub fn default_set() -> Self {
        Self::new(vec![
            Box::new(StochasticTrend::default()),
            Box::new(Continuation::default()),
            Box::new(FibonacciRetracement::default()),
            Box::new(StructureChange::default()),
        ])
    }

    pub fn new(strategies: Vec<Box<dyn Strategy>>) -> Self {
        Self { strategies }
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.strategies.iter().map(|s| s.name())
    }

    /// Evaluate every strategy against `series`. Returns the non-HOLD signals
    /// in evaluation order.
    pub fn evaluate(&self, pair: &str, series: &EnrichedSeries) -> Vec<Signal> {
        self.strategies
            .iter()
            .map(|s| s.evaluate(series))
            .filter(|signal| {
                if signal.is_hold() {
                    return false;
                }
                debug!(
                    pair = %pair,
                    strategy = %signal.source,
                    action = %signal.action,
                    reason = %signal.reason,
                    "Strategy signal"
                );
                true
            })
            .collect()
    }
}

// ─── Strategy builders ────────────────────────────────────────────────────────

fn build_strategy(cfg: &StrategyConfig) -> Result<Box<dyn Strategy>, StrategyError> {
    let p = &cfg.params;
    let duration = param_u64(p, "duration_secs", 300);
    match cfg.strategy_type.as_str() {
        "stochastic_trend" | "stochastic" => {
            let oversold = param_f64(p, "oversold", 20.0);
            let overbought = param_f64(p, "overbought", 80.0);
            if oversold >= overbought {
                return Err(invalid(cfg, "oversold"));
            }
            Ok(Box::new(StochasticTrend::new(&cfg.name, oversold, overbought, duration)))
        }
        "fibonacci" => {
            let window = param_usize(p, "window", 50);
            let level = param_f64(p, "level", 0.618);
            let tolerance = param_f64(p, "tolerance", 0.05);
            if window == 0 {
                return Err(invalid(cfg, "window"));
            }
            Ok(Box::new(FibonacciRetracement::new(&cfg.name, window, level, tolerance, duration)))
        }
        "structure" => {
            let recent = param_usize(p, "recent_bars", 5);
            Ok(Box::new(StructureChange::new(&cfg.name, recent, duration)))
        }
        "continuation" => Ok(Box::new(Continuation::new(&cfg.name, duration))),
        other => Err(StrategyError::UnknownType(other.to_string())),
    }
}

fn invalid(cfg: &StrategyConfig, param: &str) -> StrategyError {
    StrategyError::InvalidParam {
        name: cfg.name.clone(),
        param: param.to_string(),
    }
}

fn param_f64(params: &HashMap<String, toml::Value>, key: &str, default: f64) -> f64 {
    params
        .get(key)
        .and_then(|v| v.as_float().or_else(|| v.as_integer().map(|i| i as f64)))
        .unwrap_or(default)
}

fn param_usize(params: &HashMap<String, toml::Value>, key: &str, default: usize) -> usize {
    params
        .get(key)
        .and_then(|v| v.as_integer())
        .and_then(|v| usize::try_from(v).ok())
        .unwrap_or(default)
}

fn param_u64(params: &HashMap<String, toml::Value>, key: &str, default: u64) -> u64 {
    params
        .get(key)
        .and_then(|v| v.as_integer())
        .and_then(|v| u64::try_from(v).ok())
        .unwrap_or(default)
}
