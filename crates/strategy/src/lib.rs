pub mod analysis;
pub mod config;
pub mod indicators;
pub mod patterns;
pub mod registry;
pub mod series;
pub mod strategies;

#[cfg(test)]
mod test_support;

pub use analysis::IndicatorEngine;
pub use config::{StrategyConfig, StrategyFileConfig};
pub use patterns::{ChartPattern, ChartPatternKind, PatternRecognizer};
pub use registry::{StrategyError, StrategySet};
pub use series::{EnrichedSeries, IndicatorRow};

use common::Signal;

/// All strategy implementations must satisfy this trait.
///
/// Strategies are stateless: the same series always yields the same signal.
pub trait Strategy: Send + Sync {
    /// Human-readable name of this strategy instance. Used as the signal source.
    fn name(&self) -> &str;

    /// Evaluate the latest candle of an enriched, pattern-annotated series.
    ///
    /// Returns a HOLD signal with zero duration when history is insufficient or
    /// any required indicator is undefined. Never panics on short input.
    fn evaluate(&self, series: &EnrichedSeries) -> Signal;
}
