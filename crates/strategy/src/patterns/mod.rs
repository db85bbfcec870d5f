pub mod candlestick;
pub mod chart;

pub use candlestick::{CandlePatterns, PatternFlag};
pub use chart::{ChartPattern, ChartPatternKind, CHART_LOOKBACK};

use crate::series::EnrichedSeries;

/// Attaches candlestick flags and chart formations to an enriched series.
#[derive(Debug, Clone, Copy)]
pub struct PatternRecognizer {
    lookback: usize,
}

impl Default for PatternRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternRecognizer {
    pub fn new() -> Self {
        Self { lookback: CHART_LOOKBACK }
    }

    /// Recompute every pattern from scratch. Any patterns already on the
    /// series are replaced.
    pub fn annotate(&self, mut series: EnrichedSeries) -> EnrichedSeries {
        series.candle_patterns = candlestick::detect_all(&series.candles);
        series.chart_patterns = chart::detect(&series.candles, self.lookback);
        series
    }
}
