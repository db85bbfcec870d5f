use common::Candle;

use crate::patterns::{CandlePatterns, ChartPattern, ChartPatternKind};

/// Indicator values aligned with one candle. `None` means "not enough history".
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IndicatorRow {
    pub sma_200: Option<f64>,
    pub ema_20: Option<f64>,
    pub ema_50: Option<f64>,
    pub rsi_14: Option<f64>,
    pub stoch_k: Option<f64>,
    pub stoch_d: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_hist: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_middle: Option<f64>,
    pub bb_lower: Option<f64>,
    pub atr_14: Option<f64>,
    pub adx_14: Option<f64>,
}

/// A candle snapshot plus everything derived from it in one cycle.
///
/// Built fresh from each fetch; nothing carries over between cycles.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EnrichedSeries {
    pub candles: Vec<Candle>,
    /// One row per candle.
    pub indicators: Vec<IndicatorRow>,
    /// One entry per candle once patterns have been recognised, empty before.
    pub candle_patterns: Vec<CandlePatterns>,
    /// Chart formations confirmed in this snapshot.
    pub chart_patterns: Vec<ChartPattern>,
}

impl EnrichedSeries {
    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn last_candle(&self) -> Option<&Candle> {
        self.candles.last()
    }

    pub fn row(&self, index: usize) -> Option<&IndicatorRow> {
        self.indicators.get(index)
    }

    pub fn last_row(&self) -> Option<&IndicatorRow> {
        self.indicators.last()
    }

    /// Row before the last one.
    pub fn prev_row(&self) -> Option<&IndicatorRow> {
        self.indicators.len().checked_sub(2).and_then(|i| self.indicators.get(i))
    }

    pub fn last_candle_patterns(&self) -> Option<&CandlePatterns> {
        self.candle_patterns.last()
    }

    /// Chart patterns of `kind` confirmed within the last `bars` candles,
    /// oldest first.
    pub fn recent_chart_patterns(
        &self,
        kind: ChartPatternKind,
        bars: usize,
    ) -> impl Iterator<Item = &ChartPattern> {
        let from = self.len().saturating_sub(bars);
        self.chart_patterns
            .iter()
            .filter(move |p| p.kind == kind && p.confirmed_at >= from)
    }

    /// Whether a pattern of `kind` is confirmed on the last candle.
    pub fn has_pattern_on_last(&self, kind: ChartPatternKind) -> bool {
        self.recent_chart_patterns(kind, 1).next().is_some()
    }
}
