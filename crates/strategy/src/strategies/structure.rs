use common::Signal;

use crate::patterns::ChartPatternKind;
use crate::series::EnrichedSeries;
use crate::Strategy;

/// Market structure shift: a recent double top (bottom) whose neckline has
/// been broken, with MACD momentum agreeing.
pub struct StructureChange {
    name: String,
    recent_bars: usize,
    duration_secs: u64,
}

impl StructureChange {
    pub const DEFAULT_NAME: &'static str = "Structure Change (MSS)";
    pub const MIN_CANDLES: usize = 20;

    pub fn new(name: impl Into<String>, recent_bars: usize, duration_secs: u64) -> Self {
        Self {
            name: name.into(),
            recent_bars,
            duration_secs,
        }
    }

    /// Neckline of the latest `kind` pattern within the recent bars.
    fn neckline(&self, series: &EnrichedSeries, kind: ChartPatternKind) -> Option<f64> {
        series
            .recent_chart_patterns(kind, self.recent_bars)
            .filter_map(|p| p.neckline)
            .last()
    }
}

impl Default for StructureChange {
    fn default() -> Self {
        Self::new(Self::DEFAULT_NAME, 5, 300)
    }
}

impl Strategy for StructureChange {
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, series: &EnrichedSeries) -> Signal {
        if series.len() < Self::MIN_CANDLES {
            return Signal::hold(&self.name);
        }
        let (Some(candle), Some(row)) = (series.last_candle(), series.last_row()) else {
            return Signal::hold(&self.name);
        };
        let (Some(macd), Some(macd_signal)) = (row.macd, row.macd_signal) else {
            return Signal::hold(&self.name);
        };
        let close = candle.close;

        if let Some(neckline) = self.neckline(series, ChartPatternKind::DoubleTop) {
            if close < neckline && macd < macd_signal {
                return Signal::sell(
                    &self.name,
                    format!("Double top, neckline {neckline:.5} broken"),
                    self.duration_secs,
                );
            }
        }

        if let Some(neckline) = self.neckline(series, ChartPatternKind::DoubleBottom) {
            if close > neckline && macd > macd_signal {
                return Signal::buy(
                    &self.name,
                    format!("Double bottom, neckline {neckline:.5} broken"),
                    self.duration_secs,
                );
            }
        }

        Signal::hold(&self.name)
    }
}
