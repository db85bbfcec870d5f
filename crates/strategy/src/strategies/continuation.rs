use common::Signal;

use crate::patterns::ChartPatternKind;
use crate::series::EnrichedSeries;
use crate::Strategy;

/// Trades in the short-term trend direction when a triangle has just formed.
pub struct Continuation {
    name: String,
    duration_secs: u64,
}

impl Continuation {
    pub const DEFAULT_NAME: &'static str = "Continuation Patterns";

    pub fn new(name: impl Into<String>, duration_secs: u64) -> Self {
        Self {
            name: name.into(),
            duration_secs,
        }
    }
}

impl Default for Continuation {
    fn default() -> Self {
        Self::new(Self::DEFAULT_NAME, 300)
    }
}

impl Strategy for Continuation {
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, series: &EnrichedSeries) -> Signal {
        if !series.has_pattern_on_last(ChartPatternKind::Triangle) {
            return Signal::hold(&self.name);
        }
        let Some(row) = series.last_row() else {
            return Signal::hold(&self.name);
        };
        let (Some(fast), Some(slow)) = (row.ema_20, row.ema_50) else {
            return Signal::hold(&self.name);
        };

        if fast > slow {
            Signal::buy(&self.name, "Triangle with EMA-20 above EMA-50", self.duration_secs)
        } else {
            Signal::sell(&self.name, "Triangle with EMA-20 at or below EMA-50", self.duration_secs)
        }
    }
}
