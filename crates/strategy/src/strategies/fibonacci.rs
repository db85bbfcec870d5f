use common::Signal;

use crate::series::EnrichedSeries;
use crate::Strategy;

/// Pullback to the 61.8% retracement of the recent swing, in the direction of
/// the SMA-200 trend, confirmed by a candle closing in that direction.
pub struct FibonacciRetracement {
    name: String,
    window: usize,
    level: f64,
    tolerance: f64,
    duration_secs: u64,
}

impl FibonacciRetracement {
    pub const DEFAULT_NAME: &'static str = "Fibonacci Retracement 61.8%";
    pub const MIN_CANDLES: usize = 50;

    pub fn new(
        name: impl Into<String>,
        window: usize,
        level: f64,
        tolerance: f64,
        duration_secs: u64,
    ) -> Self {
        Self {
            name: name.into(),
            window: window.max(1),
            level,
            tolerance,
            duration_secs,
        }
    }
}

impl Default for FibonacciRetracement {
    fn default() -> Self {
        Self::new(Self::DEFAULT_NAME, 50, 0.618, 0.05, 300)
    }
}

impl Strategy for FibonacciRetracement {
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, series: &EnrichedSeries) -> Signal {
        if series.len() < Self::MIN_CANDLES.max(self.window) {
            return Signal::hold(&self.name);
        }
        let (Some(candle), Some(row)) = (series.last_candle(), series.last_row()) else {
            return Signal::hold(&self.name);
        };

        let recent = &series.candles[series.len() - self.window..];
        let high = recent.iter().map(|c| c.high).fold(f64::MIN, f64::max);
        let low = recent.iter().map(|c| c.low).fold(f64::MAX, f64::min);
        let range = high - low;
        let Some(sma) = row.sma_200 else {
            return Signal::hold(&self.name);
        };
        if range == 0.0 {
            return Signal::hold(&self.name);
        }

        let close = candle.close;
        let threshold = range * self.tolerance;

        if close > sma {
            let level = high - range * self.level;
            if (close - level).abs() < threshold && candle.is_bullish() {
                return Signal::buy(
                    &self.name,
                    format!("Bounce at Fibonacci level {level:.5}"),
                    self.duration_secs,
                );
            }
        }

        if close < sma {
            let level = low + range * self.level;
            if (close - level).abs() < threshold && candle.is_bearish() {
                return Signal::sell(
                    &self.name,
                    format!("Rejection at Fibonacci level {level:.5}"),
                    self.duration_secs,
                );
            }
        }

        Signal::hold(&self.name)
    }
}
