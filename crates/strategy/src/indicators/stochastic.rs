use common::Candle;

use super::moving::sma_opt;

/// Stochastic oscillator.
///
/// %K = 100 × (close − lowest low) / (highest high − lowest low) over
/// `period` candles; %D = SMA(%K, `smooth`). A window with no high-low range
/// has no defined %K.
#[derive(Debug, Clone)]
pub struct StochasticIndicator {
    pub period: usize,
    pub smooth: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StochasticSeries {
    pub k: Vec<Option<f64>>,
    pub d: Vec<Option<f64>>,
}

impl StochasticIndicator {
    pub fn new(period: usize, smooth: usize) -> Self {
        assert!(period >= 1 && smooth >= 1, "Stochastic periods must be >= 1");
        Self { period, smooth }
    }

    pub fn series(&self, candles: &[Candle]) -> StochasticSeries {
        let mut k = vec![None; candles.len()];
        for i in (self.period.saturating_sub(1))..candles.len() {
            let window = &candles[i + 1 - self.period..=i];
            let hh = window.iter().map(|c| c.high).fold(f64::MIN, f64::max);
            let ll = window.iter().map(|c| c.low).fold(f64::MAX, f64::min);
            let range = hh - ll;
            if range > 0.0 {
                k[i] = Some(100.0 * (candles[i].close - ll) / range);
            }
        }
        let d = sma_opt(&k, self.smooth);
        StochasticSeries { k, d }
    }
}
