use super::moving::{ema, ema_opt};

/// MACD (Moving Average Convergence/Divergence) indicator.
///
/// MACD line = EMA(fast) − EMA(slow), Signal = EMA(macd_line, signal_period),
/// Histogram = MACD − Signal.
#[derive(Debug, Clone)]
pub struct MacdIndicator {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

/// Aligned MACD columns.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub macd: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
    pub histogram: Vec<Option<f64>>,
}

impl MacdIndicator {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Self {
        assert!(fast < slow, "MACD fast period must be less than slow period");
        Self { fast, slow, signal }
    }

    /// The MACD line is defined from index `slow - 1`, the signal line from
    /// `slow + signal - 2`.
    pub fn series(&self, closes: &[f64]) -> MacdSeries {
        let fast = ema(closes, self.fast);
        let slow = ema(closes, self.slow);

        let macd: Vec<Option<f64>> = fast
            .iter()
            .zip(&slow)
            .map(|(f, s)| Some((*f)? - (*s)?))
            .collect();
        let signal = ema_opt(&macd, self.signal);
        let histogram = macd
            .iter()
            .zip(&signal)
            .map(|(m, s)| Some((*m)? - (*s)?))
            .collect();

        MacdSeries { macd, signal, histogram }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trending_up(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + i as f64 * 0.5).collect()
    }

    #[test]
    fn macd_warm_up_lengths() {
        let macd = MacdIndicator::new(12, 26, 9);
        let out = macd.series(&trending_up(60));
        assert!(out.macd[..25].iter().all(Option::is_none));
        assert!(out.macd[25].is_some());
        assert!(out.signal[..33].iter().all(Option::is_none));
        assert!(out.signal[33].is_some());
        assert!(out.histogram[33].is_some());
    }

    #[test]
    fn macd_positive_on_steady_uptrend() {
        let macd = MacdIndicator::new(3, 6, 3);
        let out = macd.series(&trending_up(40));
        let last = out.macd[39].unwrap();
        assert!(last > 0.0, "fast EMA should lead on an uptrend, got {last}");
    }

    #[test]
    fn macd_turns_below_signal_after_reversal() {
        let macd = MacdIndicator::new(3, 6, 3);
        let mut prices = trending_up(30);
        prices.extend((0..6).map(|i| 114.5 - i as f64 * 3.0));
        let out = macd.series(&prices);
        let n = prices.len() - 1;
        assert!(out.macd[n].unwrap() < out.signal[n].unwrap());
    }

    #[test]
    #[should_panic]
    fn macd_rejects_inverted_periods() {
        MacdIndicator::new(26, 12, 9);
    }
}
