use common::Signal;

use crate::series::EnrichedSeries;
use crate::Strategy;

/// Stochastic crossover out of an extreme zone, filtered by the SMA-200 trend.
///
/// BUY above the SMA when %K leaves oversold and crosses above %D; SELL below
/// the SMA when %K leaves overbought and crosses below %D.
pub struct StochasticTrend {
    name: String,
    oversold: f64,
    overbought: f64,
    duration_secs: u64,
}

impl StochasticTrend {
    pub const DEFAULT_NAME: &'static str = "Stochastic + SMA200";
    pub const MIN_CANDLES: usize = 200;

    pub fn new(name: impl Into<String>, oversold: f64, overbought: f64, duration_secs: u64) -> Self {
        Self {
            name: name.into(),
            oversold,
            overbought,
            duration_secs,
        }
    }
}

impl Default for StochasticTrend {
    fn default() -> Self {
        Self::new(Self::DEFAULT_NAME, 20.0, 80.0, 300)
    }
}

impl Strategy for StochasticTrend {
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, series: &EnrichedSeries) -> Signal {
        if series.len() < Self::MIN_CANDLES {
            return Signal::hold(&self.name);
        }
        let (Some(last), Some(prev), Some(candle)) =
            (series.last_row(), series.prev_row(), series.last_candle())
        else {
            return Signal::hold(&self.name);
        };
        let (Some(sma), Some(k), Some(d), Some(prev_k)) =
            (last.sma_200, last.stoch_k, last.stoch_d, prev.stoch_k)
        else {
            return Signal::hold(&self.name);
        };

        let bull = candle.close > sma;
        if bull && prev_k < self.oversold && k > d && k > prev_k {
            return Signal::buy(
                &self.name,
                format!("Stochastic crossed up from oversold ({prev_k:.1} -> {k:.1}) in uptrend"),
                self.duration_secs,
            );
        }
        if !bull && prev_k > self.overbought && k < d && k < prev_k {
            return Signal::sell(
                &self.name,
                format!("Stochastic crossed down from overbought ({prev_k:.1} -> {k:.1}) in downtrend"),
                self.duration_secs,
            );
        }
        Signal::hold(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::IndicatorEngine;
    use crate::test_support::{mirror, uptrend_with_stochastic_dip};
    use common::Action;

    #[test]
    fn buy_on_oversold_cross_in_uptrend() {
        let series = IndicatorEngine::new().compute(&uptrend_with_stochastic_dip());
        let signal = StochasticTrend::default().evaluate(&series);
        assert_eq!(signal.action, Action::Buy);
        assert_eq!(signal.duration_secs, 300);
        assert_eq!(signal.source, StochasticTrend::DEFAULT_NAME);
    }

    #[test]
    fn sell_on_overbought_cross_in_downtrend() {
        let series = IndicatorEngine::new().compute(&mirror(&uptrend_with_stochastic_dip()));
        let signal = StochasticTrend::default().evaluate(&series);
        assert_eq!(signal.action, Action::Sell);
    }

    #[test]
    fn hold_one_bar_earlier() {
        // At 248 %K is still falling.
        let candles = uptrend_with_stochastic_dip();
        let series = IndicatorEngine::new().compute(&candles[..249]);
        assert!(StochasticTrend::default().evaluate(&series).is_hold());
    }

    #[test]
    fn hold_with_short_history() {
        let candles = uptrend_with_stochastic_dip();
        let series = IndicatorEngine::new().compute(&candles[51..]);
        let signal = StochasticTrend::default().evaluate(&series);
        assert!(signal.is_hold());
        assert_eq!(signal.duration_secs, 0);
    }
}
