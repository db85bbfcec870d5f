use common::{Candle, MarketState};
use tracing::debug;

use crate::indicators::{
    adx, atr, ema, sma, sma_opt, BollingerIndicator, MacdIndicator, RsiIndicator,
    StochasticIndicator,
};
use crate::series::{EnrichedSeries, IndicatorRow};

pub const SMA_SLOW: usize = 200;
pub const EMA_FAST: usize = 20;
pub const EMA_SLOW: usize = 50;
pub const RSI_PERIOD: usize = 14;
pub const STOCH_PERIOD: usize = 16;
pub const STOCH_SMOOTH: usize = 3;
pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;
pub const BB_PERIOD: usize = 20;
pub const BB_WIDTH: f64 = 2.0;
pub const ATR_PERIOD: usize = 14;
pub const ADX_PERIOD: usize = 14;

/// Candles required before a regime can be classified.
pub const REGIME_MIN_CANDLES: usize = 50;
const ADX_TRENDING: f64 = 25.0;
const ADX_RANGING: f64 = 20.0;
const ATR_MEAN_WINDOW: usize = 20;
const ATR_SPIKE_FACTOR: f64 = 1.5;

/// Computes trend, momentum and volatility indicators over a candle series.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndicatorEngine;

impl IndicatorEngine {
    pub fn new() -> Self {
        Self
    }

    /// Enrich `candles` with one `IndicatorRow` per candle.
    ///
    /// Pure: the input is never modified and equal inputs give equal output.
    /// An empty input yields an empty series.
    pub fn compute(&self, candles: &[Candle]) -> EnrichedSeries {
        if candles.is_empty() {
            return EnrichedSeries::default();
        }

        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();

        let sma_200 = sma(&closes, SMA_SLOW);
        let ema_20 = ema(&closes, EMA_FAST);
        let ema_50 = ema(&closes, EMA_SLOW);
        let rsi_14 = RsiIndicator::new(RSI_PERIOD).series(&closes);
        let stoch = StochasticIndicator::new(STOCH_PERIOD, STOCH_SMOOTH).series(candles);
        let macd = MacdIndicator::new(MACD_FAST, MACD_SLOW, MACD_SIGNAL).series(&closes);
        let bb = BollingerIndicator::new(BB_PERIOD, BB_WIDTH).series(&closes);
        let atr_14 = atr(candles, ATR_PERIOD);
        let adx_14 = adx(candles, ADX_PERIOD);

        let indicators = (0..candles.len())
            .map(|i| IndicatorRow {
                sma_200: sma_200[i],
                ema_20: ema_20[i],
                ema_50: ema_50[i],
                rsi_14: rsi_14[i],
                stoch_k: stoch.k[i],
                stoch_d: stoch.d[i],
                macd: macd.macd[i],
                macd_signal: macd.signal[i],
                macd_hist: macd.histogram[i],
                bb_upper: bb.upper[i],
                bb_middle: bb.middle[i],
                bb_lower: bb.lower[i],
                atr_14: atr_14[i],
                adx_14: adx_14[i],
            })
            .collect();

        EnrichedSeries {
            candles: candles.to_vec(),
            indicators,
            candle_patterns: Vec::new(),
            chart_patterns: Vec::new(),
        }
    }

    /// Classify the market regime at the last candle. First matching rule wins:
    ///
    /// 1. ADX > 25, EMA-20 > EMA-50 and close > EMA-50 → `TrendingUp`
    /// 2. ADX > 25, EMA-20 < EMA-50 and close < EMA-50 → `TrendingDown`
    /// 3. ADX < 20 → `Sideways`
    /// 4. ATR > 1.5 × its 20-candle mean → `Volatile`
    /// 5. otherwise `Sideways`
    ///
    /// Fewer than 50 candles, or undefined EMAs, give `Unknown`.
    pub fn classify_regime(&self, series: &EnrichedSeries) -> MarketState {
        if series.len() < REGIME_MIN_CANDLES {
            return MarketState::Unknown;
        }
        let (Some(row), Some(candle)) = (series.last_row(), series.last_candle()) else {
            return MarketState::Unknown;
        };
        let (Some(ema_fast), Some(ema_slow)) = (row.ema_20, row.ema_50) else {
            return MarketState::Unknown;
        };
        let close = candle.close;

        if let Some(adx) = row.adx_14 {
            if adx > ADX_TRENDING {
                if ema_fast > ema_slow && close > ema_slow {
                    return MarketState::TrendingUp;
                }
                if ema_fast < ema_slow && close < ema_slow {
                    return MarketState::TrendingDown;
                }
            }
            if adx < ADX_RANGING {
                return MarketState::Sideways;
            }
        }

        let atr: Vec<Option<f64>> = series.indicators.iter().map(|r| r.atr_14).collect();
        let atr_mean = sma_opt(&atr, ATR_MEAN_WINDOW);
        if let (Some(current), Some(Some(mean))) = (row.atr_14, atr_mean.last()) {
            if current > mean * ATR_SPIKE_FACTOR {
                debug!(atr = current, atr_mean = mean, "ATR spike");
                return MarketState::Volatile;
            }
        }

        MarketState::Sideways
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{flat, uptrend_with_stochastic_dip};

    #[test]
    fn empty_series_is_returned_empty() {
        let series = IndicatorEngine::new().compute(&[]);
        assert!(series.is_empty());
        assert!(series.indicators.is_empty());
    }

    #[test]
    fn rows_align_with_candles() {
        let candles = flat(60, 100.0);
        let series = IndicatorEngine::new().compute(&candles);
        assert_eq!(series.indicators.len(), 60);
        assert_eq!(series.candles, candles);
    }

    #[test]
    fn warm_up_values_are_undefined() {
        let candles = uptrend_with_stochastic_dip();
        let series = IndicatorEngine::new().compute(&candles);
        assert!(series.row(198).unwrap().sma_200.is_none());
        assert!(series.row(199).unwrap().sma_200.is_some());
        assert!(series.row(18).unwrap().ema_20.is_none());
        assert!(series.row(19).unwrap().ema_20.is_some());
        assert!(series.row(14).unwrap().stoch_k.is_none());
        assert!(series.row(15).unwrap().stoch_k.is_some());
        assert!(series.row(12).unwrap().atr_14.is_none());
        assert!(series.row(13).unwrap().atr_14.is_some());
    }

    #[test]
    fn short_series_regime_is_unknown() {
        let candles = flat(49, 100.0);
        let engine = IndicatorEngine::new();
        let series = engine.compute(&candles);
        assert_eq!(engine.classify_regime(&series), MarketState::Unknown);
    }

    #[test]
    fn uptrend_is_trending_up() {
        let engine = IndicatorEngine::new();
        let series = engine.compute(&uptrend_with_stochastic_dip());
        let row = series.last_row().unwrap();
        assert!(row.adx_14.unwrap() > 25.0);
        assert!(row.ema_20.unwrap() > row.ema_50.unwrap());
        assert_eq!(engine.classify_regime(&series), MarketState::TrendingUp);
    }

    #[test]
    fn downtrend_is_trending_down() {
        let engine = IndicatorEngine::new();
        let candles = crate::test_support::mirror(&uptrend_with_stochastic_dip());
        let series = engine.compute(&candles);
        assert_eq!(engine.classify_regime(&series), MarketState::TrendingDown);
    }

    #[test]
    fn quiet_alternating_market_is_sideways() {
        let engine = IndicatorEngine::new();
        let candles = crate::test_support::alternating(80, 100.0, 0.2);
        let series = engine.compute(&candles);
        assert_eq!(engine.classify_regime(&series), MarketState::Sideways);
    }

    #[test]
    fn compute_is_deterministic() {
        let engine = IndicatorEngine::new();
        let candles = uptrend_with_stochastic_dip();
        assert_eq!(engine.compute(&candles), engine.compute(&candles));
    }

    /// 50 flat candles closing at 100 whose last row carries the given ADX
    /// and EMAs. ATR is 2.0 at row 30, 4.0 on rows 0-29 and 31-48 and
    /// `last_atr` on row 49, so the trailing 20-row ATR mean is
    /// `(74 + last_atr) / 20`.
    fn regime_fixture(adx: f64, ema_20: f64, ema_50: f64, last_atr: f64) -> EnrichedSeries {
        let mut series = IndicatorEngine::new().compute(&flat(50, 100.0));
        for (i, row) in series.indicators.iter_mut().enumerate() {
            *row = IndicatorRow {
                ema_20: Some(ema_20),
                ema_50: Some(ema_50),
                adx_14: Some(adx),
                atr_14: Some(match i {
                    30 => 2.0,
                    49 => last_atr,
                    _ => 4.0,
                }),
                ..IndicatorRow::default()
            };
        }
        series
    }

    #[test]
    fn atr_spike_with_middling_adx_is_volatile() {
        let engine = IndicatorEngine::new();
        // mean = 80.5 / 20 = 4.025, threshold 6.0375
        let series = regime_fixture(22.0, 101.0, 99.0, 6.5);
        assert_eq!(engine.classify_regime(&series), MarketState::Volatile);
    }

    #[test]
    fn atr_spike_with_mixed_emas_is_volatile_even_when_adx_is_strong() {
        let engine = IndicatorEngine::new();
        // EMA-20 above EMA-50 but close below EMA-50: neither trend rule applies.
        let series = regime_fixture(30.0, 103.0, 102.0, 6.5);
        assert_eq!(engine.classify_regime(&series), MarketState::Volatile);
    }

    #[test]
    fn atr_exactly_one_and_a_half_means_is_not_a_spike() {
        let engine = IndicatorEngine::new();
        // mean = 80 / 20 = 4.0, threshold exactly 6.0
        let series = regime_fixture(22.0, 101.0, 99.0, 6.0);
        assert_eq!(engine.classify_regime(&series), MarketState::Sideways);
    }

    #[test]
    fn adx_of_exactly_25_is_not_trending() {
        let engine = IndicatorEngine::new();
        let calm = regime_fixture(25.0, 101.0, 99.0, 4.0);
        assert_eq!(engine.classify_regime(&calm), MarketState::Sideways);

        let spiking = regime_fixture(25.0, 101.0, 99.0, 6.5);
        assert_eq!(engine.classify_regime(&spiking), MarketState::Volatile);

        let strong = regime_fixture(25.5, 101.0, 99.0, 6.5);
        assert_eq!(engine.classify_regime(&strong), MarketState::TrendingUp);
    }

    #[test]
    fn adx_between_20_and_25_without_spike_defaults_to_sideways() {
        let engine = IndicatorEngine::new();
        for adx in [20.0, 22.5, 24.9] {
            let series = regime_fixture(adx, 101.0, 99.0, 4.0);
            assert_eq!(engine.classify_regime(&series), MarketState::Sideways, "adx {adx}");
        }
    }

    #[test]
    fn adx_below_20_is_sideways_before_atr_is_checked() {
        let engine = IndicatorEngine::new();
        let series = regime_fixture(19.9, 101.0, 99.0, 6.5);
        assert_eq!(engine.classify_regime(&series), MarketState::Sideways);
    }
}
