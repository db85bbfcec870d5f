use chrono::{TimeZone, Utc};
use common::Candle;
use proptest::prelude::*;
use strategy::indicators::{ema, sma};
use strategy::{IndicatorEngine, PatternRecognizer, StrategySet};

fn candles_from(bars: &[(f64, f64, f64, f64)]) -> Vec<Candle> {
    bars.iter()
        .enumerate()
        .map(|(i, &(open, close, up, down))| Candle {
            timestamp: Utc.timestamp_opt(1_700_000_000 + i as i64 * 300, 0).unwrap(),
            open,
            high: open.max(close) + up,
            low: open.min(close) - down,
            close,
        })
        .collect()
}

fn bar() -> impl Strategy<Value = (f64, f64, f64, f64)> {
    (1.0f64..2.0, 1.0f64..2.0, 0.0f64..0.05, 0.0f64..0.05)
}

proptest! {
    /// The first `period - 1` values are undefined and every later value is defined.
    #[test]
    fn moving_average_warm_up(
        values in prop::collection::vec(-1_000.0f64..1_000.0, 0..300),
        period in 1usize..60,
    ) {
        for out in [sma(&values, period), ema(&values, period)] {
            prop_assert_eq!(out.len(), values.len());
            for (i, v) in out.iter().enumerate() {
                prop_assert_eq!(v.is_some(), i + 1 >= period, "index {}", i);
            }
        }
    }

    /// Enrichment never panics and yields one row per candle.
    #[test]
    fn enrichment_is_aligned(bars in prop::collection::vec(bar(), 0..260)) {
        let candles = candles_from(&bars);
        let series = PatternRecognizer::new().annotate(IndicatorEngine::new().compute(&candles));
        prop_assert_eq!(series.indicators.len(), candles.len());
        prop_assert_eq!(series.candle_patterns.len(), candles.len());
        for row in &series.indicators[..candles.len().min(199)] {
            prop_assert!(row.sma_200.is_none());
        }
        for p in &series.chart_patterns {
            prop_assert_eq!(p.confirmed_at, candles.len() - 1);
        }
    }

    /// Fewer than 20 candles is below every strategy's minimum history.
    #[test]
    fn short_history_always_holds(bars in prop::collection::vec(bar(), 0..20)) {
        let candles = candles_from(&bars);
        let series = PatternRecognizer::new().annotate(IndicatorEngine::new().compute(&candles));
        let signals = StrategySet::default_set().evaluate("TEST", &series);
        prop_assert!(signals.is_empty());
    }
}
