//! Candlestick reversal patterns computed from each candle's own geometry
//! and that of up to two preceding candles.

use common::Candle;
use serde::Serialize;

/// Stand-in for a zero high-low range.
const RANGE_EPSILON: f64 = 0.00001;

const DOJI_BODY_RATIO: f64 = 0.1;
const SMALL_BODY_RATIO: f64 = 0.3;
const LONG_SHADOW_FACTOR: f64 = 2.0;
const SHORT_SHADOW_FACTOR: f64 = 0.5;
const STAR_LONG_BODY_RATIO: f64 = 0.5;
const STAR_SMALL_BODY_FACTOR: f64 = 0.5;

/// Per-candle pattern code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum PatternFlag {
    Bullish,
    Bearish,
    #[default]
    None,
}

impl PatternFlag {
    /// Conventional numeric code: +100 bullish, -100 bearish, 0 none.
    pub fn code(self) -> i32 {
        match self {
            PatternFlag::Bullish => 100,
            PatternFlag::Bearish => -100,
            PatternFlag::None => 0,
        }
    }

    pub fn is_set(self) -> bool {
        self != PatternFlag::None
    }

    fn bullish_if(cond: bool) -> Self {
        if cond {
            PatternFlag::Bullish
        } else {
            PatternFlag::None
        }
    }

    fn bearish_if(cond: bool) -> Self {
        if cond {
            PatternFlag::Bearish
        } else {
            PatternFlag::None
        }
    }
}

/// All candlestick flags for one candle. A doji is reported as +100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CandlePatterns {
    pub doji: PatternFlag,
    pub hammer: PatternFlag,
    pub shooting_star: PatternFlag,
    pub engulfing: PatternFlag,
    pub morning_star: PatternFlag,
    pub evening_star: PatternFlag,
}

fn safe_range(c: &Candle) -> f64 {
    let range = c.range();
    if range == 0.0 {
        RANGE_EPSILON
    } else {
        range
    }
}

/// Detect all patterns for the candle at `index`.
pub fn detect(candles: &[Candle], index: usize) -> CandlePatterns {
    let Some(cur) = candles.get(index) else {
        return CandlePatterns::default();
    };
    let body = cur.body();
    let range = safe_range(cur);
    let upper = cur.upper_shadow();
    let lower = cur.lower_shadow();

    let is_small = body <= range * SMALL_BODY_RATIO;
    let mut flags = CandlePatterns {
        doji: PatternFlag::bullish_if(body <= range * DOJI_BODY_RATIO),
        hammer: PatternFlag::bullish_if(
            is_small
                && lower >= body * LONG_SHADOW_FACTOR
                && upper <= body * SHORT_SHADOW_FACTOR,
        ),
        shooting_star: PatternFlag::bearish_if(
            is_small
                && upper >= body * LONG_SHADOW_FACTOR
                && lower <= body * SHORT_SHADOW_FACTOR,
        ),
        ..CandlePatterns::default()
    };

    let Some(prev) = index.checked_sub(1).map(|i| &candles[i]) else {
        return flags;
    };

    if prev.is_bearish() && cur.is_bullish() && cur.close > prev.open && cur.open < prev.close {
        flags.engulfing = PatternFlag::Bullish;
    } else if prev.is_bullish()
        && cur.is_bearish()
        && cur.close < prev.open
        && cur.open > prev.close
    {
        flags.engulfing = PatternFlag::Bearish;
    }

    let Some(first) = index.checked_sub(2).map(|i| &candles[i]) else {
        return flags;
    };
    let first_long = first.body() > safe_range(first) * STAR_LONG_BODY_RATIO;
    let middle_small = prev.body() < first.body() * STAR_SMALL_BODY_FACTOR;
    let first_mid = (first.open + first.close) / 2.0;

    flags.morning_star = PatternFlag::bullish_if(
        first.is_bearish() && first_long && middle_small && cur.is_bullish() && cur.close > first_mid,
    );
    flags.evening_star = PatternFlag::bearish_if(
        first.is_bullish() && first_long && middle_small && cur.is_bearish() && cur.close < first_mid,
    );

    flags
}

/// Detect patterns for every candle in the series.
pub fn detect_all(candles: &[Candle]) -> Vec<CandlePatterns> {
    (0..candles.len()).map(|i| detect(candles, i)).collect()
}
