//! Synthetic candle fixtures shared by unit tests.

use chrono::{TimeZone, Utc};
use common::Candle;

pub fn candle(i: usize, open: f64, high: f64, low: f64, close: f64) -> Candle {
    Candle {
        timestamp: Utc.timestamp_opt(1_700_000_000 + i as i64 * 300, 0).unwrap(),
        open,
        high,
        low,
        close,
    }
}

pub fn flat(n: usize, price: f64) -> Vec<Candle> {
    (0..n).map(|i| candle(i, price, price, price, price)).collect()
}

/// Closes alternate between `base` and `base + step`.
pub fn alternating(n: usize, base: f64, step: f64) -> Vec<Candle> {
    (0..n)
        .map(|i| {
            let c = if i % 2 == 0 { base } else { base + step };
            candle(i, c, c + step / 2.0, c - step / 2.0, c)
        })
        .collect()
}

/// Reflect prices around 1000 so an uptrend becomes a downtrend.
pub fn mirror(candles: &[Candle]) -> Vec<Candle> {
    mirror_around(candles, 1000.0)
}

pub fn mirror_around(candles: &[Candle], axis: f64) -> Vec<Candle> {
    candles
        .iter()
        .map(|c| Candle {
            timestamp: c.timestamp,
            open: axis - c.open,
            high: axis - c.low,
            low: axis - c.high,
            close: axis - c.close,
        })
        .collect()
}

/// 250 candles rising one point per bar, with a two-bar pullback at 247-248
/// and a rebound on 249.
///
/// Stochastic %K (16) is ~5.3 at 247, ~3.0 at 248 and ~26.8 at 249, with %D
/// ~11.7 at 249. Close stays far above SMA-200, EMA-20 above EMA-50 and ADX
/// above 80.
pub fn uptrend_with_stochastic_dip() -> Vec<Candle> {
    let mut candles: Vec<Candle> = (0..247)
        .map(|i| {
            let c = 100.0 + i as f64;
            candle(i, c - 0.5, c + 0.3, c - 0.8, c)
        })
        .collect();
    candles.push(candle(247, 346.0, 346.3, 331.5, 332.0));
    candles.push(candle(248, 332.0, 332.3, 329.5, 330.0));
    candles.push(candle(249, 330.0, 334.3, 329.8, 334.0));
    candles
}

/// Two equal highs at 100.0, `separation` bars apart, the first at index 20,
/// with a low of 99.7 half-way between them. Highs rise before the first peak
/// and fall after the second; the series ends 13 bars after the second peak.
pub fn double_top_series(separation: usize) -> Vec<Candle> {
    let p1 = 20;
    let p2 = p1 + separation;
    let trough = p1 + separation / 2;
    let len = p2 + 14;

    (0..len)
        .map(|i| {
            let high = if i == p1 || i == p2 {
                100.0
            } else if i < p1 {
                97.0 + i as f64 * 0.1
            } else if i < p2 {
                99.9
            } else {
                99.9 - (i - p2 - 1) as f64 * 0.1
            };
            let low = if i == trough { 99.7 } else { high - 0.1 };
            candle(i, low + 0.02, high, low, high - 0.02)
        })
        .collect()
}

/// Triangle-wave oscillation around 100 with shrinking amplitude: peaks every
/// 12 bars (indices 0, 12, 24, ...) and troughs in between (6, 18, ...).
pub fn triangle_series(len: usize) -> Vec<Candle> {
    (0..len)
        .map(|i| {
            let amplitude = 2.0 - 0.02 * i as f64;
            let phase = (i % 12) as f64;
            let wave = if phase <= 6.0 { 1.0 - phase / 3.0 } else { -1.0 + (phase - 6.0) / 3.0 };
            let mid = 100.0 + amplitude * wave;
            candle(i, mid - 0.01, mid + 0.05, mid - 0.05, mid + 0.01)
        })
        .collect()
}
