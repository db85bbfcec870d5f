//! Multi-candle chart formations: double top, double bottom and triangle.
//!
//! Formations are re-detected from scratch on every snapshot using only the
//! two most recent local extremes inside the lookback window. A confirmed
//! formation is always attached to the last candle of the snapshot, even if
//! its second extreme lies several bars back.

use common::Candle;
use serde::Serialize;

/// Candles scanned for extremes.
pub const CHART_LOOKBACK: usize = 30;
/// Width of the centered window that defines a local extreme.
pub const EXTREMA_WINDOW: usize = 10;

/// Relative tolerance between the two peaks (or troughs).
const PRICE_MATCH_TOLERANCE: f64 = 0.001;
/// Extremes must be more than this many candles apart.
const MIN_SEPARATION: usize = 5;
/// Minimum relative depth of the trough between two peaks (or height of the
/// peak between two troughs).
const MIN_RETRACE: f64 = 0.002;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ChartPatternKind {
    DoubleTop,
    DoubleBottom,
    Triangle,
}

/// A formation confirmed at candle `confirmed_at`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartPattern {
    pub kind: ChartPatternKind,
    pub confirmed_at: usize,
    /// Breakout level for double tops/bottoms; `None` for triangles.
    pub neckline: Option<f64>,
}

/// Marks candles whose `value` equals the max (or min) over the centered
/// window `[i - window/2, i + (window-1)/2]`. Candles whose window runs off
/// either end of the series are never extremes.
fn local_extremes(values: &[f64], window: usize, want_max: bool) -> Vec<bool> {
    let n = values.len();
    let mut out = vec![false; n];
    if window == 0 || n < window {
        return out;
    }
    let forward = (window - 1) / 2;
    for (i, flag) in out.iter_mut().enumerate() {
        let end = i + forward + 1;
        if end > n || end < window {
            continue;
        }
        let slice = &values[end - window..end];
        let extreme = if want_max {
            slice.iter().copied().fold(f64::MIN, f64::max)
        } else {
            slice.iter().copied().fold(f64::MAX, f64::min)
        };
        *flag = values[i] == extreme;
    }
    out
}

pub fn local_maxima(candles: &[Candle], window: usize) -> Vec<bool> {
    let highs: Vec<f64> = candles.iter().map(|c| c.high).collect();
    local_extremes(&highs, window, true)
}

pub fn local_minima(candles: &[Candle], window: usize) -> Vec<bool> {
    let lows: Vec<f64> = candles.iter().map(|c| c.low).collect();
    local_extremes(&lows, window, false)
}

/// Detect formations over the last `lookback` candles.
pub fn detect(candles: &[Candle], lookback: usize) -> Vec<ChartPattern> {
    let n = candles.len();
    if n < lookback || n == 0 {
        return Vec::new();
    }
    let last = n - 1;
    let from = n - lookback;

    let maxima: Vec<usize> = local_maxima(candles, EXTREMA_WINDOW)
        .into_iter()
        .enumerate()
        .skip(from)
        .filter_map(|(i, is_max)| is_max.then_some(i))
        .collect();
    let minima: Vec<usize> = local_minima(candles, EXTREMA_WINDOW)
        .into_iter()
        .enumerate()
        .skip(from)
        .filter_map(|(i, is_min)| is_min.then_some(i))
        .collect();

    let mut found = Vec::new();

    if let [.., p1, p2] = maxima[..] {
        let (h1, h2) = (candles[p1].high, candles[p2].high);
        if matches_price(h1, h2) && p2 - p1 > MIN_SEPARATION {
            let valley = candles[p1..p2].iter().map(|c| c.low).fold(f64::MAX, f64::min);
            if (h1 - valley) / h1 > MIN_RETRACE {
                found.push(ChartPattern {
                    kind: ChartPatternKind::DoubleTop,
                    confirmed_at: last,
                    neckline: Some(valley),
                });
            }
        }
    }

    if let [.., t1, t2] = minima[..] {
        let (l1, l2) = (candles[t1].low, candles[t2].low);
        if matches_price(l1, l2) && t2 - t1 > MIN_SEPARATION {
            let peak = candles[t1..t2].iter().map(|c| c.high).fold(f64::MIN, f64::max);
            if (peak - l1) / l1 > MIN_RETRACE {
                found.push(ChartPattern {
                    kind: ChartPatternKind::DoubleBottom,
                    confirmed_at: last,
                    neckline: Some(peak),
                });
            }
        }
    }

    if let ([.., p1, p2], [.., t1, t2]) = (&maxima[..], &minima[..]) {
        let falling_highs = candles[*p2].high < candles[*p1].high;
        let rising_lows = candles[*t2].low > candles[*t1].low;
        if falling_highs && rising_lows {
            found.push(ChartPattern {
                kind: ChartPatternKind::Triangle,
                confirmed_at: last,
                neckline: None,
            });
        }
    }

    found
}

fn matches_price(a: f64, b: f64) -> bool {
    a != 0.0 && (a - b).abs() / a < PRICE_MATCH_TOLERANCE
}
