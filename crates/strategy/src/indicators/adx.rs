use common::Candle;

use super::atr::true_range;

/// Average Directional Index (Wilder).
///
/// Directional movement and true range are smoothed over `period` starting
/// at index `period`; DX is averaged over another `period` values, so the
/// first ADX value sits at index `2 * period - 1`.
pub fn adx(candles: &[Candle], period: usize) -> Vec<Option<f64>> {
    let n = candles.len();
    let mut out = vec![None; n];
    if period == 0 || n < 2 * period {
        return out;
    }

    let tr = true_range(candles);
    let mut plus_dm = vec![0.0; n];
    let mut minus_dm = vec![0.0; n];
    for i in 1..n {
        let up = candles[i].high - candles[i - 1].high;
        let down = candles[i - 1].low - candles[i].low;
        if up > down && up > 0.0 {
            plus_dm[i] = up;
        }
        if down > up && down > 0.0 {
            minus_dm[i] = down;
        }
    }

    let p = period as f64;
    let mut s_tr: f64 = tr[1..=period].iter().sum();
    let mut s_plus: f64 = plus_dm[1..=period].iter().sum();
    let mut s_minus: f64 = minus_dm[1..=period].iter().sum();

    let mut dx = vec![0.0; n];
    dx[period] = directional_index(s_tr, s_plus, s_minus);
    for i in (period + 1)..n {
        s_tr = s_tr - s_tr / p + tr[i];
        s_plus = s_plus - s_plus / p + plus_dm[i];
        s_minus = s_minus - s_minus / p + minus_dm[i];
        dx[i] = directional_index(s_tr, s_plus, s_minus);
    }

    let first = 2 * period - 1;
    let mut value = dx[period..=first].iter().sum::<f64>() / p;
    out[first] = Some(value);
    for i in (first + 1)..n {
        value = (value * (p - 1.0) + dx[i]) / p;
        out[i] = Some(value);
    }
    out
}

fn directional_index(s_tr: f64, s_plus: f64, s_minus: f64) -> f64 {
    if s_tr <= 0.0 {
        return 0.0;
    }
    let di_plus = 100.0 * s_plus / s_tr;
    let di_minus = 100.0 * s_minus / s_tr;
    let sum = di_plus + di_minus;
    if sum <= 0.0 {
        0.0
    } else {
        100.0 * (di_plus - di_minus).abs() / sum
    }
}
