use common::Candle;

/// True range per candle. The first candle has no previous close, so its
/// true range is its own high-low range.
pub fn true_range(candles: &[Candle]) -> Vec<f64> {
    candles
        .iter()
        .enumerate()
        .map(|(i, c)| match i.checked_sub(1).map(|p| candles[p].close) {
            Some(prev_close) => (c.high - c.low)
                .max((c.high - prev_close).abs())
                .max((c.low - prev_close).abs()),
            None => c.high - c.low,
        })
        .collect()
}

/// Average True Range with Wilder smoothing. First value at `period - 1` is
/// the mean true range of the first `period` candles.
pub fn atr(candles: &[Candle], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; candles.len()];
    if period == 0 || candles.len() < period {
        return out;
    }
    let tr = true_range(candles);
    let mut value = tr[..period].iter().sum::<f64>() / period as f64;
    out[period - 1] = Some(value);
    for i in period..candles.len() {
        value = (value * (period - 1) as f64 + tr[i]) / period as f64;
        out[i] = Some(value);
    }
    out
}
