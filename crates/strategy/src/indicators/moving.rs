/// Simple moving average. The first `period - 1` values are undefined.
pub fn sma(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let defined: Vec<Option<f64>> = values.iter().copied().map(Some).collect();
    sma_opt(&defined, period)
}

/// Simple moving average over a partially defined series.
/// A window containing any undefined value is itself undefined.
pub fn sma_opt(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 {
        return out;
    }
    for i in (period - 1)..values.len() {
        let window = &values[i + 1 - period..=i];
        if let Some(sum) = window.iter().copied().sum::<Option<f64>>() {
            out[i] = Some(sum / period as f64);
        }
    }
    out
}

/// Exponential moving average, seeded with the SMA of the first `period` values.
pub fn ema(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let defined: Vec<Option<f64>> = values.iter().copied().map(Some).collect();
    ema_opt(&defined, period)
}

/// EMA over a partially defined series. The average (re)starts after
/// `period` consecutive defined inputs.
pub fn ema_opt(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 {
        return out;
    }
    let k = 2.0 / (period as f64 + 1.0);
    let mut run = 0usize;
    let mut seed_sum = 0.0;
    let mut prev: Option<f64> = None;

    for (i, value) in values.iter().enumerate() {
        let Some(x) = *value else {
            run = 0;
            seed_sum = 0.0;
            prev = None;
            continue;
        };
        run += 1;
        match prev {
            Some(p) => {
                let next = x * k + p * (1.0 - k);
                out[i] = Some(next);
                prev = Some(next);
            }
            None => {
                seed_sum += x;
                if run == period {
                    let seed = seed_sum / period as f64;
                    out[i] = Some(seed);
                    prev = Some(seed);
                }
            }
        }
    }
    out
}

/// Population standard deviation over a rolling window.
pub fn rolling_std(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 {
        return out;
    }
    for i in (period - 1)..values.len() {
        let window = &values[i + 1 - period..=i];
        let mean = window.iter().sum::<f64>() / period as f64;
        let var = window.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / period as f64;
        out[i] = Some(var.sqrt());
    }
    out
}
