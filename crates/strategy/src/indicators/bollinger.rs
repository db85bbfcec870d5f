use super::moving::{rolling_std, sma};

/// Bollinger bands: SMA(period) ± `width` population standard deviations.
#[derive(Debug, Clone)]
pub struct BollingerIndicator {
    pub period: usize,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BollingerSeries {
    pub upper: Vec<Option<f64>>,
    pub middle: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
}

impl BollingerIndicator {
    pub fn new(period: usize, width: f64) -> Self {
        Self { period, width }
    }

    pub fn series(&self, closes: &[f64]) -> BollingerSeries {
        let middle = sma(closes, self.period);
        let std = rolling_std(closes, self.period);
        let band = |sign: f64| -> Vec<Option<f64>> {
            middle
                .iter()
                .zip(&std)
                .map(|(m, s)| Some((*m)? + sign * self.width * (*s)?))
                .collect()
        };
        let upper = band(1.0);
        let lower = band(-1.0);
        BollingerSeries { upper, middle, lower }
    }
}
