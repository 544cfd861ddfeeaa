//! Standard deviation and Bollinger Bands.

/// Default band width multiplier.
pub const DEFAULT_BAND_WIDTH: f64 = 1.8;

/// Bollinger band levels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerBands {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

impl BollingerBands {
    /// Fallback bands around a price when the window is too short.
    pub fn around_price(price: f64) -> Self {
        Self {
            upper: price * 1.08,
            middle: price,
            lower: price * 0.92,
        }
    }
}

/// Population standard deviation (divides by `period`) of the last `period` prices.
pub fn std_dev(prices: &[f64], period: usize) -> Option<f64> {
    if period == 0 || prices.len() < period {
        return None;
    }

    let window = &prices[prices.len() - period..];
    let mean = window.iter().sum::<f64>() / period as f64;
    let variance = window.iter().map(|p| (p - mean).powi(2)).sum::<f64>() / period as f64;
    Some(variance.sqrt())
}

/// Bands at `mean ± k·stddev` of the last `period` prices.
pub fn bollinger(prices: &[f64], period: usize, k: f64) -> Option<BollingerBands> {
    let std = std_dev(prices, period)?;
    let middle = prices[prices.len() - period..].iter().sum::<f64>() / period as f64;
    let offset = k * std;

    Some(BollingerBands {
        upper: middle + offset,
        middle,
        lower: middle - offset,
    })
}
