//! Stochastic Oscillator.

pub const STOCHASTIC_PERIOD: usize = 12;

/// %K and %D. No separate smoothing is applied, so both carry the same value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StochasticValue {
    pub k: f64,
    pub d: f64,
}

impl StochasticValue {
    /// Mid-range value used when the window is too short or flat.
    pub fn neutral() -> Self {
        Self { k: 50.0, d: 50.0 }
    }
}

/// `%K = 100·(close - lowest) / (highest - lowest)` over the last `period` prices.
///
/// Returns `None` for a short window or a flat one (zero range).
pub fn stochastic(prices: &[f64], period: usize) -> Option<StochasticValue> {
    if period == 0 || prices.len() < period {
        return None;
    }

    let window = &prices[prices.len() - period..];
    let highest = window.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let lowest = window.iter().copied().fold(f64::INFINITY, f64::min);
    if highest == lowest {
        return None;
    }

    let close = *window.last()?;
    let k = 100.0 * (close - lowest) / (highest - lowest);
    Some(StochasticValue { k, d: k })
}
