//! Price momentum.

/// `current - prices[len - period - 1]`, or 0 without enough history.
pub fn momentum(prices: &[f64], period: usize) -> f64 {
    if prices.len() < period + 1 {
        return 0.0;
    }
    let current = prices[prices.len() - 1];
    current - prices[prices.len() - period - 1]
}
