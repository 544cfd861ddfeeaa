//! Exponential Moving Average (EMA).

/// EMA seeded with the first price of the window.
///
/// `ema = α·price + (1 - α)·ema` with `α = 2 / (period + 1)`, folded over the
/// whole window. A window shorter than `period` returns its last price
/// unchanged. Returns `None` only for an empty window.
pub fn ema(prices: &[f64], period: usize) -> Option<f64> {
    let (&first, rest) = prices.split_first()?;
    if prices.len() < period {
        return prices.last().copied();
    }

    let alpha = 2.0 / (period as f64 + 1.0);
    let value = rest
        .iter()
        .fold(first, |ema, &price| alpha * price + (1.0 - alpha) * ema);

    Some(value)
}
