//! Relative Strength Index (RSI).

/// Simple-average RSI over the last `period` price changes.
///
/// Gains and losses are summed over the deltas between the last `period + 1`
/// prices and averaged over `period`. Zero losses with some gains gives 100.
/// Returns `None` when fewer than `period + 1` prices are available, or when
/// the window is flat (no gains and no losses).
pub fn rsi(prices: &[f64], period: usize) -> Option<f64> {
    if period == 0 || prices.len() < period + 1 {
        return None;
    }

    let window = &prices[prices.len() - period - 1..];
    let (gains, losses) = window
        .windows(2)
        .map(|pair| pair[1] - pair[0])
        .fold((0.0, 0.0), |(gains, losses), change| {
            if change > 0.0 {
                (gains + change, losses)
            } else {
                (gains, losses - change)
            }
        });

    if gains == 0.0 && losses == 0.0 {
        return None;
    }
    if losses == 0.0 {
        return Some(100.0);
    }

    let avg_gain = gains / period as f64;
    let avg_loss = losses / period as f64;
    let rs = avg_gain / avg_loss;
    Some(100.0 - 100.0 / (1.0 + rs))
}
