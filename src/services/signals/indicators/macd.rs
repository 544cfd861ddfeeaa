//! MACD (Moving Average Convergence Divergence).

use super::ema::ema;

pub const MACD_FAST: usize = 10;
pub const MACD_SLOW: usize = 22;
pub const MACD_SIGNAL: usize = 7;

/// MACD line, signal line and histogram.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MacdValue {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

/// MACD with a history-light signal line.
///
/// The line is `EMA(fast) - EMA(slow)`. The signal line is the EMA of the last
/// `signal` raw prices rather than of a MACD history series, so it sits at
/// price level; callers compare against it as-is.
pub fn macd(prices: &[f64], fast: usize, slow: usize, signal: usize) -> Option<MacdValue> {
    if prices.is_empty() || prices.len() < slow {
        return None;
    }

    let line = ema(prices, fast)? - ema(prices, slow)?;
    let tail = &prices[prices.len().saturating_sub(signal)..];
    let signal_line = ema(tail, signal)?;

    Some(MacdValue {
        macd: line,
        signal: signal_line,
        histogram: line - signal_line,
    })
}
