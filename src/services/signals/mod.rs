//! Trading signals service module.
//!
//! Provides the indicator library, regime classification, weighted scoring
//! and edge-triggered emission used by the strategies.

pub mod emitter;
pub mod indicators;
pub mod regime;
pub mod scorer;

pub use emitter::EdgeTrigger;
pub use regime::{RegimeClassifier, REGIME_MIN_PRICES};
pub use scorer::{decide, score, ScoreCard};

use crate::types::{AdaptiveParams, IndicatorSnapshot};
use indicators::{
    bollinger, ema, macd, momentum, rsi, stochastic, BollingerBands, StochasticValue,
    DEFAULT_BAND_WIDTH, MACD_FAST, MACD_SIGNAL, MACD_SLOW, STOCHASTIC_PERIOD,
};

/// RSI reported when the window is flat.
pub const NEUTRAL_RSI: f64 = 50.0;

/// Compute a fresh snapshot from a chronological price window.
///
/// Needs [`REGIME_MIN_PRICES`] prices. Degenerate sub-results fall back to
/// neutral values: RSI 50, bands at ±8% of price, stochastic 50, MACD zeros.
pub fn compute_snapshot(prices: &[f64], params: &AdaptiveParams) -> Option<IndicatorSnapshot> {
    if prices.len() < REGIME_MIN_PRICES {
        return None;
    }
    let price = *prices.last()?;

    let bands = bollinger(prices, params.bb_period, DEFAULT_BAND_WIDTH)
        .unwrap_or_else(|| BollingerBands::around_price(price));
    let macd_value = macd(prices, MACD_FAST, MACD_SLOW, MACD_SIGNAL).unwrap_or_default();
    let stoch = stochastic(prices, STOCHASTIC_PERIOD).unwrap_or_else(StochasticValue::neutral);

    Some(IndicatorSnapshot {
        price,
        ema_fast: ema(prices, params.ema_fast)?,
        ema_slow: ema(prices, params.ema_slow)?,
        ema_trend: ema(prices, params.ema_trend)?,
        rsi: rsi(prices, params.rsi_period).unwrap_or(NEUTRAL_RSI),
        bb_upper: bands.upper,
        bb_middle: bands.middle,
        bb_lower: bands.lower,
        macd: macd_value.macd,
        macd_signal: macd_value.signal,
        macd_hist: macd_value.histogram,
        stoch_k: stoch.k,
        stoch_d: stoch.d,
        momentum: momentum(prices, params.momentum_period),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_needs_minimum_prices() {
        let prices: Vec<f64> = (0..24).map(|i| 90.0 + i as f64).collect();
        assert!(compute_snapshot(&prices, &AdaptiveParams::default()).is_none());
    }

    #[test]
    fn test_flat_series_uses_neutral_fallbacks() {
        let snapshot = compute_snapshot(&[100.0; 30], &AdaptiveParams::default()).unwrap();
        assert_eq!(snapshot.rsi, NEUTRAL_RSI);
        assert_eq!(snapshot.stoch_k, 50.0);
        assert_eq!(snapshot.momentum, 0.0);
        assert_eq!(snapshot.bb_middle, 100.0);
    }

    #[test]
    fn test_rising_series_snapshot() {
        let prices: Vec<f64> = (90..115).map(|p| p as f64).collect();
        let params = AdaptiveParams {
            ema_fast: 5,
            ema_slow: 12,
            ema_trend: 25,
            ..AdaptiveParams::default()
        };
        let snapshot = compute_snapshot(&prices, &params).unwrap();
        assert_eq!(snapshot.price, 114.0);
        assert_eq!(snapshot.rsi, 100.0);
        assert!(snapshot.ema_fast > snapshot.ema_slow);
        assert!(snapshot.ema_slow > snapshot.ema_trend);
        assert_eq!(snapshot.momentum, 8.0);
        assert_eq!(snapshot.stoch_k, 100.0);
    }
}
