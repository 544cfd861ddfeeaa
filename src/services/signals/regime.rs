//! Market regime classification and adaptive parameter selection.

use super::indicators::{linear_regression, std_dev};
use crate::types::{AdaptiveParams, MarketRegime, RegimeState};
use tracing::debug;

/// Prices required before the regime is (re)classified.
pub const REGIME_MIN_PRICES: usize = 25;
/// Trailing prices whose simple returns define volatility.
pub const VOLATILITY_WINDOW: usize = 15;

const SLOPE_THRESHOLD: f64 = 0.0005;
const STRENGTH_THRESHOLD: f64 = 0.2;
const HIGH_VOLATILITY_PCT: f64 = 2.5;

/// Derives the market regime from trend slope, strength and volatility.
#[derive(Debug, Clone, Default)]
pub struct RegimeClassifier {
    state: RegimeState,
}

impl RegimeClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> RegimeState {
        self.state
    }

    /// Classify a chronological price window without touching stored state.
    ///
    /// Returns `None` below [`REGIME_MIN_PRICES`].
    pub fn classify(prices: &[f64]) -> Option<RegimeState> {
        if prices.len() < REGIME_MIN_PRICES {
            return None;
        }

        let fit = linear_regression(prices)?;
        let trend_strength = fit.strength();
        let regime = if fit.slope > SLOPE_THRESHOLD && trend_strength > STRENGTH_THRESHOLD {
            MarketRegime::Bullish
        } else if fit.slope < -SLOPE_THRESHOLD && trend_strength > STRENGTH_THRESHOLD {
            MarketRegime::Bearish
        } else {
            MarketRegime::Neutral
        };

        Some(RegimeState {
            regime,
            trend_strength,
            volatility: volatility_pct(prices).unwrap_or(0.0),
        })
    }

    /// Reclassify from the retained window. Below the minimum the previous
    /// regime persists and `false` is returned.
    pub fn update(&mut self, prices: &[f64]) -> bool {
        let Some(next) = Self::classify(prices) else {
            return false;
        };

        if next.regime != self.state.regime {
            debug!(
                "Regime {} -> {} (strength {:.3}, volatility {:.2}%)",
                self.state.regime, next.regime, next.trend_strength, next.volatility
            );
        }
        self.state = next;
        true
    }

    pub fn reset(&mut self) {
        self.state = RegimeState::default();
    }
}

/// Std-dev of simple returns over the last [`VOLATILITY_WINDOW`] prices, in percent.
pub fn volatility_pct(prices: &[f64]) -> Option<f64> {
    if prices.len() < VOLATILITY_WINDOW {
        return None;
    }

    let window = &prices[prices.len() - VOLATILITY_WINDOW..];
    let returns: Vec<f64> = window
        .windows(2)
        .map(|pair| (pair[1] - pair[0]) / pair[0])
        .collect();

    std_dev(&returns, returns.len()).map(|std| std * 100.0)
}

impl AdaptiveParams {
    /// Window lengths for the given regime. Momentum and MACD windows stay fixed.
    pub fn for_regime(state: &RegimeState) -> Self {
        let mut params = Self::default();
        params.adapt(state);
        params
    }

    /// Trending markets get faster EMAs; volatile markets shorter RSI/Bollinger windows.
    pub fn adapt(&mut self, state: &RegimeState) {
        if state.regime.is_trending() {
            self.ema_fast = 5;
            self.ema_slow = 12;
            self.ema_trend = 25;
        } else {
            self.ema_fast = 4;
            self.ema_slow = 10;
            self.ema_trend = 20;
        }

        if state.volatility > HIGH_VOLATILITY_PCT {
            self.rsi_period = 10;
            self.bb_period = 12;
        } else {
            self.rsi_period = 12;
            self.bb_period = 16;
        }
    }
}
