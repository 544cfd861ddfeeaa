//! Signal Strategies
//!
//! Independent strategy variants behind one capability trait, selected by
//! configuration. Each instance owns its buffer and state exclusively and
//! expects a single price feeder.

pub mod adaptive;
pub mod config;
pub mod cost_aware;
pub mod threshold;

pub use adaptive::AdaptiveStrategy;
pub use config::{CostConfig, StrategyConfig, StrategyKind};
pub use cost_aware::{apply_broker_commission, CostFilter};
pub use threshold::ThresholdStrategy;

use crate::types::{Candle, IndicatorSnapshot, IndicatorSummary, PositionState, Signal};
use tracing::info;

/// Core trait that all signal strategies implement
pub trait Strategy: Send {
    /// Human-readable strategy name
    fn name(&self) -> &'static str;

    /// Feed a price into the buffer without scoring or emitting
    fn add_price(&mut self, price: f64);

    /// Feed a price and run the full pipeline, returning a newly surfaced signal
    fn analyze(&mut self, price: f64) -> Option<Signal>;

    /// Indicator values over the current buffer, if enough prices are held
    fn indicator_snapshot(&self) -> Option<IndicatorSnapshot>;

    /// Rounded projection for display
    fn summary(&self) -> IndicatorSummary;

    /// Number of buffered prices
    fn price_count(&self) -> usize;

    /// Prices needed before the strategy can signal
    fn min_prices(&self) -> usize;

    /// Tracked position, for strategies that keep one
    fn position(&self) -> Option<PositionState> {
        None
    }

    /// Clear all state; later calls start from scratch
    fn reset(&mut self);
}

/// Whether a price may enter a strategy buffer.
pub fn is_valid_price(price: f64) -> bool {
    price.is_finite() && price > 0.0
}

/// Build the configured strategy variant.
pub fn build_strategy(config: &StrategyConfig) -> Box<dyn Strategy> {
    match config.kind {
        StrategyKind::Threshold => Box::new(ThresholdStrategy::new(
            config.threshold_capacity,
            config.price_change_threshold,
        )),
        StrategyKind::Adaptive => Box::new(AdaptiveStrategy::new(config.adaptive_capacity)),
        StrategyKind::CostAware => Box::new(AdaptiveStrategy::cost_aware(
            config.adaptive_capacity,
            config.cost,
        )),
    }
}

/// Seed a freshly activated strategy with candle closes. Returns the number of prices fed.
pub fn warm_up(strategy: &mut dyn Strategy, candles: &[Candle]) -> usize {
    let mut fed = 0;
    for candle in candles.iter().filter(|c| is_valid_price(c.close)) {
        strategy.add_price(candle.close);
        fed += 1;
    }

    info!(
        "{} warmed up with {} prices ({} needed)",
        strategy.name(),
        strategy.price_count(),
        strategy.min_prices()
    );
    fed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(time: i64, close: f64) -> Candle {
        Candle {
            time,
            open: close,
            high: close,
            low: close,
            close,
        }
    }

    #[test]
    fn test_build_strategy_kinds() {
        assert_eq!(
            build_strategy(&StrategyConfig::threshold()).name(),
            "Simple Fast Strategy"
        );
        assert_eq!(
            build_strategy(&StrategyConfig::adaptive()).name(),
            "Smart Adaptive Strategy"
        );
        let strategy = build_strategy(&StrategyConfig::default());
        assert_eq!(strategy.name(), "Cost Aware Smart Strategy");
        assert!(strategy.position().is_some());
    }

    #[test]
    fn test_warm_up_feeds_closes() {
        let candles: Vec<Candle> = (0..30).map(|i| candle(i * 60, 100.0 + i as f64)).collect();
        let mut strategy = build_strategy(&StrategyConfig::adaptive());
        assert_eq!(warm_up(strategy.as_mut(), &candles), 30);
        assert_eq!(strategy.price_count(), 30);
        assert!(strategy.indicator_snapshot().is_some());
        assert_eq!(strategy.indicator_snapshot().unwrap().price, 129.0);
    }

    #[test]
    fn test_warm_up_skips_invalid_closes() {
        let candles = vec![candle(0, 10.0), candle(60, 0.0), candle(120, 11.0)];
        let mut strategy = build_strategy(&StrategyConfig::threshold());
        assert_eq!(warm_up(strategy.as_mut(), &candles), 2);
    }

    #[test]
    fn test_is_valid_price() {
        assert!(is_valid_price(0.01));
        assert!(!is_valid_price(0.0));
        assert!(!is_valid_price(-5.0));
        assert!(!is_valid_price(f64::INFINITY));
        assert!(!is_valid_price(f64::NAN));
    }
}
