//! Regime-adaptive indicator strategy.
//!
//! Every `analyze` call runs the whole pipeline to completion: buffer,
//! regime, adapted parameters, fresh snapshot, scoring, optional cost
//! filter, edge trigger.

use super::config::{CostConfig, StrategyKind};
use super::cost_aware::CostFilter;
use super::{is_valid_price, Strategy};
use crate::services::price_buffer::PriceBuffer;
use crate::services::signals::{
    compute_snapshot, decide, EdgeTrigger, RegimeClassifier, REGIME_MIN_PRICES,
};
use crate::types::{
    round_to, AdaptiveParams, IndicatorSnapshot, IndicatorSummary, PositionState, Signal,
};
use tracing::{debug, info};

/// Adaptive scoring strategy, optionally gated by commission economics.
#[derive(Debug, Clone)]
pub struct AdaptiveStrategy {
    buffer: PriceBuffer,
    regime: RegimeClassifier,
    params: AdaptiveParams,
    emitter: EdgeTrigger,
    cost: Option<CostFilter>,
}

impl AdaptiveStrategy {
    /// Plain adaptive strategy without a cost filter.
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: PriceBuffer::new(capacity),
            regime: RegimeClassifier::new(),
            params: AdaptiveParams::default(),
            emitter: EdgeTrigger::new(),
            cost: None,
        }
    }

    /// Adaptive strategy whose signals must clear the cost filter.
    pub fn cost_aware(capacity: usize, cost: CostConfig) -> Self {
        Self {
            cost: Some(CostFilter::new(cost)),
            ..Self::new(capacity)
        }
    }

    pub fn kind(&self) -> StrategyKind {
        if self.cost.is_some() {
            StrategyKind::CostAware
        } else {
            StrategyKind::Adaptive
        }
    }

    /// Parameters selected by the last regime update.
    pub fn params(&self) -> AdaptiveParams {
        self.params
    }

    pub fn regime(&self) -> &RegimeClassifier {
        &self.regime
    }

    pub fn cost_filter(&self) -> Option<&CostFilter> {
        self.cost.as_ref()
    }

    /// Last surfaced signal.
    pub fn last_signal(&self) -> Option<Signal> {
        self.emitter.last()
    }
}

impl Strategy for AdaptiveStrategy {
    fn name(&self) -> &'static str {
        self.kind().display_name()
    }

    fn add_price(&mut self, price: f64) {
        if is_valid_price(price) {
            self.buffer.push(price);
        } else {
            debug!("Dropping invalid price {}", price);
        }
    }

    fn analyze(&mut self, price: f64) -> Option<Signal> {
        if !is_valid_price(price) {
            debug!("Dropping invalid price {}", price);
            return None;
        }

        self.buffer.push(price);
        if self.buffer.len() < REGIME_MIN_PRICES {
            return None;
        }

        let prices = self.buffer.as_slice();
        self.regime.update(prices);
        let state = self.regime.state();
        self.params.adapt(&state);

        let snapshot = compute_snapshot(prices, &self.params);
        let candidate = decide(snapshot.as_ref(), state.regime);
        let candidate = match (&self.cost, snapshot.as_ref()) {
            (Some(filter), Some(snapshot)) => filter.filter(candidate, price, snapshot),
            (Some(_), None) => None,
            (None, _) => candidate,
        };

        let signal = self.emitter.surface(candidate)?;
        if let Some(filter) = self.cost.as_mut() {
            filter.record(signal, price);
        }

        info!(
            "{} signal at {:.4} (regime {}, volatility {:.2}%)",
            signal, price, state.regime, state.volatility
        );
        Some(signal)
    }

    fn indicator_snapshot(&self) -> Option<IndicatorSnapshot> {
        compute_snapshot(&self.buffer.to_vec(), &self.params)
    }

    fn summary(&self) -> IndicatorSummary {
        let Some(snapshot) = self.indicator_snapshot() else {
            return IndicatorSummary::default();
        };
        let state = self.regime.state();

        let mut summary = IndicatorSummary {
            ema_fast: Some(round_to(snapshot.ema_fast, 2)),
            ema_slow: Some(round_to(snapshot.ema_slow, 2)),
            rsi: Some(round_to(snapshot.rsi, 1)),
            macd: Some(round_to(snapshot.macd, 3)),
            stoch_k: Some(round_to(snapshot.stoch_k, 1)),
            regime: Some(state.regime),
            volatility: Some(round_to(state.volatility, 1)),
            ..IndicatorSummary::default()
        };

        if let Some(filter) = &self.cost {
            let position = filter.position();
            if position.is_long() {
                summary.position = Some("LONG".to_string());
                summary.entry_price = Some(round_to(position.entry_price, 2));
                summary.pnl_pct = filter
                    .unrealized_pnl_pct(snapshot.price)
                    .map(|pnl| round_to(pnl, 2));
            }
            summary.trades = Some(position.trade_count);
            summary.commission = Some(round_to(position.total_commission, 2));
        }

        summary
    }

    fn price_count(&self) -> usize {
        self.buffer.len()
    }

    fn min_prices(&self) -> usize {
        REGIME_MIN_PRICES
    }

    fn position(&self) -> Option<PositionState> {
        self.cost.as_ref().map(CostFilter::position)
    }

    fn reset(&mut self) {
        self.buffer.clear();
        self.regime.reset();
        self.params = AdaptiveParams::default();
        self.emitter.clear();
        if let Some(filter) = self.cost.as_mut() {
            filter.reset();
        }
    }
}
